//! Keyword fallback used when no model produced a usable prediction

use aho_corasick::AhoCorasick;
use std::collections::BTreeMap;
use vartha_core::{Category, ClassificationResult, Error, PredictionSource, Result, CATEGORIES};

/// Probability assigned to every category that did not match
pub const RESIDUAL_PROBABILITY: f32 = 0.05;

/// Category used when no keyword matches
pub const DEFAULT_CATEGORY: Category = Category::Nation;

/// Confidence reported for [`DEFAULT_CATEGORY`]
pub const DEFAULT_CONFIDENCE: f32 = 0.65;

/// Keyword group for one category
#[derive(Debug, Clone, Copy)]
pub struct FallbackRule {
    pub category: Category,
    pub keywords: &'static [&'static str],
    pub confidence: f32,
}

/// Rules in priority order; the first rule with any matching keyword wins
pub static FALLBACK_RULES: [FallbackRule; 4] = [
    FallbackRule {
        category: Category::Sports,
        keywords: &["క్రీడ", "జట్టు", "గెలిచ", "ఆడ", "మ్యాచ్"],
        confidence: 0.85,
    },
    FallbackRule {
        category: Category::Entertainment,
        keywords: &["సినిమా", "నటుడు", "నటి", "చిత్రం", "వినోద"],
        confidence: 0.80,
    },
    FallbackRule {
        category: Category::Business,
        keywords: &["వ్యాపార", "బిజినెస్", "కంపెనీ", "మార్కెట్"],
        confidence: 0.75,
    },
    FallbackRule {
        category: Category::Editorial,
        keywords: &["సంపాదక", "అభిప్రాయ"],
        confidence: 0.70,
    },
];

/// Substring matcher over [`FALLBACK_RULES`]
pub struct KeywordFallback {
    matcher: AhoCorasick,
    /// Rule index for each pattern in `matcher`
    pattern_rules: Vec<usize>,
}

impl KeywordFallback {
    /// Build the matcher
    pub fn new() -> Result<Self> {
        let mut patterns = Vec::new();
        let mut pattern_rules = Vec::new();
        for (rule_idx, rule) in FALLBACK_RULES.iter().enumerate() {
            for keyword in rule.keywords {
                patterns.push(*keyword);
                pattern_rules.push(rule_idx);
            }
        }

        let matcher = AhoCorasick::new(&patterns)
            .map_err(|e| Error::internal(format!("Failed to build keyword matcher: {}", e)))?;

        Ok(Self {
            matcher,
            pattern_rules,
        })
    }

    /// Highest-priority rule with a keyword contained in `text`
    pub fn matching_rule(&self, text: &str) -> Option<&'static FallbackRule> {
        let text = text.to_lowercase();
        self.matcher
            .find_overlapping_iter(&text)
            .map(|m| self.pattern_rules[m.pattern().as_usize()])
            .min()
            .map(|rule_idx| &FALLBACK_RULES[rule_idx])
    }

    /// Classify `text` by keyword containment
    pub fn classify(&self, text: &str) -> ClassificationResult {
        let (category, confidence) = match self.matching_rule(text) {
            Some(rule) => (rule.category, rule.confidence),
            None => (DEFAULT_CATEGORY, DEFAULT_CONFIDENCE),
        };

        let mut all_probabilities: BTreeMap<String, f32> = CATEGORIES
            .iter()
            .map(|c| (c.code().to_string(), RESIDUAL_PROBABILITY))
            .collect();
        all_probabilities.insert(category.code().to_string(), confidence);

        ClassificationResult::new(
            category.code(),
            confidence,
            all_probabilities,
            PredictionSource::Fallback,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fallback() -> KeywordFallback {
        KeywordFallback::new().unwrap()
    }

    #[test]
    fn test_sports_keyword() {
        let result = fallback().classify("భారత జట్టు మ్యాచ్ గెలిచింది");
        assert_eq!(result.category, "sports");
        assert_eq!(result.confidence, 0.85);
        assert_eq!(result.display.english, "Sports");
        assert_eq!(result.source, PredictionSource::Fallback);
    }

    #[test]
    fn test_each_rule() {
        let fb = fallback();
        assert_eq!(fb.classify("కొత్త సినిమా విడుదల").category, "entertainment");
        assert_eq!(fb.classify("స్టాక్ మార్కెట్ పడిపోయింది").category, "business");
        assert_eq!(fb.classify("సంపాదకీయం: ప్రజాస్వామ్యం").category, "editorial");
        assert_eq!(fb.classify("ఎన్నికల ఫలితాలు").category, "nation");
        assert_eq!(fb.classify("ఎన్నికల ఫలితాలు").confidence, DEFAULT_CONFIDENCE);
    }

    #[test]
    fn test_priority_order() {
        // Contains both an entertainment and a sports keyword; sports wins.
        let result = fallback().classify("సినిమా నటుడు క్రికెట్ జట్టు కోసం ఆడాడు");
        assert_eq!(result.category, "sports");

        // Business and editorial; business wins.
        let result = fallback().classify("కంపెనీ పై సంపాదకుడి అభిప్రాయం");
        assert_eq!(result.category, "business");
    }

    #[test]
    fn test_probabilities_cover_all_categories() {
        let result = fallback().classify("సినిమా");
        assert_eq!(result.all_probabilities.len(), 5);
        for category in CATEGORIES {
            let p = result.all_probabilities[category.code()];
            if category == Category::Entertainment {
                assert_eq!(p, 0.80);
            } else {
                assert_eq!(p, RESIDUAL_PROBABILITY);
            }
        }
        assert_eq!(result.max_probability(), result.confidence);
    }

    #[test]
    fn test_deterministic() {
        let fb = fallback();
        let a = fb.classify("వ్యాపార వార్తలు");
        let b = fb.classify("వ్యాపార వార్తలు");
        assert_eq!(a.category, b.category);
        assert_eq!(a.all_probabilities, b.all_probabilities);
    }

    #[test]
    fn test_english_text_defaults_to_nation() {
        let result = fallback().classify("The cricket team won the match");
        assert_eq!(result.category, "nation");
        assert_eq!(result.display.telugu, "జాతీయం");
    }
}
