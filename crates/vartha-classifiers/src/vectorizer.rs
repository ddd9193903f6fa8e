//! Pretrained TF-IDF vectorizer
//!
//! Reproduces the transform half of a fitted word-level TF-IDF model: the
//! vocabulary, idf weights and analyzer settings are fixed at export time and
//! loaded from a JSON artifact. Nothing here is fitted at runtime.

use crate::model_loader::load_json;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::HashMap;
use std::path::Path;
use vartha_core::{Error, Result};

/// Default token pattern: runs of two or more word characters
pub const DEFAULT_TOKEN_PATTERN: &str = r"(?u)\b\w\w+\b";

/// Characters that `\w` and `\b` treat as part of a word
///
/// Fitted vocabularies are built with letters, numbers and `_` as word
/// characters. Combining marks (Telugu vowel signs and virama) and joiners
/// are separators there, so `భారత` tokenizes to `రత`. The regex engine's own
/// Unicode `\w` keeps them inside words.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WordChars {
    /// `\p{L}`, `\p{N}` and `_`
    #[default]
    Letters,
    /// The regex engine's Unicode `\w`, marks and joiners included
    Unicode,
}

/// Row normalization applied after weighting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Norm {
    L1,
    L2,
}

/// Serialized form of a fitted vectorizer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TfidfVectorizerSpec {
    /// n-gram → feature column
    pub vocabulary: HashMap<String, usize>,

    /// Inverse document frequency per column; plain term counts when absent
    #[serde(default)]
    pub idf: Option<Vec<f32>>,

    #[serde(default = "default_true")]
    pub lowercase: bool,

    /// Inclusive (min_n, max_n) word n-gram range
    #[serde(default = "default_ngram_range")]
    pub ngram_range: (usize, usize),

    #[serde(default)]
    pub sublinear_tf: bool,

    #[serde(default = "default_norm")]
    pub norm: Option<Norm>,

    #[serde(default = "default_token_pattern")]
    pub token_pattern: String,

    #[serde(default)]
    pub word_chars: WordChars,
}

/// Sparse feature vector produced by [`TfidfVectorizer::transform`]
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector {
    dim: usize,
    /// (column, value) pairs sorted by column
    entries: Vec<(usize, f32)>,
}

impl FeatureVector {
    /// Build a vector from (column, value) pairs.
    ///
    /// Entries are sorted by column; columns outside `dim` are an error.
    pub fn from_sparse(dim: usize, mut entries: Vec<(usize, f32)>) -> Result<Self> {
        if let Some((col, _)) = entries.iter().find(|(col, _)| *col >= dim) {
            return Err(Error::vectorizer(format!(
                "column {} out of range for dimension {}",
                col, dim
            )));
        }
        entries.sort_by_key(|(col, _)| *col);
        Ok(Self { dim, entries })
    }

    /// An all-zero vector of the given width
    pub fn zeros(dim: usize) -> Self {
        Self {
            dim,
            entries: Vec::new(),
        }
    }

    /// Number of feature columns
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Number of non-zero entries
    pub fn nnz(&self) -> usize {
        self.entries.len()
    }

    /// Non-zero (column, value) pairs in column order
    pub fn entries(&self) -> &[(usize, f32)] {
        &self.entries
    }

    /// Value at `column`, zero when absent
    pub fn get(&self, column: usize) -> f32 {
        self.entries
            .binary_search_by_key(&column, |(col, _)| *col)
            .map(|idx| self.entries[idx].1)
            .unwrap_or(0.0)
    }

    /// Expand into a dense row
    pub fn to_dense(&self) -> Vec<f32> {
        let mut dense = vec![0.0; self.dim];
        for &(col, value) in &self.entries {
            dense[col] = value;
        }
        dense
    }
}

/// Fitted TF-IDF vectorizer ready to transform text
#[derive(Debug, Clone)]
pub struct TfidfVectorizer {
    vocabulary: HashMap<String, usize>,
    idf: Option<Vec<f32>>,
    lowercase: bool,
    ngram_range: (usize, usize),
    sublinear_tf: bool,
    norm: Option<Norm>,
    token_pattern: Regex,
    /// Present for [`WordChars::Letters`]
    word_mask: Option<WordMask>,
    dim: usize,
}

impl TfidfVectorizer {
    /// Load a vectorizer from a JSON artifact
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let spec: TfidfVectorizerSpec = load_json(path.as_ref())?;
        Self::from_spec(spec)
    }

    /// Validate a spec and compile its token pattern
    pub fn from_spec(spec: TfidfVectorizerSpec) -> Result<Self> {
        let (min_n, max_n) = spec.ngram_range;
        if min_n == 0 || min_n > max_n {
            return Err(Error::vectorizer(format!(
                "invalid ngram_range ({}, {})",
                min_n, max_n
            )));
        }

        let token_pattern = Regex::new(&spec.token_pattern).map_err(|e| {
            Error::vectorizer(format!("invalid token_pattern '{}': {}", spec.token_pattern, e))
        })?;
        if token_pattern.captures_len() > 2 {
            return Err(Error::vectorizer(
                "token_pattern may contain at most one capturing group",
            ));
        }

        let vocab_dim = spec
            .vocabulary
            .values()
            .copied()
            .max()
            .map(|max| max + 1)
            .unwrap_or(0);

        let dim = match &spec.idf {
            Some(idf) => {
                if idf.len() < vocab_dim {
                    return Err(Error::vectorizer(format!(
                        "idf has {} weights but vocabulary references column {}",
                        idf.len(),
                        vocab_dim - 1
                    )));
                }
                idf.len()
            }
            None => vocab_dim,
        };

        let word_mask = match spec.word_chars {
            WordChars::Letters => Some(WordMask::new()?),
            WordChars::Unicode => None,
        };

        Ok(Self {
            vocabulary: spec.vocabulary,
            idf: spec.idf,
            lowercase: spec.lowercase,
            ngram_range: spec.ngram_range,
            sublinear_tf: spec.sublinear_tf,
            norm: spec.norm,
            token_pattern,
            word_mask,
            dim,
        })
    }

    /// Width of the produced feature vectors
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Number of vocabulary entries
    pub fn vocabulary_size(&self) -> usize {
        self.vocabulary.len()
    }

    /// Transform one document into a TF-IDF feature vector
    pub fn transform(&self, text: &str) -> FeatureVector {
        let text = if self.lowercase {
            text.to_lowercase()
        } else {
            text.to_string()
        };

        let tokens = self.tokenize(&text);

        let mut counts: HashMap<usize, f32> = HashMap::new();
        for gram in self.ngrams(&tokens) {
            if let Some(&col) = self.vocabulary.get(&gram) {
                *counts.entry(col).or_insert(0.0) += 1.0;
            }
        }

        let mut entries: Vec<(usize, f32)> = counts
            .into_iter()
            .map(|(col, tf)| {
                let tf = if self.sublinear_tf { 1.0 + tf.ln() } else { tf };
                let weight = self.idf.as_ref().map(|idf| idf[col]).unwrap_or(1.0);
                (col, tf * weight)
            })
            .collect();
        entries.sort_by_key(|(col, _)| *col);

        if let Some(norm) = self.norm {
            let total = match norm {
                Norm::L1 => entries.iter().map(|(_, v)| v.abs()).sum::<f32>(),
                Norm::L2 => entries.iter().map(|(_, v)| v * v).sum::<f32>().sqrt(),
            };
            if total > 0.0 {
                for (_, value) in entries.iter_mut() {
                    *value /= total;
                }
            }
        }

        FeatureVector {
            dim: self.dim,
            entries,
        }
    }

    /// Match the token pattern and slice tokens out of the original text.
    ///
    /// The masked haystack has the same byte layout as `text`, so match
    /// ranges are valid in both.
    fn tokenize<'t>(&self, text: &'t str) -> Vec<&'t str> {
        let haystack = match &self.word_mask {
            Some(mask) => mask.apply(text),
            None => Cow::Borrowed(text),
        };

        if self.token_pattern.captures_len() == 2 {
            self.token_pattern
                .captures_iter(&haystack)
                .filter_map(|caps| caps.get(1).map(|m| &text[m.range()]))
                .collect()
        } else {
            self.token_pattern
                .find_iter(&haystack)
                .map(|m| &text[m.range()])
                .collect()
        }
    }

    fn ngrams(&self, tokens: &[&str]) -> Vec<String> {
        let (min_n, max_n) = self.ngram_range;
        let mut grams = Vec::new();
        for n in min_n..=max_n {
            if n > tokens.len() {
                break;
            }
            grams.extend(tokens.windows(n).map(|window| window.join(" ")));
        }
        grams
    }
}

/// Rewrites characters whose word-ness differs between [`WordChars::Letters`]
/// and the regex engine's `\w`.
///
/// Each such character is replaced by a stand-in of the same UTF-8 length
/// on the other side of the word/non-word split. Stand-ins are never
/// whitespace, so `\s` and `\S` are unaffected.
#[derive(Debug, Clone)]
struct WordMask {
    /// Group 1: engine word, not a letter word. Group 2: the reverse.
    diff: Regex,
}

impl WordMask {
    fn new() -> Result<Self> {
        let diff = Regex::new(r"([\w--[\p{L}\p{N}_]])|([[\p{L}\p{N}_]--\w])")
            .map_err(|e| Error::vectorizer(format!("failed to build word mask: {}", e)))?;
        Ok(Self { diff })
    }

    fn apply<'t>(&self, text: &'t str) -> Cow<'t, str> {
        self.diff.replace_all(text, |caps: &Captures| {
            let width = caps[0].len();
            if caps.get(1).is_some() {
                non_word_stand_in(width)
            } else {
                word_stand_in(width)
            }
        })
    }
}

fn non_word_stand_in(width: usize) -> &'static str {
    match width {
        1 => "-",
        2 => "\u{00B7}",
        3 => "\u{2022}",
        _ => "\u{1F600}",
    }
}

fn word_stand_in(width: usize) -> &'static str {
    match width {
        1 => "a",
        2 => "\u{00E9}",
        3 => "\u{4E00}",
        _ => "\u{10000}",
    }
}

fn default_true() -> bool {
    true
}

fn default_ngram_range() -> (usize, usize) {
    (1, 1)
}

fn default_norm() -> Option<Norm> {
    Some(Norm::L2)
}

fn default_token_pattern() -> String {
    DEFAULT_TOKEN_PATTERN.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(vocab: &[(&str, usize)]) -> TfidfVectorizerSpec {
        TfidfVectorizerSpec {
            vocabulary: vocab.iter().map(|(t, c)| (t.to_string(), *c)).collect(),
            idf: None,
            lowercase: true,
            ngram_range: (1, 1),
            sublinear_tf: false,
            norm: None,
            token_pattern: DEFAULT_TOKEN_PATTERN.to_string(),
            word_chars: WordChars::Letters,
        }
    }

    #[test]
    fn test_counts_in_vocabulary_terms() {
        let v = TfidfVectorizer::from_spec(spec(&[("match", 0), ("team", 1), ("film", 2)])).unwrap();
        let features = v.transform("Team won the match, team celebrated");

        assert_eq!(features.dim(), 3);
        assert_eq!(features.get(0), 1.0);
        assert_eq!(features.get(1), 2.0);
        assert_eq!(features.get(2), 0.0);
        assert_eq!(features.nnz(), 2);
    }

    #[test]
    fn test_single_character_tokens_are_ignored() {
        let v = TfidfVectorizer::from_spec(spec(&[("a", 0), ("ab", 1)])).unwrap();
        let features = v.transform("a ab a");
        assert_eq!(features.get(0), 0.0);
        assert_eq!(features.get(1), 1.0);
    }

    #[test]
    fn test_idf_and_l2_norm() {
        let mut s = spec(&[("cricket", 0), ("score", 1)]);
        s.idf = Some(vec![3.0, 4.0]);
        s.norm = Some(Norm::L2);
        let v = TfidfVectorizer::from_spec(s).unwrap();

        let features = v.transform("cricket score");
        assert!((features.get(0) - 0.6).abs() < 1e-6);
        assert!((features.get(1) - 0.8).abs() < 1e-6);
    }

    #[test]
    fn test_sublinear_tf() {
        let mut s = spec(&[("goal", 0)]);
        s.sublinear_tf = true;
        let v = TfidfVectorizer::from_spec(s).unwrap();

        let features = v.transform("goal goal goal");
        assert!((features.get(0) - (1.0 + 3.0_f32.ln())).abs() < 1e-6);
    }

    #[test]
    fn test_bigrams() {
        let mut s = spec(&[("stock market", 0), ("market", 1)]);
        s.ngram_range = (1, 2);
        let v = TfidfVectorizer::from_spec(s).unwrap();

        let features = v.transform("the stock market fell");
        assert_eq!(features.get(0), 1.0);
        assert_eq!(features.get(1), 1.0);
    }

    #[test]
    fn test_telugu_tokens_split_at_marks() {
        // Vocabulary as exported from a vectorizer fitted on Telugu news
        let v = TfidfVectorizer::from_spec(spec(&[("రత", 0), ("జట", 1), ("జయ", 2)])).unwrap();

        assert_eq!(v.tokenize("భారత జట్టు"), vec!["రత", "జట"]);
        assert!(v.tokenize("క్రికెట్ మ్యాచ్").is_empty());

        let features = v.transform("భారత జట్టు క్రికెట్ మ్యాచ్");
        assert_eq!(features.nnz(), 2);
        assert_eq!(features.get(0), 1.0);
        assert_eq!(features.get(1), 1.0);
        assert_eq!(features.get(2), 0.0);
    }

    #[test]
    fn test_joiners_and_numeric_symbols() {
        let v = TfidfVectorizer::from_spec(spec(&[("x²", 0), ("①ab", 1)])).unwrap();

        assert_eq!(v.tokenize("x² ①ab"), vec!["x²", "①ab"]);
        assert!(v.tokenize("a\u{200C}b").is_empty());
    }

    #[test]
    fn test_unicode_word_chars_keep_whole_words() {
        let mut s = spec(&[("జట్టు", 0), ("భారత", 1)]);
        s.word_chars = WordChars::Unicode;
        let v = TfidfVectorizer::from_spec(s).unwrap();

        assert_eq!(v.tokenize("భారత జట్టు"), vec!["భారత", "జట్టు"]);
        assert_eq!(v.transform("భారత జట్టు").nnz(), 2);
    }

    #[test]
    fn test_capture_group_with_masked_text() {
        let mut s = spec(&[("రత", 0)]);
        s.token_pattern = r"(?u)#(\w\w+)".to_string();
        let v = TfidfVectorizer::from_spec(s).unwrap();

        assert_eq!(v.tokenize("#భారత #రత"), vec!["రత"]);
    }

    #[test]
    fn test_unknown_text_yields_zero_vector() {
        let mut s = spec(&[("goal", 0)]);
        s.norm = Some(Norm::L2);
        let v = TfidfVectorizer::from_spec(s).unwrap();

        let features = v.transform("nothing relevant here");
        assert_eq!(features.nnz(), 0);
        assert_eq!(features.to_dense(), vec![0.0]);
    }

    #[test]
    fn test_rejects_short_idf() {
        let mut s = spec(&[("a1", 0), ("b2", 3)]);
        s.idf = Some(vec![1.0, 1.0]);
        assert!(TfidfVectorizer::from_spec(s).is_err());
    }

    #[test]
    fn test_rejects_invalid_ngram_range() {
        let mut s = spec(&[("goal", 0)]);
        s.ngram_range = (2, 1);
        assert!(TfidfVectorizer::from_spec(s).is_err());
    }

    #[test]
    fn test_spec_defaults_from_json() {
        let json = r#"{"vocabulary": {"goal": 0}, "idf": [2.0]}"#;
        let s: TfidfVectorizerSpec = serde_json::from_str(json).unwrap();
        assert!(s.lowercase);
        assert_eq!(s.ngram_range, (1, 1));
        assert_eq!(s.norm, Some(Norm::L2));
        assert_eq!(s.token_pattern, DEFAULT_TOKEN_PATTERN);
        assert_eq!(s.word_chars, WordChars::Letters);
    }

    #[test]
    fn test_feature_vector_from_sparse() {
        let fv = FeatureVector::from_sparse(4, vec![(3, 1.0), (1, 0.5)]).unwrap();
        assert_eq!(fv.entries(), &[(1, 0.5), (3, 1.0)]);
        assert_eq!(fv.to_dense(), vec![0.0, 0.5, 0.0, 1.0]);
        assert!(FeatureVector::from_sparse(2, vec![(2, 1.0)]).is_err());
    }
}
