//! Static news category table

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// A news category the service can assign
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Business,
    Editorial,
    Entertainment,
    Nation,
    Sports,
}

/// Every category, in label encoder (alphabetical code) order
pub const CATEGORIES: [Category; 5] = [
    Category::Business,
    Category::Editorial,
    Category::Entertainment,
    Category::Nation,
    Category::Sports,
];

impl Category {
    /// Internal code used by the label encoder
    pub fn code(&self) -> &'static str {
        match self {
            Self::Business => "business",
            Self::Editorial => "editorial",
            Self::Entertainment => "entertainment",
            Self::Nation => "nation",
            Self::Sports => "sports",
        }
    }

    /// English display name
    pub fn english(&self) -> &'static str {
        match self {
            Self::Business => "Business",
            Self::Editorial => "Editorial",
            Self::Entertainment => "Entertainment",
            Self::Nation => "Nation",
            Self::Sports => "Sports",
        }
    }

    /// Telugu display name
    pub fn telugu(&self) -> &'static str {
        match self {
            Self::Business => "వ్యాపారం",
            Self::Editorial => "సంపాదకీయం",
            Self::Entertainment => "వినోదం",
            Self::Nation => "జాతీయం",
            Self::Sports => "క్రీడలు",
        }
    }

    /// Look up a category by its internal code
    pub fn from_code(code: &str) -> Option<Self> {
        CATEGORIES.iter().copied().find(|c| c.code() == code)
    }

    /// Display pair for this category
    pub fn info(&self) -> CategoryInfo {
        CategoryInfo {
            telugu: self.telugu().to_string(),
            english: self.english().to_string(),
        }
    }

    /// The full code → display name table
    pub fn table() -> BTreeMap<&'static str, CategoryInfo> {
        CATEGORIES.iter().map(|c| (c.code(), c.info())).collect()
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_code(s).ok_or_else(|| format!("unknown category: {}", s))
    }
}

/// English and Telugu display names for a category code
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryInfo {
    pub telugu: String,
    pub english: String,
}

impl CategoryInfo {
    /// Resolve display names for a code.
    ///
    /// Unknown codes display as themselves in both scripts.
    pub fn for_code(code: &str) -> Self {
        match Category::from_code(code) {
            Some(category) => category.info(),
            None => Self {
                telugu: code.to_string(),
                english: code.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_round_trip() {
        for category in CATEGORIES {
            assert_eq!(Category::from_code(category.code()), Some(category));
            assert_eq!(category.code().parse::<Category>().unwrap(), category);
        }
        assert!(Category::from_code("weather").is_none());
    }

    #[test]
    fn test_table_is_sorted_by_code() {
        let table = Category::table();
        let codes: Vec<_> = table.keys().copied().collect();
        assert_eq!(
            codes,
            vec!["business", "editorial", "entertainment", "nation", "sports"]
        );
        assert_eq!(table["sports"].telugu, "క్రీడలు");
        assert_eq!(table["nation"].english, "Nation");
    }

    #[test]
    fn test_unknown_code_displays_raw() {
        let info = CategoryInfo::for_code("weather");
        assert_eq!(info.english, "weather");
        assert_eq!(info.telugu, "weather");

        let info = CategoryInfo::for_code("editorial");
        assert_eq!(info.english, "Editorial");
        assert_eq!(info.telugu, "సంపాదకీయం");
    }

    #[test]
    fn test_serializes_lowercase() {
        let json = serde_json::to_string(&Category::Entertainment).unwrap();
        assert_eq!(json, "\"entertainment\"");
    }
}
