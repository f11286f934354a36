use std::{
    fmt,
    hash::{Hash, Hasher},
    str::FromStr,
};

use serde::Serialize;

use super::Feature;
use crate::{Error, Result};

/// A keyword applied to search results, either required (inclusive) or
/// rejected (exclusive).
///
/// Two filters are equal when keyword and feature match. The inclusion flag is
/// not part of the identity, so toggling a filter does not change which
/// pipeline entry it refers to.
#[derive(Debug, Clone, Serialize)]
pub struct KeywordFilter {
    keyword: String,
    feature: Option<Feature>,
    inclusive: bool,
}

impl KeywordFilter {
    /// Builds a filter from raw text. Returns `None` when nothing is left
    /// after trimming.
    pub fn new(keyword: &str, feature: Option<Feature>, inclusive: bool) -> Option<Self> {
        let keyword = normalize(keyword);
        if keyword.is_empty() {
            return None;
        }
        Some(Self {
            keyword,
            feature,
            inclusive,
        })
    }

    /// Keyword typed by the user: inclusive and not tied to any feature.
    pub fn from_user_input(text: &str) -> Option<Self> {
        Self::new(text, None, true)
    }

    pub fn keyword(&self) -> &str {
        &self.keyword
    }

    pub fn feature(&self) -> Option<Feature> {
        self.feature
    }

    pub fn is_inclusive(&self) -> bool {
        self.inclusive
    }

    pub fn toggle_inclusion(&self) -> Self {
        Self {
            inclusive: !self.inclusive,
            ..self.clone()
        }
    }

    /// Parses a comma separated list such as `"+ubuntu,-server"`. Empty
    /// items are skipped.
    pub fn parse_list(list: &str) -> Result<Vec<Self>> {
        list.split(',')
            .filter(|s| !s.trim().is_empty())
            .map(str::parse)
            .collect()
    }

    pub fn accept(&self, text: &str) -> bool {
        let found = text.to_lowercase().contains(&self.keyword);
        found == self.inclusive
    }
}

fn normalize(s: &str) -> String {
    s.trim().to_lowercase()
}

impl PartialEq for KeywordFilter {
    fn eq(&self, other: &Self) -> bool {
        self.keyword == other.keyword && self.feature == other.feature
    }
}

impl Eq for KeywordFilter {}

impl Hash for KeywordFilter {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.keyword.hash(state);
        self.feature.hash(state);
    }
}

impl fmt::Display for KeywordFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.inclusive { '+' } else { '-' };
        write!(f, "{}{}", sign, self.keyword)
    }
}

/// Parses `+keyword`, `-keyword` or a bare `keyword` (inclusive).
impl FromStr for KeywordFilter {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let (inclusive, rest) = match s.strip_prefix('-') {
            Some(rest) => (false, rest),
            None => (true, s.strip_prefix('+').unwrap_or(s)),
        };
        Self::new(rest, None, inclusive)
            .ok_or_else(|| Error::InvalidInput(format!("empty keyword filter: {s:?}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_input() {
        let f = KeywordFilter::from_user_input("  Ubuntu ISO ").unwrap();
        assert_eq!(f.keyword(), "ubuntu iso");
        assert!(f.is_inclusive());
        assert_eq!(f.feature(), None);

        assert!(KeywordFilter::from_user_input("").is_none());
        assert!(KeywordFilter::from_user_input(" \t ").is_none());
    }

    #[test]
    fn test_eq_ignores_inclusion() {
        let f = KeywordFilter::new("mp4", Some(Feature::FileExtension), true).unwrap();
        let toggled = f.toggle_inclusion();
        assert!(!toggled.is_inclusive());
        assert_eq!(f, toggled);

        let other = KeywordFilter::new("mp4", Some(Feature::FileName), true).unwrap();
        assert_ne!(f, other);
    }

    #[test]
    fn test_accept() {
        let inc = KeywordFilter::from_user_input("ubuntu").unwrap();
        assert!(inc.accept("Ubuntu 22.04 Desktop"));
        assert!(!inc.accept("debian netinst"));

        let exc = inc.toggle_inclusion();
        assert!(!exc.accept("Ubuntu 22.04 Desktop"));
        assert!(exc.accept("debian netinst"));
    }

    #[test]
    fn test_parse_display() {
        let f: KeywordFilter = "-Sample".parse().unwrap();
        assert!(!f.is_inclusive());
        assert_eq!(f.to_string(), "-sample");

        let f: KeywordFilter = "+movie".parse().unwrap();
        assert_eq!(f.to_string(), "+movie");
        let f: KeywordFilter = "movie".parse().unwrap();
        assert!(f.is_inclusive());

        assert!("-".parse::<KeywordFilter>().is_err());
        assert!("  ".parse::<KeywordFilter>().is_err());
    }

    #[test]
    fn test_parse_list() {
        let list = KeywordFilter::parse_list("+a,, -B ,c,").unwrap();
        let shown: Vec<String> = list.iter().map(|f| f.to_string()).collect();
        assert_eq!(shown, vec!["+a", "-b", "+c"]);
        assert!(list.iter().all(|f| f.feature().is_none()));

        assert!(KeywordFilter::parse_list("").unwrap().is_empty());
        assert!(KeywordFilter::parse_list(" , ").unwrap().is_empty());
        assert!(matches!(
            KeywordFilter::parse_list("+a,-"),
            Err(Error::InvalidInput(_))
        ));
    }
}
