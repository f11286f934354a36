use std::{fmt, str::FromStr};

use num::{FromPrimitive, ToPrimitive};
use serde::{Deserialize, Serialize, Serializer};

use crate::Error;

/// Category a detected keyword was extracted from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Feature {
    SearchSource = 0,
    FileExtension,
    FileName,
}

impl Feature {
    pub const ALL: [Feature; 3] = [Self::SearchSource, Self::FileExtension, Self::FileName];

    /// Minimum normalized rate a keyword needs to be suggested.
    pub fn default_threshold(&self) -> f32 {
        match self {
            Self::SearchSource => 0.015,
            Self::FileExtension => 0.0,
            Self::FileName => 0.01,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::SearchSource => "search_source",
            Self::FileExtension => "file_extension",
            Self::FileName => "file_name",
        }
    }
}

impl FromPrimitive for Feature {
    fn from_i64(num: i64) -> Option<Self> {
        if num < 0 {
            return None;
        }
        Self::from_u64(num as u64)
    }

    fn from_u64(num: u64) -> Option<Self> {
        let f = match num {
            0 => Self::SearchSource,
            1 => Self::FileExtension,
            2 => Self::FileName,
            _ => return None,
        };
        Some(f)
    }
}

impl ToPrimitive for Feature {
    fn to_i64(&self) -> Option<i64> {
        Some(*self as i64)
    }

    fn to_u64(&self) -> Option<u64> {
        Some(*self as u64)
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Feature {
    type Err = Error;
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "search_source" => Ok(Self::SearchSource),
            "file_extension" => Ok(Self::FileExtension),
            "file_name" => Ok(Self::FileName),
            _ => Err(Error::UnknownFeature(s.to_string())),
        }
    }
}

impl Serialize for Feature {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for Feature {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::from_str(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_round_trip() {
        for f in Feature::ALL {
            assert_eq!(f.name().parse::<Feature>().unwrap(), f);
            assert_eq!(Feature::from_u64(f.to_u64().unwrap()), Some(f));
        }
        assert!("movie".parse::<Feature>().is_err());
        assert_eq!(Feature::from_i64(-1), None);
    }

    #[test]
    fn test_serde() {
        let json = serde_json::to_string(&Feature::FileExtension).unwrap();
        assert_eq!(json, r#""file_extension""#);
        let f: Feature = serde_json::from_str(r#""search_source""#).unwrap();
        assert_eq!(f, Feature::SearchSource);
    }
}
