use crate::{Error, Result};
use serde::{de, ser};
use std::fmt::{Debug, Display};
use std::ops;

/// Torrent info hash, 20 bytes for v1 and 32 bytes for v2 torrents.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum HashId {
    V1([u8; 20]),
    V2([u8; 32]),
}

impl Default for HashId {
    fn default() -> Self {
        Self::ZERO_V1
    }
}

impl HashId {
    pub const ZERO_V1: HashId = Self::V1([0u8; 20]);
    pub const ZERO_V2: HashId = Self::V2([0u8; 32]);

    pub fn is_v1(&self) -> bool {
        matches!(self, Self::V1(_))
    }

    pub fn is_v2(&self) -> bool {
        matches!(self, Self::V2(_))
    }

    pub fn hex(&self) -> String {
        hex::encode(self)
    }

    pub fn from_hex(s: impl AsRef<str>) -> Result<Self> {
        let data = hex::decode(s.as_ref()).map_err(|err| Error::InvalidInput(err.to_string()))?;
        Self::from_slice(data.as_slice())
    }

    pub fn from_slice(slice: &[u8]) -> Result<Self> {
        if let Ok(id) = <[u8; 20]>::try_from(slice) {
            Ok(Self::V1(id))
        } else if let Ok(id) = <[u8; 32]>::try_from(slice) {
            Ok(Self::V2(id))
        } else {
            Err(Error::InvalidInput(format!(
                "info hash must be 20 or 32 bytes, got {}",
                slice.len()
            )))
        }
    }
}

impl Debug for HashId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&self, f)
    }
}

impl Display for HashId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", hex::encode(self))
    }
}

impl From<[u8; 20]> for HashId {
    fn from(value: [u8; 20]) -> Self {
        Self::V1(value)
    }
}

impl From<[u8; 32]> for HashId {
    fn from(value: [u8; 32]) -> Self {
        Self::V2(value)
    }
}

impl ops::Deref for HashId {
    type Target = [u8];
    fn deref(&self) -> &Self::Target {
        match self {
            Self::V1(v1) => v1,
            Self::V2(v2) => v2,
        }
    }
}

impl AsRef<[u8]> for HashId {
    fn as_ref(&self) -> &[u8] {
        self
    }
}

impl<'de> de::Deserialize<'de> for HashId {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        HashId::from_hex(&s).map_err(de::Error::custom)
    }
}

impl ser::Serialize for HashId {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.hex())
    }
}
