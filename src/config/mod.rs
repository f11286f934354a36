use crate::keyword::Feature;
use crate::{Error, Result};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    pub log_filter: String,
    pub thresholds: BTreeMap<Feature, f32>,
    pub features: Vec<Feature>,
    pub announce: AnnounceConfig,
}

impl Config {
    pub fn load_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let value = content.parse::<serde_json::Value>()?;

        let mut config = Self::default();
        config.merge_json(&value)?;
        Ok(config)
    }

    fn merge_json(&mut self, val: &serde_json::Value) -> Result<()> {
        let table = as_object(val, "config")?;
        if let Some(val) = table.get("log_filter") {
            self.log_filter = as_str(val, "log_filter")?.to_string();
        }
        if let Some(val) = table.get("thresholds") {
            for (name, val) in as_object(val, "thresholds")? {
                let feature: Feature = name.parse()?;
                let threshold = val
                    .as_f64()
                    .ok_or_else(|| Error::Config(format!("thresholds.{name} must be a number")))?
                    as f32;
                if !(0.0..=1.0).contains(&threshold) {
                    return Err(Error::Config(format!(
                        "thresholds.{name} must be in [0, 1], got {threshold}"
                    )));
                }
                self.thresholds.insert(feature, threshold);
            }
        }
        if let Some(val) = table.get("features") {
            let list = val
                .as_array()
                .ok_or_else(|| Error::Config("features must be an array".to_string()))?;
            self.features = list
                .iter()
                .map(|v| as_str(v, "features[]")?.parse::<Feature>())
                .collect::<Result<Vec<Feature>>>()?;
        }
        if let Some(val) = table.get("announce") {
            self.announce.merge_json(val)?;
        }
        Ok(())
    }

    pub fn threshold(&self, feature: Feature) -> f32 {
        self.thresholds
            .get(&feature)
            .copied()
            .unwrap_or_else(|| feature.default_threshold())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_filter: "snailfilter=info".to_string(),
            thresholds: Feature::ALL
                .iter()
                .map(|f| (*f, f.default_threshold()))
                .collect(),
            features: Feature::ALL.to_vec(),
            announce: AnnounceConfig::default(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AnnounceConfig {
    pub check_interval: Duration,
    pub max_attempts: Option<u32>,
}

impl AnnounceConfig {
    fn merge_json(&mut self, val: &serde_json::Value) -> Result<()> {
        let table = as_object(val, "announce")?;
        if let Some(val) = table.get("check_interval_secs") {
            let secs = as_u64(val, "announce.check_interval_secs")?;
            if secs == 0 {
                return Err(Error::Config(
                    "announce.check_interval_secs must be positive".to_string(),
                ));
            }
            self.check_interval = Duration::from_secs(secs);
        }
        if let Some(val) = table.get("max_attempts") {
            self.max_attempts = if val.is_null() {
                None
            } else {
                let attempts = as_u64(val, "announce.max_attempts")?;
                Some(u32::try_from(attempts).map_err(|_| {
                    Error::Config(format!(
                        "announce.max_attempts must fit in u32, got {attempts}"
                    ))
                })?)
            };
        }
        Ok(())
    }
}

impl Default for AnnounceConfig {
    fn default() -> Self {
        Self {
            check_interval: Duration::from_secs(30),
            max_attempts: None,
        }
    }
}

fn as_object<'a>(
    val: &'a serde_json::Value,
    key: &str,
) -> Result<&'a serde_json::Map<String, serde_json::Value>> {
    val.as_object()
        .ok_or_else(|| Error::Config(format!("{key} must be an object")))
}

fn as_str<'a>(val: &'a serde_json::Value, key: &str) -> Result<&'a str> {
    val.as_str()
        .ok_or_else(|| Error::Config(format!("{key} must be a string")))
}

fn as_u64(val: &serde_json::Value, key: &str) -> Result<u64> {
    val.as_u64()
        .ok_or_else(|| Error::Config(format!("{key} must be a positive integer")))
}
