use super::Feature;
use crate::config::Config;
use std::collections::BTreeMap;

/// Features a host displays, each with its filter threshold.
#[derive(Debug, Clone)]
pub struct FeatureRegistry {
    thresholds: BTreeMap<Feature, f32>,
    order: Vec<Feature>,
}

impl FeatureRegistry {
    pub fn from_config(config: &Config) -> Self {
        let mut registry = Self::empty();
        for feature in config.features.iter() {
            registry.register(*feature, config.threshold(*feature));
        }
        registry
    }

    pub fn empty() -> Self {
        Self {
            thresholds: BTreeMap::new(),
            order: vec![],
        }
    }

    pub fn register(&mut self, feature: Feature, threshold: f32) {
        if self.thresholds.insert(feature, threshold).is_none() {
            self.order.push(feature);
        }
    }

    pub fn threshold(&self, feature: Feature) -> Option<f32> {
        self.thresholds.get(&feature).copied()
    }

    pub fn contains(&self, feature: Feature) -> bool {
        self.thresholds.contains_key(&feature)
    }

    /// Registered features in registration order.
    pub fn features(&self) -> &[Feature] {
        &self.order
    }
}

impl Default for FeatureRegistry {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}
