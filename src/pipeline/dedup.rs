//! First-seen-wins deduplication of features by composite identity key.

use crate::config::DedupConfig;
use geojson::Feature;
use serde_json::Value;
use std::collections::HashSet;
use tracing::{debug, warn};

/// Result of a dedup pass: retained features in input order plus the number
/// of duplicates dropped.
#[derive(Debug)]
pub struct DedupOutcome {
    pub features: Vec<Feature>,
    pub dropped: usize,
}

/// Collapses features sharing a composite key to the first-seen feature.
/// Later duplicates are dropped, counted, and logged at debug level.
#[derive(Debug, Clone)]
pub struct Deduplicator {
    key_properties: Vec<String>,
}

impl Deduplicator {
    pub fn new(config: &DedupConfig) -> Self {
        Self {
            key_properties: config.key_properties.clone(),
        }
    }

    pub fn dedup(&self, features: Vec<Feature>) -> DedupOutcome {
        let mut seen: HashSet<String> = HashSet::new();
        let mut retained = Vec::with_capacity(features.len());
        let mut dropped = 0;

        for feature in features {
            match self.composite_key(&feature) {
                Some(key) => {
                    if seen.insert(key.clone()) {
                        retained.push(feature);
                    } else {
                        dropped += 1;
                        debug!("Dropping duplicate feature for key '{}'", key);
                    }
                }
                None => {
                    // A feature missing a key property has no usable identity;
                    // keep it rather than collapsing all such features together.
                    warn!(
                        "Feature missing dedup key properties {:?}; retained without dedup",
                        self.key_properties
                    );
                    retained.push(feature);
                }
            }
        }

        DedupOutcome {
            features: retained,
            dropped,
        }
    }

    /// Composite key: the configured property values joined in order. None
    /// when any key property is absent.
    fn composite_key(&self, feature: &Feature) -> Option<String> {
        let props = feature.properties.as_ref()?;
        let mut parts = Vec::with_capacity(self.key_properties.len());
        for key in &self.key_properties {
            let value = props.get(key)?;
            parts.push(key_part(value));
        }
        Some(parts.join("|"))
    }
}

fn key_part(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
