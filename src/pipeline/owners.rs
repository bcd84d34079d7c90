//! Owner-name normalization stage: clusters near-duplicate owner strings and
//! stamps each feature with its canonical `normalized_owner`.

use crate::config::OwnerConfig;
use crate::constants;
use crate::pipeline::cluster::OwnerClusterer;
use crate::pipeline::text::normalize_owner;
use geojson::FeatureCollection;
use serde_json::Value;
use tracing::{debug, info};

/// Summary of one owner-normalization pass.
#[derive(Debug)]
pub struct OwnerStats {
    /// Distinct normalized owner names observed.
    pub distinct_names: usize,
    /// Clusters those names collapsed into.
    pub clusters: usize,
    /// Features stamped with a `normalized_owner` property.
    pub stamped: usize,
}

pub struct OwnerNormalizer {
    config: OwnerConfig,
    clusterer: OwnerClusterer,
}

impl OwnerNormalizer {
    pub fn new(config: OwnerConfig) -> Self {
        let clusterer = OwnerClusterer::new(&config);
        Self { config, clusterer }
    }

    /// Cluster every owner name in the collection (input order), then stamp
    /// each feature with the canonical representative for its owner.
    /// Features without a string-valued owner property are left unstamped.
    pub fn normalize_collection(&self, collection: &mut FeatureCollection) -> OwnerStats {
        let owner_key = &self.config.owner_property;

        // One pass to gather names in input order; the cluster map is built
        // once per run and passed along by value, never cached globally.
        let names: Vec<String> = collection
            .features
            .iter()
            .filter_map(|f| f.properties.as_ref())
            .filter_map(|props| props.get(owner_key))
            .filter_map(|v| v.as_str().map(|s| s.to_string()))
            .collect();

        let clusters = self.clusterer.cluster(names.iter().map(|s| s.as_str()));
        let canonical = OwnerClusterer::canonical_map(&clusters);
        info!(
            "Clustered {} owner names into {} canonical groups",
            canonical.len(),
            clusters.len()
        );

        let mut stamped = 0;
        for feature in &mut collection.features {
            let Some(props) = feature.properties.as_mut() else {
                continue;
            };
            let Some(raw) = props.get(owner_key).and_then(|v| v.as_str()) else {
                debug!("Feature has no string '{}' property; not stamped", owner_key);
                continue;
            };

            let normalized = normalize_owner(raw);
            let representative = canonical.get(&normalized).cloned().unwrap_or(normalized);
            props.insert(
                constants::NORMALIZED_OWNER_PROPERTY.to_string(),
                Value::String(representative),
            );
            stamped += 1;
        }

        OwnerStats {
            distinct_names: canonical.len(),
            clusters: clusters.len(),
            stamped,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geojson::{Feature, JsonObject};
    use serde_json::json;

    fn owned_feature(owner: Option<serde_json::Value>) -> Feature {
        let mut properties = JsonObject::new();
        if let Some(owner) = owner {
            properties.insert("owner".to_string(), owner);
        }
        Feature {
            bbox: None,
            geometry: None,
            id: None,
            properties: Some(properties),
            foreign_members: None,
        }
    }

    fn collection(features: Vec<Feature>) -> FeatureCollection {
        FeatureCollection {
            bbox: None,
            features,
            foreign_members: None,
        }
    }

    #[test]
    fn stamps_canonical_representative_on_each_feature() {
        let mut fc = collection(vec![
            owned_feature(Some(json!("Duke Energy Corp"))),
            owned_feature(Some(json!("Duke Energy Corporation"))),
            owned_feature(Some(json!("NextEra Energy"))),
        ]);

        let stats = OwnerNormalizer::new(OwnerConfig::default()).normalize_collection(&mut fc);

        assert_eq!(stats.clusters, 2);
        assert_eq!(stats.distinct_names, 3);
        assert_eq!(stats.stamped, 3);

        let stamped: Vec<_> = fc
            .features
            .iter()
            .map(|f| f.properties.as_ref().unwrap()["normalized_owner"].clone())
            .collect();
        assert_eq!(
            stamped,
            vec![
                json!("Duke Energy Corp"),
                json!("Duke Energy Corp"),
                json!("NextEra Energy"),
            ]
        );
    }

    #[test]
    fn features_without_owner_are_left_unstamped() {
        let mut fc = collection(vec![
            owned_feature(None),
            owned_feature(Some(json!(42))),
            owned_feature(Some(json!("Dominion Energy"))),
        ]);

        let stats = OwnerNormalizer::new(OwnerConfig::default()).normalize_collection(&mut fc);

        assert_eq!(stats.stamped, 1);
        assert!(!fc.features[0]
            .properties
            .as_ref()
            .unwrap()
            .contains_key("normalized_owner"));
        assert!(!fc.features[1]
            .properties
            .as_ref()
            .unwrap()
            .contains_key("normalized_owner"));
    }

    #[test]
    fn diacritic_owner_is_stamped_with_stripped_form() {
        let mut fc = collection(vec![owned_feature(Some(json!("Électricité de France")))]);

        OwnerNormalizer::new(OwnerConfig::default()).normalize_collection(&mut fc);

        let props = fc.features[0].properties.as_ref().unwrap();
        assert_eq!(props["normalized_owner"], json!("Electricite de France"));
    }

    #[test]
    fn empty_owner_is_stamped_with_empty_string() {
        let mut fc = collection(vec![owned_feature(Some(json!("   ")))]);

        let stats = OwnerNormalizer::new(OwnerConfig::default()).normalize_collection(&mut fc);

        // Empty names never enter a cluster, but the stamp still records the
        // normalized (empty) form.
        assert_eq!(stats.clusters, 0);
        assert_eq!(stats.stamped, 1);
        let props = fc.features[0].properties.as_ref().unwrap();
        assert_eq!(props["normalized_owner"], json!(""));
    }
}
