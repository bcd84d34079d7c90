//! Projection of raw features down to the dashboard property set.

use crate::config::ExtractConfig;
use geojson::{Feature, FeatureCollection, JsonObject};

/// Projects each feature's property bag down to a configured set of retained
/// keys, carrying geometry through untouched. Properties absent from a
/// feature are simply omitted.
#[derive(Debug, Clone)]
pub struct Extractor {
    properties: Vec<String>,
}

impl Extractor {
    pub fn new(config: &ExtractConfig) -> Self {
        Self {
            properties: config.properties.clone(),
        }
    }

    pub fn extract_collection(&self, collection: FeatureCollection) -> FeatureCollection {
        FeatureCollection {
            bbox: collection.bbox,
            features: collection
                .features
                .into_iter()
                .map(|f| self.project_feature(f))
                .collect(),
            foreign_members: None,
        }
    }

    fn project_feature(&self, feature: Feature) -> Feature {
        let properties = feature.properties.map(|props| {
            let mut projected = JsonObject::new();
            for key in &self.properties {
                if let Some(value) = props.get(key) {
                    projected.insert(key.clone(), value.clone());
                }
            }
            projected
        });

        Feature {
            bbox: None,
            geometry: feature.geometry,
            id: feature.id,
            properties,
            foreign_members: None,
        }
    }
}
