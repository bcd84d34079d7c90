use crate::constants;
use crate::error::{PipelineError, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Pipeline configuration, loaded from a TOML file. Every field has a
/// default so the pipeline runs without any config file present.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub extract: ExtractConfig,
    pub dedup: DedupConfig,
    pub owners: OwnerConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ExtractConfig {
    /// Property keys retained on each feature; everything else is dropped.
    pub properties: Vec<String>,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            properties: constants::DEFAULT_EXTRACT_PROPERTIES
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DedupConfig {
    /// Properties concatenated into the composite identity key.
    pub key_properties: Vec<String>,
}

impl Default for DedupConfig {
    fn default() -> Self {
        Self {
            key_properties: constants::DEFAULT_KEY_PROPERTIES
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OwnerConfig {
    /// Property holding the raw owner name on each feature.
    pub owner_property: String,
    /// Similarity percentage (0-100) at or above which two owner names are
    /// considered the same entity. The two historical scripts used 80 and 40;
    /// neither was documented as canonical, so this is configurable with 80
    /// as the default.
    pub similarity_threshold: f64,
    /// Also merge names where one normalized string contains the other.
    pub substring_fallback: bool,
}

impl Default for OwnerConfig {
    fn default() -> Self {
        Self {
            owner_property: constants::DEFAULT_OWNER_PROPERTY.to_string(),
            similarity_threshold: constants::DEFAULT_SIMILARITY_THRESHOLD,
            substring_fallback: true,
        }
    }
}

impl Config {
    /// Load configuration from the given TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|e| {
            PipelineError::Config(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load the explicitly requested config file, or fall back to the default
    /// path if it exists, or built-in defaults otherwise.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::load(p),
            None => {
                let default_path = Path::new(constants::DEFAULT_CONFIG_PATH);
                if default_path.exists() {
                    Self::load(default_path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    fn validate(&self) -> Result<()> {
        if !(0.0..=100.0).contains(&self.owners.similarity_threshold) {
            return Err(PipelineError::Config(format!(
                "similarity_threshold must be between 0 and 100, got {}",
                self.owners.similarity_threshold
            )));
        }
        if self.dedup.key_properties.is_empty() {
            return Err(PipelineError::Config(
                "dedup.key_properties must name at least one property".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.owners.similarity_threshold, 80.0);
        assert!(config.owners.substring_fallback);
        assert_eq!(config.dedup.key_properties, vec!["fac_id_eia", "eia_unit_id"]);
    }

    #[test]
    fn partial_toml_keeps_defaults_elsewhere() {
        let config: Config = toml::from_str(
            r#"
            [owners]
            similarity_threshold = 40.0
            substring_fallback = false
            "#,
        )
        .unwrap();

        assert_eq!(config.owners.similarity_threshold, 40.0);
        assert!(!config.owners.substring_fallback);
        assert_eq!(config.owners.owner_property, "owner");
        // Untouched sections fall back to defaults
        assert_eq!(config.dedup.key_properties.len(), 2);
        assert!(!config.extract.properties.is_empty());
    }

    #[test]
    fn out_of_range_threshold_is_rejected() {
        let config: Config = toml::from_str(
            r#"
            [owners]
            similarity_threshold = 250.0
            "#,
        )
        .unwrap();

        assert!(config.validate().is_err());
    }
}
