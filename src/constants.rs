/// Property name constants and dataset defaults shared across the pipeline.

/// Property stamped onto each feature by the owner-normalization stage.
pub const NORMALIZED_OWNER_PROPERTY: &str = "normalized_owner";

/// Property holding the raw facility-owner name.
pub const DEFAULT_OWNER_PROPERTY: &str = "owner";

/// Properties forming the composite dedup key, in concatenation order.
pub const DEFAULT_KEY_PROPERTIES: [&str; 2] = ["fac_id_eia", "eia_unit_id"];

/// Property set retained by the extract stage for the dashboard datasets.
pub const DEFAULT_EXTRACT_PROPERTIES: [&str; 10] = [
    "fac_id_eia",
    "eia_unit_id",
    "plant_name",
    "owner",
    "technology",
    "capacity_mw",
    "lcoe_existing",
    "lcoe_replacement",
    "crossover_year_solar",
    "crossover_year_wind",
];

/// Similarity threshold (percent) above which two owner names join a cluster.
/// The historical scripts disagreed on this value (80 vs 40); 80 is the
/// documented default and the knob lives in [`crate::config::OwnerConfig`].
pub const DEFAULT_SIMILARITY_THRESHOLD: f64 = 80.0;

/// Config file consulted when no --config flag is given.
pub const DEFAULT_CONFIG_PATH: &str = "datapipe.toml";
