//! Batch pipeline stages and the sequential runner that chains them:
//! extract -> dedup -> normalize owners, file in, file out.

pub mod cluster;
pub mod dedup;
pub mod extract;
pub mod owners;
pub mod text;

use crate::config::Config;
use crate::error::Result;
use crate::geojson_io;
use crate::pipeline::dedup::Deduplicator;
use crate::pipeline::extract::Extractor;
use crate::pipeline::owners::OwnerNormalizer;
use chrono::{DateTime, Utc};
use metrics::{counter, histogram};
use serde::Serialize;
use std::path::Path;
use tracing::{info, instrument};

/// Result of a complete pipeline run.
#[derive(Debug, Serialize)]
pub struct PipelineResult {
    pub input_file: String,
    pub output_file: String,
    pub features_read: usize,
    pub features_written: usize,
    pub duplicates_dropped: usize,
    pub distinct_owner_names: usize,
    pub owner_clusters: usize,
    pub finished_at: DateTime<Utc>,
}

pub struct Pipeline {
    config: Config,
}

impl Pipeline {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Run all three stages sequentially over one input file.
    #[instrument(skip(self, input, output), fields(input = %input.display()))]
    pub fn run(&self, input: &Path, output: &Path) -> Result<PipelineResult> {
        info!("Starting pipeline run");
        counter!("datapipe_runs_total").increment(1);
        let t_pipeline = std::time::Instant::now();

        let collection = geojson_io::read_feature_collection(input)?;
        let features_read = collection.features.len();
        counter!("datapipe_features_read_total").increment(features_read as u64);
        info!("Read {} features", features_read);

        let t_extract = std::time::Instant::now();
        let collection = Extractor::new(&self.config.extract).extract_collection(collection);
        histogram!("datapipe_stage_duration_seconds", "stage" => "extract")
            .record(t_extract.elapsed().as_secs_f64());

        let t_dedup = std::time::Instant::now();
        let outcome = Deduplicator::new(&self.config.dedup).dedup(collection.features);
        histogram!("datapipe_stage_duration_seconds", "stage" => "dedup")
            .record(t_dedup.elapsed().as_secs_f64());
        counter!("datapipe_duplicates_dropped_total").increment(outcome.dropped as u64);
        info!(
            "Deduplicated to {} features ({} duplicates dropped)",
            outcome.features.len(),
            outcome.dropped
        );

        let mut collection = geojson::FeatureCollection {
            bbox: collection.bbox,
            features: outcome.features,
            foreign_members: None,
        };

        let t_owners = std::time::Instant::now();
        let stats = OwnerNormalizer::new(self.config.owners.clone())
            .normalize_collection(&mut collection);
        histogram!("datapipe_stage_duration_seconds", "stage" => "normalize_owners")
            .record(t_owners.elapsed().as_secs_f64());
        info!(
            "Normalized owners: {} distinct names, {} clusters, {} features stamped",
            stats.distinct_names, stats.clusters, stats.stamped
        );

        geojson_io::write_feature_collection(output, &collection)?;
        histogram!("datapipe_duration_seconds").record(t_pipeline.elapsed().as_secs_f64());
        info!("Pipeline run finished; wrote {}", output.display());

        Ok(PipelineResult {
            input_file: input.display().to_string(),
            output_file: output.display().to_string(),
            features_read,
            features_written: collection.features.len(),
            duplicates_dropped: outcome.dropped,
            distinct_owner_names: stats.distinct_names,
            owner_clusters: stats.clusters,
            finished_at: Utc::now(),
        })
    }

    /// Run only the extract stage, file to file.
    #[instrument(skip(self, input, output), fields(input = %input.display()))]
    pub fn run_extract(&self, input: &Path, output: &Path) -> Result<usize> {
        let collection = geojson_io::read_feature_collection(input)?;
        let collection = Extractor::new(&self.config.extract).extract_collection(collection);
        geojson_io::write_feature_collection(output, &collection)?;
        Ok(collection.features.len())
    }

    /// Run only the dedup stage, file to file. Returns (retained, dropped).
    #[instrument(skip(self, input, output), fields(input = %input.display()))]
    pub fn run_dedup(&self, input: &Path, output: &Path) -> Result<(usize, usize)> {
        let collection = geojson_io::read_feature_collection(input)?;
        let bbox = collection.bbox.clone();
        let outcome = Deduplicator::new(&self.config.dedup).dedup(collection.features);
        counter!("datapipe_duplicates_dropped_total").increment(outcome.dropped as u64);

        let collection = geojson::FeatureCollection {
            bbox,
            features: outcome.features,
            foreign_members: None,
        };
        geojson_io::write_feature_collection(output, &collection)?;
        Ok((collection.features.len(), outcome.dropped))
    }

    /// Run only the owner-normalization stage, file to file.
    #[instrument(skip(self, input, output), fields(input = %input.display()))]
    pub fn run_normalize_owners(
        &self,
        input: &Path,
        output: &Path,
    ) -> Result<owners::OwnerStats> {
        let mut collection = geojson_io::read_feature_collection(input)?;
        let stats =
            OwnerNormalizer::new(self.config.owners.clone()).normalize_collection(&mut collection);
        geojson_io::write_feature_collection(output, &collection)?;
        Ok(stats)
    }
}
