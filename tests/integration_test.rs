use anyhow::Result;
use serde_json::json;
use tempfile::tempdir;

use wattcanvas_datapipe::config::Config;
use wattcanvas_datapipe::geojson_io;
use wattcanvas_datapipe::pipeline::Pipeline;

fn feature(fac_id: &str, unit_id: &str, owner: &str, extra: &str) -> serde_json::Value {
    json!({
        "type": "Feature",
        "geometry": { "type": "Point", "coordinates": [-80.96, 35.59] },
        "properties": {
            "fac_id_eia": fac_id,
            "eia_unit_id": unit_id,
            "owner": owner,
            "plant_name": "Marshall Steam Station",
            "capacity_mw": 660.0,
            "scraper_batch_id": extra
        }
    })
}

fn test_collection() -> serde_json::Value {
    json!({
        "type": "FeatureCollection",
        "features": [
            feature("1", "A", "Duke Energy Corp", "batch-1"),
            feature("1", "A", "Duke Energy Corp", "batch-2"),
            feature("1", "B", "Duke Energy Corporation", "batch-1"),
            feature("2", "A", "NextEra Energy", "batch-1"),
        ]
    })
}

#[test]
fn full_pipeline_extracts_dedups_and_stamps_owners() -> Result<()> {
    let temp_dir = tempdir()?;
    let input = temp_dir.path().join("raw.geojson");
    let output = temp_dir.path().join("prepared.geojson");
    std::fs::write(&input, serde_json::to_string(&test_collection())?)?;

    let result = Pipeline::new(Config::default()).run(&input, &output)?;

    assert_eq!(result.features_read, 4);
    assert_eq!(result.duplicates_dropped, 1);
    assert_eq!(result.features_written, 3);
    // Duke Energy Corp + Duke Energy Corporation merge; NextEra stays apart
    assert_eq!(result.distinct_owner_names, 3);
    assert_eq!(result.owner_clusters, 2);

    let prepared = geojson_io::read_feature_collection(&output)?;
    assert_eq!(prepared.features.len(), 3);

    for f in &prepared.features {
        let props = f.properties.as_ref().unwrap();
        // Extract drops columns outside the dashboard set
        assert!(!props.contains_key("scraper_batch_id"));
        // Geometry survives the whole pipeline
        assert!(f.geometry.is_some());
    }

    let owners: Vec<_> = prepared
        .features
        .iter()
        .map(|f| f.properties.as_ref().unwrap()["normalized_owner"].clone())
        .collect();
    assert_eq!(
        owners,
        vec![
            json!("Duke Energy Corp"),
            json!("Duke Energy Corp"),
            json!("NextEra Energy"),
        ]
    );

    Ok(())
}

#[test]
fn stage_commands_compose_to_the_same_result() -> Result<()> {
    let temp_dir = tempdir()?;
    let raw = temp_dir.path().join("raw.geojson");
    let extracted = temp_dir.path().join("extracted.geojson");
    let deduped = temp_dir.path().join("deduped.geojson");
    let prepared = temp_dir.path().join("prepared.geojson");
    std::fs::write(&raw, serde_json::to_string(&test_collection())?)?;

    let pipeline = Pipeline::new(Config::default());

    let extracted_count = pipeline.run_extract(&raw, &extracted)?;
    assert_eq!(extracted_count, 4);

    let (retained, dropped) = pipeline.run_dedup(&extracted, &deduped)?;
    assert_eq!(retained, 3);
    assert_eq!(dropped, 1);

    let stats = pipeline.run_normalize_owners(&deduped, &prepared)?;
    assert_eq!(stats.clusters, 2);
    assert_eq!(stats.stamped, 3);

    let staged = geojson_io::read_feature_collection(&prepared)?;
    assert_eq!(staged.features.len(), 3);
    assert_eq!(
        staged.features[1].properties.as_ref().unwrap()["normalized_owner"],
        json!("Duke Energy Corp")
    );

    Ok(())
}

#[test]
fn threshold_40_without_fallback_still_merges_suffix_variants() -> Result<()> {
    let temp_dir = tempdir()?;
    let input = temp_dir.path().join("raw.geojson");
    let output = temp_dir.path().join("prepared.geojson");
    std::fs::write(&input, serde_json::to_string(&test_collection())?)?;

    let mut config = Config::default();
    config.owners.similarity_threshold = 40.0;
    config.owners.substring_fallback = false;

    let result = Pipeline::new(config).run(&input, &output)?;

    // At 40, the ~69.6% Duke pair merges on similarity alone
    assert_eq!(result.owner_clusters, 2);

    Ok(())
}

#[test]
fn parse_failure_aborts_without_partial_output() -> Result<()> {
    let temp_dir = tempdir()?;
    let input = temp_dir.path().join("broken.geojson");
    let output = temp_dir.path().join("prepared.geojson");
    std::fs::write(&input, "{ this is not json")?;

    let result = Pipeline::new(Config::default()).run(&input, &output);

    assert!(result.is_err());
    assert!(!output.exists());

    Ok(())
}
