use crate::error::Result;
use geojson::{FeatureCollection, GeoJson};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;
use tracing::debug;

/// Read a GeoJSON FeatureCollection from disk.
///
/// The whole file is read into memory; a parse failure aborts the run with
/// no partial state.
pub fn read_feature_collection(path: &Path) -> Result<FeatureCollection> {
    let file = File::open(path)?;
    let mut reader = BufReader::new(file);
    let mut contents = String::new();
    reader.read_to_string(&mut contents)?;

    let geojson: GeoJson = contents.parse()?;
    let collection = FeatureCollection::try_from(geojson)?;

    debug!(
        "Read {} features from {}",
        collection.features.len(),
        path.display()
    );
    Ok(collection)
}

/// Write a FeatureCollection as pretty-printed GeoJSON, creating parent
/// directories as needed.
pub fn write_feature_collection(path: &Path, collection: &FeatureCollection) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, collection)?;
    writer.flush()?;

    debug!(
        "Wrote {} features to {}",
        collection.features.len(),
        path.display()
    );
    Ok(())
}
