pub mod config;
pub mod constants;
pub mod error;
pub mod geojson_io;
pub mod logging;
pub mod pipeline;
