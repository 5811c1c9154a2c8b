//! # Reporter Module
//!
//! Turns an analysis report into files other tools can read.
//!
//! ## Formats
//! - **GeoJSON**: photo markers in route order plus the journey line
//! - **CSV**: one row per cluster member

mod export;

pub use export::{
    export_clusters_csv, export_geojson, export_to_file, geojson_value, ExportFormat,
};
