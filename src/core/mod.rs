//! # Core Module
//!
//! The UI-agnostic geo photo engine.
//!
//! ## Modules
//! - `geo` - Coordinates, distances and bounding boxes
//! - `photo` - Photo records and the collection they live in
//! - `scanner` - Discovers photos in directories
//! - `metadata` - Extracts capture time and GPS from EXIF
//! - `analysis` - Duplicates, journey, clusters, route and statistics
//! - `pipeline` - Orchestrates the full workflow
//! - `reporter` - GeoJSON and CSV export

pub mod analysis;
pub mod geo;
pub mod metadata;
pub mod photo;
pub mod pipeline;
pub mod reporter;
pub mod scanner;

// Re-export commonly used types
pub use analysis::{AnalysisConfig, AnalysisEngine, AnalysisReport};
pub use geo::{BoundingBox, GeoCoordinate};
pub use photo::{PhotoRecord, PhotoSet};
