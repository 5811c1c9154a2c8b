//! A single photo and the metadata resolved for it.

use crate::core::geo::GeoCoordinate;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// File-level metadata resolved by a metadata provider
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PhotoMetadata {
    /// File size in bytes
    pub file_size: u64,
    /// Image width in pixels
    pub width: Option<u32>,
    /// Image height in pixels
    pub height: Option<u32>,
    /// Camera make (e.g., "Apple", "Canon")
    pub camera_make: Option<String>,
    /// Camera model (e.g., "iPhone 15 Pro")
    pub camera_model: Option<String>,
    /// Image orientation (1-8, where 1 is normal)
    pub orientation: Option<u16>,
}

impl PhotoMetadata {
    /// Metadata carrying only a file size
    pub fn with_size(file_size: u64) -> Self {
        Self {
            file_size,
            ..Default::default()
        }
    }

    /// Get a display string for the camera
    pub fn camera_display(&self) -> Option<String> {
        match (&self.camera_make, &self.camera_model) {
            (Some(make), Some(model)) => {
                // Avoid duplication like "Apple Apple iPhone"
                if model.starts_with(make.as_str()) {
                    Some(model.clone())
                } else {
                    Some(format!("{} {}", make, model))
                }
            }
            (None, Some(model)) => Some(model.clone()),
            (Some(make), None) => Some(make.clone()),
            (None, None) => None,
        }
    }

    /// Get dimensions as a formatted string
    pub fn dimensions_display(&self) -> Option<String> {
        match (self.width, self.height) {
            (Some(w), Some(h)) => Some(format!("{}x{}", w, h)),
            _ => None,
        }
    }

    /// Calculate megapixels
    pub fn megapixels(&self) -> Option<f64> {
        match (self.width, self.height) {
            (Some(w), Some(h)) => Some((w as f64 * h as f64) / 1_000_000.0),
            _ => None,
        }
    }
}

/// One photo known to the analyzer
///
/// The path is the record's identity and never changes. Timestamp, location
/// and metadata start empty and are filled in once extraction completes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhotoRecord {
    path: PathBuf,
    /// Capture time (EXIF DateTimeOriginal)
    pub captured_at: Option<DateTime<Utc>>,
    /// GPS position in decimal degrees
    pub location: Option<GeoCoordinate>,
    /// File-level metadata, `None` until resolved
    pub metadata: Option<PhotoMetadata>,
}

impl PhotoRecord {
    /// Create a record with no resolved data
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            captured_at: None,
            location: None,
            metadata: None,
        }
    }

    pub fn with_captured_at(mut self, captured_at: DateTime<Utc>) -> Self {
        self.captured_at = Some(captured_at);
        self
    }

    pub fn with_location(mut self, location: GeoCoordinate) -> Self {
        self.location = Some(location);
        self
    }

    pub fn with_metadata(mut self, metadata: PhotoMetadata) -> Self {
        self.metadata = Some(metadata);
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// File name component of the path, if it is valid UTF-8
    pub fn file_name(&self) -> Option<&str> {
        self.path.file_name().and_then(|n| n.to_str())
    }

    /// Lowercased file extension
    pub fn extension(&self) -> Option<String> {
        self.path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
    }

    /// File size in bytes, known only once metadata is resolved
    pub fn file_size(&self) -> Option<u64> {
        self.metadata.as_ref().map(|m| m.file_size)
    }

    pub fn is_geotagged(&self) -> bool {
        self.location.is_some()
    }

    /// Calendar day of capture (UTC)
    pub fn capture_date(&self) -> Option<NaiveDate> {
        self.captured_at.map(|t| t.date_naive())
    }

    /// Both timestamp and location, the input needed for journey and clustering
    pub fn time_and_place(&self) -> Option<(DateTime<Utc>, GeoCoordinate)> {
        match (self.captured_at, self.location) {
            (Some(t), Some(l)) => Some((t, l)),
            _ => None,
        }
    }
}
