//! # Error Module
//!
//! Error types for the geo photo analyzer.
//!
//! ## Design Principles
//! - **Never panic** on user data - return errors instead
//! - **Include context** - paths, coordinates, what went wrong
//! - **Missing data is not an error** - the analysis engine returns empty
//!   results for untagged photos; only invalid coordinates are rejected

use std::path::PathBuf;
use thiserror::Error;

/// Top-level application error
#[derive(Error, Debug)]
pub enum GeoPhotoError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Scanning error: {0}")]
    Scan(#[from] ScanError),

    #[error("Metadata error: {0}")]
    Metadata(#[from] MetadataError),

    #[error("Export error: {0}")]
    Export(#[from] ExportError),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Raised when a value object would be constructed in an invalid state
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Latitude {value} is out of range (must be between -90 and 90)")]
    LatitudeOutOfRange { value: f64 },

    #[error("Longitude {value} is out of range (must be between -180 and 180)")]
    LongitudeOutOfRange { value: f64 },
}

/// Errors that occur while enumerating candidate files
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Directory not found: {path}")]
    DirectoryNotFound { path: PathBuf },

    #[error("Permission denied accessing: {path}")]
    PermissionDenied { path: PathBuf },

    #[error("Failed to read directory {path}: {source}")]
    ReadDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors that occur while resolving a file into a photo record
#[derive(Error, Debug)]
pub enum MetadataError {
    #[error("Failed to read file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Not a regular file: {path}")]
    NotAFile { path: PathBuf },
}

/// Errors that occur while writing analysis output
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Failed to write export: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to serialize export: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Convenience Result type alias
pub type Result<T> = std::result::Result<T, GeoPhotoError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_error_includes_value() {
        let error = ValidationError::LatitudeOutOfRange { value: 91.5 };
        let message = error.to_string();
        assert!(message.contains("91.5"));
        assert!(message.contains("-90"));
    }

    #[test]
    fn scan_error_includes_path() {
        let error = ScanError::DirectoryNotFound {
            path: PathBuf::from("/photos/vacation"),
        };
        assert!(error.to_string().contains("/photos/vacation"));
    }

    #[test]
    fn metadata_error_includes_path() {
        let error = MetadataError::NotAFile {
            path: PathBuf::from("/photos/album"),
        };
        assert!(error.to_string().contains("/photos/album"));
    }

    #[test]
    fn validation_error_converts_to_top_level() {
        let error: GeoPhotoError = ValidationError::LongitudeOutOfRange { value: 200.0 }.into();
        assert!(matches!(error, GeoPhotoError::Validation(_)));
        assert!(error.to_string().contains("200"));
    }
}
