//! # Scanner Module
//!
//! Lists candidate photo files for the metadata provider.
//!
//! ## Default Extensions
//! Formats that can carry EXIF GPS data:
//! - JPEG (.jpg, .jpeg)
//! - HEIC (.heic, .heif) - iPhone photos
//! - TIFF (.tiff, .tif) and common RAW containers (.dng, .cr2, .nef, .arw)
//! - PNG (.png) and WebP (.webp)
//!
//! ## Example
//! ```rust,ignore
//! use geo_photo_analyzer::core::scanner::{FileEnumerator, ScanConfig, WalkDirEnumerator};
//!
//! let enumerator = WalkDirEnumerator::new(ScanConfig::default());
//! let found = enumerator.enumerate(&["/Users/photos".into()])?;
//! ```

mod filter;
mod walker;

pub use filter::ImageFilter;
pub use walker::{ScanConfig, WalkDirEnumerator};

use crate::error::ScanError;
use crate::events::EventSender;
use std::path::PathBuf;

/// Result of an enumeration
#[derive(Debug, Default)]
pub struct ScanResult {
    /// Candidate files in walk order
    pub files: Vec<PathBuf>,
    /// Errors that occurred during scanning (non-fatal)
    pub errors: Vec<ScanError>,
}

/// Lists candidate files under a set of roots
///
/// Implement this trait to feed the pipeline from another source (e.g., a
/// photo library index, or a fixed list in tests).
pub trait FileEnumerator: Send + Sync {
    /// Enumerate candidate files
    fn enumerate(&self, roots: &[PathBuf]) -> Result<ScanResult, ScanError>;

    /// Enumerate with progress reporting via events
    fn enumerate_with_events(
        &self,
        roots: &[PathBuf],
        events: &EventSender,
    ) -> Result<ScanResult, ScanError>;
}
