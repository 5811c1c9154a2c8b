//! # Metadata Module
//!
//! Turns a photo file into a [`PhotoRecord`].
//!
//! ## Extracted Fields
//! - File size (filesystem)
//! - Date taken (DateTimeOriginal, falling back to DateTime)
//! - GPS position (degrees/minutes/seconds + hemisphere reference)
//! - Image dimensions, camera make/model, orientation
//!
//! A file without EXIF still resolves: it just has no timestamp or
//! location. GPS values that would produce an out-of-range coordinate are
//! dropped rather than stored.

use crate::core::geo::GeoCoordinate;
use crate::core::photo::{PhotoMetadata, PhotoRecord};
use crate::error::MetadataError;
use chrono::{DateTime, NaiveDateTime, Utc};
use exif::{Exif, In, Reader, Tag, Value};
use std::fs::{self, File};
use std::io::BufReader;
use std::path::Path;
use tracing::{debug, warn};

/// EXIF timestamp layout: "YYYY:MM:DD HH:MM:SS"
pub const EXIF_DATETIME_FORMAT: &str = "%Y:%m:%d %H:%M:%S";

/// Resolves files into photo records
///
/// Implement this trait to plug in another metadata source (e.g., a sidecar
/// database, or canned records in tests).
pub trait MetadataProvider: Send + Sync {
    fn resolve(&self, path: &Path) -> Result<PhotoRecord, MetadataError>;
}

/// Reads metadata with kamadak-exif
#[derive(Debug, Clone, Copy, Default)]
pub struct ExifMetadataProvider;

impl ExifMetadataProvider {
    pub fn new() -> Self {
        Self
    }
}

impl MetadataProvider for ExifMetadataProvider {
    fn resolve(&self, path: &Path) -> Result<PhotoRecord, MetadataError> {
        let fs_metadata = fs::metadata(path).map_err(|source| MetadataError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        if !fs_metadata.is_file() {
            return Err(MetadataError::NotAFile {
                path: path.to_path_buf(),
            });
        }

        let mut record =
            PhotoRecord::new(path).with_metadata(PhotoMetadata::with_size(fs_metadata.len()));

        let Some(exif) = read_exif(path) else {
            debug!(path = %path.display(), "No EXIF data");
            return Ok(record);
        };

        record.captured_at = extract_captured_at(&exif);
        record.location = extract_location(&exif, path);

        if let Some(metadata) = record.metadata.as_mut() {
            fill_image_metadata(&exif, metadata);
        }

        Ok(record)
    }
}

fn read_exif(path: &Path) -> Option<Exif> {
    let file = File::open(path).ok()?;
    let mut bufreader = BufReader::new(file);
    Reader::new().read_from_container(&mut bufreader).ok()
}

fn extract_captured_at(exif: &Exif) -> Option<DateTime<Utc>> {
    [Tag::DateTimeOriginal, Tag::DateTime]
        .into_iter()
        .filter_map(|tag| exif.get_field(tag, In::PRIMARY))
        .filter_map(|field| get_string_value(&field.value))
        .find_map(|s| parse_exif_datetime(&s))
}

fn extract_location(exif: &Exif, path: &Path) -> Option<GeoCoordinate> {
    let latitude = gps_component(exif, Tag::GPSLatitude, Tag::GPSLatitudeRef)?;
    let longitude = gps_component(exif, Tag::GPSLongitude, Tag::GPSLongitudeRef)?;

    match GeoCoordinate::new(latitude, longitude) {
        Ok(coord) => Some(coord),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Ignoring malformed GPS position");
            None
        }
    }
}

fn gps_component(exif: &Exif, value_tag: Tag, ref_tag: Tag) -> Option<f64> {
    let field = exif.get_field(value_tag, In::PRIMARY)?;
    let (degrees, minutes, seconds) = match &field.value {
        Value::Rational(vec) if vec.len() >= 3 => {
            (vec[0].to_f64(), vec[1].to_f64(), vec[2].to_f64())
        }
        _ => return None,
    };

    let hemisphere = exif
        .get_field(ref_tag, In::PRIMARY)
        .and_then(|f| get_string_value(&f.value))
        .and_then(|s| s.chars().next())
        .unwrap_or('N');

    Some(dms_to_decimal(degrees, minutes, seconds, hemisphere))
}

fn fill_image_metadata(exif: &Exif, metadata: &mut PhotoMetadata) {
    // Prefer actual pixel dimensions, fall back to image width/height tags
    metadata.width = [Tag::PixelXDimension, Tag::ImageWidth]
        .into_iter()
        .find_map(|tag| exif.get_field(tag, In::PRIMARY))
        .and_then(|f| get_u32_value(&f.value))
        .filter(|&w| w > 0);
    metadata.height = [Tag::PixelYDimension, Tag::ImageLength]
        .into_iter()
        .find_map(|tag| exif.get_field(tag, In::PRIMARY))
        .and_then(|f| get_u32_value(&f.value))
        .filter(|&h| h > 0);

    metadata.camera_make = exif
        .get_field(Tag::Make, In::PRIMARY)
        .and_then(|f| get_string_value(&f.value));
    metadata.camera_model = exif
        .get_field(Tag::Model, In::PRIMARY)
        .and_then(|f| get_string_value(&f.value));

    if let Some(field) = exif.get_field(Tag::Orientation, In::PRIMARY) {
        if let Value::Short(ref vec) = field.value {
            metadata.orientation = vec.first().copied();
        }
    }
}

/// Convert degrees/minutes/seconds to signed decimal degrees
///
/// `S` and `W` references negate the result; anything else is positive.
pub fn dms_to_decimal(degrees: f64, minutes: f64, seconds: f64, hemisphere: char) -> f64 {
    let value = degrees + minutes / 60.0 + seconds / 3600.0;
    match hemisphere.to_ascii_uppercase() {
        'S' | 'W' => -value,
        _ => value,
    }
}

/// Parse an EXIF "YYYY:MM:DD HH:MM:SS" timestamp as UTC
pub fn parse_exif_datetime(value: &str) -> Option<DateTime<Utc>> {
    let trimmed = value.trim_end_matches('\0').trim();
    NaiveDateTime::parse_from_str(trimmed, EXIF_DATETIME_FORMAT)
        .ok()
        .map(|naive| DateTime::from_naive_utc_and_offset(naive, Utc))
}

/// Helper to extract u32 from various EXIF value types
fn get_u32_value(value: &Value) -> Option<u32> {
    match value {
        Value::Long(vec) => vec.first().copied(),
        Value::Short(vec) => vec.first().map(|v| *v as u32),
        _ => None,
    }
}

/// Helper to extract string from EXIF ASCII value
fn get_string_value(value: &Value) -> Option<String> {
    if let Value::Ascii(ref vec) = value {
        if let Some(bytes) = vec.first() {
            if let Ok(s) = std::str::from_utf8(bytes) {
                let trimmed = s.trim_end_matches('\0').trim();
                if !trimmed.is_empty() {
                    return Some(trimmed.to_string());
                }
            }
        }
    }
    None
}
