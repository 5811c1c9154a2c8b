//! Aggregate statistics over a photo collection.

use crate::core::geo::BoundingBox;
use crate::core::photo::PhotoRecord;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Summary numbers for a set of photos
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PhotoStatistics {
    pub total_count: usize,
    pub with_location_count: usize,
    pub without_location_count: usize,
    pub with_timestamp_count: usize,
    /// `with_location_count / total_count`, 0.0 when empty
    pub location_coverage_ratio: f64,
    /// Earliest and latest capture times
    pub date_range: Option<(DateTime<Utc>, DateTime<Utc>)>,
    pub bounding_box: Option<BoundingBox>,
    /// Photo count per lowercased extension ("unknown" when missing)
    pub per_extension_counts: BTreeMap<String, usize>,
    /// Photo count per camera display name
    pub per_camera_counts: BTreeMap<String, usize>,
    /// Sum of known file sizes
    pub total_size_bytes: u64,
}

/// Compute statistics in a single pass; never fails
pub fn statistics(records: &[PhotoRecord]) -> PhotoStatistics {
    let mut stats = PhotoStatistics::default();

    for record in records {
        stats.total_count += 1;

        match &record.location {
            Some(location) => {
                stats.with_location_count += 1;
                match stats.bounding_box.as_mut() {
                    Some(bbox) => bbox.extend(location),
                    None => stats.bounding_box = BoundingBox::from_coordinates([location]),
                }
            }
            None => stats.without_location_count += 1,
        }

        if let Some(time) = record.captured_at {
            stats.with_timestamp_count += 1;
            stats.date_range = Some(match stats.date_range {
                None => (time, time),
                Some((min, max)) => (min.min(time), max.max(time)),
            });
        }

        let ext = record.extension().unwrap_or_else(|| "unknown".to_string());
        *stats.per_extension_counts.entry(ext).or_insert(0) += 1;

        if let Some(metadata) = &record.metadata {
            stats.total_size_bytes += metadata.file_size;
            if let Some(camera) = metadata.camera_display() {
                *stats.per_camera_counts.entry(camera).or_insert(0) += 1;
            }
        }
    }

    if stats.total_count > 0 {
        stats.location_coverage_ratio =
            stats.with_location_count as f64 / stats.total_count as f64;
    }

    stats
}
