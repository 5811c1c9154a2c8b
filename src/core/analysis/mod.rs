//! # Analysis Module
//!
//! The geospatial analysis engine.
//!
//! ## Algorithms
//! - `duplicates` - Groups photos sharing a file name and size
//! - `journey` - Chronological path with impossible jumps removed
//! - `cluster` - Time + distance groups around a seed photo
//! - `route` - Nearest-neighbor display order for map markers
//! - `stats` - Counts, coverage, date range and bounds
//!
//! Every algorithm is a pure function over a slice of records. None of them
//! mutate their input, perform I/O, or fail on missing data: untagged photos
//! simply produce empty results.
//!
//! ## Example
//! ```rust,ignore
//! let engine = AnalysisEngine::new(AnalysisConfig::default());
//! let report = engine.analyze(&photos);
//! println!("{} clusters", report.clusters.clusters.len());
//! ```

mod cluster;
mod duplicates;
mod journey;
mod route;
mod stats;

pub use cluster::{
    cluster, cluster_label, Cluster, ClusterReport, DEFAULT_DISTANCE_THRESHOLD_KM,
    DEFAULT_TIME_THRESHOLD_HOURS, NO_LOCATION_LABEL,
};
pub use duplicates::{find_duplicates, DuplicateGroup};
pub use journey::{
    implied_speed_kmh, reconstruct_journey, Journey, JourneyAnomaly, DEFAULT_MAX_SPEED_KMH,
};
pub use route::{optimize_route, route_length_km};
pub use stats::{statistics, PhotoStatistics};

use crate::core::photo::PhotoSet;
use crate::error::GeoPhotoError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::info;

/// Thresholds used by the engine
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Maximum time between a cluster seed and a member
    pub time_threshold_hours: f64,
    /// Maximum distance between a cluster seed and a member
    pub distance_threshold_km: f64,
    /// Implied speed at or above which a journey stop is rejected
    pub max_speed_kmh: f64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            time_threshold_hours: DEFAULT_TIME_THRESHOLD_HOURS,
            distance_threshold_km: DEFAULT_DISTANCE_THRESHOLD_KM,
            max_speed_kmh: DEFAULT_MAX_SPEED_KMH,
        }
    }
}

impl AnalysisConfig {
    pub fn time_threshold_hours(mut self, hours: f64) -> Self {
        self.time_threshold_hours = hours;
        self
    }

    pub fn distance_threshold_km(mut self, km: f64) -> Self {
        self.distance_threshold_km = km;
        self
    }

    pub fn max_speed_kmh(mut self, kmh: f64) -> Self {
        self.max_speed_kmh = kmh;
        self
    }

    /// Reject thresholds that are negative, zero-speed or not finite
    pub fn validate(&self) -> Result<(), GeoPhotoError> {
        let checks = [
            ("time threshold", self.time_threshold_hours, false),
            ("distance threshold", self.distance_threshold_km, false),
            ("max speed", self.max_speed_kmh, true),
        ];

        for (name, value, strictly_positive) in checks {
            let in_range = if strictly_positive {
                value > 0.0
            } else {
                value >= 0.0
            };
            if !value.is_finite() || !in_range {
                return Err(GeoPhotoError::Config(format!("Invalid {name}: {value}")));
            }
        }
        Ok(())
    }
}

/// Output of every algorithm for one snapshot
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub statistics: PhotoStatistics,
    pub duplicates: Vec<DuplicateGroup>,
    pub journey: Journey,
    pub clusters: ClusterReport,
    /// Display order, a permutation of every photo path
    pub route: Vec<PathBuf>,
}

/// Stateless facade over the analysis algorithms
///
/// Holds only its configuration; every call reads the given set and returns
/// fresh results. Callers that mutate the set concurrently must analyze a
/// snapshot (`PhotoSet` is `Clone`).
#[derive(Debug, Clone, Copy, Default)]
pub struct AnalysisEngine {
    config: AnalysisConfig,
}

impl AnalysisEngine {
    pub fn new(config: AnalysisConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    pub fn find_duplicates(&self, photos: &PhotoSet) -> Vec<DuplicateGroup> {
        find_duplicates(photos.records())
    }

    pub fn reconstruct_journey(&self, photos: &PhotoSet) -> Journey {
        reconstruct_journey(photos.records(), self.config.max_speed_kmh)
    }

    /// Cluster with the configured thresholds
    pub fn cluster(&self, photos: &PhotoSet) -> ClusterReport {
        self.cluster_with(
            photos,
            self.config.time_threshold_hours,
            self.config.distance_threshold_km,
        )
    }

    /// Cluster with explicit thresholds
    pub fn cluster_with(
        &self,
        photos: &PhotoSet,
        time_threshold_hours: f64,
        distance_threshold_km: f64,
    ) -> ClusterReport {
        cluster(photos.records(), time_threshold_hours, distance_threshold_km)
    }

    pub fn optimize_route(&self, photos: &PhotoSet) -> Vec<PathBuf> {
        optimize_route(photos.records())
    }

    pub fn statistics(&self, photos: &PhotoSet) -> PhotoStatistics {
        statistics(photos.records())
    }

    /// Run all five algorithms
    pub fn analyze(&self, photos: &PhotoSet) -> AnalysisReport {
        let report = AnalysisReport {
            statistics: self.statistics(photos),
            duplicates: self.find_duplicates(photos),
            journey: self.reconstruct_journey(photos),
            clusters: self.cluster(photos),
            route: self.optimize_route(photos),
        };

        info!(
            photos = report.statistics.total_count,
            geotagged = report.statistics.with_location_count,
            duplicate_groups = report.duplicates.len(),
            journey_stops = report.journey.stops.len(),
            journey_anomalies = report.journey.anomalies.len(),
            clusters = report.clusters.clusters.len(),
            "Analysis complete"
        );

        report
    }
}
