//! Chronological journey reconstruction with speed-based anomaly rejection.
//!
//! Photos are walked in capture order. A photo that would require travelling
//! at or above the speed limit from the last accepted stop is treated as a
//! GPS glitch or a wrong clock and left out of the journey.

use crate::core::geo::GeoCoordinate;
use crate::core::photo::PhotoRecord;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::debug;

/// Default implied-speed limit, in km/h
pub const DEFAULT_MAX_SPEED_KMH: f64 = 500.0;

/// A photo left out of the journey
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JourneyAnomaly {
    pub path: PathBuf,
    /// Speed needed to reach this photo from the previous stop
    pub implied_speed_kmh: f64,
}

/// The reconstructed journey
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Journey {
    /// Accepted photos in capture order
    pub stops: Vec<PathBuf>,
    /// Rejected photos in the order they were encountered
    pub anomalies: Vec<JourneyAnomaly>,
    /// Sum of the great-circle legs between consecutive stops
    pub total_distance_km: f64,
}

impl Journey {
    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }
}

/// Speed in km/h needed to cover `from -> to`; `None` when no time elapsed
pub fn implied_speed_kmh(
    from: (DateTime<Utc>, GeoCoordinate),
    to: (DateTime<Utc>, GeoCoordinate),
) -> Option<f64> {
    let elapsed_hours = (to.0 - from.0).num_milliseconds() as f64 / 3_600_000.0;
    if elapsed_hours <= 0.0 {
        return None;
    }
    Some(from.1.distance_to(&to.1) / elapsed_hours)
}

/// Rebuild the journey from records carrying both a timestamp and a location
///
/// Returns an empty journey when fewer than two records qualify.
pub fn reconstruct_journey(records: &[PhotoRecord], max_speed_kmh: f64) -> Journey {
    let mut tagged: Vec<(&PhotoRecord, DateTime<Utc>, GeoCoordinate)> = records
        .iter()
        .filter_map(|r| r.time_and_place().map(|(t, l)| (r, t, l)))
        .collect();

    if tagged.len() < 2 {
        return Journey::default();
    }

    tagged.sort_by_key(|&(_, t, _)| t);

    let (first, first_time, first_location) = tagged[0];
    let mut journey = Journey {
        stops: vec![first.path().to_path_buf()],
        ..Default::default()
    };
    let mut last = (first_time, first_location);

    for &(record, time, location) in &tagged[1..] {
        if let Some(speed) = implied_speed_kmh(last, (time, location)) {
            if speed >= max_speed_kmh {
                debug!(
                    path = %record.path().display(),
                    speed_kmh = speed,
                    "Rejecting journey stop"
                );
                journey.anomalies.push(JourneyAnomaly {
                    path: record.path().to_path_buf(),
                    implied_speed_kmh: speed,
                });
                continue;
            }
        }

        journey.total_distance_km += last.1.distance_to(&location);
        journey.stops.push(record.path().to_path_buf());
        last = (time, location);
    }

    journey
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn base() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 7, 1, 8, 0, 0).unwrap()
    }

    fn photo(path: &str, minutes: i64, lat: f64, lon: f64) -> PhotoRecord {
        PhotoRecord::new(path)
            .with_captured_at(base() + Duration::minutes(minutes))
            .with_location(GeoCoordinate::new(lat, lon).unwrap())
    }

    fn stops(journey: &Journey) -> Vec<&str> {
        journey
            .stops
            .iter()
            .filter_map(|p| p.to_str())
            .collect()
    }

    #[test]
    fn fewer_than_two_tagged_records_is_empty() {
        let records = vec![
            photo("a.jpg", 0, 0.0, 0.0),
            PhotoRecord::new("b.jpg").with_captured_at(base()),
            PhotoRecord::new("c.jpg"),
        ];
        assert!(reconstruct_journey(&records, DEFAULT_MAX_SPEED_KMH).is_empty());
        assert!(reconstruct_journey(&[], DEFAULT_MAX_SPEED_KMH).is_empty());
    }

    #[test]
    fn output_is_chronological() {
        let records = vec![
            photo("c.jpg", 120, 0.02, 0.0),
            photo("a.jpg", 0, 0.0, 0.0),
            photo("b.jpg", 60, 0.01, 0.0),
        ];

        let journey = reconstruct_journey(&records, DEFAULT_MAX_SPEED_KMH);

        assert_eq!(stops(&journey), vec!["a.jpg", "b.jpg", "c.jpg"]);
        assert!(journey.anomalies.is_empty());
    }

    #[test]
    fn impossible_jump_is_rejected() {
        // ~300 km in 10 minutes is ~1800 km/h
        let records = vec![photo("a.jpg", 0, 35.0, 139.0), photo("b.jpg", 10, 37.7, 139.0)];

        let journey = reconstruct_journey(&records, DEFAULT_MAX_SPEED_KMH);

        assert_eq!(stops(&journey), vec!["a.jpg"]);
        assert_eq!(journey.anomalies.len(), 1);
        assert!(journey.anomalies[0].implied_speed_kmh > 1500.0);
        assert_eq!(journey.total_distance_km, 0.0);
    }

    #[test]
    fn anomaly_does_not_become_reference_point() {
        // b is a glitch; c is close to a and reachable from it
        let records = vec![
            photo("a.jpg", 0, 0.0, 0.0),
            photo("b.jpg", 10, 10.0, 10.0),
            photo("c.jpg", 20, 0.01, 0.01),
        ];

        let journey = reconstruct_journey(&records, DEFAULT_MAX_SPEED_KMH);

        assert_eq!(stops(&journey), vec!["a.jpg", "c.jpg"]);
        assert_eq!(journey.anomalies[0].path, PathBuf::from("b.jpg"));
    }

    #[test]
    fn zero_elapsed_time_keeps_candidate() {
        let records = vec![photo("a.jpg", 0, 0.0, 0.0), photo("b.jpg", 0, 40.0, 40.0)];

        let journey = reconstruct_journey(&records, DEFAULT_MAX_SPEED_KMH);

        assert_eq!(journey.stops.len(), 2);
    }

    #[test]
    fn consecutive_stops_stay_below_speed_limit() {
        let records = vec![
            photo("a.jpg", 0, 0.0, 0.0),
            photo("b.jpg", 60, 1.0, 0.0),
            photo("c.jpg", 61, 5.0, 0.0),
            photo("d.jpg", 180, 2.0, 0.0),
        ];

        let journey = reconstruct_journey(&records, DEFAULT_MAX_SPEED_KMH);
        let by_path: std::collections::HashMap<_, _> = records
            .iter()
            .map(|r| (r.path().to_path_buf(), r.time_and_place().unwrap()))
            .collect();

        for pair in journey.stops.windows(2) {
            let speed = implied_speed_kmh(by_path[&pair[0]], by_path[&pair[1]]);
            assert!(speed.map_or(true, |s| s < DEFAULT_MAX_SPEED_KMH));
        }
        assert_eq!(stops(&journey), vec!["a.jpg", "b.jpg", "d.jpg"]);
    }

    #[test]
    fn total_distance_sums_accepted_legs() {
        let records = vec![
            photo("a.jpg", 0, 0.0, 0.0),
            photo("b.jpg", 60, 0.0, 1.0),
            photo("c.jpg", 120, 0.0, 2.0),
        ];

        let journey = reconstruct_journey(&records, DEFAULT_MAX_SPEED_KMH);

        assert!((journey.total_distance_km - 2.0 * 111.19).abs() < 0.1);
    }

    #[test]
    fn custom_speed_limit_applies() {
        // ~111 km in one hour
        let records = vec![photo("a.jpg", 0, 0.0, 0.0), photo("b.jpg", 60, 1.0, 0.0)];

        assert_eq!(reconstruct_journey(&records, 100.0).stops.len(), 1);
        assert_eq!(reconstruct_journey(&records, 120.0).stops.len(), 2);
    }

    #[test]
    fn antipodal_hop_is_rejected() {
        let records = vec![
            photo("a.jpg", 0, -87.5, -180.0),
            photo("b.jpg", 1, 87.5, 0.0),
        ];

        let journey = reconstruct_journey(&records, DEFAULT_MAX_SPEED_KMH);

        assert_eq!(stops(&journey), vec!["a.jpg"]);
        assert_eq!(journey.anomalies.len(), 1);
        assert!(journey.anomalies[0].implied_speed_kmh.is_finite());
        assert_eq!(journey.total_distance_km, 0.0);
    }
}
