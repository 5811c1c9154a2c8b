//! Spatiotemporal clustering.
//!
//! A single greedy pass over photos in capture order. The earliest
//! unassigned photo seeds a cluster, and every other unassigned photo
//! within both the time and the distance threshold **of the seed** joins it.
//! Members are never compared to each other, so clusters do not chain.
//!
//! A seed that attracts no partner is dropped: it appears in no cluster.
//! Photos missing a timestamp or a location are collected separately in the
//! "No location" bucket.

use crate::core::geo::GeoCoordinate;
use crate::core::photo::PhotoRecord;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Label of the bucket holding photos without a timestamp or location
pub const NO_LOCATION_LABEL: &str = "No location";

/// Default maximum time from the seed, in hours
pub const DEFAULT_TIME_THRESHOLD_HOURS: f64 = 24.0;

/// Default maximum distance from the seed, in kilometres
pub const DEFAULT_DISTANCE_THRESHOLD_KM: f64 = 10.0;

/// A labelled group of photos
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cluster {
    pub label: String,
    /// Members in capture order, seed first
    pub members: Vec<PathBuf>,
}

impl Cluster {
    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// Output of [`cluster`]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClusterReport {
    /// Timed clusters in order of their seed
    pub clusters: Vec<Cluster>,
    /// Photos lacking a timestamp or location, `None` when there are none
    pub no_location: Option<Cluster>,
}

impl ClusterReport {
    /// Label of the cluster containing `path`, including the no-location bucket
    pub fn label_for(&self, path: &std::path::Path) -> Option<&str> {
        self.clusters
            .iter()
            .chain(self.no_location.iter())
            .find(|c| c.members.iter().any(|m| m == path))
            .map(|c| c.label.as_str())
    }
}

/// Display label for the `number`th cluster seeded at `seed_time`
pub fn cluster_label(number: usize, seed_time: DateTime<Utc>) -> String {
    format!("Cluster {}: {}", number, seed_time.format("%b %d, %Y"))
}

/// Group photos taken close together in both time and space
pub fn cluster(
    records: &[PhotoRecord],
    time_threshold_hours: f64,
    distance_threshold_km: f64,
) -> ClusterReport {
    let mut timed: Vec<(&PhotoRecord, DateTime<Utc>, GeoCoordinate)> = Vec::new();
    let mut unlocated: Vec<PathBuf> = Vec::new();

    for record in records {
        match record.time_and_place() {
            Some((time, location)) => timed.push((record, time, location)),
            None => unlocated.push(record.path().to_path_buf()),
        }
    }

    timed.sort_by_key(|&(_, t, _)| t);

    let mut assigned = vec![false; timed.len()];
    let mut clusters = Vec::new();

    for seed_index in 0..timed.len() {
        if assigned[seed_index] {
            continue;
        }
        assigned[seed_index] = true;

        let (seed, seed_time, seed_location) = timed[seed_index];
        let mut members = vec![seed.path().to_path_buf()];

        // Everything before the seed is already assigned
        for candidate in (seed_index + 1)..timed.len() {
            if assigned[candidate] {
                continue;
            }
            let (record, time, location) = timed[candidate];
            let hours_apart = (time - seed_time).num_milliseconds().abs() as f64 / 3_600_000.0;

            if hours_apart <= time_threshold_hours
                && seed_location.distance_to(&location) <= distance_threshold_km
            {
                assigned[candidate] = true;
                members.push(record.path().to_path_buf());
            }
        }

        if members.len() >= 2 {
            clusters.push(Cluster {
                label: cluster_label(clusters.len() + 1, seed_time),
                members,
            });
        }
    }

    let no_location = (!unlocated.is_empty()).then(|| Cluster {
        label: NO_LOCATION_LABEL.to_string(),
        members: unlocated,
    });

    ClusterReport {
        clusters,
        no_location,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use std::collections::HashSet;

    fn base() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 8, 3, 9, 30, 0).unwrap()
    }

    fn photo(path: &str, hours: f64, lat: f64, lon: f64) -> PhotoRecord {
        PhotoRecord::new(path)
            .with_captured_at(base() + Duration::minutes((hours * 60.0) as i64))
            .with_location(GeoCoordinate::new(lat, lon).unwrap())
    }

    fn paths(cluster: &Cluster) -> Vec<&str> {
        cluster.members.iter().filter_map(|p| p.to_str()).collect()
    }

    #[test]
    fn empty_input_has_no_clusters() {
        let report = cluster(&[], 24.0, 10.0);
        assert!(report.clusters.is_empty());
        assert!(report.no_location.is_none());
    }

    #[test]
    fn triangle_with_untagged_photos() {
        // Three points roughly 1 km apart within two hours, plus two without GPS
        let records = vec![
            photo("a.jpg", 0.0, 35.6812, 139.7671),
            PhotoRecord::new("x.jpg"),
            photo("b.jpg", 1.0, 35.6902, 139.7671),
            photo("c.jpg", 2.0, 35.6857, 139.7781),
            PhotoRecord::new("y.jpg").with_captured_at(base()),
        ];

        let report = cluster(&records, 24.0, 10.0);

        assert_eq!(report.clusters.len(), 1);
        assert_eq!(paths(&report.clusters[0]), vec!["a.jpg", "b.jpg", "c.jpg"]);

        let bucket = report.no_location.unwrap();
        assert_eq!(bucket.label, NO_LOCATION_LABEL);
        assert_eq!(paths(&bucket), vec!["x.jpg", "y.jpg"]);
    }

    #[test]
    fn singleton_seed_is_dropped() {
        let records = vec![
            photo("a.jpg", 0.0, 0.0, 0.0),
            photo("b.jpg", 1.0, 0.001, 0.0),
            photo("far.jpg", 2.0, 20.0, 20.0),
        ];

        let report = cluster(&records, 24.0, 10.0);

        assert_eq!(report.clusters.len(), 1);
        assert_eq!(paths(&report.clusters[0]), vec!["a.jpg", "b.jpg"]);
        assert!(report.label_for(std::path::Path::new("far.jpg")).is_none());
    }

    #[test]
    fn time_threshold_splits_clusters() {
        let records = vec![
            photo("a.jpg", 0.0, 0.0, 0.0),
            photo("b.jpg", 1.0, 0.0, 0.0),
            photo("c.jpg", 30.0, 0.0, 0.0),
            photo("d.jpg", 31.0, 0.0, 0.0),
        ];

        let report = cluster(&records, 24.0, 10.0);

        assert_eq!(report.clusters.len(), 2);
        assert_eq!(paths(&report.clusters[1]), vec!["c.jpg", "d.jpg"]);
    }

    #[test]
    fn distance_is_measured_from_seed_only() {
        // b is 8 km from a, c is 8 km from b but 16 km from a
        let records = vec![
            photo("a.jpg", 0.0, 0.0, 0.0),
            photo("b.jpg", 1.0, 0.072, 0.0),
            photo("c.jpg", 2.0, 0.144, 0.0),
        ];

        let report = cluster(&records, 24.0, 10.0);

        assert_eq!(report.clusters.len(), 1);
        assert_eq!(paths(&report.clusters[0]), vec!["a.jpg", "b.jpg"]);
    }

    #[test]
    fn members_are_within_thresholds_of_seed() {
        let records: Vec<PhotoRecord> = (0..12)
            .map(|i| {
                photo(
                    &format!("p{i}.jpg"),
                    i as f64 * 5.0,
                    (i % 4) as f64 * 0.03,
                    (i % 3) as f64 * 0.03,
                )
            })
            .collect();
        let lookup: std::collections::HashMap<_, _> = records
            .iter()
            .map(|r| (r.path().to_path_buf(), r.time_and_place().unwrap()))
            .collect();

        let report = cluster(&records, 12.0, 5.0);
        let mut seen = HashSet::new();

        for c in &report.clusters {
            assert!(c.len() >= 2);
            let (seed_time, seed_loc) = lookup[&c.members[0]];
            for member in &c.members {
                assert!(seen.insert(member.clone()), "{member:?} in two clusters");
                let (t, l) = lookup[member];
                assert!((t - seed_time).num_hours().abs() <= 12);
                assert!(seed_loc.distance_to(&l) <= 5.0);
            }
        }
    }

    #[test]
    fn labels_are_numbered_and_dated() {
        let records = vec![
            photo("a.jpg", 0.0, 0.0, 0.0),
            photo("b.jpg", 0.5, 0.0, 0.0),
            photo("c.jpg", 48.0, 0.0, 0.0),
            photo("d.jpg", 48.5, 0.0, 0.0),
        ];

        let report = cluster(&records, 24.0, 10.0);

        assert_eq!(report.clusters[0].label, "Cluster 1: Aug 03, 2024");
        assert_eq!(report.clusters[1].label, "Cluster 2: Aug 05, 2024");
        assert_eq!(
            report.label_for(std::path::Path::new("d.jpg")),
            Some("Cluster 2: Aug 05, 2024")
        );
    }
}
