//! Nearest-neighbor display ordering.
//!
//! Produces a short (not optimal) visiting order over geotagged photos so
//! that stepping through map markers doesn't zig-zag across the map. This
//! is the greedy heuristic, `O(n^2)`, not an exact TSP solver.

use crate::core::geo::GeoCoordinate;
use crate::core::photo::PhotoRecord;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Order photos by repeatedly hopping to the nearest unvisited location
///
/// Starts at the first geotagged record in input order. Ties go to the
/// record seen first. Records without a location follow in their original
/// order. With fewer than two geotagged records the input order is returned.
/// The result is always a permutation of the input paths.
pub fn optimize_route(records: &[PhotoRecord]) -> Vec<PathBuf> {
    let mut remaining: Vec<(&Path, GeoCoordinate)> = Vec::new();
    let mut untagged: Vec<&Path> = Vec::new();

    for record in records {
        match record.location {
            Some(location) => remaining.push((record.path(), location)),
            None => untagged.push(record.path()),
        }
    }

    if remaining.len() < 2 {
        return records.iter().map(|r| r.path().to_path_buf()).collect();
    }

    let mut route = Vec::with_capacity(records.len());
    let (start, mut current) = remaining.remove(0);
    route.push(start.to_path_buf());

    while !remaining.is_empty() {
        let mut nearest = 0;
        let mut nearest_distance = f64::INFINITY;

        for (index, (_, location)) in remaining.iter().enumerate() {
            let distance = current.distance_to(location);
            if distance < nearest_distance {
                nearest = index;
                nearest_distance = distance;
            }
        }

        let (path, location) = remaining.remove(nearest);
        route.push(path.to_path_buf());
        current = location;
    }

    route.extend(untagged.into_iter().map(Path::to_path_buf));
    route
}

/// Total length in kilometres of visiting `order` in sequence
///
/// Paths that are unknown or have no location are skipped.
pub fn route_length_km(records: &[PhotoRecord], order: &[PathBuf]) -> f64 {
    let locations: HashMap<&Path, GeoCoordinate> = records
        .iter()
        .filter_map(|r| r.location.map(|l| (r.path(), l)))
        .collect();

    order
        .iter()
        .filter_map(|p| locations.get(p.as_path()))
        .collect::<Vec<_>>()
        .windows(2)
        .map(|pair| pair[0].distance_to(pair[1]))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(path: &str, lat: f64, lon: f64) -> PhotoRecord {
        PhotoRecord::new(path).with_location(GeoCoordinate::new(lat, lon).unwrap())
    }

    fn names(route: &[PathBuf]) -> Vec<&str> {
        route.iter().filter_map(|p| p.to_str()).collect()
    }

    #[test]
    fn fewer_than_two_geotagged_keeps_input_order() {
        let records = vec![
            PhotoRecord::new("b.jpg"),
            at("a.jpg", 1.0, 1.0),
            PhotoRecord::new("c.jpg"),
        ];
        assert_eq!(names(&optimize_route(&records)), vec!["b.jpg", "a.jpg", "c.jpg"]);
        assert!(optimize_route(&[]).is_empty());
    }

    #[test]
    fn visits_nearest_neighbor_first() {
        let records = vec![
            at("start.jpg", 0.0, 0.0),
            at("far.jpg", 0.0, 10.0),
            at("near.jpg", 0.0, 1.0),
            at("mid.jpg", 0.0, 5.0),
        ];

        let route = optimize_route(&records);

        assert_eq!(
            names(&route),
            vec!["start.jpg", "near.jpg", "mid.jpg", "far.jpg"]
        );
    }

    #[test]
    fn untagged_photos_go_last_in_original_order() {
        let records = vec![
            PhotoRecord::new("x.jpg"),
            at("a.jpg", 0.0, 0.0),
            PhotoRecord::new("y.jpg"),
            at("b.jpg", 0.0, 1.0),
        ];

        assert_eq!(
            names(&optimize_route(&records)),
            vec!["a.jpg", "b.jpg", "x.jpg", "y.jpg"]
        );
    }

    #[test]
    fn ties_go_to_first_seen() {
        let records = vec![
            at("start.jpg", 0.0, 0.0),
            at("east.jpg", 0.0, 1.0),
            at("west.jpg", 0.0, -1.0),
        ];

        assert_eq!(
            names(&optimize_route(&records)),
            vec!["start.jpg", "east.jpg", "west.jpg"]
        );
    }

    #[test]
    fn output_is_a_permutation() {
        let mut records: Vec<PhotoRecord> = (0..20)
            .map(|i| at(&format!("p{i}.jpg"), (i * 7 % 13) as f64, (i * 5 % 11) as f64))
            .collect();
        records.push(PhotoRecord::new("untagged.jpg"));

        let mut route = optimize_route(&records);
        let mut input: Vec<PathBuf> = records.iter().map(|r| r.path().to_path_buf()).collect();
        route.sort();
        input.sort();

        assert_eq!(route, input);
    }

    #[test]
    fn optimized_route_is_not_longer_than_zigzag() {
        let records = vec![
            at("a.jpg", 0.0, 0.0),
            at("b.jpg", 0.0, 3.0),
            at("c.jpg", 0.0, 1.0),
            at("d.jpg", 0.0, 2.0),
        ];
        let original: Vec<PathBuf> = records.iter().map(|r| r.path().to_path_buf()).collect();

        let optimized = optimize_route(&records);

        assert!(route_length_km(&records, &optimized) < route_length_km(&records, &original));
        assert!((route_length_km(&records, &optimized) - 3.0 * 111.19).abs() < 0.5);
    }
}
