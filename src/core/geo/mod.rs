//! # Geo Module
//!
//! Validated latitude/longitude values and great-circle geometry.
//!
//! All distances are in kilometres over a spherical Earth of radius
//! [`EARTH_RADIUS_KM`]. Coordinates are immutable once constructed and can
//! only be created through [`GeoCoordinate::new`], so an out-of-range value
//! never exists.

use crate::error::ValidationError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Mean Earth radius used by the haversine formula
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// A validated decimal-degree coordinate
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawCoordinate", into = "RawCoordinate")]
pub struct GeoCoordinate {
    latitude: f64,
    longitude: f64,
}

impl GeoCoordinate {
    /// Create a coordinate, rejecting values outside the valid ranges
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, ValidationError> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(ValidationError::LatitudeOutOfRange { value: latitude });
        }
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(ValidationError::LongitudeOutOfRange { value: longitude });
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Great-circle distance in kilometres (haversine)
    pub fn distance_to(&self, other: &GeoCoordinate) -> f64 {
        let phi1 = self.latitude.to_radians();
        let phi2 = other.latitude.to_radians();
        let delta_phi = (other.latitude - self.latitude).to_radians();
        let delta_lambda = (other.longitude - self.longitude).to_radians();

        let a = (delta_phi / 2.0).sin().powi(2)
            + phi1.cos() * phi2.cos() * (delta_lambda / 2.0).sin().powi(2);
        // Rounding can push `a` past 1 for antipodal points
        let a = a.clamp(0.0, 1.0);
        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

        EARTH_RADIUS_KM * c
    }

    /// Initial compass bearing towards `other`, in degrees [0, 360)
    pub fn initial_bearing_to(&self, other: &GeoCoordinate) -> f64 {
        let phi1 = self.latitude.to_radians();
        let phi2 = other.latitude.to_radians();
        let delta_lambda = (other.longitude - self.longitude).to_radians();

        let y = delta_lambda.sin() * phi2.cos();
        let x = phi1.cos() * phi2.sin() - phi1.sin() * phi2.cos() * delta_lambda.cos();

        (y.atan2(x).to_degrees() + 360.0) % 360.0
    }
}

impl fmt::Display for GeoCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let lat_dir = if self.latitude >= 0.0 { "N" } else { "S" };
        let lon_dir = if self.longitude >= 0.0 { "E" } else { "W" };
        write!(
            f,
            "{:.6}° {}, {:.6}° {}",
            self.latitude.abs(),
            lat_dir,
            self.longitude.abs(),
            lon_dir
        )
    }
}

/// Unvalidated wire form, so deserialization goes through [`GeoCoordinate::new`]
#[derive(Serialize, Deserialize)]
struct RawCoordinate {
    latitude: f64,
    longitude: f64,
}

impl TryFrom<RawCoordinate> for GeoCoordinate {
    type Error = ValidationError;

    fn try_from(raw: RawCoordinate) -> Result<Self, Self::Error> {
        GeoCoordinate::new(raw.latitude, raw.longitude)
    }
}

impl From<GeoCoordinate> for RawCoordinate {
    fn from(coord: GeoCoordinate) -> Self {
        Self {
            latitude: coord.latitude,
            longitude: coord.longitude,
        }
    }
}

/// The smallest latitude/longitude rectangle enclosing a set of coordinates
///
/// Longitudes are compared numerically, so a set straddling the
/// antimeridian yields a box spanning most of the globe.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub southwest: GeoCoordinate,
    pub northeast: GeoCoordinate,
}

impl BoundingBox {
    /// Build the box around `coords`; `None` when the iterator is empty
    pub fn from_coordinates<'a, I>(coords: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a GeoCoordinate>,
    {
        let mut bounds: Option<(f64, f64, f64, f64)> = None;

        for coord in coords {
            let (lat, lon) = (coord.latitude, coord.longitude);
            bounds = Some(match bounds {
                None => (lat, lon, lat, lon),
                Some((min_lat, min_lon, max_lat, max_lon)) => (
                    min_lat.min(lat),
                    min_lon.min(lon),
                    max_lat.max(lat),
                    max_lon.max(lon),
                ),
            });
        }

        bounds.map(|(min_lat, min_lon, max_lat, max_lon)| Self {
            // Corners are taken from already-validated coordinates
            southwest: GeoCoordinate {
                latitude: min_lat,
                longitude: min_lon,
            },
            northeast: GeoCoordinate {
                latitude: max_lat,
                longitude: max_lon,
            },
        })
    }

    /// Grow this box so it also covers `coord`
    pub fn extend(&mut self, coord: &GeoCoordinate) {
        self.southwest.latitude = self.southwest.latitude.min(coord.latitude);
        self.southwest.longitude = self.southwest.longitude.min(coord.longitude);
        self.northeast.latitude = self.northeast.latitude.max(coord.latitude);
        self.northeast.longitude = self.northeast.longitude.max(coord.longitude);
    }

    pub fn contains(&self, coord: &GeoCoordinate) -> bool {
        (self.southwest.latitude..=self.northeast.latitude).contains(&coord.latitude)
            && (self.southwest.longitude..=self.northeast.longitude).contains(&coord.longitude)
    }

    /// Midpoint of the box in degree space
    pub fn center(&self) -> GeoCoordinate {
        GeoCoordinate {
            latitude: (self.southwest.latitude + self.northeast.latitude) / 2.0,
            longitude: (self.southwest.longitude + self.northeast.longitude) / 2.0,
        }
    }

    /// Distance between the two corners, useful for picking a map zoom level
    pub fn diagonal_km(&self) -> f64 {
        self.southwest.distance_to(&self.northeast)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coord(lat: f64, lon: f64) -> GeoCoordinate {
        GeoCoordinate::new(lat, lon).unwrap()
    }

    #[test]
    fn rejects_out_of_range_latitude() {
        assert_eq!(
            GeoCoordinate::new(90.1, 0.0),
            Err(ValidationError::LatitudeOutOfRange { value: 90.1 })
        );
        assert!(GeoCoordinate::new(-90.5, 0.0).is_err());
    }

    #[test]
    fn rejects_out_of_range_longitude() {
        assert_eq!(
            GeoCoordinate::new(0.0, -180.01),
            Err(ValidationError::LongitudeOutOfRange { value: -180.01 })
        );
    }

    #[test]
    fn rejects_non_finite_values() {
        assert!(GeoCoordinate::new(f64::NAN, 0.0).is_err());
        assert!(GeoCoordinate::new(0.0, f64::INFINITY).is_err());
    }

    #[test]
    fn accepts_boundary_values() {
        assert!(GeoCoordinate::new(90.0, 180.0).is_ok());
        assert!(GeoCoordinate::new(-90.0, -180.0).is_ok());
    }

    #[test]
    fn distance_to_self_is_zero() {
        let a = coord(35.6762, 139.6503);
        assert_eq!(a.distance_to(&a), 0.0);
    }

    #[test]
    fn distance_is_symmetric() {
        let a = coord(48.8566, 2.3522);
        let b = coord(51.5074, -0.1278);
        assert!((a.distance_to(&b) - b.distance_to(&a)).abs() < 1e-9);
    }

    #[test]
    fn antipodal_distance_is_half_circumference() {
        let pairs = [
            (coord(-87.5, -180.0), coord(87.5, 0.0)),
            (coord(0.0, 0.0), coord(0.0, 180.0)),
            (coord(90.0, 0.0), coord(-90.0, 0.0)),
            (coord(33.3, -120.0), coord(-33.3, 60.0)),
        ];
        let half = std::f64::consts::PI * EARTH_RADIUS_KM;

        for (a, b) in pairs {
            let distance = a.distance_to(&b);
            assert!(distance.is_finite(), "{a} -> {b} gave {distance}");
            assert!((distance - half).abs() < 1.0, "{a} -> {b} gave {distance}");
        }
    }

    #[test]
    fn tokyo_landmarks_distance() {
        // 35.6762,139.6503 sits in western Shinjuku, not at the station itself
        let shinjuku = coord(35.6762, 139.6503);
        let tokyo_tower = coord(35.6586, 139.7454);
        let distance = shinjuku.distance_to(&tokyo_tower);
        assert!((distance - 8.8).abs() < 0.2, "got {distance}");
    }

    #[test]
    fn paris_to_london() {
        let paris = coord(48.8566, 2.3522);
        let london = coord(51.5074, -0.1278);
        let distance = paris.distance_to(&london);
        assert!((distance - 343.6).abs() < 1.0, "got {distance}");
    }

    #[test]
    fn one_degree_of_longitude_at_equator() {
        let distance = coord(0.0, 0.0).distance_to(&coord(0.0, 1.0));
        assert!((distance - 111.19).abs() < 0.01);
    }

    #[test]
    fn bearing_cardinal_directions() {
        let origin = coord(0.0, 0.0);
        assert!((origin.initial_bearing_to(&coord(1.0, 0.0)) - 0.0).abs() < 1e-6);
        assert!((origin.initial_bearing_to(&coord(0.0, 1.0)) - 90.0).abs() < 1e-6);
        assert!((origin.initial_bearing_to(&coord(-1.0, 0.0)) - 180.0).abs() < 1e-6);
        assert!((origin.initial_bearing_to(&coord(0.0, -1.0)) - 270.0).abs() < 1e-6);
    }

    #[test]
    fn display_uses_hemisphere_letters() {
        let rio = coord(-22.9068, -43.1729);
        assert_eq!(rio.to_string(), "22.906800° S, 43.172900° W");
    }

    #[test]
    fn deserialize_rejects_invalid_coordinate() {
        let ok: GeoCoordinate =
            serde_json::from_str(r#"{"latitude":10.0,"longitude":20.0}"#).unwrap();
        assert_eq!(ok, coord(10.0, 20.0));

        let bad = serde_json::from_str::<GeoCoordinate>(r#"{"latitude":100.0,"longitude":0.0}"#);
        assert!(bad.is_err());
    }

    #[test]
    fn bounding_box_of_empty_is_none() {
        assert!(BoundingBox::from_coordinates(&[] as &[GeoCoordinate]).is_none());
    }

    #[test]
    fn bounding_box_encloses_all_points() {
        let points = [coord(10.0, -5.0), coord(-3.0, 20.0), coord(4.0, 7.0)];
        let bbox = BoundingBox::from_coordinates(&points).unwrap();

        assert_eq!(bbox.southwest, coord(-3.0, -5.0));
        assert_eq!(bbox.northeast, coord(10.0, 20.0));
        assert!(points.iter().all(|p| bbox.contains(p)));
        assert!(!bbox.contains(&coord(11.0, 0.0)));
    }

    #[test]
    fn bounding_box_extend_and_center() {
        let mut bbox = BoundingBox::from_coordinates(&[coord(0.0, 0.0)]).unwrap();
        bbox.extend(&coord(2.0, 4.0));

        assert_eq!(bbox.center(), coord(1.0, 2.0));
        assert!(bbox.diagonal_km() > 0.0);
    }
}
