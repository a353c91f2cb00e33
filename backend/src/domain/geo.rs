//! Spherical-Earth navigation helpers for scoping POI searches.
//!
//! All public inputs and outputs are in degrees; radians stay internal.
//! Distances are kilometres on a sphere of mean radius
//! [`EARTH_RADIUS_KM`].

use serde::{Deserialize, Serialize};

/// Mean Earth radius in kilometres.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Bearing used to derive the north-west corner of a search box.
pub const NORTH_WEST_BEARING_DEG: f64 = -45.0;

/// Bearing used to derive the south-east corner of a search box.
pub const SOUTH_EAST_BEARING_DEG: f64 = 135.0;

/// A WGS84 fix in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    /// Latitude in degrees north.
    pub latitude: f64,
    /// Longitude in degrees east.
    pub longitude: f64,
}

impl Position {
    /// Build a position from latitude and longitude in degrees.
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Return whether both coordinates are finite and within WGS84 ranges.
    ///
    /// ```
    /// use poi_sync::domain::Position;
    ///
    /// assert!(Position::new(47.6, -122.3).is_valid());
    /// assert!(!Position::new(91.0, 0.0).is_valid());
    /// assert!(!Position::new(f64::NAN, 0.0).is_valid());
    /// ```
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }
}

/// Rectangular latitude/longitude region sent to the POI search.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    /// Northern edge latitude.
    pub north: f64,
    /// Southern edge latitude.
    pub south: f64,
    /// Eastern edge longitude.
    pub east: f64,
    /// Western edge longitude.
    pub west: f64,
}

impl BoundingBox {
    /// North-west corner of the box.
    pub const fn north_west(&self) -> Position {
        Position::new(self.north, self.west)
    }

    /// South-east corner of the box.
    pub const fn south_east(&self) -> Position {
        Position::new(self.south, self.east)
    }
}

/// Destination reached from `start` after travelling `distance_km` along
/// the great circle with initial bearing `bearing_deg`.
///
/// Uses the direct formula on a sphere:
/// `lat2 = asin(sin lat1 · cos δ + cos lat1 · sin δ · cos θ)` and
/// `lon2 = lon1 + atan2(sin θ · sin δ · cos lat1, cos δ − sin lat1 · sin lat2)`
/// where `δ = d / R`. Longitude is returned unnormalised.
///
/// ```
/// use poi_sync::domain::{Position, geo::destination};
///
/// let north = destination(Position::new(0.0, 0.0), 0.0, 111.19);
/// assert!((north.latitude - 1.0).abs() < 0.01);
/// assert!(north.longitude.abs() < 1e-9);
/// ```
pub fn destination(start: Position, bearing_deg: f64, distance_km: f64) -> Position {
    let lat1 = start.latitude.to_radians();
    let lon1 = start.longitude.to_radians();
    let bearing = bearing_deg.to_radians();
    let angular = distance_km / EARTH_RADIUS_KM;

    let (sin_lat1, cos_lat1) = lat1.sin_cos();
    let (sin_d, cos_d) = angular.sin_cos();

    let lat2 = (sin_lat1 * cos_d + cos_lat1 * sin_d * bearing.cos()).asin();
    let lon2 = lon1 + (bearing.sin() * sin_d * cos_lat1).atan2(cos_d - sin_lat1 * lat2.sin());

    Position::new(lat2.to_degrees(), lon2.to_degrees())
}

/// Square search box whose north-west and south-east corners each lie
/// `radius_km` from `center`, giving a diagonal of `2 × radius_km`.
///
/// ```
/// use poi_sync::domain::{Position, geo::compute_bounding_box};
///
/// let bbox = compute_bounding_box(Position::new(47.0, -122.0), 50.0);
/// assert!(bbox.north > bbox.south);
/// assert!(bbox.east > bbox.west);
/// ```
pub fn compute_bounding_box(center: Position, radius_km: f64) -> BoundingBox {
    let north_west = destination(center, NORTH_WEST_BEARING_DEG, radius_km);
    let south_east = destination(center, SOUTH_EAST_BEARING_DEG, radius_km);
    BoundingBox {
        north: north_west.latitude,
        south: south_east.latitude,
        east: south_east.longitude,
        west: north_west.longitude,
    }
}

/// Great-circle distance between two positions (haversine).
pub fn distance_km(from: Position, to: Position) -> f64 {
    let lat1 = from.latitude.to_radians();
    let lat2 = to.latitude.to_radians();
    let delta_lat = (to.latitude - from.latitude).to_radians();
    let delta_lon = (to.longitude - from.longitude).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1.cos() * lat2.cos() * (delta_lon / 2.0).sin().powi(2);
    EARTH_RADIUS_KM * 2.0 * a.sqrt().asin()
}

/// Initial bearing from `from` towards `to`, normalised to `[0, 360)`.
pub fn bearing_deg(from: Position, to: Position) -> f64 {
    let lat1 = from.latitude.to_radians();
    let lat2 = to.latitude.to_radians();
    let delta_lon = (to.longitude - from.longitude).to_radians();

    let y = delta_lon.sin() * lat2.cos();
    let x = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * delta_lon.cos();
    y.atan2(x).to_degrees().rem_euclid(360.0)
}
