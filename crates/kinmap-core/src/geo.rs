//! Great-circle distance between residence coordinates.
//!
//! Distances are computed with the Haversine formula on a spherical Earth.
//! This is the only place in Kinmap that does trigonometry; everything that
//! needs a distance in kilometres goes through [`haversine_km`].

use serde::{Deserialize, Serialize};

/// Mean Earth radius used for every distance, in kilometres.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// A point on the globe in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    /// Creates a coordinate from latitude and longitude in degrees.
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Great-circle distance to another coordinate, in kilometres.
    pub fn distance_to(&self, other: &Coordinate) -> f64 {
        haversine_km(self, other)
    }
}

impl std::fmt::Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.4}, {:.4})", self.latitude, self.longitude)
    }
}

/// Computes the Haversine distance between two coordinates in kilometres.
///
/// ```
/// use kinmap_core::{haversine_km, Coordinate};
///
/// let san_jose = Coordinate::new(9.9281, -84.0907);
/// let cartago = Coordinate::new(9.9936, -84.0083);
/// let km = haversine_km(&san_jose, &cartago);
/// assert!(km > 10.0 && km < 30.0);
/// ```
pub fn haversine_km(from: &Coordinate, to: &Coordinate) -> f64 {
    let d_lat = (to.latitude - from.latitude).to_radians();
    let d_lon = (to.longitude - from.longitude).to_radians();

    let lat1 = from.latitude.to_radians();
    let lat2 = to.latitude.to_radians();

    // Swapping the endpoints must produce identical bits: keep the cosine
    // product grouped.
    let a = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
    // Rounding can push `a` just past 1 near the antipodes.
    let a = a.clamp(0.0, 1.0);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}
