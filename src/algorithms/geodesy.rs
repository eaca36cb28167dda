//! Great-circle distance and initial bearing between geographic coordinates
//!
//! All degree/radian conversion in the crate goes through [`to_radians`] and
//! [`to_degrees`].

use crate::core::{GeoPoint, EARTH_RADIUS_MILES};
use std::f64::consts::PI;

/// Convert degrees to radians
#[inline]
pub fn to_radians(degrees: f64) -> f64 {
    degrees * PI / 180.0
}

/// Convert radians to degrees
#[inline]
pub fn to_degrees(radians: f64) -> f64 {
    radians * 180.0 / PI
}

/// Haversine distance between two points in miles.
///
/// Identical points give exactly zero. The haversine term is clamped to
/// `[0, 1]` so rounding near antipodal points cannot produce NaN.
pub fn distance_miles(a: GeoPoint, b: GeoPoint) -> f64 {
    if a == b {
        return 0.0;
    }

    let lat1 = to_radians(a.latitude);
    let lat2 = to_radians(b.latitude);
    let delta_lat = lat2 - lat1;
    let delta_lon = to_radians(b.longitude) - to_radians(a.longitude);

    let h = (delta_lat / 2.0).sin().powi(2)
        + lat1.cos() * lat2.cos() * (delta_lon / 2.0).sin().powi(2);
    let h = h.clamp(0.0, 1.0);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_MILES * c
}

/// Initial compass bearing from `from` to `to`, degrees in `(-180, 180]`.
///
/// Coincident points have no direction; they return 0.
pub fn bearing_degrees(from: GeoPoint, to: GeoPoint) -> f64 {
    if from == to {
        return 0.0;
    }

    let lat1 = to_radians(from.latitude);
    let lat2 = to_radians(to.latitude);
    let delta_lon = to_radians(to.longitude) - to_radians(from.longitude);

    let y = delta_lon.sin() * lat2.cos();
    let x = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * delta_lon.cos();

    normalize_bearing(to_degrees(y.atan2(x)))
}

/// Fold any angle in degrees into `(-180, 180]`
pub fn normalize_bearing(degrees: f64) -> f64 {
    let mut wrapped = degrees % 360.0;
    if wrapped > 180.0 {
        wrapped -= 360.0;
    } else if wrapped <= -180.0 {
        wrapped += 360.0;
    }
    wrapped
}
