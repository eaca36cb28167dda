//! Placement of geographic targets in the AR session's local frame
//!
//! The session frame is assumed gravity- and heading-aligned: +Y is up, -Z
//! points north and +X points east, in meters. The AR session collaborator
//! must configure that alignment before anchors from this module are used;
//! under any other alignment north-relative bearings do not map onto the
//! scene.

use crate::algorithms::geodesy::{bearing_degrees, distance_miles, to_radians};
use crate::core::{GeoPoint, METERS_PER_MILE};
use nalgebra::{Matrix4, Point3, Rotation3, Translation3, Vector3};

/// Rigid transform locating a building relative to the session origin
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnchorTransform {
    matrix: Matrix4<f64>,
}

impl AnchorTransform {
    pub fn identity() -> Self {
        Self { matrix: Matrix4::identity() }
    }

    /// Anchor `distance_miles` away along `bearing_deg` (clockwise from north).
    ///
    /// Translates to `-distance` on Z, then rotates about Y by `-bearing` so a
    /// positive bearing swings the target clockwise seen from above.
    pub fn from_polar(distance_miles: f64, bearing_deg: f64) -> Self {
        let distance_m = distance_miles * METERS_PER_MILE;

        let translation = Translation3::new(0.0, 0.0, -distance_m).to_homogeneous();
        let rotation = Rotation3::from_axis_angle(&Vector3::y_axis(), to_radians(-bearing_deg)).to_homogeneous();
        let origin = Matrix4::<f64>::identity();

        Self { matrix: origin * (rotation * translation) }
    }

    pub fn matrix(&self) -> &Matrix4<f64> {
        &self.matrix
    }

    /// Translation component; the only part consumers may rely on
    pub fn position(&self) -> Point3<f64> {
        Point3::new(self.matrix[(0, 3)], self.matrix[(1, 3)], self.matrix[(2, 3)])
    }

    /// Horizontal distance from the session origin in meters
    pub fn ground_distance_m(&self) -> f64 {
        let p = self.position();
        (p.x * p.x + p.z * p.z).sqrt()
    }
}

impl Default for AnchorTransform {
    fn default() -> Self {
        Self::identity()
    }
}

/// Anchor for a building as seen from the user's current fix.
///
/// The heading only matters for the precondition that the session is
/// heading-aligned; in that frame it does not rotate the result. Coincident
/// points give the identity transform.
pub fn compute_anchor(user: GeoPoint, _user_heading_deg: f64, building: GeoPoint) -> AnchorTransform {
    AnchorTransform::from_polar(distance_miles(user, building), bearing_degrees(user, building))
}
