//! Geodesy and scene placement

pub mod geodesy;
pub mod anchor;

pub use geodesy::{bearing_degrees, distance_miles, to_degrees, to_radians};
pub use anchor::{compute_anchor, AnchorTransform};
