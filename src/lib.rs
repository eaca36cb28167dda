//! Campus AR Tour Anchoring
//!
//! Geospatial anchoring and proximity state for an augmented-reality campus
//! tour: places buildings in a gravity- and heading-aligned AR frame relative
//! to the user and decides, per building, whether a label, a detail card or
//! nothing is shown as the user walks around.

pub mod core;
pub mod algorithms;
pub mod processing;
pub mod validation;
pub mod utils;
pub mod api;

// Re-export commonly used types
pub use crate::core::{Building, BuildingId, BuildingRecord, DisplayState, GeoPoint, TrackedBuilding, TransitionEvent};
pub use crate::algorithms::{bearing_degrees, compute_anchor, distance_miles, AnchorTransform};
pub use crate::processing::{AnchorUpdate, CrossfadePlan, DatasetCache, ProximityEngine, SceneNode, StateCounts, UpdateOutcome};
pub use crate::validation::{ConfigError, DatasetError, EngineError, RecordError, RecordFault};
pub use crate::utils::EngineConfig;
pub use crate::api::{CallbackHandle, EnrichmentRequest, TourSession};
