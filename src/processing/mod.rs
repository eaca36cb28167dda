//! Proximity state tracking and the data it feeds to the overlay

pub mod proximity;
pub mod crossfade;
pub mod dataset;
pub mod scene;

pub use proximity::{AnchorUpdate, ProximityEngine, StateCounts, UpdateOutcome};
pub use crossfade::CrossfadePlan;
pub use dataset::{parse_buildings_json, DatasetCache};
pub use scene::SceneNode;
