//! Fade instructions for the overlay when a building changes state

use crate::core::TransitionEvent;
use crate::processing::scene::SceneNode;
use crate::utils::config::EngineConfig;

/// Which nodes to fade, for how long and to what opacity
#[derive(Debug, Clone, PartialEq)]
pub struct CrossfadePlan {
    pub fade_in: Option<SceneNode>,
    pub fade_out: Option<SceneNode>,
    pub duration_secs: f64,
    pub target_opacity: f64,
}

impl CrossfadePlan {
    pub fn for_event(event: &TransitionEvent, config: &EngineConfig) -> Self {
        Self {
            fade_in: SceneNode::for_state(&event.building_id, event.new_state),
            fade_out: SceneNode::for_state(&event.building_id, event.old_state),
            duration_secs: config.crossfade_duration_secs,
            target_opacity: config.detail_opacity,
        }
    }

    /// Both a node appears and another disappears
    pub fn is_crossfade(&self) -> bool {
        self.fade_in.is_some() && self.fade_out.is_some()
    }
}
