//! Scene node naming shared with the overlay collaborator
//!
//! A building's label node is named after its id and its detail card after the
//! id plus [`DETAIL_NODE_SUFFIX`]. Names only ever flow from engine state to
//! the scene; tapping a node resolves back through the engine, never through
//! the scene graph.

use crate::core::{BuildingId, DisplayState, DETAIL_NODE_SUFFIX};
use std::fmt;

/// One visual representation of a building in the scene
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SceneNode {
    Label(BuildingId),
    Detail(BuildingId),
}

impl SceneNode {
    /// Parse a node name produced by [`SceneNode`]'s `Display`
    pub fn parse(name: &str) -> Option<Self> {
        if name.is_empty() {
            return None;
        }
        match name.strip_suffix(DETAIL_NODE_SUFFIX) {
            Some("") => None,
            Some(id) => Some(SceneNode::Detail(BuildingId::new(id))),
            None => Some(SceneNode::Label(BuildingId::new(name))),
        }
    }

    /// Node showing `state`, if the state has a visual
    pub fn for_state(id: &BuildingId, state: DisplayState) -> Option<Self> {
        match state {
            DisplayState::Hidden => None,
            DisplayState::Label => Some(SceneNode::Label(id.clone())),
            DisplayState::Detail => Some(SceneNode::Detail(id.clone())),
        }
    }

    pub fn building_id(&self) -> &BuildingId {
        match self {
            SceneNode::Label(id) | SceneNode::Detail(id) => id,
        }
    }
}

impl fmt::Display for SceneNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SceneNode::Label(id) => write!(f, "{}", id),
            SceneNode::Detail(id) => write!(f, "{}{}", id, DETAIL_NODE_SUFFIX),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_names() {
        let id = BuildingId::new("Burruss Hall");
        assert_eq!(SceneNode::Label(id.clone()).to_string(), "Burruss Hall");
        assert_eq!(SceneNode::Detail(id.clone()).to_string(), "Burruss Hall-detailsNode");
    }

    #[test]
    fn test_parse_node_names() {
        assert_eq!(
            SceneNode::parse("Burruss Hall-detailsNode"),
            Some(SceneNode::Detail(BuildingId::new("Burruss Hall")))
        );
        assert_eq!(SceneNode::parse("torg"), Some(SceneNode::Label(BuildingId::new("torg"))));
        assert_eq!(SceneNode::parse("-detailsNode"), None);
        assert_eq!(SceneNode::parse(""), None);
    }

    #[test]
    fn test_hidden_has_no_node() {
        let id = BuildingId::new("a");
        assert_eq!(SceneNode::for_state(&id, DisplayState::Hidden), None);
        assert_eq!(SceneNode::for_state(&id, DisplayState::Detail), Some(SceneNode::Detail(id)));
    }
}
