//! Core data types for building anchoring

use crate::algorithms::anchor::AnchorTransform;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Geographic coordinate in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    /// Both components are finite and inside their valid ranges
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }
}

impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.6}, {:.6})", self.latitude, self.longitude)
    }
}

/// Stable building identifier, independent of the display name
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BuildingId(String);

impl BuildingId {
    pub fn new(id: impl Into<String>) -> Self {
        BuildingId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BuildingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for BuildingId {
    fn from(id: &str) -> Self {
        BuildingId::new(id)
    }
}

/// A validated building from the dataset
#[derive(Debug, Clone, PartialEq)]
pub struct Building {
    pub id: BuildingId,
    pub location: GeoPoint,
    pub display_name: String,
    pub image_url: Option<String>,
    pub description_url: Option<String>,
}

impl Building {
    pub fn new(id: impl Into<String>, display_name: impl Into<String>, location: GeoPoint) -> Self {
        Self {
            id: BuildingId::new(id),
            location,
            display_name: display_name.into(),
            image_url: None,
            description_url: None,
        }
    }

    pub fn with_image_url(mut self, url: impl Into<String>) -> Self {
        self.image_url = Some(url.into());
        self
    }

    pub fn with_description_url(mut self, url: impl Into<String>) -> Self {
        self.description_url = Some(url.into());
        self
    }
}

/// A building entry as it arrives from the dataset, before validation.
///
/// Every field is optional so that one bad entry can be rejected on its own
/// instead of failing the whole dataset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildingRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description_url: Option<String>,
}

impl From<&Building> for BuildingRecord {
    fn from(building: &Building) -> Self {
        Self {
            id: Some(building.id.as_str().to_string()),
            name: Some(building.display_name.clone()),
            latitude: Some(building.location.latitude),
            longitude: Some(building.location.longitude),
            image_url: building.image_url.clone(),
            description_url: building.description_url.clone(),
        }
    }
}

/// What, if anything, is shown for a building
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DisplayState {
    Hidden,
    Label,
    Detail,
}

impl DisplayState {
    /// Classify a distance against the two radii.
    ///
    /// Exactly at the visibility radius counts as out of range; exactly at the
    /// detail radius counts as detail.
    pub fn for_distance(distance_miles: f64, visibility_radius_miles: f64, detail_radius_miles: f64) -> Self {
        if distance_miles >= visibility_radius_miles {
            DisplayState::Hidden
        } else if distance_miles <= detail_radius_miles {
            DisplayState::Detail
        } else {
            DisplayState::Label
        }
    }

    pub fn is_visible(&self) -> bool {
        !matches!(self, DisplayState::Hidden)
    }
}

impl fmt::Display for DisplayState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DisplayState::Hidden => "hidden",
            DisplayState::Label => "label",
            DisplayState::Detail => "detail",
        };
        f.write_str(name)
    }
}

/// Engine-owned record of a building and its last computed placement
#[derive(Debug, Clone)]
pub struct TrackedBuilding {
    building: Building,
    distance_miles: f64,
    bearing_degrees: f64,
    anchor: AnchorTransform,
    state: DisplayState,
}

impl TrackedBuilding {
    pub(crate) fn new(building: Building) -> Self {
        Self {
            building,
            distance_miles: f64::INFINITY,
            bearing_degrees: 0.0,
            anchor: AnchorTransform::identity(),
            state: DisplayState::Hidden,
        }
    }

    pub(crate) fn refresh(&mut self, building: Building, distance_miles: f64, bearing_degrees: f64, anchor: AnchorTransform) {
        self.building = building;
        self.distance_miles = distance_miles;
        self.bearing_degrees = bearing_degrees;
        self.anchor = anchor;
    }

    pub(crate) fn set_state(&mut self, state: DisplayState) {
        self.state = state;
    }

    pub fn building(&self) -> &Building {
        &self.building
    }

    pub fn distance_miles(&self) -> f64 {
        self.distance_miles
    }

    pub fn bearing_degrees(&self) -> f64 {
        self.bearing_degrees
    }

    pub fn anchor(&self) -> &AnchorTransform {
        &self.anchor
    }

    pub fn state(&self) -> DisplayState {
        self.state
    }
}

/// A change of display state for one building
#[derive(Debug, Clone, PartialEq)]
pub struct TransitionEvent {
    pub building_id: BuildingId,
    pub old_state: DisplayState,
    pub new_state: DisplayState,
    pub anchor: AnchorTransform,
}

impl TransitionEvent {
    pub fn entered_detail(&self) -> bool {
        self.new_state == DisplayState::Detail && self.old_state != DisplayState::Detail
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_thresholds_are_inclusive_for_detail_only() {
        assert_eq!(DisplayState::for_distance(0.25, 0.25, 0.10), DisplayState::Hidden);
        assert_eq!(DisplayState::for_distance(0.2499, 0.25, 0.10), DisplayState::Label);
        assert_eq!(DisplayState::for_distance(0.10, 0.25, 0.10), DisplayState::Detail);
        assert_eq!(DisplayState::for_distance(0.1001, 0.25, 0.10), DisplayState::Label);
        assert_eq!(DisplayState::for_distance(0.0, 0.25, 0.10), DisplayState::Detail);
        assert_eq!(DisplayState::for_distance(f64::INFINITY, 0.25, 0.10), DisplayState::Hidden);
    }

    #[test]
    fn test_equal_radii_never_show_label() {
        assert_eq!(DisplayState::for_distance(0.2, 0.2, 0.2), DisplayState::Hidden);
        assert_eq!(DisplayState::for_distance(0.19, 0.2, 0.2), DisplayState::Detail);
    }

    #[test]
    fn test_geo_point_validity() {
        assert!(GeoPoint::new(37.2296, -80.4139).is_valid());
        assert!(!GeoPoint::new(91.0, 0.0).is_valid());
        assert!(!GeoPoint::new(0.0, -180.5).is_valid());
        assert!(!GeoPoint::new(f64::NAN, 0.0).is_valid());
    }

    #[test]
    fn test_record_from_building_round_trips_fields() {
        let building = Building::new("torg", "Torgersen Hall", GeoPoint::new(37.2297, -80.4200))
            .with_image_url("https://example.edu/torg.jpg");
        let record = BuildingRecord::from(&building);
        assert_eq!(record.id.as_deref(), Some("torg"));
        assert_eq!(record.name.as_deref(), Some("Torgersen Hall"));
        assert_eq!(record.latitude, Some(37.2297));
        assert_eq!(record.description_url, None);
    }
}
