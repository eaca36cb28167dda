//! Distance-banded display state machine for tracked buildings
//!
//! Each location update re-derives every building's state from scratch:
//!
//! - distance `>= visibility radius` is `Hidden`
//! - distance `<= detail radius` is `Detail`
//! - anything in between is `Label`
//!
//! A change of state produces a [`TransitionEvent`]; an unchanged state
//! produces nothing, although the stored anchor is still refreshed. The only
//! compound transition is a building already tracked as `Hidden` jumping
//! straight into the detail radius, which is reported as `Hidden → Label`
//! followed by `Label → Detail`. On first observation a building may go
//! straight to `Detail`; a building first seen out of range is tracked silently.
//!
//! The engine takes `&mut self` for every update: there is exactly one writer
//! and callers must serialize location updates.

use crate::algorithms::anchor::{compute_anchor, AnchorTransform};
use crate::algorithms::geodesy::{bearing_degrees, distance_miles};
use crate::core::{Building, BuildingId, BuildingRecord, DisplayState, GeoPoint, TrackedBuilding, TransitionEvent};
use crate::processing::scene::SceneNode;
use crate::utils::config::EngineConfig;
use crate::validation::error::{ConfigError, EngineError, RecordError, RecordFault};
use crate::validation::record::{validate_record, RecordValidator};
use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};
use tracing::{debug, trace, warn};

/// Refreshed placement of one building after an update
#[derive(Debug, Clone, PartialEq)]
pub struct AnchorUpdate {
    pub building_id: BuildingId,
    pub state: DisplayState,
    pub distance_miles: f64,
    pub anchor: AnchorTransform,
}

/// Everything one call to [`ProximityEngine::update`] produced
#[derive(Debug, Clone, Default)]
pub struct UpdateOutcome {
    /// State changes, in input order
    pub events: Vec<TransitionEvent>,
    /// Current anchor of every accepted building, in input order
    pub anchors: Vec<AnchorUpdate>,
    /// Entries skipped because they failed validation
    pub rejected: Vec<RecordError>,
}

impl UpdateOutcome {
    pub fn is_quiet(&self) -> bool {
        self.events.is_empty()
    }
}

/// How many tracked buildings are in each state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StateCounts {
    pub hidden: usize,
    pub label: usize,
    pub detail: usize,
}

impl StateCounts {
    pub fn total(&self) -> usize {
        self.hidden + self.label + self.detail
    }
}

/// Owner of every tracked building and sole writer of display state
#[derive(Debug)]
pub struct ProximityEngine {
    config: EngineConfig,
    tracked: HashMap<BuildingId, TrackedBuilding>,
    validator: RecordValidator,
    reported: HashSet<RejectionKey>,
}

/// Identity of a rejection for log throttling: the entry's id, or its
/// position when it has none
type RejectionKey = (Option<BuildingId>, Option<usize>, RecordFault);

impl Default for ProximityEngine {
    fn default() -> Self {
        Self {
            config: EngineConfig::default(),
            tracked: HashMap::new(),
            validator: RecordValidator::new(),
            reported: HashSet::new(),
        }
    }
}

impl ProximityEngine {
    /// Engine with the default radii
    pub fn new() -> Self {
        Self::default()
    }

    /// Engine with a validated custom configuration
    pub fn with_config(config: EngineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            ..Self::default()
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Process one location sample against a batch of dataset entries.
    ///
    /// Without a finite heading nothing is processed and no state changes.
    /// Malformed entries are reported in [`UpdateOutcome::rejected`] and the
    /// rest of the batch proceeds normally.
    pub fn update(
        &mut self,
        user: GeoPoint,
        heading_deg: Option<f64>,
        records: &[BuildingRecord],
    ) -> Result<UpdateOutcome, EngineError> {
        let heading_deg = match heading_deg {
            Some(heading) if heading.is_finite() => heading,
            _ => return Err(EngineError::StaleHeading),
        };
        if !user.is_valid() {
            return Err(EngineError::InvalidLocation {
                latitude: user.latitude,
                longitude: user.longitude,
            });
        }

        trace!(%user, heading_deg, count = records.len(), "proximity update");

        let mut outcome = UpdateOutcome::default();
        self.validator.reset();

        for (index, record) in records.iter().enumerate() {
            match self.validator.validate(index, record) {
                Ok(building) => self.observe(user, heading_deg, building, &mut outcome),
                Err(err) => {
                    if self.note_rejection(&err) {
                        warn!(error = %err, "skipping building record");
                    } else {
                        debug!(error = %err, "skipping building record");
                    }
                    outcome.rejected.push(err);
                }
            }
        }

        Ok(outcome)
    }

    /// [`update`](Self::update) for already-validated buildings
    pub fn update_buildings(
        &mut self,
        user: GeoPoint,
        heading_deg: Option<f64>,
        buildings: &[Building],
    ) -> Result<UpdateOutcome, EngineError> {
        let records: Vec<BuildingRecord> = buildings.iter().map(BuildingRecord::from).collect();
        self.update(user, heading_deg, &records)
    }

    /// `true` the first time this rejection is seen since the last reset
    fn note_rejection(&mut self, err: &RecordError) -> bool {
        let position = if err.id.is_none() { Some(err.index) } else { None };
        self.reported.insert((err.id.clone(), position, err.fault))
    }

    fn observe(&mut self, user: GeoPoint, heading_deg: f64, building: Building, outcome: &mut UpdateOutcome) {
        let distance = distance_miles(user, building.location);
        let bearing = bearing_degrees(user, building.location);
        let anchor = compute_anchor(user, heading_deg, building.location);
        let new_state = DisplayState::for_distance(
            distance,
            self.config.visibility_radius_miles,
            self.config.detail_radius_miles,
        );

        let id = building.id.clone();
        let (tracked, first_sighting) = match self.tracked.entry(id.clone()) {
            Entry::Occupied(entry) => (entry.into_mut(), false),
            Entry::Vacant(entry) => (entry.insert(TrackedBuilding::new(building.clone())), true),
        };
        tracked.refresh(building, distance, bearing, anchor);

        let old_state = tracked.state();
        if new_state != old_state {
            let mut emit = |from: DisplayState, to: DisplayState| {
                debug!(building = %id, %from, %to, distance_miles = distance, "display state transition");
                outcome.events.push(TransitionEvent {
                    building_id: id.clone(),
                    old_state: from,
                    new_state: to,
                    anchor,
                });
            };

            if !first_sighting && old_state == DisplayState::Hidden && new_state == DisplayState::Detail {
                emit(DisplayState::Hidden, DisplayState::Label);
                emit(DisplayState::Label, DisplayState::Detail);
            } else {
                emit(old_state, new_state);
            }
            tracked.set_state(new_state);
        }

        outcome.anchors.push(AnchorUpdate {
            building_id: id,
            state: new_state,
            distance_miles: distance,
            anchor,
        });
    }

    /// Current state of a building, if it has ever been observed
    pub fn state_of(&self, id: &BuildingId) -> Option<DisplayState> {
        self.tracked.get(id).map(TrackedBuilding::state)
    }

    /// Snapshot of a tracked building
    pub fn snapshot(&self, id: &BuildingId) -> Option<TrackedBuilding> {
        self.tracked.get(id).cloned()
    }

    pub fn tracked_count(&self) -> usize {
        self.tracked.len()
    }

    /// Partition of tracked buildings by state
    pub fn counts(&self) -> StateCounts {
        self.tracked.values().fold(StateCounts::default(), |mut counts, tracked| {
            match tracked.state() {
                DisplayState::Hidden => counts.hidden += 1,
                DisplayState::Label => counts.label += 1,
                DisplayState::Detail => counts.detail += 1,
            }
            counts
        })
    }

    /// Building behind a tapped scene node.
    ///
    /// Only resolves when the node matches what the engine currently shows
    /// for that building.
    pub fn resolve_tap(&self, node_name: &str) -> Option<TrackedBuilding> {
        let node = SceneNode::parse(node_name)?;
        let tracked = self.tracked.get(node.building_id())?;
        let expected = match &node {
            SceneNode::Label(_) => DisplayState::Label,
            SceneNode::Detail(_) => DisplayState::Detail,
        };
        (tracked.state() == expected).then(|| tracked.clone())
    }

    /// Stop tracking buildings that are not part of a replacement dataset.
    ///
    /// Every retired building that was visible yields a `→ Hidden` event so
    /// the overlay can remove its node; hidden ones are dropped silently.
    /// Entries of the new dataset that fail validation do not keep a building
    /// alive.
    pub fn retain_dataset(&mut self, records: &[BuildingRecord]) -> Vec<TransitionEvent> {
        let keep: HashSet<BuildingId> = records
            .iter()
            .enumerate()
            .filter_map(|(index, record)| validate_record(index, record).ok())
            .map(|building| building.id)
            .collect();

        let mut retired: Vec<BuildingId> = self.tracked.keys().filter(|id| !keep.contains(*id)).cloned().collect();
        retired.sort();

        let mut events = Vec::new();
        for id in retired {
            let Some(tracked) = self.tracked.remove(&id) else {
                continue;
            };
            if tracked.state().is_visible() {
                debug!(building = %id, from = %tracked.state(), "building left the dataset");
                events.push(TransitionEvent {
                    building_id: id,
                    old_state: tracked.state(),
                    new_state: DisplayState::Hidden,
                    anchor: *tracked.anchor(),
                });
            }
        }
        self.reported.clear();
        events
    }

    /// Drop all tracked buildings, e.g. when the AR view is torn down
    pub fn reset(&mut self) {
        self.tracked.clear();
        self.reported.clear();
    }
}
