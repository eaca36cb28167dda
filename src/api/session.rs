//! Callback-driven tour session
//!
//! Glues the location stream, the buildings dataset and the proximity engine
//! together and forwards results to the overlay and enrichment collaborators.
//! Callbacks run synchronously on the thread that delivered the location
//! sample; marshalling onto a render thread is the callback's job.

use crate::core::{BuildingId, BuildingRecord, GeoPoint, TrackedBuilding, TransitionEvent};
use crate::processing::crossfade::CrossfadePlan;
use crate::processing::dataset::{parse_buildings_json, DatasetCache};
use crate::processing::proximity::{ProximityEngine, UpdateOutcome};
use crate::utils::config::EngineConfig;
use crate::validation::error::{ConfigError, DatasetError, EngineError};
use std::collections::BTreeMap;
use tracing::{info, warn};

/// Request to fetch descriptive content for a building that entered `Detail`
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichmentRequest {
    pub building_id: BuildingId,
    pub display_name: String,
    pub image_url: Option<String>,
    pub description_url: Option<String>,
}

/// Callback receiving each transition together with its fade plan
pub type OverlayCallback = Box<dyn Fn(&TransitionEvent, &CrossfadePlan) + Send>;

/// Callback receiving enrichment requests
pub type EnrichmentCallback = Box<dyn Fn(&EnrichmentRequest) + Send>;

/// Callback registration handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CallbackHandle(u32);

impl CallbackHandle {
    pub fn id(&self) -> u32 {
        self.0
    }
}

/// A running AR tour: one location stream, one dataset, one engine
pub struct TourSession {
    engine: ProximityEngine,
    records: Vec<BuildingRecord>,
    heading_deg: Option<f64>,
    last_location: Option<GeoPoint>,
    callback_counter: u32,
    overlay_callbacks: BTreeMap<CallbackHandle, OverlayCallback>,
    enrichment_callbacks: BTreeMap<CallbackHandle, EnrichmentCallback>,
}

impl TourSession {
    pub fn new(config: EngineConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            engine: ProximityEngine::with_config(config)?,
            records: Vec::new(),
            heading_deg: None,
            last_location: None,
            callback_counter: 0,
            overlay_callbacks: BTreeMap::new(),
            enrichment_callbacks: BTreeMap::new(),
        })
    }

    pub fn engine(&self) -> &ProximityEngine {
        &self.engine
    }

    pub fn heading(&self) -> Option<f64> {
        self.heading_deg
    }

    pub fn last_location(&self) -> Option<GeoPoint> {
        self.last_location
    }

    /// Replace the dataset used by subsequent location updates.
    ///
    /// Buildings missing from the new dataset stop being tracked; visible
    /// ones are reported to the overlay as `→ Hidden` and returned.
    pub fn load_dataset(&mut self, records: Vec<BuildingRecord>) -> Vec<TransitionEvent> {
        info!(count = records.len(), "buildings dataset loaded");
        let retired = self.engine.retain_dataset(&records);
        self.records = records;
        self.dispatch(&retired);
        retired
    }

    /// Parse and load dataset JSON, returning the number of entries
    pub fn load_dataset_json(&mut self, json: &str) -> Result<usize, DatasetError> {
        let records = parse_buildings_json(json)?;
        let count = records.len();
        self.load_dataset(records);
        Ok(count)
    }

    /// Load the dataset from the cache; `false` when nothing is cached
    pub fn load_from_cache(&mut self, cache: &DatasetCache) -> Result<bool, DatasetError> {
        match cache.load_records()? {
            Some(records) => {
                self.load_dataset(records);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub fn register_overlay_callback(&mut self, callback: OverlayCallback) -> CallbackHandle {
        let handle = self.next_handle();
        self.overlay_callbacks.insert(handle, callback);
        handle
    }

    pub fn register_enrichment_callback(&mut self, callback: EnrichmentCallback) -> CallbackHandle {
        let handle = self.next_handle();
        self.enrichment_callbacks.insert(handle, callback);
        handle
    }

    pub fn unregister_callback(&mut self, handle: CallbackHandle) -> Result<(), EngineError> {
        let removed = self.overlay_callbacks.remove(&handle).is_some()
            || self.enrichment_callbacks.remove(&handle).is_some();

        if removed {
            Ok(())
        } else {
            Err(EngineError::UnknownCallback { handle: handle.id() })
        }
    }

    fn next_handle(&mut self) -> CallbackHandle {
        self.callback_counter += 1;
        CallbackHandle(self.callback_counter)
    }

    /// Record a compass heading; non-finite readings are ignored
    pub fn on_heading(&mut self, heading_deg: f64) {
        if !heading_deg.is_finite() {
            warn!(heading_deg, "ignoring non-finite heading");
            return;
        }
        if self.heading_deg.is_none() {
            info!(heading_deg, "first heading received, location updates enabled");
        }
        self.heading_deg = Some(heading_deg);
    }

    /// Run a proximity update for a new fix and notify collaborators.
    ///
    /// Before the first heading this returns [`EngineError::StaleHeading`]
    /// and leaves every building untouched.
    pub fn on_location(&mut self, location: GeoPoint) -> Result<UpdateOutcome, EngineError> {
        let outcome = self.engine.update(location, self.heading_deg, &self.records)?;
        self.last_location = Some(location);
        self.dispatch(&outcome.events);
        Ok(outcome)
    }

    fn dispatch(&self, events: &[TransitionEvent]) {
        for event in events {
            let plan = CrossfadePlan::for_event(event, self.engine.config());
            for callback in self.overlay_callbacks.values() {
                callback(event, &plan);
            }

            if event.entered_detail() {
                if let Some(request) = self.enrichment_for(&event.building_id) {
                    for callback in self.enrichment_callbacks.values() {
                        callback(&request);
                    }
                }
            }
        }
    }

    fn enrichment_for(&self, id: &BuildingId) -> Option<EnrichmentRequest> {
        let tracked = self.engine.snapshot(id)?;
        let building = tracked.building();
        Some(EnrichmentRequest {
            building_id: building.id.clone(),
            display_name: building.display_name.clone(),
            image_url: building.image_url.clone(),
            description_url: building.description_url.clone(),
        })
    }

    /// Building behind a tapped scene node
    pub fn resolve_tap(&self, node_name: &str) -> Option<TrackedBuilding> {
        self.engine.resolve_tap(node_name)
    }

    /// Stop the session: forget heading, location and tracked buildings.
    /// The dataset and callbacks stay registered for a restart.
    pub fn stop(&mut self) {
        info!(tracked = self.engine.tracked_count(), "tour session stopped");
        self.heading_deg = None;
        self.last_location = None;
        self.engine.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::DisplayState;
    use std::sync::{Arc, Mutex};

    const DATASET: &str = r#"[
        { "id": "burruss", "name": "Burruss Hall", "latitude": 37.2280, "longitude": -80.4239,
          "imageUrl": "http://example.edu/burruss.jpg" },
        { "name": "No Latitude Hall", "longitude": -80.4200 }
    ]"#;

    const FAR: GeoPoint = GeoPoint::new(37.2296, -80.4139);
    const NEAR: GeoPoint = GeoPoint::new(37.2280, -80.4212);
    const CLOSE: GeoPoint = GeoPoint::new(37.2280, -80.4225);

    fn session() -> TourSession {
        let mut session = TourSession::new(EngineConfig::default()).unwrap();
        session.load_dataset_json(DATASET).unwrap();
        session
    }

    #[test]
    fn test_location_before_heading_is_refused() {
        let mut session = session();
        assert_eq!(session.on_location(CLOSE).unwrap_err(), EngineError::StaleHeading);
        assert_eq!(session.engine().tracked_count(), 0);
        assert_eq!(session.last_location(), None);

        session.on_heading(f64::NAN);
        assert_eq!(session.heading(), None);

        session.on_heading(90.0);
        let outcome = session.on_location(CLOSE).unwrap();
        assert_eq!(outcome.events.len(), 1);
        assert_eq!(outcome.rejected.len(), 1);
    }

    #[test]
    fn test_callbacks_receive_transitions_and_enrichment() {
        let mut session = session();
        let overlay_log: Arc<Mutex<Vec<(DisplayState, DisplayState, bool)>>> = Arc::default();
        let enrichment_log: Arc<Mutex<Vec<EnrichmentRequest>>> = Arc::default();

        let log = Arc::clone(&overlay_log);
        session.register_overlay_callback(Box::new(move |event, plan| {
            log.lock().unwrap().push((event.old_state, event.new_state, plan.is_crossfade()));
        }));
        let log = Arc::clone(&enrichment_log);
        session.register_enrichment_callback(Box::new(move |request| {
            log.lock().unwrap().push(request.clone());
        }));

        session.on_heading(0.0);
        session.on_location(FAR).unwrap();
        session.on_location(NEAR).unwrap();
        session.on_location(CLOSE).unwrap();
        session.on_location(CLOSE).unwrap();

        assert_eq!(
            *overlay_log.lock().unwrap(),
            vec![
                (DisplayState::Hidden, DisplayState::Label, false),
                (DisplayState::Label, DisplayState::Detail, true),
            ]
        );

        let requests = enrichment_log.lock().unwrap();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].building_id, BuildingId::new("burruss"));
        assert_eq!(requests[0].image_url.as_deref(), Some("http://example.edu/burruss.jpg"));
        assert_eq!(requests[0].description_url, None);
    }

    #[test]
    fn test_unregister_callback() {
        let mut session = session();
        let handle = session.register_overlay_callback(Box::new(|_, _| {}));
        assert!(session.unregister_callback(handle).is_ok());
        assert_eq!(
            session.unregister_callback(handle),
            Err(EngineError::UnknownCallback { handle: handle.id() })
        );
    }

    #[test]
    fn test_tap_and_stop() {
        let mut session = session();
        session.on_heading(10.0);
        session.on_location(NEAR).unwrap();
        assert_eq!(
            session.resolve_tap("burruss").map(|t| t.building().display_name.clone()),
            Some("Burruss Hall".to_string())
        );

        session.stop();
        assert!(session.resolve_tap("burruss").is_none());
        assert_eq!(session.on_location(NEAR).unwrap_err(), EngineError::StaleHeading);
    }

    #[test]
    fn test_reloading_dataset_hides_dropped_buildings() {
        let mut session = session();
        let overlay_log: Arc<Mutex<Vec<(DisplayState, DisplayState, Option<String>)>>> = Arc::default();
        let log = Arc::clone(&overlay_log);
        session.register_overlay_callback(Box::new(move |event, plan| {
            log.lock().unwrap().push((event.old_state, event.new_state, plan.fade_out.as_ref().map(ToString::to_string)));
        }));

        session.on_heading(0.0);
        session.on_location(CLOSE).unwrap();

        let retired = session.load_dataset(Vec::new());
        assert_eq!(retired.len(), 1);
        assert_eq!(session.engine().state_of(&"burruss".into()), None);
        assert_eq!(session.engine().counts().total(), 0);

        let outcome = session.on_location(FAR).unwrap();
        assert!(outcome.events.is_empty());
        assert_eq!(
            *overlay_log.lock().unwrap(),
            vec![
                (DisplayState::Hidden, DisplayState::Detail, None),
                (DisplayState::Detail, DisplayState::Hidden, Some("burruss-detailsNode".to_string())),
            ]
        );
    }

    #[test]
    fn test_load_from_cache() {
        let dir = tempfile::tempdir().unwrap();
        let cache = DatasetCache::new(dir.path(), "VTBuildings.plist");
        let mut session = TourSession::new(EngineConfig::default()).unwrap();

        assert!(!session.load_from_cache(&cache).unwrap());

        cache.write(DATASET).unwrap();
        assert!(session.load_from_cache(&cache).unwrap());
        session.on_heading(0.0);
        assert_eq!(session.on_location(CLOSE).unwrap().anchors.len(), 1);
    }
}
