//! Session API for the location, overlay and enrichment collaborators

pub mod session;

pub use session::{
    CallbackHandle, EnrichmentCallback, EnrichmentRequest, OverlayCallback, TourSession,
};
