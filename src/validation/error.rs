use crate::core::BuildingId;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// Why a single dataset entry could not be tracked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RecordFault {
    MissingIdentifier,
    MissingLatitude,
    MissingLongitude,
    NonFiniteCoordinate,
    LatitudeOutOfRange,
    LongitudeOutOfRange,
    DuplicateIdentifier,
    ReservedIdentifier,
}

impl std::fmt::Display for RecordFault {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            RecordFault::MissingIdentifier => "no id or name",
            RecordFault::MissingLatitude => "missing latitude",
            RecordFault::MissingLongitude => "missing longitude",
            RecordFault::NonFiniteCoordinate => "coordinate is not a finite number",
            RecordFault::LatitudeOutOfRange => "latitude outside [-90, 90]",
            RecordFault::LongitudeOutOfRange => "longitude outside [-180, 180]",
            RecordFault::DuplicateIdentifier => "id already appeared earlier in the batch",
            RecordFault::ReservedIdentifier => "id ends with the detail node suffix",
        };
        f.write_str(text)
    }
}

/// A rejected dataset entry, reported without aborting the batch
#[derive(Debug, Clone, PartialEq, Error)]
#[error("building record #{index} ({}) rejected: {fault}", display_id(.id))]
pub struct RecordError {
    /// Position of the entry in the input sequence
    pub index: usize,
    pub id: Option<BuildingId>,
    pub fault: RecordFault,
}

fn display_id(id: &Option<BuildingId>) -> &str {
    id.as_ref().map(BuildingId::as_str).unwrap_or("<unnamed>")
}

/// Errors surfaced by the proximity engine and the tour session
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    #[error(transparent)]
    MalformedRecord(#[from] RecordError),

    #[error("no heading reading received yet; location update ignored")]
    StaleHeading,

    #[error("user location {latitude}, {longitude} is not a valid coordinate")]
    InvalidLocation { latitude: f64, longitude: f64 },

    #[error("no callback registered under handle {handle}")]
    UnknownCallback { handle: u32 },
}

/// Configuration validation and persistence errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("invalid value {value} for {parameter}: {reason}")]
    InvalidParameter {
        parameter: &'static str,
        value: f64,
        reason: &'static str,
    },

    #[error("detail radius {detail} mi exceeds visibility radius {visibility} mi")]
    RadiusOrder { detail: f64, visibility: f64 },

    #[error("cache file name must be a non-empty plain file name, got {name:?}")]
    InvalidCacheFileName { name: String },

    #[error("config I/O failed: {message}")]
    Io { message: String },

    #[error("config (de)serialization failed: {message}")]
    Serialization { message: String },
}

/// Buildings dataset parsing and cache errors
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("buildings dataset is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("buildings dataset must be a JSON array, found {found}")]
    NotAnArray { found: &'static str },

    #[error("cache I/O failed for {}: {source}", .path.display())]
    Cache {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
