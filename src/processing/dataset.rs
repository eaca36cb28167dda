//! Buildings dataset parsing and the on-disk dataset cache
//!
//! The dataset is a JSON array of objects:
//!
//! ```json
//! [{ "name": "Burruss Hall", "latitude": 37.228, "longitude": -80.4239,
//!    "imageUrl": "...", "descriptionUrl": "..." }]
//! ```
//!
//! Entries are read leniently: a field of the wrong type is treated as absent
//! so that validation can reject that entry alone.

use crate::core::BuildingRecord;
use crate::validation::error::DatasetError;
use serde_json::Value;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Parse dataset JSON text into raw records
pub fn parse_buildings_json(json: &str) -> Result<Vec<BuildingRecord>, DatasetError> {
    let value: Value = serde_json::from_str(json)?;
    match value {
        Value::Array(entries) => Ok(entries.iter().map(record_from_value).collect()),
        other => Err(DatasetError::NotAnArray { found: json_kind(&other) }),
    }
}

/// Serialize records back to dataset JSON
pub fn to_buildings_json(records: &[BuildingRecord]) -> Result<String, DatasetError> {
    Ok(serde_json::to_string_pretty(records)?)
}

fn record_from_value(entry: &Value) -> BuildingRecord {
    let text = |key: &str| entry.get(key).and_then(Value::as_str).map(str::to_string);
    let number = |key: &str| entry.get(key).and_then(Value::as_f64);

    BuildingRecord {
        id: text("id"),
        name: text("name"),
        latitude: number("latitude"),
        longitude: number("longitude"),
        image_url: text("imageUrl"),
        description_url: text("descriptionUrl"),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Dataset cache stored under a fixed file name in a directory
#[derive(Debug, Clone)]
pub struct DatasetCache {
    path: PathBuf,
}

impl DatasetCache {
    pub fn new<P: AsRef<Path>>(directory: P, file_name: &str) -> Self {
        Self {
            path: directory.as_ref().join(file_name),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Cached dataset text, or `None` when nothing has been cached yet
    pub fn read(&self) -> Result<Option<String>, DatasetError> {
        match fs::read_to_string(&self.path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no cached buildings dataset");
                Ok(None)
            }
            Err(source) => Err(self.io_error(source)),
        }
    }

    /// Replace the cached dataset; readers never see a partial file
    pub fn write(&self, json: &str) -> Result<(), DatasetError> {
        let staging = self.staging_path();
        fs::write(&staging, json).map_err(|source| self.io_error(source))?;
        fs::rename(&staging, &self.path).map_err(|source| self.io_error(source))?;
        info!(path = %self.path.display(), bytes = json.len(), "cached buildings dataset");
        Ok(())
    }

    /// Cached records, or `None` when nothing has been cached yet
    pub fn load_records(&self) -> Result<Option<Vec<BuildingRecord>>, DatasetError> {
        self.read()?.map(|json| parse_buildings_json(&json)).transpose()
    }

    /// Cache the given records
    pub fn store_records(&self, records: &[BuildingRecord]) -> Result<(), DatasetError> {
        self.write(&to_buildings_json(records)?)
    }

    /// Sibling file written before the rename; never equal to the cache path
    fn staging_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_owned();
        name.push(".partial");
        PathBuf::from(name)
    }

    fn io_error(&self, source: std::io::Error) -> DatasetError {
        DatasetError::Cache {
            path: self.path.clone(),
            source,
        }
    }
}
