use crate::core::{Building, BuildingId, BuildingRecord, GeoPoint, DETAIL_NODE_SUFFIX};
use crate::validation::error::{RecordError, RecordFault};
use std::collections::HashSet;
use tracing::debug;

/// Result of validating a whole batch of dataset entries
#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    /// Accepted buildings with their original input positions
    pub accepted: Vec<(usize, Building)>,
    pub rejected: Vec<RecordError>,
}

/// Validator turning raw dataset entries into buildings.
///
/// Tracks identifiers seen in the current batch so a repeated id is rejected
/// instead of silently overwriting the earlier entry.
#[derive(Debug, Default)]
pub struct RecordValidator {
    seen: HashSet<BuildingId>,
}

impl RecordValidator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget identifiers from the previous batch
    pub fn reset(&mut self) {
        self.seen.clear();
    }

    /// Validate one entry at `index` of the current batch
    pub fn validate(&mut self, index: usize, record: &BuildingRecord) -> Result<Building, RecordError> {
        let building = validate_record(index, record)?;
        if !self.seen.insert(building.id.clone()) {
            return Err(RecordError {
                index,
                id: Some(building.id),
                fault: RecordFault::DuplicateIdentifier,
            });
        }
        Ok(building)
    }

    /// Validate a full batch, starting from a clean slate
    pub fn validate_batch(&mut self, records: &[BuildingRecord]) -> ValidationReport {
        self.reset();
        let mut report = ValidationReport::default();
        for (index, record) in records.iter().enumerate() {
            match self.validate(index, record) {
                Ok(building) => report.accepted.push((index, building)),
                Err(err) => report.rejected.push(err),
            }
        }
        report
    }
}

/// Check a single entry in isolation.
///
/// The id falls back to the display name for datasets that only carry names;
/// the name falls back to the id.
pub fn validate_record(index: usize, record: &BuildingRecord) -> Result<Building, RecordError> {
    let id = record
        .id
        .as_deref()
        .or(record.name.as_deref())
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(BuildingId::new);

    let reject = |fault| RecordError { index, id: id.clone(), fault };

    let Some(building_id) = id.clone() else {
        return Err(reject(RecordFault::MissingIdentifier));
    };
    if record.id.is_none() {
        debug!(index, id = %building_id, "building record has no id, using its name");
    }
    // Its label node name would read back as another building's detail card
    if building_id.as_str().ends_with(DETAIL_NODE_SUFFIX) {
        return Err(reject(RecordFault::ReservedIdentifier));
    }

    let latitude = record.latitude.ok_or_else(|| reject(RecordFault::MissingLatitude))?;
    let longitude = record.longitude.ok_or_else(|| reject(RecordFault::MissingLongitude))?;

    if !latitude.is_finite() || !longitude.is_finite() {
        return Err(reject(RecordFault::NonFiniteCoordinate));
    }
    if !(-90.0..=90.0).contains(&latitude) {
        return Err(reject(RecordFault::LatitudeOutOfRange));
    }
    if !(-180.0..=180.0).contains(&longitude) {
        return Err(reject(RecordFault::LongitudeOutOfRange));
    }

    let display_name = record
        .name
        .clone()
        .filter(|name| !name.trim().is_empty())
        .unwrap_or_else(|| building_id.to_string());

    Ok(Building {
        id: building_id,
        location: GeoPoint::new(latitude, longitude),
        display_name,
        image_url: record.image_url.clone(),
        description_url: record.description_url.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: Option<&str>, name: Option<&str>, lat: Option<f64>, lon: Option<f64>) -> BuildingRecord {
        BuildingRecord {
            id: id.map(String::from),
            name: name.map(String::from),
            latitude: lat,
            longitude: lon,
            ..Default::default()
        }
    }

    #[test]
    fn test_valid_record() {
        let building = validate_record(0, &record(Some("mcb"), Some("McBryde Hall"), Some(37.2305), Some(-80.4222))).unwrap();
        assert_eq!(building.id.as_str(), "mcb");
        assert_eq!(building.display_name, "McBryde Hall");
        assert_eq!(building.location, GeoPoint::new(37.2305, -80.4222));
    }

    #[test]
    fn test_name_used_as_id_fallback() {
        let building = validate_record(0, &record(None, Some("Burruss Hall"), Some(37.228), Some(-80.4239))).unwrap();
        assert_eq!(building.id.as_str(), "Burruss Hall");
        assert_eq!(building.display_name, "Burruss Hall");
    }

    #[test]
    fn test_missing_fields_are_reported() {
        let err = validate_record(4, &record(Some("a"), None, None, Some(1.0))).unwrap_err();
        assert_eq!(err.fault, RecordFault::MissingLatitude);
        assert_eq!(err.index, 4);
        assert_eq!(err.id, Some(BuildingId::new("a")));

        let err = validate_record(0, &record(Some("a"), None, Some(1.0), None)).unwrap_err();
        assert_eq!(err.fault, RecordFault::MissingLongitude);

        let err = validate_record(0, &record(None, Some("   "), Some(1.0), Some(1.0))).unwrap_err();
        assert_eq!(err.fault, RecordFault::MissingIdentifier);
    }

    #[test]
    fn test_out_of_range_and_non_finite() {
        let err = validate_record(0, &record(Some("a"), None, Some(95.0), Some(1.0))).unwrap_err();
        assert_eq!(err.fault, RecordFault::LatitudeOutOfRange);

        let err = validate_record(0, &record(Some("a"), None, Some(1.0), Some(-200.0))).unwrap_err();
        assert_eq!(err.fault, RecordFault::LongitudeOutOfRange);

        let err = validate_record(0, &record(Some("a"), None, Some(f64::NAN), Some(1.0))).unwrap_err();
        assert_eq!(err.fault, RecordFault::NonFiniteCoordinate);
    }

    #[test]
    fn test_id_with_detail_node_suffix_is_rejected() {
        let err = validate_record(2, &record(Some("lab-detailsNode"), None, Some(1.0), Some(1.0))).unwrap_err();
        assert_eq!(err.fault, RecordFault::ReservedIdentifier);

        let err = validate_record(0, &record(None, Some("Hall-detailsNode"), Some(1.0), Some(1.0))).unwrap_err();
        assert_eq!(err.fault, RecordFault::ReservedIdentifier);

        assert!(validate_record(0, &record(Some("detailsNode-lab"), None, Some(1.0), Some(1.0))).is_ok());
    }

    #[test]
    fn test_duplicate_ids_in_batch() {
        let mut validator = RecordValidator::new();
        let records = vec![
            record(Some("a"), None, Some(1.0), Some(1.0)),
            record(Some("b"), None, None, Some(1.0)),
            record(Some("a"), None, Some(2.0), Some(2.0)),
        ];
        let report = validator.validate_batch(&records);
        assert_eq!(report.accepted.len(), 1);
        assert_eq!(report.accepted[0].0, 0);
        assert_eq!(report.rejected.len(), 2);
        assert_eq!(report.rejected[1].fault, RecordFault::DuplicateIdentifier);
        assert_eq!(report.rejected[1].index, 2);

        // A new batch starts clean
        let report = validator.validate_batch(&records[..1]);
        assert_eq!(report.accepted.len(), 1);
    }
}
