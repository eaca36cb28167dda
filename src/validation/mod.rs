//! Dataset validation and error taxonomy

pub mod error;
pub mod record;

pub use error::{ConfigError, DatasetError, EngineError, RecordError, RecordFault};
pub use record::{validate_record, RecordValidator, ValidationReport};
