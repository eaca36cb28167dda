//! Core types and constants for building anchoring

pub mod types;
pub mod constants;

pub use types::*;
pub use constants::*;
