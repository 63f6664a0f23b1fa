//! Errors at the edges of the simulation
//!
//! The per-frame path never fails; these cover catalog loading and the
//! player-triggered scan action.

use thiserror::Error;

/// Errors raised while building or querying the body catalog
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Catalog asset is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Duplicate body id '{0}'")]
    DuplicateId(String),
    #[error("Body '{0}' has non-finite geometry")]
    NonFinite(String),
    #[error("Asteroid belt '{id}' has an empty distance range [{min}, {max}]")]
    InvalidBelt { id: String, min: f32, max: f32 },
    #[error("Unknown body id '{0}'")]
    UnknownBody(String),
}

/// Reasons a scan request was refused
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScanError {
    #[error("No body is being tracked")]
    NothingTracked,
    #[error("'{id}' is {distance:.0} units away (scanner range {range:.0})")]
    OutOfRange { id: String, distance: f32, range: f32 },
    #[error("Scanner offline while paused")]
    Paused,
}
