//! Error types for labcheck-core

use thiserror::Error;

use crate::row::{RowId, SubsectionKey};
use crate::trial::TrialSlot;

/// Result type alias using [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in labcheck-core
#[derive(Debug, Error)]
pub enum Error {
    /// Row not found by id
    #[error("Row not found: {0}")]
    RowNotFound(RowId),

    /// Row has no cell in the requested trial slot
    #[error("Row {row} has no {slot} cell")]
    NoSuchTrial { row: RowId, slot: TrialSlot },

    /// Cell does not accept student input
    #[error("Row {row} {slot} does not accept input")]
    NotInputCell { row: RowId, slot: TrialSlot },

    /// Entry kind does not match the row's entry type
    #[error("Row {row} is {expected}, cannot store a {actual} entry")]
    EntryKindMismatch {
        row: RowId,
        expected: &'static str,
        actual: &'static str,
    },

    /// Choice value not among the row's options
    #[error("Row {row}: '{value}' is not one of the listed options")]
    UnknownChoice { row: RowId, value: String },

    /// Subsection key matches no rows
    #[error("Subsection not found: {0}")]
    SubsectionNotFound(SubsectionKey),

    /// A check for this subsection is already pending
    #[error("A check is already pending for {0}")]
    CheckPending(SubsectionKey),

    /// Generic error with message
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a new "other" error with a message
    pub fn other<S: Into<String>>(msg: S) -> Self {
        Error::Other(msg.into())
    }
}
