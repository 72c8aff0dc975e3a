//! # labcheck-core
//!
//! Core data structures for the labcheck worksheet library.
//!
//! This crate provides the fundamental types used throughout labcheck:
//! - [`Worksheet`] - An ordered collection of rows plus grading tolerances
//! - [`Row`] and [`TrialCell`] - One measurement line and its per-trial state
//! - [`EntryType`] and [`StudentEntry`] - What a row accepts and what was entered
//! - [`Verdict`] - The outcome of checking one trial value
//!
//! ## Example
//!
//! ```rust
//! use labcheck_core::{EntryType, Row, RowId, TrialSlot, Worksheet};
//!
//! let mut row = Row::new(RowId(4), "Mass of flask", EntryType::Data);
//! row.unit = "g".to_string();
//!
//! let mut worksheet = Worksheet::new("Density Lab", 0.10, 0.15);
//! worksheet.push_row(row);
//!
//! assert_eq!(worksheet.row(RowId(4)).unwrap().label, "Mass of flask");
//! ```

pub mod entry;
pub mod error;
pub mod row;
pub mod trial;
pub mod worksheet;

// Re-exports for convenience
pub use entry::{EntryType, StudentEntry, Verdict};
pub use error::{Error, Result};
pub use row::{Row, RowId, SubsectionKey};
pub use trial::{TrialCell, TrialSlot};
pub use worksheet::Worksheet;

/// Default tolerance for a correct answer (relative error)
pub const DEFAULT_TOLERANCE: f64 = 0.10;

/// Default tolerance for a close answer (relative error)
pub const DEFAULT_TOLERANCE_CLOSE: f64 = 0.15;

/// Maximum number of trial columns per row
pub const MAX_TRIALS: usize = 2;
