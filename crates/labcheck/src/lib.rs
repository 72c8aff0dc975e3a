//! # labcheck
//!
//! A Rust library for checking student work on chemistry lab worksheets.
//!
//! Labcheck loads instructor-authored CSV worksheets, recomputes their
//! expected values from the formulas and the student's own measurements,
//! and grades student answers against tolerance bands.
//!
//! ## Features
//!
//! - Load worksheet documents from CSV, with columns found by header text
//! - Two-pass formula recomputation driven by student entries
//! - Tolerance-banded checking: correct, close, or incorrect
//! - Paced check sessions where edits supersede in-flight checks
//! - Plain-text result reports with summary statistics
//! - Serializable snapshots of student work with age-based expiry
//!
//! ## Example
//!
//! ```rust
//! use labcheck::prelude::*;
//!
//! const DOCUMENT: &str = "\
//! ,Density of Water,,,,
//! Section,Subsection,Label,Unit,Entry Type,DataRef 1,Trial 1
//! Part A,,,,,,
//! ,,Mass of water,g,Data,=A1,9.98
//! ,,Volume of water,mL,Data,=B1,10.0
//! ,,Density,g/mL,Calculated,=C1,=A1/B1
//! ";
//!
//! let mut session = Session::with_pacing(CheckPacing::none());
//! session.load_worksheet(DOCUMENT).unwrap();
//!
//! // The student fills in their measurements and derived result
//! session.edit_value(RowId(4), TrialSlot::One, Some(9.98)).unwrap();
//! session.edit_value(RowId(5), TrialSlot::One, Some(10.0)).unwrap();
//! session.edit_value(RowId(6), TrialSlot::One, Some(0.998)).unwrap();
//!
//! // Check the subsection and grade it
//! let key = session.worksheet().subsections()[0].clone();
//! let ticket = session.check_subsection(&key).unwrap();
//! let outcome = session.finish_check(ticket);
//! assert!(matches!(outcome, CheckOutcome::Applied { graded: 1 }));
//! ```

pub mod catalog;
pub mod engine;
pub mod grading;
pub mod prelude;
pub mod report;
pub mod session;
pub mod snapshot;

// Re-export catalog types
pub use catalog::{CatalogEntry, WorksheetCatalog};

// Re-export engine types
pub use engine::{RecomputeStats, WorksheetComputeExt};

// Re-export grading functions
pub use grading::{classify, relative_error};

// Re-export report types
pub use report::{LineItem, Report, ReportSummary, SectionReport, SubsectionReport};

// Re-export session types
pub use session::{CheckOutcome, CheckPacing, CheckTicket, Session};

// Re-export snapshot types
pub use snapshot::{EntrySnapshot, SessionSnapshot, MAX_SNAPSHOT_AGE_DAYS};

// Re-export core types
pub use labcheck_core::{
    // Entry types
    EntryType,
    // Error types
    Error,
    Result,
    // Main types
    Row,
    RowId,
    StudentEntry,
    SubsectionKey,
    TrialCell,
    TrialSlot,
    Verdict,
    Worksheet,

    // Constants
    DEFAULT_TOLERANCE,
    DEFAULT_TOLERANCE_CLOSE,
    MAX_TRIALS,
};

// Re-export formula types
pub use labcheck_formula::{
    evaluate_formula, extract_references, parse_formula, Bindings, Expr, FormulaError,
    FormulaResult,
};

// Re-export loader types
pub use labcheck_csv::{LoadError, LoadResult, WorksheetReader};

use std::path::Path;

/// Extension trait for Worksheet to add file loading
pub trait WorksheetLoadExt: Sized {
    /// Load a worksheet from a document file
    fn load<P: AsRef<Path>>(path: P) -> LoadResult<Self>;
}

impl WorksheetLoadExt for Worksheet {
    fn load<P: AsRef<Path>>(path: P) -> LoadResult<Worksheet> {
        WorksheetReader::read_file(path)
    }
}
