//! Prelude module - common imports for labcheck users
//!
//! ```rust
//! use labcheck::prelude::*;
//! ```

pub use crate::{
    // Formula types
    Bindings,
    // Catalog types
    CatalogEntry,
    // Session types
    CheckOutcome,
    CheckPacing,
    CheckTicket,

    EntrySnapshot,
    // Core types
    EntryType,
    // Error types
    Error,

    LineItem,
    LoadError,

    // Engine types
    RecomputeStats,
    // Report types
    Report,
    ReportSummary,
    Result,

    Row,
    RowId,
    // Main types
    Session,
    // Snapshot types
    SessionSnapshot,
    StudentEntry,
    SubsectionKey,
    TrialCell,
    TrialSlot,
    Verdict,
    Worksheet,
    WorksheetCatalog,
    // Extension traits
    WorksheetComputeExt,
    WorksheetLoadExt,
    // I/O types
    WorksheetReader,
};
