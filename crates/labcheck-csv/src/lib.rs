//! # labcheck-csv
//!
//! Worksheet document loader for labcheck.
//!
//! Documents are comma-delimited text with a reserved metadata line, a
//! header line that names the columns, and one line per section marker,
//! subsection marker, or data row. Column order is flexible; the loader
//! finds columns by header text.

mod error;
mod layout;
mod reader;

pub use error::{LoadError, LoadResult};
pub use reader::WorksheetReader;
