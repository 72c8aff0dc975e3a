//! Worksheet type

use crate::entry::Verdict;
use crate::error::{Error, Result};
use crate::row::{Row, RowId, SubsectionKey};
use crate::trial::{TrialCell, TrialSlot};
use crate::{DEFAULT_TOLERANCE, DEFAULT_TOLERANCE_CLOSE};

/// A loaded worksheet: title, grading tolerances, and rows in source order
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Worksheet {
    /// Worksheet title
    title: String,
    /// Relative error allowed for a correct answer
    tolerance: f64,
    /// Relative error allowed for a close answer
    tolerance_close: f64,
    /// Rows in source order
    rows: Vec<Row>,
}

impl Worksheet {
    /// Create a new worksheet with the given title and tolerances
    pub fn new<S: Into<String>>(title: S, tolerance: f64, tolerance_close: f64) -> Self {
        Self {
            title: title.into(),
            tolerance,
            tolerance_close,
            rows: Vec::new(),
        }
    }

    /// Create an empty worksheet with default tolerances
    pub fn empty() -> Self {
        Self::new("", DEFAULT_TOLERANCE, DEFAULT_TOLERANCE_CLOSE)
    }

    /// Get the worksheet title
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Set the worksheet title
    pub fn set_title<S: Into<String>>(&mut self, title: S) {
        self.title = title.into();
    }

    /// Get the correct tolerance
    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// Get the close tolerance
    pub fn tolerance_close(&self) -> f64 {
        self.tolerance_close
    }

    /// Set both grading tolerances
    pub fn set_tolerances(&mut self, tolerance: f64, tolerance_close: f64) {
        self.tolerance = tolerance;
        self.tolerance_close = tolerance_close;
    }

    // === Row access ===

    /// Append a row
    pub fn push_row(&mut self, row: Row) {
        self.rows.push(row);
    }

    /// Number of rows
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Whether the worksheet has no rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Iterate over rows in source order
    pub fn rows(&self) -> impl Iterator<Item = &Row> {
        self.rows.iter()
    }

    /// Iterate over rows mutably
    pub fn rows_mut(&mut self) -> impl Iterator<Item = &mut Row> {
        self.rows.iter_mut()
    }

    /// Look up a row by id
    pub fn row(&self, id: RowId) -> Option<&Row> {
        self.rows.iter().find(|r| r.id == id)
    }

    /// Look up a row by id, mutably
    pub fn row_mut(&mut self, id: RowId) -> Option<&mut Row> {
        self.rows.iter_mut().find(|r| r.id == id)
    }

    /// Get a trial cell, erroring if the row or slot is missing
    pub fn cell(&self, id: RowId, slot: TrialSlot) -> Result<&TrialCell> {
        let row = self.row(id).ok_or(Error::RowNotFound(id))?;
        row.trial(slot).ok_or(Error::NoSuchTrial { row: id, slot })
    }

    /// Get a trial cell mutably, erroring if the row or slot is missing
    pub fn cell_mut(&mut self, id: RowId, slot: TrialSlot) -> Result<&mut TrialCell> {
        let row = self.row_mut(id).ok_or(Error::RowNotFound(id))?;
        row.trial_mut(slot)
            .ok_or(Error::NoSuchTrial { row: id, slot })
    }

    // === Grouping ===

    /// Subsection keys in first-appearance order
    pub fn subsections(&self) -> Vec<SubsectionKey> {
        let mut keys = Vec::new();
        for row in &self.rows {
            let key = row.subsection_key();
            if !keys.contains(&key) {
                keys.push(key);
            }
        }
        keys
    }

    /// Rows belonging to one subsection, in source order
    pub fn rows_in_subsection<'a>(
        &'a self,
        key: &'a SubsectionKey,
    ) -> impl Iterator<Item = &'a Row> {
        self.rows.iter().filter(move |r| &r.subsection_key() == key)
    }

    /// Section names in first-appearance order
    pub fn sections(&self) -> Vec<String> {
        let mut names = Vec::new();
        for row in &self.rows {
            if !names.contains(&row.section) {
                names.push(row.section.clone());
            }
        }
        names
    }

    // === Progress ===

    /// Count of (filled, total) input-bearing trial cells
    pub fn completion(&self) -> (usize, usize) {
        let mut filled = 0;
        let mut total = 0;
        for row in &self.rows {
            for (_, cell) in row.trial_cells() {
                if cell.accepts_input {
                    total += 1;
                    if cell.student.is_some() {
                        filled += 1;
                    }
                }
            }
        }
        (filled, total)
    }

    /// Count of (correct, graded) trial cells among those holding a verdict
    pub fn accuracy(&self) -> (usize, usize) {
        let mut correct = 0;
        let mut graded = 0;
        for row in &self.rows {
            for (_, cell) in row.trial_cells() {
                if let Some(verdict) = cell.verdict {
                    graded += 1;
                    if verdict == Verdict::Correct {
                        correct += 1;
                    }
                }
            }
        }
        (correct, graded)
    }
}
