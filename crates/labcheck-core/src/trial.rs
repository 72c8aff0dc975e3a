//! Trial cells
//!
//! A worksheet row carries up to two trial columns. Each physical cell that
//! exists in the source document becomes a [`TrialCell`] holding the seeded
//! content (data tag, formula or literal), the student's entry, and the
//! derived state produced by recomputation and checking.

use std::fmt;

use crate::entry::{StudentEntry, Verdict};

/// Which trial column a cell belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TrialSlot {
    One,
    Two,
}

impl TrialSlot {
    /// All slots in column order
    pub const ALL: [TrialSlot; 2] = [TrialSlot::One, TrialSlot::Two];

    /// Index into a row's trial array
    pub fn index(&self) -> usize {
        match self {
            TrialSlot::One => 0,
            TrialSlot::Two => 1,
        }
    }

    /// Slot for a 0-based trial column index
    pub fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(TrialSlot::One),
            1 => Some(TrialSlot::Two),
            _ => None,
        }
    }
}

impl fmt::Display for TrialSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrialSlot::One => f.write_str("trial 1"),
            TrialSlot::Two => f.write_str("trial 2"),
        }
    }
}

/// One trial cell of a row
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TrialCell {
    /// Symbol other formulas use to reference this cell (immutable after load)
    pub data_tag: Option<String>,
    /// Formula source text, including the leading '='
    pub formula: Option<String>,
    /// Expected value: a parsed literal at load time, or a formula result
    /// filled in by recomputation
    pub expected: Option<f64>,
    /// Whether the student may type into this cell (false for NA cells)
    pub accepts_input: bool,
    /// Allowed options for choice rows
    pub choice_options: Option<Vec<String>>,
    /// What the student entered, if anything
    pub student: Option<StudentEntry>,
    /// Outcome of the last check, cleared on edit/reset
    pub verdict: Option<Verdict>,
    /// Whether all references of the formula resolved last recompute
    pub can_calculate: bool,
    /// Data tags the formula needed but could not resolve
    pub missing_deps: Vec<String>,
}

impl TrialCell {
    /// Create an input-bearing cell with no seeded content
    pub fn new() -> Self {
        Self {
            accepts_input: true,
            ..Default::default()
        }
    }

    /// Create a cell that takes no student input (source "NA")
    pub fn not_applicable() -> Self {
        Self::default()
    }

    /// Whether this cell's expected value comes from a formula
    pub fn has_formula(&self) -> bool {
        self.formula.is_some()
    }

    /// Whether the expected value was seeded as a literal in the source
    ///
    /// Literal expected values are immutable; recomputation only rewrites
    /// the expected values of formula cells.
    pub fn has_literal_expected(&self) -> bool {
        self.expected.is_some() && self.formula.is_none()
    }

    /// The student's numeric value, if one was entered
    pub fn student_value(&self) -> Option<f64> {
        self.student.as_ref().and_then(StudentEntry::as_value)
    }

    /// Clear the student entry and any verdict
    pub fn clear_student(&mut self) {
        self.student = None;
        self.verdict = None;
    }
}
