//! Worksheet rows

use std::fmt;

use crate::entry::EntryType;
use crate::trial::{TrialCell, TrialSlot};
use crate::MAX_TRIALS;

/// Stable row identifier: the 1-based line number in the source document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RowId(pub u32);

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Grouping key for check/reset scoping
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SubsectionKey {
    pub section: String,
    pub subsection: String,
}

impl SubsectionKey {
    pub fn new<S: Into<String>, T: Into<String>>(section: S, subsection: T) -> Self {
        Self {
            section: section.into(),
            subsection: subsection.into(),
        }
    }
}

impl fmt::Display for SubsectionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.subsection.is_empty() {
            f.write_str(&self.section)
        } else {
            write!(f, "{} / {}", self.section, self.subsection)
        }
    }
}

/// One measurement line of the worksheet
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Row {
    /// Row id (1-based source line number)
    pub id: RowId,
    /// Prompt shown to the student
    pub label: String,
    /// Measurement unit, may be empty
    pub unit: String,
    /// Section this row belongs to
    pub section: String,
    /// Subsection this row belongs to, may be empty
    pub subsection: String,
    /// How the row is filled in
    pub entry_type: EntryType,
    /// Up to two trial cells; None where the source had no column
    pub trials: [Option<TrialCell>; MAX_TRIALS],
}

impl Row {
    /// Create a new row with no trial cells
    pub fn new<S: Into<String>>(id: RowId, label: S, entry_type: EntryType) -> Self {
        Self {
            id,
            label: label.into(),
            unit: String::new(),
            section: String::new(),
            subsection: String::new(),
            entry_type,
            trials: [None, None],
        }
    }

    /// Get the cell in a trial slot
    pub fn trial(&self, slot: TrialSlot) -> Option<&TrialCell> {
        self.trials[slot.index()].as_ref()
    }

    /// Get the cell in a trial slot, mutably
    pub fn trial_mut(&mut self, slot: TrialSlot) -> Option<&mut TrialCell> {
        self.trials[slot.index()].as_mut()
    }

    /// Iterate over the trial cells that exist, with their slots
    pub fn trial_cells(&self) -> impl Iterator<Item = (TrialSlot, &TrialCell)> {
        TrialSlot::ALL
            .into_iter()
            .filter_map(|slot| self.trial(slot).map(|cell| (slot, cell)))
    }

    /// Whether the student types this row in directly
    pub fn is_direct_input(&self) -> bool {
        self.entry_type.is_direct_input()
    }

    /// Whether any trial cell of this row carries a formula
    pub fn has_formula(&self) -> bool {
        self.trial_cells().any(|(_, cell)| cell.has_formula())
    }

    /// The (section, subsection) pair this row is grouped under
    pub fn subsection_key(&self) -> SubsectionKey {
        SubsectionKey::new(self.section.clone(), self.subsection.clone())
    }
}
