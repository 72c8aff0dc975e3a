//! Entry types, student entries, and check verdicts

use std::fmt;

/// How a row is filled in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EntryType {
    /// Measured number entered by the student
    Data,
    /// Number derived from other rows by a formula
    Calculated,
    /// Selection from a fixed list of options
    Choice,
    /// Free-text observation
    Text,
}

impl EntryType {
    /// Parse an entry type cell, case-insensitively
    pub fn parse(text: &str) -> Option<Self> {
        match text.trim().to_ascii_lowercase().as_str() {
            "data" => Some(EntryType::Data),
            "calculated" => Some(EntryType::Calculated),
            "choice" => Some(EntryType::Choice),
            "text" => Some(EntryType::Text),
            _ => None,
        }
    }

    /// Whether the student types this row in directly
    ///
    /// Calculated rows also take student input (that is what gets checked),
    /// but their value has an expected counterpart; direct-input rows do not.
    pub fn is_direct_input(&self) -> bool {
        matches!(self, EntryType::Data | EntryType::Choice | EntryType::Text)
    }

    /// Whether the row participates in numeric grading
    pub fn is_numeric(&self) -> bool {
        matches!(self, EntryType::Data | EntryType::Calculated)
    }

    /// Short name used in error messages
    pub fn name(&self) -> &'static str {
        match self {
            EntryType::Data => "data",
            EntryType::Calculated => "calculated",
            EntryType::Choice => "choice",
            EntryType::Text => "text",
        }
    }
}

impl fmt::Display for EntryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A value the student has entered into one trial cell
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StudentEntry {
    /// Numeric value (data and calculated rows)
    Value(f64),
    /// Selected option (choice rows)
    Choice(String),
    /// Free text (text rows)
    Text(String),
}

impl StudentEntry {
    /// Get the numeric value, if this is one
    pub fn as_value(&self) -> Option<f64> {
        match self {
            StudentEntry::Value(v) => Some(*v),
            _ => None,
        }
    }

    /// Short name used in error messages
    pub fn kind(&self) -> &'static str {
        match self {
            StudentEntry::Value(_) => "numeric",
            StudentEntry::Choice(_) => "choice",
            StudentEntry::Text(_) => "text",
        }
    }
}

/// Outcome of checking one trial value against its expected value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Verdict {
    /// Within the correct tolerance
    Correct,
    /// Outside correct but within the close tolerance
    Close,
    /// Outside both tolerances
    Incorrect,
}

impl Verdict {
    /// Glyph used in text reports
    pub fn glyph(&self) -> &'static str {
        match self {
            Verdict::Correct => "O:",
            Verdict::Close => "~:",
            Verdict::Incorrect => "X:",
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Correct => f.write_str("correct"),
            Verdict::Close => f.write_str("close"),
            Verdict::Incorrect => f.write_str("incorrect"),
        }
    }
}
