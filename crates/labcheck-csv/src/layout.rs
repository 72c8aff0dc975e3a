//! Header-driven column layout detection

use csv::StringRecord;
use labcheck_core::MAX_TRIALS;

use crate::error::{LoadError, LoadResult};

/// Column indices detected from the header line
///
/// Columns are located by case-insensitive header text, so documents may
/// reorder columns, rename trial headers ("Trial 1", "Sample A"), or carry
/// extra columns the loader ignores.
#[derive(Debug, Clone)]
pub(crate) struct ColumnLayout {
    pub label: usize,
    pub unit: usize,
    pub entry_type: usize,
    pub section: Option<usize>,
    pub subsection: Option<usize>,
    /// Paired (data-ref column, trial column) slots, at most [`MAX_TRIALS`]
    pub slots: Vec<(usize, usize)>,
    /// All data-ref columns, paired or not, for marker detection
    pub data_ref_columns: Vec<usize>,
}

impl ColumnLayout {
    /// Detect the layout from the header record
    pub fn detect(header: &StringRecord) -> LoadResult<Self> {
        let mut label = None;
        let mut unit = None;
        let mut entry_type = None;
        let mut section = None;
        let mut subsection = None;
        let mut data_refs = Vec::new();
        let mut trials = Vec::new();

        for (index, cell) in header.iter().enumerate() {
            let lower = cell.trim().to_ascii_lowercase();
            match lower.as_str() {
                "label" => label = Some(index),
                "unit" => unit = Some(index),
                "entry type" => entry_type = Some(index),
                "section" => section = Some(index),
                "subsection" => subsection = Some(index),
                _ => {
                    if lower.starts_with("dataref") {
                        data_refs.push(index);
                    } else if lower.starts_with("trial") || lower.starts_with("sample") {
                        trials.push(index);
                    }
                }
            }
        }

        let mut missing = Vec::new();
        if label.is_none() {
            missing.push("Label");
        }
        if unit.is_none() {
            missing.push("Unit");
        }
        if entry_type.is_none() {
            missing.push("Entry Type");
        }
        if !missing.is_empty() {
            return Err(LoadError::MissingColumns(missing.join(", ")));
        }

        let slots = data_refs
            .iter()
            .copied()
            .zip(trials.iter().copied())
            .take(MAX_TRIALS)
            .collect();

        Ok(Self {
            label: label.unwrap_or(0),
            unit: unit.unwrap_or(0),
            entry_type: entry_type.unwrap_or(0),
            section,
            subsection,
            slots,
            data_ref_columns: data_refs,
        })
    }

    /// Whether any data-ref cell of the record is non-empty
    pub fn has_data_refs(&self, record: &StringRecord) -> bool {
        self.data_ref_columns
            .iter()
            .any(|&index| !field(record, index).is_empty())
    }
}

/// Get a field by index, treating missing columns as empty
pub(crate) fn field<'a>(record: &'a StringRecord, index: usize) -> &'a str {
    record.get(index).unwrap_or("").trim()
}
