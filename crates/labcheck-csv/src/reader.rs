//! Worksheet document reader

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::StringRecord;
use labcheck_core::{
    EntryType, Row, RowId, TrialCell, Worksheet, DEFAULT_TOLERANCE, DEFAULT_TOLERANCE_CLOSE,
};

use crate::error::{LoadError, LoadResult};
use crate::layout::{field, ColumnLayout};

/// Title used when the metadata line does not supply one
const DEFAULT_TITLE: &str = "Lab Calculator";

/// Worksheet document reader
pub struct WorksheetReader;

impl WorksheetReader {
    /// Read a worksheet document from a file
    pub fn read_file<P: AsRef<Path>>(path: P) -> LoadResult<Worksheet> {
        let file = File::open(path)?;
        Self::read(file)
    }

    /// Read a worksheet document from a string
    pub fn read_str(text: &str) -> LoadResult<Worksheet> {
        Self::read(text.as_bytes())
    }

    /// Read a worksheet document from a reader
    pub fn read<R: Read>(reader: R) -> LoadResult<Worksheet> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        // Record line numbers so row ids survive blank lines
        let mut records: Vec<(u32, StringRecord)> = Vec::new();
        for result in csv_reader.records() {
            let record = result?;
            let line = record
                .position()
                .map(|p| p.line() as u32)
                .unwrap_or(records.len() as u32 + 1);
            records.push((line, record));
        }

        if records.len() < 2 {
            return Err(LoadError::EmptyDocument);
        }

        // Line 1: metadata at positions 1/3/5, other fields ignored
        let meta = &records[0].1;
        let title = match field(meta, 1) {
            "" => DEFAULT_TITLE,
            text => text,
        };
        let tolerance = parse_literal(field(meta, 3)).unwrap_or(DEFAULT_TOLERANCE);
        let tolerance_close = parse_literal(field(meta, 5)).unwrap_or(DEFAULT_TOLERANCE_CLOSE);

        // Line 2: header
        let layout = ColumnLayout::detect(&records[1].1)?;

        let mut worksheet = Worksheet::new(title, tolerance, tolerance_close);
        let mut current_section = String::new();
        let mut current_subsection = String::new();
        // Data tag -> row that claimed it
        let mut seen_tags: HashMap<String, u32> = HashMap::new();

        for (line, record) in records.iter().skip(2) {
            let section = layout
                .section
                .map(|index| field(record, index))
                .unwrap_or("");
            let subsection = layout
                .subsection
                .map(|index| field(record, index))
                .unwrap_or("");
            let label = field(record, layout.label);
            let has_refs = layout.has_data_refs(record);

            // Section marker: a section name and nothing else
            if !section.is_empty() && subsection.is_empty() && label.is_empty() && !has_refs {
                current_section = section.to_string();
                current_subsection.clear();
                continue;
            }

            // Subsection marker: a subsection name and nothing else
            if section.is_empty() && !subsection.is_empty() && label.is_empty() && !has_refs {
                current_subsection = subsection.to_string();
                continue;
            }

            // Repeated header lines show up in concatenated documents
            if section == "Section" {
                continue;
            }

            // Spacer/decoration lines have no label
            if label.is_empty() {
                continue;
            }

            let type_text = field(record, layout.entry_type);
            let entry_type = if type_text.is_empty() {
                EntryType::Data
            } else {
                match EntryType::parse(type_text) {
                    Some(entry_type) => entry_type,
                    None => {
                        log::warn!(
                            "Line {}: unknown entry type '{}', skipping row '{}'",
                            line,
                            type_text,
                            label
                        );
                        continue;
                    }
                }
            };

            let mut row = Row::new(RowId(*line), label, entry_type);
            row.unit = field(record, layout.unit).to_string();
            row.section = if current_section.is_empty() {
                "Default".to_string()
            } else {
                current_section.clone()
            };
            row.subsection = current_subsection.clone();

            for (slot_index, &(ref_column, trial_column)) in layout.slots.iter().enumerate() {
                let raw_tag = field(record, ref_column);
                // Leading '=' on a data ref is a source-format artifact
                let tag = raw_tag.strip_prefix('=').unwrap_or(raw_tag).trim();
                if tag.is_empty() {
                    continue;
                }

                if let Some(&first) = seen_tags.get(tag) {
                    return Err(LoadError::DuplicateDataTag {
                        tag: tag.to_string(),
                        first,
                        second: *line,
                    });
                }
                seen_tags.insert(tag.to_string(), *line);

                let value = field(record, trial_column);
                row.trials[slot_index] = Some(read_cell(tag, value, entry_type, *line));
            }

            worksheet.push_row(row);
        }

        Ok(worksheet)
    }
}

/// Build one trial cell from its data tag and raw value
fn read_cell(tag: &str, value: &str, entry_type: EntryType, line: u32) -> TrialCell {
    let is_na = value.eq_ignore_ascii_case("NA");

    let mut cell = if value.is_empty() || is_na {
        TrialCell::not_applicable()
    } else {
        TrialCell::new()
    };
    cell.data_tag = Some(tag.to_string());

    if !is_na && !value.is_empty() {
        if value.starts_with('=') {
            cell.formula = Some(value.to_string());
        } else {
            cell.expected = parse_literal(value);
            if cell.expected.is_none() && entry_type.is_numeric() {
                log::debug!(
                    "Line {}: trial value '{}' is not a number, row is uncheckable",
                    line,
                    value
                );
            }
            if entry_type == EntryType::Choice && value.contains(';') {
                cell.choice_options =
                    Some(value.split(';').map(|opt| opt.trim().to_string()).collect());
            }
        }
    }

    cell.can_calculate = cell.formula.is_none();
    cell
}

/// Parse a literal number, rejecting non-finite values
fn parse_literal(value: &str) -> Option<f64> {
    value.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}
