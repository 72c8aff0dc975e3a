//! Plain-text result reports
//!
//! [`Report::build`] snapshots a worksheet into a printable structure:
//! summary statistics followed by every row's entries and verdicts, grouped
//! by section and subsection. [`Report::render_pages`] lays that structure
//! out as fixed-height text pages with numbered footers. Turning pages into
//! PDF or HTML is left to the caller.

use chrono::Local;
use labcheck_core::{Row, StudentEntry, TrialCell, Verdict, Worksheet};

/// Footer tag on every rendered page
const FOOTER_TAG: &str = "Generated by labcheck";

/// Row-level summary statistics.
///
/// Counting is per row, not per trial: a row is completed when any trial
/// holds a numeric entry, and it lands in a verdict bucket when any trial
/// was graded that way. A two-trial row split between buckets counts in
/// each.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportSummary {
    /// All rows in the worksheet
    pub total_rows: usize,
    /// Rows with at least one numeric entry
    pub completed_rows: usize,
    /// Rows with at least one correct trial
    pub correct_rows: usize,
    /// Rows with at least one close trial
    pub close_rows: usize,
    /// Rows with at least one incorrect trial
    pub incorrect_rows: usize,
}

impl ReportSummary {
    fn tally(sheet: &Worksheet) -> Self {
        let mut summary = ReportSummary::default();
        for row in sheet.rows() {
            summary.total_rows += 1;
            let cells: Vec<&TrialCell> = row.trial_cells().map(|(_, cell)| cell).collect();
            if cells.iter().any(|cell| cell.student_value().is_some()) {
                summary.completed_rows += 1;
            }
            if cells.iter().any(|cell| cell.verdict == Some(Verdict::Correct)) {
                summary.correct_rows += 1;
            }
            if cells.iter().any(|cell| cell.verdict == Some(Verdict::Close)) {
                summary.close_rows += 1;
            }
            if cells
                .iter()
                .any(|cell| cell.verdict == Some(Verdict::Incorrect))
            {
                summary.incorrect_rows += 1;
            }
        }
        summary
    }

    /// Completed rows as a whole percentage
    pub fn completion_percent(&self) -> u32 {
        percent(self.completed_rows, self.total_rows)
    }

    /// Correct rows as a whole percentage of completed rows
    pub fn accuracy_percent(&self) -> u32 {
        percent(self.correct_rows, self.completed_rows)
    }
}

fn percent(part: usize, whole: usize) -> u32 {
    if whole == 0 {
        return 0;
    }
    (part as f64 / whole as f64 * 100.0).round() as u32
}

/// One row's printable state
#[derive(Debug, Clone, PartialEq)]
pub struct LineItem {
    pub label: String,
    pub unit: String,
    /// Per-trial rendering, in slot order, for the slots that exist
    pub trials: Vec<String>,
}

/// Rows of one subsection
#[derive(Debug, Clone, PartialEq)]
pub struct SubsectionReport {
    pub title: String,
    pub items: Vec<LineItem>,
}

/// Subsections of one section
#[derive(Debug, Clone, PartialEq)]
pub struct SectionReport {
    pub title: String,
    pub subsections: Vec<SubsectionReport>,
}

/// A printable snapshot of a worksheet's state
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub title: String,
    pub student: Option<String>,
    /// Generation date, `YYYY-MM-DD`
    pub date: String,
    pub summary: ReportSummary,
    pub sections: Vec<SectionReport>,
}

impl Report {
    /// Snapshot the worksheet into a report dated today
    pub fn build(sheet: &Worksheet) -> Self {
        let mut sections: Vec<SectionReport> = Vec::new();
        for key in sheet.subsections() {
            let items: Vec<LineItem> = sheet
                .rows_in_subsection(&key)
                .map(render_line_item)
                .collect();
            let subsection = SubsectionReport {
                title: key.subsection.clone(),
                items,
            };
            match sections.last_mut() {
                Some(section) if section.title == key.section => {
                    section.subsections.push(subsection);
                }
                _ => sections.push(SectionReport {
                    title: key.section.clone(),
                    subsections: vec![subsection],
                }),
            }
        }

        Report {
            title: sheet.title().to_string(),
            student: None,
            date: Local::now().format("%Y-%m-%d").to_string(),
            summary: ReportSummary::tally(sheet),
            sections,
        }
    }

    /// Attach the student's name to the header
    pub fn with_student<S: Into<String>>(mut self, name: S) -> Self {
        self.student = Some(name.into());
        self
    }

    /// All body lines, unpaginated
    fn body_lines(&self) -> Vec<String> {
        let mut lines = Vec::new();
        lines.push(self.title.clone());
        if let Some(student) = &self.student {
            lines.push(format!("Student: {student}"));
        }
        lines.push(format!("Date: {}", self.date));
        lines.push(String::new());

        lines.push("Summary Statistics".to_string());
        let summary = &self.summary;
        lines.push(format!(
            "  Completion: {}% ({}/{})",
            summary.completion_percent(),
            summary.completed_rows,
            summary.total_rows
        ));
        lines.push(format!(
            "  Accuracy: {}% ({}/{})",
            summary.accuracy_percent(),
            summary.correct_rows,
            summary.completed_rows
        ));
        lines.push(format!("  Correct Answers: {}", summary.correct_rows));
        lines.push(format!("  Close Answers: {}", summary.close_rows));
        lines.push(format!("  Incorrect Answers: {}", summary.incorrect_rows));
        lines.push(String::new());

        lines.push("Detailed Results".to_string());
        for section in &self.sections {
            lines.push(String::new());
            lines.push(section.title.clone());
            for subsection in &section.subsections {
                if !subsection.title.is_empty() {
                    lines.push(format!("  {}", subsection.title));
                }
                for item in &subsection.items {
                    let mut line = format!("    {}: {}", item.label, item.trials.join(" | "));
                    if !item.unit.is_empty() {
                        line.push_str(&format!(" ({})", item.unit));
                    }
                    lines.push(line);
                }
            }
        }
        lines
    }

    /// Lay the report out as pages of at most `lines_per_page` body lines.
    ///
    /// Every page ends with a blank line and a footer carrying the page
    /// number, right-aligned to `width`.
    pub fn render_pages(&self, width: usize, lines_per_page: usize) -> Vec<String> {
        let lines = self.body_lines();
        let per_page = lines_per_page.max(1);
        let page_count = ((lines.len() + per_page - 1) / per_page).max(1);

        let mut pages = Vec::with_capacity(page_count);
        for (index, chunk) in lines.chunks(per_page).enumerate() {
            let mut page = chunk.join("\n");
            page.push('\n');
            page.push('\n');
            page.push_str(&footer_line(index + 1, page_count, width));
            page.push('\n');
            pages.push(page);
        }
        if pages.is_empty() {
            pages.push(format!("\n{}\n", footer_line(1, 1, width)));
        }
        pages
    }

    /// The whole report as one string, pages separated by form feeds
    pub fn render(&self, width: usize, lines_per_page: usize) -> String {
        self.render_pages(width, lines_per_page).join("\u{c}")
    }
}

fn footer_line(page: usize, pages: usize, width: usize) -> String {
    let marker = format!("Page {page} of {pages}");
    let used = FOOTER_TAG.len() + marker.len();
    let gap = width.saturating_sub(used).max(1);
    format!("{FOOTER_TAG}{}{marker}", " ".repeat(gap))
}

fn render_line_item(row: &Row) -> LineItem {
    let trials = row
        .trial_cells()
        .map(|(_, cell)| render_trial(cell))
        .collect();
    LineItem {
        label: row.label.clone(),
        unit: row.unit.clone(),
        trials,
    }
}

fn render_trial(cell: &TrialCell) -> String {
    let value = match &cell.student {
        Some(StudentEntry::Value(value)) => format_number(*value),
        Some(StudentEntry::Choice(choice)) => choice.clone(),
        Some(StudentEntry::Text(text)) => text.clone(),
        None => "Not entered".to_string(),
    };
    match cell.verdict {
        Some(verdict) => format!("{} {}", verdict.glyph(), value),
        None => value,
    }
}

/// Trim trailing zeros the way a person would write the number
fn format_number(value: f64) -> String {
    if value == value.trunc() && value.abs() < 1e15 {
        format!("{value:.0}")
    } else {
        let mut text = format!("{value}");
        if text.contains('.') {
            while text.ends_with('0') {
                text.pop();
            }
            if text.ends_with('.') {
                text.pop();
            }
        }
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use labcheck_core::{EntryType, RowId};

    fn sample_sheet() -> Worksheet {
        let mut sheet = Worksheet::new("Density Lab", 0.10, 0.15);

        let mut mass = Row::new(RowId(4), "Mass of flask", EntryType::Data);
        mass.unit = "g".to_string();
        mass.section = "Part A".to_string();
        let mut cell = TrialCell::new();
        cell.data_tag = Some("M1".to_string());
        cell.student = Some(StudentEntry::Value(25.5));
        mass.trials[0] = Some(cell);
        mass.trials[1] = Some(TrialCell::new());
        sheet.push_row(mass);

        let mut density = Row::new(RowId(5), "Density", EntryType::Calculated);
        density.unit = "g/mL".to_string();
        density.section = "Part A".to_string();
        let mut cell = TrialCell::new();
        cell.data_tag = Some("D1".to_string());
        cell.formula = Some("=M1/V1".to_string());
        cell.student = Some(StudentEntry::Value(1.02));
        cell.expected = Some(1.0);
        cell.verdict = Some(Verdict::Correct);
        density.trials[0] = Some(cell);
        let mut cell = TrialCell::new();
        cell.student = Some(StudentEntry::Value(1.9));
        cell.verdict = Some(Verdict::Incorrect);
        density.trials[1] = Some(cell);
        sheet.push_row(density);

        let mut color = Row::new(RowId(6), "Flask color", EntryType::Choice);
        color.section = "Part B".to_string();
        let mut cell = TrialCell::new();
        cell.student = Some(StudentEntry::Choice("blue".to_string()));
        color.trials[0] = Some(cell);
        sheet.push_row(color);

        sheet
    }

    #[test]
    fn test_summary_counts_per_row() {
        let report = Report::build(&sample_sheet());
        let summary = &report.summary;

        assert_eq!(summary.total_rows, 3);
        // The choice entry is not a numeric value
        assert_eq!(summary.completed_rows, 2);
        // One row is both correct-on-one-trial and incorrect-on-the-other
        assert_eq!(summary.correct_rows, 1);
        assert_eq!(summary.close_rows, 0);
        assert_eq!(summary.incorrect_rows, 1);
        assert_eq!(summary.completion_percent(), 67);
        assert_eq!(summary.accuracy_percent(), 50);
    }

    #[test]
    fn test_sections_and_items() {
        let report = Report::build(&sample_sheet());

        assert_eq!(report.sections.len(), 2);
        assert_eq!(report.sections[0].title, "Part A");
        assert_eq!(report.sections[1].title, "Part B");

        let items = &report.sections[0].subsections[0].items;
        assert_eq!(items[0].trials, vec!["25.5", "Not entered"]);
        assert_eq!(items[1].trials, vec!["O: 1.02", "X: 1.9"]);
    }

    #[test]
    fn test_render_contains_everything() {
        let report = Report::build(&sample_sheet()).with_student("R. Franklin");
        let text = report.render(72, 100);

        assert!(text.contains("Density Lab"));
        assert!(text.contains("Student: R. Franklin"));
        assert!(text.contains("Completion: 67% (2/3)"));
        assert!(text.contains("    Density: O: 1.02 | X: 1.9 (g/mL)"));
        assert!(text.contains("Page 1 of 1"));
    }

    #[test]
    fn test_pagination_footers() {
        let report = Report::build(&sample_sheet());
        let pages = report.render_pages(60, 5);

        assert!(pages.len() > 1);
        let last = pages.len();
        for (index, page) in pages.iter().enumerate() {
            assert!(page.contains(&format!("Page {} of {}", index + 1, last)));
            assert!(page.contains(FOOTER_TAG));
        }
    }

    #[test]
    fn test_empty_worksheet_report() {
        let report = Report::build(&Worksheet::empty());
        assert_eq!(report.summary.completion_percent(), 0);
        assert_eq!(report.summary.accuracy_percent(), 0);
        let pages = report.render_pages(40, 30);
        assert_eq!(pages.len(), 1);
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(25.0), "25");
        assert_eq!(format_number(1.02), "1.02");
        assert_eq!(format_number(-0.5), "-0.5");
        assert_eq!(format_number(0.1), "0.1");
    }
}
