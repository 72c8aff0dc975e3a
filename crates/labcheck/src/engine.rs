//! Worksheet recomputation engine
//!
//! Re-derives every formula cell's expected value from the current student
//! entries. Resolution is bounded to two fixed passes rather than an
//! iterative fixpoint: worksheets chain at most two levels deep (raw inputs
//! feed first-order calculations, which feed aggregates), so two passes
//! cover every legitimate document shape without needing cycle detection.
//!
//! Pass one binds student entries only. Pass two rebuilds the bindings with
//! every expected value known so far layered on top (seeded literals and
//! pass-one results, shadowing student entries for the same tag) and fills
//! in the formula cells that are still empty. A cell that resolves in pass
//! one keeps its pass-one value.
//!
//! # Example
//!
//! ```rust,ignore
//! use labcheck::prelude::*;
//!
//! let mut sheet = WorksheetReader::read_str(document)?;
//! let stats = sheet.recompute();
//! println!("{} formula cells, {} unresolved", stats.formula_cells, stats.uncalculable);
//! ```

use ahash::{AHashMap, AHashSet};
use labcheck_core::{RowId, TrialSlot, Worksheet};
use labcheck_formula::{evaluate, lower, parse_formula, references, Bindings, Expr};

/// Statistics from one recomputation run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecomputeStats {
    /// Total number of formula cells
    pub formula_cells: usize,
    /// Cells resolved from student entries alone
    pub computed_first_pass: usize,
    /// Cells resolved once computed values were bound
    pub computed_second_pass: usize,
    /// Formula cells left without an expected value
    pub uncalculable: usize,
    /// Parse, translation, and evaluation failures, one per failing cell
    pub errors: usize,
}

/// Extension trait adding recomputation to [`Worksheet`]
pub trait WorksheetComputeExt {
    /// Recompute every formula cell's expected value
    fn recompute(&mut self) -> RecomputeStats;
}

impl WorksheetComputeExt for Worksheet {
    fn recompute(&mut self) -> RecomputeStats {
        compute_all(self)
    }
}

/// A formula prepared for evaluation: its lowered tree and the data tags
/// its source text references
struct ParsedFormula {
    lowered: Expr,
    refs: Vec<String>,
}

/// Recompute every formula cell of the worksheet.
///
/// Formula results are re-derived from scratch on every call; a formula
/// whose dependencies no longer resolve loses its previous value. Seeded
/// literal expected values are never touched. Formula failures downgrade
/// the affected cell to uncalculable and never abort the run.
pub fn compute_all(sheet: &mut Worksheet) -> RecomputeStats {
    let mut stats = RecomputeStats::default();

    for row in sheet.rows_mut() {
        for cell in row.trials.iter_mut().flatten() {
            if cell.has_formula() {
                cell.expected = None;
            }
        }
    }

    let parsed = parse_formulas(sheet, &mut stats);
    let mut failed = AHashSet::new();

    // First pass: student entries only
    let bindings = student_bindings(sheet);
    stats.computed_first_pass = run_pass(sheet, &parsed, &bindings, &mut failed, &mut stats.errors);

    // Second pass: expected values layered over the student entries
    let bindings = overlay_expected(sheet, bindings);
    stats.computed_second_pass = run_pass(sheet, &parsed, &bindings, &mut failed, &mut stats.errors);

    for row in sheet.rows() {
        for (_, cell) in row.trial_cells() {
            if cell.has_formula() && cell.expected.is_none() {
                stats.uncalculable += 1;
            }
        }
    }

    stats
}

fn parse_formulas(
    sheet: &Worksheet,
    stats: &mut RecomputeStats,
) -> AHashMap<(RowId, TrialSlot), ParsedFormula> {
    let mut parsed = AHashMap::new();
    for row in sheet.rows() {
        for (slot, cell) in row.trial_cells() {
            let formula = match &cell.formula {
                Some(formula) => formula,
                None => continue,
            };
            stats.formula_cells += 1;
            let expr = match parse_formula(formula) {
                Ok(expr) => expr,
                Err(err) => {
                    stats.errors += 1;
                    log::debug!("row {} {}: unparseable formula {formula:?}: {err}", row.id, slot);
                    continue;
                }
            };
            let refs = references(&expr);
            match lower(&expr) {
                Ok(lowered) => {
                    parsed.insert((row.id, slot), ParsedFormula { lowered, refs });
                }
                Err(err) => {
                    stats.errors += 1;
                    log::debug!("row {} {}: formula {formula:?} rejected: {err}", row.id, slot);
                }
            }
        }
    }
    parsed
}

/// Bindings holding the numeric student entries, keyed by data tag
fn student_bindings(sheet: &Worksheet) -> Bindings {
    let mut bindings = Bindings::new();
    for row in sheet.rows() {
        for (_, cell) in row.trial_cells() {
            if let (Some(tag), Some(value)) = (&cell.data_tag, cell.student_value()) {
                bindings.set(tag.as_str(), value);
            }
        }
    }
    bindings
}

/// Layer every known expected value on top of the student bindings. Where a
/// tag has both, the expected value wins.
fn overlay_expected(sheet: &Worksheet, mut bindings: Bindings) -> Bindings {
    for row in sheet.rows() {
        for (_, cell) in row.trial_cells() {
            if let (Some(tag), Some(value)) = (&cell.data_tag, cell.expected) {
                bindings.set(tag.as_str(), value);
            }
        }
    }
    bindings
}

/// Run one resolution pass. Dependency state is refreshed on every formula
/// cell; evaluation only fills cells whose expected value is still empty.
/// A cell that failed in an earlier pass is retried against the fresh
/// bindings but counted in `errors` only once per recompute. Returns the
/// number of cells resolved.
fn run_pass(
    sheet: &mut Worksheet,
    parsed: &AHashMap<(RowId, TrialSlot), ParsedFormula>,
    bindings: &Bindings,
    failed: &mut AHashSet<(RowId, TrialSlot)>,
    errors: &mut usize,
) -> usize {
    let mut computed = 0;
    for row in sheet.rows_mut() {
        let row_id = row.id;
        for slot in TrialSlot::ALL {
            let cell = match row.trial_mut(slot) {
                Some(cell) => cell,
                None => continue,
            };
            if cell.formula.is_none() {
                continue;
            }
            let prepared = match parsed.get(&(row_id, slot)) {
                Some(prepared) => prepared,
                None => {
                    // Malformed formula: nothing actionable to report
                    cell.can_calculate = false;
                    cell.missing_deps.clear();
                    continue;
                }
            };

            let missing: Vec<String> = prepared
                .refs
                .iter()
                .filter(|tag| !bindings.contains(tag))
                .cloned()
                .collect();
            cell.can_calculate = missing.is_empty();
            cell.missing_deps = missing;

            if cell.expected.is_some() || !cell.can_calculate {
                continue;
            }
            match evaluate(&prepared.lowered, bindings) {
                Ok(value) => {
                    cell.expected = Some(value);
                    computed += 1;
                }
                Err(err) => {
                    if failed.insert((row_id, slot)) {
                        *errors += 1;
                    }
                    log::debug!("row {row_id} {slot}: {err}");
                }
            }
        }
    }
    computed
}
