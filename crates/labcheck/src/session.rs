//! Check/reset session over a loaded worksheet
//!
//! A [`Session`] owns one worksheet and funnels every mutation through the
//! recompute-then-grade lifecycle: edits invalidate their subsection's
//! verdicts and recompute, checks grade a subsection after a paced delay,
//! resets clear verdicts or entries.
//!
//! Checks are deliberately slow. [`Session::check_subsection`] does not
//! grade; it hands back a [`CheckTicket`] carrying a jittered delay, and the
//! caller grades by presenting the ticket to [`Session::finish_check`] once
//! the delay has run. Any edit, reset, or reload in between invalidates the
//! ticket, so a stale completion can never overwrite newer state. The
//! session itself never sleeps or spawns anything.
//!
//! # Example
//!
//! ```rust,ignore
//! use labcheck::prelude::*;
//!
//! let mut session = Session::with_pacing(CheckPacing::none());
//! session.load_worksheet(&document)?;
//!
//! session.edit_value(RowId(6), TrialSlot::One, Some(0.9970))?;
//! let key = session.worksheet().subsections()[0].clone();
//! let ticket = session.check_subsection(&key)?;
//! std::thread::sleep(ticket.delay());
//! let outcome = session.finish_check(ticket);
//! ```

use std::path::Path;
use std::time::Duration;

use ahash::AHashMap;
use labcheck_core::{
    EntryType, Error, Result, RowId, StudentEntry, SubsectionKey, TrialSlot, Worksheet,
};
use labcheck_csv::{LoadError, WorksheetReader};
use log::debug;
use rand::Rng;

use crate::engine::{compute_all, RecomputeStats};
use crate::grading::classify;
use crate::snapshot::SessionSnapshot;

/// Delay window for check completion
///
/// Checks complete after a uniformly drawn delay inside `[min, max]`. The
/// default window is 2 to 3 seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckPacing {
    /// Shortest delay before a check may complete
    pub min: Duration,
    /// Longest delay before a check may complete
    pub max: Duration,
}

impl Default for CheckPacing {
    fn default() -> Self {
        Self {
            min: Duration::from_secs(2),
            max: Duration::from_secs(3),
        }
    }
}

impl CheckPacing {
    /// No delay at all, for tests and batch callers
    pub fn none() -> Self {
        Self {
            min: Duration::ZERO,
            max: Duration::ZERO,
        }
    }

    fn sample(&self) -> Duration {
        if self.max <= self.min {
            return self.min;
        }
        let secs = rand::thread_rng().gen_range(self.min.as_secs_f64()..=self.max.as_secs_f64());
        Duration::from_secs_f64(secs)
    }
}

/// Handle for one registered check
///
/// Produced by [`Session::check_subsection`]; redeemed exactly once with
/// [`Session::finish_check`] after the carried delay has elapsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckTicket {
    subsection: SubsectionKey,
    stamp: u64,
    delay: Duration,
}

impl CheckTicket {
    /// The subsection this check targets
    pub fn subsection(&self) -> &SubsectionKey {
        &self.subsection
    }

    /// How long the caller should wait before finishing the check
    pub fn delay(&self) -> Duration {
        self.delay
    }
}

/// What became of a finished check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckOutcome {
    /// The check ran; this many trial values received a verdict
    Applied { graded: usize },
    /// An edit, reset, or reload intervened; nothing changed
    Superseded,
}

/// One student's working state: a worksheet plus the in-flight checks
#[derive(Debug)]
pub struct Session {
    worksheet: Worksheet,
    pacing: CheckPacing,
    /// Pending checks by subsection, holding the stamp issued to the ticket
    pending: AHashMap<SubsectionKey, u64>,
    next_stamp: u64,
    last_recompute: RecomputeStats,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    /// Create an empty session with default pacing
    pub fn new() -> Self {
        Self::with_pacing(CheckPacing::default())
    }

    /// Create an empty session with the given check pacing
    pub fn with_pacing(pacing: CheckPacing) -> Self {
        Self {
            worksheet: Worksheet::empty(),
            pacing,
            pending: AHashMap::new(),
            next_stamp: 0,
            last_recompute: RecomputeStats::default(),
        }
    }

    /// The current worksheet
    pub fn worksheet(&self) -> &Worksheet {
        &self.worksheet
    }

    /// Statistics from the most recent recomputation
    pub fn last_recompute(&self) -> &RecomputeStats {
        &self.last_recompute
    }

    /// Change the check pacing window
    pub fn set_pacing(&mut self, pacing: CheckPacing) {
        self.pacing = pacing;
    }

    /// Whether a check is pending for this subsection
    pub fn has_pending_check(&self, key: &SubsectionKey) -> bool {
        self.pending.contains_key(key)
    }

    /// Replace the worksheet with one parsed from `raw`.
    ///
    /// On failure the previous worksheet stays untouched. On success all
    /// pending checks are dropped and the new worksheet is recomputed once.
    /// Tolerances come from the new document's metadata (or the defaults).
    pub fn load_worksheet(&mut self, raw: &str) -> std::result::Result<(), LoadError> {
        let sheet = WorksheetReader::read_str(raw)?;
        self.install(sheet);
        Ok(())
    }

    /// Replace the worksheet with one loaded from a file. Same semantics as
    /// [`Session::load_worksheet`].
    pub fn load_worksheet_file<P: AsRef<Path>>(
        &mut self,
        path: P,
    ) -> std::result::Result<(), LoadError> {
        let sheet = WorksheetReader::read_file(path)?;
        self.install(sheet);
        Ok(())
    }

    fn install(&mut self, sheet: Worksheet) {
        self.worksheet = sheet;
        self.pending.clear();
        self.last_recompute = compute_all(&mut self.worksheet);
    }

    /// Capture the student's entries for later restoration
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot::capture(&self.worksheet)
    }

    /// Replay a snapshot's entries into the current worksheet.
    ///
    /// Entries whose cell no longer exists, no longer takes input, or no
    /// longer matches the entry kind are skipped. All verdicts are cleared,
    /// pending checks are dropped, and the worksheet is recomputed once.
    /// Returns the number of entries applied.
    pub fn restore_snapshot(&mut self, snapshot: &SessionSnapshot) -> usize {
        let mut applied = 0;
        for saved in &snapshot.entries {
            let entry_type = match self.worksheet.row(saved.row) {
                Some(row) => row.entry_type,
                None => {
                    debug!("snapshot entry for {} dropped: row is gone", saved.row);
                    continue;
                }
            };
            if !entry_fits(&saved.entry, entry_type) {
                debug!(
                    "snapshot entry for {} dropped: {} does not fit a {} row",
                    saved.row,
                    saved.entry.kind(),
                    entry_type
                );
                continue;
            }
            let cell = match self.worksheet.cell_mut(saved.row, saved.slot) {
                Ok(cell) => cell,
                Err(err) => {
                    debug!("snapshot entry dropped: {err}");
                    continue;
                }
            };
            if !cell.accepts_input {
                debug!(
                    "snapshot entry for {} {} dropped: cell takes no input",
                    saved.row, saved.slot
                );
                continue;
            }
            cell.student = Some(saved.entry.clone());
            applied += 1;
        }
        for row in self.worksheet.rows_mut() {
            for cell in row.trials.iter_mut().flatten() {
                cell.verdict = None;
            }
        }
        self.pending.clear();
        self.last_recompute = compute_all(&mut self.worksheet);
        applied
    }

    /// Store a numeric entry (or clear it with `None`)
    pub fn edit_value(&mut self, id: RowId, slot: TrialSlot, value: Option<f64>) -> Result<()> {
        self.apply_edit(id, slot, value.map(StudentEntry::Value))
    }

    /// Store a choice selection (or clear it with `None`)
    pub fn edit_choice(&mut self, id: RowId, slot: TrialSlot, value: Option<String>) -> Result<()> {
        self.apply_edit(id, slot, value.map(StudentEntry::Choice))
    }

    /// Store a free-text observation (or clear it with `None`)
    pub fn edit_text(&mut self, id: RowId, slot: TrialSlot, value: Option<String>) -> Result<()> {
        self.apply_edit(id, slot, value.map(StudentEntry::Text))
    }

    fn apply_edit(&mut self, id: RowId, slot: TrialSlot, entry: Option<StudentEntry>) -> Result<()> {
        let key = {
            let row = self.worksheet.row(id).ok_or(Error::RowNotFound(id))?;
            let cell = row.trial(slot).ok_or(Error::NoSuchTrial { row: id, slot })?;
            if !cell.accepts_input {
                return Err(Error::NotInputCell { row: id, slot });
            }
            if let Some(entry) = &entry {
                if !entry_fits(entry, row.entry_type) {
                    return Err(Error::EntryKindMismatch {
                        row: id,
                        expected: row.entry_type.name(),
                        actual: entry.kind(),
                    });
                }
                if let StudentEntry::Choice(value) = entry {
                    if let Some(options) = &cell.choice_options {
                        if !options.iter().any(|option| option == value) {
                            return Err(Error::UnknownChoice {
                                row: id,
                                value: value.clone(),
                            });
                        }
                    }
                }
            }
            row.subsection_key()
        };

        // Validated; from here on the edit always lands
        if let Ok(cell) = self.worksheet.cell_mut(id, slot) {
            cell.student = entry;
        }
        self.invalidate_verdicts(&key);
        self.pending.remove(&key);
        self.last_recompute = compute_all(&mut self.worksheet);
        Ok(())
    }

    /// An edit anywhere in a subsection makes its calculated rows' verdicts
    /// meaningless until the next check
    fn invalidate_verdicts(&mut self, key: &SubsectionKey) {
        for row in self.worksheet.rows_mut() {
            if &row.subsection_key() == key && !row.is_direct_input() {
                for cell in row.trials.iter_mut().flatten() {
                    cell.verdict = None;
                }
            }
        }
    }

    /// Register a check for one subsection.
    ///
    /// Errors if the subsection has no rows or already has a check pending.
    /// The returned ticket carries the jittered delay the caller should wait
    /// before calling [`Session::finish_check`].
    pub fn check_subsection(&mut self, key: &SubsectionKey) -> Result<CheckTicket> {
        if self.worksheet.rows_in_subsection(key).next().is_none() {
            return Err(Error::SubsectionNotFound(key.clone()));
        }
        if self.pending.contains_key(key) {
            return Err(Error::CheckPending(key.clone()));
        }
        let stamp = self.next_stamp;
        self.next_stamp += 1;
        self.pending.insert(key.clone(), stamp);
        Ok(CheckTicket {
            subsection: key.clone(),
            stamp,
            delay: self.pacing.sample(),
        })
    }

    /// Complete a previously registered check.
    ///
    /// If the ticket is still the pending check for its subsection, the
    /// worksheet is recomputed and every calculated-row trial in the
    /// subsection holding a student value is graded. A ticket invalidated by
    /// an intervening edit, reset, or reload yields
    /// [`CheckOutcome::Superseded`] and changes nothing.
    pub fn finish_check(&mut self, ticket: CheckTicket) -> CheckOutcome {
        match self.pending.get(&ticket.subsection) {
            Some(stamp) if *stamp == ticket.stamp => {}
            _ => return CheckOutcome::Superseded,
        }
        self.pending.remove(&ticket.subsection);
        self.last_recompute = compute_all(&mut self.worksheet);

        let tolerance = self.worksheet.tolerance();
        let tolerance_close = self.worksheet.tolerance_close();
        let mut graded = 0;
        for row in self.worksheet.rows_mut() {
            if row.subsection_key() != ticket.subsection || row.is_direct_input() {
                continue;
            }
            for cell in row.trials.iter_mut().flatten() {
                if cell.student_value().is_none() {
                    continue;
                }
                cell.verdict =
                    classify(cell.student_value(), cell.expected, tolerance, tolerance_close);
                if cell.verdict.is_some() {
                    graded += 1;
                }
            }
        }
        CheckOutcome::Applied { graded }
    }

    /// Clear the verdicts of one subsection and cancel its pending check.
    /// Student entries stay.
    pub fn reset_subsection(&mut self, key: &SubsectionKey) {
        for row in self.worksheet.rows_mut() {
            if &row.subsection_key() != key {
                continue;
            }
            for cell in row.trials.iter_mut().flatten() {
                cell.verdict = None;
            }
        }
        self.pending.remove(key);
    }

    /// Clear every student entry and verdict, cancel all pending checks,
    /// and recompute
    pub fn reset_all(&mut self) {
        for row in self.worksheet.rows_mut() {
            for cell in row.trials.iter_mut().flatten() {
                cell.clear_student();
            }
        }
        self.pending.clear();
        self.last_recompute = compute_all(&mut self.worksheet);
    }

    /// Change the grading tolerances.
    ///
    /// Trials currently holding a verdict are reclassified under the new
    /// thresholds; unchecked trials stay unchecked.
    pub fn set_tolerances(&mut self, tolerance: f64, tolerance_close: f64) {
        self.worksheet.set_tolerances(tolerance, tolerance_close);
        for row in self.worksheet.rows_mut() {
            for cell in row.trials.iter_mut().flatten() {
                if cell.verdict.is_some() {
                    cell.verdict =
                        classify(cell.student_value(), cell.expected, tolerance, tolerance_close);
                }
            }
        }
    }
}

/// Whether an entry kind is storable in a row of this type
fn entry_fits(entry: &StudentEntry, entry_type: EntryType) -> bool {
    match entry {
        StudentEntry::Value(_) => entry_type.is_numeric(),
        StudentEntry::Choice(_) => entry_type == EntryType::Choice,
        StudentEntry::Text(_) => entry_type == EntryType::Text,
    }
}
