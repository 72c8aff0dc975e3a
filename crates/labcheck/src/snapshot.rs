//! Saving and restoring student work
//!
//! A [`SessionSnapshot`] captures only what the student typed: their entries,
//! the worksheet title, and a timestamp. Computed values and verdicts are
//! deliberately left out; restoring replays the entries and recomputes, so
//! derived state can never go stale in storage. Snapshots serialize with
//! serde and expire after [`MAX_SNAPSHOT_AGE_DAYS`].

use chrono::{DateTime, Duration, Utc};
use labcheck_core::{RowId, StudentEntry, TrialSlot, Worksheet};
use serde::{Deserialize, Serialize};

/// How long a snapshot stays restorable
pub const MAX_SNAPSHOT_AGE_DAYS: i64 = 7;

/// One saved student entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntrySnapshot {
    pub row: RowId,
    pub slot: TrialSlot,
    pub entry: StudentEntry,
}

/// A point-in-time capture of everything the student has entered
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    /// Title of the worksheet the entries came from
    pub title: String,
    /// When the capture was taken
    pub saved_at: DateTime<Utc>,
    /// Student entries in row order
    pub entries: Vec<EntrySnapshot>,
}

impl SessionSnapshot {
    /// Capture all student entries of a worksheet, stamped now
    pub fn capture(sheet: &Worksheet) -> Self {
        Self::capture_at(sheet, Utc::now())
    }

    /// Capture with an explicit timestamp
    pub fn capture_at(sheet: &Worksheet, saved_at: DateTime<Utc>) -> Self {
        let mut entries = Vec::new();
        for row in sheet.rows() {
            for (slot, cell) in row.trial_cells() {
                if let Some(entry) = &cell.student {
                    entries.push(EntrySnapshot {
                        row: row.id,
                        slot,
                        entry: entry.clone(),
                    });
                }
            }
        }
        Self {
            title: sheet.title().to_string(),
            saved_at,
            entries,
        }
    }

    /// Whether the snapshot is older than [`MAX_SNAPSHOT_AGE_DAYS`] at `now`
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now - self.saved_at > Duration::days(MAX_SNAPSHOT_AGE_DAYS)
    }

    /// Number of saved entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the snapshot holds no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use labcheck_core::{EntryType, Row, TrialCell};

    fn sheet_with_entries() -> Worksheet {
        let mut sheet = Worksheet::new("Titration Lab", 0.10, 0.15);

        let mut mass = Row::new(RowId(4), "Mass of sample", EntryType::Data);
        let mut cell = TrialCell::new();
        cell.student = Some(StudentEntry::Value(2.015));
        mass.trials[0] = Some(cell);
        mass.trials[1] = Some(TrialCell::new());
        sheet.push_row(mass);

        let mut color = Row::new(RowId(5), "Indicator color", EntryType::Choice);
        let mut cell = TrialCell::new();
        cell.student = Some(StudentEntry::Choice("pink".to_string()));
        color.trials[0] = Some(cell);
        sheet.push_row(color);

        sheet
    }

    #[test]
    fn test_capture_takes_entries_only() {
        let mut sheet = sheet_with_entries();
        // Derived state must not leak into the capture
        if let Ok(cell) = sheet.cell_mut(RowId(4), TrialSlot::One) {
            cell.expected = Some(2.0);
        }

        let snapshot = SessionSnapshot::capture(&sheet);
        assert_eq!(snapshot.title, "Titration Lab");
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot.entries[0].row, RowId(4));
        assert_eq!(snapshot.entries[0].entry, StudentEntry::Value(2.015));
        assert_eq!(
            snapshot.entries[1].entry,
            StudentEntry::Choice("pink".to_string())
        );
    }

    #[test]
    fn test_expiry_boundary() {
        let saved = Utc::now();
        let snapshot = SessionSnapshot::capture_at(&sheet_with_entries(), saved);

        assert!(!snapshot.is_expired(saved + Duration::days(7)));
        assert!(snapshot.is_expired(saved + Duration::days(7) + Duration::seconds(1)));
    }

    #[test]
    fn test_empty_capture() {
        let snapshot = SessionSnapshot::capture(&Worksheet::empty());
        assert!(snapshot.is_empty());
        assert_eq!(snapshot.len(), 0);
    }

    #[test]
    fn test_serde_round_trip() {
        let snapshot = SessionSnapshot::capture(&sheet_with_entries());
        let json = serde_json::to_string(&snapshot).unwrap();
        let back: SessionSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back, snapshot);
    }
}
