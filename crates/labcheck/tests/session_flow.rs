//! End-to-end tests for the worksheet session lifecycle
//! (load -> enter -> check -> report -> snapshot -> reset)

use std::fs;

use labcheck::prelude::*;
use pretty_assertions::assert_eq;

/// Two-trial Ka determination worksheet with nested subsections
const KA_DOCUMENT: &str = "\
,Determination of Ka of Acetic Acid,,0.05,,0.10
Section,Subsection,Label,Unit,Entry Type,DataRef 1,Trial 1,DataRef 2,Trial 2
Part A,,,,,,,,
,Preparation,,,,,,,
,,Volume of acid solution,mL,Data,=VA1,25.0,=VA2,25.0
,,Concentration of acid,M,Data,=CA1,0.50,=CA2,0.25
,Measurement,,,,,,,
,,Measured pH,,Data,=PH1,2.52,=PH2,2.67
,,Hydronium concentration,M,Calculated,=H1,=10^(0-PH1),=H2,=10^(0-PH2)
,,Ka of acetic acid,,Calculated,=KA1,=H1*H1/(CA1-H1),=KA2,=H2*H2/(CA2-H2)
Part B,,,,,,,,
,,Average Ka,,Calculated,=KAVG,\"=AVERAGE(KA1,KA2)\",,
,,Indicator color,,Choice,=IC1,red;orange;yellow,,
,,Lab notes,,Text,=NT1,-,,
";

const VOLUME: RowId = RowId(5);
const CONCENTRATION: RowId = RowId(6);
const PH: RowId = RowId(8);
const HYDRONIUM: RowId = RowId(9);
const KA: RowId = RowId(10);
const AVERAGE_KA: RowId = RowId(12);
const INDICATOR: RowId = RowId(13);
const NOTES: RowId = RowId(14);

fn new_session() -> Session {
    let mut session = Session::with_pacing(CheckPacing::none());
    session.load_worksheet(KA_DOCUMENT).unwrap();
    session
}

fn measurement_key(session: &Session) -> SubsectionKey {
    session.worksheet().subsections()[1].clone()
}

fn check_now(session: &mut Session, key: &SubsectionKey) -> CheckOutcome {
    let ticket = session.check_subsection(key).unwrap();
    session.finish_check(ticket)
}

fn verdict(session: &Session, id: RowId, slot: TrialSlot) -> Option<Verdict> {
    session.worksheet().cell(id, slot).unwrap().verdict
}

/// Fill in both trials the way a careful student would
fn fill_measurements(session: &mut Session) {
    session.edit_value(VOLUME, TrialSlot::One, Some(25.0)).unwrap();
    session.edit_value(VOLUME, TrialSlot::Two, Some(25.0)).unwrap();
    session.edit_value(CONCENTRATION, TrialSlot::One, Some(0.50)).unwrap();
    session.edit_value(CONCENTRATION, TrialSlot::Two, Some(0.25)).unwrap();
    session.edit_value(PH, TrialSlot::One, Some(2.52)).unwrap();
    session.edit_value(PH, TrialSlot::Two, Some(2.67)).unwrap();
    session.edit_value(HYDRONIUM, TrialSlot::One, Some(0.00302)).unwrap();
    session.edit_value(HYDRONIUM, TrialSlot::Two, Some(0.00214)).unwrap();
    session.edit_value(KA, TrialSlot::One, Some(1.84e-5)).unwrap();
    session.edit_value(KA, TrialSlot::Two, Some(1.85e-5)).unwrap();
}

/// Document metadata, structure, and grouping all come through the loader
#[test]
fn test_document_structure() {
    let session = new_session();
    let sheet = session.worksheet();

    assert_eq!(sheet.title(), "Determination of Ka of Acetic Acid");
    assert_eq!(sheet.tolerance(), 0.05);
    assert_eq!(sheet.tolerance_close(), 0.10);
    assert_eq!(sheet.row_count(), 8);
    assert_eq!(sheet.sections(), vec!["Part A".to_string(), "Part B".to_string()]);
    assert_eq!(
        sheet.subsections(),
        vec![
            SubsectionKey::new("Part A", "Preparation"),
            SubsectionKey::new("Part A", "Measurement"),
            SubsectionKey::new("Part B", ""),
        ]
    );
}

/// A full pass through the worksheet: everything entered, everything correct
#[test]
fn test_lab_session_end_to_end() {
    let mut session = new_session();
    fill_measurements(&mut session);

    let key = measurement_key(&session);
    let outcome = check_now(&mut session, &key);
    assert_eq!(outcome, CheckOutcome::Applied { graded: 4 });

    for slot in TrialSlot::ALL {
        assert_eq!(verdict(&session, HYDRONIUM, slot), Some(Verdict::Correct));
        assert_eq!(verdict(&session, KA, slot), Some(Verdict::Correct));
        // Direct-input measurements are never graded
        assert_eq!(verdict(&session, PH, slot), None);
    }

    // Part B: the average plus non-numeric observations
    session.edit_value(AVERAGE_KA, TrialSlot::One, Some(1.85e-5)).unwrap();
    session.edit_choice(INDICATOR, TrialSlot::One, Some("yellow".into())).unwrap();
    session.edit_text(NOTES, TrialSlot::One, Some("solution stayed clear".into())).unwrap();

    let part_b = session.worksheet().subsections()[2].clone();
    let outcome = check_now(&mut session, &part_b);
    assert_eq!(outcome, CheckOutcome::Applied { graded: 1 });
    assert_eq!(verdict(&session, AVERAGE_KA, TrialSlot::One), Some(Verdict::Correct));
    assert_eq!(verdict(&session, INDICATOR, TrialSlot::One), None);
}

/// Derived answers are graded against the student's own intermediates, so a
/// consistent chain earns credit even when an intermediate is off
#[test]
fn test_follow_through_from_wrong_intermediate() {
    let mut session = new_session();
    session.edit_value(CONCENTRATION, TrialSlot::One, Some(0.50)).unwrap();
    session.edit_value(PH, TrialSlot::One, Some(2.52)).unwrap();
    // Hydronium is well off the computed 3.02e-3
    session.edit_value(HYDRONIUM, TrialSlot::One, Some(0.004)).unwrap();
    // But the Ka follows from the student's own hydronium
    session.edit_value(KA, TrialSlot::One, Some(3.23e-5)).unwrap();

    let key = measurement_key(&session);
    check_now(&mut session, &key);

    assert_eq!(verdict(&session, HYDRONIUM, TrialSlot::One), Some(Verdict::Incorrect));
    assert_eq!(verdict(&session, KA, TrialSlot::One), Some(Verdict::Correct));
}

/// An edit between registering and finishing a check discards the check
#[test]
fn test_edit_supersedes_inflight_check() {
    let mut session = new_session();
    fill_measurements(&mut session);

    let key = measurement_key(&session);
    let ticket = session.check_subsection(&key).unwrap();
    session.edit_value(PH, TrialSlot::One, Some(2.60)).unwrap();

    assert_eq!(session.finish_check(ticket), CheckOutcome::Superseded);
    assert_eq!(verdict(&session, HYDRONIUM, TrialSlot::One), None);

    // The next check grades against the re-entered pH
    let outcome = check_now(&mut session, &key);
    assert!(matches!(outcome, CheckOutcome::Applied { .. }));
    assert_eq!(verdict(&session, HYDRONIUM, TrialSlot::One), Some(Verdict::Incorrect));
}

/// Resetting a subsection clears verdicts but keeps the entries, so the
/// student can re-check without retyping
#[test]
fn test_reset_subsection_then_recheck() {
    let mut session = new_session();
    fill_measurements(&mut session);

    let key = measurement_key(&session);
    check_now(&mut session, &key);
    assert_eq!(verdict(&session, KA, TrialSlot::One), Some(Verdict::Correct));

    session.reset_subsection(&key);
    assert_eq!(verdict(&session, KA, TrialSlot::One), None);

    let outcome = check_now(&mut session, &key);
    assert_eq!(outcome, CheckOutcome::Applied { graded: 4 });
    assert_eq!(verdict(&session, KA, TrialSlot::One), Some(Verdict::Correct));
}

/// Snapshots serialize through JSON and replay into a fresh session
#[test]
fn test_snapshot_round_trip_between_sessions() {
    let mut first = new_session();
    fill_measurements(&mut first);
    first.edit_choice(INDICATOR, TrialSlot::One, Some("red".into())).unwrap();

    let json = serde_json::to_string(&first.snapshot()).unwrap();

    let mut second = Session::with_pacing(CheckPacing::none());
    second.load_worksheet(KA_DOCUMENT).unwrap();
    let snapshot: SessionSnapshot = serde_json::from_str(&json).unwrap();
    assert!(!snapshot.is_expired(chrono::Utc::now()));

    let applied = second.restore_snapshot(&snapshot);
    assert_eq!(applied, 11);

    let cell = second.worksheet().cell(KA, TrialSlot::Two).unwrap();
    assert_eq!(cell.student_value(), Some(1.85e-5));
    let cell = second.worksheet().cell(INDICATOR, TrialSlot::One).unwrap();
    assert_eq!(cell.student, Some(StudentEntry::Choice("red".into())));
    // Restoration recomputed from the replayed measurements
    let cell = second.worksheet().cell(HYDRONIUM, TrialSlot::One).unwrap();
    assert!(cell.expected.is_some());
}

/// Worksheets load from document files as well as strings
#[test]
fn test_worksheet_file_loading() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ka_lab.csv");
    fs::write(&path, KA_DOCUMENT).unwrap();

    let sheet = Worksheet::load(&path).unwrap();
    assert_eq!(sheet.title(), "Determination of Ka of Acetic Acid");

    let mut session = Session::new();
    session.load_worksheet_file(&path).unwrap();
    assert_eq!(session.worksheet().row_count(), 8);

    assert!(Worksheet::load(dir.path().join("missing.csv")).is_err());
}

/// The report reflects the checked state of the worksheet
#[test]
fn test_report_reflects_checked_state() {
    let mut session = new_session();
    fill_measurements(&mut session);
    session.edit_value(AVERAGE_KA, TrialSlot::One, Some(1.85e-5)).unwrap();

    let key = measurement_key(&session);
    check_now(&mut session, &key);

    let report = Report::build(session.worksheet()).with_student("M. Curie");
    assert_eq!(report.title, "Determination of Ka of Acetic Acid");
    assert_eq!(report.summary.total_rows, 8);
    assert_eq!(report.summary.completed_rows, 6);
    assert_eq!(report.summary.correct_rows, 2);
    assert_eq!(report.summary.completion_percent(), 75);
    assert_eq!(report.summary.accuracy_percent(), 33);

    let text = report.render(80, 60);
    assert!(text.contains("Student: M. Curie"));
    assert!(text.contains("Part A"));
    assert!(text.contains("Measurement"));
    assert!(text.contains("O: "));
    assert!(text.contains("Page 1 of 1"));
}
