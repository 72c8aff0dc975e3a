//! WASM binding tests
//!
//! Run with: wasm-pack test --node

#![cfg(target_arch = "wasm32")]

use wasm_bindgen_test::*;

use labcheck_wasm::LabSession;

const DOCUMENT: &str = "\
,Density of Water,,,,
Section,Subsection,Label,Unit,Entry Type,DataRef 1,Trial 1
Part A,,,,,,
,,Mass of water,g,Data,=A1,9.98
,,Volume of water,mL,Data,=B1,10.0
,,Density,g/mL,Calculated,=C1,=A1/B1
";

fn loaded_session() -> LabSession {
    let mut session = LabSession::without_pacing();
    session.load_worksheet(DOCUMENT).unwrap();
    session
}

#[wasm_bindgen_test]
fn test_load_worksheet() {
    let session = loaded_session();
    assert_eq!(session.title(), "Density of Water");
    assert_eq!(session.tolerance(), 0.10);
    assert_eq!(session.tolerance_close(), 0.15);
}

#[wasm_bindgen_test]
fn test_load_failure_is_error() {
    let mut session = LabSession::without_pacing();
    assert!(session.load_worksheet("not a worksheet").is_err());
}

#[wasm_bindgen_test]
fn test_completion_tracks_entries() {
    let mut session = loaded_session();
    let filled = session.completion().get(0).as_f64().unwrap();
    assert_eq!(filled, 0.0);

    session.edit_value(4, 1, Some(9.98)).unwrap();
    let filled = session.completion().get(0).as_f64().unwrap();
    assert_eq!(filled, 1.0);
}

#[wasm_bindgen_test]
fn test_trial_numbers_are_one_based() {
    let mut session = loaded_session();
    assert!(session.edit_value(4, 0, Some(1.0)).is_err());
    assert!(session.edit_value(4, 3, Some(1.0)).is_err());
    assert!(session.edit_value(4, 1, Some(1.0)).is_ok());
}

#[wasm_bindgen_test]
fn test_check_flow() {
    let mut session = loaded_session();
    session.edit_value(4, 1, Some(9.98)).unwrap();
    session.edit_value(5, 1, Some(10.0)).unwrap();
    session.edit_value(6, 1, Some(0.998)).unwrap();

    let handle = session.check_subsection("Part A", "").unwrap();
    assert_eq!(handle.delay_ms(), 0.0);
    assert!(session.has_pending_check("Part A", ""));

    let outcome = session.finish_check(handle).unwrap();
    let applied = js_sys::Reflect::get(&outcome, &"applied".into()).unwrap();
    assert_eq!(applied.as_bool(), Some(true));
    let graded = js_sys::Reflect::get(&outcome, &"graded".into()).unwrap();
    assert_eq!(graded.as_f64(), Some(1.0));
}

#[wasm_bindgen_test]
fn test_edit_supersedes_check() {
    let mut session = loaded_session();
    session.edit_value(4, 1, Some(9.98)).unwrap();
    session.edit_value(5, 1, Some(10.0)).unwrap();
    session.edit_value(6, 1, Some(0.998)).unwrap();

    let handle = session.check_subsection("Part A", "").unwrap();
    session.edit_value(4, 1, Some(10.02)).unwrap();

    let outcome = session.finish_check(handle).unwrap();
    let applied = js_sys::Reflect::get(&outcome, &"applied".into()).unwrap();
    assert_eq!(applied.as_bool(), Some(false));
}

#[wasm_bindgen_test]
fn test_snapshot_round_trip() {
    let mut session = loaded_session();
    session.edit_value(4, 1, Some(9.98)).unwrap();

    let saved = session.snapshot().unwrap();

    let mut fresh = LabSession::without_pacing();
    fresh.load_worksheet(DOCUMENT).unwrap();
    let applied = fresh.restore_snapshot(saved).unwrap();
    assert_eq!(applied, 1);
}

#[wasm_bindgen_test]
fn test_reset_all() {
    let mut session = loaded_session();
    session.edit_value(4, 1, Some(9.98)).unwrap();
    session.reset_all();
    let filled = session.completion().get(0).as_f64().unwrap();
    assert_eq!(filled, 0.0);
}

#[wasm_bindgen_test]
fn test_report_text() {
    let mut session = loaded_session();
    session.edit_value(4, 1, Some(9.98)).unwrap();
    let text = session.report_text(Some("A. Lavoisier".to_string()));
    assert!(text.contains("Density of Water"));
    assert!(text.contains("Student: A. Lavoisier"));
}
