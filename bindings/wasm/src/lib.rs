//! WebAssembly bindings for labcheck
//!
//! This module provides wasm-bindgen-based WebAssembly bindings for the
//! labcheck library, allowing JavaScript/TypeScript code to load worksheets,
//! enter values, and run checks in the browser.

use wasm_bindgen::prelude::*;

use labcheck::{
    CheckOutcome, CheckPacing, CheckTicket, Report, RowId, Session, SessionSnapshot,
    SubsectionKey, TrialSlot,
};

// =============================================================================
// Error Conversion
// =============================================================================

fn to_js_error(e: impl std::fmt::Display) -> JsError {
    JsError::new(&e.to_string())
}

/// Map a 1-based trial number from JS to a trial slot
fn slot_from_js(trial: u32) -> Result<TrialSlot, JsError> {
    match trial {
        0 => Err(JsError::new("Trial numbers are 1-based")),
        n => TrialSlot::from_index((n - 1) as usize)
            .ok_or_else(|| JsError::new(&format!("No trial {}", n))),
    }
}

// =============================================================================
// CheckHandle - one registered check, redeemed after its delay
// =============================================================================

/// Handle for an in-flight check.
///
/// Wait `delayMs` (for example with `setTimeout`) and then pass the handle
/// to `finishCheck`.
#[wasm_bindgen]
pub struct CheckHandle {
    inner: CheckTicket,
}

#[wasm_bindgen]
impl CheckHandle {
    /// Milliseconds the caller should wait before finishing the check
    #[wasm_bindgen(getter, js_name = delayMs)]
    pub fn delay_ms(&self) -> f64 {
        self.inner.delay().as_secs_f64() * 1000.0
    }

    #[wasm_bindgen(getter)]
    pub fn section(&self) -> String {
        self.inner.subsection().section.clone()
    }

    #[wasm_bindgen(getter)]
    pub fn subsection(&self) -> String {
        self.inner.subsection().subsection.clone()
    }
}

// =============================================================================
// LabSession - JavaScript wrapper for a checking session
// =============================================================================

/// A worksheet session: one loaded worksheet plus its in-flight checks.
#[wasm_bindgen]
pub struct LabSession {
    inner: Session,
}

#[wasm_bindgen]
impl LabSession {
    /// Create an empty session with the default check pacing
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            inner: Session::new(),
        }
    }

    /// Create a session whose checks complete immediately
    #[wasm_bindgen(js_name = withoutPacing)]
    pub fn without_pacing() -> Self {
        Self {
            inner: Session::with_pacing(CheckPacing::none()),
        }
    }

    /// Load a worksheet document, replacing any current one
    #[wasm_bindgen(js_name = loadWorksheet)]
    pub fn load_worksheet(&mut self, text: &str) -> Result<(), JsError> {
        self.inner.load_worksheet(text).map_err(to_js_error)
    }

    #[wasm_bindgen(getter)]
    pub fn title(&self) -> String {
        self.inner.worksheet().title().to_string()
    }

    #[wasm_bindgen(getter)]
    pub fn tolerance(&self) -> f64 {
        self.inner.worksheet().tolerance()
    }

    #[wasm_bindgen(getter, js_name = toleranceClose)]
    pub fn tolerance_close(&self) -> f64 {
        self.inner.worksheet().tolerance_close()
    }

    /// Subsection keys in document order, as `{section, subsection}` objects
    pub fn subsections(&self) -> Result<JsValue, JsError> {
        let keys = self.inner.worksheet().subsections();
        serde_wasm_bindgen::to_value(&keys).map_err(to_js_error)
    }

    /// All rows with their current state
    pub fn rows(&self) -> Result<JsValue, JsError> {
        let rows: Vec<_> = self.inner.worksheet().rows().collect();
        serde_wasm_bindgen::to_value(&rows).map_err(to_js_error)
    }

    /// One row's current state, by row id
    #[wasm_bindgen(js_name = rowState)]
    pub fn row_state(&self, row: u32) -> Result<JsValue, JsError> {
        match self.inner.worksheet().row(RowId(row)) {
            Some(row) => serde_wasm_bindgen::to_value(row).map_err(to_js_error),
            None => Err(JsError::new(&format!("No row #{}", row))),
        }
    }

    /// `[filled, total]` over the input-bearing cells
    pub fn completion(&self) -> js_sys::Array {
        let (filled, total) = self.inner.worksheet().completion();
        let arr = js_sys::Array::new();
        arr.push(&JsValue::from(filled as u32));
        arr.push(&JsValue::from(total as u32));
        arr
    }

    /// Store a numeric entry (pass `null` to clear)
    #[wasm_bindgen(js_name = editValue)]
    pub fn edit_value(&mut self, row: u32, trial: u32, value: Option<f64>) -> Result<(), JsError> {
        let slot = slot_from_js(trial)?;
        self.inner
            .edit_value(RowId(row), slot, value)
            .map_err(to_js_error)
    }

    /// Store a choice selection (pass `null` to clear)
    #[wasm_bindgen(js_name = editChoice)]
    pub fn edit_choice(
        &mut self,
        row: u32,
        trial: u32,
        value: Option<String>,
    ) -> Result<(), JsError> {
        let slot = slot_from_js(trial)?;
        self.inner
            .edit_choice(RowId(row), slot, value)
            .map_err(to_js_error)
    }

    /// Store a free-text observation (pass `null` to clear)
    #[wasm_bindgen(js_name = editText)]
    pub fn edit_text(
        &mut self,
        row: u32,
        trial: u32,
        value: Option<String>,
    ) -> Result<(), JsError> {
        let slot = slot_from_js(trial)?;
        self.inner
            .edit_text(RowId(row), slot, value)
            .map_err(to_js_error)
    }

    /// Register a check for one subsection.
    ///
    /// The returned handle carries the delay to wait before `finishCheck`.
    #[wasm_bindgen(js_name = checkSubsection)]
    pub fn check_subsection(
        &mut self,
        section: &str,
        subsection: &str,
    ) -> Result<CheckHandle, JsError> {
        let key = SubsectionKey::new(section, subsection);
        let ticket = self.inner.check_subsection(&key).map_err(to_js_error)?;
        Ok(CheckHandle { inner: ticket })
    }

    /// Complete a previously registered check.
    ///
    /// Returns `{applied, graded}`; `applied` is false when an edit or reset
    /// made the check stale.
    #[wasm_bindgen(js_name = finishCheck)]
    pub fn finish_check(&mut self, handle: CheckHandle) -> Result<JsValue, JsError> {
        let outcome = self.inner.finish_check(handle.inner);
        let (applied, graded) = match outcome {
            CheckOutcome::Applied { graded } => (true, graded),
            CheckOutcome::Superseded => (false, 0),
        };

        let result = js_sys::Object::new();
        js_sys::Reflect::set(&result, &"applied".into(), &JsValue::from_bool(applied)).ok();
        js_sys::Reflect::set(&result, &"graded".into(), &JsValue::from(graded as u32)).ok();
        Ok(result.into())
    }

    /// Whether a check is pending for this subsection
    #[wasm_bindgen(js_name = hasPendingCheck)]
    pub fn has_pending_check(&self, section: &str, subsection: &str) -> bool {
        let key = SubsectionKey::new(section, subsection);
        self.inner.has_pending_check(&key)
    }

    /// Clear one subsection's verdicts, keeping the entries
    #[wasm_bindgen(js_name = resetSubsection)]
    pub fn reset_subsection(&mut self, section: &str, subsection: &str) {
        let key = SubsectionKey::new(section, subsection);
        self.inner.reset_subsection(&key);
    }

    /// Clear every entry and verdict
    #[wasm_bindgen(js_name = resetAll)]
    pub fn reset_all(&mut self) {
        self.inner.reset_all();
    }

    /// Change the grading tolerances, reclassifying held verdicts
    #[wasm_bindgen(js_name = setTolerances)]
    pub fn set_tolerances(&mut self, tolerance: f64, tolerance_close: f64) {
        self.inner.set_tolerances(tolerance, tolerance_close);
    }

    /// Capture the student's entries for storage (for example localStorage)
    pub fn snapshot(&self) -> Result<JsValue, JsError> {
        serde_wasm_bindgen::to_value(&self.inner.snapshot()).map_err(to_js_error)
    }

    /// Replay a stored snapshot; returns the number of entries applied
    #[wasm_bindgen(js_name = restoreSnapshot)]
    pub fn restore_snapshot(&mut self, value: JsValue) -> Result<u32, JsError> {
        let snapshot: SessionSnapshot =
            serde_wasm_bindgen::from_value(value).map_err(to_js_error)?;
        Ok(self.inner.restore_snapshot(&snapshot) as u32)
    }

    /// Render a paginated text report of the current state
    #[wasm_bindgen(js_name = reportText)]
    pub fn report_text(&self, student: Option<String>) -> String {
        let mut report = Report::build(self.inner.worksheet());
        if let Some(name) = student {
            report = report.with_student(name);
        }
        report.render(78, 52)
    }
}

impl Default for LabSession {
    fn default() -> Self {
        Self::new()
    }
}

#[wasm_bindgen(start)]
pub fn init() {}
