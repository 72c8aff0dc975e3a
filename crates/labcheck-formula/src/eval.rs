//! Formula evaluator
//!
//! Evaluates lowered formula ASTs against a set of reference bindings.

use ahash::AHashMap;

use crate::ast::{BinaryOperator, Expr, UnaryOperator};
use crate::error::{FormulaError, FormulaResult};
use crate::parser::parse_formula;
use crate::translate::lower;

/// Reference bindings for evaluation
///
/// Maps data tags to the numbers they currently stand for. Built fresh for
/// each recomputation pass.
#[derive(Debug, Clone, Default)]
pub struct Bindings {
    values: AHashMap<String, f64>,
}

impl Bindings {
    /// Create an empty binding set
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a tag to a value, replacing any previous binding
    pub fn set<S: Into<String>>(&mut self, tag: S, value: f64) {
        self.values.insert(tag.into(), value);
    }

    /// Look up a tag
    pub fn get(&self, tag: &str) -> Option<f64> {
        self.values.get(tag).copied()
    }

    /// Whether a tag is bound
    pub fn contains(&self, tag: &str) -> bool {
        self.values.contains_key(tag)
    }

    /// Number of bound tags
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether no tags are bound
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Evaluate a lowered formula expression against bindings
///
/// The input must already be lowered: function calls and ranges are
/// rejected as evaluation errors here, not expanded.
pub fn evaluate(expr: &Expr, bindings: &Bindings) -> FormulaResult<f64> {
    match expr {
        Expr::Number(n) => Ok(*n),

        Expr::Ref(tag) => bindings
            .get(tag)
            .ok_or_else(|| FormulaError::UnresolvedReference(tag.clone())),

        Expr::BinaryOp { op, left, right } => {
            let l = evaluate(left, bindings)?;
            let r = evaluate(right, bindings)?;
            apply_binary(*op, l, r)
        }

        Expr::UnaryOp { op, operand } => {
            let v = evaluate(operand, bindings)?;
            match op {
                UnaryOperator::Negate => Ok(-v),
            }
        }

        Expr::Function { name, .. } => Err(FormulaError::Evaluation(format!(
            "Function {} not lowered before evaluation",
            name
        ))),

        Expr::Range { start, end } => Err(FormulaError::Evaluation(format!(
            "Range {}:{} not lowered before evaluation",
            start, end
        ))),
    }
}

fn apply_binary(op: BinaryOperator, l: f64, r: f64) -> FormulaResult<f64> {
    let result = match op {
        BinaryOperator::Add => l + r,
        BinaryOperator::Subtract => l - r,
        BinaryOperator::Multiply => l * r,
        BinaryOperator::Divide => {
            if r == 0.0 {
                return Err(FormulaError::Domain("Division by zero".into()));
            }
            l / r
        }
        BinaryOperator::Power => l.powf(r),
    };

    if result.is_nan() || result.is_infinite() {
        return Err(FormulaError::Domain(format!(
            "Result of {:?} is not a finite number",
            op
        )));
    }

    Ok(result)
}

/// Parse, lower, and evaluate a formula string in one step
pub fn evaluate_formula(formula: &str, bindings: &Bindings) -> FormulaResult<f64> {
    let ast = parse_formula(formula)?;
    let lowered = lower(&ast)?;
    evaluate(&lowered, bindings)
}
