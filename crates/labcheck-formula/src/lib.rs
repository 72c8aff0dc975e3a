//! # labcheck-formula
//!
//! Parser and evaluator for the worksheet formula dialect.
//!
//! Formulas are Excel-flavored but deliberately small: arithmetic with the
//! usual precedence, right-associative `^`, unary minus, `SUM` and `AVERAGE`
//! over explicit argument lists, and `REF1:REF2` ranges that stand for their
//! start cell. References are data tags like `E4` bound to numbers at
//! evaluation time; the formula language itself knows nothing about rows
//! or trials.
//!
//! ## Example
//!
//! ```rust
//! use labcheck_formula::{evaluate_formula, extract_references, Bindings};
//!
//! let mut bindings = Bindings::new();
//! bindings.set("A1", 10.0);
//! bindings.set("A2", 4.0);
//!
//! let value = evaluate_formula("=SUM(A1,A2)/2", &bindings).unwrap();
//! assert_eq!(value, 7.0);
//!
//! assert_eq!(extract_references("=A1*A2+A1"), vec!["A1", "A2"]);
//! ```

pub mod ast;
pub mod deps;
pub mod error;
pub mod eval;
pub mod parser;
pub mod translate;

// Re-exports for convenience
pub use ast::{BinaryOperator, Expr, UnaryOperator};
pub use deps::{extract_references, references};
pub use error::{FormulaError, FormulaResult};
pub use eval::{evaluate, evaluate_formula, Bindings};
pub use parser::parse_formula;
pub use translate::lower;
