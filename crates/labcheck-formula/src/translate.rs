//! Formula lowering
//!
//! Rewrites a parsed formula into the small arithmetic core the evaluator
//! understands. Function calls are expanded in place: `SUM` becomes a chain
//! of additions and `AVERAGE` a sum divided by the argument count. A range
//! `REF1:REF2` stands for the value of its start cell, which is how row
//! ranges are approximated in single-value trials; the collapse happens
//! before the surrounding call is expanded, so `SUM(C2:C5,D1)` lowers to
//! `C2+D1`.
//!
//! Lowered trees contain only `Number`, `Ref`, `BinaryOp`, and `UnaryOp`
//! nodes.

use crate::ast::{BinaryOperator, Expr};
use crate::error::{FormulaError, FormulaResult};

/// Lower a parsed formula to the arithmetic core
pub fn lower(expr: &Expr) -> FormulaResult<Expr> {
    match expr {
        Expr::Number(n) => Ok(Expr::Number(*n)),

        Expr::Ref(tag) => Ok(Expr::Ref(tag.clone())),

        // A range stands for its start cell
        Expr::Range { start, .. } => Ok(Expr::Ref(start.clone())),

        Expr::BinaryOp { op, left, right } => {
            Ok(Expr::binary(*op, lower(left)?, lower(right)?))
        }

        Expr::UnaryOp { op, operand } => Ok(Expr::unary(*op, lower(operand)?)),

        Expr::Function { name, args } => lower_function(name, args),
    }
}

fn lower_function(name: &str, args: &[Expr]) -> FormulaResult<Expr> {
    match name {
        "SUM" => {
            let args = lower_args(name, args)?;
            Ok(fold_add(args))
        }
        "AVERAGE" => {
            let count = args.len();
            let args = lower_args(name, args)?;
            Ok(Expr::binary(
                BinaryOperator::Divide,
                fold_add(args),
                Expr::Number(count as f64),
            ))
        }
        other => Err(FormulaError::UnknownFunction(other.to_string())),
    }
}

fn lower_args(name: &str, args: &[Expr]) -> FormulaResult<Vec<Expr>> {
    if args.is_empty() {
        return Err(FormulaError::ArgumentCount {
            function: name.to_string(),
            expected: "at least 1",
            actual: 0,
        });
    }
    args.iter().map(lower).collect()
}

/// Left-fold a non-empty argument list into an addition chain
fn fold_add(args: Vec<Expr>) -> Expr {
    let mut iter = args.into_iter();
    let first = match iter.next() {
        Some(expr) => expr,
        None => Expr::Number(0.0),
    };
    iter.fold(first, |acc, arg| {
        Expr::binary(BinaryOperator::Add, acc, arg)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::UnaryOperator;
    use crate::parser::parse_formula;

    fn lowered(formula: &str) -> Expr {
        lower(&parse_formula(formula).unwrap()).unwrap()
    }

    #[test]
    fn test_lower_sum_to_addition_chain() {
        // SUM(A1,A2,A3) becomes (A1+A2)+A3
        let expr = lowered("=SUM(A1,A2,A3)");
        assert_eq!(
            expr,
            Expr::binary(
                BinaryOperator::Add,
                Expr::binary(
                    BinaryOperator::Add,
                    Expr::Ref("A1".into()),
                    Expr::Ref("A2".into())
                ),
                Expr::Ref("A3".into())
            )
        );
    }

    #[test]
    fn test_lower_average_divides_by_count() {
        let expr = lowered("=AVERAGE(A1,A2)");
        assert_eq!(
            expr,
            Expr::binary(
                BinaryOperator::Divide,
                Expr::binary(
                    BinaryOperator::Add,
                    Expr::Ref("A1".into()),
                    Expr::Ref("A2".into())
                ),
                Expr::Number(2.0)
            )
        );
    }

    #[test]
    fn test_lower_range_to_start_ref() {
        let expr = lowered("=C2:C5");
        assert_eq!(expr, Expr::Ref("C2".into()));

        // Range collapse happens before SUM expansion
        let expr = lowered("=SUM(C2:C5,D1)");
        assert_eq!(
            expr,
            Expr::binary(
                BinaryOperator::Add,
                Expr::Ref("C2".into()),
                Expr::Ref("D1".into())
            )
        );
    }

    #[test]
    fn test_lower_single_argument_sum() {
        let expr = lowered("=SUM(A1)");
        assert_eq!(expr, Expr::Ref("A1".into()));
    }

    #[test]
    fn test_lower_preserves_negated_exponent() {
        let expr = lowered("=10^-E4");
        if let Expr::BinaryOp { op, right, .. } = expr {
            assert_eq!(op, BinaryOperator::Power);
            assert!(matches!(
                *right,
                Expr::UnaryOp {
                    op: UnaryOperator::Negate,
                    ..
                }
            ));
        } else {
            panic!("Expected BinaryOp");
        }
    }

    #[test]
    fn test_lower_nested_function() {
        let expr = lowered("=SUM(A1,AVERAGE(B1,B2))/2");
        // Just check the shape is pure arithmetic
        fn pure(expr: &Expr) -> bool {
            match expr {
                Expr::Number(_) | Expr::Ref(_) => true,
                Expr::BinaryOp { left, right, .. } => pure(left) && pure(right),
                Expr::UnaryOp { operand, .. } => pure(operand),
                Expr::Function { .. } | Expr::Range { .. } => false,
            }
        }
        assert!(pure(&expr));
    }

    #[test]
    fn test_unknown_function_rejected() {
        let ast = parse_formula("=MEDIAN(A1,A2)").unwrap();
        assert!(matches!(
            lower(&ast),
            Err(FormulaError::UnknownFunction(name)) if name == "MEDIAN"
        ));
    }

    #[test]
    fn test_empty_argument_list_rejected() {
        let ast = parse_formula("=SUM()").unwrap();
        assert!(matches!(
            lower(&ast),
            Err(FormulaError::ArgumentCount { .. })
        ));
    }
}
