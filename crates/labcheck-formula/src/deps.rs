//! Reference extraction for dependency tracking

use crate::ast::Expr;
use crate::parser::parse_formula;

/// Collect the data tags a formula references
///
/// Tags appear in first-occurrence order with duplicates removed. Both
/// endpoints of a range count as references even though only the start
/// value survives lowering.
pub fn references(expr: &Expr) -> Vec<String> {
    let mut tags = Vec::new();
    walk(expr, &mut tags);
    tags
}

fn walk(expr: &Expr, tags: &mut Vec<String>) {
    match expr {
        Expr::Number(_) => {}
        Expr::Ref(tag) => push_unique(tags, tag),
        Expr::Range { start, end } => {
            push_unique(tags, start);
            push_unique(tags, end);
        }
        Expr::BinaryOp { left, right, .. } => {
            walk(left, tags);
            walk(right, tags);
        }
        Expr::UnaryOp { operand, .. } => walk(operand, tags),
        Expr::Function { args, .. } => {
            for arg in args {
                walk(arg, tags);
            }
        }
    }
}

fn push_unique(tags: &mut Vec<String>, tag: &str) {
    if !tags.iter().any(|t| t == tag) {
        tags.push(tag.to_string());
    }
}

/// Collect the data tags referenced by a formula string
///
/// Returns an empty list for text that is not a formula (no leading '=')
/// or does not parse; callers treat such cells as having no dependencies.
pub fn extract_references(text: &str) -> Vec<String> {
    if !text.trim_start().starts_with('=') {
        return Vec::new();
    }
    match parse_formula(text) {
        Ok(ast) => references(&ast),
        Err(_) => Vec::new(),
    }
}
