//! Calculator core
//!
//! Operand parsing, the four operations and their error kinds.
//! Nothing here knows about HTTP beyond the status each error maps to.

mod error;
mod operand;
mod operation;

pub use error::{CalcError, INTERNAL_ERROR_MSG};
pub use operand::parse_operand;
pub use operation::Operation;

/// Parse both operands and evaluate `op`.
///
/// `on_parsed` runs once both operands are valid, before evaluation.
pub fn evaluate(
    op: Operation,
    n1: Option<&str>,
    n2: Option<&str>,
    on_parsed: impl FnOnce(f64, f64),
) -> Result<f64, CalcError> {
    let n1 = parse_operand(n1)?;
    let n2 = parse_operand(n2)?;
    on_parsed(n1, n2);
    op.apply(n1, n2)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_evaluate_reports_parsed_operands() {
        let mut seen = None;
        let result = evaluate(Operation::Add, Some("2"), Some("3"), |a, b| {
            seen = Some((a, b));
        });
        assert_eq!(result, Ok(5.0));
        assert_eq!(seen, Some((2.0, 3.0)));
    }

    #[test]
    fn test_evaluate_skips_callback_on_bad_input() {
        let mut called = false;
        let result = evaluate(Operation::Add, Some("5"), None, |_, _| called = true);
        assert_eq!(result, Err(CalcError::InvalidInput));
        assert!(!called);
    }

    #[test]
    fn test_division_by_zero_after_parse() {
        let mut called = false;
        let result = evaluate(Operation::Divide, Some("10"), Some("0"), |_, _| {
            called = true;
        });
        assert_eq!(result, Err(CalcError::DivisionByZero));
        // Operands were valid, so the parse log still fires
        assert!(called);
    }
}
