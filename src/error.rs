//! Errors raised by ring, polynomial and ideal operations.

use std::fmt;

/// Errors that can occur when constructing or manipulating polynomials and ideals.
///
/// All errors are raised synchronously at the point of violation. Inputs are never
/// modified when an error is returned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AlgebraError {
    /// An operand or generator belongs to a different polynomial ring.
    RingMismatch,
    /// Division by the zero element of a coefficient domain.
    DivisionByZero,
    /// An exponent vector does not have the arity of the ring.
    Arity { expected: usize, found: usize },
    /// A variable or parameter name is not part of the ring.
    UnknownVariable(String),
    /// The input text could not be parsed as a polynomial.
    Parse(String),
    /// A computation was cancelled by its observer.
    Cancelled,
}

impl fmt::Display for AlgebraError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AlgebraError::RingMismatch => write!(f, "The polynomials belong to different rings"),
            AlgebraError::DivisionByZero => write!(f, "Division by zero"),
            AlgebraError::Arity { expected, found } => write!(
                f,
                "Exponent vector has length {}, but the ring has {} variables",
                found, expected
            ),
            AlgebraError::UnknownVariable(name) => write!(f, "Unknown variable '{}'", name),
            AlgebraError::Parse(msg) => write!(f, "Parse error: {}", msg),
            AlgebraError::Cancelled => write!(f, "The computation was cancelled"),
        }
    }
}

impl std::error::Error for AlgebraError {}
