//! Error types.

use thiserror::Error;

/// Failure of an arithmetic operation on affine forms or value diagrams.
///
/// Domain errors carry the enclosing interval `[lo, hi]` of the operand that
/// triggered them.
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum Error {
    #[error("division by an interval containing zero: [{lo}, {hi}]")]
    DivisionByZero { lo: f64, hi: f64 },

    #[error("root of an interval reaching below zero: [{lo}, {hi}]")]
    NegativeRoot { lo: f64, hi: f64 },

    #[error("logarithm of an interval reaching below zero: [{lo}, {hi}]")]
    NegativeLog { lo: f64, hi: f64 },

    #[error("{operation} is only defined on exact values, got [{lo}, {hi}]")]
    UncertainOperand { operation: &'static str, lo: f64, hi: f64 },

    #[error("remainder by zero")]
    RemainderByZero,
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Misuse of the control-flow scope builder.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeError {
    #[error("`begin_else` without an open branch")]
    ElseWithoutBranch,

    #[error("branch already has an else part")]
    DuplicateElse,

    #[error("no open {0} to close")]
    Unbalanced(&'static str),
}
