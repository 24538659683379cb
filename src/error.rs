use thiserror::Error;

/// Errors reported by the cycle construction strategies.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// A constructor parameter failed a strategy precondition (odd side
    /// length, side length not a power of two, side length below 2).
    /// Reported before any construction work starts.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A structural invariant was broken mid-construction. This always
    /// indicates a bug in the move logic, never bad user input.
    #[error("internal invariant violated: {0}")]
    InvariantViolation(String),

    /// A bounded retry loop (cycle closure, tiling restart) exhausted its
    /// budget without reaching a single Hamiltonian cycle.
    #[error("construction failed to converge: {0}")]
    NonConvergence(String),
}

/// Result type for cycle construction operations.
pub type Result<T> = std::result::Result<T, Error>;
