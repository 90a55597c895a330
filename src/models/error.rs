use thiserror::Error;

/// Everything that can make an execution fail. All variants are recoverable
/// and normalize to the same failure envelope; none are allowed to escape as
/// an unhandled fault.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ExecutionError {
    /// The static validator refused the code; it never ran.
    #[error("{0}")]
    Validation(String),

    /// The executing code itself threw. Message text surfaced verbatim.
    #[error("{0}")]
    Runtime(String),

    /// The configured budget elapsed before completion.
    #[error("Execution timed out after {0}ms")]
    Timeout(u64),

    /// An input map key is not usable as a variable name.
    #[error("Invalid input variable name: '{0}'")]
    InvalidInput(String),
}
