mod error;
mod outcome;
mod request;

pub use error::ExecutionError;
pub use outcome::{ExecutionOutcome, SafetyVerdict};
pub use request::{ExecutionRequest, DEFAULT_TIMEOUT_MS, MAX_TIMEOUT_MS, MIN_TIMEOUT_MS};
