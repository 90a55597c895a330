//! Conversion of internal outcomes into the external response envelope.
//!
//! This is the sole point where the uniform `ExecutionOutcome` is translated
//! for the calling tool layer. Every outcome maps to exactly one of the two
//! envelope shapes; nothing propagates past here as an unhandled fault.

pub mod worker;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::ExecutionOutcome;

/// Static troubleshooting note attached to every failure.
pub const SOLUTION_TEXT: &str = "Common causes: a syntax error in the code, use of a forbidden \
operation (host globals, eval, prototype access), an infinite loop hitting the execution budget, \
a network error, a type or reference error, or a missing setResult(...) call to return a value. \
Fix the code and try again.";

/// External response envelope consumed by the calling tool layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Envelope {
    Success {
        success: bool,
        result: Value,
        logs: Vec<Vec<Value>>,
        #[serde(rename = "executionTime")]
        execution_time: String,
    },
    Failure {
        #[serde(rename = "isError")]
        is_error: bool,
        error: String,
        solution: String,
    },
}

impl Envelope {
    pub fn is_success(&self) -> bool {
        matches!(self, Envelope::Success { .. })
    }
}

impl From<ExecutionOutcome> for Envelope {
    fn from(outcome: ExecutionOutcome) -> Self {
        if outcome.ok {
            Envelope::Success {
                success: true,
                result: outcome.result.unwrap_or(Value::Null),
                logs: outcome.logs,
                execution_time: format!("{}ms", outcome.elapsed_ms),
            }
        } else {
            Envelope::Failure {
                is_error: true,
                error: outcome
                    .error
                    .unwrap_or_else(|| "unknown error".to_string()),
                solution: SOLUTION_TEXT.to_string(),
            }
        }
    }
}
