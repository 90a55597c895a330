use serde::Serialize;
use serde_json::Value;

/// Verdict of the static safety validator. Produced once per request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SafetyVerdict {
    Allowed,
    Rejected(String),
}

impl SafetyVerdict {
    pub fn is_allowed(&self) -> bool {
        matches!(self, SafetyVerdict::Allowed)
    }

    pub fn reason(&self) -> Option<&str> {
        match self {
            SafetyVerdict::Allowed => None,
            SafetyVerdict::Rejected(reason) => Some(reason),
        }
    }
}

/// Result record of one execution. Produced exactly once per request,
/// immutable after construction.
#[derive(Debug, Clone, Serialize)]
pub struct ExecutionOutcome {
    pub ok: bool,
    /// Value the code passed to `setResult`, or the completion value of the
    /// snippet body. `None` when the code produced neither.
    pub result: Option<Value>,
    /// One entry per `console_output` call, each retaining the exact
    /// argument list, in invocation order.
    pub logs: Vec<Vec<Value>>,
    pub error: Option<String>,
    pub elapsed_ms: u64,
}

impl ExecutionOutcome {
    pub fn success(result: Option<Value>, logs: Vec<Vec<Value>>, elapsed_ms: u64) -> Self {
        Self {
            ok: true,
            result,
            logs,
            error: None,
            elapsed_ms,
        }
    }

    pub fn failure(error: impl Into<String>, logs: Vec<Vec<Value>>, elapsed_ms: u64) -> Self {
        Self {
            ok: false,
            result: None,
            logs,
            error: Some(error.into()),
            elapsed_ms,
        }
    }

    /// Outcome for a request the validator refused. Never carries logs.
    pub fn rejected(reason: impl Into<String>, elapsed_ms: u64) -> Self {
        Self::failure(reason, Vec::new(), elapsed_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_verdict_accessors() {
        assert!(SafetyVerdict::Allowed.is_allowed());
        assert_eq!(SafetyVerdict::Allowed.reason(), None);

        let rejected = SafetyVerdict::Rejected("bad".to_string());
        assert!(!rejected.is_allowed());
        assert_eq!(rejected.reason(), Some("bad"));
    }

    #[test]
    fn test_success_outcome() {
        let outcome = ExecutionOutcome::success(Some(json!(42)), vec![vec![json!("hi")]], 3);
        assert!(outcome.ok);
        assert_eq!(outcome.result, Some(json!(42)));
        assert!(outcome.error.is_none());
    }

    #[test]
    fn test_rejected_outcome_has_no_logs() {
        let outcome = ExecutionOutcome::rejected("Forbidden keyword", 0);
        assert!(!outcome.ok);
        assert!(outcome.logs.is_empty());
        assert!(outcome.result.is_none());
    }
}
