use serde::Deserialize;
use serde_json::{Map, Value};

/// Minimum accepted execution budget.
pub const MIN_TIMEOUT_MS: u64 = 100;
/// Maximum accepted execution budget.
pub const MAX_TIMEOUT_MS: u64 = 30_000;
/// Budget used when the caller does not specify one.
pub const DEFAULT_TIMEOUT_MS: u64 = 5_000;

/// One script-execution request: source text, named input values, and a
/// wall-clock budget. Immutable once constructed.
#[derive(Debug, Clone, Deserialize)]
pub struct ExecutionRequest {
    pub code: String,
    #[serde(default)]
    pub input: Map<String, Value>,
    #[serde(rename = "timeout", default = "default_timeout")]
    pub timeout_ms: u64,
}

fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_MS
}

impl ExecutionRequest {
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            input: Map::new(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }

    pub fn with_input(mut self, input: Map<String, Value>) -> Self {
        self.input = input;
        self
    }

    /// Add a single named input value.
    pub fn with_value(mut self, name: impl Into<String>, value: Value) -> Self {
        self.input.insert(name.into(), value);
        self
    }

    pub fn with_timeout(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Budget actually enforced, clamped to the accepted range.
    pub fn effective_timeout_ms(&self) -> u64 {
        self.timeout_ms.clamp(MIN_TIMEOUT_MS, MAX_TIMEOUT_MS)
    }
}
