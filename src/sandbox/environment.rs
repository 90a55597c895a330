use std::cell::RefCell;
use std::rc::Rc;

use once_cell::sync::Lazy;
use regex::Regex;
use rquickjs::function::Rest;
use rquickjs::{Ctx, Function, Value};
use serde_json::{Map, Value as JsonValue};

use crate::models::ExecutionError;
use crate::sandbox::convert;

/// Optional external sink that receives each `console_output` call
/// synchronously, in addition to the captured log buffer.
pub type LogSink = Rc<dyn Fn(&[JsonValue])>;

/// Binding names the input map can never shadow: the capture/result hooks
/// and the allow-listed library objects already present in a fresh context.
const RESERVED_BINDINGS: &[&str] = &[
    "console_output",
    "setResult",
    "Math",
    "JSON",
    "Date",
    "RegExp",
    "Promise",
    "Object",
    "Array",
    "String",
    "Number",
    "Boolean",
    "Symbol",
    "Error",
    "Map",
    "Set",
    "parseInt",
    "parseFloat",
    "isNaN",
    "isFinite",
    "encodeURI",
    "decodeURI",
    "encodeURIComponent",
    "decodeURIComponent",
    "NaN",
    "Infinity",
    "undefined",
];

static IDENTIFIER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z_$][A-Za-z0-9_$]*$").unwrap());

/// Per-run mutable state threaded into the installed hooks: the ordered log
/// buffer and the single result slot. Created fresh for every execution.
#[derive(Default)]
pub struct CaptureState {
    pub logs: Rc<RefCell<Vec<Vec<JsonValue>>>>,
    pub result: Rc<RefCell<Option<JsonValue>>>,
}

impl CaptureState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn take_logs(&self) -> Vec<Vec<JsonValue>> {
        std::mem::take(&mut *self.logs.borrow_mut())
    }

    pub fn take_result(&self) -> Option<JsonValue> {
        self.result.borrow_mut().take()
    }
}

/// The restricted binding set one execution will see as its entire world:
/// the caller's input values plus the capture and result hooks, layered on
/// top of a fresh context's ECMAScript intrinsics. Lives for exactly one
/// execution.
pub struct SandboxEnvironment {
    input: Map<String, JsonValue>,
    log_sink: Option<LogSink>,
}

impl SandboxEnvironment {
    /// Build an environment from the caller's input map. Every key must be a
    /// valid variable name, because each becomes a directly addressable
    /// global inside the executed code.
    pub fn new(input: Map<String, JsonValue>) -> Result<Self, ExecutionError> {
        for key in input.keys() {
            if !IDENTIFIER_RE.is_match(key) {
                return Err(ExecutionError::InvalidInput(key.clone()));
            }
        }
        Ok(Self {
            input,
            log_sink: None,
        })
    }

    /// Register an external sink that every `console_output` call is
    /// forwarded to, synchronously, as it happens.
    pub fn with_log_sink(mut self, sink: LogSink) -> Self {
        self.log_sink = Some(sink);
        self
    }

    /// Install the binding set into a fresh context. Input values go in
    /// first; the hooks are merged in afterwards so user input can never
    /// shadow them, and keys colliding with the fixed library set are
    /// skipped for the same reason. Finally the dynamic-evaluation globals
    /// are removed from scope.
    pub(crate) fn install<'js>(
        &self,
        ctx: &Ctx<'js>,
        capture: &CaptureState,
    ) -> rquickjs::Result<()> {
        let globals = ctx.globals();

        for (name, value) in &self.input {
            if RESERVED_BINDINGS.contains(&name.as_str()) {
                tracing::warn!(name = %name, "input key shadows a reserved binding, skipped");
                continue;
            }
            globals.set(name.as_str(), convert::json_to_js(ctx, value)?)?;
        }

        let log_buffer = Rc::clone(&capture.logs);
        let sink = self.log_sink.clone();
        let console_output = Function::new(ctx.clone(), move |args: Rest<Value>| {
            let entry: Vec<JsonValue> = args
                .iter()
                .map(|arg| convert::js_to_json(arg).unwrap_or(JsonValue::Null))
                .collect();
            if let Some(sink) = &sink {
                sink(&entry);
            }
            log_buffer.borrow_mut().push(entry);
        })?;
        globals.set("console_output", console_output)?;

        let result_slot = Rc::clone(&capture.result);
        let set_result = Function::new(ctx.clone(), move |value: Value| {
            let snapshot = convert::js_to_json(&value).unwrap_or(JsonValue::Null);
            *result_slot.borrow_mut() = Some(snapshot);
        })?;
        globals.set("setResult", set_result)?;

        // The engine needs the eval intrinsic to load code at all, but the
        // executed snippet must not reach it.
        globals.remove("eval")?;
        globals.remove("Function")?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn input_map(pairs: &[(&str, JsonValue)]) -> Map<String, JsonValue> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn test_valid_input_names() {
        let env = SandboxEnvironment::new(input_map(&[("x", json!(1)), ("_y$2", json!(2))]));
        assert!(env.is_ok());
    }

    #[test]
    fn test_invalid_input_name_rejected() {
        let env = SandboxEnvironment::new(input_map(&[("not a name", json!(1))]));
        assert_eq!(
            env.err(),
            Some(ExecutionError::InvalidInput("not a name".to_string()))
        );
    }

    #[test]
    fn test_leading_digit_rejected() {
        let env = SandboxEnvironment::new(input_map(&[("1st", json!(1))]));
        assert!(env.is_err());
    }
}
