use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use rquickjs::{CatchResultExt, CaughtError, Context, Runtime, Value};
use serde_json::Value as JsonValue;

use crate::models::{ExecutionError, ExecutionOutcome};
use crate::sandbox::convert;
use crate::sandbox::environment::{CaptureState, SandboxEnvironment};

/// Coarse heap ceiling per execution. The time budget is the contract; this
/// only keeps a runaway allocation from taking the host down with it.
const MEMORY_LIMIT_BYTES: usize = 32 * 1024 * 1024;
const STACK_LIMIT_BYTES: usize = 512 * 1024;

/// Run validated code against the environment under the given wall-clock
/// budget. A deadline hook inside the engine interrupts execution when the
/// budget elapses, so timed-out code is actually stopped, not merely
/// abandoned. Partial output captured before a failure or timeout is kept.
pub fn run(code: &str, environment: &SandboxEnvironment, timeout_ms: u64) -> ExecutionOutcome {
    let start = Instant::now();
    let capture = CaptureState::new();

    match run_inner(code, environment, timeout_ms, &capture, start) {
        Ok(result) => {
            let elapsed = start.elapsed().as_millis() as u64;
            tracing::debug!(elapsed_ms = elapsed, "execution completed");
            ExecutionOutcome::success(result, capture.take_logs(), elapsed)
        }
        Err(error) => {
            let elapsed = start.elapsed().as_millis() as u64;
            tracing::debug!(elapsed_ms = elapsed, error = %error, "execution failed");
            ExecutionOutcome::failure(error.to_string(), capture.take_logs(), elapsed)
        }
    }
}

fn run_inner(
    code: &str,
    environment: &SandboxEnvironment,
    timeout_ms: u64,
    capture: &CaptureState,
    start: Instant,
) -> Result<Option<JsonValue>, ExecutionError> {
    let runtime = Runtime::new().map_err(engine_error)?;
    runtime.set_memory_limit(MEMORY_LIMIT_BYTES);
    runtime.set_max_stack_size(STACK_LIMIT_BYTES);

    let deadline = start + Duration::from_millis(timeout_ms);
    let interrupted = Arc::new(AtomicBool::new(false));
    {
        let interrupted = Arc::clone(&interrupted);
        runtime.set_interrupt_handler(Some(Box::new(move || {
            if Instant::now() >= deadline {
                interrupted.store(true, Ordering::SeqCst);
                true
            } else {
                false
            }
        })));
    }

    let context = Context::full(&runtime).map_err(engine_error)?;

    let completion = context.with(|ctx| -> Result<Option<JsonValue>, ExecutionError> {
        environment.install(&ctx, capture).map_err(engine_error)?;

        let wrapped = wrap_snippet(code);
        match ctx.eval::<Value, _>(wrapped).catch(&ctx) {
            Ok(value) => Ok(convert::js_to_json(&value)),
            Err(caught) => {
                if interrupted.load(Ordering::SeqCst) {
                    Err(ExecutionError::Timeout(timeout_ms))
                } else {
                    Err(ExecutionError::Runtime(describe_caught(caught)))
                }
            }
        }
    })?;

    // Drive pending promise jobs so output from async code that resolves
    // within the budget is captured before the outcome is finalized.
    loop {
        if !runtime.is_job_pending() {
            break;
        }
        if interrupted.load(Ordering::SeqCst) || Instant::now() >= deadline {
            return Err(ExecutionError::Timeout(timeout_ms));
        }
        match runtime.execute_pending_job() {
            Ok(true) => {}
            Ok(false) => break,
            Err(_) => {
                // The deadline interrupt surfaces as a job error; anything
                // else a job raised stays with the abandoned promise.
                if interrupted.load(Ordering::SeqCst) {
                    return Err(ExecutionError::Timeout(timeout_ms));
                }
                break;
            }
        }
    }
    if interrupted.load(Ordering::SeqCst) {
        return Err(ExecutionError::Timeout(timeout_ms));
    }

    // The explicit result slot wins; the snippet's completion value is the
    // fallback for plain `return`.
    Ok(capture.take_result().or(completion))
}

/// The snippet becomes the body of a freshly constructed strict-mode
/// function with no enclosing closure, so the installed globals are its
/// entire observable scope and top-level `return` works.
fn wrap_snippet(code: &str) -> String {
    format!("(function() {{\n\"use strict\";\n{code}\n}})()")
}

fn engine_error(error: rquickjs::Error) -> ExecutionError {
    ExecutionError::Runtime(error.to_string())
}

fn describe_caught(caught: CaughtError<'_>) -> String {
    match caught {
        CaughtError::Exception(exception) => exception
            .message()
            .unwrap_or_else(|| "unknown error".to_string()),
        CaughtError::Value(value) => convert::js_to_json(&value)
            .map(|json| match json {
                JsonValue::String(s) => s,
                other => other.to_string(),
            })
            .unwrap_or_else(|| "unknown error".to_string()),
        CaughtError::Error(error) => error.to_string(),
    }
}
