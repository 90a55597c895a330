//! Sandboxed execution of untrusted JavaScript snippets.
//!
//! The isolation boundary is the embedded QuickJS engine: a fresh runtime
//! and context per execution, whose global scope holds only the ECMAScript
//! intrinsics plus the bindings the environment builder installs. There is
//! no host global object, no filesystem, no network, and no timer for the
//! snippet to reach. The static validator in front of it is a fast-reject
//! heuristic, not the boundary.

pub mod convert;
pub mod environment;
pub mod executor;

pub use environment::{LogSink, SandboxEnvironment};

use crate::models::{ExecutionOutcome, ExecutionRequest};
use crate::validate;
use std::time::Instant;

/// Execute one request end to end: validate the source, build the
/// environment, run under the budget. A request that fails validation never
/// reaches the environment builder or the executor.
pub fn execute(request: &ExecutionRequest) -> ExecutionOutcome {
    let start = Instant::now();

    if let Some(reason) = validate::validate(&request.code).reason() {
        let elapsed = start.elapsed().as_millis() as u64;
        tracing::info!(reason = %reason, "request rejected before execution");
        return ExecutionOutcome::rejected(reason, elapsed);
    }

    let environment = match SandboxEnvironment::new(request.input.clone()) {
        Ok(environment) => environment,
        Err(error) => {
            let elapsed = start.elapsed().as_millis() as u64;
            return ExecutionOutcome::failure(error.to_string(), Vec::new(), elapsed);
        }
    };

    executor::run(&request.code, &environment, request.effective_timeout_ms())
}
