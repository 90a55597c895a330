//! Sandboxed JavaScript snippet execution: static safety screening, a
//! capability-isolated QuickJS environment, and a bounded executor behind a
//! single request/response contract.
//!
//! Calling convention: snippets return a value with `setResult(value)` (or a
//! plain top-level `return`) and emit output with `console_output(...)`.

pub mod models;
pub mod output;
pub mod sandbox;
pub mod transport;
pub mod validate;

pub use models::*;
