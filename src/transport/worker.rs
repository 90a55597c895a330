//! Message-passing transport for running executions off the caller's thread.
//!
//! The worker owns its executions end to end and talks to its caller only
//! through channels; there is no shared mutable state. The wire shape is
//! `{"type": "execute", "id": ..., "payload": {code, input, timeout}}` in and
//! the flat envelope plus the echoed `id` out.

use std::sync::mpsc::{channel, Receiver, Sender};
use std::thread::{self, JoinHandle};

use serde::{Deserialize, Serialize};

use crate::models::ExecutionRequest;
use crate::sandbox;
use crate::transport::Envelope;

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum WorkerRequest {
    Execute {
        id: String,
        payload: ExecutionRequest,
    },
}

#[derive(Debug, Clone, Serialize)]
pub struct WorkerResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(flatten)]
    pub envelope: Envelope,
}

/// Execute one typed worker request.
pub fn handle_request(request: WorkerRequest) -> WorkerResponse {
    match request {
        WorkerRequest::Execute { id, payload } => {
            let outcome = sandbox::execute(&payload);
            WorkerResponse {
                id: Some(id),
                envelope: Envelope::from(outcome),
            }
        }
    }
}

/// Raw JSON boundary: parse, execute, serialize. Malformed input maps to a
/// failure envelope with no `id` instead of an error escaping to the caller.
pub fn handle_message(raw: &str) -> String {
    let response = match serde_json::from_str::<WorkerRequest>(raw) {
        Ok(request) => handle_request(request),
        Err(error) => WorkerResponse {
            id: None,
            envelope: Envelope::from(crate::models::ExecutionOutcome::failure(
                format!("Invalid request: {error}"),
                Vec::new(),
                0,
            )),
        },
    };
    // The response types only hold plain data; serialization cannot fail.
    serde_json::to_string(&response).unwrap_or_else(|_| "{\"isError\":true}".to_string())
}

/// Handle to a dedicated worker thread processing requests in arrival order.
pub struct WorkerHandle {
    requests: Sender<WorkerRequest>,
    responses: Receiver<WorkerResponse>,
    thread: Option<JoinHandle<()>>,
}

impl WorkerHandle {
    pub fn spawn() -> Self {
        let (request_tx, request_rx) = channel::<WorkerRequest>();
        let (response_tx, response_rx) = channel::<WorkerResponse>();
        let thread = thread::spawn(move || {
            while let Ok(request) = request_rx.recv() {
                if response_tx.send(handle_request(request)).is_err() {
                    break;
                }
            }
        });
        Self {
            requests: request_tx,
            responses: response_rx,
            thread: Some(thread),
        }
    }

    /// Submit a request and block until its response arrives. Responses come
    /// back in submission order, one per request.
    pub fn execute(&self, request: WorkerRequest) -> Option<WorkerResponse> {
        self.requests.send(request).ok()?;
        self.responses.recv().ok()
    }
}

impl Drop for WorkerHandle {
    fn drop(&mut self) {
        // Closing the request channel ends the worker loop.
        let (orphan_tx, _) = channel();
        drop(std::mem::replace(&mut self.requests, orphan_tx));
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_wire_shape() {
        let raw = r#"{"type": "execute", "id": "req-1", "payload": {"code": "setResult(2);"}}"#;
        let request: WorkerRequest = serde_json::from_str(raw).unwrap();
        let WorkerRequest::Execute { id, payload } = request;
        assert_eq!(id, "req-1");
        assert_eq!(payload.code, "setResult(2);");
    }

    #[test]
    fn test_response_echoes_id_flat() {
        let raw = r#"{"type": "execute", "id": "req-2", "payload": {"code": "setResult(2);"}}"#;
        let response = handle_message(raw);
        let wire: serde_json::Value = serde_json::from_str(&response).unwrap();
        assert_eq!(wire["id"], json!("req-2"));
        assert_eq!(wire["success"], json!(true));
        assert_eq!(wire["result"], json!(2));
    }

    #[test]
    fn test_malformed_message() {
        let wire: serde_json::Value =
            serde_json::from_str(&handle_message("not json")).unwrap();
        assert_eq!(wire["isError"], json!(true));
        assert!(wire.get("id").is_none());
    }
}
