use jsrun::models::{ExecutionOutcome, ExecutionRequest};
use jsrun::sandbox;
use jsrun::transport::worker::{handle_message, handle_request, WorkerHandle, WorkerRequest};
use jsrun::transport::{Envelope, SOLUTION_TEXT};
use serde_json::json;

#[test]
fn test_end_to_end_success_envelope() {
    let request = ExecutionRequest::new("setResult(x + y);")
        .with_value("x", json!(10))
        .with_value("y", json!(5));
    let envelope = Envelope::from(sandbox::execute(&request));
    let wire = serde_json::to_value(&envelope).unwrap();

    assert_eq!(wire["success"], json!(true));
    assert_eq!(wire["result"], json!(15));
    assert!(wire["executionTime"].as_str().unwrap().ends_with("ms"));
    assert!(wire.get("isError").is_none());
}

#[test]
fn test_end_to_end_failure_envelope() {
    let envelope = Envelope::from(sandbox::execute(&ExecutionRequest::new("window.close()")));
    let wire = serde_json::to_value(&envelope).unwrap();

    assert_eq!(wire["isError"], json!(true));
    assert!(wire["error"].as_str().unwrap().contains("'window'"));
    assert_eq!(wire["solution"], json!(SOLUTION_TEXT));
}

#[test]
fn test_solution_text_enumerates_common_causes() {
    for cause in ["syntax", "forbidden", "infinite loop", "network", "reference", "setResult"] {
        assert!(SOLUTION_TEXT.contains(cause), "missing cause: {cause}");
    }
}

#[test]
fn test_every_outcome_maps_to_exactly_one_shape() {
    let success = Envelope::from(ExecutionOutcome::success(None, Vec::new(), 1));
    assert!(success.is_success());

    let failure = Envelope::from(ExecutionOutcome::failure("x", Vec::new(), 1));
    assert!(!failure.is_success());
}

#[test]
fn test_worker_message_round_trip() {
    let raw = r#"{
        "type": "execute",
        "id": "abc-123",
        "payload": {"code": "setResult(n * 2);", "input": {"n": 21}, "timeout": 1000}
    }"#;
    let wire: serde_json::Value = serde_json::from_str(&handle_message(raw)).unwrap();

    assert_eq!(wire["id"], json!("abc-123"));
    assert_eq!(wire["success"], json!(true));
    assert_eq!(wire["result"], json!(42));
}

#[test]
fn test_worker_failure_keeps_id() {
    let request = WorkerRequest::Execute {
        id: "fail-1".to_string(),
        payload: ExecutionRequest::new("eval('1')"),
    };
    let response = handle_request(request);
    assert_eq!(response.id.as_deref(), Some("fail-1"));
    assert!(!response.envelope.is_success());
}

#[test]
fn test_worker_malformed_message_is_contained() {
    let wire: serde_json::Value = serde_json::from_str(&handle_message("{broken")).unwrap();
    assert_eq!(wire["isError"], json!(true));
    assert_eq!(wire["solution"], json!(SOLUTION_TEXT));
}

#[test]
fn test_worker_thread_processes_in_order() {
    let worker = WorkerHandle::spawn();

    for (id, code, expected) in [
        ("1", "setResult(1);", json!(1)),
        ("2", "setResult(2);", json!(2)),
    ] {
        let response = worker
            .execute(WorkerRequest::Execute {
                id: id.to_string(),
                payload: ExecutionRequest::new(code),
            })
            .expect("worker stopped unexpectedly");
        assert_eq!(response.id.as_deref(), Some(id));
        let wire = serde_json::to_value(&response).unwrap();
        assert_eq!(wire["result"], expected);
    }
}
