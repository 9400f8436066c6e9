use super::*;
use crate::session_data::StepData;
use crate::step::{CbtStepId, FlowPosition};
use crate::test_support::sample_step;
use tempfile::TempDir;

fn create_test_logger() -> (StructuredLogger, TempDir) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let logger =
        StructuredLogger::new("diary-session", temp_dir.path()).expect("Failed to create logger");
    (logger, temp_dir)
}

fn read_entries(temp_dir: &TempDir) -> Vec<LogEntry> {
    let content = std::fs::read_to_string(temp_dir.path().join("events.jsonl"))
        .expect("Failed to read log file");
    content
        .lines()
        .map(|line| serde_json::from_str(line).expect("Failed to parse log entry"))
        .collect()
}

#[test]
fn test_log_entries_are_valid_json() {
    let (logger, temp_dir) = create_test_logger();

    logger.log("TestComponent", serde_json::json!({"key": "value1"}));
    logger.log("TestComponent", serde_json::json!({"key": "value2"}));

    let entries = read_entries(&temp_dir);
    assert_eq!(entries.len(), 2);
    for entry in entries {
        assert_eq!(entry.session_id, "diary-session");
        assert_eq!(entry.component, "TestComponent");
    }
}

#[test]
fn test_sequence_numbers_monotonic() {
    let (logger, temp_dir) = create_test_logger();

    for i in 0..10 {
        logger.log("Test", serde_json::json!({"iteration": i}));
    }

    let mut prev_seq = 0u64;
    for entry in read_entries(&temp_dir) {
        assert!(
            entry.seq > prev_seq,
            "Sequence numbers should be monotonically increasing"
        );
        prev_seq = entry.seq;
    }
}

#[test]
fn test_concurrent_logging() {
    use std::sync::Arc;
    use std::thread;

    let (logger, temp_dir) = create_test_logger();
    let logger = Arc::new(logger);

    let mut handles = vec![];
    for t in 0..4 {
        let logger_clone = Arc::clone(&logger);
        handles.push(thread::spawn(move || {
            for i in 0..25 {
                logger_clone.log("Thread", serde_json::json!({"thread": t, "iteration": i}));
            }
        }));
    }
    for handle in handles {
        handle.join().expect("Thread panicked");
    }

    assert_eq!(read_entries(&temp_dir).len(), 100);
}

#[test]
fn test_timestamp_format() {
    let (logger, temp_dir) = create_test_logger();
    logger.log("Test", serde_json::json!({"msg": "test"}));

    let entries = read_entries(&temp_dir);
    let ts = &entries[0].ts;
    assert!(ts.contains('T'));
    assert!(ts.ends_with('Z'));
    let micros_part = ts.split('.').nth(1).expect("fractional seconds");
    assert_eq!(micros_part.len(), 7); // 6 digits + 'Z'
}

#[test]
fn test_flow_logging() {
    let (logger, temp_dir) = create_test_logger();

    let event = FlowEvent::StepDataSubmitted {
        data: sample_step(CbtStepId::Situation),
    };
    logger.log_flow_event(1, &event);
    logger.log_flow_change(
        1,
        &FlowChange::PositionChanged {
            from: FlowPosition::Step(CbtStepId::Situation),
            to: FlowPosition::Step(CbtStepId::Emotions),
        },
    );
    logger.log_rejection(
        2,
        &FlowError::IncompleteStep {
            step: CbtStepId::Thoughts,
        },
    );

    let entries = read_entries(&temp_dir);
    assert_eq!(entries.len(), 3);

    assert_eq!(entries[0].component, "Flow");
    assert_eq!(entries[0].event["type"], "FlowEvent");
    assert_eq!(entries[0].event["event"]["type"], "STEP_DATA_SUBMITTED");
    assert_eq!(entries[0].event["event"]["data"]["step"], "situation");

    assert_eq!(entries[1].event["type"], "FlowChange");
    assert_eq!(entries[1].event["change"]["type"], "PositionChanged");

    assert_eq!(entries[2].event["type"], "Rejected");
    assert_eq!(entries[2].event["apply_seq"], 2);
    assert!(entries[2].event["error"]
        .as_str()
        .is_some_and(|e| e.contains("thoughts")));
}

#[test]
fn test_persistence_and_handoff_logging() {
    let (logger, temp_dir) = create_test_logger();

    logger.log_persistence("persist", false);
    logger.log_handoff("chat-1", false, Some("network down"));

    let entries = read_entries(&temp_dir);
    assert_eq!(entries[0].component, "Draft");
    assert_eq!(entries[0].event["success"], false);
    assert_eq!(entries[1].component, "Handoff");
    assert_eq!(entries[1].event["error"], "network down");
}

#[test]
fn test_step_payload_serializes_in_log() {
    let (logger, temp_dir) = create_test_logger();
    logger.log("Test", StepData::Thoughts(Vec::new()));

    let entries = read_entries(&temp_dir);
    assert_eq!(entries[0].event["step"], "thoughts");
    assert_eq!(entries[0].session_id, "diary-session");
    assert!(logger.path().ends_with("events.jsonl"));
}
