use super::*;
use crate::draft::DRAFT_STORAGE_KEY;
use crate::step::{CbtStepId, FlowPosition};
use crate::storage::MemoryStorage;
use crate::test_support::{complete_data, sample_step, FailingStorage};
use serde_json::json;

fn submit(step: CbtStepId) -> FlowEvent {
    FlowEvent::StepDataSubmitted {
        data: sample_step(step),
    }
}

fn open_memory() -> (DiarySession<Arc<MemoryStorage>>, Arc<MemoryStorage>) {
    let storage = Arc::new(MemoryStorage::new());
    let (session, _rx) = DiarySession::open(storage.clone(), None);
    (session, storage)
}

#[test]
fn test_fresh_session_starts_at_situation() {
    let (session, storage) = open_memory();
    assert_eq!(session.state().current, FlowPosition::START);
    assert!(storage.is_empty());
}

#[test]
fn test_accepted_events_are_persisted() {
    let (mut session, storage) = open_memory();
    session.dispatch(submit(CbtStepId::Situation)).unwrap();
    session.dispatch(submit(CbtStepId::Emotions)).unwrap();

    let (reopened, _rx) = DiarySession::open(storage, None);
    assert_eq!(
        reopened.state().current,
        FlowPosition::Step(CbtStepId::Thoughts)
    );
    assert_eq!(reopened.draft().id, session.draft().id);
    assert_eq!(reopened.state().data, session.state().data);
}

#[test]
fn test_rejected_event_does_not_touch_draft() {
    let (mut session, storage) = open_memory();
    session.dispatch(submit(CbtStepId::Situation)).unwrap();
    let stored_before = storage.get(DRAFT_STORAGE_KEY).unwrap();

    let err = session.dispatch(submit(CbtStepId::Actions)).unwrap_err();
    assert!(matches!(err, FlowError::OutOfOrder { .. }));
    assert_eq!(storage.get(DRAFT_STORAGE_KEY).unwrap(), stored_before);
}

#[test]
fn test_session_start_replaces_draft() {
    let (mut session, _storage) = open_memory();
    session.dispatch(submit(CbtStepId::Situation)).unwrap();
    let old_id = session.draft().id.clone();

    session
        .dispatch(FlowEvent::SessionStart {
            session_id: Some("chat-7".to_string()),
        })
        .unwrap();

    assert_ne!(session.draft().id, old_id);
    assert_eq!(session.draft().session_id.as_deref(), Some("chat-7"));
    assert_eq!(session.state().current, FlowPosition::START);
    assert!(!session.drafts().persistence().has_persisted_draft());
}

#[test]
fn test_reopen_restores_focus_on_revisited_step() {
    let (mut session, storage) = open_memory();
    session.dispatch(submit(CbtStepId::Situation)).unwrap();
    session.dispatch(submit(CbtStepId::Emotions)).unwrap();
    session
        .dispatch(FlowEvent::JumpToStep {
            step: CbtStepId::Situation,
        })
        .unwrap();

    let (reopened, _rx) = DiarySession::open(storage, None);
    assert_eq!(reopened.state().focus, Some(CbtStepId::Situation));
    assert_eq!(
        reopened.state().current,
        FlowPosition::Step(CbtStepId::Thoughts)
    );
}

#[test]
fn test_edit_fields_re_resolves_position() {
    let (mut session, _storage) = open_memory();
    session
        .edit_fields(&json!({"situation": {"situation": "Missed the bus", "date": "2026-10-03"}}))
        .unwrap();

    assert_eq!(
        session.state().current,
        FlowPosition::Step(CbtStepId::Emotions)
    );
    assert!(session.state().is_consistent());
}

#[test]
fn test_edit_fields_rejects_bad_patch() {
    let (mut session, _storage) = open_memory();
    assert!(session.edit_fields(&json!({"thoughts": "nope"})).is_err());
    assert_eq!(session.state().current, FlowPosition::START);
}

#[test]
fn test_snapshots_follow_dispatch() {
    let storage = Arc::new(MemoryStorage::new());
    let (mut session, mut rx) = DiarySession::open(storage, None);

    session.dispatch(submit(CbtStepId::Situation)).unwrap();

    assert!(rx.has_changed().unwrap());
    assert_eq!(rx.borrow_and_update().step_number, 2);
}

#[test]
fn test_saved_draft_can_be_reloaded() {
    let (mut session, _storage) = open_memory();
    session.dispatch(submit(CbtStepId::Situation)).unwrap();
    session.save_draft().unwrap();
    let saved_id = session.draft().id.clone();

    session.discard();
    assert_eq!(session.state().current, FlowPosition::START);
    assert!(!session.drafts().persistence().has_persisted_draft());

    assert!(session.load_saved(&saved_id));
    assert_eq!(
        session.state().current,
        FlowPosition::Step(CbtStepId::Emotions)
    );
    assert_eq!(session.list_saved().len(), 1);
    assert!(session.delete_saved(&saved_id).unwrap());
    assert!(!session.load_saved(&saved_id));
}

#[test]
fn test_complete_draft_is_not_resumed() {
    let storage = Arc::new(MemoryStorage::new());
    let draft = CbtDraft {
        data: complete_data(),
        is_complete: true,
        ..CbtDraft::new(None)
    };
    storage
        .set(DRAFT_STORAGE_KEY, &serde_json::to_string(&draft).unwrap())
        .unwrap();

    let (session, _rx) = DiarySession::open(storage, None);
    assert_ne!(session.draft().id, draft.id);
    assert_eq!(session.state().current, FlowPosition::START);
}

#[test]
fn test_storage_failure_keeps_flow_running() {
    let (mut session, _rx) = DiarySession::open(FailingStorage, None);
    session.dispatch(submit(CbtStepId::Situation)).unwrap();
    assert_eq!(
        session.state().current,
        FlowPosition::Step(CbtStepId::Emotions)
    );
}
