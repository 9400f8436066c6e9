use super::*;
use crate::step::CbtStepId;
use crate::storage::MemoryStorage;
use crate::test_support::{data_with, FailingStorage};

fn persistence() -> DraftPersistence<MemoryStorage> {
    DraftPersistence::new(MemoryStorage::new())
}

fn draft_with(steps: &[CbtStepId]) -> CbtDraft {
    CbtDraft {
        data: data_with(steps),
        ..CbtDraft::new(None)
    }
}

#[test]
fn test_nothing_stored() {
    let p = persistence();
    assert!(!p.has_persisted_draft());
    assert_eq!(p.persisted_draft_timestamp(), None);
    assert!(p.load_draft().is_none());
}

#[test]
fn test_malformed_draft_reads_as_absent() {
    let p = persistence();
    p.storage().set(DRAFT_STORAGE_KEY, "invalid json").unwrap();

    assert!(!p.has_persisted_draft());
    assert_eq!(p.persisted_draft_timestamp(), None);
    assert!(p.load_draft().is_none());
}

#[test]
fn test_persist_then_load() {
    let p = persistence();
    let draft = draft_with(&[CbtStepId::Situation, CbtStepId::Emotions]);

    assert!(p.persist_draft(&draft));
    assert!(p.has_persisted_draft());
    assert_eq!(p.persisted_draft_timestamp(), Some(draft.last_saved));
    assert_eq!(p.load_draft(), Some(draft));
}

#[test]
fn test_empty_draft_is_not_resumable() {
    let p = persistence();
    let draft = CbtDraft::new(None);

    assert!(p.persist_draft(&draft));
    assert!(!p.has_persisted_draft());
    // The timestamp is still reported; only filled-ness gates resumption.
    assert_eq!(p.persisted_draft_timestamp(), Some(draft.last_saved));
}

#[test]
fn test_completed_draft_is_not_resumable() {
    let p = persistence();
    let draft = CbtDraft {
        is_complete: true,
        ..draft_with(&[CbtStepId::Situation, CbtStepId::Emotions])
    };

    assert!(p.persist_draft(&draft));
    assert!(p.load_draft().is_some());
    assert!(!p.has_persisted_draft());
}

#[test]
fn test_epoch_timestamp_reads_as_unknown() {
    let p = persistence();
    let draft = CbtDraft {
        last_saved: DateTime::UNIX_EPOCH,
        ..draft_with(&[CbtStepId::Situation])
    };

    assert!(p.persist_draft(&draft));
    assert!(p.has_persisted_draft());
    assert_eq!(p.persisted_draft_timestamp(), None);
}

#[test]
fn test_clear_is_idempotent() {
    let p = persistence();
    p.persist_draft(&draft_with(&[CbtStepId::Situation]));

    p.clear_persisted_draft();
    assert!(!p.has_persisted_draft());
    p.clear_persisted_draft();
    assert!(!p.has_persisted_draft());
    assert!(p.storage().is_empty());
}

#[test]
fn test_failing_storage_never_panics() {
    let p = DraftPersistence::new(FailingStorage);

    assert!(!p.persist_draft(&draft_with(&[CbtStepId::Situation])));
    assert!(!p.has_persisted_draft());
    assert_eq!(p.persisted_draft_timestamp(), None);
    p.clear_persisted_draft();
    assert!(p.load_saved().drafts.is_empty());
    assert!(p.store_saved(&SavedDrafts::default()).is_err());
}

#[test]
fn test_saved_list_survives_current_slot_clear() {
    let p = persistence();
    let draft = draft_with(&[CbtStepId::Situation]);
    let mut saved = p.load_saved();
    saved.upsert(draft.clone());
    p.store_saved(&saved).unwrap();
    p.persist_draft(&draft);

    p.clear_persisted_draft();

    assert_eq!(p.load_saved().get(&draft.id), Some(&draft));
}

#[test]
fn test_malformed_saved_list_reads_as_empty() {
    let p = persistence();
    p.storage().set(SAVED_DRAFTS_KEY, "[not a list").unwrap();
    assert!(p.load_saved().drafts.is_empty());
}

#[test]
fn test_persistence_is_logged() {
    let temp = tempfile::TempDir::new().unwrap();
    let logger = Arc::new(StructuredLogger::new("persist-log", temp.path()).unwrap());
    let p = DraftPersistence::new(MemoryStorage::new()).with_logger(Some(logger.clone()));

    p.persist_draft(&draft_with(&[CbtStepId::Situation]));
    p.clear_persisted_draft();

    let content = std::fs::read_to_string(logger.path()).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].contains("\"operation\":\"persist\""));
    assert!(lines[1].contains("\"operation\":\"clear\""));
}
