//! Draft envelope and its lifecycle.
//!
//! A `CbtDraft` is the persisted form of one in-progress diary entry. Exactly
//! one draft occupies the current slot (`DRAFT_STORAGE_KEY`); drafts can also
//! be copied into a saved list (`SAVED_DRAFTS_KEY`) keyed by draft id.

mod manager;
mod merge;
mod persistence;

pub use manager::DraftManager;
pub use merge::merge_json;
pub use persistence::DraftPersistence;

use crate::session_data::CbtSessionData;
use crate::state_machine::FlowState;
use crate::step::FlowPosition;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Storage key for the single resumable draft.
pub const DRAFT_STORAGE_KEY: &str = "cbt-diary-draft";

/// Storage key for the list of explicitly saved drafts.
pub const SAVED_DRAFTS_KEY: &str = "cbt-diary-saved-drafts";

fn first_step() -> u8 {
    FlowPosition::START.ordinal()
}

fn never_saved() -> DateTime<Utc> {
    DateTime::UNIX_EPOCH
}

/// Persisted envelope around a diary data bag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CbtDraft {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub data: CbtSessionData,
    /// 1-indexed step number; 10 means the flow is complete.
    #[serde(default = "first_step")]
    pub current_step: u8,
    /// The Unix epoch doubles as the "never saved" sentinel.
    #[serde(default = "never_saved")]
    pub last_saved: DateTime<Utc>,
    #[serde(default)]
    pub is_complete: bool,
    #[serde(default)]
    pub session_id: Option<String>,
}

impl CbtDraft {
    /// A fresh, empty draft at step 1.
    pub fn new(session_id: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            data: CbtSessionData::default(),
            current_step: first_step(),
            last_saved: Utc::now(),
            is_complete: false,
            session_id,
        }
    }

    /// The step position recorded in the draft, clamped to a valid one.
    pub fn position(&self) -> FlowPosition {
        FlowPosition::from_ordinal(self.current_step).unwrap_or(FlowPosition::START)
    }

    /// Copies the flow's data and visible step into the draft.
    pub fn sync_from(&mut self, state: &FlowState) {
        self.data = state.data.clone();
        self.current_step = match state.active_step() {
            Some(step) => step.ordinal(),
            None => state.current.ordinal(),
        };
        self.session_id = state.session_id.clone();
    }

    /// Sets `last_saved` to now.
    pub fn touch(&mut self) {
        self.last_saved = Utc::now();
    }

    pub fn has_saved_timestamp(&self) -> bool {
        self.last_saved != never_saved()
    }
}

/// The saved-drafts list as stored under `SAVED_DRAFTS_KEY`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SavedDrafts {
    #[serde(default)]
    pub drafts: Vec<CbtDraft>,
}

impl SavedDrafts {
    /// Inserts or replaces by id (last write wins).
    pub fn upsert(&mut self, draft: CbtDraft) {
        match self.drafts.iter_mut().find(|d| d.id == draft.id) {
            Some(existing) => *existing = draft,
            None => self.drafts.push(draft),
        }
    }

    /// Removes by id; returns whether anything was removed.
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.drafts.len();
        self.drafts.retain(|d| d.id != id);
        self.drafts.len() != before
    }

    pub fn get(&self, id: &str) -> Option<&CbtDraft> {
        self.drafts.iter().find(|d| d.id == id)
    }

    /// Drafts ordered newest first.
    pub fn newest_first(&self) -> Vec<CbtDraft> {
        let mut drafts = self.drafts.clone();
        drafts.reverse();
        drafts.sort_by(|a, b| b.last_saved.cmp(&a.last_saved));
        drafts
    }
}
