use super::{merge_json, CbtDraft, DraftPersistence};
use crate::session_data::CbtSessionData;
use crate::state_machine::FlowState;
use crate::step::FlowPosition;
use crate::storage::DraftStorage;
use anyhow::{bail, Context, Result};
use serde_json::Value;

/// Owns the in-memory current draft and keeps the current slot in step
/// with it. Every mutation persists best-effort.
pub struct DraftManager<S: DraftStorage> {
    persistence: DraftPersistence<S>,
    current: CbtDraft,
}

impl<S: DraftStorage> DraftManager<S> {
    /// Picks up the persisted draft if there is an unfinished one,
    /// otherwise starts from an empty draft that is not yet persisted.
    pub fn new(persistence: DraftPersistence<S>) -> Self {
        let current = match persistence.load_draft() {
            Some(draft) if !draft.is_complete => draft,
            _ => CbtDraft::new(None),
        };
        Self {
            persistence,
            current,
        }
    }

    pub fn current(&self) -> &CbtDraft {
        &self.current
    }

    pub fn persistence(&self) -> &DraftPersistence<S> {
        &self.persistence
    }

    fn save(&mut self) -> bool {
        if self.current.is_complete {
            return false;
        }
        self.current.touch();
        self.persistence.persist_draft(&self.current)
    }

    /// Replaces the current draft with a fresh one and persists it.
    pub fn start_new(&mut self, session_id: Option<String>) -> &CbtDraft {
        self.current = CbtDraft::new(session_id);
        self.save();
        &self.current
    }

    /// Mirrors an accepted flow state into the draft. Returns whether the
    /// draft reached storage.
    pub fn sync_from(&mut self, state: &FlowState) -> bool {
        self.current.sync_from(state);
        self.save()
    }

    /// Deep-merges a JSON patch into the draft data.
    ///
    /// Only keys present in the patch change. A patch that would leave the
    /// data unparseable is rejected and the draft is left untouched.
    pub fn update_fields(&mut self, patch: &Value) -> Result<()> {
        if !patch.is_object() {
            bail!("Field patch must be a JSON object");
        }
        let mut merged =
            serde_json::to_value(&self.current.data).context("Failed to serialize draft data")?;
        merge_json(&mut merged, patch);
        let data: CbtSessionData =
            serde_json::from_value(merged).context("Patch does not fit the diary data shape")?;

        self.current.data = data;
        self.save();
        Ok(())
    }

    /// Marks the draft finished and empties the current slot.
    ///
    /// A saved copy with the same id is dropped from the saved list.
    pub fn mark_complete(&mut self) -> CbtDraft {
        self.current.is_complete = true;
        self.current.current_step = FlowPosition::Complete.ordinal();
        self.current.touch();
        self.persistence.clear_persisted_draft();

        let mut saved = self.persistence.load_saved();
        if saved.remove(&self.current.id) {
            if let Err(e) = self.persistence.store_saved(&saved) {
                tracing::warn!("Failed to drop completed draft from saved list: {:#}", e);
            }
        }
        self.current.clone()
    }

    /// Empties the current slot and swaps in an unsaved empty draft.
    pub fn discard(&mut self, session_id: Option<String>) {
        self.persistence.clear_persisted_draft();
        self.current = CbtDraft::new(session_id);
    }

    /// Copies the current draft into the saved list (last write wins by id).
    pub fn save_current(&mut self) -> Result<()> {
        if self.current.is_complete {
            bail!("Draft {} is already complete", self.current.id);
        }
        self.current.touch();
        let mut saved = self.persistence.load_saved();
        saved.upsert(self.current.clone());
        self.persistence.store_saved(&saved)?;
        self.persistence.persist_draft(&self.current);
        Ok(())
    }

    /// Makes a saved draft the current one. Returns false for unknown ids.
    pub fn load_saved(&mut self, id: &str) -> bool {
        let saved = self.persistence.load_saved();
        let Some(draft) = saved.get(id) else {
            return false;
        };
        self.current = draft.clone();
        self.save();
        true
    }

    /// Deletes a saved draft. Unknown ids are a no-op returning false.
    pub fn delete_saved(&self, id: &str) -> Result<bool> {
        let mut saved = self.persistence.load_saved();
        if !saved.remove(id) {
            return Ok(false);
        }
        self.persistence.store_saved(&saved)?;
        Ok(true)
    }

    /// Saved drafts, newest first.
    pub fn list_saved(&self) -> Vec<CbtDraft> {
        self.persistence.load_saved().newest_first()
    }
}

#[cfg(test)]
#[path = "tests/manager_tests.rs"]
mod tests;
