//! A diary session: the flow state machine plus its draft.
//!
//! Every accepted flow event is mirrored into the current draft and
//! persisted best-effort. Rejected events touch neither.

use crate::draft::{CbtDraft, DraftManager, DraftPersistence};
use crate::errors::FlowError;
use crate::state_machine::{FlowChange, FlowEvent, FlowSnapshot, FlowState, FlowStateMachine};
use crate::storage::DraftStorage;
use crate::structured_logger::StructuredLogger;
use anyhow::Result;
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::watch;

pub struct DiarySession<S: DraftStorage> {
    machine: FlowStateMachine,
    drafts: DraftManager<S>,
    logger: Option<Arc<StructuredLogger>>,
}

impl<S: DraftStorage> DiarySession<S> {
    /// Opens a session over `storage`, resuming the persisted draft if one
    /// exists.
    ///
    /// The flow position is re-derived from the draft data; the draft's
    /// recorded step is honored only as a focus on an already reachable step.
    pub fn open(
        storage: S,
        logger: Option<Arc<StructuredLogger>>,
    ) -> (Self, watch::Receiver<FlowSnapshot>) {
        let persistence = DraftPersistence::new(storage).with_logger(logger.clone());
        let drafts = DraftManager::new(persistence);
        let state = resumed_state(drafts.current());

        tracing::debug!(
            "Opened diary session at {} ({} steps completed)",
            state.current,
            state.completed.len()
        );

        let (machine, snapshot_rx) = FlowStateMachine::new(state, logger.clone());
        let session = Self {
            machine,
            drafts,
            logger,
        };
        (session, snapshot_rx)
    }

    pub fn state(&self) -> &FlowState {
        self.machine.state()
    }

    pub fn draft(&self) -> &CbtDraft {
        self.drafts.current()
    }

    pub fn drafts(&self) -> &DraftManager<S> {
        &self.drafts
    }

    pub fn subscribe(&self) -> watch::Receiver<FlowSnapshot> {
        self.machine.subscribe()
    }

    /// Runs one event through the flow.
    ///
    /// `SessionStart` also replaces the current draft with a fresh one.
    pub fn dispatch(&mut self, event: FlowEvent) -> Result<Vec<FlowChange>, FlowError> {
        let starts_session = matches!(event, FlowEvent::SessionStart { .. });
        let changes = self.machine.apply(event)?;

        if starts_session {
            self.drafts.start_new(self.machine.state().session_id.clone());
        }
        if !self.drafts.sync_from(self.machine.state()) {
            tracing::warn!("Draft not persisted; continuing with in-memory state");
        }
        Ok(changes)
    }

    /// Merges a JSON patch into the draft data outside the event path, then
    /// re-resolves the flow position from the merged data.
    pub fn edit_fields(&mut self, patch: &Value) -> Result<()> {
        self.drafts.update_fields(patch)?;
        self.reload_from_draft();
        Ok(())
    }

    /// Copies the current draft into the saved list.
    pub fn save_draft(&mut self) -> Result<()> {
        self.drafts.save_current()
    }

    /// Switches to a saved draft. Returns false for unknown ids.
    pub fn load_saved(&mut self, id: &str) -> bool {
        if !self.drafts.load_saved(id) {
            return false;
        }
        self.reload_from_draft();
        true
    }

    pub fn delete_saved(&self, id: &str) -> Result<bool> {
        self.drafts.delete_saved(id)
    }

    pub fn list_saved(&self) -> Vec<CbtDraft> {
        self.drafts.list_saved()
    }

    /// Abandons the current entry: empties the current slot and resets the
    /// flow to a fresh start with the same chat session.
    pub fn discard(&mut self) {
        let session_id = self.machine.state().session_id.clone();
        self.drafts.discard(session_id.clone());
        self.machine.restore(FlowState::new(session_id));
    }

    pub(crate) fn logger(&self) -> Option<&StructuredLogger> {
        self.logger.as_deref()
    }

    /// Marks the draft finished, clears the current slot and starts the
    /// flow over with an unsaved empty draft for the same chat session.
    pub(crate) fn complete(&mut self) -> CbtDraft {
        let done = self.drafts.mark_complete();
        self.discard();
        done
    }

    fn reload_from_draft(&mut self) {
        let state = resumed_state(self.drafts.current());
        self.machine.restore(state);
    }
}

fn resumed_state(draft: &CbtDraft) -> FlowState {
    let mut state = FlowState::resume(draft.data.clone(), draft.session_id.clone());
    if let Some(step) = draft.position().step() {
        if step.order() < state.current.order() {
            state.focus = Some(step);
        }
    }
    state
}

#[cfg(test)]
#[path = "tests/session_tests.rs"]
mod tests;
