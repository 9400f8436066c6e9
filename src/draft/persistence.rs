//! Fail-open adapter between drafts and a `DraftStorage`.
//!
//! Nothing in here is allowed to take the diary down: unreadable or
//! malformed stored drafts read as "no draft", and storage failures are
//! logged and reported as `false`/`None` instead of propagating.

use super::{CbtDraft, SavedDrafts, DRAFT_STORAGE_KEY, SAVED_DRAFTS_KEY};
use crate::registry::is_any_step_filled;
use crate::storage::DraftStorage;
use crate::structured_logger::StructuredLogger;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use std::sync::Arc;

pub struct DraftPersistence<S: DraftStorage> {
    storage: S,
    logger: Option<Arc<StructuredLogger>>,
}

impl<S: DraftStorage> DraftPersistence<S> {
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            logger: None,
        }
    }

    pub fn with_logger(mut self, logger: Option<Arc<StructuredLogger>>) -> Self {
        self.logger = logger;
        self
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    fn record(&self, operation: &str, success: bool) {
        if let Some(logger) = &self.logger {
            logger.log_persistence(operation, success);
        }
    }

    /// Reads and parses the current-slot draft.
    ///
    /// Returns `None` when nothing is stored, the storage cannot be read,
    /// or the stored value does not parse.
    pub fn load_draft(&self) -> Option<CbtDraft> {
        let raw = match self.storage.get(DRAFT_STORAGE_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                tracing::warn!("Failed to read persisted draft: {:#}", e);
                self.record("load", false);
                return None;
            }
        };
        match serde_json::from_str::<CbtDraft>(&raw) {
            Ok(draft) => Some(draft),
            Err(e) => {
                tracing::warn!("Ignoring malformed persisted draft: {}", e);
                self.record("load", false);
                None
            }
        }
    }

    /// True iff a stored draft parses, is not complete, and has at least
    /// one filled step.
    pub fn has_persisted_draft(&self) -> bool {
        self.load_draft()
            .is_some_and(|draft| !draft.is_complete && is_any_step_filled(&draft.data))
    }

    /// `last_saved` of the stored draft, unless it is the never-saved
    /// sentinel or there is no readable draft.
    pub fn persisted_draft_timestamp(&self) -> Option<DateTime<Utc>> {
        self.load_draft()
            .filter(CbtDraft::has_saved_timestamp)
            .map(|draft| draft.last_saved)
    }

    /// Writes `draft` to the current slot. Returns whether it was stored.
    pub fn persist_draft(&self, draft: &CbtDraft) -> bool {
        let result = serde_json::to_string(draft)
            .context("Failed to serialize draft")
            .and_then(|json| self.storage.set(DRAFT_STORAGE_KEY, &json));
        let success = match result {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!("Failed to persist draft: {:#}", e);
                false
            }
        };
        self.record("persist", success);
        success
    }

    /// Empties the current slot. Safe to call when nothing is stored.
    pub fn clear_persisted_draft(&self) {
        let success = match self.storage.remove(DRAFT_STORAGE_KEY) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!("Failed to clear persisted draft: {:#}", e);
                false
            }
        };
        self.record("clear", success);
    }

    /// Reads the saved-drafts list, treating unreadable data as empty.
    pub fn load_saved(&self) -> SavedDrafts {
        match self.storage.get(SAVED_DRAFTS_KEY) {
            Ok(Some(raw)) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                tracing::warn!("Ignoring malformed saved drafts list: {}", e);
                SavedDrafts::default()
            }),
            Ok(None) => SavedDrafts::default(),
            Err(e) => {
                tracing::warn!("Failed to read saved drafts: {:#}", e);
                SavedDrafts::default()
            }
        }
    }

    /// Writes the saved-drafts list.
    ///
    /// Unlike the current slot, saving a named draft is an explicit user
    /// action, so failures propagate.
    pub fn store_saved(&self, saved: &SavedDrafts) -> Result<()> {
        let json = serde_json::to_string(saved).context("Failed to serialize saved drafts")?;
        let result = self.storage.set(SAVED_DRAFTS_KEY, &json);
        self.record("save-list", result.is_ok());
        result.context("Failed to store saved drafts")
    }
}

#[cfg(test)]
#[path = "tests/persistence_tests.rs"]
mod tests;
