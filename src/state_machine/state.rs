//! Flow state: where the diary stands and what has been captured.

use crate::resume::resolve_resumption;
use crate::session_data::CbtSessionData;
use crate::step::{CbtStepId, FlowPosition};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Progress of one diary session.
///
/// `completed` always holds exactly the steps strictly before `current`
/// (all nine once `current` is `Complete`). `focus` marks an earlier step
/// being revisited; it never moves `current`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowState {
    pub current: FlowPosition,
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub completed: BTreeSet<CbtStepId>,
    #[serde(default)]
    pub focus: Option<CbtStepId>,
    #[serde(default)]
    pub data: CbtSessionData,
}

impl FlowState {
    /// A fresh flow at `situation` with no data.
    pub fn new(session_id: Option<String>) -> Self {
        Self {
            current: FlowPosition::START,
            session_id,
            completed: BTreeSet::new(),
            focus: None,
            data: CbtSessionData::default(),
        }
    }

    /// Rebuilds a flow from reloaded data.
    ///
    /// Position and completion come from the first gap; all data is kept,
    /// including entries after the gap.
    pub fn resume(data: CbtSessionData, session_id: Option<String>) -> Self {
        let resumption = resolve_resumption(Some(&data));
        Self {
            current: resumption.start,
            session_id,
            completed: resumption.completed,
            focus: None,
            data,
        }
    }

    /// The step the user is looking at: the focused step, else the current one.
    pub fn active_step(&self) -> Option<CbtStepId> {
        self.focus.or_else(|| self.current.step())
    }

    pub fn is_complete(&self) -> bool {
        self.current.is_complete()
    }

    /// (completed, total) for progress display.
    pub fn progress(&self) -> (usize, usize) {
        (self.completed.len(), CbtStepId::ALL.len())
    }

    /// Checks the completion invariant against `current`.
    pub fn is_consistent(&self) -> bool {
        let expected: BTreeSet<CbtStepId> = CbtStepId::ALL
            .iter()
            .copied()
            .filter(|step| self.current.is_past(*step))
            .collect();
        let focus_ok = match self.focus {
            Some(step) => step.order() <= self.current.order(),
            None => true,
        };
        self.completed == expected && focus_ok
    }
}

impl Default for FlowState {
    fn default() -> Self {
        Self::new(None)
    }
}
