//! Events the flow accepts, and the changes it reports back.
//!
//! `FlowEvent` is the only way to drive the flow. `FlowChange` values are
//! for logging and notification; the UI renders from `FlowSnapshot`.

use crate::session_data::StepData;
use crate::step::{CbtStepId, FlowPosition};
use serde::{Deserialize, Serialize};

/// Inputs to the transition function.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FlowEvent {
    /// Start a fresh diary at `situation`, discarding progress.
    SessionStart {
        #[serde(default)]
        session_id: Option<String>,
    },
    /// Data entered for one step. Advances when it is the current step.
    StepDataSubmitted { data: StepData },
    /// Revisit an already reached step without losing later progress.
    JumpToStep { step: CbtStepId },
    /// Drop a step's data; completed steps from it onward are reopened.
    ClearStep { step: CbtStepId },
}

/// Changes emitted after an accepted event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type")]
pub enum FlowChange {
    SessionStarted { session_id: Option<String> },
    StepDataMerged { step: CbtStepId },
    StepCompleted { step: CbtStepId },
    PositionChanged { from: FlowPosition, to: FlowPosition },
    StepFocused { step: CbtStepId },
    StepCleared { step: CbtStepId },
    /// Completion was reopened from `step` onward.
    CompletionTruncated { step: CbtStepId },
    FlowCompleted,
}
