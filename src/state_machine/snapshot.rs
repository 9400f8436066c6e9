//! Read-only snapshot of flow state for rendering.
//!
//! The UI never mutates this; it receives new snapshots via watch channel.

use super::state::FlowState;
use crate::session_data::CbtSessionData;
use crate::step::{CbtStepId, FlowPosition};

/// Everything a step view needs to render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlowSnapshot {
    pub current: FlowPosition,
    /// Step shown to the user (the focused step when revisiting).
    pub active_step: Option<CbtStepId>,
    /// Completed steps in canonical order
    pub completed: Vec<CbtStepId>,
    pub session_id: Option<String>,
    /// 1-indexed step number for progress display
    pub step_number: u8,
    pub total_steps: usize,
    pub is_complete: bool,
    pub data: CbtSessionData,
}

impl From<&FlowState> for FlowSnapshot {
    fn from(state: &FlowState) -> Self {
        Self {
            current: state.current,
            active_step: state.active_step(),
            completed: state.completed.iter().copied().collect(),
            session_id: state.session_id.clone(),
            step_number: state.current.ordinal(),
            total_steps: CbtStepId::ALL.len(),
            is_complete: state.is_complete(),
            data: state.data.clone(),
        }
    }
}
