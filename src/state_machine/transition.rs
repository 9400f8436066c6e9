//! The pure transition function.
//!
//! Deterministic and side-effect free: the same (state, event) pair always
//! yields the same result, and a rejected event leaves the input untouched.

use super::events::{FlowChange, FlowEvent};
use super::state::FlowState;
use crate::errors::FlowError;
use crate::registry::is_step_filled;
use crate::session_data::StepData;
use crate::step::{CbtStepId, FlowPosition};

/// Computes the state that follows `event`.
pub fn transition(state: &FlowState, event: FlowEvent) -> Result<FlowState, FlowError> {
    transition_with_changes(state, event).map(|(next, _)| next)
}

/// Like [`transition`], also returning the changes for logging.
pub fn transition_with_changes(
    state: &FlowState,
    event: FlowEvent,
) -> Result<(FlowState, Vec<FlowChange>), FlowError> {
    match event {
        FlowEvent::SessionStart { session_id } => Ok((
            FlowState::new(session_id.clone()),
            vec![FlowChange::SessionStarted { session_id }],
        )),
        FlowEvent::StepDataSubmitted { data } => submit(state, data),
        FlowEvent::JumpToStep { step } => jump(state, step),
        FlowEvent::ClearStep { step } => Ok(clear(state, step)),
    }
}

/// A step is reachable if it is the current step or already behind it.
fn ensure_reachable(state: &FlowState, step: CbtStepId) -> Result<(), FlowError> {
    if state.current.order() < step.order() {
        return Err(FlowError::OutOfOrder {
            step,
            current: state.current,
        });
    }
    Ok(())
}

fn submit(state: &FlowState, data: StepData) -> Result<(FlowState, Vec<FlowChange>), FlowError> {
    let step = data.step();
    ensure_reachable(state, step)?;

    let mut next = state.clone();
    next.data.apply(data);
    if !is_step_filled(&next.data, step) {
        return Err(FlowError::IncompleteStep { step });
    }

    let mut changes = vec![FlowChange::StepDataMerged { step }];
    next.focus = None;

    if state.current == FlowPosition::Step(step) {
        next.completed.insert(step);
        next.current = step.next();
        changes.push(FlowChange::StepCompleted { step });
        changes.push(FlowChange::PositionChanged {
            from: state.current,
            to: next.current,
        });
        if next.current.is_complete() {
            changes.push(FlowChange::FlowCompleted);
        }
    }

    Ok((next, changes))
}

fn jump(state: &FlowState, step: CbtStepId) -> Result<(FlowState, Vec<FlowChange>), FlowError> {
    ensure_reachable(state, step)?;

    let mut next = state.clone();
    next.focus = if state.current == FlowPosition::Step(step) {
        None
    } else {
        Some(step)
    };
    Ok((next, vec![FlowChange::StepFocused { step }]))
}

fn clear(state: &FlowState, step: CbtStepId) -> (FlowState, Vec<FlowChange>) {
    let mut next = state.clone();
    next.data.clear(step);
    let mut changes = vec![FlowChange::StepCleared { step }];

    if state.current.is_past(step) {
        next.completed.retain(|s| *s < step);
        next.current = FlowPosition::Step(step);
        changes.push(FlowChange::CompletionTruncated { step });
        changes.push(FlowChange::PositionChanged {
            from: state.current,
            to: next.current,
        });
    }
    if next.focus.is_some_and(|f| f >= step) {
        next.focus = None;
    }

    (next, changes)
}

#[cfg(test)]
#[path = "tests/transition_tests.rs"]
mod tests;
