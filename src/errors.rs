//! Error types for the diary flow.

use crate::step::{CbtStepId, FlowPosition};
use std::fmt::{Display, Formatter};

/// Errors returned when the flow rejects an event.
///
/// A rejected event never changes the flow state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowError {
    /// Data or navigation targeted a step the user has not reached yet.
    OutOfOrder {
        step: CbtStepId,
        current: FlowPosition,
    },
    /// The submitted data leaves the step unfilled.
    IncompleteStep { step: CbtStepId },
}

impl Display for FlowError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::OutOfOrder { step, current } => write!(
                f,
                "step '{}' is not reachable yet (current step: {})",
                step, current
            ),
            Self::IncompleteStep { step } => {
                write!(f, "step '{}' has no meaningful data", step)
            }
        }
    }
}

impl std::error::Error for FlowError {}
