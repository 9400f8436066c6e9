//! Resumption: where should a reloaded diary pick up?
//!
//! Walks the canonical order and stops at the first unfilled step. Data for
//! steps after that gap is kept but earns no completion credit, so the user
//! resumes exactly where the chain broke.

use crate::registry::is_step_filled;
use crate::session_data::CbtSessionData;
use crate::step::{CbtStepId, FlowPosition};
use std::collections::BTreeSet;

/// Result of resolving a partial data bag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resumption {
    /// First unfilled step, or `Complete` when all nine are filled.
    pub start: FlowPosition,
    /// Every step strictly before `start`.
    pub completed: BTreeSet<CbtStepId>,
}

/// Computes the resume position and completed steps for `data`.
///
/// `None` and an empty bag both resume at `situation` with nothing completed.
pub fn resolve_resumption(data: Option<&CbtSessionData>) -> Resumption {
    let mut completed = BTreeSet::new();
    let Some(data) = data else {
        return Resumption {
            start: FlowPosition::START,
            completed,
        };
    };

    for step in CbtStepId::ALL {
        if !is_step_filled(data, step) {
            return Resumption {
                start: FlowPosition::Step(step),
                completed,
            };
        }
        completed.insert(step);
    }

    Resumption {
        start: FlowPosition::Complete,
        completed,
    }
}

#[cfg(test)]
#[path = "tests/resume_tests.rs"]
mod tests;
