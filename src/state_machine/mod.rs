//! Centralized state machine for the CBT diary flow.
//!
//! This module provides the ONLY place where flow transitions happen.
//! The machine owns the state, runs events through the pure transition
//! function, logs what happened, and broadcasts snapshots to subscribers
//! via a watch channel.

mod events;
mod snapshot;
mod state;
mod transition;

pub use events::{FlowChange, FlowEvent};
pub use snapshot::FlowSnapshot;
pub use state::FlowState;
pub use transition::{transition, transition_with_changes};

use crate::errors::FlowError;
use crate::structured_logger::StructuredLogger;
use std::sync::Arc;
use tokio::sync::watch;

/// Owns the live flow state. All mutations go through [`FlowStateMachine::apply`].
pub struct FlowStateMachine {
    state: FlowState,
    snapshot_tx: watch::Sender<FlowSnapshot>,
    logger: Option<Arc<StructuredLogger>>,
    seq: u64,
}

impl FlowStateMachine {
    /// Creates a state machine with the given initial state.
    ///
    /// Returns the machine and a watch receiver for snapshots.
    pub fn new(
        initial_state: FlowState,
        logger: Option<Arc<StructuredLogger>>,
    ) -> (Self, watch::Receiver<FlowSnapshot>) {
        let snapshot = FlowSnapshot::from(&initial_state);
        let (snapshot_tx, snapshot_rx) = watch::channel(snapshot);

        let machine = Self {
            state: initial_state,
            snapshot_tx,
            logger,
            seq: 0,
        };

        (machine, snapshot_rx)
    }

    /// Applies one event. On rejection the state is left exactly as it was
    /// and no snapshot is sent.
    pub fn apply(&mut self, event: FlowEvent) -> Result<Vec<FlowChange>, FlowError> {
        self.seq += 1;

        if let Some(logger) = &self.logger {
            logger.log_flow_event(self.seq, &event);
        }

        let (next, changes) = match transition_with_changes(&self.state, event) {
            Ok(result) => result,
            Err(error) => {
                tracing::debug!("Flow event rejected: {}", error);
                if let Some(logger) = &self.logger {
                    logger.log_rejection(self.seq, &error);
                }
                return Err(error);
            }
        };
        debug_assert!(next.is_consistent(), "transition broke completion invariant");

        if let Some(logger) = &self.logger {
            for change in &changes {
                logger.log_flow_change(self.seq, change);
            }
        }

        self.state = next;
        self.broadcast_snapshot();

        Ok(changes)
    }

    pub fn state(&self) -> &FlowState {
        &self.state
    }

    /// Replaces the whole state, e.g. after data was edited outside the
    /// event path and the position had to be re-resolved.
    ///
    /// Inconsistent states are refused and leave the machine untouched.
    pub fn restore(&mut self, state: FlowState) -> bool {
        if !state.is_consistent() {
            tracing::warn!("Refusing to restore inconsistent flow state");
            return false;
        }
        if let Some(logger) = &self.logger {
            logger.log(
                "Flow",
                serde_json::json!({
                    "type": "Restored",
                    "current": state.current.to_string(),
                    "completed": state.completed.len()
                }),
            );
        }
        self.state = state;
        self.broadcast_snapshot();
        true
    }

    /// Subscribes another watcher to snapshots.
    pub fn subscribe(&self) -> watch::Receiver<FlowSnapshot> {
        self.snapshot_tx.subscribe()
    }

    /// Broadcasts the current state snapshot to all watchers.
    pub fn broadcast_snapshot(&self) {
        let snapshot = FlowSnapshot::from(&self.state);
        self.snapshot_tx.send_replace(snapshot);
    }
}

#[cfg(test)]
#[path = "tests/machine_tests.rs"]
mod tests;
