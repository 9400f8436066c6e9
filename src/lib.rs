//! Step sequencer and draft persistence for a guided CBT diary.
//!
//! The flow walks a fixed nine-step sequence. [`state_machine::transition`]
//! is the pure core; [`session::DiarySession`] wires it to draft storage
//! and [`handoff::finalize`] delivers the finished entry to chat.

pub mod config;
pub mod draft;
pub mod errors;
pub mod handoff;
pub mod paths;
pub mod registry;
pub mod resume;
pub mod session;
pub mod session_data;
pub mod state_machine;
pub mod step;
pub mod storage;
pub mod structured_logger;

#[cfg(test)]
mod test_support;
