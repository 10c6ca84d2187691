//! Core phase types for the cooking session.
//!
//! This module contains the pure part of the session state machine:
//! - Phase definitions via the `State` trait and `SessionPhase`
//! - Guard predicates that gate commands on the current phase
//! - Immutable phase history
//!
//! Nothing in here performs I/O or touches collaborators.

mod guard;
mod history;
mod state;

pub use guard::Guard;
pub use history::{PhaseHistory, PhaseTransition};
pub use state::{SessionPhase, State};
