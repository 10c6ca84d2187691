//! Guard predicates over session phases.
//!
//! Commands and record operations carry a precondition on the phase they run
//! in. A failed guard is reported as guidance to the cook, never as an error.

use super::state::State;
use std::marker::PhantomData;

/// Pure predicate that decides whether an operation may run in a phase.
///
/// # Example
///
/// ```rust
/// use chefsense::core::{Guard, SessionPhase, State};
///
/// let needs_recipe = Guard::new(|phase: &SessionPhase| phase.is_live());
///
/// assert!(!needs_recipe.check(&SessionPhase::Inactive));
/// assert!(needs_recipe.check(&SessionPhase::Active));
/// assert!(needs_recipe.check(&SessionPhase::Completed));
/// ```
pub struct Guard<S: State> {
    predicate: Box<dyn Fn(&S) -> bool + Send + Sync>,
    _phantom: PhantomData<S>,
}

impl<S: State> Guard<S> {
    /// Create a guard from a pure predicate function.
    pub fn new<F>(predicate: F) -> Self
    where
        F: Fn(&S) -> bool + Send + Sync + 'static,
    {
        Guard {
            predicate: Box::new(predicate),
            _phantom: PhantomData,
        }
    }

    /// A guard that admits every phase.
    pub fn always() -> Self {
        Self::new(|_| true)
    }

    /// A guard that admits only live phases.
    pub fn live() -> Self {
        Self::new(|phase: &S| phase.is_live())
    }

    /// Evaluate the predicate against `state`.
    pub fn check(&self, state: &S) -> bool {
        (self.predicate)(state)
    }
}
