//! Phase transition history.
//!
//! Every phase change of a session is kept as an immutable record so a
//! finished session can report the path it took and how long it ran.

use super::state::State;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Record of a single phase change.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct PhaseTransition<S: State> {
    /// Phase being left
    pub from: S,
    /// Phase being entered
    pub to: S,
    /// When the change happened
    pub timestamp: DateTime<Utc>,
    /// Step index of the session at the moment of the change
    pub step_index: usize,
}

/// Ordered, append-only history of phase changes.
///
/// `record` returns a new history and leaves the receiver untouched.
///
/// # Example
///
/// ```rust
/// use chefsense::core::{PhaseHistory, PhaseTransition, SessionPhase};
/// use chrono::Utc;
///
/// let history = PhaseHistory::new().record(PhaseTransition {
///     from: SessionPhase::Inactive,
///     to: SessionPhase::Active,
///     timestamp: Utc::now(),
///     step_index: 0,
/// });
///
/// assert_eq!(history.path(), vec![&SessionPhase::Inactive, &SessionPhase::Active]);
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct PhaseHistory<S: State> {
    transitions: Vec<PhaseTransition<S>>,
}

impl<S: State> Default for PhaseHistory<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: State> PhaseHistory<S> {
    pub fn new() -> Self {
        Self {
            transitions: Vec::new(),
        }
    }

    /// Record a transition, returning a new history.
    pub fn record(&self, transition: PhaseTransition<S>) -> Self {
        let mut transitions = self.transitions.clone();
        transitions.push(transition);
        Self { transitions }
    }

    /// Phases visited in order: the first `from`, then every `to`.
    pub fn path(&self) -> Vec<&S> {
        let mut path = Vec::with_capacity(self.transitions.len() + 1);
        if let Some(first) = self.transitions.first() {
            path.push(&first.from);
        }
        path.extend(self.transitions.iter().map(|t| &t.to));
        path
    }

    /// Names of the visited phases, for reports.
    pub fn path_names(&self) -> Vec<String> {
        self.path().iter().map(|s| s.name().to_string()).collect()
    }

    /// Time between the first and last recorded transition.
    ///
    /// `None` for an empty history.
    pub fn duration(&self) -> Option<Duration> {
        let first = self.transitions.first()?;
        let last = self.transitions.last()?;
        last.timestamp
            .signed_duration_since(first.timestamp)
            .to_std()
            .ok()
    }

    pub fn transitions(&self) -> &[PhaseTransition<S>] {
        &self.transitions
    }

    pub fn last(&self) -> Option<&PhaseTransition<S>> {
        self.transitions.last()
    }

    pub fn is_empty(&self) -> bool {
        self.transitions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::SessionPhase;
    use chrono::Duration as ChronoDuration;

    fn change(
        from: SessionPhase,
        to: SessionPhase,
        step_index: usize,
    ) -> PhaseTransition<SessionPhase> {
        PhaseTransition {
            from,
            to,
            timestamp: Utc::now(),
            step_index,
        }
    }

    #[test]
    fn new_history_is_empty() {
        let history: PhaseHistory<SessionPhase> = PhaseHistory::new();
        assert!(history.is_empty());
        assert!(history.path().is_empty());
        assert!(history.duration().is_none());
    }

    #[test]
    fn record_leaves_original_untouched() {
        let history = PhaseHistory::new();
        let next = history.record(change(SessionPhase::Inactive, SessionPhase::Active, 0));

        assert_eq!(history.transitions().len(), 0);
        assert_eq!(next.transitions().len(), 1);
    }

    #[test]
    fn path_follows_full_session() {
        let history = PhaseHistory::new()
            .record(change(SessionPhase::Inactive, SessionPhase::Active, 0))
            .record(change(SessionPhase::Active, SessionPhase::Completed, 3))
            .record(change(SessionPhase::Completed, SessionPhase::Inactive, 3));

        assert_eq!(
            history.path_names(),
            vec!["inactive", "active", "completed", "inactive"]
        );
        assert_eq!(history.last().map(|t| t.step_index), Some(3));
    }

    #[test]
    fn duration_spans_first_to_last() {
        let start = Utc::now();
        let history = PhaseHistory::new()
            .record(PhaseTransition {
                from: SessionPhase::Inactive,
                to: SessionPhase::Active,
                timestamp: start,
                step_index: 0,
            })
            .record(PhaseTransition {
                from: SessionPhase::Active,
                to: SessionPhase::Inactive,
                timestamp: start + ChronoDuration::seconds(90),
                step_index: 1,
            });

        assert_eq!(history.duration(), Some(Duration::from_secs(90)));
    }

    #[test]
    fn history_serializes_round_trip() {
        let history =
            PhaseHistory::new().record(change(SessionPhase::Inactive, SessionPhase::Active, 0));

        let json = serde_json::to_string(&history).unwrap();
        let back: PhaseHistory<SessionPhase> = serde_json::from_str(&json).unwrap();

        assert_eq!(back.path(), history.path());
    }
}
