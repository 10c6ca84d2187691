//! Session phases.
//!
//! A cooking session is always in exactly one phase. Phases are plain values:
//! inspecting them has no side effects, and moving between them is the job of
//! [`CookingSession`](crate::session::CookingSession).

use serde::{Deserialize, Serialize};
use std::fmt::{self, Debug};

/// Trait for the phases a state machine moves through.
///
/// Implementors are small value types: cheap to clone, comparable, and
/// serializable so they can be stored in a [`PhaseHistory`](super::PhaseHistory)
/// and written into a session report.
pub trait State:
    Clone + PartialEq + Debug + Serialize + for<'de> Deserialize<'de> + Send + Sync
{
    /// Name used in logs and reports.
    fn name(&self) -> &str;

    /// Terminal phases accept no further progress.
    ///
    /// Default implementation returns `false`.
    fn is_final(&self) -> bool {
        false
    }

    /// Whether a session in this phase is live, i.e. has a recipe loaded.
    ///
    /// Default implementation returns `false`.
    fn is_live(&self) -> bool {
        false
    }
}

/// Lifecycle phase of a cooking session.
///
/// ```text
/// Inactive --load--> Active --advance (last step)--> Completed
///     ^                 |                                |
///     +------stop-------+---------------stop-------------+
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionPhase {
    /// No recipe loaded.
    #[default]
    Inactive,
    /// Recipe loaded and at least one step left to announce.
    Active,
    /// Every step has been announced.
    Completed,
}

impl State for SessionPhase {
    fn name(&self) -> &str {
        match self {
            Self::Inactive => "inactive",
            Self::Active => "active",
            Self::Completed => "completed",
        }
    }

    fn is_final(&self) -> bool {
        matches!(self, Self::Completed)
    }

    fn is_live(&self) -> bool {
        matches!(self, Self::Active | Self::Completed)
    }
}

impl fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
