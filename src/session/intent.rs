//! Command classification.
//!
//! Commands are matched by keyword membership in a fixed priority order, so a
//! phrase that contains keywords of several intents always resolves the same
//! way ("what's next" advances; it does not identify).

use crate::core::{Guard, SessionPhase};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Intent {
    Advance,
    Identify,
    Quantity,
    Repeat,
    Help,
    Stop,
    Unknown,
}

/// Keywords per intent, in matching priority.
const KEYWORDS: [(Intent, &[&str]); 6] = [
    (Intent::Advance, &["next", "continue", "proceed"]),
    (Intent::Identify, &["what", "identify", "recognize", "see"]),
    (Intent::Quantity, &["how much", "quantity", "measure"]),
    (Intent::Repeat, &["repeat", "again", "say again"]),
    (Intent::Help, &["help", "what can"]),
    (Intent::Stop, &["stop", "exit", "quit", "end"]),
];

pub const NO_SESSION_MESSAGE: &str = "No active cooking session. Please load a recipe first.";
pub const NO_SESSION_TO_STOP_MESSAGE: &str = "No active session to stop.";
pub const NOT_UNDERSTOOD_MESSAGE: &str =
    "I didn't understand that. Say 'help' to hear what I can do.";

/// Classify a transcribed or typed command.
pub fn classify(command: &str) -> Intent {
    let command = command.trim().to_lowercase();
    if command.is_empty() {
        return Intent::Unknown;
    }
    KEYWORDS
        .iter()
        .find(|(_, words)| words.iter().any(|word| command.contains(word)))
        .map_or(Intent::Unknown, |(intent, _)| *intent)
}

impl Intent {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Advance => "advance",
            Self::Identify => "identify",
            Self::Quantity => "quantity",
            Self::Repeat => "repeat",
            Self::Help => "help",
            Self::Stop => "stop",
            Self::Unknown => "unknown",
        }
    }

    /// Phases in which the command's handler may run.
    ///
    /// Identify, quantity and help work without a recipe.
    pub fn guard(&self) -> Guard<SessionPhase> {
        match self {
            Self::Advance | Self::Repeat | Self::Stop => Guard::live(),
            Self::Identify | Self::Quantity | Self::Help | Self::Unknown => Guard::always(),
        }
    }

    /// What to tell the cook when the guard rejects the command.
    pub fn refusal(&self) -> &'static str {
        match self {
            Self::Stop => NO_SESSION_TO_STOP_MESSAGE,
            _ => NO_SESSION_MESSAGE,
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
