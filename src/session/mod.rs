//! Cooking sessions.
//!
//! [`CookingSession`] is the pure step-sequencing state machine;
//! [`Assistant`] wraps it with intent dispatch, collaborators and the
//! single-command-at-a-time guard.

mod assistant;
mod collaborators;
mod intent;
mod machine;
mod summary;

pub use assistant::{
    Assistant, Reply, CAMERA_FAILED_MESSAGE, CHECK_PROMPT, CLOSE_ENOUGH_MESSAGE,
    COMPLETED_MESSAGE, HELP_MESSAGE, LOAD_FAILED_MESSAGE, NOTHING_TO_REPEAT_MESSAGE,
    NO_CHECK_MESSAGE, NO_QUANTITY_MESSAGE, UNIDENTIFIED_MESSAGE,
};
pub use collaborators::{
    CollaboratorError, Collaborators, DepthSensor, Frame, FrameSource, Perception, Speaker,
    TextReader,
};
pub use intent::{
    classify, Intent, NOT_UNDERSTOOD_MESSAGE, NO_SESSION_MESSAGE, NO_SESSION_TO_STOP_MESSAGE,
};
pub use machine::{CookingSession, SessionError, SessionState};
pub use summary::{IngredientEntry, SessionSummary};
