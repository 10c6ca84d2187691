//! The command pipeline.
//!
//! An [`Assistant`] owns one [`CookingSession`] behind a mutex. Voice and
//! keyboard input may arrive from different threads; [`Assistant::dispatch`]
//! takes the lock without waiting, so a command that arrives while another is
//! being handled is dropped and reported as [`Reply::Ignored`].

use super::collaborators::{Collaborators, Frame};
use super::intent::{classify, Intent, NOT_UNDERSTOOD_MESSAGE};
use super::machine::CookingSession;
use super::summary::SessionSummary;
use crate::core::{SessionPhase, State};
use crate::fusion::{DepthSignal, FusionEngine, PerceptionResult, QuantityEstimate};
use crate::recipe::{self, Recipe, RecipeError};
use crate::report::SessionReport;
use crate::units::format_amount;
use crate::validation::{Observation, Validator};
use std::path::Path;
use std::sync::{Mutex, MutexGuard, TryLockError};
use stillwater::validation::Validation;
use tracing::{debug, info, warn};

pub const LOAD_FAILED_MESSAGE: &str = "Sorry, I couldn't load the recipe. Please check the file.";
pub const COMPLETED_MESSAGE: &str =
    "Congratulations! You've completed all the steps. Enjoy your meal!";
pub const CHECK_PROMPT: &str = "Show me the ingredient when you're ready to add it.";
pub const CAMERA_FAILED_MESSAGE: &str = "Sorry, I couldn't access the camera.";
pub const UNIDENTIFIED_MESSAGE: &str =
    "I could not determine what that is. Could you show me the label?";
pub const NO_QUANTITY_MESSAGE: &str =
    "I couldn't determine the quantity. Make sure the measuring tool is clearly visible.";
pub const CLOSE_ENOUGH_MESSAGE: &str = "That's close enough to the recipe amount.";
pub const NO_CHECK_MESSAGE: &str = "There's no ingredient to check at this step.";
pub const NOTHING_TO_REPEAT_MESSAGE: &str = "There's no previous step to repeat.";
pub const HELP_MESSAGE: &str = "You can say: 'next step' to hear the next instruction, \
'what is this' to identify an ingredient, 'how much' to check a measurement, \
'repeat' to hear the last step again, or 'stop' to end the session.";

const IDENTIFY_PROMPT: &str = "Let me take a look.";
const QUANTITY_PROMPT: &str = "Let me check the quantity.";
const CONFIDENT_MATCH: f64 = 0.7;

/// Result of dispatching one command.
#[derive(Clone, Debug, PartialEq)]
pub enum Reply {
    /// The command ran. `announced` is true when the handler already spoke
    /// everything the cook needs to hear.
    Handled {
        intent: Intent,
        text: String,
        announced: bool,
    },
    /// Another command was in progress; this one was dropped.
    Ignored,
}

impl Reply {
    fn said(intent: Intent, text: impl Into<String>) -> Self {
        Self::Handled {
            intent,
            text: text.into(),
            announced: false,
        }
    }

    fn announced(intent: Intent, text: impl Into<String>) -> Self {
        Self::Handled {
            intent,
            text: text.into(),
            announced: true,
        }
    }

    /// Reply text; empty when ignored.
    pub fn text(&self) -> &str {
        match self {
            Self::Handled { text, .. } => text,
            Self::Ignored => "",
        }
    }

    pub fn intent(&self) -> Option<Intent> {
        match self {
            Self::Handled { intent, .. } => Some(*intent),
            Self::Ignored => None,
        }
    }

    pub fn is_ignored(&self) -> bool {
        matches!(self, Self::Ignored)
    }
}

struct Inner {
    session: CookingSession,
    last_recognition: Option<PerceptionResult>,
    last_report: Option<SessionReport>,
}

/// Routes commands to handlers and keeps the cooking session.
pub struct Assistant {
    inner: Mutex<Inner>,
    collaborators: Collaborators,
    fusion: FusionEngine,
    validator: Validator,
}

impl Assistant {
    pub fn new(collaborators: Collaborators, fusion: FusionEngine, validator: Validator) -> Self {
        Self {
            inner: Mutex::new(Inner {
                session: CookingSession::new(),
                last_recognition: None,
                last_report: None,
            }),
            collaborators,
            fusion,
            validator,
        }
    }

    pub fn builder() -> crate::builder::AssistantBuilder {
        crate::builder::AssistantBuilder::new()
    }

    /// Lock for operations that must not be dropped.
    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|poisoned| {
            warn!("Session lock poisoned; recovering");
            poisoned.into_inner()
        })
    }

    /// Start a session for an already-parsed recipe and greet the cook.
    pub fn load_recipe(&self, recipe: Recipe) {
        if let Validation::Failure(issues) = recipe::lint(&recipe) {
            for issue in issues.iter() {
                warn!(recipe = recipe.display_name(), %issue, "Recipe issue");
            }
        }
        let greeting = format!(
            "Hello! Let's cook {} together. This recipe serves {} and has {} steps. \
             I'll guide you through each step with safety reminders. \
             Say 'next step' when you're ready to begin.",
            recipe.display_name(),
            recipe.serves_text(),
            recipe.len()
        );
        self.lock().session.load(recipe);
        self.collaborators.speaker.speak(&greeting);
    }

    /// Parse and load a recipe document.
    ///
    /// On failure the cook is told and the current session is left untouched.
    pub fn load_recipe_json(&self, json: &str) -> Result<(), RecipeError> {
        let recipe = Recipe::from_json(json).map_err(|e| self.load_failed(e))?;
        self.load_recipe(recipe);
        Ok(())
    }

    pub fn load_recipe_file(&self, path: &Path) -> Result<(), RecipeError> {
        let recipe = Recipe::load(path).map_err(|e| self.load_failed(e))?;
        self.load_recipe(recipe);
        Ok(())
    }

    fn load_failed(&self, error: RecipeError) -> RecipeError {
        warn!(%error, "Recipe load failed");
        self.collaborators.speaker.speak(LOAD_FAILED_MESSAGE);
        error
    }

    /// Handle one command, or drop it if another is in progress.
    pub fn dispatch(&self, command: &str) -> Reply {
        let mut inner = match self.inner.try_lock() {
            Ok(inner) => inner,
            Err(TryLockError::WouldBlock) => {
                info!(command, "Command dropped; another is in progress");
                return Reply::Ignored;
            }
            Err(TryLockError::Poisoned(poisoned)) => {
                warn!("Session lock poisoned; recovering");
                poisoned.into_inner()
            }
        };

        let intent = classify(command);
        let phase = inner.session.phase();
        info!(command, %intent, phase = phase.name(), "Dispatching command");

        if !intent.guard().check(&phase) {
            debug!(%intent, phase = phase.name(), "Command not allowed in phase");
            return Reply::said(intent, intent.refusal());
        }

        match intent {
            Intent::Advance => self.advance(&mut inner),
            Intent::Identify => self.identify(&mut inner),
            Intent::Quantity => self.check_quantity(&mut inner),
            Intent::Repeat => repeat(&inner),
            Intent::Help => Reply::said(intent, HELP_MESSAGE),
            Intent::Stop => stop(&mut inner),
            Intent::Unknown => Reply::said(intent, NOT_UNDERSTOOD_MESSAGE),
        }
    }

    /// Entry point for the speech-input collaborator.
    ///
    /// Dispatches once, then speaks the reply unless it is empty or the
    /// handler already spoke it.
    pub fn on_transcription(&self, transcript: &str) -> Reply {
        let reply = self.dispatch(transcript);
        if let Reply::Handled {
            text,
            announced: false,
            ..
        } = &reply
        {
            if !text.is_empty() {
                self.collaborators.speaker.speak(text);
            }
        }
        reply
    }

    pub fn phase(&self) -> SessionPhase {
        self.lock().session.phase()
    }

    pub fn summary(&self) -> Option<SessionSummary> {
        let inner = self.lock();
        inner
            .session
            .phase()
            .is_live()
            .then(|| inner.session.summary())
    }

    /// Report of the most recently stopped session.
    pub fn last_report(&self) -> Option<SessionReport> {
        self.lock().last_report.clone()
    }

    pub fn last_recognition(&self) -> Option<PerceptionResult> {
        self.lock().last_recognition.clone()
    }

    fn advance(&self, inner: &mut Inner) -> Reply {
        let total = inner.session.total_steps();
        let index = inner.session.state().current_step_index;
        let Some(step) = inner.session.current_step().cloned() else {
            // An active session with no step left (empty recipe) completes here.
            inner.session.advance();
            return Reply::said(Intent::Advance, COMPLETED_MESSAGE);
        };

        let speaker = &self.collaborators.speaker;
        for warning in &step.safety {
            speaker.speak(warning);
        }
        speaker.speak(&format!("Step {} of {}. {}", index + 1, total, step.instruction));
        if step.check.is_some() {
            speaker.speak(CHECK_PROMPT);
        }

        inner.session.advance();
        Reply::announced(Intent::Advance, step.instruction)
    }

    fn capture(&self) -> Option<Frame> {
        self.collaborators
            .frames
            .capture()
            .map_err(|error| warn!(%error, "Frame capture failed"))
            .ok()
    }

    fn analyze(&self, frame: &Frame) -> Option<PerceptionResult> {
        self.collaborators
            .perception
            .analyze(frame)
            .map_err(|error| warn!(%error, "Perception failed"))
            .ok()
    }

    fn identify(&self, inner: &mut Inner) -> Reply {
        self.collaborators.speaker.speak(IDENTIFY_PROMPT);
        let Some(frame) = self.capture() else {
            return Reply::said(Intent::Identify, CAMERA_FAILED_MESSAGE);
        };
        let perception = self.analyze(&frame).unwrap_or_default();
        let text = describe_best_item(&perception);
        inner.last_recognition = Some(perception);
        Reply::said(Intent::Identify, text)
    }

    fn check_quantity(&self, inner: &mut Inner) -> Reply {
        self.collaborators.speaker.speak(QUANTITY_PROMPT);
        let Some(frame) = self.capture() else {
            return Reply::said(Intent::Quantity, CAMERA_FAILED_MESSAGE);
        };

        let perception = self.analyze(&frame).filter(|p| !p.is_empty());
        let text = self
            .collaborators
            .text_reader
            .read_text(&frame)
            .map_err(|error| warn!(%error, "Text reading failed"))
            .ok()
            .filter(|t| !t.trim().is_empty());
        if perception.is_none() && text.is_none() {
            return Reply::said(Intent::Quantity, NO_QUANTITY_MESSAGE);
        }
        let depth: Option<DepthSignal> = self.collaborators.depth.as_ref().and_then(|sensor| {
            sensor
                .measure(&frame)
                .map_err(|error| warn!(%error, "Depth measurement failed"))
                .ok()
        });

        let estimate = self.fusion.estimate_quantity(
            &perception.unwrap_or_default(),
            text.as_deref().unwrap_or(""),
            depth.as_ref(),
        );
        let mut reply = format!(
            "I see approximately {} {}.",
            format_amount(estimate.amount()),
            estimate.unit()
        );

        if inner.session.phase().is_live() {
            reply.push(' ');
            reply.push_str(&self.verify(&mut inner.session, estimate));
        }
        Reply::said(Intent::Quantity, reply)
    }

    /// Compare an estimate with the pending check and record the outcome.
    fn verify(&self, session: &mut CookingSession, estimate: QuantityEstimate) -> String {
        let Some(check) = session.pending_check().cloned() else {
            return NO_CHECK_MESSAGE.to_string();
        };
        let observation = Observation::new(check.ingredient.clone(), Some(estimate.clone()));
        let Some(deviation) = self.validator.validate(&check, &observation) else {
            return NO_CHECK_MESSAGE.to_string();
        };

        if let Err(error) = session.record_ingredient(
            check.ingredient.clone(),
            estimate.amount(),
            estimate.unit().as_str(),
        ) {
            warn!(%error, "Ingredient not recorded");
        }
        let message = if deviation.is_major() {
            format!(
                "However, the recipe needs {} {}. {}",
                format_amount(check.amount),
                deviation.expected_unit,
                deviation.suggestion
            )
        } else {
            CLOSE_ENOUGH_MESSAGE.to_string()
        };
        if let Err(error) = session.record_deviation(deviation) {
            warn!(%error, "Deviation not recorded");
        }
        message
    }
}

fn describe_best_item(perception: &PerceptionResult) -> String {
    let Some(item) = perception.best_item() else {
        return match perception.uncertainties.first() {
            Some(reason) => format!("{UNIDENTIFIED_MESSAGE} {reason}"),
            None => UNIDENTIFIED_MESSAGE.to_string(),
        };
    };

    let mut text = if item.confidence > CONFIDENT_MATCH {
        format!("This looks like {}.", item.name)
    } else {
        format!("This might be {}, but I'm not very confident.", item.name)
    };
    if let Some(quantity) = &item.estimated_quantity {
        text.push_str(&format!(
            " It appears to be about {} {}.",
            format_amount(quantity.amount),
            quantity.unit
        ));
    }
    text
}

fn repeat(inner: &Inner) -> Reply {
    match inner.session.previous_step() {
        Some(step) => Reply::said(Intent::Repeat, step.instruction.clone()),
        None => Reply::said(Intent::Repeat, NOTHING_TO_REPEAT_MESSAGE),
    }
}

fn stop(inner: &mut Inner) -> Reply {
    let Some(report) = inner.session.stop() else {
        return Reply::said(Intent::Stop, Intent::Stop.refusal());
    };
    let text = format!(
        "Ending session. You completed {} of {} steps. Goodbye!",
        report.summary.steps_completed, report.summary.total_steps
    );
    inner.last_report = Some(report);
    Reply::said(Intent::Stop, text)
}
