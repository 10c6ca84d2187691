//! Recipe progression.
//!
//! [`CookingSession`] is the only owner of [`SessionState`]. Its operations are
//! synchronous and never touch collaborators; the
//! [`Assistant`](super::Assistant) decides what to say around them.

use super::summary::{IngredientEntry, SessionSummary};
use crate::core::{Guard, PhaseHistory, PhaseTransition, SessionPhase, State};
use crate::recipe::{CheckClause, Recipe, RecipeStep};
use crate::report::SessionReport;
use crate::validation::{ingredient_key, Deviation};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error, PartialEq)]
pub enum SessionError {
    #[error("Cannot {operation}: no active cooking session")]
    NotLive { operation: &'static str },

    #[error("Deviation for '{item}' does not match the pending check")]
    UnexpectedItem { item: String },
}

/// Mutable progress of one session.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionState {
    /// Number of steps announced so far; never exceeds the step count.
    pub current_step_index: usize,
    pub added_ingredients: Vec<IngredientEntry>,
    pub deviations: Vec<Deviation>,
    pub active: bool,
}

/// Step-sequencing state machine for one recipe at a time.
pub struct CookingSession {
    recipe: Option<Recipe>,
    state: SessionState,
    phase: SessionPhase,
    history: PhaseHistory<SessionPhase>,
    recording: Guard<SessionPhase>,
}

impl Default for CookingSession {
    fn default() -> Self {
        Self::new()
    }
}

impl CookingSession {
    pub fn new() -> Self {
        Self {
            recipe: None,
            state: SessionState::default(),
            phase: SessionPhase::Inactive,
            history: PhaseHistory::new(),
            recording: Guard::live(),
        }
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn recipe(&self) -> Option<&Recipe> {
        self.recipe.as_ref()
    }

    pub fn history(&self) -> &PhaseHistory<SessionPhase> {
        &self.history
    }

    pub fn total_steps(&self) -> usize {
        self.recipe.as_ref().map_or(0, Recipe::len)
    }

    /// Start a session for `recipe`, discarding any previous progress.
    pub fn load(&mut self, recipe: Recipe) {
        info!(
            recipe = recipe.display_name(),
            steps = recipe.len(),
            "Recipe loaded"
        );
        let transition = PhaseTransition {
            from: self.phase,
            to: SessionPhase::Active,
            timestamp: Utc::now(),
            step_index: 0,
        };
        self.recipe = Some(recipe);
        self.state = SessionState {
            active: true,
            ..SessionState::default()
        };
        self.history = PhaseHistory::new().record(transition);
        self.phase = SessionPhase::Active;
    }

    /// The step that the next advance will announce.
    pub fn current_step(&self) -> Option<&RecipeStep> {
        if self.phase != SessionPhase::Active {
            return None;
        }
        self.recipe.as_ref()?.step(self.state.current_step_index)
    }

    /// The most recently announced step, if any.
    pub fn previous_step(&self) -> Option<&RecipeStep> {
        let index = self.state.current_step_index.checked_sub(1)?;
        self.recipe.as_ref()?.step(index)
    }

    /// The check a quantity measurement is compared against: the one on the
    /// step the cook was last told to perform.
    ///
    /// This is deliberately not `current_step().check`: after announcing a
    /// step the index already points at the next one.
    pub fn pending_check(&self) -> Option<&CheckClause> {
        if !self.phase.is_live() {
            return None;
        }
        self.previous_step()?.check.as_ref()
    }

    /// Move past the current step.
    ///
    /// Returns `false` without effect unless the session is active. Reaching
    /// the step count moves the session to completed.
    pub fn advance(&mut self) -> bool {
        if self.phase != SessionPhase::Active {
            debug!(phase = self.phase.name(), "Advance ignored");
            return false;
        }
        let total = self.total_steps();
        if self.state.current_step_index < total {
            self.state.current_step_index += 1;
        }
        info!(
            step = self.state.current_step_index,
            total, "Advanced recipe step"
        );
        if self.state.current_step_index >= total {
            self.enter(SessionPhase::Completed);
        }
        true
    }

    pub fn record_ingredient(
        &mut self,
        ingredient: impl Into<String>,
        amount: f64,
        unit: impl Into<String>,
    ) -> Result<(), SessionError> {
        if !self.recording.check(&self.phase) {
            return Err(SessionError::NotLive {
                operation: "record ingredient",
            });
        }
        self.state.added_ingredients.push(IngredientEntry {
            ingredient: ingredient.into(),
            amount,
            unit: unit.into(),
            step: self.state.current_step_index,
        });
        Ok(())
    }

    /// Append a deviation for the ingredient named by the pending check.
    pub fn record_deviation(&mut self, deviation: Deviation) -> Result<(), SessionError> {
        if !self.recording.check(&self.phase) {
            return Err(SessionError::NotLive {
                operation: "record deviation",
            });
        }
        let matches_check = self
            .pending_check()
            .is_some_and(|check| {
                ingredient_key(&check.ingredient) == ingredient_key(&deviation.item)
            });
        if !matches_check {
            return Err(SessionError::UnexpectedItem {
                item: deviation.item,
            });
        }
        self.state.deviations.push(deviation);
        Ok(())
    }

    pub fn summary(&self) -> SessionSummary {
        SessionSummary::new(
            self.recipe
                .as_ref()
                .map_or("Unknown", Recipe::display_name),
            self.state.current_step_index,
            self.total_steps(),
            self.state.added_ingredients.len(),
            self.state.deviations.clone(),
        )
    }

    /// End the session from any phase.
    ///
    /// Returns the report of the session that was running, or `None` when
    /// there was none. The session is left inactive and empty either way.
    pub fn stop(&mut self) -> Option<SessionReport> {
        if self.phase == SessionPhase::Inactive {
            return None;
        }
        self.enter(SessionPhase::Inactive);

        let summary = self.summary();
        info!(%summary, "Session stopped");
        let report = SessionReport::new(
            summary,
            std::mem::take(&mut self.state.added_ingredients),
            self.history.path_names(),
            self.history.duration(),
        );

        self.recipe = None;
        self.state = SessionState::default();
        self.history = PhaseHistory::new();
        Some(report)
    }

    fn enter(&mut self, to: SessionPhase) {
        if self.phase == to {
            return;
        }
        info!(
            from = self.phase.name(),
            to = to.name(),
            step = self.state.current_step_index,
            "Session phase changed"
        );
        self.history = self.history.record(PhaseTransition {
            from: self.phase,
            to,
            timestamp: Utc::now(),
            step_index: self.state.current_step_index,
        });
        self.phase = to;
        self.state.active = to.is_live();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::Severity;

    fn three_steps() -> Recipe {
        Recipe::new(
            "Dal",
            vec![
                RecipeStep::new("Heat oil").with_safety("The pan will be hot."),
                RecipeStep::new("Add turmeric").with_check("turmeric", 0.5, "teaspoon"),
                RecipeStep::new("Simmer"),
            ],
        )
    }

    fn deviation(item: &str) -> Deviation {
        Deviation {
            item: item.to_string(),
            expected_amount: 0.5,
            expected_unit: "teaspoon".to_string(),
            observed_amount: 1.0,
            observed_unit: "teaspoon".to_string(),
            severity: Severity::Major,
            suggestion: String::new(),
        }
    }

    #[test]
    fn new_session_is_inactive() {
        let session = CookingSession::new();
        assert_eq!(session.phase(), SessionPhase::Inactive);
        assert!(!session.state().active);
        assert!(session.current_step().is_none());
        assert!(session.pending_check().is_none());
    }

    #[test]
    fn three_advances_complete_the_recipe() {
        let mut session = CookingSession::new();
        session.load(three_steps());
        assert_eq!(session.phase(), SessionPhase::Active);

        assert!(session.advance());
        assert_eq!(session.phase(), SessionPhase::Active);
        assert!(session.advance());
        assert_eq!(session.phase(), SessionPhase::Active);
        assert!(session.advance());
        assert_eq!(session.phase(), SessionPhase::Completed);
        assert_eq!(session.state().current_step_index, 3);

        assert!(!session.advance());
        assert_eq!(session.state().current_step_index, 3);
    }

    #[test]
    fn advance_without_recipe_is_noop() {
        let mut session = CookingSession::new();
        assert!(!session.advance());
        assert_eq!(session.state().current_step_index, 0);
    }

    #[test]
    fn empty_recipe_completes_on_first_advance() {
        let mut session = CookingSession::new();
        session.load(Recipe::new("Nothing", Vec::new()));

        assert!(session.advance());
        assert_eq!(session.phase(), SessionPhase::Completed);
        assert_eq!(session.state().current_step_index, 0);
    }

    #[test]
    fn pending_check_follows_announced_step() {
        let mut session = CookingSession::new();
        session.load(three_steps());
        assert!(session.pending_check().is_none());

        session.advance();
        assert_eq!(session.current_step().unwrap().instruction, "Add turmeric");
        assert!(session.pending_check().is_none());

        session.advance();
        assert_eq!(session.pending_check().unwrap().ingredient, "turmeric");
    }

    #[test]
    fn last_step_check_is_pending_after_completion() {
        let mut session = CookingSession::new();
        session.load(Recipe::new(
            "Salted water",
            vec![RecipeStep::new("Add salt").with_check("salt", 0.5, "tsp")],
        ));
        session.advance();

        assert_eq!(session.phase(), SessionPhase::Completed);
        assert_eq!(session.pending_check().unwrap().ingredient, "salt");
        assert!(session.record_deviation(deviation("salt")).is_ok());
    }

    #[test]
    fn recording_requires_live_session() {
        let mut session = CookingSession::new();

        assert_eq!(
            session.record_ingredient("salt", 0.5, "teaspoon"),
            Err(SessionError::NotLive {
                operation: "record ingredient"
            })
        );
        assert!(matches!(
            session.record_deviation(deviation("salt")),
            Err(SessionError::NotLive { .. })
        ));
    }

    #[test]
    fn ingredients_are_tagged_with_step_index() {
        let mut session = CookingSession::new();
        session.load(three_steps());
        session.advance();
        session.advance();

        session.record_ingredient("turmeric", 1.0, "teaspoon").unwrap();

        let entry = &session.state().added_ingredients[0];
        assert_eq!(entry.step, 2);
        assert_eq!(entry.ingredient, "turmeric");
    }

    #[test]
    fn deviation_must_match_pending_check() {
        let mut session = CookingSession::new();
        session.load(three_steps());
        session.advance();
        session.advance();

        assert_eq!(
            session.record_deviation(deviation("salt")),
            Err(SessionError::UnexpectedItem {
                item: "salt".to_string()
            })
        );
        assert!(session.record_deviation(deviation("Turmeric")).is_ok());
        assert_eq!(session.state().deviations.len(), 1);
    }

    #[test]
    fn reload_resets_progress() {
        let mut session = CookingSession::new();
        session.load(three_steps());
        session.advance();
        session.advance();
        session.record_ingredient("turmeric", 1.0, "teaspoon").unwrap();

        session.load(three_steps());

        assert_eq!(session.state().current_step_index, 0);
        assert!(session.state().added_ingredients.is_empty());
        assert_eq!(session.history().transitions().len(), 1);
    }

    #[test]
    fn stop_reports_and_resets() {
        let mut session = CookingSession::new();
        session.load(three_steps());
        session.advance();
        session.advance();
        session.record_ingredient("turmeric", 1.0, "teaspoon").unwrap();
        session.record_deviation(deviation("turmeric")).unwrap();

        let report = session.stop().unwrap();

        assert_eq!(report.summary.recipe, "Dal");
        assert_eq!(report.summary.steps_completed, 2);
        assert_eq!(report.summary.total_steps, 3);
        assert_eq!(report.summary.ingredients_added, 1);
        assert_eq!(report.summary.major_count, 1);
        assert_eq!(report.ingredients.len(), 1);
        assert_eq!(report.phase_path, vec!["inactive", "active", "inactive"]);

        assert_eq!(session.phase(), SessionPhase::Inactive);
        assert!(session.recipe().is_none());
        assert_eq!(session.state(), &SessionState::default());
        assert!(session.stop().is_none());
    }

    #[test]
    fn stop_after_completion_records_full_path() {
        let mut session = CookingSession::new();
        session.load(three_steps());
        for _ in 0..3 {
            session.advance();
        }

        let report = session.stop().unwrap();
        assert!(report.summary.is_complete());
        assert_eq!(
            report.phase_path,
            vec!["inactive", "active", "completed", "inactive"]
        );
    }
}
