//! Session logs and the summary produced when a session ends.

use crate::units::format_amount;
use crate::validation::{Deviation, Severity};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One ingredient the cook measured, tagged with the step index at the time.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct IngredientEntry {
    pub ingredient: String,
    pub amount: f64,
    pub unit: String,
    pub step: usize,
}

impl fmt::Display for IngredientEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} (step {})",
            format_amount(self.amount),
            self.unit,
            self.ingredient,
            self.step
        )
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub recipe: String,
    pub steps_completed: usize,
    pub total_steps: usize,
    pub ingredients_added: usize,
    pub deviations: Vec<Deviation>,
    pub minor_count: usize,
    pub major_count: usize,
}

impl SessionSummary {
    pub fn new(
        recipe: impl Into<String>,
        steps_completed: usize,
        total_steps: usize,
        ingredients_added: usize,
        deviations: Vec<Deviation>,
    ) -> Self {
        let major_count = deviations
            .iter()
            .filter(|d| d.severity == Severity::Major)
            .count();
        Self {
            recipe: recipe.into(),
            steps_completed,
            total_steps,
            ingredients_added,
            minor_count: deviations.len() - major_count,
            major_count,
            deviations,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.steps_completed >= self.total_steps
    }
}

impl fmt::Display for SessionSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {}/{} steps, {} ingredients, {} minor and {} major deviations",
            self.recipe,
            self.steps_completed,
            self.total_steps,
            self.ingredients_added,
            self.minor_count,
            self.major_count
        )
    }
}
