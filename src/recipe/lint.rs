//! Recipe lint.
//!
//! Collects every suspicious field in a recipe in one pass instead of stopping
//! at the first. Findings are advisory: a recipe with issues still loads.

use super::{Recipe, RecipeStep};
use crate::units::Unit;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;
use thiserror::Error;

/// A suspicious field in a recipe. Step numbers are 1-based.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum RecipeIssue {
    #[error("Recipe has no steps")]
    NoSteps,

    #[error("Step {step} has no instruction")]
    EmptyInstruction { step: usize },

    #[error("Step {step} checks an unnamed ingredient")]
    UnnamedIngredient { step: usize },

    #[error("Step {step} expects a negative amount ({amount})")]
    NegativeAmount { step: usize, amount: f64 },

    #[error("Step {step} uses unknown unit '{unit}'")]
    UnknownUnit { step: usize, unit: String },
}

type Lint = Validation<(), NonEmptyVec<RecipeIssue>>;

fn require(ok: bool, issue: impl FnOnce() -> RecipeIssue) -> Lint {
    if ok {
        Validation::success(())
    } else {
        Validation::fail(issue())
    }
}

fn lint_step(index: usize, step: &RecipeStep) -> Vec<Lint> {
    let number = index + 1;
    let mut checks = vec![require(!step.instruction.trim().is_empty(), || {
        RecipeIssue::EmptyInstruction { step: number }
    })];

    if let Some(check) = &step.check {
        checks.push(require(!check.ingredient.trim().is_empty(), || {
            RecipeIssue::UnnamedIngredient { step: number }
        }));
        checks.push(require(check.amount >= 0.0, || RecipeIssue::NegativeAmount {
            step: number,
            amount: check.amount,
        }));
        checks.push(require(check.unit.parse::<Unit>().is_ok(), || {
            RecipeIssue::UnknownUnit {
                step: number,
                unit: check.unit.clone(),
            }
        }));
    }
    checks
}

/// Lint a recipe, accumulating every issue.
pub fn lint(recipe: &Recipe) -> Validation<(), NonEmptyVec<RecipeIssue>> {
    let mut checks = vec![require(!recipe.steps.is_empty(), || RecipeIssue::NoSteps)];
    checks.extend(
        recipe
            .steps
            .iter()
            .enumerate()
            .flat_map(|(index, step)| lint_step(index, step)),
    );
    Validation::all_vec(checks).map(|_| ())
}
