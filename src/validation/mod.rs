//! Deviation checks against a recipe's expected quantity.
//!
//! The [`Validator`] is stateless: it compares one expectation with one
//! observation and returns a [`Deviation`]. Keeping a log of deviations is the
//! session's job. Every deviation is also emitted as a `tracing` event under
//! the `chefsense::audit` target.

mod tables;

pub use tables::{
    ingredient_key, CorrectionTable, Corrections, ToleranceTable, DEFAULT_KEY, FALLBACK_TOLERANCE,
};

use crate::fusion::QuantityEstimate;
use crate::recipe::CheckClause;
use crate::units::{format_amount, Unit};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};

pub const UNIT_MISMATCH_SUGGESTION: &str =
    "Use the correct measuring unit as specified in the recipe.";

pub const CLOSE_ENOUGH_SUGGESTION: &str =
    "This is close enough. You can proceed to the next step.";

/// Guards the relative comparison against a zero expected amount.
const RELATIVE_EPSILON: f64 = 1e-6;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Minor,
    Major,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Minor => "minor",
            Self::Major => "major",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which way an observation missed its expectation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Over,
    Under,
}

impl Direction {
    fn between(expected: f64, observed: f64) -> Self {
        if observed > expected {
            Self::Over
        } else {
            Self::Under
        }
    }
}

/// An ingredient measured by the cook, possibly without a usable estimate.
#[derive(Clone, Debug, PartialEq)]
pub struct Observation {
    pub ingredient: String,
    pub estimate: Option<QuantityEstimate>,
}

impl Observation {
    pub fn new(ingredient: impl Into<String>, estimate: Option<QuantityEstimate>) -> Self {
        Self {
            ingredient: ingredient.into(),
            estimate,
        }
    }
}

/// Outcome of comparing an observation with the recipe.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Deviation {
    pub item: String,
    pub expected_amount: f64,
    pub expected_unit: String,
    pub observed_amount: f64,
    pub observed_unit: String,
    pub severity: Severity,
    pub suggestion: String,
}

impl Deviation {
    pub fn is_major(&self) -> bool {
        self.severity == Severity::Major
    }
}

impl fmt::Display for Deviation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} - expected {} {}, observed {} {}",
            self.severity.as_str().to_uppercase(),
            self.item,
            format_amount(self.expected_amount),
            self.expected_unit,
            format_amount(self.observed_amount),
            self.observed_unit
        )
    }
}

/// Compares observed quantities with recipe check clauses.
#[derive(Clone, Debug, Default)]
pub struct Validator {
    tolerances: Arc<ToleranceTable>,
    corrections: Arc<CorrectionTable>,
}

impl Validator {
    pub fn new(tolerances: Arc<ToleranceTable>, corrections: Arc<CorrectionTable>) -> Self {
        Self {
            tolerances,
            corrections,
        }
    }

    pub fn tolerances(&self) -> &ToleranceTable {
        &self.tolerances
    }

    /// Compare `observed` with the expectation in `expected`.
    ///
    /// Returns `None` only when the observation carries no estimate. An exact
    /// match still yields a minor deviation with a reassuring suggestion.
    pub fn validate(&self, expected: &CheckClause, observed: &Observation) -> Option<Deviation> {
        let Some(estimate) = observed.estimate.as_ref() else {
            debug!(ingredient = %expected.ingredient, "No estimate to validate");
            return None;
        };

        let expected_unit = expected.unit.parse::<Unit>().ok();
        let expected_unit_name = expected_unit
            .map(|unit| unit.as_str().to_string())
            .unwrap_or_else(|| expected.unit.clone());
        let observed_amount = estimate.amount();

        let deviation = |severity: Severity, suggestion: &str| Deviation {
            item: expected.ingredient.clone(),
            expected_amount: expected.amount,
            expected_unit: expected_unit_name.clone(),
            observed_amount,
            observed_unit: estimate.unit().as_str().to_string(),
            severity,
            suggestion: suggestion.to_string(),
        };

        let unit = match expected_unit {
            Some(unit) if unit == estimate.unit() => unit,
            _ => {
                let result = deviation(Severity::Major, UNIT_MISMATCH_SUGGESTION);
                audit(&result);
                return Some(result);
            }
        };

        let tolerance = self.tolerances.lookup(&expected.ingredient, unit);
        let abs_diff = (observed_amount - expected.amount).abs();
        let exceeds = if unit.uses_relative_tolerance() {
            abs_diff / expected.amount.max(RELATIVE_EPSILON) > tolerance
        } else {
            abs_diff > tolerance
        };

        let result = if exceeds {
            let direction = Direction::between(expected.amount, observed_amount);
            let suggestion = self.corrections.suggestion(&expected.ingredient, direction);
            deviation(Severity::Major, suggestion)
        } else {
            deviation(Severity::Minor, CLOSE_ENOUGH_SUGGESTION)
        };
        audit(&result);
        Some(result)
    }
}

fn audit(deviation: &Deviation) {
    match deviation.severity {
        Severity::Major => {
            warn!(target: "chefsense::audit", item = %deviation.item, %deviation, "Major deviation")
        }
        Severity::Minor => {
            info!(target: "chefsense::audit", item = %deviation.item, %deviation, "Minor deviation")
        }
    }
}
