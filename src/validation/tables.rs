//! Static tolerance and correction tables.
//!
//! Both tables are built once and shared read-only. Lookups always resolve:
//! unknown ingredients use the default entry, and a unit missing from the
//! default entry uses [`FALLBACK_TOLERANCE`].

use super::Direction;
use crate::config::{ConfigError, ToleranceOverrides};
use crate::units::Unit;
use std::collections::HashMap;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;
use tracing::info;

/// Tolerance used when neither the ingredient nor the default entry lists the unit.
pub const FALLBACK_TOLERANCE: f64 = 0.25;

/// Key used in override documents to address the default entry.
pub const DEFAULT_KEY: &str = "__default__";

/// Canonical table key for an ingredient name: "Chili Powder" -> "chili_powder".
pub fn ingredient_key(name: &str) -> String {
    name.trim()
        .to_lowercase()
        .split(|c: char| c.is_whitespace() || c == '-')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("_")
}

/// Allowed deviation per ingredient and unit.
///
/// For cup and grams the value is a fraction of the expected amount; for every
/// other unit it is an absolute amount in that unit.
#[derive(Clone, Debug, PartialEq)]
pub struct ToleranceTable {
    entries: HashMap<String, HashMap<Unit, f64>>,
    default: HashMap<Unit, f64>,
}

impl ToleranceTable {
    /// Spices are forgiving, salt is strict, liquids are judged by percentage in cups.
    pub fn builtin() -> Self {
        use Unit::*;

        let spice = [(Teaspoon, 0.25), (Tablespoon, 0.25)];
        let entries = HashMap::from([
            ("turmeric".to_string(), HashMap::from(spice)),
            ("cumin".to_string(), HashMap::from(spice)),
            ("coriander".to_string(), HashMap::from(spice)),
            (
                "chili_powder".to_string(),
                HashMap::from([(Teaspoon, 0.20), (Tablespoon, 0.20)]),
            ),
            (
                "salt".to_string(),
                HashMap::from([(Teaspoon, 0.15), (Tablespoon, 0.15), (Pinch, 0.5)]),
            ),
            (
                "oil".to_string(),
                HashMap::from([(Cup, 0.1), (Tablespoon, 0.25), (Teaspoon, 0.25)]),
            ),
            (
                "water".to_string(),
                HashMap::from([(Cup, 0.15), (Tablespoon, 0.25)]),
            ),
        ]);

        let default = HashMap::from([
            (Teaspoon, 0.25),
            (Tablespoon, 0.25),
            (Cup, 0.1),
            (Grams, 0.1),
            (Kilograms, 0.05),
            (Milliliters, 10.0),
            (Liters, 0.05),
            (Pinch, 0.5),
            (Ounce, 0.25),
            (Pound, 0.1),
        ]);

        Self { entries, default }
    }

    /// Tolerance for `ingredient` measured in `unit`.
    pub fn lookup(&self, ingredient: &str, unit: Unit) -> f64 {
        self.entries
            .get(&ingredient_key(ingredient))
            .and_then(|units| units.get(&unit))
            .or_else(|| self.default.get(&unit))
            .copied()
            .unwrap_or(FALLBACK_TOLERANCE)
    }

    /// Apply overrides, rejecting the whole set if any entry is invalid.
    ///
    /// Every problem is reported, not just the first.
    pub fn with_overrides(mut self, overrides: &ToleranceOverrides) -> Result<Self, ConfigError> {
        let checks: Vec<Validation<(String, Unit, f64), NonEmptyVec<String>>> = overrides
            .iter()
            .flat_map(|(ingredient, units)| {
                units
                    .iter()
                    .map(move |(unit, value)| check_override(ingredient, unit, *value))
            })
            .collect();

        match Validation::all_vec(checks) {
            Validation::Success(accepted) => {
                for (ingredient, unit, value) in accepted {
                    info!(%ingredient, %unit, value, "Tolerance override");
                    if ingredient == DEFAULT_KEY {
                        self.default.insert(unit, value);
                    } else {
                        self.entries.entry(ingredient).or_default().insert(unit, value);
                    }
                }
                Ok(self)
            }
            Validation::Failure(errors) => Err(ConfigError::InvalidTolerances(
                errors.iter().cloned().collect(),
            )),
        }
    }
}

impl Default for ToleranceTable {
    fn default() -> Self {
        Self::builtin()
    }
}

fn check_override(
    ingredient: &str,
    unit: &str,
    value: f64,
) -> Validation<(String, Unit, f64), NonEmptyVec<String>> {
    let parsed = unit.parse::<Unit>();
    let valid_value = value.is_finite() && value >= 0.0;
    match (parsed, valid_value) {
        (Ok(unit), true) => {
            let key = if ingredient == DEFAULT_KEY {
                DEFAULT_KEY.to_string()
            } else {
                ingredient_key(ingredient)
            };
            Validation::success((key, unit, value))
        }
        (Err(e), _) => Validation::fail(format!("{ingredient}: {e}")),
        (Ok(unit), false) => Validation::fail(format!(
            "{ingredient}.{unit}: tolerance must be a non-negative number, got {value}"
        )),
    }
}

/// Corrective advice for one ingredient.
#[derive(Clone, Debug, PartialEq)]
pub struct Corrections {
    pub over: String,
    pub under: String,
}

impl Corrections {
    fn new(over: &str, under: &str) -> Self {
        Self {
            over: over.to_string(),
            under: under.to_string(),
        }
    }

    pub fn for_direction(&self, direction: Direction) -> &str {
        match direction {
            Direction::Over => &self.over,
            Direction::Under => &self.under,
        }
    }
}

/// Advice for major deviations, keyed by ingredient.
#[derive(Clone, Debug, PartialEq)]
pub struct CorrectionTable {
    entries: HashMap<String, Corrections>,
    default: Corrections,
}

impl CorrectionTable {
    pub fn builtin() -> Self {
        let entries = HashMap::from([
            (
                "turmeric".to_string(),
                Corrections::new(
                    "Balance bitterness with yogurt, lemon juice, or a pinch of sugar.",
                    "Add a small pinch more to reach the recipe amount.",
                ),
            ),
            (
                "salt".to_string(),
                Corrections::new(
                    "Balance with lemon juice, sugar, or add more liquid/base ingredients.",
                    "Add a small pinch more carefully.",
                ),
            ),
            (
                "chili_powder".to_string(),
                Corrections::new(
                    "Balance heat with yogurt, cream, or coconut milk.",
                    "Add more carefully to taste.",
                ),
            ),
            (
                "cumin".to_string(),
                Corrections::new(
                    "The flavor is strong. Consider balancing with coriander or more base.",
                    "Add a bit more for the intended flavor profile.",
                ),
            ),
        ]);
        let default = Corrections::new(
            "Remove some or balance with complementary ingredients.",
            "Add a bit more to reach the recipe amount.",
        );
        Self { entries, default }
    }

    pub fn suggestion(&self, ingredient: &str, direction: Direction) -> &str {
        self.entries
            .get(&ingredient_key(ingredient))
            .unwrap_or(&self.default)
            .for_direction(direction)
    }
}

impl Default for CorrectionTable {
    fn default() -> Self {
        Self::builtin()
    }
}
