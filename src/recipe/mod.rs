//! Recipe documents.
//!
//! Recipes arrive as JSON and are read-only once loaded. Missing fields default
//! to empty or zero; only a document that cannot be parsed at all is an error.

mod lint;

pub use lint::{lint, RecipeIssue};

use crate::units::format_amount;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RecipeError {
    #[error("Failed to read recipe {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Recipe is not a valid document: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Read an explicit `null` as the field's default.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// The quantity a step asks the cook to verify.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckClause {
    #[serde(deserialize_with = "null_as_default")]
    pub ingredient: String,
    #[serde(deserialize_with = "null_as_default")]
    pub amount: f64,
    /// Unit as written in the recipe; normalized at comparison time.
    #[serde(deserialize_with = "null_as_default")]
    pub unit: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecipeStep {
    #[serde(deserialize_with = "null_as_default")]
    pub instruction: String,
    /// Spoken before the instruction, in order.
    #[serde(deserialize_with = "null_as_default")]
    pub safety: Vec<String>,
    pub check: Option<CheckClause>,
}

impl RecipeStep {
    pub fn new(instruction: impl Into<String>) -> Self {
        Self {
            instruction: instruction.into(),
            ..Self::default()
        }
    }

    pub fn with_safety(mut self, warning: impl Into<String>) -> Self {
        self.safety.push(warning.into());
        self
    }

    pub fn with_check(
        mut self,
        ingredient: impl Into<String>,
        amount: f64,
        unit: impl Into<String>,
    ) -> Self {
        self.check = Some(CheckClause {
            ingredient: ingredient.into(),
            amount,
            unit: unit.into(),
        });
        self
    }
}

/// Serving count, as a number or free text ("2-3").
///
/// Anything else is kept as written and spoken as "unknown".
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Serves {
    Count(u32),
    Amount(f64),
    Text(String),
    Other(serde_json::Value),
}

impl fmt::Display for Serves {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Count(n) => write!(f, "{n}"),
            Self::Amount(n) if n.is_finite() && *n > 0.0 => f.write_str(&format_amount(*n)),
            Self::Text(s) if !s.trim().is_empty() => f.write_str(s),
            Self::Amount(_) | Self::Text(_) | Self::Other(_) => f.write_str("unknown"),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Recipe {
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    pub serves: Option<Serves>,
    #[serde(deserialize_with = "null_as_default")]
    pub steps: Vec<RecipeStep>,
}

impl Recipe {
    pub fn new(name: impl Into<String>, steps: Vec<RecipeStep>) -> Self {
        Self {
            name: name.into(),
            serves: None,
            steps,
        }
    }

    pub fn from_json(json: &str) -> Result<Self, RecipeError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: &Path) -> Result<Self, RecipeError> {
        let content = fs::read_to_string(path).map_err(|source| RecipeError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&content)
    }

    /// Name for speech; "Unknown" when the document has none.
    pub fn display_name(&self) -> &str {
        if self.name.trim().is_empty() {
            "Unknown"
        } else {
            &self.name
        }
    }

    pub fn serves_text(&self) -> String {
        self.serves
            .as_ref()
            .map_or_else(|| "unknown".to_string(), ToString::to_string)
    }

    pub fn step(&self, index: usize) -> Option<&RecipeStep> {
        self.steps.get(index)
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DAL: &str = r#"{
        "name": "Simple Dal",
        "serves": 2,
        "steps": [
            {"instruction": "Heat oil", "safety": ["The pan will be hot."]},
            {
                "instruction": "Add turmeric",
                "check": {"ingredient": "turmeric", "amount": 0.5, "unit": "teaspoon"}
            },
            {}
        ]
    }"#;

    #[test]
    fn parses_full_document() {
        let recipe = Recipe::from_json(DAL).unwrap();

        assert_eq!(recipe.display_name(), "Simple Dal");
        assert_eq!(recipe.serves_text(), "2");
        assert_eq!(recipe.len(), 3);
        assert_eq!(recipe.steps[0].safety, vec!["The pan will be hot."]);
        assert_eq!(
            recipe.steps[1].check,
            Some(CheckClause {
                ingredient: "turmeric".to_string(),
                amount: 0.5,
                unit: "teaspoon".to_string(),
            })
        );
    }

    #[test]
    fn missing_fields_default() {
        let recipe = Recipe::from_json(r#"{"steps": [{"check": {}}]}"#).unwrap();

        assert_eq!(recipe.display_name(), "Unknown");
        assert_eq!(recipe.serves_text(), "unknown");
        let check = recipe.steps[0].check.as_ref().unwrap();
        assert_eq!(check.amount, 0.0);
        assert!(check.unit.is_empty());
        assert!(recipe.steps[0].instruction.is_empty());
    }

    #[test]
    fn textual_serves() {
        let recipe = Recipe::from_json(r#"{"serves": "2-3"}"#).unwrap();
        assert_eq!(recipe.serves_text(), "2-3");
        assert!(recipe.is_empty());
    }

    #[test]
    fn numeric_serves_of_any_shape_load() {
        let serves = |json: &str| {
            let document = format!(r#"{{"name": "Dal", "serves": {json}}}"#);
            Recipe::from_json(&document).unwrap().serves_text()
        };

        assert_eq!(serves("2.5"), "2.5");
        assert_eq!(serves("4.0"), "4");
        assert_eq!(serves("-1"), "unknown");
        assert_eq!(serves(r#"{"min": 2}"#), "unknown");
        assert_eq!(serves("null"), "unknown");
    }

    #[test]
    fn null_fields_default() {
        let recipe = Recipe::from_json(
            r#"{
                "name": null,
                "steps": [
                    {"instruction": null, "safety": null, "check": null},
                    {"instruction": "Add salt", "check": {"ingredient": "salt", "amount": null}}
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(recipe.display_name(), "Unknown");
        assert!(recipe.steps[0].instruction.is_empty());
        assert!(recipe.steps[0].safety.is_empty());
        assert!(recipe.steps[0].check.is_none());
        assert_eq!(recipe.steps[1].check.as_ref().unwrap().amount, 0.0);

        let empty = Recipe::from_json(r#"{"steps": null}"#).unwrap();
        assert!(empty.is_empty());
    }

    #[test]
    fn unreadable_document_is_an_error() {
        assert!(matches!(
            Recipe::from_json("[1, 2, 3"),
            Err(RecipeError::Parse(_))
        ));
        assert!(matches!(
            Recipe::from_json(r#"{"steps": "none"}"#),
            Err(RecipeError::Parse(_))
        ));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let result = Recipe::load(Path::new("/nonexistent/recipe.json"));
        assert!(matches!(result, Err(RecipeError::Io { .. })));
    }

    #[test]
    fn step_builders() {
        let step = RecipeStep::new("Add salt")
            .with_safety("Careful")
            .with_check("salt", 0.5, "tsp");

        assert_eq!(step.safety.len(), 1);
        assert_eq!(step.check.unwrap().unit, "tsp");
    }
}
