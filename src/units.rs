//! Measuring units.
//!
//! Recipes and perception output spell units many ways ("tsp", "Teaspoons",
//! "g"). Everything is normalized to [`Unit`] before comparison.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// The fixed vocabulary of measuring units.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    Teaspoon,
    Tablespoon,
    Cup,
    Grams,
    Kilograms,
    Milliliters,
    Liters,
    Pinch,
    Ounce,
    Pound,
}

#[derive(Debug, Clone, Error, PartialEq)]
#[error("Unknown unit: '{0}'")]
pub struct UnknownUnit(pub String);

impl Unit {
    pub const ALL: [Unit; 10] = [
        Unit::Teaspoon,
        Unit::Tablespoon,
        Unit::Cup,
        Unit::Grams,
        Unit::Kilograms,
        Unit::Milliliters,
        Unit::Liters,
        Unit::Pinch,
        Unit::Ounce,
        Unit::Pound,
    ];

    /// Canonical name, as used in recipes and reports.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Teaspoon => "teaspoon",
            Self::Tablespoon => "tablespoon",
            Self::Cup => "cup",
            Self::Grams => "grams",
            Self::Kilograms => "kilograms",
            Self::Milliliters => "milliliters",
            Self::Liters => "liters",
            Self::Pinch => "pinch",
            Self::Ounce => "ounce",
            Self::Pound => "pound",
        }
    }

    /// Whether deviations in this unit are judged relative to the expected amount.
    pub fn uses_relative_tolerance(&self) -> bool {
        matches!(self, Self::Cup | Self::Grams)
    }

    /// Size in teaspoons for the volumetric spoon-like units.
    fn in_teaspoons(&self) -> Option<f64> {
        match self {
            Self::Teaspoon => Some(1.0),
            Self::Tablespoon => Some(3.0),
            Self::Cup => Some(48.0),
            Self::Pinch => Some(0.125),
            _ => None,
        }
    }

    /// Convert `amount` between teaspoon, tablespoon, cup and pinch.
    ///
    /// Returns `None` when either unit is outside that family.
    ///
    /// ```rust
    /// use chefsense::units::Unit;
    ///
    /// assert_eq!(Unit::convert(1.0, Unit::Tablespoon, Unit::Teaspoon), Some(3.0));
    /// assert_eq!(Unit::convert(1.0, Unit::Grams, Unit::Teaspoon), None);
    /// ```
    pub fn convert(amount: f64, from: Unit, to: Unit) -> Option<f64> {
        let from_tsp = from.in_teaspoons()?;
        let to_tsp = to.in_teaspoons()?;
        Some(amount * from_tsp / to_tsp)
    }
}

impl FromStr for Unit {
    type Err = UnknownUnit;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let unit = match s.trim().to_lowercase().as_str() {
            "tsp" | "tsps" | "teaspoon" | "teaspoons" => Self::Teaspoon,
            "tbsp" | "tbsps" | "tablespoon" | "tablespoons" => Self::Tablespoon,
            "cup" | "cups" => Self::Cup,
            "g" | "gram" | "grams" => Self::Grams,
            "kg" | "kilogram" | "kilograms" => Self::Kilograms,
            "ml" | "milliliter" | "milliliters" | "millilitre" | "millilitres" => {
                Self::Milliliters
            }
            "l" | "liter" | "liters" | "litre" | "litres" => Self::Liters,
            "pinch" | "pinches" => Self::Pinch,
            "oz" | "ounce" | "ounces" => Self::Ounce,
            "lb" | "lbs" | "pound" | "pounds" => Self::Pound,
            _ => return Err(UnknownUnit(s.to_string())),
        };
        Ok(unit)
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Render an amount for speech: at most two decimals, no trailing zeros.
pub fn format_amount(amount: f64) -> String {
    let rounded = format!("{amount:.2}");
    let trimmed = rounded.trim_end_matches('0').trim_end_matches('.');
    if trimmed.is_empty() || trimmed == "-" {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}
