//! Quantity expressions in recognized text ("1/2 tsp", "½ tbsp", "100g").

use crate::units::Unit;
use regex::Regex;
use std::sync::LazyLock;

/// Amount assumed when the numeric part of a match cannot be read.
pub const DEFAULT_AMOUNT: f64 = 1.0;

const FRACTION: &str = r"(\d+/\d+|[½¼¾⅓⅔⅛⅜⅝⅞])";
const DECIMAL: &str = r"(\d+\.?\d*)";

static UNIT_TOKENS: [(&str, Unit); 4] = [
    ("tsp|teaspoon", Unit::Teaspoon),
    ("tbsp|tablespoon", Unit::Tablespoon),
    ("grams?|g", Unit::Grams),
    ("cups?", Unit::Cup),
];

/// Fraction patterns are tried before decimal ones so "1/2 cup" is not read as "2 cup".
static PATTERNS: LazyLock<Vec<(Regex, Unit)>> = LazyLock::new(|| {
    [FRACTION, DECIMAL]
        .iter()
        .flat_map(|amount| {
            UNIT_TOKENS.iter().map(move |(tokens, unit)| {
                let pattern = format!(r"{amount}\s*({tokens})");
                // Patterns are assembled from the constants above.
                let regex = Regex::new(&pattern).expect("quantity pattern is valid");
                (regex, *unit)
            })
        })
        .collect()
});

/// A quantity expression found in text.
#[derive(Clone, Debug, PartialEq)]
pub struct TextMark {
    pub amount: f64,
    pub unit: Unit,
}

/// Find the first quantity expression in `text`.
pub fn find_quantity(text: &str) -> Option<TextMark> {
    let lowered = text.to_lowercase();
    PATTERNS.iter().find_map(|(regex, unit)| {
        let captures = regex.captures(&lowered)?;
        let amount = parse_amount(captures.get(1)?.as_str());
        Some(TextMark {
            amount,
            unit: *unit,
        })
    })
}

fn unicode_fraction(s: &str) -> Option<f64> {
    let value = match s {
        "½" => 0.5,
        "¼" => 0.25,
        "¾" => 0.75,
        "⅓" => 0.333,
        "⅔" => 0.667,
        "⅛" => 0.125,
        "⅜" => 0.375,
        "⅝" => 0.625,
        "⅞" => 0.875,
        _ => return None,
    };
    Some(value)
}

/// Parse the numeric part of a quantity expression.
///
/// Unicode glyphs first, then `a/b`, then a plain decimal. Anything
/// unreadable (including a zero denominator) yields [`DEFAULT_AMOUNT`].
pub fn parse_amount(s: &str) -> f64 {
    let s = s.trim();
    if let Some(value) = unicode_fraction(s) {
        return value;
    }

    if s.contains('/') {
        let parts: Vec<&str> = s.split('/').collect();
        if let [num, den] = parts.as_slice() {
            return match (num.trim().parse::<f64>(), den.trim().parse::<f64>()) {
                (Ok(n), Ok(d)) if d != 0.0 && (n / d).is_finite() => n / d,
                _ => DEFAULT_AMOUNT,
            };
        }
    }

    match s.parse::<f64>() {
        Ok(value) if value.is_finite() => value,
        _ => DEFAULT_AMOUNT,
    }
}

/// Normalize a unit token to its canonical name; unknown tokens are lowercased.
pub fn normalize_unit(token: &str) -> String {
    token
        .parse::<Unit>()
        .map(|unit| unit.as_str().to_string())
        .unwrap_or_else(|_| token.trim().to_lowercase())
}
