//! Estimation tiers, tried in priority order by the fusion engine.

use super::signals::{DepthSignal, PerceptionResult, ToolObservation};
use super::text;
use super::{EstimationMethod, QuantityEstimate};
use crate::config::Calibration;
use crate::units::Unit;
use std::collections::BTreeSet;

const TEASPOON_ML: f64 = 4.928_92;
const TABLESPOON_ML: f64 = 14.786_8;

/// Signals gathered for one estimation call.
#[derive(Clone, Copy, Debug)]
pub struct Signals<'a> {
    pub perception: &'a PerceptionResult,
    pub text: &'a str,
    pub depth: Option<&'a DepthSignal>,
}

/// One source of quantity estimates.
///
/// A tier either yields a candidate or nothing. The engine returns the first
/// candidate its tier [`accepts`](EstimationTier::accepts).
pub trait EstimationTier: Send + Sync {
    fn name(&self) -> &'static str;

    fn estimate(&self, signals: &Signals<'_>) -> Option<QuantityEstimate>;

    fn accepts(&self, estimate: &QuantityEstimate) -> bool;
}

/// Spoon fill ratio reported by perception.
pub struct ToolFillTier {
    spoon_names: BTreeSet<String>,
}

impl ToolFillTier {
    pub const MIN_CONFIDENCE: f64 = 0.6;

    /// Generic "spoon" is always recognized, plus every calibrated tool.
    pub fn new(calibration: &Calibration) -> Self {
        let mut spoon_names: BTreeSet<String> = calibration
            .spoons
            .keys()
            .map(|name| name.trim().to_lowercase())
            .collect();
        spoon_names.extend(["teaspoon", "tablespoon", "spoon"].map(String::from));
        Self { spoon_names }
    }

    fn is_spoon(&self, tool: &ToolObservation) -> bool {
        self.spoon_names.contains(&tool.name.trim().to_lowercase())
    }
}

/// Map a fill ratio to an amount in spoon units.
///
/// | ratio        | flat | heaped | confidence |
/// |--------------|------|--------|------------|
/// | < 0.2        | 0.25 | 0.25   | 0.6        |
/// | 0.4 ..= 0.6  | 0.5  | 0.75   | 0.75       |
/// | >= 0.9       | 1.0  | 1.25   | 0.8        |
/// | otherwise    | ratio| ratio  | 0.65       |
pub fn map_fill_ratio(ratio: f64, heaped: bool, tool_name: &str) -> QuantityEstimate {
    let ratio = if ratio.is_nan() { 0.5 } else { ratio };
    let unit = if tool_name.to_lowercase().contains("table") {
        Unit::Tablespoon
    } else {
        Unit::Teaspoon
    };

    let (amount, confidence) = if ratio < 0.2 {
        (0.25, 0.6)
    } else if (0.4..=0.6).contains(&ratio) {
        (if heaped { 0.75 } else { 0.5 }, 0.75)
    } else if ratio >= 0.9 {
        (if heaped { 1.25 } else { 1.0 }, 0.8)
    } else {
        (ratio, 0.65)
    };

    QuantityEstimate::new(amount, unit, confidence, EstimationMethod::ToolFillRatio)
}

impl EstimationTier for ToolFillTier {
    fn name(&self) -> &'static str {
        "tool-fill-ratio"
    }

    fn estimate(&self, signals: &Signals<'_>) -> Option<QuantityEstimate> {
        let tool = signals.perception.tools.iter().find(|t| self.is_spoon(t))?;
        Some(map_fill_ratio(tool.fill_ratio, tool.heaped, &tool.name))
    }

    fn accepts(&self, estimate: &QuantityEstimate) -> bool {
        estimate.confidence() > Self::MIN_CONFIDENCE
    }
}

/// Printed or handwritten quantity marks read from the frame.
pub struct TextMarkTier;

impl TextMarkTier {
    pub const CONFIDENCE: f64 = 0.9;
    pub const MIN_CONFIDENCE: f64 = 0.7;
}

impl EstimationTier for TextMarkTier {
    fn name(&self) -> &'static str {
        "text-mark"
    }

    fn estimate(&self, signals: &Signals<'_>) -> Option<QuantityEstimate> {
        if signals.text.trim().is_empty() {
            return None;
        }
        let mark = text::find_quantity(signals.text)?;
        Some(QuantityEstimate::new(
            mark.amount,
            mark.unit,
            Self::CONFIDENCE,
            EstimationMethod::TextMark,
        ))
    }

    fn accepts(&self, estimate: &QuantityEstimate) -> bool {
        estimate.confidence() > Self::MIN_CONFIDENCE
    }
}

/// Mound volume integrated from depth samples.
pub struct DepthTier {
    pixels_per_cm: f64,
}

impl DepthTier {
    pub const CONFIDENCE: f64 = 0.5;

    pub fn new(calibration: &Calibration) -> Self {
        Self {
            pixels_per_cm: calibration.pixels_per_cm,
        }
    }

    /// Volume in ml (cm³) under the height samples.
    fn volume_ml(&self, depth: &DepthSignal) -> Option<f64> {
        if depth.heights_cm.is_empty() || !(self.pixels_per_cm > 0.0) {
            return None;
        }
        let pixel_area_cm2 = (1.0 / self.pixels_per_cm).powi(2);
        let volume: f64 = depth
            .heights_cm
            .iter()
            .filter(|h| h.is_finite())
            .map(|h| h.max(0.0) * pixel_area_cm2)
            .sum();
        volume.is_finite().then_some(volume)
    }
}

impl EstimationTier for DepthTier {
    fn name(&self) -> &'static str {
        "depth-volume"
    }

    fn estimate(&self, signals: &Signals<'_>) -> Option<QuantityEstimate> {
        let depth = signals.depth?;
        let (amount, unit) = match self.volume_ml(depth) {
            Some(ml) if ml >= TABLESPOON_ML => (ml / TABLESPOON_ML, Unit::Tablespoon),
            Some(ml) => (ml / TEASPOON_ML, Unit::Teaspoon),
            // Uncalibrated placeholder.
            None => (1.0, Unit::Teaspoon),
        };
        Some(QuantityEstimate::new(
            amount,
            unit,
            Self::CONFIDENCE,
            EstimationMethod::DepthVolume,
        ))
    }

    fn accepts(&self, _estimate: &QuantityEstimate) -> bool {
        true
    }
}
