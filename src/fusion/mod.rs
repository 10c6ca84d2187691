//! Measurement fusion.
//!
//! Several noisy signals can each suggest a quantity: the fill level of a
//! measuring spoon, a quantity printed on a label, a depth-derived mound
//! volume. The [`FusionEngine`] tries them in priority order and returns the
//! first estimate confident enough to trust, falling back to a weaker
//! estimate, or finally a heuristic guess, so a call never comes back empty.
//!
//! ```rust
//! use chefsense::fusion::{EstimationMethod, FusionEngine, PerceptionResult, ToolObservation};
//! use chefsense::units::Unit;
//!
//! let engine = FusionEngine::default();
//! let perception = PerceptionResult {
//!     tools: vec![ToolObservation::new("teaspoon", 0.95, false)],
//!     ..PerceptionResult::default()
//! };
//!
//! let estimate = engine.estimate_quantity(&perception, "", None);
//! assert_eq!(estimate.amount(), 1.0);
//! assert_eq!(estimate.unit(), Unit::Teaspoon);
//! assert_eq!(estimate.method(), EstimationMethod::ToolFillRatio);
//! ```

mod signals;
pub mod text;
mod tiers;

pub use signals::{DepthSignal, ItemQuantity, PerceptionResult, RecognizedItem, ToolObservation};
pub use tiers::{map_fill_ratio, DepthTier, EstimationTier, Signals, TextMarkTier, ToolFillTier};

use crate::config::Calibration;
use crate::units::{format_amount, Unit};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, info, warn};

/// Where an estimate came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EstimationMethod {
    ToolFillRatio,
    TextMark,
    DepthVolume,
    HeuristicFallback,
}

impl EstimationMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ToolFillRatio => "tool-fill-ratio",
            Self::TextMark => "text-mark",
            Self::DepthVolume => "depth-volume",
            Self::HeuristicFallback => "heuristic-fallback",
        }
    }
}

impl fmt::Display for EstimationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single best-guess quantity.
///
/// Amount is never negative and confidence always lies in `[0, 1]`; the
/// constructor clamps both. Fields are read-only once built.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct QuantityEstimate {
    amount: f64,
    unit: Unit,
    confidence: f64,
    method: EstimationMethod,
}

impl QuantityEstimate {
    pub fn new(amount: f64, unit: Unit, confidence: f64, method: EstimationMethod) -> Self {
        let amount = if amount.is_finite() { amount.max(0.0) } else { 0.0 };
        let confidence = if confidence.is_nan() {
            0.0
        } else {
            confidence.clamp(0.0, 1.0)
        };
        Self {
            amount,
            unit,
            confidence,
            method,
        }
    }

    /// The last-resort guess: a quarter teaspoon with low confidence.
    pub fn heuristic() -> Self {
        Self::new(0.25, Unit::Teaspoon, 0.3, EstimationMethod::HeuristicFallback)
    }

    pub fn amount(&self) -> f64 {
        self.amount
    }

    pub fn unit(&self) -> Unit {
        self.unit
    }

    pub fn confidence(&self) -> f64 {
        self.confidence
    }

    pub fn method(&self) -> EstimationMethod {
        self.method
    }
}

impl fmt::Display for QuantityEstimate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} (confidence: {:.2}, method: {})",
            format_amount(self.amount),
            self.unit,
            self.confidence,
            self.method
        )
    }
}

/// Priority-ordered estimator over a list of [`EstimationTier`]s.
pub struct FusionEngine {
    calibration: Calibration,
    tiers: Vec<Box<dyn EstimationTier>>,
}

impl FusionEngine {
    /// Tool fill ratio, then text marks, then depth.
    pub fn new(calibration: Calibration) -> Self {
        let tiers: Vec<Box<dyn EstimationTier>> = vec![
            Box::new(ToolFillTier::new(&calibration)),
            Box::new(TextMarkTier),
            Box::new(DepthTier::new(&calibration)),
        ];
        Self { calibration, tiers }
    }

    /// Engine over a custom tier order.
    pub fn with_tiers(calibration: Calibration, tiers: Vec<Box<dyn EstimationTier>>) -> Self {
        Self { calibration, tiers }
    }

    pub fn calibration(&self) -> &Calibration {
        &self.calibration
    }

    /// Fuse the available signals into one estimate.
    ///
    /// Returns the first candidate its tier accepts. Failing that, the first
    /// candidate any tier produced, since a weak measurement beats a guess.
    /// With no candidate at all, [`QuantityEstimate::heuristic`].
    pub fn estimate_quantity(
        &self,
        perception: &PerceptionResult,
        text: &str,
        depth: Option<&DepthSignal>,
    ) -> QuantityEstimate {
        let signals = Signals {
            perception,
            text,
            depth,
        };
        debug!(
            tools = perception.tools.len(),
            text_len = text.len(),
            has_depth = depth.is_some(),
            "Estimating quantity"
        );

        let mut held: Option<QuantityEstimate> = None;
        for tier in &self.tiers {
            let Some(candidate) = tier.estimate(&signals) else {
                continue;
            };
            if tier.accepts(&candidate) {
                info!(tier = tier.name(), estimate = %candidate, "Estimate accepted");
                return candidate;
            }
            debug!(tier = tier.name(), estimate = %candidate, "Estimate below confidence gate");
            held.get_or_insert(candidate);
        }

        if let Some(estimate) = held {
            info!(estimate = %estimate, "Using low-confidence estimate");
            return estimate;
        }

        warn!("Using fallback heuristic estimate");
        QuantityEstimate::heuristic()
    }
}

impl Default for FusionEngine {
    fn default() -> Self {
        Self::new(Calibration::default())
    }
}
