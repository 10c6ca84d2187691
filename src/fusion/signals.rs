//! Structured perception output consumed by the fusion engine.
//!
//! Every field defaults when absent: a perception backend that returns `{}`
//! means "nothing detected", not an error.

use serde::{Deserialize, Serialize};

fn default_fill_ratio() -> f64 {
    0.5
}

/// One analyzed camera frame.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PerceptionResult {
    pub recognized_items: Vec<RecognizedItem>,
    pub tools: Vec<ToolObservation>,
    /// Containers are passed through untouched; nothing in the core reads them.
    pub containers: Vec<serde_json::Value>,
    pub uncertainties: Vec<String>,
}

impl PerceptionResult {
    /// The recognized item with the highest confidence.
    pub fn best_item(&self) -> Option<&RecognizedItem> {
        self.recognized_items
            .iter()
            .max_by(|a, b| a.confidence.total_cmp(&b.confidence))
    }

    pub fn is_empty(&self) -> bool {
        self.recognized_items.is_empty() && self.tools.is_empty() && self.containers.is_empty()
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecognizedItem {
    pub name: String,
    pub confidence: f64,
    pub estimated_quantity: Option<ItemQuantity>,
}

/// Quantity as reported by the perception backend, unit left as spelled.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ItemQuantity {
    pub amount: f64,
    pub unit: String,
}

/// A measuring tool seen in the frame.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ToolObservation {
    #[serde(default)]
    pub name: String,
    /// Fraction of the bowl occupied; above 1.0 only when heaped.
    #[serde(default = "default_fill_ratio")]
    pub fill_ratio: f64,
    #[serde(default)]
    pub heaped: bool,
}

impl ToolObservation {
    pub fn new(name: impl Into<String>, fill_ratio: f64, heaped: bool) -> Self {
        Self {
            name: name.into(),
            fill_ratio,
            heaped,
        }
    }
}

/// Height samples (cm above the surface) over the ingredient mask, one per pixel.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DepthSignal {
    pub heights_cm: Vec<f64>,
}

impl DepthSignal {
    pub fn new(heights_cm: Vec<f64>) -> Self {
        Self { heights_cm }
    }
}
