//! Chefsense: the decision core of a voice-guided cooking assistant
//!
//! Chefsense sits between perception output and spoken guidance. It is built on
//! a "pure core, imperative shell" split: quantity fusion, deviation checks and
//! step sequencing are plain synchronous functions over values, while cameras,
//! vision models, OCR and speech live behind traits in [`session`].
//!
//! # Core Concepts
//!
//! - **Fusion**: Priority-ordered estimation tiers reconcile noisy signals into one quantity
//! - **Validation**: Ingredient-specific tolerances classify deviations and suggest corrections
//! - **Session**: A phase state machine steps through a recipe and routes commands
//!
//! # Example
//!
//! ```rust
//! use chefsense::fusion::{FusionEngine, PerceptionResult, ToolObservation};
//! use chefsense::recipe::CheckClause;
//! use chefsense::validation::{Observation, Severity, Validator};
//!
//! let engine = FusionEngine::default();
//! let perception = PerceptionResult {
//!     tools: vec![ToolObservation::new("teaspoon", 0.95, false)],
//!     ..PerceptionResult::default()
//! };
//! let estimate = engine.estimate_quantity(&perception, "", None);
//!
//! let check = CheckClause {
//!     ingredient: "turmeric".to_string(),
//!     amount: 0.5,
//!     unit: "teaspoon".to_string(),
//! };
//! let deviation = Validator::default()
//!     .validate(&check, &Observation::new("turmeric", Some(estimate)))
//!     .unwrap();
//!
//! assert_eq!(deviation.severity, Severity::Major);
//! assert!(deviation.suggestion.contains("bitterness"));
//! ```

pub mod builder;
pub mod config;
pub mod core;
pub mod fusion;
pub mod recipe;
pub mod report;
pub mod session;
pub mod units;
pub mod validation;

// Re-export commonly used types
pub use builder::{AssistantBuilder, BuildError};
pub use core::{Guard, PhaseHistory, PhaseTransition, SessionPhase, State};
pub use fusion::{EstimationMethod, FusionEngine, QuantityEstimate};
pub use recipe::{CheckClause, Recipe, RecipeStep};
pub use report::SessionReport;
pub use session::{Assistant, CookingSession, Intent, Reply};
pub use units::Unit;
pub use validation::{Deviation, Severity, Validator};
