//! Builder API for assembling an [`Assistant`].
//!
//! Collaborators are required; calibration and tables default to the
//! built-in values.
//!
//! # Example
//!
//! ```
//! use chefsense::builder::{AssistantBuilder, BuildError};
//! use chefsense::fusion::PerceptionResult;
//! use chefsense::session::{CollaboratorError, Frame, FrameSource, Perception, Speaker, TextReader};
//!
//! struct Blind;
//!
//! impl FrameSource for Blind {
//!     fn capture(&self) -> Result<Frame, CollaboratorError> {
//!         Err(CollaboratorError::Unavailable("camera".into()))
//!     }
//! }
//! impl Perception for Blind {
//!     fn analyze(&self, _: &Frame) -> Result<PerceptionResult, CollaboratorError> {
//!         Ok(PerceptionResult::default())
//!     }
//! }
//! impl TextReader for Blind {
//!     fn read_text(&self, _: &Frame) -> Result<String, CollaboratorError> {
//!         Ok(String::new())
//!     }
//! }
//! impl Speaker for Blind {
//!     fn speak(&self, _: &str) {}
//! }
//!
//! let missing = AssistantBuilder::new().frames(Blind).build();
//! assert!(matches!(missing, Err(BuildError::MissingPerception)));
//!
//! let assistant = AssistantBuilder::new()
//!     .frames(Blind)
//!     .perception(Blind)
//!     .text_reader(Blind)
//!     .speaker(Blind)
//!     .build()
//!     .unwrap();
//! assert_eq!(assistant.dispatch("how much").text(), "Sorry, I couldn't access the camera.");
//! ```

pub mod error;

pub use error::BuildError;

use crate::config::{AssistantConfig, Calibration, ToleranceOverrides};
use crate::fusion::FusionEngine;
use crate::session::{
    Assistant, Collaborators, DepthSensor, FrameSource, Perception, Speaker, TextReader,
};
use crate::validation::{CorrectionTable, ToleranceTable, Validator};
use std::sync::Arc;

/// Fluent builder for [`Assistant`].
#[derive(Default)]
pub struct AssistantBuilder {
    frames: Option<Arc<dyn FrameSource>>,
    perception: Option<Arc<dyn Perception>>,
    text_reader: Option<Arc<dyn TextReader>>,
    speaker: Option<Arc<dyn Speaker>>,
    depth: Option<Arc<dyn DepthSensor>>,
    calibration: Option<Calibration>,
    tolerances: Option<ToleranceTable>,
    corrections: Option<CorrectionTable>,
    overrides: ToleranceOverrides,
}

impl AssistantBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the camera (required).
    pub fn frames(mut self, source: impl FrameSource + 'static) -> Self {
        self.frames = Some(Arc::new(source));
        self
    }

    /// Set the vision backend (required).
    pub fn perception(mut self, backend: impl Perception + 'static) -> Self {
        self.perception = Some(Arc::new(backend));
        self
    }

    /// Set the OCR backend (required).
    pub fn text_reader(mut self, reader: impl TextReader + 'static) -> Self {
        self.text_reader = Some(Arc::new(reader));
        self
    }

    /// Set speech output (required).
    pub fn speaker(mut self, speaker: impl Speaker + 'static) -> Self {
        self.speaker = Some(Arc::new(speaker));
        self
    }

    pub fn depth_sensor(mut self, sensor: impl DepthSensor + 'static) -> Self {
        self.depth = Some(Arc::new(sensor));
        self
    }

    pub fn calibration(mut self, calibration: Calibration) -> Self {
        self.calibration = Some(calibration);
        self
    }

    pub fn tolerances(mut self, table: ToleranceTable) -> Self {
        self.tolerances = Some(table);
        self
    }

    pub fn corrections(mut self, table: CorrectionTable) -> Self {
        self.corrections = Some(table);
        self
    }

    /// Apply a loaded configuration: its calibration file and tolerance
    /// overrides. Overrides are validated in [`build`](Self::build).
    pub fn config(mut self, config: &AssistantConfig) -> Self {
        self.calibration = Some(config.calibration());
        self.overrides = config.tolerance.clone();
        self
    }

    /// Build the assistant.
    /// Returns an error if a required collaborator is missing or the
    /// tolerance overrides are invalid.
    pub fn build(self) -> Result<Assistant, BuildError> {
        let collaborators = Collaborators {
            frames: self.frames.ok_or(BuildError::MissingFrameSource)?,
            perception: self.perception.ok_or(BuildError::MissingPerception)?,
            text_reader: self.text_reader.ok_or(BuildError::MissingTextReader)?,
            speaker: self.speaker.ok_or(BuildError::MissingSpeaker)?,
            depth: self.depth,
        };

        let tolerances = self
            .tolerances
            .unwrap_or_default()
            .with_overrides(&self.overrides)?;
        let validator = Validator::new(
            Arc::new(tolerances),
            Arc::new(self.corrections.unwrap_or_default()),
        );
        let fusion = FusionEngine::new(self.calibration.unwrap_or_default());

        Ok(Assistant::new(collaborators, fusion, validator))
    }
}
