//! Interfaces to the outside world.
//!
//! Cameras, vision models, OCR engines and speech output all live behind these
//! traits. Implementations are expected to bound their own latency and report
//! a timeout as [`CollaboratorError::TimedOut`].

use crate::fusion::{DepthSignal, PerceptionResult};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum CollaboratorError {
    #[error("{0} is unavailable")]
    Unavailable(String),

    #[error("{name} timed out after {after:?}")]
    TimedOut { name: String, after: Duration },

    #[error("{name} failed: {reason}")]
    Failed { name: String, reason: String },
}

/// One captured camera frame.
#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
    pub captured_at: DateTime<Utc>,
}

impl Frame {
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Self {
        Self {
            width,
            height,
            pixels,
            captured_at: Utc::now(),
        }
    }
}

pub trait FrameSource: Send + Sync {
    fn capture(&self) -> Result<Frame, CollaboratorError>;
}

pub trait Perception: Send + Sync {
    fn analyze(&self, frame: &Frame) -> Result<PerceptionResult, CollaboratorError>;
}

pub trait TextReader: Send + Sync {
    /// Text visible in the frame; empty when there is none.
    fn read_text(&self, frame: &Frame) -> Result<String, CollaboratorError>;
}

/// Speech output. Fire-and-forget: failures are the implementation's to log.
pub trait Speaker: Send + Sync {
    fn speak(&self, text: &str);
}

pub trait DepthSensor: Send + Sync {
    fn measure(&self, frame: &Frame) -> Result<DepthSignal, CollaboratorError>;
}

impl<T: FrameSource + ?Sized> FrameSource for Arc<T> {
    fn capture(&self) -> Result<Frame, CollaboratorError> {
        (**self).capture()
    }
}

impl<T: Perception + ?Sized> Perception for Arc<T> {
    fn analyze(&self, frame: &Frame) -> Result<PerceptionResult, CollaboratorError> {
        (**self).analyze(frame)
    }
}

impl<T: TextReader + ?Sized> TextReader for Arc<T> {
    fn read_text(&self, frame: &Frame) -> Result<String, CollaboratorError> {
        (**self).read_text(frame)
    }
}

impl<T: Speaker + ?Sized> Speaker for Arc<T> {
    fn speak(&self, text: &str) {
        (**self).speak(text)
    }
}

impl<T: DepthSensor + ?Sized> DepthSensor for Arc<T> {
    fn measure(&self, frame: &Frame) -> Result<DepthSignal, CollaboratorError> {
        (**self).measure(frame)
    }
}

/// The full set of collaborators an [`Assistant`](super::Assistant) talks to.
#[derive(Clone)]
pub struct Collaborators {
    pub frames: Arc<dyn FrameSource>,
    pub perception: Arc<dyn Perception>,
    pub text_reader: Arc<dyn TextReader>,
    pub speaker: Arc<dyn Speaker>,
    pub depth: Option<Arc<dyn DepthSensor>>,
}
