//! Session reports.
//!
//! When a session stops, everything it recorded is frozen into a
//! [`SessionReport`] that can be stored as JSON or compact binary and read back
//! later, for example to review which measurements went wrong.

use crate::session::{IngredientEntry, SessionSummary};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use uuid::Uuid;

pub mod error;

pub use error::ReportError;

/// Version identifier for the report format
pub const REPORT_VERSION: u32 = 1;

/// Serializable record of a finished cooking session.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SessionReport {
    /// Report format version
    pub version: u32,

    /// Unique report identifier
    pub id: String,

    /// When the report was created
    pub created_at: DateTime<Utc>,

    /// Progress and the full deviation log
    pub summary: SessionSummary,

    /// Every ingredient measured, in order
    pub ingredients: Vec<IngredientEntry>,

    /// Phase names visited, ending in "inactive"
    pub phase_path: Vec<String>,

    /// Wall time from loading the recipe to stopping
    pub duration: Option<Duration>,
}

impl SessionReport {
    pub fn new(
        summary: SessionSummary,
        ingredients: Vec<IngredientEntry>,
        phase_path: Vec<String>,
        duration: Option<Duration>,
    ) -> Self {
        Self {
            version: REPORT_VERSION,
            id: Uuid::new_v4().to_string(),
            created_at: Utc::now(),
            summary,
            ingredients,
            phase_path,
            duration,
        }
    }

    pub fn to_json(&self) -> Result<String, ReportError> {
        serde_json::to_string_pretty(self)
            .map_err(|e| ReportError::SerializationFailed(e.to_string()))
    }

    pub fn from_json(json: &str) -> Result<Self, ReportError> {
        let report: Self = serde_json::from_str(json)
            .map_err(|e| ReportError::DeserializationFailed(e.to_string()))?;
        report.check_version()
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, ReportError> {
        bincode::serialize(self).map_err(|e| ReportError::SerializationFailed(e.to_string()))
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ReportError> {
        let report: Self = bincode::deserialize(bytes)
            .map_err(|e| ReportError::DeserializationFailed(e.to_string()))?;
        report.check_version()
    }

    fn check_version(self) -> Result<Self, ReportError> {
        if self.version != REPORT_VERSION {
            return Err(ReportError::UnsupportedVersion {
                found: self.version,
                supported: REPORT_VERSION,
            });
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::{Deviation, Severity};

    fn sample() -> SessionReport {
        let deviation = Deviation {
            item: "turmeric".to_string(),
            expected_amount: 0.5,
            expected_unit: "teaspoon".to_string(),
            observed_amount: 1.0,
            observed_unit: "teaspoon".to_string(),
            severity: Severity::Major,
            suggestion: "Balance bitterness with yogurt.".to_string(),
        };
        let ingredients = vec![IngredientEntry {
            ingredient: "turmeric".to_string(),
            amount: 1.0,
            unit: "teaspoon".to_string(),
            step: 2,
        }];
        SessionReport::new(
            SessionSummary::new("Dal", 2, 3, 1, vec![deviation]),
            ingredients,
            vec!["inactive".into(), "active".into(), "inactive".into()],
            Some(Duration::from_secs(90)),
        )
    }

    #[test]
    fn new_report_has_current_version_and_id() {
        let report = sample();
        assert_eq!(report.version, REPORT_VERSION);
        assert!(Uuid::parse_str(&report.id).is_ok());
        assert_ne!(report.id, sample().id);
    }

    #[test]
    fn json_preserves_contents() {
        let report = sample();
        let restored = SessionReport::from_json(&report.to_json().unwrap()).unwrap();

        assert_eq!(restored, report);
        assert_eq!(restored.summary.major_count, 1);
    }

    #[test]
    fn binary_preserves_contents() {
        let report = sample();
        let restored = SessionReport::from_bytes(&report.to_bytes().unwrap()).unwrap();

        assert_eq!(restored.id, report.id);
        assert_eq!(restored.ingredients, report.ingredients);
        assert_eq!(restored.phase_path, report.phase_path);
    }

    #[test]
    fn rejects_other_versions() {
        let mut report = sample();
        report.version = REPORT_VERSION + 1;
        let json = serde_json::to_string(&report).unwrap();

        match SessionReport::from_json(&json) {
            Err(ReportError::UnsupportedVersion { found, supported }) => {
                assert_eq!(found, REPORT_VERSION + 1);
                assert_eq!(supported, REPORT_VERSION);
            }
            other => panic!("Expected UnsupportedVersion, got {other:?}"),
        }
    }

    #[test]
    fn garbage_fails_to_load() {
        assert!(matches!(
            SessionReport::from_json("not json"),
            Err(ReportError::DeserializationFailed(_))
        ));
        assert!(matches!(
            SessionReport::from_bytes(&[1, 2, 3]),
            Err(ReportError::DeserializationFailed(_))
        ));
    }
}
