// libs/symptom-checker-cell/src/models.rs
use std::fmt;

use serde::{Deserialize, Serialize};
use shared_models::error::AppError;

pub const MEDICAL_DISCLAIMER: &str = "This symptom checker is for informational purposes only and does not \
constitute medical advice. Always consult with a qualified healthcare professional for proper diagnosis and treatment.";

pub const URGENT_CARE_NOTICE: &str = "Urgent medical attention recommended";

pub const NO_MATCHES_MESSAGE: &str = "We couldn't find any conditions matching your symptoms. \
Please consult with a healthcare professional for proper evaluation.";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Mild,
    Moderate,
    Severe,
}

impl Severity {
    pub fn requires_urgent_care(self) -> bool {
        matches!(self, Severity::Severe)
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Mild => write!(f, "mild"),
            Severity::Moderate => write!(f, "moderate"),
            Severity::Severe => write!(f, "severe"),
        }
    }
}

/// One known condition in the catalog. Symptom keywords are lowercase.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ConditionRecord {
    pub symptoms: Vec<String>,
    pub disease: String,
    pub severity: Severity,
    pub recommendations: Vec<String>,
}

impl ConditionRecord {
    pub fn new(symptoms: &[&str], disease: &str, severity: Severity, recommendations: &[&str]) -> Self {
        Self {
            symptoms: symptoms.iter().map(|s| s.to_string()).collect(),
            disease: disease.to_string(),
            severity,
            recommendations: recommendations.iter().map(|r| r.to_string()).collect(),
        }
    }
}

/// A catalog condition scored against one query.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct MatchResult {
    #[serde(flatten)]
    pub condition: ConditionRecord,
    pub match_count: usize,
    /// Percentage of the condition's symptoms found in the query, 0..=100.
    pub confidence: u8,
}

impl MatchResult {
    pub fn requires_urgent_care(&self) -> bool {
        self.condition.severity.requires_urgent_care()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SymptomCheckRequest {
    /// Comma-separated symptom phrases, e.g. "fever, headache, cough".
    pub symptoms: String,
}

#[derive(Debug, Serialize)]
pub struct SymptomMatchView {
    #[serde(flatten)]
    pub result: MatchResult,
    pub urgent_care_recommended: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub urgent_care_notice: Option<&'static str>,
}

impl From<MatchResult> for SymptomMatchView {
    fn from(result: MatchResult) -> Self {
        let urgent = result.requires_urgent_care();
        Self {
            result,
            urgent_care_recommended: urgent,
            urgent_care_notice: urgent.then_some(URGENT_CARE_NOTICE),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SymptomCheckResponse {
    pub results: Vec<SymptomMatchView>,
    pub total: usize,
    pub has_urgent_results: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
    pub disclaimer: &'static str,
}

impl SymptomCheckResponse {
    pub fn from_matches(matches: Vec<MatchResult>) -> Self {
        let results: Vec<SymptomMatchView> = matches.into_iter().map(SymptomMatchView::from).collect();
        let has_urgent_results = results.iter().any(|view| view.urgent_care_recommended);

        Self {
            total: results.len(),
            message: results.is_empty().then_some(NO_MATCHES_MESSAGE),
            results,
            has_urgent_results,
            disclaimer: MEDICAL_DISCLAIMER,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SymptomCheckerError {
    #[error("Please describe at least one symptom")]
    EmptyInput,
}

impl From<SymptomCheckerError> for AppError {
    fn from(err: SymptomCheckerError) -> Self {
        match err {
            SymptomCheckerError::EmptyInput => AppError::BadRequest(err.to_string()),
        }
    }
}
