use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};

use shared_database::SupabaseError;
use shared_models::error::AppError;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Patient {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub contact_info: String,
    pub medical_history: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Profile form submitted by the signed-in user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatientProfileRequest {
    pub name: String,
    pub contact_info: String,
    #[serde(default)]
    pub medical_history: String,
}

impl PatientProfileRequest {
    pub fn validate(&self) -> Result<(), PatientError> {
        if self.name.trim().is_empty() {
            return Err(PatientError::ValidationError("Name is required".to_string()));
        }
        if self.contact_info.trim().is_empty() {
            return Err(PatientError::ValidationError("Contact information is required".to_string()));
        }
        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PatientError {
    #[error("Patient not found")]
    NotFound,

    #[error("Invalid user id: {0}")]
    InvalidUserId(String),

    #[error("{0}")]
    ValidationError(String),

    #[error("Unauthorized access to patient data: {0}")]
    Unauthorized(String),

    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl From<anyhow::Error> for PatientError {
    fn from(err: anyhow::Error) -> Self {
        match SupabaseError::find(&err) {
            Some(SupabaseError::Auth(msg)) => PatientError::Unauthorized(msg.clone()),
            Some(SupabaseError::NotFound(_)) => PatientError::NotFound,
            _ => PatientError::DatabaseError(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for PatientError {
    fn from(err: serde_json::Error) -> Self {
        PatientError::DatabaseError(format!("Unexpected patient row: {}", err))
    }
}

impl From<PatientError> for AppError {
    fn from(err: PatientError) -> Self {
        match err {
            PatientError::NotFound => AppError::NotFound(err.to_string()),
            PatientError::InvalidUserId(_) => AppError::Auth(err.to_string()),
            PatientError::ValidationError(msg) => AppError::ValidationError(msg),
            PatientError::Unauthorized(msg) => AppError::Auth(msg),
            PatientError::DatabaseError(msg) => AppError::Database(msg),
        }
    }
}
