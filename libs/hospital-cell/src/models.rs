use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};

use shared_database::SupabaseError;
use shared_models::error::AppError;

pub const COMMON_DEPARTMENTS: [&str; 10] = [
    "Emergency", "Cardiology", "Neurology", "Pediatrics", "Orthopedics",
    "Dermatology", "Gynecology", "Radiology", "Surgery", "Internal Medicine",
];

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Hospital {
    pub id: Uuid,
    pub name: String,
    pub location: String,
    #[serde(default)]
    pub departments: Vec<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateHospitalRequest {
    pub name: String,
    pub location: String,
    #[serde(default)]
    pub departments: Vec<String>,
}

impl CreateHospitalRequest {
    pub fn validate(&self) -> Result<(), HospitalError> {
        require_text("name", &self.name)?;
        require_text("location", &self.location)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateHospitalRequest {
    pub name: Option<String>,
    pub location: Option<String>,
    pub departments: Option<Vec<String>>,
}

impl UpdateHospitalRequest {
    pub fn validate(&self) -> Result<(), HospitalError> {
        if let Some(name) = &self.name {
            require_text("name", name)?;
        }
        if let Some(location) = &self.location {
            require_text("location", location)?;
        }
        if self.name.is_none() && self.location.is_none() && self.departments.is_none() {
            return Err(HospitalError::ValidationError("No fields to update".to_string()));
        }
        Ok(())
    }
}

fn require_text(field: &str, value: &str) -> Result<(), HospitalError> {
    if value.trim().is_empty() {
        return Err(HospitalError::ValidationError(format!("Hospital {} is required", field)));
    }
    Ok(())
}

/// Trim department names, drop blanks and keep only the first of any duplicates.
pub fn normalize_departments(departments: Vec<String>) -> Vec<String> {
    let mut normalized: Vec<String> = Vec::with_capacity(departments.len());
    for department in departments {
        let department = department.trim();
        if !department.is_empty() && !normalized.iter().any(|d| d == department) {
            normalized.push(department.to_string());
        }
    }
    normalized
}

#[derive(Debug, thiserror::Error)]
pub enum HospitalError {
    #[error("Hospital not found")]
    NotFound,

    #[error("Hospital still has doctors")]
    InUse,

    #[error("{0}")]
    ValidationError(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl From<anyhow::Error> for HospitalError {
    fn from(err: anyhow::Error) -> Self {
        match SupabaseError::find(&err) {
            Some(SupabaseError::Auth(msg)) => HospitalError::Unauthorized(msg.clone()),
            Some(SupabaseError::NotFound(_)) => HospitalError::NotFound,
            _ => HospitalError::DatabaseError(err.to_string()),
        }
    }
}

impl HospitalError {
    /// Delete failures: a foreign key violation means doctors still reference the hospital.
    pub fn from_delete(err: anyhow::Error) -> Self {
        match SupabaseError::find(&err) {
            Some(e) if e.is_foreign_key_violation() => HospitalError::InUse,
            _ => HospitalError::from(err),
        }
    }
}

impl From<serde_json::Error> for HospitalError {
    fn from(err: serde_json::Error) -> Self {
        HospitalError::DatabaseError(format!("Unexpected hospital row: {}", err))
    }
}

impl From<HospitalError> for AppError {
    fn from(err: HospitalError) -> Self {
        match err {
            HospitalError::NotFound => AppError::NotFound(err.to_string()),
            HospitalError::InUse => AppError::Conflict(err.to_string()),
            HospitalError::ValidationError(msg) => AppError::ValidationError(msg),
            HospitalError::Unauthorized(msg) => AppError::Auth(msg),
            HospitalError::DatabaseError(msg) => AppError::Database(msg),
        }
    }
}
