// libs/doctor-cell/src/models.rs
use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use shared_database::SupabaseError;
use shared_models::error::AppError;

pub const SPECIALIZATIONS: [&str; 15] = [
    "Cardiology", "Neurology", "Pediatrics", "Orthopedics", "Dermatology",
    "Gynecology", "Radiology", "Surgery", "Internal Medicine", "Emergency Medicine",
    "Psychiatry", "Oncology", "Ophthalmology", "ENT", "Anesthesiology",
];

pub const AVAILABILITY_SLOTS: [&str; 6] = [
    "Monday 9:00-17:00", "Tuesday 9:00-17:00", "Wednesday 9:00-17:00",
    "Thursday 9:00-17:00", "Friday 9:00-17:00", "Saturday 9:00-13:00",
];

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Doctor {
    pub id: Uuid,
    pub hospital_id: Uuid,
    pub name: String,
    pub specialization: String,
    #[serde(default)]
    pub availability: Vec<String>,
    pub created_at: DateTime<Utc>,
    /// Present when the row was fetched with the `hospitals` embed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hospitals: Option<DoctorHospital>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DoctorHospital {
    pub name: String,
    pub location: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateDoctorRequest {
    pub hospital_id: Uuid,
    pub name: String,
    pub specialization: String,
    #[serde(default)]
    pub availability: Vec<String>,
}

impl CreateDoctorRequest {
    pub fn validate(&self) -> Result<(), DoctorError> {
        require_text("name", &self.name)?;
        require_text("specialization", &self.specialization)?;
        validate_availability(&self.availability)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateDoctorRequest {
    pub hospital_id: Option<Uuid>,
    pub name: Option<String>,
    pub specialization: Option<String>,
    pub availability: Option<Vec<String>>,
}

impl UpdateDoctorRequest {
    pub fn validate(&self) -> Result<(), DoctorError> {
        if let Some(name) = &self.name {
            require_text("name", name)?;
        }
        if let Some(specialization) = &self.specialization {
            require_text("specialization", specialization)?;
        }
        if let Some(availability) = &self.availability {
            validate_availability(availability)?;
        }
        if self.hospital_id.is_none()
            && self.name.is_none()
            && self.specialization.is_none()
            && self.availability.is_none()
        {
            return Err(DoctorError::ValidationError("No fields to update".to_string()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DoctorListQuery {
    pub hospital_id: Option<Uuid>,
}

fn require_text(field: &str, value: &str) -> Result<(), DoctorError> {
    if value.trim().is_empty() {
        return Err(DoctorError::ValidationError(format!("Doctor {} is required", field)));
    }
    Ok(())
}

fn slot_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| {
            Regex::new(
                r"^(Monday|Tuesday|Wednesday|Thursday|Friday|Saturday|Sunday) ([01]?\d|2[0-3]):([0-5]\d)-([01]?\d|2[0-3]):([0-5]\d)$",
            )
            .ok()
        })
        .as_ref()
}

/// Check one weekly slot such as `Monday 9:00-17:00`. The end must follow the start.
pub fn is_valid_slot(slot: &str) -> bool {
    let Some(caps) = slot_pattern().and_then(|pattern| pattern.captures(slot)) else {
        return false;
    };

    let minutes = |hour: usize, minute: usize| -> Option<u32> {
        let h: u32 = caps.get(hour)?.as_str().parse().ok()?;
        let m: u32 = caps.get(minute)?.as_str().parse().ok()?;
        Some(h * 60 + m)
    };

    matches!((minutes(2, 3), minutes(4, 5)), (Some(start), Some(end)) if start < end)
}

fn validate_availability(availability: &[String]) -> Result<(), DoctorError> {
    match availability.iter().find(|slot| !is_valid_slot(slot.trim())) {
        Some(slot) => Err(DoctorError::ValidationError(format!(
            "Invalid availability slot '{}', expected e.g. 'Monday 9:00-17:00'", slot
        ))),
        None => Ok(()),
    }
}

/// Trimmed slots with duplicates removed, first occurrence wins.
pub fn normalize_availability(availability: Vec<String>) -> Vec<String> {
    let mut normalized: Vec<String> = Vec::with_capacity(availability.len());
    for slot in availability {
        let slot = slot.trim().to_string();
        if !normalized.contains(&slot) {
            normalized.push(slot);
        }
    }
    normalized
}

#[derive(Debug, thiserror::Error)]
pub enum DoctorError {
    #[error("Doctor not found")]
    NotFound,

    #[error("Doctor still has appointments")]
    InUse,

    #[error("{0}")]
    ValidationError(String),

    #[error("Unauthorized: {0}")]
    UnauthorizedAccess(String),

    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl From<anyhow::Error> for DoctorError {
    fn from(err: anyhow::Error) -> Self {
        match SupabaseError::find(&err) {
            Some(SupabaseError::Auth(msg)) => DoctorError::UnauthorizedAccess(msg.clone()),
            Some(SupabaseError::NotFound(_)) => DoctorError::NotFound,
            // on insert or update the referenced hospital is missing
            Some(e) if e.is_foreign_key_violation() => {
                DoctorError::ValidationError("Hospital does not exist".to_string())
            }
            _ => DoctorError::DatabaseError(err.to_string()),
        }
    }
}

impl DoctorError {
    /// Delete failures: a foreign key violation means appointments still reference the doctor.
    pub fn from_delete(err: anyhow::Error) -> Self {
        match SupabaseError::find(&err) {
            Some(e) if e.is_foreign_key_violation() => DoctorError::InUse,
            _ => DoctorError::from(err),
        }
    }
}

impl From<serde_json::Error> for DoctorError {
    fn from(err: serde_json::Error) -> Self {
        DoctorError::DatabaseError(format!("Unexpected doctor row: {}", err))
    }
}

impl From<DoctorError> for AppError {
    fn from(err: DoctorError) -> Self {
        match err {
            DoctorError::NotFound => AppError::NotFound(err.to_string()),
            DoctorError::InUse => AppError::Conflict(err.to_string()),
            DoctorError::ValidationError(msg) => AppError::ValidationError(msg),
            DoctorError::UnauthorizedAccess(msg) => AppError::Auth(msg),
            DoctorError::DatabaseError(msg) => AppError::Database(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_known_slots_are_valid() {
        for slot in AVAILABILITY_SLOTS {
            assert!(is_valid_slot(slot), "{}", slot);
        }
        assert!(is_valid_slot("Sunday 08:30-12:15"));
    }

    #[test]
    fn test_invalid_slots() {
        assert!(!is_valid_slot("Funday 9:00-17:00"));
        assert!(!is_valid_slot("Monday 9-17"));
        assert!(!is_valid_slot("Monday 17:00-9:00"));
        assert!(!is_valid_slot("Monday 9:00-9:00"));
        assert!(!is_valid_slot("Monday 24:00-25:00"));
        assert!(!is_valid_slot("monday 9:00-17:00"));
    }

    #[test]
    fn test_normalize_availability() {
        let slots = vec![
            "Monday 9:00-17:00".to_string(),
            " Monday 9:00-17:00 ".to_string(),
            "Friday 9:00-17:00".to_string(),
        ];
        assert_eq!(normalize_availability(slots), vec!["Monday 9:00-17:00", "Friday 9:00-17:00"]);
    }

    #[test]
    fn test_create_request_validation() {
        let mut request = CreateDoctorRequest {
            hospital_id: Uuid::new_v4(),
            name: "Dr. Aoife Byrne".to_string(),
            specialization: "Cardiology".to_string(),
            availability: vec!["Tuesday 9:00-17:00".to_string()],
        };
        assert!(request.validate().is_ok());

        request.availability.push("whenever".to_string());
        assert_matches!(request.validate(), Err(DoctorError::ValidationError(msg)) if msg.contains("whenever"));

        request.availability.clear();
        request.specialization = " ".to_string();
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_update_request_needs_a_field() {
        assert!(UpdateDoctorRequest::default().validate().is_err());
    }
}
