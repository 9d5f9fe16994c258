use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use patient_cell::models::PatientError;
use shared_database::SupabaseError;
use shared_models::error::AppError;

/// Bookable times of day, morning and afternoon sessions in 30 minute steps.
pub const TIME_SLOTS: [&str; 12] = [
    "09:00", "09:30", "10:00", "10:30", "11:00", "11:30",
    "14:00", "14:30", "15:00", "15:30", "16:00", "16:30",
];

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AppointmentStatus {
    #[default]
    Scheduled,
    Confirmed,
    Completed,
    Cancelled,
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppointmentStatus::Scheduled => write!(f, "scheduled"),
            AppointmentStatus::Confirmed => write!(f, "confirmed"),
            AppointmentStatus::Completed => write!(f, "completed"),
            AppointmentStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Appointment {
    pub id: Uuid,
    pub patient_id: Uuid,
    pub doctor_id: Uuid,
    pub date: NaiveDate,
    pub time: String,
    #[serde(default)]
    pub status: AppointmentStatus,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doctors: Option<AppointmentDoctor>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patients: Option<AppointmentPatient>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AppointmentDoctor {
    pub name: String,
    pub specialization: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hospitals: Option<AppointmentHospital>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AppointmentHospital {
    pub name: String,
    pub location: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AppointmentPatient {
    pub name: String,
    pub contact_info: Option<String>,
}

/// Per-status tallies shown above the appointment list.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct AppointmentStats {
    pub total: usize,
    pub scheduled: usize,
    pub confirmed: usize,
    pub completed: usize,
    pub cancelled: usize,
}

impl AppointmentStats {
    pub fn from_appointments(appointments: &[Appointment]) -> Self {
        let mut stats = AppointmentStats {
            total: appointments.len(),
            ..Default::default()
        };

        for appointment in appointments {
            match appointment.status {
                AppointmentStatus::Scheduled => stats.scheduled += 1,
                AppointmentStatus::Confirmed => stats.confirmed += 1,
                AppointmentStatus::Completed => stats.completed += 1,
                AppointmentStatus::Cancelled => stats.cancelled += 1,
            }
        }

        stats
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAppointmentRequest {
    pub doctor_id: Uuid,
    pub date: NaiveDate,
    pub time: String,
    #[serde(default)]
    pub status: AppointmentStatus,
}

impl CreateAppointmentRequest {
    pub fn validate(&self, today: NaiveDate) -> Result<(), AppointmentError> {
        validate_date(self.date, today)?;
        validate_time(&self.time)?;
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateAppointmentRequest {
    pub doctor_id: Option<Uuid>,
    pub date: Option<NaiveDate>,
    pub time: Option<String>,
    pub status: Option<AppointmentStatus>,
}

impl UpdateAppointmentRequest {
    pub fn validate(&self, today: NaiveDate) -> Result<(), AppointmentError> {
        if let Some(date) = self.date {
            validate_date(date, today)?;
        }
        if let Some(time) = &self.time {
            validate_time(time)?;
        }
        if self.doctor_id.is_none()
            && self.date.is_none()
            && self.time.is_none()
            && self.status.is_none()
        {
            return Err(AppointmentError::ValidationError("No fields to update".to_string()));
        }
        Ok(())
    }
}

/// Canonical `HH:MM` slot for `time`. Postgres `time` columns come back as
/// `HH:MM:SS`, so a zero seconds suffix is accepted.
pub fn canonical_slot(time: &str) -> Option<&'static str> {
    let time = time.trim();
    let time = time.strip_suffix(":00").filter(|t| t.len() == 5).unwrap_or(time);
    TIME_SLOTS.iter().copied().find(|slot| *slot == time)
}

fn validate_time(time: &str) -> Result<(), AppointmentError> {
    match canonical_slot(time) {
        Some(_) => Ok(()),
        None => Err(AppointmentError::InvalidTime(time.to_string())),
    }
}

fn validate_date(date: NaiveDate, today: NaiveDate) -> Result<(), AppointmentError> {
    if date < today {
        return Err(AppointmentError::DateInPast(date));
    }
    Ok(())
}

#[derive(Debug, thiserror::Error)]
pub enum AppointmentError {
    #[error("Appointment not found")]
    NotFound,

    #[error("Invalid appointment time '{0}', choose one of the available time slots")]
    InvalidTime(String),

    #[error("Appointment date {0} is in the past")]
    DateInPast(NaiveDate),

    #[error("{0}")]
    ValidationError(String),

    #[error("Patient information not found")]
    PatientNotFound,

    #[error("Unauthorized access to appointment: {0}")]
    Unauthorized(String),

    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl From<anyhow::Error> for AppointmentError {
    fn from(err: anyhow::Error) -> Self {
        match SupabaseError::find(&err) {
            Some(SupabaseError::Auth(msg)) => AppointmentError::Unauthorized(msg.clone()),
            Some(SupabaseError::NotFound(_)) => AppointmentError::NotFound,
            // 23503: foreign key violation, the doctor or patient row is gone
            Some(e) if e.is_foreign_key_violation() => {
                AppointmentError::ValidationError("Doctor does not exist".to_string())
            }
            _ => AppointmentError::DatabaseError(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for AppointmentError {
    fn from(err: serde_json::Error) -> Self {
        AppointmentError::DatabaseError(format!("Unexpected appointment row: {}", err))
    }
}

impl From<PatientError> for AppointmentError {
    fn from(err: PatientError) -> Self {
        match err {
            PatientError::NotFound | PatientError::InvalidUserId(_) => AppointmentError::PatientNotFound,
            PatientError::Unauthorized(msg) => AppointmentError::Unauthorized(msg),
            PatientError::ValidationError(msg) => AppointmentError::ValidationError(msg),
            PatientError::DatabaseError(msg) => AppointmentError::DatabaseError(msg),
        }
    }
}

impl From<AppointmentError> for AppError {
    fn from(err: AppointmentError) -> Self {
        match err {
            AppointmentError::NotFound => AppError::NotFound(err.to_string()),
            AppointmentError::PatientNotFound => AppError::NotFound(err.to_string()),
            AppointmentError::InvalidTime(_) | AppointmentError::DateInPast(_) => {
                AppError::ValidationError(err.to_string())
            }
            AppointmentError::ValidationError(msg) => AppError::ValidationError(msg),
            AppointmentError::Unauthorized(msg) => AppError::Auth(msg),
            AppointmentError::DatabaseError(msg) => AppError::Database(msg),
        }
    }
}
