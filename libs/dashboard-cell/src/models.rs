use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use appointment_cell::models::{canonical_slot, Appointment, AppointmentStatus};
use shared_database::SupabaseError;
use shared_models::error::AppError;

/// Seconds each health tip stays current before the next one rotates in.
pub const TIP_ROTATION_SECS: u64 = 10;

/// Number of newest appointments shown on the dashboard.
pub const RECENT_APPOINTMENTS_LIMIT: usize = 5;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct HealthTip {
    pub title: &'static str,
    pub content: &'static str,
    pub category: &'static str,
}

pub const HEALTH_TIPS: [HealthTip; 6] = [
    HealthTip {
        title: "Stay Hydrated",
        content: "Drink at least 8 glasses of water daily to maintain proper body function, support digestion, and keep your skin healthy.",
        category: "Nutrition",
    },
    HealthTip {
        title: "Regular Exercise",
        content: "Aim for at least 30 minutes of moderate exercise daily. This can include walking, swimming, or cycling to improve cardiovascular health.",
        category: "Fitness",
    },
    HealthTip {
        title: "Quality Sleep",
        content: "Get 7-9 hours of quality sleep each night. Good sleep is essential for immune function, mental health, and overall well-being.",
        category: "Sleep",
    },
    HealthTip {
        title: "Balanced Diet",
        content: "Include a variety of fruits, vegetables, whole grains, and lean proteins in your diet for optimal nutrition and energy.",
        category: "Nutrition",
    },
    HealthTip {
        title: "Mental Health",
        content: "Practice stress management techniques like meditation, deep breathing, or yoga to maintain good mental health.",
        category: "Mental Health",
    },
    HealthTip {
        title: "Regular Checkups",
        content: "Schedule regular health checkups and screenings to catch potential health issues early and maintain preventive care.",
        category: "Prevention",
    },
];

/// Index of the tip current at `unix_secs`.
pub fn current_tip_index(unix_secs: u64) -> usize {
    ((unix_secs / TIP_ROTATION_SECS) % HEALTH_TIPS.len() as u64) as usize
}

/// Index of the tip current at `now`. Instants before the epoch show the first tip.
pub fn tip_index_at(now: DateTime<Utc>) -> usize {
    current_tip_index(u64::try_from(now.timestamp()).unwrap_or_default())
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct DashboardCounts {
    pub total_appointments: u64,
    pub upcoming_appointments: u64,
    pub total_hospitals: u64,
    pub total_doctors: u64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ActivityType {
    AppointmentCreated,
    AppointmentUpdated,
    AppointmentCancelled,
}

impl From<AppointmentStatus> for ActivityType {
    fn from(status: AppointmentStatus) -> Self {
        match status {
            AppointmentStatus::Cancelled => ActivityType::AppointmentCancelled,
            AppointmentStatus::Scheduled => ActivityType::AppointmentCreated,
            AppointmentStatus::Confirmed | AppointmentStatus::Completed => ActivityType::AppointmentUpdated,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ActivityItem {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub activity_type: ActivityType,
    pub description: String,
    pub timestamp: DateTime<Utc>,
    pub relative_time: String,
}

impl ActivityItem {
    pub fn from_appointment(appointment: &Appointment, now: DateTime<Utc>) -> Self {
        let activity_type = ActivityType::from(appointment.status);
        let doctor = appointment
            .doctors
            .as_ref()
            .map(|d| d.name.as_str())
            .unwrap_or("your doctor");

        let time = canonical_slot(&appointment.time).unwrap_or(appointment.time.as_str());

        let description = match activity_type {
            ActivityType::AppointmentCreated => format!(
                "Appointment booked with {} on {} at {}",
                doctor, appointment.date, time
            ),
            ActivityType::AppointmentUpdated => format!(
                "Appointment with {} is {}", doctor, appointment.status
            ),
            ActivityType::AppointmentCancelled => format!(
                "Appointment with {} on {} was cancelled", doctor, appointment.date
            ),
        };

        Self {
            id: appointment.id,
            activity_type,
            description,
            timestamp: appointment.created_at,
            relative_time: format_relative_time(appointment.created_at, now),
        }
    }
}

/// "Just now" under an hour, whole hours under a day, whole days after that.
pub fn format_relative_time(timestamp: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let hours = (now - timestamp).num_hours();

    if hours < 1 {
        "Just now".to_string()
    } else if hours < 24 {
        format!("{} hour{} ago", hours, if hours > 1 { "s" } else { "" })
    } else {
        let days = hours / 24;
        format!("{} day{} ago", days, if days > 1 { "s" } else { "" })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardSummary {
    pub stats: DashboardCounts,
    pub recent_appointments: Vec<Appointment>,
    pub recent_activity: Vec<ActivityItem>,
}

#[derive(Debug, thiserror::Error)]
pub enum DashboardError {
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl From<anyhow::Error> for DashboardError {
    fn from(err: anyhow::Error) -> Self {
        match SupabaseError::find(&err) {
            Some(SupabaseError::Auth(msg)) => DashboardError::Unauthorized(msg.clone()),
            _ => DashboardError::DatabaseError(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for DashboardError {
    fn from(err: serde_json::Error) -> Self {
        DashboardError::DatabaseError(format!("Unexpected appointment row: {}", err))
    }
}

impl From<DashboardError> for AppError {
    fn from(err: DashboardError) -> Self {
        match err {
            DashboardError::Unauthorized(msg) => AppError::Auth(msg),
            DashboardError::DatabaseError(msg) => AppError::Database(msg),
        }
    }
}
