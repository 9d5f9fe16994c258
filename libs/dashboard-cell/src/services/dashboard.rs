use chrono::{DateTime, NaiveDate, Utc};
use reqwest::Method;
use serde_json::Value;
use tracing::debug;

use appointment_cell::models::Appointment;
use shared_config::AppConfig;
use shared_database::SupabaseClient;

use crate::models::{
    ActivityItem, DashboardCounts, DashboardError, DashboardSummary, RECENT_APPOINTMENTS_LIMIT,
};

const RECENT_SELECT: &str = "select=*,doctors(name,specialization,hospitals(name))";

pub struct DashboardService {
    supabase: SupabaseClient,
}

impl DashboardService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
        }
    }

    pub async fn summary(&self, auth_token: &str) -> Result<DashboardSummary, DashboardError> {
        self.summary_at(auth_token, Utc::now()).await
    }

    /// Counts, newest appointments and the activity feed as seen at `now`.
    pub async fn summary_at(
        &self,
        auth_token: &str,
        now: DateTime<Utc>,
    ) -> Result<DashboardSummary, DashboardError> {
        let (stats, recent_appointments) = tokio::try_join!(
            self.counts(auth_token, now.date_naive()),
            self.recent_appointments(auth_token),
        )?;

        let recent_activity = recent_appointments
            .iter()
            .map(|appointment| ActivityItem::from_appointment(appointment, now))
            .collect();

        Ok(DashboardSummary {
            stats,
            recent_appointments,
            recent_activity,
        })
    }

    pub async fn counts(&self, auth_token: &str, today: NaiveDate) -> Result<DashboardCounts, DashboardError> {
        debug!("Counting dashboard totals for {}", today);

        let upcoming_path = format!(
            "/rest/v1/appointments?select=*&date=gte.{}&status=eq.scheduled",
            today
        );
        let token = Some(auth_token);

        let (total_appointments, upcoming_appointments, total_hospitals, total_doctors) = tokio::try_join!(
            self.supabase.count("/rest/v1/appointments?select=*", token),
            self.supabase.count(&upcoming_path, token),
            self.supabase.count("/rest/v1/hospitals?select=*", token),
            self.supabase.count("/rest/v1/doctors?select=*", token),
        )?;

        Ok(DashboardCounts {
            total_appointments,
            upcoming_appointments,
            total_hospitals,
            total_doctors,
        })
    }

    pub async fn recent_appointments(&self, auth_token: &str) -> Result<Vec<Appointment>, DashboardError> {
        let path = format!(
            "/rest/v1/appointments?{}&order=created_at.desc&limit={}",
            RECENT_SELECT, RECENT_APPOINTMENTS_LIMIT
        );

        let result: Vec<Value> = self.supabase.request(
            Method::GET,
            &path,
            Some(auth_token),
            None,
        ).await?;

        let appointments = result
            .into_iter()
            .map(serde_json::from_value)
            .collect::<Result<Vec<Appointment>, _>>()?;

        Ok(appointments)
    }
}
