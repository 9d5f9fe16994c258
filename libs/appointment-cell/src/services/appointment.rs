use chrono::{NaiveDate, Utc};
use reqwest::Method;
use serde_json::{json, Value};
use tracing::{debug, info};
use uuid::Uuid;

use patient_cell::services::PatientService;
use shared_config::AppConfig;
use shared_database::supabase::{SupabaseClient, representation_headers};
use shared_models::auth::User;

use crate::models::{
    Appointment, AppointmentError, CreateAppointmentRequest, UpdateAppointmentRequest,
    canonical_slot,
};

pub const APPOINTMENT_SELECT: &str =
    "select=*,doctors(name,specialization,hospitals(name,location)),patients(name,contact_info)";

pub struct AppointmentService {
    supabase: SupabaseClient,
    patients: PatientService,
}

impl AppointmentService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
            patients: PatientService::new(config),
        }
    }

    /// Appointments visible to the caller, earliest date first. Row level
    /// security on the table decides which rows that is.
    pub async fn list_appointments(&self, auth_token: &str) -> Result<Vec<Appointment>, AppointmentError> {
        debug!("Listing appointments");

        let path = format!("/rest/v1/appointments?{}&order=date.asc", APPOINTMENT_SELECT);
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

    pub async fn create_appointment(
        &self,
        user: &User,
        request: CreateAppointmentRequest,
        auth_token: &str,
    ) -> Result<Appointment, AppointmentError> {
        self.create_appointment_on(user, request, auth_token, today()).await
    }

    /// Book for the caller's patient record, creating that record on first use.
    pub async fn create_appointment_on(
        &self,
        user: &User,
        request: CreateAppointmentRequest,
        auth_token: &str,
        today: NaiveDate,
    ) -> Result<Appointment, AppointmentError> {
        request.validate(today)?;

        let patient = self.patients.get_or_create(user, auth_token).await?;
        debug!("Booking doctor {} for patient {}", request.doctor_id, patient.id);

        let appointment_data = json!({
            "patient_id": patient.id,
            "doctor_id": request.doctor_id,
            "date": request.date,
            "time": canonical_slot(&request.time),
            "status": request.status,
        });

        let result: Vec<Value> = self.supabase.request_with_headers(
            Method::POST,
            "/rest/v1/appointments",
            Some(auth_token),
            Some(appointment_data),
            Some(representation_headers()),
        ).await?;

        let appointment = first_row(result)?;
        info!("Appointment {} booked for {} at {}", appointment.id, appointment.date, appointment.time);
        Ok(appointment)
    }

    pub async fn update_appointment(
        &self,
        appointment_id: Uuid,
        request: UpdateAppointmentRequest,
        auth_token: &str,
    ) -> Result<Appointment, AppointmentError> {
        self.update_appointment_on(appointment_id, request, auth_token, today()).await
    }

    pub async fn update_appointment_on(
        &self,
        appointment_id: Uuid,
        request: UpdateAppointmentRequest,
        auth_token: &str,
        today: NaiveDate,
    ) -> Result<Appointment, AppointmentError> {
        request.validate(today)?;
        debug!("Updating appointment: {}", appointment_id);

        let mut update_data = serde_json::Map::new();
        if let Some(doctor_id) = request.doctor_id {
            update_data.insert("doctor_id".to_string(), json!(doctor_id));
        }
        if let Some(date) = request.date {
            update_data.insert("date".to_string(), json!(date));
        }
        if let Some(time) = request.time {
            update_data.insert("time".to_string(), json!(canonical_slot(&time)));
        }
        if let Some(status) = request.status {
            update_data.insert("status".to_string(), json!(status));
        }

        let path = format!("/rest/v1/appointments?id=eq.{}", appointment_id);
        let result: Vec<Value> = self.supabase.request_with_headers(
            Method::PATCH,
            &path,
            Some(auth_token),
            Some(Value::Object(update_data)),
            Some(representation_headers()),
        ).await?;

        first_row(result)
    }

    pub async fn delete_appointment(&self, appointment_id: Uuid, auth_token: &str) -> Result<(), AppointmentError> {
        debug!("Deleting appointment: {}", appointment_id);

        let path = format!("/rest/v1/appointments?id=eq.{}", appointment_id);
        let result: Vec<Value> = self.supabase.request_with_headers(
            Method::DELETE,
            &path,
            Some(auth_token),
            None,
            Some(representation_headers()),
        ).await?;

        if result.is_empty() {
            return Err(AppointmentError::NotFound);
        }

        info!("Appointment {} deleted", appointment_id);
        Ok(())
    }
}

fn today() -> NaiveDate {
    Utc::now().date_naive()
}

fn first_row(rows: Vec<Value>) -> Result<Appointment, AppointmentError> {
    let row = rows.into_iter().next().ok_or(AppointmentError::NotFound)?;
    Ok(serde_json::from_value(row)?)
}
