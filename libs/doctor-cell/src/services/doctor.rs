use reqwest::Method;
use serde_json::{json, Value};
use tracing::{debug, info};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_database::supabase::{SupabaseClient, representation_headers};

use crate::models::{
    Doctor, CreateDoctorRequest, UpdateDoctorRequest, DoctorListQuery, DoctorError,
    normalize_availability,
};

const DOCTOR_SELECT: &str = "select=*,hospitals(name,location)";

pub struct DoctorService {
    supabase: SupabaseClient,
}

impl DoctorService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
        }
    }

    /// Doctors ordered by name, optionally restricted to one hospital.
    pub async fn list_doctors(
        &self,
        query: DoctorListQuery,
        auth_token: &str,
    ) -> Result<Vec<Doctor>, DoctorError> {
        debug!("Listing doctors with query: {:?}", query);

        let mut path = format!("/rest/v1/doctors?{}&order=name.asc", DOCTOR_SELECT);
        if let Some(hospital_id) = query.hospital_id {
            path.push_str(&format!("&hospital_id=eq.{}", hospital_id));
        }

        let result: Vec<Value> = self.supabase.request(
            Method::GET,
            &path,
            Some(auth_token),
            None,
        ).await?;

        let doctors = result
            .into_iter()
            .map(serde_json::from_value)
            .collect::<Result<Vec<Doctor>, _>>()?;

        Ok(doctors)
    }

    pub async fn get_doctor(&self, doctor_id: Uuid, auth_token: &str) -> Result<Doctor, DoctorError> {
        debug!("Fetching doctor: {}", doctor_id);

        let path = format!("/rest/v1/doctors?{}&id=eq.{}", DOCTOR_SELECT, doctor_id);
        let result: Vec<Value> = self.supabase.request(
            Method::GET,
            &path,
            Some(auth_token),
            None,
        ).await?;

        first_row(result)
    }

    pub async fn create_doctor(
        &self,
        request: CreateDoctorRequest,
        auth_token: &str,
    ) -> Result<Doctor, DoctorError> {
        request.validate()?;
        debug!("Creating doctor {} at hospital {}", request.name, request.hospital_id);

        let doctor_data = json!({
            "hospital_id": request.hospital_id,
            "name": request.name.trim(),
            "specialization": request.specialization.trim(),
            "availability": normalize_availability(request.availability),
        });

        let result: Vec<Value> = self.supabase.request_with_headers(
            Method::POST,
            "/rest/v1/doctors",
            Some(auth_token),
            Some(doctor_data),
            Some(representation_headers()),
        ).await?;

        let doctor = first_row(result)?;
        info!("Doctor created with ID: {}", doctor.id);
        Ok(doctor)
    }

    pub async fn update_doctor(
        &self,
        doctor_id: Uuid,
        request: UpdateDoctorRequest,
        auth_token: &str,
    ) -> Result<Doctor, DoctorError> {
        request.validate()?;
        debug!("Updating doctor: {}", doctor_id);

        let mut update_data = serde_json::Map::new();
        if let Some(hospital_id) = request.hospital_id {
            update_data.insert("hospital_id".to_string(), json!(hospital_id));
        }
        if let Some(name) = request.name {
            update_data.insert("name".to_string(), json!(name.trim()));
        }
        if let Some(specialization) = request.specialization {
            update_data.insert("specialization".to_string(), json!(specialization.trim()));
        }
        if let Some(availability) = request.availability {
            update_data.insert("availability".to_string(), json!(normalize_availability(availability)));
        }

        let path = format!("/rest/v1/doctors?id=eq.{}", doctor_id);
        let result: Vec<Value> = self.supabase.request_with_headers(
            Method::PATCH,
            &path,
            Some(auth_token),
            Some(Value::Object(update_data)),
            Some(representation_headers()),
        ).await?;

        first_row(result)
    }

    pub async fn delete_doctor(&self, doctor_id: Uuid, auth_token: &str) -> Result<(), DoctorError> {
        debug!("Deleting doctor: {}", doctor_id);

        let path = format!("/rest/v1/doctors?id=eq.{}", doctor_id);
        let result: Vec<Value> = self.supabase.request_with_headers(
            Method::DELETE,
            &path,
            Some(auth_token),
            None,
            Some(representation_headers()),
        ).await
        .map_err(DoctorError::from_delete)?;

        if result.is_empty() {
            return Err(DoctorError::NotFound);
        }

        info!("Doctor {} deleted", doctor_id);
        Ok(())
    }
}

fn first_row(rows: Vec<Value>) -> Result<Doctor, DoctorError> {
    let row = rows.into_iter().next().ok_or(DoctorError::NotFound)?;
    Ok(serde_json::from_value(row)?)
}
