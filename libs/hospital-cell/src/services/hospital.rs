use reqwest::Method;
use serde_json::{json, Value};
use tracing::{debug, info};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_database::supabase::{SupabaseClient, representation_headers};

use crate::models::{
    Hospital, CreateHospitalRequest, UpdateHospitalRequest, HospitalError, normalize_departments,
};

pub struct HospitalService {
    supabase: SupabaseClient,
}

impl HospitalService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
        }
    }

    pub async fn list_hospitals(&self, auth_token: &str) -> Result<Vec<Hospital>, HospitalError> {
        debug!("Listing hospitals");

        let result: Vec<Value> = self.supabase.request(
            Method::GET,
            "/rest/v1/hospitals?select=*&order=name.asc",
            Some(auth_token),
            None,
        ).await?;

        let hospitals = result
            .into_iter()
            .map(serde_json::from_value)
            .collect::<Result<Vec<Hospital>, _>>()?;

        Ok(hospitals)
    }

    pub async fn get_hospital(&self, hospital_id: Uuid, auth_token: &str) -> Result<Hospital, HospitalError> {
        debug!("Fetching hospital: {}", hospital_id);

        let path = format!("/rest/v1/hospitals?id=eq.{}", hospital_id);
        let result: Vec<Value> = self.supabase.request(
            Method::GET,
            &path,
            Some(auth_token),
            None,
        ).await?;

        first_row(result)
    }

    pub async fn create_hospital(
        &self,
        request: CreateHospitalRequest,
        auth_token: &str,
    ) -> Result<Hospital, HospitalError> {
        request.validate()?;
        debug!("Creating hospital: {}", request.name);

        let hospital_data = json!({
            "name": request.name.trim(),
            "location": request.location.trim(),
            "departments": normalize_departments(request.departments),
        });

        let result: Vec<Value> = self.supabase.request_with_headers(
            Method::POST,
            "/rest/v1/hospitals",
            Some(auth_token),
            Some(hospital_data),
            Some(representation_headers()),
        ).await?;

        let hospital = first_row(result)?;
        info!("Hospital created with ID: {}", hospital.id);
        Ok(hospital)
    }

    pub async fn update_hospital(
        &self,
        hospital_id: Uuid,
        request: UpdateHospitalRequest,
        auth_token: &str,
    ) -> Result<Hospital, HospitalError> {
        request.validate()?;
        debug!("Updating hospital: {}", hospital_id);

        let mut update_data = serde_json::Map::new();
        if let Some(name) = request.name {
            update_data.insert("name".to_string(), json!(name.trim()));
        }
        if let Some(location) = request.location {
            update_data.insert("location".to_string(), json!(location.trim()));
        }
        if let Some(departments) = request.departments {
            update_data.insert("departments".to_string(), json!(normalize_departments(departments)));
        }

        let path = format!("/rest/v1/hospitals?id=eq.{}", hospital_id);
        let result: Vec<Value> = self.supabase.request_with_headers(
            Method::PATCH,
            &path,
            Some(auth_token),
            Some(Value::Object(update_data)),
            Some(representation_headers()),
        ).await?;

        first_row(result)
    }

    pub async fn delete_hospital(&self, hospital_id: Uuid, auth_token: &str) -> Result<(), HospitalError> {
        debug!("Deleting hospital: {}", hospital_id);

        let path = format!("/rest/v1/hospitals?id=eq.{}", hospital_id);
        let result: Vec<Value> = self.supabase.request_with_headers(
            Method::DELETE,
            &path,
            Some(auth_token),
            None,
            Some(representation_headers()),
        ).await
        .map_err(HospitalError::from_delete)?;

        if result.is_empty() {
            return Err(HospitalError::NotFound);
        }

        info!("Hospital {} deleted", hospital_id);
        Ok(())
    }
}

fn first_row(rows: Vec<Value>) -> Result<Hospital, HospitalError> {
    let row = rows.into_iter().next().ok_or(HospitalError::NotFound)?;
    Ok(serde_json::from_value(row)?)
}
