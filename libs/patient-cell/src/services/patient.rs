use reqwest::Method;
use serde_json::{json, Value};
use tracing::{debug, info};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_database::supabase::{SupabaseClient, representation_headers};
use shared_models::auth::User;

use crate::models::{Patient, PatientProfileRequest, PatientError};

pub struct PatientService {
    supabase: SupabaseClient,
}

impl PatientService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
        }
    }

    /// The patient row owned by `user`, if one has been created yet.
    pub async fn get_profile(
        &self,
        user: &User,
        auth_token: &str,
    ) -> Result<Option<Patient>, PatientError> {
        let user_id = parse_user_id(user)?;
        debug!("Fetching patient profile for user: {}", user_id);

        let path = format!("/rest/v1/patients?user_id=eq.{}&limit=1", user_id);
        let result: Vec<Value> = self.supabase.request(
            Method::GET,
            &path,
            Some(auth_token),
            None,
        ).await?;

        match result.into_iter().next() {
            Some(row) => Ok(Some(serde_json::from_value(row)?)),
            None => Ok(None),
        }
    }

    /// Update the caller's patient row, creating it first if it does not exist.
    pub async fn save_profile(
        &self,
        user: &User,
        request: PatientProfileRequest,
        auth_token: &str,
    ) -> Result<Patient, PatientError> {
        request.validate()?;

        let profile_data = json!({
            "name": request.name.trim(),
            "contact_info": request.contact_info.trim(),
            "medical_history": request.medical_history,
        });

        match self.get_profile(user, auth_token).await? {
            Some(existing) => {
                debug!("Updating patient profile: {}", existing.id);
                let path = format!("/rest/v1/patients?id=eq.{}", existing.id);
                let result: Vec<Value> = self.supabase.request_with_headers(
                    Method::PATCH,
                    &path,
                    Some(auth_token),
                    Some(profile_data),
                    Some(representation_headers()),
                ).await?;

                first_row(result)
            }
            None => self.insert(user, profile_data, auth_token).await,
        }
    }

    /// The caller's patient row, inserting a default one built from the auth
    /// identity when none exists.
    pub async fn get_or_create(&self, user: &User, auth_token: &str) -> Result<Patient, PatientError> {
        if let Some(patient) = self.get_profile(user, auth_token).await? {
            return Ok(patient);
        }

        let default_data = json!({
            "name": user.default_display_name(),
            "contact_info": user.email.clone().unwrap_or_default(),
            "medical_history": "",
        });

        self.insert(user, default_data, auth_token).await
    }

    async fn insert(&self, user: &User, mut data: Value, auth_token: &str) -> Result<Patient, PatientError> {
        let user_id = parse_user_id(user)?;
        data["user_id"] = json!(user_id);

        let result: Vec<Value> = self.supabase.request_with_headers(
            Method::POST,
            "/rest/v1/patients",
            Some(auth_token),
            Some(data),
            Some(representation_headers()),
        ).await?;

        let patient = first_row(result)?;
        info!("Patient record {} created for user {}", patient.id, user_id);
        Ok(patient)
    }
}

fn parse_user_id(user: &User) -> Result<Uuid, PatientError> {
    Uuid::parse_str(&user.id).map_err(|_| PatientError::InvalidUserId(user.id.clone()))
}

fn first_row(rows: Vec<Value>) -> Result<Patient, PatientError> {
    let row = rows.into_iter().next().ok_or(PatientError::NotFound)?;
    Ok(serde_json::from_value(row)?)
}
