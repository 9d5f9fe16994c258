use std::sync::Arc;
use chrono::{Duration, Utc};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use base64::{Engine as _, engine::general_purpose};
use serde_json::json;
use uuid::Uuid;

use shared_config::AppConfig;
use shared_models::auth::User;

pub const TEST_JWT_SECRET: &str = "test-secret-key-for-jwt-validation-must-be-long-enough";
pub const TEST_ANON_KEY: &str = "test-anon-key";

pub struct TestConfig {
    pub jwt_secret: String,
    pub supabase_url: String,
    pub supabase_anon_key: String,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            jwt_secret: TEST_JWT_SECRET.to_string(),
            supabase_url: "http://localhost:54321".to_string(),
            supabase_anon_key: TEST_ANON_KEY.to_string(),
        }
    }
}

impl TestConfig {
    /// Config pointing at a mock Supabase server.
    pub fn with_url(url: impl Into<String>) -> Self {
        Self {
            supabase_url: url.into(),
            ..Self::default()
        }
    }

    pub fn to_app_config(&self) -> AppConfig {
        AppConfig {
            supabase_url: self.supabase_url.clone(),
            supabase_anon_key: self.supabase_anon_key.clone(),
            supabase_jwt_secret: self.jwt_secret.clone(),
        }
    }

    pub fn to_arc(&self) -> Arc<AppConfig> {
        Arc::new(self.to_app_config())
    }
}

pub struct TestUser {
    pub id: String,
    pub email: String,
    pub role: String,
}

impl Default for TestUser {
    fn default() -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            email: "test@example.com".to_string(),
            role: "authenticated".to_string(),
        }
    }
}

impl TestUser {
    pub fn new(email: &str, role: &str) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            email: email.to_string(),
            role: role.to_string(),
        }
    }

    pub fn patient(email: &str) -> Self {
        Self::new(email, "authenticated")
    }

    pub fn to_user(&self) -> User {
        User {
            id: self.id.clone(),
            email: Some(self.email.clone()),
            role: Some(self.role.clone()),
            metadata: None,
            created_at: Some(Utc::now()),
        }
    }
}

pub struct JwtTestUtils;

impl JwtTestUtils {
    pub fn create_test_token(user: &TestUser, secret: &str, exp_hours: Option<i64>) -> String {
        let now = Utc::now();
        let exp = now + Duration::hours(exp_hours.unwrap_or(24));

        let header = json!({
            "alg": "HS256",
            "typ": "JWT"
        });

        let payload = json!({
            "sub": user.id,
            "email": user.email,
            "role": user.role,
            "iat": now.timestamp(),
            "exp": exp.timestamp()
        });

        let header_encoded = general_purpose::URL_SAFE_NO_PAD.encode(header.to_string());
        let payload_encoded = general_purpose::URL_SAFE_NO_PAD.encode(payload.to_string());

        let signing_input = format!("{}.{}", header_encoded, payload_encoded);

        let mut mac = Hmac::<Sha256>::new_from_slice(secret.as_bytes())
            .expect("HMAC can take key of any size");
        mac.update(signing_input.as_bytes());
        let signature = mac.finalize().into_bytes();
        let signature_encoded = general_purpose::URL_SAFE_NO_PAD.encode(signature);

        format!("{}.{}", signing_input, signature_encoded)
    }

    pub fn create_expired_token(user: &TestUser, secret: &str) -> String {
        Self::create_test_token(user, secret, Some(-1))
    }

    pub fn create_invalid_signature_token(user: &TestUser) -> String {
        Self::create_test_token(user, "wrong-secret", Some(24))
    }

    pub fn create_malformed_token() -> String {
        "invalid.token".to_string()
    }
}

/// Canned PostgREST / GoTrue payloads shaped like the MediConnect tables.
pub struct MockSupabaseResponses;

impl MockSupabaseResponses {
    pub fn auth_user_response(user_id: &str, email: &str) -> serde_json::Value {
        json!({
            "id": user_id,
            "aud": "authenticated",
            "role": "authenticated",
            "email": email,
            "created_at": "2024-01-01T00:00:00Z"
        })
    }

    pub fn session_response(user_id: &str, email: &str) -> serde_json::Value {
        json!({
            "access_token": "access-token",
            "token_type": "bearer",
            "expires_in": 3600,
            "refresh_token": "refresh-token",
            "user": Self::auth_user_response(user_id, email)
        })
    }

    pub fn hospital_response(hospital_id: &str, name: &str) -> serde_json::Value {
        json!({
            "id": hospital_id,
            "name": name,
            "location": "12 Harbour Road, Dublin",
            "departments": ["Emergency", "Cardiology"],
            "created_at": "2024-01-01T00:00:00Z"
        })
    }

    pub fn doctor_response(doctor_id: &str, hospital_id: &str, name: &str) -> serde_json::Value {
        json!({
            "id": doctor_id,
            "hospital_id": hospital_id,
            "name": name,
            "specialization": "Cardiology",
            "availability": ["Monday 9:00-17:00", "Wednesday 9:00-17:00"],
            "created_at": "2024-01-01T00:00:00Z"
        })
    }

    pub fn patient_response(patient_id: &str, user_id: &str) -> serde_json::Value {
        json!({
            "id": patient_id,
            "user_id": user_id,
            "name": "Test Patient",
            "contact_info": "test@example.com",
            "medical_history": "",
            "created_at": "2024-01-01T00:00:00Z"
        })
    }

    pub fn appointment_response(appointment_id: &str, patient_id: &str, doctor_id: &str, status: &str) -> serde_json::Value {
        json!({
            "id": appointment_id,
            "patient_id": patient_id,
            "doctor_id": doctor_id,
            "date": "2099-12-24",
            "time": "09:30",
            "status": status,
            "created_at": "2024-01-01T00:00:00Z"
        })
    }

    pub fn appointment_with_details_response(appointment_id: &str, status: &str) -> serde_json::Value {
        let mut appointment = Self::appointment_response(
            appointment_id,
            &Uuid::new_v4().to_string(),
            &Uuid::new_v4().to_string(),
            status,
        );
        appointment["doctors"] = json!({
            "name": "Dr. Aoife Byrne",
            "specialization": "Cardiology",
            "hospitals": { "name": "City General", "location": "12 Harbour Road, Dublin" }
        });
        appointment["patients"] = json!({
            "name": "Test Patient",
            "contact_info": "test@example.com"
        });
        appointment
    }

    pub fn error_response(message: &str, code: &str) -> serde_json::Value {
        json!({
            "message": message,
            "code": code
        })
    }
}
