use serde::{Deserialize, Serialize};
use serde_json::Value;

use shared_database::SupabaseError;
use shared_models::error::AppError;
use shared_utils::jwt::TokenError;

/// GoTrue rejects shorter passwords with its default settings.
pub const MIN_PASSWORD_LENGTH: usize = 6;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub name: Option<String>,
}

impl RegisterRequest {
    pub fn validate(&self) -> Result<(), AuthError> {
        validate_email(&self.email)?;
        if self.password.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(AuthError::ValidationError(format!(
                "Password must be at least {} characters", MIN_PASSWORD_LENGTH
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl LoginRequest {
    /// Sign-in only needs a password; its length was checked when the account was made.
    pub fn validate(&self) -> Result<(), AuthError> {
        validate_email(&self.email)?;
        if self.password.is_empty() {
            return Err(AuthError::ValidationError("Password is required".to_string()));
        }
        Ok(())
    }
}

fn validate_email(email: &str) -> Result<(), AuthError> {
    let email = email.trim();
    if email.is_empty() || !email.contains('@') {
        return Err(AuthError::ValidationError("A valid email address is required".to_string()));
    }
    Ok(())
}

/// Human readable message from a GoTrue error body. GoTrue uses `msg`,
/// `error_description` or `message` depending on the endpoint.
pub fn upstream_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|json| {
            ["msg", "error_description", "message"]
                .iter()
                .find_map(|key| json.get(*key).and_then(Value::as_str).map(str::to_string))
        })
        .unwrap_or_else(|| body.to_string())
}

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("{0}")]
    ValidationError(String),

    #[error("Invalid login credentials")]
    InvalidCredentials,

    #[error("{0}")]
    Rejected(String),

    #[error(transparent)]
    InvalidToken(#[from] TokenError),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Authentication service error: {0}")]
    ExternalService(String),
}

impl From<anyhow::Error> for AuthError {
    fn from(err: anyhow::Error) -> Self {
        match SupabaseError::find(&err) {
            Some(SupabaseError::Auth(msg)) => AuthError::Unauthorized(upstream_message(msg)),
            Some(SupabaseError::Api { status, message }) if (400..500).contains(status) => {
                AuthError::Rejected(upstream_message(message))
            }
            _ => AuthError::ExternalService(err.to_string()),
        }
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::ValidationError(msg) => AppError::ValidationError(msg),
            AuthError::InvalidCredentials => AppError::Auth(err.to_string()),
            AuthError::Rejected(msg) => AppError::BadRequest(msg),
            AuthError::InvalidToken(err) => AppError::Auth(err.to_string()),
            AuthError::Unauthorized(msg) => AppError::Auth(msg),
            AuthError::ExternalService(msg) => AppError::ExternalService(msg),
        }
    }
}
