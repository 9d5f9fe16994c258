use reqwest::Method;
use serde_json::{json, Value};
use tracing::{debug, info, warn};

use shared_config::AppConfig;
use shared_database::SupabaseClient;
use shared_models::auth::User;
use shared_utils::jwt::validate_token;

use crate::models::{AuthError, LoginRequest, RegisterRequest};

/// Thin wrapper over the Supabase GoTrue endpoints.
pub struct AuthService {
    supabase: SupabaseClient,
    jwt_secret: String,
}

impl AuthService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
            jwt_secret: config.supabase_jwt_secret.clone(),
        }
    }

    pub async fn register(&self, request: RegisterRequest) -> Result<Value, AuthError> {
        request.validate()?;
        let email = request.email.trim().to_lowercase();
        debug!("Registering user: {}", email);

        let mut body = json!({
            "email": email,
            "password": request.password,
        });
        if let Some(name) = request.name.as_deref().map(str::trim).filter(|n| !n.is_empty()) {
            body["data"] = json!({ "name": name });
        }

        let response: Value = self.supabase.request(
            Method::POST,
            "/auth/v1/signup",
            None,
            Some(body),
        ).await?;

        info!("User registered: {}", email);
        Ok(response)
    }

    /// Password sign in. Returns the GoTrue session (access and refresh tokens).
    pub async fn login(&self, request: LoginRequest) -> Result<Value, AuthError> {
        request.validate()?;
        let email = request.email.trim().to_lowercase();
        debug!("Signing in user: {}", email);

        let body = json!({
            "email": email,
            "password": request.password,
        });

        let session: Value = self.supabase.request(
            Method::POST,
            "/auth/v1/token?grant_type=password",
            None,
            Some(body),
        ).await
        .map_err(|err| match AuthError::from(err) {
            AuthError::Rejected(msg) if msg.eq_ignore_ascii_case("Invalid login credentials") => {
                warn!("Rejected sign in for {}", email);
                AuthError::InvalidCredentials
            }
            other => other,
        })?;

        Ok(session)
    }

    pub fn validate(&self, token: &str) -> Result<User, AuthError> {
        Ok(validate_token(token, &self.jwt_secret)?)
    }

    /// GoTrue's view of the user behind `auth_token`.
    pub async fn auth_profile(&self, auth_token: &str) -> Result<Value, AuthError> {
        Ok(self.supabase.get_user_profile(auth_token).await?)
    }
}
