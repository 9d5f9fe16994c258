use std::sync::Arc;

use axum::{
    extract::{State, Extension},
    Json,
};
use serde_json::{json, Value};
use tracing::info;

use shared_models::auth::User;
use shared_models::error::AppError;

use crate::models::{SymptomCheckRequest, SymptomCheckResponse, SymptomCheckerError};
use crate::services::SymptomMatcher;

#[axum::debug_handler]
pub async fn analyze_symptoms(
    State(matcher): State<Arc<SymptomMatcher>>,
    Extension(user): Extension<User>,
    Json(request): Json<SymptomCheckRequest>,
) -> Result<Json<SymptomCheckResponse>, AppError> {
    if request.symptoms.trim().is_empty() {
        return Err(SymptomCheckerError::EmptyInput.into());
    }

    let matches = matcher.analyze(&request.symptoms);
    info!("Symptom check for user {} returned {} matches", user.id, matches.len());

    Ok(Json(SymptomCheckResponse::from_matches(matches)))
}

#[axum::debug_handler]
pub async fn list_conditions(
    State(matcher): State<Arc<SymptomMatcher>>,
) -> Json<Value> {
    let conditions = matcher.catalog().conditions();

    Json(json!({
        "conditions": conditions,
        "total": conditions.len()
    }))
}
