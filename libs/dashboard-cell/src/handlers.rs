use std::sync::Arc;

use axum::{extract::State, Json};
use chrono::Utc;
use axum_extra::TypedHeader;
use headers::{Authorization, authorization::Bearer};
use serde_json::{json, Value};

use shared_config::AppConfig;
use shared_models::error::AppError;

use crate::models::{tip_index_at, HEALTH_TIPS, TIP_ROTATION_SECS};
use crate::services::DashboardService;

#[axum::debug_handler]
pub async fn get_dashboard(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
) -> Result<Json<Value>, AppError> {
    let service = DashboardService::new(&state);

    let summary = service.summary(auth.token()).await?;

    Ok(Json(json!(summary)))
}

pub async fn list_health_tips() -> Json<Value> {
    Json(json!({
        "tips": HEALTH_TIPS,
        "total": HEALTH_TIPS.len()
    }))
}

pub async fn current_health_tip() -> Json<Value> {
    let index = tip_index_at(Utc::now());

    Json(json!({
        "index": index,
        "tip": HEALTH_TIPS[index],
        "rotation_seconds": TIP_ROTATION_SECS
    }))
}
