use std::sync::Arc;

use axum::{
    extract::{Path, State, Extension},
    http::StatusCode,
    Json,
};
use axum_extra::TypedHeader;
use headers::{Authorization, authorization::Bearer};
use serde_json::{json, Value};
use tracing::info;
use uuid::Uuid;

use shared_config::AppConfig;
use shared_models::auth::User;
use shared_models::error::AppError;

use crate::models::{CreateHospitalRequest, UpdateHospitalRequest, COMMON_DEPARTMENTS};
use crate::services::HospitalService;

#[axum::debug_handler]
pub async fn list_hospitals(
    State(config): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
) -> Result<Json<Value>, AppError> {
    let service = HospitalService::new(&config);

    let hospitals = service.list_hospitals(auth.token()).await?;

    Ok(Json(json!({
        "hospitals": hospitals,
        "total": hospitals.len()
    })))
}

#[axum::debug_handler]
pub async fn get_hospital(
    State(config): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Path(hospital_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let service = HospitalService::new(&config);

    let hospital = service.get_hospital(hospital_id, auth.token()).await?;

    Ok(Json(json!(hospital)))
}

#[axum::debug_handler]
pub async fn create_hospital(
    State(config): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
    Json(request): Json<CreateHospitalRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let service = HospitalService::new(&config);

    let hospital = service.create_hospital(request, auth.token()).await?;
    info!("User {} created hospital {}", user.id, hospital.id);

    Ok((StatusCode::CREATED, Json(json!(hospital))))
}

#[axum::debug_handler]
pub async fn update_hospital(
    State(config): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Path(hospital_id): Path<Uuid>,
    Json(request): Json<UpdateHospitalRequest>,
) -> Result<Json<Value>, AppError> {
    let service = HospitalService::new(&config);

    let hospital = service.update_hospital(hospital_id, request, auth.token()).await?;

    Ok(Json(json!(hospital)))
}

#[axum::debug_handler]
pub async fn delete_hospital(
    State(config): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
    Path(hospital_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let service = HospitalService::new(&config);

    service.delete_hospital(hospital_id, auth.token()).await?;
    info!("User {} deleted hospital {}", user.id, hospital_id);

    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_departments() -> Json<Value> {
    Json(json!({ "departments": COMMON_DEPARTMENTS }))
}
