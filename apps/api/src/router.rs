use std::sync::Arc;

use axum::{
    Router,
    routing::get,
};

use appointment_cell::router::appointment_routes;
use auth_cell::router::auth_routes;
use dashboard_cell::router::dashboard_routes;
use doctor_cell::router::doctor_routes;
use hospital_cell::router::hospital_routes;
use patient_cell::router::patient_routes;
use shared_config::AppConfig;
use symptom_checker_cell::router::symptom_checker_routes;
use symptom_checker_cell::{SymptomCatalog, SymptomMatcher};

pub fn create_router(state: Arc<AppConfig>) -> Router {
    let matcher = Arc::new(SymptomMatcher::new(Arc::new(SymptomCatalog::reference())));

    Router::new()
        .route("/", get(|| async { "MediConnect API is running!" }))
        .nest("/auth", auth_routes(state.clone()))
        .nest("/symptom-checker", symptom_checker_routes(state.clone(), matcher))
        .nest("/hospitals", hospital_routes(state.clone()))
        .nest("/doctors", doctor_routes(state.clone()))
        .nest("/patients", patient_routes(state.clone()))
        .nest("/appointments", appointment_routes(state.clone()))
        .nest("/dashboard", dashboard_routes(state))
}
