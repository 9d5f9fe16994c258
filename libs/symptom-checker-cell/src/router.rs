use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
    middleware,
};

use shared_config::AppConfig;
use shared_utils::extractor::auth_middleware;

use crate::handlers;
use crate::services::SymptomMatcher;

pub fn symptom_checker_routes(config: Arc<AppConfig>, matcher: Arc<SymptomMatcher>) -> Router {
    Router::new()
        .route("/analyze", post(handlers::analyze_symptoms))
        .route("/conditions", get(handlers::list_conditions))
        .layer(middleware::from_fn_with_state(config, auth_middleware))
        .with_state(matcher)
}
