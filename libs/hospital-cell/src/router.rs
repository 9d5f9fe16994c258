use std::sync::Arc;

use axum::{
    Router,
    routing::get,
    middleware,
};

use shared_config::AppConfig;
use shared_utils::extractor::auth_middleware;

use crate::handlers;

pub fn hospital_routes(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/", get(handlers::list_hospitals).post(handlers::create_hospital))
        .route("/departments", get(handlers::list_departments))
        .route(
            "/{hospital_id}",
            get(handlers::get_hospital)
                .put(handlers::update_hospital)
                .delete(handlers::delete_hospital),
        )
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware))
        .with_state(state)
}
