use std::sync::Arc;
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use chrono::{NaiveDate, TimeZone, Utc};
use tower::ServiceExt;
use serde_json::{json, Value};
use uuid::Uuid;
use wiremock::{MockServer, Mock, ResponseTemplate};
use wiremock::matchers::{method, path, query_param, header};
use assert_matches::assert_matches;

use dashboard_cell::models::{ActivityType, DashboardError, HEALTH_TIPS};
use dashboard_cell::router::dashboard_routes;
use dashboard_cell::services::DashboardService;
use shared_config::AppConfig;
use shared_utils::test_utils::{TestConfig, TestUser, JwtTestUtils, MockSupabaseResponses};

fn create_test_app(config: AppConfig) -> Router {
    dashboard_routes(Arc::new(config))
}

fn token_for(config: &AppConfig) -> String {
    JwtTestUtils::create_test_token(&TestUser::default(), &config.supabase_jwt_secret, Some(24))
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if body.is_empty() { Value::Null } else { serde_json::from_slice(&body).unwrap() };
    (status, json)
}

async fn mount_counts(mock_server: &MockServer, today: &str) {
    Mock::given(method("HEAD"))
        .and(path("/rest/v1/appointments"))
        .and(query_param("status", "eq.scheduled"))
        .and(query_param("date", format!("gte.{}", today)))
        .and(header("Prefer", "count=exact"))
        .respond_with(ResponseTemplate::new(200).insert_header("Content-Range", "0-2/3"))
        .with_priority(1)
        .mount(mock_server)
        .await;

    Mock::given(method("HEAD"))
        .and(path("/rest/v1/appointments"))
        .respond_with(ResponseTemplate::new(200).insert_header("Content-Range", "0-9/12"))
        .mount(mock_server)
        .await;

    Mock::given(method("HEAD"))
        .and(path("/rest/v1/hospitals"))
        .respond_with(ResponseTemplate::new(200).insert_header("Content-Range", "0-3/4"))
        .mount(mock_server)
        .await;

    Mock::given(method("HEAD"))
        .and(path("/rest/v1/doctors"))
        .respond_with(ResponseTemplate::new(200).insert_header("Content-Range", "*/9"))
        .mount(mock_server)
        .await;
}

#[tokio::test]
async fn test_summary_counts_and_activity() {
    let mock_server = MockServer::start().await;
    let config = TestConfig::with_url(mock_server.uri()).to_app_config();
    let now = Utc.with_ymd_and_hms(2024, 1, 3, 12, 0, 0).unwrap();

    mount_counts(&mock_server, "2024-01-03").await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/appointments"))
        .and(query_param("order", "created_at.desc"))
        .and(query_param("limit", "5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockSupabaseResponses::appointment_with_details_response(&Uuid::new_v4().to_string(), "cancelled"),
            MockSupabaseResponses::appointment_with_details_response(&Uuid::new_v4().to_string(), "confirmed"),
        ])))
        .mount(&mock_server)
        .await;

    let service = DashboardService::new(&config);
    let summary = service.summary_at("user-token", now).await.unwrap();

    assert_eq!(summary.stats.total_appointments, 12);
    assert_eq!(summary.stats.upcoming_appointments, 3);
    assert_eq!(summary.stats.total_hospitals, 4);
    assert_eq!(summary.stats.total_doctors, 9);

    assert_eq!(summary.recent_appointments.len(), 2);
    assert_eq!(summary.recent_activity.len(), 2);
    assert_eq!(summary.recent_activity[0].activity_type, ActivityType::AppointmentCancelled);
    assert_eq!(summary.recent_activity[1].activity_type, ActivityType::AppointmentUpdated);
    // created_at in the fixtures is 2024-01-01T00:00:00Z
    assert_eq!(summary.recent_activity[0].relative_time, "2 days ago");
    assert!(summary.recent_activity[0].description.contains("Dr. Aoife Byrne"));
}

#[tokio::test]
async fn test_counts_require_content_range() {
    let mock_server = MockServer::start().await;
    let config = TestConfig::with_url(mock_server.uri()).to_app_config();

    Mock::given(method("HEAD"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&mock_server)
        .await;

    let service = DashboardService::new(&config);
    let result = service
        .counts("user-token", NaiveDate::from_ymd_opt(2024, 1, 3).unwrap())
        .await;

    assert_matches!(result, Err(DashboardError::DatabaseError(_)));
}

#[tokio::test]
async fn test_dashboard_route() {
    let mock_server = MockServer::start().await;
    let config = TestConfig::with_url(mock_server.uri()).to_app_config();
    let token = token_for(&config);

    Mock::given(method("HEAD"))
        .respond_with(ResponseTemplate::new(200).insert_header("Content-Range", "*/0"))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/appointments"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;

    let request = Request::builder()
        .method("GET")
        .uri("/")
        .header("authorization", format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap();

    let (status, body) = send(create_test_app(config), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["stats"]["total_appointments"], 0);
    assert_eq!(body["recent_appointments"], json!([]));
    assert_eq!(body["recent_activity"], json!([]));
}

#[tokio::test]
async fn test_dashboard_unauthorized_upstream() {
    let mock_server = MockServer::start().await;
    let config = TestConfig::with_url(mock_server.uri()).to_app_config();
    let token = token_for(&config);

    Mock::given(method("HEAD"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(401).set_body_json(
            MockSupabaseResponses::error_response("JWT expired", "PGRST301")
        ))
        .mount(&mock_server)
        .await;

    let request = Request::builder()
        .method("GET")
        .uri("/")
        .header("authorization", format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap();

    let (status, _) = send(create_test_app(config), request).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_health_tips() {
    let config = TestConfig::default().to_app_config();
    let token = token_for(&config);

    let request = Request::builder()
        .method("GET")
        .uri("/health-tips")
        .header("authorization", format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap();

    let (status, body) = send(create_test_app(config.clone()), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 6);
    assert_eq!(body["tips"][0]["title"], "Stay Hydrated");
    assert_eq!(body["tips"][5]["category"], "Prevention");

    let request = Request::builder()
        .method("GET")
        .uri("/health-tips/current")
        .header("authorization", format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap();

    let (status, body) = send(create_test_app(config), request).await;

    assert_eq!(status, StatusCode::OK);
    let index = body["index"].as_u64().unwrap() as usize;
    assert!(index < HEALTH_TIPS.len());
    assert_eq!(body["tip"]["title"], HEALTH_TIPS[index].title);
    assert_eq!(body["rotation_seconds"], 10);
}
