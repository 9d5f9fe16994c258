use std::sync::Arc;
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use chrono::NaiveDate;
use tower::ServiceExt;
use serde_json::{json, Value};
use uuid::Uuid;
use wiremock::{MockServer, Mock, ResponseTemplate};
use wiremock::matchers::{method, path, query_param, body_json, body_partial_json};
use assert_matches::assert_matches;

use appointment_cell::models::{AppointmentError, CreateAppointmentRequest, AppointmentStatus};
use appointment_cell::router::appointment_routes;
use appointment_cell::services::AppointmentService;
use shared_config::AppConfig;
use shared_utils::test_utils::{TestConfig, TestUser, JwtTestUtils, MockSupabaseResponses};

fn create_test_app(config: AppConfig) -> Router {
    appointment_routes(Arc::new(config))
}

fn token_for(config: &AppConfig, user: &TestUser) -> String {
    JwtTestUtils::create_test_token(user, &config.supabase_jwt_secret, Some(24))
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if body.is_empty() { Value::Null } else { serde_json::from_slice(&body).unwrap() };
    (status, json)
}

#[tokio::test]
async fn test_list_appointments_with_stats() {
    let mock_server = MockServer::start().await;
    let config = TestConfig::with_url(mock_server.uri()).to_app_config();
    let token = token_for(&config, &TestUser::default());

    Mock::given(method("GET"))
        .and(path("/rest/v1/appointments"))
        .and(query_param("order", "date.asc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockSupabaseResponses::appointment_with_details_response(&Uuid::new_v4().to_string(), "scheduled"),
            MockSupabaseResponses::appointment_with_details_response(&Uuid::new_v4().to_string(), "scheduled"),
            MockSupabaseResponses::appointment_with_details_response(&Uuid::new_v4().to_string(), "completed"),
        ])))
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
    assert_eq!(body["appointments"].as_array().unwrap().len(), 3);
    assert_eq!(body["appointments"][0]["doctors"]["hospitals"]["name"], "City General");
    assert_eq!(body["stats"], json!({
        "total": 3,
        "scheduled": 2,
        "confirmed": 0,
        "completed": 1,
        "cancelled": 0
    }));
}

#[tokio::test]
async fn test_time_slots() {
    let config = TestConfig::default().to_app_config();
    let token = token_for(&config, &TestUser::default());

    let request = Request::builder()
        .method("GET")
        .uri("/time-slots")
        .header("authorization", format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap();

    let (status, body) = send(create_test_app(config), request).await;

    assert_eq!(status, StatusCode::OK);
    let slots = body["time_slots"].as_array().unwrap();
    assert_eq!(slots.len(), 12);
    assert_eq!(slots[0], "09:00");
    assert_eq!(slots[11], "16:30");
}

#[tokio::test]
async fn test_create_appointment_uses_existing_patient() {
    let mock_server = MockServer::start().await;
    let config = TestConfig::with_url(mock_server.uri()).to_app_config();
    let user = TestUser::patient("jane@example.com");
    let token = token_for(&config, &user);
    let patient_id = Uuid::new_v4().to_string();
    let doctor_id = Uuid::new_v4().to_string();

    Mock::given(method("GET"))
        .and(path("/rest/v1/patients"))
        .and(query_param("user_id", format!("eq.{}", user.id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockSupabaseResponses::patient_response(&patient_id, &user.id)
        ])))
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/appointments"))
        .and(body_json(json!({
            "patient_id": patient_id,
            "doctor_id": doctor_id,
            "date": "2099-12-24",
            "time": "09:30",
            "status": "scheduled"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([
            MockSupabaseResponses::appointment_response(&Uuid::new_v4().to_string(), &patient_id, &doctor_id, "scheduled")
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let request = Request::builder()
        .method("POST")
        .uri("/")
        .header("authorization", format!("Bearer {}", token))
        .header("content-type", "application/json")
        .body(Body::from(json!({
            "doctor_id": doctor_id,
            "date": "2099-12-24",
            "time": "09:30"
        }).to_string()))
        .unwrap();

    let (status, body) = send(create_test_app(config), request).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["patient_id"], patient_id);
    assert_eq!(body["status"], "scheduled");
}

#[tokio::test]
async fn test_create_appointment_creates_patient_record_first() {
    let mock_server = MockServer::start().await;
    let config = TestConfig::with_url(mock_server.uri()).to_app_config();
    let user = TestUser::patient("new.patient@example.com");
    let patient_id = Uuid::new_v4().to_string();
    let doctor_id = Uuid::new_v4();

    Mock::given(method("GET"))
        .and(path("/rest/v1/patients"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/patients"))
        .and(body_partial_json(json!({ "name": "new.patient", "user_id": user.id })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([
            MockSupabaseResponses::patient_response(&patient_id, &user.id)
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/appointments"))
        .and(body_partial_json(json!({ "patient_id": patient_id, "time": "14:30" })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([
            MockSupabaseResponses::appointment_response(
                &Uuid::new_v4().to_string(), &patient_id, &doctor_id.to_string(), "scheduled"
            )
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let service = AppointmentService::new(&config);
    let request = CreateAppointmentRequest {
        doctor_id,
        date: NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
        time: "14:30:00".to_string(),
        status: AppointmentStatus::Scheduled,
    };
    let today = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();

    let appointment = service
        .create_appointment_on(&user.to_user(), request, "token", today)
        .await
        .unwrap();

    assert_eq!(appointment.patient_id.to_string(), patient_id);
}

#[tokio::test]
async fn test_create_appointment_rejects_unknown_slot() {
    let config = TestConfig::default().to_app_config();
    let token = token_for(&config, &TestUser::default());

    let request = Request::builder()
        .method("POST")
        .uri("/")
        .header("authorization", format!("Bearer {}", token))
        .header("content-type", "application/json")
        .body(Body::from(json!({
            "doctor_id": Uuid::new_v4(),
            "date": "2099-12-24",
            "time": "12:15"
        }).to_string()))
        .unwrap();

    let (status, body) = send(create_test_app(config), request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("12:15"));
}

#[tokio::test]
async fn test_create_appointment_rejects_past_date() {
    let config = TestConfig::default().to_app_config();
    let service = AppointmentService::new(&config);
    let request = CreateAppointmentRequest {
        doctor_id: Uuid::new_v4(),
        date: NaiveDate::from_ymd_opt(2025, 2, 28).unwrap(),
        time: "09:00".to_string(),
        status: AppointmentStatus::Scheduled,
    };

    let result = service
        .create_appointment_on(
            &TestUser::default().to_user(),
            request,
            "token",
            NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
        )
        .await;

    assert_matches!(result, Err(AppointmentError::DateInPast(_)));
}

#[tokio::test]
async fn test_cancel_appointment_via_update() {
    let mock_server = MockServer::start().await;
    let config = TestConfig::with_url(mock_server.uri()).to_app_config();
    let token = token_for(&config, &TestUser::default());
    let appointment_id = Uuid::new_v4().to_string();

    Mock::given(method("PATCH"))
        .and(path("/rest/v1/appointments"))
        .and(query_param("id", format!("eq.{}", appointment_id)))
        .and(body_json(json!({ "status": "cancelled" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockSupabaseResponses::appointment_response(
                &appointment_id, &Uuid::new_v4().to_string(), &Uuid::new_v4().to_string(), "cancelled"
            )
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let request = Request::builder()
        .method("PUT")
        .uri(format!("/{}", appointment_id))
        .header("authorization", format!("Bearer {}", token))
        .header("content-type", "application/json")
        .body(Body::from(json!({ "status": "cancelled" }).to_string()))
        .unwrap();

    let (status, body) = send(create_test_app(config), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "cancelled");
}

#[tokio::test]
async fn test_delete_missing_appointment() {
    let mock_server = MockServer::start().await;
    let config = TestConfig::with_url(mock_server.uri()).to_app_config();
    let token = token_for(&config, &TestUser::default());

    Mock::given(method("DELETE"))
        .and(path("/rest/v1/appointments"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;

    let request = Request::builder()
        .method("DELETE")
        .uri(format!("/{}", Uuid::new_v4()))
        .header("authorization", format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap();

    let (status, body) = send(create_test_app(config), request).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Appointment not found");
}

#[tokio::test]
async fn test_requires_authentication() {
    let config = TestConfig::default().to_app_config();

    let request = Request::builder()
        .method("GET")
        .uri("/")
        .body(Body::empty())
        .unwrap();

    let (status, _) = send(create_test_app(config), request).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
