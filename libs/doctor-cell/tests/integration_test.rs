use std::sync::Arc;
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use tower::ServiceExt;
use serde_json::{json, Value};
use uuid::Uuid;
use wiremock::{MockServer, Mock, ResponseTemplate};
use wiremock::matchers::{method, path, header, query_param, body_json};

use doctor_cell::router::doctor_routes;
use doctor_cell::models::CreateDoctorRequest;
use shared_config::AppConfig;
use shared_utils::test_utils::{TestConfig, TestUser, JwtTestUtils, MockSupabaseResponses};

fn create_test_app(config: AppConfig) -> Router {
    doctor_routes(Arc::new(config))
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

#[tokio::test]
async fn test_list_doctors_filtered_by_hospital() {
    let mock_server = MockServer::start().await;
    let config = TestConfig::with_url(mock_server.uri()).to_app_config();
    let token = token_for(&config);
    let hospital_id = Uuid::new_v4().to_string();

    let mut doctor = MockSupabaseResponses::doctor_response(&Uuid::new_v4().to_string(), &hospital_id, "Dr. Aoife Byrne");
    doctor["hospitals"] = json!({ "name": "City General", "location": "Dublin" });

    Mock::given(method("GET"))
        .and(path("/rest/v1/doctors"))
        .and(query_param("hospital_id", format!("eq.{}", hospital_id)))
        .and(query_param("order", "name.asc"))
        .and(header("Authorization", format!("Bearer {}", token)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([doctor])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let request = Request::builder()
        .method("GET")
        .uri(format!("/?hospital_id={}", hospital_id))
        .header("authorization", format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap();

    let (status, body) = send(create_test_app(config), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 1);
    assert_eq!(body["doctors"][0]["name"], "Dr. Aoife Byrne");
    assert_eq!(body["doctors"][0]["hospitals"]["name"], "City General");
}

#[tokio::test]
async fn test_create_doctor_success() {
    let mock_server = MockServer::start().await;
    let config = TestConfig::with_url(mock_server.uri()).to_app_config();
    let token = token_for(&config);
    let hospital_id = Uuid::new_v4();
    let doctor_id = Uuid::new_v4().to_string();

    Mock::given(method("POST"))
        .and(path("/rest/v1/doctors"))
        .and(body_json(json!({
            "hospital_id": hospital_id,
            "name": "Dr. Aoife Byrne",
            "specialization": "Cardiology",
            "availability": ["Monday 9:00-17:00", "Wednesday 9:00-17:00"]
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([
            MockSupabaseResponses::doctor_response(&doctor_id, &hospital_id.to_string(), "Dr. Aoife Byrne")
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let request_body = CreateDoctorRequest {
        hospital_id,
        name: "Dr. Aoife Byrne".to_string(),
        specialization: "Cardiology".to_string(),
        availability: vec![
            "Monday 9:00-17:00".to_string(),
            "Wednesday 9:00-17:00".to_string(),
            "Monday 9:00-17:00".to_string(),
        ],
    };

    let request = Request::builder()
        .method("POST")
        .uri("/")
        .header("authorization", format!("Bearer {}", token))
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_string(&request_body).unwrap()))
        .unwrap();

    let (status, body) = send(create_test_app(config), request).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["id"], doctor_id);
}

#[tokio::test]
async fn test_create_doctor_rejects_bad_slot() {
    let config = TestConfig::default().to_app_config();
    let token = token_for(&config);

    let request_body = CreateDoctorRequest {
        hospital_id: Uuid::new_v4(),
        name: "Dr. Aoife Byrne".to_string(),
        specialization: "Cardiology".to_string(),
        availability: vec!["Mondays, mornings".to_string()],
    };

    let request = Request::builder()
        .method("POST")
        .uri("/")
        .header("authorization", format!("Bearer {}", token))
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_string(&request_body).unwrap()))
        .unwrap();

    let (status, body) = send(create_test_app(config), request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("Mondays, mornings"));
}

#[tokio::test]
async fn test_create_doctor_unknown_hospital() {
    let mock_server = MockServer::start().await;
    let config = TestConfig::with_url(mock_server.uri()).to_app_config();
    let token = token_for(&config);

    Mock::given(method("POST"))
        .and(path("/rest/v1/doctors"))
        .respond_with(ResponseTemplate::new(409).set_body_json(
            MockSupabaseResponses::error_response("insert or update on table \"doctors\" violates foreign key constraint", "23503")
        ))
        .mount(&mock_server)
        .await;

    let request_body = CreateDoctorRequest {
        hospital_id: Uuid::new_v4(),
        name: "Dr. Aoife Byrne".to_string(),
        specialization: "Cardiology".to_string(),
        availability: vec![],
    };

    let request = Request::builder()
        .method("POST")
        .uri("/")
        .header("authorization", format!("Bearer {}", token))
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_string(&request_body).unwrap()))
        .unwrap();

    let (status, body) = send(create_test_app(config), request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Hospital does not exist");
}

#[tokio::test]
async fn test_get_doctor_not_found() {
    let mock_server = MockServer::start().await;
    let config = TestConfig::with_url(mock_server.uri()).to_app_config();
    let token = token_for(&config);

    Mock::given(method("GET"))
        .and(path("/rest/v1/doctors"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;

    let request = Request::builder()
        .method("GET")
        .uri(format!("/{}", Uuid::new_v4()))
        .header("authorization", format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap();

    let (status, _) = send(create_test_app(config), request).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_doctor_availability() {
    let mock_server = MockServer::start().await;
    let config = TestConfig::with_url(mock_server.uri()).to_app_config();
    let token = token_for(&config);
    let doctor_id = Uuid::new_v4();

    Mock::given(method("PATCH"))
        .and(path("/rest/v1/doctors"))
        .and(query_param("id", format!("eq.{}", doctor_id)))
        .and(body_json(json!({ "availability": ["Saturday 9:00-13:00"] })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockSupabaseResponses::doctor_response(&doctor_id.to_string(), &Uuid::new_v4().to_string(), "Dr. Aoife Byrne")
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let request = Request::builder()
        .method("PUT")
        .uri(format!("/{}", doctor_id))
        .header("authorization", format!("Bearer {}", token))
        .header("content-type", "application/json")
        .body(Body::from(json!({ "availability": ["Saturday 9:00-13:00"] }).to_string()))
        .unwrap();

    let (status, _) = send(create_test_app(config), request).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_delete_missing_doctor() {
    let mock_server = MockServer::start().await;
    let config = TestConfig::with_url(mock_server.uri()).to_app_config();
    let token = token_for(&config);

    Mock::given(method("DELETE"))
        .and(path("/rest/v1/doctors"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;

    let request = Request::builder()
        .method("DELETE")
        .uri(format!("/{}", Uuid::new_v4()))
        .header("authorization", format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap();

    let (status, _) = send(create_test_app(config), request).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_reference_lists() {
    let config = TestConfig::default().to_app_config();
    let token = token_for(&config);

    let request = Request::builder()
        .method("GET")
        .uri("/specializations")
        .header("authorization", format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(create_test_app(config.clone()), request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["specializations"].as_array().unwrap().len(), 15);

    let request = Request::builder()
        .method("GET")
        .uri("/availability-slots")
        .header("authorization", format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(create_test_app(config), request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["availability_slots"][5], "Saturday 9:00-13:00");
}

#[tokio::test]
async fn test_list_doctors_unauthorized() {
    let app = create_test_app(TestConfig::default().to_app_config());

    let request = Request::builder()
        .method("GET")
        .uri("/")
        .body(Body::empty())
        .unwrap();

    let (status, _) = send(app, request).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_delete_doctor_with_appointments_is_conflict() {
    let mock_server = MockServer::start().await;
    let config = TestConfig::with_url(mock_server.uri()).to_app_config();
    let token = token_for(&config);
    let doctor_id = Uuid::new_v4();

    Mock::given(method("DELETE"))
        .and(path("/rest/v1/doctors"))
        .and(query_param("id", format!("eq.{}", doctor_id)))
        .respond_with(ResponseTemplate::new(409).set_body_json(json!({
            "code": "23503",
            "details": "Key is still referenced from table \"appointments\".",
            "hint": null,
            "message": "update or delete on table \"doctors\" violates foreign key constraint \"appointments_doctor_id_fkey\" on table \"appointments\""
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let request = Request::builder()
        .method("DELETE")
        .uri(format!("/{}", doctor_id))
        .header("authorization", format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap();

    let (status, body) = send(create_test_app(config), request).await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "Doctor still has appointments");
}
