use std::sync::Arc;

use axum::{
    Router,
    body::{Body, Bytes},
    http::{Request, StatusCode, header},
};
use http_body_util::BodyExt;
use migration::{Migrator, MigratorTrait};
use sea_orm::Database;
use serde_json::{Value, json};
use server::{
    config::AppConfig,
    http::{AppState, build_router},
};
use service::EmployeeService;
use tower::ServiceExt;

async fn app() -> Router {
    let conn = Database::connect("sqlite::memory:").await.unwrap();
    Migrator::up(&conn, None).await.unwrap();
    let db = Arc::new(conn);
    let state = AppState {
        db: db.clone(),
        employees: EmployeeService::new(db),
        config: Arc::new(AppConfig::load()),
    };
    build_router(state)
}

async fn send(
    router: &Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Bytes) {
    let request = match body {
        Some(value) => Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(value.to_string()))
            .unwrap(),
        None => Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    };
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, bytes)
}

fn as_json(bytes: &Bytes) -> Value {
    serde_json::from_slice(bytes).unwrap()
}

fn john_doe() -> Value {
    json!({
        "firstName": "John",
        "lastName": "Doe",
        "email": "john.doe@example.com"
    })
}

#[tokio::test]
async fn post_creates_an_employee() {
    let router = app().await;
    let (status, body) = send(&router, "POST", "/employees", Some(john_doe())).await;
    assert_eq!(status, StatusCode::CREATED);

    let created = as_json(&body);
    assert!(created["id"].as_i64().unwrap() > 0);
    assert_eq!(created["firstName"], "John");
    assert_eq!(created["lastName"], "Doe");
    assert_eq!(created["email"], "john.doe@example.com");
}

#[tokio::test]
async fn post_with_taken_email_returns_conflict() {
    let router = app().await;
    let (status, _) = send(&router, "POST", "/employees", Some(john_doe())).await;
    assert_eq!(status, StatusCode::CREATED);

    let duplicate = json!({
        "firstName": "Jane",
        "lastName": "Smith",
        "email": "john.doe@example.com"
    });
    let (status, body) = send(&router, "POST", "/employees", Some(duplicate)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(
        std::str::from_utf8(&body).unwrap(),
        "employee with email john.doe@example.com already exists"
    );

    let (status, body) = send(&router, "GET", "/employees", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(as_json(&body).as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn list_on_empty_storage_returns_empty_array() {
    let router = app().await;
    let (status, body) = send(&router, "GET", "/employees", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(as_json(&body), json!([]));
}

#[tokio::test]
async fn get_by_id_round_trips_created_employee() {
    let router = app().await;
    let (_, body) = send(&router, "POST", "/employees", Some(john_doe())).await;
    let id = as_json(&body)["id"].as_i64().unwrap();

    let (status, body) = send(&router, "GET", &format!("/employees/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);

    let fetched = as_json(&body);
    assert_eq!(fetched["id"].as_i64().unwrap(), id);
    assert_eq!(fetched["firstName"], "John");
    assert_eq!(fetched["lastName"], "Doe");
    assert_eq!(fetched["email"], "john.doe@example.com");
}

#[tokio::test]
async fn get_unknown_id_returns_not_found() {
    let router = app().await;
    let (status, _) = send(&router, "GET", "/employees/404", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn put_updates_the_stored_fields() {
    let router = app().await;
    let (_, body) = send(&router, "POST", "/employees", Some(john_doe())).await;
    let id = as_json(&body)["id"].as_i64().unwrap();

    let changes = json!({
        "firstName": "John",
        "lastName": "Doe",
        "email": "updated@gmail.com"
    });
    let (status, body) = send(&router, "PUT", &format!("/employees/{id}"), Some(changes)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(as_json(&body)["email"], "updated@gmail.com");

    let (_, body) = send(&router, "GET", &format!("/employees/{id}"), None).await;
    assert_eq!(as_json(&body)["email"], "updated@gmail.com");
}

#[tokio::test]
async fn put_unknown_id_returns_not_found() {
    let router = app().await;
    let (status, _) = send(&router, "PUT", "/employees/404", Some(john_doe())).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_confirms_and_is_idempotent() {
    let router = app().await;
    let (_, body) = send(&router, "POST", "/employees", Some(john_doe())).await;
    let id = as_json(&body)["id"].as_i64().unwrap();

    let (status, body) = send(&router, "DELETE", &format!("/employees/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(std::str::from_utf8(&body).unwrap(), "employee deleted");

    let (status, _) = send(&router, "GET", &format!("/employees/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Deleting an id that is already gone is still a 200.
    let (status, _) = send(&router, "DELETE", &format!("/employees/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn healthz_reports_database_reachability() {
    let router = app().await;
    let (status, body) = send(&router, "GET", "/healthz", None).await;
    assert_eq!(status, StatusCode::OK);

    let health = as_json(&body);
    assert_eq!(health["ok"], true);
    assert_eq!(health["db_ok"], true);
}
