use crate::routes::test_support::{app, send};
use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header::CONTENT_TYPE},
};
use jiff::{Timestamp, ToSpan, tz::TimeZone};
use rstest::{fixture, rstest};
use serde_json::{Value, json};

async fn call(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header(CONTENT_TYPE, "application/json")
        .body(body.map_or_else(Body::empty, |body| Body::from(body.to_string())))
        .expect("request builds");

    let (status, text) = send(app, request).await;
    (status, serde_json::from_str(&text).expect("body is json"))
}

#[fixture]
fn valid_body() -> Value {
    let twenty_years_ago = Timestamp::now()
        .to_zoned(TimeZone::UTC)
        .date()
        .checked_sub(20.years())
        .expect("date in range");

    json!({
        "firstName": "Asha",
        "lastName": "Verma",
        "email": "Asha.Verma@Example.com",
        "phone": "9876543210",
        "dateOfBirth": twenty_years_ago.to_string(),
        "gender": "Female",
        "course": "Computer Science",
        "year": 2,
        "address": {
            "street": "12 Hill Road",
            "city": "Mumbai",
            "state": "Maharashtra",
            "zipCode": "400001"
        },
        "guardianName": "Ravi Verma",
        "guardianPhone": "9123456780"
    })
}

#[tokio::test]
async fn root_reports_liveness() {
    let (status, body) = call(&app(), Method::GET, "/", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"message": "Student Registration API is running!"}));
}

#[rstest]
#[tokio::test]
async fn registering_twice_is_a_duplicate(valid_body: Value) {
    let app = app();

    let (status, body) = call(&app, Method::POST, "/api/students", Some(valid_body.clone())).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["phone"], "9876543210");
    assert_eq!(body["data"]["email"], "asha.verma@example.com");
    assert_eq!(body["data"]["address"]["zipCode"], "400001");
    assert!(body["data"]["id"].is_string());
    assert!(body["data"]["createdAt"].is_string());

    let (status, body) = call(&app, Method::POST, "/api/students", Some(valid_body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "A student with this email already exists");
    assert_eq!(body["errors"]["email"], "Email is already registered");
}

#[rstest]
#[tokio::test]
async fn invalid_phone_is_rejected_without_storing(mut valid_body: Value) {
    let app = app();
    valid_body["phone"] = json!("12345");

    let (status, body) = call(&app, Method::POST, "/api/students", Some(valid_body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Validation failed");
    assert_eq!(body["errors"]["phone"], "Please enter a valid 10-digit phone number");

    let (_, listed) = call(&app, Method::GET, "/api/students", None).await;
    assert_eq!(listed["data"], json!([]));
}

#[rstest]
#[tokio::test]
async fn year_may_arrive_as_a_string(mut valid_body: Value) {
    valid_body["year"] = json!("3");

    let (status, body) = call(&app(), Method::POST, "/api/students", Some(valid_body)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["year"], 3);
}

#[rstest]
#[case::wrong_type(json!({"firstName": 5}))]
#[case::not_an_object(json!([1, 2, 3]))]
#[tokio::test]
async fn malformed_bodies_are_bad_requests(#[case] body: Value) {
    let (status, body) = call(&app(), Method::POST, "/api/students", Some(body)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
}

#[rstest]
#[tokio::test]
async fn created_records_can_be_fetched_and_deleted(valid_body: Value) {
    let app = app();
    let (_, created) = call(&app, Method::POST, "/api/students", Some(valid_body)).await;
    let uri = format!("/api/students/{}", created["data"]["id"].as_str().expect("id is a string"));

    let (status, fetched) = call(&app, Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["data"], created["data"]);

    let (status, deleted) = call(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        deleted,
        json!({"success": true, "message": "Student deleted successfully"})
    );

    let (status, _) = call(&app, Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn absent_ids_are_not_found_every_time() {
    let app = app();
    let uri = "/api/students/6f1c1a3e-1b2d-4c5e-8f90-123456789abc";

    let (status, body) = call(&app, Method::GET, uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"success": false, "message": "Student not found"}));

    for _ in 0..2 {
        let (status, _) = call(&app, Method::DELETE, uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}

#[tokio::test]
async fn malformed_ids_are_bad_requests() {
    let (status, body) = call(&app(), Method::GET, "/api/students/not-a-uuid", None).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid student id");
}

#[rstest]
#[tokio::test]
async fn list_is_newest_first(valid_body: Value) {
    let app = app();
    let mut second = valid_body.clone();
    second["email"] = json!("second@example.com");

    call(&app, Method::POST, "/api/students", Some(valid_body)).await;
    call(&app, Method::POST, "/api/students", Some(second)).await;

    let (status, body) = call(&app, Method::GET, "/api/students", None).await;
    assert_eq!(status, StatusCode::OK);
    let emails: Vec<_> = body["data"]
        .as_array()
        .expect("data is a list")
        .iter()
        .map(|student| student["email"].as_str().expect("email is a string"))
        .collect();
    assert_eq!(emails, ["second@example.com", "asha.verma@example.com"]);
}
