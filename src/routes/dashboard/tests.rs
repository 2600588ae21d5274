use crate::routes::test_support::{app, send};
use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header::CONTENT_TYPE},
};
use serde_json::{Value, json};

async fn register(app: &Router, first_name: &str, course: &str) -> String {
    let body = json!({
        "firstName": first_name,
        "lastName": "Kumar",
        "email": format!("{}@example.com", first_name.to_lowercase()),
        "phone": "9876543210",
        "dateOfBirth": "2005-06-01",
        "gender": "Other",
        "course": course,
        "year": 1,
        "address": {"street": "1 Main Road", "city": "Pune", "state": "Maharashtra", "zipCode": "411001"},
        "guardianName": "Guardian",
        "guardianPhone": "9123456780"
    });
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/students")
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("request builds");

    let (status, text) = send(app, request).await;
    assert_eq!(status, StatusCode::CREATED, "{text}");
    let created: Value = serde_json::from_str(&text).expect("body is json");
    created["data"]["id"]
        .as_str()
        .expect("id is a string")
        .to_string()
}

async fn fragment(app: &Router, method: Method, uri: &str) -> (StatusCode, String) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .expect("request builds");
    send(app, request).await
}

#[tokio::test]
async fn grid_counts_everyone_but_shows_the_filtered_set() {
    let app = app();
    register(&app, "Ann", "Civil").await;
    register(&app, "Bob", "Civil").await;
    register(&app, "Cyd", "Electronics").await;

    let (status, html) = fragment(&app, Method::GET, "/internal/dashboard/students?search=an&course=").await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("Total Students: 3"));
    assert!(html.contains("Registered Students (1)"));
    assert!(html.contains("Ann Kumar"));
    assert!(!html.contains("Bob Kumar"));

    let (_, html) = fragment(&app, Method::GET, "/internal/dashboard/students?search=&course=Civil").await;
    assert!(html.contains("Registered Students (2)"));
    assert!(html.contains("Ann Kumar"));
    assert!(html.contains("Bob Kumar"));
    assert!(!html.contains("Cyd Kumar"));
}

#[tokio::test]
async fn detail_shows_the_whole_record() {
    let app = app();
    let id = register(&app, "Ann", "Civil").await;

    let (status, html) = fragment(&app, Method::GET, &format!("/internal/dashboard/student?id={id}")).await;

    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("Ann Kumar"));
    assert!(html.contains("411001"));
    assert!(html.contains(&format!("value=\"{id}\"")));
}

#[tokio::test]
async fn detail_of_an_absent_record_is_an_alert() {
    let (status, html) = fragment(
        &app(),
        Method::GET,
        "/internal/dashboard/student?id=6f1c1a3e-1b2d-4c5e-8f90-123456789abc",
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(html.contains("role=\"alert\""));
    assert!(html.contains("Failed to load student: Student not found"));
}

#[tokio::test]
async fn detail_with_a_bad_or_missing_id_is_an_alert() {
    let app = app();

    for uri in [
        "/internal/dashboard/student?id=not-a-uuid",
        "/internal/dashboard/student",
    ] {
        let (status, html) = fragment(&app, Method::GET, uri).await;

        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        assert!(html.contains("role=\"alert\""), "{uri}: {html}");
        assert!(html.contains("Failed to load student: Invalid student id"), "{uri}: {html}");
    }
}

#[tokio::test]
async fn deleting_the_open_record_clears_the_detail_pane() {
    let app = app();
    let ann = register(&app, "Ann", "Civil").await;
    register(&app, "Bob", "Civil").await;

    let (status, html) = fragment(
        &app,
        Method::DELETE,
        &format!("/internal/dashboard/student?id={ann}&selected={ann}&search=&course="),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("Total Students: 1"));
    assert!(!html.contains("Ann Kumar"));
    assert!(html.contains("id=\"in_focus\""));
}

#[tokio::test]
async fn deleting_another_record_keeps_the_detail_pane() {
    let app = app();
    let ann = register(&app, "Ann", "Civil").await;
    let bob = register(&app, "Bob", "Civil").await;

    let (_, html) = fragment(
        &app,
        Method::DELETE,
        &format!("/internal/dashboard/student?id={bob}&selected={ann}"),
    )
    .await;

    assert!(html.contains("Total Students: 1"));
    assert!(!html.contains("id=\"in_focus\""));
}

#[tokio::test]
async fn deleting_a_missing_record_reports_the_failure() {
    let (status, html) = fragment(
        &app(),
        Method::DELETE,
        "/internal/dashboard/student?id=6f1c1a3e-1b2d-4c5e-8f90-123456789abc",
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(html.contains("Failed to delete student"));
}
