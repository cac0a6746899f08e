//! Integration tests for the beer endpoints

mod common;

use axum::http::StatusCode;
use common::TestApp;
use serde_json::json;

#[tokio::test]
async fn test_create_la_chouffe_then_get_identical() {
    let app = TestApp::new();
    let user = app.register_user().await;

    let (status, created) = app
        .post(
            "/api/beers",
            &user.token,
            json!({ "name": "La Chouffe", "percentage": 8.0 }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["name"], "La Chouffe");
    assert_eq!(created["percentage"], 8.0);

    let id = created["id"].as_str().unwrap();
    let (status, fetched) = app.get(&format!("/api/beers/{id}"), &user.token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, created);
}

#[tokio::test]
async fn test_pagination_window_and_total_count() {
    let app = TestApp::new();
    let user = app.register_user().await;
    for (name, percentage) in [
        ("Westmalle Tripel", 9.5),
        ("Achel Blond", 8.0),
        ("Duvel", 8.5),
        ("Orval", 6.2),
    ] {
        app.create_beer(&user.token, name, percentage).await;
    }

    let (status, body) = app.get("/api/beers?limit=2&offset=1", &user.token).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 4);
    assert_eq!(body["limit"], 2);
    assert_eq!(body["offset"], 1);
    let names: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|beer| beer["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Duvel", "Orval"]);
}

#[tokio::test]
async fn test_default_pagination() {
    let app = TestApp::new();
    let user = app.register_user().await;

    let (status, body) = app.get("/api/beers", &user.token).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["limit"], 100);
    assert_eq!(body["offset"], 0);
    assert_eq!(body["data"], json!([]));
}

#[tokio::test]
async fn test_out_of_range_percentage_creates_nothing() {
    let app = TestApp::new();
    let user = app.register_user().await;

    for percentage in [-1.0, 100.5] {
        let (status, body) = app
            .post(
                "/api/beers",
                &user.token,
                json!({ "name": "Impossible", "percentage": percentage }),
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "VALIDATION_FAILED");
        assert!(body["details"].get("percentage").is_some());
    }

    let (_, list) = app.get("/api/beers", &user.token).await;
    assert_eq!(list["count"], 0);
}

#[tokio::test]
async fn test_delete_twice() {
    let app = TestApp::new();
    let user = app.register_user().await;
    let id = app.create_beer(&user.token, "Rochefort 10", 11.3).await;
    let path = format!("/api/beers/{id}");

    let (status, body) = app.delete(&path, &user.token).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(body.is_null());

    let (status, body) = app.delete(&path, &user.token).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_partial_update() {
    let app = TestApp::new();
    let user = app.register_user().await;
    let id = app.create_beer(&user.token, "Karmeliet", 8.0).await;

    let (status, body) = app
        .put(
            &format!("/api/beers/{id}"),
            &user.token,
            json!({ "name": "Tripel Karmeliet" }),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Tripel Karmeliet");
    assert_eq!(body["percentage"], 8.0);
}

#[tokio::test]
async fn test_duplicate_name_conflicts() {
    let app = TestApp::new();
    let user = app.register_user().await;
    app.create_beer(&user.token, "Duvel", 8.5).await;

    let (status, _) = app
        .post("/api/beers", &user.token, json!({ "name": "Duvel", "percentage": 8.5 }))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_unknown_brewery_reference() {
    let app = TestApp::new();
    let user = app.register_user().await;

    let (status, _) = app
        .post(
            "/api/beers",
            &user.token,
            json!({
                "name": "Ghost Ale",
                "percentage": 5.0,
                "breweryId": uuid::Uuid::new_v4(),
            }),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_malformed_id_and_query() {
    let app = TestApp::new();
    let user = app.register_user().await;

    let (status, body) = app.get("/api/beers/not-a-uuid", &user.token).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_FAILED");

    let (status, _) = app.get("/api/beers?limit=lots", &user.token).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app.get("/api/beers?limit=5000", &user.token).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_missing_beer_is_not_found() {
    let app = TestApp::new();
    let user = app.register_user().await;
    let id = uuid::Uuid::new_v4();

    let (status, body) = app.get(&format!("/api/beers/{id}"), &user.token).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], format!("No beer with id {id} exists"));
}

#[tokio::test]
async fn test_unsupported_method_uses_error_envelope() {
    let app = TestApp::new();
    let user = app.register_user().await;

    let (status, body) = app
        .request("PATCH", "/api/beers", Some(&user.token), Some(json!({})))
        .await;

    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(body["code"], "METHOD_NOT_ALLOWED");
    assert_eq!(body["details"], json!({}));
}

#[tokio::test]
async fn test_oversized_body_is_payload_too_large() {
    let app = TestApp::new();
    let user = app.register_user().await;
    let name = "x".repeat(128 * 1024);

    let (status, body) = app
        .post(
            "/api/beers",
            &user.token,
            json!({ "name": name, "percentage": 5.0 }),
        )
        .await;
    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(body["code"], "PAYLOAD_TOO_LARGE");

    let payload = json!({ "name": name, "percentage": 5.0 }).to_string();
    let request = axum::http::Request::builder()
        .method("POST")
        .uri("/api/beers")
        .header("Authorization", format!("Bearer {}", user.token))
        .header("Content-Type", "application/json")
        .header("Content-Length", payload.len())
        .body(axum::body::Body::from(payload))
        .unwrap();
    let response = tower::ServiceExt::oneshot(app.app.clone(), request)
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["code"], "PAYLOAD_TOO_LARGE");

    let (_, list) = app.get("/api/beers", &user.token).await;
    assert_eq!(list["count"], 0);
}
