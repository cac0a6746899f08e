//! Integration tests for the brewery endpoints

mod common;

use axum::http::StatusCode;
use common::TestApp;
use serde_json::json;

#[tokio::test]
async fn test_brewery_crud() {
    let app = TestApp::new();
    let user = app.register_user().await;

    let (status, created) = app
        .post(
            "/api/breweries",
            &user.token,
            json!({ "name": "Brasserie d'Achouffe", "country": "Belgium" }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let path = format!("/api/breweries/{}", created["id"].as_str().unwrap());

    let (status, updated) = app
        .put(&path, &user.token, json!({ "country": "België" }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["name"], "Brasserie d'Achouffe");
    assert_eq!(updated["country"], "België");

    let (status, _) = app.delete(&path, &user.token).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = app.get(&path, &user.token).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_deleting_brewery_orphans_its_beers() {
    let app = TestApp::new();
    let user = app.register_user().await;

    let (_, brewery) = app
        .post(
            "/api/breweries",
            &user.token,
            json!({ "name": "Brouwerij Bosteels", "country": "Belgium" }),
        )
        .await;
    let brewery_id = brewery["id"].as_str().unwrap();

    let (status, beer) = app
        .post(
            "/api/beers",
            &user.token,
            json!({ "name": "Tripel Karmeliet", "percentage": 8.4, "breweryId": brewery_id }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(beer["brewery_id"], brewery_id);

    app.delete(&format!("/api/breweries/{brewery_id}"), &user.token)
        .await;

    let (status, beer) = app
        .get(
            &format!("/api/beers/{}", beer["id"].as_str().unwrap()),
            &user.token,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(beer["brewery_id"].is_null());
}

#[tokio::test]
async fn test_missing_country_is_rejected() {
    let app = TestApp::new();
    let user = app.register_user().await;

    let (status, _) = app
        .post("/api/breweries", &user.token, json!({ "name": "Nameless" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
