//! Property-based tests for the authentication and role gates
//!
//! Every protected route must answer 401 for anything but a valid bearer
//! token, and admin routes must answer 403 to authenticated non-admins.

#[cfg(test)]
mod tests {
    use crate::config::AppConfig;
    use crate::repositories::Repositories;
    use crate::routes::create_router;
    use crate::state::AppState;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
        Router,
    };
    use beer_review_shared::Role;
    use chrono::Utc;
    use jsonwebtoken::{encode, EncodingKey, Header};
    use proptest::prelude::*;
    use serde_json::{json, Value};
    use tower::ServiceExt;
    use uuid::Uuid;

    fn create_test_state() -> AppState {
        AppState::new(AppConfig::for_tests(), Repositories::in_memory()).unwrap()
    }

    async fn send(app: Router, uri: &str, auth_header: Option<String>) -> (StatusCode, Value) {
        let mut request_builder = Request::builder().uri(uri).method("GET");
        if let Some(header) = auth_header {
            request_builder = request_builder.header("Authorization", header);
        }

        let response = app
            .oneshot(request_builder.body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

        (status, body)
    }

    /// Sign arbitrary claims with the test secret
    fn sign(claims: Value) -> String {
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(AppConfig::for_tests().jwt.secret.as_bytes()),
        )
        .unwrap()
    }

    /// Generate random invalid tokens
    fn invalid_token_strategy() -> impl Strategy<Value = String> {
        prop_oneof![
            // Empty token
            Just("".to_string()),
            // Random string (not a valid JWT)
            "[a-zA-Z0-9]{10,50}",
            // Malformed JWT (wrong number of parts)
            "[a-zA-Z0-9]{10}\\.[a-zA-Z0-9]{10}",
            // Valid shape, bogus content
            "[a-zA-Z0-9_-]{20}\\.[a-zA-Z0-9_-]{20}\\.[a-zA-Z0-9_-]{20}",
        ]
    }

    /// Generate random authorization header formats
    fn auth_header_strategy() -> impl Strategy<Value = Option<String>> {
        prop_oneof![
            Just(None),
            // Missing Bearer prefix
            invalid_token_strategy().prop_map(Some),
            // Wrong scheme
            invalid_token_strategy().prop_map(|t| Some(format!("Basic {}", t))),
            invalid_token_strategy().prop_map(|t| Some(format!("Bearer {}", t))),
        ]
    }

    fn protected_path_strategy() -> impl Strategy<Value = &'static str> {
        prop_oneof![
            Just("/api/beers"),
            Just("/api/breweries"),
            Just("/api/reviews"),
            Just("/api/users"),
            Just("/api/users/me"),
        ]
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Unauthenticated requests to protected endpoints return 401
        #[test]
        fn prop_unauthenticated_requests_return_401(
            auth_header in auth_header_strategy(),
            path in protected_path_strategy(),
        ) {
            let rt = tokio::runtime::Runtime::new().unwrap();
            rt.block_on(async {
                let app = create_router(create_test_state());
                let (status, body) = send(app, path, auth_header).await;

                prop_assert_eq!(status, StatusCode::UNAUTHORIZED);
                prop_assert_eq!(&body["code"], "UNAUTHORIZED");
                Ok(())
            })?;
        }
    }

    #[tokio::test]
    async fn test_missing_auth_header_returns_401() {
        let app = create_router(create_test_state());
        let (status, body) = send(app, "/api/beers", None).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["details"], json!({}));
    }

    #[tokio::test]
    async fn test_token_with_wrong_secret_reports_signature() {
        let state = create_test_state();
        let mut other = AppConfig::for_tests();
        other.jwt.secret = "a-completely-different-secret-value".to_string();
        let token = crate::auth::JwtService::new(&other.jwt)
            .issue(Uuid::new_v4(), &[Role::User])
            .unwrap();

        let (status, body) = send(
            create_router(state),
            "/api/beers",
            Some(format!("Bearer {}", token)),
        )
        .await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["details"]["reason"], "invalid_signature");
    }

    #[tokio::test]
    async fn test_expired_token_reports_expired() {
        let issued = Utc::now().timestamp() - 7200;
        let token = sign(json!({
            "sub": Uuid::new_v4().to_string(),
            "roles": ["user"],
            "iss": "beerreview.hogent.be",
            "aud": "beerreview.hogent.be",
            "iat": issued,
            "exp": issued + 60,
        }));

        let (status, body) = send(
            create_router(create_test_state()),
            "/api/beers",
            Some(format!("Bearer {}", token)),
        )
        .await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["details"]["reason"], "expired");
    }

    #[tokio::test]
    async fn test_foreign_audience_is_rejected() {
        let now = Utc::now().timestamp();
        let token = sign(json!({
            "sub": Uuid::new_v4().to_string(),
            "roles": ["admin", "user"],
            "iss": "beerreview.hogent.be",
            "aud": "some.other.app",
            "iat": now,
            "exp": now + 3600,
        }));

        let (status, body) = send(
            create_router(create_test_state()),
            "/api/users",
            Some(format!("Bearer {}", token)),
        )
        .await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["details"]["reason"], "invalid_audience");
    }

    #[tokio::test]
    async fn test_valid_token_passes_auth() {
        let state = create_test_state();
        let token = state.jwt().issue(Uuid::new_v4(), &[Role::User]).unwrap();

        let (status, body) = send(
            create_router(state),
            "/api/beers",
            Some(format!("Bearer {}", token)),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["count"], 0);
    }

    #[tokio::test]
    async fn test_user_role_is_forbidden_on_admin_routes() {
        let state = create_test_state();
        let token = state.jwt().issue(Uuid::new_v4(), &[Role::User]).unwrap();

        let (status, body) = send(
            create_router(state),
            "/api/users",
            Some(format!("Bearer {}", token)),
        )
        .await;

        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["code"], "FORBIDDEN");
    }

    #[tokio::test]
    async fn test_admin_role_passes_role_gate() {
        let state = create_test_state();
        let token = state
            .jwt()
            .issue(Uuid::new_v4(), &[Role::Admin, Role::User])
            .unwrap();

        let (status, _) = send(
            create_router(state),
            "/api/users",
            Some(format!("Bearer {}", token)),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_public_routes_need_no_token() {
        let app = create_router(create_test_state());
        let (status, body) = send(app, "/api/health/ping", None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["pong"], true);
    }

    #[tokio::test]
    async fn test_unknown_route_uses_envelope() {
        let (status, body) = send(create_router(create_test_state()), "/api/wines", None).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], "NOT_FOUND");
        assert_eq!(body["message"], "Unknown resource: /api/wines");
    }
}
