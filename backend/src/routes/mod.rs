//! Route definitions for the Beer Review API
//!
//! This module organizes all API routes and applies middleware.

use crate::auth::require_authentication;
use crate::config::CorsConfig;
use crate::error::ApiError;
use crate::state::AppState;
use axum::{
    http::{header, HeaderValue, Method, StatusCode, Uri},
    middleware,
    response::{IntoResponse, Response},
    Router,
};
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{AllowOrigin, CorsLayer},
    limit::RequestBodyLimitLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::warn;

mod beers;
mod breweries;
mod extract;
mod health;
mod reviews;
mod users;

#[cfg(test)]
mod auth_tests;

pub use beers::beer_routes;
pub use breweries::brewery_routes;
pub use health::health_routes;
pub use reviews::review_routes;
pub use users::{public_user_routes, user_routes};

/// Create the main application router with all middleware
pub fn create_router(state: AppState) -> Router {
    let config = state.config().clone();

    Router::new()
        .nest("/api", api_routes(state.clone()))
        .fallback(unknown_resource)
        // Apply middleware layers
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(RequestBodyLimitLayer::new(config.server.body_limit_bytes))
        .layer(middleware::map_response(envelope_bare_errors))
        .layer(cors_layer(&config.cors))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn api_routes(state: AppState) -> Router<AppState> {
    let protected = Router::new()
        .nest("/beers", beers::beer_routes())
        .nest("/breweries", breweries::brewery_routes())
        .nest("/reviews", reviews::review_routes())
        .nest("/users", users::user_routes())
        .route_layer(middleware::from_fn_with_state(state, require_authentication));

    Router::new()
        .nest("/health", health::health_routes())
        .nest("/users", users::public_user_routes())
        .merge(protected)
}

fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(%origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::ACCEPT, header::CONTENT_TYPE, header::AUTHORIZATION])
        .max_age(Duration::from_secs(config.max_age_secs))
}

async fn unknown_resource(uri: Uri) -> ApiError {
    ApiError::NotFound(format!("Unknown resource: {}", uri.path()))
}

/// Wrap the router's and the body limit's plain responses in the error envelope
async fn envelope_bare_errors(response: Response) -> Response {
    let is_json = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.starts_with("application/json"));
    if is_json {
        return response;
    }

    match response.status() {
        StatusCode::METHOD_NOT_ALLOWED => {
            let allow = response.headers().get(header::ALLOW).cloned();
            let mut enveloped =
                ApiError::MethodNotAllowed("This method is not supported here".to_string())
                    .into_response();
            if let Some(allow) = allow {
                enveloped.headers_mut().insert(header::ALLOW, allow);
            }
            enveloped
        }
        StatusCode::PAYLOAD_TOO_LARGE => ApiError::PayloadTooLarge.into_response(),
        _ => response,
    }
}
