//! User routes
//!
//! Login and registration are public. `/me` needs a token; everything else
//! here is admin only.

use super::extract::{JsonBody, Paginated, PathId};
use crate::auth::{require_admin, AuthUser};
use crate::error::ApiResult;
use crate::services::UserService;
use crate::state::AppState;
use axum::{
    extract::State,
    http::StatusCode,
    middleware,
    routing::{get, post},
    Json, Router,
};
use beer_review_shared::{
    AuthSession, ListResponse, LoginRequest, RegisterRequest, UpdateUserRequest, User,
};

/// Routes reachable without a token
pub fn public_user_routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(login))
        .route("/register", post(register))
}

/// Routes behind the authentication gate
pub fn user_routes() -> Router<AppState> {
    let admin = Router::new()
        .route("/", get(get_all_users))
        .route("/:id", get(get_user_by_id).put(update_user).delete(delete_user))
        .route_layer(middleware::from_fn(require_admin));

    Router::new().route("/me", get(get_profile)).merge(admin)
}

/// POST /api/users/login
async fn login(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<LoginRequest>,
) -> ApiResult<Json<AuthSession>> {
    let session = UserService::login(&state, req).await?;
    Ok(Json(session))
}

/// POST /api/users/register
async fn register(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<AuthSession>)> {
    let session = UserService::register(&state, req).await?;
    Ok((StatusCode::CREATED, Json(session)))
}

/// GET /api/users/me
async fn get_profile(State(state): State<AppState>, auth: AuthUser) -> ApiResult<Json<User>> {
    let user = UserService::get_profile(&state, auth.user_id).await?;
    Ok(Json(user))
}

async fn get_all_users(
    State(state): State<AppState>,
    Paginated(page): Paginated,
) -> ApiResult<Json<ListResponse<User>>> {
    Ok(Json(UserService::get_all(&state, page).await?))
}

async fn get_user_by_id(
    State(state): State<AppState>,
    PathId(id): PathId,
) -> ApiResult<Json<User>> {
    Ok(Json(UserService::get_by_id(&state, id).await?))
}

async fn update_user(
    State(state): State<AppState>,
    PathId(id): PathId,
    JsonBody(req): JsonBody<UpdateUserRequest>,
) -> ApiResult<Json<User>> {
    Ok(Json(UserService::update_by_id(&state, id, req).await?))
}

async fn delete_user(State(state): State<AppState>, PathId(id): PathId) -> ApiResult<StatusCode> {
    UserService::delete_by_id(&state, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
