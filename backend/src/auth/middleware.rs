//! Authentication and authorization gates
//!
//! `require_authentication` is layered outermost on protected routers and
//! attaches an [`AuthUser`] to the request. `require_role` runs after it
//! and fails closed: no identity means no access.

use crate::auth::TokenError;
use crate::error::ApiError;
use crate::state::AppState;
use axum::{
    extract::{FromRef, Request, State},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};
use beer_review_shared::Role;
use tracing::debug;
use uuid::Uuid;

/// Authenticated caller, taken from a verified token
#[derive(Debug, Clone, PartialEq)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub roles: Vec<Role>,
}

impl AuthUser {
    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }

    pub fn is_admin(&self) -> bool {
        self.has_role(Role::Admin)
    }
}

fn authenticate(state: &AppState, headers: &HeaderMap) -> Result<AuthUser, ApiError> {
    let auth_header = headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| ApiError::Unauthorized("You need to be signed in".to_string()))?;

    let token = match auth_header.split_once(' ') {
        Some((scheme, token)) if scheme.eq_ignore_ascii_case("bearer") => token,
        _ => return Err(ApiError::Token(TokenError::Malformed)),
    };

    let claims = state.jwt().verify(token.trim())?;
    let user_id = claims.user_id()?;

    Ok(AuthUser {
        user_id,
        roles: claims.roles,
    })
}

#[axum::async_trait]
impl<S> axum::extract::FromRequestParts<S> for AuthUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        // Reuse the identity attached by the gate
        if let Some(user) = parts.extensions.get::<AuthUser>() {
            return Ok(user.clone());
        }

        let app_state = AppState::from_ref(state);
        authenticate(&app_state, &parts.headers)
    }
}

/// Reject requests without a valid bearer token
pub async fn require_authentication(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let user = authenticate(&state, request.headers())?;
    request.extensions_mut().insert(user);

    Ok(next.run(request).await)
}

/// Reject requests whose caller lacks `role`
pub async fn require_role(role: Role, request: Request, next: Next) -> Result<Response, ApiError> {
    let allowed = request
        .extensions()
        .get::<AuthUser>()
        .map(|user| user.has_role(role))
        .unwrap_or(false);

    if !allowed {
        debug!(%role, path = %request.uri().path(), "Role gate refused request");
        return Err(ApiError::Forbidden(
            "You are not allowed to view this part of the application".to_string(),
        ));
    }

    Ok(next.run(request).await)
}

/// Admin role authorization middleware
pub async fn require_admin(request: Request, next: Next) -> Result<Response, ApiError> {
    require_role(Role::Admin, request, next).await
}
