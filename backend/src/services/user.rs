//! User service for authentication and user management
//!
//! Password hashing and verification run on the blocking thread pool.

use crate::config::AdminConfig;
use crate::error::{ApiError, ApiResult};
use crate::repositories::{NewUser, UserChanges, UserRecord};
use crate::state::AppState;
use beer_review_shared::validation::normalize_email;
use beer_review_shared::{
    AuthSession, ListResponse, LoginRequest, Page, RegisterRequest, Role, UpdateUserRequest, User,
};
use tracing::{debug, info};
use uuid::Uuid;
use validator::Validate;

const INVALID_CREDENTIALS: &str = "Invalid email or password";

/// User service for authentication operations
pub struct UserService;

impl UserService {
    /// Exchange credentials for a token.
    ///
    /// An unknown email and a wrong password fail identically.
    pub async fn login(state: &AppState, input: LoginRequest) -> ApiResult<AuthSession> {
        input.validate()?;
        let email = normalize_email(&input.email);
        debug!(%email, "Logging in");

        let user = state
            .repositories()
            .users
            .find_by_email(&email)
            .await?
            .ok_or_else(|| ApiError::Unauthorized(INVALID_CREDENTIALS.to_string()))?;

        let valid = state
            .passwords()
            .verify_async(input.password, user.password_hash.clone())
            .await
            .map_err(ApiError::Internal)?;

        if !valid {
            return Err(ApiError::Unauthorized(INVALID_CREDENTIALS.to_string()));
        }

        Self::session(state, &user)
    }

    /// Create an account with the `user` role and sign it in
    pub async fn register(state: &AppState, input: RegisterRequest) -> ApiResult<AuthSession> {
        input.validate()?;
        let email = normalize_email(&input.email);
        debug!(%email, "Registering user");

        let users = &state.repositories().users;
        if users.find_by_email(&email).await?.is_some() {
            return Err(ApiError::Conflict(
                "There is already a user with this email address".to_string(),
            ));
        }

        let password_hash = state
            .passwords()
            .hash_async(input.password)
            .await
            .map_err(ApiError::Internal)?;

        // A concurrent registration still hits the unique index and maps to 409
        let user = users
            .create(NewUser {
                name: input.name,
                email,
                password_hash,
                roles: vec![Role::User],
            })
            .await?;

        Self::session(state, &user)
    }

    fn session(state: &AppState, user: &UserRecord) -> ApiResult<AuthSession> {
        let user = user.to_user();
        let token = state
            .jwt()
            .issue(user.id, &user.roles)
            .map_err(ApiError::Internal)?;

        Ok(AuthSession { token, user })
    }

    pub async fn get_all(state: &AppState, page: Page) -> ApiResult<ListResponse<User>> {
        debug!(limit = page.limit, offset = page.offset, "Fetching all users");
        let users = &state.repositories().users;
        let data = users
            .find_all(page)
            .await?
            .iter()
            .map(UserRecord::to_user)
            .collect();
        let count = users.count().await?;

        Ok(ListResponse::new(data, count, page))
    }

    pub async fn get_by_id(state: &AppState, id: Uuid) -> ApiResult<User> {
        debug!(%id, "Fetching user");
        state
            .repositories()
            .users
            .find_by_id(id)
            .await?
            .map(|user| user.to_user())
            .ok_or_else(|| not_found(id))
    }

    /// Profile of the authenticated caller
    pub async fn get_profile(state: &AppState, user_id: Uuid) -> ApiResult<User> {
        Self::get_by_id(state, user_id).await
    }

    pub async fn update_by_id(
        state: &AppState,
        id: Uuid,
        input: UpdateUserRequest,
    ) -> ApiResult<User> {
        input.validate()?;
        debug!(%id, "Updating user");

        state
            .repositories()
            .users
            .update(
                id,
                UserChanges {
                    name: input.name,
                    email: input.email.as_deref().map(normalize_email),
                    roles: None,
                },
            )
            .await?
            .map(|user| user.to_user())
            .ok_or_else(|| not_found(id))
    }

    /// Removes the user and their reviews
    pub async fn delete_by_id(state: &AppState, id: Uuid) -> ApiResult<()> {
        debug!(%id, "Deleting user");
        match state.repositories().users.delete(id).await? {
            0 => Err(not_found(id)),
            _ => Ok(()),
        }
    }

    /// Make sure the configured administrator exists with the admin role
    pub async fn ensure_admin(state: &AppState, admin: &AdminConfig) -> ApiResult<User> {
        let email = normalize_email(&admin.email);
        let users = &state.repositories().users;
        let roles = vec![Role::Admin, Role::User];

        if let Some(existing) = users.find_by_email(&email).await? {
            let current = existing.to_user();
            if current.has_role(Role::Admin) {
                return Ok(current);
            }
            info!(%email, "Granting admin role to existing user");
            let updated = users
                .update(
                    existing.id,
                    UserChanges {
                        roles: Some(roles),
                        ..Default::default()
                    },
                )
                .await?
                .ok_or_else(|| not_found(existing.id))?;
            return Ok(updated.to_user());
        }

        let password_hash = state
            .passwords()
            .hash_async(admin.password.clone())
            .await
            .map_err(ApiError::Internal)?;
        let created = users
            .create(NewUser {
                name: admin.name.clone(),
                email: email.clone(),
                password_hash,
                roles,
            })
            .await?;

        info!(%email, "Created admin account");
        Ok(created.to_user())
    }
}

fn not_found(id: Uuid) -> ApiError {
    ApiError::NotFound(format!("No user with id {} exists", id))
}
