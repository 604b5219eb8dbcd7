//! Authentication routes: login and the current principal.

use axum::{
    Router,
    extract::State,
    response::Response,
    routing::{get, post},
};
use hrms_core::auth::verify_password;
use hrms_db::UserRepository;
use hrms_shared::{AppError, FieldErrors, LoginRequest, LoginResponse, UserInfo};
use tracing::info;

use crate::AppState;
use crate::error::{ApiError, ApiResult};
use crate::extractors::JsonBody;
use crate::middleware::AuthUser;
use crate::response;

/// Public auth routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/auth/login", post(login))
}

/// Auth routes behind the middleware.
pub fn protected_routes() -> Router<AppState> {
    Router::new().route("/auth/me", get(me))
}

fn invalid_credentials() -> ApiError {
    ApiError(AppError::Unauthorized("Invalid email or password".into()))
}

/// POST /auth/login - Exchange email and password for an access token.
async fn login(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<LoginRequest>,
) -> ApiResult<Response> {
    let mut errors = FieldErrors::new();
    if payload.email.trim().is_empty() {
        errors.add("email", "The email field is required.");
    }
    if payload.password.is_empty() {
        errors.add("password", "The password field is required.");
    }
    errors.into_result()?;

    let user_repo = UserRepository::new(state.conn());
    let Some(user) = user_repo.find_by_email(payload.email.trim()).await? else {
        info!(email = %payload.email, "Login attempt for non-existent user");
        return Err(invalid_credentials());
    };

    if !user.is_active {
        return Err(ApiError(AppError::Unauthorized(
            "This account has been disabled".into(),
        )));
    }

    if !verify_password(&payload.password, &user.password_hash)? {
        info!(user_id = user.id, "Failed login attempt - invalid password");
        return Err(invalid_credentials());
    }

    let access_token = state
        .jwt_service
        .generate_access_token(user.id, &user.email, &user.role)
        .map_err(|e| ApiError(AppError::Internal(e.to_string())))?;

    info!(user_id = user.id, "User logged in");
    Ok(response::ok(
        "Login successful",
        LoginResponse {
            user: UserInfo {
                id: user.id,
                email: user.email,
                name: user.name,
                role: user.role,
            },
            access_token,
            token_type: "Bearer",
            expires_in: state.jwt_service.access_token_expires_in(),
        },
    ))
}

/// GET /auth/me - The authenticated user.
async fn me(State(state): State<AppState>, auth: AuthUser) -> ApiResult<Response> {
    let user = UserRepository::new(state.conn())
        .find_by_id(auth.user_id())
        .await?
        .filter(|u| u.is_active)
        .ok_or_else(|| ApiError(AppError::Unauthorized("Account no longer active".into())))?;

    Ok(response::ok(
        "Authenticated user",
        UserInfo {
            id: user.id,
            email: user.email,
            name: user.name,
            role: user.role,
        },
    ))
}
