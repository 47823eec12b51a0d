/// Authentication endpoints
///
/// # Endpoints
///
/// - `POST /v1/auth/register` - Register new user
/// - `POST /v1/auth/login` - Login and get tokens
/// - `POST /v1/auth/refresh` - Refresh access token

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use teamtask_shared::auth::{
    jwt::{self, Claims, TokenType},
    Identity,
};
use validator::Validate;

use crate::{
    app::AppState,
    error::{validation_details, ApiResult},
};

/// Register request
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Username (unique)
    #[validate(length(min = 3, max = 50, message = "Username must be 3-50 characters"))]
    pub username: String,

    /// Password
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
}

/// Login request
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    /// Username
    pub username: String,

    /// Password
    pub password: String,
}

/// Token pair returned by register and login
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    /// User ID
    pub user_id: String,

    /// Username
    pub username: String,

    /// Access token (24h)
    pub access_token: String,

    /// Refresh token (30d)
    pub refresh_token: String,
}

/// Refresh token request
#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    /// Refresh token
    pub refresh_token: String,
}

/// Refresh token response
#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    /// New access token (24h)
    pub access_token: String,
}

fn issue_tokens(
    user_id: uuid::Uuid,
    username: String,
    secret: &str,
) -> ApiResult<AuthResponse> {
    let access_claims = Claims::new(user_id, TokenType::Access);
    let access_token = jwt::create_token(&access_claims, secret)?;

    let refresh_claims = Claims::new(user_id, TokenType::Refresh);
    let refresh_token = jwt::create_token(&refresh_claims, secret)?;

    Ok(AuthResponse {
        user_id: user_id.to_string(),
        username,
        access_token,
        refresh_token,
    })
}

/// Register a new user
///
/// # Endpoint
///
/// ```text
/// POST /v1/auth/register
/// Content-Type: application/json
///
/// {
///   "username": "alice",
///   "password": "correct-horse-battery"
/// }
/// ```
///
/// # Errors
///
/// - `422 Unprocessable Entity`: Validation failed
/// - `409 Conflict`: Username already exists
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<AuthResponse>)> {
    req.validate().map_err(validation_details)?;

    let identity = Identity::new(state.store.as_ref());
    let user = identity.register(&req.username, &req.password).await?;

    let response = issue_tokens(user.id, user.username, state.jwt_secret())?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// Login with username and password
///
/// Unknown username and wrong password produce the same 401; there is
/// no signal about which credential was wrong.
///
/// # Errors
///
/// - `401 Unauthorized`: Invalid credentials
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<AuthResponse>> {
    let identity = Identity::new(state.store.as_ref());
    let user = identity
        .verify_credential(&req.username, &req.password)
        .await?;

    let response = issue_tokens(user.id, user.username, state.jwt_secret())?;
    Ok(Json(response))
}

/// Refresh an access token
///
/// # Errors
///
/// - `401 Unauthorized`: Refresh token invalid or expired
pub async fn refresh(
    State(state): State<AppState>,
    Json(req): Json<RefreshRequest>,
) -> ApiResult<Json<RefreshResponse>> {
    let access_token = jwt::refresh_access_token(&req.refresh_token, state.jwt_secret())?;

    Ok(Json(RefreshResponse { access_token }))
}
