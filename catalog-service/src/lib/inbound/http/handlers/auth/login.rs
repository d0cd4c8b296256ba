use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use axum_extra::extract::cookie::Cookie;
use axum_extra::extract::cookie::SameSite;
use axum_extra::extract::CookieJar;
use serde::Deserialize;
use serde::Serialize;

use crate::domain::user::models::Role;
use crate::domain::user::models::Username;
use crate::domain::user::ports::UserServicePort;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::handlers::ApiSuccess;
use crate::inbound::http::middleware::SESSION_COOKIE;
use crate::inbound::http::router::AppState;

/// Verify credentials, then hand the session token back both in the body
/// and as an http-only cookie.
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(body): Json<LoginRequest>,
) -> Result<(CookieJar, ApiSuccess<LoginResponseData>), ApiError> {
    let username = Username::new(&body.username)
        .map_err(|_| ApiError::Unauthorized("invalid credentials".to_string()))?;

    let user = state
        .user_service
        .authenticate(&username, &body.password)
        .await?;

    let claims = auth::Claims::for_user(
        user.id,
        user.username.as_str(),
        user.role,
        state.jwt_expiration_hours,
    );

    let token = state
        .authenticator
        .generate_token(&claims)
        .map_err(|e| ApiError::InternalServerError(format!("Token generation failed: {}", e)))?;

    tracing::info!(user_id = %user.id, role = %user.role, "User logged in");

    let cookie = Cookie::build((SESSION_COOKIE, token.clone()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax);

    Ok((
        jar.add(cookie),
        ApiSuccess::new(
            StatusCode::OK,
            LoginResponseData {
                message: "logged_in".to_string(),
                role: user.role,
                token,
            },
        ),
    ))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    username: String,
    #[serde(default)]
    password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoginResponseData {
    pub message: String,
    pub role: Role,
    pub token: String,
}
