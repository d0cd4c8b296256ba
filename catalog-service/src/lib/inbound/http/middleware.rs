use axum::extract::Request;
use axum::extract::State;
use axum::http::header;
use axum::middleware::Next;
use axum::response::Response;
use axum_extra::extract::CookieJar;

use crate::domain::user::models::Role;
use crate::domain::user::models::UserId;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::router::AppState;

/// Cookie carrying the session token for browser clients.
pub const SESSION_COOKIE: &str = "session";

/// Caller identity resolved from the session token of the current request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub user_id: UserId,
    pub username: String,
    pub role: Role,
}

impl AuthenticatedUser {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// # Errors
    /// * `Forbidden` - Caller is not an administrator
    pub fn require_admin(&self) -> Result<(), ApiError> {
        if self.is_admin() {
            Ok(())
        } else {
            tracing::debug!(user_id = %self.user_id, "Admin route refused");
            Err(ApiError::Forbidden("forbidden".to_string()))
        }
    }
}

/// Middleware that validates the session token and adds the caller to
/// request extensions.
///
/// The token is read from `Authorization: Bearer` first, then from the
/// session cookie.
pub async fn authenticate(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_token(&req)?;

    let claims: auth::Claims = state.authenticator.validate_token(&token).map_err(|e| {
        tracing::warn!(error = %e, "Session token rejected");
        ApiError::Unauthorized("invalid or expired token".to_string())
    })?;

    let user = authenticated_user(&claims).ok_or_else(|| {
        tracing::warn!("Session token is missing identity claims");
        ApiError::Unauthorized("invalid token format".to_string())
    })?;

    req.extensions_mut().insert(user);

    Ok(next.run(req).await)
}

fn authenticated_user(claims: &auth::Claims) -> Option<AuthenticatedUser> {
    let user_id = UserId::from_string(claims.sub.as_deref()?).ok()?;
    let username = claims.username()?;
    let role = claims.role()?.parse().ok()?;

    Some(AuthenticatedUser {
        user_id,
        username,
        role,
    })
}

fn extract_token(req: &Request) -> Result<String, ApiError> {
    if let Some(value) = req.headers().get(header::AUTHORIZATION) {
        let value = value
            .to_str()
            .map_err(|_| ApiError::Unauthorized("invalid authorization header".to_string()))?;

        return value
            .strip_prefix("Bearer ")
            .map(|token| token.trim().to_string())
            .ok_or_else(|| {
                ApiError::Unauthorized(
                    "invalid authorization header format, expected: Bearer <token>".to_string(),
                )
            });
    }

    CookieJar::from_headers(req.headers())
        .get(SESSION_COOKIE)
        .map(|cookie| cookie.value().to_string())
        .ok_or_else(|| ApiError::Unauthorized("login required".to_string()))
}
