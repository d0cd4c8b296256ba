use axum::http::StatusCode;
use axum::Extension;
use axum_extra::extract::cookie::Cookie;
use axum_extra::extract::CookieJar;

use crate::inbound::http::handlers::ApiSuccess;
use crate::inbound::http::handlers::MessageData;
use crate::inbound::http::middleware::AuthenticatedUser;
use crate::inbound::http::middleware::SESSION_COOKIE;

/// Clear the session cookie. Tokens are stateless, so a bearer token
/// copied elsewhere stays valid until it expires.
pub async fn logout(
    Extension(user): Extension<AuthenticatedUser>,
    jar: CookieJar,
) -> (CookieJar, ApiSuccess<MessageData>) {
    tracing::info!(user_id = %user.user_id, "User logged out");

    (
        jar.remove(Cookie::build(SESSION_COOKIE).path("/")),
        ApiSuccess::new(StatusCode::OK, MessageData::new("logged_out")),
    )
}
