use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use serde::Serialize;

use crate::domain::user::models::Role;
use crate::domain::user::models::User;
use crate::domain::user::ports::UserServicePort;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::handlers::ApiSuccess;
use crate::inbound::http::middleware::AuthenticatedUser;
use crate::inbound::http::router::AppState;
use crate::user::errors::UserError;

pub async fn me(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthenticatedUser>,
) -> Result<ApiSuccess<MeResponseData>, ApiError> {
    state
        .user_service
        .get_user(&caller.user_id)
        .await
        .map_err(|e| match e {
            UserError::NotFound(_) => ApiError::Unauthorized("login required".to_string()),
            _ => ApiError::from(e),
        })
        .map(|ref user| ApiSuccess::new(StatusCode::OK, user.into()))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MeResponseData {
    pub id: String,
    pub username: String,
    pub role: Role,
}

impl From<&User> for MeResponseData {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.to_string(),
            username: user.username.as_str().to_string(),
            role: user.role,
        }
    }
}
