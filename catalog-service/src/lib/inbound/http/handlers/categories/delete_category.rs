use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;

use super::parse_category_id;
use crate::domain::category::ports::CategoryServicePort;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::handlers::ApiSuccess;
use crate::inbound::http::handlers::MessageData;
use crate::inbound::http::middleware::AuthenticatedUser;
use crate::inbound::http::router::AppState;

pub async fn delete_category(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthenticatedUser>,
    Path(category_id): Path<String>,
) -> Result<ApiSuccess<MessageData>, ApiError> {
    caller.require_admin()?;

    let id = parse_category_id(&category_id)?;

    state
        .category_service
        .delete_category(&id)
        .await
        .map_err(ApiError::from)
        .map(|_| ApiSuccess::new(StatusCode::OK, MessageData::new("deleted")))
}
