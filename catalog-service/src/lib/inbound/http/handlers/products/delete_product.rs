use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;

use super::parse_product_id;
use crate::domain::product::ports::ProductServicePort;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::handlers::ApiSuccess;
use crate::inbound::http::handlers::MessageData;
use crate::inbound::http::middleware::AuthenticatedUser;
use crate::inbound::http::router::AppState;

pub async fn delete_product(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthenticatedUser>,
    Path(product_id): Path<String>,
) -> Result<ApiSuccess<MessageData>, ApiError> {
    caller.require_admin()?;

    let id = parse_product_id(&product_id)?;

    state
        .product_service
        .delete_product(&id)
        .await
        .map_err(ApiError::from)
        .map(|_| ApiSuccess::new(StatusCode::OK, MessageData::new("deleted")))
}
