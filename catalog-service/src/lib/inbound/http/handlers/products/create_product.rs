use axum::extract::Multipart;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use serde::Serialize;

use super::ProductForm;
use crate::domain::product::ports::ProductServicePort;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::handlers::ApiSuccess;
use crate::inbound::http::middleware::AuthenticatedUser;
use crate::inbound::http::router::AppState;

pub async fn create_product(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthenticatedUser>,
    multipart: Multipart,
) -> Result<ApiSuccess<CreateProductResponseData>, ApiError> {
    caller.require_admin()?;

    let command = ProductForm::from_multipart(multipart)
        .await?
        .into_create_command()?;

    state
        .product_service
        .create_product(command)
        .await
        .map_err(ApiError::from)
        .map(|product| {
            ApiSuccess::new(
                StatusCode::CREATED,
                CreateProductResponseData {
                    id: product.id.to_string(),
                },
            )
        })
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateProductResponseData {
    pub id: String,
}
