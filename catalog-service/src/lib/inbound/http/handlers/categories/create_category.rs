use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use axum::Json;
use serde::Deserialize;

use super::CategoryData;
use crate::domain::category::models::CategoryName;
use crate::domain::category::ports::CategoryServicePort;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::handlers::ApiSuccess;
use crate::inbound::http::middleware::AuthenticatedUser;
use crate::inbound::http::router::AppState;

pub async fn create_category(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthenticatedUser>,
    Json(body): Json<CategoryRequest>,
) -> Result<ApiSuccess<CategoryData>, ApiError> {
    caller.require_admin()?;

    let name = CategoryName::new(&body.name).map_err(|e| ApiError::BadRequest(e.to_string()))?;

    state
        .category_service
        .create_category(name)
        .await
        .map_err(ApiError::from)
        .map(|ref category| ApiSuccess::new(StatusCode::CREATED, category.into()))
}

/// Request body shared by category create and rename.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CategoryRequest {
    #[serde(default)]
    pub name: String,
}
