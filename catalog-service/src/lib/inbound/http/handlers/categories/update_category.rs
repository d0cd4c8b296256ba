use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use axum::Json;

use super::create_category::CategoryRequest;
use super::parse_category_id;
use super::CategoryData;
use crate::domain::category::models::CategoryName;
use crate::domain::category::ports::CategoryServicePort;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::handlers::ApiSuccess;
use crate::inbound::http::middleware::AuthenticatedUser;
use crate::inbound::http::router::AppState;

pub async fn update_category(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthenticatedUser>,
    Path(category_id): Path<String>,
    Json(body): Json<CategoryRequest>,
) -> Result<ApiSuccess<CategoryData>, ApiError> {
    caller.require_admin()?;

    let id = parse_category_id(&category_id)?;
    let name = CategoryName::new(&body.name).map_err(|e| ApiError::BadRequest(e.to_string()))?;

    state
        .category_service
        .rename_category(&id, name)
        .await
        .map_err(ApiError::from)
        .map(|ref category| ApiSuccess::new(StatusCode::OK, category.into()))
}
