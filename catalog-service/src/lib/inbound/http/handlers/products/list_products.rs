use axum::extract::Query;
use axum::extract::State;
use axum::http::StatusCode;
use serde::Deserialize;

use super::ProductListData;
use crate::domain::category::models::CategoryId;
use crate::domain::product::models::ProductFilter;
use crate::domain::product::ports::ProductServicePort;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::handlers::ApiSuccess;
use crate::inbound::http::router::AppState;

pub async fn list_products(
    State(state): State<AppState>,
    Query(params): Query<ListProductsParams>,
) -> Result<ApiSuccess<Vec<ProductListData>>, ApiError> {
    state
        .product_service
        .list_products(params.into_filter())
        .await
        .map_err(ApiError::from)
        .map(|products| {
            ApiSuccess::new(
                StatusCode::OK,
                products.iter().map(ProductListData::from).collect(),
            )
        })
}

/// Raw query string. Unparseable values are ignored rather than rejected.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ListProductsParams {
    query: Option<String>,
    category_id: Option<String>,
    in_stock: Option<String>,
}

impl ListProductsParams {
    fn into_filter(self) -> ProductFilter {
        ProductFilter {
            query: self
                .query
                .map(|q| q.trim().to_string())
                .filter(|q| !q.is_empty()),
            category_id: self
                .category_id
                .and_then(|id| CategoryId::from_string(&id).ok()),
            in_stock: match self.in_stock.as_deref() {
                Some("true") => Some(true),
                Some("false") => Some(false),
                _ => None,
            },
        }
    }
}
