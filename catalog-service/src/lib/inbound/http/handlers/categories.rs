use serde::Serialize;

use crate::domain::category::models::Category;
use crate::domain::category::models::CategoryId;
use crate::inbound::http::handlers::ApiError;

pub mod create_category;
pub mod delete_category;
pub mod list_categories;
pub mod update_category;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryData {
    pub id: String,
    pub name: String,
}

impl From<&Category> for CategoryData {
    fn from(category: &Category) -> Self {
        Self {
            id: category.id.to_string(),
            name: category.name.as_str().to_string(),
        }
    }
}

fn parse_category_id(raw: &str) -> Result<CategoryId, ApiError> {
    CategoryId::from_string(raw).map_err(|_| ApiError::NotFound("category not found".to_string()))
}
