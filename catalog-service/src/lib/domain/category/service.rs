use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::category::errors::CategoryError;
use crate::domain::category::models::Category;
use crate::domain::category::models::CategoryId;
use crate::domain::category::models::CategoryName;
use crate::domain::category::ports::CategoryRepository;
use crate::domain::category::ports::CategoryServicePort;

/// Domain service implementation for category operations.
pub struct CategoryService<CR>
where
    CR: CategoryRepository,
{
    repository: Arc<CR>,
}

impl<CR> CategoryService<CR>
where
    CR: CategoryRepository,
{
    pub fn new(repository: Arc<CR>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl<CR> CategoryServicePort for CategoryService<CR>
where
    CR: CategoryRepository,
{
    async fn list_categories(&self) -> Result<Vec<Category>, CategoryError> {
        self.repository.list_all().await
    }

    async fn create_category(&self, name: CategoryName) -> Result<Category, CategoryError> {
        if self.repository.find_by_name(&name).await?.is_some() {
            return Err(CategoryError::AlreadyExists(name.to_string()));
        }

        let category = self
            .repository
            .create(Category {
                id: CategoryId::new(),
                name,
            })
            .await?;

        tracing::info!(category_id = %category.id, name = %category.name, "Category created");

        Ok(category)
    }

    async fn rename_category(
        &self,
        id: &CategoryId,
        name: CategoryName,
    ) -> Result<Category, CategoryError> {
        let mut category = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or(CategoryError::NotFound(id.to_string()))?;

        category.name = name;

        self.repository.update(category).await
    }

    async fn delete_category(&self, id: &CategoryId) -> Result<(), CategoryError> {
        self.repository.delete(id).await?;

        tracing::info!(category_id = %id, "Category deleted");

        Ok(())
    }

    async fn ensure_category(&self, name: CategoryName) -> Result<bool, CategoryError> {
        match self.create_category(name).await {
            Ok(_) => Ok(true),
            Err(CategoryError::AlreadyExists(_)) => Ok(false),
            Err(e) => Err(e),
        }
    }
}
