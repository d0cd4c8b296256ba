use async_trait::async_trait;

use crate::domain::category::errors::CategoryError;
use crate::domain::category::models::Category;
use crate::domain::category::models::CategoryId;
use crate::domain::category::models::CategoryName;

/// Port for category domain service operations.
#[async_trait]
pub trait CategoryServicePort: Send + Sync + 'static {
    /// List all categories ordered by name.
    async fn list_categories(&self) -> Result<Vec<Category>, CategoryError>;

    /// Create a category.
    ///
    /// # Errors
    /// * `AlreadyExists` - A category with this name exists
    /// * `DatabaseError` - Database operation failed
    async fn create_category(&self, name: CategoryName) -> Result<Category, CategoryError>;

    /// Rename a category.
    ///
    /// # Errors
    /// * `NotFound` - Category does not exist
    /// * `AlreadyExists` - Another category already has this name
    /// * `DatabaseError` - Database operation failed
    async fn rename_category(
        &self,
        id: &CategoryId,
        name: CategoryName,
    ) -> Result<Category, CategoryError>;

    /// Delete a category. Products in it become uncategorized.
    ///
    /// # Errors
    /// * `NotFound` - Category does not exist
    /// * `DatabaseError` - Database operation failed
    async fn delete_category(&self, id: &CategoryId) -> Result<(), CategoryError>;

    /// Create the category unless one with this name exists.
    ///
    /// # Returns
    /// True when a category was created
    async fn ensure_category(&self, name: CategoryName) -> Result<bool, CategoryError>;
}

/// Persistence operations for categories.
#[async_trait]
pub trait CategoryRepository: Send + Sync + 'static {
    /// Retrieve all categories ordered by name.
    async fn list_all(&self) -> Result<Vec<Category>, CategoryError>;

    /// Retrieve category by identifier.
    async fn find_by_id(&self, id: &CategoryId) -> Result<Option<Category>, CategoryError>;

    /// Retrieve category by exact name.
    async fn find_by_name(&self, name: &CategoryName) -> Result<Option<Category>, CategoryError>;

    /// Persist a new category.
    ///
    /// # Errors
    /// * `AlreadyExists` - Name uniqueness violated
    async fn create(&self, category: Category) -> Result<Category, CategoryError>;

    /// Update an existing category.
    ///
    /// # Errors
    /// * `NotFound` - Category does not exist
    /// * `AlreadyExists` - Name uniqueness violated
    async fn update(&self, category: Category) -> Result<Category, CategoryError>;

    /// Remove a category.
    ///
    /// # Errors
    /// * `NotFound` - Category does not exist
    async fn delete(&self, id: &CategoryId) -> Result<(), CategoryError>;
}
