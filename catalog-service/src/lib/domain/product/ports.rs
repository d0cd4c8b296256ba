use async_trait::async_trait;

use crate::domain::product::errors::ImageStoreError;
use crate::domain::product::errors::ProductError;
use crate::domain::product::models::CreateProductCommand;
use crate::domain::product::models::Product;
use crate::domain::product::models::ProductFilter;
use crate::domain::product::models::ProductId;
use crate::domain::product::models::ProductImage;
use crate::domain::product::models::UpdateProductCommand;

/// Port for product domain service operations.
#[async_trait]
pub trait ProductServicePort: Send + Sync + 'static {
    /// List products matching the filter, newest first.
    async fn list_products(&self, filter: ProductFilter) -> Result<Vec<Product>, ProductError>;

    /// # Errors
    /// * `NotFound` - Product does not exist
    async fn get_product(&self, id: &ProductId) -> Result<Product, ProductError>;

    /// Store the uploaded images and create the product.
    ///
    /// # Errors
    /// * `MissingImage` - No image supplied
    /// * `InvalidImageType` - An image has a disallowed extension
    /// * `CategoryNotFound` - Referenced category does not exist
    /// * `ImageStorage` - Writing an image failed
    /// * `DatabaseError` - Database operation failed
    async fn create_product(&self, command: CreateProductCommand) -> Result<Product, ProductError>;

    /// Apply the present fields and append any uploaded images.
    ///
    /// # Errors
    /// * `NotFound` - Product does not exist
    /// * `InvalidImageType` - An image has a disallowed extension
    /// * `CategoryNotFound` - Referenced category does not exist
    async fn update_product(
        &self,
        id: &ProductId,
        command: UpdateProductCommand,
    ) -> Result<Product, ProductError>;

    /// Delete the product together with its image rows.
    ///
    /// # Errors
    /// * `NotFound` - Product does not exist
    async fn delete_product(&self, id: &ProductId) -> Result<(), ProductError>;
}

/// Persistence operations for products and their image rows.
#[async_trait]
pub trait ProductRepository: Send + Sync + 'static {
    async fn list(&self, filter: &ProductFilter) -> Result<Vec<Product>, ProductError>;

    async fn find_by_id(&self, id: &ProductId) -> Result<Option<Product>, ProductError>;

    /// Insert the product and its images atomically.
    ///
    /// # Errors
    /// * `CategoryNotFound` - Foreign key to categories violated
    async fn create(&self, product: Product) -> Result<Product, ProductError>;

    /// Update product columns and append `new_images` atomically.
    ///
    /// # Errors
    /// * `NotFound` - Product does not exist
    /// * `CategoryNotFound` - Foreign key to categories violated
    async fn update(
        &self,
        product: Product,
        new_images: Vec<ProductImage>,
    ) -> Result<Product, ProductError>;

    /// # Errors
    /// * `NotFound` - Product does not exist
    async fn delete(&self, id: &ProductId) -> Result<(), ProductError>;
}

/// Storage for uploaded image bytes.
#[async_trait]
pub trait ImageStore: Send + Sync + 'static {
    /// Write the bytes under a fresh unique name with the given extension.
    ///
    /// # Returns
    /// The stored file name, `<uuid-hex>.<extension>`
    async fn save(&self, extension: &str, bytes: &[u8]) -> Result<String, ImageStoreError>;

    /// Remove a previously stored file.
    async fn remove(&self, file_name: &str) -> Result<(), ImageStoreError>;
}
