use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;

use crate::domain::product::errors::ProductError;
use crate::domain::product::models::CreateProductCommand;
use crate::domain::product::models::ImageUpload;
use crate::domain::product::models::Product;
use crate::domain::product::models::ProductFilter;
use crate::domain::product::models::ProductId;
use crate::domain::product::models::ProductImage;
use crate::domain::product::models::UpdateProductCommand;
use crate::domain::product::ports::ImageStore;
use crate::domain::product::ports::ProductRepository;
use crate::domain::product::ports::ProductServicePort;

/// Domain service implementation for catalog product operations.
pub struct ProductService<PR, IS>
where
    PR: ProductRepository,
    IS: ImageStore,
{
    repository: Arc<PR>,
    image_store: Arc<IS>,
}

impl<PR, IS> ProductService<PR, IS>
where
    PR: ProductRepository,
    IS: ImageStore,
{
    /// # Arguments
    /// * `repository` - Product persistence implementation
    /// * `image_store` - Where uploaded image bytes are written
    pub fn new(repository: Arc<PR>, image_store: Arc<IS>) -> Self {
        Self {
            repository,
            image_store,
        }
    }

    /// Validate every upload, then write them all.
    ///
    /// Nothing is written when any extension is rejected. A failed write
    /// removes the files already saved by this call.
    async fn store_images(&self, uploads: &[ImageUpload]) -> Result<Vec<String>, ProductError> {
        let extensions = uploads
            .iter()
            .map(ImageUpload::extension)
            .collect::<Result<Vec<_>, _>>()?;

        let mut saved = Vec::with_capacity(uploads.len());
        for (upload, extension) in uploads.iter().zip(&extensions) {
            match self.image_store.save(extension, &upload.bytes).await {
                Ok(file_name) => saved.push(file_name),
                Err(e) => {
                    self.discard_images(&saved).await;
                    return Err(e.into());
                }
            }
        }

        Ok(saved)
    }

    async fn discard_images(&self, file_names: &[String]) {
        for file_name in file_names {
            if let Err(e) = self.image_store.remove(file_name).await {
                tracing::warn!(error = %e, "Failed to remove orphaned image");
            }
        }
    }
}

#[async_trait]
impl<PR, IS> ProductServicePort for ProductService<PR, IS>
where
    PR: ProductRepository,
    IS: ImageStore,
{
    async fn list_products(&self, filter: ProductFilter) -> Result<Vec<Product>, ProductError> {
        self.repository.list(&filter).await
    }

    async fn get_product(&self, id: &ProductId) -> Result<Product, ProductError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or(ProductError::NotFound(id.to_string()))
    }

    async fn create_product(&self, command: CreateProductCommand) -> Result<Product, ProductError> {
        if command.images.is_empty() {
            return Err(ProductError::MissingImage);
        }

        let saved = self.store_images(&command.images).await?;

        let product = Product {
            id: ProductId::new(),
            name: command.name,
            description: command.description,
            price: command.price,
            in_stock: command.in_stock,
            category_id: command.category_id,
            category_name: None,
            image_path: saved.first().cloned(),
            images: saved.iter().cloned().map(ProductImage::new).collect(),
            created_at: Utc::now(),
        };

        match self.repository.create(product).await {
            Ok(product) => {
                tracing::info!(
                    product_id = %product.id,
                    name = %product.name,
                    images = product.images.len(),
                    "Product created"
                );
                Ok(product)
            }
            Err(e) => {
                self.discard_images(&saved).await;
                Err(e)
            }
        }
    }

    async fn update_product(
        &self,
        id: &ProductId,
        command: UpdateProductCommand,
    ) -> Result<Product, ProductError> {
        let mut product = self.get_product(id).await?;

        command.apply(&mut product);

        let saved = self.store_images(&command.images).await?;
        if product.image_path.is_none() {
            product.image_path = saved.first().cloned();
        }
        let new_images = saved.iter().cloned().map(ProductImage::new).collect();

        match self.repository.update(product, new_images).await {
            Ok(product) => {
                tracing::info!(product_id = %product.id, added_images = saved.len(), "Product updated");
                Ok(product)
            }
            Err(e) => {
                self.discard_images(&saved).await;
                Err(e)
            }
        }
    }

    async fn delete_product(&self, id: &ProductId) -> Result<(), ProductError> {
        self.repository.delete(id).await?;

        tracing::info!(product_id = %id, "Product deleted");

        Ok(())
    }
}
