use std::collections::HashMap;

use axum::extract::Multipart;
use serde::Serialize;

use crate::domain::category::models::CategoryId;
use crate::domain::product::errors::ProductError;
use crate::domain::product::models::CreateProductCommand;
use crate::domain::product::models::ImageUpload;
use crate::domain::product::models::Price;
use crate::domain::product::models::Product;
use crate::domain::product::models::ProductId;
use crate::domain::product::models::ProductName;
use crate::domain::product::models::UpdateProductCommand;
use crate::inbound::http::handlers::ApiError;

pub mod create_product;
pub mod delete_product;
pub mod get_product;
pub mod list_products;
pub mod update_product;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductListData {
    pub id: String,
    pub name: String,
    pub price: f64,
    pub in_stock: bool,
    pub category_id: Option<String>,
    pub category_name: Option<String>,
    pub primary_image_url: Option<String>,
}

impl From<&Product> for ProductListData {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.to_string(),
            name: product.name.as_str().to_string(),
            price: product.price.as_f64(),
            in_stock: product.in_stock,
            category_id: product.category_id.map(|id| id.to_string()),
            category_name: product.category_name.clone(),
            primary_image_url: product.primary_image_url(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductDetailData {
    #[serde(flatten)]
    pub summary: ProductListData,
    pub description: Option<String>,
    pub images: Vec<String>,
}

impl From<&Product> for ProductDetailData {
    fn from(product: &Product) -> Self {
        Self {
            summary: product.into(),
            description: product.description.clone(),
            images: product.image_urls(),
        }
    }
}

fn parse_product_id(raw: &str) -> Result<ProductId, ApiError> {
    ProductId::from_string(raw).map_err(|_| ApiError::NotFound("product not found".to_string()))
}

/// Multipart product form: text fields by name plus the uploaded files.
///
/// File parts with an empty file name are what browsers send for an
/// untouched file input; they are skipped.
#[derive(Debug, Default)]
pub struct ProductForm {
    fields: HashMap<String, String>,
    images: Vec<ImageUpload>,
    image: Option<ImageUpload>,
}

impl ProductForm {
    pub async fn from_multipart(mut multipart: Multipart) -> Result<Self, ApiError> {
        let mut form = Self::default();

        while let Some(field) = multipart.next_field().await? {
            let name = field.name().unwrap_or_default().to_string();

            match field.file_name().map(str::to_string) {
                Some(file_name) if name == "images" || name == "image" => {
                    let bytes = field.bytes().await?;
                    if file_name.is_empty() {
                        continue;
                    }
                    let upload = ImageUpload::new(file_name, bytes.to_vec());
                    if name == "images" {
                        form.images.push(upload);
                    } else if form.image.is_none() {
                        form.image = Some(upload);
                    }
                }
                _ => {
                    let text = field.text().await?;
                    form.fields.insert(name, text);
                }
            }
        }

        Ok(form)
    }

    fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    /// Build a create command. Missing price defaults to zero and missing
    /// stock flag to in stock.
    pub fn into_create_command(self) -> Result<CreateProductCommand, ProductError> {
        let name = ProductName::new(self.field("name").unwrap_or_default())?;
        let description = Some(self.field("description").unwrap_or_default().to_string());
        let price = match self.field("price").filter(|p| !p.trim().is_empty()) {
            Some(price) => price.parse::<Price>()?,
            None => Price::default(),
        };
        let in_stock = self.field("in_stock").map_or(true, parse_flag);
        let category_id = parse_optional_category(self.field("category_id"))?;

        let images = if self.images.is_empty() {
            self.image.into_iter().collect()
        } else {
            self.images
        };

        Ok(CreateProductCommand {
            name,
            description,
            price,
            in_stock,
            category_id,
            images,
        })
    }

    /// Build an update command from the fields actually sent. An empty
    /// price keeps the current one; an empty category clears it.
    pub fn into_update_command(self) -> Result<UpdateProductCommand, ProductError> {
        let name = self.field("name").map(ProductName::new).transpose()?;
        let description = self
            .field("description")
            .map(|d| Some(d.to_string()));
        let price = self
            .field("price")
            .filter(|p| !p.trim().is_empty())
            .map(str::parse::<Price>)
            .transpose()?;
        let in_stock = self.field("in_stock").map(parse_flag);
        let category_id = match self.field("category_id") {
            Some(raw) => Some(parse_optional_category(Some(raw))?),
            None => None,
        };

        Ok(UpdateProductCommand {
            name,
            description,
            price,
            in_stock,
            category_id,
            images: self.images,
        })
    }
}

fn parse_flag(value: &str) -> bool {
    value.trim().eq_ignore_ascii_case("true")
}

fn parse_optional_category(raw: Option<&str>) -> Result<Option<CategoryId>, ProductError> {
    match raw.map(str::trim).filter(|r| !r.is_empty()) {
        Some(raw) => Ok(Some(CategoryId::from_string(raw)?)),
        None => Ok(None),
    }
}
