use thiserror::Error;

use crate::domain::category::errors::CategoryIdError;

/// Error for ProductId parsing failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProductIdError {
    #[error("Invalid UUID format: {0}")]
    InvalidFormat(String),
}

/// Error for ProductName validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProductNameError {
    #[error("name required")]
    Empty,

    #[error("Product name too long: maximum {max} characters, got {actual}")]
    TooLong { max: usize, actual: usize },
}

/// Error for Price validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PriceError {
    #[error("Price is not a number: {0}")]
    NotANumber(String),

    #[error("Price must not be negative")]
    Negative,

    #[error("Price exceeds the maximum of {max_cents} cents")]
    TooLarge { max_cents: i64 },
}

/// Error raised by the image storage adapter
#[derive(Debug, Clone, Error)]
pub enum ImageStoreError {
    #[error("Failed to write image {file_name}: {reason}")]
    WriteFailed { file_name: String, reason: String },

    #[error("Failed to remove image {file_name}: {reason}")]
    RemoveFailed { file_name: String, reason: String },
}

/// Top-level error for product operations
#[derive(Debug, Clone, Error)]
pub enum ProductError {
    #[error("Invalid product ID: {0}")]
    InvalidProductId(#[from] ProductIdError),

    #[error("Invalid product name: {0}")]
    InvalidName(#[from] ProductNameError),

    #[error("Invalid price: {0}")]
    InvalidPrice(#[from] PriceError),

    #[error("Invalid category ID: {0}")]
    InvalidCategoryId(#[from] CategoryIdError),

    #[error("invalid image type: {0}")]
    InvalidImageType(String),

    #[error("at least one image required")]
    MissingImage,

    #[error("Product not found: {0}")]
    NotFound(String),

    #[error("Category not found: {0}")]
    CategoryNotFound(String),

    #[error("Image storage error: {0}")]
    ImageStorage(#[from] ImageStoreError),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Unknown error: {0}")]
    Unknown(String),
}
