use thiserror::Error;

/// Error for CategoryId parsing failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CategoryIdError {
    #[error("Invalid UUID format: {0}")]
    InvalidFormat(String),
}

/// Error for CategoryName validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CategoryNameError {
    #[error("name required")]
    Empty,

    #[error("Category name too long: maximum {max} characters, got {actual}")]
    TooLong { max: usize, actual: usize },
}

/// Top-level error for category operations
#[derive(Debug, Clone, Error)]
pub enum CategoryError {
    #[error("Invalid category ID: {0}")]
    InvalidCategoryId(#[from] CategoryIdError),

    #[error("Invalid category name: {0}")]
    InvalidName(#[from] CategoryNameError),

    #[error("Category not found: {0}")]
    NotFound(String),

    #[error("Category already exists: {0}")]
    AlreadyExists(String),

    #[error("Database error: {0}")]
    DatabaseError(String),
}
