use std::fmt;
use std::str::FromStr;

use chrono::DateTime;
use chrono::Utc;
use uuid::Uuid;

use crate::domain::category::models::CategoryId;
use crate::domain::product::errors::PriceError;
use crate::domain::product::errors::ProductError;
use crate::domain::product::errors::ProductIdError;
use crate::domain::product::errors::ProductNameError;

/// URL prefix under which stored images are served.
pub const UPLOADS_URL_PREFIX: &str = "/uploads/";

/// Lowercase file extensions accepted for product images.
pub const ALLOWED_IMAGE_EXTENSIONS: [&str; 5] = ["jpg", "jpeg", "png", "webp", "gif"];

/// Product aggregate entity.
///
/// `image_path` is the single-image field older records were created
/// with. New products fill it with their first uploaded image.
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    pub id: ProductId,
    pub name: ProductName,
    pub description: Option<String>,
    pub price: Price,
    pub in_stock: bool,
    pub category_id: Option<CategoryId>,
    pub category_name: Option<String>,
    pub image_path: Option<String>,
    pub images: Vec<ProductImage>,
    pub created_at: DateTime<Utc>,
}

impl Product {
    /// URL of the image shown in listings.
    ///
    /// First image row, then the legacy image path, then nothing.
    pub fn primary_image_url(&self) -> Option<String> {
        self.images
            .first()
            .map(|image| image.file_path.as_str())
            .or(self.image_path.as_deref())
            .map(|file| format!("{UPLOADS_URL_PREFIX}{file}"))
    }

    /// URLs of every image, falling back to the primary image for
    /// products that predate image rows.
    pub fn image_urls(&self) -> Vec<String> {
        if self.images.is_empty() {
            return self.primary_image_url().into_iter().collect();
        }

        self.images
            .iter()
            .map(|image| format!("{UPLOADS_URL_PREFIX}{}", image.file_path))
            .collect()
    }
}

/// Image attached to a product, ordered by creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductImage {
    pub file_path: String,
    pub created_at: DateTime<Utc>,
}

impl ProductImage {
    pub fn new(file_path: String) -> Self {
        Self {
            file_path,
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProductId(pub Uuid);

impl ProductId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// # Errors
    /// * `InvalidFormat` - String is not a valid UUID
    pub fn from_string(s: &str) -> Result<Self, ProductIdError> {
        Uuid::parse_str(s.trim())
            .map(ProductId)
            .map_err(|e| ProductIdError::InvalidFormat(e.to_string()))
    }
}

impl Default for ProductId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Product name value object, trimmed, 1-255 characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductName(String);

impl ProductName {
    const MAX_LENGTH: usize = 255;

    pub fn new(name: impl AsRef<str>) -> Result<Self, ProductNameError> {
        let name = name.as_ref().trim();
        let length = name.chars().count();
        if length == 0 {
            Err(ProductNameError::Empty)
        } else if length > Self::MAX_LENGTH {
            Err(ProductNameError::TooLong {
                max: Self::MAX_LENGTH,
                actual: length,
            })
        } else {
            Ok(Self(name.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProductName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Non-negative price with two fractional digits, held as cents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct Price(i64);

impl Price {
    /// Largest value a NUMERIC(10, 2) column holds.
    pub const MAX_CENTS: i64 = 9_999_999_999;

    /// # Errors
    /// * `Negative` - Cents below zero
    /// * `TooLarge` - Cents above `MAX_CENTS`
    pub fn from_cents(cents: i64) -> Result<Self, PriceError> {
        if cents < 0 {
            Err(PriceError::Negative)
        } else if cents > Self::MAX_CENTS {
            Err(PriceError::TooLarge {
                max_cents: Self::MAX_CENTS,
            })
        } else {
            Ok(Self(cents))
        }
    }

    /// Round a decimal amount to the nearest cent.
    pub fn from_f64(amount: f64) -> Result<Self, PriceError> {
        if !amount.is_finite() {
            return Err(PriceError::NotANumber(amount.to_string()));
        }

        let cents = (amount * 100.0).round();
        if cents < 0.0 {
            Err(PriceError::Negative)
        } else if cents > Self::MAX_CENTS as f64 {
            Err(PriceError::TooLarge {
                max_cents: Self::MAX_CENTS,
            })
        } else {
            Self::from_cents(cents as i64)
        }
    }

    pub fn cents(&self) -> i64 {
        self.0
    }

    pub fn as_f64(&self) -> f64 {
        self.0 as f64 / 100.0
    }
}

impl FromStr for Price {
    type Err = PriceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let amount = s
            .parse::<f64>()
            .map_err(|_| PriceError::NotANumber(s.to_string()))?;

        Self::from_f64(amount)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.0 / 100, self.0 % 100)
    }
}

/// Listing filter. Absent fields do not constrain the result.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductFilter {
    pub query: Option<String>,
    pub category_id: Option<CategoryId>,
    pub in_stock: Option<bool>,
}

impl ProductFilter {
    /// Case-insensitive substring match on name or description.
    pub fn matches(&self, product: &Product) -> bool {
        let query_matches = self.query.as_deref().map_or(true, |query| {
            let query = query.to_lowercase();
            product.name.as_str().to_lowercase().contains(&query)
                || product
                    .description
                    .as_deref()
                    .is_some_and(|d| d.to_lowercase().contains(&query))
        });

        query_matches
            && self
                .category_id
                .map_or(true, |id| product.category_id == Some(id))
            && self.in_stock.map_or(true, |s| product.in_stock == s)
    }
}

/// Uploaded image file as received from the client.
#[derive(Clone, PartialEq, Eq)]
pub struct ImageUpload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl ImageUpload {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes,
        }
    }

    /// Lowercased extension of the client file name.
    ///
    /// # Errors
    /// * `InvalidImageType` - Extension not in `ALLOWED_IMAGE_EXTENSIONS`
    pub fn extension(&self) -> Result<String, ProductError> {
        let extension = self
            .file_name
            .rsplit('.')
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();

        if self.file_name.contains('.') && ALLOWED_IMAGE_EXTENSIONS.contains(&extension.as_str()) {
            Ok(extension)
        } else {
            Err(ProductError::InvalidImageType(self.file_name.clone()))
        }
    }
}

impl fmt::Debug for ImageUpload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageUpload")
            .field("file_name", &self.file_name)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// Command to create a product with at least one image.
#[derive(Debug, Clone)]
pub struct CreateProductCommand {
    pub name: ProductName,
    pub description: Option<String>,
    pub price: Price,
    pub in_stock: bool,
    pub category_id: Option<CategoryId>,
    pub images: Vec<ImageUpload>,
}

/// Partial product update. `None` leaves the field untouched; the
/// nested options clear the field when `Some(None)`.
#[derive(Debug, Clone, Default)]
pub struct UpdateProductCommand {
    pub name: Option<ProductName>,
    pub description: Option<Option<String>>,
    pub price: Option<Price>,
    pub in_stock: Option<bool>,
    pub category_id: Option<Option<CategoryId>>,
    pub images: Vec<ImageUpload>,
}

impl UpdateProductCommand {
    pub fn apply(&self, product: &mut Product) {
        if let Some(name) = &self.name {
            product.name = name.clone();
        }
        if let Some(description) = &self.description {
            product.description = description.clone();
        }
        if let Some(price) = self.price {
            product.price = price;
        }
        if let Some(in_stock) = self.in_stock {
            product.in_stock = in_stock;
        }
        if let Some(category_id) = self.category_id {
            if product.category_id != category_id {
                product.category_name = None;
            }
            product.category_id = category_id;
        }
    }
}
