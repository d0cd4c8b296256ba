use std::fmt;

use uuid::Uuid;

use crate::domain::category::errors::CategoryIdError;
use crate::domain::category::errors::CategoryNameError;

/// Product category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub id: CategoryId,
    pub name: CategoryName,
}

/// Category unique identifier value object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CategoryId(pub Uuid);

impl CategoryId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse a category ID from string.
    ///
    /// # Errors
    /// * `InvalidFormat` - String is not a valid UUID
    pub fn from_string(s: &str) -> Result<Self, CategoryIdError> {
        Uuid::parse_str(s.trim())
            .map(CategoryId)
            .map_err(|e| CategoryIdError::InvalidFormat(e.to_string()))
    }
}

impl Default for CategoryId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for CategoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Category name value object.
///
/// Trimmed, non-empty, at most 128 characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CategoryName(String);

impl CategoryName {
    const MAX_LENGTH: usize = 128;

    /// # Errors
    /// * `Empty` - Name is empty after trimming
    /// * `TooLong` - Name exceeds 128 characters
    pub fn new(name: impl AsRef<str>) -> Result<Self, CategoryNameError> {
        let name = name.as_ref().trim();
        let length = name.chars().count();
        if length == 0 {
            Err(CategoryNameError::Empty)
        } else if length > Self::MAX_LENGTH {
            Err(CategoryNameError::TooLong {
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

impl fmt::Display for CategoryName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_trimmed_and_required() {
        assert_eq!(CategoryName::new("  Books ").unwrap().as_str(), "Books");
        assert_eq!(CategoryName::new(" \t"), Err(CategoryNameError::Empty));
    }

    #[test]
    fn test_name_too_long() {
        assert!(matches!(
            CategoryName::new("x".repeat(129)),
            Err(CategoryNameError::TooLong { max: 128, .. })
        ));
    }

    #[test]
    fn test_id_parse() {
        let id = CategoryId::new();
        assert_eq!(CategoryId::from_string(&id.to_string()), Ok(id));
        assert!(CategoryId::from_string("7").is_err());
    }
}
