use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::category::errors::CategoryError;
use crate::domain::category::models::Category;
use crate::domain::category::models::CategoryId;
use crate::domain::category::models::CategoryName;
use crate::domain::category::ports::CategoryRepository;

pub struct PostgresCategoryRepository {
    pool: PgPool,
}

impl PostgresCategoryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct CategoryRow {
    id: Uuid,
    name: String,
}

impl TryFrom<CategoryRow> for Category {
    type Error = CategoryError;

    fn try_from(r: CategoryRow) -> Result<Self, Self::Error> {
        Ok(Category {
            id: CategoryId(r.id),
            name: CategoryName::new(r.name)?,
        })
    }
}

fn map_write_error(e: sqlx::Error, name: &CategoryName) -> CategoryError {
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_unique_violation() && db_err.constraint() == Some("categories_name_key") {
            return CategoryError::AlreadyExists(name.as_str().to_string());
        }
    }
    CategoryError::DatabaseError(e.to_string())
}

#[async_trait]
impl CategoryRepository for PostgresCategoryRepository {
    async fn list_all(&self) -> Result<Vec<Category>, CategoryError> {
        let rows = sqlx::query_as::<_, CategoryRow>(
            r#"
            SELECT id, name
            FROM categories
            ORDER BY name
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| CategoryError::DatabaseError(e.to_string()))?;

        rows.into_iter().map(Category::try_from).collect()
    }

    async fn find_by_id(&self, id: &CategoryId) -> Result<Option<Category>, CategoryError> {
        let row = sqlx::query_as::<_, CategoryRow>(
            r#"
            SELECT id, name
            FROM categories
            WHERE id = $1
            "#,
        )
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| CategoryError::DatabaseError(e.to_string()))?;

        row.map(Category::try_from).transpose()
    }

    async fn find_by_name(&self, name: &CategoryName) -> Result<Option<Category>, CategoryError> {
        let row = sqlx::query_as::<_, CategoryRow>(
            r#"
            SELECT id, name
            FROM categories
            WHERE name = $1
            "#,
        )
        .bind(name.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| CategoryError::DatabaseError(e.to_string()))?;

        row.map(Category::try_from).transpose()
    }

    async fn create(&self, category: Category) -> Result<Category, CategoryError> {
        sqlx::query(
            r#"
            INSERT INTO categories (id, name)
            VALUES ($1, $2)
            "#,
        )
        .bind(category.id.0)
        .bind(category.name.as_str())
        .execute(&self.pool)
        .await
        .map_err(|e| map_write_error(e, &category.name))?;

        Ok(category)
    }

    async fn update(&self, category: Category) -> Result<Category, CategoryError> {
        let result = sqlx::query(
            r#"
            UPDATE categories
            SET name = $2
            WHERE id = $1
            "#,
        )
        .bind(category.id.0)
        .bind(category.name.as_str())
        .execute(&self.pool)
        .await
        .map_err(|e| map_write_error(e, &category.name))?;

        if result.rows_affected() == 0 {
            return Err(CategoryError::NotFound(category.id.to_string()));
        }

        Ok(category)
    }

    async fn delete(&self, id: &CategoryId) -> Result<(), CategoryError> {
        let result = sqlx::query(
            r#"
            DELETE FROM categories
            WHERE id = $1
            "#,
        )
        .bind(id.0)
        .execute(&self.pool)
        .await
        .map_err(|e| CategoryError::DatabaseError(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(CategoryError::NotFound(id.to_string()));
        }

        Ok(())
    }
}
