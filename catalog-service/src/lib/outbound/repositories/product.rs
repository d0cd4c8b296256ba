use std::collections::HashMap;

use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use sqlx::PgPool;
use sqlx::Postgres;
use sqlx::Transaction;
use uuid::Uuid;

use crate::domain::category::models::CategoryId;
use crate::domain::product::errors::ProductError;
use crate::domain::product::models::Price;
use crate::domain::product::models::Product;
use crate::domain::product::models::ProductFilter;
use crate::domain::product::models::ProductId;
use crate::domain::product::models::ProductImage;
use crate::domain::product::models::ProductName;
use crate::domain::product::ports::ProductRepository;

const SELECT_PRODUCTS: &str = r#"
    SELECT p.id, p.name, p.description, p.price_cents, p.in_stock,
           p.category_id, c.name AS category_name, p.image_path, p.created_at
    FROM products p
    LEFT JOIN categories c ON c.id = p.category_id
"#;

pub struct PostgresProductRepository {
    pool: PgPool,
}

impl PostgresProductRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn load_images(
        &self,
        product_ids: &[Uuid],
    ) -> Result<HashMap<Uuid, Vec<ProductImage>>, ProductError> {
        let rows = sqlx::query_as::<_, ProductImageRow>(
            r#"
            SELECT product_id, file_path, created_at
            FROM product_images
            WHERE product_id = ANY($1)
            ORDER BY id
            "#,
        )
        .bind(product_ids)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| ProductError::DatabaseError(e.to_string()))?;

        let mut images: HashMap<Uuid, Vec<ProductImage>> = HashMap::new();
        for row in rows {
            images.entry(row.product_id).or_default().push(ProductImage {
                file_path: row.file_path,
                created_at: row.created_at,
            });
        }

        Ok(images)
    }

    async fn assemble(&self, rows: Vec<ProductRow>) -> Result<Vec<Product>, ProductError> {
        let ids: Vec<Uuid> = rows.iter().map(|r| r.id).collect();
        let mut images = self.load_images(&ids).await?;

        rows.into_iter()
            .map(|r| {
                let product_images = images.remove(&r.id).unwrap_or_default();
                r.into_product(product_images)
            })
            .collect()
    }

    async fn insert_images(
        tx: &mut Transaction<'_, Postgres>,
        product_id: &ProductId,
        images: &[ProductImage],
    ) -> Result<(), ProductError> {
        for image in images {
            sqlx::query(
                r#"
                INSERT INTO product_images (product_id, file_path, created_at)
                VALUES ($1, $2, $3)
                "#,
            )
            .bind(product_id.0)
            .bind(&image.file_path)
            .bind(image.created_at)
            .execute(&mut **tx)
            .await
            .map_err(|e| ProductError::DatabaseError(e.to_string()))?;
        }

        Ok(())
    }

    async fn reload(&self, id: &ProductId) -> Result<Product, ProductError> {
        self.find_by_id(id)
            .await?
            .ok_or(ProductError::NotFound(id.to_string()))
    }
}

#[derive(sqlx::FromRow)]
struct ProductRow {
    id: Uuid,
    name: String,
    description: Option<String>,
    price_cents: i64,
    in_stock: bool,
    category_id: Option<Uuid>,
    category_name: Option<String>,
    image_path: Option<String>,
    created_at: DateTime<Utc>,
}

impl ProductRow {
    fn into_product(self, images: Vec<ProductImage>) -> Result<Product, ProductError> {
        Ok(Product {
            id: ProductId(self.id),
            name: ProductName::new(self.name)?,
            description: self.description,
            price: Price::from_cents(self.price_cents)?,
            in_stock: self.in_stock,
            category_id: self.category_id.map(CategoryId),
            category_name: self.category_name,
            image_path: self.image_path,
            images,
            created_at: self.created_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct ProductImageRow {
    product_id: Uuid,
    file_path: String,
    created_at: DateTime<Utc>,
}

/// `%term%` with LIKE wildcards in the term matched literally.
fn like_pattern(term: &str) -> String {
    let escaped = term
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}

fn map_write_error(e: sqlx::Error, product: &Product) -> ProductError {
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_foreign_key_violation() {
            return ProductError::CategoryNotFound(
                product
                    .category_id
                    .map(|id| id.to_string())
                    .unwrap_or_default(),
            );
        }
    }
    ProductError::DatabaseError(e.to_string())
}

#[async_trait]
impl ProductRepository for PostgresProductRepository {
    async fn list(&self, filter: &ProductFilter) -> Result<Vec<Product>, ProductError> {
        let query = format!(
            r#"{SELECT_PRODUCTS}
            WHERE ($1::text IS NULL OR p.name ILIKE $1 OR p.description ILIKE $1)
              AND ($2::uuid IS NULL OR p.category_id = $2)
              AND ($3::boolean IS NULL OR p.in_stock = $3)
            ORDER BY p.created_at DESC
            "#
        );

        let rows = sqlx::query_as::<_, ProductRow>(&query)
            .bind(filter.query.as_deref().map(like_pattern))
            .bind(filter.category_id.map(|id| id.0))
            .bind(filter.in_stock)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| ProductError::DatabaseError(e.to_string()))?;

        self.assemble(rows).await
    }

    async fn find_by_id(&self, id: &ProductId) -> Result<Option<Product>, ProductError> {
        let query = format!("{SELECT_PRODUCTS} WHERE p.id = $1");

        let row = sqlx::query_as::<_, ProductRow>(&query)
            .bind(id.0)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| ProductError::DatabaseError(e.to_string()))?;

        match row {
            Some(row) => Ok(self.assemble(vec![row]).await?.pop()),
            None => Ok(None),
        }
    }

    async fn create(&self, product: Product) -> Result<Product, ProductError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| ProductError::DatabaseError(e.to_string()))?;

        sqlx::query(
            r#"
            INSERT INTO products
                (id, name, description, price_cents, in_stock, category_id, image_path, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(product.id.0)
        .bind(product.name.as_str())
        .bind(product.description.as_deref())
        .bind(product.price.cents())
        .bind(product.in_stock)
        .bind(product.category_id.map(|id| id.0))
        .bind(product.image_path.as_deref())
        .bind(product.created_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| map_write_error(e, &product))?;

        Self::insert_images(&mut tx, &product.id, &product.images).await?;

        tx.commit()
            .await
            .map_err(|e| ProductError::DatabaseError(e.to_string()))?;

        self.reload(&product.id).await
    }

    async fn update(
        &self,
        product: Product,
        new_images: Vec<ProductImage>,
    ) -> Result<Product, ProductError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| ProductError::DatabaseError(e.to_string()))?;

        let result = sqlx::query(
            r#"
            UPDATE products
            SET name = $2, description = $3, price_cents = $4, in_stock = $5,
                category_id = $6, image_path = $7
            WHERE id = $1
            "#,
        )
        .bind(product.id.0)
        .bind(product.name.as_str())
        .bind(product.description.as_deref())
        .bind(product.price.cents())
        .bind(product.in_stock)
        .bind(product.category_id.map(|id| id.0))
        .bind(product.image_path.as_deref())
        .execute(&mut *tx)
        .await
        .map_err(|e| map_write_error(e, &product))?;

        if result.rows_affected() == 0 {
            return Err(ProductError::NotFound(product.id.to_string()));
        }

        Self::insert_images(&mut tx, &product.id, &new_images).await?;

        tx.commit()
            .await
            .map_err(|e| ProductError::DatabaseError(e.to_string()))?;

        self.reload(&product.id).await
    }

    async fn delete(&self, id: &ProductId) -> Result<(), ProductError> {
        let result = sqlx::query(
            r#"
            DELETE FROM products
            WHERE id = $1
            "#,
        )
        .bind(id.0)
        .execute(&self.pool)
        .await
        .map_err(|e| ProductError::DatabaseError(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(ProductError::NotFound(id.to_string()));
        }

        Ok(())
    }
}
