//! MySQL implementation of the ProductRepository trait.
//!
//! A product row and its `product_images` rows are written in one
//! transaction. Image order is kept in the `position` column.

use async_trait::async_trait;
use sqlx::{MySql, MySqlPool, QueryBuilder, Transaction};
use uuid::Uuid;

use nexo_core::domain::entities::Product;
use nexo_core::errors::DomainError;
use nexo_core::repositories::ProductRepository;

use super::rows::{assemble_products, db_error, ImageRecord, ProductRecord};

const PRODUCT_COLUMNS: &str =
    "id, name, description, price, manager_id, cover_image, created_at, updated_at";

/// MySQL implementation of ProductRepository
pub struct MySqlProductRepository {
    /// Database connection pool
    pool: MySqlPool,
}

impl MySqlProductRepository {
    /// Create a new MySQL product repository
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Fetch product rows, then their images in a single IN query
    async fn load(&self, filter: Option<(&str, String)>) -> Result<Vec<Product>, DomainError> {
        let mut builder: QueryBuilder<MySql> =
            QueryBuilder::new(format!("SELECT {} FROM products", PRODUCT_COLUMNS));
        if let Some((column, value)) = filter {
            builder.push(format!(" WHERE {} = ", column)).push_bind(value);
        }
        builder.push(" ORDER BY created_at DESC");

        let rows = builder
            .build()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| db_error("Failed to load products", e))?;
        let records = rows
            .iter()
            .map(ProductRecord::from_row)
            .collect::<Result<Vec<_>, _>>()?;

        if records.is_empty() {
            return Ok(Vec::new());
        }

        let mut images: QueryBuilder<MySql> = QueryBuilder::new(
            "SELECT id, product_id, url, is_cover FROM product_images WHERE product_id IN (",
        );
        let mut ids = images.separated(", ");
        for record in &records {
            ids.push_bind(record.id.to_string());
        }
        ids.push_unseparated(") ORDER BY product_id, position");

        let image_rows = images
            .build()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| db_error("Failed to load product images", e))?;
        let image_records = image_rows
            .iter()
            .map(ImageRecord::from_row)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(assemble_products(records, image_records))
    }

    async fn insert_images(
        tx: &mut Transaction<'_, MySql>,
        product: &Product,
    ) -> Result<(), DomainError> {
        if product.images.is_empty() {
            return Ok(());
        }

        let product_id = product.id.to_string();
        let mut builder: QueryBuilder<MySql> = QueryBuilder::new(
            "INSERT INTO product_images (id, product_id, url, is_cover, position) ",
        );
        builder.push_values(product.images.iter().enumerate(), |mut row, (position, image)| {
            row.push_bind(image.id.to_string())
                .push_bind(product_id.clone())
                .push_bind(image.url.clone())
                .push_bind(image.is_cover)
                .push_bind(position as i32);
        });

        builder
            .build()
            .execute(&mut **tx)
            .await
            .map_err(|e| db_error("Failed to insert product images", e))?;
        Ok(())
    }
}

#[async_trait]
impl ProductRepository for MySqlProductRepository {
    async fn create(&self, product: Product) -> Result<Product, DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| db_error("Failed to begin transaction", e))?;

        let query = r#"
            INSERT INTO products (
                id, name, description, price, manager_id,
                cover_image, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        "#;
        sqlx::query(query)
            .bind(product.id.to_string())
            .bind(&product.name)
            .bind(&product.description)
            .bind(product.price)
            .bind(product.manager_id.to_string())
            .bind(&product.cover_image)
            .bind(product.created_at)
            .bind(product.updated_at)
            .execute(&mut *tx)
            .await
            .map_err(|e| db_error("Failed to create product", e))?;

        Self::insert_images(&mut tx, &product).await?;

        tx.commit()
            .await
            .map_err(|e| db_error("Failed to commit product", e))?;

        tracing::debug!(product_id = %product.id, images = product.images.len(), "Product inserted");
        Ok(product)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Product>, DomainError> {
        Ok(self.load(Some(("id", id.to_string()))).await?.into_iter().next())
    }

    async fn find_all(&self) -> Result<Vec<Product>, DomainError> {
        self.load(None).await
    }

    async fn find_by_manager(&self, manager_id: Uuid) -> Result<Vec<Product>, DomainError> {
        self.load(Some(("manager_id", manager_id.to_string()))).await
    }

    async fn update(&self, product: Product) -> Result<Product, DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| db_error("Failed to begin transaction", e))?;

        let locked: Option<String> = sqlx::query_scalar("SELECT id FROM products WHERE id = ? FOR UPDATE")
            .bind(product.id.to_string())
            .fetch_optional(&mut *tx)
            .await
            .map_err(|e| db_error("Failed to lock product", e))?;
        if locked.is_none() {
            return Err(DomainError::not_found("Product", product.id));
        }

        let query = r#"
            UPDATE products SET
                name = ?,
                description = ?,
                price = ?,
                cover_image = ?,
                updated_at = ?
            WHERE id = ?
        "#;
        sqlx::query(query)
            .bind(&product.name)
            .bind(&product.description)
            .bind(product.price)
            .bind(&product.cover_image)
            .bind(product.updated_at)
            .bind(product.id.to_string())
            .execute(&mut *tx)
            .await
            .map_err(|e| db_error("Failed to update product", e))?;

        sqlx::query("DELETE FROM product_images WHERE product_id = ?")
            .bind(product.id.to_string())
            .execute(&mut *tx)
            .await
            .map_err(|e| db_error("Failed to clear product images", e))?;

        Self::insert_images(&mut tx, &product).await?;

        tx.commit()
            .await
            .map_err(|e| db_error("Failed to commit product", e))?;

        tracing::debug!(product_id = %product.id, images = product.images.len(), "Product updated");
        Ok(product)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM products WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("Failed to delete product", e))?;

        Ok(result.rows_affected() > 0)
    }
}
