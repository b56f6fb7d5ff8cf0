//! Row decoding and error mapping shared by the MySQL repositories

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::mysql::MySqlRow;
use sqlx::Row;
use uuid::Uuid;

use nexo_core::domain::entities::{Product, ProductImage};
use nexo_core::errors::DomainError;

/// Wrap a driver failure as an internal error, keeping the operation name
pub(crate) fn db_error(context: &str, error: sqlx::Error) -> DomainError {
    tracing::error!(error = %error, "{}", context);
    DomainError::internal(format!("{}: {}", context, error))
}

pub(crate) fn is_unique_violation(error: &sqlx::Error) -> bool {
    match error {
        sqlx::Error::Database(db) => db.is_unique_violation(),
        _ => false,
    }
}

pub(crate) fn get<'r, T>(row: &'r MySqlRow, column: &str) -> Result<T, DomainError>
where
    T: sqlx::Decode<'r, sqlx::MySql> + sqlx::Type<sqlx::MySql>,
{
    row.try_get(column)
        .map_err(|e| DomainError::internal(format!("Failed to get {}: {}", column, e)))
}

pub(crate) fn get_uuid(row: &MySqlRow, column: &str) -> Result<Uuid, DomainError> {
    let raw: String = get(row, column)?;
    parse_uuid(&raw)
}

pub(crate) fn parse_uuid(raw: &str) -> Result<Uuid, DomainError> {
    Uuid::parse_str(raw).map_err(|e| DomainError::internal(format!("Invalid UUID {}: {}", raw, e)))
}

/// Escape `%`, `_` and `\` for a LIKE pattern
pub(crate) fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Case-insensitive "contains" pattern
pub(crate) fn contains_pattern(term: &str) -> String {
    format!("%{}%", escape_like(&term.to_lowercase()))
}

/// Product row without its images
#[derive(Debug, Clone)]
pub(crate) struct ProductRecord {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub manager_id: Uuid,
    pub cover_image: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ProductRecord {
    pub(crate) fn from_row(row: &MySqlRow) -> Result<Self, DomainError> {
        Ok(Self {
            id: get_uuid(row, "id")?,
            name: get(row, "name")?,
            description: get(row, "description")?,
            price: get(row, "price")?,
            manager_id: get_uuid(row, "manager_id")?,
            cover_image: get(row, "cover_image")?,
            created_at: get(row, "created_at")?,
            updated_at: get(row, "updated_at")?,
        })
    }
}

/// Image row keyed by its product
#[derive(Debug, Clone)]
pub(crate) struct ImageRecord {
    pub product_id: Uuid,
    pub image: ProductImage,
}

impl ImageRecord {
    pub(crate) fn from_row(row: &MySqlRow) -> Result<Self, DomainError> {
        Ok(Self {
            product_id: get_uuid(row, "product_id")?,
            image: ProductImage {
                id: get_uuid(row, "id")?,
                url: get(row, "url")?,
                is_cover: get(row, "is_cover")?,
            },
        })
    }
}

/// Join image rows (already in position order) onto their products
///
/// Product order is preserved. Cover flags are recomputed from
/// `cover_image` so a stale column never leaks out.
pub(crate) fn assemble_products(records: Vec<ProductRecord>, images: Vec<ImageRecord>) -> Vec<Product> {
    let mut by_product: HashMap<Uuid, Vec<ProductImage>> = HashMap::new();
    for record in images {
        by_product.entry(record.product_id).or_default().push(record.image);
    }

    records
        .into_iter()
        .map(|record| {
            let mut product = Product {
                id: record.id,
                name: record.name,
                description: record.description,
                price: record.price,
                manager_id: record.manager_id,
                cover_image: record.cover_image,
                images: by_product.remove(&record.id).unwrap_or_default(),
                created_at: record.created_at,
                updated_at: record.updated_at,
            };
            product.refresh_cover_flags();
            product
        })
        .collect()
}
