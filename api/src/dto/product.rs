use nexo_core::domain::entities::{NewProduct, ProductChanges};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use validator::Validate;

/// JSON body of `POST /products`
///
/// The owner is always the caller; a `managerId` sent by older clients is
/// ignored.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductRequest {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,

    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,

    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,

    #[serde(default)]
    pub image_urls: Vec<String>,

    pub cover_image: Option<String>,
}

impl From<CreateProductRequest> for NewProduct {
    fn from(request: CreateProductRequest) -> Self {
        NewProduct::new(request.name, request.description, request.price)
            .with_images(request.image_urls, request.cover_image)
    }
}

/// JSON body of `PATCH /products/{id}`
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductRequest {
    #[validate(length(min = 1, message = "Name cannot be empty"))]
    pub name: Option<String>,

    #[validate(length(min = 1, message = "Description cannot be empty"))]
    pub description: Option<String>,

    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub price: Option<Decimal>,

    /// Replaces the whole image set when present
    pub image_urls: Option<Vec<String>>,

    /// Absent keeps the cover, `null` clears it
    #[serde(default, deserialize_with = "present_or_null")]
    pub cover_image: Option<Option<String>>,
}

/// Maps a key that is present to `Some`, so an explicit `null` becomes `Some(None)`
fn present_or_null<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

impl From<UpdateProductRequest> for ProductChanges {
    fn from(request: UpdateProductRequest) -> Self {
        ProductChanges {
            name: request.name,
            description: request.description,
            price: request.price,
            image_urls: request.image_urls,
            cover_image: request.cover_image,
        }
    }
}
