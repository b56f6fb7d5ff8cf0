//! Product entity and the image set it owns.

use chrono::{DateTime, Utc};
use nexo_shared::utils::validation::{validators, ValidationErrors};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::user::ManagerSummary;

/// Image attached to exactly one product
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductImage {
    pub id: Uuid,
    /// Storage-assigned public address
    pub url: String,
    /// Derived: `url` equals the product's cover image
    pub is_cover: bool,
}

/// Product published by a manager
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    /// Owning manager
    pub manager_id: Uuid,
    /// One of `images[].url` or `None`
    pub cover_image: Option<String>,
    pub images: Vec<ProductImage>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Build a new product owned by `manager_id` from validated input
    pub fn new(manager_id: Uuid, input: NewProduct) -> Self {
        let now = Utc::now();
        let mut product = Self {
            id: Uuid::new_v4(),
            name: input.name.trim().to_string(),
            description: input.description.trim().to_string(),
            price: round_price(input.price),
            manager_id,
            cover_image: None,
            images: Vec::new(),
            created_at: now,
            updated_at: now,
        };
        product.replace_images(input.image_urls, input.cover_image);
        product
    }

    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.manager_id == user_id
    }

    pub fn image_urls(&self) -> Vec<String> {
        self.images.iter().map(|image| image.url.clone()).collect()
    }

    pub fn has_image(&self, url: &str) -> bool {
        self.images.iter().any(|image| image.url == url)
    }

    /// Replace the whole image set and the cover in one step
    ///
    /// Every image gets a fresh id; nothing of the previous set survives.
    pub fn replace_images(&mut self, urls: Vec<String>, cover_image: Option<String>) {
        self.images = urls
            .into_iter()
            .map(|url| ProductImage {
                id: Uuid::new_v4(),
                url,
                is_cover: false,
            })
            .collect();
        self.cover_image = cover_image;
        self.refresh_cover_flags();
    }

    /// Recompute `is_cover` on every image from `cover_image`
    pub fn refresh_cover_flags(&mut self) {
        let cover = self.cover_image.clone();
        for image in &mut self.images {
            image.is_cover = cover.as_deref() == Some(image.url.as_str());
        }
    }

    /// Image flagged as cover, if any
    pub fn cover(&self) -> Option<&ProductImage> {
        self.images.iter().find(|image| image.is_cover)
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

/// Product as shown in listings, with its manager
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductListing {
    #[serde(flatten)]
    pub product: Product,
    pub manager: Option<ManagerSummary>,
}

/// Input for publishing a product; the owner is the caller
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProduct {
    pub name: String,
    pub description: String,
    pub price: Decimal,
    /// Already-uploaded image URLs
    pub image_urls: Vec<String>,
    /// Must be one of `image_urls` when set
    pub cover_image: Option<String>,
}

impl NewProduct {
    pub fn new(name: impl Into<String>, description: impl Into<String>, price: Decimal) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            price,
            image_urls: Vec::new(),
            cover_image: None,
        }
    }

    pub fn with_images(mut self, urls: Vec<String>, cover_image: Option<String>) -> Self {
        self.image_urls = urls;
        self.cover_image = cover_image;
        self
    }

    /// Check scalar fields, image URLs and cover consistency
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        check_scalar_fields(
            Some(&self.name),
            Some(&self.description),
            Some(self.price),
            &mut errors,
        );
        check_image_urls(&self.image_urls, &mut errors);
        check_cover(self.cover_image.as_deref(), &self.image_urls, &mut errors);
        errors.into_result()
    }
}

/// Partial product update
///
/// `image_urls: Some(_)` replaces the full image set. `cover_image` keeps
/// "absent" (`None`) apart from "explicitly no cover" (`Some(None)`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductChanges {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub image_urls: Option<Vec<String>>,
    pub cover_image: Option<Option<String>>,
}

impl ProductChanges {
    /// Check the fields that are present; cover consistency needs the product
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        check_scalar_fields(
            self.name.as_deref(),
            self.description.as_deref(),
            self.price,
            &mut errors,
        );
        if let Some(urls) = &self.image_urls {
            check_image_urls(urls, &mut errors);
        }
        errors.into_result()
    }
}

/// Trim URLs and drop duplicates, keeping first occurrences in order
pub fn normalize_image_urls(urls: Vec<String>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    urls.into_iter()
        .map(|url| url.trim().to_string())
        .filter(|url| seen.insert(url.clone()))
        .collect()
}

/// Prices are stored as `DECIMAL(10, 2)`
pub const PRICE_SCALE: u32 = 2;

/// Largest price a `DECIMAL(10, 2)` column holds
pub fn max_price() -> Decimal {
    Decimal::new(99_999_999_99, PRICE_SCALE)
}

/// Round to whole cents, half away from zero like MySQL does on insert
pub fn round_price(price: Decimal) -> Decimal {
    price.round_dp_with_strategy(PRICE_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

pub(crate) fn check_scalar_fields(
    name: Option<&str>,
    description: Option<&str>,
    price: Option<Decimal>,
    errors: &mut ValidationErrors,
) {
    if let Some(name) = name {
        if !validators::not_empty(name) {
            errors.add_error("name", "Name is required", "required");
        }
    }
    if let Some(description) = description {
        if !validators::not_empty(description) {
            errors.add_error("description", "Description is required", "required");
        }
    }
    if let Some(price) = price.map(round_price) {
        if price <= Decimal::ZERO {
            errors.add_error("price", "Price must be greater than 0", "positive");
        } else if price > max_price() {
            errors.add_error("price", "Price cannot exceed 99999999.99", "max_price");
        }
    }
}

fn check_image_urls(urls: &[String], errors: &mut ValidationErrors) {
    if urls.iter().any(|url| !validators::not_empty(url)) {
        errors.add_error("imageUrls", "Image URLs cannot be empty", "required");
    }
}

pub(crate) fn check_cover(cover: Option<&str>, urls: &[String], errors: &mut ValidationErrors) {
    if let Some(cover) = cover {
        if !urls.iter().any(|url| url.trim() == cover.trim()) {
            errors.add_error(
                "coverImage",
                "Cover image must be one of the product images",
                "cover_not_in_images",
            );
        }
    }
}
