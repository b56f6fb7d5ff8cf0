//! Product route handlers
//!
//! JSON catalog endpoints operate on already-uploaded image URLs. The
//! multipart `publish` and `revise` endpoints upload the files themselves
//! and clean them up again when the catalog write fails.

pub mod catalog;
pub mod workflow;

pub use catalog::{
    create_product, delete_product, get_product, list_products, list_products_by_manager,
    update_product,
};
pub use workflow::{publish_product, revise_product};
