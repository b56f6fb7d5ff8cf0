//! Request and response bodies of the HTTP API

pub mod auth;
pub mod product;
pub mod upload;
pub mod user;

pub use auth::{LoginRequest, LoginResponse, RegisterRequest};
pub use product::{CreateProductRequest, UpdateProductRequest};
pub use upload::{DeleteImagesRequest, UploadImagesResponse};
pub use user::{CreateUserRequest, UpdateRoleRequest, UpdateUserRequest, UserQuery};
