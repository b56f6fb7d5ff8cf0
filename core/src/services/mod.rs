//! Business services containing domain logic and use cases.

pub mod accounts;
pub mod auth;
pub mod catalog;
pub mod password;
pub mod storage;
pub mod token;

// Re-export commonly used types
pub use accounts::{AccountService, AccountServiceConfig};
pub use auth::AuthService;
pub use catalog::{CatalogConfig, CatalogService, ProductWorkflow, PublishRequest, ReviseRequest};
pub use password::PasswordHasher;
pub use storage::{ImageUpload, MockObjectStorage, ObjectStorage, UploadedImage};
pub use token::{TokenService, TokenServiceConfig};
