//! Request handling helpers shared by the route modules

pub mod error;
pub mod multipart;

pub use error::{ApiError, ApiResult};
pub use multipart::{read_multipart, MultipartForm, MultipartLimits};
