//! Domain entities representing core business objects.

pub mod caller;
pub mod product;
pub mod token;
pub mod user;


// Re-export commonly used types
pub use caller::AuthenticatedCaller;
pub use product::{
    normalize_image_urls, NewProduct, Product, ProductChanges, ProductImage, ProductListing,
};
pub use token::{AccessToken, Claims, ACCESS_TOKEN_EXPIRY_MINUTES, JWT_AUDIENCE, JWT_ISSUER};
pub use user::{
    normalize_email, AccountChanges, ManagerSummary, NewAccount, Role, User, UserFilter,
    UserProfile, MIN_PASSWORD_LENGTH,
};
