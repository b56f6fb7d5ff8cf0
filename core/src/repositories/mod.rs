pub mod product;
pub mod user;

pub use product::{MockProductRepository, ProductRepository};
pub use user::{MockUserRepository, UserRepository};
