//! MySQL repository implementations

mod product_repository_impl;
pub(crate) mod rows;
mod user_repository_impl;

pub use product_repository_impl::MySqlProductRepository;
pub use user_repository_impl::MySqlUserRepository;
