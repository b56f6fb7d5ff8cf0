//! Authentication service module
//!
//! Email/password login issuing access tokens, and profile lookup for the
//! authenticated caller.

mod service;

#[cfg(test)]
mod tests;

pub use service::AuthService;
