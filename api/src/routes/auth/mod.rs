//! Authentication route handlers
//!
//! This module contains the account entry points:
//! - Email and password login
//! - Public registration
//! - Profile of the authenticated caller

pub mod login;
pub mod profile;
pub mod register;

pub use login::login;
pub use profile::profile;
pub use register::register;
