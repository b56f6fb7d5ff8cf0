//! Authorization rules deciding who may mutate which entity.
//!
//! The policy is pure: it holds an immutable Super Admin configuration and
//! answers questions about (actor, action, target) triples without I/O.

mod authorization;


pub use authorization::{AuthorizationPolicy, PolicyDenial, ProductAction};
