//! Identity of the caller behind an authenticated request.

use uuid::Uuid;

use super::user::Role;

/// Caller identity derived from a verified access token
///
/// Never persisted. It only feeds the authorization policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedCaller {
    pub id: Uuid,
    pub email: String,
    pub role: Role,
}

impl AuthenticatedCaller {
    pub fn new(id: Uuid, email: impl Into<String>, role: Role) -> Self {
        Self {
            id,
            email: email.into(),
            role,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}
