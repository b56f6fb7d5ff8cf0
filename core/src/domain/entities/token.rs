//! Access token claims and the login response.

use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::caller::AuthenticatedCaller;
use super::user::{Role, User};
use crate::errors::TokenError;

/// Default access token lifetime
pub const ACCESS_TOKEN_EXPIRY_MINUTES: i64 = 60;

/// JWT issuer
pub const JWT_ISSUER: &str = "nexostore";

/// JWT audience
pub const JWT_AUDIENCE: &str = "nexostore-api";

/// JWT claims carried by an access token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: user id
    pub sub: String,
    pub email: String,
    pub role: Role,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    pub iss: String,
    pub aud: String,
    /// Unique token id
    pub jti: String,
}

impl Claims {
    pub fn new(user: &User, expiry_minutes: i64, issuer: &str, audience: &str) -> Self {
        let now = Utc::now();
        Self {
            sub: user.id.to_string(),
            email: user.email.clone(),
            role: user.role,
            exp: (now + Duration::minutes(expiry_minutes)).timestamp(),
            iat: now.timestamp(),
            iss: issuer.to_string(),
            aud: audience.to_string(),
            jti: Uuid::new_v4().to_string(),
        }
    }

    pub fn user_id(&self) -> Result<Uuid, TokenError> {
        Uuid::parse_str(&self.sub).map_err(|_| TokenError::InvalidClaims)
    }

    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() >= self.exp
    }

    /// Convert verified claims into the request identity
    pub fn into_caller(self) -> Result<AuthenticatedCaller, TokenError> {
        let id = self.user_id()?;
        Ok(AuthenticatedCaller::new(id, self.email, self.role))
    }
}

/// Body returned by a successful login
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessToken {
    pub access_token: String,
}
