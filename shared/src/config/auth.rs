//! Authentication and authorization configuration

use serde::{Deserialize, Serialize};

use super::{env_non_empty, env_or};

const DEFAULT_SECRET: &str = "your-secret-key-change-in-production";

/// JWT authentication configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct JwtConfig {
    /// JWT secret key for signing tokens
    pub secret: String,

    /// Access token expiry time in minutes
    pub access_token_expiry_minutes: i64,

    /// JWT issuer claim
    pub issuer: String,

    /// JWT audience claim
    pub audience: String,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: String::from(DEFAULT_SECRET),
            access_token_expiry_minutes: 60,
            issuer: String::from("nexostore"),
            audience: String::from("nexostore-api"),
        }
    }
}

impl JwtConfig {
    /// Create a new JWT configuration with secret
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            ..Default::default()
        }
    }

    /// Create from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            secret: env_non_empty("JWT_SECRET").unwrap_or(defaults.secret),
            access_token_expiry_minutes: env_or(
                "JWT_EXPIRES_IN_MINUTES",
                defaults.access_token_expiry_minutes,
            ),
            issuer: env_non_empty("JWT_ISSUER").unwrap_or(defaults.issuer),
            audience: env_non_empty("JWT_AUDIENCE").unwrap_or(defaults.audience),
        }
    }

    /// Set access token expiry in minutes
    pub fn with_access_expiry_minutes(mut self, minutes: i64) -> Self {
        self.access_token_expiry_minutes = minutes;
        self
    }

    /// Check if using default secret (security warning)
    pub fn is_using_default_secret(&self) -> bool {
        self.secret == DEFAULT_SECRET
    }
}

/// Super Admin identity and the switch that enables its bypass
///
/// `mode_enabled` only turns on the ownership and role bypass. The Super Admin
/// account stays protected from deletion and foreign role changes either way.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct SuperAdminConfig {
    /// Email of the single Super Admin account
    pub email: Option<String>,

    /// `SUPER_ADMIN_MODE_ENABLED=true`
    pub mode_enabled: bool,
}

impl SuperAdminConfig {
    pub fn new(email: impl Into<String>, mode_enabled: bool) -> Self {
        Self {
            email: Some(email.into()),
            mode_enabled,
        }
    }

    /// No Super Admin configured
    pub fn disabled() -> Self {
        Self::default()
    }

    /// Create from environment variables
    pub fn from_env() -> Self {
        Self {
            email: env_non_empty("SUPER_ADMIN_EMAIL"),
            mode_enabled: std::env::var("SUPER_ADMIN_MODE_ENABLED")
                .map(|value| value.trim() == "true")
                .unwrap_or(false),
        }
    }

    /// Whether `email` identifies the configured Super Admin
    pub fn is_super_admin_email(&self, email: &str) -> bool {
        self.email
            .as_deref()
            .map(|configured| configured.eq_ignore_ascii_case(email.trim()))
            .unwrap_or(false)
    }
}

/// Password hashing configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PasswordConfig {
    /// bcrypt cost factor
    pub bcrypt_cost: u32,
}

impl Default for PasswordConfig {
    fn default() -> Self {
        Self { bcrypt_cost: 10 }
    }
}

impl PasswordConfig {
    pub fn from_env() -> Self {
        Self {
            bcrypt_cost: env_or("BCRYPT_COST", Self::default().bcrypt_cost),
        }
    }

    pub fn with_bcrypt_cost(mut self, cost: u32) -> Self {
        self.bcrypt_cost = cost;
        self
    }
}

/// Authentication configuration combining all auth-related settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthConfig {
    /// JWT configuration
    pub jwt: JwtConfig,

    /// Super Admin protections
    #[serde(default)]
    pub super_admin: SuperAdminConfig,

    /// Password hashing
    #[serde(default)]
    pub password: PasswordConfig,

    /// Open self-service registration; `ALLOW_REGISTRATION=false` closes it
    pub allow_registration: bool,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt: JwtConfig::default(),
            super_admin: SuperAdminConfig::default(),
            password: PasswordConfig::default(),
            allow_registration: true,
        }
    }
}

impl AuthConfig {
    pub fn from_env() -> Self {
        Self {
            jwt: JwtConfig::from_env(),
            super_admin: SuperAdminConfig::from_env(),
            password: PasswordConfig::from_env(),
            allow_registration: std::env::var("ALLOW_REGISTRATION")
                .map(|value| value.trim() != "false")
                .unwrap_or(true),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_super_admin_email_match_is_case_insensitive() {
        let config = SuperAdminConfig::new("root@nexostore.com", true);
        assert!(config.is_super_admin_email("ROOT@nexostore.com"));
        assert!(config.is_super_admin_email(" root@nexostore.com "));
        assert!(!config.is_super_admin_email("admin@nexostore.com"));
    }

    #[test]
    fn test_unconfigured_super_admin_matches_nobody() {
        let config = SuperAdminConfig::disabled();
        assert!(!config.is_super_admin_email(""));
        assert!(!config.is_super_admin_email("root@nexostore.com"));
    }

    #[test]
    fn test_registration_open_by_default() {
        assert!(AuthConfig::default().allow_registration);
    }

    #[test]
    fn test_jwt_defaults() {
        let config = JwtConfig::default();
        assert_eq!(config.access_token_expiry_minutes, 60);
        assert!(config.is_using_default_secret());
        assert!(!JwtConfig::new("s3cret").is_using_default_secret());
    }
}
