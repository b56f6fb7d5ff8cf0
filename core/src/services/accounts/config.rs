//! Configuration for the account service

use nexo_shared::config::{AuthConfig, PasswordConfig};

/// Configuration for the account service
#[derive(Debug, Clone)]
pub struct AccountServiceConfig {
    /// bcrypt cost for new password hashes
    pub bcrypt_cost: u32,
    /// Whether anonymous visitors may register client accounts
    pub allow_registration: bool,
}

impl Default for AccountServiceConfig {
    fn default() -> Self {
        Self {
            bcrypt_cost: PasswordConfig::default().bcrypt_cost,
            allow_registration: true,
        }
    }
}

impl From<&AuthConfig> for AccountServiceConfig {
    fn from(config: &AuthConfig) -> Self {
        Self {
            bcrypt_cost: config.password.bcrypt_cost,
            allow_registration: config.allow_registration,
        }
    }
}
