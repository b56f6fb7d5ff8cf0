//! User entity representing a registered account in the NexoStore system.

use chrono::{DateTime, Utc};
use nexo_shared::utils::validation::{validators, Validate, ValidationErrors};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Minimum accepted length of a plain-text password
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Role of an account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Manages accounts and roles
    Admin,
    /// Publishes and maintains products
    Manager,
    /// Browses the public catalog
    Client,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Manager => "manager",
            Role::Client => "client",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "manager" => Ok(Role::Manager),
            "client" => Ok(Role::Client),
            other => Err(format!("Invalid role: {}", other)),
        }
    }
}

/// User entity
///
/// The password hash never leaves the account directory; every outward
/// facing representation goes through [`UserProfile`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    /// Unique identifier for the user
    pub id: Uuid,

    /// Display name
    pub name: String,

    /// Unique, lowercased email address
    pub email: String,

    /// bcrypt hash of the password
    pub password_hash: String,

    /// Account role
    pub role: Role,

    /// Contact phone number
    pub phone: Option<String>,

    /// ISO country of the phone number
    pub phone_country: Option<String>,

    /// Public URL of the avatar image
    pub avatar_url: Option<String>,

    /// Timestamp when the user was created
    pub created_at: DateTime<Utc>,

    /// Timestamp when the user was last updated
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Creates a new User instance
    pub fn new(
        name: impl Into<String>,
        email: &str,
        password_hash: impl Into<String>,
        role: Role,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: name.into().trim().to_string(),
            email: normalize_email(email),
            password_hash: password_hash.into(),
            role,
            phone: None,
            phone_country: None,
            avatar_url: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    pub fn is_manager(&self) -> bool {
        self.role == Role::Manager
    }

    /// Sanitized projection without the password hash
    pub fn profile(&self) -> UserProfile {
        UserProfile {
            id: self.id,
            name: self.name.clone(),
            email: self.email.clone(),
            role: self.role,
            phone: self.phone.clone(),
            phone_country: self.phone_country.clone(),
            avatar_url: self.avatar_url.clone(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }

    /// Projection embedded in product listings
    pub fn summary(&self) -> ManagerSummary {
        ManagerSummary {
            id: self.id,
            name: self.name.clone(),
            phone: self.phone.clone(),
        }
    }

    /// Bump the modification timestamp
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

/// Lowercase and trim an email address before storage or lookup
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Public user representation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub phone: Option<String>,
    pub phone_country: Option<String>,
    pub avatar_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Manager details shown next to a product
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManagerSummary {
    pub id: Uuid,
    pub name: String,
    pub phone: Option<String>,
}

/// Criteria for listing accounts
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserFilter {
    /// Case-insensitive substring of name or email
    pub search: Option<String>,
    /// Exact role
    pub role: Option<Role>,
}

impl UserFilter {
    pub fn new(search: Option<String>, role: Option<Role>) -> Self {
        let search = search
            .map(|term| term.trim().to_string())
            .filter(|term| !term.is_empty());
        Self { search, role }
    }

    /// In-memory evaluation of the filter
    pub fn matches(&self, user: &User) -> bool {
        if let Some(role) = self.role {
            if user.role != role {
                return false;
            }
        }
        match &self.search {
            Some(term) => {
                let term = term.to_lowercase();
                user.name.to_lowercase().contains(&term) || user.email.to_lowercase().contains(&term)
            }
            None => true,
        }
    }
}

/// Input for registering or creating an account
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAccount {
    pub name: String,
    pub email: String,
    pub password: String,
    /// Ignored for public registration
    pub role: Option<Role>,
    pub phone: Option<String>,
    pub phone_country: Option<String>,
    pub avatar_url: Option<String>,
}

impl NewAccount {
    pub fn new(name: impl Into<String>, email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            password: password.into(),
            role: None,
            phone: None,
            phone_country: None,
            avatar_url: None,
        }
    }

    pub fn with_role(mut self, role: Role) -> Self {
        self.role = Some(role);
        self
    }
}

impl Validate for NewAccount {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if !validators::not_empty(&self.name) {
            errors.add_error("name", "Name is required", "required");
        }
        if !validators::is_valid_email(&self.email) {
            errors.add_error("email", "Email must be a valid email address", "email");
        }
        if self.password.chars().count() < MIN_PASSWORD_LENGTH {
            errors.add_error(
                "password",
                format!("Password must be at least {} characters", MIN_PASSWORD_LENGTH),
                "length",
            );
        }
        errors.into_result()
    }
}

/// Partial update of an account; `None` leaves a field untouched
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccountChanges {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub phone: Option<String>,
    pub phone_country: Option<String>,
    pub avatar_url: Option<String>,
}

impl AccountChanges {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

impl Validate for AccountChanges {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if let Some(name) = &self.name {
            if !validators::not_empty(name) {
                errors.add_error("name", "Name cannot be empty", "required");
            }
        }
        if let Some(email) = &self.email {
            if !validators::is_valid_email(email) {
                errors.add_error("email", "Email must be a valid email address", "email");
            }
        }
        if let Some(password) = &self.password {
            if password.chars().count() < MIN_PASSWORD_LENGTH {
                errors.add_error(
                    "password",
                    format!("Password must be at least {} characters", MIN_PASSWORD_LENGTH),
                    "length",
                );
            }
        }
        errors.into_result()
    }
}
