use std::fmt;

use nexo_shared::config::SuperAdminConfig;
use uuid::Uuid;

use crate::domain::entities::{AuthenticatedCaller, Product, Role, User};
use crate::errors::DomainError;

/// Denial produced by the policy, carrying a human-readable reason
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolicyDenial {
    reason: &'static str,
}

impl PolicyDenial {
    const fn new(reason: &'static str) -> Self {
        Self { reason }
    }

    pub fn reason(&self) -> &'static str {
        self.reason
    }
}

impl fmt::Display for PolicyDenial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.reason)
    }
}

impl From<PolicyDenial> for DomainError {
    fn from(denial: PolicyDenial) -> Self {
        DomainError::forbidden(denial.reason)
    }
}

/// Product mutations guarded by ownership
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProductAction {
    Update,
    Delete,
}

const UPDATE_PRODUCT_DENIED: PolicyDenial =
    PolicyDenial::new("You are not allowed to update this product");
const DELETE_PRODUCT_DENIED: PolicyDenial =
    PolicyDenial::new("You are not allowed to delete this product");
const PUBLISH_DENIED: PolicyDenial =
    PolicyDenial::new("Only managers and admins can publish products");
const ADMINISTER_USERS_DENIED: PolicyDenial = PolicyDenial::new("Only admins can manage users");
const UPDATE_USER_DENIED: PolicyDenial = PolicyDenial::new("You are not allowed to update this user");
const SUPER_ADMIN_EMAIL_LOCKED: PolicyDenial =
    PolicyDenial::new("Only the Super Admin can change the Super Admin email");
const SUPER_ADMIN_EMAIL_RESERVED: PolicyDenial =
    PolicyDenial::new("This email is reserved for the Super Admin account");
const SUPER_ADMIN_UNDELETABLE: PolicyDenial =
    PolicyDenial::new("The Super Admin account cannot be deleted");
const SELF_DELETE_DENIED: PolicyDenial = PolicyDenial::new("You cannot delete your own account");
const DELETE_USER_DENIED: PolicyDenial = PolicyDenial::new("Only admins can delete users");
const SUPER_ADMIN_ROLE_LOCKED: PolicyDenial =
    PolicyDenial::new("Only the Super Admin can change the Super Admin role");
const SELF_PROMOTION_DENIED: PolicyDenial =
    PolicyDenial::new("You cannot promote yourself to admin");
const CHANGE_ROLE_DENIED: PolicyDenial = PolicyDenial::new("Only admins can change user roles");

/// Decision layer for every guarded mutation
#[derive(Debug, Clone, Default)]
pub struct AuthorizationPolicy {
    super_admin: SuperAdminConfig,
}

impl AuthorizationPolicy {
    pub fn new(super_admin: SuperAdminConfig) -> Self {
        Self { super_admin }
    }

    pub fn super_admin(&self) -> &SuperAdminConfig {
        &self.super_admin
    }

    fn is_super_admin(&self, email: &str) -> bool {
        self.super_admin.is_super_admin_email(email)
    }

    /// Whether `actor` bypasses ownership and role checks
    ///
    /// Requires Super Admin mode to be enabled and the actor's email to be the
    /// configured Super Admin email.
    pub fn can_manage_super_admin_protections(&self, actor: &AuthenticatedCaller) -> bool {
        self.super_admin.mode_enabled && self.is_super_admin(&actor.email)
    }

    fn is_admin_or_bypass(&self, actor: &AuthenticatedCaller) -> bool {
        actor.role == Role::Admin || self.can_manage_super_admin_protections(actor)
    }

    pub fn can_mutate_product(&self, actor: &AuthenticatedCaller, product: &Product) -> bool {
        product.is_owned_by(actor.id) || self.can_manage_super_admin_protections(actor)
    }

    pub fn check_mutate_product(
        &self,
        actor: &AuthenticatedCaller,
        product: &Product,
        action: ProductAction,
    ) -> Result<(), PolicyDenial> {
        if self.can_mutate_product(actor, product) {
            return Ok(());
        }
        Err(match action {
            ProductAction::Update => UPDATE_PRODUCT_DENIED,
            ProductAction::Delete => DELETE_PRODUCT_DENIED,
        })
    }

    /// Managers and admins publish products
    pub fn check_publish_products(&self, actor: &AuthenticatedCaller) -> Result<(), PolicyDenial> {
        match actor.role {
            Role::Manager | Role::Admin => Ok(()),
            Role::Client if self.can_manage_super_admin_protections(actor) => Ok(()),
            Role::Client => Err(PUBLISH_DENIED),
        }
    }

    pub fn can_publish_products(&self, actor: &AuthenticatedCaller) -> bool {
        self.check_publish_products(actor).is_ok()
    }

    /// Admin-only account management (create, list, inspect others)
    pub fn check_administer_users(&self, actor: &AuthenticatedCaller) -> Result<(), PolicyDenial> {
        if self.is_admin_or_bypass(actor) {
            Ok(())
        } else {
            Err(ADMINISTER_USERS_DENIED)
        }
    }

    pub fn can_administer_users(&self, actor: &AuthenticatedCaller) -> bool {
        self.check_administer_users(actor).is_ok()
    }

    pub fn can_update_user(&self, actor: &AuthenticatedCaller, target_id: Uuid) -> bool {
        actor.id == target_id || self.is_admin_or_bypass(actor)
    }

    pub fn check_update_user(
        &self,
        actor: &AuthenticatedCaller,
        target_id: Uuid,
    ) -> Result<(), PolicyDenial> {
        if self.can_update_user(actor, target_id) {
            Ok(())
        } else {
            Err(UPDATE_USER_DENIED)
        }
    }

    /// The Super Admin email stays bound to the Super Admin account: nobody
    /// else may move it off that account or claim it for another one.
    pub fn check_change_email(
        &self,
        actor: &AuthenticatedCaller,
        target: &User,
        new_email: &str,
    ) -> Result<(), PolicyDenial> {
        let target_is_super_admin = self.is_super_admin(&target.email);
        if target_is_super_admin && !self.is_super_admin(&actor.email) {
            return Err(SUPER_ADMIN_EMAIL_LOCKED);
        }
        if !target_is_super_admin && self.is_super_admin(new_email) {
            return Err(SUPER_ADMIN_EMAIL_RESERVED);
        }
        Ok(())
    }

    /// Rules are evaluated in order: Super Admin immunity, self-deletion,
    /// then the admin requirement.
    pub fn check_delete_user(
        &self,
        actor: &AuthenticatedCaller,
        target: &User,
    ) -> Result<(), PolicyDenial> {
        if self.is_super_admin(&target.email) {
            return Err(SUPER_ADMIN_UNDELETABLE);
        }
        if actor.id == target.id {
            return Err(SELF_DELETE_DENIED);
        }
        if self.is_admin_or_bypass(actor) {
            Ok(())
        } else {
            Err(DELETE_USER_DENIED)
        }
    }

    pub fn can_delete_user(&self, actor: &AuthenticatedCaller, target: &User) -> bool {
        self.check_delete_user(actor, target).is_ok()
    }

    /// An existing admin may still reassign its own role; only non-admin
    /// self-promotion is refused.
    pub fn check_change_role(
        &self,
        actor: &AuthenticatedCaller,
        target: &User,
        new_role: Role,
    ) -> Result<(), PolicyDenial> {
        if self.is_super_admin(&target.email) && !self.is_super_admin(&actor.email) {
            return Err(SUPER_ADMIN_ROLE_LOCKED);
        }
        if actor.id == target.id && new_role == Role::Admin && actor.role != Role::Admin {
            return Err(SELF_PROMOTION_DENIED);
        }
        if self.is_admin_or_bypass(actor) {
            Ok(())
        } else {
            Err(CHANGE_ROLE_DENIED)
        }
    }

    pub fn can_change_role(
        &self,
        actor: &AuthenticatedCaller,
        target: &User,
        new_role: Role,
    ) -> bool {
        self.check_change_role(actor, target, new_role).is_ok()
    }
}
