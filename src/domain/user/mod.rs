//! Local user accounts.
//!
//! Accounts are provisioned on first authenticated request from the identity
//! provider's claims. Roles only ever move up: registering as a trainer or
//! creating a gym promotes the account, nothing demotes it.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{CurrentUser, IdentityClaims, Role, Timestamp, UserId};

/// Ordering used for promotion. A gym owner may also train, so `GymOwner`
/// outranks `Trainer`.
fn rank(role: Role) -> u8 {
    match role {
        Role::User => 0,
        Role::Trainer => 1,
        Role::GymOwner => 2,
        Role::SuperAdmin => 3,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    /// Identity provider subject.
    pub subject: String,
    pub email: String,
    pub name: String,
    pub role: Role,
    pub created_at: Timestamp,
}

impl User {
    /// Builds a new account from token claims. Emails listed in
    /// `super_admins` (case-insensitive) start as super-admins.
    pub fn provision(claims: &IdentityClaims, super_admins: &[String]) -> Self {
        let role = if super_admins
            .iter()
            .any(|e| e.eq_ignore_ascii_case(&claims.email))
        {
            Role::SuperAdmin
        } else {
            Role::User
        };
        Self {
            id: UserId::new(),
            subject: claims.subject.clone(),
            email: claims.email.to_lowercase(),
            name: claims.name_or_email().to_string(),
            role,
            created_at: Timestamp::now(),
        }
    }

    /// Raises the role to `role` if it outranks the current one.
    /// Returns whether anything changed.
    pub fn promote_to(&mut self, role: Role) -> bool {
        if rank(role) > rank(self.role) {
            self.role = role;
            true
        } else {
            false
        }
    }

    pub fn to_current_user(&self) -> CurrentUser {
        CurrentUser {
            id: self.id,
            email: self.email.clone(),
            name: self.name.clone(),
            role: self.role,
        }
    }
}
