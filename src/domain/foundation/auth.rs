//! Authentication and authorization types for the domain layer.
//!
//! `IdentityClaims` is what the identity provider vouches for (a subject and
//! an email). `CurrentUser` is the local account those claims resolve to,
//! carrying the role used for authorization decisions.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use super::{DomainError, ErrorCode, UserId, ValidationError};

/// Claims extracted from a validated bearer token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityClaims {
    /// Provider subject identifier.
    pub subject: String,

    pub email: String,

    /// From the `name` or `preferred_username` claim when present.
    pub display_name: Option<String>,

    pub email_verified: bool,
}

impl IdentityClaims {
    pub fn new(subject: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            email: email.into(),
            display_name: None,
            email_verified: false,
        }
    }

    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    /// Returns the display name, or the email local part as fallback.
    pub fn name_or_email(&self) -> &str {
        match self.display_name.as_deref() {
            Some(name) if !name.is_empty() => name,
            _ => self.email.split('@').next().unwrap_or(&self.email),
        }
    }
}

/// Platform role of a local user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    GymOwner,
    Trainer,
    SuperAdmin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::GymOwner => "gym_owner",
            Role::Trainer => "trainer",
            Role::SuperAdmin => "super_admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Role {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Role::User),
            "gym_owner" => Ok(Role::GymOwner),
            "trainer" => Ok(Role::Trainer),
            "super_admin" => Ok(Role::SuperAdmin),
            other => Err(ValidationError::invalid_format(
                "role",
                format!("unknown role '{}'", other),
            )),
        }
    }
}

/// The local account behind an authenticated request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CurrentUser {
    pub id: UserId,
    pub email: String,
    pub name: String,
    pub role: Role,
}

impl CurrentUser {
    pub fn is_super_admin(&self) -> bool {
        self.role == Role::SuperAdmin
    }

    /// Fails with `Forbidden` unless the user holds one of `roles`.
    /// Super-admins pass every role check.
    pub fn require_role(&self, roles: &[Role]) -> Result<(), DomainError> {
        if self.is_super_admin() || roles.contains(&self.role) {
            Ok(())
        } else {
            Err(DomainError::new(ErrorCode::Forbidden, "Insufficient permissions")
                .with_detail("role", self.role.as_str()))
        }
    }

    pub fn require_super_admin(&self) -> Result<(), DomainError> {
        self.require_role(&[Role::SuperAdmin])
    }
}

/// Authentication errors that can occur during token validation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AuthError {
    /// The token is missing, malformed, or has an invalid signature.
    #[error("Invalid or expired token")]
    InvalidToken,

    #[error("Token expired")]
    TokenExpired,

    /// The identity provider is unreachable or misconfigured.
    #[error("Auth service unavailable: {0}")]
    ServiceUnavailable(String),
}

impl AuthError {
    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::ServiceUnavailable(message.into())
    }

    /// Returns true if this is a transient error that may succeed on retry.
    pub fn is_transient(&self) -> bool {
        matches!(self, AuthError::ServiceUnavailable(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(role: Role) -> CurrentUser {
        CurrentUser {
            id: UserId::new(),
            email: "a@example.com".to_string(),
            name: "A".to_string(),
            role,
        }
    }

    #[test]
    fn name_or_email_falls_back_to_local_part() {
        let claims = IdentityClaims::new("sub-1", "priya@example.com");
        assert_eq!(claims.name_or_email(), "priya");
        let named = claims.with_display_name("Priya S");
        assert_eq!(named.name_or_email(), "Priya S");
    }

    #[test]
    fn role_round_trips_through_str() {
        for role in [Role::User, Role::GymOwner, Role::Trainer, Role::SuperAdmin] {
            assert_eq!(role.as_str().parse::<Role>().unwrap(), role);
        }
        assert!("owner".parse::<Role>().is_err());
    }

    #[test]
    fn require_role_checks_membership() {
        assert!(user(Role::GymOwner).require_role(&[Role::GymOwner]).is_ok());
        let err = user(Role::User).require_role(&[Role::GymOwner]).unwrap_err();
        assert_eq!(err.code, ErrorCode::Forbidden);
    }

    #[test]
    fn super_admin_passes_any_role_check() {
        assert!(user(Role::SuperAdmin).require_role(&[Role::Trainer]).is_ok());
        assert!(user(Role::GymOwner).require_super_admin().is_err());
    }

    #[test]
    fn service_unavailable_is_transient() {
        assert!(AuthError::service_unavailable("down").is_transient());
        assert!(!AuthError::InvalidToken.is_transient());
    }
}
