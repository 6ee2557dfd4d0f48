//! Mock session validator for testing.
//!
//! ```ignore
//! let validator = MockSessionValidator::new()
//!     .with_identity("owner-token", IdentityClaims::new("owner-sub", "owner@example.com"));
//! ```

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::domain::foundation::{AuthError, IdentityClaims};
use crate::ports::SessionValidator;

/// Tokens not registered return `InvalidToken`.
#[derive(Debug, Default)]
pub struct MockSessionValidator {
    tokens: RwLock<HashMap<String, IdentityClaims>>,
    force_error: RwLock<Option<AuthError>>,
}

impl MockSessionValidator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_identity(self, token: impl Into<String>, claims: IdentityClaims) -> Self {
        self.add_token(token, claims);
        self
    }

    /// Registers `token` for a user whose subject and email derive from `name`.
    pub fn with_test_user(self, token: impl Into<String>, name: &str) -> Self {
        let claims = IdentityClaims::new(format!("sub-{}", name), format!("{}@test.example.com", name))
            .with_display_name(name);
        self.with_identity(token, claims)
    }

    /// Forces all validations to fail with `error`.
    pub fn with_error(self, error: AuthError) -> Self {
        *self.force_error.write().unwrap_or_else(|e| e.into_inner()) = Some(error);
        self
    }

    pub fn add_token(&self, token: impl Into<String>, claims: IdentityClaims) {
        self.tokens
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(token.into(), claims);
    }
}

#[async_trait]
impl SessionValidator for MockSessionValidator {
    async fn validate(&self, token: &str) -> Result<IdentityClaims, AuthError> {
        if let Some(error) = self.force_error.read().unwrap_or_else(|e| e.into_inner()).clone() {
            return Err(error);
        }
        self.tokens
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(token)
            .cloned()
            .ok_or(AuthError::InvalidToken)
    }
}
