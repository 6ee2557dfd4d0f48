//! Session validation port for JWT token validation.
//!
//! Provider-agnostic: the JWKS validator covers any OIDC issuer, and a mock
//! exists for tests.
//!
//! All implementations MUST validate:
//! - **Issuer (iss)**: Token must come from expected auth provider
//! - **Audience (aud)**: Token must be intended for this application
//! - **Expiry (exp)**: Token must not be expired

use async_trait::async_trait;

use crate::domain::foundation::{AuthError, IdentityClaims};

/// Validates access tokens and extracts the identity they vouch for.
///
/// # Contract
///
/// - `AuthError::InvalidToken` for malformed tokens or bad signatures
/// - `AuthError::TokenExpired` for expired tokens
/// - `AuthError::ServiceUnavailable` for transient provider errors
#[async_trait]
pub trait SessionValidator: Send + Sync {
    /// `token` is the raw JWT without the "Bearer " prefix.
    async fn validate(&self, token: &str) -> Result<IdentityClaims, AuthError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::RwLock;

    struct TestSessionValidator {
        tokens: RwLock<HashMap<String, IdentityClaims>>,
    }

    #[async_trait]
    impl SessionValidator for TestSessionValidator {
        async fn validate(&self, token: &str) -> Result<IdentityClaims, AuthError> {
            self.tokens
                .read()
                .unwrap()
                .get(token)
                .cloned()
                .ok_or(AuthError::InvalidToken)
        }
    }

    #[tokio::test]
    async fn session_validator_returns_claims_for_known_token() {
        let validator = TestSessionValidator {
            tokens: RwLock::new(HashMap::new()),
        };
        validator
            .tokens
            .write()
            .unwrap()
            .insert("tok".to_string(), IdentityClaims::new("sub-1", "a@example.com"));

        let claims = validator.validate("tok").await.unwrap();
        assert_eq!(claims.subject, "sub-1");
        assert!(matches!(validator.validate("nope").await, Err(AuthError::InvalidToken)));
    }

    #[test]
    fn session_validator_trait_is_send_sync() {
        fn assert_send_sync<T: Send + Sync + ?Sized>() {}
        assert_send_sync::<dyn SessionValidator>();
    }
}
