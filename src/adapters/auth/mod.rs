//! Authentication adapters.
//!
//! Implementations of the `SessionValidator` port:
//!
//! - `jwks` - OIDC JWT validation against the issuer's JWKS
//! - `mock` - Test implementation that doesn't require an identity provider

mod jwks;
mod mock;

pub use jwks::JwksSessionValidator;
pub use mock::MockSessionValidator;
