//! OIDC JWT validation against the issuer's JWKS.
//!
//! 1. Fetch JWKS from `{issuer}/.well-known/jwks.json` (cached)
//! 2. Verify the JWT signature with the key matching the header `kid`
//! 3. Validate issuer, audience and expiry
//! 4. Map claims to `IdentityClaims`

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use jsonwebtoken::{decode, decode_header, jwk::JwkSet, Algorithm, DecodingKey, Validation};
use serde::Deserialize;
use tokio::sync::RwLock;

use crate::config::AuthConfig;
use crate::domain::foundation::{AuthError, IdentityClaims};
use crate::ports::SessionValidator;

struct JwksCache {
    jwks: JwkSet,
    fetched_at: Instant,
    ttl: Duration,
}

impl JwksCache {
    fn new(jwks: JwkSet, ttl: Duration) -> Self {
        Self {
            jwks,
            fetched_at: Instant::now(),
            ttl,
        }
    }

    fn is_expired(&self) -> bool {
        self.fetched_at.elapsed() > self.ttl
    }
}

#[derive(Debug, Deserialize)]
struct TokenClaims {
    sub: String,
    iss: String,
    #[serde(default)]
    aud: Audience,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    email_verified: Option<bool>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    preferred_username: Option<String>,
}

/// `aud` may be a string or an array.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(untagged)]
enum Audience {
    #[default]
    None,
    Single(String),
    Multiple(Vec<String>),
}

impl Audience {
    fn contains(&self, expected: &str) -> bool {
        match self {
            Audience::None => false,
            Audience::Single(s) => s == expected,
            Audience::Multiple(v) => v.iter().any(|s| s == expected),
        }
    }
}

pub struct JwksSessionValidator {
    issuer: String,
    audience: String,
    jwks_url: String,
    ttl: Duration,
    http_client: reqwest::Client,
    jwks_cache: Arc<RwLock<Option<JwksCache>>>,
}

impl JwksSessionValidator {
    /// Keys are fetched lazily on first validation.
    pub fn new(config: &AuthConfig) -> Result<Self, AuthError> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| AuthError::service_unavailable(e.to_string()))?;

        Ok(Self {
            issuer: config.issuer.trim_end_matches('/').to_string(),
            audience: config.audience.clone(),
            jwks_url: config.jwks_url(),
            ttl: config.jwks_cache_ttl(),
            http_client,
            jwks_cache: Arc::new(RwLock::new(None)),
        })
    }

    async fn fetch_jwks(&self) -> Result<JwkSet, AuthError> {
        tracing::debug!(url = %self.jwks_url, "Fetching JWKS");

        let response = self.http_client.get(&self.jwks_url).send().await.map_err(|e| {
            tracing::error!(error = %e, "Failed to fetch JWKS");
            AuthError::service_unavailable(format!("Failed to fetch JWKS: {}", e))
        })?;

        if !response.status().is_success() {
            let status = response.status();
            tracing::error!(%status, "JWKS endpoint returned error");
            return Err(AuthError::service_unavailable(format!(
                "JWKS endpoint returned {}",
                status
            )));
        }

        let jwks: JwkSet = response.json().await.map_err(|e| {
            tracing::error!(error = %e, "Failed to parse JWKS");
            AuthError::service_unavailable(format!("Failed to parse JWKS: {}", e))
        })?;

        tracing::debug!(keys = jwks.keys.len(), "Fetched JWKS");
        Ok(jwks)
    }

    async fn get_jwks(&self) -> Result<JwkSet, AuthError> {
        {
            let cache = self.jwks_cache.read().await;
            if let Some(ref cached) = *cache {
                if !cached.is_expired() {
                    return Ok(cached.jwks.clone());
                }
            }
        }

        let jwks = self.fetch_jwks().await?;
        *self.jwks_cache.write().await = Some(JwksCache::new(jwks.clone(), self.ttl));
        Ok(jwks)
    }

    fn find_decoding_key(
        header: &jsonwebtoken::Header,
        jwks: &JwkSet,
    ) -> Result<(DecodingKey, Algorithm), AuthError> {
        let kid = header.kid.as_ref().ok_or_else(|| {
            tracing::warn!("JWT missing 'kid' header");
            AuthError::InvalidToken
        })?;

        let jwk = jwks.find(kid).ok_or_else(|| {
            tracing::warn!(kid = %kid, "No matching key in JWKS");
            AuthError::InvalidToken
        })?;

        use jsonwebtoken::jwk::KeyAlgorithm;
        let algorithm = match jwk.common.key_algorithm {
            Some(KeyAlgorithm::RS256) | None => Algorithm::RS256,
            Some(KeyAlgorithm::RS384) => Algorithm::RS384,
            Some(KeyAlgorithm::RS512) => Algorithm::RS512,
            Some(KeyAlgorithm::ES256) => Algorithm::ES256,
            Some(KeyAlgorithm::ES384) => Algorithm::ES384,
            Some(other) => {
                tracing::warn!(algorithm = ?other, "Unsupported JWT algorithm");
                return Err(AuthError::InvalidToken);
            }
        };

        let key = DecodingKey::from_jwk(jwk).map_err(|e| {
            tracing::warn!(error = %e, "Failed to build decoding key");
            AuthError::InvalidToken
        })?;
        Ok((key, algorithm))
    }

    fn decode_claims(
        &self,
        token: &str,
        key: &DecodingKey,
        algorithm: Algorithm,
    ) -> Result<TokenClaims, AuthError> {
        let mut validation = Validation::new(algorithm);
        validation.set_issuer(&[&self.issuer]);
        validation.set_audience(&[&self.audience]);
        validation.validate_exp = true;
        validation.set_required_spec_claims(&["exp", "iss", "sub"]);

        decode::<TokenClaims>(token, key, &validation)
            .map(|data| data.claims)
            .map_err(|e| {
                use jsonwebtoken::errors::ErrorKind;
                match e.kind() {
                    ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                    _ => {
                        tracing::warn!(error = %e, "Token validation failed");
                        AuthError::InvalidToken
                    }
                }
            })
    }
}

/// Maps validated claims to the identity the rest of the system uses.
fn to_identity(claims: TokenClaims, issuer: &str, audience: &str) -> Result<IdentityClaims, AuthError> {
    if claims.iss.trim_end_matches('/') != issuer || !claims.aud.contains(audience) {
        return Err(AuthError::InvalidToken);
    }
    let email = claims.email.filter(|e| !e.is_empty()).ok_or_else(|| {
        tracing::warn!("Token missing email claim");
        AuthError::InvalidToken
    })?;

    let mut identity = IdentityClaims::new(claims.sub, email);
    identity.email_verified = claims.email_verified.unwrap_or(false);
    if let Some(name) = claims.name.or(claims.preferred_username) {
        identity = identity.with_display_name(name);
    }
    Ok(identity)
}

#[async_trait]
impl SessionValidator for JwksSessionValidator {
    async fn validate(&self, token: &str) -> Result<IdentityClaims, AuthError> {
        let header = decode_header(token).map_err(|_| AuthError::InvalidToken)?;
        let jwks = self.get_jwks().await?;
        let (key, algorithm) = Self::find_decoding_key(&header, &jwks)?;
        let claims = self.decode_claims(token, &key, algorithm)?;
        to_identity(claims, &self.issuer, &self.audience)
    }
}

impl std::fmt::Debug for JwksSessionValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwksSessionValidator")
            .field("issuer", &self.issuer)
            .field("audience", &self.audience)
            .finish_non_exhaustive()
    }
}
