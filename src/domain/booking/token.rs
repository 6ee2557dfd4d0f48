//! Redemption token carried in a booking's QR code.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::domain::foundation::ValidationError;

const TOKEN_LEN: usize = 64;

/// Opaque 256-bit random value, hex-encoded.
///
/// Holds no expiry or booking data; redemption looks it up verbatim and
/// checks the stored booking.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RedemptionToken(String);

impl RedemptionToken {
    /// Draws a fresh token from the OS random source.
    pub fn generate() -> Self {
        Self(format!(
            "{}{}",
            Uuid::new_v4().simple(),
            Uuid::new_v4().simple()
        ))
    }

    /// Accepts a scanned value; surrounding whitespace is ignored.
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(ValidationError::empty_field("qr_code"));
        }
        if raw.len() != TOKEN_LEN || !raw.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(ValidationError::invalid_format(
                "qr_code",
                "not a booking code",
            ));
        }
        Ok(Self(raw.to_ascii_lowercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// Tokens are bearer credentials; keep them out of logs.
impl fmt::Debug for RedemptionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RedemptionToken({}…)", &self.0[..8.min(self.0.len())])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_tokens_are_64_hex_chars() {
        let token = RedemptionToken::generate();
        assert_eq!(token.as_str().len(), 64);
        assert!(token.as_str().bytes().all(|b| b.is_ascii_hexdigit()));
    }

    #[test]
    fn generated_tokens_are_unique() {
        assert_ne!(RedemptionToken::generate(), RedemptionToken::generate());
    }

    #[test]
    fn parse_round_trips_generated_token() {
        let token = RedemptionToken::generate();
        let scanned = format!("  {}\n", token.as_str().to_uppercase());
        assert_eq!(RedemptionToken::parse(&scanned).unwrap(), token);
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!(RedemptionToken::parse("").is_err());
        assert!(RedemptionToken::parse("abc").is_err());
        assert!(RedemptionToken::parse(&"z".repeat(64)).is_err());
    }

    #[test]
    fn debug_redacts() {
        let token = RedemptionToken::generate();
        let debug = format!("{:?}", token);
        assert!(!debug.contains(token.as_str()));
    }
}
