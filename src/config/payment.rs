//! Payment gateway configuration

use serde::Deserialize;

use super::error::ValidationError;

/// Payment gateway configuration (order API + signature secret)
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentConfig {
    /// Public key id, also used as the basic-auth username
    pub key_id: String,

    /// Key secret used for API auth and payment signature verification
    pub key_secret: String,

    /// ISO currency code for orders
    #[serde(default = "default_currency")]
    pub currency: String,

    /// Order API base URL
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
}

impl PaymentConfig {
    /// Check if using gateway test mode
    pub fn is_test_mode(&self) -> bool {
        self.key_id.starts_with("rzp_test_")
    }

    /// Validate payment configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.key_id.is_empty() {
            return Err(ValidationError::MissingRequired("PAYMENT_KEY_ID"));
        }
        if self.key_secret.is_empty() {
            return Err(ValidationError::MissingRequired("PAYMENT_KEY_SECRET"));
        }
        if !self.key_id.starts_with("rzp_") {
            return Err(ValidationError::InvalidPaymentKeyId);
        }
        if self.currency.len() != 3 || !self.currency.chars().all(|c| c.is_ascii_uppercase()) {
            return Err(ValidationError::InvalidCurrency);
        }
        Ok(())
    }
}

impl Default for PaymentConfig {
    fn default() -> Self {
        Self {
            key_id: String::new(),
            key_secret: String::new(),
            currency: default_currency(),
            api_base_url: default_api_base_url(),
        }
    }
}

fn default_currency() -> String {
    "INR".to_string()
}

fn default_api_base_url() -> String {
    "https://api.razorpay.com/v1".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> PaymentConfig {
        PaymentConfig {
            key_id: "rzp_test_abc".to_string(),
            key_secret: "secret".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_is_test_mode() {
        assert!(valid().is_test_mode());
        let live = PaymentConfig {
            key_id: "rzp_live_abc".to_string(),
            ..valid()
        };
        assert!(!live.is_test_mode());
    }

    #[test]
    fn test_validation_missing_secret() {
        let config = PaymentConfig {
            key_secret: String::new(),
            ..valid()
        };
        assert_eq!(
            config.validate(),
            Err(ValidationError::MissingRequired("PAYMENT_KEY_SECRET"))
        );
    }

    #[test]
    fn test_validation_invalid_key_prefix() {
        let config = PaymentConfig {
            key_id: "pk_test_xxx".to_string(),
            ..valid()
        };
        assert_eq!(config.validate(), Err(ValidationError::InvalidPaymentKeyId));
    }

    #[test]
    fn test_validation_invalid_currency() {
        let config = PaymentConfig {
            currency: "inr".to_string(),
            ..valid()
        };
        assert_eq!(config.validate(), Err(ValidationError::InvalidCurrency));
    }

    #[test]
    fn test_validation_valid_config() {
        assert!(valid().validate().is_ok());
    }
}
