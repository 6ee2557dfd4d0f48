//! Email configuration

use serde::Deserialize;

use super::error::ValidationError;

/// Email configuration (transactional email API)
#[derive(Debug, Clone, Deserialize)]
pub struct EmailConfig {
    /// API key; may be empty when `enabled` is false
    #[serde(default)]
    pub api_key: String,

    /// From email address
    #[serde(default = "default_from_email")]
    pub from_email: String,

    /// From name
    #[serde(default = "default_from_name")]
    pub from_name: String,

    /// When false, emails are logged instead of sent
    #[serde(default)]
    pub enabled: bool,

    #[serde(default = "default_api_url")]
    pub api_url: String,
}

impl EmailConfig {
    /// Get formatted "From" header value
    pub fn from_header(&self) -> String {
        format!("{} <{}>", self.from_name, self.from_email)
    }

    /// Validate email configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.enabled && self.api_key.is_empty() {
            return Err(ValidationError::MissingRequired("EMAIL_API_KEY"));
        }
        if !self.from_email.contains('@') {
            return Err(ValidationError::InvalidFromEmail);
        }
        Ok(())
    }
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            from_email: default_from_email(),
            from_name: default_from_name(),
            enabled: false,
            api_url: default_api_url(),
        }
    }
}

fn default_from_email() -> String {
    "bookings@gymhub.app".to_string()
}

fn default_from_name() -> String {
    "GymHub".to_string()
}

fn default_api_url() -> String {
    "https://api.resend.com/emails".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_config_defaults() {
        let config = EmailConfig::default();
        assert_eq!(config.from_header(), "GymHub <bookings@gymhub.app>");
        assert!(!config.enabled);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_enabled_requires_api_key() {
        let config = EmailConfig {
            enabled: true,
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(ValidationError::MissingRequired("EMAIL_API_KEY"))
        );
    }

    #[test]
    fn test_invalid_from_email() {
        let config = EmailConfig {
            from_email: "nobody".to_string(),
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ValidationError::InvalidFromEmail));
    }
}
