//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Invalid port number")]
    InvalidPort,

    #[error("Invalid request timeout")]
    InvalidTimeout,

    #[error("Invalid database URL format")]
    InvalidDatabaseUrl,

    #[error("Pool min_connections exceeds max_connections")]
    InvalidPoolSize,

    #[error("Pool size exceeds maximum allowed (100)")]
    PoolSizeTooLarge,

    #[error("Auth issuer must use HTTPS in production")]
    IssuerMustBeHttps,

    #[error("Invalid payment gateway key id format")]
    InvalidPaymentKeyId,

    #[error("Currency must be a three-letter ISO code")]
    InvalidCurrency,

    #[error("Invalid from email address")]
    InvalidFromEmail,

    #[error("Commission rate must be between 0 and 10000 basis points")]
    InvalidCommissionRate,

    #[error("Upload size limit must be positive")]
    InvalidUploadLimit,

    #[error("Search settings must be positive")]
    InvalidSearchSettings,
}
