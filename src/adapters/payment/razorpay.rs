//! Razorpay order API adapter.
//!
//! Implements `PaymentGateway`: orders are created over the REST API with
//! basic auth, checkout signatures are verified locally.
//!
//! # Security
//!
//! - HMAC-SHA256 signature verification with constant-time comparison
//! - Key secret held in `secrecy::SecretString`

use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use subtle::ConstantTimeEq;

use crate::config::PaymentConfig;
use crate::domain::foundation::Money;
use crate::ports::{OrderRequest, PaymentError, PaymentErrorCode, PaymentGateway, PaymentOrder};

type HmacSha256 = Hmac<Sha256>;

/// Hex HMAC-SHA256 of `"{order_id}|{payment_id}"`, as the gateway signs it.
pub fn checkout_signature(secret: &str, order_id: &str, payment_id: &str) -> Result<Vec<u8>, PaymentError> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|e| PaymentError::new(PaymentErrorCode::AuthenticationError, e.to_string()))?;
    mac.update(order_id.as_bytes());
    mac.update(b"|");
    mac.update(payment_id.as_bytes());
    Ok(mac.finalize().into_bytes().to_vec())
}

/// Compares a hex signature from the client against the expected MAC.
pub fn verify_checkout_signature(
    secret: &str,
    order_id: &str,
    payment_id: &str,
    signature: &str,
) -> Result<(), PaymentError> {
    let expected = checkout_signature(secret, order_id, payment_id)?;
    let provided = hex::decode(signature.trim()).map_err(|_| PaymentError::invalid_signature())?;

    if expected.as_slice().ct_eq(provided.as_slice()).unwrap_u8() != 1 {
        tracing::warn!(order_id, payment_id, "Invalid payment signature");
        return Err(PaymentError::invalid_signature());
    }
    Ok(())
}

#[derive(Serialize)]
struct CreateOrderBody<'a> {
    amount: i64,
    currency: &'a str,
    receipt: &'a str,
    notes: BTreeMap<&'a str, &'a str>,
}

#[derive(Deserialize)]
struct OrderResponse {
    id: String,
    amount: i64,
    currency: String,
}

pub struct RazorpayGateway {
    key_id: String,
    key_secret: SecretString,
    currency: String,
    api_base_url: String,
    http_client: reqwest::Client,
}

impl RazorpayGateway {
    pub fn new(config: &PaymentConfig) -> Result<Self, PaymentError> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(15))
            .build()
            .map_err(|e| PaymentError::network(e.to_string()))?;

        Ok(Self {
            key_id: config.key_id.clone(),
            key_secret: SecretString::new(config.key_secret.clone()),
            currency: config.currency.clone(),
            api_base_url: config.api_base_url.trim_end_matches('/').to_string(),
            http_client,
        })
    }
}

#[async_trait]
impl PaymentGateway for RazorpayGateway {
    async fn create_order(&self, request: OrderRequest) -> Result<PaymentOrder, PaymentError> {
        let url = format!("{}/orders", self.api_base_url);
        let body = CreateOrderBody {
            amount: request.amount.minor(),
            currency: &self.currency,
            receipt: &request.receipt,
            notes: request
                .notes
                .iter()
                .map(|(k, v)| (k.as_str(), v.as_str()))
                .collect(),
        };

        let response = self
            .http_client
            .post(&url)
            .basic_auth(&self.key_id, Some(self.key_secret.expose_secret()))
            .json(&body)
            .send()
            .await
            .map_err(|e| PaymentError::network(e.to_string()))?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(PaymentError::new(
                PaymentErrorCode::AuthenticationError,
                "Gateway rejected credentials",
            ));
        }
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            tracing::error!(%status, error = %error_text, receipt = %request.receipt, "Order creation failed");
            return Err(PaymentError::new(
                PaymentErrorCode::GatewayRejected,
                format!("Order API returned {}", status),
            ));
        }

        let order: OrderResponse = response.json().await.map_err(|e| {
            PaymentError::new(
                PaymentErrorCode::InvalidResponse,
                format!("Failed to parse order response: {}", e),
            )
        })?;

        tracing::info!(order_id = %order.id, amount = order.amount, receipt = %request.receipt, "Payment order created");

        Ok(PaymentOrder {
            id: order.id,
            amount: Money::from_minor(order.amount),
            currency: order.currency,
        })
    }

    fn verify_signature(&self, order_id: &str, payment_id: &str, signature: &str) -> Result<(), PaymentError> {
        verify_checkout_signature(self.key_secret.expose_secret(), order_id, payment_id, signature)
    }

    fn key_id(&self) -> &str {
        &self.key_id
    }
}

impl std::fmt::Debug for RazorpayGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RazorpayGateway")
            .field("key_id", &self.key_id)
            .field("api_base_url", &self.api_base_url)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ════════════════════════════════════════════════════════════════════════════
    // Signature Tests
    // ════════════════════════════════════════════════════════════════════════════

    fn sign(secret: &str, order: &str, payment: &str) -> String {
        hex::encode(checkout_signature(secret, order, payment).unwrap())
    }

    #[test]
    fn valid_signature_verifies() {
        let sig = sign("secret", "order_1", "pay_1");
        assert!(verify_checkout_signature("secret", "order_1", "pay_1", &sig).is_ok());
    }

    #[test]
    fn signature_for_other_payment_fails() {
        let sig = sign("secret", "order_1", "pay_1");
        let err = verify_checkout_signature("secret", "order_1", "pay_2", &sig).unwrap_err();
        assert_eq!(err.code, PaymentErrorCode::InvalidSignature);
    }

    #[test]
    fn signature_with_wrong_secret_fails() {
        let sig = sign("other", "order_1", "pay_1");
        assert!(verify_checkout_signature("secret", "order_1", "pay_1", &sig).is_err());
    }

    #[test]
    fn non_hex_signature_fails() {
        assert!(verify_checkout_signature("secret", "order_1", "pay_1", "zz-not-hex").is_err());
    }

    #[test]
    fn signature_matches_known_vector() {
        // HMAC-SHA256("secret", "order_1|pay_1")
        let mut mac = HmacSha256::new_from_slice(b"secret").unwrap();
        mac.update(b"order_1|pay_1");
        let expected = hex::encode(mac.finalize().into_bytes());
        assert_eq!(sign("secret", "order_1", "pay_1"), expected);
    }

    #[test]
    fn debug_hides_secret() {
        let config = PaymentConfig {
            key_id: "rzp_test_abc".to_string(),
            key_secret: "super-secret".to_string(),
            ..Default::default()
        };
        let gateway = RazorpayGateway::new(&config).unwrap();
        assert!(!format!("{:?}", gateway).contains("super-secret"));
    }
}
