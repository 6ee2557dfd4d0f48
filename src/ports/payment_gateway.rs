//! Payment gateway port.
//!
//! The gateway follows an order/verify flow: the server creates an order
//! for the exact amount, the client pays it in the gateway's hosted
//! checkout, then posts back `(order_id, payment_id, signature)`. The
//! signature is an HMAC-SHA256 over `"{order_id}|{payment_id}"` keyed by
//! the merchant secret, so verification needs no network round trip.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::{DomainError, ErrorCode, Money};

#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Creates an order for `request.amount` minor units.
    async fn create_order(&self, request: OrderRequest) -> Result<PaymentOrder, PaymentError>;

    /// Checks the checkout signature in constant time.
    fn verify_signature(&self, order_id: &str, payment_id: &str, signature: &str) -> Result<(), PaymentError>;

    /// Public key id handed to clients to open the hosted checkout.
    fn key_id(&self) -> &str;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRequest {
    pub amount: Money,
    /// Our reference for the order, e.g. the booking id.
    pub receipt: String,
    /// Free-form key/value notes stored with the order.
    #[serde(default)]
    pub notes: Vec<(String, String)>,
}

impl OrderRequest {
    pub fn new(amount: Money, receipt: impl Into<String>) -> Self {
        Self {
            amount,
            receipt: receipt.into(),
            notes: Vec::new(),
        }
    }

    pub fn with_note(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.notes.push((key.into(), value.into()));
        self
    }
}

/// An order as created by the gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentOrder {
    pub id: String,
    pub amount: Money,
    pub currency: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentErrorCode {
    InvalidSignature,
    NetworkError,
    AuthenticationError,
    /// The gateway rejected the request.
    GatewayRejected,
    InvalidResponse,
}

impl fmt::Display for PaymentErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PaymentErrorCode::InvalidSignature => "invalid_signature",
            PaymentErrorCode::NetworkError => "network_error",
            PaymentErrorCode::AuthenticationError => "authentication_error",
            PaymentErrorCode::GatewayRejected => "gateway_rejected",
            PaymentErrorCode::InvalidResponse => "invalid_response",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentError {
    pub code: PaymentErrorCode,
    pub message: String,
}

impl PaymentError {
    pub fn new(code: PaymentErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn invalid_signature() -> Self {
        Self::new(PaymentErrorCode::InvalidSignature, "Payment signature mismatch")
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(PaymentErrorCode::NetworkError, message)
    }
}

impl fmt::Display for PaymentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for PaymentError {}

impl From<PaymentError> for DomainError {
    fn from(err: PaymentError) -> Self {
        match err.code {
            PaymentErrorCode::InvalidSignature => {
                DomainError::new(ErrorCode::PaymentSignatureInvalid, "Payment verification failed")
            }
            _ => DomainError::new(ErrorCode::PaymentGatewayError, err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_signature_maps_to_signature_code() {
        let err: DomainError = PaymentError::invalid_signature().into();
        assert_eq!(err.code, ErrorCode::PaymentSignatureInvalid);
    }

    #[test]
    fn other_errors_map_to_gateway_code() {
        let err: DomainError = PaymentError::network("timeout").into();
        assert_eq!(err.code, ErrorCode::PaymentGatewayError);
    }

    #[test]
    fn order_request_collects_notes() {
        let req = OrderRequest::new(Money::from_major(100), "bk_1").with_note("gym", "g1");
        assert_eq!(req.notes, vec![("gym".to_string(), "g1".to_string())]);
    }
}
