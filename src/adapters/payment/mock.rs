//! Mock payment gateway for testing.
//!
//! Issues sequential order ids and verifies signatures with the real HMAC
//! scheme under a fixed test secret, so tests can produce valid signatures
//! with [`MockPaymentGateway::sign`].

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::ports::{OrderRequest, PaymentError, PaymentGateway, PaymentOrder};

use super::razorpay::{checkout_signature, verify_checkout_signature};

const TEST_SECRET: &str = "mock-gateway-secret";

#[derive(Default)]
pub struct MockPaymentGateway {
    next_order: AtomicU64,
    orders: Mutex<Vec<OrderRequest>>,
    fail_orders: Mutex<Option<PaymentError>>,
}

impl MockPaymentGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent `create_order` fail with `error`.
    pub fn fail_orders_with(&self, error: PaymentError) {
        *self.fail_orders.lock().unwrap_or_else(|e| e.into_inner()) = Some(error);
    }

    /// A valid checkout signature for the pair.
    pub fn sign(order_id: &str, payment_id: &str) -> String {
        checkout_signature(TEST_SECRET, order_id, payment_id)
            .map(hex::encode)
            .unwrap_or_default()
    }

    /// Orders created so far.
    pub fn orders(&self) -> Vec<OrderRequest> {
        self.orders.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

#[async_trait]
impl PaymentGateway for MockPaymentGateway {
    async fn create_order(&self, request: OrderRequest) -> Result<PaymentOrder, PaymentError> {
        if let Some(err) = self.fail_orders.lock().unwrap_or_else(|e| e.into_inner()).clone() {
            return Err(err);
        }
        let n = self.next_order.fetch_add(1, Ordering::SeqCst) + 1;
        let order = PaymentOrder {
            id: format!("order_mock_{}", n),
            amount: request.amount,
            currency: "INR".to_string(),
        };
        self.orders.lock().unwrap_or_else(|e| e.into_inner()).push(request);
        Ok(order)
    }

    fn verify_signature(&self, order_id: &str, payment_id: &str, signature: &str) -> Result<(), PaymentError> {
        verify_checkout_signature(TEST_SECRET, order_id, payment_id, signature)
    }

    fn key_id(&self) -> &str {
        "rzp_test_mock"
    }
}
