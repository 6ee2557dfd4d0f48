//! Payment gateway adapters.

mod mock;
mod razorpay;

pub use mock::MockPaymentGateway;
pub use razorpay::{verify_checkout_signature, RazorpayGateway};
