//! Gym booking handlers: checkout, payment, redemption, cancellation.

mod booking_queries;
mod cancel_booking;
mod create_booking;
mod redeem_booking;
mod verify_booking_payment;

pub use booking_queries::BookingQueries;
pub use cancel_booking::{CancelBookingCommand, CancelBookingHandler};
pub use create_booking::{CheckoutResult, CreateBookingCommand, CreateBookingHandler};
pub use redeem_booking::{RedeemBookingCommand, RedeemBookingHandler, RedeemResult, RedeemTarget};
pub use verify_booking_payment::{VerifyBookingPaymentHandler, VerifyPaymentCommand};
