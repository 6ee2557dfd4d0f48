//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! ## Repository Ports
//!
//! - `UserRepository` - Local accounts keyed by identity subject
//! - `GymRepository`, `ServiceRepository`, `SlotRepository` - Gym catalog
//! - `BookingRepository` - Gym bookings with atomic capacity checks
//! - `TrainerRepository`, `TrainerBookingRepository` - Trainers and sessions
//! - `ReviewRepository` - Reviews with rating recompute
//! - `SettingsRepository` - Platform settings row
//! - `FeaturedListingRepository`, `PayoutRepository`, `EarningsReader`
//!
//! ## External Service Ports
//!
//! - `PaymentGateway` - Order creation and signature verification
//! - `MediaStorage` - Image upload
//! - `EmailSender` - Transactional email
//! - `SessionValidator` - Bearer token validation

mod booking_repository;
mod email_sender;
mod gym_repository;
mod media_storage;
mod monetization_repository;
mod payment_gateway;
mod review_repository;
mod session_validator;
mod settings_repository;
mod trainer_repository;
mod user_repository;

pub use booking_repository::BookingRepository;
pub use email_sender::{EmailMessage, EmailSender};
pub use gym_repository::{GymRepository, ServiceRepository, SlotRepository};
pub use media_storage::{MediaStorage, MediaUpload, StoredMedia, ALLOWED_CONTENT_TYPES};
pub use monetization_repository::{EarningsReader, FeaturedListingRepository, PayoutRepository};
pub use payment_gateway::{OrderRequest, PaymentError, PaymentErrorCode, PaymentGateway, PaymentOrder};
pub use review_repository::ReviewRepository;
pub use session_validator::SessionValidator;
pub use settings_repository::SettingsRepository;
pub use trainer_repository::{TrainerBookingRepository, TrainerRepository};
pub use user_repository::UserRepository;
