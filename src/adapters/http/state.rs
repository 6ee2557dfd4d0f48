//! Shared application state.

use std::sync::Arc;

use crate::application::handlers::booking::{
    BookingQueries, CancelBookingHandler, CreateBookingHandler, RedeemBookingHandler,
    VerifyBookingPaymentHandler,
};
use crate::application::handlers::gym::{
    CreateGymHandler, GetAvailabilityHandler, GymQueries, ManageServicesHandler,
    ManageSlotsHandler, ModerateGymHandler, SearchGymsHandler, UpdateGymHandler,
};
use crate::application::handlers::monetization::{
    FeaturedListingHandler, PayoutHandler, SettingsHandler,
};
use crate::application::handlers::review::{CreateReviewHandler, ReviewQueries};
use crate::application::handlers::trainer::{
    CreateTrainerBookingHandler, ModerateTrainerHandler, RegisterTrainerHandler, TrainerQueries,
    UpdateTrainerSessionHandler, VerifyTrainerPaymentHandler,
};
use crate::application::handlers::user::ResolveUserHandler;
use crate::application::handlers::UploadMediaHandler;
use crate::application::{CachedSettings, Notifier};
use crate::domain::booking::CapacityPolicy;
use crate::ports::{
    BookingRepository, EarningsReader, FeaturedListingRepository, GymRepository, MediaStorage,
    PaymentGateway, PayoutRepository, ReviewRepository, ServiceRepository, SessionValidator,
    SlotRepository, TrainerBookingRepository, TrainerRepository, UserRepository,
};

use super::middleware::AuthState;

/// Search and upload limits taken from configuration.
#[derive(Debug, Clone)]
pub struct HttpLimits {
    pub search_default_radius_km: f64,
    pub search_fallback_limit: u32,
    pub max_upload_bytes: usize,
}

/// Dependencies shared by every request.
///
/// Cloned per request; all fields are `Arc`s or cheap values. Handlers are
/// built on demand from these.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserRepository>,
    pub gyms: Arc<dyn GymRepository>,
    pub services: Arc<dyn ServiceRepository>,
    pub slots: Arc<dyn SlotRepository>,
    pub bookings: Arc<dyn BookingRepository>,
    pub trainers: Arc<dyn TrainerRepository>,
    pub trainer_bookings: Arc<dyn TrainerBookingRepository>,
    pub reviews: Arc<dyn ReviewRepository>,
    pub featured: Arc<dyn FeaturedListingRepository>,
    pub payouts: Arc<dyn PayoutRepository>,
    pub earnings: Arc<dyn EarningsReader>,
    pub payments: Arc<dyn PaymentGateway>,
    pub media: Arc<dyn MediaStorage>,
    pub validator: Arc<dyn SessionValidator>,
    pub settings: Arc<CachedSettings>,
    pub notifier: Notifier,
    pub policy: CapacityPolicy,
    pub super_admins: Vec<String>,
    pub limits: HttpLimits,
}

impl AppState {
    pub fn auth_state(&self) -> AuthState {
        AuthState::new(
            self.validator.clone(),
            Arc::new(ResolveUserHandler::new(self.users.clone(), self.super_admins.clone())),
        )
    }

    // ── gyms ──────────────────────────────────────────────────────────────

    pub fn search_gyms_handler(&self) -> SearchGymsHandler {
        SearchGymsHandler::new(
            self.gyms.clone(),
            self.limits.search_default_radius_km,
            self.limits.search_fallback_limit,
        )
    }

    pub fn gym_queries(&self) -> GymQueries {
        GymQueries::new(self.gyms.clone())
    }

    pub fn create_gym_handler(&self) -> CreateGymHandler {
        CreateGymHandler::new(self.gyms.clone(), self.users.clone())
    }

    pub fn update_gym_handler(&self) -> UpdateGymHandler {
        UpdateGymHandler::new(self.gyms.clone())
    }

    pub fn moderate_gym_handler(&self) -> ModerateGymHandler {
        ModerateGymHandler::new(self.gyms.clone(), self.users.clone(), self.notifier.clone())
    }

    pub fn services_handler(&self) -> ManageServicesHandler {
        ManageServicesHandler::new(self.gyms.clone(), self.services.clone())
    }

    pub fn slots_handler(&self) -> ManageSlotsHandler {
        ManageSlotsHandler::new(self.gyms.clone(), self.slots.clone())
    }

    pub fn availability_handler(&self) -> GetAvailabilityHandler {
        GetAvailabilityHandler::new(
            self.gyms.clone(),
            self.slots.clone(),
            self.bookings.clone(),
            self.policy,
        )
    }

    // ── bookings ──────────────────────────────────────────────────────────

    pub fn create_booking_handler(&self) -> CreateBookingHandler {
        CreateBookingHandler::new(
            self.gyms.clone(),
            self.services.clone(),
            self.trainers.clone(),
            self.bookings.clone(),
            self.payments.clone(),
            self.settings.clone(),
            self.policy,
        )
    }

    pub fn verify_booking_payment_handler(&self) -> VerifyBookingPaymentHandler {
        VerifyBookingPaymentHandler::new(
            self.bookings.clone(),
            self.gyms.clone(),
            self.payments.clone(),
            self.notifier.clone(),
            self.policy,
        )
    }

    pub fn booking_queries(&self) -> BookingQueries {
        BookingQueries::new(self.bookings.clone(), self.gyms.clone())
    }

    pub fn cancel_booking_handler(&self) -> CancelBookingHandler {
        CancelBookingHandler::new(self.bookings.clone())
    }

    pub fn redeem_booking_handler(&self) -> RedeemBookingHandler {
        RedeemBookingHandler::new(self.bookings.clone(), self.gyms.clone())
    }

    // ── trainers ──────────────────────────────────────────────────────────

    pub fn register_trainer_handler(&self) -> RegisterTrainerHandler {
        RegisterTrainerHandler::new(self.trainers.clone(), self.gyms.clone(), self.users.clone())
    }

    pub fn moderate_trainer_handler(&self) -> ModerateTrainerHandler {
        ModerateTrainerHandler::new(
            self.trainers.clone(),
            self.gyms.clone(),
            self.users.clone(),
            self.notifier.clone(),
        )
    }

    pub fn trainer_queries(&self) -> TrainerQueries {
        TrainerQueries::new(
            self.trainers.clone(),
            self.trainer_bookings.clone(),
            self.bookings.clone(),
            self.gyms.clone(),
        )
    }

    pub fn create_trainer_booking_handler(&self) -> CreateTrainerBookingHandler {
        CreateTrainerBookingHandler::new(
            self.trainers.clone(),
            self.gyms.clone(),
            self.trainer_bookings.clone(),
            self.payments.clone(),
            self.settings.clone(),
            self.policy,
        )
    }

    pub fn verify_trainer_payment_handler(&self) -> VerifyTrainerPaymentHandler {
        VerifyTrainerPaymentHandler::new(
            self.trainer_bookings.clone(),
            self.trainers.clone(),
            self.payments.clone(),
            self.notifier.clone(),
            self.policy,
        )
    }

    pub fn trainer_session_handler(&self) -> UpdateTrainerSessionHandler {
        UpdateTrainerSessionHandler::new(
            self.trainer_bookings.clone(),
            self.trainers.clone(),
            self.gyms.clone(),
        )
    }

    // ── reviews ───────────────────────────────────────────────────────────

    pub fn create_review_handler(&self) -> CreateReviewHandler {
        CreateReviewHandler::new(
            self.bookings.clone(),
            self.trainer_bookings.clone(),
            self.reviews.clone(),
        )
    }

    pub fn review_queries(&self) -> ReviewQueries {
        ReviewQueries::new(self.reviews.clone())
    }

    // ── monetization ──────────────────────────────────────────────────────

    pub fn featured_handler(&self) -> FeaturedListingHandler {
        FeaturedListingHandler::new(
            self.gyms.clone(),
            self.featured.clone(),
            self.payments.clone(),
            self.settings.clone(),
        )
    }

    pub fn payout_handler(&self) -> PayoutHandler {
        PayoutHandler::new(
            self.payouts.clone(),
            self.earnings.clone(),
            self.gyms.clone(),
            self.trainers.clone(),
        )
    }

    pub fn settings_handler(&self) -> SettingsHandler {
        SettingsHandler::new(self.settings.clone())
    }

    pub fn upload_handler(&self) -> UploadMediaHandler {
        UploadMediaHandler::new(self.media.clone(), self.limits.max_upload_bytes)
    }
}
