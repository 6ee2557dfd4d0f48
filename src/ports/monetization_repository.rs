//! Featured listings, payouts and the earnings ledger.

use async_trait::async_trait;

use crate::domain::foundation::{
    DomainError, FeaturedListingId, GymId, Timestamp, TrainerId,
};
use crate::domain::monetization::{
    EarningsSummary, FeaturedListing, Payee, Payout, PaymentTransaction, PlatformStats,
};

#[async_trait]
pub trait FeaturedListingRepository: Send + Sync {
    async fn insert(&self, listing: &FeaturedListing) -> Result<(), DomainError>;

    async fn find_by_id(&self, id: &FeaturedListingId) -> Result<Option<FeaturedListing>, DomainError>;

    /// Activates a paid listing and extends its gym's `featured_until`.
    ///
    /// Implementations lock the gym row, call
    /// [`FeaturedListing::activate`] with the gym's current window, and write
    /// listing, gym and payment log together. Activating an already active
    /// listing returns it unchanged.
    async fn activate(
        &self,
        id: &FeaturedListingId,
        payment_id: &str,
        transaction: &PaymentTransaction,
        now: Timestamp,
    ) -> Result<FeaturedListing, DomainError>;
}

#[async_trait]
pub trait PayoutRepository: Send + Sync {
    async fn insert(&self, payout: &Payout) -> Result<(), DomainError>;

    /// All payouts, or those of one payee. Newest first.
    async fn list(&self, payee: Option<Payee>) -> Result<Vec<Payout>, DomainError>;
}

/// Read-side aggregates over bookings and payouts.
///
/// Earned amounts count paid bookings that were not cancelled, using the
/// split stored at checkout.
#[async_trait]
pub trait EarningsReader: Send + Sync {
    async fn gym_earnings(&self, gym_id: &GymId) -> Result<EarningsSummary, DomainError>;

    async fn trainer_earnings(&self, trainer_id: &TrainerId) -> Result<EarningsSummary, DomainError>;

    async fn platform_stats(&self) -> Result<PlatformStats, DomainError>;
}
