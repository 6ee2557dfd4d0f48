use async_trait::async_trait;

use crate::domain::booking::{BookingStatus, PaymentStatus};
use crate::domain::foundation::{
    ApprovalStatus, DomainError, ErrorCode, FeaturedListingId, GymId, Money, Timestamp, TrainerId,
};
use crate::domain::monetization::{
    EarningsSummary, FeaturedListing, FeaturedStatus, Payee, PaymentTransaction, Payout,
    PlatformStats,
};
use crate::domain::settings::PlatformSettings;
use crate::domain::trainer::TrainerBookingStatus;
use crate::ports::{EarningsReader, FeaturedListingRepository, PayoutRepository, SettingsRepository};

use super::{newest_first, InMemoryStore, Tables};

#[async_trait]
impl SettingsRepository for InMemoryStore {
    async fn load(&self) -> Result<Option<PlatformSettings>, DomainError> {
        Ok(self.tables().await.settings)
    }

    async fn save(&self, settings: &PlatformSettings) -> Result<(), DomainError> {
        self.tables().await.settings = Some(*settings);
        Ok(())
    }
}

#[async_trait]
impl FeaturedListingRepository for InMemoryStore {
    async fn insert(&self, listing: &FeaturedListing) -> Result<(), DomainError> {
        self.tables().await.featured.insert(listing.id, listing.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &FeaturedListingId) -> Result<Option<FeaturedListing>, DomainError> {
        Ok(self.tables().await.featured.get(id).cloned())
    }

    async fn activate(
        &self,
        id: &FeaturedListingId,
        payment_id: &str,
        transaction: &PaymentTransaction,
        now: Timestamp,
    ) -> Result<FeaturedListing, DomainError> {
        let mut t = self.tables().await;
        let mut listing = t.featured.get(id).cloned().ok_or_else(|| {
            DomainError::new(ErrorCode::FeaturedListingNotFound, "Featured listing not found")
        })?;
        if listing.status == FeaturedStatus::Active {
            return Ok(listing);
        }
        let gym = t
            .gyms
            .get_mut(&listing.gym_id)
            .ok_or_else(|| DomainError::new(ErrorCode::GymNotFound, "Gym not found"))?;
        let until = listing.activate(payment_id, now, gym.featured_until)?;
        gym.featured_until = Some(until);
        t.featured.insert(listing.id, listing.clone());
        t.transactions.push(transaction.clone());
        Ok(listing)
    }
}

#[async_trait]
impl PayoutRepository for InMemoryStore {
    async fn insert(&self, payout: &Payout) -> Result<(), DomainError> {
        self.tables().await.payouts.push(payout.clone());
        Ok(())
    }

    async fn list(&self, payee: Option<Payee>) -> Result<Vec<Payout>, DomainError> {
        let mut payouts: Vec<Payout> = self
            .tables()
            .await
            .payouts
            .iter()
            .filter(|p| payee.map_or(true, |want| p.payee == want))
            .cloned()
            .collect();
        newest_first(&mut payouts, |p| p.created_at);
        Ok(payouts)
    }
}

fn paid_out(t: &Tables, payee: Payee) -> Money {
    t.payouts
        .iter()
        .filter(|p| p.payee == payee)
        .map(|p| p.amount)
        .sum()
}

fn counts(status: BookingStatus, payment: PaymentStatus) -> bool {
    payment == PaymentStatus::Completed && status != BookingStatus::Cancelled
}

#[async_trait]
impl EarningsReader for InMemoryStore {
    async fn gym_earnings(&self, gym_id: &GymId) -> Result<EarningsSummary, DomainError> {
        let t = self.tables().await;
        let gym_bookings = t
            .bookings
            .values()
            .filter(|b| &b.gym_id == gym_id && counts(b.status, b.payment_status))
            .map(|b| b.price.gym_earnings);
        let trainer_sessions = t
            .trainer_bookings
            .values()
            .filter(|b| &b.gym_id == gym_id && counts(b.status.as_booking_status(), b.payment_status))
            .map(|b| b.price.gym_earnings);
        let amounts: Vec<Money> = gym_bookings.chain(trainer_sessions).collect();
        let payee = Payee::Gym(*gym_id);
        Ok(EarningsSummary {
            payee,
            paid_bookings: amounts.len() as i64,
            earned: amounts.into_iter().sum(),
            paid_out: paid_out(&t, payee),
        })
    }

    async fn trainer_earnings(&self, trainer_id: &TrainerId) -> Result<EarningsSummary, DomainError> {
        let t = self.tables().await;
        let attached = t
            .bookings
            .values()
            .filter(|b| b.trainer_id.as_ref() == Some(trainer_id) && counts(b.status, b.payment_status))
            .map(|b| b.price.trainer_earnings);
        let direct = t
            .trainer_bookings
            .values()
            .filter(|b| &b.trainer_id == trainer_id && counts(b.status.as_booking_status(), b.payment_status))
            .map(|b| b.price.trainer_earnings);
        let amounts: Vec<Money> = attached.chain(direct).collect();
        let payee = Payee::Trainer(*trainer_id);
        Ok(EarningsSummary {
            payee,
            paid_bookings: amounts.len() as i64,
            earned: amounts.into_iter().sum(),
            paid_out: paid_out(&t, payee),
        })
    }

    async fn platform_stats(&self) -> Result<PlatformStats, DomainError> {
        let t = self.tables().await;
        let prices: Vec<_> = t
            .bookings
            .values()
            .filter(|b| counts(b.status, b.payment_status))
            .map(|b| b.price)
            .chain(
                t.trainer_bookings
                    .values()
                    .filter(|b| b.status != TrainerBookingStatus::Cancelled)
                    .filter(|b| b.payment_status == PaymentStatus::Completed)
                    .map(|b| b.price),
            )
            .collect();
        Ok(PlatformStats {
            total_users: t.users.len() as i64,
            total_gyms: t.gyms.len() as i64,
            pending_gyms: t
                .gyms
                .values()
                .filter(|g| g.status == ApprovalStatus::Pending)
                .count() as i64,
            total_trainers: t.trainers.len() as i64,
            paid_bookings: prices.len() as i64,
            gross_revenue: prices.iter().map(|p| p.total).sum(),
            commission_revenue: prices.iter().map(|p| p.platform_commission).sum(),
            featured_revenue: t
                .featured
                .values()
                .filter(|f| f.status == FeaturedStatus::Active)
                .map(|f| f.amount)
                .sum(),
            total_paid_out: t.payouts.iter().map(|p| p.amount).sum(),
        })
    }
}
