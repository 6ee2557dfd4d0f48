//! Featured listing purchase: quote, checkout, activation.

use std::sync::Arc;

use crate::application::handlers::booking::{CheckoutResult, VerifyPaymentCommand};
use crate::application::handlers::common::{ensure_order_matches, load_gym};
use crate::application::CachedSettings;
use crate::domain::foundation::{
    CurrentUser, DomainError, ErrorCode, FeaturedListingId, GymId, Money, OwnedByUser, Timestamp,
};
use crate::domain::monetization::{self, FeaturedListing, PaymentPurpose, PaymentTransaction};
use crate::ports::{FeaturedListingRepository, GymRepository, OrderRequest, PaymentGateway};

#[derive(Debug, Clone)]
pub struct PurchaseFeaturedCommand {
    pub user: CurrentUser,
    pub gym_id: GymId,
    pub days: u32,
}

/// Gym owners pay to rank first in search for a number of days. Purchases
/// stack on an existing window.
pub struct FeaturedListingHandler {
    gyms: Arc<dyn GymRepository>,
    listings: Arc<dyn FeaturedListingRepository>,
    payments: Arc<dyn PaymentGateway>,
    settings: Arc<CachedSettings>,
}

impl FeaturedListingHandler {
    pub fn new(
        gyms: Arc<dyn GymRepository>,
        listings: Arc<dyn FeaturedListingRepository>,
        payments: Arc<dyn PaymentGateway>,
        settings: Arc<CachedSettings>,
    ) -> Self {
        Self {
            gyms,
            listings,
            payments,
            settings,
        }
    }

    pub async fn quote(&self, days: u32) -> Result<Money, DomainError> {
        let settings = self.settings.current().await?;
        Ok(monetization::quote(days, settings.featured_price_per_day)?)
    }

    pub async fn purchase(
        &self,
        cmd: PurchaseFeaturedCommand,
    ) -> Result<CheckoutResult<FeaturedListing>, DomainError> {
        let gym = load_gym(self.gyms.as_ref(), &cmd.gym_id).await?;
        gym.check_owner_or_admin(&cmd.user.id, cmd.user.is_super_admin())?;
        gym.ensure_bookable()?;

        let settings = self.settings.current().await?;
        let mut listing =
            FeaturedListing::purchase(gym.id, cmd.user.id, cmd.days, settings.featured_price_per_day)?;

        let order = self
            .payments
            .create_order(
                OrderRequest::new(listing.amount, listing.id.to_string())
                    .with_note("purpose", "featured_listing")
                    .with_note("gym_id", gym.id.to_string()),
            )
            .await?;
        listing.payment_order_id = Some(order.id.clone());
        self.listings.insert(&listing).await?;

        tracing::info!(
            listing_id = %listing.id,
            gym_id = %gym.id,
            days = listing.days,
            amount = listing.amount.minor(),
            "Featured listing checkout opened"
        );
        Ok(CheckoutResult {
            booking: listing,
            order,
            key_id: self.payments.key_id().to_string(),
        })
    }

    pub async fn verify(
        &self,
        cmd: VerifyPaymentCommand<FeaturedListingId>,
    ) -> Result<FeaturedListing, DomainError> {
        let listing = self
            .listings
            .find_by_id(&cmd.id)
            .await?
            .ok_or_else(|| DomainError::new(ErrorCode::FeaturedListingNotFound, "Featured listing not found"))?;
        if listing.purchased_by != cmd.user.id && !cmd.user.is_super_admin() {
            return Err(DomainError::forbidden("Listing was purchased by another account"));
        }
        ensure_order_matches(listing.payment_order_id.as_deref(), &cmd.order_id)?;
        self.payments
            .verify_signature(&cmd.order_id, &cmd.payment_id, &cmd.signature)?;

        let transaction = PaymentTransaction::record(
            PaymentPurpose::FeaturedListing,
            *listing.id.as_uuid(),
            cmd.order_id.clone(),
            cmd.payment_id.clone(),
            listing.amount,
        );
        let listing = self
            .listings
            .activate(&listing.id, &cmd.payment_id, &transaction, Timestamp::now())
            .await?;
        tracing::info!(listing_id = %listing.id, ends_at = ?listing.ends_at, "Featured listing active");
        Ok(listing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::payment::MockPaymentGateway;
    use crate::application::handlers::test_support::World;
    use crate::domain::foundation::Role;
    use crate::domain::monetization::FeaturedStatus;

    fn handler(world: &World) -> FeaturedListingHandler {
        FeaturedListingHandler::new(
            world.store.clone(),
            world.store.clone(),
            world.payments.clone(),
            world.settings.clone(),
        )
    }

    #[tokio::test]
    async fn quote_uses_current_price() {
        let world = World::new();
        assert_eq!(handler(&world).quote(7).await.unwrap(), Money::from_major(3493));
        assert_eq!(handler(&world).quote(0).await.unwrap_err().code, ErrorCode::OutOfRange);
    }

    #[tokio::test]
    async fn paid_listing_features_gym_and_stacks() {
        let world = World::new();
        let owner = world.user("meera", Role::GymOwner).await;
        let gym = world.approved_gym(&owner).await;
        let h = handler(&world);

        let mut ends = Vec::new();
        for (i, days) in [3u32, 2].into_iter().enumerate() {
            let checkout = h
                .purchase(PurchaseFeaturedCommand {
                    user: owner.clone(),
                    gym_id: gym.id,
                    days,
                })
                .await
                .unwrap();
            let payment_id = format!("pay_{}", i);
            let listing = h
                .verify(VerifyPaymentCommand {
                    user: owner.clone(),
                    id: checkout.booking.id,
                    signature: MockPaymentGateway::sign(&checkout.order.id, &payment_id),
                    order_id: checkout.order.id,
                    payment_id,
                })
                .await
                .unwrap();
            assert_eq!(listing.status, FeaturedStatus::Active);
            ends.push(listing.ends_at.unwrap());
        }
        assert_eq!(ends[1], ends[0].add_days(2));

        let stored = GymRepository::find_by_id(world.store.as_ref(), &gym.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.featured_until, Some(ends[1]));
        assert_eq!(world.store.transaction_count().await, 2);
    }

    #[tokio::test]
    async fn other_owner_cannot_feature_gym() {
        let world = World::new();
        let owner = world.user("meera", Role::GymOwner).await;
        let rival = world.user("ravi", Role::GymOwner).await;
        let gym = world.approved_gym(&owner).await;

        let err = handler(&world)
            .purchase(PurchaseFeaturedCommand {
                user: rival,
                gym_id: gym.id,
                days: 3,
            })
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::Forbidden);
    }
}
