//! Payout recording and earnings reports.

use std::sync::Arc;

use crate::application::handlers::common::{load_gym, load_trainer};
use crate::domain::foundation::{CurrentUser, DomainError, GymId, Money, OwnedByUser};
use crate::domain::monetization::{EarningsSummary, Payee, Payout, PlatformStats};
use crate::ports::{EarningsReader, GymRepository, PayoutRepository, TrainerRepository};

#[derive(Debug, Clone)]
pub struct RecordPayoutCommand {
    pub user: CurrentUser,
    pub payee: Payee,
    pub amount: Money,
    pub reference: String,
}

/// Super-admin settlement of what gyms and trainers have earned.
pub struct PayoutHandler {
    payouts: Arc<dyn PayoutRepository>,
    earnings: Arc<dyn EarningsReader>,
    gyms: Arc<dyn GymRepository>,
    trainers: Arc<dyn TrainerRepository>,
}

impl PayoutHandler {
    pub fn new(
        payouts: Arc<dyn PayoutRepository>,
        earnings: Arc<dyn EarningsReader>,
        gyms: Arc<dyn GymRepository>,
        trainers: Arc<dyn TrainerRepository>,
    ) -> Self {
        Self {
            payouts,
            earnings,
            gyms,
            trainers,
        }
    }

    pub async fn record(&self, cmd: RecordPayoutCommand) -> Result<Payout, DomainError> {
        cmd.user.require_super_admin()?;

        let summary = match cmd.payee {
            Payee::Gym(id) => {
                load_gym(self.gyms.as_ref(), &id).await?;
                self.earnings.gym_earnings(&id).await?
            }
            Payee::Trainer(id) => {
                load_trainer(self.trainers.as_ref(), &id).await?;
                self.earnings.trainer_earnings(&id).await?
            }
        };

        let payout = Payout::record(cmd.payee, cmd.amount, cmd.reference, cmd.user.id, summary.outstanding())?;
        self.payouts.insert(&payout).await?;
        tracing::info!(
            payout_id = %payout.id,
            payee = %payout.payee,
            amount = payout.amount.minor(),
            "Payout recorded"
        );
        Ok(payout)
    }

    pub async fn list(&self, user: &CurrentUser, payee: Option<Payee>) -> Result<Vec<Payout>, DomainError> {
        user.require_super_admin()?;
        self.payouts.list(payee).await
    }

    /// Visible to the gym's owner and super-admins.
    pub async fn gym_earnings(&self, user: &CurrentUser, gym_id: &GymId) -> Result<EarningsSummary, DomainError> {
        let gym = load_gym(self.gyms.as_ref(), gym_id).await?;
        gym.check_owner_or_admin(&user.id, user.is_super_admin())?;
        self.earnings.gym_earnings(gym_id).await
    }

    pub async fn platform_stats(&self, user: &CurrentUser) -> Result<PlatformStats, DomainError> {
        user.require_super_admin()?;
        self.earnings.platform_stats().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::payment::MockPaymentGateway;
    use crate::application::handlers::booking::{
        CreateBookingCommand, CreateBookingHandler, VerifyBookingPaymentHandler, VerifyPaymentCommand,
    };
    use crate::application::handlers::test_support::{next_week, World};
    use crate::domain::foundation::{ErrorCode, Role};
    use crate::domain::gym::ServiceType;

    fn handler(world: &World) -> PayoutHandler {
        PayoutHandler::new(
            world.store.clone(),
            world.store.clone(),
            world.store.clone(),
            world.store.clone(),
        )
    }

    /// A paid ₹1500 membership: gym earns 1350, platform 150.
    async fn paid_membership(world: &World, owner: &CurrentUser) -> GymId {
        let gym = world.approved_gym(owner).await;
        let plan = world.service(&gym, ServiceType::Membership, 1500).await;
        let asha = world.user("asha", Role::User).await;
        let checkout = CreateBookingHandler::new(
            world.store.clone(),
            world.store.clone(),
            world.store.clone(),
            world.store.clone(),
            world.payments.clone(),
            world.settings.clone(),
            World::policy(),
        )
        .handle(CreateBookingCommand {
            user: asha.clone(),
            service_id: plan.id,
            date: next_week(),
            start_time: None,
            duration_hours: None,
            trainer_id: None,
        })
        .await
        .unwrap();
        VerifyBookingPaymentHandler::new(
            world.store.clone(),
            world.store.clone(),
            world.payments.clone(),
            world.notifier(),
            World::policy(),
        )
        .handle(VerifyPaymentCommand {
            user: asha,
            id: checkout.booking.id,
            signature: MockPaymentGateway::sign(&checkout.order.id, "pay_1"),
            order_id: checkout.order.id,
            payment_id: "pay_1".to_string(),
        })
        .await
        .unwrap();
        gym.id
    }

    #[tokio::test]
    async fn payouts_settle_outstanding_earnings() {
        let world = World::new();
        let owner = world.user("meera", Role::GymOwner).await;
        let admin = world.user("root", Role::SuperAdmin).await;
        let gym_id = paid_membership(&world, &owner).await;
        let h = handler(&world);

        let earnings = h.gym_earnings(&owner, &gym_id).await.unwrap();
        assert_eq!(earnings.earned, Money::from_major(1350));
        assert_eq!(earnings.paid_bookings, 1);

        let record = |amount| RecordPayoutCommand {
            user: admin.clone(),
            payee: Payee::Gym(gym_id),
            amount: Money::from_major(amount),
            reference: "UTR-001".to_string(),
        };
        h.record(record(1000)).await.unwrap();
        assert_eq!(h.record(record(400)).await.unwrap_err().code, ErrorCode::OutOfRange);
        h.record(record(350)).await.unwrap();

        let after = h.gym_earnings(&owner, &gym_id).await.unwrap();
        assert!(after.outstanding().is_zero());
        assert_eq!(h.list(&admin, Some(Payee::Gym(gym_id))).await.unwrap().len(), 2);

        let stats = h.platform_stats(&admin).await.unwrap();
        assert_eq!(stats.commission_revenue, Money::from_major(150));
        assert_eq!(stats.total_paid_out, Money::from_major(1350));
    }

    #[tokio::test]
    async fn gym_owner_cannot_record_payouts() {
        let world = World::new();
        let owner = world.user("meera", Role::GymOwner).await;
        let gym_id = paid_membership(&world, &owner).await;

        let err = handler(&world)
            .record(RecordPayoutCommand {
                user: owner.clone(),
                payee: Payee::Gym(gym_id),
                amount: Money::from_major(100),
                reference: "UTR-002".to_string(),
            })
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::Forbidden);
        assert!(handler(&world).platform_stats(&owner).await.is_err());
    }
}
