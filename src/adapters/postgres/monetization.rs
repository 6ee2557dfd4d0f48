//! PostgreSQL implementation of the settings, featured listing, payout and
//! earnings ports.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::foundation::{
    CommissionRate, DomainError, ErrorCode, FeaturedListingId, GymId, Money, PayoutId, Timestamp,
    TrainerId, UserId,
};
use crate::domain::monetization::{
    EarningsSummary, FeaturedListing, FeaturedStatus, Payee, PaymentTransaction, Payout,
    PlatformStats,
};
use crate::domain::settings::PlatformSettings;
use crate::ports::{EarningsReader, FeaturedListingRepository, PayoutRepository, SettingsRepository};

use super::{db_error, decode, insert_transaction, to_i32, to_u32};

pub struct PostgresMonetizationRepository {
    pool: PgPool,
}

impl PostgresMonetizationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Platform settings
// ════════════════════════════════════════════════════════════════════════════

#[async_trait]
impl SettingsRepository for PostgresMonetizationRepository {
    async fn load(&self) -> Result<Option<PlatformSettings>, DomainError> {
        let row: Option<(i32, i64)> = sqlx::query_as(
            "SELECT commission_bps, featured_price_per_day FROM platform_settings WHERE id = 1",
        )
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("Failed to load settings"))?;

        row.map(|(bps, price)| -> Result<PlatformSettings, DomainError> {
            Ok(PlatformSettings {
                commission_rate: CommissionRate::try_from_bps(to_u32("commission_bps", bps)?)?,
                featured_price_per_day: Money::from_minor(price),
            })
        })
        .transpose()
    }

    async fn save(&self, settings: &PlatformSettings) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO platform_settings (id, commission_bps, featured_price_per_day, updated_at)
            VALUES (1, $1, $2, now())
            ON CONFLICT (id) DO UPDATE SET
                commission_bps = EXCLUDED.commission_bps,
                featured_price_per_day = EXCLUDED.featured_price_per_day,
                updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(to_i32(settings.commission_rate.bps()))
        .bind(settings.featured_price_per_day.minor())
        .execute(&self.pool)
        .await
        .map_err(db_error("Failed to save settings"))?;
        Ok(())
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Featured listings
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, sqlx::FromRow)]
struct FeaturedRow {
    id: Uuid,
    gym_id: Uuid,
    purchased_by: Uuid,
    days: i32,
    amount: i64,
    status: String,
    payment_order_id: Option<String>,
    payment_id: Option<String>,
    starts_at: Option<DateTime<Utc>>,
    ends_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
}

impl TryFrom<FeaturedRow> for FeaturedListing {
    type Error = DomainError;

    fn try_from(row: FeaturedRow) -> Result<Self, Self::Error> {
        Ok(FeaturedListing {
            id: FeaturedListingId::from_uuid(row.id),
            gym_id: GymId::from_uuid(row.gym_id),
            purchased_by: UserId::from_uuid(row.purchased_by),
            days: to_u32("days", row.days)?,
            amount: Money::from_minor(row.amount),
            status: decode("status", &row.status)?,
            payment_order_id: row.payment_order_id,
            payment_id: row.payment_id,
            starts_at: row.starts_at.map(Timestamp::from_datetime),
            ends_at: row.ends_at.map(Timestamp::from_datetime),
            created_at: Timestamp::from_datetime(row.created_at),
        })
    }
}

const SELECT_FEATURED: &str = r#"
    SELECT id, gym_id, purchased_by, days, amount, status, payment_order_id, payment_id,
           starts_at, ends_at, created_at
    FROM featured_listings
"#;

fn listing_not_found() -> DomainError {
    DomainError::new(ErrorCode::FeaturedListingNotFound, "Featured listing not found")
}

#[async_trait]
impl FeaturedListingRepository for PostgresMonetizationRepository {
    async fn insert(&self, listing: &FeaturedListing) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO featured_listings (
                id, gym_id, purchased_by, days, amount, status, payment_order_id, payment_id,
                starts_at, ends_at, created_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            "#,
        )
        .bind(listing.id.as_uuid())
        .bind(listing.gym_id.as_uuid())
        .bind(listing.purchased_by.as_uuid())
        .bind(to_i32(listing.days))
        .bind(listing.amount.minor())
        .bind(listing.status.as_str())
        .bind(&listing.payment_order_id)
        .bind(&listing.payment_id)
        .bind(listing.starts_at.as_ref().map(Timestamp::as_datetime))
        .bind(listing.ends_at.as_ref().map(Timestamp::as_datetime))
        .bind(listing.created_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(db_error("Failed to save featured listing"))?;
        Ok(())
    }

    async fn find_by_id(&self, id: &FeaturedListingId) -> Result<Option<FeaturedListing>, DomainError> {
        let row: Option<FeaturedRow> = sqlx::query_as(&format!("{} WHERE id = $1", SELECT_FEATURED))
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("Failed to fetch featured listing"))?;
        row.map(FeaturedListing::try_from).transpose()
    }

    async fn activate(
        &self,
        id: &FeaturedListingId,
        payment_id: &str,
        transaction: &PaymentTransaction,
        now: Timestamp,
    ) -> Result<FeaturedListing, DomainError> {
        let mut tx = self.pool.begin().await.map_err(db_error("Failed to begin transaction"))?;

        let row: Option<FeaturedRow> =
            sqlx::query_as(&format!("{} WHERE id = $1 FOR UPDATE", SELECT_FEATURED))
                .bind(id.as_uuid())
                .fetch_optional(&mut *tx)
                .await
                .map_err(db_error("Failed to lock featured listing"))?;
        let mut listing = row.map(FeaturedListing::try_from).transpose()?.ok_or_else(listing_not_found)?;
        if listing.status == FeaturedStatus::Active {
            return Ok(listing);
        }

        let current: Option<(Option<DateTime<Utc>>,)> =
            sqlx::query_as("SELECT featured_until FROM gyms WHERE id = $1 FOR UPDATE")
                .bind(listing.gym_id.as_uuid())
                .fetch_optional(&mut *tx)
                .await
                .map_err(db_error("Failed to lock gym"))?;
        let (current,) = current.ok_or_else(|| DomainError::new(ErrorCode::GymNotFound, "Gym not found"))?;

        let until = listing.activate(payment_id, now, current.map(Timestamp::from_datetime))?;

        sqlx::query(
            r#"
            UPDATE featured_listings SET
                status = $2, payment_id = $3, starts_at = $4, ends_at = $5
            WHERE id = $1
            "#,
        )
        .bind(listing.id.as_uuid())
        .bind(listing.status.as_str())
        .bind(&listing.payment_id)
        .bind(listing.starts_at.as_ref().map(Timestamp::as_datetime))
        .bind(listing.ends_at.as_ref().map(Timestamp::as_datetime))
        .execute(&mut *tx)
        .await
        .map_err(db_error("Failed to activate featured listing"))?;

        sqlx::query("UPDATE gyms SET featured_until = $2 WHERE id = $1")
            .bind(listing.gym_id.as_uuid())
            .bind(until.as_datetime())
            .execute(&mut *tx)
            .await
            .map_err(db_error("Failed to extend featured window"))?;

        insert_transaction(&mut tx, transaction).await?;
        tx.commit().await.map_err(db_error("Failed to commit featured listing"))?;
        Ok(listing)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Payouts
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, sqlx::FromRow)]
struct PayoutRow {
    id: Uuid,
    payee_type: String,
    payee_id: Uuid,
    amount: i64,
    reference: String,
    created_by: Uuid,
    created_at: DateTime<Utc>,
}

fn payee_from(kind: &str, id: Uuid) -> Result<Payee, DomainError> {
    match kind {
        "gym" => Ok(Payee::Gym(GymId::from_uuid(id))),
        "trainer" => Ok(Payee::Trainer(TrainerId::from_uuid(id))),
        other => Err(DomainError::new(
            ErrorCode::DatabaseError,
            format!("Invalid payee_type value: {}", other),
        )),
    }
}

fn payee_uuid(payee: &Payee) -> Uuid {
    match payee {
        Payee::Gym(id) => *id.as_uuid(),
        Payee::Trainer(id) => *id.as_uuid(),
    }
}

impl TryFrom<PayoutRow> for Payout {
    type Error = DomainError;

    fn try_from(row: PayoutRow) -> Result<Self, Self::Error> {
        Ok(Payout {
            id: PayoutId::from_uuid(row.id),
            payee: payee_from(&row.payee_type, row.payee_id)?,
            amount: Money::from_minor(row.amount),
            reference: row.reference,
            created_by: UserId::from_uuid(row.created_by),
            created_at: Timestamp::from_datetime(row.created_at),
        })
    }
}

#[async_trait]
impl PayoutRepository for PostgresMonetizationRepository {
    async fn insert(&self, payout: &Payout) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO payouts (id, payee_type, payee_id, amount, reference, created_by, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(payout.id.as_uuid())
        .bind(payout.payee.kind())
        .bind(payee_uuid(&payout.payee))
        .bind(payout.amount.minor())
        .bind(&payout.reference)
        .bind(payout.created_by.as_uuid())
        .bind(payout.created_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(db_error("Failed to save payout"))?;
        Ok(())
    }

    async fn list(&self, payee: Option<Payee>) -> Result<Vec<Payout>, DomainError> {
        let rows: Vec<PayoutRow> = sqlx::query_as(
            r#"
            SELECT id, payee_type, payee_id, amount, reference, created_by, created_at
            FROM payouts
            WHERE ($1::TEXT IS NULL OR (payee_type = $1 AND payee_id = $2))
            ORDER BY created_at DESC
            "#,
        )
        .bind(payee.as_ref().map(Payee::kind))
        .bind(payee.as_ref().map(payee_uuid))
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to list payouts"))?;
        rows.into_iter().map(Payout::try_from).collect()
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Earnings
// ════════════════════════════════════════════════════════════════════════════

impl PostgresMonetizationRepository {
    async fn paid_out(&self, payee: &Payee) -> Result<Money, DomainError> {
        let (total,): (i64,) = sqlx::query_as(
            "SELECT COALESCE(SUM(amount), 0)::BIGINT FROM payouts WHERE payee_type = $1 AND payee_id = $2",
        )
        .bind(payee.kind())
        .bind(payee_uuid(payee))
        .fetch_one(&self.pool)
        .await
        .map_err(db_error("Failed to sum payouts"))?;
        Ok(Money::from_minor(total))
    }

    /// Counts and sums `share` over paid, uncancelled rows of both booking
    /// tables where `key` matches.
    async fn earned(&self, share: &str, key: &str, id: Uuid) -> Result<(i64, Money), DomainError> {
        let (count, total): (i64, i64) = sqlx::query_as(&format!(
            r#"
            SELECT COUNT(*)::BIGINT, COALESCE(SUM(share), 0)::BIGINT FROM (
                SELECT {share} AS share FROM bookings
                WHERE {key} = $1 AND payment_status = 'completed' AND status <> 'cancelled'
                UNION ALL
                SELECT {share} AS share FROM trainer_bookings
                WHERE {key} = $1 AND payment_status = 'completed' AND status <> 'cancelled'
            ) paid
            "#,
            share = share,
            key = key
        ))
        .bind(id)
        .fetch_one(&self.pool)
        .await
        .map_err(db_error("Failed to sum earnings"))?;
        Ok((count, Money::from_minor(total)))
    }
}

#[derive(Debug, sqlx::FromRow)]
struct StatsRow {
    total_users: i64,
    total_gyms: i64,
    pending_gyms: i64,
    total_trainers: i64,
    paid_bookings: i64,
    gross_revenue: i64,
    commission_revenue: i64,
    featured_revenue: i64,
    total_paid_out: i64,
}

#[async_trait]
impl EarningsReader for PostgresMonetizationRepository {
    async fn gym_earnings(&self, gym_id: &GymId) -> Result<EarningsSummary, DomainError> {
        let payee = Payee::Gym(*gym_id);
        let (paid_bookings, earned) = self.earned("gym_earnings", "gym_id", *gym_id.as_uuid()).await?;
        Ok(EarningsSummary {
            payee,
            paid_bookings,
            earned,
            paid_out: self.paid_out(&payee).await?,
        })
    }

    async fn trainer_earnings(&self, trainer_id: &TrainerId) -> Result<EarningsSummary, DomainError> {
        let payee = Payee::Trainer(*trainer_id);
        let (paid_bookings, earned) = self
            .earned("trainer_earnings", "trainer_id", *trainer_id.as_uuid())
            .await?;
        Ok(EarningsSummary {
            payee,
            paid_bookings,
            earned,
            paid_out: self.paid_out(&payee).await?,
        })
    }

    async fn platform_stats(&self) -> Result<PlatformStats, DomainError> {
        let row: StatsRow = sqlx::query_as(
            r#"
            WITH paid AS (
                SELECT total_amount, platform_commission FROM bookings
                WHERE payment_status = 'completed' AND status <> 'cancelled'
                UNION ALL
                SELECT total_amount, platform_commission FROM trainer_bookings
                WHERE payment_status = 'completed' AND status <> 'cancelled'
            )
            SELECT
                (SELECT COUNT(*) FROM users)::BIGINT AS total_users,
                (SELECT COUNT(*) FROM gyms)::BIGINT AS total_gyms,
                (SELECT COUNT(*) FROM gyms WHERE status = 'pending')::BIGINT AS pending_gyms,
                (SELECT COUNT(*) FROM trainers)::BIGINT AS total_trainers,
                (SELECT COUNT(*) FROM paid)::BIGINT AS paid_bookings,
                (SELECT COALESCE(SUM(total_amount), 0) FROM paid)::BIGINT AS gross_revenue,
                (SELECT COALESCE(SUM(platform_commission), 0) FROM paid)::BIGINT AS commission_revenue,
                (SELECT COALESCE(SUM(amount), 0) FROM featured_listings WHERE status = 'active')::BIGINT
                    AS featured_revenue,
                (SELECT COALESCE(SUM(amount), 0) FROM payouts)::BIGINT AS total_paid_out
            "#,
        )
        .fetch_one(&self.pool)
        .await
        .map_err(db_error("Failed to load platform stats"))?;

        Ok(PlatformStats {
            total_users: row.total_users,
            total_gyms: row.total_gyms,
            pending_gyms: row.pending_gyms,
            total_trainers: row.total_trainers,
            paid_bookings: row.paid_bookings,
            gross_revenue: Money::from_minor(row.gross_revenue),
            commission_revenue: Money::from_minor(row.commission_revenue),
            featured_revenue: Money::from_minor(row.featured_revenue),
            total_paid_out: Money::from_minor(row.total_paid_out),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payee_round_trips_through_columns() {
        let gym = Payee::Gym(GymId::new());
        assert_eq!(payee_from(gym.kind(), payee_uuid(&gym)).unwrap(), gym);
        assert!(payee_from("studio", Uuid::new_v4()).is_err());
    }
}
