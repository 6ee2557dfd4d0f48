//! PostgreSQL implementation of the trainer ports.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::booking::CapacityPolicy;
use crate::domain::foundation::{
    ApprovalStatus, DomainError, ErrorCode, GymId, Money, RatingSummary, Timestamp,
    TrainerBookingId, TrainerId, UserId,
};
use crate::domain::monetization::PaymentTransaction;
use crate::domain::trainer::{Trainer, TrainerBooking, TrainerBookingStatus, TrainerProfile};
use crate::ports::{TrainerBookingRepository, TrainerRepository};

use super::bookings::{lock_trainer, price_breakdown, trainer_calendar};
use super::{db_error, decode, hour_range, insert_transaction, to_i32, violated_constraint};

pub struct PostgresTrainerRepository {
    pool: PgPool,
}

impl PostgresTrainerRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct TrainerRow {
    id: Uuid,
    user_id: Uuid,
    gym_id: Uuid,
    display_name: String,
    bio: String,
    specialties: Vec<String>,
    hourly_rate: i64,
    status: String,
    rating: f64,
    total_reviews: i64,
    created_at: DateTime<Utc>,
}

impl TryFrom<TrainerRow> for Trainer {
    type Error = DomainError;

    fn try_from(row: TrainerRow) -> Result<Self, Self::Error> {
        Ok(Trainer {
            id: TrainerId::from_uuid(row.id),
            user_id: UserId::from_uuid(row.user_id),
            gym_id: GymId::from_uuid(row.gym_id),
            profile: TrainerProfile {
                display_name: row.display_name,
                bio: row.bio,
                specialties: row.specialties,
                hourly_rate: Money::from_minor(row.hourly_rate),
            },
            status: decode("status", &row.status)?,
            rating: RatingSummary {
                average: row.rating,
                total_reviews: row.total_reviews,
            },
            created_at: Timestamp::from_datetime(row.created_at),
        })
    }
}

const SELECT_TRAINER: &str = r#"
    SELECT id, user_id, gym_id, display_name, bio, specialties, hourly_rate, status,
           rating, total_reviews, created_at
    FROM trainers
"#;

#[async_trait]
impl TrainerRepository for PostgresTrainerRepository {
    async fn insert(&self, trainer: &Trainer) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO trainers (
                id, user_id, gym_id, display_name, bio, specialties, hourly_rate, status,
                rating, total_reviews, created_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            "#,
        )
        .bind(trainer.id.as_uuid())
        .bind(trainer.user_id.as_uuid())
        .bind(trainer.gym_id.as_uuid())
        .bind(&trainer.profile.display_name)
        .bind(&trainer.profile.bio)
        .bind(&trainer.profile.specialties)
        .bind(trainer.profile.hourly_rate.minor())
        .bind(trainer.status.as_str())
        .bind(trainer.rating.average)
        .bind(trainer.rating.total_reviews)
        .bind(trainer.created_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if violated_constraint(&e) == Some("trainers_user_id_key") {
                return DomainError::new(
                    ErrorCode::TrainerAlreadyRegistered,
                    "User already has a trainer profile",
                );
            }
            DomainError::database("Failed to save trainer", e)
        })?;
        Ok(())
    }

    async fn update(&self, trainer: &Trainer) -> Result<(), DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE trainers SET
                display_name = $2, bio = $3, specialties = $4, hourly_rate = $5, status = $6
            WHERE id = $1
            "#,
        )
        .bind(trainer.id.as_uuid())
        .bind(&trainer.profile.display_name)
        .bind(&trainer.profile.bio)
        .bind(&trainer.profile.specialties)
        .bind(trainer.profile.hourly_rate.minor())
        .bind(trainer.status.as_str())
        .execute(&self.pool)
        .await
        .map_err(db_error("Failed to update trainer"))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::new(ErrorCode::TrainerNotFound, "Trainer not found"));
        }
        Ok(())
    }

    async fn find_by_id(&self, id: &TrainerId) -> Result<Option<Trainer>, DomainError> {
        let row: Option<TrainerRow> = sqlx::query_as(&format!("{} WHERE id = $1", SELECT_TRAINER))
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("Failed to fetch trainer"))?;
        row.map(Trainer::try_from).transpose()
    }

    async fn find_by_user(&self, user_id: &UserId) -> Result<Option<Trainer>, DomainError> {
        let row: Option<TrainerRow> = sqlx::query_as(&format!("{} WHERE user_id = $1", SELECT_TRAINER))
            .bind(user_id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("Failed to fetch trainer"))?;
        row.map(Trainer::try_from).transpose()
    }

    async fn list_by_gym(
        &self,
        gym_id: &GymId,
        status: Option<ApprovalStatus>,
    ) -> Result<Vec<Trainer>, DomainError> {
        let rows: Vec<TrainerRow> = sqlx::query_as(&format!(
            "{} WHERE gym_id = $1 AND ($2::TEXT IS NULL OR status = $2) ORDER BY created_at DESC",
            SELECT_TRAINER
        ))
        .bind(gym_id.as_uuid())
        .bind(status.map(|s| s.as_str()))
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to list trainers"))?;
        rows.into_iter().map(Trainer::try_from).collect()
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Trainer sessions
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, sqlx::FromRow)]
struct TrainerBookingRow {
    id: Uuid,
    user_id: Uuid,
    trainer_id: Uuid,
    gym_id: Uuid,
    booking_date: NaiveDate,
    start_hour: i16,
    end_hour: i16,
    status: String,
    payment_status: String,
    total_amount: i64,
    platform_commission: i64,
    gym_earnings: i64,
    trainer_earnings: i64,
    commission_bps: i32,
    payment_order_id: Option<String>,
    payment_id: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<TrainerBookingRow> for TrainerBooking {
    type Error = DomainError;

    fn try_from(row: TrainerBookingRow) -> Result<Self, Self::Error> {
        Ok(TrainerBooking {
            id: TrainerBookingId::from_uuid(row.id),
            user_id: UserId::from_uuid(row.user_id),
            trainer_id: TrainerId::from_uuid(row.trainer_id),
            gym_id: GymId::from_uuid(row.gym_id),
            date: row.booking_date,
            hours: hour_range(row.start_hour, row.end_hour)?,
            status: decode("status", &row.status)?,
            payment_status: decode("payment_status", &row.payment_status)?,
            price: price_breakdown(
                row.total_amount,
                row.platform_commission,
                row.gym_earnings,
                row.trainer_earnings,
                row.commission_bps,
            )?,
            payment_order_id: row.payment_order_id,
            payment_id: row.payment_id,
            created_at: Timestamp::from_datetime(row.created_at),
            updated_at: Timestamp::from_datetime(row.updated_at),
        })
    }
}

const SELECT_TRAINER_BOOKING: &str = r#"
    SELECT id, user_id, trainer_id, gym_id, booking_date, start_hour, end_hour, status,
           payment_status, total_amount, platform_commission, gym_earnings, trainer_earnings,
           commission_bps, payment_order_id, payment_id, created_at, updated_at
    FROM trainer_bookings
"#;

fn not_found() -> DomainError {
    DomainError::new(ErrorCode::TrainerBookingNotFound, "Trainer booking not found")
}

#[async_trait]
impl TrainerBookingRepository for PostgresTrainerRepository {
    async fn create_checked(
        &self,
        booking: &TrainerBooking,
        policy: &CapacityPolicy,
    ) -> Result<(), DomainError> {
        let mut tx = self.pool.begin().await.map_err(db_error("Failed to begin transaction"))?;

        lock_trainer(&mut tx, &booking.trainer_id).await?;
        let calendar =
            trainer_calendar(&mut tx, &booking.trainer_id, booking.date, booking.id.as_uuid()).await?;
        policy.check_trainer_free(booking.hours, &calendar, &Timestamp::now())?;

        sqlx::query(
            r#"
            INSERT INTO trainer_bookings (
                id, user_id, trainer_id, gym_id, booking_date, start_hour, end_hour, status,
                payment_status, total_amount, platform_commission, gym_earnings, trainer_earnings,
                commission_bps, payment_order_id, payment_id, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18)
            "#,
        )
        .bind(booking.id.as_uuid())
        .bind(booking.user_id.as_uuid())
        .bind(booking.trainer_id.as_uuid())
        .bind(booking.gym_id.as_uuid())
        .bind(booking.date)
        .bind(i16::from(booking.hours.start.value()))
        .bind(i16::from(booking.hours.end.value()))
        .bind(booking.status.as_str())
        .bind(booking.payment_status.as_str())
        .bind(booking.price.total.minor())
        .bind(booking.price.platform_commission.minor())
        .bind(booking.price.gym_earnings.minor())
        .bind(booking.price.trainer_earnings.minor())
        .bind(to_i32(booking.price.commission_rate.bps()))
        .bind(&booking.payment_order_id)
        .bind(&booking.payment_id)
        .bind(booking.created_at.as_datetime())
        .bind(booking.updated_at.as_datetime())
        .execute(&mut *tx)
        .await
        .map_err(db_error("Failed to save trainer booking"))?;

        tx.commit().await.map_err(db_error("Failed to commit trainer booking"))?;
        Ok(())
    }

    async fn find_by_id(&self, id: &TrainerBookingId) -> Result<Option<TrainerBooking>, DomainError> {
        let row: Option<TrainerBookingRow> =
            sqlx::query_as(&format!("{} WHERE id = $1", SELECT_TRAINER_BOOKING))
                .bind(id.as_uuid())
                .fetch_optional(&self.pool)
                .await
                .map_err(db_error("Failed to fetch trainer booking"))?;
        row.map(TrainerBooking::try_from).transpose()
    }

    async fn confirm_payment(
        &self,
        booking: &TrainerBooking,
        transaction: &PaymentTransaction,
        policy: &CapacityPolicy,
    ) -> Result<bool, DomainError> {
        let mut tx = self.pool.begin().await.map_err(db_error("Failed to begin transaction"))?;

        let current: Option<(String, DateTime<Utc>)> = sqlx::query_as(
            "SELECT payment_status, created_at FROM trainer_bookings WHERE id = $1 FOR UPDATE",
        )
        .bind(booking.id.as_uuid())
        .fetch_optional(&mut *tx)
        .await
        .map_err(db_error("Failed to lock trainer booking"))?;
        let created_at = match current {
            None => return Err(not_found()),
            Some((status, _)) if status == "completed" => return Ok(false),
            Some((_, created_at)) => Timestamp::from_datetime(created_at),
        };

        let now = Timestamp::now();
        if policy.hold_lapsed(&created_at, &now) {
            lock_trainer(&mut tx, &booking.trainer_id).await?;
            let calendar =
                trainer_calendar(&mut tx, &booking.trainer_id, booking.date, booking.id.as_uuid())
                    .await?;
            policy.check_trainer_free(booking.hours, &calendar, &now)?;
        }

        sqlx::query(
            r#"
            UPDATE trainer_bookings SET
                status = $2, payment_status = $3, payment_id = $4, updated_at = $5
            WHERE id = $1
            "#,
        )
        .bind(booking.id.as_uuid())
        .bind(booking.status.as_str())
        .bind(booking.payment_status.as_str())
        .bind(&booking.payment_id)
        .bind(booking.updated_at.as_datetime())
        .execute(&mut *tx)
        .await
        .map_err(db_error("Failed to confirm trainer payment"))?;

        insert_transaction(&mut tx, transaction).await?;
        tx.commit().await.map_err(db_error("Failed to commit payment"))?;
        Ok(true)
    }

    async fn compare_and_update(
        &self,
        booking: &TrainerBooking,
        expected_status: TrainerBookingStatus,
    ) -> Result<bool, DomainError> {
        let result = sqlx::query(
            "UPDATE trainer_bookings SET status = $2, updated_at = $3 WHERE id = $1 AND status = $4",
        )
        .bind(booking.id.as_uuid())
        .bind(booking.status.as_str())
        .bind(booking.updated_at.as_datetime())
        .bind(expected_status.as_str())
        .execute(&self.pool)
        .await
        .map_err(db_error("Failed to update trainer booking"))?;
        Ok(result.rows_affected() == 1)
    }

    async fn list_by_user(&self, user_id: &UserId) -> Result<Vec<TrainerBooking>, DomainError> {
        let rows: Vec<TrainerBookingRow> = sqlx::query_as(&format!(
            "{} WHERE user_id = $1 ORDER BY created_at DESC",
            SELECT_TRAINER_BOOKING
        ))
        .bind(user_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to list trainer bookings"))?;
        rows.into_iter().map(TrainerBooking::try_from).collect()
    }

    async fn list_by_trainer(&self, trainer_id: &TrainerId) -> Result<Vec<TrainerBooking>, DomainError> {
        let rows: Vec<TrainerBookingRow> = sqlx::query_as(&format!(
            "{} WHERE trainer_id = $1 ORDER BY booking_date, start_hour",
            SELECT_TRAINER_BOOKING
        ))
        .bind(trainer_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to list trainer bookings"))?;
        rows.into_iter().map(TrainerBooking::try_from).collect()
    }
}
