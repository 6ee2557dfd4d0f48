//! PostgreSQL implementation of BookingRepository.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::domain::booking::{
    Booking, BookingStatus, CapacityPolicy, Occupancy, PriceBreakdown, RedemptionToken,
};
use crate::domain::foundation::{
    BookingId, CommissionRate, DayOfWeek, DomainError, ErrorCode, GymId, Money, ServiceId,
    Timestamp, TrainerId, UserId,
};
use crate::domain::gym::TimeSlot;
use crate::domain::monetization::PaymentTransaction;
use crate::domain::trainer::TrainerBookingStatus;
use crate::ports::BookingRepository;

use super::catalog::{SlotRow, SELECT_SLOT};
use super::{db_error, decode, hour_range, insert_transaction, to_i32, to_u32};

pub struct PostgresBookingRepository {
    pool: PgPool,
}

impl PostgresBookingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Rebuilds the split stored at checkout.
pub(super) fn price_breakdown(
    total: i64,
    commission: i64,
    gym: i64,
    trainer: i64,
    bps: i32,
) -> Result<PriceBreakdown, DomainError> {
    let bps = to_u32("commission_bps", bps)?;
    Ok(PriceBreakdown {
        total: Money::from_minor(total),
        platform_commission: Money::from_minor(commission),
        gym_earnings: Money::from_minor(gym),
        trainer_earnings: Money::from_minor(trainer),
        commission_rate: CommissionRate::try_from_bps(bps)?,
    })
}

#[derive(Debug, sqlx::FromRow)]
struct BookingRow {
    id: Uuid,
    user_id: Uuid,
    gym_id: Uuid,
    service_id: Uuid,
    service_type: String,
    trainer_id: Option<Uuid>,
    booking_date: NaiveDate,
    start_hour: Option<i16>,
    end_hour: Option<i16>,
    status: String,
    payment_status: String,
    total_amount: i64,
    platform_commission: i64,
    gym_earnings: i64,
    trainer_earnings: i64,
    commission_bps: i32,
    remaining_sessions: Option<i32>,
    expires_at: DateTime<Utc>,
    redemption_token: String,
    payment_order_id: Option<String>,
    payment_id: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<BookingRow> for Booking {
    type Error = DomainError;

    fn try_from(row: BookingRow) -> Result<Self, Self::Error> {
        let hours = match (row.start_hour, row.end_hour) {
            (Some(start), Some(end)) => Some(hour_range(start, end)?),
            _ => None,
        };
        Ok(Booking {
            id: BookingId::from_uuid(row.id),
            user_id: UserId::from_uuid(row.user_id),
            gym_id: GymId::from_uuid(row.gym_id),
            service_id: ServiceId::from_uuid(row.service_id),
            service_type: decode("service_type", &row.service_type)?,
            trainer_id: row.trainer_id.map(TrainerId::from_uuid),
            date: row.booking_date,
            hours,
            status: decode("status", &row.status)?,
            payment_status: decode("payment_status", &row.payment_status)?,
            price: price_breakdown(
                row.total_amount,
                row.platform_commission,
                row.gym_earnings,
                row.trainer_earnings,
                row.commission_bps,
            )?,
            remaining_sessions: row
                .remaining_sessions
                .map(|r| to_u32("remaining_sessions", r))
                .transpose()?,
            expires_at: Timestamp::from_datetime(row.expires_at),
            redemption_token: RedemptionToken::parse(&row.redemption_token)?,
            payment_order_id: row.payment_order_id,
            payment_id: row.payment_id,
            created_at: Timestamp::from_datetime(row.created_at),
            updated_at: Timestamp::from_datetime(row.updated_at),
        })
    }
}

const SELECT_BOOKING: &str = r#"
    SELECT id, user_id, gym_id, service_id, service_type, trainer_id, booking_date,
           start_hour, end_hour, status, payment_status, total_amount, platform_commission,
           gym_earnings, trainer_earnings, commission_bps, remaining_sessions, expires_at,
           redemption_token, payment_order_id, payment_id, created_at, updated_at
    FROM bookings
"#;

fn into_bookings(rows: Vec<BookingRow>) -> Result<Vec<Booking>, DomainError> {
    rows.into_iter().map(Booking::try_from).collect()
}

// ════════════════════════════════════════════════════════════════════════════
// Calendar reads shared with the trainer session repository
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, sqlx::FromRow)]
struct OccupancyRow {
    source: String,
    start_hour: i16,
    end_hour: i16,
    status: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<OccupancyRow> for Occupancy {
    type Error = DomainError;

    fn try_from(row: OccupancyRow) -> Result<Self, Self::Error> {
        let status = if row.source == "trainer_booking" {
            decode::<TrainerBookingStatus>("status", &row.status)?.as_booking_status()
        } else {
            decode::<BookingStatus>("status", &row.status)?
        };
        Ok(Occupancy {
            hours: hour_range(row.start_hour, row.end_hour)?,
            status,
            created_at: Timestamp::from_datetime(row.created_at),
        })
    }
}

/// Direct sessions plus gym bookings the trainer is attached to, minus the
/// booking `skip`.
pub(super) async fn trainer_calendar(
    conn: &mut PgConnection,
    trainer_id: &TrainerId,
    date: NaiveDate,
    skip: &Uuid,
) -> Result<Vec<Occupancy>, DomainError> {
    let rows: Vec<OccupancyRow> = sqlx::query_as(
        r#"
        SELECT 'trainer_booking' AS source, start_hour, end_hour, status, created_at
        FROM trainer_bookings
        WHERE trainer_id = $1 AND booking_date = $2 AND id <> $3
        UNION ALL
        SELECT 'booking' AS source, start_hour, end_hour, status, created_at
        FROM bookings
        WHERE trainer_id = $1 AND booking_date = $2 AND start_hour IS NOT NULL AND id <> $3
        "#,
    )
    .bind(trainer_id.as_uuid())
    .bind(date)
    .bind(skip)
    .fetch_all(conn)
    .await
    .map_err(db_error("Failed to load trainer calendar"))?;
    rows.into_iter().map(Occupancy::try_from).collect()
}

async fn gym_occupancy(
    conn: &mut PgConnection,
    gym_id: &GymId,
    date: NaiveDate,
    skip: &Uuid,
) -> Result<Vec<Occupancy>, DomainError> {
    let rows: Vec<OccupancyRow> = sqlx::query_as(
        r#"
        SELECT 'booking' AS source, start_hour, end_hour, status, created_at
        FROM bookings
        WHERE gym_id = $1 AND booking_date = $2 AND start_hour IS NOT NULL AND id <> $3
        "#,
    )
    .bind(gym_id.as_uuid())
    .bind(date)
    .bind(skip)
    .fetch_all(conn)
    .await
    .map_err(db_error("Failed to load gym occupancy"))?;
    rows.into_iter().map(Occupancy::try_from).collect()
}

/// Takes the trainer row lock that serializes calendar writes.
pub(super) async fn lock_trainer(conn: &mut PgConnection, trainer_id: &TrainerId) -> Result<(), DomainError> {
    let locked: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM trainers WHERE id = $1 FOR UPDATE")
        .bind(trainer_id.as_uuid())
        .fetch_optional(conn)
        .await
        .map_err(db_error("Failed to lock trainer"))?;
    match locked {
        Some(_) => Ok(()),
        None => Err(DomainError::new(ErrorCode::TrainerNotFound, "Trainer not found")),
    }
}

async fn insert_booking(conn: &mut PgConnection, booking: &Booking) -> Result<(), DomainError> {
    sqlx::query(
        r#"
        INSERT INTO bookings (
            id, user_id, gym_id, service_id, service_type, trainer_id, booking_date,
            start_hour, end_hour, status, payment_status, total_amount, platform_commission,
            gym_earnings, trainer_earnings, commission_bps, remaining_sessions, expires_at,
            redemption_token, payment_order_id, payment_id, created_at, updated_at
        ) VALUES (
            $1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17,
            $18, $19, $20, $21, $22, $23
        )
        "#,
    )
    .bind(booking.id.as_uuid())
    .bind(booking.user_id.as_uuid())
    .bind(booking.gym_id.as_uuid())
    .bind(booking.service_id.as_uuid())
    .bind(booking.service_type.as_str())
    .bind(booking.trainer_id.as_ref().map(TrainerId::as_uuid))
    .bind(booking.date)
    .bind(booking.hours.map(|h| i16::from(h.start.value())))
    .bind(booking.hours.map(|h| i16::from(h.end.value())))
    .bind(booking.status.as_str())
    .bind(booking.payment_status.as_str())
    .bind(booking.price.total.minor())
    .bind(booking.price.platform_commission.minor())
    .bind(booking.price.gym_earnings.minor())
    .bind(booking.price.trainer_earnings.minor())
    .bind(to_i32(booking.price.commission_rate.bps()))
    .bind(booking.remaining_sessions.map(to_i32))
    .bind(booking.expires_at.as_datetime())
    .bind(booking.redemption_token.as_str())
    .bind(&booking.payment_order_id)
    .bind(&booking.payment_id)
    .bind(booking.created_at.as_datetime())
    .bind(booking.updated_at.as_datetime())
    .execute(conn)
    .await
    .map_err(|e| {
        if super::violated_constraint(&e) == Some("bookings_redemption_token_key") {
            return DomainError::new(ErrorCode::DatabaseError, "Redemption token collision");
        }
        DomainError::database("Failed to save booking", e)
    })?;
    Ok(())
}

/// Locks the gym's slots for the weekday (and the trainer row, if any) and
/// validates `booking` against every other booking of that date.
async fn check_capacity(
    conn: &mut PgConnection,
    booking: &Booking,
    policy: &CapacityPolicy,
    now: &Timestamp,
) -> Result<(), DomainError> {
    let Some(hours) = booking.hours else {
        return Ok(());
    };
    let day = DayOfWeek::of(booking.date);
    // Locking the day's slots serializes checkouts for the same gym and
    // weekday; the trainer lock does the same for calendars.
    let slot_rows: Vec<SlotRow> = sqlx::query_as(&format!(
        "{} WHERE gym_id = $1 AND day_of_week = $2 AND is_active ORDER BY id FOR UPDATE",
        SELECT_SLOT
    ))
    .bind(booking.gym_id.as_uuid())
    .bind(i16::from(day))
    .fetch_all(&mut *conn)
    .await
    .map_err(db_error("Failed to lock time slots"))?;
    let slots = slot_rows
        .into_iter()
        .map(TimeSlot::try_from)
        .collect::<Result<Vec<_>, _>>()?;

    let existing = gym_occupancy(conn, &booking.gym_id, booking.date, booking.id.as_uuid()).await?;
    policy.check_slot_capacity(day, hours, &slots, &existing, now)?;

    if let Some(trainer_id) = booking.trainer_id {
        lock_trainer(conn, &trainer_id).await?;
        let calendar = trainer_calendar(conn, &trainer_id, booking.date, booking.id.as_uuid()).await?;
        policy.check_trainer_free(hours, &calendar, now)?;
    }
    Ok(())
}

#[async_trait]
impl BookingRepository for PostgresBookingRepository {
    async fn create_checked(&self, booking: &Booking, policy: &CapacityPolicy) -> Result<(), DomainError> {
        let mut tx = self.pool.begin().await.map_err(db_error("Failed to begin transaction"))?;
        check_capacity(&mut tx, booking, policy, &Timestamp::now()).await?;
        insert_booking(&mut tx, booking).await?;
        tx.commit().await.map_err(db_error("Failed to commit booking"))?;
        Ok(())
    }

    async fn find_by_id(&self, id: &BookingId) -> Result<Option<Booking>, DomainError> {
        let row: Option<BookingRow> = sqlx::query_as(&format!("{} WHERE id = $1", SELECT_BOOKING))
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("Failed to fetch booking"))?;
        row.map(Booking::try_from).transpose()
    }

    async fn find_by_token(&self, token: &RedemptionToken) -> Result<Option<Booking>, DomainError> {
        let row: Option<BookingRow> =
            sqlx::query_as(&format!("{} WHERE redemption_token = $1", SELECT_BOOKING))
                .bind(token.as_str())
                .fetch_optional(&self.pool)
                .await
                .map_err(db_error("Failed to fetch booking"))?;
        row.map(Booking::try_from).transpose()
    }

    async fn confirm_payment(
        &self,
        booking: &Booking,
        transaction: &PaymentTransaction,
        policy: &CapacityPolicy,
    ) -> Result<bool, DomainError> {
        let mut tx = self.pool.begin().await.map_err(db_error("Failed to begin transaction"))?;

        let current: Option<(String, DateTime<Utc>)> = sqlx::query_as(
            "SELECT payment_status, created_at FROM bookings WHERE id = $1 FOR UPDATE",
        )
        .bind(booking.id.as_uuid())
        .fetch_optional(&mut *tx)
        .await
        .map_err(db_error("Failed to lock booking"))?;
        let created_at = match current {
            None => return Err(DomainError::new(ErrorCode::BookingNotFound, "Booking not found")),
            Some((status, _)) if status == "completed" => return Ok(false),
            Some((_, created_at)) => Timestamp::from_datetime(created_at),
        };

        let now = Timestamp::now();
        if policy.hold_lapsed(&created_at, &now) {
            check_capacity(&mut tx, booking, policy, &now).await?;
        }

        let result = sqlx::query(
            r#"
            UPDATE bookings SET
                status = $2, payment_status = $3, payment_id = $4, updated_at = $5
            WHERE id = $1 AND payment_status <> 'completed'
            "#,
        )
        .bind(booking.id.as_uuid())
        .bind(booking.status.as_str())
        .bind(booking.payment_status.as_str())
        .bind(&booking.payment_id)
        .bind(booking.updated_at.as_datetime())
        .execute(&mut *tx)
        .await
        .map_err(db_error("Failed to confirm booking payment"))?;

        if result.rows_affected() == 0 {
            return Ok(false);
        }
        insert_transaction(&mut tx, transaction).await?;
        tx.commit().await.map_err(db_error("Failed to commit payment"))?;
        Ok(true)
    }

    async fn compare_and_update(
        &self,
        booking: &Booking,
        expected_status: BookingStatus,
        expected_remaining: Option<u32>,
    ) -> Result<bool, DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE bookings SET
                status = $2, remaining_sessions = $3, updated_at = $4
            WHERE id = $1 AND status = $5 AND remaining_sessions IS NOT DISTINCT FROM $6
            "#,
        )
        .bind(booking.id.as_uuid())
        .bind(booking.status.as_str())
        .bind(booking.remaining_sessions.map(to_i32))
        .bind(booking.updated_at.as_datetime())
        .bind(expected_status.as_str())
        .bind(expected_remaining.map(to_i32))
        .execute(&self.pool)
        .await
        .map_err(db_error("Failed to update booking"))?;
        Ok(result.rows_affected() == 1)
    }

    async fn list_by_user(&self, user_id: &UserId) -> Result<Vec<Booking>, DomainError> {
        let rows: Vec<BookingRow> =
            sqlx::query_as(&format!("{} WHERE user_id = $1 ORDER BY created_at DESC", SELECT_BOOKING))
                .bind(user_id.as_uuid())
                .fetch_all(&self.pool)
                .await
                .map_err(db_error("Failed to list bookings"))?;
        into_bookings(rows)
    }

    async fn list_by_gym(&self, gym_id: &GymId, date: Option<NaiveDate>) -> Result<Vec<Booking>, DomainError> {
        let rows: Vec<BookingRow> = sqlx::query_as(&format!(
            "{} WHERE gym_id = $1 AND ($2::DATE IS NULL OR booking_date = $2) ORDER BY created_at DESC",
            SELECT_BOOKING
        ))
        .bind(gym_id.as_uuid())
        .bind(date)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to list bookings"))?;
        into_bookings(rows)
    }

    async fn list_by_trainer(&self, trainer_id: &TrainerId) -> Result<Vec<Booking>, DomainError> {
        let rows: Vec<BookingRow> = sqlx::query_as(&format!(
            "{} WHERE trainer_id = $1 ORDER BY created_at DESC",
            SELECT_BOOKING
        ))
        .bind(trainer_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to list bookings"))?;
        into_bookings(rows)
    }

    async fn occupancy_for(&self, gym_id: &GymId, date: NaiveDate) -> Result<Vec<Occupancy>, DomainError> {
        let mut conn = self.pool.acquire().await.map_err(db_error("Failed to acquire connection"))?;
        gym_occupancy(&mut conn, gym_id, date, &Uuid::nil()).await
    }
}
