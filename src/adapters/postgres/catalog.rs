//! PostgreSQL implementation of the gym catalog ports.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::domain::foundation::{
    ApprovalStatus, DayOfWeek, DomainError, ErrorCode, GymId, Money, RatingSummary, ServiceId,
    SlotId, Timestamp, UserId,
};
use crate::domain::gym::{ensure_no_overlap, GeoPoint, Gym, GymDetails, GymService, TimeSlot};
use crate::domain::search::SearchQuery;
use crate::ports::{GymRepository, ServiceRepository, SlotRepository};

use super::{db_error, decode, hour_range, to_i32, to_u32};

/// Gyms, their services and weekly slots share one repository since they
/// are always owned by the same gym aggregate.
pub struct PostgresCatalogRepository {
    pool: PgPool,
}

impl PostgresCatalogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Gyms
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, sqlx::FromRow)]
struct GymRow {
    id: Uuid,
    owner_id: Uuid,
    name: String,
    description: String,
    address: String,
    city: String,
    latitude: f64,
    longitude: f64,
    amenities: Vec<String>,
    images: Vec<String>,
    status: String,
    rating: f64,
    total_reviews: i64,
    featured_until: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<GymRow> for Gym {
    type Error = DomainError;

    fn try_from(row: GymRow) -> Result<Self, Self::Error> {
        Ok(Gym {
            id: GymId::from_uuid(row.id),
            owner_id: UserId::from_uuid(row.owner_id),
            details: GymDetails {
                name: row.name,
                description: row.description,
                address: row.address,
                city: row.city,
                location: GeoPoint::try_new(row.latitude, row.longitude)?,
                amenities: row.amenities,
                images: row.images,
            },
            status: decode("status", &row.status)?,
            rating: RatingSummary {
                average: row.rating,
                total_reviews: row.total_reviews,
            },
            featured_until: row.featured_until.map(Timestamp::from_datetime),
            created_at: Timestamp::from_datetime(row.created_at),
            updated_at: Timestamp::from_datetime(row.updated_at),
        })
    }
}

const SELECT_GYM: &str = r#"
    SELECT id, owner_id, name, description, address, city, latitude, longitude,
           amenities, images, status, rating, total_reviews, featured_until,
           created_at, updated_at
    FROM gyms
"#;

fn into_gyms(rows: Vec<GymRow>) -> Result<Vec<Gym>, DomainError> {
    rows.into_iter().map(Gym::try_from).collect()
}

#[async_trait]
impl GymRepository for PostgresCatalogRepository {
    async fn insert(&self, gym: &Gym) -> Result<(), DomainError> {
        let d = &gym.details;
        sqlx::query(
            r#"
            INSERT INTO gyms (
                id, owner_id, name, description, address, city, latitude, longitude,
                amenities, images, status, rating, total_reviews, featured_until,
                created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
            "#,
        )
        .bind(gym.id.as_uuid())
        .bind(gym.owner_id.as_uuid())
        .bind(&d.name)
        .bind(&d.description)
        .bind(&d.address)
        .bind(&d.city)
        .bind(d.location.latitude)
        .bind(d.location.longitude)
        .bind(&d.amenities)
        .bind(&d.images)
        .bind(gym.status.as_str())
        .bind(gym.rating.average)
        .bind(gym.rating.total_reviews)
        .bind(gym.featured_until.as_ref().map(Timestamp::as_datetime))
        .bind(gym.created_at.as_datetime())
        .bind(gym.updated_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(db_error("Failed to save gym"))?;
        Ok(())
    }

    async fn update(&self, gym: &Gym) -> Result<(), DomainError> {
        let d = &gym.details;
        let result = sqlx::query(
            r#"
            UPDATE gyms SET
                name = $2, description = $3, address = $4, city = $5,
                latitude = $6, longitude = $7, amenities = $8, images = $9,
                status = $10, updated_at = $11
            WHERE id = $1
            "#,
        )
        .bind(gym.id.as_uuid())
        .bind(&d.name)
        .bind(&d.description)
        .bind(&d.address)
        .bind(&d.city)
        .bind(d.location.latitude)
        .bind(d.location.longitude)
        .bind(&d.amenities)
        .bind(&d.images)
        .bind(gym.status.as_str())
        .bind(gym.updated_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(db_error("Failed to update gym"))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::new(ErrorCode::GymNotFound, "Gym not found"));
        }
        Ok(())
    }

    async fn find_by_id(&self, id: &GymId) -> Result<Option<Gym>, DomainError> {
        let row: Option<GymRow> = sqlx::query_as(&format!("{} WHERE id = $1", SELECT_GYM))
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("Failed to fetch gym"))?;
        row.map(Gym::try_from).transpose()
    }

    async fn list_by_owner(&self, owner_id: &UserId) -> Result<Vec<Gym>, DomainError> {
        let rows: Vec<GymRow> =
            sqlx::query_as(&format!("{} WHERE owner_id = $1 ORDER BY created_at DESC", SELECT_GYM))
                .bind(owner_id.as_uuid())
                .fetch_all(&self.pool)
                .await
                .map_err(db_error("Failed to list gyms"))?;
        into_gyms(rows)
    }

    async fn list_by_status(&self, status: Option<ApprovalStatus>) -> Result<Vec<Gym>, DomainError> {
        let rows: Vec<GymRow> = sqlx::query_as(&format!(
            "{} WHERE ($1::TEXT IS NULL OR status = $1) ORDER BY created_at DESC",
            SELECT_GYM
        ))
        .bind(status.map(|s| s.as_str()))
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to list gyms"))?;
        into_gyms(rows)
    }

    async fn search_candidates(&self, query: &SearchQuery) -> Result<Vec<Gym>, DomainError> {
        let rows: Vec<GymRow> = sqlx::query_as(&format!(
            r#"{}
            WHERE status = 'approved'
              AND ($1::TEXT IS NULL OR lower(city) = lower($1))
              AND ($2::TEXT IS NULL OR strpos(lower(name), lower($2)) > 0)
            "#,
            SELECT_GYM
        ))
        .bind(query.city.as_deref())
        .bind(query.text.as_deref())
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to search gyms"))?;
        into_gyms(rows)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Services
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, sqlx::FromRow)]
struct ServiceRow {
    id: Uuid,
    gym_id: Uuid,
    name: String,
    description: String,
    service_type: String,
    price: i64,
    duration_days: Option<i32>,
    session_count: Option<i32>,
    is_active: bool,
    created_at: DateTime<Utc>,
}

impl TryFrom<ServiceRow> for GymService {
    type Error = DomainError;

    fn try_from(row: ServiceRow) -> Result<Self, Self::Error> {
        Ok(GymService {
            id: ServiceId::from_uuid(row.id),
            gym_id: GymId::from_uuid(row.gym_id),
            name: row.name,
            description: row.description,
            service_type: decode("service_type", &row.service_type)?,
            price: Money::from_minor(row.price),
            duration_days: row.duration_days.map(|d| to_u32("duration_days", d)).transpose()?,
            session_count: row.session_count.map(|c| to_u32("session_count", c)).transpose()?,
            is_active: row.is_active,
            created_at: Timestamp::from_datetime(row.created_at),
        })
    }
}

const SELECT_SERVICE: &str = r#"
    SELECT id, gym_id, name, description, service_type, price, duration_days,
           session_count, is_active, created_at
    FROM gym_services
"#;

#[async_trait]
impl ServiceRepository for PostgresCatalogRepository {
    async fn insert(&self, service: &GymService) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO gym_services (
                id, gym_id, name, description, service_type, price, duration_days,
                session_count, is_active, created_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(service.id.as_uuid())
        .bind(service.gym_id.as_uuid())
        .bind(&service.name)
        .bind(&service.description)
        .bind(service.service_type.as_str())
        .bind(service.price.minor())
        .bind(service.duration_days.map(to_i32))
        .bind(service.session_count.map(to_i32))
        .bind(service.is_active)
        .bind(service.created_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(db_error("Failed to save service"))?;
        Ok(())
    }

    async fn update(&self, service: &GymService) -> Result<(), DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE gym_services SET
                name = $2, description = $3, price = $4, duration_days = $5,
                session_count = $6, is_active = $7
            WHERE id = $1
            "#,
        )
        .bind(service.id.as_uuid())
        .bind(&service.name)
        .bind(&service.description)
        .bind(service.price.minor())
        .bind(service.duration_days.map(to_i32))
        .bind(service.session_count.map(to_i32))
        .bind(service.is_active)
        .execute(&self.pool)
        .await
        .map_err(db_error("Failed to update service"))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::new(ErrorCode::ServiceNotFound, "Service not found"));
        }
        Ok(())
    }

    async fn find_by_id(&self, id: &ServiceId) -> Result<Option<GymService>, DomainError> {
        let row: Option<ServiceRow> = sqlx::query_as(&format!("{} WHERE id = $1", SELECT_SERVICE))
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("Failed to fetch service"))?;
        row.map(GymService::try_from).transpose()
    }

    async fn list_by_gym(&self, gym_id: &GymId, active_only: bool) -> Result<Vec<GymService>, DomainError> {
        let rows: Vec<ServiceRow> = sqlx::query_as(&format!(
            "{} WHERE gym_id = $1 AND (is_active OR NOT $2) ORDER BY created_at",
            SELECT_SERVICE
        ))
        .bind(gym_id.as_uuid())
        .bind(active_only)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to list services"))?;
        rows.into_iter().map(GymService::try_from).collect()
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Time slots
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, sqlx::FromRow)]
pub(super) struct SlotRow {
    id: Uuid,
    gym_id: Uuid,
    day_of_week: i16,
    start_hour: i16,
    end_hour: i16,
    max_capacity: i32,
    is_active: bool,
}

impl TryFrom<SlotRow> for TimeSlot {
    type Error = DomainError;

    fn try_from(row: SlotRow) -> Result<Self, Self::Error> {
        Ok(TimeSlot {
            id: SlotId::from_uuid(row.id),
            gym_id: GymId::from_uuid(row.gym_id),
            day_of_week: DayOfWeek::try_new(row.day_of_week)?,
            hours: hour_range(row.start_hour, row.end_hour)?,
            max_capacity: to_u32("max_capacity", row.max_capacity)?,
            is_active: row.is_active,
        })
    }
}

pub(super) const SELECT_SLOT: &str = r#"
    SELECT id, gym_id, day_of_week, start_hour, end_hour, max_capacity, is_active
    FROM time_slots
"#;

/// Serialises slot writes per gym, then checks the candidate against the
/// gym's slots as they stand under that lock.
async fn lock_gym_slots(conn: &mut PgConnection, slot: &TimeSlot) -> Result<(), DomainError> {
    let locked: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM gyms WHERE id = $1 FOR UPDATE")
        .bind(slot.gym_id.as_uuid())
        .fetch_optional(&mut *conn)
        .await
        .map_err(db_error("Failed to lock gym"))?;
    if locked.is_none() {
        return Err(DomainError::new(ErrorCode::GymNotFound, "Gym not found"));
    }

    let rows: Vec<SlotRow> = sqlx::query_as(&format!(
        "{} WHERE gym_id = $1 AND day_of_week = $2 AND is_active",
        SELECT_SLOT
    ))
    .bind(slot.gym_id.as_uuid())
    .bind(i16::from(slot.day_of_week))
    .fetch_all(&mut *conn)
    .await
    .map_err(db_error("Failed to list time slots"))?;
    let existing = rows
        .into_iter()
        .map(TimeSlot::try_from)
        .collect::<Result<Vec<_>, _>>()?;
    ensure_no_overlap(slot, &existing)
}

#[async_trait]
impl SlotRepository for PostgresCatalogRepository {
    async fn insert_checked(&self, slot: &TimeSlot) -> Result<(), DomainError> {
        let mut tx = self.pool.begin().await.map_err(db_error("Failed to begin transaction"))?;
        lock_gym_slots(&mut tx, slot).await?;
        sqlx::query(
            r#"
            INSERT INTO time_slots (id, gym_id, day_of_week, start_hour, end_hour, max_capacity, is_active)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(slot.id.as_uuid())
        .bind(slot.gym_id.as_uuid())
        .bind(i16::from(slot.day_of_week))
        .bind(i16::from(slot.hours.start.value()))
        .bind(i16::from(slot.hours.end.value()))
        .bind(to_i32(slot.max_capacity))
        .bind(slot.is_active)
        .execute(&mut *tx)
        .await
        .map_err(db_error("Failed to save time slot"))?;
        tx.commit().await.map_err(db_error("Failed to commit time slot"))?;
        Ok(())
    }

    async fn update_checked(&self, slot: &TimeSlot) -> Result<(), DomainError> {
        let mut tx = self.pool.begin().await.map_err(db_error("Failed to begin transaction"))?;
        lock_gym_slots(&mut tx, slot).await?;
        let result = sqlx::query(
            r#"
            UPDATE time_slots SET
                day_of_week = $2, start_hour = $3, end_hour = $4, max_capacity = $5, is_active = $6
            WHERE id = $1
            "#,
        )
        .bind(slot.id.as_uuid())
        .bind(i16::from(slot.day_of_week))
        .bind(i16::from(slot.hours.start.value()))
        .bind(i16::from(slot.hours.end.value()))
        .bind(to_i32(slot.max_capacity))
        .bind(slot.is_active)
        .execute(&mut *tx)
        .await
        .map_err(db_error("Failed to update time slot"))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::new(ErrorCode::SlotNotFound, "Time slot not found"));
        }
        tx.commit().await.map_err(db_error("Failed to commit time slot"))?;
        Ok(())
    }

    async fn find_by_id(&self, id: &SlotId) -> Result<Option<TimeSlot>, DomainError> {
        let row: Option<SlotRow> = sqlx::query_as(&format!("{} WHERE id = $1", SELECT_SLOT))
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("Failed to fetch time slot"))?;
        row.map(TimeSlot::try_from).transpose()
    }

    async fn list_by_gym(&self, gym_id: &GymId) -> Result<Vec<TimeSlot>, DomainError> {
        let rows: Vec<SlotRow> = sqlx::query_as(&format!(
            "{} WHERE gym_id = $1 ORDER BY day_of_week, start_hour",
            SELECT_SLOT
        ))
        .bind(gym_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to list time slots"))?;
        rows.into_iter().map(TimeSlot::try_from).collect()
    }
}
