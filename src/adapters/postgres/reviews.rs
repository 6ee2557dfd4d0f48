//! PostgreSQL implementation of ReviewRepository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::foundation::{
    BookingId, DomainError, ErrorCode, GymId, Rating, RatingSummary, ReviewId, Timestamp,
    TrainerBookingId, TrainerId, UserId,
};
use crate::domain::review::{Review, ReviewSource, ReviewTarget};
use crate::ports::ReviewRepository;

use super::{db_error, violated_constraint};

pub struct PostgresReviewRepository {
    pool: PgPool,
}

impl PostgresReviewRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct ReviewRow {
    id: Uuid,
    user_id: Uuid,
    gym_id: Option<Uuid>,
    trainer_id: Option<Uuid>,
    booking_id: Option<Uuid>,
    trainer_booking_id: Option<Uuid>,
    rating: i16,
    comment: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<ReviewRow> for Review {
    type Error = DomainError;

    fn try_from(row: ReviewRow) -> Result<Self, Self::Error> {
        let corrupt = || DomainError::new(ErrorCode::DatabaseError, format!("Review {} has no target", row.id));
        let target = match (row.gym_id, row.trainer_id) {
            (Some(gym), None) => ReviewTarget::Gym(GymId::from_uuid(gym)),
            (None, Some(trainer)) => ReviewTarget::Trainer(TrainerId::from_uuid(trainer)),
            _ => return Err(corrupt()),
        };
        let source = match (row.booking_id, row.trainer_booking_id) {
            (Some(b), None) => ReviewSource::Booking(BookingId::from_uuid(b)),
            (None, Some(b)) => ReviewSource::TrainerBooking(TrainerBookingId::from_uuid(b)),
            _ => return Err(corrupt()),
        };
        Ok(Review {
            id: ReviewId::from_uuid(row.id),
            user_id: UserId::from_uuid(row.user_id),
            target,
            source,
            rating: Rating::try_new(i32::from(row.rating))?,
            comment: row.comment,
            created_at: Timestamp::from_datetime(row.created_at),
        })
    }
}

/// Table, id column and id of the rated entity.
fn target_columns(target: &ReviewTarget) -> (&'static str, &'static str, Uuid) {
    match target {
        ReviewTarget::Gym(id) => ("gyms", "gym_id", *id.as_uuid()),
        ReviewTarget::Trainer(id) => ("trainers", "trainer_id", *id.as_uuid()),
    }
}

#[async_trait]
impl ReviewRepository for PostgresReviewRepository {
    async fn insert_and_recompute(&self, review: &Review) -> Result<RatingSummary, DomainError> {
        let (table, column, target_id) = target_columns(&review.target);
        let (booking_id, trainer_booking_id) = match review.source {
            ReviewSource::Booking(id) => (Some(*id.as_uuid()), None),
            ReviewSource::TrainerBooking(id) => (None, Some(*id.as_uuid())),
        };

        let mut tx = self.pool.begin().await.map_err(db_error("Failed to begin transaction"))?;

        // Serializes recomputes for the same gym or trainer.
        sqlx::query(&format!("SELECT id FROM {} WHERE id = $1 FOR UPDATE", table))
            .bind(target_id)
            .execute(&mut *tx)
            .await
            .map_err(db_error("Failed to lock review target"))?;

        sqlx::query(&format!(
            r#"
            INSERT INTO reviews (id, user_id, {}, booking_id, trainer_booking_id, rating, comment, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
            column
        ))
        .bind(review.id.as_uuid())
        .bind(review.user_id.as_uuid())
        .bind(target_id)
        .bind(booking_id)
        .bind(trainer_booking_id)
        .bind(i16::from(review.rating.value()))
        .bind(&review.comment)
        .bind(review.created_at.as_datetime())
        .execute(&mut *tx)
        .await
        .map_err(|e| match violated_constraint(&e) {
            Some("reviews_booking_id_key") | Some("reviews_trainer_booking_id_key") => DomainError::new(
                ErrorCode::ReviewAlreadyExists,
                "This booking has already been reviewed",
            ),
            _ => DomainError::database("Failed to save review", e),
        })?;

        let ratings: Vec<(i16,)> = sqlx::query_as(&format!("SELECT rating FROM reviews WHERE {} = $1", column))
            .bind(target_id)
            .fetch_all(&mut *tx)
            .await
            .map_err(db_error("Failed to load ratings"))?;
        let summary = RatingSummary::from_ratings(
            ratings
                .into_iter()
                .filter_map(|(r,)| Rating::try_new(i32::from(r)).ok()),
        );

        sqlx::query(&format!(
            "UPDATE {} SET rating = $2, total_reviews = $3 WHERE id = $1",
            table
        ))
        .bind(target_id)
        .bind(summary.average)
        .bind(summary.total_reviews)
        .execute(&mut *tx)
        .await
        .map_err(db_error("Failed to update rating"))?;

        tx.commit().await.map_err(db_error("Failed to commit review"))?;
        Ok(summary)
    }

    async fn list_for_target(&self, target: &ReviewTarget) -> Result<Vec<Review>, DomainError> {
        let (_, column, target_id) = target_columns(target);
        let rows: Vec<ReviewRow> = sqlx::query_as(&format!(
            r#"
            SELECT id, user_id, gym_id, trainer_id, booking_id, trainer_booking_id, rating, comment, created_at
            FROM reviews
            WHERE {} = $1
            ORDER BY created_at DESC
            "#,
            column
        ))
        .bind(target_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to list reviews"))?;
        rows.into_iter().map(Review::try_from).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn target_columns_pick_matching_table() {
        let gym = GymId::new();
        assert_eq!(target_columns(&ReviewTarget::Gym(gym)), ("gyms", "gym_id", *gym.as_uuid()));
        let trainer = TrainerId::new();
        assert_eq!(target_columns(&ReviewTarget::Trainer(trainer)).0, "trainers");
    }
}
