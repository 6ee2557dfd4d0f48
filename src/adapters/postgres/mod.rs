//! PostgreSQL adapters - Database implementations for repository ports.
//!
//! Runtime-checked `sqlx` queries with a `FromRow` struct per table,
//! converted to domain types through `TryFrom`. Operations that must be
//! atomic (capacity checks, payment confirmation, rating recompute,
//! featured activation) run in one transaction and lock the rows they
//! check with `FOR UPDATE`.

mod bookings;
mod catalog;
mod monetization;
mod reviews;
mod trainers;
mod users;

pub use bookings::PostgresBookingRepository;
pub use catalog::PostgresCatalogRepository;
pub use monetization::PostgresMonetizationRepository;
pub use reviews::PostgresReviewRepository;
pub use trainers::PostgresTrainerRepository;
pub use users::PostgresUserRepository;

use std::fmt;
use std::str::FromStr;

use sqlx::PgConnection;

use crate::domain::foundation::{DomainError, ErrorCode, Hour, HourRange};
use crate::domain::monetization::PaymentTransaction;

/// Maps a driver error to `DatabaseError` with context.
fn db_error(context: &'static str) -> impl Fn(sqlx::Error) -> DomainError {
    move |e| DomainError::database(context, e)
}

/// Name of the violated constraint, if `err` is a constraint violation.
fn violated_constraint(err: &sqlx::Error) -> Option<&str> {
    match err {
        sqlx::Error::Database(db_err) => db_err.constraint(),
        _ => None,
    }
}

/// Parses a text column into a domain enum.
fn decode<T>(column: &str, raw: &str) -> Result<T, DomainError>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    raw.parse().map_err(|e| {
        DomainError::new(
            ErrorCode::DatabaseError,
            format!("Invalid {} value '{}': {}", column, raw, e),
        )
    })
}

fn to_u32(column: &str, value: i32) -> Result<u32, DomainError> {
    u32::try_from(value).map_err(|_| {
        DomainError::new(
            ErrorCode::DatabaseError,
            format!("Negative {} value {}", column, value),
        )
    })
}

fn to_i32(value: u32) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}

fn hour_range(start: i16, end: i16) -> Result<HourRange, DomainError> {
    let hour = |v: i16| {
        u8::try_from(v)
            .map_err(|_| DomainError::new(ErrorCode::DatabaseError, format!("Invalid hour {}", v)))
            .and_then(|h| Hour::try_new(h).map_err(DomainError::from))
    };
    Ok(HourRange::try_new(hour(start)?, hour(end)?)?)
}

/// Writes the payment audit row inside the caller's transaction.
async fn insert_transaction(conn: &mut PgConnection, tx: &PaymentTransaction) -> Result<(), DomainError> {
    sqlx::query(
        r#"
        INSERT INTO payment_transactions (id, purpose, reference_id, order_id, payment_id, amount, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        "#,
    )
    .bind(tx.id)
    .bind(tx.purpose.as_str())
    .bind(tx.reference_id)
    .bind(&tx.order_id)
    .bind(&tx.payment_id)
    .bind(tx.amount.minor())
    .bind(tx.created_at.as_datetime())
    .execute(conn)
    .await
    .map_err(db_error("Failed to record payment"))?;
    Ok(())
}
