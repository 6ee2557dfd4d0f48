//! PostgreSQL implementation of UserRepository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::foundation::{DomainError, ErrorCode, Role, Timestamp, UserId};
use crate::domain::user::User;
use crate::ports::UserRepository;

use super::{db_error, decode};

pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: Uuid,
    subject: String,
    email: String,
    name: String,
    role: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = DomainError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        Ok(User {
            id: UserId::from_uuid(row.id),
            subject: row.subject,
            email: row.email,
            name: row.name,
            role: decode("role", &row.role)?,
            created_at: Timestamp::from_datetime(row.created_at),
        })
    }
}

const SELECT_USER: &str = "SELECT id, subject, email, name, role, created_at FROM users";

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn provision(&self, user: &User) -> Result<User, DomainError> {
        // Concurrent first logins race on the subject key; the loser reads
        // the winner's row.
        sqlx::query(
            r#"
            INSERT INTO users (id, subject, email, name, role, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT ON CONSTRAINT users_subject_key DO NOTHING
            "#,
        )
        .bind(user.id.as_uuid())
        .bind(&user.subject)
        .bind(&user.email)
        .bind(&user.name)
        .bind(user.role.as_str())
        .bind(user.created_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(db_error("Failed to provision user"))?;

        self.find_by_subject(&user.subject).await?.ok_or_else(|| {
            DomainError::new(ErrorCode::DatabaseError, "Provisioned user row is missing")
        })
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, DomainError> {
        let row: Option<UserRow> = sqlx::query_as(&format!("{} WHERE id = $1", SELECT_USER))
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("Failed to fetch user"))?;
        row.map(User::try_from).transpose()
    }

    async fn find_by_subject(&self, subject: &str) -> Result<Option<User>, DomainError> {
        let row: Option<UserRow> = sqlx::query_as(&format!("{} WHERE subject = $1", SELECT_USER))
            .bind(subject)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("Failed to fetch user"))?;
        row.map(User::try_from).transpose()
    }

    async fn update_role(&self, id: &UserId, role: Role) -> Result<(), DomainError> {
        let result = sqlx::query("UPDATE users SET role = $2 WHERE id = $1")
            .bind(id.as_uuid())
            .bind(role.as_str())
            .execute(&self.pool)
            .await
            .map_err(db_error("Failed to update role"))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::new(ErrorCode::UserNotFound, "User not found"));
        }
        Ok(())
    }
}
