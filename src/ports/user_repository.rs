//! User repository port.
//!
//! Users are created lazily: the auth middleware calls `provision` the first
//! time a token subject is seen. Two concurrent first requests for the same
//! subject must both end up with the same row, so `provision` is
//! insert-or-fetch keyed on `subject`.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, Role, UserId};
use crate::domain::user::User;

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Inserts `user` unless a row with the same subject exists, and returns
    /// whichever row is stored.
    async fn provision(&self, user: &User) -> Result<User, DomainError>;

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, DomainError>;

    async fn find_by_subject(&self, subject: &str) -> Result<Option<User>, DomainError>;

    /// # Errors
    ///
    /// - `UserNotFound` if no such user
    async fn update_role(&self, id: &UserId, role: Role) -> Result<(), DomainError>;
}
