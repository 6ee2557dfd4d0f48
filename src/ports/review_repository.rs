//! Review repository port.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, RatingSummary};
use crate::domain::review::{Review, ReviewTarget};

#[async_trait]
pub trait ReviewRepository: Send + Sync {
    /// Inserts the review and recomputes the target's rating average and
    /// review count in the same transaction. Returns the new summary.
    ///
    /// # Errors
    ///
    /// - `ReviewAlreadyExists` if the source booking was already reviewed
    async fn insert_and_recompute(&self, review: &Review) -> Result<RatingSummary, DomainError>;

    /// Newest first.
    async fn list_for_target(&self, target: &ReviewTarget) -> Result<Vec<Review>, DomainError>;
}
