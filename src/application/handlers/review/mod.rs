//! Review handlers.

mod create_review;

use std::sync::Arc;

use crate::domain::foundation::DomainError;
use crate::domain::review::{Review, ReviewTarget};
use crate::ports::ReviewRepository;

pub use create_review::{CreateReviewCommand, CreateReviewHandler, ReviewCreated};

/// Public review listings, newest first.
pub struct ReviewQueries {
    reviews: Arc<dyn ReviewRepository>,
}

impl ReviewQueries {
    pub fn new(reviews: Arc<dyn ReviewRepository>) -> Self {
        Self { reviews }
    }

    pub async fn for_target(&self, target: &ReviewTarget) -> Result<Vec<Review>, DomainError> {
        self.reviews.list_for_target(target).await
    }
}
