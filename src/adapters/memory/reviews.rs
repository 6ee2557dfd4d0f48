use async_trait::async_trait;

use crate::domain::foundation::{DomainError, ErrorCode, RatingSummary};
use crate::domain::review::{Review, ReviewTarget};
use crate::ports::ReviewRepository;

use super::{newest_first, InMemoryStore};

#[async_trait]
impl ReviewRepository for InMemoryStore {
    async fn insert_and_recompute(&self, review: &Review) -> Result<RatingSummary, DomainError> {
        let mut t = self.tables().await;
        if t.reviews.iter().any(|r| r.source == review.source) {
            return Err(DomainError::new(
                ErrorCode::ReviewAlreadyExists,
                "This booking has already been reviewed",
            ));
        }
        t.reviews.push(review.clone());

        let summary = RatingSummary::from_ratings(
            t.reviews
                .iter()
                .filter(|r| r.target == review.target)
                .map(|r| r.rating),
        );
        match review.target {
            ReviewTarget::Gym(id) => {
                if let Some(gym) = t.gyms.get_mut(&id) {
                    gym.rating = summary;
                }
            }
            ReviewTarget::Trainer(id) => {
                if let Some(trainer) = t.trainers.get_mut(&id) {
                    trainer.rating = summary;
                }
            }
        }
        Ok(summary)
    }

    async fn list_for_target(&self, target: &ReviewTarget) -> Result<Vec<Review>, DomainError> {
        let mut reviews: Vec<Review> = self
            .tables()
            .await
            .reviews
            .iter()
            .filter(|r| &r.target == target)
            .cloned()
            .collect();
        newest_first(&mut reviews, |r| r.created_at);
        Ok(reviews)
    }
}
