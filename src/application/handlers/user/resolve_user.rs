//! ResolveUserHandler - Maps a validated identity to its local account.

use std::sync::Arc;

use crate::domain::foundation::{DomainError, IdentityClaims, Role};
use crate::domain::user::User;
use crate::ports::UserRepository;

/// Runs on every authenticated request.
///
/// First sight of a subject provisions the account. Emails configured as
/// super-admins are promoted on each resolve, so adding an address to the
/// list takes effect on that user's next request.
pub struct ResolveUserHandler {
    users: Arc<dyn UserRepository>,
    super_admins: Vec<String>,
}

impl ResolveUserHandler {
    pub fn new(users: Arc<dyn UserRepository>, super_admins: Vec<String>) -> Self {
        Self { users, super_admins }
    }

    pub async fn handle(&self, claims: &IdentityClaims) -> Result<User, DomainError> {
        let mut user = match self.users.find_by_subject(&claims.subject).await? {
            Some(user) => user,
            None => {
                let user = self
                    .users
                    .provision(&User::provision(claims, &self.super_admins))
                    .await?;
                tracing::info!(user_id = %user.id, role = %user.role, "Provisioned user");
                user
            }
        };

        let listed = self
            .super_admins
            .iter()
            .any(|e| e.eq_ignore_ascii_case(&user.email));
        if listed && user.promote_to(Role::SuperAdmin) {
            self.users.update_role(&user.id, user.role).await?;
            tracing::info!(user_id = %user.id, "Promoted configured super-admin");
        }

        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryStore;

    fn claims(email: &str) -> IdentityClaims {
        IdentityClaims::new(format!("sub-{}", email), email)
    }

    #[tokio::test]
    async fn first_request_provisions_user() {
        let store = Arc::new(InMemoryStore::new());
        let handler = ResolveUserHandler::new(store.clone(), vec![]);

        let user = handler.handle(&claims("asha@example.com")).await.unwrap();
        assert_eq!(user.role, Role::User);
        assert!(store.find_by_subject("sub-asha@example.com").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn repeat_requests_return_same_account() {
        let store = Arc::new(InMemoryStore::new());
        let handler = ResolveUserHandler::new(store, vec![]);

        let first = handler.handle(&claims("asha@example.com")).await.unwrap();
        let second = handler.handle(&claims("asha@example.com")).await.unwrap();
        assert_eq!(first.id, second.id);
    }

    #[tokio::test]
    async fn existing_user_promoted_when_listed_later() {
        let store = Arc::new(InMemoryStore::new());
        let before = ResolveUserHandler::new(store.clone(), vec![])
            .handle(&claims("boss@example.com"))
            .await
            .unwrap();
        assert_eq!(before.role, Role::User);

        let after = ResolveUserHandler::new(store.clone(), vec!["BOSS@example.com".to_string()])
            .handle(&claims("boss@example.com"))
            .await
            .unwrap();
        assert_eq!(after.role, Role::SuperAdmin);
        let stored = UserRepository::find_by_id(store.as_ref(), &after.id).await.unwrap().unwrap();
        assert_eq!(stored.role, Role::SuperAdmin);
    }
}
