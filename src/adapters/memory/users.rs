use async_trait::async_trait;

use crate::domain::foundation::{DomainError, ErrorCode, Role, UserId};
use crate::domain::user::User;
use crate::ports::UserRepository;

use super::InMemoryStore;

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn provision(&self, user: &User) -> Result<User, DomainError> {
        let mut t = self.tables().await;
        if let Some(existing) = t.users.values().find(|u| u.subject == user.subject) {
            return Ok(existing.clone());
        }
        t.users.insert(user.id, user.clone());
        Ok(user.clone())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, DomainError> {
        Ok(self.tables().await.users.get(id).cloned())
    }

    async fn find_by_subject(&self, subject: &str) -> Result<Option<User>, DomainError> {
        Ok(self
            .tables()
            .await
            .users
            .values()
            .find(|u| u.subject == subject)
            .cloned())
    }

    async fn update_role(&self, id: &UserId, role: Role) -> Result<(), DomainError> {
        let mut t = self.tables().await;
        let user = t
            .users
            .get_mut(id)
            .ok_or_else(|| DomainError::new(ErrorCode::UserNotFound, "User not found"))?;
        user.role = role;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::IdentityClaims;

    #[tokio::test]
    async fn provision_is_idempotent_per_subject() {
        let store = InMemoryStore::new();
        let claims = IdentityClaims::new("sub-1", "a@example.com");
        let first = store.provision(&User::provision(&claims, &[])).await.unwrap();
        let second = store.provision(&User::provision(&claims, &[])).await.unwrap();
        assert_eq!(first.id, second.id);
    }
}
