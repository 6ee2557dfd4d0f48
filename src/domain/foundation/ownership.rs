//! Ownership trait for user-owned resources.
//!
//! Bookings, trainer bookings, gyms and trainer profiles each have a single
//! owning user. Handlers call `check_ownership` (or `check_owner_or_admin`
//! for gym management) instead of comparing ids by hand.

use super::{DomainError, ErrorCode, UserId};

/// Trait for aggregates that have a single owner.
pub trait OwnedByUser {
    /// Returns the ID of the user who owns this resource.
    fn owner_id(&self) -> &UserId;

    fn is_owner(&self, user_id: &UserId) -> bool {
        self.owner_id() == user_id
    }

    /// Validates ownership, returning a `Forbidden` error if not the owner.
    fn check_ownership(&self, user_id: &UserId) -> Result<(), DomainError> {
        if self.is_owner(user_id) {
            Ok(())
        } else {
            Err(DomainError::new(
                ErrorCode::Forbidden,
                "User does not own this resource",
            )
            .with_detail("owner_id", self.owner_id().to_string())
            .with_detail("requested_by", user_id.to_string()))
        }
    }

    /// Like `check_ownership`, but super-admins always pass.
    fn check_owner_or_admin(&self, user_id: &UserId, is_admin: bool) -> Result<(), DomainError> {
        if is_admin {
            return Ok(());
        }
        self.check_ownership(user_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Locker {
        owner: UserId,
    }

    impl OwnedByUser for Locker {
        fn owner_id(&self) -> &UserId {
            &self.owner
        }
    }

    #[test]
    fn owner_passes_check() {
        let owner = UserId::new();
        let locker = Locker { owner };
        assert!(locker.check_ownership(&owner).is_ok());
    }

    #[test]
    fn stranger_is_forbidden() {
        let locker = Locker { owner: UserId::new() };
        let err = locker.check_ownership(&UserId::new()).unwrap_err();
        assert_eq!(err.code, ErrorCode::Forbidden);
        assert!(err.details.contains_key("requested_by"));
    }

    #[test]
    fn admin_bypasses_check() {
        let locker = Locker { owner: UserId::new() };
        assert!(locker.check_owner_or_admin(&UserId::new(), true).is_ok());
        assert!(locker.check_owner_or_admin(&UserId::new(), false).is_err());
    }
}
