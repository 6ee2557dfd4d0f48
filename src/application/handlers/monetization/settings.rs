//! Super-admin platform settings.

use std::sync::Arc;

use crate::application::CachedSettings;
use crate::domain::foundation::{CurrentUser, DomainError};
use crate::domain::settings::{PlatformSettings, SettingsUpdate};

pub struct SettingsHandler {
    settings: Arc<CachedSettings>,
}

impl SettingsHandler {
    pub fn new(settings: Arc<CachedSettings>) -> Self {
        Self { settings }
    }

    pub async fn get(&self, user: &CurrentUser) -> Result<PlatformSettings, DomainError> {
        user.require_super_admin()?;
        self.settings.current().await
    }

    /// New checkouts price at the updated rate immediately; existing
    /// bookings keep the split stored at checkout.
    pub async fn update(&self, user: &CurrentUser, update: SettingsUpdate) -> Result<PlatformSettings, DomainError> {
        user.require_super_admin()?;
        self.settings.update(update).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::test_support::World;
    use crate::domain::foundation::{ErrorCode, Money, Role};

    #[tokio::test]
    async fn only_super_admin_changes_commission() {
        let world = World::new();
        let admin = world.user("root", Role::SuperAdmin).await;
        let owner = world.user("meera", Role::GymOwner).await;
        let handler = SettingsHandler::new(world.settings.clone());

        let change = SettingsUpdate {
            commission_percent: Some(12.5),
            featured_price_per_day: None,
        };
        assert_eq!(
            handler.update(&owner, change).await.unwrap_err().code,
            ErrorCode::Forbidden
        );

        let updated = handler.update(&admin, change).await.unwrap();
        assert_eq!(updated.commission_rate.bps(), 1250);
        assert_eq!(updated.featured_price_per_day, Money::from_major(499));
        assert_eq!(handler.get(&admin).await.unwrap(), updated);
    }
}
