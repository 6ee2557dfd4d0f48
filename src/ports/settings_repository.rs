use async_trait::async_trait;

use crate::domain::foundation::DomainError;
use crate::domain::settings::PlatformSettings;

/// Single-row platform settings store.
#[async_trait]
pub trait SettingsRepository: Send + Sync {
    /// `None` until a super-admin first saves settings.
    async fn load(&self) -> Result<Option<PlatformSettings>, DomainError>;

    async fn save(&self, settings: &PlatformSettings) -> Result<(), DomainError>;
}
