//! Platform settings with a short-TTL read cache.
//!
//! Every checkout reads the commission rate, so settings are cached for
//! `ttl` after each load. Updates through [`CachedSettings::update`] drop
//! the cache, so the next checkout sees the new rate. A zero TTL disables
//! caching.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::RwLock;

use crate::domain::foundation::DomainError;
use crate::domain::settings::{PlatformSettings, SettingsUpdate};
use crate::ports::SettingsRepository;

struct Cached {
    settings: PlatformSettings,
    loaded_at: Instant,
}

pub struct CachedSettings {
    repo: Arc<dyn SettingsRepository>,
    /// Used until a super-admin saves settings.
    defaults: PlatformSettings,
    ttl: Duration,
    cache: RwLock<Option<Cached>>,
}

impl CachedSettings {
    pub fn new(repo: Arc<dyn SettingsRepository>, defaults: PlatformSettings, ttl: Duration) -> Self {
        Self {
            repo,
            defaults,
            ttl,
            cache: RwLock::new(None),
        }
    }

    pub async fn current(&self) -> Result<PlatformSettings, DomainError> {
        if !self.ttl.is_zero() {
            let cache = self.cache.read().await;
            if let Some(ref cached) = *cache {
                if cached.loaded_at.elapsed() < self.ttl {
                    return Ok(cached.settings);
                }
            }
        }

        let settings = self.repo.load().await?.unwrap_or(self.defaults);
        if !self.ttl.is_zero() {
            *self.cache.write().await = Some(Cached {
                settings,
                loaded_at: Instant::now(),
            });
        }
        Ok(settings)
    }

    /// Applies a partial update, persists it and invalidates the cache.
    pub async fn update(&self, update: SettingsUpdate) -> Result<PlatformSettings, DomainError> {
        let stored = self.repo.load().await?.unwrap_or(self.defaults);
        let next = stored.apply(update)?;
        self.repo.save(&next).await?;
        self.invalidate().await;
        tracing::info!(
            commission_bps = next.commission_rate.bps(),
            featured_price_per_day = next.featured_price_per_day.minor(),
            "Platform settings updated"
        );
        Ok(next)
    }

    pub async fn invalidate(&self) {
        *self.cache.write().await = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryStore;
    use crate::domain::foundation::{CommissionRate, Money};

    fn defaults() -> PlatformSettings {
        PlatformSettings {
            commission_rate: CommissionRate::try_from_bps(1000).unwrap(),
            featured_price_per_day: Money::from_major(499),
        }
    }

    #[tokio::test]
    async fn falls_back_to_defaults_when_unset() {
        let cache = CachedSettings::new(Arc::new(InMemoryStore::new()), defaults(), Duration::from_secs(30));
        assert_eq!(cache.current().await.unwrap(), defaults());
    }

    #[tokio::test]
    async fn cached_value_survives_direct_store_writes_within_ttl() {
        let store = Arc::new(InMemoryStore::new());
        let cache = CachedSettings::new(store.clone(), defaults(), Duration::from_secs(30));
        cache.current().await.unwrap();

        let mut changed = defaults();
        changed.commission_rate = CommissionRate::try_from_bps(2000).unwrap();
        store.save(&changed).await.unwrap();

        assert_eq!(cache.current().await.unwrap().commission_rate.bps(), 1000);
    }

    #[tokio::test]
    async fn update_invalidates_cache() {
        let cache = CachedSettings::new(Arc::new(InMemoryStore::new()), defaults(), Duration::from_secs(30));
        cache.current().await.unwrap();
        cache
            .update(SettingsUpdate {
                commission_percent: Some(12.5),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(cache.current().await.unwrap().commission_rate.bps(), 1250);
    }

    #[tokio::test]
    async fn zero_ttl_always_reloads() {
        let store = Arc::new(InMemoryStore::new());
        let cache = CachedSettings::new(store.clone(), defaults(), Duration::ZERO);
        cache.current().await.unwrap();
        let mut changed = defaults();
        changed.featured_price_per_day = Money::from_major(999);
        store.save(&changed).await.unwrap();
        assert_eq!(cache.current().await.unwrap().featured_price_per_day, Money::from_major(999));
    }
}
