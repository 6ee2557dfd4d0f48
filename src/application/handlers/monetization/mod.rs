//! Monetization handlers: featured listings, payouts, earnings, settings.

mod featured;
mod payouts;
mod settings;

pub use featured::{FeaturedListingHandler, PurchaseFeaturedCommand};
pub use payouts::{PayoutHandler, RecordPayoutCommand};
pub use settings::SettingsHandler;
