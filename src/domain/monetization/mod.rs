//! Platform revenue: featured listings, payouts and statistics.

mod featured;
mod payout;
mod transaction;

pub use featured::{quote, FeaturedListing, FeaturedStatus, MAX_FEATURED_DAYS};
pub use payout::{EarningsSummary, Payee, Payout};
pub use transaction::{PaymentPurpose, PaymentTransaction};

use serde::{Deserialize, Serialize};

use crate::domain::foundation::Money;

/// Platform-wide totals for the super-admin dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformStats {
    pub total_users: i64,
    pub total_gyms: i64,
    pub pending_gyms: i64,
    pub total_trainers: i64,
    /// Paid gym and trainer bookings.
    pub paid_bookings: i64,
    pub gross_revenue: Money,
    pub commission_revenue: Money,
    pub featured_revenue: Money,
    pub total_paid_out: Money,
}
