//! Dashboard listings.
//!
//! Summary figures always cover the full set, so the headline numbers do not
//! change while the admin filters or searches the table below them.

use emporium_core::accounts::{Profile, RoleFilter, UserStats, filter_users};
use emporium_core::orders::{Order, OrderSummary, StatusFilter, filter_orders};

/// Orders matching the current filter plus shop-wide order figures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderListing {
    pub orders: Vec<Order>,
    pub summary: OrderSummary,
}

impl OrderListing {
    /// Filter `orders` by status and search text, and summarize all of them.
    #[must_use]
    pub fn build(orders: Vec<Order>, filter: &StatusFilter, search: &str) -> Self {
        let summary = OrderSummary::of(&orders);
        let orders = filter_orders(&orders, filter, search)
            .into_iter()
            .cloned()
            .collect();
        Self { orders, summary }
    }
}

/// Users matching the current filter plus shop-wide account figures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserListing {
    pub users: Vec<Profile>,
    pub stats: UserStats,
}

impl UserListing {
    /// Filter `users` by role and search text, and count all of them.
    #[must_use]
    pub fn build(users: Vec<Profile>, role: &RoleFilter, search: &str) -> Self {
        let stats = UserStats::of(&users);
        let users = filter_users(&users, role, search)
            .into_iter()
            .cloned()
            .collect();
        Self { users, stats }
    }
}
