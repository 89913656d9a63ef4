//! Admin console commands.
//!
//! # Usage
//!
//! ```bash
//! emporium admin orders --status delivered
//! emporium admin users --role admin --search asha
//! emporium admin create-product -n "Yoga Mat" -p 899 -c sports -s 20
//! ```

use emporium_admin::AdminClient;
use emporium_core::OrderStatus;
use emporium_core::accounts::RoleFilter;
use emporium_core::catalog::NewProduct;
use emporium_core::orders::StatusFilter;
use tracing::info;

use super::Context;

/// List all orders with shop-wide figures.
///
/// # Errors
///
/// Returns an error if the account is not an admin or a request fails.
pub async fn orders(
    ctx: &Context,
    status: &StatusFilter,
    search: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let admin = AdminClient::connect(ctx.api.clone()).await?;
    let listing = admin.order_listing(status, search).await?;

    let summary = &listing.summary;
    info!("{} orders, {} total revenue", summary.count, summary.total_amount);
    for status in OrderStatus::ALL {
        info!("  {:<10} {}", status.label(), summary.count_of(status));
    }

    info!("Showing {} order(s)", listing.orders.len());
    for order in &listing.orders {
        info!(
            "#{}  {:<24} {:<10} {} item(s)  {}",
            order.short_ref(),
            order.user_id.as_ref().map_or("-", |id| id.as_str()),
            order.status.label(),
            order.total_items(),
            order.total_amount
        );
    }
    Ok(())
}

/// List all users with account figures.
///
/// # Errors
///
/// Returns an error if the account is not an admin or a request fails.
pub async fn users(
    ctx: &Context,
    role: &RoleFilter,
    search: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let admin = AdminClient::connect(ctx.api.clone()).await?;
    let listing = admin.user_listing(role, search).await?;

    let stats = listing.stats;
    info!(
        "{} users: {} admin(s), {} customer(s), {} active",
        stats.total, stats.admins, stats.users, stats.active
    );
    for user in &listing.users {
        info!(
            "{:<26} {:<24} {:<32} {:<6} {}",
            user.id,
            user.user_name,
            user.email,
            user.role,
            if user.is_active() { "active" } else { "inactive" }
        );
    }
    Ok(())
}

/// Add a product to the catalog.
///
/// # Errors
///
/// Returns an error if the form is invalid, the account is not an admin, or
/// the request fails.
pub async fn create_product(ctx: &Context, product: &NewProduct) -> Result<(), Box<dyn std::error::Error>> {
    let admin = AdminClient::connect(ctx.api.clone()).await?;
    let created = admin.create_product(product).await?;
    info!("Created product {} ({})", created.name, created.id);
    Ok(())
}
