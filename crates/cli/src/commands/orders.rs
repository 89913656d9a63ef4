//! Order history commands.

use emporium_core::orders::{Order, StatusFilter, filter_orders};
use emporium_core::{OrderId, OrderStatus};
use tracing::info;

use super::Context;

/// List the logged-in user's orders.
///
/// # Errors
///
/// Returns an error if not logged in or the history cannot be fetched.
pub async fn list(ctx: &Context, status: &StatusFilter) -> Result<(), Box<dyn std::error::Error>> {
    let orders = ctx.api.get_order_history().await?;
    let shown = filter_orders(&orders, status, "");

    if shown.is_empty() {
        info!("No orders found");
        return Ok(());
    }
    for order in shown {
        info!(
            "#{}  {}  {:<10} {} item(s)  {}",
            order.short_ref(),
            order
                .created_at
                .map_or_else(|| "-".to_string(), |at| at.format("%Y-%m-%d").to_string()),
            order.status.label(),
            order.total_items(),
            order.total_amount
        );
    }
    Ok(())
}

/// Show one order with its delivery progress.
///
/// # Errors
///
/// Returns an error if the order is not in the user's history.
pub async fn show(ctx: &Context, id: &OrderId) -> Result<(), Box<dyn std::error::Error>> {
    let orders = ctx.api.get_order_history().await?;
    let order = find(&orders, id)?;

    info!("Order #{} ({})", order.short_ref(), order.id);
    info!("Status: {} ({}%)", order.status.label(), order.status.progress_percent());
    if let Some(current) = order.status.step() {
        for step in OrderStatus::PROGRESSION {
            let reached = step.step().is_some_and(|n| n <= current);
            let mark = if reached { "[x]" } else { "[ ]" };
            info!("  {mark} {}", step.label());
        }
    }
    for item in &order.items {
        info!(
            "  {} x {}{}",
            item.units(),
            item.product_name.as_deref().unwrap_or("(unnamed item)"),
            item.price.map_or_else(String::new, |price| format!(" @ {price}"))
        );
    }
    info!("Total: {}", order.total_amount);
    if let Some(method) = order.payment_method {
        info!("Payment: {} ({})", method.label(), order.payment_status.as_str());
    }
    if let Some(address) = &order.shipping_address {
        info!(
            "Ship to: {}, {}, {}, {} {}",
            address.full_name, address.address, address.city, address.state, address.zip_code
        );
    }
    Ok(())
}

/// Cancel an order if it has not shipped.
///
/// # Errors
///
/// Returns an error if the order is unknown, no longer cancellable, or the
/// backend refuses.
pub async fn cancel(ctx: &Context, id: &OrderId) -> Result<(), Box<dyn std::error::Error>> {
    let orders = ctx.api.get_order_history().await?;
    let order = find(&orders, id)?;

    if !order.is_cancellable() {
        return Err(format!(
            "Order #{} is {} and can no longer be cancelled",
            order.short_ref(),
            order.status.label().to_lowercase()
        )
        .into());
    }

    ctx.api.cancel_order(&order.id).await?;
    info!("Order #{} cancelled", order.short_ref());
    Ok(())
}

/// Find an order by full id or by its short reference.
fn find<'a>(orders: &'a [Order], id: &OrderId) -> Result<&'a Order, Box<dyn std::error::Error>> {
    orders
        .iter()
        .find(|order| order.id == *id || order.short_ref() == id.as_str())
        .ok_or_else(|| format!("Order {id} not found in your order history").into())
}
