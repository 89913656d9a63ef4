//! Shopping cart commands.

use emporium_core::ProductId;
use emporium_core::catalog::QuantityCheck;
use emporium_core::pricing::FREE_SHIPPING_THRESHOLD;
use tracing::{info, warn};

use super::Context;

/// Show the cart with its totals.
///
/// # Errors
///
/// Returns an error if not logged in or the cart cannot be fetched.
pub async fn show(ctx: &Context) -> Result<(), Box<dyn std::error::Error>> {
    let summary = ctx.api.cart_summary().await?;
    if summary.is_empty() {
        info!("Your cart is empty");
        return Ok(());
    }

    for line in &summary.lines {
        info!(
            "{:<26} {:<36} {} x {} = {}",
            line.product_id,
            line.name,
            line.quantity,
            line.unit_price,
            line.line_total()
        );
    }

    let pricing = &summary.pricing;
    info!("Items:    {}", summary.item_count);
    info!("Subtotal: {}", pricing.subtotal);
    if pricing.has_free_shipping() {
        info!("Shipping: FREE");
    } else {
        info!(
            "Shipping: {} (free above {FREE_SHIPPING_THRESHOLD})",
            pricing.shipping_cost
        );
    }
    info!("GST 18%:  {}", pricing.tax);
    info!("Total:    {}", pricing.total);
    Ok(())
}

/// Add a product, adjusting the quantity to its purchase limits.
///
/// # Errors
///
/// Returns an error if the product is out of stock, not logged in, or a
/// request fails.
pub async fn add(
    ctx: &Context,
    product_id: &ProductId,
    requested: i64,
) -> Result<(), Box<dyn std::error::Error>> {
    let product = ctx.api.get_product(product_id).await?;

    let quantity = match product.clamp_quantity(requested) {
        QuantityCheck::Accepted(quantity) => quantity,
        QuantityCheck::RaisedToOne => {
            warn!("Quantity must be at least 1; adding 1");
            1
        }
        QuantityCheck::LimitedTo(max) => {
            warn!("Only {max} of {} can be ordered; adding {max}", product.name);
            max
        }
        QuantityCheck::OutOfStock => {
            return Err(format!("{} is out of stock", product.name).into());
        }
    };

    ctx.api.add_to_cart(product_id, quantity).await?;
    info!("Added {quantity} x {} to your cart", product.name);
    Ok(())
}

/// Remove a product from the cart.
///
/// # Errors
///
/// Returns an error if not logged in or the request fails.
pub async fn remove(ctx: &Context, product_id: &ProductId) -> Result<(), Box<dyn std::error::Error>> {
    ctx.api.remove_from_cart(product_id).await?;
    info!("Removed {product_id} from your cart");
    Ok(())
}

/// Empty the cart.
///
/// # Errors
///
/// Returns the first failure if any line could not be removed.
pub async fn clear(ctx: &Context) -> Result<(), Box<dyn std::error::Error>> {
    let removed = ctx.api.clear_cart().await?;
    info!("Removed {removed} item(s) from your cart");
    Ok(())
}
