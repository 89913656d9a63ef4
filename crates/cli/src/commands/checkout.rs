//! Checkout command.

use emporium_storefront::CheckoutRequest;
use tracing::info;

use super::Context;

/// Place an order for the whole cart.
///
/// # Errors
///
/// Returns an error for an empty cart, an invalid address, or a failed request.
pub async fn run(ctx: &Context, request: CheckoutRequest) -> Result<(), Box<dyn std::error::Error>> {
    let payment = request.payment_method;
    let placed = ctx.api.checkout(request).await?;

    info!("Order placed: {}", placed.order_id);
    info!("Subtotal: {}", placed.pricing.subtotal);
    info!("Shipping: {}", placed.pricing.shipping_cost);
    info!("GST 18%:  {}", placed.pricing.tax);
    info!("Total:    {} ({})", placed.pricing.total, payment.label());
    Ok(())
}
