//! Checkout: price the cart and place the order.

use emporium_core::orders::{CartLine, NewOrder, ShippingAddress};
use emporium_core::pricing::total_quantity;
use emporium_core::{LineItem, OrderId, PaymentMethod, PricingResult, compute_pricing};
use tracing::{info, instrument};

use crate::api::ApiClient;
use crate::error::ApiError;

/// What the customer submits at checkout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutRequest {
    pub address: ShippingAddress,
    pub payment_method: PaymentMethod,
    pub notes: Option<String>,
}

/// Result of a successful checkout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacedOrder {
    pub order_id: OrderId,
    /// Totals the order was placed with.
    pub pricing: PricingResult,
}

/// Cart contents with their derived totals, as shown on the cart page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartSummary {
    pub lines: Vec<CartLine>,
    /// Units across all lines.
    pub item_count: u64,
    pub pricing: PricingResult,
}

impl CartSummary {
    /// Price `lines`.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Pricing` if a line has a zero quantity or a
    /// negative price.
    pub fn from_lines(lines: Vec<CartLine>) -> Result<Self, ApiError> {
        let items = lines
            .iter()
            .map(CartLine::line_item)
            .collect::<Result<Vec<LineItem>, _>>()?;

        Ok(Self {
            item_count: total_quantity(&items),
            pricing: compute_pricing(&items),
            lines,
        })
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

impl ApiClient {
    /// Fetch and price the cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart cannot be fetched or priced.
    pub async fn cart_summary(&self) -> Result<CartSummary, ApiError> {
        CartSummary::from_lines(self.get_cart_items().await?)
    }

    /// Place an order for everything in the cart.
    ///
    /// Fetches the cart, refuses an empty one, validates the address, then
    /// submits the items together with the computed totals.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::EmptyCart`, `ApiError::Validation` for a bad
    /// address, or an error from any of the requests.
    #[instrument(skip(self, request), fields(payment = %request.payment_method))]
    pub async fn checkout(&self, request: CheckoutRequest) -> Result<PlacedOrder, ApiError> {
        let summary = self.cart_summary().await?;
        if summary.is_empty() {
            return Err(ApiError::EmptyCart);
        }
        request.address.validate()?;

        let order = NewOrder::new(
            &summary.lines,
            &summary.pricing,
            request.address,
            request.payment_method,
            request.notes,
        );
        let order_id = self.place_order(&order).await?;
        info!(
            order_id = %order_id,
            total = %summary.pricing.total,
            "Checkout complete"
        );

        Ok(PlacedOrder {
            order_id,
            pricing: summary.pricing,
        })
    }
}
