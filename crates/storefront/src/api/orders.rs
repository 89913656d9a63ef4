//! Order endpoints.

use emporium_core::OrderId;
use emporium_core::orders::{NewOrder, Order};
use reqwest::Method;
use tracing::{debug, info, instrument};

use super::normalize::{self, ORDER_KEYS};
use super::{ApiClient, Auth};
use crate::error::ApiError;

impl ApiClient {
    /// Submit an order, returning the id the backend assigned.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response carries no order id.
    #[instrument(skip(self, order), fields(items = order.items.len(), total = %order.total_amount))]
    pub async fn place_order(&self, order: &NewOrder) -> Result<OrderId, ApiError> {
        let request = self
            .request(Method::POST, &["api", "orders"], Auth::Required)?
            .json(order);
        let value = self.execute(request).await?;

        let order_id = normalize::find_string(&value, &["orderId", "_id", "id"], &["order", "data"])
            .map(OrderId::new)
            .ok_or_else(|| ApiError::UnexpectedShape("order response without an id".to_string()))?;
        info!(order_id = %order_id, "Order placed");
        Ok(order_id)
    }

    /// The logged-in user's orders.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response has no order list.
    #[instrument(skip(self))]
    pub async fn get_order_history(&self) -> Result<Vec<Order>, ApiError> {
        let request = self.request(Method::GET, &["api", "orders", "history"], Auth::Required)?;
        let orders: Vec<Order> = normalize::collection(self.execute(request).await?, ORDER_KEYS)?;
        debug!(count = orders.len(), "Fetched order history");
        Ok(orders)
    }

    /// Ask the backend to cancel an order.
    ///
    /// The backend decides whether the order can still be cancelled; use
    /// [`Order::is_cancellable`] to avoid a pointless request.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the backend refuses.
    #[instrument(skip(self), fields(order_id = %id))]
    pub async fn cancel_order(&self, id: &OrderId) -> Result<(), ApiError> {
        let request = self.request(
            Method::PUT,
            &["api", "orders", id.as_str(), "cancel"],
            Auth::Required,
        )?;
        self.execute(request).await?;
        info!("Order cancelled");
        Ok(())
    }

    /// Every order in the shop (admin only).
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response has no order list.
    #[instrument(skip(self))]
    pub async fn get_all_orders(&self) -> Result<Vec<Order>, ApiError> {
        let request = self.request(Method::GET, &["api", "orders", "all"], Auth::Required)?;
        let orders: Vec<Order> = normalize::collection(self.execute(request).await?, ORDER_KEYS)?;
        debug!(count = orders.len(), "Fetched all orders");
        Ok(orders)
    }
}
