//! Cart endpoints.
//!
//! The cart lives on the backend, keyed by the logged-in user, so every call
//! here needs a session.

use emporium_core::ProductId;
use emporium_core::orders::CartLine;
use reqwest::Method;
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use super::conversions::{WireCartLine, convert_cart_lines};
use super::normalize::{self, CART_KEYS};
use super::{ApiClient, Auth};
use crate::error::ApiError;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AddToCartBody<'a> {
    product_id: &'a ProductId,
    quantity: u32,
}

impl ApiClient {
    /// Current cart contents.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NotAuthenticated` when logged out, or an error if
    /// the request fails or the cart cannot be read.
    #[instrument(skip(self))]
    pub async fn get_cart_items(&self) -> Result<Vec<CartLine>, ApiError> {
        let request = self.request(Method::GET, &["api", "cart"], Auth::Required)?;
        let value = self.execute(request).await?;

        // An empty body is an empty cart
        if value.is_null() {
            return Ok(Vec::new());
        }
        let wire: Vec<WireCartLine> = normalize::collection(value, CART_KEYS)?;
        let lines = convert_cart_lines(wire);
        debug!(lines = lines.len(), "Fetched cart");
        Ok(lines)
    }

    /// Add `quantity` units of a product to the cart.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::InvalidQuantity` for a zero quantity (nothing is
    /// sent), or an error if the request fails.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn add_to_cart(&self, product_id: &ProductId, quantity: u32) -> Result<(), ApiError> {
        if quantity == 0 {
            return Err(ApiError::InvalidQuantity(quantity));
        }
        let request = self
            .request(Method::POST, &["api", "cart", "add"], Auth::Required)?
            .json(&AddToCartBody {
                product_id,
                quantity,
            });
        self.execute(request).await?;
        info!(quantity, "Added to cart");
        Ok(())
    }

    /// Remove a product from the cart entirely.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn remove_from_cart(&self, product_id: &ProductId) -> Result<(), ApiError> {
        let request = self.request(
            Method::DELETE,
            &["api", "cart", "remove", product_id.as_str()],
            Auth::Required,
        )?;
        self.execute(request).await?;
        info!("Removed from cart");
        Ok(())
    }

    /// Empty the cart, returning how many lines were removed.
    ///
    /// The backend has no bulk endpoint, so lines are removed one at a time.
    /// Every line is attempted even after a failure.
    ///
    /// # Errors
    ///
    /// Returns the first removal failure, or an error fetching the cart.
    #[instrument(skip(self))]
    pub async fn clear_cart(&self) -> Result<usize, ApiError> {
        let lines = self.get_cart_items().await?;
        let mut removed = 0;
        let mut first_error = None;

        for line in &lines {
            match self.remove_from_cart(&line.product_id).await {
                Ok(()) => removed += 1,
                Err(e) => {
                    warn!(product_id = %line.product_id, error = %e, "Failed to remove cart line");
                    first_error.get_or_insert(e);
                }
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(removed),
        }
    }
}
