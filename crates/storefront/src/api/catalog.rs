//! Catalog endpoints.

use emporium_core::ProductId;
use emporium_core::catalog::{NewProduct, Product};
use reqwest::Method;
use tracing::{debug, info, instrument};

use super::normalize::{self, PRODUCT_KEYS};
use super::{ApiClient, Auth};
use crate::error::ApiError;

impl ApiClient {
    /// List every product in the catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response has no product list.
    #[instrument(skip(self))]
    pub async fn list_products(&self) -> Result<Vec<Product>, ApiError> {
        let request = self.request(Method::GET, &["api", "products"], Auth::Optional)?;
        let products: Vec<Product> = normalize::collection(self.execute(request).await?, PRODUCT_KEYS)?;
        debug!(count = products.len(), "Fetched products");
        Ok(products)
    }

    /// Get a single product.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NotFound` if there is no such product, or an error
    /// if the request fails.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn get_product(&self, id: &ProductId) -> Result<Product, ApiError> {
        let request = self.request(Method::GET, &["api", "products", id.as_str()], Auth::Optional)?;
        normalize::single(self.execute(request).await?, &["product", "data"])
    }

    /// Add a product to the catalog (admin only).
    ///
    /// The form is validated first; nothing is sent if it fails.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Validation` for an invalid form, or an error if the
    /// request fails.
    #[instrument(skip(self, product), fields(name = %product.product_name))]
    pub async fn create_product(&self, product: &NewProduct) -> Result<Product, ApiError> {
        product.validate()?;
        let request = self
            .request(Method::POST, &["api", "products"], Auth::Required)?
            .json(product);
        let created: Product = normalize::single(self.execute(request).await?, &["product", "data"])?;
        info!(product_id = %created.id, "Product created");
        Ok(created)
    }
}
