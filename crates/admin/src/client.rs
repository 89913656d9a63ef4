//! Admin console client.

use emporium_core::accounts::{Profile, RoleFilter};
use emporium_core::catalog::{NewProduct, Product};
use emporium_core::orders::{Order, StatusFilter};
use emporium_storefront::ApiClient;
use tracing::{info, instrument};

use crate::error::AdminError;
use crate::listings::{OrderListing, UserListing};

/// Admin operations over a logged-in [`ApiClient`].
#[derive(Debug, Clone)]
pub struct AdminClient {
    api: ApiClient,
}

impl AdminClient {
    /// Wrap `api` without checking the account's role.
    ///
    /// The backend still enforces admin access on every endpoint.
    #[must_use]
    pub const fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Wrap `api` after confirming the logged-in account is an admin.
    ///
    /// # Errors
    ///
    /// Returns `AdminError::NotAdmin` for a regular account, or an error if
    /// the profile cannot be fetched.
    #[instrument(skip(api))]
    pub async fn connect(api: ApiClient) -> Result<Self, AdminError> {
        let profile = api.get_user_profile().await?;
        if !profile.is_admin() {
            return Err(AdminError::NotAdmin(profile.email));
        }
        info!(user_id = %profile.id, "Admin session verified");
        Ok(Self { api })
    }

    /// Underlying storefront client.
    #[must_use]
    pub const fn api(&self) -> &ApiClient {
        &self.api
    }

    /// Every order in the shop.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn all_orders(&self) -> Result<Vec<Order>, AdminError> {
        Ok(self.api.get_all_orders().await?)
    }

    /// Every registered user.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn all_users(&self) -> Result<Vec<Profile>, AdminError> {
        Ok(self.api.get_all_users().await?)
    }

    /// Add a product to the catalog after validating the form.
    ///
    /// # Errors
    ///
    /// Returns a validation error (nothing sent) or a request error.
    pub async fn create_product(&self, product: &NewProduct) -> Result<Product, AdminError> {
        Ok(self.api.create_product(product).await?)
    }

    /// Fetch all orders and build the dashboard listing.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn order_listing(
        &self,
        filter: &StatusFilter,
        search: &str,
    ) -> Result<OrderListing, AdminError> {
        Ok(OrderListing::build(self.all_orders().await?, filter, search))
    }

    /// Fetch all users and build the dashboard listing.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn user_listing(
        &self,
        role: &RoleFilter,
        search: &str,
    ) -> Result<UserListing, AdminError> {
        Ok(UserListing::build(self.all_users().await?, role, search))
    }
}
