//! Admin console errors.

use emporium_storefront::ApiError;
use thiserror::Error;

/// Errors from admin console operations.
#[derive(Debug, Error)]
pub enum AdminError {
    /// The backend call failed.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// The logged-in account is not an administrator.
    #[error("Account {0} is not an administrator")]
    NotAdmin(String),
}
