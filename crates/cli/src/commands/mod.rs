//! Command implementations.
//!
//! Each command logs its output through `tracing` and returns a boxed error
//! that `main` reports before exiting with status 1.

pub mod admin;
pub mod auth;
pub mod cart;
pub mod checkout;
pub mod orders;
pub mod products;
pub mod profile;

use std::sync::Arc;

use emporium_storefront::{ApiClient, ClientConfig, FileSession};

/// Shared state for every command: configuration and a client bound to the
/// on-disk session.
pub struct Context {
    pub config: ClientConfig,
    pub api: ApiClient,
}

impl Context {
    /// Load configuration from the environment and open the session file.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration is missing or invalid, or the
    /// session file cannot be read.
    pub fn load() -> Result<Self, Box<dyn std::error::Error>> {
        let config = ClientConfig::from_env()?;
        let session = FileSession::open(&config.session_file)?;
        let api = ApiClient::new(&config, Arc::new(session))?;
        tracing::debug!(api_url = %config.api_url, "Client ready");
        Ok(Self { config, api })
    }
}
