//! Emporium Storefront - Client for the shop backend.
//!
//! This crate talks to the external REST backend on behalf of a shopper:
//! - [`ApiClient`] - Typed access to catalog, cart, order, auth and user endpoints
//! - [`session`] - Where the login token lives between requests
//! - [`checkout`] - Cart pricing and order placement
//!
//! # Architecture
//!
//! The backend is the source of truth; nothing is cached locally. Responses
//! are normalized at the client boundary (see [`api::normalize`]) into the
//! types from `emporium-core`, and all pricing and validation rules come from
//! that crate as well.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//!
//! use emporium_storefront::{ApiClient, ClientConfig, FileSession};
//!
//! let config = ClientConfig::from_env()?;
//! let session = FileSession::open(&config.session_file)?;
//! let client = ApiClient::new(&config, Arc::new(session))?;
//!
//! for product in client.list_products().await? {
//!     println!("{} {}", product.name, product.price);
//! }
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod checkout;
pub mod config;
pub mod error;
pub mod session;

pub use api::ApiClient;
pub use checkout::{CartSummary, CheckoutRequest, PlacedOrder};
pub use config::{ClientConfig, ConfigError};
pub use error::ApiError;
pub use session::{FileSession, MemorySession, SessionError, SessionStore};
