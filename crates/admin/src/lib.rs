//! Emporium Admin - Store administration over the shop backend.
//!
//! Provides the admin console operations:
//! - [`AdminClient`] - All orders, all users, product creation
//! - [`listings`] - Filtered order and user tables with dashboard figures
//!
//! # Security
//!
//! Every operation here requires an administrator session. The backend
//! enforces this; [`AdminClient::connect`] additionally checks the role up
//! front so that a regular account fails early with a clear message.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod client;
pub mod error;
pub mod listings;

pub use client::AdminClient;
pub use error::AdminError;
pub use listings::{OrderListing, UserListing};
