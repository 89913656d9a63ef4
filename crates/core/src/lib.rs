//! Emporium Core - Business rules shared by the storefront, admin console and CLI.
//!
//! This crate provides the pieces of the shop that carry actual rules:
//! - `pricing` - Subtotal, shipping, GST and grand total for a set of line items
//! - `types::status` - Order status progression and cancellation policy
//! - `validation` - Checkout, registration, profile and product form checks
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no HTTP
//! clients, no logging. Everything here is safe to call from any number of
//! threads and never blocks.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for IDs, money, emails, phones and statuses
//! - [`pricing`] - `compute_pricing` over [`pricing::LineItem`]s
//! - [`validation`] - Form validators and the [`ValidationError`] taxonomy
//! - [`catalog`] - Product model and category filtering
//! - [`orders`] - Order, cart line and shipping address models, order listings
//! - [`accounts`] - User profiles and admin user listings

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod accounts;
pub mod catalog;
pub mod orders;
pub mod pricing;
pub mod types;
pub mod validation;

pub use pricing::{LineItem, PricingError, PricingResult, compute_pricing};
pub use types::*;
pub use validation::{ValidationError, ValidationErrors};
