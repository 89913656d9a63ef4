//! Errors returned by the storefront client.

use emporium_core::{PricingError, ValidationErrors};
use thiserror::Error;

use crate::session::SessionError;

/// Longest backend body excerpt carried in an error message.
const MAX_BODY_EXCERPT: usize = 200;

/// Errors that can occur when talking to the shop backend.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed before a response arrived.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Backend answered with a non-success status.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Message extracted from the response body.
        message: String,
    },

    /// Backend rejected the session token (HTTP 401).
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Resource not found (HTTP 404).
    #[error("Not found: {0}")]
    NotFound(String),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Response JSON did not have any of the accepted shapes.
    #[error("Unexpected response shape: {0}")]
    UnexpectedShape(String),

    /// Input failed client-side validation; nothing was sent.
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationErrors),

    /// Cart contents could not be priced.
    #[error("Pricing error: {0}")]
    Pricing(#[from] PricingError),

    /// Quantity outside what the cart accepts.
    #[error("Invalid quantity: {0}")]
    InvalidQuantity(u32),

    /// The operation needs a logged-in session.
    #[error("Not logged in")]
    NotAuthenticated,

    /// Checkout was attempted with nothing in the cart.
    #[error("Cart is empty")]
    EmptyCart,

    /// The session store failed.
    #[error(transparent)]
    Session(#[from] SessionError),

    /// An endpoint URL could not be built.
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),
}

impl ApiError {
    /// Build the error for a non-success response.
    pub(crate) fn from_response(status: reqwest::StatusCode, body: &str) -> Self {
        let message = extract_message(body).unwrap_or_else(|| {
            let excerpt: String = body.trim().chars().take(MAX_BODY_EXCERPT).collect();
            if excerpt.is_empty() {
                status.canonical_reason().unwrap_or("request failed").to_string()
            } else {
                excerpt
            }
        });

        match status {
            reqwest::StatusCode::UNAUTHORIZED => Self::Unauthorized(message),
            reqwest::StatusCode::NOT_FOUND => Self::NotFound(message),
            _ => Self::Api {
                status: status.as_u16(),
                message,
            },
        }
    }

    /// Whether logging in again could fix this error.
    #[must_use]
    pub const fn needs_login(&self) -> bool {
        matches!(self, Self::Unauthorized(_) | Self::NotAuthenticated)
    }
}

/// Pull `message` or `error` out of a JSON error body.
fn extract_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    ["message", "error"]
        .into_iter()
        .find_map(|key| value.get(key)?.as_str().map(str::to_string))
        .filter(|message| !message.is_empty())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use reqwest::StatusCode;

    use super::*;

    #[test]
    fn test_message_from_json_body() {
        let err = ApiError::from_response(
            StatusCode::BAD_REQUEST,
            r#"{"message":"Insufficient stock"}"#,
        );
        assert!(matches!(
            err,
            ApiError::Api { status: 400, ref message } if message == "Insufficient stock"
        ));

        let err = ApiError::from_response(StatusCode::CONFLICT, r#"{"error":"Email taken"}"#);
        assert_eq!(err.to_string(), "API error (409): Email taken");
    }

    #[test]
    fn test_message_falls_back_to_body_or_reason() {
        let err = ApiError::from_response(StatusCode::BAD_GATEWAY, "upstream down");
        assert_eq!(err.to_string(), "API error (502): upstream down");

        let err = ApiError::from_response(StatusCode::INTERNAL_SERVER_ERROR, "");
        assert_eq!(err.to_string(), "API error (500): Internal Server Error");
    }

    #[test]
    fn test_status_specific_variants() {
        let err = ApiError::from_response(StatusCode::UNAUTHORIZED, r#"{"message":"jwt expired"}"#);
        assert!(matches!(err, ApiError::Unauthorized(ref m) if m == "jwt expired"));
        assert!(err.needs_login());

        let err = ApiError::from_response(StatusCode::NOT_FOUND, "");
        assert!(matches!(err, ApiError::NotFound(_)));
        assert!(!err.needs_login());
    }

    #[test]
    fn test_long_bodies_are_truncated() {
        let body = "x".repeat(1000);
        let ApiError::Api { message, .. } =
            ApiError::from_response(StatusCode::BAD_REQUEST, &body)
        else {
            panic!("expected Api error");
        };
        assert_eq!(message.len(), MAX_BODY_EXCERPT);
    }
}
