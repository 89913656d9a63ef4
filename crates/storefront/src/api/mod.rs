//! REST client for the shop backend.
//!
//! Uses `reqwest` 0.13 for HTTP. Every endpoint response goes through
//! [`normalize`] before it is handed out, so callers only ever see the
//! canonical types from `emporium-core`.
//!
//! Endpoints are grouped by service:
//! - `catalog` - products
//! - `cart` - cart lines
//! - `orders` - placing, listing and cancelling orders
//! - `auth` - login, registration, logout
//! - `users` - the signed-in user's profile

mod auth;
mod cart;
mod catalog;
pub mod conversions;
pub mod normalize;
mod orders;
mod users;

use std::sync::Arc;

use reqwest::{Method, RequestBuilder};
use secrecy::ExposeSecret;
use serde_json::Value;
use tracing::{debug, error};
use url::Url;

use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::session::SessionStore;

/// Whether a request carries the session token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Auth {
    /// Attach the token if there is one.
    Optional,
    /// Fail with `NotAuthenticated` if there is no token.
    Required,
}

// =============================================================================
// ApiClient
// =============================================================================

/// Client for the shop backend.
///
/// Cheap to clone; clones share the HTTP connection pool and session.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    client: reqwest::Client,
    base_url: Url,
    session: Arc<dyn SessionStore>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.inner.base_url.as_str())
            .field("authenticated", &self.inner.session.is_authenticated())
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Create a client for the backend in `config`, reading and storing the
    /// login token through `session`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: &ClientConfig, session: Arc<dyn SessionStore>) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("emporium/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            inner: Arc::new(ApiClientInner {
                client,
                base_url: config.api_url.clone(),
                session,
            }),
        })
    }

    /// The session store this client authenticates with.
    #[must_use]
    pub fn session(&self) -> &dyn SessionStore {
        self.inner.session.as_ref()
    }

    /// Backend base URL.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// Build the URL for `segments` below the base URL, percent-encoding
    /// each segment.
    pub(crate) fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.inner.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| ApiError::Url(url::ParseError::RelativeUrlWithCannotBeABaseBase))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Start a request, attaching the bearer token according to `auth`.
    pub(crate) fn request(
        &self,
        method: Method,
        segments: &[&str],
        auth: Auth,
    ) -> Result<RequestBuilder, ApiError> {
        let url = self.endpoint(segments)?;
        let builder = self.inner.client.request(method, url);

        match (self.inner.session.token(), auth) {
            (Some(token), _) => Ok(builder.bearer_auth(token.expose_secret())),
            (None, Auth::Optional) => Ok(builder),
            (None, Auth::Required) => Err(ApiError::NotAuthenticated),
        }
    }

    /// Send a request and return its JSON body (`Null` when empty).
    pub(crate) async fn execute(&self, request: RequestBuilder) -> Result<Value, ApiError> {
        let response = request.send().await?;
        let status = response.status();
        let url = response.url().clone();
        let body = response.text().await?;

        if !status.is_success() {
            let err = ApiError::from_response(status, &body);
            if status.is_server_error() {
                error!(%status, url = %url, error = %err, "Backend returned server error");
            } else {
                debug!(%status, url = %url, error = %err, "Backend rejected request");
            }
            return Err(err);
        }

        if body.trim().is_empty() {
            return Ok(Value::Null);
        }

        serde_json::from_str(&body).map_err(|e| {
            error!(
                error = %e,
                url = %url,
                body = %body.chars().take(500).collect::<String>(),
                "Failed to parse backend response"
            );
            ApiError::Parse(e)
        })
    }
}
