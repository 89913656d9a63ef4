//! Authentication endpoints.
//!
//! A successful login stores the returned token in the client's session
//! store; logout only forgets it locally.

use emporium_core::accounts::RegistrationCredentials;
use reqwest::Method;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use tracing::{info, instrument};

use super::normalize;
use super::{ApiClient, Auth};
use crate::error::ApiError;

#[derive(Serialize)]
struct LoginBody<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RegisterBody<'a> {
    user_name: &'a str,
    email: &'a str,
    password: &'a str,
}

impl ApiClient {
    /// Log in and store the session token.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Unauthorized` for bad credentials, an error if the
    /// response has no token, or a session error if it cannot be stored.
    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &SecretString) -> Result<(), ApiError> {
        let request = self
            .request(Method::POST, &["api", "auth", "login"], Auth::Optional)?
            .json(&LoginBody {
                email: email.trim(),
                password: password.expose_secret(),
            });
        let value = self.execute(request).await?;

        let token = normalize::find_string(&value, &["token", "accessToken"], &["data"])
            .filter(|token| !token.is_empty())
            .ok_or_else(|| ApiError::UnexpectedShape("login response without a token".to_string()))?;
        self.session().set_token(SecretString::from(token))?;
        info!("Logged in");
        Ok(())
    }

    /// Create an account.
    ///
    /// The form is validated first (including password strength and
    /// confirmation); nothing is sent if it fails. Registration does not
    /// log in.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Validation` for an invalid form, or an error if the
    /// request fails.
    #[instrument(skip(self, credentials), fields(email = %credentials.email))]
    pub async fn register(&self, credentials: &RegistrationCredentials) -> Result<(), ApiError> {
        credentials.validate()?;
        let request = self
            .request(Method::POST, &["api", "auth", "register"], Auth::Optional)?
            .json(&RegisterBody {
                user_name: credentials.user_name.trim(),
                email: credentials.email.trim(),
                password: &credentials.password,
            });
        self.execute(request).await?;
        info!("Registered");
        Ok(())
    }

    /// Forget the session token.
    ///
    /// # Errors
    ///
    /// Returns a session error if a persisted token cannot be removed.
    pub fn logout(&self) -> Result<(), ApiError> {
        self.session().clear_token()?;
        info!("Logged out");
        Ok(())
    }
}
