//! User profile endpoints.

use emporium_core::accounts::{Profile, ProfileUpdate};
use reqwest::Method;
use tracing::{debug, info, instrument};

use super::normalize::{self, USER_KEYS};
use super::{ApiClient, Auth};
use crate::error::ApiError;

const PROFILE_KEYS: &[&str] = &["user", "profile", "data"];

impl ApiClient {
    /// The logged-in user's profile.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the profile cannot be read.
    #[instrument(skip(self))]
    pub async fn get_user_profile(&self) -> Result<Profile, ApiError> {
        let request = self.request(Method::GET, &["api", "users", "profile"], Auth::Required)?;
        normalize::single(self.execute(request).await?, PROFILE_KEYS)
    }

    /// Save profile edits, returning the updated profile.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Validation` for an invalid edit (nothing is sent),
    /// or an error if the request fails.
    #[instrument(skip(self, update))]
    pub async fn update_user(&self, update: &ProfileUpdate) -> Result<Profile, ApiError> {
        update.validate()?;
        let request = self
            .request(Method::PUT, &["api", "users", "profile"], Auth::Required)?
            .json(update);
        let profile: Profile = normalize::single(self.execute(request).await?, PROFILE_KEYS)?;
        info!(user_id = %profile.id, "Profile updated");
        Ok(profile)
    }

    /// Every registered user (admin only).
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response has no user list.
    #[instrument(skip(self))]
    pub async fn get_all_users(&self) -> Result<Vec<Profile>, ApiError> {
        let request = self.request(Method::GET, &["api", "users"], Auth::Required)?;
        let users: Vec<Profile> = normalize::collection(self.execute(request).await?, USER_KEYS)?;
        debug!(count = users.len(), "Fetched all users");
        Ok(users)
    }
}
