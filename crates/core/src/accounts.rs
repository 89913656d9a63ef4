//! User accounts: profiles, registration and the admin user listing.

use core::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{UserId, UserRole};
use crate::validation::{
    PasswordStrength, ValidationError, ValidationErrors, password_strength, validate_email,
};

/// A user profile as returned by the user service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    #[serde(rename = "_id", alias = "id")]
    pub id: UserId,
    #[serde(alias = "name", default)]
    pub user_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub role: UserRole,
    /// `None` when the backend omits the flag.
    #[serde(default)]
    pub is_active: Option<bool>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Profile {
    /// Accounts are active unless explicitly deactivated.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.is_active != Some(false)
    }

    /// Whether this account may use the admin console.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }
}

// =============================================================================
// Forms
// =============================================================================

/// Sign-up form.
#[derive(Clone, PartialEq, Eq)]
pub struct RegistrationCredentials {
    pub user_name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

impl fmt::Debug for RegistrationCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistrationCredentials")
            .field("user_name", &self.user_name)
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .field("confirm_password", &"[REDACTED]")
            .finish()
    }
}

impl RegistrationCredentials {
    /// Strength of the chosen password.
    #[must_use]
    pub fn strength(&self) -> PasswordStrength {
        password_strength(&self.password)
    }

    /// Check the form before submitting it.
    ///
    /// # Errors
    ///
    /// Returns every problem found: missing name, missing or malformed email,
    /// a password scoring below 50, or a confirmation that differs.
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = Vec::new();

        if self.user_name.trim().is_empty() {
            errors.push(ValidationError::MissingField("userName".to_string()));
        }
        if self.email.trim().is_empty() {
            errors.push(ValidationError::MissingField("email".to_string()));
        } else if let Err(e) = validate_email(&self.email) {
            errors.push(e);
        }

        let strength = self.strength();
        if !strength.is_acceptable() {
            errors.push(ValidationError::WeakPassword {
                score: strength.score(),
                minimum: PasswordStrength::MINIMUM_ACCEPTED,
            });
        }
        if self.password != self.confirm_password {
            errors.push(ValidationError::PasswordMismatch);
        }

        ValidationErrors::check(errors)
    }
}

/// Edits a user makes to their own profile.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    pub user_name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

impl ProfileUpdate {
    /// Start an edit from the current profile.
    #[must_use]
    pub fn from_profile(profile: &Profile) -> Self {
        Self {
            user_name: profile.user_name.clone(),
            email: profile.email.clone(),
            phone: profile.phone.clone(),
            address: profile.address.clone(),
        }
    }

    /// Check the edit before submitting it.
    ///
    /// # Errors
    ///
    /// Returns missing name or email, or a malformed email.
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = Vec::new();

        if self.user_name.trim().is_empty() {
            errors.push(ValidationError::MissingField("userName".to_string()));
        }
        if self.email.trim().is_empty() {
            errors.push(ValidationError::MissingField("email".to_string()));
        } else if let Err(e) = validate_email(&self.email) {
            errors.push(e);
        }

        ValidationErrors::check(errors)
    }
}

// =============================================================================
// Admin Listing
// =============================================================================

/// Role selection on the user listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RoleFilter {
    #[default]
    All,
    Only(UserRole),
}

impl RoleFilter {
    /// Whether `user` passes the filter.
    #[must_use]
    pub fn matches(&self, user: &Profile) -> bool {
        match self {
            Self::All => true,
            Self::Only(role) => user.role == *role,
        }
    }
}

impl std::str::FromStr for RoleFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "all" {
            Ok(Self::All)
        } else {
            s.parse().map(Self::Only)
        }
    }
}

/// Users passing `role` whose name or email contains `search`
/// (case-insensitive). A blank search matches everyone.
#[must_use]
pub fn filter_users<'a>(users: &'a [Profile], role: &RoleFilter, search: &str) -> Vec<&'a Profile> {
    let needle = search.trim().to_lowercase();
    users
        .iter()
        .filter(|user| role.matches(user))
        .filter(|user| {
            needle.is_empty()
                || user.user_name.to_lowercase().contains(&needle)
                || user.email.to_lowercase().contains(&needle)
        })
        .collect()
}

/// Head counts for the admin user dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct UserStats {
    pub total: usize,
    pub admins: usize,
    pub users: usize,
    pub active: usize,
}

impl UserStats {
    /// Count `users` by role and activity.
    #[must_use]
    pub fn of<'a>(users: impl IntoIterator<Item = &'a Profile>) -> Self {
        users.into_iter().fold(Self::default(), |mut stats, user| {
            stats.total += 1;
            match user.role {
                UserRole::Admin => stats.admins += 1,
                UserRole::User => stats.users += 1,
            }
            if user.is_active() {
                stats.active += 1;
            }
            stats
        })
    }
}
