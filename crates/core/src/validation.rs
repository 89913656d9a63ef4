//! Form validation.
//!
//! Validation failures are the only errors the core crate produces. They are
//! always recoverable: callers collect them into [`ValidationErrors`] and show
//! them next to the offending form fields.
//!
//! Each form type owns a `validate()` method built from the primitives here:
//! - [`crate::orders::ShippingAddress::validate`]
//! - [`crate::accounts::RegistrationCredentials::validate`]
//! - [`crate::accounts::ProfileUpdate::validate`]
//! - [`crate::catalog::NewProduct::validate`]

use core::fmt;

use serde::Serialize;
use thiserror::Error;

use crate::types::{Email, EmailError, Phone, PhoneError};

/// A single validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field was empty or blank.
    #[error("{0} is required")]
    MissingField(String),

    /// Phone number is not exactly 10 digits.
    #[error("invalid phone number: {0}")]
    InvalidPhone(#[from] PhoneError),

    /// Email address is malformed.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    /// Password scored below the minimum accepted strength.
    #[error("password is too weak (strength {score}/100, need at least {minimum})")]
    WeakPassword {
        /// Score the password achieved.
        score: u8,
        /// Minimum accepted score.
        minimum: u8,
    },

    /// Password and confirmation differ.
    #[error("passwords do not match")]
    PasswordMismatch,

    /// Price is zero or negative.
    #[error("price must be greater than zero")]
    InvalidPrice,

    /// Stock level is negative.
    #[error("stock cannot be negative (got {0})")]
    NegativeStock(i64),

    /// Category is not one the store sells.
    #[error("unknown category: {0}")]
    UnknownCategory(String),
}

impl ValidationError {
    /// Stable machine-readable reason code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::MissingField(_) => "missing_field",
            Self::InvalidPhone(_) => "invalid_phone",
            Self::InvalidEmail(_) => "invalid_email",
            Self::WeakPassword { .. } => "weak_password",
            Self::PasswordMismatch => "password_mismatch",
            Self::InvalidPrice => "invalid_price",
            Self::NegativeStock(_) => "negative_stock",
            Self::UnknownCategory(_) => "unknown_category",
        }
    }
}

/// One or more validation failures for a single form.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", format_errors(.0))]
pub struct ValidationErrors(Vec<ValidationError>);

impl ValidationErrors {
    /// `Ok(())` when `errors` is empty, otherwise the collected failures.
    ///
    /// # Errors
    ///
    /// Returns `ValidationErrors` if `errors` is non-empty.
    pub fn check(errors: Vec<ValidationError>) -> Result<(), Self> {
        if errors.is_empty() {
            Ok(())
        } else {
            Err(Self(errors))
        }
    }

    /// Iterate over the individual failures.
    pub fn iter(&self) -> impl Iterator<Item = &ValidationError> {
        self.0.iter()
    }

    /// Number of failures.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false; kept for API symmetry with `len`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Reason codes, in order.
    #[must_use]
    pub fn codes(&self) -> Vec<&'static str> {
        self.0.iter().map(ValidationError::code).collect()
    }

    /// Consume and return the failures.
    #[must_use]
    pub fn into_inner(self) -> Vec<ValidationError> {
        self.0
    }
}

impl From<ValidationError> for ValidationErrors {
    fn from(error: ValidationError) -> Self {
        Self(vec![error])
    }
}

impl<'a> IntoIterator for &'a ValidationErrors {
    type Item = &'a ValidationError;
    type IntoIter = std::slice::Iter<'a, ValidationError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

fn format_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

// =============================================================================
// Field Validators
// =============================================================================

/// Validate a 10-digit phone number.
///
/// # Errors
///
/// Returns `ValidationError::InvalidPhone` unless the input is exactly ten ASCII digits.
pub fn validate_phone(phone: &str) -> Result<Phone, ValidationError> {
    Ok(Phone::parse(phone)?)
}

/// Validate an email address of the form `local@domain.tld`.
///
/// # Errors
///
/// Returns `ValidationError::InvalidEmail` describing the first structural problem.
pub fn validate_email(email: &str) -> Result<Email, ValidationError> {
    Ok(Email::parse(email)?)
}

/// Read access to a form's fields by their wire name.
pub trait FormFields {
    /// Current value of `key`, or `None` if the form has no such field.
    fn field(&self, key: &str) -> Option<&str>;
}

/// Return the keys from `required` whose values are missing or blank.
///
/// An empty result means the form is complete. Keys the form does not know
/// about are reported as missing. Order follows `required`.
#[must_use]
pub fn validate_required_fields<'k, F: FormFields + ?Sized>(
    form: &F,
    required: &[&'k str],
) -> Vec<&'k str> {
    required
        .iter()
        .copied()
        .filter(|key| form.field(key).is_none_or(|value| value.trim().is_empty()))
        .collect()
}

// =============================================================================
// Password Strength
// =============================================================================

/// Heuristic password strength score out of 100.
///
/// Earns 25 points for each of: length of at least 8 characters, an ASCII
/// uppercase letter, an ASCII digit, and a character outside `[A-Za-z0-9]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct PasswordStrength(u8);

impl PasswordStrength {
    /// Lowest score accepted at registration.
    pub const MINIMUM_ACCEPTED: u8 = 50;

    /// Minimum length earning the length point.
    pub const MIN_LENGTH: usize = 8;

    /// Score a password.
    #[must_use]
    pub fn of(password: &str) -> Self {
        let criteria = [
            password.chars().count() >= Self::MIN_LENGTH,
            password.chars().any(|c| c.is_ascii_uppercase()),
            password.chars().any(|c| c.is_ascii_digit()),
            password.chars().any(|c| !c.is_ascii_alphanumeric()),
        ];
        let met = criteria.into_iter().filter(|met| *met).count();
        // At most 4 criteria, so at most 100.
        Self(u8::try_from(met * 25).unwrap_or(100))
    }

    /// Score in `{0, 25, 50, 75, 100}`.
    #[must_use]
    pub const fn score(&self) -> u8 {
        self.0
    }

    /// Display label for the score.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        strength_label(self.0)
    }

    /// Whether the password is strong enough to register with.
    #[must_use]
    pub const fn is_acceptable(&self) -> bool {
        self.0 >= Self::MINIMUM_ACCEPTED
    }
}

impl fmt::Display for PasswordStrength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}/100)", self.label(), self.0)
    }
}

/// Score a password; see [`PasswordStrength`].
#[must_use]
pub fn password_strength(password: &str) -> PasswordStrength {
    PasswordStrength::of(password)
}

/// Label for a strength score: "Very Weak", "Weak", "Good" or "Strong".
#[must_use]
pub const fn strength_label(score: u8) -> &'static str {
    match score {
        0..25 => "Very Weak",
        25..50 => "Weak",
        50..75 => "Good",
        _ => "Strong",
    }
}
