//! Login, registration and logout commands.

use emporium_core::accounts::RegistrationCredentials;
use secrecy::SecretString;
use tracing::info;

use super::Context;

/// Log in and store the session token.
///
/// # Errors
///
/// Returns an error for bad credentials or if the session cannot be saved.
pub async fn login(ctx: &Context, email: &str, password: String) -> Result<(), Box<dyn std::error::Error>> {
    ctx.api.login(email, &SecretString::from(password)).await?;
    info!("Logged in as {email}");
    Ok(())
}

/// Create an account.
///
/// # Errors
///
/// Returns an error if the form is invalid or the backend refuses.
pub async fn register(
    ctx: &Context,
    user_name: String,
    email: String,
    password: String,
    confirm_password: String,
) -> Result<(), Box<dyn std::error::Error>> {
    let credentials = RegistrationCredentials {
        user_name,
        email,
        password,
        confirm_password,
    };
    info!("Password strength: {}", credentials.strength());

    ctx.api.register(&credentials).await?;
    info!("Account created for {}; log in to continue", credentials.email);
    Ok(())
}

/// Forget the stored session.
///
/// # Errors
///
/// Returns an error if the session file cannot be removed.
pub fn logout(ctx: &Context) -> Result<(), Box<dyn std::error::Error>> {
    ctx.api.logout()?;
    info!("Logged out (removed {})", ctx.config.session_file.display());
    Ok(())
}
