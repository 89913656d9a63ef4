//! Profile commands.

use emporium_core::accounts::ProfileUpdate;
use tracing::info;

use super::Context;

/// Profile fields to change; `None` keeps the current value.
pub struct Changes {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

/// Show the logged-in user's profile.
///
/// # Errors
///
/// Returns an error if not logged in or the profile cannot be fetched.
pub async fn show(ctx: &Context) -> Result<(), Box<dyn std::error::Error>> {
    let profile = ctx.api.get_user_profile().await?;

    info!("Name:    {}", profile.user_name);
    info!("Email:   {}", profile.email);
    info!("Phone:   {}", profile.phone.as_deref().unwrap_or("-"));
    info!("Address: {}", profile.address.as_deref().unwrap_or("-"));
    info!("Role:    {}", profile.role);
    if let Some(created_at) = profile.created_at {
        info!("Member since {}", created_at.format("%B %Y"));
    }
    Ok(())
}

/// Apply `changes` on top of the current profile.
///
/// # Errors
///
/// Returns an error if the result is invalid or the request fails.
pub async fn update(ctx: &Context, changes: Changes) -> Result<(), Box<dyn std::error::Error>> {
    let current = ctx.api.get_user_profile().await?;
    let mut update = ProfileUpdate::from_profile(&current);

    if let Some(name) = changes.name {
        update.user_name = name;
    }
    if let Some(email) = changes.email {
        update.email = email;
    }
    if changes.phone.is_some() {
        update.phone = changes.phone;
    }
    if changes.address.is_some() {
        update.address = changes.address;
    }

    let profile = ctx.api.update_user(&update).await?;
    info!("Profile updated for {}", profile.user_name);
    Ok(())
}
