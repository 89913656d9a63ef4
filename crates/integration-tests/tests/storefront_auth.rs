//! Integration tests for login, registration and sessions.
//!
//! Run with: cargo test -p emporium-integration-tests --test storefront_auth

use std::sync::Arc;

use emporium_core::accounts::{ProfileUpdate, RegistrationCredentials};
use emporium_core::UserRole;
use emporium_integration_tests::{MockShop, SHOPPER_EMAIL, SHOPPER_PASSWORD, ShopState};
use emporium_storefront::{ApiError, FileSession, SessionStore};
use secrecy::SecretString;

fn password(value: &str) -> SecretString {
    SecretString::from(value.to_string())
}

// ============================================================================
// Login
// ============================================================================

#[tokio::test]
async fn test_login_stores_token_and_unlocks_profile() {
    let shop = MockShop::start(ShopState::seeded()).await;
    let client = shop.client();
    assert!(!client.session().is_authenticated());

    client
        .login(SHOPPER_EMAIL, &password(SHOPPER_PASSWORD))
        .await
        .expect("login");
    assert!(client.session().is_authenticated());

    let profile = client.get_user_profile().await.expect("profile");
    assert_eq!(profile.user_name, "Asha Rao");
    assert_eq!(profile.role, UserRole::User);
    assert!(profile.is_active());
}

#[tokio::test]
async fn test_bad_credentials_are_unauthorized() {
    let shop = MockShop::start(ShopState::seeded()).await;
    let client = shop.client();

    let err = client
        .login(SHOPPER_EMAIL, &password("wrong"))
        .await
        .expect_err("bad password");
    assert!(matches!(err, ApiError::Unauthorized(ref m) if m.contains("Invalid email")));
    assert!(err.needs_login());
    assert!(!client.session().is_authenticated());
}

#[tokio::test]
async fn test_protected_calls_fail_before_login() {
    let shop = MockShop::start(ShopState::seeded()).await;
    let client = shop.client();

    assert!(matches!(
        client.get_cart_items().await,
        Err(ApiError::NotAuthenticated)
    ));
    assert!(matches!(
        client.get_order_history().await,
        Err(ApiError::NotAuthenticated)
    ));
    // Browsing needs no login
    assert_eq!(client.list_products().await.expect("products").len(), 3);
}

#[tokio::test]
async fn test_logout_forgets_token() {
    let shop = MockShop::start(ShopState::seeded()).await;
    let client = shop.logged_in(SHOPPER_EMAIL, SHOPPER_PASSWORD).await;

    client.logout().expect("logout");
    assert!(!client.session().is_authenticated());
    assert!(matches!(
        client.get_user_profile().await,
        Err(ApiError::NotAuthenticated)
    ));
}

#[tokio::test]
async fn test_file_session_survives_restart() {
    let shop = MockShop::start(ShopState::seeded()).await;
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("session.json");

    let first = shop.client_with(Arc::new(FileSession::open(&path).expect("open")));
    first
        .login(SHOPPER_EMAIL, &password(SHOPPER_PASSWORD))
        .await
        .expect("login");
    assert!(path.exists());

    // A new process opens the same file and is still logged in
    let second = shop.client_with(Arc::new(FileSession::open(&path).expect("reopen")));
    let profile = second.get_user_profile().await.expect("profile");
    assert_eq!(profile.email, SHOPPER_EMAIL);

    second.logout().expect("logout");
    assert!(!path.exists());
}

// ============================================================================
// Registration
// ============================================================================

fn credentials(email: &str, pass: &str, confirm: &str) -> RegistrationCredentials {
    RegistrationCredentials {
        user_name: "Meera Iyer".to_string(),
        email: email.to_string(),
        password: pass.to_string(),
        confirm_password: confirm.to_string(),
    }
}

#[tokio::test]
async fn test_register_then_login() {
    let shop = MockShop::start(ShopState::seeded()).await;
    let client = shop.client();

    client
        .register(&credentials("meera@example.com", "Str0ng#Pass", "Str0ng#Pass"))
        .await
        .expect("register");
    // Registration alone does not log in
    assert!(!client.session().is_authenticated());

    {
        let state = shop.state();
        let body = state.registrations.last().expect("registration body");
        assert_eq!(body["userName"], "Meera Iyer");
        assert_eq!(body["email"], "meera@example.com");
        assert!(body.get("confirmPassword").is_none());
    }

    client
        .login("meera@example.com", &password("Str0ng#Pass"))
        .await
        .expect("login");
}

#[tokio::test]
async fn test_invalid_registration_is_not_sent() {
    let shop = MockShop::start(ShopState::seeded()).await;
    let client = shop.client();

    let err = client
        .register(&credentials("not-an-email", "abc", "abd"))
        .await
        .expect_err("invalid form");
    let ApiError::Validation(errors) = err else {
        panic!("expected validation error, got {err:?}");
    };
    assert_eq!(
        errors.codes(),
        ["invalid_email", "weak_password", "password_mismatch"]
    );
    assert!(shop.state().registrations.is_empty());
}

#[tokio::test]
async fn test_duplicate_email_reports_backend_message() {
    let shop = MockShop::start(ShopState::seeded()).await;
    let err = shop
        .client()
        .register(&credentials(SHOPPER_EMAIL, "Str0ng#Pass", "Str0ng#Pass"))
        .await
        .expect_err("duplicate");
    assert!(matches!(
        err,
        ApiError::Api { status: 409, ref message } if message == "Email already registered"
    ));
}

// ============================================================================
// Profile
// ============================================================================

#[tokio::test]
async fn test_update_profile() {
    let shop = MockShop::start(ShopState::seeded()).await;
    let client = shop.logged_in(SHOPPER_EMAIL, SHOPPER_PASSWORD).await;

    let mut update = ProfileUpdate::from_profile(&client.get_user_profile().await.expect("profile"));
    update.phone = Some("9876543210".to_string());
    update.address = Some("12 MG Road, Bengaluru".to_string());

    let profile = client.update_user(&update).await.expect("update");
    assert_eq!(profile.phone.as_deref(), Some("9876543210"));
    assert_eq!(profile.address.as_deref(), Some("12 MG Road, Bengaluru"));
}

#[tokio::test]
async fn test_invalid_profile_update_is_not_sent() {
    let shop = MockShop::start(ShopState::seeded()).await;
    let client = shop.logged_in(SHOPPER_EMAIL, SHOPPER_PASSWORD).await;

    let mut update = ProfileUpdate::from_profile(&client.get_user_profile().await.expect("profile"));
    update.email = "asha@".to_string();
    update.phone = Some("9876543210".to_string());

    let err = client.update_user(&update).await.expect_err("bad email");
    assert!(matches!(err, ApiError::Validation(ref e) if e.codes() == ["invalid_email"]));

    let state = shop.state();
    let stored = state
        .users
        .iter()
        .find(|u| u["email"] == SHOPPER_EMAIL)
        .expect("shopper unchanged");
    assert!(stored.get("phone").is_none());
}
