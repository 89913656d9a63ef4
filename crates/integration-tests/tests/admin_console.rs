//! Integration tests for the admin console.
//!
//! Run with: cargo test -p emporium-integration-tests --test admin_console

use emporium_admin::{AdminClient, AdminError};
use emporium_core::accounts::RoleFilter;
use emporium_core::catalog::NewProduct;
use emporium_core::orders::StatusFilter;
use emporium_core::{Money, OrderStatus, UserRole};
use emporium_integration_tests::{
    ADMIN_EMAIL, ADMIN_PASSWORD, MockShop, SHOPPER_EMAIL, SHOPPER_PASSWORD, ShopState,
};
use emporium_storefront::ApiError;

async fn admin(shop: &MockShop) -> AdminClient {
    let api = shop.logged_in(ADMIN_EMAIL, ADMIN_PASSWORD).await;
    AdminClient::connect(api).await.expect("admin session")
}

fn new_product(name: &str, price: i64, category: &str, stock: i64) -> NewProduct {
    NewProduct {
        product_name: name.to_string(),
        description: "Ceramic, 350 ml".to_string(),
        price: Money::from_units(price),
        category: category.to_string(),
        stock_quantity: stock,
        image_url: "https://cdn.example.com/mug.jpg".to_string(),
    }
}

// ============================================================================
// Access
// ============================================================================

#[tokio::test]
async fn test_regular_user_is_not_admin() {
    let shop = MockShop::start(ShopState::seeded()).await;
    let api = shop.logged_in(SHOPPER_EMAIL, SHOPPER_PASSWORD).await;

    let err = AdminClient::connect(api).await.expect_err("not admin");
    assert!(matches!(err, AdminError::NotAdmin(ref email) if email == SHOPPER_EMAIL));
}

#[tokio::test]
async fn test_connect_requires_login() {
    let shop = MockShop::start(ShopState::seeded()).await;
    let err = AdminClient::connect(shop.client())
        .await
        .expect_err("logged out");
    assert!(matches!(err, AdminError::Api(ApiError::NotAuthenticated)));
}

#[tokio::test]
async fn test_backend_still_enforces_role_without_connect() {
    let shop = MockShop::start(ShopState::seeded()).await;
    let unchecked = AdminClient::new(shop.logged_in(SHOPPER_EMAIL, SHOPPER_PASSWORD).await);

    let err = unchecked.all_users().await.expect_err("forbidden");
    assert!(matches!(err, AdminError::Api(ApiError::Api { status: 403, .. })));
}

// ============================================================================
// Listings
// ============================================================================

#[tokio::test]
async fn test_order_listing_filters_but_summarizes_everything() {
    let shop = MockShop::start(ShopState::seeded()).await;
    let admin = admin(&shop).await;

    let listing = admin
        .order_listing(&StatusFilter::Only(OrderStatus::Pending), "")
        .await
        .expect("listing");
    assert_eq!(listing.orders.len(), 1);
    assert_eq!(listing.orders[0].status, OrderStatus::Pending);

    assert_eq!(listing.summary.count, 3);
    assert_eq!(listing.summary.total_amount, Money::from_minor(246_782));
    assert_eq!(listing.summary.count_of(OrderStatus::Shipped), 1);
    assert_eq!(listing.summary.count_of(OrderStatus::Cancelled), 0);

    let searched = admin
        .order_listing(&StatusFilter::All, "U-ASHA")
        .await
        .expect("search");
    assert_eq!(searched.orders.len(), 2);
}

#[tokio::test]
async fn test_user_listing() {
    let shop = MockShop::start(ShopState::seeded()).await;
    let admin = admin(&shop).await;

    let listing = admin
        .user_listing(&RoleFilter::Only(UserRole::User), "")
        .await
        .expect("listing");
    assert_eq!(listing.users.len(), 2);
    assert_eq!(listing.stats.total, 3);
    assert_eq!(listing.stats.admins, 1);
    assert_eq!(listing.stats.users, 2);
    assert_eq!(listing.stats.active, 2);

    let searched = admin
        .user_listing(&RoleFilter::All, "chen")
        .await
        .expect("search");
    assert_eq!(searched.users.len(), 1);
    assert!(!searched.users[0].is_active());
}

// ============================================================================
// Products
// ============================================================================

#[tokio::test]
async fn test_create_product() {
    let shop = MockShop::start(ShopState::seeded()).await;
    let admin = admin(&shop).await;

    let product = admin
        .create_product(&new_product("Chai Mug", 349, "home", 40))
        .await
        .expect("create");
    assert_eq!(product.name, "Chai Mug");
    assert_eq!(product.price, Money::from_units(349));
    assert_eq!(product.stock, Some(40));

    // Visible in the public catalog
    let catalog = shop.client().list_products().await.expect("catalog");
    assert!(catalog.iter().any(|p| p.id == product.id));
}

#[tokio::test]
async fn test_invalid_product_is_not_sent() {
    let shop = MockShop::start(ShopState::seeded()).await;
    let admin = admin(&shop).await;

    let err = admin
        .create_product(&new_product("", 0, "toys", -1))
        .await
        .expect_err("invalid form");
    let AdminError::Api(ApiError::Validation(errors)) = err else {
        panic!("expected validation error, got {err:?}");
    };
    assert_eq!(
        errors.codes(),
        ["missing_field", "invalid_price", "unknown_category", "negative_stock"]
    );
    assert_eq!(shop.state().products.len(), 3);
}
