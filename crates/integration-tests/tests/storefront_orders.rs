//! Integration tests for the catalog and order history.
//!
//! Run with: cargo test -p emporium-integration-tests --test storefront_orders

use emporium_core::catalog::{CategoryFilter, QuantityCheck, filter_by_category};
use emporium_core::orders::{StatusFilter, filter_orders};
use emporium_core::{Money, OrderId, OrderStatus, PaymentMethod, PaymentStatus, ProductId};
use emporium_integration_tests::{MockShop, SHOPPER_EMAIL, SHOPPER_PASSWORD, ShopState};
use emporium_storefront::ApiError;

const PENDING_ORDER: &str = "665f00000000000000a00001";
const SHIPPED_ORDER: &str = "665f00000000000000a00002";

// ============================================================================
// Catalog
// ============================================================================

#[tokio::test]
async fn test_list_and_filter_products() {
    let shop = MockShop::start(ShopState::seeded()).await;
    let products = shop.client().list_products().await.expect("products");
    assert_eq!(products.len(), 3);

    let fashion = filter_by_category(&products, &"fashion".parse::<CategoryFilter>().expect("filter"));
    let names: Vec<&str> = fashion.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, ["Cotton Kurta", "Wool Socks"]);

    let kurta = products[0].clone();
    assert_eq!(kurta.discount_percent(), Some(25));
    assert_eq!(kurta.star_rating(), "★★★★☆");
    assert_eq!(kurta.clamp_quantity(4), QuantityCheck::Accepted(4));
    assert_eq!(kurta.clamp_quantity(40), QuantityCheck::LimitedTo(10));

    let lamp = &products[2];
    assert!(lamp.is_out_of_stock());
    assert_eq!(lamp.clamp_quantity(1), QuantityCheck::OutOfStock);
}

#[tokio::test]
async fn test_get_product() {
    let shop = MockShop::start(ShopState::seeded()).await;
    let client = shop.client();

    let socks = client
        .get_product(&ProductId::new("p-socks"))
        .await
        .expect("product");
    assert_eq!(socks.name, "Wool Socks");
    assert_eq!(socks.price, Money::from_units(50));

    let err = client
        .get_product(&ProductId::new("p-missing"))
        .await
        .expect_err("missing");
    assert!(matches!(err, ApiError::NotFound(_)));
}

// ============================================================================
// Orders
// ============================================================================

#[tokio::test]
async fn test_history_holds_only_own_orders() {
    let shop = MockShop::start(ShopState::seeded()).await;
    let client = shop.logged_in(SHOPPER_EMAIL, SHOPPER_PASSWORD).await;

    let orders = client.get_order_history().await.expect("history");
    assert_eq!(orders.len(), 2);

    let pending = &orders[0];
    assert_eq!(pending.id.as_str(), PENDING_ORDER);
    assert_eq!(pending.short_ref(), "00a00001");
    assert_eq!(pending.status, OrderStatus::Pending);
    assert_eq!(pending.payment_method, Some(PaymentMethod::Cod));
    assert_eq!(pending.total_amount, Money::from_units(767));
    assert_eq!(pending.total_items(), 3);
    assert!(pending.is_cancellable());

    let shipped = &orders[1];
    assert_eq!(shipped.status, OrderStatus::Shipped);
    assert_eq!(shipped.payment_status, PaymentStatus::Paid);
    assert_eq!(shipped.status.progress_percent(), 75);
    // An item without a quantity counts once
    assert_eq!(shipped.total_items(), 1);
    assert!(!shipped.is_cancellable());

    let only_shipped = filter_orders(&orders, &StatusFilter::Only(OrderStatus::Shipped), "");
    assert_eq!(only_shipped.len(), 1);
}

#[tokio::test]
async fn test_cancel_pending_order() {
    let shop = MockShop::start(ShopState::seeded()).await;
    let client = shop.logged_in(SHOPPER_EMAIL, SHOPPER_PASSWORD).await;

    client
        .cancel_order(&OrderId::new(PENDING_ORDER))
        .await
        .expect("cancel");

    let orders = client.get_order_history().await.expect("history");
    assert_eq!(orders[0].status, OrderStatus::Cancelled);
    assert!(orders[0].status.is_terminal());
    assert!(!orders[0].is_cancellable());
}

#[tokio::test]
async fn test_backend_refuses_to_cancel_shipped_order() {
    let shop = MockShop::start(ShopState::seeded()).await;
    let client = shop.logged_in(SHOPPER_EMAIL, SHOPPER_PASSWORD).await;

    let err = client
        .cancel_order(&OrderId::new(SHIPPED_ORDER))
        .await
        .expect_err("shipped");
    assert!(matches!(
        err,
        ApiError::Api { status: 400, ref message } if message == "Order cannot be cancelled"
    ));
}

#[tokio::test]
async fn test_cancel_someone_elses_order_is_not_found() {
    let shop = MockShop::start(ShopState::seeded()).await;
    let client = shop.logged_in(SHOPPER_EMAIL, SHOPPER_PASSWORD).await;

    let err = client
        .cancel_order(&OrderId::new("665f00000000000000a00003"))
        .await
        .expect_err("other user's order");
    assert!(matches!(err, ApiError::NotFound(_)));
}

#[tokio::test]
async fn test_regular_user_cannot_list_all_orders() {
    let shop = MockShop::start(ShopState::seeded()).await;
    let client = shop.logged_in(SHOPPER_EMAIL, SHOPPER_PASSWORD).await;

    let err = client.get_all_orders().await.expect_err("forbidden");
    assert!(matches!(err, ApiError::Api { status: 403, .. }));
}
