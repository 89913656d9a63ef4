//! Orders, cart lines and delivery addresses.
//!
//! Orders are owned by the backend; the types here mirror what it sends and
//! add the listing logic shared by the customer order history and the admin
//! dashboard.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::pricing::{LineItem, PricingError, PricingResult};
use crate::types::{
    AddressType, Money, OrderId, OrderStatus, PaymentMethod, PaymentStatus, ProductId, UserId,
};
use crate::validation::{
    FormFields, ValidationError, ValidationErrors, validate_email, validate_phone,
    validate_required_fields,
};

/// Country used when the address form leaves it out.
pub const DEFAULT_COUNTRY: &str = "India";

/// Number of trailing id characters shown as the order reference.
pub const SHORT_REF_LEN: usize = 8;

// =============================================================================
// Shipping Address
// =============================================================================

/// Delivery address collected at checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingAddress {
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub zip_code: String,
    #[serde(default = "default_country")]
    pub country: String,
    #[serde(default)]
    pub address_type: AddressType,
}

fn default_country() -> String {
    DEFAULT_COUNTRY.to_string()
}

impl Default for ShippingAddress {
    fn default() -> Self {
        Self {
            full_name: String::new(),
            email: String::new(),
            phone: String::new(),
            address: String::new(),
            city: String::new(),
            state: String::new(),
            zip_code: String::new(),
            country: default_country(),
            address_type: AddressType::default(),
        }
    }
}

impl ShippingAddress {
    /// Fields that must be filled in, in form order.
    pub const REQUIRED_FIELDS: [&'static str; 7] = [
        "fullName", "email", "phone", "address", "city", "state", "zipCode",
    ];

    /// Check the address before placing an order.
    ///
    /// Missing fields are reported together first. Phone and email formats
    /// are only checked once every required field is present.
    ///
    /// # Errors
    ///
    /// Returns the missing fields, or the phone/email format failures.
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let missing = validate_required_fields(self, &Self::REQUIRED_FIELDS);
        if !missing.is_empty() {
            return ValidationErrors::check(
                missing
                    .into_iter()
                    .map(|key| ValidationError::MissingField(key.to_string()))
                    .collect(),
            );
        }

        let mut errors = Vec::new();
        if let Err(e) = validate_phone(&self.phone) {
            errors.push(e);
        }
        if let Err(e) = validate_email(&self.email) {
            errors.push(e);
        }
        ValidationErrors::check(errors)
    }
}

impl FormFields for ShippingAddress {
    fn field(&self, key: &str) -> Option<&str> {
        let value = match key {
            "fullName" => &self.full_name,
            "email" => &self.email,
            "phone" => &self.phone,
            "address" => &self.address,
            "city" => &self.city,
            "state" => &self.state,
            "zipCode" => &self.zip_code,
            "country" => &self.country,
            _ => return None,
        };
        Some(value)
    }
}

// =============================================================================
// Cart
// =============================================================================

/// One line of the shopping cart.
///
/// Whatever shape the backend uses for cart entries, the storefront client
/// converts it to this before anything else sees it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub product_id: ProductId,
    pub name: String,
    pub unit_price: Money,
    pub quantity: u32,
    #[serde(default)]
    pub image_url: Option<String>,
}

impl CartLine {
    /// Price this line for [`crate::compute_pricing`].
    ///
    /// # Errors
    ///
    /// Returns an error if the backend sent a zero quantity or a negative price.
    pub const fn line_item(&self) -> Result<LineItem, PricingError> {
        LineItem::new(self.unit_price, self.quantity)
    }

    /// `unit_price * quantity`.
    #[must_use]
    pub fn line_total(&self) -> Money {
        self.unit_price * self.quantity
    }
}

// =============================================================================
// Orders
// =============================================================================

/// One product within a placed order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    #[serde(default)]
    pub product_id: Option<ProductId>,
    #[serde(default, alias = "name")]
    pub product_name: Option<String>,
    #[serde(default)]
    pub quantity: Option<u32>,
    #[serde(default)]
    pub price: Option<Money>,
}

impl OrderItem {
    /// Quantity, counting a missing value as one unit.
    #[must_use]
    pub fn units(&self) -> u32 {
        self.quantity.unwrap_or(1)
    }
}

impl From<&CartLine> for OrderItem {
    fn from(line: &CartLine) -> Self {
        Self {
            product_id: Some(line.product_id.clone()),
            product_name: Some(line.name.clone()),
            quantity: Some(line.quantity),
            price: Some(line.unit_price),
        }
    }
}

/// An order as returned by the order service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    #[serde(rename = "_id", alias = "id")]
    pub id: OrderId,
    /// Human-facing order number, when the backend assigns one.
    #[serde(default, rename = "orderId")]
    pub order_number: Option<String>,
    #[serde(default)]
    pub user_id: Option<UserId>,
    #[serde(default)]
    pub items: Vec<OrderItem>,
    #[serde(default)]
    pub total_amount: Money,
    #[serde(default, rename = "orderStatus", alias = "status")]
    pub status: OrderStatus,
    #[serde(default)]
    pub payment_status: PaymentStatus,
    /// `None` when missing or not a method the store offers.
    #[serde(default, deserialize_with = "PaymentMethod::deserialize_known")]
    pub payment_method: Option<PaymentMethod>,
    #[serde(default)]
    pub shipping_address: Option<ShippingAddress>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Order {
    /// Units across all items; an item without a quantity counts as one.
    #[must_use]
    pub fn total_items(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.units())).sum()
    }

    /// Last eight characters of the order id, used for tracking.
    #[must_use]
    pub fn short_ref(&self) -> &str {
        let id = self.id.as_str();
        let start = id
            .char_indices()
            .rev()
            .nth(SHORT_REF_LEN - 1)
            .map_or(0, |(i, _)| i);
        id.get(start..).unwrap_or(id)
    }

    /// Whether the customer may still cancel this order.
    #[must_use]
    pub const fn is_cancellable(&self) -> bool {
        self.status.is_cancellable()
    }

    fn matches_search(&self, needle: &str) -> bool {
        let contains = |haystack: &str| haystack.to_lowercase().contains(needle);
        contains(self.id.as_str())
            || self.order_number.as_deref().is_some_and(contains)
            || self.user_id.as_ref().is_some_and(|id| contains(id.as_str()))
    }
}

/// Request body for placing an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewOrder {
    pub items: Vec<OrderItem>,
    pub shipping_address: ShippingAddress,
    pub payment_method: PaymentMethod,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub subtotal: Money,
    pub shipping_cost: Money,
    pub tax: Money,
    pub total_amount: Money,
}

impl NewOrder {
    /// Assemble an order from priced cart lines.
    #[must_use]
    pub fn new(
        lines: &[CartLine],
        pricing: &PricingResult,
        shipping_address: ShippingAddress,
        payment_method: PaymentMethod,
        notes: Option<String>,
    ) -> Self {
        Self {
            items: lines.iter().map(OrderItem::from).collect(),
            shipping_address,
            payment_method,
            notes: notes.filter(|n| !n.trim().is_empty()),
            subtotal: pricing.subtotal,
            shipping_cost: pricing.shipping_cost,
            tax: pricing.tax,
            total_amount: pricing.total,
        }
    }
}

// =============================================================================
// Listings
// =============================================================================

/// Status selection on an order listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Only(OrderStatus),
}

impl StatusFilter {
    /// Whether `order` passes the filter.
    #[must_use]
    pub fn matches(&self, order: &Order) -> bool {
        match self {
            Self::All => true,
            Self::Only(status) => order.status == *status,
        }
    }
}

impl std::str::FromStr for StatusFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(Self::All);
        }
        OrderStatus::parse(s)
            .map(Self::Only)
            .ok_or_else(|| format!("invalid order status: {s}"))
    }
}

/// Orders passing `filter` whose id, order number or user id contains
/// `search` (case-insensitive). A blank search matches everything.
#[must_use]
pub fn filter_orders<'a>(orders: &'a [Order], filter: &StatusFilter, search: &str) -> Vec<&'a Order> {
    let needle = search.trim().to_lowercase();
    orders
        .iter()
        .filter(|order| filter.matches(order))
        .filter(|order| needle.is_empty() || order.matches_search(&needle))
        .collect()
}

/// Aggregate figures for a set of orders.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderSummary {
    pub count: usize,
    pub total_amount: Money,
    pub by_status: BTreeMap<OrderStatus, usize>,
}

impl OrderSummary {
    /// Summarize `orders`.
    #[must_use]
    pub fn of<'a>(orders: impl IntoIterator<Item = &'a Order>) -> Self {
        orders.into_iter().fold(Self::default(), |mut summary, order| {
            summary.count += 1;
            summary.total_amount = summary.total_amount + order.total_amount;
            *summary.by_status.entry(order.status).or_insert(0) += 1;
            summary
        })
    }

    /// Number of orders in `status`.
    #[must_use]
    pub fn count_of(&self, status: OrderStatus) -> usize {
        self.by_status.get(&status).copied().unwrap_or(0)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal_macros::dec;
    use serde_json::json;

    use super::*;
    use crate::compute_pricing;

    fn address() -> ShippingAddress {
        ShippingAddress {
            full_name: "Asha Rao".to_string(),
            email: "asha@example.com".to_string(),
            phone: "9876543210".to_string(),
            address: "12 MG Road".to_string(),
            city: "Bengaluru".to_string(),
            state: "Karnataka".to_string(),
            zip_code: "560001".to_string(),
            ..ShippingAddress::default()
        }
    }

    fn order(id: &str, user: &str, status: OrderStatus, total: i64) -> Order {
        Order {
            id: OrderId::new(id),
            order_number: None,
            user_id: Some(UserId::new(user)),
            items: Vec::new(),
            total_amount: Money::from_units(total),
            status,
            payment_status: PaymentStatus::Pending,
            payment_method: None,
            shipping_address: None,
            notes: None,
            created_at: None,
        }
    }

    #[test]
    fn test_valid_address() {
        assert!(address().validate().is_ok());
        assert_eq!(address().country, "India");
    }

    #[test]
    fn test_missing_fields_reported_together_in_form_order() {
        let addr = ShippingAddress {
            city: String::new(),
            full_name: "  ".to_string(),
            phone: "123".to_string(),
            ..address()
        };
        let errors = addr.validate().unwrap_err();
        let fields: Vec<_> = errors.iter().map(ToString::to_string).collect();
        // The bad phone is not reported while fields are missing
        assert_eq!(fields, ["fullName is required", "city is required"]);
    }

    #[test]
    fn test_phone_and_email_format() {
        let addr = ShippingAddress {
            phone: "98765".to_string(),
            email: "asha@example".to_string(),
            ..address()
        };
        let errors = addr.validate().unwrap_err();
        assert_eq!(errors.codes(), ["invalid_phone", "invalid_email"]);
    }

    #[test]
    fn test_address_deserializes_with_default_country() {
        let addr: ShippingAddress = serde_json::from_value(json!({
            "fullName": "Asha Rao",
            "email": "asha@example.com",
            "phone": "9876543210",
            "address": "12 MG Road",
            "city": "Bengaluru",
            "state": "Karnataka",
            "zipCode": "560001",
            "addressType": "office"
        }))
        .unwrap();
        assert_eq!(addr.country, DEFAULT_COUNTRY);
        assert_eq!(addr.address_type, AddressType::Office);
    }

    #[test]
    fn test_cart_lines_build_new_order() {
        let lines = [
            CartLine {
                product_id: ProductId::new("p1"),
                name: "Kurta".to_string(),
                unit_price: Money::from_units(300),
                quantity: 2,
                image_url: None,
            },
            CartLine {
                product_id: ProductId::new("p2"),
                name: "Socks".to_string(),
                unit_price: Money::from_units(50),
                quantity: 1,
                image_url: None,
            },
        ];
        let items: Vec<_> = lines.iter().map(|l| l.line_item().unwrap()).collect();
        let pricing = compute_pricing(&items);
        assert_eq!(pricing.total, Money::from_units(767));
        assert_eq!(lines[0].line_total(), Money::from_units(600));

        let new_order = NewOrder::new(
            &lines,
            &pricing,
            address(),
            PaymentMethod::Upi,
            Some("  ".to_string()),
        );
        let value = serde_json::to_value(&new_order).unwrap();
        assert_eq!(value["paymentMethod"], "upi");
        assert_eq!(value["items"][0]["productId"], "p1");
        assert_eq!(value["items"][0]["quantity"], 2);
        let total: Money = serde_json::from_value(value["totalAmount"].clone()).unwrap();
        assert_eq!(total, Money::from_units(767));
        assert!(value.get("notes").is_none());
    }

    #[test]
    fn test_order_deserializes_backend_shape() {
        let order: Order = serde_json::from_value(json!({
            "_id": "6650c0ffee1234abcd",
            "orderId": "ORD-1001",
            "userId": "u-42",
            "items": [
                {"productId": "p1", "productName": "Kurta", "quantity": 2, "price": 300},
                {"productId": "p2", "price": "50"}
            ],
            "totalAmount": "767.00",
            "orderStatus": "SHIPPED",
            "paymentStatus": "paid",
            "paymentMethod": "cod",
            "createdAt": "2024-05-24T10:15:00Z"
        }))
        .unwrap();

        assert_eq!(order.status, OrderStatus::Shipped);
        assert_eq!(order.total_amount, Money::new(dec!(767.00)));
        assert_eq!(order.total_items(), 3);
        assert_eq!(order.short_ref(), "1234abcd");
        assert!(!order.is_cancellable());
        assert!(order.created_at.is_some());
    }

    #[test]
    fn test_unknown_status_reads_as_pending() {
        let order: Order = serde_json::from_value(json!({
            "_id": "o1",
            "status": "on-hold"
        }))
        .unwrap();
        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.total_amount, Money::ZERO);
    }

    #[test]
    fn test_legacy_status_key_still_read() {
        let order: Order = serde_json::from_value(json!({
            "_id": "o2",
            "status": "delivered"
        }))
        .unwrap();
        assert_eq!(order.status, OrderStatus::Delivered);

        let value = serde_json::to_value(&order).unwrap();
        assert_eq!(value["orderStatus"], "delivered");
    }

    #[test]
    fn test_status_field_drives_progress_and_summary() {
        let orders: Vec<Order> = serde_json::from_value(json!([
            {"_id": "o1", "orderStatus": "shipped", "totalAmount": 100},
            {"_id": "o2", "orderStatus": "delivered", "totalAmount": 50},
            {"_id": "o3", "orderStatus": "pending", "totalAmount": 25}
        ]))
        .unwrap();

        assert_eq!(orders[0].status.progress_percent(), 75);
        assert!(!orders[0].is_cancellable());
        assert!(!orders[1].is_cancellable());

        let summary = OrderSummary::of(&orders);
        assert_eq!(summary.count_of(OrderStatus::Shipped), 1);
        assert_eq!(summary.count_of(OrderStatus::Delivered), 1);
        assert_eq!(summary.count_of(OrderStatus::Pending), 1);
    }

    #[test]
    fn test_odd_payment_method_and_address_type_do_not_break_listing() {
        let orders: Vec<Order> = serde_json::from_value(json!([
            {"_id": "o1", "paymentMethod": "cod"},
            {"_id": "o2", "paymentMethod": "COD"},
            {"_id": "o3", "paymentMethod": "netbanking"},
            {"_id": "o4", "paymentMethod": null},
            {
                "_id": "o5",
                "paymentMethod": "Upi",
                "shippingAddress": {"fullName": "Asha Rao", "addressType": "Warehouse"}
            }
        ]))
        .unwrap();

        let methods: Vec<Option<PaymentMethod>> = orders.iter().map(|o| o.payment_method).collect();
        assert_eq!(
            methods,
            [
                Some(PaymentMethod::Cod),
                Some(PaymentMethod::Cod),
                None,
                None,
                Some(PaymentMethod::Upi)
            ]
        );
        let address = orders[4].shipping_address.as_ref().unwrap();
        assert_eq!(address.address_type, AddressType::Home);
        assert_eq!(address.country, DEFAULT_COUNTRY);
    }

    #[test]
    fn test_short_ref_of_short_id() {
        let o = order("abc", "u1", OrderStatus::Pending, 0);
        assert_eq!(o.short_ref(), "abc");
    }

    #[test]
    fn test_filter_orders() {
        let orders = vec![
            order("AAA111", "alice", OrderStatus::Pending, 100),
            order("BBB222", "bob", OrderStatus::Delivered, 200),
            order("CCC333", "alice", OrderStatus::Delivered, 300),
        ];

        assert_eq!(filter_orders(&orders, &StatusFilter::All, "").len(), 3);

        let delivered = filter_orders(&orders, &"delivered".parse().unwrap(), "  ");
        assert_eq!(delivered.len(), 2);

        let alice_delivered =
            filter_orders(&orders, &StatusFilter::Only(OrderStatus::Delivered), "ALICE");
        assert_eq!(alice_delivered.len(), 1);
        assert_eq!(alice_delivered[0].id.as_str(), "CCC333");

        let by_id = filter_orders(&orders, &StatusFilter::All, "bbb");
        assert_eq!(by_id.len(), 1);

        assert!("bogus".parse::<StatusFilter>().is_err());
    }

    #[test]
    fn test_order_summary() {
        let orders = vec![
            order("o1", "u1", OrderStatus::Pending, 100),
            order("o2", "u2", OrderStatus::Delivered, 250),
            order("o3", "u1", OrderStatus::Delivered, 50),
        ];
        let summary = OrderSummary::of(&orders);
        assert_eq!(summary.count, 3);
        assert_eq!(summary.total_amount, Money::from_units(400));
        assert_eq!(summary.count_of(OrderStatus::Delivered), 2);
        assert_eq!(summary.count_of(OrderStatus::Cancelled), 0);

        assert_eq!(OrderSummary::of(&[]), OrderSummary::default());
    }
}
