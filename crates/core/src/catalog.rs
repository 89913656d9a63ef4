//! Product catalog model and listing helpers.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

use crate::pricing::{LineItem, PricingError};
use crate::types::{Money, ProductId};
use crate::validation::{ValidationError, ValidationErrors};

/// Purchase limit applied when the product sets none.
pub const DEFAULT_MAX_QUANTITY: u32 = 10;

/// Categories the store sells, as `(id, label)` pairs in menu order.
pub const KNOWN_CATEGORIES: [(&str, &str); 6] = [
    ("electronics", "Electronics"),
    ("fashion", "Fashion"),
    ("home", "Home & Living"),
    ("beauty", "Beauty & Care"),
    ("sports", "Sports & Fitness"),
    ("books", "Books & Media"),
];

/// Display label for a category id, if the store knows it.
#[must_use]
pub fn category_label(id: &str) -> Option<&'static str> {
    KNOWN_CATEGORIES
        .iter()
        .find(|(known, _)| *known == id)
        .map(|(_, label)| *label)
}

/// A product as served by the catalog service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(rename = "_id", alias = "id")]
    pub id: ProductId,
    #[serde(rename = "productName", alias = "name")]
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: Money,
    #[serde(default)]
    pub category: String,
    /// Units in stock; `None` when the backend does not track stock.
    #[serde(default)]
    pub stock: Option<i64>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub rating: Option<f64>,
    /// List price before discount.
    #[serde(default)]
    pub original_price: Option<Money>,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub specifications: BTreeMap<String, serde_json::Value>,
    /// Per-order purchase limit.
    #[serde(default)]
    pub max_quantity: Option<u32>,
}

impl Product {
    /// Whole-percent saving against the original price, rounded half-up.
    ///
    /// `None` unless an original price above the current price is set.
    #[must_use]
    pub fn discount_percent(&self) -> Option<u8> {
        let original = self.original_price?.amount();
        let price = self.price.amount();
        if original <= price || original <= Decimal::ZERO {
            return None;
        }
        let saving = (Decimal::ONE - price / original) * Decimal::ONE_HUNDRED;
        saving
            .round_dp_with_strategy(0, rust_decimal::RoundingStrategy::MidpointAwayFromZero)
            .to_u8()
    }

    /// Whether the backend reports no units left.
    #[must_use]
    pub fn is_out_of_stock(&self) -> bool {
        self.stock.is_some_and(|stock| stock <= 0)
    }

    /// Largest quantity a customer may add in one go.
    ///
    /// The lower of the product's purchase limit (default 10) and its stock
    /// (10 when untracked); 0 when out of stock.
    #[must_use]
    pub fn max_purchasable(&self) -> u32 {
        let limit = self.max_quantity.unwrap_or(DEFAULT_MAX_QUANTITY);
        let stock = self.stock.map_or(DEFAULT_MAX_QUANTITY, |stock| {
            u32::try_from(stock.max(0)).unwrap_or(u32::MAX)
        });
        limit.min(stock)
    }

    /// Check a requested quantity against the purchase limits.
    #[must_use]
    pub fn clamp_quantity(&self, requested: i64) -> QuantityCheck {
        let max = self.max_purchasable();
        if max == 0 {
            return QuantityCheck::OutOfStock;
        }
        if requested < 1 {
            return QuantityCheck::RaisedToOne;
        }
        match u32::try_from(requested) {
            Ok(quantity) if quantity <= max => QuantityCheck::Accepted(quantity),
            _ => QuantityCheck::LimitedTo(max),
        }
    }

    /// Five-star rating display, e.g. "★★★★☆" for 4.6.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn star_rating(&self) -> String {
        let filled = self
            .rating
            .map_or(0, |rating| rating.floor().clamp(0.0, 5.0) as usize);
        format!("{}{}", "★".repeat(filled), "☆".repeat(5 - filled))
    }

    /// Price this product as a line item.
    ///
    /// # Errors
    ///
    /// Returns an error if `quantity` is zero or the price is negative.
    pub const fn line_item(&self, quantity: u32) -> Result<LineItem, PricingError> {
        LineItem::new(self.price, quantity)
    }
}

/// Outcome of [`Product::clamp_quantity`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuantityCheck {
    /// The requested quantity is allowed.
    Accepted(u32),
    /// Below one; use a quantity of one.
    RaisedToOne,
    /// Above the purchase limit; use the limit instead.
    LimitedTo(u32),
    /// Nothing can be purchased.
    OutOfStock,
}

impl QuantityCheck {
    /// The quantity to actually use.
    #[must_use]
    pub const fn quantity(&self) -> u32 {
        match self {
            Self::Accepted(quantity) | Self::LimitedTo(quantity) => *quantity,
            Self::RaisedToOne => 1,
            Self::OutOfStock => 0,
        }
    }
}

// =============================================================================
// Category Filtering
// =============================================================================

/// Category selection on the product listing.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Category(String),
}

impl CategoryFilter {
    /// Whether `product` passes the filter.
    #[must_use]
    pub fn matches(&self, product: &Product) -> bool {
        match self {
            Self::All => true,
            Self::Category(category) => product.category == *category,
        }
    }
}

impl std::str::FromStr for CategoryFilter {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(if s.is_empty() || s == "all" {
            Self::All
        } else {
            Self::Category(s.to_owned())
        })
    }
}

/// Products in `filter`, preserving catalog order.
#[must_use]
pub fn filter_by_category<'a>(products: &'a [Product], filter: &CategoryFilter) -> Vec<&'a Product> {
    products.iter().filter(|p| filter.matches(p)).collect()
}

/// Number of products per category id.
#[must_use]
pub fn category_counts(products: &[Product]) -> BTreeMap<&str, usize> {
    let mut counts = BTreeMap::new();
    for product in products {
        *counts.entry(product.category.as_str()).or_insert(0) += 1;
    }
    counts
}

// =============================================================================
// Product Creation (admin)
// =============================================================================

/// Admin form for adding a product to the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    pub product_name: String,
    pub description: String,
    pub price: Money,
    pub category: String,
    pub stock_quantity: i64,
    pub image_url: String,
}

impl NewProduct {
    /// Check the form before submitting it.
    ///
    /// # Errors
    ///
    /// Returns every problem found: missing name or category, non-positive
    /// price, unknown category, negative stock.
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = Vec::new();

        if self.product_name.trim().is_empty() {
            errors.push(ValidationError::MissingField("productName".to_string()));
        }
        if self.price.amount() <= Decimal::ZERO {
            errors.push(ValidationError::InvalidPrice);
        }
        if self.category.trim().is_empty() {
            errors.push(ValidationError::MissingField("category".to_string()));
        } else if category_label(&self.category).is_none() {
            errors.push(ValidationError::UnknownCategory(self.category.clone()));
        }
        if self.stock_quantity < 0 {
            errors.push(ValidationError::NegativeStock(self.stock_quantity));
        }

        ValidationErrors::check(errors)
    }
}
