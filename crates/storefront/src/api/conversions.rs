//! Wire-to-domain conversions for cart entries.

use emporium_core::orders::CartLine;
use emporium_core::{Money, ProductId};
use serde::Deserialize;
use tracing::warn;

// =============================================================================
// Wire Types
// =============================================================================

/// A cart entry as the backend sends it.
///
/// `productId` is either the populated product document or just its id, in
/// which case name and price are expected on the entry itself.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireCartLine {
    #[serde(alias = "product")]
    product_id: WireProductRef,
    #[serde(default)]
    quantity: Option<u32>,
    #[serde(default)]
    price: Option<Money>,
    #[serde(default, alias = "name")]
    product_name: Option<String>,
    #[serde(default)]
    image_url: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum WireProductRef {
    Populated(PopulatedProduct),
    Id(ProductId),
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PopulatedProduct {
    #[serde(rename = "_id", alias = "id")]
    id: ProductId,
    #[serde(default, alias = "name")]
    product_name: Option<String>,
    #[serde(default)]
    price: Option<Money>,
    #[serde(default)]
    image_url: Option<String>,
    #[serde(default)]
    images: Vec<String>,
}

// =============================================================================
// Conversion
// =============================================================================

/// Convert wire entries to cart lines, dropping entries that cannot be priced.
pub fn convert_cart_lines(lines: Vec<WireCartLine>) -> Vec<CartLine> {
    lines.into_iter().filter_map(convert_cart_line).collect()
}

fn convert_cart_line(line: WireCartLine) -> Option<CartLine> {
    let quantity = line.quantity.unwrap_or(1);

    let (product_id, name, price, image_url) = match line.product_id {
        WireProductRef::Populated(product) => {
            let image = product
                .image_url
                .or_else(|| product.images.into_iter().next());
            (
                product.id,
                product.product_name.or(line.product_name),
                // The populated product carries the current price
                product.price.or(line.price),
                image.or(line.image_url),
            )
        }
        WireProductRef::Id(id) => (id, line.product_name, line.price, line.image_url),
    };

    let Some(unit_price) = price else {
        warn!(product_id = %product_id, "Dropping cart line without a price");
        return None;
    };
    if quantity == 0 {
        warn!(product_id = %product_id, "Dropping cart line with zero quantity");
        return None;
    }

    Some(CartLine {
        name: name.unwrap_or_else(|| product_id.to_string()),
        product_id,
        unit_price,
        quantity,
        image_url,
    })
}
