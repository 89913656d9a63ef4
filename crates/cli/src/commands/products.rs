//! Catalog browsing commands.

use emporium_core::ProductId;
use emporium_core::catalog::{
    CategoryFilter, Product, category_counts, category_label, filter_by_category,
};
use tracing::info;

use super::Context;

/// List products, optionally limited to one category.
///
/// # Errors
///
/// Returns an error if the catalog cannot be fetched.
pub async fn list(ctx: &Context, category: &CategoryFilter) -> Result<(), Box<dyn std::error::Error>> {
    let products = ctx.api.list_products().await?;
    let shown = filter_by_category(&products, category);

    if *category == CategoryFilter::All {
        for (id, count) in category_counts(&products) {
            info!("{:<20} {count}", category_label(id).unwrap_or(id));
        }
    }

    info!("{} of {} products", shown.len(), products.len());
    for product in shown {
        info!("{}", summary_line(product));
    }
    Ok(())
}

/// Show a single product.
///
/// # Errors
///
/// Returns an error if the product does not exist or cannot be fetched.
pub async fn show(ctx: &Context, id: &ProductId) -> Result<(), Box<dyn std::error::Error>> {
    let product = ctx.api.get_product(id).await?;

    info!("{}", product.name);
    info!(
        "Category: {}",
        category_label(&product.category).unwrap_or(&product.category)
    );
    info!("Price: {}{}", product.price, discount_suffix(&product));
    if product.rating.is_some() {
        info!("Rating: {}", product.star_rating());
    }
    if product.is_out_of_stock() {
        info!("Out of stock");
    } else {
        info!("Up to {} per order", product.max_purchasable());
    }
    if !product.description.is_empty() {
        info!("{}", product.description);
    }
    for feature in &product.features {
        info!("  - {feature}");
    }
    for (key, value) in &product.specifications {
        let value = value.as_str().map_or_else(|| value.to_string(), str::to_string);
        info!("  {key}: {value}");
    }
    Ok(())
}

fn summary_line(product: &Product) -> String {
    let stock = if product.is_out_of_stock() {
        "  [out of stock]"
    } else {
        ""
    };
    format!(
        "{:<26} {:<40} {}{}{stock}",
        product.id,
        product.name,
        product.price,
        discount_suffix(product)
    )
}

fn discount_suffix(product: &Product) -> String {
    match (product.original_price, product.discount_percent()) {
        (Some(original), Some(percent)) => format!(" (was {original}, {percent}% off)"),
        _ => String::new(),
    }
}
