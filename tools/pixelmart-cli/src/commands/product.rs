//! Product detail command.

use anyhow::Result;
use pixelmart_commerce::catalog::Product;
use pixelmart_commerce::ids::ProductId;
use pixelmart_commerce::money::{Currency, Money};
use pixelmart_commerce::pricing::{
    breakdown, memory_tier_prices, storage_tier_prices, DeliveryTier, PricingMode,
    SelectedOptions, WarrantyTier, DELIVERY_TIERS, WARRANTY_TIERS,
};
use serde_json::json;

use super::{OptionArgs, ProductArgs};
use crate::context::Context;
use crate::output::{self, Output};

/// Run the product command.
pub fn run(args: ProductArgs, ctx: &Context) -> Result<()> {
    let catalog = ctx.catalog()?;
    let product = catalog.find(ProductId::new(args.id))?;

    let mut options = selected_options(product, &args.options, &ctx.output);
    if let Some(delivery) = args.delivery {
        if DeliveryTier::find(&delivery).is_none() {
            ctx.output
                .warn(&format!("Unknown delivery option '{}'; no charge applied", delivery));
        }
        options = options.with_delivery(delivery);
    }

    let price = breakdown(product, &options, PricingMode::Detail);

    if ctx.output.is_json() {
        ctx.output.json(&json!({
            "product": product,
            "options": options,
            "breakdown": price,
        }));
        return Ok(());
    }

    ctx.output.header(&product.name);
    ctx.output.kv("id", &product.id.to_string());
    ctx.output.kv("category", product.category.as_str());
    if !product.short_description.is_empty() {
        ctx.output.kv("description", &product.short_description);
    }
    if !product.colors.is_empty() {
        ctx.output.kv("colors", &product.colors.join(", "));
    }
    if let Some(image) = product.thumbnail(options.color.as_deref()) {
        ctx.output.kv("image", image);
    }

    let highlights = product.specs.highlights();
    if !highlights.is_empty() {
        ctx.output.header("Specs");
        for (label, value) in highlights {
            ctx.output.kv(label, &value.to_string());
        }
        if ctx.output.is_verbose() {
            for (key, value) in product.specs.other() {
                ctx.output.kv(key, &value.to_string());
            }
        }
    }

    let storage = storage_tier_prices(product);
    if !storage.is_empty() {
        ctx.output.header("Storage");
        print_tiers(&ctx.output, &storage, options.storage.as_deref());
    }

    let memory = memory_tier_prices(product);
    if !memory.is_empty() {
        ctx.output.header("Memory");
        print_tiers(&ctx.output, &memory, options.memory.as_deref());
    }

    let currency = product.price.currency;
    if product.apple_care {
        ctx.output.header("Warranty");
        for tier in WARRANTY_TIERS.iter() {
            ctx.output
                .list_item(&format_warranty(tier, options.warranty_id.as_deref(), currency));
        }
    }

    ctx.output.header("Delivery");
    for tier in DELIVERY_TIERS.iter() {
        ctx.output
            .list_item(&format_delivery(tier, options.delivery_id.as_deref(), currency));
    }

    ctx.output.header("Price");
    ctx.output.kv("base", &price.base.display());
    ctx.output.kv("storage", &price.storage.display());
    ctx.output.kv("memory", &price.memory.display());
    ctx.output.kv("warranty", &price.warranty.display());
    ctx.output.kv("delivery", &price.delivery.display());
    ctx.output.kv("quantity", &price.quantity.get().to_string());
    ctx.output.kv("total", &output::price(&price.total.display()));

    Ok(())
}

/// Start from the product's default configuration and apply the flags.
///
/// Values the product does not offer are kept; pricing ignores them.
pub(crate) fn selected_options(product: &Product, args: &OptionArgs, out: &Output) -> SelectedOptions {
    let mut options = SelectedOptions::defaults_for(product);

    if let Some(ref color) = args.color {
        if !product.has_color(color) {
            out.warn(&format!("{} is not offered in {}", product.name, color));
        }
        options = options.with_color(color.as_str());
    }
    if let Some(ref storage) = args.storage {
        if !product.storage_options().is_some_and(|t| t.contains(storage)) {
            out.warn(&format!("Unknown storage option '{}'; no surcharge applied", storage));
        }
        options = options.with_storage(storage.as_str());
    }
    if let Some(ref memory) = args.memory {
        if !product.memory_options().is_some_and(|t| t.contains(memory)) {
            out.warn(&format!("Unknown memory option '{}'; no surcharge applied", memory));
        }
        options = options.with_memory(memory.as_str());
    }
    if let Some(ref warranty) = args.warranty {
        if WarrantyTier::find(warranty).is_none() {
            out.warn(&format!("Unknown warranty option '{}'; no charge applied", warranty));
        }
        options = options.with_warranty(warranty.as_str());
    }
    if let Some(quantity) = args.quantity {
        options = options.with_quantity(quantity);
    }

    options
}

fn print_tiers(out: &Output, tiers: &[(String, Money)], selected: Option<&str>) {
    for (label, surcharge) in tiers {
        let marker = if Some(label.as_str()) == selected { "*" } else { " " };
        let price = if surcharge.is_zero() {
            "included".to_string()
        } else {
            format!("+{}", surcharge.display())
        };
        out.list_item(&format!("{} {:8} {}", marker, label, price));
    }
}

fn format_warranty(tier: &WarrantyTier, selected: Option<&str>, currency: Currency) -> String {
    let marker = if Some(tier.id) == selected { "*" } else { " " };
    format!(
        "{} {:18} {:>8}  {}",
        marker,
        tier.name,
        format_cents(tier.price_cents, currency),
        tier.description
    )
}

fn format_delivery(tier: &DeliveryTier, selected: Option<&str>, currency: Currency) -> String {
    let marker = if Some(tier.id) == selected { "*" } else { " " };
    format!(
        "{} {:18} {:>8}  {}",
        marker,
        tier.name,
        format_cents(tier.price_cents, currency),
        tier.description
    )
}

fn format_cents(cents: i64, currency: Currency) -> String {
    if cents == 0 {
        "free".to_string()
    } else {
        Money::new(cents, currency).display()
    }
}
