//! Product listing command.

use anyhow::Result;
use pixelmart_commerce::events::EventBus;
use pixelmart_commerce::search::{to_query, FilterEngine};
use serde_json::json;

use super::ProductsArgs;
use crate::context::Context;
use crate::output;

/// Run the products command.
pub fn run(args: ProductsArgs, ctx: &Context) -> Result<()> {
    let catalog = ctx.catalog()?;
    let query = args.query.trim_start_matches('?');
    let engine = FilterEngine::mount(&catalog, query, EventBus::new(), ctx.debounce());
    let canonical = to_query(engine.applied(), engine.state().bounds());

    tracing::debug!(query, canonical = %canonical, "listing products");

    if args.count {
        let count = engine.count();
        if ctx.output.is_json() {
            ctx.output.json(&json!({ "query": canonical, "count": count }));
        } else {
            println!("{}", count);
        }
        return Ok(());
    }

    let banner = engine.banner();
    let results = engine.results();

    if ctx.output.is_json() {
        ctx.output.json(&json!({
            "query": canonical,
            "criteria": engine.applied(),
            "count": results.len(),
            "banner": banner.as_ref().map(ToString::to_string),
            "products": results,
        }));
        return Ok(());
    }

    ctx.output.header("Products");
    if !canonical.is_empty() {
        ctx.output.kv("query", &canonical);
    }
    if let Some(banner) = banner {
        ctx.output.info(&banner.to_string());
    }

    if results.is_empty() {
        ctx.output.info("No products match these filters.");
        return Ok(());
    }

    let widths = [4, 28, 12, 6, 10];
    ctx.output
        .table_row(&["ID", "NAME", "CATEGORY", "YEAR", "PRICE"], &widths);
    for product in results {
        let id = product.id.to_string();
        let year = product
            .release_year()
            .map(|y| y.to_string())
            .unwrap_or_else(|| "-".to_string());
        let price = output::price(&product.price.display());
        ctx.output.table_row(
            &[&id, &product.name, product.category.as_str(), &year, &price],
            &widths,
        );
        if ctx.output.is_verbose() && !product.short_description.is_empty() {
            ctx.output.table_row(&["", &product.short_description], &widths);
        }
    }

    ctx.output
        .success(&format!("{} of {} products", results.len(), catalog.len()));

    Ok(())
}
