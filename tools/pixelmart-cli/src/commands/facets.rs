//! Filter options command.

use anyhow::Result;
use pixelmart_commerce::search::{category_link, FacetOptions, SortOption};

use super::FacetsArgs;
use crate::context::Context;

/// Run the facets command.
pub fn run(_args: FacetsArgs, ctx: &Context) -> Result<()> {
    let catalog = ctx.catalog()?;
    let facets = FacetOptions::from_catalog(&catalog);

    if ctx.output.is_json() {
        ctx.output.json(&facets);
        return Ok(());
    }

    ctx.output.header("Categories");
    for category in &facets.categories {
        ctx.output
            .list_item(&format!("{:12} {}", category.as_str(), category_link(*category)));
    }

    ctx.output.header("Release years");
    let years: Vec<String> = facets.years.iter().map(ToString::to_string).collect();
    ctx.output.list_item(&years.join(", "));

    ctx.output.header("Colors");
    ctx.output.list_item(&facets.colors.join(", "));

    ctx.output.header("Price");
    ctx.output.kv("min", &facets.price.min().display());
    ctx.output.kv("max", &facets.price.max().display());

    ctx.output.header("Sort");
    for sort in SortOption::ALL {
        ctx.output
            .list_item(&format!("{:12} {}", sort.as_str(), sort.display_name()));
    }

    Ok(())
}
