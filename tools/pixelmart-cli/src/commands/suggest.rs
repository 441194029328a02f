//! Search suggestion command.

use anyhow::Result;
use pixelmart_commerce::search::{search_link, suggestions};
use serde_json::json;

use super::SuggestArgs;
use crate::context::Context;

/// Run the suggest command.
pub fn run(args: SuggestArgs, ctx: &Context) -> Result<()> {
    let catalog = ctx.catalog()?;
    let names = suggestions(&catalog, &args.text);

    if ctx.output.is_json() {
        let entries: Vec<_> = names
            .iter()
            .map(|name| json!({ "name": name, "link": search_link(name) }))
            .collect();
        ctx.output.json(&entries);
        return Ok(());
    }

    if names.is_empty() {
        ctx.output.info(&format!("No products match \"{}\"", args.text));
        return Ok(());
    }

    for name in names {
        ctx.output.list_item(name);
        if ctx.output.is_verbose() {
            ctx.output.kv("link", &search_link(name));
        }
    }

    Ok(())
}
