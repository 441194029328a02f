//! Cart commands.

use anyhow::{bail, Context as _, Result};
use dialoguer::Confirm;
use pixelmart_cache::FileStore;
use pixelmart_commerce::cart::{CartStore, CartSummary};
use pixelmart_commerce::catalog::Catalog;
use pixelmart_commerce::events::{EventBus, StoreEvent};
use pixelmart_commerce::ids::ProductId;
use pixelmart_commerce::pricing::{OptionsPatch, Quantity};
use serde_json::json;

use super::product::selected_options;
use super::{CartArgs, CartCommand, OptionArgs};
use crate::context::Context;
use crate::output;

/// Run the cart command.
pub fn run(args: CartArgs, ctx: &Context) -> Result<()> {
    let catalog = ctx.catalog()?;

    let bus = EventBus::new();
    bus.subscribe(|event| {
        if let StoreEvent::CartChanged { origin, item_count } = event {
            tracing::debug!(?origin, item_count, "cart changed");
        }
    });
    let mut cart = ctx.cart(bus)?;

    match args.command.unwrap_or(CartCommand::List) {
        CartCommand::List => list(&cart, &catalog, ctx),
        CartCommand::Add { id, options } => add(&mut cart, &catalog, id, &options, ctx),
        CartCommand::Update { line, options } => update(&mut cart, line, options, ctx),
        CartCommand::Quantity { line, value } => quantity(&mut cart, line, &value, ctx),
        CartCommand::Remove { line, yes } => remove(&mut cart, &catalog, line, yes, ctx),
        CartCommand::Clear { yes } => clear(&mut cart, yes, ctx),
    }
}

fn list(cart: &CartStore<FileStore>, catalog: &Catalog, ctx: &Context) -> Result<()> {
    let summary = cart.summary(catalog);

    if ctx.output.is_json() {
        ctx.output.json(&summary);
        return Ok(());
    }

    ctx.output.header("Cart");
    if summary.is_empty() {
        ctx.output.info("Your cart is empty.");
        return Ok(());
    }

    print_summary(&summary, ctx);
    Ok(())
}

fn print_summary(summary: &CartSummary, ctx: &Context) {
    let widths = [3, 28, 28, 5, 10];
    ctx.output
        .table_row(&["#", "PRODUCT", "OPTIONS", "QTY", "TOTAL"], &widths);

    for line in &summary.lines {
        let position = (line.index + 1).to_string();
        let options: Vec<&str> = [
            line.options.color.as_deref(),
            line.options.storage.as_deref(),
            line.options.memory.as_deref(),
            line.options.warranty_id.as_deref(),
        ]
        .into_iter()
        .flatten()
        .collect();
        let options = options.join(" / ");
        let quantity = line.quantity.get().to_string();

        if line.available {
            let name = line.name.as_deref().unwrap_or_default();
            let total = output::price(&line.total.display());
            ctx.output
                .table_row(&[&position, name, &options, &quantity, &total], &widths);
        } else {
            let name = output::unavailable(&format!("Product {}", line.id));
            ctx.output
                .table_row(&[&position, &name, &options, &quantity, "n/a"], &widths);
        }
    }

    let unavailable = summary.unavailable().count();
    if unavailable > 0 {
        ctx.output.warn(&format!(
            "{} line(s) refer to products no longer in the catalog",
            unavailable
        ));
    }

    ctx.output.kv("items", &summary.item_count.to_string());
    ctx.output
        .kv("subtotal", &output::price(&summary.subtotal.display()));
}

fn add(
    cart: &mut CartStore<FileStore>,
    catalog: &Catalog,
    id: u64,
    args: &OptionArgs,
    ctx: &Context,
) -> Result<()> {
    let product = catalog.find(ProductId::new(id))?;
    let options = selected_options(product, args, &ctx.output);
    let index = cart.add(product.id, options)?;

    if ctx.output.is_json() {
        ctx.output.json(&json!({
            "line": index + 1,
            "item": cart.get(index),
            "itemCount": cart.item_count(),
        }));
        return Ok(());
    }

    ctx.output.success(&format!(
        "Added {} (line {}, {} item(s) in cart)",
        product.name,
        index + 1,
        cart.item_count()
    ));
    Ok(())
}

fn update(
    cart: &mut CartStore<FileStore>,
    line: usize,
    args: OptionArgs,
    ctx: &Context,
) -> Result<()> {
    let index = line_index(cart, line)?;
    let patch = OptionsPatch {
        color: args.color,
        storage: args.storage,
        memory: args.memory,
        warranty_id: args.warranty,
        quantity: args.quantity.map(Quantity::new),
    };
    if patch.is_empty() {
        bail!("Nothing to update. Pass at least one option flag.");
    }

    cart.update(index, patch)?;

    if ctx.output.is_json() {
        ctx.output.json(&json!({ "line": line, "item": cart.get(index) }));
        return Ok(());
    }

    ctx.output.success(&format!("Updated line {}", line));
    Ok(())
}

fn quantity(cart: &mut CartStore<FileStore>, line: usize, value: &str, ctx: &Context) -> Result<()> {
    let index = line_index(cart, line)?;
    let quantity = match value {
        "+" => cart.increment(index)?,
        "-" => cart.decrement(index)?,
        n => {
            let n: i64 = n
                .parse()
                .with_context(|| format!("Invalid quantity: {}", n))?;
            let quantity = Quantity::new(n);
            cart.set_quantity(index, quantity)?;
            quantity
        }
    };

    if ctx.output.is_json() {
        ctx.output.json(&json!({
            "line": line,
            "quantity": quantity,
            "itemCount": cart.item_count(),
        }));
        return Ok(());
    }

    ctx.output
        .success(&format!("Line {} quantity is now {}", line, quantity.get()));
    Ok(())
}

fn remove(
    cart: &mut CartStore<FileStore>,
    catalog: &Catalog,
    line: usize,
    yes: bool,
    ctx: &Context,
) -> Result<()> {
    let index = line_index(cart, line)?;
    let name = cart
        .get(index)
        .and_then(|item| catalog.get(item.id))
        .map_or_else(|| format!("line {}", line), |p| p.name.clone());

    if !yes {
        let confirmed = Confirm::new()
            .with_prompt(format!("Remove {} from the cart?", name))
            .default(false)
            .interact()?;

        if !confirmed {
            ctx.output.warn("Nothing removed");
            return Ok(());
        }
    }

    let removed = cart.remove(index)?;

    if ctx.output.is_json() {
        ctx.output.json(&json!({ "removed": removed, "itemCount": cart.item_count() }));
        return Ok(());
    }

    ctx.output.success(&format!("Removed {}", name));
    Ok(())
}

fn clear(cart: &mut CartStore<FileStore>, yes: bool, ctx: &Context) -> Result<()> {
    if cart.is_empty() {
        ctx.output.info("Your cart is already empty.");
        return Ok(());
    }

    if !yes {
        let confirmed = Confirm::new()
            .with_prompt(format!("Remove all {} line(s) from the cart?", cart.len()))
            .default(false)
            .interact()?;

        if !confirmed {
            ctx.output.warn("Cart left unchanged");
            return Ok(());
        }
    }

    cart.clear()?;
    ctx.output.success("Cart cleared");
    Ok(())
}

/// Convert a 1-based line position into an index.
fn line_index(cart: &CartStore<FileStore>, line: usize) -> Result<usize> {
    if line == 0 || line > cart.len() {
        bail!("No line {} in the cart ({} line(s))", line, cart.len());
    }
    Ok(line - 1)
}
