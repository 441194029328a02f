//! PixelMart CLI - Command line front end for the storefront core.
//!
//! Commands:
//! - `pixelmart products` - List products matching a query string
//! - `pixelmart product` - Show one product with its price breakdown
//! - `pixelmart facets` - Show the available filter values
//! - `pixelmart suggest` - Suggest product names for a search
//! - `pixelmart cart` - Inspect and edit the persisted cart
//! - `pixelmart config` - Manage configuration

mod commands;
mod config;
mod context;
mod logging;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{CartArgs, ConfigArgs, FacetsArgs, ProductArgs, ProductsArgs, SuggestArgs};

/// PixelMart CLI - Browse the catalog, price configurations and manage the cart
#[derive(Parser)]
#[command(name = "pixelmart")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Use JSON output format
    #[arg(long, global = true)]
    json: bool,

    /// Config file path
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List products matching a filter query
    Products(ProductsArgs),

    /// Show a product and price a configuration
    Product(ProductArgs),

    /// Show filter options and price bounds
    Facets(FacetsArgs),

    /// Suggest product names for a search
    Suggest(SuggestArgs),

    /// Inspect and edit the cart
    Cart(CartArgs),

    /// Manage configuration
    Config(ConfigArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup output formatting
    let output = output::Output::new(cli.verbose, cli.json);

    // Load config
    let config_path = cli.config.as_deref();
    let ctx = match context::Context::load(config_path, output.clone()) {
        Ok(ctx) => ctx,
        Err(e) => {
            output.error(&format!("{:#}", e));
            std::process::exit(1);
        }
    };

    logging::init(&ctx.config.logging, cli.verbose);
    tracing::debug!(config = ?ctx.config_path, "configuration loaded");

    // Execute command
    let result = match cli.command {
        Commands::Products(args) => commands::products::run(args, &ctx),
        Commands::Product(args) => commands::product::run(args, &ctx),
        Commands::Facets(args) => commands::facets::run(args, &ctx),
        Commands::Suggest(args) => commands::suggest::run(args, &ctx),
        Commands::Cart(args) => commands::cart::run(args, &ctx),
        Commands::Config(args) => commands::config::run(args, &ctx),
    };

    if let Err(e) = result {
        ctx.output.error(&format!("{:#}", e));
        std::process::exit(1);
    }

    Ok(())
}
