//! CLI command implementations.

pub mod cart;
pub mod config;
pub mod facets;
pub mod product;
pub mod products;
pub mod suggest;

use clap::{Args, Subcommand};

/// Arguments for the products command.
#[derive(Args)]
pub struct ProductsArgs {
    /// Listing query string (e.g. "cat=Mac&sort=price-asc").
    #[arg(short, long, default_value = "")]
    pub query: String,

    /// Print only the number of matching products.
    #[arg(long)]
    pub count: bool,
}

/// Product configuration flags shared by `product` and `cart add`.
#[derive(Args, Clone, Default)]
pub struct OptionArgs {
    /// Color name.
    #[arg(long)]
    pub color: Option<String>,

    /// Storage tier label (e.g. 256GB).
    #[arg(long)]
    pub storage: Option<String>,

    /// Memory tier label (e.g. 24GB).
    #[arg(long)]
    pub memory: Option<String>,

    /// Warranty tier id (standard, applecare, applecare-premium).
    #[arg(long)]
    pub warranty: Option<String>,

    /// Number of units.
    #[arg(long, allow_negative_numbers = true)]
    pub quantity: Option<i64>,
}

/// Arguments for the product command.
#[derive(Args)]
pub struct ProductArgs {
    /// Product id.
    pub id: u64,

    #[command(flatten)]
    pub options: OptionArgs,

    /// Delivery tier id (standard, express, sameday).
    #[arg(long)]
    pub delivery: Option<String>,
}

/// Arguments for the facets command.
#[derive(Args)]
pub struct FacetsArgs {}

/// Arguments for the suggest command.
#[derive(Args)]
pub struct SuggestArgs {
    /// Search text; empty lists the first catalog names.
    #[arg(default_value = "")]
    pub text: String,
}

/// Arguments for the cart command.
#[derive(Args)]
pub struct CartArgs {
    #[command(subcommand)]
    pub command: Option<CartCommand>,
}

#[derive(Subcommand)]
pub enum CartCommand {
    /// List cart lines with prices.
    List,
    /// Add a configured product.
    Add {
        /// Product id.
        id: u64,

        #[command(flatten)]
        options: OptionArgs,
    },
    /// Change the options of a line.
    Update {
        /// Line position, starting at 1.
        line: usize,

        #[command(flatten)]
        options: OptionArgs,
    },
    /// Change the quantity of a line.
    Quantity {
        /// Line position, starting at 1.
        line: usize,

        /// New quantity, or +/- to step by one.
        value: String,
    },
    /// Remove a line.
    Remove {
        /// Line position, starting at 1.
        line: usize,

        /// Skip confirmation.
        #[arg(short, long)]
        yes: bool,
    },
    /// Remove every line.
    Clear {
        /// Skip confirmation.
        #[arg(short, long)]
        yes: bool,
    },
}

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration.
    Show,
    /// Initialize a new config file.
    Init {
        /// Force overwrite existing config.
        #[arg(short, long)]
        force: bool,
    },
}
