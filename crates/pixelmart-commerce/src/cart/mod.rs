//! Shopping cart module.
//!
//! Contains the persisted line items, the store that owns them, and the
//! derived totals.

mod line_item;
mod store;
mod summary;

pub use line_item::{badge_count, parse_lines, CartLineItem, LineKey};
pub use store::{CartStore, DEFAULT_CART_KEY};
pub use summary::{CartSummary, LineSummary};
