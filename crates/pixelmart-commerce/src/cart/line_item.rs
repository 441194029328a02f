//! Persisted cart lines.

use crate::ids::ProductId;
use crate::pricing::{Quantity, SelectedOptions};
use serde::{Deserialize, Serialize};

/// One cart entry: a product and the configuration it was added with.
///
/// The wire form is `{"id": 3, "options": {...}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLineItem {
    pub id: ProductId,
    #[serde(default)]
    pub options: SelectedOptions,
}

impl CartLineItem {
    /// Create a line. Delivery is a detail-page choice and is dropped.
    pub fn new(id: ProductId, mut options: SelectedOptions) -> Self {
        options.delivery_id = None;
        Self { id, options }
    }

    pub fn quantity(&self) -> Quantity {
        self.options.quantity
    }

    /// The identity used to merge repeated adds of the same configuration.
    pub fn key(&self) -> LineKey<'_> {
        LineKey {
            id: self.id,
            color: self.options.color.as_deref(),
            storage: self.options.storage.as_deref(),
            memory: self.options.memory.as_deref(),
            warranty_id: self.options.warranty_id.as_deref(),
        }
    }
}

/// Line identity: product plus every option except quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LineKey<'a> {
    pub id: ProductId,
    pub color: Option<&'a str>,
    pub storage: Option<&'a str>,
    pub memory: Option<&'a str>,
    pub warranty_id: Option<&'a str>,
}

/// Parse persisted cart text leniently.
///
/// Missing, malformed or non-array text yields an empty cart. Entries that
/// cannot be read are skipped so one bad line does not empty the cart.
pub fn parse_lines(raw: Option<&str>) -> Vec<CartLineItem> {
    let Some(raw) = raw else {
        return Vec::new();
    };
    let values: Vec<serde_json::Value> = match serde_json::from_str(raw) {
        Ok(values) => values,
        Err(e) => {
            tracing::warn!(error = %e, "ignoring unreadable cart data");
            return Vec::new();
        }
    };
    values
        .into_iter()
        .filter_map(|value| match serde_json::from_value::<CartLineItem>(value) {
            Ok(line) => Some(CartLineItem::new(line.id, line.options)),
            Err(e) => {
                tracing::warn!(error = %e, "skipping unreadable cart line");
                None
            }
        })
        .collect()
}

/// Sum of quantities, as shown on the cart badge.
pub fn total_quantity(lines: &[CartLineItem]) -> u32 {
    lines
        .iter()
        .fold(0u32, |acc, line| acc.saturating_add(line.quantity().get()))
}

/// Badge count straight from persisted text, without a store.
pub fn badge_count(raw: Option<&str>) -> u32 {
    total_quantity(&parse_lines(raw))
}
