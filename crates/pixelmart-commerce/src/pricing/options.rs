//! Selected configuration options and the fixed option tier tables.

use crate::catalog::Product;
use serde::{Deserialize, Deserializer, Serialize};

/// Maximum quantity allowed per line item.
pub const MAX_QUANTITY_PER_ITEM: u32 = 9999;

/// A purchase quantity, always within `1..=MAX_QUANTITY_PER_ITEM`.
///
/// Out-of-range input is clamped when the value is built, so every consumer
/// (pricing, cart, badge count) can rely on `quantity >= 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(into = "u32")]
pub struct Quantity(u32);

impl Quantity {
    pub const ONE: Quantity = Quantity(1);

    /// Clamp any integer into the valid range.
    pub fn new(n: i64) -> Self {
        Self(n.clamp(1, i64::from(MAX_QUANTITY_PER_ITEM)) as u32)
    }

    pub fn get(&self) -> u32 {
        self.0
    }

    /// Add another quantity, capping at the maximum.
    pub fn saturating_add(self, other: Quantity) -> Quantity {
        Quantity::new(i64::from(self.0) + i64::from(other.0))
    }

    pub fn increment(self) -> Quantity {
        Quantity::new(i64::from(self.0) + 1)
    }

    /// One less, never below one.
    pub fn decrement(self) -> Quantity {
        Quantity::new(i64::from(self.0) - 1)
    }
}

impl Default for Quantity {
    fn default() -> Self {
        Quantity::ONE
    }
}

impl From<i64> for Quantity {
    fn from(n: i64) -> Self {
        Quantity::new(n)
    }
}

/// Stored quantities are read leniently: fractions truncate, numeric strings
/// parse, and `null` or anything else non-numeric becomes one.
impl<'de> Deserialize<'de> for Quantity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Int(i64),
            Float(f64),
            Text(String),
            Other(serde::de::IgnoredAny),
        }

        let quantity = match Raw::deserialize(deserializer)? {
            Raw::Int(n) => Quantity::new(n),
            Raw::Float(f) => Quantity::new(f as i64),
            Raw::Text(s) => {
                let s = s.trim();
                s.parse::<i64>()
                    .ok()
                    .or_else(|| s.parse::<f64>().ok().filter(|f| f.is_finite()).map(|f| f as i64))
                    .map_or(Quantity::ONE, Quantity::new)
            }
            Raw::Other(_) => Quantity::ONE,
        };
        Ok(quantity)
    }
}

impl From<Quantity> for u32 {
    fn from(q: Quantity) -> Self {
        q.0
    }
}

/// Options selected for a product, on the detail page or in a cart line.
///
/// Values that are not members of the product's own option sets are kept
/// as given and simply earn no surcharge.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectedOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warranty_id: Option<String>,
    /// Detail page only; never persisted in the cart.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivery_id: Option<String>,
    #[serde(default)]
    pub quantity: Quantity,
}

impl SelectedOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// The detail page's initial selection: first color, included tiers,
    /// standard warranty (when applicable) and standard delivery.
    pub fn defaults_for(product: &Product) -> Self {
        Self {
            color: product.colors.first().cloned(),
            storage: product
                .storage_options()
                .and_then(|t| t.base())
                .map(str::to_string),
            memory: product
                .memory_options()
                .and_then(|t| t.base())
                .map(str::to_string),
            warranty_id: product
                .apple_care
                .then(|| WARRANTY_TIERS[0].id.to_string()),
            delivery_id: Some(DELIVERY_TIERS[0].id.to_string()),
            quantity: Quantity::ONE,
        }
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn with_storage(mut self, storage: impl Into<String>) -> Self {
        self.storage = Some(storage.into());
        self
    }

    pub fn with_memory(mut self, memory: impl Into<String>) -> Self {
        self.memory = Some(memory.into());
        self
    }

    pub fn with_warranty(mut self, warranty_id: impl Into<String>) -> Self {
        self.warranty_id = Some(warranty_id.into());
        self
    }

    pub fn with_delivery(mut self, delivery_id: impl Into<String>) -> Self {
        self.delivery_id = Some(delivery_id.into());
        self
    }

    pub fn with_quantity(mut self, quantity: i64) -> Self {
        self.quantity = Quantity::new(quantity);
        self
    }

    /// Apply a partial update.
    pub fn merge(&mut self, patch: OptionsPatch) {
        if let Some(color) = patch.color {
            self.color = Some(color);
        }
        if let Some(storage) = patch.storage {
            self.storage = Some(storage);
        }
        if let Some(memory) = patch.memory {
            self.memory = Some(memory);
        }
        if let Some(warranty_id) = patch.warranty_id {
            self.warranty_id = Some(warranty_id);
        }
        if let Some(quantity) = patch.quantity {
            self.quantity = quantity;
        }
    }
}

/// A partial change to a cart line's options. `None` leaves a field as is.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OptionsPatch {
    pub color: Option<String>,
    pub storage: Option<String>,
    pub memory: Option<String>,
    pub warranty_id: Option<String>,
    pub quantity: Option<Quantity>,
}

impl OptionsPatch {
    pub fn is_empty(&self) -> bool {
        *self == OptionsPatch::default()
    }
}

/// A warranty / protection plan tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WarrantyTier {
    pub id: &'static str,
    pub name: &'static str,
    /// Flat surcharge in cents.
    pub price_cents: i64,
    /// Coverage length in years.
    pub years: u8,
    pub description: &'static str,
}

/// Known warranty tiers; the first is the included one.
pub const WARRANTY_TIERS: [WarrantyTier; 3] = [
    WarrantyTier {
        id: "standard",
        name: "Standard Warranty",
        price_cents: 0,
        years: 2,
        description: "2-year legal warranty included in the price",
    },
    WarrantyTier {
        id: "applecare",
        name: "AppleCare+",
        price_cents: 9_900,
        years: 3,
        description: "3-year extended coverage including accidental damage",
    },
    WarrantyTier {
        id: "applecare-premium",
        name: "AppleCare+ Premium",
        price_cents: 14_900,
        years: 3,
        description: "AppleCare+ with priority support and 24h replacement",
    },
];

impl WarrantyTier {
    pub fn find(id: &str) -> Option<&'static WarrantyTier> {
        WARRANTY_TIERS.iter().find(|t| t.id == id)
    }
}

/// A delivery speed tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DeliveryTier {
    pub id: &'static str,
    pub name: &'static str,
    /// Flat surcharge in cents.
    pub price_cents: i64,
    /// Delivery time in working days, as shown to the customer.
    pub days: &'static str,
    pub description: &'static str,
}

/// Known delivery tiers; the first is the free one.
pub const DELIVERY_TIERS: [DeliveryTier; 3] = [
    DeliveryTier {
        id: "standard",
        name: "Standard Delivery",
        price_cents: 0,
        days: "2-3",
        description: "Free delivery within 2-3 working days",
    },
    DeliveryTier {
        id: "express",
        name: "Express Delivery",
        price_cents: 499,
        days: "1",
        description: "Delivered the next working day",
    },
    DeliveryTier {
        id: "sameday",
        name: "Same-day Delivery",
        price_cents: 999,
        days: "0",
        description: "Delivered today when ordered before noon",
    },
];

impl DeliveryTier {
    pub fn find(id: &str) -> Option<&'static DeliveryTier> {
        DELIVERY_TIERS.iter().find(|t| t.id == id)
    }
}
