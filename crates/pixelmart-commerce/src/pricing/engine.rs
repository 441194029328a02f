//! Price computation for a product and its selected options.
//!
//! All arithmetic is done in integer cents; the total is rounded up to a
//! whole currency unit exactly once, after the quantity multiplication.

use super::options::{DeliveryTier, Quantity, SelectedOptions, WarrantyTier};
use crate::catalog::{Catalog, Product, TierList};
use crate::ids::ProductId;
use crate::money::{Currency, Money};
use serde::Serialize;

/// Largest surcharge for a single storage step, in cents (360 units).
pub const MAX_STORAGE_STEP_CENTS: i64 = 36_000;

/// Cost of the first memory step, in cents (160 units).
pub const MEMORY_STEP_CENTS: i64 = 16_000;

/// Memory label gap covered by one step (e.g. 8GB -> 24GB is one step).
pub const MEMORY_STEP_SIZE: i64 = 16;

/// Per-step memory discount, in basis points.
const MEMORY_DECAY_BP: i64 = 1_200;

/// Maximum memory discount, in basis points.
const MEMORY_MAX_DISCOUNT_BP: i64 = 5_000;

/// Where a price is shown. The detail page includes the delivery tier;
/// the cart does not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PricingMode {
    #[default]
    Detail,
    Cart,
}

/// Itemized price for one configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PriceBreakdown {
    pub base: Money,
    pub storage: Money,
    pub memory: Money,
    pub warranty: Money,
    pub delivery: Money,
    pub quantity: Quantity,
    /// Unrounded total for all units.
    pub subtotal: Money,
    /// Final price, rounded up to a whole unit.
    pub total: Money,
}

impl PriceBreakdown {
    /// Price of one unit before rounding.
    pub fn unit_price(&self) -> Money {
        self.base + self.storage + self.memory + self.warranty + self.delivery
    }

    fn empty(currency: Currency) -> Self {
        let zero = Money::zero(currency);
        Self {
            base: zero,
            storage: zero,
            memory: zero,
            warranty: zero,
            delivery: zero,
            quantity: Quantity::ONE,
            subtotal: zero,
            total: zero,
        }
    }
}

/// Compute the final price of a configuration.
///
/// A missing product prices to zero. Unknown option values add nothing.
pub fn compute_price(
    product: Option<&Product>,
    options: &SelectedOptions,
    mode: PricingMode,
) -> Money {
    match product {
        Some(product) => breakdown(product, options, mode).total,
        None => Money::zero(Currency::default()),
    }
}

/// Look a product up and price it.
pub fn price_for(
    catalog: &Catalog,
    id: ProductId,
    options: &SelectedOptions,
    mode: PricingMode,
) -> Money {
    compute_price(catalog.get(id), options, mode)
}

/// Compute the itemized price of a configuration.
pub fn breakdown(product: &Product, options: &SelectedOptions, mode: PricingMode) -> PriceBreakdown {
    let currency = product.price.currency;
    let mut result = PriceBreakdown::empty(currency);

    result.base = product.price;
    result.storage = storage_surcharge(product, options.storage.as_deref());
    result.memory = memory_surcharge(product, options.memory.as_deref());
    result.warranty = warranty_surcharge(product, options.warranty_id.as_deref());
    if mode == PricingMode::Detail {
        result.delivery = delivery_surcharge(options.delivery_id.as_deref(), currency);
    }

    result.quantity = options.quantity;
    result.subtotal = result.unit_price() * i64::from(options.quantity.get());
    result.total = result.subtotal.ceil_to_unit();
    result
}

/// Surcharge for one storage step: a tenth of the base price rounded up to
/// a whole unit, capped at 360 units.
pub fn storage_step(price: Money) -> Money {
    let tenth_units = (price.amount_cents.max(0) + 999) / 1_000;
    let cents = tenth_units.saturating_mul(100).min(MAX_STORAGE_STEP_CENTS);
    Money::new(cents, price.currency)
}

/// Storage surcharge for a selected label. Labels outside the product's
/// storage options, and the base tier, cost nothing.
pub fn storage_surcharge(product: &Product, storage: Option<&str>) -> Money {
    let zero = Money::zero(product.price.currency);
    let (Some(tiers), Some(storage)) = (product.storage_options(), storage) else {
        return zero;
    };
    match tiers.position(storage) {
        Some(idx) if idx > 0 => storage_step(product.price) * idx as i64,
        _ => zero,
    }
}

/// Cost of the memory step at `index`, decaying 12% per step down to half
/// price.
pub fn memory_step_cost(index: i64) -> i64 {
    let discount_bp = index
        .saturating_mul(MEMORY_DECAY_BP)
        .min(MEMORY_MAX_DISCOUNT_BP);
    MEMORY_STEP_CENTS * (10_000 - discount_bp) / 10_000
}

/// Total cost of `steps` memory steps.
pub fn memory_steps_cost(steps: i64) -> i64 {
    // Steps past the cap all cost the same, so only the first few vary.
    let decaying = MEMORY_MAX_DISCOUNT_BP / MEMORY_DECAY_BP + 1;
    let head: i64 = (0..steps.min(decaying)).map(memory_step_cost).sum();
    let tail = (steps - decaying).max(0);
    head.saturating_add(tail.saturating_mul(memory_step_cost(decaying)))
}

/// Memory surcharge for a selected label.
///
/// Labels outside the product's memory options, and the base tier, cost
/// nothing. Both the base and the selected label must start with an integer
/// ("16GB" -> 16); otherwise the surcharge is skipped.
pub fn memory_surcharge(product: &Product, memory: Option<&str>) -> Money {
    let currency = product.price.currency;
    let (Some(tiers), Some(memory)) = (product.memory_options(), memory) else {
        return Money::zero(currency);
    };
    Money::new(memory_cents(tiers, memory), currency)
}

fn memory_cents(tiers: &TierList, selected: &str) -> i64 {
    // Only offered tiers past the base one carry a surcharge.
    let (Some(base), Some(idx)) = (tiers.base(), tiers.position(selected)) else {
        return 0;
    };
    if idx == 0 {
        return 0;
    }
    let (Some(base), Some(selected)) = (parse_leading_int(base), parse_leading_int(selected)) else {
        tracing::debug!(base, selected, "skipping non-numeric memory tier");
        return 0;
    };
    let diff = selected.saturating_sub(base);
    if diff <= 0 {
        return 0;
    }
    let steps = diff / MEMORY_STEP_SIZE + i64::from(diff % MEMORY_STEP_SIZE != 0);
    memory_steps_cost(steps)
}

/// Warranty surcharge. Only products with `apple_care` have warranty tiers.
pub fn warranty_surcharge(product: &Product, warranty_id: Option<&str>) -> Money {
    let cents = warranty_id
        .filter(|_| product.apple_care)
        .and_then(WarrantyTier::find)
        .map_or(0, |tier| tier.price_cents);
    Money::new(cents, product.price.currency)
}

/// Delivery surcharge for a tier id.
pub fn delivery_surcharge(delivery_id: Option<&str>, currency: Currency) -> Money {
    let cents = delivery_id
        .and_then(DeliveryTier::find)
        .map_or(0, |tier| tier.price_cents);
    Money::new(cents, currency)
}

/// Surcharge shown next to each storage option.
pub fn storage_tier_prices(product: &Product) -> Vec<(String, Money)> {
    product
        .storage_options()
        .map(|tiers| {
            tiers
                .iter()
                .map(|label| (label.to_string(), storage_surcharge(product, Some(label))))
                .collect()
        })
        .unwrap_or_default()
}

/// Surcharge shown next to each memory option.
pub fn memory_tier_prices(product: &Product) -> Vec<(String, Money)> {
    product
        .memory_options()
        .map(|tiers| {
            tiers
                .iter()
                .map(|label| (label.to_string(), memory_surcharge(product, Some(label))))
                .collect()
        })
        .unwrap_or_default()
}

/// Parse the integer prefix of a label: optional leading whitespace, an
/// optional sign, then digits. Anything after the digits is ignored.
pub fn parse_leading_int(label: &str) -> Option<i64> {
    let s = label.trim_start();
    let (negative, rest) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let end = rest
        .bytes()
        .position(|b| !b.is_ascii_digit())
        .unwrap_or(rest.len());
    if end == 0 {
        return None;
    }
    let value: i64 = rest[..end].parse().ok()?;
    Some(if negative { -value } else { value })
}
