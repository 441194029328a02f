//! Pricing engine: option tiers and configuration prices.

pub mod engine;
pub mod options;

pub use engine::{
    breakdown, compute_price, memory_tier_prices, parse_leading_int, price_for,
    storage_tier_prices, PriceBreakdown, PricingMode,
};
pub use options::{
    DeliveryTier, OptionsPatch, Quantity, SelectedOptions, WarrantyTier, DELIVERY_TIERS,
    MAX_QUANTITY_PER_ITEM, WARRANTY_TIERS,
};
