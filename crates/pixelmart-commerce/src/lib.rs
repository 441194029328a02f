//! Storefront domain types and logic for PixelMart.
//!
//! This crate provides the client-side core of the store:
//!
//! - **Catalog**: Products, categories, category-specific specs
//! - **Pricing**: Option tiers and the configuration price engine
//! - **Cart**: Persisted line items, merge-on-add, derived totals
//! - **Search**: Filters, sorting, query-string sync, debounced recompute
//! - **Events**: Notifications shared between independent views
//!
//! # Example
//!
//! ```rust
//! use pixelmart_commerce::prelude::*;
//! use pixelmart_cache::MemoryStore;
//!
//! let catalog = Catalog::from_json(r#"[
//!     { "id": 1, "name": "iPhone 16 Pro", "category": "iPhone", "price": 999,
//!       "specs": { "storageOptions": ["128GB", "256GB", "512GB"] } }
//! ]"#).unwrap();
//!
//! // Price a configuration
//! let options = SelectedOptions::new().with_storage("512GB");
//! let price = price_for(&catalog, ProductId::new(1), &options, PricingMode::Detail);
//! assert_eq!(price.display(), "1.199 \u{20ac}");
//!
//! // Add it to the cart
//! let mut cart = CartStore::open(MemoryStore::new(), EventBus::new());
//! cart.add(ProductId::new(1), options.with_quantity(2)).unwrap();
//! println!("Total: {}", cart.summary(&catalog).subtotal);
//! ```

pub mod error;
pub mod events;
pub mod ids;
pub mod money;

pub mod cart;
pub mod catalog;
pub mod pricing;
pub mod search;

pub use error::CommerceError;
pub use ids::*;
pub use money::{Currency, Money};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::error::CommerceError;
    pub use crate::events::{ChangeOrigin, EventBus, StoreEvent};
    pub use crate::ids::*;
    pub use crate::money::{Currency, Money};

    // Catalog
    pub use crate::catalog::{Catalog, Category, Product, ProductSpecs, SpecValue, TierList};

    // Pricing
    pub use crate::pricing::{
        breakdown, compute_price, price_for, DeliveryTier, OptionsPatch, PriceBreakdown,
        PricingMode, Quantity, SelectedOptions, WarrantyTier,
    };

    // Cart
    pub use crate::cart::{badge_count, CartLineItem, CartStore, CartSummary, LineSummary};

    // Search
    pub use crate::search::{
        FacetOptions, FilterCriteria, FilterEdit, FilterEngine, FilterPhase, PriceRange,
        ResultsBanner, SortOption,
    };
}
