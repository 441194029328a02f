//! Product catalog module.
//!
//! The catalog is loaded once from a static JSON document and is read-only
//! afterwards. Everything else in the crate borrows products from it.

mod category;
mod product;
mod specs;

pub use category::Category;
pub use product::{ColorImages, Product, ProductRecord};
pub use specs::{
    AccessorySpecs, AudioSpecs, MacSpecs, PhoneSpecs, ProductSpecs, SpecValue, TabletSpecs,
    TierList, TierSpecs, WatchSpecs,
};

use crate::error::CommerceError;
use crate::ids::ProductId;
use crate::money::Money;
use serde::Deserialize;

/// Catalog document shape: a bare array or `{ "products": [...] }`.
#[derive(Deserialize)]
#[serde(untagged)]
enum CatalogDocument {
    List(Vec<serde_json::Value>),
    Wrapped { products: Vec<serde_json::Value> },
}

/// The static product catalog.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    /// Build a catalog from already-parsed products.
    pub fn new(products: Vec<Product>) -> Self {
        Self { products }
    }

    /// Parse a catalog document.
    ///
    /// Records that cannot be interpreted (unknown category, negative price,
    /// malformed fields) are skipped with a warning; only a document that is
    /// not a product list at all is an error.
    pub fn from_json(json: &str) -> Result<Self, CommerceError> {
        let records = match serde_json::from_str::<CatalogDocument>(json)? {
            CatalogDocument::List(records) => records,
            CatalogDocument::Wrapped { products } => products,
        };

        let mut products = Vec::with_capacity(records.len());
        for value in records {
            let parsed = serde_json::from_value::<ProductRecord>(value)
                .map_err(CommerceError::from)
                .and_then(Product::try_from);
            match parsed {
                Ok(product) => products.push(product),
                Err(e) => tracing::warn!(error = %e, "skipping catalog record"),
            }
        }

        tracing::debug!(count = products.len(), "catalog loaded");
        Ok(Self { products })
    }

    /// All products in catalog order.
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn iter(&self) -> impl Iterator<Item = &Product> {
        self.products.iter()
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Look up a product by id.
    pub fn get(&self, id: ProductId) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    /// Look up a product by id, failing with `ProductNotFound`.
    pub fn find(&self, id: ProductId) -> Result<&Product, CommerceError> {
        self.get(id).ok_or(CommerceError::ProductNotFound(id))
    }

    /// Lowest and highest price among priced products.
    ///
    /// These are the defaults of the price-range filter.
    pub fn price_bounds(&self) -> Option<(Money, Money)> {
        let mut priced = self.products.iter().filter(|p| p.price.is_positive());
        let first = priced.next()?.price;
        Some(priced.fold((first, first), |(min, max), p| {
            (
                if p.price.amount_cents < min.amount_cents { p.price } else { min },
                if p.price.amount_cents > max.amount_cents { p.price } else { max },
            )
        }))
    }
}
