//! Product types.

use crate::catalog::{Category, ProductSpecs, TierList};
use crate::error::CommerceError;
use crate::ids::ProductId;
use crate::money::{Currency, Money};
use serde::{Deserialize, Serialize};

/// Images for one color of a product.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ColorImages {
    /// Color name, matching an entry of `Product::colors`.
    pub color: String,
    /// Ordered image references.
    #[serde(default)]
    pub images: Vec<String>,
}

/// A product in the catalog.
///
/// Products are immutable once loaded. The wire form is the catalog's
/// camelCase record (see [`ProductRecord`]).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(try_from = "ProductRecord", into = "ProductRecord")]
pub struct Product {
    /// Unique product identifier.
    pub id: ProductId,
    /// Product name.
    pub name: String,
    /// Short description for listings and search.
    pub short_description: String,
    /// Product category.
    pub category: Category,
    /// Base price.
    pub price: Money,
    /// Available colors, in display order.
    pub colors: Vec<String>,
    /// Category-specific specs.
    pub specs: ProductSpecs,
    /// Whether warranty tiers apply.
    pub apple_care: bool,
    /// Images per color; the first entry is the fallback.
    pub images: Vec<ColorImages>,
}

impl Product {
    /// Whether the product can appear in listings (named and priced).
    pub fn is_listable(&self) -> bool {
        !self.name.is_empty() && self.price.is_positive()
    }

    pub fn storage_options(&self) -> Option<&TierList> {
        self.specs.storage_options()
    }

    pub fn memory_options(&self) -> Option<&TierList> {
        self.specs.memory()
    }

    pub fn release_year(&self) -> Option<i32> {
        self.specs.release_year()
    }

    pub fn has_color(&self, color: &str) -> bool {
        self.colors.iter().any(|c| c == color)
    }

    /// Images for a color, falling back to the first image set.
    pub fn images_for(&self, color: Option<&str>) -> &[String] {
        color
            .and_then(|c| self.images.iter().find(|set| set.color == c))
            .or_else(|| self.images.first())
            .map(|set| set.images.as_slice())
            .unwrap_or(&[])
    }

    /// First image for a color, used as a thumbnail.
    pub fn thumbnail(&self, color: Option<&str>) -> Option<&str> {
        self.images_for(color).first().map(String::as_str)
    }
}

/// A product record exactly as it appears in the catalog document.
///
/// Presentation-only keys (text colors, CSS classes) are ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRecord {
    pub id: u64,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short_description: Option<String>,
    pub category: String,
    #[serde(default)]
    pub price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(default)]
    pub colors: Vec<String>,
    #[serde(default)]
    pub specs: serde_json::Map<String, serde_json::Value>,
    #[serde(default)]
    pub apple_care: bool,
    #[serde(default)]
    pub images_for_any_color: Vec<ColorImages>,
}

impl TryFrom<ProductRecord> for Product {
    type Error = CommerceError;

    fn try_from(record: ProductRecord) -> Result<Self, Self::Error> {
        let invalid = |reason: String| CommerceError::InvalidProduct {
            id: record.id,
            reason,
        };

        let category = Category::from_str(&record.category)
            .ok_or_else(|| invalid(format!("unknown category '{}'", record.category)))?;

        let currency = match record.currency.as_deref() {
            None => Currency::default(),
            Some(code) => Currency::from_code(code)
                .ok_or_else(|| invalid(format!("unknown currency '{code}'")))?,
        };

        if !record.price.is_finite() || record.price < 0.0 {
            return Err(invalid(format!("invalid price {}", record.price)));
        }

        let specs = ProductSpecs::from_parts(category, record.specs.clone())
            .map_err(|e| invalid(format!("invalid specs: {e}")))?;

        Ok(Product {
            id: ProductId::new(record.id),
            name: record.name,
            short_description: record.short_description.unwrap_or_default(),
            category,
            price: Money::from_decimal(record.price, currency),
            colors: record.colors,
            specs,
            apple_care: record.apple_care,
            images: record.images_for_any_color,
        })
    }
}

impl From<Product> for ProductRecord {
    fn from(product: Product) -> Self {
        let specs = match serde_json::to_value(&product.specs) {
            Ok(serde_json::Value::Object(map)) => map,
            _ => serde_json::Map::new(),
        };
        ProductRecord {
            id: product.id.get(),
            name: product.name,
            short_description: Some(product.short_description).filter(|s| !s.is_empty()),
            category: product.category.as_str().to_string(),
            price: product.price.to_decimal(),
            currency: Some(product.price.currency.code().to_string()),
            colors: product.colors,
            specs,
            apple_care: product.apple_care,
            images_for_any_color: product.images,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: serde_json::Value) -> Result<Product, CommerceError> {
        let record: ProductRecord = serde_json::from_value(value).unwrap();
        Product::try_from(record)
    }

    #[test]
    fn test_product_from_record() {
        let product = record(json!({
            "id": 1,
            "name": "iPhone 16",
            "shortDescription": "Built for Apple Intelligence.",
            "category": "iPhone",
            "price": 979,
            "currency": "EUR",
            "colors": ["Black", "Teal"],
            "appleCare": true,
            "specs": { "storageOptions": ["128GB", "256GB"], "releaseYear": 2024 },
            "imagesForAnyColor": [
                { "color": "Black", "images": ["black-1.png", "black-2.png"] },
                { "color": "Teal", "images": ["teal-1.png"] }
            ],
            "textColor": "text-dark"
        }))
        .unwrap();

        assert_eq!(product.id, ProductId::new(1));
        assert_eq!(product.category, Category::IPhone);
        assert_eq!(product.price, Money::from_units(979, Currency::EUR));
        assert_eq!(product.release_year(), Some(2024));
        assert!(product.is_listable());
        assert!(product.has_color("Teal"));
    }

    #[test]
    fn test_images_fall_back_to_first_color() {
        let product = record(json!({
            "id": 2,
            "name": "AirPods 4",
            "category": "AirPods",
            "price": 149,
            "imagesForAnyColor": [{ "color": "White", "images": ["white.png"] }]
        }))
        .unwrap();

        assert_eq!(product.thumbnail(Some("White")), Some("white.png"));
        assert_eq!(product.thumbnail(Some("Pink")), Some("white.png"));
        assert_eq!(product.thumbnail(None), Some("white.png"));
    }

    #[test]
    fn test_unknown_category_is_rejected() {
        let err = record(json!({ "id": 3, "name": "Vision", "category": "Vision", "price": 1 }))
            .unwrap_err();
        assert!(matches!(err, CommerceError::InvalidProduct { id: 3, .. }));
    }

    #[test]
    fn test_missing_price_is_not_listable() {
        let product = record(json!({ "id": 4, "name": "Case", "category": "Accessories" })).unwrap();
        assert!(!product.is_listable());
    }

    #[test]
    fn test_product_serializes_as_record() {
        let product = record(json!({
            "id": 5,
            "name": "Mac mini",
            "category": "Mac",
            "price": 719.5,
            "currency": "USD",
            "specs": { "memory": ["16GB", "24GB"] }
        }))
        .unwrap();

        let value = serde_json::to_value(&product).unwrap();
        assert_eq!(value["category"], "Mac");
        assert_eq!(value["price"], 719.5);
        assert_eq!(value["specs"]["memory"], json!(["16GB", "24GB"]));

        let back: Product = serde_json::from_value(value).unwrap();
        assert_eq!(back, product);
    }
}
