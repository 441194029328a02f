//! Filter panel options, search suggestions and the results banner.

use crate::catalog::{Catalog, Category};
use crate::search::{count_matches, FilterCriteria, PriceRange};
use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;

/// Names shown when the search box is empty.
pub const DEFAULT_SUGGESTIONS: usize = 6;

/// The values each filter control offers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FacetOptions {
    /// Categories present in the catalog, in first-seen order.
    pub categories: Vec<Category>,
    /// Release years, newest first.
    pub years: Vec<i32>,
    /// Colors, in first-seen order.
    pub colors: Vec<String>,
    pub price: PriceRange,
}

impl FacetOptions {
    pub fn from_catalog(catalog: &Catalog) -> Self {
        let mut categories = Vec::new();
        let mut colors: Vec<String> = Vec::new();
        let mut years = BTreeSet::new();

        for product in catalog.iter() {
            if !categories.contains(&product.category) {
                categories.push(product.category);
            }
            for color in &product.colors {
                if !colors.contains(color) {
                    colors.push(color.clone());
                }
            }
            if let Some(year) = product.release_year() {
                years.insert(year);
            }
        }

        Self {
            categories,
            years: years.into_iter().rev().collect(),
            colors,
            price: PriceRange::for_catalog(catalog),
        }
    }
}

/// Product names for the search box.
///
/// With text, every name containing it (case-insensitive); without, the
/// first few names of the catalog.
pub fn suggestions<'a>(catalog: &'a Catalog, text: &str) -> Vec<&'a str> {
    let names = catalog
        .iter()
        .map(|p| p.name.as_str())
        .filter(|name| !name.is_empty());
    if text.trim().is_empty() {
        return names.take(DEFAULT_SUGGESTIONS).collect();
    }
    let needle = text.to_lowercase();
    names
        .filter(|name| name.to_lowercase().contains(&needle))
        .collect()
}

/// "N results for <search>", shown while a search is applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultsBanner {
    pub count: usize,
    pub search: String,
}

impl ResultsBanner {
    /// The banner for the applied criteria, if a search is active.
    pub fn for_criteria(catalog: &Catalog, applied: &FilterCriteria) -> Option<Self> {
        applied.has_search().then(|| Self {
            count: count_matches(catalog, applied),
            search: applied.search.clone(),
        })
    }
}

impl fmt::Display for ResultsBanner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let noun = if self.count == 1 { "result" } else { "results" };
        write!(f, "{} {} for \"{}\"", self.count, noun, self.search)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::{Currency, Money};
    use serde_json::json;

    fn catalog() -> Catalog {
        Catalog::from_json(
            &json!({ "products": [
                { "id": 1, "name": "iPhone 16", "category": "iPhone", "price": 979,
                  "colors": ["Black", "Pink"], "specs": { "releaseYear": 2024 } },
                { "id": 2, "name": "MacBook Air", "category": "Mac", "price": 1249,
                  "colors": ["Midnight", "Black"], "specs": { "releaseYear": 2025 } },
                { "id": 3, "name": "iPhone 15", "category": "iPhone", "price": 879,
                  "colors": ["Black"], "specs": { "releaseYear": 2023 } },
                { "id": 4, "name": "AirPods Pro", "category": "AirPods", "price": 279,
                  "specs": { "releaseYear": 2024 } }
            ]})
            .to_string(),
        )
        .unwrap()
    }

    #[test]
    fn test_facet_options() {
        let facets = FacetOptions::from_catalog(&catalog());
        assert_eq!(
            facets.categories,
            vec![Category::IPhone, Category::Mac, Category::AirPods]
        );
        assert_eq!(facets.years, vec![2025, 2024, 2023]);
        assert_eq!(facets.colors, vec!["Black", "Pink", "Midnight"]);
        assert_eq!(facets.price.min(), Money::from_units(279, Currency::EUR));
        assert_eq!(facets.price.max(), Money::from_units(1249, Currency::EUR));
    }

    #[test]
    fn test_suggestions() {
        let catalog = catalog();
        assert_eq!(suggestions(&catalog, "IPHONE"), vec!["iPhone 16", "iPhone 15"]);
        assert_eq!(suggestions(&catalog, "").len(), 4);
        assert!(suggestions(&catalog, "vision").is_empty());
    }

    #[test]
    fn test_results_banner() {
        let catalog = catalog();
        let mut criteria = FilterCriteria::defaults(PriceRange::for_catalog(&catalog));
        assert_eq!(ResultsBanner::for_criteria(&catalog, &criteria), None);

        criteria.search = "iphone".into();
        let banner = ResultsBanner::for_criteria(&catalog, &criteria).unwrap();
        assert_eq!(banner.count, 2);
        assert_eq!(banner.to_string(), "2 results for \"iphone\"");
    }
}
