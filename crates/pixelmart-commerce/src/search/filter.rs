//! The listing predicate chain.

use crate::catalog::{Catalog, Product};
use crate::search::{sort_products, FilterCriteria};

/// Whether a product passes every active filter.
///
/// Checks run in a fixed order: listable, category, year, color, price,
/// then text search.
pub fn matches(product: &Product, criteria: &FilterCriteria) -> bool {
    if !product.is_listable() {
        return false;
    }
    if criteria.category.is_some_and(|c| c != product.category) {
        return false;
    }
    if criteria.year.is_some() && product.release_year() != criteria.year {
        return false;
    }
    if let Some(color) = &criteria.color {
        if !product.has_color(color) {
            return false;
        }
    }
    if !criteria.price.contains(product.price) {
        return false;
    }
    if criteria.has_search() {
        let needle = criteria.search.to_lowercase();
        let in_name = product.name.to_lowercase().contains(&needle);
        if !in_name && !product.short_description.to_lowercase().contains(&needle) {
            return false;
        }
    }
    true
}

/// Filter and sort the catalog.
pub fn filter_products<'a>(catalog: &'a Catalog, criteria: &FilterCriteria) -> Vec<&'a Product> {
    let mut products: Vec<&Product> = catalog.iter().filter(|p| matches(p, criteria)).collect();
    sort_products(&mut products, criteria.sort);
    products
}

/// Count matching products without sorting them.
pub fn count_matches(catalog: &Catalog, criteria: &FilterCriteria) -> usize {
    catalog.iter().filter(|p| matches(p, criteria)).count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Category;
    use crate::money::{Currency, Money};
    use crate::search::{PriceRange, SortOption};
    use serde_json::json;

    fn catalog() -> Catalog {
        Catalog::from_json(
            &json!([
                { "id": 1, "name": "iPhone 16", "shortDescription": "Camera Control.", "category": "iPhone",
                  "price": 979, "colors": ["Black", "Pink"], "specs": { "releaseYear": 2024 } },
                { "id": 2, "name": "MacBook Air", "shortDescription": "Thin. Light. Fast.", "category": "Mac",
                  "price": 1249, "colors": ["Midnight"], "specs": { "releaseYear": 2025 } },
                { "id": 3, "name": "iPhone 15", "shortDescription": "Dynamic Island.", "category": "iPhone",
                  "price": 879, "colors": ["Black"], "specs": { "releaseYear": 2023 } },
                { "id": 4, "name": "MagSafe Charger", "shortDescription": "Snaps onto any iPhone.", "category": "Accessories",
                  "price": 49, "colors": ["White"] },
                { "id": 5, "name": "", "category": "Accessories", "price": 10 },
                { "id": 6, "name": "Gift Card", "category": "Accessories", "price": 0 }
            ])
            .to_string(),
        )
        .unwrap()
    }

    fn defaults(catalog: &Catalog) -> FilterCriteria {
        FilterCriteria::defaults(PriceRange::for_catalog(catalog))
    }

    fn ids(products: &[&Product]) -> Vec<u64> {
        products.iter().map(|p| p.id.get()).collect()
    }

    #[test]
    fn test_defaults_keep_listable_products() {
        let catalog = catalog();
        let results = filter_products(&catalog, &defaults(&catalog));
        assert_eq!(ids(&results), vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_category_year_and_color() {
        let catalog = catalog();
        let mut criteria = defaults(&catalog);
        criteria.category = Some(Category::IPhone);
        assert_eq!(count_matches(&catalog, &criteria), 2);
        criteria.year = Some(2023);
        assert_eq!(ids(&filter_products(&catalog, &criteria)), vec![3]);

        let mut criteria = defaults(&catalog);
        criteria.color = Some("Black".into());
        assert_eq!(ids(&filter_products(&catalog, &criteria)), vec![1, 3]);
    }

    #[test]
    fn test_price_bounds_are_inclusive() {
        let catalog = catalog();
        let mut criteria = defaults(&catalog);
        criteria.price = PriceRange::new(
            Money::from_units(879, Currency::EUR),
            Money::from_units(979, Currency::EUR),
        );
        assert_eq!(ids(&filter_products(&catalog, &criteria)), vec![1, 3]);
    }

    #[test]
    fn test_search_matches_name_or_description() {
        let catalog = catalog();
        let mut criteria = defaults(&catalog);
        criteria.search = "IPHONE".into();
        assert_eq!(ids(&filter_products(&catalog, &criteria)), vec![1, 3, 4]);
        criteria.search = "light".into();
        assert_eq!(ids(&filter_products(&catalog, &criteria)), vec![2]);
        criteria.search = "   ".into();
        assert_eq!(count_matches(&catalog, &criteria), 4);
    }

    #[test]
    fn test_filtering_is_idempotent() {
        let catalog = catalog();
        let mut criteria = defaults(&catalog);
        criteria.search = "iphone".into();
        criteria.sort = SortOption::PriceAsc;
        let first = filter_products(&catalog, &criteria);
        let again = Catalog::new(first.iter().map(|p| (*p).clone()).collect());
        let second = filter_products(&again, &criteria);
        assert_eq!(ids(&first), ids(&second));
    }

    #[test]
    fn test_count_matches_agrees_with_filter() {
        let catalog = catalog();
        let mut criteria = defaults(&catalog);
        criteria.sort = SortOption::NameDesc;
        criteria.search = "i".into();
        assert_eq!(
            count_matches(&catalog, &criteria),
            filter_products(&catalog, &criteria).len()
        );
    }
}
