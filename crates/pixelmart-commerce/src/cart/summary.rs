//! Derived cart totals.

use crate::cart::CartLineItem;
use crate::catalog::Catalog;
use crate::ids::ProductId;
use crate::money::{Currency, Money};
use crate::pricing::{compute_price, PricingMode, Quantity, SelectedOptions};
use serde::Serialize;

/// Complete pricing breakdown for a cart.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CartSummary {
    /// Per-line pricing, in cart order.
    pub lines: Vec<LineSummary>,
    /// Sum of line totals.
    pub subtotal: Money,
    /// Sum of quantities, including lines whose product is gone.
    pub item_count: u32,
}

impl CartSummary {
    /// Price every line against the catalog.
    ///
    /// Lines whose product is no longer in the catalog contribute nothing to
    /// the subtotal but still count towards `item_count`.
    pub fn compute(lines: &[CartLineItem], catalog: &Catalog) -> Self {
        let currency = lines
            .iter()
            .find_map(|line| catalog.get(line.id))
            .map_or_else(Currency::default, |p| p.price.currency);

        let lines: Vec<LineSummary> = lines
            .iter()
            .enumerate()
            .map(|(index, line)| LineSummary::compute(index, line, catalog))
            .collect();

        let subtotal = Money::sum(lines.iter().map(|l| &l.total), currency);
        let item_count = lines
            .iter()
            .fold(0u32, |acc, l| acc.saturating_add(l.quantity.get()));

        Self {
            lines,
            subtotal,
            item_count,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Lines whose product could not be found.
    pub fn unavailable(&self) -> impl Iterator<Item = &LineSummary> {
        self.lines.iter().filter(|l| !l.available)
    }
}

/// Pricing for a single cart line.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct LineSummary {
    /// Position in the cart.
    pub index: usize,
    pub id: ProductId,
    /// Product name, when the product exists.
    pub name: Option<String>,
    pub options: SelectedOptions,
    pub quantity: Quantity,
    /// Price of one unit of this configuration.
    pub unit_price: Money,
    /// Line total, without delivery.
    pub total: Money,
    pub available: bool,
}

impl LineSummary {
    fn compute(index: usize, line: &CartLineItem, catalog: &Catalog) -> Self {
        let product = catalog.get(line.id);
        let single = SelectedOptions {
            quantity: Quantity::ONE,
            ..line.options.clone()
        };
        Self {
            index,
            id: line.id,
            name: product.map(|p| p.name.clone()),
            options: line.options.clone(),
            quantity: line.quantity(),
            unit_price: compute_price(product, &single, PricingMode::Cart),
            total: compute_price(product, &line.options, PricingMode::Cart),
            available: product.is_some(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Product;
    use serde_json::json;

    fn catalog() -> Catalog {
        let phone: Product = serde_json::from_value(json!({
            "id": 1,
            "name": "iPhone 16",
            "category": "iPhone",
            "price": 999,
            "colors": ["Black", "White"],
            "specs": { "storageOptions": ["128GB", "256GB"] }
        }))
        .unwrap();
        Catalog::new(vec![phone])
    }

    fn line(color: &str, quantity: i64) -> CartLineItem {
        CartLineItem::new(
            ProductId::new(1),
            SelectedOptions::new().with_color(color).with_quantity(quantity),
        )
    }

    #[test]
    fn test_subtotal_and_item_count() {
        let summary = CartSummary::compute(&[line("Black", 2), line("White", 1)], &catalog());
        assert_eq!(summary.lines[0].total, Money::from_units(1998, Currency::EUR));
        assert_eq!(summary.lines[0].unit_price, Money::from_units(999, Currency::EUR));
        assert_eq!(summary.lines[1].total, Money::from_units(999, Currency::EUR));
        assert_eq!(summary.subtotal, Money::from_units(2997, Currency::EUR));
        assert_eq!(summary.item_count, 3);
    }

    #[test]
    fn test_missing_product_counts_but_costs_nothing() {
        let gone = CartLineItem::new(ProductId::new(99), SelectedOptions::new().with_quantity(3));
        let summary = CartSummary::compute(&[line("Black", 1), gone], &catalog());
        assert_eq!(summary.subtotal, Money::from_units(999, Currency::EUR));
        assert_eq!(summary.item_count, 4);
        let missing: Vec<_> = summary.unavailable().collect();
        assert_eq!(missing.len(), 1);
        assert_eq!(missing[0].index, 1);
        assert_eq!(missing[0].name, None);
    }

    #[test]
    fn test_empty_cart() {
        let summary = CartSummary::compute(&[], &catalog());
        assert!(summary.is_empty());
        assert!(summary.subtotal.is_zero());
        assert_eq!(summary.item_count, 0);
    }
}
