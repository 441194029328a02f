//! Filter criteria for the product listing.

use crate::catalog::{Catalog, Category};
use crate::money::{Currency, Money};
use crate::search::SortOption;
use serde::Serialize;

/// An inclusive price range. The ends are kept ordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PriceRange {
    min: Money,
    max: Money,
}

impl PriceRange {
    /// Build a range, swapping the ends if they are reversed.
    pub fn new(a: Money, b: Money) -> Self {
        if a.amount_cents <= b.amount_cents {
            Self { min: a, max: b }
        } else {
            Self { min: b, max: a }
        }
    }

    /// The catalog's full price span, or zero to zero for an empty catalog.
    pub fn for_catalog(catalog: &Catalog) -> Self {
        match catalog.price_bounds() {
            Some((min, max)) => Self::new(min, max),
            None => Self::new(Money::zero(Currency::default()), Money::zero(Currency::default())),
        }
    }

    pub fn min(&self) -> Money {
        self.min
    }

    pub fn max(&self) -> Money {
        self.max
    }

    pub fn with_min(self, min: Money) -> Self {
        Self::new(min, self.max)
    }

    pub fn with_max(self, max: Money) -> Self {
        Self::new(self.min, max)
    }

    pub fn contains(&self, price: Money) -> bool {
        (self.min.amount_cents..=self.max.amount_cents).contains(&price.amount_cents)
    }
}

/// Everything that narrows or orders the listing.
///
/// `None` and empty values mean "all". The default price range depends on
/// the catalog, so defaults are built with [`FilterCriteria::defaults`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterCriteria {
    pub category: Option<Category>,
    pub year: Option<i32>,
    pub color: Option<String>,
    pub price: PriceRange,
    /// Free text matched against name and short description.
    pub search: String,
    pub sort: SortOption,
}

impl FilterCriteria {
    /// Criteria that match every listable product, in catalog order.
    pub fn defaults(bounds: PriceRange) -> Self {
        Self {
            category: None,
            year: None,
            color: None,
            price: bounds,
            search: String::new(),
            sort: SortOption::default(),
        }
    }

    /// Whether a search is active.
    pub fn has_search(&self) -> bool {
        !self.search.trim().is_empty()
    }

    /// Apply a single edit.
    pub fn apply_edit(&mut self, edit: FilterEdit) {
        match edit {
            FilterEdit::Category(category) => self.category = category,
            FilterEdit::Year(year) => self.year = year,
            FilterEdit::Color(color) => self.color = color.filter(|c| !c.is_empty()),
            FilterEdit::PriceMin(min) => self.price = self.price.with_min(min),
            FilterEdit::PriceMax(max) => self.price = self.price.with_max(max),
            FilterEdit::Price(range) => self.price = range,
            FilterEdit::Search(text) => self.search = text,
            FilterEdit::Sort(sort) => self.sort = sort,
        }
    }
}

/// A change to one pending filter field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterEdit {
    Category(Option<Category>),
    Year(Option<i32>),
    Color(Option<String>),
    PriceMin(Money),
    PriceMax(Money),
    Price(PriceRange),
    Search(String),
    Sort(SortOption),
}
