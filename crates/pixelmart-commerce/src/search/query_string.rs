//! Filter criteria <-> URL query string.
//!
//! Keys: `cat`, `year`, `color`, `priceMin`, `priceMax`, `search`, `sort`.
//! Encoding is `application/x-www-form-urlencoded`. Only values that differ
//! from the defaults are written, and malformed values parse as defaults.

use crate::catalog::Category;
use crate::money::Money;
use crate::search::{FilterCriteria, PriceRange, SortOption};
use url::form_urlencoded;

pub const CATEGORY_KEY: &str = "cat";
pub const YEAR_KEY: &str = "year";
pub const COLOR_KEY: &str = "color";
pub const PRICE_MIN_KEY: &str = "priceMin";
pub const PRICE_MAX_KEY: &str = "priceMax";
pub const SEARCH_KEY: &str = "search";
pub const SORT_KEY: &str = "sort";

/// Raw first-occurrence values of the known keys.
#[derive(Debug, Default)]
struct RawParams {
    category: Option<String>,
    year: Option<String>,
    color: Option<String>,
    price_min: Option<String>,
    price_max: Option<String>,
    search: Option<String>,
    sort: Option<String>,
}

impl RawParams {
    fn parse(query: &str) -> Self {
        let mut raw = RawParams::default();
        let query = query.strip_prefix('?').unwrap_or(query);
        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            let slot = match key.as_ref() {
                CATEGORY_KEY => &mut raw.category,
                YEAR_KEY => &mut raw.year,
                COLOR_KEY => &mut raw.color,
                PRICE_MIN_KEY => &mut raw.price_min,
                PRICE_MAX_KEY => &mut raw.price_max,
                SEARCH_KEY => &mut raw.search,
                SORT_KEY => &mut raw.sort,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value.into_owned());
            }
        }
        raw
    }
}

/// Parse a query string (with or without a leading `?`).
pub fn parse_query(query: &str, bounds: PriceRange) -> FilterCriteria {
    let raw = RawParams::parse(query);
    let mut criteria = FilterCriteria::defaults(bounds);

    if let Some(label) = raw.category.as_deref().filter(|s| !s.is_empty()) {
        criteria.category = Category::from_str(label);
        if criteria.category.is_none() {
            tracing::debug!(category = label, "unknown category in query, showing all");
        }
    }

    criteria.year = raw.year.as_deref().and_then(parse_year);
    criteria.color = raw.color.filter(|s| !s.is_empty());

    let min = parse_price(raw.price_min.as_deref(), bounds.min());
    let max = parse_price(raw.price_max.as_deref(), bounds.max());
    criteria.price = PriceRange::new(min, max);

    criteria.search = raw.search.unwrap_or_default();

    if let Some(sort) = raw.sort.as_deref().filter(|s| !s.is_empty()) {
        criteria.sort = SortOption::from_str(sort).unwrap_or_default();
    }

    criteria
}

/// Serialize criteria, writing only non-default values. The result has no
/// leading `?` and is empty when everything is default.
pub fn to_query(criteria: &FilterCriteria, bounds: PriceRange) -> String {
    let mut out = form_urlencoded::Serializer::new(String::new());
    if let Some(category) = criteria.category {
        out.append_pair(CATEGORY_KEY, category.as_str());
    }
    if let Some(year) = criteria.year {
        out.append_pair(YEAR_KEY, &year.to_string());
    }
    if let Some(color) = criteria.color.as_deref().filter(|s| !s.is_empty()) {
        out.append_pair(COLOR_KEY, color);
    }
    if criteria.price.min() != bounds.min() {
        out.append_pair(PRICE_MIN_KEY, &format_price(criteria.price.min()));
    }
    if criteria.price.max() != bounds.max() {
        out.append_pair(PRICE_MAX_KEY, &format_price(criteria.price.max()));
    }
    if !criteria.search.is_empty() {
        out.append_pair(SEARCH_KEY, &criteria.search);
    }
    if criteria.sort != SortOption::Default {
        out.append_pair(SORT_KEY, criteria.sort.as_str());
    }
    out.finish()
}

/// Query string for a navigation link to one category.
pub fn category_link(category: Category) -> String {
    form_urlencoded::Serializer::new(String::new())
        .append_pair(CATEGORY_KEY, category.as_str())
        .finish()
}

/// Query string for a search submitted from the navigation bar. Blank
/// text clears the search.
pub fn search_link(text: &str) -> String {
    let text = text.trim();
    if text.is_empty() {
        return String::new();
    }
    form_urlencoded::Serializer::new(String::new())
        .append_pair(SEARCH_KEY, text)
        .finish()
}

/// The category a query string selects, for highlighting navigation.
pub fn active_category(query: &str) -> Option<Category> {
    RawParams::parse(query)
        .category
        .as_deref()
        .and_then(Category::from_str)
}

fn parse_year(s: &str) -> Option<i32> {
    match s.trim().parse::<i32>() {
        Ok(year) if year > 0 => Some(year),
        _ => {
            tracing::debug!(year = s, "ignoring invalid year in query");
            None
        }
    }
}

fn parse_price(s: Option<&str>, fallback: Money) -> Money {
    let Some(s) = s.map(str::trim).filter(|s| !s.is_empty()) else {
        return fallback;
    };
    match s.parse::<f64>() {
        Ok(value) if value.is_finite() && value >= 0.0 => Money::from_decimal(value, fallback.currency),
        _ => {
            tracing::debug!(price = s, "ignoring invalid price bound in query");
            fallback
        }
    }
}

fn format_price(price: Money) -> String {
    price.to_decimal().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Currency;

    fn eur(units: i64) -> Money {
        Money::from_units(units, Currency::EUR)
    }

    fn bounds() -> PriceRange {
        PriceRange::new(eur(19), eur(3999))
    }

    #[test]
    fn test_empty_query_is_defaults() {
        assert_eq!(parse_query("", bounds()), FilterCriteria::defaults(bounds()));
        assert_eq!(parse_query("?", bounds()), FilterCriteria::defaults(bounds()));
        assert_eq!(to_query(&FilterCriteria::defaults(bounds()), bounds()), "");
    }

    #[test]
    fn test_parse_full_query() {
        let criteria = parse_query(
            "?cat=Apple+Watch&year=2024&color=Jet%20Black&priceMin=199&priceMax=899.5&search=ultra&sort=price-desc",
            bounds(),
        );
        assert_eq!(criteria.category, Some(Category::AppleWatch));
        assert_eq!(criteria.year, Some(2024));
        assert_eq!(criteria.color.as_deref(), Some("Jet Black"));
        assert_eq!(criteria.price.min(), eur(199));
        assert_eq!(criteria.price.max(), Money::new(89_950, Currency::EUR));
        assert_eq!(criteria.search, "ultra");
        assert_eq!(criteria.sort, SortOption::PriceDesc);
    }

    #[test]
    fn test_round_trip() {
        let mut criteria = FilterCriteria::defaults(bounds());
        criteria.category = Some(Category::IPad);
        criteria.color = Some("Space Gray".into());
        criteria.price = PriceRange::new(Money::new(49_950, Currency::EUR), eur(3999));
        criteria.search = "pro & air".into();
        criteria.sort = SortOption::NameAsc;

        let query = to_query(&criteria, bounds());
        assert_eq!(
            query,
            "cat=iPad&color=Space+Gray&priceMin=499.5&search=pro+%26+air&sort=name-asc"
        );
        assert_eq!(parse_query(&query, bounds()), criteria);
    }

    #[test]
    fn test_malformed_values_default() {
        let criteria = parse_query(
            "cat=Vision&year=soon&priceMin=-5&priceMax=lots&sort=popular",
            bounds(),
        );
        assert_eq!(criteria, FilterCriteria::defaults(bounds()));
    }

    #[test]
    fn test_reversed_bounds_are_swapped() {
        let criteria = parse_query("priceMin=900&priceMax=100", bounds());
        assert_eq!(criteria.price.min(), eur(100));
        assert_eq!(criteria.price.max(), eur(900));
    }

    #[test]
    fn test_first_occurrence_wins() {
        let criteria = parse_query("cat=Mac&cat=iPad&unknown=1", bounds());
        assert_eq!(criteria.category, Some(Category::Mac));
    }

    #[test]
    fn test_links() {
        assert_eq!(category_link(Category::AppleWatch), "cat=Apple+Watch");
        assert_eq!(search_link("  iPhone 16 "), "search=iPhone+16");
        assert_eq!(search_link("   "), "");
        assert_eq!(active_category("?cat=AirPods&sort=name-asc"), Some(Category::AirPods));
        assert_eq!(active_category("search=x"), None);
    }
}
