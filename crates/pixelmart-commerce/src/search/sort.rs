//! Listing sort orders.

use crate::catalog::Product;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Sort options for the listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum SortOption {
    /// Catalog order.
    #[default]
    Default,
    /// Sort by price, low to high.
    PriceAsc,
    /// Sort by price, high to low.
    PriceDesc,
    /// Sort by name A-Z.
    NameAsc,
    /// Sort by name Z-A.
    NameDesc,
    /// Sort by release year, newest first.
    YearDesc,
    /// Sort by release year, oldest first.
    YearAsc,
}

impl SortOption {
    pub const ALL: [SortOption; 7] = [
        SortOption::Default,
        SortOption::PriceAsc,
        SortOption::PriceDesc,
        SortOption::NameAsc,
        SortOption::NameDesc,
        SortOption::YearDesc,
        SortOption::YearAsc,
    ];

    /// The query-string value.
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOption::Default => "default",
            SortOption::PriceAsc => "price-asc",
            SortOption::PriceDesc => "price-desc",
            SortOption::NameAsc => "name-asc",
            SortOption::NameDesc => "name-desc",
            SortOption::YearDesc => "year-desc",
            SortOption::YearAsc => "year-asc",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            SortOption::Default => "Featured",
            SortOption::PriceAsc => "Price: Low to High",
            SortOption::PriceDesc => "Price: High to Low",
            SortOption::NameAsc => "Name: A-Z",
            SortOption::NameDesc => "Name: Z-A",
            SortOption::YearDesc => "Newest",
            SortOption::YearAsc => "Oldest",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|o| o.as_str() == s)
    }

    /// Compare two products under this order. `Default` treats all
    /// products as equal, so a stable sort leaves them in place.
    pub fn compare(&self, a: &Product, b: &Product) -> Ordering {
        match self {
            SortOption::Default => Ordering::Equal,
            SortOption::PriceAsc => a.price.amount_cents.cmp(&b.price.amount_cents),
            SortOption::PriceDesc => b.price.amount_cents.cmp(&a.price.amount_cents),
            SortOption::NameAsc => compare_names(&a.name, &b.name),
            SortOption::NameDesc => compare_names(&b.name, &a.name),
            SortOption::YearDesc => year(b).cmp(&year(a)),
            SortOption::YearAsc => year(a).cmp(&year(b)),
        }
    }
}

fn year(product: &Product) -> i32 {
    product.release_year().unwrap_or(0)
}

/// Stable in-place sort.
pub fn sort_products(products: &mut [&Product], sort: SortOption) {
    if sort == SortOption::Default {
        return;
    }
    products.sort_by(|a, b| sort.compare(a, b));
}

/// Dictionary order for display names, approximating a locale collation.
///
/// Letters first compare ignoring case and Latin accents ("Éclair" sorts with
/// the e's). Ties are broken by accent, unaccented first, then by case with
/// lowercase before uppercase ("ipad" < "iPad").
pub fn compare_names(a: &str, b: &str) -> Ordering {
    let secondary = |s: &str| s.chars().flat_map(char::to_lowercase).collect::<Vec<_>>();
    let primary = |s: &str| secondary(s).into_iter().map(strip_accent).collect::<Vec<_>>();
    primary(a)
        .cmp(&primary(b))
        .then_with(|| secondary(a).cmp(&secondary(b)))
        .then_with(|| a.chars().map(invert_case).cmp(b.chars().map(invert_case)))
}

/// Base letter of a lowercase accented Latin letter.
fn strip_accent(c: char) -> char {
    match c {
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' | 'ā' => 'a',
        'ç' | 'ć' | 'č' => 'c',
        'è' | 'é' | 'ê' | 'ë' | 'ē' | 'ě' => 'e',
        'ì' | 'í' | 'î' | 'ï' | 'ī' => 'i',
        'ñ' | 'ń' | 'ň' => 'n',
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' | 'ø' | 'ō' => 'o',
        'ś' | 'š' => 's',
        'ù' | 'ú' | 'û' | 'ü' | 'ū' | 'ů' => 'u',
        'ý' | 'ÿ' => 'y',
        'ź' | 'ż' | 'ž' => 'z',
        _ => c,
    }
}

fn invert_case(c: char) -> char {
    if c.is_ascii_lowercase() {
        c.to_ascii_uppercase()
    } else if c.is_ascii_uppercase() {
        c.to_ascii_lowercase()
    } else {
        c
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn product(id: u64, name: &str, price: u32, year: Option<i32>) -> Product {
        let specs = match year {
            Some(y) => json!({ "releaseYear": y }),
            None => json!({}),
        };
        serde_json::from_value(json!({
            "id": id,
            "name": name,
            "category": "Mac",
            "price": price,
            "specs": specs
        }))
        .unwrap()
    }

    fn ids(products: &[&Product]) -> Vec<u64> {
        products.iter().map(|p| p.id.get()).collect()
    }

    #[test]
    fn test_sort_option_strings() {
        for option in SortOption::ALL {
            assert_eq!(SortOption::from_str(option.as_str()), Some(option));
        }
        assert_eq!(SortOption::from_str("popular"), None);
        assert_eq!(
            serde_json::to_string(&SortOption::YearDesc).unwrap(),
            "\"year-desc\""
        );
    }

    #[test]
    fn test_price_sort_is_stable() {
        let a = product(1, "B", 500, None);
        let b = product(2, "A", 100, None);
        let c = product(3, "C", 500, None);
        let mut list = vec![&a, &b, &c];
        sort_products(&mut list, SortOption::PriceAsc);
        assert_eq!(ids(&list), vec![2, 1, 3]);
        sort_products(&mut list, SortOption::PriceDesc);
        assert_eq!(ids(&list), vec![1, 3, 2]);
    }

    #[test]
    fn test_year_sort_missing_is_zero() {
        let a = product(1, "A", 1, Some(2023));
        let b = product(2, "B", 1, None);
        let c = product(3, "C", 1, Some(2024));
        let mut list = vec![&a, &b, &c];
        sort_products(&mut list, SortOption::YearDesc);
        assert_eq!(ids(&list), vec![3, 1, 2]);
        sort_products(&mut list, SortOption::YearAsc);
        assert_eq!(ids(&list), vec![2, 1, 3]);
    }

    #[test]
    fn test_default_keeps_catalog_order() {
        let a = product(1, "Z", 900, None);
        let b = product(2, "A", 100, None);
        let mut list = vec![&a, &b];
        sort_products(&mut list, SortOption::Default);
        assert_eq!(ids(&list), vec![1, 2]);
    }

    #[test]
    fn test_compare_names() {
        assert_eq!(compare_names("iPad", "iMac"), Ordering::Greater);
        assert_eq!(compare_names("apple", "Banana"), Ordering::Less);
        assert_eq!(compare_names("ipad", "iPad"), Ordering::Less);
        assert_eq!(compare_names("Mac", "Mac"), Ordering::Equal);
        assert_eq!(compare_names("Mac", "Mac mini"), Ordering::Less);
    }

    #[test]
    fn test_compare_names_ignores_accents() {
        assert_eq!(compare_names("Éclair", "zebra"), Ordering::Less);
        assert_eq!(compare_names("Éclair", "Delta"), Ordering::Greater);
        assert_eq!(compare_names("école", "Ecole"), Ordering::Greater);
        assert_eq!(compare_names("Ecole", "école"), Ordering::Less);
        assert_eq!(compare_names("Zoë", "Zoey"), Ordering::Less);

        let mut names = vec!["zebra", "Éclair", "apple", "Eclipse"];
        names.sort_by(|a, b| compare_names(a, b));
        assert_eq!(names, vec!["apple", "Éclair", "Eclipse", "zebra"]);
    }
}
