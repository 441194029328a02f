//! Product categories.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A product category.
///
/// The catalog, the `cat` query parameter and the navigation links all use
/// the display label (e.g. "Apple Watch") as the wire form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "iPhone")]
    IPhone,
    #[serde(rename = "Mac")]
    Mac,
    #[serde(rename = "iPad")]
    IPad,
    #[serde(rename = "Apple Watch")]
    AppleWatch,
    #[serde(rename = "AirPods")]
    AirPods,
    #[serde(rename = "Accessories")]
    Accessories,
}

impl Category {
    /// All categories in navigation order.
    pub const ALL: [Category; 6] = [
        Category::IPhone,
        Category::Mac,
        Category::IPad,
        Category::AppleWatch,
        Category::AirPods,
        Category::Accessories,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::IPhone => "iPhone",
            Category::Mac => "Mac",
            Category::IPad => "iPad",
            Category::AppleWatch => "Apple Watch",
            Category::AirPods => "AirPods",
            Category::Accessories => "Accessories",
        }
    }

    /// Parse the display label. Matching is exact, as in the query string.
    pub fn from_str(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == s)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
