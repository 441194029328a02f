//! Search module.
//!
//! Filtering, sorting and query-string sync for the product listing.

mod criteria;
mod debounce;
mod engine;
mod facets;
mod filter;
pub mod query_string;
mod sort;
mod state;

pub use criteria::{FilterCriteria, FilterEdit, PriceRange};
pub use debounce::{DebounceTimer, DEFAULT_DEBOUNCE};
pub use engine::FilterEngine;
pub use facets::{suggestions, FacetOptions, ResultsBanner, DEFAULT_SUGGESTIONS};
pub use filter::{count_matches, filter_products, matches};
pub use query_string::{category_link, parse_query, search_link, to_query};
pub use sort::{compare_names, sort_products, SortOption};
pub use state::{FilterAction, FilterEffect, FilterPhase, FilterState};
