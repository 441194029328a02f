//! Type-safe local key-value storage for PixelMart.
//!
//! Provides a small synchronous store abstraction with in-memory and
//! directory-backed implementations, plus a typed JSON wrapper.
//!
//! # Example
//!
//! ```rust
//! use pixelmart_cache::{Cache, MemoryStore};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Serialize, Deserialize)]
//! struct Line {
//!     id: u64,
//! }
//!
//! let cache = Cache::new(MemoryStore::new());
//!
//! // Store a value
//! cache.set("cartItems", &vec![Line { id: 1 }]).unwrap();
//!
//! // Retrieve a value
//! let lines: Option<Vec<Line>> = cache.get("cartItems").unwrap();
//! assert_eq!(lines.unwrap().len(), 1);
//!
//! // Delete a value
//! cache.delete("cartItems").unwrap();
//! ```

mod error;
mod file;
mod kv;
mod memory;

pub use error::CacheError;
pub use file::FileStore;
pub use kv::{Cache, KeyValueStore};
pub use memory::MemoryStore;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{Cache, CacheError, FileStore, KeyValueStore, MemoryStore};
}
