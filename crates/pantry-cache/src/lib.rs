//! Type-safe Key-Value persistence layer for Pantry.
//!
//! Provides a small, ergonomic API for persisting data in a Key-Value
//! store with automatic JSON serialization. Backends implement
//! [`KvStore`]; the typed [`Cache`] wraps one.
//!
//! # Example
//!
//! ```
//! use pantry_cache::{cache_key, Cache, SessionId};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Serialize, Deserialize)]
//! struct Basket {
//!     items: Vec<String>,
//! }
//!
//! let cache = Cache::in_memory();
//! let key = cache_key!("cart", SessionId::new("sess_123"));
//!
//! cache.set(&key, &Basket { items: vec!["milk".into()] }).unwrap();
//! let basket: Option<Basket> = cache.get(&key).unwrap();
//! assert_eq!(basket.unwrap().items.len(), 1);
//!
//! cache.delete(&key).unwrap();
//! ```

mod error;
mod kv;
mod session;
mod store;

pub use error::CacheError;
pub use kv::Cache;
pub use session::SessionId;
pub use store::{FileStore, KvStore, MemoryStore};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{Cache, CacheError, FileStore, KvStore, MemoryStore, SessionId};
}
