//! Key-value persistence adapter for DashCart.
//!
//! Provides a small, byte-oriented [`KvStore`] contract (`get`/`set`), two
//! backends ([`MemoryStore`], [`FileStore`]) and a typed JSON [`Cache`] on top.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use dash_cache::{cache_key, Cache, MemoryStore};
//!
//! let cache = Cache::new(Arc::new(MemoryStore::new()));
//! let key = cache_key!("food-delivery-storage", "recent");
//!
//! cache.set(&key, &vec!["pho", "banh mi"]).unwrap();
//! let recent: Option<Vec<String>> = cache.get(&key).unwrap();
//! assert_eq!(recent.unwrap().len(), 2);
//! ```

mod error;
mod kv;
mod store;

pub use error::CacheError;
pub use kv::{Cache, KvStore};
pub use store::{FileStore, MemoryStore};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{Cache, CacheError, FileStore, KvStore, MemoryStore};
}
