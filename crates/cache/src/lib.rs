//! # SDUI Cache
//!
//! Content-addressed store for parsed layout trees.
//!
//! ```text
//! raw JSON text ──> generate_key (SHA-256, lowercase hex)
//!                        │
//!                        v
//!               DescriptorCache (Mutex)
//!                 ├─ key -> slot index (HashMap)
//!                 └─ slots on an index-linked recency list
//!                      head = most recent, tail = next victim
//! ```
//!
//! ## Example
//!
//! ```rust
//! use sdui_cache::{generate_key, DescriptorCache};
//! use sdui_protocol::{ComponentDescriptor, ComponentType};
//!
//! let cache = DescriptorCache::new(2);
//! let key = generate_key(r#"{"type":"text"}"#);
//! cache.put(key.clone(), ComponentDescriptor::atomic(ComponentType::Text, Default::default()));
//! assert!(cache.contains(&key));
//! assert_eq!(cache.get(&key).unwrap().component_type(), ComponentType::Text);
//! ```

mod cache;
mod key;
mod lru;

pub use cache::{CacheEntry, CacheStats, DescriptorCache, DEFAULT_CAPACITY};
pub use key::{generate_key, generate_key_bytes, CacheKey, KEY_HEX_LEN};
