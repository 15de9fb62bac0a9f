//! # SDUI Parser
//!
//! Turns server-sent layout JSON into immutable [`ComponentDescriptor`] trees.
//!
//! ## Architecture
//!
//! ```text
//! JSON text
//!     │
//!     ├──> generate_key (SHA-256) ──> DescriptorCache ──hit──> Arc<ComponentDescriptor>
//!     │                                   │
//!     │                                  miss
//!     │                                   v
//!     ├──> serde_json decode (MalformedJson on failure)
//!     │
//!     └──> Dispatcher
//!          ├─> TypeMapper resolves "type" (unknown -> fit)
//!          ├─> StrategyRegistry picks the first strategy claiming the type
//!          │    ├─> LayoutStrategy: properties + children, each child re-dispatched
//!          │    └─> AtomicStrategy: properties only
//!          └─> complete tree stored in the cache
//! ```
//!
//! ## Example
//!
//! ```rust
//! use sdui_parser::{DescriptorParser, ParserConfig};
//! use sdui_protocol::ComponentType;
//!
//! let parser = DescriptorParser::new(ParserConfig::with_capacity(16)).unwrap();
//! let tree = parser
//!     .parse(r#"{"type":"column","children":[{"type":"text","text":"Hello"}]}"#)
//!     .unwrap();
//!
//! assert_eq!(tree.component_type(), ComponentType::Column);
//! assert_eq!(tree.children()[0].property("text").unwrap(), "Hello");
//! ```

mod config;
mod error;
mod parser;
mod registry;
mod strategy;
mod type_mapper;

pub use config::{ParserConfig, ENV_CACHE_CAPACITY, ENV_CACHE_DISABLED, MAX_ENV_CACHE_CAPACITY};
pub use error::{ParseError, Result};
pub use parser::{DescriptorParser, DescriptorParserBuilder, ParserMetrics, ROOT_PATH};
pub use registry::StrategyRegistry;
pub use strategy::{
    AtomicStrategy, ComponentNode, Dispatcher, LayoutStrategy, ParseStrategy, CHILDREN_KEY,
};
pub use type_mapper::{TypeMapper, TYPE_KEY};

pub use sdui_protocol::{ComponentDescriptor, ComponentType};

use once_cell::sync::Lazy;
use std::sync::Arc;

static SHARED: Lazy<Arc<DescriptorParser>> = Lazy::new(|| {
    let config = ParserConfig::from_env();
    match DescriptorParser::new(config) {
        Ok(parser) => Arc::new(parser),
        Err(err) => {
            log::warn!("falling back to default parser: {err}");
            Arc::new(DescriptorParser::default())
        }
    }
});

/// Process-wide parser configured from the environment on first use
pub fn shared() -> Arc<DescriptorParser> {
    Arc::clone(&SHARED)
}
