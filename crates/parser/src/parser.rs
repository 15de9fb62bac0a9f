use crate::config::ParserConfig;
use crate::error::{ParseError, Result};
use crate::registry::StrategyRegistry;
use crate::strategy::{Dispatcher, ParseStrategy};
use sdui_cache::{generate_key, DescriptorCache};
use sdui_protocol::ComponentDescriptor;
use serde::Serialize;
use serde_json::Value;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// JSON pointer of the document root
pub const ROOT_PATH: &str = "";

/// Point-in-time counters for a [`DescriptorParser`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ParserMetrics {
    /// Parse requests received, cached or not
    pub requests: u64,
    /// Requests answered from the cache
    pub cache_hits: u64,
    /// Documents decoded from text
    pub decodes: u64,
    /// Nodes routed to a strategy, children included
    pub dispatches: u64,
}

#[derive(Debug, Default)]
struct Counters {
    requests: AtomicU64,
    cache_hits: AtomicU64,
    decodes: AtomicU64,
    dispatches: AtomicU64,
}

impl Counters {
    fn bump(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    fn snapshot(&self) -> ParserMetrics {
        ParserMetrics {
            requests: self.requests.load(Ordering::Relaxed),
            cache_hits: self.cache_hits.load(Ordering::Relaxed),
            decodes: self.decodes.load(Ordering::Relaxed),
            dispatches: self.dispatches.load(Ordering::Relaxed),
        }
    }
}

/// Entry point turning layout JSON into descriptor trees
///
/// A request first looks up the SHA-256 of the raw text in the cache. On a
/// miss the text is decoded, the root is routed through the strategy
/// registry (children recurse through the same path), and only a complete
/// tree is stored. Any failure leaves the cache untouched.
///
/// Two threads missing on the same document at once both parse it; the
/// second store replaces the first with an equal tree.
#[derive(Debug)]
pub struct DescriptorParser {
    registry: StrategyRegistry,
    cache: Option<Arc<DescriptorCache>>,
    counters: Counters,
}

impl Default for DescriptorParser {
    fn default() -> Self {
        Self {
            registry: StrategyRegistry::with_defaults(),
            cache: Some(Arc::new(DescriptorCache::default())),
            counters: Counters::default(),
        }
    }
}

impl DescriptorParser {
    /// Parser with the default strategies and a cache sized by `config`
    pub fn new(config: ParserConfig) -> Result<Self> {
        Self::builder().config(config).build()
    }

    #[must_use]
    pub fn builder() -> DescriptorParserBuilder {
        DescriptorParserBuilder::default()
    }

    /// Parse `json`, answering from the cache when possible
    pub fn parse(&self, json: &str) -> Result<Arc<ComponentDescriptor>> {
        Counters::bump(&self.counters.requests);

        let Some(cache) = &self.cache else {
            return self.decode_and_dispatch(json).map(Arc::new);
        };

        let key = generate_key(json);
        if let Some(hit) = cache.get(&key) {
            Counters::bump(&self.counters.cache_hits);
            return Ok(hit);
        }

        let descriptor = Arc::new(self.decode_and_dispatch(json)?);
        cache.put(key, Arc::clone(&descriptor));
        Ok(descriptor)
    }

    /// Parse `json` without reading or writing the cache
    pub fn parse_uncached(&self, json: &str) -> Result<ComponentDescriptor> {
        Counters::bump(&self.counters.requests);
        self.decode_and_dispatch(json)
    }

    /// Run [`Self::parse`] on the blocking pool
    ///
    /// The parse itself never yields; the only suspension points are the
    /// hand-off to the worker and back. Dropping the future does not stop a
    /// parse already running.
    pub async fn parse_async(self: Arc<Self>, json: String) -> Result<Arc<ComponentDescriptor>> {
        match tokio::task::spawn_blocking(move || self.parse(&json)).await {
            Ok(result) => result,
            Err(err) if err.is_panic() => std::panic::resume_unwind(err.into_panic()),
            Err(err) => Err(ParseError::Interrupted(err.to_string())),
        }
    }

    pub fn cache(&self) -> Option<&Arc<DescriptorCache>> {
        self.cache.as_ref()
    }

    pub fn registry(&self) -> &StrategyRegistry {
        &self.registry
    }

    pub fn metrics(&self) -> ParserMetrics {
        self.counters.snapshot()
    }

    fn decode_and_dispatch(&self, json: &str) -> Result<ComponentDescriptor> {
        Counters::bump(&self.counters.decodes);
        let root: Value = serde_json::from_str(json)?;
        self.dispatch(&root, ROOT_PATH)
    }
}

impl Dispatcher for DescriptorParser {
    fn dispatch(&self, node: &Value, path: &str) -> Result<ComponentDescriptor> {
        Counters::bump(&self.counters.dispatches);
        self.registry.route(node, path, self)
    }
}

/// Builder for [`DescriptorParser`]
#[derive(Debug, Default)]
pub struct DescriptorParserBuilder {
    config: ParserConfig,
    shared_cache: Option<Arc<DescriptorCache>>,
    registry: Option<StrategyRegistry>,
}

impl DescriptorParserBuilder {
    #[must_use]
    pub fn config(mut self, config: ParserConfig) -> Self {
        self.config = config;
        self
    }

    /// Use an existing cache instead of creating one; capacity comes from the cache
    #[must_use]
    pub fn shared_cache(mut self, cache: Arc<DescriptorCache>) -> Self {
        self.shared_cache = Some(cache);
        self
    }

    /// Replace the default registry
    #[must_use]
    pub fn registry(mut self, registry: StrategyRegistry) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Append a strategy after the current ones
    #[must_use]
    pub fn strategy(mut self, strategy: impl ParseStrategy + 'static) -> Self {
        self.registry
            .get_or_insert_with(StrategyRegistry::with_defaults)
            .register(strategy);
        self
    }

    /// Prepend a strategy ahead of the current ones
    #[must_use]
    pub fn strategy_first(mut self, strategy: impl ParseStrategy + 'static) -> Self {
        self.registry
            .get_or_insert_with(StrategyRegistry::with_defaults)
            .register_first(strategy);
        self
    }

    pub fn build(self) -> Result<DescriptorParser> {
        self.config.validate().map_err(ParseError::invalid_config)?;

        let registry = self.registry.unwrap_or_default();
        let uncovered = registry.uncovered();
        if !uncovered.is_empty() {
            log::warn!("no strategy registered for {uncovered:?}; parsing them will fail");
        }

        let cache = if self.config.cache_enabled {
            Some(
                self.shared_cache
                    .unwrap_or_else(|| Arc::new(DescriptorCache::new(self.config.cache_capacity))),
            )
        } else {
            None
        };

        Ok(DescriptorParser {
            registry,
            cache,
            counters: Counters::default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strategy::ComponentNode;
    use pretty_assertions::assert_eq;
    use sdui_protocol::ComponentType;

    struct Rejecting;

    impl ParseStrategy for Rejecting {
        fn name(&self) -> &'static str {
            "rejecting"
        }

        fn can_handle(&self, component_type: ComponentType) -> bool {
            component_type == ComponentType::Image
        }

        fn parse(
            &self,
            node: ComponentNode<'_>,
            _dispatcher: &dyn Dispatcher,
        ) -> Result<ComponentDescriptor> {
            Err(ParseError::invalid_node(node.path, "images are not allowed here"))
        }
    }

    /// Builds buttons with a child attached
    struct LeafWithChild;

    impl ParseStrategy for LeafWithChild {
        fn name(&self) -> &'static str {
            "leaf-with-child"
        }

        fn can_handle(&self, component_type: ComponentType) -> bool {
            component_type == ComponentType::Button
        }

        fn parse(
            &self,
            node: ComponentNode<'_>,
            _dispatcher: &dyn Dispatcher,
        ) -> Result<ComponentDescriptor> {
            Ok(ComponentDescriptor::layout(
                node.component_type,
                node.properties(),
                vec![ComponentDescriptor::atomic(
                    ComponentType::Text,
                    serde_json::Map::new(),
                )],
            ))
        }
    }

    #[test]
    fn test_second_parse_hits_cache() {
        let parser = DescriptorParser::default();
        let json = r#"{"type":"column","children":[{"type":"text"},{"type":"text"}]}"#;

        let first = parser.parse(json).unwrap();
        let after_first = parser.metrics();
        assert_eq!(after_first.decodes, 1);
        assert_eq!(after_first.dispatches, 3);

        let second = parser.parse(json).unwrap();
        assert_eq!(first, second);
        assert!(Arc::ptr_eq(&first, &second));

        let after_second = parser.metrics();
        assert_eq!(after_second.requests, 2);
        assert_eq!(after_second.cache_hits, 1);
        assert_eq!(after_second.decodes, after_first.decodes);
        assert_eq!(after_second.dispatches, after_first.dispatches);
    }

    #[test]
    fn test_whitespace_variant_is_a_separate_entry() {
        let parser = DescriptorParser::default();
        let a = parser.parse(r#"{"type":"text"}"#).unwrap();
        let b = parser.parse(r#"{ "type": "text" }"#).unwrap();
        assert_eq!(a, b);
        assert!(!Arc::ptr_eq(&a, &b));
        assert_eq!(parser.cache().map(|c| c.size()), Some(2));
        assert_eq!(parser.metrics().decodes, 2);
    }

    #[test]
    fn test_failed_child_does_not_pollute_cache() {
        let parser = DescriptorParser::builder()
            .strategy_first(Rejecting)
            .build()
            .unwrap();
        let json = r#"{"type":"row","children":[{"type":"text"},{"type":"image"}]}"#;

        let err = parser.parse(json).unwrap_err();
        assert_eq!(
            err,
            ParseError::invalid_node("/children/1", "images are not allowed here")
        );
        assert_eq!(parser.cache().map(|c| c.size()), Some(0));
    }

    #[test]
    fn test_atomic_with_children_is_rejected_and_not_cached() {
        let parser = DescriptorParser::builder()
            .strategy_first(LeafWithChild)
            .build()
            .unwrap();

        let err = parser.parse(r#"{"type":"button"}"#).unwrap_err();
        assert!(matches!(err, ParseError::InvalidNode { ref path, .. } if path.is_empty()));
        assert_eq!(parser.cache().map(|c| c.size()), Some(0));

        let err = parser
            .parse(r#"{"type":"column","children":[{"type":"button"}]}"#)
            .unwrap_err();
        assert!(matches!(err, ParseError::InvalidNode { ref path, .. } if path == "/children/0"));
        assert_eq!(parser.cache().map(|c| c.size()), Some(0));
    }

    #[test]
    fn test_empty_registry_reports_unsupported_type() {
        let parser = DescriptorParser::builder()
            .registry(StrategyRegistry::empty())
            .build()
            .unwrap();

        let err = parser.parse(r#"{"type":"text"}"#).unwrap_err();
        assert_eq!(err, ParseError::UnsupportedType(ComponentType::Text));
        assert_eq!(parser.cache().map(|c| c.size()), Some(0));
        assert_eq!(parser.metrics().cache_hits, 0);
    }

    #[test]
    fn test_uncached_config() {
        let parser = DescriptorParser::new(ParserConfig::uncached()).unwrap();
        assert!(parser.cache().is_none());
        parser.parse(r#"{"type":"fit"}"#).unwrap();
        parser.parse(r#"{"type":"fit"}"#).unwrap();
        let metrics = parser.metrics();
        assert_eq!(metrics.decodes, 2);
        assert_eq!(metrics.cache_hits, 0);
    }

    #[test]
    fn test_parse_uncached_bypasses_cache() {
        let parser = DescriptorParser::default();
        let tree = parser.parse_uncached(r#"{"type":"spacer","height":8}"#).unwrap();
        assert_eq!(tree.component_type(), ComponentType::Spacer);
        assert_eq!(parser.cache().map(|c| c.size()), Some(0));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let err = DescriptorParser::new(ParserConfig::with_capacity(0)).unwrap_err();
        assert!(matches!(err, ParseError::InvalidConfig(_)));
    }

    #[test]
    fn test_shared_cache_between_parsers() {
        let cache = Arc::new(DescriptorCache::new(8));
        let a = DescriptorParser::builder()
            .shared_cache(Arc::clone(&cache))
            .build()
            .unwrap();
        let b = DescriptorParser::builder()
            .shared_cache(Arc::clone(&cache))
            .build()
            .unwrap();

        a.parse(r#"{"type":"divider"}"#).unwrap();
        b.parse(r#"{"type":"divider"}"#).unwrap();
        assert_eq!(a.metrics().decodes, 1);
        assert_eq!(b.metrics().decodes, 0);
        assert_eq!(b.metrics().cache_hits, 1);
        assert_eq!(cache.size(), 1);
    }

    #[tokio::test]
    async fn test_parse_async_matches_sync() {
        let parser = Arc::new(DescriptorParser::default());
        let json = r#"{"type":"box","children":[{"type":"image","src":"a.png"}]}"#;
        let from_async = Arc::clone(&parser)
            .parse_async(json.to_string())
            .await
            .unwrap();
        let from_sync = parser.parse(json).unwrap();
        assert!(Arc::ptr_eq(&from_async, &from_sync));
    }
}
