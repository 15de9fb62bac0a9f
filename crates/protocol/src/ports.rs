use serde_json::{Map, Value};
use std::collections::HashMap;

/// Converts a declared style object into whatever the rendering layer draws with
pub trait StyleResolver {
    type Handle;

    fn resolve(&self, style: &Map<String, Value>) -> Self::Handle;
}

/// Supplies raw layout documents by logical name
///
/// Any failure to produce the document (missing file, unreadable bytes) is
/// reported as `None`; the parser only ever sees text to parse.
pub trait AssetSource: Send + Sync {
    fn load(&self, name: &str) -> Option<String>;
}

/// In-memory asset source
#[derive(Debug, Clone, Default)]
pub struct MemoryAssetSource {
    assets: HashMap<String, String>,
}

impl MemoryAssetSource {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: add or replace an asset
    #[must_use]
    pub fn with_asset(mut self, name: impl Into<String>, json: impl Into<String>) -> Self {
        self.insert(name, json);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, json: impl Into<String>) {
        self.assets.insert(name.into(), json.into());
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.assets.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }
}

impl AssetSource for MemoryAssetSource {
    fn load(&self, name: &str) -> Option<String> {
        self.assets.get(name).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ComponentDescriptor, ComponentType};
    use serde_json::json;

    struct KeyCount;

    impl StyleResolver for KeyCount {
        type Handle = usize;

        fn resolve(&self, style: &Map<String, Value>) -> usize {
            style.len()
        }
    }

    #[test]
    fn test_memory_source_reports_absence() {
        let source = MemoryAssetSource::new().with_asset("home", r#"{"type":"column"}"#);
        assert_eq!(source.len(), 1);
        assert_eq!(source.load("home").as_deref(), Some(r#"{"type":"column"}"#));
        assert!(source.load("settings").is_none());
    }

    #[test]
    fn test_resolve_style_through_port() {
        let Value::Object(props) = json!({"style": {"color": "red", "weight": 700}}) else {
            unreachable!()
        };
        let node = ComponentDescriptor::atomic(ComponentType::Text, props);
        assert_eq!(node.resolve_style(&KeyCount), Some(2));

        let bare = ComponentDescriptor::atomic(ComponentType::Spacer, Map::new());
        assert_eq!(bare.resolve_style(&KeyCount), None);
    }
}
