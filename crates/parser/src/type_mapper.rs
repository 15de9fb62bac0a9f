use sdui_protocol::ComponentType;
use serde_json::{Map, Value};

/// Key holding a node's component type
pub const TYPE_KEY: &str = "type";

/// Maps free-form type tags onto [`ComponentType`]
///
/// The mapping is total: a tag that is missing, null, not a string, or not an
/// exact case-sensitive match resolves to [`ComponentType::DEFAULT`].
#[derive(Debug, Clone, Copy, Default)]
pub struct TypeMapper;

impl TypeMapper {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    #[must_use]
    pub fn map(&self, raw: Option<&str>) -> ComponentType {
        match raw {
            Some(tag) => ComponentType::from_tag(tag).unwrap_or_else(|| {
                log::warn!(
                    "unknown component type {tag:?}, using {}",
                    ComponentType::DEFAULT
                );
                ComponentType::DEFAULT
            }),
            None => ComponentType::DEFAULT,
        }
    }

    /// Resolve the `type` field of a component object
    #[must_use]
    pub fn resolve(&self, node: &Map<String, Value>) -> ComponentType {
        match node.get(TYPE_KEY) {
            Some(Value::String(tag)) => self.map(Some(tag)),
            None | Some(Value::Null) => {
                log::debug!("component without type, using {}", ComponentType::DEFAULT);
                self.map(None)
            }
            Some(other) => {
                log::warn!(
                    "non-string component type {other}, using {}",
                    ComponentType::DEFAULT
                );
                self.map(None)
            }
        }
    }
}
