use crate::error::{ParseError, Result};
use crate::type_mapper::TYPE_KEY;
use sdui_protocol::{ComponentDescriptor, ComponentType};
use serde_json::{Map, Value};

/// Key holding a layout's ordered child nodes
pub const CHILDREN_KEY: &str = "children";

/// Routes a raw JSON node to the strategy that can parse it
///
/// Strategies call back into the dispatcher for every child, so a tree can
/// mix layout and atomic nodes at any depth.
pub trait Dispatcher {
    /// Parse `node`, located at JSON-pointer `path` within the document
    fn dispatch(&self, node: &Value, path: &str) -> Result<ComponentDescriptor>;
}

/// A component object whose type has already been resolved
#[derive(Debug, Clone, Copy)]
pub struct ComponentNode<'a> {
    pub component_type: ComponentType,
    pub fields: &'a Map<String, Value>,
    pub path: &'a str,
}

impl ComponentNode<'_> {
    /// Every declared field except the reserved `type` and `children`
    #[must_use]
    pub fn properties(&self) -> Map<String, Value> {
        self.fields
            .iter()
            .filter(|(key, _)| key.as_str() != TYPE_KEY && key.as_str() != CHILDREN_KEY)
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect()
    }

    /// The `children` array; absent or null means no children
    pub fn children(&self) -> Result<&[Value]> {
        match self.fields.get(CHILDREN_KEY) {
            None | Some(Value::Null) => Ok(&[]),
            Some(Value::Array(items)) => Ok(items.as_slice()),
            Some(other) => Err(ParseError::invalid_node(
                self.path,
                format!("\"children\" must be an array, found {}", json_kind(other)),
            )),
        }
    }

    #[must_use]
    pub fn child_path(&self, index: usize) -> String {
        format!("{}/{CHILDREN_KEY}/{index}", self.path)
    }
}

/// Parses one family of component kinds
pub trait ParseStrategy: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &'static str;

    /// Whether this strategy parses `component_type`; must be pure
    fn can_handle(&self, component_type: ComponentType) -> bool;

    /// Build a fully materialized descriptor for `node`
    fn parse(&self, node: ComponentNode<'_>, dispatcher: &dyn Dispatcher)
        -> Result<ComponentDescriptor>;
}

/// Parses container kinds and recurses into their children in order
#[derive(Debug, Clone, Copy, Default)]
pub struct LayoutStrategy;

impl ParseStrategy for LayoutStrategy {
    fn name(&self) -> &'static str {
        "layout"
    }

    fn can_handle(&self, component_type: ComponentType) -> bool {
        component_type.is_layout()
    }

    fn parse(
        &self,
        node: ComponentNode<'_>,
        dispatcher: &dyn Dispatcher,
    ) -> Result<ComponentDescriptor> {
        let items = node.children()?;
        let mut children = Vec::with_capacity(items.len());
        for (index, child) in items.iter().enumerate() {
            let path = node.child_path(index);
            log::trace!("dispatching {path}");
            children.push(dispatcher.dispatch(child, &path)?);
        }
        Ok(ComponentDescriptor::layout(
            node.component_type,
            node.properties(),
            children,
        ))
    }
}

/// Parses leaf kinds; any declared children are ignored
#[derive(Debug, Clone, Copy, Default)]
pub struct AtomicStrategy;

impl ParseStrategy for AtomicStrategy {
    fn name(&self) -> &'static str {
        "atomic"
    }

    fn can_handle(&self, component_type: ComponentType) -> bool {
        component_type.is_atomic()
    }

    fn parse(
        &self,
        node: ComponentNode<'_>,
        _dispatcher: &dyn Dispatcher,
    ) -> Result<ComponentDescriptor> {
        if matches!(node.fields.get(CHILDREN_KEY), Some(v) if !v.is_null()) {
            log::warn!(
                "ignoring children on atomic {} at {}",
                node.component_type,
                if node.path.is_empty() { "/" } else { node.path }
            );
        }
        Ok(ComponentDescriptor::atomic(
            node.component_type,
            node.properties(),
        ))
    }
}

pub(crate) fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::cell::RefCell;

    /// Records dispatched paths and answers with a bare text leaf
    #[derive(Default)]
    struct Recorder {
        paths: RefCell<Vec<String>>,
    }

    impl Dispatcher for Recorder {
        fn dispatch(&self, _node: &Value, path: &str) -> Result<ComponentDescriptor> {
            self.paths.borrow_mut().push(path.to_string());
            Ok(ComponentDescriptor::atomic(ComponentType::Text, Map::new()))
        }
    }

    struct Failing;

    impl Dispatcher for Failing {
        fn dispatch(&self, _node: &Value, path: &str) -> Result<ComponentDescriptor> {
            Err(ParseError::invalid_node(path, "boom"))
        }
    }

    fn fields(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap_or_default()
    }

    fn node<'a>(kind: ComponentType, fields: &'a Map<String, Value>) -> ComponentNode<'a> {
        ComponentNode {
            component_type: kind,
            fields,
            path: "",
        }
    }

    #[test]
    fn test_strategies_partition_types() {
        for kind in ComponentType::ALL {
            let claims = [
                LayoutStrategy.can_handle(kind),
                AtomicStrategy.can_handle(kind),
            ];
            assert_eq!(claims.iter().filter(|c| **c).count(), 1, "{kind}");
        }
    }

    #[test]
    fn test_properties_skip_reserved_keys() {
        let f = fields(json!({
            "type": "button",
            "label": "Buy",
            "enabled": true,
            "style": {"color": "#fff"},
            "children": []
        }));
        let props = node(ComponentType::Button, &f).properties();
        assert_eq!(
            Value::Object(props),
            json!({"label": "Buy", "enabled": true, "style": {"color": "#fff"}})
        );
    }

    #[test]
    fn test_layout_dispatches_children_in_order() {
        let f = fields(json!({
            "type": "row",
            "spacing": 4,
            "children": [{"type": "text"}, {"type": "image"}, {"type": "button"}]
        }));
        let recorder = Recorder::default();
        let parsed = LayoutStrategy
            .parse(node(ComponentType::Row, &f), &recorder)
            .unwrap();

        assert_eq!(parsed.children().len(), 3);
        assert_eq!(parsed.property("spacing"), Some(&json!(4)));
        assert_eq!(
            *recorder.paths.borrow(),
            vec!["/children/0", "/children/1", "/children/2"]
        );
    }

    #[test]
    fn test_layout_without_children() {
        for f in [fields(json!({"type": "box"})), fields(json!({"children": null}))] {
            let parsed = LayoutStrategy
                .parse(node(ComponentType::Box, &f), &Failing)
                .unwrap();
            assert!(parsed.children().is_empty());
        }
    }

    #[test]
    fn test_layout_rejects_non_array_children() {
        let f = fields(json!({"children": {"type": "text"}}));
        let err = LayoutStrategy
            .parse(node(ComponentType::Column, &f), &Recorder::default())
            .unwrap_err();
        assert!(
            matches!(err, ParseError::InvalidNode { ref reason, .. } if reason.contains("an object"))
        );
    }

    #[test]
    fn test_layout_propagates_child_failure() {
        let f = fields(json!({"children": [{"type": "text"}]}));
        let err = LayoutStrategy
            .parse(node(ComponentType::Column, &f), &Failing)
            .unwrap_err();
        assert_eq!(err, ParseError::invalid_node("/children/0", "boom"));
    }

    #[test]
    fn test_atomic_ignores_children() {
        let f = fields(json!({"type": "text", "text": "hi", "children": [{"type": "text"}]}));
        let recorder = Recorder::default();
        let parsed = AtomicStrategy
            .parse(node(ComponentType::Text, &f), &recorder)
            .unwrap();
        assert!(parsed.children().is_empty());
        assert!(parsed.property(CHILDREN_KEY).is_none());
        assert_eq!(parsed.property("text"), Some(&json!("hi")));
        assert!(recorder.paths.borrow().is_empty());
    }
}
