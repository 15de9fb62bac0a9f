use crate::component::ComponentType;
use crate::ports::StyleResolver;
use schemars::JsonSchema;
use serde::Serialize;
use serde_json::{Map, Value};

/// Property holding the style declaration handed to a [`StyleResolver`]
pub const STYLE_PROPERTY: &str = "style";

/// One node of a parsed layout tree
///
/// Descriptors are immutable once built. Atomic kinds never carry children;
/// layout kinds keep their children in declared order.
#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
pub struct ComponentDescriptor {
    #[serde(rename = "type")]
    component_type: ComponentType,

    /// Raw properties as declared in the source document
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    properties: Map<String, Value>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    children: Vec<ComponentDescriptor>,
}

impl ComponentDescriptor {
    /// Create a descriptor without children
    #[must_use]
    pub fn atomic(component_type: ComponentType, properties: Map<String, Value>) -> Self {
        Self {
            component_type,
            properties,
            children: Vec::new(),
        }
    }

    /// Create a container descriptor owning `children`
    ///
    /// Passing an atomic kind with children builds a tree that fails
    /// [`Self::is_well_formed`]; the parser rejects such output.
    #[must_use]
    pub fn layout(
        component_type: ComponentType,
        properties: Map<String, Value>,
        children: Vec<ComponentDescriptor>,
    ) -> Self {
        Self {
            component_type,
            properties,
            children,
        }
    }

    #[must_use]
    pub const fn component_type(&self) -> ComponentType {
        self.component_type
    }

    #[must_use]
    pub const fn properties(&self) -> &Map<String, Value> {
        &self.properties
    }

    #[must_use]
    pub fn children(&self) -> &[ComponentDescriptor] {
        &self.children
    }

    #[must_use]
    pub const fn is_layout(&self) -> bool {
        self.component_type.is_layout()
    }

    #[must_use]
    pub const fn is_atomic(&self) -> bool {
        self.component_type.is_atomic()
    }

    /// Whether no atomic node anywhere in this subtree carries children
    #[must_use]
    pub fn is_well_formed(&self) -> bool {
        (self.is_layout() || self.children.is_empty())
            && self.children.iter().all(ComponentDescriptor::is_well_formed)
    }

    /// Look up a single raw property
    #[must_use]
    pub fn property(&self, name: &str) -> Option<&Value> {
        self.properties.get(name)
    }

    /// The `style` object, if one was declared
    #[must_use]
    pub fn style_properties(&self) -> Option<&Map<String, Value>> {
        self.properties.get(STYLE_PROPERTY).and_then(Value::as_object)
    }

    /// Hand the declared style to `resolver`
    pub fn resolve_style<R: StyleResolver + ?Sized>(&self, resolver: &R) -> Option<R::Handle> {
        self.style_properties().map(|style| resolver.resolve(style))
    }

    /// Total number of nodes in this subtree, including `self`
    #[must_use]
    pub fn node_count(&self) -> usize {
        1 + self
            .children
            .iter()
            .map(ComponentDescriptor::node_count)
            .sum::<usize>()
    }

    /// Height of the subtree; a lone node has depth 1
    #[must_use]
    pub fn depth(&self) -> usize {
        1 + self
            .children
            .iter()
            .map(ComponentDescriptor::depth)
            .max()
            .unwrap_or(0)
    }

    /// Visit every node pre-order, children in declared order
    ///
    /// The visitor receives the node depth, starting at 0 for `self`.
    pub fn walk<F>(&self, mut visitor: F)
    where
        F: FnMut(usize, &ComponentDescriptor),
    {
        self.walk_inner(0, &mut visitor);
    }

    fn walk_inner<F>(&self, depth: usize, visitor: &mut F)
    where
        F: FnMut(usize, &ComponentDescriptor),
    {
        visitor(depth, self);
        for child in &self.children {
            child.walk_inner(depth + 1, visitor);
        }
    }
}
