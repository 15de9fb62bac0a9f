use crate::error::{ParseError, Result};
use crate::strategy::{
    json_kind, AtomicStrategy, ComponentNode, Dispatcher, LayoutStrategy, ParseStrategy,
};
use crate::type_mapper::TypeMapper;
use sdui_protocol::{ComponentDescriptor, ComponentType};
use serde_json::Value;

/// Ordered set of strategies; the first one claiming a type wins
pub struct StrategyRegistry {
    strategies: Vec<Box<dyn ParseStrategy>>,
    mapper: TypeMapper,
}

impl Default for StrategyRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl std::fmt::Debug for StrategyRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StrategyRegistry")
            .field("strategies", &self.names())
            .finish()
    }
}

impl StrategyRegistry {
    /// Registry with no strategies; every dispatch fails until one is added
    #[must_use]
    pub fn empty() -> Self {
        Self {
            strategies: Vec::new(),
            mapper: TypeMapper::new(),
        }
    }

    /// Layout strategy followed by the atomic strategy
    #[must_use]
    pub fn with_defaults() -> Self {
        let mut registry = Self::empty();
        registry.register(LayoutStrategy);
        registry.register(AtomicStrategy);
        registry
    }

    /// Append a strategy; it is consulted after every existing one
    pub fn register(&mut self, strategy: impl ParseStrategy + 'static) {
        self.strategies.push(Box::new(strategy));
    }

    /// Prepend a strategy so it takes precedence over existing ones
    pub fn register_first(&mut self, strategy: impl ParseStrategy + 'static) {
        self.strategies.insert(0, Box::new(strategy));
    }

    /// Strategy names in consultation order
    #[must_use]
    pub fn names(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.strategies.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }

    /// First strategy claiming `component_type`
    #[must_use]
    pub fn select(&self, component_type: ComponentType) -> Option<&dyn ParseStrategy> {
        self.strategies
            .iter()
            .find(|strategy| strategy.can_handle(component_type))
            .map(|strategy| &**strategy)
    }

    /// Kinds no registered strategy claims
    #[must_use]
    pub fn uncovered(&self) -> Vec<ComponentType> {
        ComponentType::ALL
            .into_iter()
            .filter(|kind| self.select(*kind).is_none())
            .collect()
    }

    /// Resolve `node`'s type and hand it to the matching strategy
    ///
    /// Children are routed back through `dispatcher`, which lets a wrapper
    /// (such as the parser facade) observe every node.
    pub fn route(
        &self,
        node: &Value,
        path: &str,
        dispatcher: &dyn Dispatcher,
    ) -> Result<ComponentDescriptor> {
        let Some(fields) = node.as_object() else {
            return Err(ParseError::invalid_node(
                path,
                format!("expected a component object, found {}", json_kind(node)),
            ));
        };

        let component_type = self.mapper.resolve(fields);
        let Some(strategy) = self.select(component_type) else {
            return Err(ParseError::UnsupportedType(component_type));
        };
        log::debug!(
            "{} strategy parsing {component_type} at {}",
            strategy.name(),
            if path.is_empty() { "/" } else { path }
        );

        let parsed = strategy.parse(
            ComponentNode {
                component_type,
                fields,
                path,
            },
            dispatcher,
        )?;
        check_output(strategy.name(), component_type, &parsed, path)?;
        Ok(parsed)
    }
}

/// Strategy output must keep the resolved type and leave atomic nodes childless
fn check_output(
    strategy: &str,
    expected: ComponentType,
    parsed: &ComponentDescriptor,
    path: &str,
) -> Result<()> {
    if parsed.component_type() != expected {
        return Err(ParseError::invalid_node(
            path,
            format!(
                "{strategy} strategy produced {} for a node of type {expected}",
                parsed.component_type()
            ),
        ));
    }
    if !parsed.is_well_formed() {
        return Err(ParseError::invalid_node(
            path,
            format!("{strategy} strategy attached children to an atomic component"),
        ));
    }
    Ok(())
}

impl Dispatcher for StrategyRegistry {
    fn dispatch(&self, node: &Value, path: &str) -> Result<ComponentDescriptor> {
        self.route(node, path, self)
    }
}
