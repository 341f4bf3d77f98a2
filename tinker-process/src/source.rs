//! Traversal sources: the context that owns a strategy registry and spawns
//! traversals.
//!
//! Every `with_*`/`without_*` call derives a new source. The derived source
//! gets its own copy of the registry, so configuring it never changes the
//! source it came from.

use std::fmt;
use std::sync::Arc;

use compact_str::CompactString;

use tinker_core::bytecode::Bytecode;
use tinker_core::config::TinkerConfig;
use tinker_core::error::TinkerResult;
use tinker_core::types::Value;

use crate::remote::{RemoteConnection, RemoteStrategy};
use crate::strategies::TraversalStrategies;
use crate::strategy::{Configuration, Strategy, TraversalStrategy};
use crate::traversal::Traversal;

/// An empty graph handle, only good for spawning traversal sources.
#[derive(Clone, Copy, Debug, Default)]
pub struct Graph;

impl Graph {
    pub fn traversal(&self) -> GraphTraversalSource {
        GraphTraversalSource::new(TraversalStrategies::new())
    }
}

impl fmt::Display for Graph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("graph[]")
    }
}

/// Spawns traversals that inherit this source's strategies.
#[derive(Clone, Debug)]
pub struct GraphTraversalSource {
    strategies: TraversalStrategies,
    bytecode: Bytecode,
}

impl GraphTraversalSource {
    pub fn new(strategies: TraversalStrategies) -> Self {
        Self {
            strategies,
            bytecode: Bytecode::new(),
        }
    }

    /// A source with `strategies.defaults` registered in file order.
    pub fn from_config(config: &TinkerConfig) -> TinkerResult<Self> {
        let mut strategies = TraversalStrategies::new();
        for entry in &config.strategies.defaults {
            let strategy =
                Strategy::from_name(&entry.name, Configuration::from(entry.options.clone()))?;
            tracing::debug!("registering default strategy {}", strategy.kind());
            strategies.add_strategy(strategy);
        }
        Ok(Self::new(strategies))
    }

    pub fn strategies(&self) -> &TraversalStrategies {
        &self.strategies
    }

    pub fn bytecode(&self) -> &Bytecode {
        &self.bytecode
    }

    fn derive(&self) -> Self {
        Self {
            strategies: TraversalStrategies::from_parent(&self.strategies),
            bytecode: self.bytecode.clone(),
        }
    }

    pub fn with_strategy<S>(&self, strategy: S) -> Self
    where
        S: TraversalStrategy + 'static,
    {
        let mut source = self.derive();
        source.strategies.add_strategy(strategy);
        source
    }

    pub fn with_strategies<I>(&self, strategies: I) -> Self
    where
        I: IntoIterator<Item = Arc<dyn TraversalStrategy>>,
    {
        let mut source = self.derive();
        for strategy in strategies {
            source.strategies.add_shared(strategy);
        }
        source
    }

    /// Drop the first strategy with each given identifier; absent ones are ignored.
    pub fn without_strategies<'a, I>(&self, strategies: I) -> Self
    where
        I: IntoIterator<Item = &'a dyn TraversalStrategy>,
    {
        let mut source = self.derive();
        for strategy in strategies {
            source.strategies.remove_strategy(strategy);
        }
        source
    }

    pub fn without_strategy(&self, strategy: &dyn TraversalStrategy) -> Self {
        self.without_strategies([strategy])
    }

    /// Execute traversals through `connection`. Registered last, so every
    /// other strategy has run by the time the request goes out.
    pub fn with_remote(&self, connection: Arc<dyn RemoteConnection>) -> Self {
        self.with_strategy(RemoteStrategy::new(connection))
    }

    pub fn with_side_effect(&self, key: impl Into<CompactString>, value: impl Into<Value>) -> Self {
        let mut source = self.derive();
        source
            .bytecode
            .add_source("withSideEffect", vec![Value::String(key.into()), value.into()]);
        source
    }

    /// A new traversal carrying this source's instructions and a copy of its
    /// registry as it is now.
    pub fn traversal(&self) -> Traversal {
        Traversal::new(
            TraversalStrategies::from_parent(&self.strategies),
            self.bytecode.clone(),
        )
    }

    pub fn v(&self, ids: Vec<Value>) -> Traversal {
        self.traversal().step("V", ids)
    }

    pub fn e(&self, ids: Vec<Value>) -> Traversal {
        self.traversal().step("E", ids)
    }

    pub fn inject(&self, values: Vec<Value>) -> Traversal {
        self.traversal().step("inject", values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strategy::StrategyKind;
    use tinker_core::error::TinkerError;

    fn fqcns(source: &GraphTraversalSource) -> Vec<String> {
        source
            .strategies()
            .iter()
            .map(|s| s.fqcn().to_string())
            .collect()
    }

    #[test]
    fn test_graph_display_and_traversal() {
        assert_eq!(Graph.to_string(), "graph[]");
        let g = Graph.traversal();
        assert!(g.strategies().is_empty());
        assert!(g.bytecode().is_empty());
    }

    #[test]
    fn test_derived_sources_do_not_touch_parent() {
        let g = Graph.traversal().with_strategy(Strategy::read_only());
        let before = fqcns(&g);

        let derived = g
            .with_strategy(Strategy::seed(1))
            .without_strategy(&Strategy::read_only());
        assert_eq!(fqcns(&g), before);
        assert_eq!(fqcns(&derived), vec![Strategy::seed(1).fqcn().to_string()]);
    }

    #[test]
    fn test_with_strategies_keeps_order() {
        let g = Graph.traversal().with_strategies([
            Arc::new(Strategy::count()) as Arc<dyn TraversalStrategy>,
            Arc::new(Strategy::read_only()) as Arc<dyn TraversalStrategy>,
            Arc::new(Strategy::count()) as Arc<dyn TraversalStrategy>,
        ]);
        assert_eq!(
            fqcns(&g),
            vec![
                Strategy::count().fqcn().to_string(),
                Strategy::read_only().fqcn().to_string(),
                Strategy::count().fqcn().to_string(),
            ]
        );

        let trimmed = g.without_strategies([&Strategy::count() as &dyn TraversalStrategy]);
        assert_eq!(trimmed.strategies().len(), 2);
        assert_eq!(
            trimmed.strategies().iter().next().unwrap().fqcn(),
            Strategy::read_only().fqcn()
        );
    }

    #[test]
    fn test_spawned_traversal_takes_a_copy() {
        let g = Graph.traversal().with_strategy(Strategy::read_only());
        let t = g.v(vec![Value::Int(1)]);
        assert_eq!(t.strategies().len(), 1);
        assert_eq!(t.bytecode().step_instructions()[0].operator, "V");
        assert_eq!(t.bytecode().step_instructions()[0].arguments, vec![Value::Int(1)]);
    }

    #[test]
    fn test_side_effect_is_a_source_instruction() {
        let g = Graph.traversal().with_side_effect("x", 5);
        let t = g.e(vec![]);
        assert_eq!(t.bytecode().source_instructions()[0].operator, "withSideEffect");
        assert_eq!(t.bytecode().step_instructions()[0].operator, "E");
        assert!(Graph.traversal().bytecode().is_empty());
    }

    #[test]
    fn test_from_config_registers_defaults_in_order() {
        let config = TinkerConfig::from_toml_str(
            r#"
[strategies]
defaults = [
  { name = "SeedStrategy", options = { seed = 7 } },
  { name = "ReadOnlyStrategy" },
  { name = "org.apache.tinkerpop.gremlin.process.traversal.strategy.verification.ReservedKeysVerificationStrategy" },
]
"#,
        )
        .unwrap();
        let g = GraphTraversalSource::from_config(&config).unwrap();
        assert_eq!(
            fqcns(&g),
            vec![
                StrategyKind::Seed.fqcn().to_string(),
                StrategyKind::ReadOnly.fqcn().to_string(),
                StrategyKind::ReservedKeysVerification.fqcn().to_string(),
            ]
        );
        let reserved = g.strategies().iter().nth(2).unwrap();
        assert_eq!(
            reserved.configuration().and_then(|c| c.get("keys")),
            Some(&Value::string_list(["id", "label"]))
        );
    }

    #[test]
    fn test_from_config_rejects_bad_defaults() {
        let unknown = TinkerConfig::from_toml_str(
            r#"
[strategies]
defaults = [{ name = "NoSuchStrategy" }]
"#,
        )
        .unwrap();
        assert!(matches!(
            GraphTraversalSource::from_config(&unknown),
            Err(TinkerError::UnknownStrategy(_))
        ));

        let malformed = TinkerConfig::from_toml_str(
            r#"
[strategies]
defaults = [{ name = "SeedStrategy", options = { seed = "seven" } }]
"#,
        )
        .unwrap();
        assert!(matches!(
            GraphTraversalSource::from_config(&malformed),
            Err(TinkerError::InvalidStrategyConfig { .. })
        ));
    }
}
