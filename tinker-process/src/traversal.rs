//! The traversal object strategies are applied to.
//!
//! Step construction proper lives in the fluent builder; this type only
//! keeps what the strategy pipeline and the remote boundary need: the
//! compiled bytecode, the registry inherited from the source, and the
//! traversers once results are in.

use compact_str::CompactString;

use tinker_core::bytecode::Bytecode;
use tinker_core::error::TinkerResult;
use tinker_core::types::Value;
use tinker_structure::GraphObject;

use crate::strategies::TraversalStrategies;

/// A result object together with how many times it was produced.
#[derive(Clone, Debug, PartialEq)]
pub struct Traverser {
    pub object: GraphObject,
    pub bulk: u64,
}

impl Traverser {
    pub fn new(object: impl Into<GraphObject>, bulk: u64) -> Self {
        Self {
            object: object.into(),
            bulk,
        }
    }

    pub fn single(object: impl Into<GraphObject>) -> Self {
        Self::new(object, 1)
    }
}

/// A traversal under construction or awaiting results.
#[derive(Clone, Debug)]
pub struct Traversal {
    bytecode: Bytecode,
    strategies: TraversalStrategies,
    traversers: Option<Vec<Traverser>>,
    // Outcome of the one and only strategy run.
    applied: Option<TinkerResult<()>>,
    // (traverser index, copies of it already emitted)
    cursor: (usize, u64),
}

impl Traversal {
    pub fn new(strategies: TraversalStrategies, bytecode: Bytecode) -> Self {
        Self {
            bytecode,
            strategies,
            traversers: None,
            applied: None,
            cursor: (0, 0),
        }
    }

    /// A traversal with no source and no strategies, for nested use.
    pub fn anonymous() -> Self {
        Self::new(TraversalStrategies::new(), Bytecode::new())
    }

    /// Append a step and return the traversal.
    pub fn step(mut self, operator: impl Into<CompactString>, arguments: Vec<Value>) -> Self {
        self.add_step(operator, arguments);
        self
    }

    pub fn add_step(&mut self, operator: impl Into<CompactString>, arguments: Vec<Value>) {
        self.bytecode.add_step(operator, arguments);
    }

    pub fn bytecode(&self) -> &Bytecode {
        &self.bytecode
    }

    pub fn bytecode_mut(&mut self) -> &mut Bytecode {
        &mut self.bytecode
    }

    /// The finalized, wire-ready form of this traversal.
    pub fn lower(&self) -> Bytecode {
        self.bytecode.clone()
    }

    pub fn strategies(&self) -> &TraversalStrategies {
        &self.strategies
    }

    pub fn traversers(&self) -> Option<&[Traverser]> {
        self.traversers.as_deref()
    }

    pub fn set_traversers(&mut self, traversers: Vec<Traverser>) {
        self.traversers = Some(traversers);
        self.cursor = (0, 0);
    }

    /// Run every registered strategy, once, in registration order.
    ///
    /// The outcome is kept: later calls return it without running anything,
    /// so a failed chain is never retried on a half-modified traversal.
    pub async fn apply_strategies(&mut self) -> TinkerResult<()> {
        if let Some(outcome) = &self.applied {
            return outcome.clone();
        }
        let strategies = self.strategies.clone();
        let outcome = strategies.apply_strategies(self).await;
        self.applied = Some(outcome.clone());
        outcome
    }

    /// Next result, applying strategies first if needed.
    pub async fn next(&mut self) -> TinkerResult<Option<GraphObject>> {
        self.apply_strategies().await?;
        Ok(self.advance())
    }

    /// All remaining results, bulk expanded.
    pub async fn to_list(&mut self) -> TinkerResult<Vec<GraphObject>> {
        self.apply_strategies().await?;
        let mut out = Vec::new();
        while let Some(obj) = self.advance() {
            out.push(obj);
        }
        Ok(out)
    }

    /// Apply strategies and drain the results without collecting them.
    pub async fn iterate(&mut self) -> TinkerResult<()> {
        self.apply_strategies().await?;
        while self.advance().is_some() {}
        Ok(())
    }

    fn advance(&mut self) -> Option<GraphObject> {
        let traversers = self.traversers.as_ref()?;
        loop {
            let (index, emitted) = self.cursor;
            let traverser = traversers.get(index)?;
            if emitted < traverser.bulk {
                self.cursor = (index, emitted + 1);
                return Some(traverser.object.clone());
            }
            self.cursor = (index + 1, 0);
        }
    }
}
