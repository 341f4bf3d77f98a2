//! The strategy registry of a traversal source and its application driver.
//!
//! Order is exactly registration order minus removals: nothing here sorts,
//! deduplicates or reprioritizes. Application walks that order one strategy
//! at a time; strategy `i + 1` does not start before strategy `i`, including
//! any remote round-trip it made, has finished.

use std::sync::Arc;

use tinker_core::error::TinkerResult;

use crate::remote::StrategyRecord;
use crate::strategy::TraversalStrategy;
use crate::traversal::Traversal;

/// Ordered, mutable list of strategies owned by one traversal context.
///
/// Cloning copies the list; the strategies themselves are shared.
#[derive(Clone, Debug, Default)]
pub struct TraversalStrategies {
    strategies: Vec<Arc<dyn TraversalStrategy>>,
}

impl TraversalStrategies {
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry starting from `parent`'s list. Later changes to either side
    /// are not seen by the other.
    pub fn from_parent(parent: &TraversalStrategies) -> Self {
        Self {
            strategies: parent.strategies.clone(),
        }
    }

    /// Append a strategy. The same identifier may be registered twice.
    pub fn add_strategy<S>(&mut self, strategy: S)
    where
        S: TraversalStrategy + 'static,
    {
        self.add_shared(Arc::new(strategy));
    }

    pub fn add_shared(&mut self, strategy: Arc<dyn TraversalStrategy>) {
        self.strategies.push(strategy);
    }

    /// Remove the first strategy whose identifier matches `strategy`'s.
    ///
    /// Returns `None`, leaving the list untouched, when there is no match.
    pub fn remove_strategy(
        &mut self,
        strategy: &dyn TraversalStrategy,
    ) -> Option<Arc<dyn TraversalStrategy>> {
        self.remove_by_fqcn(strategy.fqcn())
    }

    pub fn remove_by_fqcn(&mut self, fqcn: &str) -> Option<Arc<dyn TraversalStrategy>> {
        match self.strategies.iter().position(|s| s.fqcn() == fqcn) {
            Some(idx) => Some(self.strategies.remove(idx)),
            None => {
                tracing::debug!("strategy {} not registered, nothing removed", fqcn);
                None
            }
        }
    }

    pub fn contains(&self, fqcn: &str) -> bool {
        self.strategies.iter().any(|s| s.fqcn() == fqcn)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn TraversalStrategy>> {
        self.strategies.iter()
    }

    pub fn len(&self) -> usize {
        self.strategies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }

    /// What is sent to the engine: `(identifier, configuration)` for every
    /// non-local strategy, in registration order.
    pub fn records(&self) -> Vec<StrategyRecord> {
        self.strategies
            .iter()
            .filter(|s| !s.is_local())
            .map(|s| StrategyRecord::from_strategy(s.as_ref()))
            .collect()
    }

    /// Apply every strategy to `traversal`, strictly one after the other.
    ///
    /// Stops at the first failure and returns it unchanged; the traversal is
    /// left as the failing strategy left it.
    pub async fn apply_strategies(&self, traversal: &mut Traversal) -> TinkerResult<()> {
        let total = self.strategies.len();
        for (i, strategy) in self.strategies.iter().enumerate() {
            tracing::debug!("applying strategy {} ({}/{})", strategy.fqcn(), i + 1, total);
            if let Err(e) = strategy.apply(traversal).await {
                tracing::warn!(
                    "strategy {} failed, skipping {} remaining: {}",
                    strategy.fqcn(),
                    total - i - 1,
                    e
                );
                return Err(e);
            }
        }
        Ok(())
    }
}
