//! Boundary to the remote engine.
//!
//! The transport and the wire format live elsewhere. This module fixes the
//! logical shape handed across: the lowered traversal, the traversal source
//! alias, and the ordered `(identifier, configuration)` strategy list.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use compact_str::CompactString;
use serde::Serialize;

use tinker_core::bytecode::Bytecode;
use tinker_core::error::TinkerResult;

use crate::strategy::{Configuration, TraversalStrategy};
use crate::traversal::{Traversal, Traverser};

/// One strategy as sent to the engine.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct StrategyRecord {
    pub identifier: CompactString,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub configuration: Option<Configuration>,
}

impl StrategyRecord {
    pub fn from_strategy(strategy: &dyn TraversalStrategy) -> Self {
        Self {
            identifier: CompactString::from(strategy.fqcn()),
            configuration: strategy.configuration().cloned(),
        }
    }
}

/// Everything the transport needs to submit one traversal.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RemoteRequest {
    pub traversal_source: CompactString,
    pub bytecode: Bytecode,
    pub strategies: Vec<StrategyRecord>,
}

/// What the transport hands back.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RemoteTraversal {
    pub traversers: Vec<Traverser>,
}

/// A connection able to execute traversals remotely.
#[async_trait]
pub trait RemoteConnection: Send + Sync + fmt::Debug {
    /// Alias of the traversal source on the engine.
    fn traversal_source(&self) -> &str {
        "g"
    }

    async fn submit(&self, request: RemoteRequest) -> TinkerResult<RemoteTraversal>;
}

pub const REMOTE_STRATEGY_ID: &str = "tinker:RemoteStrategy";

/// Sends the traversal to a [`RemoteConnection`] and stores the results.
///
/// Local to the client: it is never part of the strategy list sent along.
#[derive(Clone, Debug)]
pub struct RemoteStrategy {
    connection: Arc<dyn RemoteConnection>,
}

impl RemoteStrategy {
    pub fn new(connection: Arc<dyn RemoteConnection>) -> Self {
        Self { connection }
    }
}

#[async_trait]
impl TraversalStrategy for RemoteStrategy {
    fn fqcn(&self) -> &str {
        REMOTE_STRATEGY_ID
    }

    fn is_local(&self) -> bool {
        true
    }

    async fn apply(&self, traversal: &mut Traversal) -> TinkerResult<()> {
        if traversal.traversers().is_some() {
            return Ok(());
        }
        let request = RemoteRequest {
            traversal_source: CompactString::from(self.connection.traversal_source()),
            bytecode: traversal.lower(),
            strategies: traversal.strategies().records(),
        };
        tracing::debug!(
            "submitting {} to '{}' with {} strategies",
            request.bytecode,
            request.traversal_source,
            request.strategies.len()
        );
        let result = self.connection.submit(request).await?;
        tracing::debug!("remote returned {} traversers", result.traversers.len());
        traversal.set_traversers(result.traversers);
        Ok(())
    }
}
