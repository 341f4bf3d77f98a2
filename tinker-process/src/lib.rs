//! Traversal strategies for the tinker client: descriptors, the per-source
//! registry, and the driver that applies them in order before a traversal
//! is sent to the remote engine.

pub mod remote;
pub mod source;
pub mod strategies;
pub mod strategy;
pub mod traversal;

pub use remote::{RemoteConnection, RemoteRequest, RemoteStrategy, RemoteTraversal, StrategyRecord};
pub use source::{Graph, GraphTraversalSource};
pub use strategies::TraversalStrategies;
pub use strategy::{
    ConfigArg, Configuration, PartitionOptions, Strategy, StrategyCategory, StrategyKind,
    SubgraphOptions, TraversalStrategy,
};
pub use traversal::{Traversal, Traverser};
