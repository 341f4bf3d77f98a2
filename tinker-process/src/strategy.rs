//! Traversal strategy descriptors.
//!
//! A strategy is identified by the fully qualified name the remote engine
//! knows it under and optionally carries a configuration map. The set of
//! kinds is closed ([`StrategyKind`]); the engine decides what each one does.
//! Any traversal handed in as an option is lowered to [`Bytecode`] when the
//! descriptor is built, so a stored descriptor never holds a live traversal.

use std::collections::BTreeMap;
use std::fmt;

use async_trait::async_trait;
use compact_str::CompactString;
use serde::Serialize;

use tinker_core::bytecode::Bytecode;
use tinker_core::error::{TinkerError, TinkerResult};
use tinker_core::types::Value;

use crate::traversal::Traversal;

// ─── Trait ─────────────────────────────────────────────────────────────────

/// A named traversal modifier that can be registered on a traversal source.
#[async_trait]
pub trait TraversalStrategy: Send + Sync + fmt::Debug {
    /// Identifier used for equality and removal.
    fn fqcn(&self) -> &str;

    fn configuration(&self) -> Option<&Configuration> {
        None
    }

    /// Client-only strategies are never forwarded to the engine.
    fn is_local(&self) -> bool {
        false
    }

    /// Apply this strategy to `traversal`. May suspend on remote work.
    async fn apply(&self, traversal: &mut Traversal) -> TinkerResult<()>;
}

// ─── Configuration ─────────────────────────────────────────────────────────

/// Owned option map of a strategy.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Configuration(BTreeMap<CompactString, Value>);

impl Configuration {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<CompactString>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Build a configuration from raw arguments, lowering any traversal.
    pub fn lowered<I, K>(args: I) -> Self
    where
        I: IntoIterator<Item = (K, ConfigArg)>,
        K: Into<CompactString>,
    {
        Self(
            args.into_iter()
                .map(|(k, arg)| (k.into(), arg.lower()))
                .collect(),
        )
    }
}

impl From<toml::Table> for Configuration {
    fn from(table: toml::Table) -> Self {
        Self(
            table
                .into_iter()
                .map(|(k, v)| (CompactString::from(k), Value::from(v)))
                .collect(),
        )
    }
}

/// A strategy option before lowering.
#[derive(Clone, Debug)]
pub enum ConfigArg {
    Value(Value),
    Traversal(Box<Traversal>),
}

impl ConfigArg {
    /// Replace a traversal by its bytecode. Other values pass through.
    pub fn lower(self) -> Value {
        match self {
            ConfigArg::Value(v) => v,
            ConfigArg::Traversal(t) => Value::Bytecode(t.lower()),
        }
    }
}

impl From<Traversal> for ConfigArg {
    fn from(t: Traversal) -> Self {
        ConfigArg::Traversal(Box::new(t))
    }
}

impl From<Value> for ConfigArg {
    fn from(v: Value) -> Self {
        ConfigArg::Value(v)
    }
}

impl From<Bytecode> for ConfigArg {
    fn from(b: Bytecode) -> Self {
        ConfigArg::Value(Value::Bytecode(b))
    }
}

impl From<bool> for ConfigArg {
    fn from(b: bool) -> Self {
        ConfigArg::Value(Value::Bool(b))
    }
}

impl From<i64> for ConfigArg {
    fn from(i: i64) -> Self {
        ConfigArg::Value(Value::Int(i))
    }
}

impl From<i32> for ConfigArg {
    fn from(i: i32) -> Self {
        ConfigArg::Value(Value::Int(i as i64))
    }
}

impl From<&str> for ConfigArg {
    fn from(s: &str) -> Self {
        ConfigArg::Value(Value::from(s))
    }
}

impl From<String> for ConfigArg {
    fn from(s: String) -> Self {
        ConfigArg::Value(Value::from(s))
    }
}

// ─── Kinds ─────────────────────────────────────────────────────────────────

/// Every strategy kind the client can describe.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StrategyKind {
    Connective,
    ElementId,
    HaltedTraverser,
    Options,
    Partition,
    Subgraph,
    Seed,
    VertexProgram,
    MatchAlgorithm,
    ProductiveBy,
    AdjacentToIncident,
    FilterRanking,
    IdentityRemoval,
    IncidentToAdjacent,
    InlineFilter,
    LazyBarrier,
    MatchPredicate,
    OrderLimit,
    PathProcessor,
    PathRetraction,
    Count,
    RepeatUnroll,
    GraphFilter,
    EarlyLimit,
    LambdaRestriction,
    ReadOnly,
    EdgeLabelVerification,
    ReservedKeysVerification,
}

/// Where a strategy sits in the engine's strategy ordering.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StrategyCategory {
    Decoration,
    Finalization,
    Optimization,
    Verification,
}

impl StrategyKind {
    pub const ALL: [StrategyKind; 28] = [
        StrategyKind::Connective,
        StrategyKind::ElementId,
        StrategyKind::HaltedTraverser,
        StrategyKind::Options,
        StrategyKind::Partition,
        StrategyKind::Subgraph,
        StrategyKind::Seed,
        StrategyKind::VertexProgram,
        StrategyKind::MatchAlgorithm,
        StrategyKind::ProductiveBy,
        StrategyKind::AdjacentToIncident,
        StrategyKind::FilterRanking,
        StrategyKind::IdentityRemoval,
        StrategyKind::IncidentToAdjacent,
        StrategyKind::InlineFilter,
        StrategyKind::LazyBarrier,
        StrategyKind::MatchPredicate,
        StrategyKind::OrderLimit,
        StrategyKind::PathProcessor,
        StrategyKind::PathRetraction,
        StrategyKind::Count,
        StrategyKind::RepeatUnroll,
        StrategyKind::GraphFilter,
        StrategyKind::EarlyLimit,
        StrategyKind::LambdaRestriction,
        StrategyKind::ReadOnly,
        StrategyKind::EdgeLabelVerification,
        StrategyKind::ReservedKeysVerification,
    ];

    /// Fully qualified name of the strategy class on the engine side.
    pub fn fqcn(self) -> &'static str {
        use StrategyKind::*;
        match self {
            Connective => "org.apache.tinkerpop.gremlin.process.traversal.strategy.decoration.ConnectiveStrategy",
            ElementId => "org.apache.tinkerpop.gremlin.process.traversal.strategy.decoration.ElementIdStrategy",
            HaltedTraverser => "org.apache.tinkerpop.gremlin.process.traversal.strategy.decoration.HaltedTraverserStrategy",
            Options => "org.apache.tinkerpop.gremlin.process.traversal.strategy.decoration.OptionsStrategy",
            Partition => "org.apache.tinkerpop.gremlin.process.traversal.strategy.decoration.PartitionStrategy",
            Subgraph => "org.apache.tinkerpop.gremlin.process.traversal.strategy.decoration.SubgraphStrategy",
            Seed => "org.apache.tinkerpop.gremlin.process.traversal.strategy.decoration.SeedStrategy",
            VertexProgram => "org.apache.tinkerpop.gremlin.process.computer.traversal.strategy.decoration.VertexProgramStrategy",
            MatchAlgorithm => "org.apache.tinkerpop.gremlin.process.traversal.strategy.finalization.MatchAlgorithmStrategy",
            ProductiveBy => "org.apache.tinkerpop.gremlin.process.traversal.strategy.optimization.ProductiveByStrategy",
            AdjacentToIncident => "org.apache.tinkerpop.gremlin.process.traversal.strategy.optimization.AdjacentToIncidentStrategy",
            FilterRanking => "org.apache.tinkerpop.gremlin.process.traversal.strategy.optimization.FilterRankingStrategy",
            IdentityRemoval => "org.apache.tinkerpop.gremlin.process.traversal.strategy.optimization.IdentityRemovalStrategy",
            IncidentToAdjacent => "org.apache.tinkerpop.gremlin.process.traversal.strategy.optimization.IncidentToAdjacentStrategy",
            InlineFilter => "org.apache.tinkerpop.gremlin.process.traversal.strategy.optimization.InlineFilterStrategy",
            LazyBarrier => "org.apache.tinkerpop.gremlin.process.traversal.strategy.optimization.LazyBarrierStrategy",
            MatchPredicate => "org.apache.tinkerpop.gremlin.process.traversal.strategy.optimization.MatchPredicateStrategy",
            OrderLimit => "org.apache.tinkerpop.gremlin.process.traversal.strategy.optimization.OrderLimitStrategy",
            PathProcessor => "org.apache.tinkerpop.gremlin.process.traversal.strategy.optimization.PathProcessorStrategy",
            PathRetraction => "org.apache.tinkerpop.gremlin.process.traversal.strategy.optimization.PathRetractionStrategy",
            Count => "org.apache.tinkerpop.gremlin.process.traversal.strategy.optimization.CountStrategy",
            RepeatUnroll => "org.apache.tinkerpop.gremlin.process.traversal.strategy.optimization.RepeatUnrollStrategy",
            GraphFilter => "org.apache.tinkerpop.gremlin.process.traversal.strategy.optimization.GraphFilterStrategy",
            EarlyLimit => "org.apache.tinkerpop.gremlin.process.traversal.strategy.optimization.EarlyLimitStrategy",
            LambdaRestriction => "org.apache.tinkerpop.gremlin.process.traversal.strategy.verification.LambdaRestrictionStrategy",
            ReadOnly => "org.apache.tinkerpop.gremlin.process.traversal.strategy.verification.ReadOnlyStrategy",
            EdgeLabelVerification => "org.apache.tinkerpop.gremlin.process.traversal.strategy.verification.EdgeLabelVerificationStrategy",
            ReservedKeysVerification => "org.apache.tinkerpop.gremlin.process.traversal.strategy.verification.ReservedKeysVerificationStrategy",
        }
    }

    /// Short class name, e.g. `ReadOnlyStrategy`.
    pub fn name(self) -> &'static str {
        let fqcn = self.fqcn();
        fqcn.rsplit('.').next().unwrap_or(fqcn)
    }

    pub fn category(self) -> StrategyCategory {
        let mut parts = self.fqcn().rsplit('.');
        parts.next();
        match parts.next() {
            Some("finalization") => StrategyCategory::Finalization,
            Some("optimization") => StrategyCategory::Optimization,
            Some("verification") => StrategyCategory::Verification,
            _ => StrategyCategory::Decoration,
        }
    }

    pub fn from_fqcn(fqcn: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|k| k.fqcn() == fqcn)
    }

    /// Resolve a short class name or a fully qualified one.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|k| k.name() == name || k.fqcn() == name)
    }

    /// Fixed option shape, `None` for kinds that take a free-form bag.
    fn shape(self) -> Option<&'static [Field]> {
        use StrategyKind::*;
        match self {
            Options | VertexProgram => None,
            HaltedTraverser => Some(HALTED_TRAVERSER_SHAPE),
            Partition => Some(PARTITION_SHAPE),
            Subgraph => Some(SUBGRAPH_SHAPE),
            Seed => Some(SEED_SHAPE),
            MatchAlgorithm => Some(MATCH_ALGORITHM_SHAPE),
            ProductiveBy => Some(PRODUCTIVE_BY_SHAPE),
            EdgeLabelVerification => Some(EDGE_LABEL_SHAPE),
            ReservedKeysVerification => Some(RESERVED_KEYS_SHAPE),
            _ => Some(&[]),
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Clone, Copy, Debug)]
enum FieldType {
    Bool,
    Int,
    String,
    StringList,
    Traversal,
}

impl FieldType {
    fn accepts(self, value: &Value) -> bool {
        match self {
            FieldType::Bool => matches!(value, Value::Bool(_)),
            FieldType::Int => matches!(value, Value::Int(_)),
            FieldType::String => matches!(value, Value::String(_)),
            FieldType::StringList => value
                .as_list()
                .is_some_and(|items| items.iter().all(|v| matches!(v, Value::String(_)))),
            FieldType::Traversal => matches!(value, Value::Bytecode(_)),
        }
    }

    fn describe(self) -> &'static str {
        match self {
            FieldType::Bool => "a boolean",
            FieldType::Int => "an integer",
            FieldType::String => "a string",
            FieldType::StringList => "a list of strings",
            FieldType::Traversal => "a traversal",
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct Field {
    name: &'static str,
    ty: FieldType,
    required: bool,
}

impl Field {
    const fn optional(name: &'static str, ty: FieldType) -> Self {
        Self {
            name,
            ty,
            required: false,
        }
    }

    const fn required(name: &'static str, ty: FieldType) -> Self {
        Self {
            name,
            ty,
            required: true,
        }
    }
}

/// Reserved keys checked when none are given.
pub const DEFAULT_RESERVED_KEYS: [&str; 2] = ["id", "label"];

const HALTED_TRAVERSER_SHAPE: &[Field] =
    &[Field::optional("haltedTraverserFactory", FieldType::String)];

const PARTITION_SHAPE: &[Field] = &[
    Field::optional("partitionKey", FieldType::String),
    Field::optional("writePartition", FieldType::String),
    Field::optional("readPartitions", FieldType::StringList),
    Field::optional("includeMetaProperties", FieldType::Bool),
];

const SUBGRAPH_SHAPE: &[Field] = &[
    Field::optional("vertices", FieldType::Traversal),
    Field::optional("edges", FieldType::Traversal),
    Field::optional("vertexProperties", FieldType::Traversal),
    Field::optional("checkAdjacentVertices", FieldType::Bool),
];

const SEED_SHAPE: &[Field] = &[Field::required("seed", FieldType::Int)];

const MATCH_ALGORITHM_SHAPE: &[Field] = &[Field::optional("matchAlgorithm", FieldType::String)];

const PRODUCTIVE_BY_SHAPE: &[Field] = &[Field::optional("productiveKeys", FieldType::StringList)];

const EDGE_LABEL_SHAPE: &[Field] = &[
    Field::optional("logWarnings", FieldType::Bool),
    Field::optional("throwException", FieldType::Bool),
];

const RESERVED_KEYS_SHAPE: &[Field] = &[
    Field::optional("logWarnings", FieldType::Bool),
    Field::optional("throwException", FieldType::Bool),
    Field::optional("keys", FieldType::StringList),
];

/// Check `configuration` against the fixed shape of `kind`, if it has one.
fn validate(kind: StrategyKind, configuration: &Configuration) -> TinkerResult<()> {
    let Some(fields) = kind.shape() else {
        return Ok(());
    };
    for (key, value) in configuration.iter() {
        let field = fields.iter().find(|f| f.name == key).ok_or_else(|| {
            TinkerError::strategy_config(kind.name(), format!("unknown option '{key}'"))
        })?;
        if !field.ty.accepts(value) {
            return Err(TinkerError::strategy_config(
                kind.name(),
                format!(
                    "option '{key}' must be {}, got {}",
                    field.ty.describe(),
                    value.type_name()
                ),
            ));
        }
    }
    if let Some(missing) = fields
        .iter()
        .find(|f| f.required && !configuration.contains_key(f.name))
    {
        return Err(TinkerError::strategy_config(
            kind.name(),
            format!("missing required option '{}'", missing.name),
        ));
    }
    Ok(())
}

/// Documented defaults for options left out.
fn fill_defaults(kind: StrategyKind, configuration: &mut Configuration) {
    if !matches!(
        kind,
        StrategyKind::EdgeLabelVerification | StrategyKind::ReservedKeysVerification
    ) {
        return;
    }
    for flag in ["logWarnings", "throwException"] {
        if !configuration.contains_key(flag) {
            configuration.insert(flag, false);
        }
    }
    if kind == StrategyKind::ReservedKeysVerification && !configuration.contains_key("keys") {
        configuration.insert("keys", Value::string_list(DEFAULT_RESERVED_KEYS));
    }
}

// ─── Descriptor ────────────────────────────────────────────────────────────

/// A strategy descriptor: kind plus validated, already lowered options.
#[derive(Clone, Debug, PartialEq)]
pub struct Strategy {
    kind: StrategyKind,
    configuration: Option<Configuration>,
}

macro_rules! zero_config_strategies {
    ($($ctor:ident => $kind:ident),* $(,)?) => {
        impl Strategy {
            $(
                pub fn $ctor() -> Self {
                    Self::bare(StrategyKind::$kind)
                }
            )*
        }
    };
}

zero_config_strategies! {
    connective => Connective,
    element_id => ElementId,
    adjacent_to_incident => AdjacentToIncident,
    filter_ranking => FilterRanking,
    identity_removal => IdentityRemoval,
    incident_to_adjacent => IncidentToAdjacent,
    inline_filter => InlineFilter,
    lazy_barrier => LazyBarrier,
    match_predicate => MatchPredicate,
    order_limit => OrderLimit,
    path_processor => PathProcessor,
    path_retraction => PathRetraction,
    count => Count,
    repeat_unroll => RepeatUnroll,
    graph_filter => GraphFilter,
    early_limit => EarlyLimit,
    lambda_restriction => LambdaRestriction,
    read_only => ReadOnly,
}

/// Options of [`Strategy::partition`].
#[derive(Clone, Debug, Default)]
pub struct PartitionOptions {
    pub partition_key: Option<String>,
    pub write_partition: Option<String>,
    pub read_partitions: Option<Vec<String>>,
    pub include_meta_properties: Option<bool>,
}

/// Options of [`Strategy::subgraph`]. Each filter is lowered on its own.
#[derive(Clone, Debug, Default)]
pub struct SubgraphOptions {
    pub vertices: Option<ConfigArg>,
    pub edges: Option<ConfigArg>,
    pub vertex_properties: Option<ConfigArg>,
    pub check_adjacent_vertices: Option<bool>,
}

impl Strategy {
    fn bare(kind: StrategyKind) -> Self {
        Self {
            kind,
            configuration: None,
        }
    }

    pub fn kind(&self) -> StrategyKind {
        self.kind
    }

    /// Build a descriptor from an already lowered option map.
    ///
    /// Fixed-shape kinds reject unknown options and values of the wrong type;
    /// documented defaults are filled in for options left out.
    pub fn from_configuration(kind: StrategyKind, configuration: Configuration) -> TinkerResult<Self> {
        validate(kind, &configuration)?;
        Ok(Self::typed(kind, configuration))
    }

    /// Build a descriptor from raw options, lowering traversals first.
    pub fn from_args<I, K>(kind: StrategyKind, args: I) -> TinkerResult<Self>
    where
        I: IntoIterator<Item = (K, ConfigArg)>,
        K: Into<CompactString>,
    {
        Self::from_configuration(kind, Configuration::lowered(args))
    }

    /// Resolve `name` (short or fully qualified) and build a descriptor.
    pub fn from_name(name: &str, configuration: Configuration) -> TinkerResult<Self> {
        let kind = StrategyKind::from_name(name)
            .ok_or_else(|| TinkerError::UnknownStrategy(name.to_string()))?;
        Self::from_configuration(kind, configuration)
    }

    pub fn halted_traverser(factory: Option<&str>) -> Self {
        let mut configuration = Configuration::new();
        if let Some(factory) = factory {
            configuration.insert("haltedTraverserFactory", factory);
        }
        Self::typed(StrategyKind::HaltedTraverser, configuration)
    }

    /// Free-form options forwarded to the engine untouched.
    pub fn options<I, K>(options: I) -> Self
    where
        I: IntoIterator<Item = (K, ConfigArg)>,
        K: Into<CompactString>,
    {
        Self::typed(StrategyKind::Options, Configuration::lowered(options))
    }

    pub fn partition(options: PartitionOptions) -> Self {
        let mut configuration = Configuration::new();
        if let Some(key) = options.partition_key {
            configuration.insert("partitionKey", key);
        }
        if let Some(write) = options.write_partition {
            configuration.insert("writePartition", write);
        }
        if let Some(read) = options.read_partitions {
            configuration.insert("readPartitions", Value::string_list(read));
        }
        if let Some(include) = options.include_meta_properties {
            configuration.insert("includeMetaProperties", include);
        }
        Self::typed(StrategyKind::Partition, configuration)
    }

    /// Fails if a filter is neither a traversal nor bytecode.
    pub fn subgraph(options: SubgraphOptions) -> TinkerResult<Self> {
        let mut args: Vec<(&str, ConfigArg)> = Vec::new();
        if let Some(vertices) = options.vertices {
            args.push(("vertices", vertices));
        }
        if let Some(edges) = options.edges {
            args.push(("edges", edges));
        }
        if let Some(vertex_properties) = options.vertex_properties {
            args.push(("vertexProperties", vertex_properties));
        }
        if let Some(check) = options.check_adjacent_vertices {
            args.push(("checkAdjacentVertices", check.into()));
        }
        Self::from_args(StrategyKind::Subgraph, args)
    }

    pub fn productive_by<I, S>(productive_keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<CompactString>,
    {
        let mut configuration = Configuration::new();
        configuration.insert("productiveKeys", Value::string_list(productive_keys));
        Self::typed(StrategyKind::ProductiveBy, configuration)
    }

    /// Parameters of a distributed vertex program, forwarded untouched.
    pub fn vertex_program<I, K>(options: I) -> Self
    where
        I: IntoIterator<Item = (K, ConfigArg)>,
        K: Into<CompactString>,
    {
        Self::typed(StrategyKind::VertexProgram, Configuration::lowered(options))
    }

    pub fn match_algorithm(algorithm: Option<&str>) -> Self {
        let mut configuration = Configuration::new();
        if let Some(algorithm) = algorithm {
            configuration.insert("matchAlgorithm", algorithm);
        }
        Self::typed(StrategyKind::MatchAlgorithm, configuration)
    }

    pub fn edge_label_verification(log_warnings: bool, throw_exception: bool) -> Self {
        let mut configuration = Configuration::new();
        configuration.insert("logWarnings", log_warnings);
        configuration.insert("throwException", throw_exception);
        Self::typed(StrategyKind::EdgeLabelVerification, configuration)
    }

    /// `keys` defaults to [`DEFAULT_RESERVED_KEYS`].
    pub fn reserved_keys_verification<S>(
        log_warnings: bool,
        throw_exception: bool,
        keys: Option<Vec<S>>,
    ) -> Self
    where
        S: Into<CompactString>,
    {
        let mut configuration = Configuration::new();
        configuration.insert("logWarnings", log_warnings);
        configuration.insert("throwException", throw_exception);
        if let Some(keys) = keys {
            configuration.insert("keys", Value::string_list(keys));
        }
        Self::typed(StrategyKind::ReservedKeysVerification, configuration)
    }

    pub fn seed(seed: i64) -> Self {
        let mut configuration = Configuration::new();
        configuration.insert("seed", seed);
        Self::typed(StrategyKind::Seed, configuration)
    }

    /// For typed constructors, whose options match the kind's shape by
    /// construction.
    fn typed(kind: StrategyKind, mut configuration: Configuration) -> Self {
        debug_assert!(validate(kind, &configuration).is_ok());
        fill_defaults(kind, &mut configuration);
        Self {
            kind,
            configuration: (!configuration.is_empty()).then_some(configuration),
        }
    }
}

#[async_trait]
impl TraversalStrategy for Strategy {
    fn fqcn(&self) -> &str {
        self.kind.fqcn()
    }

    fn configuration(&self) -> Option<&Configuration> {
        self.configuration.as_ref()
    }

    /// Executed by the engine; nothing to do on the client.
    async fn apply(&self, _traversal: &mut Traversal) -> TinkerResult<()> {
        tracing::trace!("{} is applied remotely", self.kind);
        Ok(())
    }
}
