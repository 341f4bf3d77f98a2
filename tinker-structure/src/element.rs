//! Graph elements returned by, or sent to, the remote engine.
//!
//! Elements are equal when their ids are equal; label and properties play no
//! part. A [`Property`] is a plain key/value pair and compares strictly.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use compact_str::CompactString;

use tinker_core::types::{summarize, ElementId, ElementKind, ElementRef, Value};

/// Behaviour shared by vertices, edges and vertex properties.
pub trait Element {
    fn id(&self) -> &ElementId;
    fn label(&self) -> &str;
    fn kind(&self) -> ElementKind;

    /// A property-less reference to this element.
    fn to_ref(&self) -> ElementRef {
        ElementRef {
            kind: self.kind(),
            id: self.id().clone(),
            label: CompactString::from(self.label()),
        }
    }
}

// ─── Property ──────────────────────────────────────────────────────────────

/// A key/value pair attached to an edge or to a vertex property.
#[derive(Clone, Debug, PartialEq)]
pub struct Property {
    key: CompactString,
    value: Value,
}

impl Property {
    pub fn new(key: impl Into<CompactString>, value: impl Into<Value>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn value(&self) -> &Value {
        &self.value
    }
}

impl fmt::Display for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "p[{}->{}]", self.key, summarize(&self.value))
    }
}

// ─── VertexProperty ────────────────────────────────────────────────────────

/// A vertex property: keyed value with its own id and meta-properties.
#[derive(Clone, Debug)]
pub struct VertexProperty {
    id: ElementId,
    label: CompactString,
    value: Value,
    properties: HashMap<CompactString, Property>,
}

impl VertexProperty {
    pub fn new(
        id: impl Into<ElementId>,
        label: impl Into<CompactString>,
        value: impl Into<Value>,
    ) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            value: value.into(),
            properties: HashMap::new(),
        }
    }

    pub fn with_properties(mut self, properties: HashMap<CompactString, Property>) -> Self {
        self.set_properties(properties);
        self
    }

    /// The property key. Same as the label.
    pub fn key(&self) -> &str {
        &self.label
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Meta-properties.
    pub fn properties(&self) -> &HashMap<CompactString, Property> {
        &self.properties
    }

    /// Replace all meta-properties.
    pub fn set_properties(&mut self, properties: HashMap<CompactString, Property>) {
        self.properties = properties;
    }
}

impl Element for VertexProperty {
    fn id(&self) -> &ElementId {
        &self.id
    }

    fn label(&self) -> &str {
        &self.label
    }

    fn kind(&self) -> ElementKind {
        ElementKind::VertexProperty
    }
}

impl PartialEq for VertexProperty {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl fmt::Display for VertexProperty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "vp[{}->{}]", self.label, summarize(&self.value))
    }
}

// ─── Vertex ────────────────────────────────────────────────────────────────

/// A vertex. A key may map to several [`VertexProperty`] values.
#[derive(Clone, Debug)]
pub struct Vertex {
    id: ElementId,
    label: CompactString,
    properties: HashMap<CompactString, Vec<VertexProperty>>,
}

impl Vertex {
    pub fn new(id: impl Into<ElementId>, label: impl Into<CompactString>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            properties: HashMap::new(),
        }
    }

    pub fn with_properties(
        mut self,
        properties: HashMap<CompactString, Vec<VertexProperty>>,
    ) -> Self {
        self.set_properties(properties);
        self
    }

    pub fn properties(&self) -> &HashMap<CompactString, Vec<VertexProperty>> {
        &self.properties
    }

    /// All values stored under `key`, empty if there are none.
    pub fn property(&self, key: &str) -> &[VertexProperty] {
        self.properties
            .get(key)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// Replace the whole property map. Nothing of the previous map is kept.
    pub fn set_properties(&mut self, properties: HashMap<CompactString, Vec<VertexProperty>>) {
        self.properties = properties;
    }
}

impl Element for Vertex {
    fn id(&self) -> &ElementId {
        &self.id
    }

    fn label(&self) -> &str {
        &self.label
    }

    fn kind(&self) -> ElementKind {
        ElementKind::Vertex
    }
}

impl PartialEq for Vertex {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl fmt::Display for Vertex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v[{}]", self.id)
    }
}

// ─── Edge ──────────────────────────────────────────────────────────────────

/// An edge between two vertices.
///
/// The endpoints are shared handles: several edges may point at the same
/// vertex and none of them controls its lifetime.
#[derive(Clone, Debug)]
pub struct Edge {
    id: ElementId,
    label: CompactString,
    out_v: Arc<Vertex>,
    in_v: Arc<Vertex>,
    properties: HashMap<CompactString, Property>,
}

impl Edge {
    pub fn new(
        id: impl Into<ElementId>,
        out_v: Arc<Vertex>,
        label: impl Into<CompactString>,
        in_v: Arc<Vertex>,
    ) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            out_v,
            in_v,
            properties: HashMap::new(),
        }
    }

    pub fn with_properties(mut self, properties: HashMap<CompactString, Property>) -> Self {
        self.set_properties(properties);
        self
    }

    /// Tail vertex.
    pub fn out_v(&self) -> &Arc<Vertex> {
        &self.out_v
    }

    /// Head vertex.
    pub fn in_v(&self) -> &Arc<Vertex> {
        &self.in_v
    }

    pub fn properties(&self) -> &HashMap<CompactString, Property> {
        &self.properties
    }

    pub fn property(&self, key: &str) -> Option<&Property> {
        self.properties.get(key)
    }

    /// Replace the whole property map.
    pub fn set_properties(&mut self, properties: HashMap<CompactString, Property>) {
        self.properties = properties;
    }
}

impl Element for Edge {
    fn id(&self) -> &ElementId {
        &self.id
    }

    fn label(&self) -> &str {
        &self.label
    }

    fn kind(&self) -> ElementKind {
        ElementKind::Edge
    }
}

impl PartialEq for Edge {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "e[{}][{}-{}->{}]",
            self.id,
            self.out_v.id(),
            self.label,
            self.in_v.id()
        )
    }
}

/// Build a property map keyed by each property's key.
pub fn property_map<I>(properties: I) -> HashMap<CompactString, Property>
where
    I: IntoIterator<Item = Property>,
{
    properties
        .into_iter()
        .map(|p| (p.key.clone(), p))
        .collect()
}
