//! Core type definitions for tinker.
//!
//! Identifiers and the dynamic [`Value`] carried by step arguments and
//! strategy configuration are defined here.

use std::fmt;

use compact_str::CompactString;
use serde::{Deserialize, Serialize};

use crate::bytecode::Bytecode;

// ─── Identifiers ───────────────────────────────────────────────────────────

/// Opaque element identifier as assigned by the remote engine.
///
/// Most engines hand out integer or string ids; some use compound ids made
/// of several named parts, which are kept verbatim.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum ElementId {
    Int(i64),
    String(CompactString),
    Compound(Vec<(CompactString, Value)>),
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ElementId::Int(i) => write!(f, "{i}"),
            ElementId::String(s) => f.write_str(s),
            ElementId::Compound(parts) => write_pairs(f, parts),
        }
    }
}

impl From<i64> for ElementId {
    fn from(id: i64) -> Self {
        ElementId::Int(id)
    }
}

impl From<i32> for ElementId {
    fn from(id: i32) -> Self {
        ElementId::Int(id as i64)
    }
}

impl From<&str> for ElementId {
    fn from(id: &str) -> Self {
        ElementId::String(id.into())
    }
}

impl From<String> for ElementId {
    fn from(id: String) -> Self {
        ElementId::String(id.into())
    }
}

impl From<CompactString> for ElementId {
    fn from(id: CompactString) -> Self {
        ElementId::String(id)
    }
}

/// The kind of graph element an [`ElementRef`] points at.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ElementKind {
    Vertex,
    Edge,
    VertexProperty,
}

/// A lightweight reference to a graph element: id and label, no properties.
///
/// Used when a step argument or a strategy option points at an element that
/// only exists on the remote side.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ElementRef {
    pub kind: ElementKind,
    pub id: ElementId,
    pub label: CompactString,
}

impl ElementRef {
    pub fn vertex(id: impl Into<ElementId>) -> Self {
        Self {
            kind: ElementKind::Vertex,
            id: id.into(),
            label: CompactString::const_new("vertex"),
        }
    }

    pub fn edge(id: impl Into<ElementId>) -> Self {
        Self {
            kind: ElementKind::Edge,
            id: id.into(),
            label: CompactString::const_new("edge"),
        }
    }
}

impl fmt::Display for ElementRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            ElementKind::Vertex => write!(f, "v[{}]", self.id),
            ElementKind::Edge => write!(f, "e[{}]", self.id),
            ElementKind::VertexProperty => write!(f, "vp[{}]", self.id),
        }
    }
}

// ─── Value ─────────────────────────────────────────────────────────────────

/// Dynamic value type for step arguments, property values and strategy
/// options.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(CompactString),
    List(Vec<Value>),
    Set(Vec<Value>),
    Map(Vec<(CompactString, Value)>),
    Bytecode(Bytecode),
    Element(ElementRef),
}

impl Value {
    /// Returns the type name as a static string.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::List(_) => "list",
            Value::Set(_) => "set",
            Value::Map(_) => "map",
            Value::Bytecode(_) => "bytecode",
            Value::Element(_) => "element",
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Try to extract a float; integers widen.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Elements of a list or a set.
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) | Value::Set(items) => Some(items.as_slice()),
            _ => None,
        }
    }

    pub fn as_bytecode(&self) -> Option<&Bytecode> {
        match self {
            Value::Bytecode(b) => Some(b),
            _ => None,
        }
    }

    /// Build a list of strings.
    pub fn string_list<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<CompactString>,
    {
        Value::List(items.into_iter().map(|s| Value::String(s.into())).collect())
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(i) => write!(f, "{i}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::String(s) => f.write_str(s),
            Value::List(items) => {
                f.write_str("[")?;
                write_joined(f, items)?;
                f.write_str("]")
            }
            Value::Set(items) => {
                f.write_str("{")?;
                write_joined(f, items)?;
                f.write_str("}")
            }
            Value::Map(pairs) => write_pairs(f, pairs),
            Value::Bytecode(b) => write!(f, "{b}"),
            Value::Element(e) => write!(f, "{e}"),
        }
    }
}

fn write_joined(f: &mut fmt::Formatter<'_>, items: &[Value]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}

fn write_pairs(f: &mut fmt::Formatter<'_>, pairs: &[(CompactString, Value)]) -> fmt::Result {
    f.write_str("{")?;
    for (i, (k, v)) in pairs.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{k}={v}")?;
    }
    f.write_str("}")
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i as i64)
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.into())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s.into())
    }
}

impl From<CompactString> for Value {
    fn from(s: CompactString) -> Self {
        Value::String(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::List(items)
    }
}

impl From<Bytecode> for Value {
    fn from(b: Bytecode) -> Self {
        Value::Bytecode(b)
    }
}

impl From<ElementRef> for Value {
    fn from(e: ElementRef) -> Self {
        Value::Element(e)
    }
}

impl From<ElementId> for Value {
    fn from(id: ElementId) -> Self {
        match id {
            ElementId::Int(i) => Value::Int(i),
            ElementId::String(s) => Value::String(s),
            ElementId::Compound(parts) => Value::Map(parts),
        }
    }
}

impl From<toml::Value> for Value {
    fn from(v: toml::Value) -> Self {
        match v {
            toml::Value::String(s) => Value::String(s.into()),
            toml::Value::Integer(i) => Value::Int(i),
            toml::Value::Float(x) => Value::Float(x),
            toml::Value::Boolean(b) => Value::Bool(b),
            toml::Value::Datetime(dt) => Value::String(dt.to_string().into()),
            toml::Value::Array(items) => Value::List(items.into_iter().map(Value::from).collect()),
            toml::Value::Table(table) => Value::Map(
                table
                    .into_iter()
                    .map(|(k, v)| (CompactString::from(k), Value::from(v)))
                    .collect(),
            ),
        }
    }
}

/// The display form of `value`, cut to at most 20 characters.
pub fn summarize(value: &Value) -> String {
    value.to_string().chars().take(20).collect()
}
