//! Anything a traverser or a path position can hold.

use std::fmt;
use std::sync::Arc;

use tinker_core::types::{ElementId, Value};

use crate::element::{Edge, Element, Property, Vertex, VertexProperty};
use crate::path::Path;

/// A result object: an element, a property, a path, a list or a plain value.
#[derive(Clone, Debug)]
pub enum GraphObject {
    Vertex(Arc<Vertex>),
    Edge(Arc<Edge>),
    VertexProperty(Arc<VertexProperty>),
    Property(Property),
    Path(Path),
    List(Vec<GraphObject>),
    Value(Value),
}

impl GraphObject {
    /// The element id when this object is a vertex, edge or vertex property.
    pub fn element_id(&self) -> Option<&ElementId> {
        match self {
            GraphObject::Vertex(v) => Some(v.id()),
            GraphObject::Edge(e) => Some(e.id()),
            GraphObject::VertexProperty(vp) => Some(vp.id()),
            _ => None,
        }
    }

    pub fn as_vertex(&self) -> Option<&Arc<Vertex>> {
        match self {
            GraphObject::Vertex(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_value(&self) -> Option<&Value> {
        match self {
            GraphObject::Value(v) => Some(v),
            _ => None,
        }
    }
}

impl PartialEq for GraphObject {
    fn eq(&self, other: &Self) -> bool {
        // Any two elements compare by id, whatever their kind.
        if let (Some(a), Some(b)) = (self.element_id(), other.element_id()) {
            return a == b;
        }
        match (self, other) {
            (GraphObject::Property(a), GraphObject::Property(b)) => a == b,
            (GraphObject::Path(a), GraphObject::Path(b)) => a == b,
            (GraphObject::List(a), GraphObject::List(b)) => a == b,
            (GraphObject::Value(a), GraphObject::Value(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Display for GraphObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GraphObject::Vertex(v) => write!(f, "{v}"),
            GraphObject::Edge(e) => write!(f, "{e}"),
            GraphObject::VertexProperty(vp) => write!(f, "{vp}"),
            GraphObject::Property(p) => write!(f, "{p}"),
            GraphObject::Path(p) => write!(f, "{p}"),
            GraphObject::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            GraphObject::Value(v) => write!(f, "{v}"),
        }
    }
}

impl From<Vertex> for GraphObject {
    fn from(v: Vertex) -> Self {
        GraphObject::Vertex(Arc::new(v))
    }
}

impl From<Arc<Vertex>> for GraphObject {
    fn from(v: Arc<Vertex>) -> Self {
        GraphObject::Vertex(v)
    }
}

impl From<Edge> for GraphObject {
    fn from(e: Edge) -> Self {
        GraphObject::Edge(Arc::new(e))
    }
}

impl From<VertexProperty> for GraphObject {
    fn from(vp: VertexProperty) -> Self {
        GraphObject::VertexProperty(Arc::new(vp))
    }
}

impl From<Property> for GraphObject {
    fn from(p: Property) -> Self {
        GraphObject::Property(p)
    }
}

impl From<Path> for GraphObject {
    fn from(p: Path) -> Self {
        GraphObject::Path(p)
    }
}

impl From<Value> for GraphObject {
    fn from(v: Value) -> Self {
        GraphObject::Value(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_elements_compare_by_id_across_kinds() {
        let v = GraphObject::from(Vertex::new(1, "person"));
        let vp = GraphObject::from(VertexProperty::new(1, "name", "marko"));
        let other = GraphObject::from(Vertex::new(2, "person"));
        assert_eq!(v, vp);
        assert_ne!(v, other);
    }

    #[test]
    fn test_element_never_equals_plain_value() {
        let v = GraphObject::from(Vertex::new(1, "person"));
        assert_ne!(v, GraphObject::Value(Value::Int(1)));
        assert_ne!(GraphObject::Value(Value::Int(1)), v);
    }

    #[test]
    fn test_property_never_equals_vertex_property() {
        let p = GraphObject::from(Property::new("name", "marko"));
        let vp = GraphObject::from(VertexProperty::new(1, "name", "marko"));
        assert_ne!(p, vp);
        assert_ne!(vp, p);
    }

    #[test]
    fn test_list_equality_is_pairwise() {
        let a = GraphObject::List(vec![
            Vertex::new(1, "a").into(),
            Value::from("x").into(),
        ]);
        let b = GraphObject::List(vec![
            Vertex::new(1, "b").into(),
            Value::from("x").into(),
        ]);
        let c = GraphObject::List(vec![Vertex::new(1, "a").into()]);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_display() {
        let list = GraphObject::List(vec![
            Vertex::new(1, "a").into(),
            Value::Int(3).into(),
        ]);
        assert_eq!(list.to_string(), "[v[1], 3]");
    }
}
