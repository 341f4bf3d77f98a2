//! Paths: the labeled waypoints a traverser visited.

use std::fmt;

use compact_str::CompactString;

use tinker_core::error::{TinkerError, TinkerResult};

use crate::object::GraphObject;

/// An ordered walk through the graph.
///
/// `labels[i]` holds the step labels attached to `objects[i]`; the set may be
/// empty. Both sequences always have the same length.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Path {
    labels: Vec<Vec<CompactString>>,
    objects: Vec<GraphObject>,
}

impl Path {
    pub fn new(labels: Vec<Vec<CompactString>>, objects: Vec<GraphObject>) -> TinkerResult<Self> {
        if labels.len() != objects.len() {
            return Err(TinkerError::InvalidPath {
                labels: labels.len(),
                objects: objects.len(),
            });
        }
        Ok(Self { labels, objects })
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn labels(&self) -> &[Vec<CompactString>] {
        &self.labels
    }

    pub fn objects(&self) -> &[GraphObject] {
        &self.objects
    }

    /// Pairs of (labels, object) in walk order.
    pub fn iter(&self) -> impl Iterator<Item = (&[CompactString], &GraphObject)> {
        self.labels
            .iter()
            .map(|l| l.as_slice())
            .zip(self.objects.iter())
    }

    /// Every object carrying `label`, in walk order.
    pub fn get(&self, label: &str) -> Vec<&GraphObject> {
        self.iter()
            .filter(|(labels, _)| labels.iter().any(|l| l == label))
            .map(|(_, obj)| obj)
            .collect()
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("path[")?;
        for (i, obj) in self.objects.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{obj}")?;
        }
        f.write_str("]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::Vertex;
    use tinker_core::types::Value;

    fn labels(ls: &[&[&str]]) -> Vec<Vec<CompactString>> {
        ls.iter()
            .map(|set| set.iter().map(|l| CompactString::from(*l)).collect())
            .collect()
    }

    fn v(id: i64) -> GraphObject {
        Vertex::new(id, "vertex").into()
    }

    #[test]
    fn test_path_equality() {
        let a = Path::new(labels(&[&["a"]]), vec![v(1)]).unwrap();
        let b = Path::new(labels(&[&["a"]]), vec![v(1)]).unwrap();
        let relabeled = Path::new(labels(&[&["b"]]), vec![v(1)]).unwrap();
        let longer = Path::new(labels(&[&["a"], &[]]), vec![v(1), v(2)]).unwrap();

        assert_eq!(a, b);
        assert_ne!(a, relabeled);
        assert_ne!(a, longer);
    }

    #[test]
    fn test_path_equality_delegates_to_objects() {
        // Vertex equality ignores the label, so should the path.
        let a = Path::new(labels(&[&[]]), vec![Vertex::new(1, "x").into()]).unwrap();
        let b = Path::new(labels(&[&[]]), vec![Vertex::new(1, "y").into()]).unwrap();
        let c = Path::new(labels(&[&[]]), vec![v(2)]).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_nested_paths_compare_recursively() {
        let inner = Path::new(labels(&[&["x"]]), vec![v(1)]).unwrap();
        let a = Path::new(labels(&[&[]]), vec![inner.clone().into()]).unwrap();
        let b = Path::new(labels(&[&[]]), vec![inner.into()]).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_path_length_mismatch_rejected() {
        let err = Path::new(labels(&[&["a"], &["b"]]), vec![v(1)]).unwrap_err();
        assert!(matches!(
            err,
            TinkerError::InvalidPath {
                labels: 2,
                objects: 1
            }
        ));
    }

    #[test]
    fn test_path_get_by_label() {
        let path = Path::new(
            labels(&[&["a"], &[], &["a", "c"]]),
            vec![v(1), v(2), Value::from("end").into()],
        )
        .unwrap();
        let hits = path.get("a");
        assert_eq!(hits.len(), 2);
        assert_eq!(*hits[0], v(1));
        assert_eq!(*hits[1], GraphObject::Value(Value::from("end")));
        assert!(path.get("zzz").is_empty());
    }

    #[test]
    fn test_path_display_and_empty() {
        let path = Path::new(labels(&[&[], &[]]), vec![v(1), v(2)]).unwrap();
        assert_eq!(path.to_string(), "path[v[1], v[2]]");
        assert_eq!(path.len(), 2);

        let empty = Path::empty();
        assert!(empty.is_empty());
        assert_eq!(empty.to_string(), "path[]");
    }
}
