//! Structural entity model: vertices, edges, properties and paths as they
//! arrive from the remote engine.

pub mod element;
pub mod object;
pub mod path;

pub use element::{Edge, Element, Property, Vertex, VertexProperty};
pub use object::GraphObject;
pub use path::Path;
