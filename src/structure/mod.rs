//! Storage collaborator used by the traversal steps: values, an in-memory
//! property graph and the "modern" toy dataset.

pub mod graph;
pub mod modern;
pub mod value;

pub use graph::{Direction, Graph};
pub use modern::modern;
pub use value::{EdgeId, Value, VertexId};
