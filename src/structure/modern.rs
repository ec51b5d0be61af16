use std::sync::Arc;

use super::graph::Graph;
use crate::error::TraversalResult;

/// The six-vertex, six-edge toy graph: four people (marko, vadas, josh,
/// peter) and two pieces of software (lop, ripple).
const MODERN: &str = r#"{
  "vertices": [
    {"id": 1, "label": "person", "properties": [["name", "marko"], ["age", 29]]},
    {"id": 2, "label": "person", "properties": [["name", "vadas"], ["age", 27]]},
    {"id": 3, "label": "software", "properties": [["name", "lop"], ["lang", "java"]]},
    {"id": 4, "label": "person", "properties": [["name", "josh"], ["age", 32]]},
    {"id": 5, "label": "software", "properties": [["name", "ripple"], ["lang", "java"]]},
    {"id": 6, "label": "person", "properties": [["name", "peter"], ["age", 35]]}
  ],
  "edges": [
    {"id": 7, "outV": 1, "label": "knows", "inV": 2, "properties": [["weight", 0.5]]},
    {"id": 8, "outV": 1, "label": "knows", "inV": 4, "properties": [["weight", 1.0]]},
    {"id": 9, "outV": 1, "label": "created", "inV": 3, "properties": [["weight", 0.4]]},
    {"id": 10, "outV": 4, "label": "created", "inV": 5, "properties": [["weight", 1.0]]},
    {"id": 11, "outV": 4, "label": "created", "inV": 3, "properties": [["weight", 0.4]]},
    {"id": 12, "outV": 6, "label": "created", "inV": 3, "properties": [["weight", 0.2]]}
  ]
}"#;

pub fn modern() -> TraversalResult<Arc<Graph>> {
    Graph::from_json(MODERN).map(Arc::new)
}
