//==================================================
// File: structure/graph.rs
//==================================================
// Author: ZobieLabs
// License: Duality Public License (DPL v1.0)
// Goal: Minimal in-memory property graph
// Objective: Give steps a storage collaborator to read from and mutate
//==================================================

use std::collections::HashMap;

use indexmap::IndexMap;
use parking_lot::RwLock;
use serde::Deserialize;

use super::value::{EdgeId, Value, VertexId};
use crate::error::{TraversalError, TraversalResult};

/// Edge direction relative to a vertex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Out,
    In,
    Both,
}

impl Direction {
    pub fn opposite(self) -> Direction {
        match self {
            Direction::Out => Direction::In,
            Direction::In => Direction::Out,
            Direction::Both => Direction::Both,
        }
    }
}

#[derive(Debug, Clone)]
struct VertexRecord {
    label: String,
    properties: IndexMap<String, Value>,
}

#[derive(Debug, Clone)]
struct EdgeRecord {
    label: String,
    out_v: VertexId,
    in_v: VertexId,
    properties: IndexMap<String, Value>,
}

#[derive(Debug, Default)]
struct GraphData {
    vertices: IndexMap<VertexId, VertexRecord>,
    edges: IndexMap<EdgeId, EdgeRecord>,
    out_edges: HashMap<VertexId, Vec<EdgeId>>,
    in_edges: HashMap<VertexId, Vec<EdgeId>>,
    next_id: u64,
}

impl GraphData {
    fn allocate_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    fn reserve_id(&mut self, id: u64) {
        self.next_id = self.next_id.max(id);
    }

    fn incident(&self, vertex: VertexId, direction: Direction) -> Vec<EdgeId> {
        let out = self.out_edges.get(&vertex).into_iter().flatten();
        let inc = self.in_edges.get(&vertex).into_iter().flatten();
        match direction {
            Direction::Out => out.copied().collect(),
            Direction::In => inc.copied().collect(),
            Direction::Both => out.chain(inc).copied().collect(),
        }
    }
}

/// Property graph held in memory. Reads and writes go through an internal
/// lock so the graph can be shared behind an `Arc` by many traversals.
#[derive(Debug, Default)]
pub struct Graph {
    data: RwLock<GraphData>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_vertex(&self, label: impl Into<String>) -> VertexId {
        let mut data = self.data.write();
        let id = VertexId(data.allocate_id());
        data.vertices.insert(
            id,
            VertexRecord {
                label: label.into(),
                properties: IndexMap::new(),
            },
        );
        id
    }

    pub fn add_vertex_with_id(&self, id: u64, label: impl Into<String>) -> TraversalResult<VertexId> {
        let mut data = self.data.write();
        let vertex = VertexId(id);
        if data.vertices.contains_key(&vertex) {
            return Err(TraversalError::Dataset(format!("duplicate vertex id {id}")));
        }
        data.reserve_id(id);
        data.vertices.insert(
            vertex,
            VertexRecord {
                label: label.into(),
                properties: IndexMap::new(),
            },
        );
        Ok(vertex)
    }

    pub fn add_edge(
        &self,
        out_v: VertexId,
        label: impl Into<String>,
        in_v: VertexId,
    ) -> TraversalResult<EdgeId> {
        let id = self.data.write().allocate_id();
        self.insert_edge(EdgeId(id), out_v, label.into(), in_v)
    }

    pub fn add_edge_with_id(
        &self,
        id: u64,
        out_v: VertexId,
        label: impl Into<String>,
        in_v: VertexId,
    ) -> TraversalResult<EdgeId> {
        self.insert_edge(EdgeId(id), out_v, label.into(), in_v)
    }

    fn insert_edge(
        &self,
        id: EdgeId,
        out_v: VertexId,
        label: String,
        in_v: VertexId,
    ) -> TraversalResult<EdgeId> {
        let mut data = self.data.write();
        for endpoint in [out_v, in_v] {
            if !data.vertices.contains_key(&endpoint) {
                return Err(TraversalError::Dataset(format!(
                    "edge {} references missing {endpoint}",
                    id.0
                )));
            }
        }
        if data.edges.contains_key(&id) {
            return Err(TraversalError::Dataset(format!("duplicate edge id {}", id.0)));
        }
        data.reserve_id(id.0);
        data.edges.insert(
            id,
            EdgeRecord {
                label,
                out_v,
                in_v,
                properties: IndexMap::new(),
            },
        );
        data.out_edges.entry(out_v).or_default().push(id);
        data.in_edges.entry(in_v).or_default().push(id);
        Ok(id)
    }

    /// Sets a property on a vertex or edge. Returns `false` when the element
    /// does not exist.
    pub fn set_property(&self, element: &Value, key: impl Into<String>, value: Value) -> bool {
        let mut data = self.data.write();
        let properties = match element {
            Value::Vertex(id) => data.vertices.get_mut(id).map(|v| &mut v.properties),
            Value::Edge(id) => data.edges.get_mut(id).map(|e| &mut e.properties),
            _ => None,
        };
        match properties {
            Some(properties) => {
                properties.insert(key.into(), value);
                true
            }
            None => false,
        }
    }

    /// Removes a vertex (with its incident edges) or an edge.
    pub fn remove(&self, element: &Value) {
        let mut data = self.data.write();
        match element {
            Value::Vertex(id) => {
                let incident = data.incident(*id, Direction::Both);
                for edge in incident {
                    remove_edge(&mut data, edge);
                }
                data.vertices.shift_remove(id);
                data.out_edges.remove(id);
                data.in_edges.remove(id);
            }
            Value::Edge(id) => remove_edge(&mut data, *id),
            _ => {}
        }
    }

    pub fn vertex_ids(&self) -> Vec<VertexId> {
        self.data.read().vertices.keys().copied().collect()
    }

    pub fn edge_ids(&self) -> Vec<EdgeId> {
        self.data.read().edges.keys().copied().collect()
    }

    pub fn contains_vertex(&self, id: VertexId) -> bool {
        self.data.read().vertices.contains_key(&id)
    }

    pub fn label(&self, element: &Value) -> Option<String> {
        let data = self.data.read();
        match element {
            Value::Vertex(id) => data.vertices.get(id).map(|v| v.label.clone()),
            Value::Edge(id) => data.edges.get(id).map(|e| e.label.clone()),
            _ => None,
        }
    }

    pub fn property(&self, element: &Value, key: &str) -> Option<Value> {
        let data = self.data.read();
        match element {
            Value::Vertex(id) => data.vertices.get(id)?.properties.get(key).cloned(),
            Value::Edge(id) => data.edges.get(id)?.properties.get(key).cloned(),
            _ => None,
        }
    }

    pub fn properties(&self, element: &Value) -> Vec<(String, Value)> {
        let data = self.data.read();
        let properties = match element {
            Value::Vertex(id) => data.vertices.get(id).map(|v| &v.properties),
            Value::Edge(id) => data.edges.get(id).map(|e| &e.properties),
            _ => None,
        };
        properties
            .map(|props| props.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
            .unwrap_or_default()
    }

    /// Edges incident to `vertex`, in insertion order, filtered by label when
    /// `labels` is non-empty.
    pub fn incident(&self, vertex: VertexId, direction: Direction, labels: &[String]) -> Vec<EdgeId> {
        let data = self.data.read();
        data.incident(vertex, direction)
            .into_iter()
            .filter(|edge| {
                labels.is_empty()
                    || data
                        .edges
                        .get(edge)
                        .is_some_and(|record| labels.contains(&record.label))
            })
            .collect()
    }

    /// Vertices adjacent to `vertex` through edges matching `labels`.
    pub fn adjacent(&self, vertex: VertexId, direction: Direction, labels: &[String]) -> Vec<VertexId> {
        let edges = self.incident(vertex, direction, labels);
        let data = self.data.read();
        edges
            .into_iter()
            .filter_map(|edge| data.edges.get(&edge))
            .map(|record| {
                if record.out_v == vertex && direction != Direction::In {
                    record.in_v
                } else {
                    record.out_v
                }
            })
            .collect()
    }

    /// Endpoint of `edge`; `Direction::Out` is the tail, `Direction::In` the head.
    pub fn edge_vertex(&self, edge: EdgeId, direction: Direction) -> Vec<VertexId> {
        let data = self.data.read();
        match data.edges.get(&edge) {
            Some(record) => match direction {
                Direction::Out => vec![record.out_v],
                Direction::In => vec![record.in_v],
                Direction::Both => vec![record.out_v, record.in_v],
            },
            None => Vec::new(),
        }
    }

    /// Loads vertices and edges from a JSON document shaped like
    /// `{"vertices": [...], "edges": [...]}`. Properties are lists of
    /// `[key, value]` pairs so their order survives.
    pub fn from_json(json: &str) -> TraversalResult<Graph> {
        let document: GraphDocument =
            serde_json::from_str(json).map_err(|err| TraversalError::Dataset(err.to_string()))?;
        let graph = Graph::new();
        for vertex in document.vertices {
            let id = graph.add_vertex_with_id(vertex.id, vertex.label)?;
            for (key, value) in vertex.properties {
                graph.set_property(&Value::Vertex(id), key, json_to_value(value)?);
            }
        }
        for edge in document.edges {
            let id = graph.add_edge_with_id(
                edge.id,
                VertexId(edge.out_v),
                edge.label,
                VertexId(edge.in_v),
            )?;
            for (key, value) in edge.properties {
                graph.set_property(&Value::Edge(id), key, json_to_value(value)?);
            }
        }
        Ok(graph)
    }
}

fn remove_edge(data: &mut GraphData, edge: EdgeId) {
    if let Some(record) = data.edges.shift_remove(&edge) {
        if let Some(list) = data.out_edges.get_mut(&record.out_v) {
            list.retain(|id| *id != edge);
        }
        if let Some(list) = data.in_edges.get_mut(&record.in_v) {
            list.retain(|id| *id != edge);
        }
    }
}

#[derive(Debug, Deserialize)]
struct GraphDocument {
    #[serde(default)]
    vertices: Vec<VertexDocument>,
    #[serde(default)]
    edges: Vec<EdgeDocument>,
}

#[derive(Debug, Deserialize)]
struct VertexDocument {
    id: u64,
    label: String,
    #[serde(default)]
    properties: Vec<(String, serde_json::Value)>,
}

#[derive(Debug, Deserialize)]
struct EdgeDocument {
    id: u64,
    #[serde(rename = "outV")]
    out_v: u64,
    label: String,
    #[serde(rename = "inV")]
    in_v: u64,
    #[serde(default)]
    properties: Vec<(String, serde_json::Value)>,
}

fn json_to_value(value: serde_json::Value) -> TraversalResult<Value> {
    Ok(match value {
        serde_json::Value::Null => Value::Null,
        serde_json::Value::Bool(b) => Value::Boolean(b),
        serde_json::Value::Number(number) => match number.as_i64() {
            Some(i) => Value::Integer(i),
            None => Value::Float(number.as_f64().unwrap_or(f64::NAN)),
        },
        serde_json::Value::String(s) => Value::String(s),
        serde_json::Value::Array(items) => Value::List(
            items
                .into_iter()
                .map(json_to_value)
                .collect::<TraversalResult<Vec<_>>>()?,
        ),
        serde_json::Value::Object(_) => {
            return Err(TraversalError::Dataset(
                "nested objects are not supported as property values".into(),
            ));
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adjacency_follows_direction_and_labels() {
        let graph = Graph::new();
        let a = graph.add_vertex("person");
        let b = graph.add_vertex("person");
        let c = graph.add_vertex("software");
        graph.add_edge(a, "knows", b).unwrap();
        graph.add_edge(a, "created", c).unwrap();

        assert_eq!(graph.adjacent(a, Direction::Out, &[]), vec![b, c]);
        assert_eq!(graph.adjacent(a, Direction::Out, &["created".into()]), vec![c]);
        assert_eq!(graph.adjacent(c, Direction::In, &[]), vec![a]);
        assert_eq!(graph.adjacent(b, Direction::Both, &[]), vec![a]);
    }

    #[test]
    fn removing_vertex_drops_incident_edges() {
        let graph = Graph::new();
        let a = graph.add_vertex("person");
        let b = graph.add_vertex("person");
        graph.add_edge(a, "knows", b).unwrap();
        graph.remove(&Value::Vertex(b));
        assert!(graph.edge_ids().is_empty());
        assert!(graph.adjacent(a, Direction::Out, &[]).is_empty());
    }

    #[test]
    fn edge_to_missing_vertex_is_rejected() {
        let graph = Graph::new();
        let a = graph.add_vertex("person");
        let err = graph.add_edge(a, "knows", VertexId(99)).unwrap_err();
        assert_eq!(err.code(), crate::error::ErrorCode::Dataset);
    }
}
