//! Step pipeline elements.
//!
//! A [`Step`] is one element of a traversal's pipeline. Most steps expand a
//! single input into zero or more outputs as it is pulled through; `count`,
//! `groupCount` and `order` are barriers that see every input at once. Steps
//! that carry sub-traversals expose them through [`Step::children_mut`] so
//! strategies can rewrite them.

pub mod choose;
pub mod filter;
pub mod modulated;
pub mod repeat;

use crate::error::{TraversalError, TraversalResult};
use crate::structure::{Direction, Graph, Value};
use crate::traversal::Traversal;
use crate::traversal::token::{Column, Order};

pub use choose::{BranchState, ChooseStep, OptionToken, Selector};
pub use filter::FilterStep;
pub use modulated::{GroupCountStep, OrderStep, ProjectStep};
pub use repeat::RepeatStep;

/// Argument of a `by(...)` modulation.
#[derive(Debug, Clone)]
pub enum Modulator {
    Traversal(Traversal),
    Order(Order),
}

/// What kind of element a step emits, as far as strategies care.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Produces {
    Vertices,
    Edges,
    Other,
}

#[derive(Debug, Clone)]
pub enum Step {
    /// `V(ids...)`: every vertex (or the listed ones) for each input.
    Start(Vec<Value>),
    Adjacent {
        direction: Direction,
        labels: Vec<String>,
    },
    Incident {
        direction: Direction,
        labels: Vec<String>,
    },
    EdgeVertex(Direction),
    HasLabel(Vec<String>),
    Has {
        key: String,
        value: Value,
    },
    Values(Vec<String>),
    ValueMap,
    Label,
    Id,
    Identity,
    Count,
    Is(Value),
    Limit(usize),
    Unfold,
    Select(Column),
    Filter(FilterStep),
    And(Vec<Traversal>),
    Repeat(RepeatStep),
    Choose(ChooseStep),
    GroupCount(GroupCountStep),
    Project(ProjectStep),
    Order(OrderStep),
    AddV(String),
    Property {
        key: String,
        value: Value,
    },
    Drop,
}

impl Step {
    pub fn name(&self) -> &'static str {
        match self {
            Step::Start(_) => "V",
            Step::Adjacent { direction, .. } => match direction {
                Direction::Out => "out",
                Direction::In => "in",
                Direction::Both => "both",
            },
            Step::Incident { direction, .. } => match direction {
                Direction::Out => "outE",
                Direction::In => "inE",
                Direction::Both => "bothE",
            },
            Step::EdgeVertex(direction) => match direction {
                Direction::Out => "outV",
                Direction::In => "inV",
                Direction::Both => "bothV",
            },
            Step::HasLabel(_) => "hasLabel",
            Step::Has { .. } => "has",
            Step::Values(_) => "values",
            Step::ValueMap => "valueMap",
            Step::Label => "label",
            Step::Id => "id",
            Step::Identity => "identity",
            Step::Count => "count",
            Step::Is(_) => "is",
            Step::Limit(_) => "limit",
            Step::Unfold => "unfold",
            Step::Select(_) => "select",
            Step::Filter(_) => "filter",
            Step::And(_) => "and",
            Step::Repeat(_) => "repeat",
            Step::Choose(_) => "choose",
            Step::GroupCount(_) => "groupCount",
            Step::Project(_) => "project",
            Step::Order(_) => "order",
            Step::AddV(_) => "addV",
            Step::Property { .. } => "property",
            Step::Drop => "drop",
        }
    }

    pub fn produces(&self) -> Produces {
        match self {
            Step::Start(_) | Step::Adjacent { .. } | Step::EdgeVertex(_) => Produces::Vertices,
            Step::Incident { .. } => Produces::Edges,
            _ => Produces::Other,
        }
    }

    /// Steps that write to the graph.
    pub fn is_mutating(&self) -> bool {
        matches!(self, Step::AddV(_) | Step::Property { .. } | Step::Drop)
    }

    pub fn uses_lambda(&self) -> bool {
        matches!(self, Step::Choose(choose) if matches!(choose.selector(), Selector::Lambda(_)))
    }

    pub fn children(&self) -> Vec<&Traversal> {
        match self {
            Step::Filter(filter) => vec![filter.traversal()],
            Step::And(traversals) => traversals.iter().collect(),
            Step::Repeat(repeat) => vec![repeat.traversal()],
            Step::Choose(choose) => choose.children(),
            Step::GroupCount(group) => group.keys().traversals().iter().collect(),
            Step::Project(project) => project.ring().traversals().iter().collect(),
            Step::Order(order) => order.traversals().collect(),
            _ => Vec::new(),
        }
    }

    /// Sub-traversals open to strategy rewriting. Filters injected by a
    /// strategy are excluded so their criteria are never decorated again.
    pub fn children_mut(&mut self) -> Vec<&mut Traversal> {
        match self {
            Step::Filter(filter) if filter.injected_by().is_some() => Vec::new(),
            Step::Filter(filter) => vec![filter.traversal_mut()],
            Step::And(traversals) => traversals.iter_mut().collect(),
            Step::Repeat(repeat) => vec![repeat.traversal_mut()],
            Step::Choose(choose) => choose.children_mut(),
            Step::GroupCount(group) => group.keys_mut().traversals_mut().collect(),
            Step::Project(project) => project.ring_mut().traversals_mut().collect(),
            Step::Order(order) => order.traversals_mut().collect(),
            _ => Vec::new(),
        }
    }

    pub(crate) fn modulate_by(&mut self, modulator: Modulator) -> TraversalResult<()> {
        match self {
            Step::GroupCount(group) => group.modulate_by(modulator),
            Step::Project(project) => project.modulate_by(modulator),
            Step::Order(order) => {
                order.modulate_by(modulator);
                Ok(())
            }
            other => Err(TraversalError::InvalidOption(format!(
                "{}() does not accept by() modulators",
                other.name()
            ))),
        }
    }

    /// Steps that must see every upstream input before emitting.
    pub fn is_barrier(&self) -> bool {
        matches!(self, Step::Count | Step::GroupCount(_) | Step::Order(_))
    }

    /// Expands one input into what the step emits for it.
    pub(crate) fn process(&mut self, graph: &Graph, item: Value) -> TraversalResult<Vec<Value>> {
        match self {
            Step::Start(ids) => Ok(start(graph, ids)),
            Step::Adjacent { direction, labels } => {
                let vertex = expect_vertex("adjacent", &item)?;
                Ok(graph
                    .adjacent(vertex, *direction, labels)
                    .into_iter()
                    .map(Value::Vertex)
                    .collect())
            }
            Step::Incident { direction, labels } => {
                let vertex = expect_vertex("incident", &item)?;
                Ok(graph
                    .incident(vertex, *direction, labels)
                    .into_iter()
                    .map(Value::Edge)
                    .collect())
            }
            Step::EdgeVertex(direction) => match item.as_edge() {
                Some(edge) => Ok(graph
                    .edge_vertex(edge, *direction)
                    .into_iter()
                    .map(Value::Vertex)
                    .collect()),
                None => Err(unexpected("edge", &item)),
            },
            Step::HasLabel(labels) => {
                let matched = graph.label(&item).is_some_and(|label| labels.contains(&label));
                Ok(keep(matched, item))
            }
            Step::Has { key, value } => {
                let matched = graph.property(&item, key).as_ref() == Some(&*value);
                Ok(keep(matched, item))
            }
            Step::Values(keys) => Ok(property_values(graph, &item, keys)),
            Step::ValueMap => Ok(vec![Value::Map(
                graph
                    .properties(&item)
                    .into_iter()
                    .map(|(key, value)| (Value::String(key), Value::List(vec![value])))
                    .collect(),
            )]),
            Step::Label => Ok(graph.label(&item).map(Value::String).into_iter().collect()),
            Step::Id => Ok(element_id(&item)?.into_iter().collect()),
            // `limit` is enforced by the runtime, which stops pulling.
            Step::Identity | Step::Limit(_) => Ok(vec![item]),
            Step::Is(expected) => {
                let matched = item == *expected;
                Ok(keep(matched, item))
            }
            Step::Unfold => Ok(unfold(item)),
            Step::Select(column) => Ok(select(*column, item).into_iter().collect()),
            Step::Filter(filter) => filter.process(graph, item),
            Step::And(traversals) => filter::process_and(traversals, graph, item),
            Step::Repeat(repeat) => repeat.process(graph, item),
            Step::Choose(choose) => choose.process(graph, item),
            Step::Project(project) => Ok(vec![project.process(graph, item)?]),
            Step::AddV(label) => Ok(vec![Value::Vertex(graph.add_vertex(label.clone()))]),
            Step::Property { key, value } => {
                if !graph.set_property(&item, key.clone(), value.clone()) {
                    return Err(unexpected("element", &item));
                }
                Ok(vec![item])
            }
            Step::Drop => {
                graph.remove(&item);
                Ok(Vec::new())
            }
            Step::Count => Ok(vec![Value::Integer(1)]),
            Step::GroupCount(group) => group.process(graph, vec![item]),
            Step::Order(_) => Ok(vec![item]),
        }
    }

    /// Reduces every upstream input at once.
    pub(crate) fn barrier(&mut self, graph: &Graph, inputs: Vec<Value>) -> TraversalResult<Vec<Value>> {
        match self {
            Step::Count => Ok(vec![Value::from(inputs.len())]),
            Step::GroupCount(group) => group.process(graph, inputs),
            Step::Order(order) => order.process(graph, inputs),
            other => {
                let mut output = Vec::with_capacity(inputs.len());
                for item in inputs {
                    output.extend(other.process(graph, item)?);
                }
                Ok(output)
            }
        }
    }
}

fn start(graph: &Graph, ids: &[Value]) -> Vec<Value> {
    graph
        .vertex_ids()
        .into_iter()
        .map(Value::Vertex)
        .filter(|vertex| {
            ids.is_empty()
                || ids.iter().any(|id| match (id, vertex) {
                    (Value::Integer(raw), Value::Vertex(v)) => {
                        u64::try_from(*raw).is_ok_and(|raw| raw == v.0)
                    }
                    (id, vertex) => id == vertex,
                })
        })
        .collect()
}

fn keep(matched: bool, item: Value) -> Vec<Value> {
    if matched { vec![item] } else { Vec::new() }
}

fn element_id(item: &Value) -> TraversalResult<Option<Value>> {
    let raw = match item {
        Value::Vertex(id) => id.0,
        Value::Edge(id) => id.0,
        _ => return Ok(None),
    };
    i64::try_from(raw)
        .map(|id| Some(Value::Integer(id)))
        .map_err(|_| TraversalError::Execution(format!("element id {raw} does not fit in an integer")))
}

fn expect_vertex(step: &str, item: &Value) -> TraversalResult<crate::structure::VertexId> {
    item.as_vertex().ok_or_else(|| {
        TraversalError::Execution(format!(
            "{step} step expects a vertex, found {}",
            item.type_name()
        ))
    })
}

fn unexpected(expected: &str, item: &Value) -> TraversalError {
    TraversalError::Execution(format!("expected {expected}, found {}", item.type_name()))
}

fn property_values(graph: &Graph, item: &Value, keys: &[String]) -> Vec<Value> {
    if keys.is_empty() {
        return graph.properties(item).into_iter().map(|(_, v)| v).collect();
    }
    keys.iter()
        .filter_map(|key| graph.property(item, key))
        .collect()
}

fn unfold(item: Value) -> Vec<Value> {
    match item {
        Value::List(items) => items,
        Value::Map(entries) => entries
            .into_iter()
            .map(|entry| Value::Map(vec![entry]))
            .collect(),
        other => vec![other],
    }
}

fn select(column: Column, item: Value) -> Option<Value> {
    match item {
        Value::Map(entries) => Some(Value::List(
            entries
                .into_iter()
                .map(|(key, value)| match column {
                    Column::Keys => key,
                    Column::Values => value,
                })
                .collect(),
        )),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structure::{EdgeId, VertexId, modern};

    fn marko() -> Value {
        Value::Vertex(VertexId(1))
    }

    #[test]
    fn adjacent_step_respects_labels() {
        let graph = modern().unwrap();
        let mut step = Step::Adjacent {
            direction: Direction::Out,
            labels: vec!["knows".into()],
        };
        let out = step.process(&graph, marko()).unwrap();
        assert_eq!(out, vec![Value::Vertex(VertexId(2)), Value::Vertex(VertexId(4))]);
    }

    #[test]
    fn adjacent_step_rejects_non_vertices() {
        let graph = modern().unwrap();
        let mut step = Step::Adjacent {
            direction: Direction::Out,
            labels: vec![],
        };
        let err = step.process(&graph, Value::Integer(1)).unwrap_err();
        assert_eq!(err.code(), crate::error::ErrorCode::Execution);
    }

    #[test]
    fn count_of_nothing_is_zero() {
        let graph = modern().unwrap();
        assert_eq!(
            Step::Count.barrier(&graph, Vec::new()).unwrap(),
            vec![Value::Integer(0)]
        );
    }

    #[test]
    fn value_map_wraps_values_in_lists() {
        let graph = modern().unwrap();
        let out = Step::ValueMap.process(&graph, marko()).unwrap();
        assert_eq!(out[0].to_string(), "{name=[marko], age=[29]}");
    }

    #[test]
    fn select_keys_of_map() {
        let graph = modern().unwrap();
        let map = Value::Map(vec![("a".into(), 1.into()), ("b".into(), 2.into())]);
        let out = Step::Select(Column::Keys).process(&graph, map).unwrap();
        assert_eq!(out, vec![Value::List(vec!["a".into(), "b".into()])]);
    }

    #[test]
    fn oversized_ids_are_rejected() {
        let graph = Graph::new();
        let err = Step::Id
            .process(&graph, Value::Vertex(VertexId(u64::MAX)))
            .unwrap_err();
        assert_eq!(err.code(), crate::error::ErrorCode::Execution);
        let out = Step::Id.process(&graph, Value::Edge(EdgeId(7))).unwrap();
        assert_eq!(out, vec![Value::Integer(7)]);
    }

    #[test]
    fn negative_start_ids_match_nothing() {
        let graph = modern().unwrap();
        let out = Step::Start(vec![Value::Integer(-1)])
            .process(&graph, Value::Null)
            .unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn only_barriers_gather_input() {
        assert!(Step::Count.is_barrier());
        assert!(Step::Order(OrderStep::new()).is_barrier());
        assert!(!Step::Limit(1).is_barrier());
        assert!(!Step::Drop.is_barrier());
    }

    #[test]
    fn only_mutating_steps_are_flagged() {
        assert!(Step::Drop.is_mutating());
        assert!(Step::AddV("person".into()).is_mutating());
        assert!(!Step::Count.is_mutating());
        assert!(Step::Count.modulate_by(Modulator::Order(Order::Asc)).is_err());
    }
}
