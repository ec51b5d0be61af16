//==================================================
// File: step/modulated.rs
//==================================================
// Author: ZobieLabs
// License: Duality Public License (DPL v1.0)
// Goal: Steps configured through `by(...)` modulators
// Objective: groupCount, project and order on top of the traversal ring
//==================================================

use std::cmp::Ordering;

use crate::error::{TraversalError, TraversalResult};
use crate::ring::TraversalRing;
use crate::structure::{Graph, Value};
use crate::traversal::Traversal;
use crate::traversal::token::Order;

use super::Modulator;

//==================================================
// SECTION: groupCount
//==================================================

/// Counts inputs per key. The key is the first result of the `by`
/// traversal, or the input itself when no `by` was given.
#[derive(Debug, Clone, Default)]
pub struct GroupCountStep {
    keys: TraversalRing<Traversal>,
}

impl GroupCountStep {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn keys(&self) -> &TraversalRing<Traversal> {
        &self.keys
    }

    pub(crate) fn keys_mut(&mut self) -> &mut TraversalRing<Traversal> {
        &mut self.keys
    }

    pub(crate) fn modulate_by(&mut self, modulator: Modulator) -> TraversalResult<()> {
        match modulator {
            Modulator::Traversal(traversal) => {
                self.keys.add_traversal(traversal);
                Ok(())
            }
            Modulator::Order(_) => Err(TraversalError::InvalidOption(
                "groupCount() cannot be modulated by an order".into(),
            )),
        }
    }

    pub(crate) fn process(&mut self, graph: &Graph, inputs: Vec<Value>) -> TraversalResult<Vec<Value>> {
        let mut counts: Vec<(Value, Value)> = Vec::new();
        for item in inputs {
            self.keys.reset();
            let key = match self.keys.next() {
                Some(traversal) => match traversal.first(graph, item)? {
                    Some(key) => key,
                    None => continue,
                },
                None => item,
            };
            match counts.iter_mut().find(|(existing, _)| *existing == key) {
                Some((_, Value::Integer(count))) => *count += 1,
                _ => counts.push((key, Value::Integer(1))),
            }
        }
        Ok(vec![Value::Map(counts)])
    }
}

//==================================================
// SECTION: project
//==================================================

/// Builds one map per input. Keys take their `by` traversals round-robin:
/// with fewer modulators than keys the ring wraps around.
#[derive(Debug, Clone)]
pub struct ProjectStep {
    keys: Vec<String>,
    ring: TraversalRing<Traversal>,
}

impl ProjectStep {
    pub fn new(keys: Vec<String>) -> Self {
        Self {
            keys,
            ring: TraversalRing::default(),
        }
    }

    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    pub fn ring(&self) -> &TraversalRing<Traversal> {
        &self.ring
    }

    pub(crate) fn ring_mut(&mut self) -> &mut TraversalRing<Traversal> {
        &mut self.ring
    }

    pub(crate) fn modulate_by(&mut self, modulator: Modulator) -> TraversalResult<()> {
        match modulator {
            Modulator::Traversal(traversal) => {
                self.ring.add_traversal(traversal);
                Ok(())
            }
            Modulator::Order(_) => Err(TraversalError::InvalidOption(
                "project() cannot be modulated by an order".into(),
            )),
        }
    }

    pub(crate) fn process(&mut self, graph: &Graph, item: Value) -> TraversalResult<Value> {
        self.ring.reset();
        let mut entries = Vec::with_capacity(self.keys.len());
        for key in &self.keys {
            let value = match self.ring.next() {
                Some(traversal) => traversal.first(graph, item.clone())?,
                None => Some(item.clone()),
            };
            // A key whose traversal produced nothing is left out of the map.
            if let Some(value) = value {
                entries.push((Value::String(key.clone()), value));
            }
        }
        Ok(Value::Map(entries))
    }
}

//==================================================
// SECTION: order
//==================================================

/// Sorts the whole batch. Each `by` adds a comparator; without any the
/// inputs sort ascending by their own value.
#[derive(Debug, Clone, Default)]
pub struct OrderStep {
    comparators: Vec<(Option<Traversal>, Order)>,
}

impl OrderStep {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn comparators(&self) -> &[(Option<Traversal>, Order)] {
        &self.comparators
    }

    pub(crate) fn traversals(&self) -> impl Iterator<Item = &Traversal> {
        self.comparators.iter().filter_map(|(t, _)| t.as_ref())
    }

    pub(crate) fn traversals_mut(&mut self) -> impl Iterator<Item = &mut Traversal> {
        self.comparators.iter_mut().filter_map(|(t, _)| t.as_mut())
    }

    pub(crate) fn modulate_by(&mut self, modulator: Modulator) {
        match modulator {
            Modulator::Traversal(traversal) => self.comparators.push((Some(traversal), Order::Asc)),
            Modulator::Order(order) => self.comparators.push((None, order)),
        }
    }

    pub(crate) fn process(&mut self, graph: &Graph, inputs: Vec<Value>) -> TraversalResult<Vec<Value>> {
        if self.comparators.is_empty() {
            let mut inputs = inputs;
            inputs.sort_by(|a, b| a.compare(b));
            return Ok(inputs);
        }
        let mut keyed = Vec::with_capacity(inputs.len());
        for item in inputs {
            let mut keys = Vec::with_capacity(self.comparators.len());
            for (traversal, _) in self.comparators.iter_mut() {
                let key = match traversal {
                    Some(traversal) => traversal.first(graph, item.clone())?.unwrap_or(Value::Null),
                    None => item.clone(),
                };
                keys.push(key);
            }
            keyed.push((keys, item));
        }
        let orders: Vec<Order> = self.comparators.iter().map(|(_, order)| *order).collect();
        keyed.sort_by(|(left, _), (right, _)| {
            for ((a, b), order) in left.iter().zip(right.iter()).zip(orders.iter()) {
                let ordering = match order {
                    Order::Asc => a.compare(b),
                    Order::Desc => b.compare(a),
                };
                if ordering != Ordering::Equal {
                    return ordering;
                }
            }
            Ordering::Equal
        });
        Ok(keyed.into_iter().map(|(_, item)| item).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structure::{VertexId, modern};
    use crate::traversal::anon;

    fn people() -> Vec<Value> {
        [1, 2, 4, 6].into_iter().map(|id| Value::Vertex(VertexId(id))).collect()
    }

    #[test]
    fn project_cycles_modulators_per_key() {
        let graph = modern().unwrap();
        let mut step = ProjectStep::new(vec!["a".into(), "b".into(), "c".into()]);
        step.modulate_by(Modulator::Traversal(anon::values("name"))).unwrap();
        step.modulate_by(Modulator::Traversal(anon::values("age"))).unwrap();
        let marko = step.process(&graph, Value::Vertex(VertexId(1))).unwrap();
        let vadas = step.process(&graph, Value::Vertex(VertexId(2))).unwrap();
        assert_eq!(marko.to_string(), "{a=marko, b=29, c=marko}");
        assert_eq!(vadas.to_string(), "{a=vadas, b=27, c=vadas}");
    }

    #[test]
    fn project_without_modulators_uses_input() {
        let graph = modern().unwrap();
        let mut step = ProjectStep::new(vec!["self".into()]);
        let out = step.process(&graph, Value::Integer(7)).unwrap();
        assert_eq!(out, Value::Map(vec![("self".into(), Value::Integer(7))]));
    }

    #[test]
    fn group_count_by_label() {
        let graph = modern().unwrap();
        let mut step = GroupCountStep::new();
        step.modulate_by(Modulator::Traversal(anon::label())).unwrap();
        let inputs = graph.vertex_ids().into_iter().map(Value::Vertex).collect();
        let out = step.process(&graph, inputs).unwrap();
        assert_eq!(out[0].to_string(), "{person=4, software=2}");
    }

    #[test]
    fn order_by_traversal_then_direction() {
        let graph = modern().unwrap();
        let mut step = OrderStep::new();
        step.modulate_by(Modulator::Traversal(anon::values("age")));
        let names: Vec<_> = step
            .process(&graph, people())
            .unwrap()
            .iter()
            .filter_map(|v| graph.property(v, "name"))
            .map(|v| v.to_string())
            .collect();
        assert_eq!(names, ["vadas", "marko", "josh", "peter"]);

        let mut desc = OrderStep::new();
        desc.modulate_by(Modulator::Order(Order::Desc));
        let out = desc
            .process(&graph, vec![1.into(), 3.into(), 2.into()])
            .unwrap();
        assert_eq!(out, vec![Value::Integer(3), Value::Integer(2), Value::Integer(1)]);
    }
}
