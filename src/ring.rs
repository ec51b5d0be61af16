//==================================================
// File: ring.rs
//==================================================
// Author: ZobieLabs
// License: Duality Public License (DPL v1.0)
// Goal: Round-robin container for `by` modulators
// Objective: Hand out sub-traversals cyclically to multi-projection steps
//==================================================

use tracing::trace;

/// Cyclic sequence of sub-traversals.
///
/// `Clone` deep-copies every element but keeps the cursor where it was, so a
/// clone taken mid-rotation continues from the same phase as the original.
#[derive(Debug, Clone, PartialEq)]
pub struct TraversalRing<T> {
    traversals: Vec<T>,
    cursor: Option<usize>,
}

impl<T> Default for TraversalRing<T> {
    fn default() -> Self {
        Self {
            traversals: Vec::new(),
            cursor: None,
        }
    }
}

impl<T> TraversalRing<T> {
    pub fn new(traversals: Vec<T>) -> Self {
        Self {
            traversals,
            cursor: None,
        }
    }

    /// Advances the cursor circularly and returns the element under it, or
    /// `None` when the ring holds nothing.
    pub fn next(&mut self) -> Option<&mut T> {
        if self.traversals.is_empty() {
            return None;
        }
        let position = match self.cursor {
            Some(current) => (current + 1) % self.traversals.len(),
            None => 0,
        };
        self.cursor = Some(position);
        trace!(position, size = self.traversals.len(), "ring advanced");
        self.traversals.get_mut(position)
    }

    pub fn reset(&mut self) {
        self.cursor = None;
    }

    pub fn add_traversal(&mut self, traversal: T) {
        self.traversals.push(traversal);
    }

    pub fn is_empty(&self) -> bool {
        self.traversals.is_empty()
    }

    pub fn len(&self) -> usize {
        self.traversals.len()
    }

    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    pub fn traversals(&self) -> &[T] {
        &self.traversals
    }

    pub(crate) fn traversals_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.traversals.iter_mut()
    }
}
