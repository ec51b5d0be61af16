//! Anonymous traversal constructors, for sub-traversals passed to `by`,
//! `option`, `choose`, `filter` and friends.
//!
//! ```
//! use solvra_gremlin::traversal::anon;
//! let knows = anon::out_labeled("knows").values("name");
//! assert!(knows.is_anonymous());
//! ```

use super::Names;
use super::Traversal;
use super::lambda::Lambda;
use super::token::Column;
use crate::structure::Value;

pub fn start() -> Traversal {
    Traversal::start()
}

pub fn out() -> Traversal {
    Traversal::start().out()
}

pub fn out_labeled(labels: impl Into<Names>) -> Traversal {
    Traversal::start().out_labeled(labels)
}

pub fn in_() -> Traversal {
    Traversal::start().in_()
}

pub fn in_labeled(labels: impl Into<Names>) -> Traversal {
    Traversal::start().in_labeled(labels)
}

pub fn both() -> Traversal {
    Traversal::start().both()
}

pub fn both_labeled(labels: impl Into<Names>) -> Traversal {
    Traversal::start().both_labeled(labels)
}

pub fn out_e() -> Traversal {
    Traversal::start().out_e()
}

pub fn out_e_labeled(labels: impl Into<Names>) -> Traversal {
    Traversal::start().out_e_labeled(labels)
}

pub fn in_e() -> Traversal {
    Traversal::start().in_e()
}

pub fn in_e_labeled(labels: impl Into<Names>) -> Traversal {
    Traversal::start().in_e_labeled(labels)
}

pub fn out_v() -> Traversal {
    Traversal::start().out_v()
}

pub fn in_v() -> Traversal {
    Traversal::start().in_v()
}

pub fn has_label(labels: impl Into<Names>) -> Traversal {
    Traversal::start().has_label(labels)
}

pub fn has(key: &str, value: impl Into<Value>) -> Traversal {
    Traversal::start().has(key, value)
}

pub fn values(keys: impl Into<Names>) -> Traversal {
    Traversal::start().values(keys)
}

pub fn value_map() -> Traversal {
    Traversal::start().value_map()
}

pub fn label() -> Traversal {
    Traversal::start().label()
}

pub fn id() -> Traversal {
    Traversal::start().id()
}

pub fn identity() -> Traversal {
    Traversal::start().identity()
}

pub fn count() -> Traversal {
    Traversal::start().count()
}

pub fn is(value: impl Into<Value>) -> Traversal {
    Traversal::start().is(value)
}

pub fn unfold() -> Traversal {
    Traversal::start().unfold()
}

pub fn select(column: Column) -> Traversal {
    Traversal::start().select(column)
}

pub fn filter(traversal: Traversal) -> Traversal {
    Traversal::start().filter(traversal)
}

pub fn and(traversals: Vec<Traversal>) -> Traversal {
    Traversal::start().and(traversals)
}

pub fn repeat(traversal: Traversal) -> Traversal {
    Traversal::start().repeat(traversal)
}

pub fn choose(selector: Traversal) -> Traversal {
    Traversal::start().choose(selector)
}

pub fn choose_if(predicate: Traversal, true_branch: Traversal, false_branch: Traversal) -> Traversal {
    Traversal::start().choose_if(predicate, true_branch, false_branch)
}

pub fn choose_lambda(predicate: Lambda, true_branch: Traversal, false_branch: Traversal) -> Traversal {
    Traversal::start().choose_lambda(predicate, true_branch, false_branch)
}

pub fn group_count() -> Traversal {
    Traversal::start().group_count()
}

pub fn project(keys: impl Into<Names>) -> Traversal {
    Traversal::start().project(keys)
}

pub fn order() -> Traversal {
    Traversal::start().order()
}
