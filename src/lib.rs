//==================================================
// File: lib.rs
//==================================================
// Author: ZobieLabs
// License: Duality Public License (DPL v1.0)
// Goal: SolvraGremlin crate root
// Objective: Traversal bytecode, strategy pipeline, branch and projection
//            steps over a small in-memory property graph
//==================================================

//! A graph traversal core.
//!
//! ```
//! use solvra_gremlin::{GraphTraversalSource, Value, anon, structure::modern};
//!
//! let g = GraphTraversalSource::new(modern().unwrap());
//! let names = g
//!     .v()
//!     .has_label("person")
//!     .out_labeled("created")
//!     .values("name")
//!     .to_list()
//!     .unwrap();
//! assert_eq!(names.len(), 4);
//! assert!(names.contains(&Value::from("ripple")));
//! # let _ = anon::identity();
//! ```

pub mod bytecode;
pub mod config;
pub mod error;
pub mod logging;
pub mod ring;
pub mod step;
pub mod strategy;
pub mod structure;
pub mod traversal;

pub use bytecode::{Argument, Binding, Bytecode, Instruction};
pub use config::TraversalConfig;
pub use error::{ErrorCode, TraversalError, TraversalResult};
pub use ring::TraversalRing;
pub use strategy::{StrategyCategory, StrategyRef, StrategySet, TraversalStrategy};
pub use structure::{Direction, Graph, Value};
pub use traversal::token::{Column, Order, Pick};
pub use traversal::translator::Translator;
pub use traversal::{ExecutionMode, GraphTraversalSource, Traversal, anon};
