//! # cogspace
//!
//! A concurrent, in-memory, typed hypergraph ("atomspace") for
//! symbolic knowledge representation, plus a distributed coordination
//! layer for running one atomspace per cluster node: heartbeat-based
//! liveness, inter-node messaging, and a consensus vote tally for
//! proposals that need cross-node agreement.
//!
//! # Quick Start
//!
//! ```
//! use cogspace::{AtomKind, Cogspace, NodeId};
//!
//! let node = Cogspace::create(NodeId(1), "localhost", 9000);
//! let dog = node.create_atom(AtomKind::Concept, Some("dog".into()));
//! let animal = node.create_atom(AtomKind::Concept, Some("animal".into()));
//! let is_a = node.create_link(AtomKind::Evaluation, &[dog.id(), animal.id()]).unwrap();
//! assert_eq!(is_a.outgoing(), vec![dog.id(), animal.id()]);
//! ```
//!
//! The individual layers live in their own crates (`cogspace-core`,
//! `cogspace-storage`, `cogspace-concurrency`, `cogspace-durability`)
//! and are re-exported here through `cogspace-api`; this crate's only
//! job is to be the one thing downstream code depends on.

pub use cogspace_api::*;
