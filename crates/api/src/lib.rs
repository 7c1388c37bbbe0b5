//! Public API for cogspace: a node-scoped facade over the in-memory
//! atom graph ([`cogspace_storage`]) and this node's distributed
//! coordination context ([`cogspace_durability`]).

#![warn(missing_docs)]

pub mod facade;

pub use cogspace_concurrency::{Message, NodeEntryPayload};
pub use cogspace_core::{AtomId, AtomKind, AttentionValue, CogError, MessageKind, NodeId, Result, TruthValue};
pub use cogspace_durability::{Callbacks, ConsensusPhase, ConsensusRecord, NodeEntry};
pub use cogspace_storage::Handle;
pub use facade::Cogspace;
