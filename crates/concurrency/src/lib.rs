//! Inter-node communication primitives: the wire message codec, the
//! `NodeJoin`/`NodeLeave` payload codec, a bounded priority message
//! queue, and a same-process emulation of a mutual-exclusion-guarded
//! shared region.

#![warn(missing_docs)]

pub mod codec;
pub mod node_entry;
pub mod queue;
pub mod region;

pub use codec::{Message, HEADER_LEN};
pub use node_entry::NodeEntryPayload;
pub use queue::MessageQueue;
pub use region::{RegionGuard, SharedRegion};
