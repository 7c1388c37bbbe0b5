//! Foundational types shared across the cogspace workspace:
//! identifiers, the fixed atom-kind enumeration, truth/attention
//! values, the wire message-kind enumeration, and the unified error
//! type.

#![warn(missing_docs)]

pub mod error;
pub mod ids;
pub mod kind;
pub mod message;
pub mod truth;

pub use error::{CogError, Result};
pub use ids::{AtomId, NodeId};
pub use kind::AtomKind;
pub use message::MessageKind;
pub use truth::{AttentionValue, TruthValue};

/// Liveness timeout: a node entry is considered active iff a heartbeat
/// was seen within this many milliseconds.
pub const NODE_TIMEOUT_MS: u64 = 5000;

/// Cadence at which the heartbeat worker emits a beacon.
pub const HEARTBEAT_INTERVAL_MS: u64 = 1000;

/// Default capacity of a node's inter-node message queue.
pub const DEFAULT_QUEUE_CAPACITY: usize = 100;

/// Default maximum payload size accepted by the message queue.
pub const DEFAULT_MAX_MESSAGE_SIZE: usize = 65_536;

/// Default size of a shared region, in bytes.
pub const DEFAULT_SHARED_REGION_SIZE: usize = 1024 * 1024;
