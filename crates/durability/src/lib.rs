//! Cluster coordination: membership and liveness, the heartbeat and
//! message-handler background workers, the consensus vote tally, and
//! the `DistributedRuntime` that ties them into a start/stop
//! lifecycle.

#![warn(missing_docs)]

pub mod consensus;
pub mod handler;
pub mod heartbeat;
pub mod membership;
pub mod runtime;

pub use consensus::{ConsensusPhase, ConsensusRecord};
pub use handler::Callbacks;
pub use membership::{MembershipTable, NodeEntry};
pub use runtime::DistributedRuntime;

use chrono::Utc;

/// Current wall-clock time in milliseconds since the Unix epoch, used
/// to stamp outgoing heartbeats and to evaluate liveness.
pub(crate) fn now_ms() -> u64 {
    Utc::now().timestamp_millis().max(0) as u64
}
