//! The heartbeat worker — a background thread that broadcasts a
//! liveness beacon at a fixed cadence until told to stop.

use crate::now_ms;
use cogspace_concurrency::{Message, MessageQueue};
use cogspace_core::{MessageKind, NodeId, HEARTBEAT_INTERVAL_MS};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::{debug, warn};

/// Heartbeat messages are never dropped in favor of other queued
/// traffic: they carry liveness information the rest of the cluster
/// depends on.
const HEARTBEAT_PRIORITY: i32 = 10;

/// A background thread broadcasting `Heartbeat` messages every
/// [`HEARTBEAT_INTERVAL_MS`] until `running` is cleared.
pub struct HeartbeatWorker {
    handle: Option<JoinHandle<()>>,
}

impl HeartbeatWorker {
    /// Spawn the worker thread. Returns an `OsResource` error if the
    /// underlying OS thread cannot be created.
    pub fn spawn(
        node_id: NodeId,
        queue: Arc<MessageQueue>,
        running: Arc<AtomicBool>,
    ) -> cogspace_core::Result<Self> {
        let builder = thread::Builder::new().name(format!("cogspace-heartbeat-{node_id}"));
        let handle = builder
            .spawn(move || Self::run(node_id, queue, running))
            .map_err(|e| cogspace_core::CogError::OsResource(e.to_string()))?;
        Ok(HeartbeatWorker { handle: Some(handle) })
    }

    fn run(node_id: NodeId, queue: Arc<MessageQueue>, running: Arc<AtomicBool>) {
        while running.load(Ordering::SeqCst) {
            let beacon = Message::new(MessageKind::Heartbeat, node_id, NodeId::BROADCAST, now_ms(), Vec::new());
            if let Err(e) = queue.send(beacon, HEARTBEAT_PRIORITY) {
                warn!(node = %node_id, error = %e, "dropped outgoing heartbeat, queue full");
            } else {
                debug!(node = %node_id, "heartbeat sent");
            }
            thread::sleep(Duration::from_millis(HEARTBEAT_INTERVAL_MS));
        }
    }

    /// Wait for the thread to exit. The caller is responsible for
    /// clearing `running` first; this only joins.
    pub fn join(mut self) {
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}
