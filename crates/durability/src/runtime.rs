//! `DistributedRuntime`, the per-node coordination context tying
//! membership, the message queue, and the heartbeat/handler workers
//! into a `Created -> Running -> Stopped` lifecycle.

use crate::handler::{Callbacks, HandlerWorker};
use crate::heartbeat::HeartbeatWorker;
use crate::membership::{MembershipTable, NodeEntry};
use cogspace_concurrency::{Message, MessageQueue};
use cogspace_core::{CogError, NodeId, Result};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RuntimeState {
    Created,
    Running,
    Stopped,
}

/// A node's coordination context: membership table, inbound/outbound
/// message queue, and the background workers that keep both live.
pub struct DistributedRuntime {
    node_id: NodeId,
    hostname: String,
    port: u16,
    membership: Arc<MembershipTable>,
    queue: Arc<MessageQueue>,
    callbacks: Mutex<Arc<Callbacks>>,
    running: Arc<AtomicBool>,
    workers: Mutex<Option<(HeartbeatWorker, HandlerWorker)>>,
    state: Mutex<RuntimeState>,
}

impl DistributedRuntime {
    /// Create a runtime in the `Created` state. No threads are spawned
    /// until [`DistributedRuntime::start`].
    pub fn create(node_id: NodeId, hostname: impl Into<String>, port: u16) -> Self {
        DistributedRuntime {
            node_id,
            hostname: hostname.into(),
            port,
            membership: Arc::new(MembershipTable::new()),
            queue: Arc::new(MessageQueue::new()),
            callbacks: Mutex::new(Arc::new(Callbacks::default())),
            running: Arc::new(AtomicBool::new(false)),
            workers: Mutex::new(None),
            state: Mutex::new(RuntimeState::Created),
        }
    }

    /// This node's id.
    pub fn node_id(&self) -> NodeId {
        self.node_id
    }

    /// This node's advertised hostname.
    pub fn hostname(&self) -> &str {
        &self.hostname
    }

    /// This node's advertised port.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// True while the heartbeat and handler workers are running.
    pub fn is_running(&self) -> bool {
        *self.state.lock() == RuntimeState::Running
    }

    /// Install callback handlers for inbound traffic. Must be called
    /// before [`DistributedRuntime::start`]; registering callbacks on a
    /// running runtime returns `AlreadyRunning`, since the handler
    /// thread snapshots the callback set once at spawn time.
    pub fn register_callbacks(&self, callbacks: Callbacks) -> Result<()> {
        let state = self.state.lock();
        if *state == RuntimeState::Running {
            return Err(CogError::AlreadyRunning);
        }
        *self.callbacks.lock() = Arc::new(callbacks);
        Ok(())
    }

    /// Start the heartbeat and message-handler workers. `AlreadyRunning`
    /// if already started; a runtime that was previously stopped can be
    /// restarted. If the handler thread fails to spawn after the
    /// heartbeat thread succeeded, the heartbeat thread is stopped and
    /// joined before the error is returned, so a failed `start` never
    /// leaves a thread behind.
    pub fn start(&self) -> Result<()> {
        let mut state = self.state.lock();
        if *state == RuntimeState::Running {
            return Err(CogError::AlreadyRunning);
        }

        self.running.store(true, Ordering::SeqCst);

        let heartbeat = match HeartbeatWorker::spawn(self.node_id, Arc::clone(&self.queue), Arc::clone(&self.running)) {
            Ok(worker) => worker,
            Err(e) => {
                self.running.store(false, Ordering::SeqCst);
                return Err(e);
            }
        };

        let callbacks = Arc::clone(&self.callbacks.lock());
        let handler = match HandlerWorker::spawn(
            Arc::clone(&self.queue),
            Arc::clone(&self.membership),
            callbacks,
            Arc::clone(&self.running),
        ) {
            Ok(worker) => worker,
            Err(e) => {
                self.running.store(false, Ordering::SeqCst);
                heartbeat.join();
                return Err(e);
            }
        };

        *self.workers.lock() = Some((heartbeat, handler));
        *state = RuntimeState::Running;
        Ok(())
    }

    /// Stop the background workers and wait for both to exit.
    /// `NotRunning` if the runtime is not currently running.
    pub fn stop(&self) -> Result<()> {
        let mut state = self.state.lock();
        if *state != RuntimeState::Running {
            return Err(CogError::NotRunning);
        }

        self.running.store(false, Ordering::SeqCst);
        if let Some((heartbeat, handler)) = self.workers.lock().take() {
            heartbeat.join();
            handler.join();
        }
        *state = RuntimeState::Stopped;
        Ok(())
    }

    /// Tear down the runtime, stopping the workers first if they are
    /// still running.
    pub fn destroy(self) {
        let _ = self.stop();
    }

    /// Register a peer in this node's membership table.
    pub fn add_node(&self, node_id: NodeId, hostname: impl Into<String>, port: u16) -> Result<()> {
        self.membership.add(node_id, hostname.into(), port)
    }

    /// Remove a peer from this node's membership table.
    pub fn remove_node(&self, node_id: NodeId) -> Result<()> {
        self.membership.remove(node_id)
    }

    /// Snapshot of every known peer (including self, if registered).
    pub fn membership_snapshot(&self) -> Vec<NodeEntry> {
        self.membership.snapshot()
    }

    /// Enqueue a message for delivery.
    pub fn send_message(&self, message: Message, priority: i32) -> Result<()> {
        self.queue.send(message, priority)
    }

    /// Dequeue the next message, waiting up to `timeout_ms`.
    pub fn receive_message(&self, timeout_ms: u64) -> Result<Message> {
        self.queue.receive(timeout_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cogspace_core::MessageKind;
    use std::time::{Duration, Instant};

    #[test]
    fn lifecycle_rejects_double_start_and_double_stop() {
        let runtime = DistributedRuntime::create(NodeId(1), "localhost", 9000);
        runtime.start().unwrap();
        assert!(matches!(runtime.start(), Err(CogError::AlreadyRunning)));

        runtime.stop().unwrap();
        assert!(matches!(runtime.stop(), Err(CogError::NotRunning)));
    }

    #[test]
    fn can_restart_after_stopping() {
        let runtime = DistributedRuntime::create(NodeId(1), "localhost", 9000);
        runtime.start().unwrap();
        runtime.stop().unwrap();
        runtime.start().unwrap();
        runtime.stop().unwrap();
    }

    #[test]
    fn stop_returns_promptly() {
        let runtime = DistributedRuntime::create(NodeId(1), "localhost", 9000);
        runtime.start().unwrap();
        let started = Instant::now();
        runtime.stop().unwrap();
        assert!(started.elapsed() < Duration::from_secs(1), "shutdown must not block on a full heartbeat interval");
    }

    #[test]
    fn heartbeats_observed_by_a_peer_update_its_own_membership() {
        let runtime = DistributedRuntime::create(NodeId(1), "localhost", 9000);
        runtime.add_node(NodeId(1), "localhost", 9000).unwrap();
        runtime.start().unwrap();

        let deadline = Instant::now() + Duration::from_secs(2);
        loop {
            if runtime.membership_snapshot()[0].last_heartbeat_ms.is_some() {
                break;
            }
            assert!(Instant::now() < deadline, "self-heartbeat was never observed");
            std::thread::sleep(Duration::from_millis(20));
        }

        runtime.stop().unwrap();
    }

    #[test]
    fn send_and_receive_round_trip() {
        let runtime = DistributedRuntime::create(NodeId(1), "localhost", 9000);
        runtime
            .send_message(
                Message::new(MessageKind::AtomCreate, NodeId(1), NodeId(2), 0, vec![9]),
                0,
            )
            .unwrap();
        let received = runtime.receive_message(0).unwrap();
        assert_eq!(received.payload, vec![9]);
    }

    #[test]
    fn register_callbacks_rejected_while_running() {
        let runtime = DistributedRuntime::create(NodeId(1), "localhost", 9000);
        runtime.start().unwrap();
        assert!(matches!(runtime.register_callbacks(Callbacks::default()), Err(CogError::AlreadyRunning)));
        runtime.stop().unwrap();
    }
}
