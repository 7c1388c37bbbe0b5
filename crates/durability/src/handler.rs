//! The message handler worker — drains the inbound queue and
//! dispatches each message to membership bookkeeping or a registered
//! callback, depending on its kind.

use crate::membership::MembershipTable;
use cogspace_concurrency::{Message, MessageQueue, NodeEntryPayload};
use cogspace_core::{CogError, MessageKind};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use tracing::{debug, trace, warn};

/// Cadence at which the handler polls the queue for new work while
/// checking whether it has been asked to stop.
const RECEIVE_POLL_MS: u64 = 100;

/// User-supplied reactions to inbound traffic. Each field defaults to
/// `None`; an unset callback means the corresponding event is observed
/// only through its effect on membership (for `Heartbeat`) or silently
/// dropped (for everything else).
#[derive(Default)]
pub struct Callbacks {
    /// Invoked for every message kind other than `Heartbeat`,
    /// `NodeJoin`, and `NodeLeave`, which are handled internally.
    pub on_message: Option<Box<dyn Fn(&Message) + Send + Sync>>,
    /// Invoked when a `NodeJoin` message arrives, with its payload
    /// decoded into the joining node's full entry.
    pub on_node_join: Option<Box<dyn Fn(NodeEntryPayload) + Send + Sync>>,
    /// Invoked when a `NodeLeave` message arrives, with its payload
    /// decoded into the departing node's full entry.
    pub on_node_leave: Option<Box<dyn Fn(NodeEntryPayload) + Send + Sync>>,
}

/// A background thread that repeatedly receives from a [`MessageQueue`]
/// and dispatches each message until told to stop.
pub struct HandlerWorker {
    handle: Option<JoinHandle<()>>,
}

impl HandlerWorker {
    /// Spawn the worker thread.
    pub fn spawn(
        queue: Arc<MessageQueue>,
        membership: Arc<MembershipTable>,
        callbacks: Arc<Callbacks>,
        running: Arc<AtomicBool>,
    ) -> cogspace_core::Result<Self> {
        let handle = thread::Builder::new()
            .name("cogspace-handler".into())
            .spawn(move || Self::run(queue, membership, callbacks, running))
            .map_err(|e| CogError::OsResource(e.to_string()))?;
        Ok(HandlerWorker { handle: Some(handle) })
    }

    fn run(queue: Arc<MessageQueue>, membership: Arc<MembershipTable>, callbacks: Arc<Callbacks>, running: Arc<AtomicBool>) {
        while running.load(Ordering::SeqCst) {
            match queue.receive(RECEIVE_POLL_MS) {
                Ok(msg) => Self::dispatch(&msg, &membership, &callbacks),
                Err(CogError::TimedOut) => trace!("handler poll found nothing queued"),
                Err(e) => debug!(error = %e, "handler receive failed"),
            }
        }
    }

    fn dispatch(msg: &Message, membership: &MembershipTable, callbacks: &Callbacks) {
        match msg.kind {
            MessageKind::Heartbeat => {
                membership.record_heartbeat(msg.source, msg.timestamp_ms);
            }
            MessageKind::NodeJoin => match NodeEntryPayload::decode(&msg.payload) {
                Ok(entry) => {
                    if let Some(cb) = &callbacks.on_node_join {
                        cb(entry);
                    }
                }
                Err(e) => warn!(error = %e, "dropping NodeJoin with an undecodable payload"),
            },
            MessageKind::NodeLeave => match NodeEntryPayload::decode(&msg.payload) {
                Ok(entry) => {
                    if let Some(cb) = &callbacks.on_node_leave {
                        cb(entry);
                    }
                }
                Err(e) => warn!(error = %e, "dropping NodeLeave with an undecodable payload"),
            },
            _ => {
                if let Some(cb) = &callbacks.on_message {
                    cb(msg);
                }
            }
        }
    }

    /// Wait for the thread to exit. The caller clears `running` first.
    pub fn join(mut self) {
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cogspace_core::NodeId;
    use std::sync::Mutex as StdMutex;

    #[test]
    fn heartbeat_messages_update_membership() {
        let queue = Arc::new(MessageQueue::new());
        let membership = Arc::new(MembershipTable::new());
        membership.add(NodeId(5), "host".into(), 9000).unwrap();
        let callbacks = Arc::new(Callbacks::default());
        let running = Arc::new(AtomicBool::new(true));

        queue
            .send(
                Message::new(MessageKind::Heartbeat, NodeId(5), NodeId::BROADCAST, 12345, Vec::new()),
                0,
            )
            .unwrap();

        let worker = HandlerWorker::spawn(Arc::clone(&queue), Arc::clone(&membership), callbacks, Arc::clone(&running)).unwrap();

        let deadline = std::time::Instant::now() + std::time::Duration::from_secs(2);
        loop {
            if membership.snapshot()[0].last_heartbeat_ms == Some(12345) {
                break;
            }
            assert!(std::time::Instant::now() < deadline, "heartbeat was never recorded");
            thread::sleep(std::time::Duration::from_millis(10));
        }

        running.store(false, Ordering::SeqCst);
        worker.join();
    }

    #[test]
    fn node_join_invokes_the_registered_callback_with_the_decoded_entry() {
        let queue = Arc::new(MessageQueue::new());
        let membership = Arc::new(MembershipTable::new());
        let seen = Arc::new(StdMutex::new(None));
        let seen_clone = Arc::clone(&seen);
        let callbacks = Arc::new(Callbacks {
            on_node_join: Some(Box::new(move |entry| {
                *seen_clone.lock().unwrap() = Some(entry);
            })),
            ..Default::default()
        });
        let running = Arc::new(AtomicBool::new(true));

        let entry = NodeEntryPayload {
            node_id: NodeId(7),
            hostname: "node-7".into(),
            port: 9001,
            active: true,
            last_heartbeat_ms: 0,
        };
        queue
            .send(
                Message::new(MessageKind::NodeJoin, NodeId(7), NodeId::BROADCAST, 0, entry.encode().unwrap()),
                0,
            )
            .unwrap();

        let worker = HandlerWorker::spawn(queue, membership, callbacks, Arc::clone(&running)).unwrap();

        let deadline = std::time::Instant::now() + std::time::Duration::from_secs(2);
        loop {
            if *seen.lock().unwrap() == Some(entry.clone()) {
                break;
            }
            assert!(std::time::Instant::now() < deadline, "callback was never invoked");
            thread::sleep(std::time::Duration::from_millis(10));
        }

        running.store(false, Ordering::SeqCst);
        worker.join();
    }
}
