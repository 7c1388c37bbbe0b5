//! The public entry point: one `Cogspace` per node, combining the
//! in-memory atom graph with this node's distributed coordination
//! context.

use cogspace_concurrency::Message;
use cogspace_core::{AtomId, AtomKind, NodeId, Result};
use cogspace_durability::{Callbacks, DistributedRuntime, NodeEntry};
use cogspace_storage::{AtomSpace, Handle};
use tracing::{info, instrument};

/// A single node's view of the knowledge graph plus its cluster
/// coordination context. Graph operations (`create_atom`, `get`, ...)
/// and cluster operations (`start`, `send_message`, ...) are both
/// reachable from here; nothing about either layer requires going
/// through the other; a `Cogspace` that never calls `start` is a
/// perfectly usable single-process atomspace.
pub struct Cogspace {
    space: AtomSpace,
    runtime: DistributedRuntime,
}

impl Cogspace {
    /// Create a node. No background threads are running yet — call
    /// [`Cogspace::start`] to begin heartbeating and handling inbound
    /// messages.
    pub fn create(node_id: NodeId, hostname: impl Into<String>, port: u16) -> Self {
        let hostname = hostname.into();
        info!(%node_id, %hostname, port, "cogspace node created");
        Cogspace {
            space: AtomSpace::new(),
            runtime: DistributedRuntime::create(node_id, hostname, port),
        }
    }

    /// This node's id.
    pub fn node_id(&self) -> NodeId {
        self.runtime.node_id()
    }

    /// Install callbacks for inbound traffic. See
    /// [`DistributedRuntime::register_callbacks`] for the before-start
    /// requirement.
    pub fn register_callbacks(&self, callbacks: Callbacks) -> Result<()> {
        self.runtime.register_callbacks(callbacks)
    }

    /// Start the heartbeat and message-handler workers.
    #[instrument(skip(self), fields(node_id = %self.node_id()))]
    pub fn start(&self) -> Result<()> {
        let result = self.runtime.start();
        if result.is_ok() {
            info!("node started");
        }
        result
    }

    /// Stop the heartbeat and message-handler workers.
    #[instrument(skip(self), fields(node_id = %self.node_id()))]
    pub fn stop(&self) -> Result<()> {
        let result = self.runtime.stop();
        if result.is_ok() {
            info!("node stopped");
        }
        result
    }

    /// Register a peer.
    pub fn add_node(&self, node_id: NodeId, hostname: impl Into<String>, port: u16) -> Result<()> {
        self.runtime.add_node(node_id, hostname, port)
    }

    /// Deregister a peer.
    pub fn remove_node(&self, node_id: NodeId) -> Result<()> {
        self.runtime.remove_node(node_id)
    }

    /// Snapshot of known peers.
    pub fn membership(&self) -> Vec<NodeEntry> {
        self.runtime.membership_snapshot()
    }

    /// Enqueue a message for delivery.
    pub fn send_message(&self, message: Message, priority: i32) -> Result<()> {
        self.runtime.send_message(message, priority)
    }

    /// Dequeue the next inbound message, waiting up to `timeout_ms`.
    /// There is no separate "free" operation: the returned `Message`
    /// owns its payload and is reclaimed like any other Rust value once
    /// dropped.
    pub fn receive_message(&self, timeout_ms: u64) -> Result<Message> {
        self.runtime.receive_message(timeout_ms)
    }

    /// Create a fresh, edge-less atom.
    pub fn create_atom(&self, kind: AtomKind, name: Option<String>) -> Handle {
        self.space.create(kind, name)
    }

    /// Create a link over existing atoms.
    pub fn create_link(&self, kind: AtomKind, outgoing: &[AtomId]) -> Result<Handle> {
        self.space.create_link(kind, outgoing)
    }

    /// Look up an atom by id.
    pub fn get(&self, id: AtomId) -> Option<Handle> {
        self.space.get(id)
    }

    /// All live atoms of a given kind, each retained on the caller's
    /// behalf; release every element once done with it.
    pub fn by_type(&self, kind: AtomKind) -> Vec<Handle> {
        self.space.by_type(kind)
    }

    /// All live atoms with a given name, each retained on the caller's
    /// behalf; release every element once done with it.
    pub fn by_name(&self, name: &str) -> Vec<Handle> {
        self.space.by_name(name)
    }

    /// All live atoms satisfying an arbitrary predicate, each retained
    /// on the caller's behalf; release every element once done with it.
    pub fn query<F>(&self, predicate: F) -> Vec<Handle>
    where
        F: FnMut(&Handle) -> bool,
    {
        self.space.query(predicate)
    }

    /// Release a retained handle.
    pub fn release(&self, handle: Handle) {
        self.space.release(handle);
    }

    /// Number of atoms currently stored.
    pub fn atom_count(&self) -> usize {
        self.space.len()
    }

    /// Tear the node down: stop the workers (if running) and release
    /// every atom the space still owns.
    pub fn destroy(self) {
        info!(node_id = %self.node_id(), "cogspace node destroyed");
        let _ = self.runtime.stop();
        self.space.destroy();
    }
}
