//! Cluster membership and heartbeat-derived liveness.

use cogspace_core::{CogError, NodeId, Result, NODE_TIMEOUT_MS};
use parking_lot::RwLock;
use std::collections::HashMap;

/// A known cluster member.
#[derive(Debug, Clone)]
pub struct NodeEntry {
    /// The member's id.
    pub node_id: NodeId,
    /// Advertised hostname.
    pub hostname: String,
    /// Advertised port.
    pub port: u16,
    /// Wall-clock timestamp of the most recent heartbeat seen from this
    /// node, or `None` if it has never sent one.
    pub last_heartbeat_ms: Option<u64>,
}

impl NodeEntry {
    /// A node is live iff a heartbeat was observed within
    /// [`NODE_TIMEOUT_MS`] of `now_ms`. A node with no heartbeat yet is
    /// never considered live.
    pub fn is_live(&self, now_ms: u64) -> bool {
        match self.last_heartbeat_ms {
            Some(seen) => now_ms.saturating_sub(seen) < NODE_TIMEOUT_MS,
            None => false,
        }
    }
}

/// The set of known cluster members, keyed by node id.
#[derive(Debug, Default)]
pub struct MembershipTable {
    entries: RwLock<HashMap<NodeId, NodeEntry>>,
}

impl MembershipTable {
    /// An empty membership table.
    pub fn new() -> Self {
        MembershipTable {
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Register a new member. Rejects a duplicate id or the broadcast
    /// sentinel.
    pub fn add(&self, node_id: NodeId, hostname: String, port: u16) -> Result<()> {
        if node_id.is_broadcast() {
            return Err(CogError::InvalidArgument("cannot register the broadcast node id".into()));
        }
        let mut entries = self.entries.write();
        if entries.contains_key(&node_id) {
            return Err(CogError::InvalidArgument(format!("node {node_id} already registered")));
        }
        entries.insert(
            node_id,
            NodeEntry {
                node_id,
                hostname,
                port,
                last_heartbeat_ms: None,
            },
        );
        Ok(())
    }

    /// Deregister a member.
    pub fn remove(&self, node_id: NodeId) -> Result<()> {
        let mut entries = self.entries.write();
        entries
            .remove(&node_id)
            .map(|_| ())
            .ok_or_else(|| CogError::NotFound(format!("node {node_id}")))
    }

    /// True if `node_id` is currently registered.
    pub fn contains(&self, node_id: NodeId) -> bool {
        self.entries.read().contains_key(&node_id)
    }

    /// Record a heartbeat from `node_id`. Returns `false` without
    /// effect if the node is not registered, mirroring the reference
    /// implementation's silent-skip behavior for unknown senders.
    pub fn record_heartbeat(&self, node_id: NodeId, timestamp_ms: u64) -> bool {
        let mut entries = self.entries.write();
        match entries.get_mut(&node_id) {
            Some(entry) => {
                entry.last_heartbeat_ms = Some(timestamp_ms);
                true
            }
            None => false,
        }
    }

    /// Snapshot of every registered member.
    pub fn snapshot(&self) -> Vec<NodeEntry> {
        self.entries.read().values().cloned().collect()
    }

    /// Number of members considered live at `now_ms`.
    pub fn live_count(&self, now_ms: u64) -> usize {
        self.entries.read().values().filter(|e| e.is_live(now_ms)).count()
    }
}
