//! Wire-level message kind enumeration shared by the concurrency and
//! durability crates.

/// The kind of an inter-node message. Numeric values are stable: they
/// are what actually crosses the wire in the fixed-size header (see
/// `cogspace-concurrency::codec`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum MessageKind {
    /// Replicate a newly created atom.
    AtomCreate = 0,
    /// Replicate a mutation to an existing atom.
    AtomUpdate = 1,
    /// Replicate an atom's deletion.
    AtomDelete = 2,
    /// Ask a peer to evaluate a query.
    AtomQuery = 3,
    /// Answer to an `AtomQuery`.
    AtomResponse = 4,
    /// Ask a peer for a full state sync.
    SyncRequest = 5,
    /// Answer to a `SyncRequest`.
    SyncResponse = 6,
    /// Periodic liveness beacon.
    Heartbeat = 7,
    /// Announce a new cluster member.
    NodeJoin = 8,
    /// Announce a member's departure.
    NodeLeave = 9,
}

impl MessageKind {
    /// Decode a wire-format kind value. Unknown values are rejected by
    /// the caller (the codec surfaces `InvalidArgument`) — there is no
    /// catch-all "unknown" kind to fall back to.
    pub fn from_u32(value: u32) -> Option<Self> {
        use MessageKind::*;
        Some(match value {
            0 => AtomCreate,
            1 => AtomUpdate,
            2 => AtomDelete,
            3 => AtomQuery,
            4 => AtomResponse,
            5 => SyncRequest,
            6 => SyncResponse,
            7 => Heartbeat,
            8 => NodeJoin,
            9 => NodeLeave,
            _ => return None,
        })
    }
}
