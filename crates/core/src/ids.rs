//! Identity types for atoms and cluster nodes.

use std::fmt;

/// Process-unique identifier for an atom. `0` is reserved to mean "none"
/// and is never assigned by the allocator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AtomId(pub u64);

impl AtomId {
    /// The reserved "no atom" sentinel.
    pub const NONE: AtomId = AtomId(0);

    /// True for the reserved sentinel value.
    pub fn is_none(self) -> bool {
        self == Self::NONE
    }
}

impl fmt::Display for AtomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Identity of a process participating in the cluster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub u32);

impl NodeId {
    /// The broadcast destination used by [`crate::Message`] (`dest_node = 0`).
    pub const BROADCAST: NodeId = NodeId(0);

    /// True for the broadcast sentinel.
    pub fn is_broadcast(self) -> bool {
        self == Self::BROADCAST
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node-{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn none_sentinel() {
        assert!(AtomId::NONE.is_none());
        assert!(!AtomId(1).is_none());
    }

    #[test]
    fn broadcast_sentinel() {
        assert!(NodeId::BROADCAST.is_broadcast());
        assert!(!NodeId(3).is_broadcast());
    }

    #[test]
    fn display_formats() {
        assert_eq!(AtomId(42).to_string(), "#42");
        assert_eq!(NodeId(2).to_string(), "node-2");
    }
}
