//! Wire format for a cluster member, carried as the payload of
//! `NodeJoin`/`NodeLeave` messages.
//!
//! ```text
//! node_id: u32 | hostname: [u8; 256] (NUL-padded) | port: u16 | active: u8 | last_heartbeat_ms: u64
//! ```
//!
//! All multi-byte fields are little-endian. The fixed 256-byte
//! hostname field mirrors the reference implementation's
//! `char hostname[256]`.

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use cogspace_core::{CogError, NodeId, Result};
use std::io::Cursor;

/// Fixed width of the NUL-padded hostname field.
pub const HOSTNAME_LEN: usize = 256;

/// Size of the encoded payload in bytes.
pub const PAYLOAD_LEN: usize = 4 + HOSTNAME_LEN + 2 + 1 + 8;

/// A decoded cluster-member snapshot, as carried on the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeEntryPayload {
    /// The member's id.
    pub node_id: NodeId,
    /// Advertised hostname.
    pub hostname: String,
    /// Advertised port.
    pub port: u16,
    /// Whether the sender considers this member active.
    pub active: bool,
    /// Milliseconds since the Unix epoch of the member's last known
    /// heartbeat, or `0` if it has none.
    pub last_heartbeat_ms: u64,
}

impl NodeEntryPayload {
    /// Encode this entry as a `NodeJoin`/`NodeLeave` message payload.
    pub fn encode(&self) -> Result<Vec<u8>> {
        if self.hostname.len() >= HOSTNAME_LEN {
            return Err(CogError::InvalidArgument(format!(
                "hostname of {} bytes does not fit the {HOSTNAME_LEN}-byte field",
                self.hostname.len()
            )));
        }

        let mut buf = Vec::with_capacity(PAYLOAD_LEN);
        buf.write_u32::<LittleEndian>(self.node_id.0).unwrap();

        let mut hostname_field = [0u8; HOSTNAME_LEN];
        hostname_field[..self.hostname.len()].copy_from_slice(self.hostname.as_bytes());
        buf.extend_from_slice(&hostname_field);

        buf.write_u16::<LittleEndian>(self.port).unwrap();
        buf.write_u8(self.active as u8).unwrap();
        buf.write_u64::<LittleEndian>(self.last_heartbeat_ms).unwrap();
        Ok(buf)
    }

    /// Decode a payload previously produced by [`NodeEntryPayload::encode`].
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != PAYLOAD_LEN {
            return Err(CogError::InvalidArgument(format!(
                "node entry payload of {} bytes, expected {PAYLOAD_LEN}",
                bytes.len()
            )));
        }

        let mut cursor = Cursor::new(bytes);
        let node_id = NodeId(cursor.read_u32::<LittleEndian>().unwrap());

        let hostname_start = cursor.position() as usize;
        let hostname_field = &bytes[hostname_start..hostname_start + HOSTNAME_LEN];
        let nul_at = hostname_field.iter().position(|&b| b == 0).unwrap_or(HOSTNAME_LEN);
        let hostname = String::from_utf8_lossy(&hostname_field[..nul_at]).into_owned();
        cursor.set_position((hostname_start + HOSTNAME_LEN) as u64);

        let port = cursor.read_u16::<LittleEndian>().unwrap();
        let active = cursor.read_u8().unwrap() != 0;
        let last_heartbeat_ms = cursor.read_u64::<LittleEndian>().unwrap();

        Ok(NodeEntryPayload {
            node_id,
            hostname,
            port,
            active,
            last_heartbeat_ms,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_a_populated_entry() {
        let entry = NodeEntryPayload {
            node_id: NodeId(7),
            hostname: "node-7.cluster.local".into(),
            port: 9000,
            active: true,
            last_heartbeat_ms: 123_456,
        };
        let bytes = entry.encode().unwrap();
        assert_eq!(bytes.len(), PAYLOAD_LEN);
        assert_eq!(NodeEntryPayload::decode(&bytes).unwrap(), entry);
    }

    #[test]
    fn rejects_a_hostname_too_long_to_fit() {
        let entry = NodeEntryPayload {
            node_id: NodeId(1),
            hostname: "x".repeat(HOSTNAME_LEN),
            port: 1,
            active: false,
            last_heartbeat_ms: 0,
        };
        assert!(entry.encode().is_err());
    }

    #[test]
    fn rejects_a_payload_of_the_wrong_length() {
        assert!(NodeEntryPayload::decode(&[0u8; 4]).is_err());
    }

    #[test]
    fn decodes_hostname_up_to_the_first_nul() {
        let entry = NodeEntryPayload {
            node_id: NodeId(1),
            hostname: "short".into(),
            port: 1,
            active: false,
            last_heartbeat_ms: 0,
        };
        let bytes = entry.encode().unwrap();
        let decoded = NodeEntryPayload::decode(&bytes).unwrap();
        assert_eq!(decoded.hostname, "short");
    }
}
