//! The inter-node message wire format.
//!
//! A message is a fixed 24-byte header followed by an opaque payload:
//!
//! ```text
//! kind: u32 | source: u32 | dest: u32 | timestamp_ms: u64 | payload_len: u32
//! ```
//!
//! All fields are little-endian. This replaces the reference
//! implementation's raw `memcpy` of a `message_t` struct (padding,
//! pointers and all) with an explicit, portable framing.

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use cogspace_core::{CogError, MessageKind, NodeId, Result};
use std::io::Cursor;

/// Size of the fixed header in bytes.
pub const HEADER_LEN: usize = 4 + 4 + 4 + 8 + 4;

/// A decoded inter-node message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    /// What this message is about.
    pub kind: MessageKind,
    /// Sending node.
    pub source: NodeId,
    /// Destination node, or [`NodeId::BROADCAST`].
    pub dest: NodeId,
    /// Sender's wall-clock timestamp, milliseconds since the Unix epoch.
    pub timestamp_ms: u64,
    /// Opaque payload bytes.
    pub payload: Vec<u8>,
}

impl Message {
    /// Build a message with an explicit timestamp.
    pub fn new(kind: MessageKind, source: NodeId, dest: NodeId, timestamp_ms: u64, payload: Vec<u8>) -> Self {
        Message {
            kind,
            source,
            dest,
            timestamp_ms,
            payload,
        }
    }

    /// Encode this message to its wire representation.
    pub fn encode(&self) -> Result<Vec<u8>> {
        if self.payload.len() > cogspace_core::DEFAULT_MAX_MESSAGE_SIZE {
            return Err(CogError::InvalidArgument(format!(
                "payload of {} bytes exceeds the {}-byte limit",
                self.payload.len(),
                cogspace_core::DEFAULT_MAX_MESSAGE_SIZE
            )));
        }

        let mut buf = Vec::with_capacity(HEADER_LEN + self.payload.len());
        buf.write_u32::<LittleEndian>(self.kind as u32)
            .expect("writes to a Vec never fail");
        buf.write_u32::<LittleEndian>(self.source.0).unwrap();
        buf.write_u32::<LittleEndian>(self.dest.0).unwrap();
        buf.write_u64::<LittleEndian>(self.timestamp_ms).unwrap();
        buf.write_u32::<LittleEndian>(self.payload.len() as u32).unwrap();
        buf.extend_from_slice(&self.payload);
        Ok(buf)
    }

    /// Decode a message previously produced by [`Message::encode`].
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < HEADER_LEN {
            return Err(CogError::InvalidArgument("message shorter than the header".into()));
        }

        let mut cursor = Cursor::new(bytes);
        let kind_raw = cursor.read_u32::<LittleEndian>().unwrap();
        let source = NodeId(cursor.read_u32::<LittleEndian>().unwrap());
        let dest = NodeId(cursor.read_u32::<LittleEndian>().unwrap());
        let timestamp_ms = cursor.read_u64::<LittleEndian>().unwrap();
        let payload_len = cursor.read_u32::<LittleEndian>().unwrap() as usize;

        let kind = MessageKind::from_u32(kind_raw)
            .ok_or_else(|| CogError::InvalidArgument(format!("unknown message kind {kind_raw}")))?;

        let body_start = cursor.position() as usize;
        let body = &bytes[body_start..];
        if body.len() != payload_len {
            return Err(CogError::InvalidArgument(format!(
                "declared payload length {payload_len} does not match actual {}",
                body.len()
            )));
        }

        Ok(Message {
            kind,
            source,
            dest,
            timestamp_ms,
            payload: body.to_vec(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_a_populated_message() {
        let msg = Message::new(MessageKind::AtomCreate, NodeId(1), NodeId(2), 42, vec![1, 2, 3, 4]);
        let bytes = msg.encode().unwrap();
        assert_eq!(bytes.len(), HEADER_LEN + 4);
        let decoded = Message::decode(&bytes).unwrap();
        assert_eq!(decoded, msg);
    }

    #[test]
    fn round_trips_an_empty_payload_heartbeat() {
        let msg = Message::new(MessageKind::Heartbeat, NodeId(7), NodeId::BROADCAST, 100, Vec::new());
        let bytes = msg.encode().unwrap();
        let decoded = Message::decode(&bytes).unwrap();
        assert_eq!(decoded, msg);
        assert!(decoded.dest.is_broadcast());
    }

    #[test]
    fn rejects_oversized_payload() {
        let huge = vec![0u8; cogspace_core::DEFAULT_MAX_MESSAGE_SIZE + 1];
        let msg = Message::new(MessageKind::AtomUpdate, NodeId(1), NodeId(2), 0, huge);
        assert!(msg.encode().is_err());
    }

    #[test]
    fn rejects_truncated_header() {
        assert!(Message::decode(&[0u8; 4]).is_err());
    }

    #[test]
    fn rejects_mismatched_payload_length() {
        let mut bytes = Message::new(MessageKind::AtomCreate, NodeId(1), NodeId(2), 0, vec![1, 2, 3])
            .encode()
            .unwrap();
        bytes.truncate(bytes.len() - 1);
        assert!(Message::decode(&bytes).is_err());
    }

    #[test]
    fn rejects_unknown_kind() {
        let mut bytes = Message::new(MessageKind::AtomCreate, NodeId(1), NodeId(2), 0, Vec::new())
            .encode()
            .unwrap();
        bytes[0] = 0xFF;
        assert!(Message::decode(&bytes).is_err());
    }
}
