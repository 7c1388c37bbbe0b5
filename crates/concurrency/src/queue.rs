//! A bounded, multi-producer/multi-consumer priority message queue.
//!
//! Grounded on the reference implementation's `message_queue_send`/
//! `message_queue_receive` pair (a System V message queue keyed by
//! priority, non-blocking send, timeout-bounded receive) but expressed
//! as a plain in-process structure: a capacity-bounded binary heap
//! guarded by a `parking_lot::Mutex` and signaled with a `Condvar`,
//! rather than shelling out to `msgsnd`/`msgrcv`.

use crate::codec::Message;
use cogspace_core::{CogError, Result, DEFAULT_QUEUE_CAPACITY};
use parking_lot::{Condvar, Mutex};
use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::Duration;
use tracing::warn;

struct Entry {
    priority: i32,
    sequence: u64,
    message: Message,
}

impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        self.priority == other.priority && self.sequence == other.sequence
    }
}
impl Eq for Entry {}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Entry {
    /// Higher priority sorts first; equal priority falls back to
    /// insertion order (earlier sequence numbers sort first), giving
    /// FIFO behavior within a priority band.
    fn cmp(&self, other: &Self) -> Ordering {
        self.priority
            .cmp(&other.priority)
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

/// A bounded priority queue of wire messages.
pub struct MessageQueue {
    capacity: usize,
    max_message_size: usize,
    next_sequence: AtomicU64,
    state: Mutex<BinaryHeap<Entry>>,
    not_empty: Condvar,
}

impl MessageQueue {
    /// A queue with the workspace's default capacity and message size
    /// limit (100 messages, 64 KiB each).
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_QUEUE_CAPACITY, cogspace_core::DEFAULT_MAX_MESSAGE_SIZE)
    }

    /// A queue with an explicit capacity and per-message size limit.
    pub fn with_capacity(capacity: usize, max_message_size: usize) -> Self {
        MessageQueue {
            capacity,
            max_message_size,
            next_sequence: AtomicU64::new(0),
            state: Mutex::new(BinaryHeap::new()),
            not_empty: Condvar::new(),
        }
    }

    /// Enqueue a message at the given priority (higher values drain
    /// first). Never blocks: returns `QueueFull` if the queue is at
    /// capacity, or `InvalidArgument` if the payload exceeds the
    /// configured message size limit.
    pub fn send(&self, message: Message, priority: i32) -> Result<()> {
        if message.payload.len() > self.max_message_size {
            return Err(CogError::InvalidArgument(format!(
                "payload of {} bytes exceeds the {}-byte limit",
                message.payload.len(),
                self.max_message_size
            )));
        }

        let mut state = self.state.lock();
        if state.len() >= self.capacity {
            warn!(capacity = self.capacity, "message queue at capacity, rejecting send");
            return Err(CogError::QueueFull);
        }
        let sequence = self.next_sequence.fetch_add(1, AtomicOrdering::SeqCst);
        state.push(Entry {
            priority,
            sequence,
            message,
        });
        self.not_empty.notify_one();
        Ok(())
    }

    /// Dequeue the highest-priority (then oldest) message, waiting up
    /// to `timeout_ms` for one to arrive. `TimedOut` if the deadline
    /// elapses with nothing available; `timeout_ms == 0` polls once
    /// without waiting.
    pub fn receive(&self, timeout_ms: u64) -> Result<Message> {
        let mut state = self.state.lock();
        if let Some(entry) = state.pop() {
            return Ok(entry.message);
        }
        if timeout_ms == 0 {
            return Err(CogError::TimedOut);
        }

        let deadline = Duration::from_millis(timeout_ms);
        let result = self.not_empty.wait_for(&mut state, deadline);
        if result.timed_out() && state.is_empty() {
            return Err(CogError::TimedOut);
        }
        state.pop().map(|entry| entry.message).ok_or(CogError::TimedOut)
    }

    /// Number of messages currently queued.
    pub fn len(&self) -> usize {
        self.state.lock().len()
    }

    /// True if no messages are queued.
    pub fn is_empty(&self) -> bool {
        self.state.lock().is_empty()
    }
}

impl Default for MessageQueue {
    fn default() -> Self {
        Self::new()
    }
}
