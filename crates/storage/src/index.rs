//! The concurrent id→handle lookup index, and the
//! construction/reclamation operations that need to see every atom —
//! `new_link`'s target validation and `release`'s reclamation cascade.

use crate::atom::{AtomRecord, Handle};
use crate::allocator::IdAllocator;
use chrono::Utc;
use cogspace_core::{AtomId, AtomKind, CogError, Result};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::debug;

/// Concurrent `id -> handle` map. Many-readers/few-writers: `lookup`
/// takes a shared read lock, `insert`/`remove` take an exclusive write
/// lock. Backed by a growable `HashMap` rather than the reference
/// implementation's fixed 10,007-bucket table — nothing here depends
/// on a fixed bucket count, and `std::collections::HashMap` already
/// keeps its load factor bounded as it grows.
#[derive(Debug, Default)]
pub struct LookupIndex {
    table: RwLock<HashMap<AtomId, Handle>>,
}

impl LookupIndex {
    /// An empty index.
    pub fn new() -> Self {
        LookupIndex {
            table: RwLock::new(HashMap::new()),
        }
    }

    /// Register a handle under its id. The stored `Handle` is the
    /// index's own strong reference — this realizes "the AtomSpace
    /// holds exactly one retain count on each handle it owns" (§4.4).
    pub(crate) fn insert(&self, id: AtomId, handle: Handle) {
        self.table.write().insert(id, handle);
    }

    /// Look up a handle by id. The returned `Handle` shares the same
    /// underlying atom but is **not** counted as a retain — per spec
    /// §4.4, `get` hands back a reference the caller must explicitly
    /// `retain` to keep beyond the call.
    pub fn lookup(&self, id: AtomId) -> Option<Handle> {
        self.table.read().get(&id).map(Self::peek)
    }

    fn peek(handle: &Handle) -> Handle {
        Handle(Arc::clone(&handle.0))
    }

    /// Remove and return the index's own stored handle for an id.
    pub(crate) fn remove(&self, id: AtomId) -> Option<Handle> {
        self.table.write().remove(&id)
    }

    /// Number of atoms currently registered.
    pub fn len(&self) -> usize {
        self.table.read().len()
    }

    /// True if no atoms are registered.
    pub fn is_empty(&self) -> bool {
        self.table.read().is_empty()
    }

    /// C3 `new_node`: allocate an id and register a fresh, nameable,
    /// edge-less atom. Returns the index's own (already-inserted)
    /// handle; the caller (AtomSpace) retains a second handle for the
    /// caller-visible return value.
    pub(crate) fn create_node(
        &self,
        allocator: &IdAllocator,
        kind: AtomKind,
        name: Option<String>,
    ) -> Handle {
        let id = allocator.next();
        let now = Utc::now();
        let handle = Handle::from_record(AtomRecord {
            id,
            kind,
            name,
            truth: Default::default(),
            attention: Default::default(),
            outgoing: Vec::new(),
            incoming: Vec::new(),
            created_at: now,
            last_touched_at: now,
        });
        self.insert(id, Self::peek(&handle));
        handle
    }

    /// C3 `new_link`: allocate an id, validate every outgoing target
    /// belongs to this index, then register the link and retain each
    /// target once per outgoing slot, recording the weak back-reference
    /// on the target's `incoming` set.
    pub(crate) fn create_link(
        &self,
        allocator: &IdAllocator,
        kind: AtomKind,
        outgoing: &[AtomId],
    ) -> Result<Handle> {
        // Validate before allocating anything (InvalidArgument must not
        // leave a partially constructed atom behind).
        let targets: Vec<Handle> = outgoing
            .iter()
            .map(|id| {
                self.lookup(*id)
                    .ok_or_else(|| CogError::InvalidArgument(format!("foreign or released atom {id}")))
            })
            .collect::<Result<_>>()?;

        let id = allocator.next();
        let now = Utc::now();
        let handle = Handle::from_record(AtomRecord {
            id,
            kind,
            name: None,
            truth: Default::default(),
            attention: Default::default(),
            outgoing: outgoing.to_vec(),
            incoming: Vec::new(),
            created_at: now,
            last_touched_at: now,
        });
        self.insert(id, Self::peek(&handle));

        for target in &targets {
            target.0.refcount.fetch_add(1, Ordering::SeqCst);
            target.0.data.lock().incoming.push(id);
        }

        Ok(handle)
    }

    /// Decrement the refcount; on reaching zero, repair edge symmetry
    /// (remove this atom's back-pointer from each outgoing target
    /// *before* releasing that target) and deregister the atom.
    ///
    /// Mutual cycles (two links each outgoing-referencing the other)
    /// are a known, explicitly out-of-scope limitation inherited from
    /// the reference implementation — see DESIGN.md.
    pub(crate) fn release(&self, handle: Handle) {
        let remaining = handle.0.refcount.fetch_sub(1, Ordering::SeqCst) - 1;
        if remaining != 0 {
            return;
        }

        let id = handle.id();
        let outgoing = handle.outgoing();
        debug!(atom = %id, targets = outgoing.len(), "refcount reached zero, reclaiming");
        for target_id in outgoing {
            let Some(target) = self.lookup(target_id) else {
                continue;
            };
            {
                let mut data = target.0.data.lock();
                if let Some(pos) = data.incoming.iter().position(|&x| x == id) {
                    data.incoming.remove(pos);
                }
            }
            self.release(target);
        }
        self.remove(id);
    }
}
