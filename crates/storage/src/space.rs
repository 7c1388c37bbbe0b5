//! The `AtomSpace` — the top-level hypergraph container combining
//! id allocation, the lookup index, and insertion-order bookkeeping.

use crate::allocator::IdAllocator;
use crate::atom::Handle;
use crate::index::LookupIndex;
use cogspace_core::{AtomId, AtomKind, Result};
use parking_lot::Mutex;

/// A concurrent, in-memory, typed hypergraph of atoms.
///
/// Lock order, per the workspace-wide discipline: this type's own
/// `order` lock is acquired before the index's internal lock, which is
/// acquired before any individual handle's data lock. No method here
/// holds `order` while calling into code that takes a handle's data
/// lock directly, so the two never nest in the wrong order.
pub struct AtomSpace {
    allocator: IdAllocator,
    index: LookupIndex,
    /// Insertion-ordered record of every handle this space currently
    /// owns one retain on, used to answer `by_type`/`by_name`/`match`
    /// without a second index structure.
    order: Mutex<Vec<AtomId>>,
}

impl Default for AtomSpace {
    fn default() -> Self {
        Self::new()
    }
}

impl AtomSpace {
    /// An empty atomspace.
    pub fn new() -> Self {
        AtomSpace {
            allocator: IdAllocator::new(),
            index: LookupIndex::new(),
            order: Mutex::new(Vec::new()),
        }
    }

    /// Create a fresh, edge-less atom and return a retained handle to it.
    pub fn create(&self, kind: AtomKind, name: Option<String>) -> Handle {
        let owned = self.index.create_node(&self.allocator, kind, name);
        self.order.lock().push(owned.id());
        owned.retain()
    }

    /// Create a link over existing atoms in this space. Every id in
    /// `outgoing` must belong to this space and still be live;
    /// otherwise returns `InvalidArgument` without allocating anything.
    pub fn create_link(&self, kind: AtomKind, outgoing: &[AtomId]) -> Result<Handle> {
        let owned = self.index.create_link(&self.allocator, kind, outgoing)?;
        self.order.lock().push(owned.id());
        Ok(owned.retain())
    }

    /// Look up an atom by id. The returned handle is not retained on
    /// the caller's behalf; call [`Handle::retain`] to keep it.
    pub fn get(&self, id: AtomId) -> Option<Handle> {
        self.index.lookup(id)
    }

    /// All live atoms of a given kind, in creation order. Each returned
    /// handle is freshly retained on the caller's behalf; the caller
    /// must release every element once done with it.
    pub fn by_type(&self, kind: AtomKind) -> Vec<Handle> {
        self.order
            .lock()
            .iter()
            .filter_map(|id| self.index.lookup(*id))
            .filter(|h| h.kind() == kind)
            .map(|h| h.retain())
            .collect()
    }

    /// All live atoms with a given name, in creation order. Each
    /// returned handle is freshly retained on the caller's behalf; the
    /// caller must release every element once done with it.
    pub fn by_name(&self, name: &str) -> Vec<Handle> {
        self.order
            .lock()
            .iter()
            .filter_map(|id| self.index.lookup(*id))
            .filter(|h| h.name().as_deref() == Some(name))
            .map(|h| h.retain())
            .collect()
    }

    /// All live atoms satisfying an arbitrary predicate, in creation
    /// order. This is the general "query by predicate" operation; typed
    /// and named lookups are convenience wrappers that could be
    /// expressed in terms of it. Each returned handle is freshly
    /// retained on the caller's behalf; the caller must release every
    /// element once done with it.
    pub fn query<F>(&self, mut predicate: F) -> Vec<Handle>
    where
        F: FnMut(&Handle) -> bool,
    {
        self.order
            .lock()
            .iter()
            .filter_map(|id| self.index.lookup(*id))
            .filter(|h| predicate(h))
            .map(|h| h.retain())
            .collect()
    }

    /// Release one retain on `handle`. When the last retain on an atom
    /// is released, the atom is deregistered and its back-references on
    /// outgoing targets are repaired before those targets are, in turn,
    /// released.
    pub fn release(&self, handle: Handle) {
        self.index.release(handle);
    }

    /// Number of atoms currently registered.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// True if the space holds no atoms.
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Tear down the space, releasing the space's own retain on every
    /// atom it still owns. Atoms additionally retained by external
    /// handles survive until those handles are released too.
    pub fn destroy(self) {
        let ids = std::mem::take(&mut *self.order.lock());
        for id in ids {
            if let Some(owned) = self.index.lookup(id) {
                self.index.release(owned);
            }
        }
    }
}
