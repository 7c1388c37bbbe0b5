//! The atom record and the refcounted handle that points to it.
//!
//! `outgoing` edges are the graph's single strong-ownership axis: a
//! link retains each of its targets once per outgoing slot. `incoming`
//! is a weak back-reference multiset recorded purely for bookkeeping
//! — adding to it never bumps a refcount, matching the
//! back-pointer-only behavior of the reference implementation (see
//! DESIGN.md for the cyclic-reference caveat this implies).

use chrono::{DateTime, Utc};
use cogspace_core::{AtomId, AtomKind, AttentionValue, CogError, Result, TruthValue};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

/// The atom's mutable data (truth, attention, edges, timestamps).
#[derive(Debug, Clone)]
pub struct AtomRecord {
    /// This atom's id.
    pub id: AtomId,
    /// The atom's fixed kind.
    pub kind: AtomKind,
    /// Optional name (present for named nodes, absent for pure links).
    pub name: Option<String>,
    /// Probabilistic truth value.
    pub truth: TruthValue,
    /// Attention (importance) value.
    pub attention: AttentionValue,
    /// Ordered outgoing edges (empty for nodes).
    pub outgoing: Vec<AtomId>,
    /// Weak back-references: atoms whose outgoing set contains this one.
    pub incoming: Vec<AtomId>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Timestamp of the most recent read or write.
    pub last_touched_at: DateTime<Utc>,
}

/// The refcounted storage cell behind a [`Handle`]. Not exposed
/// directly; all access goes through `Handle`'s methods or, for
/// lifecycle operations, the owning [`crate::index::LookupIndex`].
#[derive(Debug)]
pub(crate) struct AtomCell {
    pub(crate) refcount: AtomicU32,
    pub(crate) data: Mutex<AtomRecord>,
}

impl AtomCell {
    fn new(record: AtomRecord) -> Self {
        AtomCell {
            refcount: AtomicU32::new(1),
            data: Mutex::new(record),
        }
    }
}

/// An externally visible, refcounted reference to an atom.
///
/// Handles are retained before being stored and released before being
/// discarded (spec §3's "shared ownership discipline"). `Handle` does
/// not implement `Clone`: the only way to obtain an additional
/// reference is [`Handle::retain`], which makes the bump explicit at
/// every call site — idiomatic Rust's `Clone` would make that bump
/// silent.
#[derive(Debug)]
pub struct Handle(pub(crate) Arc<AtomCell>);

impl Handle {
    pub(crate) fn from_record(record: AtomRecord) -> Self {
        Handle(Arc::new(AtomCell::new(record)))
    }

    pub(crate) fn cell_ptr(&self) -> *const () {
        Arc::as_ptr(&self.0) as *const ()
    }

    /// This handle's atom id.
    pub fn id(&self) -> AtomId {
        self.0.data.lock().id
    }

    /// This atom's kind.
    pub fn kind(&self) -> AtomKind {
        self.0.data.lock().kind
    }

    /// This atom's name, if any.
    pub fn name(&self) -> Option<String> {
        self.0.data.lock().name.clone()
    }

    /// Snapshot of the ordered outgoing set.
    pub fn outgoing(&self) -> Vec<AtomId> {
        self.0.data.lock().outgoing.clone()
    }

    /// Snapshot of the weak incoming back-reference set.
    pub fn incoming(&self) -> Vec<AtomId> {
        self.0.data.lock().incoming.clone()
    }

    /// Current logical refcount (see DESIGN.md for the weak-incoming
    /// caveat this carries).
    pub fn refcount(&self) -> u32 {
        self.0.refcount.load(Ordering::SeqCst)
    }

    /// Increment the refcount, returning a new `Handle` sharing this
    /// atom's identity.
    pub fn retain(&self) -> Handle {
        self.0.refcount.fetch_add(1, Ordering::SeqCst);
        Handle(Arc::clone(&self.0))
    }

    /// Read the truth value, touching `last_touched_at` (observed
    /// source behavior: getters touch the timestamp too).
    pub fn truth(&self) -> TruthValue {
        let mut data = self.0.data.lock();
        data.last_touched_at = Utc::now();
        data.truth
    }

    /// Assign a truth value and touch `last_touched_at`. Rejects
    /// out-of-range components with `InvalidArgument` rather than
    /// silently clamping them.
    pub fn set_truth(&self, strength: f64, confidence: f64) -> Result<()> {
        if TruthValue::is_out_of_range(strength, confidence) {
            return Err(CogError::InvalidArgument(format!(
                "truth value ({strength}, {confidence}) out of the [0, 1] range"
            )));
        }
        let mut data = self.0.data.lock();
        data.truth = TruthValue::new(strength, confidence);
        data.last_touched_at = Utc::now();
        Ok(())
    }

    /// Read the attention value, touching `last_touched_at`.
    pub fn attention(&self) -> AttentionValue {
        let mut data = self.0.data.lock();
        data.last_touched_at = Utc::now();
        data.attention
    }

    /// Assign an attention value and touch `last_touched_at`.
    pub fn set_attention(&self, sti: i16, lti: i16, vlti: i16) {
        let mut data = self.0.data.lock();
        data.attention = AttentionValue::new(sti, lti, vlti);
        data.last_touched_at = Utc::now();
    }

    /// Timestamps snapshot, mostly useful for tests.
    pub fn timestamps(&self) -> (DateTime<Utc>, DateTime<Utc>) {
        let data = self.0.data.lock();
        (data.created_at, data.last_touched_at)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make(id: u64, kind: AtomKind, name: Option<&str>) -> Handle {
        let now = Utc::now();
        Handle::from_record(AtomRecord {
            id: AtomId(id),
            kind,
            name: name.map(str::to_string),
            truth: TruthValue::default(),
            attention: AttentionValue::default(),
            outgoing: Vec::new(),
            incoming: Vec::new(),
            created_at: now,
            last_touched_at: now,
        })
    }

    #[test]
    fn retain_bumps_refcount_and_shares_identity() {
        let h = make(1, AtomKind::Concept, Some("x"));
        assert_eq!(h.refcount(), 1);
        let h2 = h.retain();
        assert_eq!(h.refcount(), 2);
        assert_eq!(h2.refcount(), 2);
        assert_eq!(h.cell_ptr(), h2.cell_ptr());
    }

    #[test]
    fn truth_round_trip() {
        let h = make(1, AtomKind::Concept, Some("x"));
        h.set_truth(0.8, 0.9).unwrap();
        let tv = h.truth();
        assert_eq!(tv.strength, 0.8);
        assert_eq!(tv.confidence, 0.9);
    }

    #[test]
    fn truth_rejects_out_of_range_components() {
        let h = make(1, AtomKind::Concept, None);
        let err = h.set_truth(2.0, -1.0).unwrap_err();
        assert!(err.is_caller_error());
        // the rejected assignment must not have taken effect
        let tv = h.truth();
        assert_eq!(tv, TruthValue::default());
    }

    #[test]
    fn attention_round_trip() {
        let h = make(1, AtomKind::Concept, None);
        h.set_attention(100, 50, 25);
        let av = h.attention();
        assert_eq!(av, AttentionValue::new(100, 50, 25));
    }

    #[test]
    fn getters_touch_last_access_time() {
        let h = make(1, AtomKind::Concept, None);
        let (created, first_touch) = h.timestamps();
        std::thread::sleep(std::time::Duration::from_millis(2));
        let _ = h.truth();
        let (_, second_touch) = h.timestamps();
        assert_eq!(h.timestamps().0, created);
        assert!(second_touch >= first_touch);
    }
}
