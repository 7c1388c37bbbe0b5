//! Multi-threaded exercise of the atomspace's concurrent contract:
//! lookups and queries running alongside creation/destruction never
//! observe a torn state, and refcounts stay internally consistent.

use cogspace_core::AtomKind;
use cogspace_storage::AtomSpace;
use rand::Rng;
use std::sync::Arc;
use std::thread;

#[test]
fn concurrent_create_and_lookup_never_sees_a_partial_atom() {
    let space = Arc::new(AtomSpace::new());
    let writers = 4;
    let per_writer = 200;

    let writer_handles: Vec<_> = (0..writers)
        .map(|w| {
            let space = Arc::clone(&space);
            thread::spawn(move || {
                for i in 0..per_writer {
                    let h = space.create(AtomKind::Concept, Some(format!("w{w}-{i}")));
                    assert_eq!(h.outgoing().len(), 0);
                    assert!(h.incoming().is_empty());
                }
            })
        })
        .collect();

    let reader_space = Arc::clone(&space);
    let reader = thread::spawn(move || {
        for _ in 0..2000 {
            // any atom present must be fully initialized: name set, no edges
            for h in reader_space.by_type(AtomKind::Concept) {
                assert!(h.name().is_some());
            }
        }
    });

    for h in writer_handles {
        h.join().unwrap();
    }
    reader.join().unwrap();

    assert_eq!(space.len(), writers * per_writer);
}

#[test]
fn concurrent_link_creation_keeps_refcounts_consistent() {
    let space = Arc::new(AtomSpace::new());
    let a = space.create(AtomKind::Concept, Some("shared-target".into()));
    let a_id = a.id();

    let linkers: Vec<_> = (0..8)
        .map(|_| {
            let space = Arc::clone(&space);
            thread::spawn(move || {
                let link = space.create_link(AtomKind::Link, &[a_id]).unwrap();
                link.id()
            })
        })
        .collect();

    let link_ids: Vec<_> = linkers.into_iter().map(|h| h.join().unwrap()).collect();

    let target = space.get(a_id).unwrap();
    // one retain from the space's own ownership, one per link's outgoing slot
    assert_eq!(target.refcount(), 1 + link_ids.len() as u32);
    assert_eq!(target.incoming().len(), link_ids.len());
}

#[test]
fn randomized_concurrent_workload_never_panics_or_leaves_orphaned_backlinks() {
    let space = Arc::new(AtomSpace::new());
    let seed_count = 32;
    let seed_ids: Vec<_> = (0..seed_count)
        .map(|i| space.create(AtomKind::Concept, Some(format!("seed{i}"))).id())
        .collect();
    let seed_ids = Arc::new(seed_ids);

    let workers: Vec<_> = (0..6)
        .map(|_| {
            let space = Arc::clone(&space);
            let seed_ids = Arc::clone(&seed_ids);
            thread::spawn(move || {
                let mut rng = rand::thread_rng();
                for _ in 0..300 {
                    let target = seed_ids[rng.gen_range(0..seed_ids.len())];
                    if rng.gen_bool(0.5) {
                        let _ = space.create_link(AtomKind::Link, &[target]);
                    } else {
                        let _ = space.get(target);
                    }
                }
            })
        })
        .collect();

    for w in workers {
        w.join().unwrap();
    }

    // every surviving atom's outgoing edges must still resolve to a
    // live atom whose incoming set records the backlink.
    for kind in [AtomKind::Concept, AtomKind::Link] {
        for h in space.by_type(kind) {
            for target_id in h.outgoing() {
                let target = space.get(target_id).expect("outgoing target must still be registered");
                assert!(target.incoming().contains(&h.id()));
            }
        }
    }
}

#[test]
fn release_cascade_removes_dangling_backlinks() {
    let space = AtomSpace::new();
    let a = space.create(AtomKind::Concept, Some("a".into()));
    let a_id = a.id();
    let link = space.create_link(AtomKind::Link, &[a_id]).unwrap();
    let link_id = link.id();

    space.release(link);
    assert!(space.get(link_id).is_none());

    let remaining = space.get(a_id).unwrap();
    assert!(!remaining.incoming().contains(&link_id));
}
