//! Property-based coverage of the testable properties in spec §8: bitmap
//! population matches size, occupied slots stay rank-sorted, every present
//! key is found and every absent key is not, load factor never exceeds
//! 7/8, `clear` resets to a fresh map's behavior, and insert/erase round
//! trips back to the pre-insert state.
use patchmap::{NativeHash, PatchMap, RankedHash};
use proptest::collection::vec;
use proptest::prelude::*;

/// P1 at the public-API boundary: a full traversal visits exactly `len()`
/// occupied slots, matching the bitmap's population count one-for-one.
fn iteration_count_matches_len(m: &PatchMap<u32, u32, NativeHash<u32>>) -> bool {
    m.iter().count() == m.len()
}

/// Checks P2: occupied slots appear in strictly ascending rank order.
/// `NativeHash` scrambles keys (`src/hash.rs`'s splitmix-style mix), so
/// rank order is not numeric key order — compare the ranks themselves.
fn is_rank_sorted(m: &PatchMap<u32, u32, NativeHash<u32>>) -> bool {
    let hasher = NativeHash::<u32>::default();
    let ranks: Vec<u64> = m.iter().map(|(k, _)| hasher.order(&k)).collect();
    ranks.windows(2).all(|w| w[0] < w[1])
}

proptest! {
    /// P1/P5/P2: after an arbitrary sequence of inserts and erases, the
    /// live count matches the occupancy bitmap's population, the load
    /// factor never exceeds 7/8, and occupied slots stay rank-sorted.
    #[test]
    fn invariants_hold_after_arbitrary_mutation(
        ops in vec((any::<bool>(), 0u32..500), 0..400)
    ) {
        let mut m: PatchMap<u32, u32, NativeHash<u32>> = PatchMap::with_hasher(NativeHash::default());
        for (is_insert, k) in ops {
            if is_insert {
                m.insert(k, k);
            } else {
                m.erase(&k);
            }
            prop_assert!(iteration_count_matches_len(&m));
            prop_assert!(is_rank_sorted(&m));
            if m.capacity() > 0 {
                prop_assert!(m.len() as f64 / m.capacity() as f64 <= m.max_load_factor());
            }
        }
    }

    /// P3/P4: every key actually present is found, every key never
    /// inserted (or already erased) is reported absent.
    #[test]
    fn membership_matches_reference_set(
        inserted in vec(0u32..300, 0..200),
        probed in vec(0u32..300, 0..50),
    ) {
        let mut m: PatchMap<u32, u32, NativeHash<u32>> = PatchMap::with_hasher(NativeHash::default());
        let mut reference = std::collections::BTreeSet::new();
        for k in &inserted {
            m.insert(*k, *k);
            reference.insert(*k);
        }
        for k in &reference {
            prop_assert!(m.contains_key(k));
        }
        for k in &probed {
            prop_assert_eq!(m.contains_key(k), reference.contains(k));
        }
    }

    /// P6: `clear()` then replaying a sequence matches a fresh map fed
    /// the same sequence.
    #[test]
    fn clear_then_replay_matches_fresh_map(
        prelude in vec(0u32..200, 0..100),
        replay in vec(0u32..200, 0..100),
    ) {
        let mut m: PatchMap<u32, u32, NativeHash<u32>> = PatchMap::with_hasher(NativeHash::default());
        for k in &prelude {
            m.insert(*k, *k);
        }
        m.clear();
        for k in &replay {
            m.insert(*k, *k);
        }

        let mut fresh: PatchMap<u32, u32, NativeHash<u32>> = PatchMap::with_hasher(NativeHash::default());
        for k in &replay {
            fresh.insert(*k, *k);
        }
        prop_assert_eq!(m.len(), fresh.len());
        for k in &replay {
            prop_assert_eq!(m.get(k), fresh.get(k));
        }
    }

    /// P7: inserting then erasing the same key leaves membership and size
    /// equivalent to the state just before the insert.
    #[test]
    fn insert_erase_round_trips(
        prelude in vec(0u32..200, 0..100),
        k in 0u32..200,
    ) {
        let mut m: PatchMap<u32, u32, NativeHash<u32>> = PatchMap::with_hasher(NativeHash::default());
        for key in &prelude {
            m.insert(*key, *key);
        }
        let was_present = m.contains_key(&k);
        let before_len = m.len();

        m.insert(k, k);
        m.erase(&k);

        prop_assert_eq!(m.len(), before_len);
        prop_assert_eq!(m.contains_key(&k), was_present);
        for key in &prelude {
            if *key != k {
                prop_assert_eq!(m.get(key), Some(key));
            }
        }
    }
}

#[test]
fn empty_map_boundary_behaviors() {
    let m: PatchMap<u32, u32, NativeHash<u32>> = PatchMap::with_hasher(NativeHash::default());
    assert!(!m.contains_key(&0));
    assert_eq!(m.iter().next(), None);

    let mut m: PatchMap<u32, u32, NativeHash<u32>> = PatchMap::with_hasher(NativeHash::default());
    assert_eq!(m.erase(&0), 0);
}

#[test]
fn single_element_boundary_behaviors() {
    let mut m: PatchMap<u32, u32, NativeHash<u32>> = PatchMap::with_hasher(NativeHash::default());
    m.insert(42, 42);
    assert_eq!(m.len(), 1);
    assert_eq!(m.get(&42), Some(&42));
    assert_eq!(m.erase(&42), 1);
    assert_eq!(m.len(), 0);
    assert!(!m.contains_key(&42));
}

#[test]
fn capacity_transition_preserves_all_prior_keys() {
    let mut m: PatchMap<u32, u32, NativeHash<u32>> = PatchMap::with_hasher(NativeHash::default());
    let mut cap_before = m.capacity();
    let mut saw_resize = false;
    for k in 0..2000u32 {
        m.insert(k, k);
        if m.capacity() != cap_before {
            saw_resize = true;
            for prior in 0..=k {
                assert_eq!(m.get(&prior), Some(&prior));
            }
            cap_before = m.capacity();
        }
    }
    assert!(saw_resize, "expected at least one resize across 2000 inserts");
}

/// Concrete scenario 1: identity-style dense range into a zero-capacity map.
#[test]
fn identity_hash_dense_range() {
    let mut m: PatchMap<u32, u32, NativeHash<u32>> = PatchMap::with_hasher(NativeHash::default());
    assert_eq!(m.capacity(), 0);
    for i in 0..100u32 {
        m.insert(i, i);
    }
    assert_eq!(m.len(), 100);
    for i in 0..100u32 {
        assert_eq!(m.count(&i), 1);
    }
    for i in 100..150u32 {
        assert_eq!(m.count(&i), 0);
    }
}

/// Concrete scenario 2: mixed insert/erase of every third key.
#[test]
fn mixed_insert_erase_every_third() {
    let mut m: PatchMap<u32, u32, NativeHash<u32>> = PatchMap::with_hasher(NativeHash::default());
    for i in 0..256u32 {
        m.insert(i, i);
    }
    let mut erased = 0;
    for i in (0..256u32).step_by(3) {
        m.erase(&i);
        erased += 1;
    }
    assert_eq!(m.len(), 256 - erased);
    for i in 0..256u32 {
        if i % 3 == 0 {
            assert_eq!(m.count(&i), 0);
        } else {
            assert_eq!(m.get(&i), Some(&i));
        }
    }
}

/// Concrete scenario 3: overwrite via `entry_or_default` with no size change.
#[test]
fn overwrite_does_not_grow_size() {
    let mut m: PatchMap<u32, u32, NativeHash<u32>> = PatchMap::with_hasher(NativeHash::default());
    *m.entry_or_default(7) = 1;
    *m.entry_or_default(7) = 2;
    assert_eq!(m.get(&7), Some(&2));
    assert_eq!(m.len(), 1);
}

/// Concrete scenario 4: forward traversal in rank order, backward in reverse.
/// `NativeHash` scrambles keys, so the expected forward order is the keys
/// sorted by rank, not by numeric value.
#[test]
fn iterator_forward_and_backward_agree() {
    let hasher = NativeHash::<u32>::default();
    let mut m: PatchMap<u32, u32, NativeHash<u32>> = PatchMap::with_hasher(hasher);
    let keys = [17u32, 3, 255, 64, 128, 1];
    for k in keys {
        m.insert(k, k);
    }
    let forward: Vec<u32> = m.iter().map(|(k, _)| k).collect();
    let mut rank_sorted = keys.to_vec();
    rank_sorted.sort_by_key(|k| hasher.order(k));
    assert_eq!(forward, rank_sorted);

    let backward: Vec<u32> = m.iter().rev().map(|(k, _)| k).collect();
    let mut expected = forward.clone();
    expected.reverse();
    assert_eq!(backward, expected);
}

/// Concrete scenario 5: `reserve` on a small map preserves every key.
#[test]
fn reserve_preserves_contents() {
    let mut m: PatchMap<u32, u32, NativeHash<u32>> = PatchMap::with_hasher(NativeHash::default());
    for k in 0..100u32 {
        m.insert(k, k);
    }
    m.reserve(10_000);
    assert_eq!(m.len(), 100);
    for k in 0..100u32 {
        assert_eq!(m.count(&k), 1);
    }
}

/// Concrete scenario 6 (scaled down from 2^20 for test runtime): an
/// odd-multiplier permutation stream, checking rank-sortedness (P2) at
/// every power-of-two milestone.
#[test]
fn adversarial_permutation_stream_stays_sorted_at_milestones() {
    const N: u32 = 1 << 14;
    const MUL: u32 = 2654435761; // odd Knuth multiplicative constant
    let mut m: PatchMap<u32, u32, NativeHash<u32>> = PatchMap::with_hasher(NativeHash::default());
    let mut milestone = 1u32;
    for i in 0..N {
        let k = i.wrapping_mul(MUL);
        m.insert(k, i);
        if m.len() as u32 == milestone {
            assert!(is_rank_sorted(&m), "sort invariant broken at size {milestone}");
            milestone *= 2;
        }
    }
}
