//! Reserving a slot for a new entry and restoring the sort invariant
//! locally around it — `patchmap.hpp::reserve_node` (spec §4.5).
use std::mem::MaybeUninit;

use crate::entry::{Entry, SlotKey};
use crate::hash::RankedHash;
use crate::keyops::{KeyEquiv, KeyOrder};
use crate::map::PatchMap;
use crate::policy::ResizePolicy;

impl<K, V, H, E, C, P> PatchMap<K, V, H, E, C, P>
where
    H: RankedHash<K>,
    E: KeyEquiv<K>,
    C: KeyOrder<K>,
    P: ResizePolicy,
{
    /// Places `incoming` (not yet written into the bucket array) at a free
    /// slot near `mok` and walks it into sorted position, returning the
    /// slot it ends up at. The caller still owes the bucket array the
    /// actual write — this only claims occupancy and shuffles neighbors.
    pub(crate) fn reserve_node(&mut self, incoming: &SlotKey<K>, ok: u64, mok: usize) -> usize {
        if !self.occ.is_set(mok) {
            self.occ.set(mok);
            self.len += 1;
            return mok;
        }
        let j = self
            .occ
            .search_free_bidir_v0(mok)
            .expect("no free slot despite load-factor invariant");
        self.occ.set(j);
        self.len += 1;

        let mut i = j;
        loop {
            if i == 0 || !self.occ.is_set(i - 1) {
                break;
            }
            let rank_left = self.rank_at(i - 1);
            let already_ordered = if H::UNHASH_DEFINED {
                rank_left < ok
            } else {
                let left_key = unsafe { self.slot_ref(i - 1) }
                    .key
                    .as_plain()
                    .expect("non-injective hash must store plain keys");
                let new_key = incoming
                    .as_plain()
                    .expect("non-injective hash must store plain keys");
                self.order_lt(rank_left, ok, left_key, new_key)
            };
            if already_ordered {
                break;
            }
            self.buckets.swap(i, i - 1);
            i -= 1;
        }
        if i != j {
            return i;
        }
        loop {
            if i + 1 >= self.capacity() || !self.occ.is_set(i + 1) {
                break;
            }
            let rank_right = self.rank_at(i + 1);
            let already_ordered = if H::UNHASH_DEFINED {
                rank_right > ok
            } else {
                let right_key = unsafe { self.slot_ref(i + 1) }
                    .key
                    .as_plain()
                    .expect("non-injective hash must store plain keys");
                let new_key = incoming
                    .as_plain()
                    .expect("non-injective hash must store plain keys");
                self.order_lt(ok, rank_right, new_key, right_key)
            };
            if already_ordered {
                break;
            }
            self.buckets.swap(i, i + 1);
            i += 1;
        }
        i
    }

    /// Inserts `key -> value` if `key` is absent. Returns the slot index
    /// and whether an insertion actually happened (spec §4.9 `insert`).
    pub fn insert(&mut self, key: K, value: V) -> (usize, bool) {
        if self.capacity() > 0 {
            let ok = self.hasher.order(&key);
            let mok = self.home(ok);
            if let Some(i) = self.find_node(&key, ok, mok) {
                return (i, false);
            }
        }
        self.ensure_capacity();
        let ok = self.hasher.order(&key);
        let mok = self.home(ok);
        let slot_key = if self.compact {
            SlotKey::Hashed(ok)
        } else {
            SlotKey::Plain(key)
        };
        let j = self.reserve_node(&slot_key, ok, mok);
        self.buckets[j] = MaybeUninit::new(Entry::new(slot_key, value));
        (j, true)
    }

    pub(crate) fn ensure_capacity(&mut self) {
        if !P::should_grow(self.len, self.capacity()) {
            return;
        }
        let next = P::next_capacity(self.capacity());
        self.resize_to(next);
    }
}
