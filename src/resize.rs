//! Out-of-place rebuild (spec §4.7): allocate a fresh bucket array and
//! bitmap, then reinsert every live entry with `reserve_node` so the new
//! table comes out correctly sorted without a redundant lookup per key
//! (they're known-absent by construction). Grounded in
//! `patchmap.hpp::resize_out_of_place` — the in-place expansion path the
//! source attempts behind a `boost::interprocess` allocator hint is dead
//! code in that file (every call site returns before reaching it), so spec
//! §9 specifies out-of-place as the only path and that's what's carried
//! over here.
use std::mem::MaybeUninit;

use crate::bitmap::BitmapOccupancy;
use crate::entry::Entry;
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
    pub(crate) fn resize_to(&mut self, new_capacity: usize) {
        if new_capacity < self.len {
            return;
        }
        tracing::debug!(
            old_capacity = self.capacity(),
            new_capacity,
            len = self.len,
            "resizing patchmap"
        );
        let new_buckets: Box<[MaybeUninit<Entry<K, V>>]> =
            (0..new_capacity).map(|_| MaybeUninit::uninit()).collect();
        let new_occ = BitmapOccupancy::new(new_capacity);
        let old_buckets = std::mem::replace(&mut self.buckets, new_buckets);
        let old_occ = std::mem::replace(&mut self.occ, new_occ);
        let old_len = self.len;
        self.len = 0;

        for i in 0..old_occ.len() {
            if old_occ.is_set(i) {
                // Safety: `old_occ.is_set(i)` guarantees this slot was
                // initialized; it is never read again afterward.
                let entry = unsafe { old_buckets[i].assume_init_read() };
                let ok = entry.key.rank(&self.hasher);
                let mok = self.home(ok);
                let j = self.reserve_node(&entry.key, ok, mok);
                self.buckets[j] = MaybeUninit::new(entry);
            }
        }
        debug_assert_eq!(self.len, old_len, "resize must preserve element count");
        // `old_buckets` drops here: a `Box<[MaybeUninit<_>]>` deallocates
        // its backing memory without running any `Entry` destructors, and
        // every occupied slot was already moved out above.
    }

    /// Resizes to `n` buckets if `n` is at least the current size.
    pub fn rehash(&mut self, n: usize) {
        if n >= self.len {
            self.resize_to(n);
        }
    }

    /// Grows so that `n` total keys fit without a further rehash.
    pub fn reserve(&mut self, n: usize) {
        if 3 * n >= 2 * (self.len + 1) {
            self.resize_to(n * 3 / 2);
        }
    }
}
