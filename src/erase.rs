//! Locate-then-slide-compact deletion (spec §4.6), a direct transcription
//! of `patchmap.hpp::erase`: after unsetting the target slot would leave a
//! hole, slide the run of entries whose home bucket lies on the far side of
//! that hole across it, symmetric in both directions.
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
    /// Removes `key` if present. Returns `1` if an entry was removed, `0`
    /// otherwise (matching the source's `size_type` return convention).
    pub fn erase(&mut self, key: &K) -> usize {
        let i = match self.find_node_by_key(key) {
            Some(i) => i,
            None => return 0,
        };
        let j = i;
        let mut i = i;
        loop {
            if i + 1 == self.capacity() || !self.occ.is_set(i + 1) {
                break;
            }
            if self.home_of_slot(i + 1) > i {
                break;
            }
            self.buckets.swap(i, i + 1);
            i += 1;
        }
        if i == j {
            loop {
                if i == 0 || !self.occ.is_set(i - 1) {
                    break;
                }
                if self.home_of_slot(i - 1) < i {
                    break;
                }
                self.buckets.swap(i, i - 1);
                i -= 1;
            }
        }
        self.occ.unset(i);
        unsafe {
            self.buckets[i].assume_init_drop();
        }
        self.len -= 1;
        1
    }
}
