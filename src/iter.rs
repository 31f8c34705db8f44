//! Forward/backward traversal over occupied slots (spec §4.8).
//!
//! `patchmap.hpp`'s `const_noconst_iterator` carries `(hint, key, &map)` and
//! a compile-time `uphold_iterator_validity` flag choosing whether
//! dereference re-locates through `Probe` when `hint` has drifted. Rather
//! than a single type parameterized on that flag, the two policies are
//! modeled as two named iterator types: [`Iter`]/[`IterMut`] borrow the map
//! for their whole lifetime, so the borrow checker itself enforces
//! "invalid across mutation" for the non-upholding policy — a mutating call
//! requires `&mut self` and cannot coexist with a live borrowing iterator.
//! [`Cursor`] is the upholding policy: it owns a copy of its current key and
//! re-locates via `find_node` each time it is advanced against a possibly
//! different map state.
use std::marker::PhantomData;

use crate::entry::Entry;
use crate::hash::RankedHash;
use crate::keyops::{KeyEquiv, KeyOrder};
use crate::map::PatchMap;
use crate::policy::ResizePolicy;

pub struct Iter<'a, K, V, H, E, C, P> {
    pub(crate) map: &'a PatchMap<K, V, H, E, C, P>,
    pub(crate) front: usize,
    pub(crate) back: usize,
}

impl<'a, K, V, H, E, C, P> Iterator for Iter<'a, K, V, H, E, C, P>
where
    K: Clone,
    H: RankedHash<K>,
    E: KeyEquiv<K>,
    C: KeyOrder<K>,
    P: ResizePolicy,
{
    type Item = (K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        if self.front >= self.back {
            return None;
        }
        let pos = self.map.occ.next_set(self.front)?;
        if pos >= self.back {
            self.front = self.back;
            return None;
        }
        self.front = pos + 1;
        let entry = unsafe { self.map.slot_ref(pos) };
        Some((entry.key.to_key(&self.map.hasher), &entry.value))
    }
}

impl<'a, K, V, H, E, C, P> DoubleEndedIterator for Iter<'a, K, V, H, E, C, P>
where
    K: Clone,
    H: RankedHash<K>,
    E: KeyEquiv<K>,
    C: KeyOrder<K>,
    P: ResizePolicy,
{
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.front >= self.back || self.back == 0 {
            return None;
        }
        let pos = self.map.occ.prev_set(self.back - 1)?;
        let pos = pos as usize;
        if pos < self.front {
            self.back = self.front;
            return None;
        }
        self.back = pos;
        let entry = unsafe { self.map.slot_ref(pos) };
        Some((entry.key.to_key(&self.map.hasher), &entry.value))
    }
}

pub struct IterMut<'a, K, V, H, E, C, P> {
    pub(crate) hasher: &'a H,
    pub(crate) occ: &'a crate::bitmap::BitmapOccupancy,
    pub(crate) buckets: *mut std::mem::MaybeUninit<Entry<K, V>>,
    pub(crate) front: usize,
    pub(crate) back: usize,
    pub(crate) _marker: PhantomData<(&'a mut Entry<K, V>, H, E, C, P)>,
}

impl<'a, K, V, H, E, C, P> Iterator for IterMut<'a, K, V, H, E, C, P>
where
    K: Clone,
    H: RankedHash<K>,
{
    type Item = (K, &'a mut V);

    fn next(&mut self) -> Option<Self::Item> {
        if self.front >= self.back {
            return None;
        }
        let pos = self.occ.next_set(self.front)?;
        if pos >= self.back {
            self.front = self.back;
            return None;
        }
        self.front = pos + 1;
        // Safety: `pos` is occupied, within bounds, and no other live
        // `IterMut` item borrows this slot — `front`/`back` only move
        // monotonically toward each other and each slot is yielded once.
        unsafe {
            let entry: &'a mut Entry<K, V> = (*self.buckets.add(pos)).assume_init_mut();
            let key = entry.key.to_key(self.hasher);
            Some((key, &mut entry.value))
        }
    }
}

impl<'a, K, V, H, E, C, P> DoubleEndedIterator for IterMut<'a, K, V, H, E, C, P>
where
    K: Clone,
    H: RankedHash<K>,
{
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.front >= self.back || self.back == 0 {
            return None;
        }
        let pos = self.occ.prev_set(self.back - 1)?;
        let pos = pos as usize;
        if pos < self.front {
            self.back = self.front;
            return None;
        }
        self.back = pos;
        unsafe {
            let entry: &'a mut Entry<K, V> = (*self.buckets.add(pos)).assume_init_mut();
            let key = entry.key.to_key(self.hasher);
            Some((key, &mut entry.value))
        }
    }
}

/// The "upholding" iterator policy (spec §9): owns its last-yielded key and
/// re-locates it through `find_node` on every advance, rather than trusting
/// a raw slot index that structural mutation may have invalidated. If the
/// remembered key is gone, the cursor becomes exhausted (spec §4.8: "if the
/// entry is gone, the iterator becomes end") instead of trying to guess
/// where iteration should resume.
pub struct Cursor<K> {
    key: Option<K>,
    ended: bool,
}

impl<K> Cursor<K> {
    pub fn new() -> Self {
        Cursor { key: None, ended: false }
    }
}

impl<K> Default for Cursor<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Clone> Cursor<K> {
    /// Re-locates (if necessary) and advances to the next occupied slot,
    /// returning the key/value found there.
    pub fn next<'a, V, H, E, C, P>(
        &mut self,
        map: &'a PatchMap<K, V, H, E, C, P>,
    ) -> Option<(K, &'a V)>
    where
        H: RankedHash<K>,
        E: KeyEquiv<K>,
        C: KeyOrder<K>,
        P: ResizePolicy,
    {
        if self.ended {
            return None;
        }
        let start = match &self.key {
            None => 0,
            Some(key) => match map.find_node_by_key(key) {
                Some(pos) => pos + 1,
                None => {
                    self.ended = true;
                    return None;
                }
            },
        };
        match map.occ.next_set(start) {
            Some(pos) => {
                let entry = unsafe { map.slot_ref(pos) };
                let key = entry.key.to_key(&map.hasher);
                self.key = Some(key.clone());
                Some((key, &entry.value))
            }
            None => {
                self.ended = true;
                None
            }
        }
    }
}
