//! The container itself: bucket array, occupancy bitmap, and the
//! `ContainerSkin` public surface (spec §4.9) layered over the
//! probe/insert/erase/resize building blocks defined in their own modules.
use std::fmt;
use std::marker::PhantomData;
use std::mem::MaybeUninit;

use crate::bitmap::BitmapOccupancy;
use crate::entry::{Entry, SlotKey};
use crate::error::PatchMapError;
use crate::hash::{AHashRanker, NativeHash, RankedHash};
use crate::iter::{Cursor, Iter, IterMut};
use crate::keyops::{KeyEquiv, KeyOrder, StdEq, StdOrd};
use crate::policy::{DefaultPolicy, ResizePolicy};

/// An open-addressed, sorted, hash-ordered map with interpolation search.
///
/// Entries live in a single flat bucket array kept in ascending order of a
/// derived rank (`H::order`), letting lookups narrow the search
/// interval with interpolation rather than a plain binary probe sequence.
/// Type parameters past `K`/`V` customize the ranking/equality/ordering/
/// growth strategy; the defaults (`AHashRanker`, `StdEq`, `StdOrd`,
/// `DefaultPolicy`) cover ordinary `Hash + Eq + Ord` keys.
pub struct PatchMap<K, V, H = AHashRanker, E = StdEq, C = StdOrd, P = DefaultPolicy> {
    pub(crate) buckets: Box<[MaybeUninit<Entry<K, V>>]>,
    pub(crate) occ: BitmapOccupancy,
    pub(crate) len: usize,
    pub(crate) hasher: H,
    pub(crate) eq: E,
    pub(crate) cmp: C,
    pub(crate) compact: bool,
    pub(crate) _policy: PhantomData<fn() -> P>,
}

impl<K, V> PatchMap<K, V, AHashRanker, StdEq, StdOrd, DefaultPolicy>
where
    K: std::hash::Hash + Eq + Ord,
{
    pub fn new() -> Self {
        Self::with_parts(AHashRanker::default(), StdEq, StdOrd)
    }
}

impl<K, V> Default for PatchMap<K, V, AHashRanker, StdEq, StdOrd, DefaultPolicy>
where
    K: std::hash::Hash + Eq + Ord,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, H, E, C, P> PatchMap<K, V, H, E, C, P>
where
    H: RankedHash<K> + Default,
    E: KeyEquiv<K> + Default,
    C: KeyOrder<K> + Default,
{
    pub fn with_hasher(hasher: H) -> Self {
        Self::with_parts(hasher, E::default(), C::default())
    }
}

impl<K, V, H, E, C, P> PatchMap<K, V, H, E, C, P>
where
    H: RankedHash<K>,
    E: KeyEquiv<K>,
    C: KeyOrder<K>,
{
    pub fn with_parts(hasher: H, eq: E, cmp: C) -> Self {
        PatchMap {
            buckets: Vec::new().into_boxed_slice(),
            occ: BitmapOccupancy::new(0),
            len: 0,
            hasher,
            eq,
            cmp,
            compact: false,
            _policy: PhantomData,
        }
    }

    /// Like [`with_parts`](Self::with_parts), but stores each slot's rank
    /// instead of its key (spec §4.9/§9 "store hash instead of key").
    /// Requires an invertible hash; panics otherwise, since compact storage
    /// with no way back to `K` would silently corrupt every accessor.
    pub fn with_compact_hash(hasher: H, eq: E, cmp: C) -> Self {
        assert!(
            H::UNHASH_DEFINED,
            "with_compact_hash requires a hash with a defined inverse"
        );
        let mut map = Self::with_parts(hasher, eq, cmp);
        map.compact = true;
        map
    }
}

impl<K> PatchMap<K, (), NativeHash<K>, StdEq, StdOrd, DefaultPolicy>
where
    NativeHash<K>: RankedHash<K> + Default,
{
    /// A compact set keyed by one of the built-in injective integer hashes
    /// (`u8`/`u16`/`u32`/`u64`/`usize`): stores the rank only, recovering
    /// `K` on demand via `unhash`.
    pub fn compact_native_set() -> Self {
        Self::with_compact_hash(NativeHash::default(), StdEq, StdOrd)
    }
}

impl<K, V, H, E, C, P> PatchMap<K, V, H, E, C, P>
where
    H: RankedHash<K>,
    E: KeyEquiv<K>,
    C: KeyOrder<K>,
    P: ResizePolicy,
{
    pub fn capacity(&self) -> usize {
        self.buckets.len()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn load_factor(&self) -> f64 {
        if self.capacity() == 0 {
            0.0
        } else {
            self.len as f64 / self.capacity() as f64
        }
    }

    pub fn max_load_factor(&self) -> f64 {
        7.0 / 8.0
    }

    /// Safety: caller must have already established slot `i` is occupied
    /// (a set bit in `occ`).
    pub(crate) unsafe fn slot_ref(&self, i: usize) -> &Entry<K, V> {
        self.buckets[i].assume_init_ref()
    }

    pub fn count(&self, key: &K) -> usize {
        usize::from(self.find_node_by_key(key).is_some())
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.find_node_by_key(key).is_some()
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        self.find_node_by_key(key)
            .map(|i| unsafe { &self.slot_ref(i).value })
    }

    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        let i = self.find_node_by_key(key)?;
        Some(unsafe { &mut self.buckets[i].assume_init_mut().value })
    }

    pub fn at(&self, key: K) -> Result<&V, PatchMapError<K>>
    where
        K: std::fmt::Debug,
    {
        match self.find_node_by_key(&key) {
            Some(i) => Ok(unsafe { &self.slot_ref(i).value }),
            None => Err(PatchMapError::KeyNotFound { key }),
        }
    }

    pub fn at_mut(&mut self, key: K) -> Result<&mut V, PatchMapError<K>>
    where
        K: std::fmt::Debug,
    {
        match self.find_node_by_key(&key) {
            Some(i) => Ok(unsafe { &mut self.buckets[i].assume_init_mut().value }),
            None => Err(PatchMapError::KeyNotFound { key }),
        }
    }

    /// Returns a reference to `key`'s value, inserting `V::default()` if
    /// absent (spec §4.9 `operator[]`).
    pub fn entry_or_default(&mut self, key: K) -> &mut V
    where
        V: Default,
    {
        let (i, _) = self.insert(key, V::default());
        unsafe { &mut self.buckets[i].assume_init_mut().value }
    }

    pub fn clear(&mut self) {
        self.occ = BitmapOccupancy::new(self.capacity());
        for slot in self.buckets.iter_mut() {
            *slot = MaybeUninit::uninit();
        }
        self.len = 0;
    }

    pub fn iter(&self) -> Iter<'_, K, V, H, E, C, P> {
        Iter {
            map: self,
            front: 0,
            back: self.capacity(),
        }
    }

    pub fn iter_mut(&mut self) -> IterMut<'_, K, V, H, E, C, P> {
        let back = self.capacity();
        IterMut {
            hasher: &self.hasher,
            occ: &self.occ,
            buckets: self.buckets.as_mut_ptr(),
            front: 0,
            back,
            _marker: std::marker::PhantomData,
        }
    }

    pub fn cursor(&self) -> Cursor<K> {
        Cursor::new()
    }

    /// Average and maximum absolute displacement of occupied slots from
    /// their home bucket — a load-diagnostic, not part of the core
    /// contract (grounded in `patchmap.hpp::average_offset`/`print_offsets`,
    /// spec §9 supplemental ambient-stack addition).
    pub fn stats(&self) -> MapStats {
        let mut total: i64 = 0;
        let mut max_abs: i64 = 0;
        let mut occupied = 0usize;
        for i in 0..self.capacity() {
            if self.occ.is_set(i) {
                let home = self.home_of_slot(i) as i64;
                let d = i as i64 - home;
                total += d;
                max_abs = max_abs.max(d.abs());
                occupied += 1;
            }
        }
        MapStats {
            len: occupied,
            capacity: self.capacity(),
            average_displacement: if occupied == 0 {
                0.0
            } else {
                total as f64 / occupied as f64
            },
            max_displacement: max_abs,
        }
    }
}

impl<K, V, H, E, C, P> Drop for PatchMap<K, V, H, E, C, P> {
    fn drop(&mut self) {
        for i in 0..self.occ.len() {
            if self.occ.is_set(i) {
                unsafe {
                    self.buckets[i].assume_init_drop();
                }
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapStats {
    pub len: usize,
    pub capacity: usize,
    pub average_displacement: f64,
    pub max_displacement: i64,
}

impl<K, V, H, E, C, P> std::ops::Index<K> for PatchMap<K, V, H, E, C, P>
where
    H: RankedHash<K>,
    E: KeyEquiv<K>,
    C: KeyOrder<K>,
    P: ResizePolicy,
    K: std::fmt::Debug,
{
    type Output = V;

    fn index(&self, key: K) -> &V {
        self.at(key).expect("key not found")
    }
}

/// Structural equality: same set of key/value pairs, independent of
/// capacity (spec §9 resolves the source's lockstep-iteration
/// `operator==`, which is only correct when capacities match, into this
/// capacity-independent contract).
impl<K, V, H, E, C, P, H2, E2, C2, P2> PartialEq<PatchMap<K, V, H2, E2, C2, P2>>
    for PatchMap<K, V, H, E, C, P>
where
    K: Clone,
    V: PartialEq,
    H: RankedHash<K>,
    E: KeyEquiv<K>,
    C: KeyOrder<K>,
    P: ResizePolicy,
    H2: RankedHash<K>,
    E2: KeyEquiv<K>,
    C2: KeyOrder<K>,
    P2: ResizePolicy,
{
    fn eq(&self, other: &PatchMap<K, V, H2, E2, C2, P2>) -> bool {
        if self.len != other.len {
            return false;
        }
        for i in 0..self.capacity() {
            if self.occ.is_set(i) {
                let entry = unsafe { self.slot_ref(i) };
                let key = entry.key.to_key(&self.hasher);
                match other.get(&key) {
                    Some(v) if *v == entry.value => {}
                    _ => return false,
                }
            }
        }
        true
    }
}

impl<K, V, H, E, C, P> Eq for PatchMap<K, V, H, E, C, P>
where
    K: Clone,
    V: Eq,
    H: RankedHash<K>,
    E: KeyEquiv<K>,
    C: KeyOrder<K>,
    P: ResizePolicy,
{
}

impl<K, V, H, E, C, P> fmt::Debug for PatchMap<K, V, H, E, C, P>
where
    K: Clone + fmt::Debug,
    V: fmt::Debug,
    H: RankedHash<K>,
    E: KeyEquiv<K>,
    C: KeyOrder<K>,
    P: ResizePolicy,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}
