//! A slot's payload: the rank-recoverable key representation plus the
//! mapped value.
//!
//! `patchmap.hpp` stores either the key or, when the hash has an inverse,
//! just its rank (`unhash`-recoverable) to shrink the per-slot footprint —
//! spec §4.9's "store hash instead of key" optimization. Rather than a
//! second monomorphized map type, that choice is modeled as a runtime
//! variant picked once at construction (see `DESIGN.md`): a small
//! discriminant trades for not doubling every generic signature in the
//! crate.

use crate::hash::RankedHash;

/// A slot's key representation: either the key itself, or — when the
/// configured hash is invertible and compact storage was requested — just
/// its rank, recoverable via [`RankedHash::unhash`].
#[derive(Clone, Debug)]
pub enum SlotKey<K> {
    Plain(K),
    Hashed(u64),
}

impl<K> SlotKey<K> {
    /// The slot's rank, recomputing it from the key when stored plain.
    pub fn rank<H: RankedHash<K>>(&self, hasher: &H) -> u64 {
        match self {
            SlotKey::Plain(k) => hasher.order(k),
            SlotKey::Hashed(h) => *h,
        }
    }

    /// Borrow the key if stored plain; `None` for compact (hash-only)
    /// storage, where the key must be reconstructed via `unhash`.
    pub fn as_plain(&self) -> Option<&K> {
        match self {
            SlotKey::Plain(k) => Some(k),
            SlotKey::Hashed(_) => None,
        }
    }

    /// Recover an owned key, reconstructing it from the rank via `unhash`
    /// when stored compactly.
    pub fn to_key<H: RankedHash<K>>(&self, hasher: &H) -> K
    where
        K: Clone,
    {
        match self {
            SlotKey::Plain(k) => k.clone(),
            SlotKey::Hashed(h) => hasher.unhash(*h),
        }
    }

    pub fn into_key<H: RankedHash<K>>(self, hasher: &H) -> K {
        match self {
            SlotKey::Plain(k) => k,
            SlotKey::Hashed(h) => hasher.unhash(h),
        }
    }
}

/// One occupied bucket's contents: key representation plus mapped value.
pub struct Entry<K, V> {
    pub key: SlotKey<K>,
    pub value: V,
}

impl<K, V> Entry<K, V> {
    pub fn new(key: SlotKey<K>, value: V) -> Self {
        Entry { key, value }
    }
}
