//! Key equality and tie-break ordering, kept as separate small traits
//! (spec §6: `KeyEq`, `Compare`) so a non-injective hash's rank collisions
//! have somewhere to go without forcing every key type to be both `Eq`
//! and `Ord` through a single combined bound.
use std::cmp::Ordering;

pub trait KeyEquiv<K> {
    fn eq(&self, a: &K, b: &K) -> bool;
}

pub trait KeyOrder<K> {
    fn cmp(&self, a: &K, b: &K) -> Ordering;
}

/// Default `KeyEq`: the key's own `PartialEq`/`Eq`.
#[derive(Default, Clone, Copy, Debug)]
pub struct StdEq;

impl<K: Eq> KeyEquiv<K> for StdEq {
    fn eq(&self, a: &K, b: &K) -> bool {
        a == b
    }
}

/// Default `Compare`: the key's own total order, used only to break ties
/// between two keys whose ranks collide under a non-injective hash.
#[derive(Default, Clone, Copy, Debug)]
pub struct StdOrd;

impl<K: Ord> KeyOrder<K> for StdOrd {
    fn cmp(&self, a: &K, b: &K) -> Ordering {
        a.cmp(b)
    }
}

/// Tie-break comparator for injective hashes, which never need one
/// (`dummy_comp` in `patchmap.hpp`). Always reports equal; callers must
/// not reach it when `H::IS_INJECTIVE` is true, since rank equality alone
/// already implies key equality in that case.
#[derive(Default, Clone, Copy, Debug)]
pub struct NoOrder;

impl<K> KeyOrder<K> for NoOrder {
    fn cmp(&self, _a: &K, _b: &K) -> Ordering {
        Ordering::Equal
    }
}
