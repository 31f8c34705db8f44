//! Set mode: a `PatchMap` whose value type is `()`, the same pattern
//! `indexmap`'s `IndexSet` uses over `IndexMap` — a type alias plus a thin
//! set-flavored surface rather than a parallel implementation (spec §4.9,
//! "`V` optional; set mode when absent").
use crate::hash::AHashRanker;
use crate::keyops::{KeyEquiv, KeyOrder, StdEq, StdOrd};
use crate::map::PatchMap;
use crate::policy::{DefaultPolicy, ResizePolicy};
use crate::hash::RankedHash;

pub type PatchSet<K, H = AHashRanker, E = StdEq, C = StdOrd, P = DefaultPolicy> =
    PatchMap<K, (), H, E, C, P>;

impl<K, H, E, C, P> PatchMap<K, (), H, E, C, P>
where
    H: RankedHash<K>,
    E: KeyEquiv<K>,
    C: KeyOrder<K>,
    P: ResizePolicy,
{
    /// Inserts `key`, returning `true` if it was newly added.
    pub fn insert_key(&mut self, key: K) -> bool {
        self.insert(key, ()).1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_tracks_membership() {
        let mut s: PatchSet<u32> = PatchSet::new();
        assert!(s.insert_key(1));
        assert!(!s.insert_key(1));
        assert!(s.contains_key(&1));
        assert!(!s.contains_key(&2));
        assert_eq!(s.len(), 1);
    }
}
