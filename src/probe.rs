//! Interpolation search over the sorted, sparse bucket array.
//!
//! A direct transcription of `patchmap.hpp`'s `find_node`/`find_node_interpol`/
//! `interpol` (spec §4.4): narrow a closed interval `[lo, hi]` using the rank
//! at its occupied endpoints to estimate where `k` would sit, falling back to
//! plain midpoint narrowing once the interval is small enough that
//! interpolation no longer pays for itself.
use std::cmp::Ordering;

use crate::bits::{clz, long_mul, shl, shr, WORD_BITS};
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
    /// `map(ok, N)`: the high half of `ok * N`, i.e. the home bucket.
    pub(crate) fn home(&self, ok: u64) -> usize {
        let (hi, _) = long_mul(ok, self.capacity() as u64);
        hi as usize
    }

    /// `map_diff(a, b)`: home-bucket distance implied by a rank difference.
    pub(crate) fn map_diff(&self, a: u64, b: u64) -> usize {
        let (hi, _) = long_mul(a.wrapping_sub(b), self.capacity() as u64);
        hi as usize
    }

    /// The rank of an occupied slot — `O(1)` when the hash is invertible and
    /// the rank is stored directly, otherwise recomputed from the stored key.
    pub(crate) fn rank_at(&self, i: usize) -> u64 {
        unsafe { self.slot_ref(i) }.key.rank(&self.hasher)
    }

    pub(crate) fn home_of_slot(&self, i: usize) -> usize {
        self.home(self.rank_at(i))
    }

    /// Whether occupied slot `i` holds `key` — stored-rank equality when the
    /// hash is invertible, a `KeyEq` check otherwise (spec §4.1).
    pub(crate) fn slot_matches(&self, i: usize, key: &K, ok: u64) -> bool {
        let entry = unsafe { self.slot_ref(i) };
        match entry.key.as_plain() {
            Some(stored) => self.eq.eq(stored, key),
            None => self.rank_at(i) == ok,
        }
    }

    /// `is_less(a, b, oa, ob)`: rank order, tie-broken by `Compare` when the
    /// hash is not injective.
    pub(crate) fn order_lt(&self, oa: u64, ob: u64, a: &K, b: &K) -> bool {
        if oa != ob {
            return oa < ob;
        }
        if H::IS_INJECTIVE {
            false
        } else {
            self.cmp.cmp(a, b) == Ordering::Less
        }
    }

    fn interpol(&self, ok: u64, olo: u64, ohi: u64, lo: usize, hi: usize) -> usize {
        let (hi_mul, lo_mul) = long_mul(ok.wrapping_sub(olo), (hi - lo) as u64);
        let n = clz(hi_mul);
        let m = WORD_BITS - n;
        let den = shr(ohi.wrapping_sub(olo), m);
        if den == 0 {
            return lo + ((hi - lo) >> 1);
        }
        let nom = shl(hi_mul, n).wrapping_add(shr(lo_mul, m));
        lo + (nom / den) as usize
    }

    /// Locate `key` given its rank `ok` and home bucket `mok`. `None` is the
    /// "not found" sentinel (spec's `~size_type(0)`).
    pub(crate) fn find_node(&self, key: &K, ok: u64, mok: usize) -> Option<usize> {
        if self.capacity() == 0 {
            return None;
        }
        if !self.occ.is_set(mok) {
            return None;
        }
        if self.slot_matches(mok, key, ok) {
            return Some(mok);
        }
        let omi = self.rank_at(mok);
        if omi < ok {
            self.find_node_interpol(key, ok, mok, mok, omi, true, self.capacity() - 1, u64::MAX, false)
        } else {
            self.find_node_interpol(key, ok, mok, 0, 0, false, mok, omi, true)
        }
    }

    /// Convenience entry point recomputing `ok`/`mok` from `key` itself.
    pub(crate) fn find_node_by_key(&self, key: &K) -> Option<usize> {
        if self.capacity() == 0 {
            return None;
        }
        let ok = self.hasher.order(key);
        let mok = self.home(ok);
        self.find_node(key, ok, mok)
    }

    #[allow(clippy::too_many_arguments)]
    fn find_node_interpol(
        &self,
        key: &K,
        ok: u64,
        mok: usize,
        mut lo: usize,
        mut olo: u64,
        mut is_set_lo: bool,
        mut hi: usize,
        mut ohi: u64,
        mut is_set_hi: bool,
    ) -> Option<usize> {
        loop {
            let mi;
            if hi - lo < 8 {
                if hi - lo < 4 {
                    if hi - lo < 2 {
                        if hi - lo < 1 {
                            if self.occ.is_set(lo) && self.slot_matches(lo, key, ok) {
                                return Some(lo);
                            }
                            return None;
                        } else {
                            if is_set_lo && is_set_hi {
                                return None;
                            }
                            if self.occ.is_set(lo) && self.slot_matches(lo, key, ok) {
                                return Some(lo);
                            }
                            if self.occ.is_set(hi) && self.slot_matches(hi, key, ok) {
                                return Some(hi);
                            }
                            return None;
                        }
                    } else {
                        mi = lo + ((hi - lo) >> 1);
                    }
                } else if is_set_hi && is_set_lo {
                    mi = lo + ((hi - lo) >> 1);
                } else if is_set_lo {
                    mi = lo + ((hi - lo + 2) >> 2);
                } else if is_set_hi {
                    mi = hi - ((hi - lo + 2) >> 2);
                } else {
                    return None;
                }
            } else {
                let unclamped = if is_set_hi && is_set_lo {
                    self.interpol(ok, olo, ohi, lo, hi)
                } else if is_set_lo {
                    let st = self.map_diff(ok, olo);
                    if lo + st < hi {
                        lo + st
                    } else {
                        hi
                    }
                } else if is_set_hi {
                    let st = self.map_diff(ohi, ok);
                    if lo + st < hi {
                        hi - st
                    } else {
                        lo
                    }
                } else {
                    return None;
                };
                mi = unclamped.clamp(lo + 1, hi - 1);
            }

            if !self.occ.is_set(mi) {
                if mi < mok {
                    lo = mi;
                    is_set_lo = false;
                    continue;
                }
                if mi > mok {
                    hi = mi;
                    is_set_hi = false;
                    continue;
                }
                return None;
            }
            if self.slot_matches(mi, key, ok) {
                return Some(mi);
            }
            let omi = self.rank_at(mi);
            if ok < omi {
                hi = mi;
                ohi = omi;
                is_set_hi = true;
                continue;
            }
            if ok > omi {
                lo = mi;
                olo = omi;
                is_set_lo = true;
                continue;
            }
            if H::IS_INJECTIVE {
                return None;
            }
            let other = unsafe { self.slot_ref(mi) }
                .key
                .as_plain()
                .expect("non-injective hash must store plain keys");
            match self.cmp.cmp(key, other) {
                Ordering::Less => {
                    hi = mi;
                    ohi = omi;
                    is_set_hi = true;
                }
                Ordering::Greater => {
                    lo = mi;
                    olo = omi;
                    is_set_lo = true;
                }
                Ordering::Equal => return None,
            }
        }
    }
}
