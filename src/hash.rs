//! The `Ranker` capability: mapping a key to a total-ordering rank.
//!
//! `RankedHash::order` plays the role of `hash(K) -> H` from spec §4.1,
//! fixed to `u64` (see `SPEC_FULL.md` §2 for why the rank width is fixed
//! rather than generic). `IS_INJECTIVE` and `UNHASH_DEFINED` are the
//! compile-time capability flags spec §9 asks for, expressed as associated
//! consts rather than C++-style SFINAE traits.
use std::hash::{BuildHasher, Hash, Hasher};
use std::marker::PhantomData;

/// Maps a key to its rank and, optionally, back again.
///
/// `IS_INJECTIVE`: rank equality implies key equality — no tie-break
/// comparator is ever consulted. `UNHASH_DEFINED`: `unhash` is a true
/// inverse of `order`, so slots can store the rank instead of the key
/// (spec §4.9, "store hash instead of key").
pub trait RankedHash<K> {
    const IS_INJECTIVE: bool;
    const UNHASH_DEFINED: bool = false;

    fn order(&self, key: &K) -> u64;

    /// Recover a key from its rank. Only ever called when
    /// `UNHASH_DEFINED` is `true`; the default panics so a misuse (asking
    /// for compact storage from a non-invertible hash) fails loudly rather
    /// than silently returning garbage keys.
    fn unhash(&self, _rank: u64) -> K {
        panic!("RankedHash::unhash called but UNHASH_DEFINED is false")
    }
}

/// Default hasher for arbitrary `K: Hash` keys, backed by `ahash`.
///
/// Not injective (`ahash` is a general-purpose 64-bit hash, not a
/// bijection) and has no inverse, so maps built on it always keep a
/// tie-break `Compare` around for rank collisions.
pub struct AHashRanker(ahash::RandomState);

impl Default for AHashRanker {
    fn default() -> Self {
        AHashRanker(ahash::RandomState::new())
    }
}

impl Clone for AHashRanker {
    fn clone(&self) -> Self {
        // ahash::RandomState carries its seeds by value.
        AHashRanker(self.0.clone())
    }
}

impl<K: Hash> RankedHash<K> for AHashRanker {
    const IS_INJECTIVE: bool = false;

    fn order(&self, key: &K) -> u64 {
        let mut hasher = self.0.build_hasher();
        key.hash(&mut hasher);
        hasher.finish()
    }
}

/// A splitmix-style injective, invertible hash for fixed-width integers —
/// a direct transcription of `patchmap.hpp`'s per-width `hash`/`unhash`
/// pairs (multiply-xorshift forward, modular-inverse-multiply backward).
#[derive(Clone, Copy, Debug)]
pub struct NativeHash<K>(PhantomData<fn(K) -> K>);

impl<K> Default for NativeHash<K> {
    fn default() -> Self {
        NativeHash(PhantomData)
    }
}

macro_rules! modular_inverse {
    ($name:ident, $ty:ty, $bits:expr) => {
        const fn $name(a: $ty) -> $ty {
            // Newton's iteration for the multiplicative inverse mod 2^bits:
            // x_{n+1} = x_n * (2 - a * x_n), doubling correct bits each step.
            let mut x: $ty = a & 1; // correct mod 2 since a is odd
            let mut i = 0;
            while i < $bits {
                x = x.wrapping_mul(2u64.wrapping_sub(a.wrapping_mul(x) as u64) as $ty);
                i += 1;
            }
            x
        }
    };
}

modular_inverse!(inv_u8, u8, 3);
modular_inverse!(inv_u16, u16, 4);
modular_inverse!(inv_u32, u32, 5);
modular_inverse!(inv_u64, u64, 6);

const HASH_U8_MUL: u8 = 97;
const HASH_U8_ADD: u8 = 111;
const HASH_U16_MUL: u16 = 43581;
const HASH_U16_ADD: u16 = 36690;
const HASH_U32_MUL: u32 = 3370923577;
const HASH_U64_MUL: u64 = 15864664792644967873;

impl RankedHash<u8> for NativeHash<u8> {
    const IS_INJECTIVE: bool = true;
    const UNHASH_DEFINED: bool = true;

    fn order(&self, key: &u8) -> u64 {
        key.wrapping_add(HASH_U8_ADD).wrapping_mul(HASH_U8_MUL) as u64
    }

    fn unhash(&self, rank: u64) -> u8 {
        (rank as u8).wrapping_mul(inv_u8(HASH_U8_MUL)).wrapping_sub(HASH_U8_ADD)
    }
}

impl RankedHash<u16> for NativeHash<u16> {
    const IS_INJECTIVE: bool = true;
    const UNHASH_DEFINED: bool = true;

    fn order(&self, key: &u16) -> u64 {
        key.wrapping_add(HASH_U16_ADD).wrapping_mul(HASH_U16_MUL) as u64
    }

    fn unhash(&self, rank: u64) -> u16 {
        (rank as u16)
            .wrapping_mul(inv_u16(HASH_U16_MUL))
            .wrapping_sub(HASH_U16_ADD)
    }
}

impl RankedHash<u32> for NativeHash<u32> {
    const IS_INJECTIVE: bool = true;
    const UNHASH_DEFINED: bool = true;

    fn order(&self, key: &u32) -> u64 {
        let mut v = *key;
        v ^= v >> 16;
        v = v.wrapping_mul(HASH_U32_MUL);
        v ^= v >> 16;
        v as u64
    }

    fn unhash(&self, rank: u64) -> u32 {
        let mut v = rank as u32;
        v ^= v >> 16;
        v = v.wrapping_mul(inv_u32(HASH_U32_MUL));
        v ^= v >> 16;
        v
    }
}

impl RankedHash<u64> for NativeHash<u64> {
    const IS_INJECTIVE: bool = true;
    const UNHASH_DEFINED: bool = true;

    fn order(&self, key: &u64) -> u64 {
        let mut v = *key;
        v ^= v >> 32;
        v = v.wrapping_mul(HASH_U64_MUL);
        v ^= v >> 32;
        v
    }

    fn unhash(&self, rank: u64) -> u64 {
        let mut v = rank;
        v ^= v >> 32;
        v = v.wrapping_mul(inv_u64(HASH_U64_MUL));
        v ^= v >> 32;
        v
    }
}

impl RankedHash<usize> for NativeHash<usize> {
    const IS_INJECTIVE: bool = true;
    const UNHASH_DEFINED: bool = true;

    fn order(&self, key: &usize) -> u64 {
        NativeHash::<u64>::default().order(&(*key as u64))
    }

    fn unhash(&self, rank: u64) -> usize {
        NativeHash::<u64>::default().unhash(rank) as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn u32_hash_roundtrips() {
        let h = NativeHash::<u32>::default();
        for k in [0u32, 1, 42, u32::MAX, 0x8000_0000, 123456789] {
            let r = h.order(&k);
            assert_eq!(h.unhash(r), k);
        }
    }

    #[test]
    fn u64_hash_roundtrips() {
        let h = NativeHash::<u64>::default();
        for k in [0u64, 1, 42, u64::MAX, 0x8000_0000_0000_0000, 123456789012345] {
            let r = h.order(&k);
            assert_eq!(h.unhash(r), k);
        }
    }

    #[test]
    fn u8_and_u16_hash_roundtrip() {
        let h8 = NativeHash::<u8>::default();
        for k in 0..=u8::MAX {
            assert_eq!(h8.unhash(h8.order(&k)), k);
        }
        let h16 = NativeHash::<u16>::default();
        for k in (0..=u16::MAX).step_by(97) {
            assert_eq!(h16.unhash(h16.order(&k)), k);
        }
    }

    #[test]
    fn ahash_is_deterministic_within_one_instance() {
        let h = AHashRanker::default();
        assert_eq!(RankedHash::<&str>::order(&h, &"hello"), RankedHash::<&str>::order(&h, &"hello"));
    }
}
