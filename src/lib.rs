//! An open-addressed, sorted, hash-ordered map with interpolation search.
//!
//! Entries live in one flat bucket array kept in ascending order of a
//! derived rank, rather than the usual unordered open-addressing scheme —
//! that order is what lets lookups use interpolation search instead of a
//! linear or quadratic probe sequence. See [`PatchMap`] for the container
//! itself; [`PatchSet`] is the set-mode alias.

mod bitmap;
mod bits;
mod entry;
mod erase;
mod error;
mod hash;
mod insert;
mod iter;
mod keyops;
mod map;
mod policy;
mod probe;
mod resize;
mod set;

pub use entry::{Entry, SlotKey};
pub use error::PatchMapError;
pub use hash::{AHashRanker, NativeHash, RankedHash};
pub use iter::{Cursor, Iter, IterMut};
pub use keyops::{KeyEquiv, KeyOrder, NoOrder, StdEq, StdOrd};
pub use map::{MapStats, PatchMap};
pub use policy::{DefaultPolicy, ResizePolicy};
pub use set::PatchSet;
