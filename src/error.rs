//! The map's one user-visible runtime error (spec §7): looking up a key
//! that isn't present. Every other boundary condition (capacity exhaustion,
//! resize failure) is handled internally by growing the table, matching
//! `patchmap.hpp`'s own behavior of throwing only out of `at()`.

use std::fmt::Debug;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PatchMapError<K: Debug> {
    #[error("key not found: {key:?}")]
    KeyNotFound { key: K },
}
