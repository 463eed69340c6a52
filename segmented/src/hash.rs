//! The default hasher of segmented tables.
use std::hash::{BuildHasher, Hash};

use zwohash::ZwoHasher;

/// Hasher builder used by [`SegmentedMap`](crate::SegmentedMap) unless another one is given.
pub type DefaultBuildHasher = std::hash::BuildHasherDefault<ZwoHasher>;

/// Computes the hash a default segmented table uses for `value`.
#[inline]
pub fn hash_value<T: Hash>(value: T) -> u64 {
    DefaultBuildHasher::default().hash_one(value)
}
