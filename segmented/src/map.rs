//! A hash map partitioned into a fixed number of segments.
use std::{
    borrow::Borrow,
    fmt,
    hash::{BuildHasher, Hash},
};

use hashbrown::hash_table::{Entry, HashTable};
use seghash_split::HashSplitting;

use crate::{
    config::{validate_segments, ConfigError, SegmentedConfig},
    hash::DefaultBuildHasher,
    header::{decode_header, encode_header, HeaderError},
};

/// A hash map whose entries are partitioned into a fixed number of segments.
///
/// Each key's hash is split by the map's [`HashSplitting`]: the segment index selects one of the
/// segment tables and the residual hash addresses the entry within it. The number of segments is
/// fixed for the lifetime of the map and recorded in its [header](SegmentedMap::header).
pub struct SegmentedMap<K, V, S = DefaultBuildHasher> {
    splitting: HashSplitting,
    segments: Box<[HashTable<(K, V)>]>,
    build_hasher: S,
    len: usize,
}

impl<K, V, S: Default> SegmentedMap<K, V, S> {
    /// Creates an empty map as configured.
    ///
    /// # Panics
    ///
    /// Panics if the configured segment count is not in `1..=MAX_SEGMENTS`, see
    /// [`SegmentedMap::try_new`] for a fallible version.
    pub fn new(config: SegmentedConfig) -> Self {
        Self::with_hasher(config, S::default())
    }

    /// Creates an empty map as configured, failing if the segment count is not supported.
    pub fn try_new(config: SegmentedConfig) -> Result<Self, ConfigError> {
        Self::try_with_hasher(config, S::default())
    }

    /// Creates an empty map addressed the same way as the map that wrote `header`.
    pub fn from_header(header: &[u8]) -> Result<Self, HeaderError> {
        let splitting = decode_header(header)?;
        validate_segments(splitting.segments())?;
        log::debug!(
            "reopening segmented map with {} segments ({})",
            splitting.segments(),
            splitting.kind()
        );
        Ok(Self::with_splitting(splitting, S::default()))
    }
}

impl<K, V, S> SegmentedMap<K, V, S> {
    /// Creates an empty map as configured, using `build_hasher` to hash keys.
    ///
    /// # Panics
    ///
    /// Panics if the configured segment count is not in `1..=MAX_SEGMENTS`.
    pub fn with_hasher(config: SegmentedConfig, build_hasher: S) -> Self {
        match Self::try_with_hasher(config, build_hasher) {
            Ok(map) => map,
            Err(err) => panic!("{err}"),
        }
    }

    /// Creates an empty map as configured, using `build_hasher` to hash keys, failing if the
    /// segment count is not supported.
    pub fn try_with_hasher(config: SegmentedConfig, build_hasher: S) -> Result<Self, ConfigError> {
        config.validate()?;
        let splitting = HashSplitting::for_segments(config.segments);
        log::debug!(
            "creating segmented map with {} segments ({})",
            config.segments,
            splitting.kind()
        );
        Ok(Self::with_splitting(splitting, build_hasher))
    }

    fn with_splitting(splitting: HashSplitting, build_hasher: S) -> Self {
        let segments = (0..splitting.segments()).map(|_| HashTable::new()).collect();
        Self {
            splitting,
            segments,
            build_hasher,
            len: 0,
        }
    }

    /// The strategy used to split key hashes.
    #[inline]
    pub fn splitting(&self) -> HashSplitting {
        self.splitting
    }

    /// The persisted addressing header of this map.
    ///
    /// A map created by [`SegmentedMap::from_header`] from these bytes places every key in the
    /// same segment and with the same residual hash as this map.
    pub fn header(&self) -> Vec<u8> {
        encode_header(&self.splitting)
    }

    /// Returns the hasher builder used for keys.
    pub fn hasher(&self) -> &S {
        &self.build_hasher
    }

    /// Number of entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the map has no entries.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of segments.
    #[inline]
    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    /// Number of entries stored in segment `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is not below [`SegmentedMap::segment_count`].
    pub fn segment_len(&self, index: usize) -> usize {
        self.segments[index].len()
    }

    /// Iterates over the number of entries in each segment, in segment order.
    pub fn segment_lens(&self) -> impl ExactSizeIterator<Item = usize> + '_ {
        self.segments.iter().map(|segment| segment.len())
    }

    /// Iterates over the entries of segment `index` in arbitrary order.
    ///
    /// # Panics
    ///
    /// Panics if `index` is not below [`SegmentedMap::segment_count`].
    pub fn segment_iter(&self, index: usize) -> impl ExactSizeIterator<Item = (&K, &V)> + '_ {
        self.segments[index].iter().map(|(key, value)| (key, value))
    }

    /// Iterates over all entries, segment by segment.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> + '_ {
        self.segments
            .iter()
            .flat_map(|segment| segment.iter().map(|(key, value)| (key, value)))
    }

    /// Iterates over all keys, segment by segment.
    pub fn keys(&self) -> impl Iterator<Item = &K> + '_ {
        self.iter().map(|(key, _)| key)
    }

    /// Iterates over all values, segment by segment.
    pub fn values(&self) -> impl Iterator<Item = &V> + '_ {
        self.iter().map(|(_, value)| value)
    }

    /// Removes all entries, keeping the segment count.
    pub fn clear(&mut self) {
        for segment in self.segments.iter_mut() {
            segment.clear();
        }
        self.len = 0;
    }
}

/// Hash handed to a segment's table for an entry with the given residual hash.
///
/// Residuals are right shifted, leaving their top bits zero, while hashbrown takes its control
/// byte tags from the top bits. Multiplying by an odd constant is a bijection that moves the low
/// residual bits up there.
#[inline(always)]
fn table_hash(residual: u64) -> u64 {
    residual.wrapping_mul(0x9e37_79b9_7f4a_7c15)
}

impl<K: Hash + Eq, V, S: BuildHasher> SegmentedMap<K, V, S> {
    /// Returns the index of the segment that does or would contain `key`.
    #[inline]
    pub fn segment_of<Q>(&self, key: &Q) -> usize
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.splitting.segment_index(self.build_hasher.hash_one(key))
    }

    /// Inserts a key-value pair, returning the previous value for an equal key.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        let (index, residual) = self.splitting.split(self.build_hasher.hash_one(&key));
        let splitting = self.splitting;
        let build_hasher = &self.build_hasher;
        match self.segments[index].entry(
            table_hash(residual),
            |(found, _)| *found == key,
            |(found, _)| table_hash(splitting.segment_hash(build_hasher.hash_one(found))),
        ) {
            Entry::Occupied(mut entry) => Some(std::mem::replace(&mut entry.get_mut().1, value)),
            Entry::Vacant(entry) => {
                entry.insert((key, value));
                self.len += 1;
                None
            }
        }
    }

    /// Returns a reference to the value of `key`.
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let (index, residual) = self.splitting.split(self.build_hasher.hash_one(key));
        self.segments[index]
            .find(table_hash(residual), |(found, _)| found.borrow() == key)
            .map(|(_, value)| value)
    }

    /// Returns a mutable reference to the value of `key`.
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let (index, residual) = self.splitting.split(self.build_hasher.hash_one(key));
        self.segments[index]
            .find_mut(table_hash(residual), |(found, _)| found.borrow() == key)
            .map(|(_, value)| value)
    }

    /// Returns `true` if the map contains `key`.
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.get(key).is_some()
    }

    /// Removes `key`, returning its value if it was present.
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let (index, residual) = self.splitting.split(self.build_hasher.hash_one(key));
        let entry = self.segments[index]
            .find_entry(table_hash(residual), |(found, _)| found.borrow() == key)
            .ok()?;
        let ((_, value), _) = entry.remove();
        self.len -= 1;
        Some(value)
    }
}

impl<K, V, S: Default> Default for SegmentedMap<K, V, S> {
    fn default() -> Self {
        Self::new(SegmentedConfig::default())
    }
}

impl<K: fmt::Debug, V: fmt::Debug, S> fmt::Debug for SegmentedMap<K, V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K: Hash + Eq, V, S: BuildHasher> Extend<(K, V)> for SegmentedMap<K, V, S> {
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}
