//! The [`HashSplitting`] strategy and its variants.
use std::{fmt, str::FromStr};

/// Number of low hash bits the general variant treats as consumed by the segment index.
///
/// The modulo has no clean bit boundary, so a fixed shift is used for the residual. This value is
/// part of the persisted table format and must not change.
pub const GENERAL_RESIDUAL_SHIFT: u32 = 31;

/// Splits a 64-bit hash into a segment index and a residual hash.
///
/// An instance is selected once per table by [`HashSplitting::for_segments`] and is immutable
/// afterwards. Every reader and writer of a table must use an instance constructed (or decoded)
/// for the same segment count, as the split is part of the table's on-disk format.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub enum HashSplitting {
    /// A table with a single segment. All hash bits are left for the residual.
    #[default]
    Single,
    /// A power-of-two segment count, indexed by masking the low bits.
    PowerOfTwo(PowerOfTwoSplit),
    /// Any other segment count, indexed by a modulo on the low 31 bits.
    General(GeneralSplit),
}

/// Parameters of [`HashSplitting::PowerOfTwo`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct PowerOfTwoSplit {
    mask: i32,
    bits: i32,
}

/// Parameters of [`HashSplitting::General`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct GeneralSplit {
    segments: i32,
}

impl PowerOfTwoSplit {
    /// Largest shift a power-of-two split can have, as `segments` is a positive `i32`.
    pub const MAX_BITS: i32 = 30;

    fn new(segments: i32) -> Self {
        debug_assert!(segments > 1 && (segments as u32).is_power_of_two());
        Self {
            mask: segments - 1,
            bits: segments.trailing_zeros() as i32,
        }
    }

    /// Rebuilds the split from persisted parameters, returning `None` if they are inconsistent.
    pub(crate) fn from_parts(mask: i32, bits: i32) -> Option<Self> {
        if !(1..=Self::MAX_BITS).contains(&bits) || mask != (1 << bits) - 1 {
            return None;
        }
        Some(Self { mask, bits })
    }

    /// Mask applied to the low 32 bits of a hash, equal to `segments - 1`.
    #[inline]
    pub fn mask(&self) -> i32 {
        self.mask
    }

    /// Number of hash bits consumed by the segment index.
    #[inline]
    pub fn bits(&self) -> i32 {
        self.bits
    }

    /// Number of segments addressed by this split.
    #[inline]
    pub fn segments(&self) -> i32 {
        self.mask + 1
    }

    #[inline(always)]
    fn segment_index(&self, hash: u64) -> usize {
        ((hash as i32) & self.mask) as usize
    }

    #[inline(always)]
    fn segment_hash(&self, hash: u64) -> u64 {
        hash >> self.bits
    }
}

impl GeneralSplit {
    /// Rebuilds the split from a persisted segment count, returning `None` if a general split
    /// would never have been selected for it.
    pub(crate) fn from_parts(segments: i32) -> Option<Self> {
        if segments <= 1 || (segments as u32).is_power_of_two() {
            return None;
        }
        Some(Self { segments })
    }

    /// Number of segments addressed by this split.
    #[inline]
    pub fn segments(&self) -> i32 {
        self.segments
    }

    #[inline(always)]
    fn segment_index(&self, hash: u64) -> usize {
        (((hash as i32) & i32::MAX) % self.segments) as usize
    }

    #[inline(always)]
    fn segment_hash(&self, hash: u64) -> u64 {
        hash >> GENERAL_RESIDUAL_SHIFT
    }
}

impl HashSplitting {
    /// Selects the splitting strategy for a table with `segments` segments.
    ///
    /// # Panics
    ///
    /// Panics if `segments` is not positive. The segment count comes from the table
    /// configuration, so a non-positive value is a bug in the caller.
    pub fn for_segments(segments: i32) -> Self {
        assert!(
            segments > 0,
            "segment count must be positive, got {segments}"
        );
        if segments == 1 {
            HashSplitting::Single
        } else if (segments as u32).is_power_of_two() {
            HashSplitting::PowerOfTwo(PowerOfTwoSplit::new(segments))
        } else {
            HashSplitting::General(GeneralSplit { segments })
        }
    }

    /// Returns the segment, in `0..self.segments()`, that `hash` belongs to.
    #[inline]
    pub fn segment_index(&self, hash: u64) -> usize {
        match self {
            HashSplitting::Single => 0,
            HashSplitting::PowerOfTwo(split) => split.segment_index(hash),
            HashSplitting::General(split) => split.segment_index(hash),
        }
    }

    /// Returns the hash bits left over for addressing within the segment.
    #[inline]
    pub fn segment_hash(&self, hash: u64) -> u64 {
        match self {
            HashSplitting::Single => hash,
            HashSplitting::PowerOfTwo(split) => split.segment_hash(hash),
            HashSplitting::General(split) => split.segment_hash(hash),
        }
    }

    /// Returns both the segment index and the residual hash.
    #[inline]
    pub fn split(&self, hash: u64) -> (usize, u64) {
        (self.segment_index(hash), self.segment_hash(hash))
    }

    /// Number of segments addressed by this strategy.
    pub fn segments(&self) -> i32 {
        match self {
            HashSplitting::Single => 1,
            HashSplitting::PowerOfTwo(split) => split.segments(),
            HashSplitting::General(split) => split.segments(),
        }
    }

    /// The tag identifying this variant, which owners persist next to the encoded parameters.
    pub fn kind(&self) -> SplittingKind {
        match self {
            HashSplitting::Single => SplittingKind::Single,
            HashSplitting::PowerOfTwo(_) => SplittingKind::PowerOfTwo,
            HashSplitting::General(_) => SplittingKind::General,
        }
    }
}

/// Variant tag of a [`HashSplitting`].
///
/// The numeric codes returned by [`SplittingKind::code`] are stable and may be persisted.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum SplittingKind {
    /// Tag of [`HashSplitting::Single`].
    Single,
    /// Tag of [`HashSplitting::PowerOfTwo`].
    PowerOfTwo,
    /// Tag of [`HashSplitting::General`].
    General,
}

impl SplittingKind {
    /// All kinds in code order.
    pub const ALL: [SplittingKind; 3] = [
        SplittingKind::Single,
        SplittingKind::PowerOfTwo,
        SplittingKind::General,
    ];

    /// Stable numeric code of this kind.
    pub fn code(self) -> u8 {
        match self {
            SplittingKind::Single => 0,
            SplittingKind::PowerOfTwo => 1,
            SplittingKind::General => 2,
        }
    }

    /// Looks up a kind by its numeric code.
    pub fn from_code(code: u8) -> Option<Self> {
        Self::ALL.get(code as usize).copied()
    }

    /// Human readable name, accepted by the [`FromStr`] implementation.
    pub fn name(self) -> &'static str {
        match self {
            SplittingKind::Single => "single",
            SplittingKind::PowerOfTwo => "power-of-two",
            SplittingKind::General => "general",
        }
    }
}

impl fmt::Display for SplittingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when parsing an unknown [`SplittingKind`] name.
#[derive(Clone, PartialEq, Eq, Debug, thiserror::Error)]
#[error("unknown splitting kind {0:?}, expected one of single, power-of-two, general")]
pub struct UnknownKind(pub String);

impl FromStr for SplittingKind {
    type Err = UnknownKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| UnknownKind(s.to_owned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_segment() {
        let split = HashSplitting::for_segments(1);
        assert_eq!(split, HashSplitting::Single);
        assert_eq!(split.segments(), 1);
        for hash in [0, 1, 0x7fff_ffff, 0x8000_0000, u64::MAX] {
            assert_eq!(split.segment_index(hash), 0);
            assert_eq!(split.segment_hash(hash), hash);
        }
    }

    #[test]
    fn power_of_two_eight() {
        let split = HashSplitting::for_segments(8);
        let HashSplitting::PowerOfTwo(params) = split else {
            panic!("expected a power of two split, got {split:?}");
        };
        assert_eq!(params.mask(), 7);
        assert_eq!(params.bits(), 3);
        assert_eq!(split.segment_index(0b1011), 3);
        assert_eq!(split.segment_hash(0b1011), 1);
    }

    #[test]
    fn power_of_two_uses_logical_shift() {
        let split = HashSplitting::for_segments(1 << 4);
        assert_eq!(split.segment_hash(u64::MAX), u64::MAX >> 4);
        assert_eq!(split.segment_index(u64::MAX), 15);
    }

    #[test]
    fn largest_power_of_two() {
        let split = HashSplitting::for_segments(1 << 30);
        let HashSplitting::PowerOfTwo(params) = split else {
            panic!("expected a power of two split, got {split:?}");
        };
        assert_eq!(params.bits(), 30);
        assert_eq!(split.segments(), 1 << 30);
        assert_eq!(split.segment_index(u64::MAX), (1 << 30) - 1);
    }

    #[test]
    fn general_six() {
        let split = HashSplitting::for_segments(6);
        assert_eq!(split, HashSplitting::General(GeneralSplit { segments: 6 }));
        assert_eq!(split.segment_index(13), 1);
        assert_eq!(split.segment_hash(13), 0);
        assert_eq!(split.segment_hash(1 << 40), 1 << 9);
    }

    #[test]
    fn general_ignores_sign_of_truncated_hash() {
        let split = HashSplitting::for_segments(i32::MAX);
        // Truncates to i32::MIN | 5, masking drops the sign bit.
        assert_eq!(split.segment_index(0x8000_0005), 5);
        assert_eq!(split.segment_index(0xffff_ffff), 0);
        assert_eq!(split.segment_index(0xffff_fffe), i32::MAX as usize - 1);
    }

    #[test]
    #[should_panic(expected = "segment count must be positive")]
    fn zero_segments_panics() {
        HashSplitting::for_segments(0);
    }

    #[test]
    #[should_panic(expected = "segment count must be positive")]
    fn negative_segments_panics() {
        HashSplitting::for_segments(-8);
    }

    #[test]
    fn kind_codes_and_names() {
        for kind in SplittingKind::ALL {
            assert_eq!(SplittingKind::from_code(kind.code()), Some(kind));
            assert_eq!(kind.name().parse::<SplittingKind>(), Ok(kind));
        }
        assert_eq!(SplittingKind::from_code(3), None);
        assert!("pow2".parse::<SplittingKind>().is_err());
        assert_eq!(HashSplitting::for_segments(1).kind(), SplittingKind::Single);
        assert_eq!(
            HashSplitting::for_segments(2).kind(),
            SplittingKind::PowerOfTwo
        );
        assert_eq!(HashSplitting::for_segments(3).kind(), SplittingKind::General);
    }

    #[test]
    fn rejects_inconsistent_parts() {
        assert!(PowerOfTwoSplit::from_parts(7, 3).is_some());
        assert!(PowerOfTwoSplit::from_parts(6, 3).is_none());
        assert!(PowerOfTwoSplit::from_parts(0, 0).is_none());
        assert!(PowerOfTwoSplit::from_parts(-1, 31).is_none());
        assert!(GeneralSplit::from_parts(6).is_some());
        assert!(GeneralSplit::from_parts(8).is_none());
        assert!(GeneralSplit::from_parts(1).is_none());
        assert!(GeneralSplit::from_parts(0).is_none());
        assert!(GeneralSplit::from_parts(-3).is_none());
    }
}
