/// Largest segment count a [`SegmentedMap`](crate::SegmentedMap) accepts.
///
/// Every segment table is allocated up front, so the count is capped well below what a
/// [`HashSplitting`](seghash_split::HashSplitting) can address.
pub const MAX_SEGMENTS: i32 = 1 << 16;

/// Configuration of a new [`SegmentedMap`](crate::SegmentedMap).
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct SegmentedConfig {
    /// Number of segments, must be in `1..=MAX_SEGMENTS`.
    pub segments: i32,
}

/// A segment count a [`SegmentedMap`](crate::SegmentedMap) cannot be built with.
#[derive(Clone, PartialEq, Eq, Debug, thiserror::Error)]
pub enum ConfigError {
    /// The segment count is zero or negative.
    #[error("segment count must be positive, got {0}")]
    NonPositive(i32),
    /// The segment count is above [`MAX_SEGMENTS`].
    #[error("segment count {0} exceeds the maximum of {MAX_SEGMENTS}")]
    TooManySegments(i32),
}

impl Default for SegmentedConfig {
    fn default() -> Self {
        Self { segments: 1 }
    }
}

impl SegmentedConfig {
    /// Returns a copy of this configuration using `segments` segments.
    pub fn with_segments(self, segments: i32) -> Self {
        Self { segments }
    }

    /// Checks that the segment count is supported.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_segments(self.segments)
    }
}

pub(crate) fn validate_segments(segments: i32) -> Result<(), ConfigError> {
    if segments <= 0 {
        Err(ConfigError::NonPositive(segments))
    } else if segments > MAX_SEGMENTS {
        Err(ConfigError::TooManySegments(segments))
    } else {
        Ok(())
    }
}
