//! Persisting the parameters of a [`HashSplitting`].
//!
//! Only the parameters are written. The variant itself is identified by a [`SplittingKind`] that
//! the owner stores alongside them.
use crate::{
    splitting::{GeneralSplit, PowerOfTwoSplit},
    wire::{WireIn, WireOut},
    DecodeError, HashSplitting, SplittingKind,
};

const MASK: &str = "mask";
const BITS: &str = "bits";
const SEGMENTS: &str = "segments";

impl HashSplitting {
    /// Writes the variant's parameters as named fields.
    ///
    /// A power-of-two split writes `mask` and `bits`, a general split writes `segments` and a
    /// single segment split writes nothing.
    pub fn write_params(&self, wire: &mut WireOut<'_>) {
        match self {
            HashSplitting::Single => {}
            HashSplitting::PowerOfTwo(split) => {
                wire.write_i32(MASK, split.mask()).write_i32(BITS, split.bits());
            }
            HashSplitting::General(split) => {
                wire.write_i32(SEGMENTS, split.segments());
            }
        }
    }

    /// Reads the parameters of a `kind` split written by [`HashSplitting::write_params`].
    ///
    /// Further fields following the parameters are left unread.
    pub fn read_params(kind: SplittingKind, wire: &mut WireIn<'_>) -> Result<Self, DecodeError> {
        Ok(match kind {
            SplittingKind::Single => HashSplitting::Single,
            SplittingKind::PowerOfTwo => {
                let mask = wire.read_i32(MASK)?;
                let bits = wire.read_i32(BITS)?;
                let split = PowerOfTwoSplit::from_parts(mask, bits).ok_or_else(|| {
                    DecodeError::InvalidParameters {
                        kind,
                        reason: format!("mask {mask} does not match bits {bits}"),
                    }
                })?;
                HashSplitting::PowerOfTwo(split)
            }
            SplittingKind::General => {
                let segments = wire.read_i32(SEGMENTS)?;
                let split = GeneralSplit::from_parts(segments).ok_or_else(|| {
                    DecodeError::InvalidParameters {
                        kind,
                        reason: format!(
                            "segment count {segments} is not above one and a non-power of two"
                        ),
                    }
                })?;
                HashSplitting::General(split)
            }
        })
    }
}

/// Appends the encoded parameters of `split` to `buf`.
pub fn encode_into(split: &HashSplitting, buf: &mut Vec<u8>) {
    split.write_params(&mut WireOut::new(buf));
}

/// Encodes the parameters of `split`.
pub fn encode(split: &HashSplitting) -> Vec<u8> {
    let mut buf = vec![];
    encode_into(split, &mut buf);
    buf
}

/// Decodes the parameters of a `kind` split, requiring `bytes` to contain exactly those.
pub fn decode(kind: SplittingKind, bytes: &[u8]) -> Result<HashSplitting, DecodeError> {
    let mut wire = WireIn::new(bytes);
    let split = HashSplitting::read_params(kind, &mut wire)?;
    wire.finish()?;
    Ok(split)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wire::INT32;

    #[test]
    fn single_has_no_fields() {
        assert!(encode(&HashSplitting::Single).is_empty());
        assert_eq!(
            decode(SplittingKind::Single, &[]),
            Ok(HashSplitting::Single)
        );
        assert_eq!(
            decode(SplittingKind::Single, &[0]),
            Err(DecodeError::TrailingBytes(1))
        );
    }

    #[test]
    fn power_of_two_field_order() {
        let bytes = encode(&HashSplitting::for_segments(8));
        let mut expected = vec![4];
        expected.extend_from_slice(b"mask");
        expected.push(INT32);
        expected.extend_from_slice(&7i32.to_le_bytes());
        expected.push(4);
        expected.extend_from_slice(b"bits");
        expected.push(INT32);
        expected.extend_from_slice(&3i32.to_le_bytes());
        assert_eq!(bytes, expected);
    }

    #[test]
    fn general_fields() {
        let bytes = encode(&HashSplitting::for_segments(6));
        let mut wire = WireIn::new(&bytes);
        assert_eq!(wire.read_i32("segments"), Ok(6));
        assert_eq!(wire.finish(), Ok(()));
    }

    #[test]
    fn round_trip() {
        for segments in [1, 2, 3, 6, 8, 1000, 1024, i32::MAX, 1 << 30] {
            let split = HashSplitting::for_segments(segments);
            assert_eq!(decode(split.kind(), &encode(&split)), Ok(split));
        }
    }

    #[test]
    fn missing_bits() {
        let mut buf = vec![];
        WireOut::new(&mut buf).write_i32("mask", 7);
        assert_eq!(
            decode(SplittingKind::PowerOfTwo, &buf),
            Err(DecodeError::MissingField { field: "bits" })
        );
    }

    #[test]
    fn swapped_fields() {
        let mut buf = vec![];
        WireOut::new(&mut buf)
            .write_i32("bits", 3)
            .write_i32("mask", 7);
        assert!(matches!(
            decode(SplittingKind::PowerOfTwo, &buf),
            Err(DecodeError::UnexpectedField {
                expected: "mask",
                ..
            })
        ));
    }

    #[test]
    fn wrong_kind() {
        let bytes = encode(&HashSplitting::for_segments(6));
        assert!(decode(SplittingKind::PowerOfTwo, &bytes).is_err());
        assert!(decode(SplittingKind::Single, &bytes).is_err());
        let bytes = encode(&HashSplitting::for_segments(8));
        assert!(decode(SplittingKind::General, &bytes).is_err());
    }

    #[test]
    fn inconsistent_parameters() {
        let mut buf = vec![];
        WireOut::new(&mut buf)
            .write_i32("mask", 6)
            .write_i32("bits", 3);
        assert!(matches!(
            decode(SplittingKind::PowerOfTwo, &buf),
            Err(DecodeError::InvalidParameters {
                kind: SplittingKind::PowerOfTwo,
                ..
            })
        ));

        for segments in [-6, 0, 1, 16] {
            let mut buf = vec![];
            WireOut::new(&mut buf).write_i32("segments", segments);
            assert!(matches!(
                decode(SplittingKind::General, &buf),
                Err(DecodeError::InvalidParameters {
                    kind: SplittingKind::General,
                    ..
                })
            ));
        }
    }
}
