//! The persisted addressing header of a segmented table.
//!
//! The header is the magic bytes [`HEADER_MAGIC`], followed by the [`SplittingKind`] code of the
//! table's splitting strategy and its encoded parameters.
use seghash_split::{wire::WireIn, DecodeError, HashSplitting, SplittingKind};

use crate::config::ConfigError;

/// Magic bytes at the start of every header.
pub const HEADER_MAGIC: [u8; 4] = *b"SGH1";

/// A table header could not be decoded.
#[derive(Clone, PartialEq, Eq, Debug, thiserror::Error)]
pub enum HeaderError {
    /// The input does not start with [`HEADER_MAGIC`].
    #[error("not a segmented table header")]
    BadMagic,
    /// The input ends before the splitting kind.
    #[error("header ends before the splitting kind")]
    MissingKind,
    /// The splitting kind code is not known.
    #[error("unknown splitting kind code {0}")]
    UnknownKind(u8),
    /// The splitting parameters could not be decoded.
    #[error("bad splitting parameters: {0}")]
    Params(#[from] DecodeError),
    /// The header is well-formed, but the map cannot be built with its segment count.
    #[error("unsupported header: {0}")]
    Config(#[from] ConfigError),
}

/// Encodes the header of a table addressed by `splitting`.
pub fn encode_header(splitting: &HashSplitting) -> Vec<u8> {
    let mut buf = HEADER_MAGIC.to_vec();
    buf.push(splitting.kind().code());
    seghash_split::encode_into(splitting, &mut buf);
    buf
}

/// Decodes a header written by [`encode_header`].
pub fn decode_header(bytes: &[u8]) -> Result<HashSplitting, HeaderError> {
    let rest = bytes
        .strip_prefix(&HEADER_MAGIC[..])
        .ok_or(HeaderError::BadMagic)?;
    let (&code, params) = rest.split_first().ok_or(HeaderError::MissingKind)?;
    let kind = SplittingKind::from_code(code).ok_or(HeaderError::UnknownKind(code))?;
    let mut wire = WireIn::new(params);
    let splitting = HashSplitting::read_params(kind, &mut wire)?;
    wire.finish()?;
    Ok(splitting)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip() {
        for segments in [1, 4, 7, 64, 96] {
            let splitting = HashSplitting::for_segments(segments);
            assert_eq!(decode_header(&encode_header(&splitting)), Ok(splitting));
        }
    }

    #[test]
    fn single_header() {
        assert_eq!(encode_header(&HashSplitting::Single), b"SGH1\0");
    }

    #[test]
    fn rejects_bad_headers() {
        assert_eq!(decode_header(b""), Err(HeaderError::BadMagic));
        assert_eq!(decode_header(b"SGH2\0"), Err(HeaderError::BadMagic));
        assert_eq!(decode_header(b"SGH1"), Err(HeaderError::MissingKind));
        assert_eq!(decode_header(b"SGH1\x07"), Err(HeaderError::UnknownKind(7)));
        assert_eq!(
            decode_header(b"SGH1\x01"),
            Err(HeaderError::Params(DecodeError::MissingField { field: "mask" }))
        );

        let mut header = encode_header(&HashSplitting::for_segments(6));
        header.push(0);
        assert_eq!(
            decode_header(&header),
            Err(HeaderError::Params(DecodeError::TrailingBytes(1)))
        );
    }
}
