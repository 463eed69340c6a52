//! Splitting 64-bit hashes between the segments of a segmented hash table.
//!
//! A segmented table partitions its entries across a fixed number of independent segments. For
//! every hash, [`HashSplitting::segment_index`] selects the segment and
//! [`HashSplitting::segment_hash`] yields the remaining bits used to address entries within that
//! segment. The strategy is chosen once from the segment count by
//! [`HashSplitting::for_segments`]:
//!
//! * a single segment uses every hash bit for the residual,
//! * a power-of-two segment count masks the low bits and shifts them out of the residual,
//! * any other segment count takes the low 31 bits modulo the segment count and shifts out a
//!   fixed 31 bits.
//!
//! The split is part of a table's persistent format. The parameters of a strategy are written
//! with [`encode`] and read back with [`decode`], given the [`SplittingKind`] that the table
//! stores next to them.
//!
//! ```
//! use seghash_split::{decode, encode, HashSplitting};
//!
//! let split = HashSplitting::for_segments(8);
//! assert_eq!(split.segment_index(0b1011), 3);
//! assert_eq!(split.segment_hash(0b1011), 1);
//!
//! let reopened = decode(split.kind(), &encode(&split)).unwrap();
//! assert_eq!(reopened, split);
//! ```
#![deny(unsafe_op_in_unsafe_fn)]
#![warn(clippy::undocumented_unsafe_blocks)]
#![warn(missing_docs)]

mod codec;
mod error;
mod splitting;
pub mod wire;

pub use codec::{decode, encode, encode_into};
pub use error::DecodeError;
pub use splitting::{
    GeneralSplit, HashSplitting, PowerOfTwoSplit, SplittingKind, UnknownKind,
    GENERAL_RESIDUAL_SHIFT,
};
