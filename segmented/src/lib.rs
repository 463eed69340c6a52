//! A segmented hash map built on [`seghash_split`].
//!
//! [`SegmentedMap`] partitions its entries across a fixed number of segments, each a separate
//! hashbrown table. Key hashes are split into a segment index and a residual hash by the map's
//! [`HashSplitting`](seghash_split::HashSplitting), so the hash bits used to choose a segment do
//! not also decide the position within it.
//!
//! A map's addressing is persisted as a small [header](header), from which
//! [`SegmentedMap::from_header`] rebuilds a map that places every key exactly as the original.
#![deny(unsafe_op_in_unsafe_fn)]
#![warn(clippy::undocumented_unsafe_blocks)]
#![warn(missing_docs)]

mod config;
pub mod hash;
pub mod header;
mod map;

pub use config::{ConfigError, SegmentedConfig, MAX_SEGMENTS};
pub use header::HeaderError;
pub use map::SegmentedMap;
