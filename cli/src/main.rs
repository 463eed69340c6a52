#![allow(missing_docs)]

use std::io::Write;

use clap::{Parser, Subcommand};
use color_eyre::eyre::{ensure, WrapErr};
use seghash_segmented::{SegmentedConfig, SegmentedMap};
use seghash_split::{decode, encode, HashSplitting, SplittingKind};

/// Inspect how hashes are split between the segments of a segmented table.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the segment index and residual hash of each hash.
    Split {
        #[clap(short = 's', long)]
        segments: i32,
        /// Hashes in decimal or 0x-prefixed hexadecimal.
        #[clap(value_parser = parse_hash, required = true)]
        hashes: Vec<u64>,
    },
    /// Print the kind and hex-encoded parameters of the splitting for a segment count.
    Encode {
        #[clap(short = 's', long)]
        segments: i32,
    },
    /// Decode hex-encoded splitting parameters of the given kind.
    Decode {
        #[clap(short = 'k', long)]
        kind: SplittingKind,
        #[clap(default_value = "")]
        params: String,
    },
    /// Insert `count` consecutive keys into a segmented map and report segment occupancy.
    Histogram {
        #[clap(short = 's', long)]
        segments: i32,
        #[clap(short = 'c', long, default_value = "100000")]
        count: u64,
    },
}

fn parse_hash(arg: &str) -> Result<u64, std::num::ParseIntError> {
    match arg.strip_prefix("0x").or_else(|| arg.strip_prefix("0X")) {
        Some(hex_digits) => u64::from_str_radix(hex_digits, 16),
        None => arg.parse(),
    }
}

fn splitting_for(segments: i32) -> color_eyre::Result<HashSplitting> {
    ensure!(segments > 0, "segment count must be positive, got {segments}");
    Ok(HashSplitting::for_segments(segments))
}

fn run_split(out: &mut impl Write, segments: i32, hashes: &[u64]) -> color_eyre::Result<()> {
    let splitting = splitting_for(segments)?;
    writeln!(out, "kind: {}", splitting.kind())?;
    for &hash in hashes {
        let (index, residual) = splitting.split(hash);
        writeln!(out, "{hash:#018x} segment {index} residual {residual:#018x}")?;
    }
    Ok(())
}

fn run_encode(out: &mut impl Write, segments: i32) -> color_eyre::Result<()> {
    let splitting = splitting_for(segments)?;
    writeln!(out, "kind: {}", splitting.kind())?;
    writeln!(out, "params: {}", hex::encode(encode(&splitting)))?;
    Ok(())
}

fn run_decode(out: &mut impl Write, kind: SplittingKind, params: &str) -> color_eyre::Result<()> {
    let bytes = hex::decode(params).wrap_err("parameters are not valid hex")?;
    let splitting =
        decode(kind, &bytes).wrap_err_with(|| format!("cannot decode {kind} parameters"))?;
    writeln!(out, "kind: {}", splitting.kind())?;
    writeln!(out, "segments: {}", splitting.segments())?;
    Ok(())
}

fn run_histogram(out: &mut impl Write, segments: i32, count: u64) -> color_eyre::Result<()> {
    let mut map: SegmentedMap<u64, ()> =
        SegmentedMap::try_new(SegmentedConfig::default().with_segments(segments))?;
    map.extend((0..count).map(|key| (key, ())));
    log::info!("inserted {} keys into {} segments", map.len(), map.segment_count());

    let (min, max) = map
        .segment_lens()
        .fold((usize::MAX, 0), |(min, max), len| (min.min(len), max.max(len)));
    for (index, len) in map.segment_lens().enumerate() {
        writeln!(out, "{index:>6} {len}")?;
    }
    log::info!("segment occupancy min {min} max {max}");
    Ok(())
}

fn main() -> color_eyre::Result<()> {
    let args = Args::parse();

    color_eyre::install()?;
    seghash_logger::setup();

    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match args.command {
        Command::Split { segments, hashes } => run_split(&mut out, segments, &hashes),
        Command::Encode { segments } => run_encode(&mut out, segments),
        Command::Decode { kind, params } => run_decode(&mut out, kind, &params),
        Command::Histogram { segments, count } => run_histogram(&mut out, segments, count),
    }
}
