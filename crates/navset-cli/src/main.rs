//! CLI utility for navmesh set containers

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};

use navset::{NavMeshSetHeader, SetReader, TileRecordHeader, NAVMESH_SET_VERSION};

/// Inspect and validate tiled navigation mesh containers
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Validate a set file and print its parameters and totals
    Inspect {
        /// Path to the navmesh set file
        input: PathBuf,

        /// Also list every tile record
        #[arg(long)]
        tiles: bool,
    },
}

fn main() -> Result<()> {
    env_logger::init();

    let args = Args::parse();
    match args.command {
        Commands::Inspect { input, tiles } => inspect(&input, tiles),
    }
}

fn inspect(input: &Path, list_tiles: bool) -> Result<()> {
    let data =
        std::fs::read(input).with_context(|| format!("reading {}", input.display()))?;
    let mut reader = SetReader::new(&data);

    let header = NavMeshSetHeader::read_from(&mut reader).context("reading set header")?;
    if header.version != NAVMESH_SET_VERSION {
        bail!(
            "unsupported container version {} (expected {})",
            header.version,
            NAVMESH_SET_VERSION
        );
    }

    println!("navmesh set: {}", input.display());
    println!("  version:        {}", header.version);
    println!("  tiles:          {}", header.tile_count);
    let p = &header.params;
    println!(
        "  origin:         ({:.2}, {:.2}, {:.2})",
        p.origin[0], p.origin[1], p.origin[2]
    );
    println!("  tile size:      {:.2} x {:.2}", p.tile_width, p.tile_height);
    println!("  max tiles:      {}", p.max_tiles);
    println!("  max polys/tile: {}", p.max_polys_per_tile);

    let mut total_bytes = 0u64;
    for index in 0..header.tile_count {
        let record = TileRecordHeader::read_from(&mut reader)
            .with_context(|| format!("reading tile record {index}"))?;
        if !record.is_valid() {
            bail!(
                "invalid tile record {index}: ref {:#x}, {} bytes",
                record.tile_ref,
                record.data_size
            );
        }
        reader
            .read_bytes(record.data_size as usize)
            .with_context(|| format!("reading tile {index} payload"))?;
        total_bytes += record.data_size as u64;

        if list_tiles {
            println!(
                "  tile {index}: ref {:#018x}, {} bytes",
                record.tile_ref, record.data_size
            );
        }
    }

    println!("  payload bytes:  {total_bytes}");
    if reader.remaining() > 0 {
        log::warn!(
            "{} trailing bytes after the last tile record",
            reader.remaining()
        );
    }

    Ok(())
}
