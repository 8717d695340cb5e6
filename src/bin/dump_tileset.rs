use std::path::PathBuf;

use clap::Parser;
use pokeworld::codec::BinaryReader;
use pokeworld::gfx::{decode_2bpp, TILE_BYTES};

#[derive(Parser)]
#[command(name = "dump-tileset")]
#[command(about = "Print the tiles of a .2bpp file as ASCII art")]
struct Args {
    /// .2bpp tile file
    path: PathBuf,

    /// First tile to print
    #[arg(long, default_value = "0")]
    start: usize,

    /// Number of tiles to print
    #[arg(long, default_value = "16")]
    count: usize,
}

const SHADES: [char; 4] = ['.', ':', '+', '#'];

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let data = std::fs::read(&args.path)?;
    let records = BinaryReader::new(&data).records(TILE_BYTES);
    eprintln!("{}: {} bytes, {} tiles", args.path.display(), data.len(), records.len());

    for (index, raw) in records.iter().enumerate().skip(args.start).take(args.count) {
        match decode_2bpp(raw) {
            Ok(tile) => {
                println!("tile {index}");
                for row in tile.rows() {
                    let line: String = row.iter().map(|&p| SHADES[p as usize]).collect();
                    println!("  {line}");
                }
            }
            Err(e) => println!("tile {index}: {e}"),
        }
    }
    Ok(())
}
