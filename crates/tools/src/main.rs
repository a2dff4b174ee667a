use anyhow::{Context, Result};
use clap::Parser;
use rand_chacha::{ChaCha8Rng, rand_core::SeedableRng};
use room_core::{BoolGrid, GeneratedRoom, Pos, RoomCatalog, RoomGenerator};
use std::fs;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Run seed fed into the per-round seed derivation
    #[arg(short, long, default_value_t = 42)]
    seed: u64,
    /// Round number; room dimensions scale with it
    #[arg(short, long, default_value_t = 1)]
    round: u32,
    /// Path to a catalog JSON file (built-in catalog when omitted)
    #[arg(short, long)]
    catalog: Option<String>,
    /// Sample this many enemy spawns around the player and print them
    #[arg(short, long, default_value_t = 0)]
    enemies: u32,
    /// Print the room as an ASCII map
    #[arg(short, long)]
    map: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let catalog = match &args.catalog {
        Some(path) => {
            let data = fs::read_to_string(path)
                .with_context(|| format!("Failed to read catalog file: {path}"))?;
            serde_json::from_str(&data).with_context(|| "Failed to deserialize catalog JSON")?
        }
        None => RoomCatalog::default_catalog(),
    };

    let generator =
        RoomGenerator::new(&catalog, args.round).context("Catalog failed validation")?;
    let room = generator.generate(args.seed).context("Room generation failed")?;

    let (width, height) = room.bounding_size();
    println!("Room {}x{} on a {}x{} grid", width, height, room.grid_width, room.grid_height);
    println!("Interior cells: {}", room.interior.count_set());
    println!("Wall cells: {}", room.wall_cells.len());
    println!("Props placed: {}", room.props.len());
    for failure in &room.placement_failures {
        println!("Unplaced required prop: {}", failure.prop);
    }
    let player = room.player_spawn();
    println!("Player spawn: ({}, {})", player.x, player.y);
    println!("Fingerprint: {:016x}", room.fingerprint());

    if args.enemies > 0 {
        let mut rng = ChaCha8Rng::seed_from_u64(args.seed);
        for _ in 0..args.enemies {
            match room.enemy_spawn(&mut rng, player, 6) {
                Ok(point) => println!("Enemy spawn: ({}, {})", point.x, point.y),
                Err(err) => println!("Enemy spawn query failed: {err}"),
            }
        }
    }

    if args.map {
        print!("{}", render_map(&room));
    }

    Ok(())
}

/// Renders the full grid, top row first. Walls are `#`, open floor `.`,
/// prop footprints `o`, the player spawn `@`.
fn render_map(room: &GeneratedRoom) -> String {
    let mut footprints = BoolGrid::new(room.grid_width, room.grid_height);
    for placed in room.props.values() {
        for pos in placed.footprint_cells() {
            footprints.set(pos, true);
        }
    }

    let mut out = String::new();
    for y in (0..room.grid_height as i32).rev() {
        for x in 0..room.grid_width as i32 {
            let pos = Pos { y, x };
            let glyph = if pos == room.player_spawn_cell {
                '@'
            } else if footprints.get(pos) {
                'o'
            } else if room.interior.get(pos) {
                '.'
            } else if room.border_tiles.get(pos).is_some() {
                '#'
            } else {
                ' '
            };
            out.push(glyph);
        }
        out.push('\n');
    }
    out
}
