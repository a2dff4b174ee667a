use anyhow::Result;
use clap::Parser;
use rand_chacha::{ChaCha8Rng, rand_core::SeedableRng};
use room_core::{GeneratedRoom, Pos, RoomCatalog, RoomGenerator};
use std::collections::BTreeSet;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, default_value_t = 42)]
    seed: u64,
    #[arg(long, default_value_t = 200)]
    runs: u64,
    #[arg(long, default_value_t = 3)]
    rounds: u32,
}

fn main() -> Result<()> {
    let args = Args::parse();

    println!(
        "Starting fuzz harness: {} runs x {} rounds from base seed {}...",
        args.runs, args.rounds, args.seed
    );
    let catalog = RoomCatalog::default_catalog();

    for run in 0..args.runs {
        let run_seed = args.seed.wrapping_add(run.wrapping_mul(0x9e37_79b9));
        for round in 1..=args.rounds {
            let generator = RoomGenerator::new(&catalog, round).expect("default catalog is valid");
            let room = generator.generate(run_seed).expect("generation must not fail");
            check_room(&room, run_seed, round);

            let replay = generator.generate(run_seed).expect("generation must not fail");
            assert_eq!(
                room.fingerprint(),
                replay.fingerprint(),
                "seed {run_seed} round {round}: regeneration diverged"
            );
        }
    }

    println!("Fuzzing completed successfully.");
    Ok(())
}

fn check_room(room: &GeneratedRoom, seed: u64, round: u32) {
    let mut covered: BTreeSet<Pos> = BTreeSet::new();
    for placed in room.props.values() {
        for pos in placed.footprint_cells() {
            assert!(
                room.interior.get(pos),
                "seed {seed} round {round}: prop off the interior at {pos:?}"
            );
            assert!(
                !room.occupied_free.get(pos),
                "seed {seed} round {round}: footprint cell left open at {pos:?}"
            );
            assert!(
                covered.insert(pos),
                "seed {seed} round {round}: overlapping footprints at {pos:?}"
            );
        }
    }

    assert!(
        room.occupied_free.get(room.player_spawn_cell),
        "seed {seed} round {round}: player spawned on a prop"
    );

    for pos in &room.wall_cells {
        assert!(
            !room.interior.get(*pos),
            "seed {seed} round {round}: wall cell inside the interior at {pos:?}"
        );
    }

    // Enemy queries around the player must land on open cells when they
    // succeed, and never on the player's own cell.
    let mut rng = ChaCha8Rng::seed_from_u64(seed ^ u64::from(round));
    for _ in 0..8 {
        if let Ok(point) = room.enemy_spawn(&mut rng, room.player_spawn(), 5) {
            let cell = room.transform.world_to_cell(point);
            assert!(
                room.occupied_free.get(cell),
                "seed {seed} round {round}: enemy spawn on a closed cell at {cell:?}"
            );
            assert_ne!(
                cell, room.player_spawn_cell,
                "seed {seed} round {round}: enemy spawn on the player"
            );
        }
    }
}
