//! Procedural room generation domain split into coherent submodules.

pub mod model;

mod generator;
mod grid;
mod interior;
mod layout;
mod props;
mod rng;
mod spawns;

pub use generator::{GenerationError, RoomGenerator};
pub use grid::{BoolGrid, TileLayer};
pub use model::{GeneratedRoom, GridTransform, PlacedProp, QuerySpaceEmpty, WorldPoint};
pub use props::PlacementFailure;

use crate::catalog::RoomCatalog;

pub fn generate_room(
    run_seed: u64,
    round: u32,
    catalog: &RoomCatalog,
) -> Result<GeneratedRoom, GenerationError> {
    let generator = RoomGenerator::new(catalog, round)?;
    generator.generate(run_seed)
}
