//! High-level room generation orchestration that composes layout, carving,
//! placement, and spawn selection into one synchronous pass per round.

use thiserror::Error;

use crate::catalog::{ConfigError, RoomCatalog};

use super::interior::carve_interior;
use super::layout::build_room_layout;
use super::model::{GeneratedRoom, GridTransform};
use super::props::place_props;
use super::rng::{GenRng, derive_round_seed};
use super::spawns::select_player_spawn;

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// Placement consumed every open interior cell, leaving nowhere to put
    /// the player.
    #[error("no open interior cell remains for the player spawn")]
    NoSpawnCell,
}

pub struct RoomGenerator<'a> {
    catalog: &'a RoomCatalog,
    round: u32,
    room_width: usize,
    room_height: usize,
}

impl<'a> RoomGenerator<'a> {
    /// Validates the static catalog once and fixes the round-scaled room
    /// dimensions.
    pub fn new(catalog: &'a RoomCatalog, round: u32) -> Result<Self, ConfigError> {
        catalog.validate()?;
        let growth = u64::from(round.saturating_sub(1))
            * u64::from(catalog.settings.round_size_increment);
        Ok(Self {
            catalog,
            round,
            room_width: (u64::from(catalog.settings.base_width) + growth) as usize,
            room_height: (u64::from(catalog.settings.base_height) + growth) as usize,
        })
    }

    pub fn room_size(&self) -> (usize, usize) {
        (self.room_width, self.room_height)
    }

    /// Runs the full pipeline: grid layout, interior carving, the three
    /// placement passes, then the player spawn. Single-threaded and run to
    /// completion; the grids are exclusively owned for the duration.
    pub fn generate(&self, run_seed: u64) -> Result<GeneratedRoom, GenerationError> {
        let mut rng = GenRng::from_seed(derive_round_seed(run_seed, self.round));

        let mut layout = build_room_layout(
            &mut rng,
            &self.catalog.settings,
            self.room_width,
            self.room_height,
            &self.catalog.border_tiles,
        )?;
        let carved = carve_interior(&mut rng, &mut layout, &self.catalog.floor_tiles);
        let placement = place_props(&mut rng, &carved.interior, self.catalog)?;
        let player_spawn_cell = select_player_spawn(&mut rng, &placement.occupied)
            .ok_or(GenerationError::NoSpawnCell)?;

        Ok(GeneratedRoom {
            grid_width: self.room_width * 3,
            grid_height: self.room_height * 3,
            room_width: self.room_width,
            room_height: self.room_height,
            border_tiles: layout.border_tiles,
            floor_tiles: carved.floor_tiles,
            wall_cells: carved.wall_cells,
            interior: carved.interior,
            occupied_free: placement.occupied,
            props: placement.placed,
            placement_failures: placement.failures,
            player_spawn_cell,
            transform: GridTransform::default(),
        })
    }
}
