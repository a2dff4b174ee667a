//! Outer room shape construction: centered base rectangle plus randomized
//! expansions over a grid sized to the maximum possible footprint.

use crate::catalog::{ConfigError, GenerationSettings, TileDefinition};
use crate::types::Pos;

use super::grid::{BoolGrid, TileLayer};
use super::rng::{GenRng, sample_weighted};

pub(super) struct RoomLayout {
    /// True where a cell belongs to the room (base rectangle plus expansions).
    pub(super) room: BoolGrid,
    /// Border tile index for every room cell; interior carving clears the
    /// enclosed ones afterwards.
    pub(super) border_tiles: TileLayer,
}

/// Builds the filled room silhouette. The grid is three times the room size
/// on each axis so expansions and prop margins can never leave it.
pub(super) fn build_room_layout(
    rng: &mut GenRng,
    settings: &GenerationSettings,
    room_width: usize,
    room_height: usize,
    border_set: &[TileDefinition],
) -> Result<RoomLayout, ConfigError> {
    check_expansion_bounds(settings, room_width, room_height)?;

    let grid_width = room_width * 3;
    let grid_height = room_height * 3;
    let mut room = BoolGrid::new(grid_width, grid_height);
    let mut border_tiles = TileLayer::new(grid_width, grid_height);

    for x in room_width..room_width * 2 {
        for y in room_height..room_height * 2 {
            let pos = Pos { y: y as i32, x: x as i32 };
            let tile_index = sample_weighted(rng, border_set);
            border_tiles.set(pos, tile_index as u16);
            room.set(pos, true);
        }
    }

    if settings.expansions_enabled {
        for _ in 0..settings.expansion_count {
            let width = rng.range_usize(settings.min_expansion_width as usize, room_width);
            let height = rng.range_usize(settings.min_expansion_height as usize, room_height);
            // The anchor interval keeps every expansion overlapping the base
            // rectangle by at least one row and one column. Signed arithmetic:
            // an expansion wider than the room pushes the lower bound toward
            // zero, never below it once the bounds check has passed.
            let x_low = (room_width as i64 - width as i64 + 3) as usize;
            let y_low = (room_height as i64 - height as i64 + 3) as usize;
            let x_start = rng.range_usize(x_low, room_width * 2 - 3);
            let y_start = rng.range_usize(y_low, room_height * 2 - 3);

            for x in x_start..x_start + width {
                for y in y_start..y_start + height {
                    let pos = Pos { y: y as i32, x: x as i32 };
                    if room.get(pos) {
                        continue;
                    }
                    let tile_index = sample_weighted(rng, border_set);
                    border_tiles.set(pos, tile_index as u16);
                    room.set(pos, true);
                }
            }
        }
    }

    Ok(RoomLayout { room, border_tiles })
}

fn check_expansion_bounds(
    settings: &GenerationSettings,
    room_width: usize,
    room_height: usize,
) -> Result<(), ConfigError> {
    if !settings.expansions_enabled {
        return Ok(());
    }
    if (room_width as i64) - (settings.min_expansion_width as i64) + 3 < 0 {
        return Err(ConfigError::ExpansionBounds {
            axis: "width",
            minimum: settings.min_expansion_width,
            room: room_width as u32,
        });
    }
    if (room_height as i64) - (settings.min_expansion_height as i64) + 3 < 0 {
        return Err(ConfigError::ExpansionBounds {
            axis: "height",
            minimum: settings.min_expansion_height,
            room: room_height as u32,
        });
    }
    Ok(())
}
