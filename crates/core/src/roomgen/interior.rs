//! Interior carving: flags fully-enclosed room cells, clears their border
//! tiles, and fills them with weighted floor tiles. Non-enclosed room cells
//! stay solid and are reported as collider cells for the renderer.

use crate::catalog::TileDefinition;
use crate::types::Pos;

use super::grid::{BoolGrid, TileLayer};
use super::layout::RoomLayout;
use super::rng::{GenRng, sample_weighted};

pub(super) struct CarvedInterior {
    pub(super) interior: BoolGrid,
    pub(super) floor_tiles: TileLayer,
    pub(super) wall_cells: Vec<Pos>,
}

/// Marks every room cell whose eight neighbors are all room cells as
/// interior, then floor-tiles the interior. The room mask itself is never
/// unflagged, so the enclosure test reads the same layout for every cell
/// regardless of scan order.
pub(super) fn carve_interior(
    rng: &mut GenRng,
    layout: &mut RoomLayout,
    floor_set: &[TileDefinition],
) -> CarvedInterior {
    let interior = enclosed_mask(&layout.room);
    let mut wall_cells = Vec::new();

    for pos in layout.room.set_cells() {
        if on_grid_edge(&layout.room, pos) {
            continue;
        }
        if interior.get(pos) {
            layout.border_tiles.clear(pos);
        } else {
            wall_cells.push(pos);
        }
    }

    let mut floor_tiles = TileLayer::new(layout.room.width(), layout.room.height());
    for pos in interior.set_cells() {
        let tile_index = sample_weighted(rng, floor_set);
        floor_tiles.set(pos, tile_index as u16);
    }

    CarvedInterior { interior, floor_tiles, wall_cells }
}

/// Pure eight-neighbor enclosure test. Cells on the grid's outer edge are
/// never interior.
pub(super) fn enclosed_mask(room: &BoolGrid) -> BoolGrid {
    let mut interior = BoolGrid::new(room.width(), room.height());
    for pos in room.set_cells() {
        if on_grid_edge(room, pos) {
            continue;
        }
        let enclosed = neighbors_8(pos).into_iter().all(|neighbor| room.get(neighbor));
        if enclosed {
            interior.set(pos, true);
        }
    }
    interior
}

fn neighbors_8(pos: Pos) -> [Pos; 8] {
    [
        Pos { y: pos.y - 1, x: pos.x - 1 },
        Pos { y: pos.y - 1, x: pos.x },
        Pos { y: pos.y - 1, x: pos.x + 1 },
        Pos { y: pos.y, x: pos.x - 1 },
        Pos { y: pos.y, x: pos.x + 1 },
        Pos { y: pos.y + 1, x: pos.x - 1 },
        Pos { y: pos.y + 1, x: pos.x },
        Pos { y: pos.y + 1, x: pos.x + 1 },
    ]
}

fn on_grid_edge(room: &BoolGrid, pos: Pos) -> bool {
    pos.x == 0
        || pos.y == 0
        || pos.x as usize == room.width() - 1
        || pos.y as usize == room.height() - 1
}
