//! Public data model for generated rooms: tile layers, placed props, spawn
//! lookups, and the world-space transform handed to collaborators.

use rand_chacha::ChaCha8Rng;
use rand_chacha::rand_core::RngCore;
use slotmap::SlotMap;
use thiserror::Error;
use xxhash_rust::xxh3::xxh3_64;

use crate::types::{Pos, PropId, Rotation};

use super::grid::{BoolGrid, TileLayer};
use super::props::PlacementFailure;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WorldPoint {
    pub x: f32,
    pub y: f32,
}

/// Grid-to-world mapping shared by all layers of one room. Spawn points are
/// anchored at cell centers.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridTransform {
    pub origin_x: f32,
    pub origin_y: f32,
    pub cell_size: f32,
}

impl Default for GridTransform {
    fn default() -> Self {
        Self { origin_x: 0.0, origin_y: 0.0, cell_size: 1.0 }
    }
}

impl GridTransform {
    pub fn cell_center(&self, pos: Pos) -> WorldPoint {
        WorldPoint {
            x: self.origin_x + (pos.x as f32 + 0.5) * self.cell_size,
            y: self.origin_y + (pos.y as f32 + 0.5) * self.cell_size,
        }
    }

    pub fn world_to_cell(&self, point: WorldPoint) -> Pos {
        Pos {
            y: ((point.y - self.origin_y) / self.cell_size).floor() as i32,
            x: ((point.x - self.origin_x) / self.cell_size).floor() as i32,
        }
    }
}

/// Immutable record of one committed prop: where it sits, how it is turned,
/// and which visual variation was rolled for it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlacedProp {
    pub prop: String,
    pub anchor: Pos,
    pub rotation: Rotation,
    pub width: u32,
    pub height: u32,
    pub variation: usize,
}

impl PlacedProp {
    /// Cells physically covered by the footprint under this record's
    /// rotation, excluding margins.
    pub fn footprint_cells(&self) -> Vec<Pos> {
        let (x0, x1, y0, y1) =
            footprint_bounds(self.anchor, self.width as i32, self.height as i32, self.rotation);
        let mut cells = Vec::with_capacity((self.width * self.height) as usize);
        for x in x0..x1 {
            for y in y0..y1 {
                cells.push(Pos { y, x });
            }
        }
        cells
    }
}

/// Half-open footprint rectangle `[x0, x1) x [y0, y1)` for a prop anchored at
/// `anchor` under `rotation`. The anchor is always a footprint corner; which
/// corner depends on the rotation's scan directions.
pub(super) fn footprint_bounds(
    anchor: Pos,
    width: i32,
    height: i32,
    rotation: Rotation,
) -> (i32, i32, i32, i32) {
    match rotation {
        Rotation::R0 => (anchor.x, anchor.x + width, anchor.y, anchor.y + height),
        Rotation::R90 => (anchor.x - width, anchor.x, anchor.y, anchor.y + height),
        Rotation::R180 => (anchor.x - width, anchor.x, anchor.y - height, anchor.y),
        Rotation::R270 => (anchor.x, anchor.x + width, anchor.y - height, anchor.y),
    }
}

/// Raised by an enemy-spawn query whose window holds no eligible cell. The
/// caller owns the fallback (skip, widen the radius, retry later).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
#[error("no eligible enemy spawn cell within radius {radius} of cell ({x}, {y})")]
pub struct QuerySpaceEmpty {
    pub x: i32,
    pub y: i32,
    pub radius: i32,
}

#[derive(Clone, Debug)]
pub struct GeneratedRoom {
    pub grid_width: usize,
    pub grid_height: usize,
    pub room_width: usize,
    pub room_height: usize,
    pub border_tiles: TileLayer,
    pub floor_tiles: TileLayer,
    /// Non-enclosed room cells; the rendering collaborator instantiates a
    /// physical collider on each.
    pub wall_cells: Vec<Pos>,
    pub interior: BoolGrid,
    /// True where a cell is still free of prop footprints. Read-only after
    /// generation; enemy-spawn queries scan it without mutating.
    pub occupied_free: BoolGrid,
    pub props: SlotMap<PropId, PlacedProp>,
    pub placement_failures: Vec<PlacementFailure>,
    pub player_spawn_cell: Pos,
    pub transform: GridTransform,
}

impl GeneratedRoom {
    /// Outer bounding size of the room in cells, for downstream clamping and
    /// off-screen logic.
    pub fn bounding_size(&self) -> (usize, usize) {
        (self.room_width, self.room_height)
    }

    pub fn player_spawn(&self) -> WorldPoint {
        self.transform.cell_center(self.player_spawn_cell)
    }

    /// Picks a world-space enemy spawn inside the square window
    /// `[center - radius, center + radius)` on both axes: uniformly among
    /// cells still free of footprints, never the player-spawn cell.
    pub fn enemy_spawn(
        &self,
        rng: &mut ChaCha8Rng,
        point: WorldPoint,
        radius: i32,
    ) -> Result<WorldPoint, QuerySpaceEmpty> {
        let center = self.transform.world_to_cell(point);
        let mut candidates = Vec::new();
        for x in center.x - radius..center.x + radius {
            for y in center.y - radius..center.y + radius {
                let pos = Pos { y, x };
                if self.occupied_free.get(pos) && pos != self.player_spawn_cell {
                    candidates.push(pos);
                }
            }
        }
        if candidates.is_empty() {
            return Err(QuerySpaceEmpty { x: center.x, y: center.y, radius });
        }
        let pick = rng.next_u64() as usize % candidates.len();
        Ok(self.transform.cell_center(candidates[pick]))
    }

    /// Stable byte encoding of everything the generator decided. Two rooms
    /// built from the same catalog, seed, and round encode identically.
    pub fn canonical_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::new();
        bytes.extend((self.grid_width as u32).to_le_bytes());
        bytes.extend((self.grid_height as u32).to_le_bytes());
        bytes.extend((self.room_width as u32).to_le_bytes());
        bytes.extend((self.room_height as u32).to_le_bytes());

        for cell in self.border_tiles.as_cells() {
            bytes.extend(encode_tile(cell));
        }
        for cell in self.floor_tiles.as_cells() {
            bytes.extend(encode_tile(cell));
        }
        for bit in self.interior.as_bits() {
            bytes.push(u8::from(bit));
        }
        for bit in self.occupied_free.as_bits() {
            bytes.push(u8::from(bit));
        }

        bytes.extend((self.wall_cells.len() as u32).to_le_bytes());
        for pos in &self.wall_cells {
            bytes.extend(pos.y.to_le_bytes());
            bytes.extend(pos.x.to_le_bytes());
        }

        let mut placed: Vec<&PlacedProp> = self.props.values().collect();
        placed.sort_by_key(|prop| (prop.anchor.y, prop.anchor.x, prop.rotation.code()));
        bytes.extend((placed.len() as u32).to_le_bytes());
        for prop in placed {
            bytes.extend((prop.prop.len() as u32).to_le_bytes());
            bytes.extend(prop.prop.as_bytes());
            bytes.extend(prop.anchor.y.to_le_bytes());
            bytes.extend(prop.anchor.x.to_le_bytes());
            bytes.push(prop.rotation.code());
            bytes.extend(prop.width.to_le_bytes());
            bytes.extend(prop.height.to_le_bytes());
            bytes.extend((prop.variation as u32).to_le_bytes());
        }

        bytes.extend((self.placement_failures.len() as u32).to_le_bytes());
        for failure in &self.placement_failures {
            bytes.extend((failure.prop.len() as u32).to_le_bytes());
            bytes.extend(failure.prop.as_bytes());
        }

        bytes.extend(self.player_spawn_cell.y.to_le_bytes());
        bytes.extend(self.player_spawn_cell.x.to_le_bytes());
        bytes
    }

    pub fn fingerprint(&self) -> u64 {
        xxh3_64(&self.canonical_bytes())
    }
}

fn encode_tile(cell: Option<u16>) -> [u8; 2] {
    match cell {
        None => [0, 0],
        Some(index) => (index + 1).to_le_bytes(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cell_center_round_trips_through_world_to_cell() {
        let transform = GridTransform { origin_x: -4.0, origin_y: 2.5, cell_size: 0.5 };
        for pos in [Pos { y: 0, x: 0 }, Pos { y: 13, x: 7 }, Pos { y: 29, x: 29 }] {
            let world = transform.cell_center(pos);
            assert_eq!(transform.world_to_cell(world), pos);
        }
    }

    #[test]
    fn footprint_bounds_cover_the_four_scan_orientations() {
        let anchor = Pos { y: 10, x: 10 };
        assert_eq!(footprint_bounds(anchor, 2, 3, Rotation::R0), (10, 12, 10, 13));
        assert_eq!(footprint_bounds(anchor, 2, 3, Rotation::R90), (8, 10, 10, 13));
        assert_eq!(footprint_bounds(anchor, 2, 3, Rotation::R180), (8, 10, 7, 10));
        assert_eq!(footprint_bounds(anchor, 2, 3, Rotation::R270), (10, 12, 7, 10));
    }

    #[test]
    fn footprint_cells_match_declared_dimensions() {
        let placed = PlacedProp {
            prop: "prop_test".to_string(),
            anchor: Pos { y: 5, x: 5 },
            rotation: Rotation::R180,
            width: 2,
            height: 3,
            variation: 0,
        };
        let cells = placed.footprint_cells();
        assert_eq!(cells.len(), 6);
        for pos in cells {
            assert!((3..5).contains(&pos.x));
            assert!((2..5).contains(&pos.y));
        }
    }
}
