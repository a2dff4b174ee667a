//! Dense grid primitives shared by layout, carving, placement, and spawns.

use crate::types::Pos;

/// Row-major boolean grid. Backs the room layout, the interior mask, and the
/// two placement masks. Out-of-bounds reads answer `false` so callers can
/// probe neighbors without pre-checking.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BoolGrid {
    width: usize,
    height: usize,
    cells: Vec<bool>,
}

impl BoolGrid {
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height, cells: vec![false; width * height] }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn in_bounds(&self, pos: Pos) -> bool {
        pos.x >= 0 && pos.y >= 0 && (pos.x as usize) < self.width && (pos.y as usize) < self.height
    }

    pub fn get(&self, pos: Pos) -> bool {
        if !self.in_bounds(pos) {
            return false;
        }
        self.cells[self.index(pos)]
    }

    pub fn set(&mut self, pos: Pos, value: bool) {
        debug_assert!(self.in_bounds(pos), "grid write out of bounds: {pos:?}");
        let index = self.index(pos);
        self.cells[index] = value;
    }

    pub fn count_set(&self) -> usize {
        self.cells.iter().filter(|&&cell| cell).count()
    }

    /// All set cells in row-major order.
    pub fn set_cells(&self) -> Vec<Pos> {
        let mut cells = Vec::new();
        for y in 0..self.height {
            for x in 0..self.width {
                let pos = Pos { y: y as i32, x: x as i32 };
                if self.get(pos) {
                    cells.push(pos);
                }
            }
        }
        cells
    }

    pub(super) fn as_bits(&self) -> impl Iterator<Item = bool> + '_ {
        self.cells.iter().copied()
    }

    fn index(&self, pos: Pos) -> usize {
        (pos.y as usize) * self.width + (pos.x as usize)
    }
}

/// Sparse tile layer over the same grid: each cell optionally holds an index
/// into one of the catalog's weighted tile sets.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TileLayer {
    width: usize,
    height: usize,
    cells: Vec<Option<u16>>,
}

impl TileLayer {
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height, cells: vec![None; width * height] }
    }

    pub fn get(&self, pos: Pos) -> Option<u16> {
        if pos.x < 0 || pos.y < 0 {
            return None;
        }
        let x = pos.x as usize;
        let y = pos.y as usize;
        if x >= self.width || y >= self.height {
            return None;
        }
        self.cells[y * self.width + x]
    }

    pub fn set(&mut self, pos: Pos, tile_index: u16) {
        let index = self.index(pos);
        self.cells[index] = Some(tile_index);
    }

    pub fn clear(&mut self, pos: Pos) {
        let index = self.index(pos);
        self.cells[index] = None;
    }

    pub fn filled_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_some()).count()
    }

    pub(super) fn as_cells(&self) -> impl Iterator<Item = Option<u16>> + '_ {
        self.cells.iter().copied()
    }

    fn index(&self, pos: Pos) -> usize {
        debug_assert!(
            pos.x >= 0
                && pos.y >= 0
                && (pos.x as usize) < self.width
                && (pos.y as usize) < self.height,
            "tile layer write out of bounds: {pos:?}"
        );
        (pos.y as usize) * self.width + (pos.x as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_bounds_reads_answer_false() {
        let grid = BoolGrid::new(4, 4);
        assert!(!grid.get(Pos { y: -1, x: 0 }));
        assert!(!grid.get(Pos { y: 0, x: 4 }));
    }

    #[test]
    fn set_cells_are_reported_in_row_major_order() {
        let mut grid = BoolGrid::new(3, 3);
        grid.set(Pos { y: 2, x: 0 }, true);
        grid.set(Pos { y: 0, x: 1 }, true);
        grid.set(Pos { y: 1, x: 2 }, true);
        assert_eq!(
            grid.set_cells(),
            vec![Pos { y: 0, x: 1 }, Pos { y: 1, x: 2 }, Pos { y: 2, x: 0 }]
        );
        assert_eq!(grid.count_set(), 3);
    }

    #[test]
    fn tile_layer_set_clear_round_trip() {
        let mut layer = TileLayer::new(3, 3);
        let pos = Pos { y: 1, x: 1 };
        assert_eq!(layer.get(pos), None);
        layer.set(pos, 2);
        assert_eq!(layer.get(pos), Some(2));
        assert_eq!(layer.filled_count(), 1);
        layer.clear(pos);
        assert_eq!(layer.get(pos), None);
    }
}
