//! Player spawn selection over the post-placement open-cell set.

use crate::types::Pos;

use super::grid::BoolGrid;
use super::rng::GenRng;

/// Uniform choice among cells still free of prop footprints. `None` only when
/// placement consumed every open cell.
pub(super) fn select_player_spawn(rng: &mut GenRng, occupied: &BoolGrid) -> Option<Pos> {
    let open_cells = occupied.set_cells();
    if open_cells.is_empty() {
        return None;
    }
    Some(open_cells[rng.range_usize(0, open_cells.len() - 1)])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spawn_is_always_one_of_the_open_cells() {
        let mut occupied = BoolGrid::new(8, 8);
        let open = [Pos { y: 1, x: 2 }, Pos { y: 4, x: 4 }, Pos { y: 6, x: 1 }];
        for pos in open {
            occupied.set(pos, true);
        }
        for seed in 0..32 {
            let mut rng = GenRng::from_seed(seed);
            let spawn = select_player_spawn(&mut rng, &occupied).expect("open cells exist");
            assert!(open.contains(&spawn));
        }
    }

    #[test]
    fn fully_consumed_grid_yields_no_spawn() {
        let occupied = BoolGrid::new(8, 8);
        let mut rng = GenRng::from_seed(0);
        assert_eq!(select_player_spawn(&mut rng, &occupied), None);
    }
}
