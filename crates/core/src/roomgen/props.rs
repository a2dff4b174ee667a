//! Prop placement over the carved interior: the mandatory centerpiece, the
//! required pass, the probabilistic optional pass, and the margin- and
//! rotation-aware feasibility scan they all share.

use slotmap::SlotMap;
use thiserror::Error;

use crate::catalog::{ConfigError, PropDefinition, RoomCatalog};
use crate::types::{Pos, PropId, Rotation};

use super::grid::BoolGrid;
use super::model::{PlacedProp, footprint_bounds};
use super::rng::GenRng;

/// A required prop instance that survived the full cell scan unplaced.
/// Reported rather than fatal: generation continues with the partial result.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("required prop '{prop}' could not be placed after a full cell scan")]
pub struct PlacementFailure {
    pub prop: String,
}

pub(super) struct PropPlacement {
    /// True where a cell is still free for prop footprints.
    pub(super) occupied: BoolGrid,
    /// True where a cell is still free for footprints and margins. Shrinks at
    /// least as fast as `occupied`; neither mask ever reopens a cell.
    pub(super) margined: BoolGrid,
    pub(super) placed: SlotMap<PropId, PlacedProp>,
    pub(super) failures: Vec<PlacementFailure>,
}

pub(super) struct ScanCells {
    pub(super) footprint: Vec<Pos>,
    pub(super) margin: Vec<Pos>,
}

pub(super) fn place_props(
    rng: &mut GenRng,
    interior: &BoolGrid,
    catalog: &RoomCatalog,
) -> Result<PropPlacement, ConfigError> {
    let mut placement = PropPlacement {
        occupied: interior.clone(),
        margined: interior.clone(),
        placed: SlotMap::with_key(),
        failures: Vec::new(),
    };

    place_centerpiece(rng, &mut placement, catalog)?;
    run_required_pass(rng, &mut placement, catalog);
    run_optional_pass(rng, &mut placement, catalog);

    Ok(placement)
}

/// The centerpiece sits at the exact grid center with zero rotation. The
/// room's own dimensions are expected to guarantee feasibility, so a miss is
/// a configuration error, not a placement failure.
fn place_centerpiece(
    rng: &mut GenRng,
    placement: &mut PropPlacement,
    catalog: &RoomCatalog,
) -> Result<(), ConfigError> {
    let center = Pos {
        y: (placement.occupied.height() / 2) as i32,
        x: (placement.occupied.width() / 2) as i32,
    };
    let prop = &catalog.centerpiece;
    let Some(cells) = try_fit(&placement.margined, prop, center, Rotation::R0) else {
        return Err(ConfigError::CenterpieceUnplaceable { id: prop.id.clone() });
    };
    commit(placement, &cells);
    record(rng, placement, prop, center, Rotation::R0);
    Ok(())
}

/// Expands required definitions into shuffled instances, walks the shuffled
/// open cells once, and commits the first instance-rotation pair that fits on
/// each cell. Instances left over after the scan are reported; there is no
/// retry or relaxation.
fn run_required_pass(rng: &mut GenRng, placement: &mut PropPlacement, catalog: &RoomCatalog) {
    let mut remaining: Vec<usize> = Vec::new();
    for (index, required) in catalog.required_props.iter().enumerate() {
        for _ in 0..required.quantity {
            remaining.push(index);
        }
    }
    rng.shuffle(&mut remaining);

    let mut open_cells = placement.occupied.set_cells();
    rng.shuffle(&mut open_cells);

    for cell in open_cells {
        if remaining.is_empty() {
            break;
        }
        if !placement.occupied.get(cell) {
            continue;
        }

        let mut placed_slot = None;
        'instances: for (slot, &prop_index) in remaining.iter().enumerate() {
            let prop = &catalog.required_props[prop_index].prop;
            for rotation in rotation_candidates(rng, prop.rotation_enabled) {
                if let Some(cells) = try_fit(&placement.margined, prop, cell, rotation) {
                    commit(placement, &cells);
                    record(rng, placement, prop, cell, rotation);
                    placed_slot = Some(slot);
                    break 'instances;
                }
            }
        }
        if let Some(slot) = placed_slot {
            remaining.remove(slot);
        }
    }

    for prop_index in remaining {
        placement
            .failures
            .push(PlacementFailure { prop: catalog.required_props[prop_index].prop.id.clone() });
    }
}

/// Walks the (now smaller) open-cell set once more. Each cell first rolls the
/// global per-cell gate; one miss ends the cell entirely. A prop commits only
/// when a rotation is feasible and its own probability roll passes; a failed
/// roll lets the remaining rotations re-roll before the next prop is tried.
fn run_optional_pass(rng: &mut GenRng, placement: &mut PropPlacement, catalog: &RoomCatalog) {
    if catalog.optional_props.is_empty() {
        return;
    }

    let mut open_cells = placement.occupied.set_cells();
    rng.shuffle(&mut open_cells);

    let cell_gate = catalog.settings.prop_spawn_probability;
    for cell in open_cells {
        if !placement.occupied.get(cell) {
            continue;
        }
        if rng.roll_percent() > cell_gate {
            continue;
        }

        let mut order: Vec<usize> = (0..catalog.optional_props.len()).collect();
        rng.shuffle(&mut order);

        'props: for prop_index in order {
            let optional = &catalog.optional_props[prop_index];
            for rotation in rotation_candidates(rng, optional.prop.rotation_enabled) {
                let Some(cells) = try_fit(&placement.margined, &optional.prop, cell, rotation)
                else {
                    continue;
                };
                if rng.roll_percent() <= optional.spawn_probability {
                    commit(placement, &cells);
                    record(rng, placement, &optional.prop, cell, rotation);
                    break 'props;
                }
            }
        }
    }
}

/// Enumerates every cell the footprint-plus-margin rectangle covers when
/// anchored at `anchor` under `rotation`. Margins are declared relative to
/// the zero-degree orientation and follow the rotation's scan directions.
pub(super) fn placement_cells(
    prop: &PropDefinition,
    anchor: Pos,
    rotation: Rotation,
) -> ScanCells {
    let width = prop.width as i32;
    let height = prop.height as i32;
    let top = prop.margins.top as i32;
    let bottom = prop.margins.bottom as i32;
    let left = prop.margins.left as i32;
    let right = prop.margins.right as i32;

    let (fx0, fx1, fy0, fy1) = footprint_bounds(anchor, width, height, rotation);
    let (x0, x1, y0, y1) = match rotation {
        Rotation::R0 => (fx0 - left, fx1 + right, fy0 - bottom, fy1 + top),
        Rotation::R90 => (fx0 - top, fx1 + bottom, fy0 - left, fy1 + right),
        Rotation::R180 => (fx0 - right, fx1 + left, fy0 - bottom, fy1 + top),
        Rotation::R270 => (fx0 - bottom, fx1 + top, fy0 - right, fy1 + left),
    };

    let mut footprint = Vec::with_capacity((width * height) as usize);
    let mut margin = Vec::new();
    for x in x0..x1 {
        for y in y0..y1 {
            let pos = Pos { y, x };
            if (fx0..fx1).contains(&x) && (fy0..fy1).contains(&y) {
                footprint.push(pos);
            } else {
                margin.push(pos);
            }
        }
    }
    ScanCells { footprint, margin }
}

/// Feasible iff every enumerated cell is in bounds and still open in the
/// margin mask.
fn try_fit(
    margined: &BoolGrid,
    prop: &PropDefinition,
    anchor: Pos,
    rotation: Rotation,
) -> Option<ScanCells> {
    let cells = placement_cells(prop, anchor, rotation);
    let all_free = cells
        .footprint
        .iter()
        .chain(cells.margin.iter())
        .all(|&pos| margined.in_bounds(pos) && margined.get(pos));
    all_free.then_some(cells)
}

/// Footprint cells close in both masks; margin cells close in the margin mask
/// only. Margin cells are thereby also lost to future footprints, keeping the
/// packing conservative.
fn commit(placement: &mut PropPlacement, cells: &ScanCells) {
    for &pos in &cells.footprint {
        placement.occupied.set(pos, false);
        placement.margined.set(pos, false);
    }
    for &pos in &cells.margin {
        placement.margined.set(pos, false);
    }
}

fn record(
    rng: &mut GenRng,
    placement: &mut PropPlacement,
    prop: &PropDefinition,
    anchor: Pos,
    rotation: Rotation,
) {
    let variation = rng.range_usize(0, prop.variations.len() - 1);
    placement.placed.insert(PlacedProp {
        prop: prop.id.clone(),
        anchor,
        rotation,
        width: prop.width,
        height: prop.height,
        variation,
    });
}

fn rotation_candidates(rng: &mut GenRng, rotation_enabled: bool) -> Vec<Rotation> {
    if rotation_enabled {
        let mut rotations = Rotation::ALL.to_vec();
        rng.shuffle(&mut rotations);
        rotations
    } else {
        vec![Rotation::R0]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{GenerationSettings, Margins, OptionalProp, RequiredProp};

    fn prop(id: &str, width: u32, height: u32, margins: Margins) -> PropDefinition {
        PropDefinition {
            id: id.to_string(),
            width,
            height,
            margins,
            rotation_enabled: false,
            variations: vec![format!("{id}_a"), format!("{id}_b")],
        }
    }

    fn rect_interior(grid_size: usize, x0: i32, y0: i32, w: i32, h: i32) -> BoolGrid {
        let mut interior = BoolGrid::new(grid_size, grid_size);
        for x in x0..x0 + w {
            for y in y0..y0 + h {
                interior.set(Pos { y, x }, true);
            }
        }
        interior
    }

    fn catalog_with(
        required_props: Vec<RequiredProp>,
        optional_props: Vec<OptionalProp>,
        prop_spawn_probability: f64,
    ) -> RoomCatalog {
        let mut catalog = RoomCatalog::default_catalog();
        catalog.centerpiece = prop("prop_center", 1, 1, Margins::default());
        catalog.required_props = required_props;
        catalog.optional_props = optional_props;
        catalog.settings = GenerationSettings { prop_spawn_probability, ..catalog.settings };
        catalog
    }

    #[test]
    fn placement_cells_split_footprint_and_margin_exactly() {
        let definition = prop(
            "prop_counter",
            2,
            1,
            Margins { top: 1, bottom: 2, left: 3, right: 4 },
        );
        let cells = placement_cells(&definition, Pos { y: 10, x: 10 }, Rotation::R0);
        assert_eq!(cells.footprint.len(), 2);
        assert_eq!(cells.margin.len(), (2 + 3 + 4) * (1 + 2 + 1) - 2);
        assert!(cells.footprint.contains(&Pos { y: 10, x: 10 }));
        assert!(cells.footprint.contains(&Pos { y: 10, x: 11 }));
        assert!(cells.margin.contains(&Pos { y: 8, x: 7 }));
        assert!(cells.margin.contains(&Pos { y: 11, x: 15 }));
    }

    #[test]
    fn rotated_scan_swaps_margins_with_the_scan_axes() {
        let definition = prop(
            "prop_counter",
            2,
            1,
            Margins { top: 1, bottom: 2, left: 3, right: 4 },
        );
        let anchor = Pos { y: 10, x: 10 };
        let cells = placement_cells(&definition, anchor, Rotation::R90);
        // x scans left: [x - w - top, x + bottom), y scans up: [y - left, y + h + right).
        for pos in cells.footprint.iter().chain(cells.margin.iter()) {
            assert!((7..12).contains(&pos.x), "unexpected x in {pos:?}");
            assert!((7..15).contains(&pos.y), "unexpected y in {pos:?}");
        }
        assert_eq!(cells.footprint.len(), 2);
        assert_eq!(cells.footprint.iter().filter(|pos| (8..10).contains(&pos.x)).count(), 2);
    }

    #[test]
    fn try_fit_rejects_cells_outside_the_open_mask() {
        let interior = rect_interior(30, 10, 10, 8, 8);
        let definition = prop("prop_table", 2, 2, Margins { top: 1, bottom: 1, left: 1, right: 1 });
        // Anchored at the interior corner the margin ring pokes outside.
        assert!(try_fit(&interior, &definition, Pos { y: 10, x: 10 }, Rotation::R0).is_none());
        assert!(try_fit(&interior, &definition, Pos { y: 12, x: 12 }, Rotation::R0).is_some());
    }

    #[test]
    fn commit_closes_masks_monotonically() {
        let interior = rect_interior(30, 10, 10, 8, 8);
        let mut placement = PropPlacement {
            occupied: interior.clone(),
            margined: interior.clone(),
            placed: SlotMap::with_key(),
            failures: Vec::new(),
        };
        let definition = prop("prop_table", 2, 2, Margins { top: 1, bottom: 1, left: 1, right: 1 });
        let cells =
            try_fit(&placement.margined, &definition, Pos { y: 12, x: 12 }, Rotation::R0).unwrap();
        commit(&mut placement, &cells);

        for pos in &cells.footprint {
            assert!(!placement.occupied.get(*pos));
            assert!(!placement.margined.get(*pos));
        }
        for pos in &cells.margin {
            // Margin cells stay footprint-free in the occupied mask but are
            // closed for any future placement scan.
            assert!(placement.occupied.get(*pos));
            assert!(!placement.margined.get(*pos));
        }
        assert_eq!(placement.occupied.count_set(), 64 - 4);
        assert_eq!(placement.margined.count_set(), 64 - 16);
    }

    #[test]
    fn centerpiece_that_cannot_fit_is_a_config_error() {
        let empty_interior = BoolGrid::new(30, 30);
        let catalog = catalog_with(Vec::new(), Vec::new(), 0.0);
        let mut rng = GenRng::from_seed(1);
        let result = place_props(&mut rng, &empty_interior, &catalog);
        assert!(matches!(result, Err(ConfigError::CenterpieceUnplaceable { .. })));
    }

    #[test]
    fn unplaceable_required_prop_is_reported_while_others_still_place() {
        let interior = rect_interior(30, 10, 10, 8, 8);
        let impossible = RequiredProp {
            prop: prop(
                "prop_too_wide",
                3,
                3,
                Margins { top: 20, bottom: 20, left: 20, right: 20 },
            ),
            quantity: 1,
        };
        let feasible = RequiredProp { prop: prop("prop_can", 1, 1, Margins::default()), quantity: 2 };
        let catalog = catalog_with(vec![impossible, feasible], Vec::new(), 0.0);

        for seed in [3_u64, 17, 404] {
            let mut rng = GenRng::from_seed(seed);
            let placement = place_props(&mut rng, &interior, &catalog).unwrap();

            assert_eq!(placement.failures.len(), 1, "seed {seed}");
            assert_eq!(placement.failures[0].prop, "prop_too_wide");
            let placed_cans = placement
                .placed
                .values()
                .filter(|placed| placed.prop == "prop_can")
                .count();
            assert_eq!(placed_cans, 2, "seed {seed}");
        }
    }

    #[test]
    fn optional_pass_with_zero_cell_gate_places_nothing() {
        let interior = rect_interior(30, 10, 10, 8, 8);
        let optional = OptionalProp {
            prop: prop("prop_chair", 1, 1, Margins::default()),
            spawn_probability: 100.0,
        };
        let catalog = catalog_with(Vec::new(), vec![optional], 0.0);
        let mut rng = GenRng::from_seed(9);
        let placement = place_props(&mut rng, &interior, &catalog).unwrap();
        // Only the centerpiece lands.
        assert_eq!(placement.placed.len(), 1);
    }

    #[test]
    fn optional_pass_with_certain_gates_fills_every_open_cell() {
        let interior = rect_interior(30, 10, 10, 8, 8);
        let optional = OptionalProp {
            prop: prop("prop_chair", 1, 1, Margins::default()),
            spawn_probability: 100.0,
        };
        let catalog = catalog_with(Vec::new(), vec![optional], 100.0);
        let mut rng = GenRng::from_seed(21);
        let placement = place_props(&mut rng, &interior, &catalog).unwrap();

        assert_eq!(placement.occupied.count_set(), 0);
        assert_eq!(placement.placed.len(), 64);
        for placed in placement.placed.values() {
            assert!(placed.variation < 2);
        }
    }

    #[test]
    fn rotation_disabled_props_only_ever_use_zero_degrees() {
        let interior = rect_interior(30, 10, 10, 8, 8);
        let feasible =
            RequiredProp { prop: prop("prop_can", 1, 2, Margins::default()), quantity: 4 };
        let catalog = catalog_with(vec![feasible], Vec::new(), 0.0);
        let mut rng = GenRng::from_seed(31);
        let placement = place_props(&mut rng, &interior, &catalog).unwrap();
        for placed in placement.placed.values() {
            assert_eq!(placed.rotation, Rotation::R0);
        }
    }
}
