//! Static room content: weighted tile sets, prop definitions, and the
//! generation settings consumed by every round. Validated once at startup,
//! never per generation.

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod keys {
    pub const BORDER_BRICK: &str = "border_brick";
    pub const BORDER_CRACKED_BRICK: &str = "border_cracked_brick";
    pub const BORDER_MOSSY_BRICK: &str = "border_mossy_brick";

    pub const FLOOR_TILE: &str = "floor_tile";
    pub const FLOOR_SCUFFED_TILE: &str = "floor_scuffed_tile";
    pub const FLOOR_STAINED_TILE: &str = "floor_stained_tile";
    pub const FLOOR_DRAIN: &str = "floor_drain";

    pub const PROP_LUNCH_COUNTER: &str = "prop_lunch_counter";
    pub const PROP_TRASH_CAN: &str = "prop_trash_can";
    pub const PROP_CAFETERIA_TABLE: &str = "prop_cafeteria_table";
    pub const PROP_CHAIR: &str = "prop_chair";
    pub const PROP_CRATE: &str = "prop_crate";
    pub const PROP_MOP_BUCKET: &str = "prop_mop_bucket";
    pub const PROP_VENDING_MACHINE: &str = "prop_vending_machine";
}

/// A tile id paired with its share of a weighted set. Each set's shares must
/// sum to exactly 100.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TileDefinition {
    pub id: String,
    pub spawn_probability: f64,
}

/// Free-cell buffer required around a prop footprint, expressed relative to
/// the prop's zero-degree orientation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Margins {
    pub top: u32,
    pub bottom: u32,
    pub left: u32,
    pub right: u32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PropDefinition {
    pub id: String,
    pub width: u32,
    pub height: u32,
    #[serde(default)]
    pub margins: Margins,
    #[serde(default)]
    pub rotation_enabled: bool,
    pub variations: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RequiredProp {
    pub prop: PropDefinition,
    pub quantity: u32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OptionalProp {
    pub prop: PropDefinition,
    pub spawn_probability: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GenerationSettings {
    pub base_width: u32,
    pub base_height: u32,
    pub round_size_increment: u32,
    pub expansions_enabled: bool,
    pub expansion_count: u32,
    pub min_expansion_width: u32,
    pub min_expansion_height: u32,
    /// Per-cell gate for the optional pass: the chance that any optional prop
    /// is even considered for a given open cell.
    pub prop_spawn_probability: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RoomCatalog {
    pub settings: GenerationSettings,
    pub border_tiles: Vec<TileDefinition>,
    pub floor_tiles: Vec<TileDefinition>,
    pub centerpiece: PropDefinition,
    pub required_props: Vec<RequiredProp>,
    pub optional_props: Vec<OptionalProp>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("base room dimensions must both be at least 4, got {width}x{height}")]
    RoomTooSmall { width: u32, height: u32 },
    #[error("{set} tile set is empty")]
    EmptyTileSet { set: &'static str },
    #[error("{set} probabilities sum to {total}, expected exactly 100")]
    ProbabilitySum { set: &'static str, total: f64 },
    #[error(
        "minimum expansion {axis} {minimum} leaves no valid anchor for a room {axis} of {room}"
    )]
    ExpansionBounds { axis: &'static str, minimum: u32, room: u32 },
    #[error("minimum expansion dimensions must both be at least 4, got {width}x{height}")]
    ExpansionTooSmall { width: u32, height: u32 },
    #[error("prop '{id}' has a zero-sized footprint")]
    ZeroSizedProp { id: String },
    #[error("prop '{id}' has no variations to choose from")]
    NoVariations { id: String },
    #[error("per-cell optional spawn probability {value} is outside [0, 100]")]
    CellGateOutOfRange { value: f64 },
    #[error("centerpiece '{id}' cannot be placed at the room center")]
    CenterpieceUnplaceable { id: String },
}

const PROBABILITY_SUM_TOLERANCE: f64 = 1e-9;

impl RoomCatalog {
    /// Checks every invariant that does not depend on a particular round or
    /// seed. Run once against static configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let settings = &self.settings;
        if settings.base_width < 4 || settings.base_height < 4 {
            return Err(ConfigError::RoomTooSmall {
                width: settings.base_width,
                height: settings.base_height,
            });
        }
        if settings.expansions_enabled
            && (settings.min_expansion_width < 4 || settings.min_expansion_height < 4)
        {
            return Err(ConfigError::ExpansionTooSmall {
                width: settings.min_expansion_width,
                height: settings.min_expansion_height,
            });
        }
        if !(0.0..=100.0).contains(&settings.prop_spawn_probability) {
            return Err(ConfigError::CellGateOutOfRange {
                value: settings.prop_spawn_probability,
            });
        }

        validate_weighted_set("border", &self.border_tiles)?;
        validate_weighted_set("floor", &self.floor_tiles)?;
        if !self.optional_props.is_empty() {
            let total: f64 = self.optional_props.iter().map(|prop| prop.spawn_probability).sum();
            if (total - 100.0).abs() > PROBABILITY_SUM_TOLERANCE {
                return Err(ConfigError::ProbabilitySum { set: "optional prop", total });
            }
        }

        validate_prop(&self.centerpiece)?;
        for required in &self.required_props {
            validate_prop(&required.prop)?;
        }
        for optional in &self.optional_props {
            validate_prop(&optional.prop)?;
        }

        Ok(())
    }

    pub fn prop_definition(&self, id: &str) -> Option<&PropDefinition> {
        if self.centerpiece.id == id {
            return Some(&self.centerpiece);
        }
        self.required_props
            .iter()
            .map(|required| &required.prop)
            .chain(self.optional_props.iter().map(|optional| &optional.prop))
            .find(|prop| prop.id == id)
    }

    /// Built-in catalog used by the CLI tools and tests when no external
    /// catalog file is supplied.
    pub fn default_catalog() -> Self {
        RoomCatalog {
            settings: GenerationSettings {
                base_width: 12,
                base_height: 12,
                round_size_increment: 2,
                expansions_enabled: true,
                expansion_count: 3,
                min_expansion_width: 4,
                min_expansion_height: 4,
                prop_spawn_probability: 12.0,
            },
            border_tiles: vec![
                tile(keys::BORDER_BRICK, 70.0),
                tile(keys::BORDER_CRACKED_BRICK, 20.0),
                tile(keys::BORDER_MOSSY_BRICK, 10.0),
            ],
            floor_tiles: vec![
                tile(keys::FLOOR_TILE, 55.0),
                tile(keys::FLOOR_SCUFFED_TILE, 25.0),
                tile(keys::FLOOR_STAINED_TILE, 15.0),
                tile(keys::FLOOR_DRAIN, 5.0),
            ],
            centerpiece: PropDefinition {
                id: keys::PROP_LUNCH_COUNTER.to_string(),
                width: 2,
                height: 1,
                margins: Margins { top: 1, bottom: 1, left: 1, right: 1 },
                rotation_enabled: false,
                variations: vec!["counter_long".to_string(), "counter_bent".to_string()],
            },
            required_props: vec![
                RequiredProp {
                    prop: PropDefinition {
                        id: keys::PROP_TRASH_CAN.to_string(),
                        width: 1,
                        height: 1,
                        margins: Margins { top: 1, bottom: 1, left: 1, right: 1 },
                        rotation_enabled: false,
                        variations: vec!["trash_green".to_string(), "trash_dented".to_string()],
                    },
                    quantity: 3,
                },
                RequiredProp {
                    prop: PropDefinition {
                        id: keys::PROP_CAFETERIA_TABLE.to_string(),
                        width: 2,
                        height: 2,
                        margins: Margins { top: 1, bottom: 1, left: 1, right: 1 },
                        rotation_enabled: true,
                        variations: vec!["table_round".to_string(), "table_square".to_string()],
                    },
                    quantity: 2,
                },
            ],
            optional_props: vec![
                OptionalProp {
                    prop: PropDefinition {
                        id: keys::PROP_CHAIR.to_string(),
                        width: 1,
                        height: 1,
                        margins: Margins::default(),
                        rotation_enabled: true,
                        variations: vec!["chair_plastic".to_string(), "chair_broken".to_string()],
                    },
                    spawn_probability: 40.0,
                },
                OptionalProp {
                    prop: PropDefinition {
                        id: keys::PROP_CRATE.to_string(),
                        width: 1,
                        height: 1,
                        margins: Margins::default(),
                        rotation_enabled: false,
                        variations: vec!["crate_wood".to_string()],
                    },
                    spawn_probability: 25.0,
                },
                OptionalProp {
                    prop: PropDefinition {
                        id: keys::PROP_MOP_BUCKET.to_string(),
                        width: 1,
                        height: 1,
                        margins: Margins::default(),
                        rotation_enabled: false,
                        variations: vec!["bucket_full".to_string(), "bucket_tipped".to_string()],
                    },
                    spawn_probability: 20.0,
                },
                OptionalProp {
                    prop: PropDefinition {
                        id: keys::PROP_VENDING_MACHINE.to_string(),
                        width: 1,
                        height: 2,
                        margins: Margins { top: 0, bottom: 1, left: 0, right: 0 },
                        rotation_enabled: true,
                        variations: vec!["vending_soda".to_string(), "vending_snack".to_string()],
                    },
                    spawn_probability: 15.0,
                },
            ],
        }
    }
}

fn validate_weighted_set(set: &'static str, tiles: &[TileDefinition]) -> Result<(), ConfigError> {
    if tiles.is_empty() {
        return Err(ConfigError::EmptyTileSet { set });
    }
    let total: f64 = tiles.iter().map(|tile| tile.spawn_probability).sum();
    if (total - 100.0).abs() > PROBABILITY_SUM_TOLERANCE {
        return Err(ConfigError::ProbabilitySum { set, total });
    }
    Ok(())
}

fn validate_prop(prop: &PropDefinition) -> Result<(), ConfigError> {
    if prop.width == 0 || prop.height == 0 {
        return Err(ConfigError::ZeroSizedProp { id: prop.id.clone() });
    }
    if prop.variations.is_empty() {
        return Err(ConfigError::NoVariations { id: prop.id.clone() });
    }
    Ok(())
}

fn tile(id: &str, spawn_probability: f64) -> TileDefinition {
    TileDefinition { id: id.to_string(), spawn_probability }
}
