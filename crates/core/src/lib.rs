pub mod catalog;
pub mod roomgen;
pub mod types;

pub use catalog::{
    ConfigError, GenerationSettings, Margins, OptionalProp, PropDefinition, RequiredProp,
    RoomCatalog, TileDefinition,
};
pub use roomgen::{
    BoolGrid, GeneratedRoom, GenerationError, GridTransform, PlacedProp, PlacementFailure,
    QuerySpaceEmpty, RoomGenerator, TileLayer, WorldPoint, generate_room,
};
pub use types::*;
