//! Navigation grid: a square lattice of walkable cells over the terrain.
//!
//! This module handles:
//! - **types**: cell coordinates, query ranges and the fixed compass order
//! - **grid**: the `NavigationGrid` resource and world/grid conversion
//! - **terrain**: per-cell height, normal and steepness from terrain maps
//! - **occupancy**: marking and querying cells held by blocking entities
//! - **query**: nearest usable cell and grid ray casts
//! - **systems**: keeping occupancy in step with moving blockers
//!
//! Rows follow world Z and columns world X. Heights come from the terrain;
//! the grid itself is flat in XZ.

use bevy::prelude::*;

use crate::game::SpatialSet;

mod grid;
mod occupancy;
mod query;
mod systems;
mod terrain;
mod types;

#[cfg(test)]
mod tests;

pub use grid::{NavigationGrid, NavigationGridSquare};
pub use systems::OccupiedSquares;
pub use terrain::{HeightMap, NormalMap, TerrainMaps, TerrainSettings};
pub use types::{Direction, GridSquare, PathfindRange};

pub struct NavigationPlugin;

impl Plugin for NavigationPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<NavigationGrid>();

        app.add_systems(FixedUpdate, (
            systems::apply_terrain_maps.run_if(resource_exists_and_changed::<TerrainMaps>),
            systems::release_removed_blockers,
            systems::sync_volume_activation,
            systems::sync_blocker_occupancy,
        ).chain().in_set(SpatialSet::Occupancy));
    }
}
