use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::game::collision::{CollisionIndex, CollisionMatrix};
use crate::game::navigation::{NavigationGrid, TerrainSettings};
use crate::game::pathfinding::Pathfinder;

pub const SPATIAL_CONFIG_PATH: &str = "assets/spatial_config.ron";

/// Spatial settings loaded once at startup.
///
/// Any field missing from the file keeps its default. A resource inserted
/// before startup (tests, embedding apps) wins over the file.
#[derive(Resource, Deserialize, Serialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct SpatialConfig {
    /// Cells per side of the navigation grid.
    pub grid_slices: usize,
    /// World size of one cell.
    pub grid_spacing: f32,
    /// World height of a full-white height map pixel.
    pub max_terrain_height: f32,
    pub max_walkable_slope_degrees: f32,
    /// Radius, in cells, of the range used when a path request names none.
    pub default_pathfind_bounds: usize,
    /// Strength of the A* favour-right tie-break, in cells per cell of
    /// sideways offset.
    pub favour_right_bias: f32,
    /// Node expansions allowed per search before it gives up.
    pub max_search_iterations: usize,
    pub collision_matrix: CollisionMatrix,
}

impl Default for SpatialConfig {
    fn default() -> Self {
        Self {
            grid_slices: 100,
            grid_spacing: 1.0,
            max_terrain_height: 20.0,
            max_walkable_slope_degrees: 40.0,
            default_pathfind_bounds: 50,
            favour_right_bias: 0.1,
            max_search_iterations: 100_000,
            collision_matrix: CollisionMatrix::default(),
        }
    }
}

impl SpatialConfig {
    pub fn from_ron_str(contents: &str) -> ron::error::SpannedResult<Self> {
        ron::from_str::<SpatialConfig>(contents)
    }

    pub fn terrain_settings(&self) -> TerrainSettings {
        TerrainSettings {
            max_height: self.max_terrain_height,
            max_walkable_slope_degrees: self.max_walkable_slope_degrees,
        }
    }

    /// Replace values the grid cannot work with by their defaults, logging
    /// each one.
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();
        if self.grid_slices == 0 {
            error!("[CONFIG] grid_slices must be positive, using {}", defaults.grid_slices);
            self.grid_slices = defaults.grid_slices;
        }
        if !(self.grid_spacing > 0.0) {
            error!("[CONFIG] grid_spacing must be positive, using {}", defaults.grid_spacing);
            self.grid_spacing = defaults.grid_spacing;
        }
        if self.max_search_iterations == 0 {
            error!("[CONFIG] max_search_iterations must be positive, using {}", defaults.max_search_iterations);
            self.max_search_iterations = defaults.max_search_iterations;
        }
        if self.favour_right_bias < 0.0 {
            warn!("[CONFIG] favour_right_bias is negative, clamping to 0");
            self.favour_right_bias = 0.0;
        }
        self
    }
}

pub struct SpatialConfigPlugin;

impl Plugin for SpatialConfigPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, (load_spatial_config, apply_spatial_config).chain());
    }
}

/// Load spatial configuration synchronously at startup.
fn load_spatial_config(mut commands: Commands, existing: Option<Res<SpatialConfig>>) {
    if let Some(config) = existing {
        info!("[CONFIG] Using pre-inserted SpatialConfig");
        commands.insert_resource(config.clone().sanitized());
        return;
    }

    match std::fs::read_to_string(SPATIAL_CONFIG_PATH) {
        Ok(contents) => match SpatialConfig::from_ron_str(&contents) {
            Ok(config) => {
                info!("[CONFIG] Loaded spatial config from {}", SPATIAL_CONFIG_PATH);
                commands.insert_resource(config.sanitized());
            }
            Err(e) => {
                error!("[CONFIG] Failed to parse {}: {}", SPATIAL_CONFIG_PATH, e);
                error!("[CONFIG] Using default SpatialConfig");
                commands.insert_resource(SpatialConfig::default());
            }
        },
        Err(e) => {
            error!("[CONFIG] Failed to read {}: {}", SPATIAL_CONFIG_PATH, e);
            error!("[CONFIG] Using default SpatialConfig");
            commands.insert_resource(SpatialConfig::default());
        }
    }
}

/// Build the grid, collision matrix and pathfinder from the loaded config.
fn apply_spatial_config(
    config: Res<SpatialConfig>,
    mut commands: Commands,
    mut index: ResMut<CollisionIndex>,
) {
    commands.insert_resource(NavigationGrid::new(config.grid_slices, config.grid_spacing));
    index.set_matrix(config.collision_matrix.clone());
    commands.insert_resource(Pathfinder::from_config(&config));

    info!(
        "[CONFIG] Navigation grid {}x{} at spacing {}, {} collision pairs",
        config.grid_slices,
        config.grid_slices,
        config.grid_spacing,
        config.collision_matrix.pairs().len()
    );
}
