use bevy::diagnostic::FrameCount;
use bevy::prelude::*;
use smallvec::SmallVec;
use wayfarer_macros::profile;

use super::grid::NavigationGrid;
use super::terrain::TerrainMaps;
use super::types::GridSquare;
use crate::game::collision::{Collideable, CollisionIndex, VolumeRemoved};
use crate::game::config::SpatialConfig;
use crate::profile_log;

/// Cells currently held in the grid by a navigation-blocking collideable.
#[derive(Component, Debug, Default, Clone)]
pub struct OccupiedSquares {
    pub squares: SmallVec<[GridSquare; 16]>,
}

/// Keep grid occupancy in step with moving or newly added blockers.
///
/// The blocker's previous cells are released (only those it still holds)
/// and any other blocker still covering them is stamped back in before the
/// blocker's current world box is stamped.
#[profile(4)]
pub fn sync_blocker_occupancy(
    mut commands: Commands,
    mut query: Query<
        (Entity, &Collideable, Option<&mut OccupiedSquares>),
        Or<(Changed<Transform>, Changed<Collideable>)>,
    >,
    index: Res<CollisionIndex>,
    mut grid: ResMut<NavigationGrid>,
    frame: Res<FrameCount>,
) {
    if !grid.is_initialized() {
        return;
    }

    let mut updated = 0;
    for (entity, collideable, occupied) in query.iter_mut() {
        if !index.contains(entity) {
            continue;
        }

        if let Some(previous) = occupied.as_deref() {
            let freed = grid.release_squares(&previous.squares, entity);
            grid.restamp_freed(&freed, &index);
        }

        let volume = index.volume(entity);
        if !collideable.blocks_navigation || !volume.active {
            if occupied.is_some() {
                commands.entity(entity).remove::<OccupiedSquares>();
            }
            continue;
        }

        let squares: SmallVec<[GridSquare; 16]> = grid.occupy_area(&volume.world_box, entity).into();
        match occupied {
            Some(mut existing) => existing.squares = squares,
            None => {
                commands.entity(entity).insert(OccupiedSquares { squares });
            }
        }
        updated += 1;
    }

    profile_log!(frame, "[NAV_GRID] Occupancy synced for {} blockers", updated);
}

/// Follow volumes enabled or disabled through [`CollisionIndex::set_active`].
///
/// A disabled blocker gives up its cells (uncovering anything beneath); an
/// enabled one stamps its current world box again.
pub fn sync_volume_activation(
    mut commands: Commands,
    mut occupied: Query<&mut OccupiedSquares>,
    mut index: ResMut<CollisionIndex>,
    mut grid: ResMut<NavigationGrid>,
) {
    let changes = index.take_activation_changes();
    if changes.is_empty() || !grid.is_initialized() {
        return;
    }

    for entity in changes {
        if !index.contains(entity) {
            continue;
        }
        let volume = index.volume(entity).clone();
        if !volume.blocks_navigation {
            continue;
        }

        if volume.active {
            let squares: SmallVec<[GridSquare; 16]> = grid.occupy_area(&volume.world_box, entity).into();
            match occupied.get_mut(entity) {
                Ok(mut existing) => existing.squares = squares,
                Err(_) => {
                    if let Ok(mut entity_commands) = commands.get_entity(entity) {
                        entity_commands.insert(OccupiedSquares { squares });
                    }
                }
            }
            debug!("[NAV_GRID] Re-stamped enabled blocker {:?}", entity);
        } else {
            let freed = match occupied.get(entity) {
                Ok(previous) => grid.release_squares(&previous.squares, entity),
                Err(_) => grid.release_area(&volume.world_box, entity),
            };
            grid.restamp_freed(&freed, &index);
            if let Ok(mut entity_commands) = commands.get_entity(entity) {
                entity_commands.remove::<OccupiedSquares>();
            }
            debug!("[NAV_GRID] Released {} cells of disabled blocker {:?}", freed.len(), entity);
        }
    }
}

/// Free the cells of blockers whose volumes left the collision index.
pub fn release_removed_blockers(
    mut removed: MessageReader<VolumeRemoved>,
    index: Res<CollisionIndex>,
    mut grid: ResMut<NavigationGrid>,
) {
    for event in removed.read() {
        if !event.blocks_navigation {
            continue;
        }
        let freed = grid.release_area(&event.world_box, event.entity);
        grid.restamp_freed(&freed, &index);
        debug!("[NAV_GRID] Released cells of removed blocker {:?}", event.entity);
    }
}

/// Rebuild terrain data whenever new height/normal maps arrive.
pub fn apply_terrain_maps(
    maps: Res<TerrainMaps>,
    config: Option<Res<SpatialConfig>>,
    index: Res<CollisionIndex>,
    mut grid: ResMut<NavigationGrid>,
) {
    if !grid.is_initialized() {
        warn!("[NAV_GRID] Terrain maps supplied before the grid was initialized");
        return;
    }

    let settings = config.map_or_else(
        || SpatialConfig::default().terrain_settings(),
        |config| config.terrain_settings(),
    );
    grid.populate(&maps.height, &maps.normal, settings, &index);
}
