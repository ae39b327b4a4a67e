use bevy::diagnostic::FrameCount;
use bevy::prelude::*;
use wayfarer_macros::profile;

use super::pathfinder::Pathfinder;
use super::types::{MoveableActor, NavigationPath, PathRequest, PathResolved};
use crate::game::navigation::NavigationGrid;
use crate::profile_log;

/// Answer this frame's path requests against the current grid.
#[profile(4)]
pub(super) fn process_path_requests(
    mut path_requests: MessageReader<PathRequest>,
    mut resolved: MessageWriter<PathResolved>,
    mut commands: Commands,
    grid: Res<NavigationGrid>,
    pathfinder: Res<Pathfinder>,
    movers: Query<(&Transform, Option<&MoveableActor>)>,
    frame: Res<FrameCount>,
) {
    if path_requests.is_empty() {
        return;
    }

    let start_time = std::time::Instant::now();
    let request_count = path_requests.len();

    if request_count > 10 {
        warn!("[PATHFINDING] High path request count: {} pending requests!", request_count);
    }

    if !grid.is_initialized() {
        warn!("[PATHFINDING] Navigation grid not initialized, dropping {} requests", request_count);
        path_requests.clear();
        return;
    }

    let mut found_count = 0;
    for request in path_requests.read() {
        let waypoints = route(request, &grid, &pathfinder, &movers);
        let found = !waypoints.is_empty();
        let waypoint_count = waypoints.len();

        if let Ok(mut entity) = commands.get_entity(request.entity) {
            if found {
                entity.insert(NavigationPath::new(waypoints));
            } else {
                entity.remove::<NavigationPath>();
            }
        }

        if found {
            found_count += 1;
        }
        resolved.write(PathResolved { entity: request.entity, found, waypoint_count });
    }

    let total_duration = start_time.elapsed();
    if total_duration.as_millis() > 100 {
        warn!("[PATHFINDING] Slow batch processing: {:?} for {} requests", total_duration, request_count);
    }
    profile_log!(frame, "[PATHFINDING] {}/{} requests found a path", found_count, request_count);
}

fn route(
    request: &PathRequest,
    grid: &NavigationGrid,
    pathfinder: &Pathfinder,
    movers: &Query<(&Transform, Option<&MoveableActor>)>,
) -> Vec<Vec3> {
    let Ok((transform, actor)) = movers.get(request.entity) else {
        warn!("[PATHFINDING] Path requested for {:?}, which has no transform", request.entity);
        return Vec::new();
    };
    let start_pos = transform.translation;

    let bounds = actor.map_or(pathfinder.default_pathfind_bounds, |a| a.pathfinding_bounds);
    let Some(range) = grid.grid_range_around(start_pos, bounds) else {
        warn!("[PATHFINDING] {:?} at {:?} is off the navigation grid", request.entity, start_pos);
        return Vec::new();
    };
    let (Some(start), Some(mut destination)) = (grid.world_to_grid(start_pos), grid.world_to_grid(request.destination)) else {
        warn!("[PATHFINDING] Destination {:?} is off the navigation grid", request.destination);
        return Vec::new();
    };

    if request.resolve_blocked_destination {
        destination = grid.find_next_best_location_for(start, destination, Some(&range), Some(request.entity), None);
    }

    pathfinder
        .find_path_squares(grid, start, destination, Some(&range), Some(request.entity), request.strategy)
        .into_iter()
        .filter_map(|square| grid.grid_to_world(square))
        .collect()
}
