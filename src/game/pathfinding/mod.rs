//! Grid path search over the navigation grid.
//!
//! Two strategies share one search space:
//! - **A\***: best-first by cost plus octile estimate, optionally favouring
//!   the right-hand side of the direct line
//! - **BFS**: FIFO expansion, fewest cells
//!
//! Searches are clipped to a [`PathfindRange`] and only enter cells that are
//! not steep and not occupied by anyone but the mover. Failure is an empty
//! path, never a partial one.
//!
//! [`PathfindRange`]: crate::game::navigation::PathfindRange

mod astar;
mod bfs;
mod pathfinder;
mod search;
mod systems;
mod types;


pub use pathfinder::Pathfinder;
pub use types::{
    AStarHeuristic, MoveableActor, NavigationPath, PathQuery, PathRequest, PathResolved, SearchStrategy,
};

use bevy::prelude::*;

use crate::game::SpatialSet;

pub struct PathfindingPlugin;

impl Plugin for PathfindingPlugin {
    fn build(&self, app: &mut App) {
        app.add_message::<PathRequest>();
        app.add_message::<PathResolved>();
        app.init_resource::<Pathfinder>();

        app.add_systems(FixedUpdate, systems::process_path_requests.in_set(SpatialSet::Pathfinding));
    }
}
