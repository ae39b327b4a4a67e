use bevy::prelude::*;

use super::astar::{find_path_astar, Heuristic};
use super::bfs::find_path_bfs;
use super::search::SearchSpace;
use super::types::{AStarHeuristic, PathQuery, SearchStrategy};
use crate::game::config::SpatialConfig;
use crate::game::math::FixedNum;
use crate::game::navigation::{GridSquare, NavigationGrid, PathfindRange};

/// Grid path search over the navigation grid's occupancy.
///
/// # Outcomes
///
/// - start and destination in the same cell: empty path
/// - destination reached: every cell center after the start, in order
/// - frontier exhausted or expansion budget spent: empty path
///
/// A blocked destination is passable, but a steep one is not; callers wanting
/// a substitute cell should go through
/// [`NavigationGrid::find_next_best_location`] first.
#[derive(Resource, Clone, Debug)]
pub struct Pathfinder {
    pub favour_right_bias: FixedNum,
    pub max_search_iterations: usize,
    /// Radius, in cells, searched around movers with no bounds of their own.
    pub default_pathfind_bounds: usize,
}

impl Default for Pathfinder {
    fn default() -> Self {
        Self::from_config(&SpatialConfig::default())
    }
}

impl Pathfinder {
    pub fn from_config(config: &SpatialConfig) -> Self {
        Self {
            favour_right_bias: FixedNum::from_num(config.favour_right_bias),
            max_search_iterations: config.max_search_iterations,
            default_pathfind_bounds: config.default_pathfind_bounds,
        }
    }

    /// Path for `query` as world-space waypoints.
    ///
    /// # Panics
    ///
    /// If `grid` has not been initialized.
    pub fn find_path(&self, grid: &NavigationGrid, query: &PathQuery) -> Vec<Vec3> {
        grid.assert_initialized();

        let Some(start) = grid.world_to_grid(query.start) else {
            debug!("[PATHFINDING] Start {:?} is off the grid", query.start);
            return Vec::new();
        };
        let Some(destination) = grid.world_to_grid(query.destination) else {
            debug!("[PATHFINDING] Destination {:?} is off the grid", query.destination);
            return Vec::new();
        };

        self.find_path_squares(grid, start, destination, query.range.as_ref(), query.mover, query.strategy)
            .into_iter()
            .filter_map(|square| grid.grid_to_world(square))
            .collect()
    }

    /// Path between two world points on behalf of `mover`.
    pub fn find_path_between(
        &self,
        grid: &NavigationGrid,
        mover: Option<Entity>,
        start: Vec3,
        destination: Vec3,
        range: Option<PathfindRange>,
        strategy: SearchStrategy,
    ) -> Vec<Vec3> {
        self.find_path(grid, &PathQuery { start, destination, range, mover, strategy })
    }

    /// Path between two cells, as cells. The start cell is not included.
    pub fn find_path_squares(
        &self,
        grid: &NavigationGrid,
        start: GridSquare,
        destination: GridSquare,
        range: Option<&PathfindRange>,
        mover: Option<Entity>,
        strategy: SearchStrategy,
    ) -> Vec<GridSquare> {
        grid.assert_initialized();

        if start == destination {
            return Vec::new();
        }

        let Some(space) = SearchSpace::new(grid, range, mover, start, destination) else {
            debug!(
                "[PATHFINDING] {:?} -> {:?} not searchable within {:?}",
                start, destination, range
            );
            return Vec::new();
        };

        match strategy {
            SearchStrategy::AStar(kind) => {
                let heuristic = Heuristic::new(kind, start, destination, self.favour_right_bias);
                find_path_astar(&space, &heuristic, self.max_search_iterations)
            }
            SearchStrategy::Bfs => find_path_bfs(&space, self.max_search_iterations),
        }
    }

    /// Best-first search between two world points.
    pub fn a_star(
        &self,
        grid: &NavigationGrid,
        start: Vec3,
        destination: Vec3,
        range: Option<PathfindRange>,
        heuristic: AStarHeuristic,
    ) -> Vec<Vec3> {
        self.find_path_between(grid, None, start, destination, range, SearchStrategy::AStar(heuristic))
    }

    /// Breadth-first search between two world points.
    pub fn bfs(&self, grid: &NavigationGrid, start: Vec3, destination: Vec3, range: Option<PathfindRange>) -> Vec<Vec3> {
        self.find_path_between(grid, None, start, destination, range, SearchStrategy::Bfs)
    }
}
