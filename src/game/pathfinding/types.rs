use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::game::math::FixedNum;
use crate::game::navigation::PathfindRange;

/// Heuristic used by the best-first search.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AStarHeuristic {
    /// Octile distance to the destination.
    #[default]
    Default,
    /// Octile distance, discounted for cells on the right-hand side of the
    /// straight start-destination line. Crowds sent around an obstacle then
    /// tend to pass it on the same side.
    FavourRight,
}

/// Expansion order of a search.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SearchStrategy {
    /// Best-first by accumulated cost plus heuristic; diagonal steps cost √2.
    AStar(AStarHeuristic),
    /// Strict FIFO with unit steps; fewest cells rather than shortest length.
    Bfs,
}

impl Default for SearchStrategy {
    fn default() -> Self {
        SearchStrategy::AStar(AStarHeuristic::Default)
    }
}

/// One path search in world space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PathQuery {
    pub start: Vec3,
    pub destination: Vec3,
    /// Cells the search may enter. `None` searches the whole grid.
    pub range: Option<PathfindRange>,
    /// Entity being moved. Cells it occupies itself are passable.
    pub mover: Option<Entity>,
    pub strategy: SearchStrategy,
}

impl PathQuery {
    pub fn new(start: Vec3, destination: Vec3) -> Self {
        Self {
            start,
            destination,
            range: None,
            mover: None,
            strategy: SearchStrategy::default(),
        }
    }

    pub fn with_range(mut self, range: PathfindRange) -> Self {
        self.range = Some(range);
        self
    }

    pub fn with_mover(mut self, mover: Entity) -> Self {
        self.mover = Some(mover);
        self
    }

    pub fn with_strategy(mut self, strategy: SearchStrategy) -> Self {
        self.strategy = strategy;
        self
    }
}

/// Frontier entry of the best-first search.
///
/// `BinaryHeap` is a max-heap, so the ordering is reversed on cost; equal
/// costs fall back to the cell index to keep expansion order deterministic.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub(super) struct State {
    pub cost: FixedNum,
    pub g: FixedNum,
    pub index: usize,
}

impl Ord for State {
    fn cmp(&self, other: &Self) -> Ordering {
        other.cost.cmp(&self.cost)
            .then_with(|| self.g.cmp(&other.g))
            .then_with(|| other.index.cmp(&self.index))
    }
}

impl PartialOrd for State {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Ask for `entity` to be routed to `destination`.
///
/// Answered in [`SpatialSet::Pathfinding`] with a [`PathResolved`] message;
/// a found route is attached as a [`NavigationPath`].
///
/// [`SpatialSet::Pathfinding`]: crate::game::SpatialSet::Pathfinding
#[derive(Message, Debug, Clone)]
pub struct PathRequest {
    pub entity: Entity,
    pub destination: Vec3,
    pub strategy: SearchStrategy,
    /// Swap a blocked or steep destination for the nearest usable cell
    /// before searching. On by default.
    pub resolve_blocked_destination: bool,
}

impl PathRequest {
    pub fn new(entity: Entity, destination: Vec3) -> Self {
        Self {
            entity,
            destination,
            strategy: SearchStrategy::default(),
            resolve_blocked_destination: true,
        }
    }

    pub fn with_strategy(mut self, strategy: SearchStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Search to the exact destination cell, blocked or not.
    pub fn exact(mut self) -> Self {
        self.resolve_blocked_destination = false;
        self
    }
}

#[derive(Message, Debug, Clone, PartialEq)]
pub struct PathResolved {
    pub entity: Entity,
    pub found: bool,
    pub waypoint_count: usize,
}

/// Waypoints for movement logic to follow, in order.
///
/// Holds every cell center after the start, ending at the destination.
#[derive(Component, Debug, Clone, Default, PartialEq)]
pub struct NavigationPath {
    pub waypoints: Vec<Vec3>,
    pub current_index: usize,
}

impl NavigationPath {
    pub fn new(waypoints: Vec<Vec3>) -> Self {
        Self { waypoints, current_index: 0 }
    }

    pub fn current(&self) -> Option<Vec3> {
        self.waypoints.get(self.current_index).copied()
    }

    /// Move on to the next waypoint, returning it.
    pub fn advance(&mut self) -> Option<Vec3> {
        if self.current_index < self.waypoints.len() {
            self.current_index += 1;
        }
        self.current()
    }

    pub fn is_finished(&self) -> bool {
        self.current_index >= self.waypoints.len()
    }

    pub fn destination(&self) -> Option<Vec3> {
        self.waypoints.last().copied()
    }
}

/// Marks an entity that can be routed. `pathfinding_bounds` is the radius,
/// in cells, of the range searched around it.
#[derive(Component, Debug, Clone, Copy)]
pub struct MoveableActor {
    pub pathfinding_bounds: usize,
}

impl Default for MoveableActor {
    fn default() -> Self {
        Self { pathfinding_bounds: 50 }
    }
}
