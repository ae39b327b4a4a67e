use bevy::prelude::*;
use fixedbitset::FixedBitSet;
use std::collections::VecDeque;

use super::search::SearchSpace;
use crate::game::navigation::GridSquare;

/// Breadth-first search: fewest cells, every step weighted the same.
///
/// Cells are marked visited when queued, so each is expanded at most once
/// and neighbours are taken in the fixed compass order.
pub(super) fn find_path_bfs(space: &SearchSpace, max_iterations: usize) -> Vec<GridSquare> {
    let size = space.len();
    let start = space.local_index(space.start);
    let goal = space.local_index(space.destination);

    let mut frontier = VecDeque::new();
    let mut visited = FixedBitSet::with_capacity(size);
    let mut came_from: Vec<Option<usize>> = vec![None; size];

    visited.insert(start);
    frontier.push_back(start);

    let mut iterations = 0;
    while let Some(current) = frontier.pop_front() {
        iterations += 1;
        if iterations > max_iterations {
            error!(
                "[PATHFINDING] BFS exceeded max iterations ({}) from {:?} to {:?}",
                max_iterations, space.start, space.destination
            );
            return Vec::new();
        }

        if current == goal {
            return space.trace_back(&came_from);
        }

        for (next, _) in space.neighbours(space.square_at(current)) {
            let next_index = space.local_index(next);
            if visited.contains(next_index) {
                continue;
            }
            visited.insert(next_index);
            came_from[next_index] = Some(current);
            frontier.push_back(next_index);
        }
    }

    Vec::new()
}
