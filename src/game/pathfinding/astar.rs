use bevy::prelude::*;
use fixedbitset::FixedBitSet;
use std::collections::BinaryHeap;

use super::search::SearchSpace;
use super::types::{AStarHeuristic, State};
use crate::game::math::{diagonal_step, octile_distance, orthogonal_step, FixedNum};
use crate::game::navigation::GridSquare;

/// Heuristic estimate for one search.
pub(super) struct Heuristic {
    kind: AStarHeuristic,
    start: GridSquare,
    goal: GridSquare,
    /// `bias / |goal - start|`, precomputed once per search.
    side_factor: FixedNum,
}

impl Heuristic {
    pub fn new(kind: AStarHeuristic, start: GridSquare, goal: GridSquare, bias: FixedNum) -> Self {
        let d_row = goal.row as f64 - start.row as f64;
        let d_col = goal.col as f64 - start.col as f64;
        let length = (d_row * d_row + d_col * d_col).sqrt();
        let side_factor = if length > 0.0 {
            bias * FixedNum::from_num(1.0 / length)
        } else {
            FixedNum::ZERO
        };
        Self { kind, start, goal, side_factor }
    }

    /// Octile distance to the goal, never more.
    ///
    /// For `FavourRight` the estimate shrinks in proportion to how far the
    /// cell lies to the right of the start-goal line (clockwise, with X east
    /// and Z north), so those cells are expanded first among near-equals.
    pub fn estimate(&self, square: GridSquare) -> FixedNum {
        let base = octile_distance(square.row.abs_diff(self.goal.row), square.col.abs_diff(self.goal.col));
        match self.kind {
            AStarHeuristic::Default => base,
            AStarHeuristic::FavourRight => {
                let d_row = self.goal.row as i64 - self.start.row as i64;
                let d_col = self.goal.col as i64 - self.start.col as i64;
                let v_row = square.row as i64 - self.start.row as i64;
                let v_col = square.col as i64 - self.start.col as i64;
                let right = d_row * v_col - d_col * v_row;
                if right <= 0 {
                    return base;
                }
                let discount = FixedNum::from_num(right) * self.side_factor;
                (base - discount).max(FixedNum::ZERO)
            }
        }
    }
}

/// Best-first search from `space.start` to `space.destination`.
///
/// Returns the cells after the start, or an empty list when the frontier
/// empties or the expansion budget runs out. A cell is only re-expanded
/// when reached again at strictly lower cost.
pub(super) fn find_path_astar(
    space: &SearchSpace,
    heuristic: &Heuristic,
    max_iterations: usize,
) -> Vec<GridSquare> {
    let size = space.len();
    let start = space.local_index(space.start);
    let goal = space.local_index(space.destination);

    let mut open_set = BinaryHeap::new();
    let mut closed = FixedBitSet::with_capacity(size);
    let mut g_score = vec![FixedNum::MAX; size];
    let mut came_from: Vec<Option<usize>> = vec![None; size];

    g_score[start] = FixedNum::ZERO;
    open_set.push(State { cost: heuristic.estimate(space.start), g: FixedNum::ZERO, index: start });

    let mut iterations = 0;
    while let Some(State { g, index: current, .. }) = open_set.pop() {
        if closed.contains(current) || g > g_score[current] {
            continue;
        }

        iterations += 1;
        if iterations > max_iterations {
            error!(
                "[PATHFINDING] A* exceeded max iterations ({}) from {:?} to {:?}",
                max_iterations, space.start, space.destination
            );
            return Vec::new();
        }

        if current == goal {
            if iterations > 1000 {
                warn!("[PATHFINDING] A* used {} iterations (high!)", iterations);
            }
            return space.trace_back(&came_from);
        }
        closed.insert(current);

        let square = space.square_at(current);
        for (next, dir) in space.neighbours(square) {
            let step = if dir.is_diagonal() { diagonal_step() } else { orthogonal_step() };
            let tentative = g + step;
            let next_index = space.local_index(next);

            if tentative < g_score[next_index] {
                came_from[next_index] = Some(current);
                g_score[next_index] = tentative;
                closed.set(next_index, false);
                open_set.push(State {
                    cost: tentative + heuristic.estimate(next),
                    g: tentative,
                    index: next_index,
                });
            }
        }
    }

    Vec::new()
}
