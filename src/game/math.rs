//! Fixed-point cost arithmetic for grid searches.
//!
//! Search frontiers are ordered by accumulated cost. Floats have no total
//! order and drift between platforms, so path costs are kept in fixed point
//! while world-space geometry stays in `f32`.

use fixed::types::I48F16;

/// Fixed-point number used for all pathfinding costs.
///
/// I48F16: 48 integer bits, 16 fractional bits (~0.000015 precision).
pub type FixedNum = I48F16;

/// Cost of one orthogonal step between neighbouring cells.
#[inline]
pub fn orthogonal_step() -> FixedNum {
    FixedNum::ONE
}

/// Cost of one diagonal step (√2 × orthogonal).
#[inline]
pub fn diagonal_step() -> FixedNum {
    FixedNum::from_num(std::f64::consts::SQRT_2)
}

/// Octile distance between two cell offsets: the exact length of the
/// shortest 8-connected route on an empty grid.
pub fn octile_distance(d_row: usize, d_col: usize) -> FixedNum {
    let (long, short) = if d_row > d_col { (d_row, d_col) } else { (d_col, d_row) };
    FixedNum::from_num(long - short) * orthogonal_step() + FixedNum::from_num(short) * diagonal_step()
}
