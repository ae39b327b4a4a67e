use bevy::prelude::*;
use rustc_hash::FxHashMap;

use super::*;
use crate::game::collision::{BoundingBox, CollisionIndex, CollisionLayer, CollisionMatrix};

fn entity(n: u64) -> Entity {
    Entity::from_bits(n)
}

/// `slices`×`slices` grid of unit cells with cell (0, 0) at the world origin.
fn unit_grid(slices: usize) -> NavigationGrid {
    NavigationGrid::with_origin(slices, 1.0, Vec2::ZERO)
}

/// Box covering exactly the cells `(row, col)` to `(row + rows - 1, col + cols - 1)`.
fn cell_box(row: usize, col: usize, rows: usize, cols: usize) -> BoundingBox {
    BoundingBox::new(
        Vec3::new(col as f32, 0.0, row as f32),
        Vec3::new((col + cols) as f32, 2.0, (row + rows) as f32),
    )
}

fn occupy(grid: &mut NavigationGrid, row: usize, col: usize, occupant: Entity) {
    grid.mark_area(&cell_box(row, col, 1, 1), true, Some(occupant));
}

// ============================================================================
// Coordinate mapping
// ============================================================================

#[test]
fn test_world_grid_round_trip_stays_within_one_cell() {
    let grid = NavigationGrid::new(40, 0.5);
    let extent = 40.0 * 0.5 * 0.5;
    let mut rng = fastrand::Rng::with_seed(7);

    for _ in 0..500 {
        let p = Vec3::new(
            (rng.f32() * 2.0 - 1.0) * extent * 0.999,
            rng.f32() * 5.0,
            (rng.f32() * 2.0 - 1.0) * extent * 0.999,
        );
        let square = grid.world_to_grid(p).expect("point inside the grid");
        let center = grid.grid_to_world(square).unwrap();

        assert!((center.x - p.x).abs() <= grid.spacing(), "x drift at {:?}", p);
        assert!((center.z - p.z).abs() <= grid.spacing(), "z drift at {:?}", p);
    }
}

#[test]
fn test_new_grid_is_centred_on_origin() {
    let grid = NavigationGrid::new(10, 2.0);
    assert_eq!(grid.origin(), Vec2::new(-10.0, -10.0));
    assert_eq!(grid.world_to_grid(Vec3::ZERO), Some(GridSquare::new(5, 5)));
    assert_eq!(grid.grid_to_world(GridSquare::new(5, 5)), Some(Vec3::new(1.0, 0.0, 1.0)));
}

#[test]
fn test_rows_follow_z_and_cols_follow_x() {
    let grid = unit_grid(8);
    assert_eq!(grid.world_to_grid(Vec3::new(6.2, 0.0, 1.7)), Some(GridSquare::new(1, 6)));
}

#[test]
fn test_out_of_bounds_points_do_not_map() {
    let grid = unit_grid(5);
    assert_eq!(grid.world_to_grid(Vec3::new(-0.1, 0.0, 2.0)), None);
    assert_eq!(grid.world_to_grid(Vec3::new(2.0, 0.0, 5.0)), None);
    assert_eq!(grid.world_to_grid(Vec3::new(5.0, 0.0, 0.0)), None);
    assert_eq!(grid.grid_to_world(GridSquare::new(5, 0)), None);
}

#[test]
fn test_uninitialized_grid_maps_nothing() {
    let grid = NavigationGrid::default();
    assert!(!grid.is_initialized());
    assert_eq!(grid.world_to_grid(Vec3::ZERO), None);
}

#[test]
#[should_panic(expected = "queried before initialization")]
fn test_full_range_on_uninitialized_grid_panics() {
    let _ = NavigationGrid::default().full_range();
}

// ============================================================================
// Occupancy
// ============================================================================

#[test]
fn test_mark_area_covers_exactly_the_overlapped_cells() {
    let mut rng = fastrand::Rng::with_seed(42);
    let occupant = entity(9);

    for _ in 0..50 {
        let mut grid = unit_grid(16);
        let min = Vec3::new(rng.f32() * 14.0, 0.0, rng.f32() * 14.0);
        let size = Vec3::new(0.1 + rng.f32() * 4.0, 1.0, 0.1 + rng.f32() * 4.0);
        let bounds = BoundingBox::new(min, min + size);

        grid.mark_area(&bounds, true, Some(occupant));

        for cell in grid.squares() {
            let x0 = cell.grid_pos.col as f32;
            let z0 = cell.grid_pos.row as f32;
            let overlaps = bounds.min.x < x0 + 1.0 && bounds.max.x > x0
                && bounds.min.z < z0 + 1.0 && bounds.max.z > z0;
            assert_eq!(cell.occupied, overlaps, "cell {:?} for {:?}", cell.grid_pos, bounds);
            assert_eq!(cell.occupant, overlaps.then_some(occupant));
        }

        grid.mark_area(&bounds, false, None);
        assert!(grid.squares().all(|cell| !cell.occupied && cell.occupant.is_none()));
    }
}

#[test]
fn test_box_on_cell_boundary_does_not_spill() {
    let mut grid = unit_grid(5);
    grid.mark_area(&cell_box(2, 2, 1, 1), true, Some(entity(1)));

    let occupied: Vec<GridSquare> = grid.squares().filter(|c| c.occupied).map(|c| c.grid_pos).collect();
    assert_eq!(occupied, vec![GridSquare::new(2, 2)]);
}

#[test]
fn test_mark_area_clips_to_grid() {
    let mut grid = unit_grid(4);
    let bounds = BoundingBox::new(Vec3::new(-3.0, 0.0, -3.0), Vec3::new(1.5, 1.0, 0.5));
    grid.mark_area(&bounds, true, None);

    assert!(grid.is_occupied(GridSquare::new(0, 0)));
    assert!(grid.is_occupied(GridSquare::new(0, 1)));
    assert_eq!(grid.squares().filter(|c| c.occupied).count(), 2);

    let far = BoundingBox::new(Vec3::new(10.0, 0.0, 10.0), Vec3::new(12.0, 1.0, 12.0));
    grid.mark_area(&far, true, None);
    assert_eq!(grid.squares().filter(|c| c.occupied).count(), 2);
}

#[test]
fn test_release_only_touches_own_cells() {
    let mut grid = unit_grid(6);
    let a = entity(1);
    let b = entity(2);

    let a_cells = grid.occupy_area(&cell_box(1, 1, 2, 2), a);
    occupy(&mut grid, 2, 2, b); // b now holds one of a's cells
    grid.release_squares(&a_cells, a);

    assert_eq!(grid.occupant_of(GridSquare::new(2, 2)), Some(b));
    assert!(!grid.is_occupied(GridSquare::new(1, 1)));
    assert_eq!(grid.squares().filter(|c| c.occupied).count(), 1);
}

#[test]
fn test_released_cells_fall_back_to_blocker_underneath() {
    let mut grid = unit_grid(6);
    let mut index = CollisionIndex::new(CollisionMatrix::default());
    let wall = entity(1);
    let npc = entity(2);

    index.register(wall, cell_box(2, 0, 1, 6), CollisionLayer::Building, true, &Transform::IDENTITY);
    index.register(npc, cell_box(2, 2, 1, 1), CollisionLayer::Npc, true, &Transform::IDENTITY);
    grid.occupy_area(&index.world_box(wall), wall);
    let npc_cells = grid.occupy_area(&index.world_box(npc), npc);
    assert_eq!(grid.occupant_of(GridSquare::new(2, 2)), Some(npc));

    // The npc steps off the wall, three rows north.
    index.update_world_box(npc, &Transform::from_xyz(0.0, 0.0, 3.0));
    let freed = grid.release_squares(&npc_cells, npc);
    assert_eq!(freed, vec![GridSquare::new(2, 2)]);
    assert_eq!(grid.restamp_freed(&freed, &index), 1);

    for col in 0..6 {
        assert_eq!(grid.occupant_of(GridSquare::new(2, col)), Some(wall), "col {}", col);
    }
}

#[test]
fn test_restamp_ignores_inactive_and_non_blocking_volumes() {
    let mut grid = unit_grid(6);
    let mut index = CollisionIndex::new(CollisionMatrix::default());
    let disabled = entity(1);
    let decoration = entity(2);
    let npc = entity(3);

    index.register(disabled, cell_box(1, 1, 2, 2), CollisionLayer::Building, true, &Transform::IDENTITY);
    index.register(decoration, cell_box(1, 1, 2, 2), CollisionLayer::Item, false, &Transform::IDENTITY);
    index.set_active(disabled, false);

    let cells = grid.occupy_area(&cell_box(1, 1, 2, 2), npc);
    let freed = grid.release_squares(&cells, npc);
    assert_eq!(freed.len(), 4);
    assert_eq!(grid.restamp_freed(&freed, &index), 0);
    assert!(grid.squares().all(|c| !c.occupied));
}

#[test]
fn test_release_occupant_sweeps_whole_grid() {
    let mut grid = unit_grid(6);
    let a = entity(1);
    occupy(&mut grid, 0, 0, a);
    occupy(&mut grid, 5, 5, a);
    occupy(&mut grid, 3, 3, entity(2));

    assert_eq!(grid.release_occupant(a), 2);
    assert!(!grid.is_occupied(GridSquare::new(0, 0)));
    assert!(grid.is_occupied(GridSquare::new(3, 3)));
}

#[test]
fn test_mark_squares_and_point_queries() {
    let mut grid = unit_grid(4);
    let e = entity(3);
    grid.mark_squares(&[GridSquare::new(1, 2), GridSquare::new(3, 3), GridSquare::new(9, 9)], true, Some(e));

    assert!(grid.is_point_occupied(Vec3::new(2.5, 0.0, 1.5)));
    assert_eq!(grid.point_occupant(Vec3::new(3.1, 0.0, 3.9)), Some(e));
    assert!(!grid.is_point_occupied(Vec3::new(0.5, 0.0, 0.5)));
}

#[test]
fn test_area_queries() {
    let mut grid = unit_grid(8);
    let mover = entity(1);
    let other = entity(2);
    let footprint = BoundingBox::new(Vec3::splat(-1.5), Vec3::splat(1.5)); // 3×3 cells

    assert!(grid.is_area_unoccupied(GridSquare::new(4, 4), &footprint, None));
    // Hanging off the grid edge never fits.
    assert!(!grid.is_area_unoccupied(GridSquare::new(0, 4), &footprint, None));

    grid.mark_area(&cell_box(3, 3, 3, 3), true, Some(mover));
    assert!(!grid.is_area_unoccupied(GridSquare::new(4, 4), &footprint, None));
    assert!(grid.is_area_unoccupied(GridSquare::new(4, 4), &footprint, Some(mover)));
    assert!(grid.is_area_occupied_only_by(mover, GridSquare::new(4, 4), &footprint));

    occupy(&mut grid, 5, 5, other);
    assert!(!grid.is_area_occupied_only_by(mover, GridSquare::new(4, 4), &footprint));
    assert_eq!(grid.area_occupant(GridSquare::new(4, 4), &footprint), Some(mover));
    assert_eq!(grid.area_occupant(GridSquare::new(1, 1), &footprint), None);
}

#[test]
fn test_is_valid_move() {
    let mut grid = unit_grid(8);
    let mover = entity(1);
    occupy(&mut grid, 2, 2, mover);
    occupy(&mut grid, 2, 3, entity(2));
    let range = PathfindRange::new(GridSquare::new(0, 0), GridSquare::new(4, 4));

    assert!(grid.is_valid_move(Vec3::new(2.5, 0.0, 2.5), Some(mover), Some(&range)));
    assert!(!grid.is_valid_move(Vec3::new(2.5, 0.0, 2.5), None, Some(&range)));
    assert!(!grid.is_valid_move(Vec3::new(3.5, 0.0, 2.5), Some(mover), Some(&range)));
    assert!(!grid.is_valid_move(Vec3::new(6.5, 0.0, 6.5), Some(mover), Some(&range)));
    assert!(grid.is_valid_move(Vec3::new(6.5, 0.0, 6.5), Some(mover), None));
}

// ============================================================================
// Terrain
// ============================================================================

#[test]
fn test_raster_constructors_check_dimensions() {
    assert!(HeightMap::from_luma8(2, 2, &[0, 1, 2]).is_none());
    assert!(NormalMap::from_rgb8(2, 1, &[0; 5]).is_none());
    assert!(HeightMap::from_luma8(0, 0, &[]).is_none());

    let normals = NormalMap::from_rgb8(1, 1, &[128, 255, 128]).unwrap();
    let n = normals.sample(0, 0);
    assert!((n.length() - 1.0).abs() < 1e-5);
    assert!(n.angle_between(Vec3::Y) < 0.01);
}

#[test]
#[should_panic(expected = "Height map must be at least 1x1")]
fn test_empty_height_map_is_rejected() {
    HeightMap::from_fn(0, 4, |_, _| 0.0);
}

#[test]
#[should_panic(expected = "Normal map must be at least 1x1")]
fn test_empty_normal_map_is_rejected() {
    NormalMap::from_fn(3, 0, |_, _| Vec3::Y);
}

#[test]
fn test_populate_sets_heights_and_steepness() {
    let mut grid = unit_grid(4);
    // 2×2 pixels onto 4×4 cells: each pixel drives a 2×2 block.
    let heights = HeightMap::from_luma8(2, 2, &[0, 255, 51, 102]).unwrap();
    let tilted = Vec3::new(1.0, 1.0, 0.0).normalize(); // 45°
    let normals = NormalMap::from_fn(2, 2, |x, _| if x == 1 { tilted } else { Vec3::Y });
    let settings = TerrainSettings { max_height: 10.0, max_walkable_slope_degrees: 40.0 };

    grid.populate(&heights, &normals, settings, &CollisionIndex::default());

    let cell = |row, col| grid.square(GridSquare::new(row, col)).unwrap();
    assert_eq!(cell(0, 0).terrain_height, 0.0);
    assert!((cell(1, 3).terrain_height - 10.0).abs() < 1e-4);
    assert!((cell(3, 0).terrain_height - 2.0).abs() < 1e-4);
    assert_eq!(cell(3, 3).world_pos.y, cell(3, 3).terrain_height);

    assert!(!cell(0, 1).steep);
    assert!(cell(0, 2).steep);
    assert!(cell(3, 3).steep);
}

#[test]
fn test_populate_resets_and_restamps_blockers() {
    let mut grid = unit_grid(6);
    occupy(&mut grid, 5, 5, entity(99));

    let mut index = CollisionIndex::new(CollisionMatrix::default());
    let wall = entity(1);
    let crate_box = entity(2);
    index.register(wall, cell_box(0, 0, 1, 3), CollisionLayer::Building, true, &Transform::IDENTITY);
    index.register(crate_box, cell_box(4, 0, 1, 1), CollisionLayer::Item, false, &Transform::IDENTITY);

    let settings = TerrainSettings { max_height: 1.0, max_walkable_slope_degrees: 45.0 };
    grid.populate(&HeightMap::flat(1, 1), &NormalMap::flat(1, 1), settings, &index);

    assert!(!grid.is_occupied(GridSquare::new(5, 5)));
    for col in 0..3 {
        assert_eq!(grid.occupant_of(GridSquare::new(0, col)), Some(wall));
    }
    assert!(!grid.is_occupied(GridSquare::new(4, 0)));
}

#[test]
fn test_mark_area_if_steep_skips_flat_cells() {
    let mut grid = unit_grid(4);
    let steep_normal = Vec3::new(0.0, 0.2, 1.0);
    let normals = NormalMap::from_fn(4, 4, |x, _| if x >= 2 { steep_normal } else { Vec3::Y });
    let settings = TerrainSettings { max_height: 1.0, max_walkable_slope_degrees: 30.0 };
    grid.populate(&HeightMap::flat(4, 4), &normals, settings, &CollisionIndex::default());

    grid.mark_area_if_steep(&cell_box(0, 0, 4, 4), true);

    for cell in grid.squares() {
        assert_eq!(cell.occupied, cell.grid_pos.col >= 2, "cell {:?}", cell.grid_pos);
    }
}

// ============================================================================
// Ranges
// ============================================================================

#[test]
fn test_grid_range_around_clamps_to_grid() {
    let grid = unit_grid(10);
    let range = grid.grid_range_around(Vec3::new(1.5, 0.0, 8.5), 3).unwrap();
    assert_eq!(range.min, GridSquare::new(5, 0));
    assert_eq!(range.max, GridSquare::new(9, 4));

    let inner = grid.grid_range_around(Vec3::new(5.5, 0.0, 5.5), 2).unwrap();
    assert_eq!((inner.rows(), inner.cols()), (5, 5));

    assert!(grid.grid_range_around(Vec3::new(-4.0, 0.0, 0.0), 2).is_none());
}

#[test]
fn test_grid_range_for_box_uses_box_center() {
    let grid = unit_grid(10);
    let bounds = BoundingBox::new(Vec3::new(4.0, 0.0, 4.0), Vec3::new(6.0, 2.0, 6.0));
    let range = grid.grid_range_for_box(&bounds, 1).unwrap();
    assert_eq!(range, PathfindRange::new(GridSquare::new(4, 4), GridSquare::new(6, 6)));
}

#[test]
fn test_get_pathfind_range_follows_entity() {
    let grid = unit_grid(10);
    let actor = entity(5);
    let mut transforms = FxHashMap::default();
    transforms.insert(actor, Transform::from_xyz(2.5, 0.0, 2.5));

    let range = grid.get_pathfind_range(actor, 1, &transforms).unwrap();
    assert_eq!(range, PathfindRange::new(GridSquare::new(1, 1), GridSquare::new(3, 3)));
    assert!(grid.is_within_range(GridSquare::new(3, 1), Some(&range)));
    assert!(!grid.is_within_range(GridSquare::new(4, 1), Some(&range)));
    assert!(grid.is_within_range(GridSquare::new(9, 9), None));
    assert!(!grid.is_within_range(GridSquare::new(10, 0), None));
}

#[test]
#[should_panic(expected = "No transform")]
fn test_get_pathfind_range_panics_without_transform() {
    let grid = unit_grid(10);
    let transforms: FxHashMap<Entity, Transform> = FxHashMap::default();
    let _ = grid.get_pathfind_range(entity(5), 1, &transforms);
}

// ============================================================================
// Best location
// ============================================================================

#[test]
fn test_free_target_is_returned_as_is() {
    let grid = unit_grid(10);
    let target = GridSquare::new(7, 2);
    assert_eq!(grid.find_next_best_location(GridSquare::new(0, 0), target, None), target);
}

#[test]
fn test_blocked_target_resolves_towards_caller() {
    let mut grid = unit_grid(10);
    occupy(&mut grid, 5, 5, entity(1));

    // Caller south-west of the target: the SW ring cell is closest.
    let best = grid.find_next_best_location(GridSquare::new(1, 1), GridSquare::new(5, 5), None);
    assert_eq!(best, GridSquare::new(4, 4));
}

#[test]
fn test_equal_candidates_follow_compass_order() {
    let mut grid = unit_grid(10);
    let target = GridSquare::new(5, 5);
    occupy(&mut grid, 5, 5, entity(1));

    // Every compass point is at distance 1 from the target itself; east wins.
    assert_eq!(grid.find_next_best_location(target, target, None), GridSquare::new(5, 6));

    occupy(&mut grid, 5, 6, entity(1));
    assert_eq!(grid.find_next_best_location(target, target, None), GridSquare::new(6, 5));
}

#[test]
fn test_best_location_skips_steep_and_out_of_range() {
    let mut grid = unit_grid(10);
    let steep = Vec3::new(1.0, 0.1, 0.0);
    // Column 6 and beyond is steep.
    let normals = NormalMap::from_fn(10, 10, |x, _| if x >= 6 { steep } else { Vec3::Y });
    let settings = TerrainSettings { max_height: 1.0, max_walkable_slope_degrees: 40.0 };
    grid.populate(&HeightMap::flat(10, 10), &normals, settings, &CollisionIndex::default());

    let range = PathfindRange::new(GridSquare::new(0, 0), GridSquare::new(9, 4));
    let best = grid.find_next_best_location(GridSquare::new(5, 0), GridSquare::new(5, 8), Some(&range));
    assert_eq!(best, GridSquare::new(5, 4));
}

#[test]
fn test_best_location_is_deterministic() {
    let mut rng = fastrand::Rng::with_seed(1234);
    let mut grid = unit_grid(20);
    for _ in 0..120 {
        occupy(&mut grid, rng.usize(0..20), rng.usize(0..20), entity(1));
    }

    for _ in 0..50 {
        let from = GridSquare::new(rng.usize(0..20), rng.usize(0..20));
        let target = GridSquare::new(rng.usize(0..20), rng.usize(0..20));
        let first = grid.find_next_best_location(from, target, None);
        let second = grid.find_next_best_location(from, target, None);
        assert_eq!(first, second);
        if first != from {
            assert!(!grid.is_occupied(first));
        }
    }
}

/// Straightforward ring scan over the whole bounding square of each ring.
fn best_location_by_full_scan(grid: &NavigationGrid, from: GridSquare, target: GridSquare) -> GridSquare {
    if grid.is_walkable_for(target, None) {
        return target;
    }
    let n = grid.slices() as isize;
    let (t_row, t_col) = (target.row as isize, target.col as isize);

    for radius in 1..n {
        let mut ring: Vec<(isize, isize)> = Direction::ALL
            .iter()
            .map(|dir| {
                let (dr, dc) = dir.offset();
                (t_row + dr * radius, t_col + dc * radius)
            })
            .collect();
        for row in (t_row - radius)..=(t_row + radius) {
            for col in (t_col - radius)..=(t_col + radius) {
                let (dr, dc) = (row - t_row, col - t_col);
                let on_ring = dr.abs().max(dc.abs()) == radius;
                let compass = dr == 0 || dc == 0 || dr.abs() == dc.abs();
                if on_ring && !compass {
                    ring.push((row, col));
                }
            }
        }

        let best = ring
            .into_iter()
            .filter(|&(row, col)| (0..n).contains(&row) && (0..n).contains(&col))
            .map(|(row, col)| GridSquare::new(row as usize, col as usize))
            .filter(|&square| grid.is_walkable_for(square, None))
            .min_by_key(|square| square.distance_squared(from));
        if let Some(square) = best {
            return square;
        }
    }
    from
}

#[test]
fn test_best_location_perimeter_walk_matches_full_scan() {
    let mut rng = fastrand::Rng::with_seed(99);
    let mut grid = unit_grid(24);
    // Dense blob so answers come from several rings out.
    grid.mark_area(&cell_box(6, 6, 12, 12), true, Some(entity(1)));
    for _ in 0..150 {
        occupy(&mut grid, rng.usize(0..24), rng.usize(0..24), entity(2));
    }

    for _ in 0..200 {
        let from = GridSquare::new(rng.usize(0..24), rng.usize(0..24));
        let target = GridSquare::new(rng.usize(0..24), rng.usize(0..24));
        assert_eq!(
            grid.find_next_best_location(from, target, None),
            best_location_by_full_scan(&grid, from, target),
            "from {:?} to {:?}",
            from,
            target
        );
    }
}

#[test]
fn test_no_usable_cell_returns_from() {
    let mut grid = unit_grid(4);
    grid.mark_area(&cell_box(0, 0, 4, 4), true, Some(entity(1)));
    let from = GridSquare::new(0, 0);
    assert_eq!(grid.find_next_best_location(from, GridSquare::new(3, 3), None), from);
}

#[test]
fn test_area_aware_best_location_needs_room() {
    let mut grid = unit_grid(10);
    // Wall along row 5, columns 0..=8.
    grid.mark_area(&cell_box(5, 0, 1, 9), true, Some(entity(1)));
    let footprint = BoundingBox::new(Vec3::splat(-1.5), Vec3::splat(1.5));

    let target = GridSquare::new(5, 3);
    let plain = grid.find_next_best_location(GridSquare::new(0, 3), target, None);
    assert_eq!(plain.chebyshev_distance(target), 1);

    let roomy = grid.find_next_best_location_for(GridSquare::new(0, 3), target, None, None, Some(&footprint));
    assert!(grid.is_area_unoccupied(roomy, &footprint, None));
    assert_eq!(roomy, GridSquare::new(3, 3));
}

// ============================================================================
// Grid ray cast
// ============================================================================

#[test]
fn test_cast_ray_finds_first_blocked_cell() {
    let mut grid = unit_grid(12);
    occupy(&mut grid, 5, 8, entity(1));
    occupy(&mut grid, 5, 10, entity(2));

    let start = GridSquare::new(5, 2);
    assert_eq!(grid.cast_ray(start, Vec2::X, 10.0), Some(GridSquare::new(5, 8)));
    assert_eq!(grid.cast_ray(start, Vec2::X, 3.0), None);
    assert_eq!(grid.cast_ray(start, Vec2::NEG_X, 10.0), None);
}

#[test]
fn test_cast_ray_diagonal_and_start_cell() {
    let mut grid = unit_grid(12);
    occupy(&mut grid, 2, 2, entity(1));
    occupy(&mut grid, 6, 6, entity(2));

    // Starting on an occupied cell does not count as a hit.
    assert_eq!(grid.cast_ray(GridSquare::new(2, 2), Vec2::new(1.0, 1.0), 20.0), Some(GridSquare::new(6, 6)));
    assert_eq!(grid.cast_ray(GridSquare::new(2, 2), Vec2::ZERO, 20.0), None);
}

// ============================================================================
// Types
// ============================================================================

#[test]
fn test_compass_order_and_offsets() {
    let offsets: Vec<(isize, isize)> = Direction::ALL.iter().map(|d| d.offset()).collect();
    assert_eq!(offsets, vec![(0, 1), (1, 0), (0, -1), (-1, 0), (1, 1), (1, -1), (-1, -1), (-1, 1)]);
    assert_eq!(Direction::ALL.iter().filter(|d| d.is_diagonal()).count(), 4);
    assert_eq!(GridSquare::new(0, 3).offset(-1, 0), None);
}

#[test]
fn test_range_intersection() {
    let a = PathfindRange::new(GridSquare::new(0, 0), GridSquare::new(5, 5));
    let b = PathfindRange::new(GridSquare::new(3, 4), GridSquare::new(9, 9));
    assert_eq!(a.intersect(&b), Some(PathfindRange::new(GridSquare::new(3, 4), GridSquare::new(5, 5))));

    let c = PathfindRange::new(GridSquare::new(6, 6), GridSquare::new(7, 7));
    assert_eq!(a.intersect(&c), None);
}
