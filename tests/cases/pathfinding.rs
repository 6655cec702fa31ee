//! End-to-end scenarios for §4.V the voxel grid and its A*/Dijkstra pathfinder.

use cage_forge::core::geometry::{dist, Point};
use cage_forge::voxel::{a_star, dist_with_obstacles, VoxelGrid};

#[test]
fn a_star_on_an_empty_grid_matches_euclidean_distance() {
    let mut grid = VoxelGrid::substrate_default();
    let start = grid.cell_of(Point::new(-5.0, 0.0, 0.0));
    let goal = grid.cell_of(Point::new(5.0, 0.0, 0.0));
    let path_cost = a_star(&mut grid, start, goal).expect("empty grid should always be reachable");
    let euclid = dist(grid.cell_center(start), grid.cell_center(goal));
    assert!((path_cost - euclid).abs() < euclid * 0.05, "A* cost {path_cost} should track euclidean distance {euclid}");
}

#[test]
fn dist_with_obstacles_detours_around_an_occupied_sphere() {
    let mut grid = VoxelGrid::substrate_default();
    grid.occupy_sphere(Point::new(0.0, 0.0, 0.0), 3.0);

    let direct = dist(Point::new(-5.0, 0.0, 0.0), Point::new(5.0, 0.0, 0.0));
    let routed = dist_with_obstacles(&mut grid, Point::new(-5.0, 0.0, 0.0), Point::new(5.0, 0.0, 0.0)).expect("should route around the obstacle");
    assert!(routed >= direct, "a detour around an obstacle should never be shorter than the direct path");
}

#[test]
fn occupy_sphere_marks_only_cells_within_radius() {
    let mut grid = VoxelGrid::substrate_default();
    grid.occupy_sphere(Point::new(0.0, 0.0, 0.0), 1.0);
    assert!(grid.is_occupied(grid.cell_of(Point::new(0.0, 0.0, 0.0))));
    assert!(!grid.is_occupied(grid.cell_of(Point::new(10.0, 10.0, 10.0))));
}
