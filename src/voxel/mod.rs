//! Static 3-D occupancy grid and a binary-heap A*/Dijkstra pathfinder over it.
//!
//! The grid, its `VMap` companion (best known `g` plus current heap slot per cell), and the heap
//! buffer are meant to be allocated once per enumeration run and reused by every `a_star`/
//! `dijkstra` call; [`VoxelGrid::reset_search_state`] does the O(N) sentinel reset each call needs
//! without touching occupancy. Grounded on `voxelization.c`, `structureNH.c`, and `pathFinding.c`.

use crate::core::geometry::{dist, Point};

/// Default cubic domain half-extent, in Ångström (`START` in the source).
pub const DEFAULT_START: f32 = -30.0;
/// Default grid resolution along each axis (`GRID` in the source).
pub const DEFAULT_DIM: usize = 201;

/// Cell-index triple.
pub type Cell = (usize, usize, usize);

/// A static cubic occupancy grid plus its A*/Dijkstra search scratch state.
pub struct VoxelGrid {
    dim_x: usize,
    dim_y: usize,
    dim_z: usize,
    start: f32,
    cell_size: f32,
    occupied: Vec<bool>,
    best_g: Vec<f32>,
    heap_index: Vec<i64>,
}

/// Sentinel meaning "this cell has never been touched by the current search".
const NOT_IN_HEAP: i64 = i64::MIN;

impl VoxelGrid {
    pub fn new(dim_x: usize, dim_y: usize, dim_z: usize, start: f32, cell_size: f32) -> Self {
        let n = dim_x * dim_y * dim_z;
        VoxelGrid {
            dim_x,
            dim_y,
            dim_z,
            start,
            cell_size,
            occupied: vec![false; n],
            best_g: vec![f32::INFINITY; n],
            heap_index: vec![NOT_IN_HEAP; n],
        }
    }

    /// The grid shape and cell size used by the reference substrate-occupancy run: a
    /// 201×201×201 cube spanning [-30, 30] Å on each axis.
    pub fn substrate_default() -> Self {
        let span = -DEFAULT_START * 2.0;
        let cell_size = span / DEFAULT_DIM as f32;
        Self::new(DEFAULT_DIM, DEFAULT_DIM, DEFAULT_DIM, DEFAULT_START, cell_size)
    }

    fn index(&self, cell: Cell) -> usize {
        (cell.0 * self.dim_y + cell.1) * self.dim_z + cell.2
    }

    pub fn in_bounds(&self, cell: Cell) -> bool {
        cell.0 < self.dim_x && cell.1 < self.dim_y && cell.2 < self.dim_z
    }

    /// Maps a real-space point to the cell that contains it, clamped to the grid.
    pub fn cell_of(&self, p: Point) -> Cell {
        let clamp = |v: f32, dim: usize| -> usize {
            let idx = ((v - self.start) / self.cell_size).floor();
            if idx < 0.0 {
                0
            } else if idx as usize >= dim {
                dim - 1
            } else {
                idx as usize
            }
        };
        (clamp(p.x, self.dim_x), clamp(p.y, self.dim_y), clamp(p.z, self.dim_z))
    }

    /// Real-space center of a cell.
    pub fn cell_center(&self, cell: Cell) -> Point {
        Point::new(
            self.start + (cell.0 as f32 + 0.5) * self.cell_size,
            self.start + (cell.1 as f32 + 0.5) * self.cell_size,
            self.start + (cell.2 as f32 + 0.5) * self.cell_size,
        )
    }

    pub fn is_occupied(&self, cell: Cell) -> bool {
        self.occupied[self.index(cell)]
    }

    /// Marks every cell within `radius` of `center` as occupied.
    pub fn occupy_sphere(&mut self, center: Point, radius: f32) {
        let cell_radius = (radius / self.cell_size).ceil() as i64 + 1;
        let mid = self.cell_of(center);
        for dx in -cell_radius..=cell_radius {
            for dy in -cell_radius..=cell_radius {
                for dz in -cell_radius..=cell_radius {
                    let x = mid.0 as i64 + dx;
                    let y = mid.1 as i64 + dy;
                    let z = mid.2 as i64 + dz;
                    if x < 0 || y < 0 || z < 0 {
                        continue;
                    }
                    let cell = (x as usize, y as usize, z as usize);
                    if !self.in_bounds(cell) {
                        continue;
                    }
                    if dist(self.cell_center(cell), center) <= radius {
                        let idx = self.index(cell);
                        self.occupied[idx] = true;
                    }
                }
            }
        }
    }

    /// Resets the search scratch state (`best_g`/`heap_index`) to the sentinel values every
    /// `a_star`/`dijkstra` call must start from. Occupancy is untouched.
    fn reset_search_state(&mut self) {
        self.best_g.iter_mut().for_each(|g| *g = f32::INFINITY);
        self.heap_index.iter_mut().for_each(|h| *h = NOT_IN_HEAP);
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct HeapEntry {
    cell: Cell,
    g: f32,
    f: f32,
}

struct NodeHeap {
    entries: Vec<HeapEntry>,
}

impl NodeHeap {
    fn new() -> Self {
        NodeHeap { entries: Vec::new() }
    }

    fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn swap(&mut self, grid: &mut VoxelGrid, i: usize, j: usize) {
        self.entries.swap(i, j);
        let idx_i = grid.index(self.entries[i].cell);
        let idx_j = grid.index(self.entries[j].cell);
        grid.heap_index[idx_i] = i as i64;
        grid.heap_index[idx_j] = j as i64;
    }

    fn sift_up(&mut self, grid: &mut VoxelGrid, mut i: usize) {
        while i > 0 {
            let parent = (i - 1) / 2;
            if self.entries[parent].f <= self.entries[i].f {
                break;
            }
            self.swap(grid, parent, i);
            i = parent;
        }
    }

    fn sift_down(&mut self, grid: &mut VoxelGrid, mut i: usize) {
        loop {
            let left = 2 * i + 1;
            let right = 2 * i + 2;
            let mut smallest = i;
            if left < self.entries.len() && self.entries[left].f < self.entries[smallest].f {
                smallest = left;
            }
            if right < self.entries.len() && self.entries[right].f < self.entries[smallest].f {
                smallest = right;
            }
            if smallest == i {
                break;
            }
            self.swap(grid, i, smallest);
            i = smallest;
        }
    }

    fn insert(&mut self, grid: &mut VoxelGrid, cell: Cell, g: f32, f: f32) {
        let i = self.entries.len();
        self.entries.push(HeapEntry { cell, g, f });
        let idx = grid.index(cell);
        grid.heap_index[idx] = i as i64;
        self.sift_up(grid, i);
    }

    fn extract_min(&mut self, grid: &mut VoxelGrid) -> Option<HeapEntry> {
        if self.entries.is_empty() {
            return None;
        }
        let min = self.entries[0];
        let last = self.entries.len() - 1;
        self.entries.swap(0, last);
        self.entries.pop();
        let min_idx = grid.index(min.cell);
        grid.heap_index[min_idx] = -1;
        if !self.entries.is_empty() {
            let idx0 = grid.index(self.entries[0].cell);
            grid.heap_index[idx0] = 0;
            self.sift_down(grid, 0);
        }
        Some(min)
    }

    /// Lowers the priority of `cell` to `g`/`f` if it is already in the heap; otherwise inserts
    /// it fresh. Mirrors `NH_decrease_priority`'s lookup through the companion `VMap`.
    fn decrease_priority(&mut self, grid: &mut VoxelGrid, cell: Cell, g: f32, f: f32) {
        let idx = grid.index(cell);
        let heap_idx = grid.heap_index[idx];
        if heap_idx >= 0 {
            let i = heap_idx as usize;
            self.entries[i].g = g;
            self.entries[i].f = f;
            self.sift_up(grid, i);
        } else if heap_idx != -1 {
            // NOT_IN_HEAP sentinel: never queued before.
            self.insert(grid, cell, g, f);
        }
        // heap_idx == -1 means already closed; never re-opened.
    }
}

const NEIGHBOR_DELTAS: [(i64, i64, i64); 26] = neighbor_deltas();

const fn neighbor_deltas() -> [(i64, i64, i64); 26] {
    let mut out = [(0i64, 0i64, 0i64); 26];
    let mut idx = 0;
    let mut dx = -1i64;
    while dx <= 1 {
        let mut dy = -1i64;
        while dy <= 1 {
            let mut dz = -1i64;
            while dz <= 1 {
                if !(dx == 0 && dy == 0 && dz == 0) {
                    out[idx] = (dx, dy, dz);
                    idx += 1;
                }
                dz += 1;
            }
            dy += 1;
        }
        dx += 1;
    }
    out
}

/// The admissible 26-connected voxel-distance heuristic: `h = (√3−√2)·dmin + (√2−1)·dmid + dmax`
/// over the sorted, cell-size-scaled absolute per-axis deltas between `from` and `to`.
fn voxel_heuristic(from: Cell, to: Cell, cell_size: f32) -> f32 {
    let mut deltas = [
        (from.0 as i64 - to.0 as i64).unsigned_abs() as f32 * cell_size,
        (from.1 as i64 - to.1 as i64).unsigned_abs() as f32 * cell_size,
        (from.2 as i64 - to.2 as i64).unsigned_abs() as f32 * cell_size,
    ];
    deltas.sort_by(|a, b| a.partial_cmp(b).unwrap());
    let (dmin, dmid, dmax) = (deltas[0], deltas[1], deltas[2]);
    (3f32.sqrt() - 2f32.sqrt()) * dmin + (2f32.sqrt() - 1.0) * dmid + dmax
}

fn search(grid: &mut VoxelGrid, start: Cell, goal: Cell, use_heuristic: bool) -> Option<f32> {
    grid.reset_search_state();
    let mut heap = NodeHeap::new();

    let h0 = if use_heuristic { voxel_heuristic(start, goal, grid.cell_size) } else { 0.0 };
    heap.insert(grid, start, 0.0, h0);
    let start_idx = grid.index(start);
    grid.best_g[start_idx] = 0.0;

    while let Some(current) = heap.extract_min(grid) {
        if current.cell == goal {
            return Some(current.g);
        }

        for &(dx, dy, dz) in NEIGHBOR_DELTAS.iter() {
            let x = current.cell.0 as i64 + dx;
            let y = current.cell.1 as i64 + dy;
            let z = current.cell.2 as i64 + dz;
            if x < 0 || y < 0 || z < 0 {
                continue;
            }
            let neighbor = (x as usize, y as usize, z as usize);
            if !grid.in_bounds(neighbor) || grid.is_occupied(neighbor) {
                continue;
            }

            let step_cost = ((dx.unsigned_abs() + dy.unsigned_abs() + dz.unsigned_abs()) as f32)
                .sqrt()
                * grid.cell_size;
            let tentative_g = current.g + step_cost;

            let neighbor_idx = grid.index(neighbor);
            if tentative_g < grid.best_g[neighbor_idx] {
                grid.best_g[neighbor_idx] = tentative_g;
                let h = if use_heuristic { voxel_heuristic(neighbor, goal, grid.cell_size) } else { 0.0 };
                heap.decrease_priority(grid, neighbor, tentative_g, tentative_g + h);
            }
        }
    }

    None
}

/// A* between two grid cells using the [`voxel_heuristic`]. `None` means no path exists.
pub fn a_star(grid: &mut VoxelGrid, start: Cell, goal: Cell) -> Option<f32> {
    search(grid, start, goal, true)
}

/// Dijkstra (A* with a zero heuristic) between two grid cells; a validation lower bound for
/// [`a_star`].
pub fn dijkstra(grid: &mut VoxelGrid, start: Cell, goal: Cell) -> Option<f32> {
    search(grid, start, goal, false)
}

/// Snaps `p` and `q` to their enclosing cells, runs A* between the cells, then adds back the
/// real-space offset from each original point to its cell's center. `None` if no grid path
/// exists between the snapped cells.
pub fn dist_with_obstacles(grid: &mut VoxelGrid, p: Point, q: Point) -> Option<f32> {
    let start_cell = grid.cell_of(p);
    let goal_cell = grid.cell_of(q);
    let grid_cost = a_star(grid, start_cell, goal_cell)?;
    let start_offset = dist(p, grid.cell_center(start_cell));
    let goal_offset = dist(q, grid.cell_center(goal_cell));
    Some(grid_cost + start_offset + goal_offset)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn astar_on_empty_grid_matches_diagonal_distance() {
        let mut grid = VoxelGrid::new(12, 12, 12, 0.0, 0.3);
        let g = a_star(&mut grid, (0, 0, 0), (10, 10, 10)).unwrap();
        let expected = 10.0 * 0.3 * 3f32.sqrt();
        assert!((g - expected).abs() < 1e-3, "g={g} expected={expected}");
    }

    #[test]
    fn astar_and_dijkstra_agree_on_empty_grid() {
        let mut grid = VoxelGrid::new(12, 12, 12, 0.0, 0.3);
        let a = a_star(&mut grid, (0, 0, 0), (5, 3, 1)).unwrap();
        let d = dijkstra(&mut grid, (0, 0, 0), (5, 3, 1)).unwrap();
        assert!((a - d).abs() < 1e-3, "a_star={a} dijkstra={d}");
    }

    #[test]
    fn astar_returns_none_when_goal_is_unreachable() {
        let mut grid = VoxelGrid::new(5, 5, 5, 0.0, 1.0);
        // wall off the goal entirely
        for x in 0..5 {
            for y in 0..5 {
                grid.occupied[(x * 5 + y) * 5 + 4] = true;
            }
        }
        assert!(a_star(&mut grid, (0, 0, 0), (4, 4, 4)).is_none());
    }

    #[test]
    fn occupy_sphere_marks_cells_within_radius() {
        let mut grid = VoxelGrid::new(20, 20, 20, -10.0, 1.0);
        grid.occupy_sphere(Point::new(0.0, 0.0, 0.0), 1.8);
        let center_cell = grid.cell_of(Point::new(0.0, 0.0, 0.0));
        assert!(grid.is_occupied(center_cell));
        let far_cell = grid.cell_of(Point::new(9.0, 9.0, 9.0));
        assert!(!grid.is_occupied(far_cell));
    }

    #[test]
    fn voxelization_is_idempotent() {
        let mut grid = VoxelGrid::new(20, 20, 20, -10.0, 1.0);
        grid.occupy_sphere(Point::new(1.0, 1.0, 1.0), 1.8);
        let before = grid.occupied.clone();
        grid.occupy_sphere(Point::new(1.0, 1.0, 1.0), 1.8);
        assert_eq!(before, grid.occupied);
    }

    #[test]
    fn dist_with_obstacles_adds_cell_center_offsets() {
        let mut grid = VoxelGrid::new(20, 20, 20, -10.0, 1.0);
        let p = Point::new(-9.8, -9.8, -9.8);
        let q = Point::new(9.8, 9.8, 9.8);
        let d = dist_with_obstacles(&mut grid, p, q).unwrap();
        assert!(d > 0.0);
    }
}
