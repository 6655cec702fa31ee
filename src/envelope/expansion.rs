//! Envelope expansion: emits candidate docking points around every substrate atom, triangulates
//! them with an external alpha-shape collaborator, and bridges dependency-graph edges across
//! bonded substrate atoms. Grounded on `expansion.c` and `generation.c`.

use crate::core::error::CageError;
use crate::core::geometry::{ax1e1, ax1e3, ax2e1, ax2e2, ax3e1, plane_normal, rotate, vector, Point, DIST_HYDRO};
use crate::envelope::{Envelope, Flag};
use crate::substrate::Molecule;

/// The alpha-shape collaborator: a pure function from a point cloud and an alpha parameter to an
/// edge set. Expressed as a trait object so a real triangulator can be plugged in without the
/// core depending on its implementation or licensing.
pub trait AlphaShapeProvider {
    /// Returns every edge of the alpha shape over `points` at the given `alpha`, as zero-based
    /// index pairs into `points`.
    fn edges(&self, points: &[Point], alpha: f32) -> Result<Vec<(usize, usize)>, CageError>;
}

/// Decodes the collaborator's native wire layout: two parallel one-based index halves,
/// `first_half[i]`/`second_half[i]` being the endpoints of edge `i`, rather than interleaved
/// `(u, v)` pairs.
pub fn decode_edge_halves(first_half: &[i32], second_half: &[i32]) -> Vec<(usize, usize)> {
    first_half
        .iter()
        .zip(second_half.iter())
        .map(|(&u, &v)| ((u - 1) as usize, (v - 1) as usize))
        .collect()
}

/// A perpendicular-ish reference normal through `pos` and `x1`, used whenever a real second
/// ligand isn't available to define a plane.
fn arbitrary_normal(pos: Point, x1: Point) -> Point {
    let dir = vector(pos, x1).normalize_to(1.0);
    let reference = if dir.z.abs() < 0.9 {
        Point::new(0.0, 0.0, 1.0)
    } else {
        Point::new(1.0, 0.0, 0.0)
    };
    plane_normal(pos, x1, pos.add(reference))
}

fn steric2_candidates(pos: Point, neighbors: &[Point]) -> Vec<Point> {
    match neighbors.first() {
        Some(&x1) => vec![ax1e1(pos, x1, DIST_HYDRO)],
        None => Vec::new(),
    }
}

/// Four points spaced 90° apart around the linear ligand axis (0-lone-pair, 2-ligand case).
fn linear_candidates(pos: Point, x1: Point) -> Vec<Point> {
    let axis = vector(pos, x1).normalize_to(1.0);
    let reference = arbitrary_normal(pos, x1);
    (0..4)
        .map(|k| pos.add(rotate(axis, 90.0 * k as f32, reference).normalize_to(DIST_HYDRO)))
        .collect()
}

fn steric3_candidates(pos: Point, neighbors: &[Point]) -> Vec<Point> {
    let mut candidates = Vec::new();
    let normal = match neighbors {
        [] => Point::new(0.0, 0.0, 1.0),
        [x1] => arbitrary_normal(pos, *x1),
        [x1, x2, ..] => plane_normal(pos, *x1, *x2),
    };
    match neighbors {
        [x1] => {
            let fill1 = ax1e1_like_ax1e2(pos, *x1, normal);
            let fill2 = ax1e1_like_ax1e2(pos, fill1, normal);
            candidates.push(fill1);
            candidates.push(fill2);
        }
        [x1, x2, ..] => {
            candidates.push(ax2e1(pos, *x1, *x2, DIST_HYDRO));
        }
        [] => {}
    }
    candidates.push(pos.add(normal.normalize_to(DIST_HYDRO)));
    candidates.push(pos.add(normal.scale(-1.0).normalize_to(DIST_HYDRO)));
    candidates
}

/// Thin wrapper naming the role AX1E2 plays in `steric3_candidates` (120° in-plane rotation).
fn ax1e1_like_ax1e2(pos: Point, from: Point, normal: Point) -> Point {
    crate::core::geometry::ax1e2(pos, from, normal, DIST_HYDRO)
}

fn steric4_candidates(pos: Point, neighbors: &[Point]) -> Vec<Point> {
    match neighbors {
        [x1, x2, x3, ..] => vec![ax3e1(pos, *x1, *x2, *x3, DIST_HYDRO)],
        [x1, x2] => {
            let arm = ax2e2(pos, *x1, *x2, DIST_HYDRO);
            let arm2 = ax3e1(pos, *x1, *x2, arm, DIST_HYDRO);
            vec![arm, arm2]
        }
        [x1] => {
            let normal = arbitrary_normal(pos, *x1);
            let arm1 = ax1e3(pos, *x1, normal, DIST_HYDRO);
            let arm2 = ax1e3(pos, arm1, normal, DIST_HYDRO);
            let arm3 = ax3e1(pos, *x1, arm1, arm2, DIST_HYDRO);
            vec![arm1, arm2, arm3]
        }
        [] => Vec::new(),
    }
}

/// The four standard tetrahedral directions, used for an isolated atom with no real ligands to
/// build a plane or axis from.
fn tetrahedral_candidates(pos: Point) -> Vec<Point> {
    [
        Point::new(1.0, 1.0, 1.0),
        Point::new(1.0, -1.0, -1.0),
        Point::new(-1.0, 1.0, -1.0),
        Point::new(-1.0, -1.0, 1.0),
    ]
    .iter()
    .map(|d| pos.add(d.normalize_to(DIST_HYDRO)))
    .collect()
}

/// Candidate docking points for one substrate atom, routed by its steric class.
fn candidates_for_atom(atom_pos: Point, neighbor_positions: &[Point], ligands: usize, lone_pairs: i32) -> Vec<Point> {
    if ligands == 0 {
        return tetrahedral_candidates(atom_pos);
    }
    if ligands == 1 && lone_pairs == 1 {
        return steric2_candidates(atom_pos, neighbor_positions);
    }
    if ligands == 2 && lone_pairs == 0 {
        if let Some(&x1) = neighbor_positions.first() {
            return linear_candidates(atom_pos, x1);
        }
        return Vec::new();
    }
    let steric = ligands as i32 + lone_pairs;
    if steric == 3 {
        return steric3_candidates(atom_pos, neighbor_positions);
    }
    if steric == 4 {
        return steric4_candidates(atom_pos, neighbor_positions);
    }
    Vec::new()
}

/// Builds the bare envelope around `substrate` by emitting candidate points, triangulating them
/// with `provider`, dropping orphans, and bridging dependency-graph edges across bonded atoms.
pub fn expand(substrate: &Molecule, provider: &dyn AlphaShapeProvider, alpha: f32) -> Result<Envelope, CageError> {
    let mut envelope = Envelope::new();
    let mut flat_points = Vec::new();
    let mut envelope_index_of_point = Vec::new();
    // substrate atom index -> the envelope candidate index that represents it in the dependency
    // graph. The source calls `checkVertex`/`SHL_addVertex` once per generated candidate, which
    // for a steric-3/4 atom with more than one synthesized ligand slot would register several
    // envelope vertices for the same substrate site; that in turn requires `generationHydro`'s
    // "already within MINDIS of a HYDRO_PATTERN atom" guard to suppress the duplicates it would
    // otherwise try to insert. Registering a single deterministic representative candidate per
    // substrate atom here reaches the same one-pattern-per-site outcome without relying on that
    // guard to paper over geometrically-separate duplicate insertions.
    let mut representative_candidate: Vec<Option<usize>> = vec![None; substrate.atoms.len()];

    for (i, atom) in substrate.atoms.iter().enumerate() {
        let neighbor_positions: Vec<Point> = atom.neighbors.iter().map(|&n| substrate.atoms[n].position).collect();
        let candidates = candidates_for_atom(atom.position, &neighbor_positions, atom.ligands(), atom.lone_pairs);
        for point in candidates {
            let idx = envelope.add_atom(Flag::Shell, point, Some(i));
            if substrate.is_cyclic(i) {
                envelope.cyclic.insert(idx);
            }
            flat_points.push(point);
            envelope_index_of_point.push(idx);
            representative_candidate[i].get_or_insert(idx);
        }
    }

    for &v in &substrate.dependency_graph.vertex_ids() {
        if representative_candidate[v as usize].is_some() {
            envelope.dependency_graph.add_vertex(representative_candidate[v as usize].unwrap() as i32);
        }
    }
    for &u in &substrate.dependency_graph.vertex_ids() {
        for v in substrate.dependency_graph.neighbors(u) {
            if v < u {
                continue;
            }
            if let (Some(eu), Some(ev)) = (representative_candidate[u as usize], representative_candidate[v as usize]) {
                envelope.dependency_graph.add_edge(eu as i32, ev as i32);
            }
        }
    }

    let edges = provider.edges(&flat_points, alpha)?;
    for (a, b) in edges {
        envelope.link(envelope_index_of_point[a], envelope_index_of_point[b]);
    }

    let orphans: Vec<usize> = envelope_index_of_point.iter().copied().filter(|&idx| envelope.degree(idx) == 0).collect();
    for idx in orphans {
        envelope.remove_atom(idx);
    }

    for u in envelope.dependency_graph.vertex_ids() {
        for v in envelope.dependency_graph.vertex_ids() {
            if v <= u {
                continue;
            }
            let pu = envelope.atoms[u as usize].parent_atom;
            let pv = envelope.atoms[v as usize].parent_atom;
            let bridgeable = match (pu, pv) {
                (Some(pu), Some(pv)) => pu == pv || substrate.atoms[pu].neighbors.contains(&pv),
                _ => false,
            };
            if bridgeable {
                envelope.dependency_graph.add_edge(u, v);
            }
        }
    }

    Ok(envelope)
}

/// A dependency-free default [`AlphaShapeProvider`]: links every pair of points within `alpha` of
/// each other. This is a literal distance-cutoff graph, not a true alpha-complex — the real
/// triangulation math is explicitly out of scope (§1) and left pluggable — but it is a reasonable
/// default for small point clouds and lets the crate run end to end without an external
/// triangulator dependency.
#[derive(Debug, Clone, Copy, Default)]
pub struct DistanceCutoffAlphaShape;

impl AlphaShapeProvider for DistanceCutoffAlphaShape {
    fn edges(&self, points: &[Point], alpha: f32) -> Result<Vec<(usize, usize)>, CageError> {
        let mut out = Vec::new();
        for i in 0..points.len() {
            for j in (i + 1)..points.len() {
                if crate::core::geometry::dist(points[i], points[j]) <= alpha {
                    out.push((i, j));
                }
            }
        }
        Ok(out)
    }
}
