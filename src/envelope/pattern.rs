//! Pattern insertion: promotes plain envelope candidates into aromatic-ring and hydrogen-bond
//! donor/acceptor motifs. Grounded on `generation.c` and `structureShl.c`.

use crate::core::geometry::{
    add_third_point, ax1e3, ax2e2, ax3e1, dist, plane_normal, rotate, vector, Point, DIST_ATOM_H, DIST_SIMPLE,
    MAXDIS_CYCLE, MINDIS, MINDIS_CYCLE, SIMPLE_CYCLE,
};
use crate::envelope::{Envelope, Flag};

/// 4.P.1: promotes cyclic envelope atoms with ≥2 cycle-neighbors within `MAXDIS_CYCLE` into
/// closed aromatic rings, merging any atom too close to a freshly synthesized ring-closure atom.
pub fn insert_aromatic_rings(envelope: &mut Envelope) {
    let candidates: Vec<usize> = envelope
        .live_indices()
        .into_iter()
        .filter(|&idx| envelope.is_cyclic(idx) && envelope.atoms[idx].flag != Flag::Cycle)
        .collect();

    for idx in candidates {
        if envelope.atoms[idx].flag == Flag::NotDef {
            continue;
        }
        let cycle_neighbors: Vec<usize> = envelope
            .neighbors(idx)
            .into_iter()
            .filter(|&n| envelope.is_cyclic(n) && dist(envelope.atoms[idx].position, envelope.atoms[n].position) <= MAXDIS_CYCLE)
            .collect();
        if cycle_neighbors.len() < 2 {
            continue;
        }

        let non_cycle_neighbors: Vec<usize> = envelope
            .neighbors(idx)
            .into_iter()
            .filter(|n| !cycle_neighbors.contains(n))
            .collect();
        for n in non_cycle_neighbors {
            envelope.unlink(idx, n);
        }
        envelope.promote(idx, Flag::Cycle);

        if envelope.degree(idx) == 2 {
            let a = envelope.atoms[cycle_neighbors[0]].position;
            let b = envelope.atoms[cycle_neighbors[1]].position;
            let origin = envelope.atoms[idx].position;
            let new_point = add_third_point(origin, a, b, SIMPLE_CYCLE);
            let new_idx = envelope.add_atom(Flag::Linkable, new_point, None);
            envelope.link(idx, new_idx);

            let nearby: Vec<usize> = envelope
                .live_indices()
                .into_iter()
                .filter(|&other| other != new_idx && dist(envelope.atoms[other].position, new_point) <= MINDIS_CYCLE)
                .collect();
            for other in nearby {
                envelope.merge_atom(new_idx, other);
            }
        }
    }
}

/// 4.P.2: traverses the dependency graph, turning each un-saturated vertex into a donor (parent
/// is `H`) or acceptor (otherwise) pattern.
///
/// `parent_steric` maps a substrate atom index to its steric number, needed to choose between the
/// triangular and tetrahedral acceptor shapes.
pub fn insert_hydrogen_patterns(envelope: &mut Envelope, parent_steric: impl Fn(usize) -> i32, parent_symbol: impl Fn(usize) -> String) {
    let vertices = envelope.dependency_graph.vertex_ids();
    for v in vertices {
        let idx = v as usize;
        if envelope.atoms[idx].flag == Flag::NotDef {
            continue;
        }
        let already_saturated = envelope
            .live_indices()
            .into_iter()
            .any(|other| envelope.atoms[other].flag == Flag::HydroPattern && dist(envelope.atoms[other].position, envelope.atoms[idx].position) < MINDIS);
        if already_saturated {
            continue;
        }

        let Some(parent) = envelope.atoms[idx].parent_atom else {
            continue;
        };

        if parent_symbol(parent) == "H" {
            insert_donor(envelope, idx);
        } else {
            insert_acceptor(envelope, idx, parent_steric(parent));
        }
    }
}

/// A reference normal for the pattern plane, using whatever neighbor(s) the site currently has.
fn site_normal(envelope: &Envelope, idx: usize) -> Point {
    let origin = envelope.atoms[idx].position;
    let neighbors = envelope.neighbors(idx);
    match neighbors.as_slice() {
        [a, b, ..] => plane_normal(origin, envelope.atoms[*a].position, envelope.atoms[*b].position),
        [a] => {
            let dir = vector(origin, envelope.atoms[*a].position).normalize_to(1.0);
            let reference = if dir.z.abs() < 0.9 { Point::new(0.0, 0.0, 1.0) } else { Point::new(1.0, 0.0, 0.0) };
            plane_normal(origin, envelope.atoms[*a].position, origin.add(reference))
        }
        [] => Point::new(0.0, 0.0, 1.0),
    }
}

/// A reference vector perpendicular to `axis`, used as the 0° starting point for the ±120°/
/// tetrahedral sweeps below.
fn perpendicular_reference(axis: Point) -> Point {
    let axis = axis.normalize_to(1.0);
    let seed = if axis.z.abs() < 0.9 { Point::new(0.0, 0.0, 1.0) } else { Point::new(1.0, 0.0, 0.0) };
    plane_normal(Point::default(), axis, seed)
}

fn insert_donor(envelope: &mut Envelope, idx: usize) {
    let origin = envelope.atoms[idx].position;
    let old_neighbors = envelope.neighbors(idx);
    // The inward direction: back toward whatever this docking point used to be linked to, before
    // the donor pattern severs that link and grows its own two arms instead.
    let inward = match old_neighbors.first() {
        Some(&n) => vector(origin, envelope.atoms[n].position).normalize_to(1.0),
        None => site_normal(envelope, idx),
    };
    for n in old_neighbors {
        envelope.unlink(idx, n);
    }
    envelope.promote(idx, Flag::HydroPattern);

    let reference = perpendicular_reference(inward);
    let arm1 = origin.add(rotate(inward, 120.0, reference).normalize_to(DIST_SIMPLE));
    let arm2 = origin.add(rotate(inward, -120.0, reference).normalize_to(DIST_SIMPLE));
    for arm in [arm1, arm2] {
        let leaf = envelope.add_atom(Flag::Linkable, arm, None);
        envelope.link(idx, leaf);
    }
}

fn insert_acceptor(envelope: &mut Envelope, idx: usize, steric: i32) {
    let origin = envelope.atoms[idx].position;
    let normal = site_normal(envelope, idx);
    let inward = normal.scale(-1.0).normalize_to(1.0);

    let partner_pos = origin.add(inward.scale(DIST_ATOM_H));
    let collides = envelope
        .live_indices()
        .into_iter()
        .any(|other| envelope.atoms[other].flag == Flag::HydroPattern && dist(envelope.atoms[other].position, partner_pos) < MINDIS);
    if collides {
        envelope.promote(idx, Flag::Shell);
        return;
    }

    let partner = envelope.add_atom(Flag::HydroPattern, partner_pos, None);
    envelope.link(idx, partner);

    if steric == 3 {
        let reference = perpendicular_reference(inward);
        let arm1 = partner_pos.add(rotate(inward, 120.0, reference).normalize_to(DIST_SIMPLE));
        let arm2 = partner_pos.add(rotate(inward, -120.0, reference).normalize_to(DIST_SIMPLE));
        for arm in [arm1, arm2] {
            let leaf = envelope.add_atom(Flag::Linkable, arm, None);
            envelope.link(partner, leaf);
        }
    } else {
        // Tetrahedral acceptor: three siblings via AX1E3, AX2E2, AX3E1 as named in §4.P.2.
        let base = partner_pos.add(inward.scale(DIST_SIMPLE));
        let reference = perpendicular_reference(inward);
        let second = ax1e3(partner_pos, base, reference, DIST_SIMPLE);
        let third = ax2e2(partner_pos, base, second, DIST_SIMPLE);
        let fourth = ax3e1(partner_pos, base, second, third, DIST_SIMPLE);
        for arm in [second, third, fourth] {
            let leaf = envelope.add_atom(Flag::Linkable, arm, None);
            envelope.link(partner, leaf);
        }
    }
}
