//! Chain growth between one endpoint pair: VSEPR-driven placement, steric rejection, and the
//! three commitable pattern kinds (single atom, carbonyl, aromatic ring). Grounded on
//! `assembly.c`'s `genererChemin`/`insererMotif`/`ajoutProjection`/`addAromaticRing` family.
//!
//! Growth is expressed as an explicit worklist of [`GrowthTask`]s rather than recursion (Design
//! Notes §9: "replace native recursion with an explicit worklist of partial cages keyed by
//! remaining budget"), so a long chain never deepens the call stack.

use crate::config::RunConfig;
use crate::core::geometry::{
    ax1e2, ax2e1, ax2e2, ax3e1, ax1e3, dist, plane_normal, rotate, vector, Point, DIST_ERROR,
    DIST_GAP_CAGE, DIST_GAP_SUBSTRATE, DIST_SIMPLE, NB_ATOMS_IN_CYCLE,
};
use crate::envelope::{Envelope, Flag};
use crate::substrate::Molecule;

/// Distance under which a newly placed cursor is considered to have reached its target endpoint
/// and the chain may close (`SIMPLE + DIST_ERROR` in the source's `MAX_DIST_ARRIVAL` comment).
const TERMINATION_RADIUS: f32 = DIST_SIMPLE + DIST_ERROR;

/// Carries a partial cage's quota counters across successive endpoint-pair bridges within the
/// same assembly: §4.S keeps a chain's ring/carbonyl/size budget running as more pairs get
/// bridged into one connected cage, rather than resetting it per pair.
#[derive(Debug, Clone, Copy)]
pub struct GrowthState {
    pub ring_count: u32,
    pub consecutive_carbonyl: u32,
    pub atoms_added: usize,
    /// Whether the next commit would be the very first of the whole assembly. Gates
    /// `PatternKind::Carbonyl` on `RunConfig::allow_carbonyl_start` (Open Question, §9).
    pub is_first: bool,
}

impl GrowthState {
    /// The state for the first pair bridged into a brand new assembly.
    pub fn fresh() -> Self {
        GrowthState { ring_count: 0, consecutive_carbonyl: 0, atoms_added: 0, is_first: true }
    }
}

/// A chain that closed onto its endpoint, paired with the quota state it closed with so the
/// caller can carry that state into the next pair bridged into the same assembly.
pub struct ClosedChain {
    pub cage: Envelope,
    pub state: GrowthState,
}

/// One in-progress chain, queued for its next placement step.
#[derive(Debug, Clone)]
struct GrowthTask {
    cage: Envelope,
    cursor: usize,
    end: usize,
    consecutive_carbonyl: u32,
    ring_count: u32,
    atoms_added: usize,
    /// Whether this task's placement step would be the chain's very first commit. Gates
    /// `PatternKind::Carbonyl` on `RunConfig::allow_carbonyl_start` (Open Question, §9).
    is_first: bool,
}

/// The three pattern kinds §4.S's chain growth tries at every step.
#[derive(Debug, Clone, Copy)]
enum PatternKind {
    Atom,
    Carbonyl,
    Ring,
}

const PATTERN_KINDS: [PatternKind; 3] = [PatternKind::Atom, PatternKind::Carbonyl, PatternKind::Ring];

/// True iff `p` clears `DIST_GAP_CAGE` from every non-SHELL cage atom and `DIST_GAP_SUBSTRATE`
/// from every substrate atom. Mirrors `isHindered`, inverted (this returns `false` when the
/// source would call the point hindered).
pub fn clears_gaps(cage: &Envelope, p: Point, substrate: &Molecule) -> bool {
    for idx in cage.live_indices() {
        if cage.atoms[idx].flag == Flag::Shell {
            continue;
        }
        if dist(cage.atoms[idx].position, p) < DIST_GAP_CAGE {
            return false;
        }
    }
    for atom in &substrate.atoms {
        if dist(atom.position, p) < DIST_GAP_SUBSTRATE {
            return false;
        }
    }
    true
}

/// One or two candidate next-atom positions, chosen by `cursor`'s current ligand count (and, for
/// the two-neighbor case, its flag/neighbor composition).
enum Placement {
    Single(Point),
    Double(Point, Point),
}

/// `projectionOCN_AX1E3`: 12 positions sampled by rotating the reference normal in 30° steps
/// about the cursor-neighbor axis, keeping only those that clear the steric gap, and returning
/// the single survivor closest to `end_pos`.
fn one_neighbor_candidate(cage: &Envelope, cursor: usize, end_pos: Point, substrate: &Molecule) -> Option<Point> {
    let neighbors = cage.neighbors(cursor);
    let v1_idx = *neighbors.first()?;
    let dpt = cage.atoms[cursor].position;
    let v1 = cage.atoms[v1_idx].position;

    let v1_neighbors = cage.neighbors(v1_idx);
    let x2 = v1_neighbors
        .iter()
        .copied()
        .find(|&n| n != cursor)
        .map(|n| cage.atoms[n].position)
        .unwrap_or_else(|| {
            let dir = vector(dpt, v1).normalize_to(1.0);
            let seed = if dir.z.abs() < 0.9 { Point::new(0.0, 0.0, 1.0) } else { Point::new(1.0, 0.0, 0.0) };
            v1.add(seed)
        });

    let mut normal = plane_normal(dpt, v1, x2);
    let axis = vector(dpt, v1).normalize_to(1.0);

    let mut best: Option<(f32, Point)> = None;
    for _ in 0..12 {
        let candidate = ax1e3(dpt, v1, normal, DIST_SIMPLE);
        if clears_gaps(cage, candidate, substrate) {
            let d = dist(candidate, end_pos);
            if best.map(|(best_d, _)| d < best_d).unwrap_or(true) {
                best = Some((d, candidate));
            }
        }
        normal = rotate(axis, 30.0, normal);
    }
    best.map(|(_, p)| p)
}

/// Routes to the right VSEPR placement operator(s) by `cursor`'s current neighbor count (and, at
/// two neighbors, whether it is a nitrogen or a carbon with/without an oxygen neighbor).
fn placement_for_cursor(cage: &Envelope, cursor: usize, end_pos: Point, substrate: &Molecule) -> Option<Placement> {
    let neighbors = cage.neighbors(cursor);
    match neighbors.len() {
        1 => one_neighbor_candidate(cage, cursor, end_pos, substrate).map(Placement::Single),
        2 => {
            let dpt = cage.atoms[cursor].position;
            let x1 = cage.atoms[neighbors[0]].position;
            let x2 = cage.atoms[neighbors[1]].position;

            if cage.atoms[cursor].flag == Flag::Nitrogen {
                let p = ax2e2(dpt, x1, x2, DIST_SIMPLE);
                return clears_gaps(cage, p, substrate).then_some(Placement::Single(p));
            }

            let has_oxygen_neighbor = neighbors.iter().any(|&n| cage.atoms[n].flag == Flag::Oxygen);
            if has_oxygen_neighbor {
                let p = ax2e1(dpt, x1, x2, DIST_SIMPLE);
                return clears_gaps(cage, p, substrate).then_some(Placement::Single(p));
            }

            let p1 = ax2e2(dpt, x1, x2, DIST_SIMPLE);
            let p2 = ax3e1(dpt, x1, x2, p1, DIST_SIMPLE);
            let c1 = clears_gaps(cage, p1, substrate).then_some(p1);
            let c2 = clears_gaps(cage, p2, substrate).then_some(p2);
            match (c1, c2) {
                (Some(a), Some(b)) => Some(Placement::Double(a, b)),
                (Some(a), None) | (None, Some(a)) => Some(Placement::Single(a)),
                (None, None) => None,
            }
        }
        3 => {
            let dpt = cage.atoms[cursor].position;
            let x1 = cage.atoms[neighbors[0]].position;
            let x2 = cage.atoms[neighbors[1]].position;
            let x3 = cage.atoms[neighbors[2]].position;
            let p = ax3e1(dpt, x1, x2, x3, DIST_SIMPLE);
            clears_gaps(cage, p, substrate).then_some(Placement::Single(p))
        }
        _ => None,
    }
}

/// One committed branch: the extended cage copy, its new cursor, how many atoms it added, and
/// whether that commit counts toward the carbonyl/ring quotas.
struct Commit {
    cage: Envelope,
    cursor: usize,
    atoms_added: usize,
    is_carbonyl: bool,
    is_ring: bool,
}

fn commit_atom(task: &GrowthTask, p: Point) -> Vec<Commit> {
    let mut cage = task.cage.clone();
    let id = cage.add_atom(Flag::Carbon, p, None);
    cage.link(task.cursor, id);
    vec![Commit { cage, cursor: id, atoms_added: 1, is_carbonyl: false, is_ring: false }]
}

/// `ajoutMotif3`/`addAromaticRing`'s carbonyl sibling: places the carbon at `p`, then tries both
/// in-plane oxygen positions independently, yielding up to two branches (one per oxygen
/// position that clears the steric gap). The carbon, not the oxygen, is the surviving cursor —
/// the oxygen is a saturated pendant, matching `ajoutMotif3`'s `LSTd_addElement(nvDepart, id)`.
fn commit_carbonyl(task: &GrowthTask, p: Point, substrate: &Molecule) -> Vec<Commit> {
    let dpt = task.cage.atoms[task.cursor].position;
    let Some(&neighbor_idx) = task.cage.neighbors(task.cursor).first() else {
        return Vec::new();
    };
    let v1 = task.cage.atoms[neighbor_idx].position;

    let normal = plane_normal(p, dpt, v1);
    let o1 = ax1e2(p, dpt, normal, DIST_SIMPLE);
    let o2 = ax2e1(p, dpt, o1, DIST_SIMPLE);

    let mut out = Vec::new();
    for o_pos in [o1, o2] {
        let mut cage = task.cage.clone();
        let c_id = cage.add_atom(Flag::Carbon, p, None);
        cage.link(task.cursor, c_id);
        if !clears_gaps(&cage, o_pos, substrate) {
            continue;
        }
        let o_id = cage.add_atom(Flag::Oxygen, o_pos, None);
        cage.link(c_id, o_id);
        out.push(Commit { cage, cursor: c_id, atoms_added: 2, is_carbonyl: true, is_ring: false });
    }
    out
}

/// `addAromaticRing`: one branch per existing neighbor of `cursor` (each gives a different plane
/// to orient the ring against), laying out six ring carbons by successive `AX1E2` steps and a
/// seventh scaffold atom continuing the chain from the ring's para position.
fn commit_ring(task: &GrowthTask, p: Point, substrate: &Molecule) -> Vec<Commit> {
    let dpt = task.cage.atoms[task.cursor].position;
    let mut out = Vec::new();

    for v1_neighbor in task.cage.neighbors(task.cursor) {
        let v1 = task.cage.atoms[v1_neighbor].position;
        let mut cage = task.cage.clone();
        let id = cage.add_atom(Flag::Carbon, p, None);
        cage.link(task.cursor, id);

        let axis = vector(p, dpt).normalize_to(1.0);
        let normal = rotate(axis, 90.0, plane_normal(p, dpt, v1));

        let reference = ax1e2(p, dpt, normal, DIST_SIMPLE);
        let mut pos = ax2e1(p, dpt, reference, DIST_SIMPLE);
        if !clears_gaps(&cage, pos, substrate) {
            continue;
        }
        let mut prev = cage.add_atom(Flag::Carbon, pos, None);
        cage.link(id, prev);

        let mut para: Option<(usize, Point)> = None;
        let mut failed = false;
        for i in 0..4 {
            let Some(&prev_neighbor) = cage.neighbors(prev).first() else {
                failed = true;
                break;
            };
            let prev_neighbor_pos = cage.atoms[prev_neighbor].position;
            pos = ax1e2(pos, prev_neighbor_pos, normal, DIST_SIMPLE);
            if !clears_gaps(&cage, pos, substrate) {
                failed = true;
                break;
            }
            let next = cage.add_atom(Flag::Carbon, pos, None);
            cage.link(prev, next);
            if i == 1 {
                para = Some((next, pos));
            }
            prev = next;
        }
        if failed {
            continue;
        }
        cage.link(id, prev);

        let Some((para_idx, para_pos)) = para else { continue };
        let para_neighbors = cage.neighbors(para_idx);
        if para_neighbors.len() < 2 {
            continue;
        }
        let v1p = cage.atoms[para_neighbors[0]].position;
        let v2p = cage.atoms[para_neighbors[1]].position;
        let scaffold_pos = ax2e1(para_pos, v1p, v2p, DIST_SIMPLE);
        if !clears_gaps(&cage, scaffold_pos, substrate) {
            continue;
        }
        let scaffold = cage.add_atom(Flag::Carbon, scaffold_pos, None);
        cage.link(para_idx, scaffold);

        out.push(Commit {
            cage,
            cursor: scaffold,
            atoms_added: NB_ATOMS_IN_CYCLE,
            is_carbonyl: false,
            is_ring: true,
        });
    }
    out
}

fn commit_pattern(task: &GrowthTask, kind: PatternKind, p: Point, substrate: &Molecule) -> Vec<Commit> {
    match kind {
        PatternKind::Atom => commit_atom(task, p),
        PatternKind::Carbonyl => commit_carbonyl(task, p, substrate),
        PatternKind::Ring => commit_ring(task, p, substrate),
    }
}

/// Unlinks any neighbor of `idx` still flagged `Shell`. A cheap no-op safety net: the outer
/// synthesis driver already strips every SHELL atom from the whole envelope before endpoint
/// selection, so this should never find anything, but the source strips the start vertex's
/// envelope neighbors again locally in `assemblage` and this mirrors that belt-and-suspenders.
fn strip_shell_neighbors(cage: &mut Envelope, idx: usize) {
    let shell_neighbors: Vec<usize> = cage.neighbors(idx).into_iter().filter(|&n| cage.atoms[n].flag == Flag::Shell).collect();
    for n in shell_neighbors {
        cage.unlink(idx, n);
    }
}

/// Grows every chain between `start` and `end`, starting `start` as element `start_flag`, up to
/// `config`'s quotas (continuing from `state`, the quota counters carried from whatever pairs
/// were already bridged into this assembly). Returns every cage copy that successfully closed
/// the chain onto `end`, each carrying the state it closed with.
pub fn grow_pair(
    mut cage: Envelope,
    start: usize,
    end: usize,
    start_flag: Flag,
    substrate: &Molecule,
    config: &RunConfig,
    state: GrowthState,
) -> Vec<ClosedChain> {
    cage.promote(start, start_flag);
    strip_shell_neighbors(&mut cage, start);

    let mut worklist = vec![GrowthTask {
        cage,
        cursor: start,
        end,
        consecutive_carbonyl: state.consecutive_carbonyl,
        ring_count: state.ring_count,
        atoms_added: state.atoms_added,
        is_first: state.is_first,
    }];
    let mut closed = Vec::new();

    while let Some(task) = worklist.pop() {
        let end_pos = task.cage.atoms[task.end].position;
        let Some(placement) = placement_for_cursor(&task.cage, task.cursor, end_pos, substrate) else {
            continue;
        };
        let positions: Vec<Point> = match placement {
            Placement::Single(p) => vec![p],
            Placement::Double(a, b) => vec![a, b],
        };

        for p in positions {
            for kind in PATTERN_KINDS {
                if task.is_first && matches!(kind, PatternKind::Carbonyl) && !config.allow_carbonyl_start {
                    continue;
                }
                for commit in commit_pattern(&task, kind, p, substrate) {
                    let atoms_added = task.atoms_added + commit.atoms_added;
                    if atoms_added > config.size_max {
                        continue;
                    }
                    let ring_count = task.ring_count + u32::from(commit.is_ring);
                    if ring_count > 2 {
                        continue;
                    }
                    let consecutive_carbonyl = if commit.is_carbonyl { task.consecutive_carbonyl + 1 } else { 0 };
                    if consecutive_carbonyl > 4 {
                        continue;
                    }

                    let new_cursor_pos = commit.cage.atoms[commit.cursor].position;
                    let reached_end = dist(new_cursor_pos, end_pos) < TERMINATION_RADIUS;
                    let may_close = reached_end && (!config.require_aromatic_in_chain || ring_count > 0);

                    if may_close {
                        let mut closing = commit.cage;
                        closing.link(commit.cursor, task.end);
                        closed.push(ClosedChain {
                            cage: closing,
                            state: GrowthState { ring_count, consecutive_carbonyl, atoms_added, is_first: false },
                        });
                    } else {
                        worklist.push(GrowthTask {
                            cage: commit.cage,
                            cursor: commit.cursor,
                            end: task.end,
                            consecutive_carbonyl,
                            ring_count,
                            atoms_added,
                            is_first: false,
                        });
                    }
                }
            }
        }
    }

    closed
}
