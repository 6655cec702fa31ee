//! Path synthesis: finds LINKABLE endpoint pairs in different connected components and grows
//! covalent chains between them via a worklist of partial cages. Grounded on `assembly.c`.

pub mod growth;

use crate::config::RunConfig;
use crate::core::geometry::dist_manhattan;
use crate::envelope::{Envelope, Flag};
use crate::substrate::Molecule;
use crate::voxel::{dist_with_obstacles, VoxelGrid};

/// Strips every SHELL-flagged atom from the envelope, as the first step of endpoint selection.
pub fn strip_shell(envelope: &mut Envelope) {
    let shells: Vec<usize> = envelope.live_indices().into_iter().filter(|&i| envelope.atoms[i].flag == Flag::Shell).collect();
    for idx in shells {
        envelope.remove_atom(idx);
    }
}

/// Assigns every live atom a group id via DFS over the current adjacency (SHELL atoms should
/// already be stripped, but the DFS itself works on whatever edges remain regardless).
fn group_ids(envelope: &Envelope) -> Vec<i64> {
    let mut groups = vec![-1i64; envelope.atoms.len()];
    let mut next_group = 0i64;
    for start in envelope.live_indices() {
        if groups[start] != -1 {
            continue;
        }
        let mut stack = vec![start];
        groups[start] = next_group;
        while let Some(cur) = stack.pop() {
            for n in envelope.neighbors(cur) {
                if groups[n] == -1 {
                    groups[n] = next_group;
                    stack.push(n);
                }
            }
        }
        next_group += 1;
    }
    groups
}

/// An unordered pair of LINKABLE atoms in different connected components.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EndpointPair {
    pub start: usize,
    pub end: usize,
}

/// Every LINKABLE/LINKABLE cross-group pair, optionally ordered by obstacle-aware distance
/// (`NoPath` sorting last via `+∞`, so unreachable pairs are deprioritized rather than erroring).
pub fn candidate_pairs(envelope: &Envelope, grid: Option<&mut VoxelGrid>) -> Vec<EndpointPair> {
    let groups = group_ids(envelope);
    let linkable: Vec<usize> = envelope.live_indices().into_iter().filter(|&i| envelope.atoms[i].flag == Flag::Linkable).collect();

    let mut pairs = Vec::new();
    for a in 0..linkable.len() {
        for b in (a + 1)..linkable.len() {
            let (i, j) = (linkable[a], linkable[b]);
            if groups[i] != groups[j] {
                pairs.push(EndpointPair { start: i, end: j });
            }
        }
    }

    if let Some(grid) = grid {
        let mut keyed: Vec<(f32, EndpointPair)> = pairs
            .into_iter()
            .map(|p| {
                let d = dist_with_obstacles(grid, envelope.atoms[p.start].position, envelope.atoms[p.end].position)
                    .unwrap_or(f32::INFINITY);
                (d, p)
            })
            .collect();
        keyed.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap());
        pairs = keyed.into_iter().map(|(_, p)| p).collect();
    }

    pairs
}

/// One fully synthesized cage: the envelope (with SHELL atoms stripped and every closed chain
/// linked in), connecting every LINKABLE group into one piece, plus the endpoint pairs bridged
/// to get there, for reporting.
#[derive(Debug, Clone)]
pub struct CageAssembly {
    pub envelope: Envelope,
    pub endpoints: Vec<EndpointPair>,
}

/// A cage still being assembled: the partial envelope, the quota state its last-grown chain
/// closed with, and the endpoint pairs already bridged into it.
struct PartialCage {
    envelope: Envelope,
    state: growth::GrowthState,
    bridged: Vec<EndpointPair>,
}

/// The top-level path-synthesis driver (§4.S): strips SHELL atoms, then works an explicit
/// worklist of partial cages. For each partial cage popped off the worklist, candidate endpoint
/// pairs are recomputed from its *current* state; if none remain, every LINKABLE group has been
/// joined into one piece and the cage is emitted. Otherwise the nearest remaining pair is bridged
/// via [`growth::grow_pair`] and every chain that closes it is re-queued, carrying its quota
/// state forward, so a cage is only ever emitted once it is fully connected.
pub fn synthesize(
    mut envelope: Envelope,
    substrate: &Molecule,
    config: &RunConfig,
    mut grid: Option<&mut VoxelGrid>,
) -> Vec<CageAssembly> {
    strip_shell(&mut envelope);

    // §4.S: every allowed start element is tried per pair (OXYGEN only when allow_carbonyl_start
    // is set, since an oxygen start is otherwise indistinguishable from a carbonyl-start chain).
    let mut start_flags = vec![Flag::Nitrogen, Flag::Carbon];
    if config.allow_carbonyl_start {
        start_flags.push(Flag::Oxygen);
    }

    let mut results = Vec::new();
    let mut worklist = vec![PartialCage { envelope, state: growth::GrowthState::fresh(), bridged: Vec::new() }];

    while let Some(partial) = worklist.pop() {
        if results.len() >= config.max_results {
            break;
        }

        let pairs = candidate_pairs(&partial.envelope, grid.as_deref_mut());
        let Some(&pair) = pairs.first() else {
            results.push(CageAssembly { envelope: partial.envelope, endpoints: partial.bridged });
            continue;
        };

        for &start_flag in &start_flags {
            let closed = growth::grow_pair(partial.envelope.clone(), pair.start, pair.end, start_flag, substrate, config, partial.state);
            for chain in closed {
                let mut bridged = partial.bridged.clone();
                bridged.push(pair);
                worklist.push(PartialCage { envelope: chain.cage, state: chain.state, bridged });
            }
        }
    }
    results
}

/// Quick reject used before any placement: `cursor` must clear both the non-SHELL cage atoms and
/// every substrate atom by the gap constants. Kept here (rather than in `growth`) since it is
/// also used by the endpoint-distance prefilter. Actual gap checks against real geometry live in
/// `growth::clears_gaps`; this helper only orders candidates cheaply by a rough proxy distance.
pub fn rough_distance(a: crate::core::geometry::Point, b: crate::core::geometry::Point) -> f32 {
    dist_manhattan(a, b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::geometry::Point;

    #[test]
    fn strip_shell_removes_only_shell_atoms() {
        let mut env = Envelope::new();
        let shell = env.add_atom(Flag::Shell, Point::default(), None);
        let linkable = env.add_atom(Flag::Linkable, Point::default(), None);
        strip_shell(&mut env);
        assert_eq!(env.atoms[shell].flag, Flag::NotDef);
        assert_eq!(env.atoms[linkable].flag, Flag::Linkable);
    }

    #[test]
    fn candidate_pairs_only_crosses_groups() {
        let mut env = Envelope::new();
        let a = env.add_atom(Flag::Linkable, Point::new(0.0, 0.0, 0.0), None);
        let b = env.add_atom(Flag::Linkable, Point::new(1.0, 0.0, 0.0), None);
        env.link(a, b);
        let c = env.add_atom(Flag::Linkable, Point::new(10.0, 0.0, 0.0), None);

        let pairs = candidate_pairs(&env, None);
        assert_eq!(pairs.len(), 1);
        assert!(pairs[0] == EndpointPair { start: a, end: c } || pairs[0] == EndpointPair { start: c, end: a });
    }
}
