//! The envelope (Shell): a cloud of candidate docking points wrapping the substrate, promoted
//! through pattern insertion into concrete motifs. Grounded on `structureShl.c`.

pub mod expansion;
pub mod pattern;

use std::collections::HashSet;

use crate::core::geometry::Point;
use crate::core::graph::{Graph, SlotList};

pub use expansion::{AlphaShapeProvider, DistanceCutoffAlphaShape};

/// Promotion priority of an envelope atom. Ordered so `flag-monotone` (§8) can be checked with a
/// plain `<` comparison: a flag only ever moves later in this list during a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Flag {
    NotDef,
    Shell,
    Linkable,
    Cycle,
    HydroPattern,
    Oxygen,
    Nitrogen,
    Carbon,
    Hydrogen,
}

/// One slot in the envelope's atom array. A removed atom is tombstoned to `Flag::NotDef` rather
/// than shifted out, so every other atom's index — and therefore every `SlotList`/`Graph` entry
/// pointing at it — stays valid.
#[derive(Debug, Clone)]
pub struct EnvelopeAtom {
    pub flag: Flag,
    pub position: Point,
    /// Stable index into the substrate's atom array this candidate was generated from, if any
    /// (synthesized pattern atoms have none).
    pub parent_atom: Option<usize>,
    pub neighbors: SlotList,
}

impl EnvelopeAtom {
    fn tombstone() -> Self {
        EnvelopeAtom {
            flag: Flag::NotDef,
            position: Point::default(),
            parent_atom: None,
            neighbors: SlotList::new(),
        }
    }
}

/// The envelope: an index-stable array of candidate/pattern atoms, their cycle membership, and
/// the hydrogen-bond-exclusion dependency graph (vertices are envelope atom indices).
#[derive(Debug, Clone, Default)]
pub struct Envelope {
    pub atoms: Vec<EnvelopeAtom>,
    pub cyclic: HashSet<usize>,
    pub dependency_graph: Graph,
}

impl Envelope {
    pub fn new() -> Self {
        Envelope::default()
    }

    /// Appends a new atom, returning its index. Reuses a tombstoned slot if one exists, matching
    /// the source's sentinel-slot reuse discipline.
    pub fn add_atom(&mut self, flag: Flag, position: Point, parent_atom: Option<usize>) -> usize {
        if let Some(idx) = self.atoms.iter().position(|a| a.flag == Flag::NotDef) {
            self.atoms[idx] = EnvelopeAtom {
                flag,
                position,
                parent_atom,
                neighbors: SlotList::new(),
            };
            return idx;
        }
        self.atoms.push(EnvelopeAtom {
            flag,
            position,
            parent_atom,
            neighbors: SlotList::new(),
        });
        self.atoms.len() - 1
    }

    pub fn link(&mut self, a: usize, b: usize) {
        if a == b {
            return;
        }
        self.atoms[a].neighbors.add(b as i32);
        self.atoms[b].neighbors.add(a as i32);
    }

    pub fn unlink(&mut self, a: usize, b: usize) {
        self.atoms[a].neighbors.remove(b as i32);
        self.atoms[b].neighbors.remove(a as i32);
    }

    pub fn neighbors(&self, idx: usize) -> Vec<usize> {
        self.atoms[idx].neighbors.iter().map(|n| n as usize).collect()
    }

    pub fn degree(&self, idx: usize) -> usize {
        self.atoms[idx].neighbors.len()
    }

    pub fn is_cyclic(&self, idx: usize) -> bool {
        self.cyclic.contains(&idx)
    }

    /// Raises `idx`'s flag to `at_least` if it is currently lower. Never lowers a flag.
    pub fn promote(&mut self, idx: usize, at_least: Flag) {
        if self.atoms[idx].flag < at_least {
            self.atoms[idx].flag = at_least;
        }
    }

    /// Removes an atom: unlinks every neighbor, drops its dependency-graph vertex and cycle
    /// membership, and tombstones its slot so no other index shifts.
    pub fn remove_atom(&mut self, idx: usize) {
        for neighbor in self.neighbors(idx) {
            self.atoms[neighbor].neighbors.remove(idx as i32);
        }
        self.dependency_graph.remove_vertex(idx as i32);
        self.cyclic.remove(&idx);
        self.atoms[idx] = EnvelopeAtom::tombstone();
    }

    /// Merges `eaten` into `survivor`: `survivor` keeps its own coordinates, inherits every edge
    /// `eaten` had, inherits `eaten`'s parent-atom back-reference and cycle membership, and its
    /// flag becomes `max(survivor.flag, eaten.flag)`. `eaten` is then removed. Mirrors
    /// `SHL_mergeAtom`.
    pub fn merge_atom(&mut self, survivor: usize, eaten: usize) {
        if survivor == eaten {
            return;
        }
        for neighbor in self.neighbors(eaten) {
            if neighbor != survivor {
                self.link(survivor, neighbor);
            }
        }
        if self.atoms[eaten].parent_atom.is_some() {
            self.atoms[survivor].parent_atom = self.atoms[eaten].parent_atom;
        }
        if self.cyclic.contains(&eaten) {
            self.cyclic.insert(survivor);
        }
        let eaten_flag = self.atoms[eaten].flag;
        self.promote(survivor, eaten_flag);
        self.remove_atom(eaten);
    }

    pub fn live_indices(&self) -> Vec<usize> {
        (0..self.atoms.len()).filter(|&i| self.atoms[i].flag != Flag::NotDef).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remove_atom_clears_neighbor_links() {
        let mut env = Envelope::new();
        let a = env.add_atom(Flag::Shell, Point::default(), None);
        let b = env.add_atom(Flag::Shell, Point::default(), None);
        env.link(a, b);
        env.remove_atom(a);
        assert!(env.neighbors(b).is_empty());
        assert_eq!(env.atoms[a].flag, Flag::NotDef);
    }

    #[test]
    fn merge_atom_keeps_survivor_coordinates_and_rewires_edges() {
        let mut env = Envelope::new();
        let survivor = env.add_atom(Flag::Linkable, Point::new(1.0, 0.0, 0.0), None);
        let eaten = env.add_atom(Flag::Shell, Point::new(2.0, 0.0, 0.0), Some(7));
        let other = env.add_atom(Flag::Shell, Point::new(3.0, 0.0, 0.0), None);
        env.link(eaten, other);

        env.merge_atom(survivor, eaten);

        assert_eq!(env.atoms[survivor].position, Point::new(1.0, 0.0, 0.0));
        assert!(env.neighbors(survivor).contains(&other));
        assert_eq!(env.atoms[survivor].parent_atom, Some(7));
        assert_eq!(env.atoms[eaten].flag, Flag::NotDef);
    }

    #[test]
    fn add_atom_reuses_tombstoned_slots() {
        let mut env = Envelope::new();
        let a = env.add_atom(Flag::Shell, Point::default(), None);
        env.remove_atom(a);
        let b = env.add_atom(Flag::Linkable, Point::default(), None);
        assert_eq!(a, b);
    }

    #[test]
    fn flag_ordering_is_monotone() {
        assert!(Flag::Shell < Flag::Linkable);
        assert!(Flag::Linkable < Flag::Cycle);
        assert!(Flag::Cycle < Flag::HydroPattern);
    }
}
