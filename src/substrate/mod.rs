//! Substrate analysis: bond detection, cycle membership, lone-pair inference, and the
//! hydrogen-bond-alternative dependency graph. Grounded on `initialization.c` and
//! `structureMol.c`.

use std::collections::{HashMap, HashSet};

use crate::core::error::CageError;
use crate::core::geometry::{angle, dist, Point};
use crate::core::graph::{seek_cycle, Graph};

/// `symbol -> covalent radius, in centi-ångström` (e.g. `"C" -> 77`).
pub type RadiusTable = HashMap<String, i32>;

/// Additive bond-detection tolerance, in centi-ångström (0.20 Å).
const BOND_TOLERANCE_CENTI: f32 = 20.0;

/// An atom of the fixed substrate, after analysis.
#[derive(Debug, Clone)]
pub struct Atom {
    pub symbol: String,
    pub position: Point,
    pub radius_centi: i32,
    pub neighbors: Vec<usize>,
    /// `-1` while unresolved mid-inference; always `>= 0` once `analyze` returns.
    pub lone_pairs: i32,
}

impl Atom {
    pub fn ligands(&self) -> usize {
        self.neighbors.len()
    }

    /// Steric number: ligands plus lone pairs. Only meaningful once lone-pair inference has run.
    pub fn steric(&self) -> i32 {
        self.ligands() as i32 + self.lone_pairs
    }
}

/// The analyzed fixed substrate: atoms, their cycle membership, and the hydrogen-bond-exclusion
/// dependency graph.
#[derive(Debug, Clone)]
pub struct Molecule {
    pub atoms: Vec<Atom>,
    pub cyclic: HashSet<usize>,
    /// Vertices are atom indices (cast to `i32`); an edge means the two sites are mutually
    /// exclusive hydrogen-bond alternatives.
    pub dependency_graph: Graph,
}

impl Molecule {
    pub fn is_cyclic(&self, atom: usize) -> bool {
        self.cyclic.contains(&atom)
    }

    /// Average angle, in degrees, over every unordered pair of `atom`'s neighbors; `0.0` when
    /// fewer than two neighbors exist.
    pub fn average_neighbor_angle(&self, atom: usize) -> f32 {
        let neighbors = &self.atoms[atom].neighbors;
        if neighbors.len() < 2 {
            return 0.0;
        }
        let center = self.atoms[atom].position;
        let mut sum = 0.0;
        let mut count = 0;
        for i in 0..neighbors.len() {
            for j in (i + 1)..neighbors.len() {
                sum += angle(center, self.atoms[neighbors[i]].position, self.atoms[neighbors[j]].position);
                count += 1;
            }
        }
        if count == 0 {
            0.0
        } else {
            sum / count as f32
        }
    }
}

fn is_halogen(symbol: &str) -> bool {
    matches!(symbol, "Cl" | "Br" | "F" | "I")
}

/// Detects bonds between every atom pair, builds the cycle set, infers lone pairs in two passes,
/// and constructs the hydrogen-bond-exclusion dependency graph.
pub fn analyze(symbols: Vec<String>, positions: Vec<Point>, radii: &RadiusTable) -> Result<Molecule, CageError> {
    let mut radius_centi = Vec::with_capacity(symbols.len());
    for symbol in &symbols {
        let r = radii.get(symbol.as_str()).copied().ok_or_else(|| CageError::TypeUnknown {
            symbol: symbol.clone(),
        })?;
        radius_centi.push(r);
    }

    let n = symbols.len();
    let mut neighbors = vec![Vec::new(); n];
    for i in 0..n {
        for j in (i + 1)..n {
            let d_centi = dist(positions[i], positions[j]) * 100.0;
            let threshold = BOND_TOLERANCE_CENTI + radius_centi[i] as f32 + radius_centi[j] as f32;
            if d_centi <= threshold {
                neighbors[i].push(j);
                neighbors[j].push(i);
            }
        }
    }

    let mut bond_graph = Graph::new();
    for i in 0..n {
        bond_graph.add_vertex(i as i32);
    }
    for i in 0..n {
        for &j in &neighbors[i] {
            bond_graph.add_edge(i as i32, j as i32);
        }
    }
    let cyclic: HashSet<usize> = seek_cycle(&bond_graph).into_iter().map(|id| id as usize).collect();

    let mut atoms: Vec<Atom> = (0..n)
        .map(|i| Atom {
            symbol: symbols[i].clone(),
            position: positions[i],
            radius_centi: radius_centi[i],
            neighbors: neighbors[i].clone(),
            lone_pairs: 0,
        })
        .collect();

    infer_lone_pairs(&mut atoms, &cyclic);

    let mut dependency_graph = Graph::new();
    for i in 0..n {
        let symbol = atoms[i].symbol.as_str();
        if !matches!(symbol, "O" | "N" | "F") || atoms[i].lone_pairs < 1 {
            continue;
        }
        let mut group: Vec<i32> = vec![i as i32];
        for &nb in &atoms[i].neighbors {
            if atoms[nb].symbol == "H" {
                group.push(nb as i32);
            }
        }
        for &v in &group {
            dependency_graph.add_vertex(v);
        }
        for a in 0..group.len() {
            for b in (a + 1)..group.len() {
                dependency_graph.add_edge(group[a], group[b]);
            }
        }
    }

    Ok(Molecule {
        atoms,
        cyclic,
        dependency_graph,
    })
}

const LONE_PAIRS_UNRESOLVED: i32 = -1;

/// The neighbor-steric-number scan used both by the degree-1 "otherwise" rule and by pass-2
/// resolution of the ambiguous cyclic/109° case: the last non-trigonal neighbor steric number
/// seen while scanning, or `3` if any neighbor is trigonal.
fn scan_neighbor_steric(atom: usize, atoms: &[Atom]) -> i32 {
    let mut chosen = 0;
    let mut any_trigonal = false;
    for &nb in &atoms[atom].neighbors {
        let steric = atoms[nb].steric();
        if steric == 3 {
            any_trigonal = true;
        } else {
            chosen = steric;
        }
    }
    if any_trigonal {
        3
    } else {
        chosen
    }
}

fn first_pass_rule(i: usize, atoms: &[Atom], cyclic: &HashSet<usize>) -> i32 {
    let ligands = atoms[i].ligands();
    if ligands == 0 {
        return 0;
    }
    if ligands == 1 {
        let symbol = atoms[i].symbol.as_str();
        return if symbol == "H" {
            1
        } else if is_halogen(symbol) {
            3
        } else {
            scan_neighbor_steric(i, atoms) - 1
        };
    }
    if ligands == 4 {
        return 0;
    }

    let alpha = {
        // inline average-neighbor-angle without building a Molecule wrapper yet
        let neighbors = &atoms[i].neighbors;
        let center = atoms[i].position;
        let mut sum = 0.0;
        let mut count = 0;
        for a in 0..neighbors.len() {
            for b in (a + 1)..neighbors.len() {
                sum += angle(center, atoms[neighbors[a]].position, atoms[neighbors[b]].position);
                count += 1;
            }
        }
        if count == 0 {
            0.0
        } else {
            sum / count as f32
        }
    };

    if (alpha - 120.0).abs() < 4.0 {
        3 - ligands as i32
    } else if alpha - 109.0 < 7.0 {
        if cyclic.contains(&i) {
            LONE_PAIRS_UNRESOLVED
        } else {
            4 - ligands as i32
        }
    } else {
        0
    }
}

/// Two-pass lone-pair inference: pass one applies every rule that doesn't need a neighbor's
/// final steric number; pass two resolves the atoms pass one deferred (degree-1 "otherwise" and
/// the cyclic/109°-ambiguous case), now that every neighbor's pass-one value is stable.
fn infer_lone_pairs(atoms: &mut [Atom], cyclic: &HashSet<usize>) {
    let n = atoms.len();
    for i in 0..n {
        atoms[i].lone_pairs = first_pass_rule(i, atoms, cyclic);
    }
    for i in 0..n {
        if atoms[i].lone_pairs == LONE_PAIRS_UNRESOLVED {
            let ligands = atoms[i].ligands() as i32;
            atoms[i].lone_pairs = if scan_neighbor_steric(i, atoms) == 3 {
                3 - ligands
            } else {
                4 - ligands
            };
        } else if atoms[i].ligands() == 1 && !is_halogen(&atoms[i].symbol) && atoms[i].symbol != "H" {
            atoms[i].lone_pairs = scan_neighbor_steric(i, atoms) - 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn radii() -> RadiusTable {
        let mut r = RadiusTable::new();
        r.insert("C".to_string(), 77);
        r.insert("O".to_string(), 66);
        r.insert("H".to_string(), 31);
        r.insert("N".to_string(), 70);
        r
    }

    #[test]
    fn single_carbon_has_no_ligands_or_lone_pairs() {
        let mol = analyze(vec!["C".to_string()], vec![Point::splat(0.0)], &radii()).unwrap();
        assert_eq!(mol.atoms[0].ligands(), 0);
        assert_eq!(mol.atoms[0].lone_pairs, 0);
    }

    #[test]
    fn two_bonded_carbons_detect_one_bond() {
        let mol = analyze(
            vec!["C".to_string(), "C".to_string()],
            vec![Point::new(0.0, 0.0, 0.0), Point::new(1.4, 0.0, 0.0)],
            &radii(),
        )
        .unwrap();
        assert_eq!(mol.atoms[0].neighbors, vec![1]);
        assert_eq!(mol.atoms[1].neighbors, vec![0]);
    }

    #[test]
    fn water_has_no_cycles_and_full_dependency_triangle() {
        let mol = analyze(
            vec!["O".to_string(), "H".to_string(), "H".to_string()],
            vec![
                Point::new(0.0, 0.0, 0.0),
                Point::new(0.96, 0.0, 0.0),
                Point::new(-0.24, 0.93, 0.0),
            ],
            &radii(),
        )
        .unwrap();
        assert!(mol.cyclic.is_empty());
        assert!(mol.dependency_graph.has_edge(0, 1));
        assert!(mol.dependency_graph.has_edge(0, 2));
        assert!(mol.dependency_graph.has_edge(1, 2));
    }

    #[test]
    fn unreferenced_symbol_is_a_type_unknown_error() {
        let err = analyze(vec!["Xx".to_string()], vec![Point::splat(0.0)], &radii()).unwrap_err();
        assert!(matches!(err, CageError::TypeUnknown { .. }));
    }
}
