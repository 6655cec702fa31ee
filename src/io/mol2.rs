//! TRIPOS MOL2 output: per-cage writer plus the whole-run substrate/envelope dump files. Grounded
//! on `ecriture.c`'s `ecritureMol2` family.

use std::fmt::Write as _;

use crate::core::geometry::Point;
use crate::envelope::{Envelope, Flag};
use crate::substrate::Molecule;

/// Chooses the MOL2 element symbol for one envelope atom, per §6's flag → symbol table.
fn element_symbol(envelope: &Envelope, idx: usize) -> &'static str {
    match envelope.atoms[idx].flag {
        Flag::Cycle => "S",
        Flag::HydroPattern => {
            let has_hydro_neighbor = envelope
                .neighbors(idx)
                .iter()
                .any(|&n| envelope.atoms[n].flag == Flag::HydroPattern);
            if has_hydro_neighbor {
                "H"
            } else {
                "U"
            }
        }
        Flag::Linkable => {
            if envelope.degree(idx) > 1 {
                "C"
            } else {
                "P"
            }
        }
        Flag::Oxygen => "O",
        Flag::Nitrogen => "N",
        Flag::Carbon => "C",
        Flag::Hydrogen => "H",
        Flag::Shell | Flag::NotDef => "Al",
    }
}

fn format_coord(value: f32) -> String {
    format!("{value:>10.4}")
}

/// Renders one envelope as a MOL2 document. `live` fixes the set of atoms written and their
/// output order; bonds are emitted once per undirected edge among that set.
fn render(live: &[usize], position_of: impl Fn(usize) -> Point, symbol_of: impl Fn(usize) -> &'static str, neighbors_of: impl Fn(usize) -> Vec<usize>, name: &str) -> String {
    let mut index_of = vec![0usize; live.iter().max().map(|&m| m + 1).unwrap_or(0)];
    for (out_idx, &idx) in live.iter().enumerate() {
        index_of[idx] = out_idx + 1;
    }

    let mut bonds = Vec::new();
    for &idx in live {
        for n in neighbors_of(idx) {
            if n > idx {
                bonds.push((index_of[idx], index_of[n]));
            }
        }
    }

    let mut out = String::new();
    writeln!(out, "@<TRIPOS>MOLECULE").unwrap();
    writeln!(out, "{name}").unwrap();
    writeln!(out, "{} {} 0 0 0", live.len(), bonds.len()).unwrap();
    writeln!(out, "SMALL").unwrap();
    writeln!(out, "GASTEIGER").unwrap();
    writeln!(out).unwrap();

    writeln!(out, "@<TRIPOS>ATOM").unwrap();
    for (out_idx, &idx) in live.iter().enumerate() {
        let p = position_of(idx);
        let symbol = symbol_of(idx);
        writeln!(
            out,
            "{:>7} {:<8}{}{}{} {:<6}{:>5} {:<8}{:>10.4}",
            out_idx + 1,
            symbol,
            format_coord(p.x),
            format_coord(p.y),
            format_coord(p.z),
            symbol,
            1,
            "<0>",
            0.0
        )
        .unwrap();
    }

    writeln!(out, "@<TRIPOS>BOND").unwrap();
    for (i, (a, b)) in bonds.iter().enumerate() {
        writeln!(out, "{:>6} {:>5} {:>5} 1", i + 1, a, b).unwrap();
    }

    out
}

/// Writes one emitted cage's envelope as a standalone MOL2 document.
pub fn write_cage(envelope: &Envelope, name: &str) -> String {
    let live = envelope.live_indices();
    render(
        &live,
        |idx| envelope.atoms[idx].position,
        |idx| element_symbol(envelope, idx),
        |idx| envelope.neighbors(idx),
        name,
    )
}

/// Writes the plain fixed substrate (`<basename>.mol2`).
pub fn write_substrate(molecule: &Molecule, name: &str) -> String {
    let live: Vec<usize> = (0..molecule.atoms.len()).collect();
    render(
        &live,
        |idx| molecule.atoms[idx].position,
        |idx| {
            // Leak is unnecessary: symbols are short-lived strings we need as &'static for the
            // shared renderer signature, so intern through a tiny fixed table of common symbols.
            match molecule.atoms[idx].symbol.as_str() {
                "C" => "C",
                "N" => "N",
                "O" => "O",
                "H" => "H",
                "S" => "S",
                "P" => "P",
                "F" => "F",
                _ => "Al",
            }
        },
        |idx| molecule.atoms[idx].neighbors.clone(),
        name,
    )
}

/// Writes an undecorated or pattern-decorated envelope Shell dump (`<basename>_shell.mol2` /
/// `<basename>_aro.mol2`).
pub fn write_shell(envelope: &Envelope, name: &str) -> String {
    write_cage(envelope, name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::envelope::Envelope;

    #[test]
    fn write_cage_emits_header_and_matching_atom_count() {
        let mut env = Envelope::new();
        let a = env.add_atom(Flag::Carbon, Point::new(0.0, 0.0, 0.0), None);
        let b = env.add_atom(Flag::Oxygen, Point::new(1.5, 0.0, 0.0), None);
        env.link(a, b);

        let doc = write_cage(&env, "test_mot1");
        assert!(doc.contains("@<TRIPOS>MOLECULE"));
        assert!(doc.contains("@<TRIPOS>ATOM"));
        assert!(doc.contains("@<TRIPOS>BOND"));
        assert!(doc.contains("2 1 0 0 0"));
    }

    #[test]
    fn linkable_leaf_gets_p_symbol_and_branching_gets_c() {
        let mut env = Envelope::new();
        let hub = env.add_atom(Flag::Linkable, Point::new(0.0, 0.0, 0.0), None);
        let leaf_a = env.add_atom(Flag::Linkable, Point::new(1.0, 0.0, 0.0), None);
        let leaf_b = env.add_atom(Flag::Linkable, Point::new(-1.0, 0.0, 0.0), None);
        env.link(hub, leaf_a);
        env.link(hub, leaf_b);

        assert_eq!(element_symbol(&env, hub), "C");
        assert_eq!(element_symbol(&env, leaf_a), "P");
    }
}
