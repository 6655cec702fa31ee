//! End-to-end scenarios for §4.E envelope expansion and §4.P pattern insertion.

// See `substrate_analysis.rs` for why this is a relative alias rather than `crate::harness`.
use super::super as harness;

use cage_forge::envelope::expansion::{expand, DistanceCutoffAlphaShape};
use cage_forge::envelope::pattern::{insert_aromatic_rings, insert_hydrogen_patterns};
use cage_forge::envelope::Flag;

#[test]
fn lone_carbon_expands_into_a_spherical_shell_of_four_candidates() {
    let mol = harness::lone_carbon();
    let envelope = expand(&mol, &DistanceCutoffAlphaShape, 3.0).unwrap();
    assert_eq!(envelope.live_indices().len(), 4);
    for idx in envelope.live_indices() {
        assert_eq!(envelope.atoms[idx].flag, Flag::Shell);
    }
}

#[test]
fn water_envelope_decorates_both_hydrogens_as_donor_patterns() {
    let mol = harness::water();
    let mut envelope = expand(&mol, &DistanceCutoffAlphaShape, 3.0).unwrap();
    insert_hydrogen_patterns(
        &mut envelope,
        |parent| mol.atoms[parent].steric(),
        |parent| mol.atoms[parent].symbol.clone(),
    );

    // Oxygen's parent is not "H", so its HYDRO_PATTERN vertex is the tetrahedral acceptor branch
    // (degree 4, three LINKABLE siblings) rather than a donor; only hydrogens' sites are donors.
    let donors: Vec<usize> = envelope
        .live_indices()
        .into_iter()
        .filter(|&i| envelope.atoms[i].flag == Flag::HydroPattern && envelope.atoms[i].parent_atom.is_some_and(|p| mol.atoms[p].symbol == "H"))
        .collect();
    assert!(!donors.is_empty(), "water's hydrogens should produce at least one donor pattern");
    for d in &donors {
        assert_eq!(envelope.degree(*d), 2, "a donor pattern atom should have exactly two arms");
    }
}

#[test]
fn benzene_ring_substrate_promotes_envelope_atoms_to_cycle_flag() {
    let mol = harness::benzene_ring();
    let mut envelope = expand(&mol, &DistanceCutoffAlphaShape, 2.2).unwrap();
    insert_aromatic_rings(&mut envelope);

    let cycle_atoms: Vec<usize> = envelope.live_indices().into_iter().filter(|&i| envelope.atoms[i].flag == Flag::Cycle).collect();
    assert!(!cycle_atoms.is_empty(), "expected at least one CYCLE-flagged envelope atom");
}
