//! End-to-end scenarios for §4.M substrate analysis: bond detection, cycle membership, and
//! lone-pair/dependency-graph inference.

// A relative alias, not `crate::harness`: this module is compiled both nested under
// `integration_tests.rs` (where `harness` lives at `crate::harness`) and, since cargo's test
// auto-discovery treats every direct child of `tests/` as its own crate root, standalone as
// `harness.rs` itself (where this module's grandparent *is* the crate root). `super::super`
// resolves to the right place either way.
use super::super as harness;

#[test]
fn water_has_two_oh_bonds_and_no_cycles() {
    let mol = harness::water();
    assert_eq!(mol.atoms[0].neighbors.len(), 2);
    assert!(!mol.is_cyclic(0));
    assert_eq!(mol.atoms[0].ligands(), 2);
}

#[test]
fn water_dependency_graph_links_both_hydrogens_to_oxygen_lone_pairs() {
    let mol = harness::water();
    assert!(mol.dependency_graph.vertex_count() >= 2);
}

#[test]
fn lone_carbon_has_no_neighbors_and_is_acyclic() {
    let mol = harness::lone_carbon();
    assert!(mol.atoms[0].neighbors.is_empty());
    assert!(!mol.is_cyclic(0));
}

#[test]
fn benzene_ring_atoms_are_all_detected_as_cyclic() {
    let mol = harness::benzene_ring();
    for i in 0..mol.atoms.len() {
        assert!(mol.is_cyclic(i), "atom {i} should be part of the 6-membered ring");
    }
}

#[test]
fn unreferenced_element_symbol_is_a_type_unknown_error() {
    use cage_forge::core::geometry::Point;
    use cage_forge::CageError;

    let err = cage_forge::substrate::analyze(vec!["Xx".to_string()], vec![Point::splat(0.0)], &harness::radii()).unwrap_err();
    assert!(matches!(err, CageError::TypeUnknown { .. }));
}
