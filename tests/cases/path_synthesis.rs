//! End-to-end scenarios for §4.S path synthesis: endpoint discovery and chain growth between a
//! synthetic pair of LINKABLE envelope atoms.

use cage_forge::config::RunConfig;
use cage_forge::core::geometry::Point;
use cage_forge::envelope::{Envelope, Flag};
use cage_forge::substrate::Molecule;
use cage_forge::synthesis::growth::{grow_pair, GrowthState};
use cage_forge::synthesis::{candidate_pairs, strip_shell};

fn empty_substrate() -> Molecule {
    cage_forge::substrate::analyze(Vec::new(), Vec::new(), &std::collections::HashMap::new()).unwrap()
}

#[test]
fn strip_shell_then_candidate_pairs_finds_cross_group_linkables() {
    let mut env = Envelope::new();
    let a = env.add_atom(Flag::Linkable, Point::new(0.0, 0.0, 0.0), None);
    let b = env.add_atom(Flag::Shell, Point::new(5.0, 0.0, 0.0), None);
    let c = env.add_atom(Flag::Linkable, Point::new(10.0, 0.0, 0.0), None);
    let _ = b;

    strip_shell(&mut env);
    let pairs = candidate_pairs(&env, None);
    assert_eq!(pairs.len(), 1);
    assert!(pairs[0].start == a || pairs[0].end == a);
    assert!(pairs[0].start == c || pairs[0].end == c);
}

#[test]
fn grow_pair_closes_a_nearby_endpoint_pair_within_default_budget() {
    let mut env = Envelope::new();
    let anchor = env.add_atom(Flag::Shell, Point::new(-2.0, 0.0, 0.0), None);
    let start = env.add_atom(Flag::Linkable, Point::new(-1.0, 0.0, 0.0), None);
    env.link(anchor, start);
    let end = env.add_atom(Flag::Linkable, Point::new(0.5, 1.0, 0.0), None);

    let substrate = empty_substrate();
    let config = RunConfig::default();
    let closed = grow_pair(env, start, end, Flag::Carbon, &substrate, &config, GrowthState::fresh());
    assert!(!closed.is_empty());
}

#[test]
fn grow_pair_yields_nothing_when_size_max_cannot_reach_the_endpoint() {
    let mut env = Envelope::new();
    let anchor = env.add_atom(Flag::Shell, Point::new(-2.0, 0.0, 0.0), None);
    let start = env.add_atom(Flag::Linkable, Point::new(-1.0, 0.0, 0.0), None);
    env.link(anchor, start);
    let end = env.add_atom(Flag::Linkable, Point::new(50.0, 0.0, 0.0), None);

    let substrate = empty_substrate();
    let mut config = RunConfig::default();
    config.size_max = 1;
    let closed = grow_pair(env, start, end, Flag::Carbon, &substrate, &config, GrowthState::fresh());
    assert!(closed.is_empty());
}
