//! Shared fixtures for the end-to-end scenario families under `tests/cases/`.

#[path = "cases/mod.rs"]
pub mod cases;

use std::collections::HashMap;

use cage_forge::core::geometry::Point;
use cage_forge::substrate::{self, Molecule, RadiusTable};

/// A minimal covalent-radius table covering every element the fixtures below use.
pub fn radii() -> RadiusTable {
    let mut table: HashMap<String, i32> = HashMap::new();
    table.insert("C".to_string(), 76);
    table.insert("O".to_string(), 66);
    table.insert("N".to_string(), 71);
    table.insert("H".to_string(), 31);
    table
}

/// A single, unbonded carbon atom at the origin.
pub fn lone_carbon() -> Molecule {
    substrate::analyze(vec!["C".to_string()], vec![Point::splat(0.0)], &radii()).unwrap()
}

/// Water: one oxygen bonded to two hydrogens at a realistic bond angle.
pub fn water() -> Molecule {
    substrate::analyze(
        vec!["O".to_string(), "H".to_string(), "H".to_string()],
        vec![
            Point::new(0.0, 0.0, 0.0),
            Point::new(0.96, 0.0, 0.0),
            Point::new(-0.24, 0.93, 0.0),
        ],
        &radii(),
    )
    .unwrap()
}

/// A planar six-membered carbon ring (a crude benzene stand-in: ring geometry without the
/// aromatic electronics substrate analysis doesn't model).
pub fn benzene_ring() -> Molecule {
    let radius = 1.39f32;
    let mut symbols = Vec::new();
    let mut positions = Vec::new();
    for i in 0..6 {
        let theta = (i as f32) * std::f32::consts::PI / 3.0;
        symbols.push("C".to_string());
        positions.push(Point::new(radius * theta.cos(), radius * theta.sin(), 0.0));
    }
    substrate::analyze(symbols, positions, &radii()).unwrap()
}
