//! Input/output: XYZ substrate parsing, covalent-radius tables, and MOL2 output. Grounded on
//! `lecture.c`/`ecriture.c`.

pub mod mol2;
pub mod radius;
pub mod xyz;

pub use radius::{default_radius_table, load_radius_table, parse_radius_table};
pub use xyz::{parse_xyz, read_xyz, XyzFile};
