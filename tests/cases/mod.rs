pub mod envelope_pattern;
pub mod path_synthesis;
pub mod pathfinding;
pub mod substrate_analysis;
