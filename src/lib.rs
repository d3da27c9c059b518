pub mod automaton;
pub mod bit_grid;
pub mod camera;
pub mod config;
pub mod events;
pub mod io;
pub mod noise;
pub mod point;
pub mod rule_set;
pub mod scroll;
pub mod session;
pub mod terrain;

/// Signed cell coordinate. Grids that wrap accept any value.
pub type GridOffset = i64;
