//! Level loading
//!
//! `parse` turns the level text into raw records; `geometry` resolves them
//! into the table the simulation is seeded from.

pub mod geometry;
pub mod parse;

pub use geometry::{LevelGeometry, LevelObject, Obb, SunLight};
pub use parse::{LevelFile, MeshRecord, SunRecord, parse_level};
