//! Simulation engine for the castle siege.
//!
//! Owns the hecs ECS world, runs systems at a fixed tick rate,
//! and produces GameStateSnapshots for a frontend or headless driver.

pub mod engine;
pub mod garrison;
pub mod player;
pub mod score;
pub mod systems;
pub mod world_setup;

pub use castle_core as core;
pub use engine::{SimConfig, SimulationEngine};

#[cfg(test)]
mod tests;
