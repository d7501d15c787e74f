//! ECS systems that operate on the simulation world each tick.
//!
//! Systems are pure functions that take `&mut World` (or `&World` for read-only).
//! They do not own state; all state lives in components or is passed in.

pub mod ballistics;
pub mod cleanup;
pub mod effects;
pub mod enemy_ai;
pub mod snapshot;
pub mod spawner;
