//! Static layout of the castle complex.
//!
//! Castle configurations, the wall registry built from them (collision
//! volumes tagged with their owning structure), and the zones the player
//! avatar is allowed to move in.

pub mod config;
pub mod walls;
pub mod zones;

pub use config::{CastleConfig, CastleLayout, ChestConfig, LayoutError, PerimeterConfig, RockConfig};
pub use walls::{Wall, WallRegistry};
