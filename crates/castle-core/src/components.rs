//! ECS components for hecs entities.
//!
//! Components are plain data structs with no methods.
//! Game logic lives in systems, not components.

use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::types::{EnemyId, Position, Velocity, WallId};

/// Marks an entity as a besieging enemy.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Enemy;

/// Per-enemy behavior state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnemyState {
    pub id: EnemyId,
    pub kind: EnemyKind,
    pub phase: EnemyPhase,
    pub hp: f64,
    pub max_hp: f64,
    /// Wall currently being attacked. `None` while advancing or when
    /// attacking the gate directly.
    pub target_wall: Option<WallId>,
    /// Seconds until the next melee strike.
    pub attack_cooldown: f64,
    /// Seconds until the next ranged shot.
    pub reload: f64,
    /// Seconds between attacks, rolled per instance at spawn.
    pub attack_rate: f64,
    /// Swing or recoil animation phase, advanced while attacking.
    pub swing_phase: f64,
}

/// A projectile in flight.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub kind: ProjectileKind,
    pub faction: Faction,
    pub radius: f64,
    pub damage: f64,
    /// Remaining flight time in seconds.
    pub life: f64,
}

/// Recent positions for trail rendering (newest first).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PositionHistory {
    pub positions: Vec<Position>,
}

/// One particle of a burst.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub position: Position,
    pub velocity: Velocity,
    pub life: f64,
}

/// Short-lived hit feedback effect.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParticleBurst {
    pub origin: Position,
    pub size: f64,
    /// Remaining life of the whole burst in seconds.
    pub life: f64,
    pub particles: Vec<Particle>,
}
