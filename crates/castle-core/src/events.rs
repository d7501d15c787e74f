//! Events emitted by the simulation for audio and UI feedback.

use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::types::{EnemyId, Position};

/// Feedback events, drained into each snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SimEvent {
    EnemySpawned { id: EnemyId, kind: EnemyKind },
    /// A melee strike landed on a structure.
    WallStruck {
        owner: WallOwner,
        damage: f64,
        at: Position,
    },
    /// A besieger projectile hit a structure.
    ProjectileImpact {
        kind: ProjectileKind,
        owner: WallOwner,
        at: Position,
    },
    /// A defender arrow hit an enemy.
    EnemyHit { id: EnemyId, damage: f64 },
    EnemyKilled { id: EnemyId, kind: EnemyKind },
    /// A structure's hit points reached zero; its walls no longer block.
    StructureBreached { owner: WallOwner },
    CastleFallen,
    Teleported { to: Position },
    CoinsCollected { amount: u32, total: u32 },
    ArrowsCollected { amount: u32, total: u32 },
    CastleHealed { amount: f64, hp: f64 },
    ArrowFired { remaining: u32 },
}

/// Alert for the UI alert queue.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Alert {
    pub level: AlertLevel,
    pub message: String,
    pub tick: u64,
}
