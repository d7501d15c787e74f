//! Player commands sent from the frontend to the simulation.
//!
//! Commands are queued and processed at the next tick boundary.

use serde::{Deserialize, Serialize};

use crate::enums::*;

/// All possible player actions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PlayerCommand {
    // --- Simulation control ---
    /// Build the world and start the siege.
    StartMission,
    Pause,
    Resume,
    TogglePause,
    /// Set time scale (1.0 = normal, 2.0 = double, 0.0 = stopped).
    SetTimeScale { scale: f64 },

    // --- Siege control ---
    /// Spawn one enemy of the given kind immediately.
    SpawnEnemy { kind: EnemyKind },
    /// Enable or disable the periodic spawner for a kind.
    SetSpawnEnabled { kind: EnemyKind, enabled: bool },
    /// Record projectile trails.
    SetTrails { enabled: bool },

    // --- Avatar ---
    Turn { direction: TurnDirection },
    Step { direction: StepDirection },
    /// Teleport from the spawn point onto a castle roof.
    TeleportToRoof { castle: u8 },
    /// Return to the spawn point from a castle centre.
    TeleportToSpawn,
    /// Ride the roof lift up or down at a castle centre.
    RoofLift,
    /// Open the chest or pick up arrows.
    Interact,
    /// Spend coins to repair the defended castle.
    HealCastle,
    FireArrow,
    ToggleView,
}
