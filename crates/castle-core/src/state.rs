//! Game state snapshot: the complete visible state sent to the frontend each tick.

use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::events::{Alert, SimEvent};
use crate::types::{EnemyId, Position, SimTime, Velocity};

/// Complete game state broadcast to the frontend after each tick.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GameStateSnapshot {
    pub time: SimTime,
    pub phase: GamePhase,
    pub enemies: Vec<EnemyView>,
    pub projectiles: Vec<ProjectileView>,
    pub effects: Vec<EffectView>,
    pub structures: Vec<StructureView>,
    pub player: PlayerView,
    pub spawners: Vec<SpawnerView>,
    pub trails: bool,
    pub events: Vec<SimEvent>,
    pub alerts: Vec<Alert>,
    pub score: ScoreView,
}

/// An enemy as drawn by the frontend, hp bar included.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnemyView {
    pub id: EnemyId,
    pub kind: EnemyKind,
    pub phase: EnemyPhase,
    pub position: Position,
    /// Facing in radians (0 = North), toward the current target.
    pub heading: f64,
    pub hp: f64,
    pub max_hp: f64,
    pub swing_phase: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectileView {
    pub kind: ProjectileKind,
    pub faction: Faction,
    pub position: Position,
    pub velocity: Velocity,
    pub radius: f64,
    /// Trail points, newest first. Empty unless trails are enabled.
    pub trail: Vec<Position>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EffectView {
    pub origin: Position,
    pub size: f64,
    pub life: f64,
    /// Positions of particles that are still alive.
    pub particles: Vec<Position>,
}

/// Hit points of one structure (a castle or the perimeter).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StructureView {
    pub owner: WallOwner,
    pub hp: f64,
    pub max_hp: f64,
    pub breached: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlayerView {
    pub position: Position,
    /// Degrees; 0 faces +Y.
    pub angle_deg: f64,
    pub coins: u32,
    pub arrows: u32,
    pub view: ViewMode,
    pub eye: Position,
    pub look_at: Position,
    pub at_spawn: bool,
    /// Seconds until the chest can be opened again.
    pub chest_cooldown_secs: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpawnerView {
    pub kind: EnemyKind,
    pub enabled: bool,
    pub remaining_secs: f64,
}

/// Running score for display.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScoreView {
    pub enemies_spawned: u32,
    pub enemies_killed: u32,
    pub enemies_alive: u32,
    /// Total hit points lost by all structures.
    pub structure_damage_taken: f64,
    pub castle_standing: bool,
    pub mission_time_secs: f64,
}
