//! Enumeration types used throughout the simulation.

use serde::{Deserialize, Serialize};

/// The four besieger kinds. Each has a fixed stat block in the AI profiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EnemyKind {
    /// Fast melee raider.
    Barbarian,
    /// Ranged unit firing arrows.
    Archer,
    /// Slow, heavy melee unit with long reach.
    Giant,
    /// Siege gun firing cannonballs from far away.
    Cannon,
}

impl EnemyKind {
    pub const ALL: [EnemyKind; 4] = [
        EnemyKind::Barbarian,
        EnemyKind::Archer,
        EnemyKind::Giant,
        EnemyKind::Cannon,
    ];
}

/// Enemy behavior phase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnemyPhase {
    /// Walking toward the current target point.
    #[default]
    Advance,
    /// Stopped and attacking a wall or the gate.
    Attack,
    /// Nothing left to attack.
    Idle,
}

/// Projectile flavour.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProjectileKind {
    #[default]
    Arrow,
    /// Cannonball.
    Ball,
}

/// Which side fired a projectile.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Faction {
    #[default]
    Besieger,
    Defender,
}

/// The structure a wall belongs to. Hit points are pooled per owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum WallOwner {
    /// Index into the layout's castle list.
    Castle(u8),
    /// The outer wall around the complex.
    Perimeter,
}

/// Shape role of a collision volume.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum WallKind {
    /// A straight wall segment.
    #[default]
    Curtain,
    /// The solid body of a castle inside its curtain walls.
    Keep,
}

/// Game phase (top-level state).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    #[default]
    Setup,
    Active,
    Paused,
    /// The defended castle's hit points reached zero.
    Fallen,
}

/// Player camera attachment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ViewMode {
    #[default]
    Orbit,
    FirstPerson,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TurnDirection {
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StepDirection {
    Forward,
    Backward,
}

/// Alert severity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AlertLevel {
    Info,
    Warning,
    Critical,
}
