//! Kind-specific stat blocks.
//!
//! Consolidates per-kind parameters for the enemy FSM and the spawner.

use rand::Rng;

use castle_core::constants::*;
use castle_core::enums::{EnemyKind, ProjectileKind};

/// How a ranged kind launches its projectile.
#[derive(Debug, Clone, Copy)]
pub struct LauncherProfile {
    pub kind: ProjectileKind,
    /// Height the projectile leaves the muzzle at.
    pub muzzle_height: f64,
    pub muzzle_speed: f64,
    /// Extra upward velocity added to the aimed direction.
    pub loft: f64,
    pub radius: f64,
}

/// Stat block for an enemy kind.
#[derive(Debug, Clone, Copy)]
pub struct EnemyProfile {
    pub speed: f64,
    /// Horizontal distance to the target at which the enemy stops and attacks.
    pub attack_range: f64,
    /// Seconds between attacks, drawn uniformly per instance. Equal bounds
    /// mean a fixed rate.
    pub attack_rate: (f64, f64),
    /// Delay before the first ranged shot, drawn per instance.
    pub initial_reload: (f64, f64),
    pub damage: f64,
    pub hp: f64,
    /// Animation rate while attacking (phase units per second).
    pub swing_rate: f64,
    /// Body radius used for hits from defender arrows.
    pub hit_radius: f64,
    /// `Some` for ranged kinds.
    pub launcher: Option<LauncherProfile>,
}

/// Per-instance values drawn at spawn time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RolledStats {
    pub attack_rate: f64,
    pub reload: f64,
}

impl EnemyProfile {
    pub fn is_ranged(&self) -> bool {
        self.launcher.is_some()
    }

    /// Draw the per-instance attack rate and first reload.
    pub fn roll(&self, rng: &mut impl Rng) -> RolledStats {
        RolledStats {
            attack_rate: uniform(rng, self.attack_rate),
            reload: uniform(rng, self.initial_reload),
        }
    }
}

fn uniform(rng: &mut impl Rng, (lo, hi): (f64, f64)) -> f64 {
    if hi > lo {
        rng.gen_range(lo..hi)
    } else {
        lo
    }
}

/// Get the stat block for a given kind.
pub fn get_profile(kind: EnemyKind) -> EnemyProfile {
    match kind {
        EnemyKind::Barbarian => EnemyProfile {
            speed: BARBARIAN_SPEED,
            attack_range: BARBARIAN_ATTACK_RANGE,
            attack_rate: (BARBARIAN_ATTACK_RATE, BARBARIAN_ATTACK_RATE),
            initial_reload: (0.0, 0.0),
            damage: BARBARIAN_DAMAGE,
            hp: BARBARIAN_HP,
            swing_rate: 6.0,
            hit_radius: 40.0,
            launcher: None,
        },
        EnemyKind::Giant => EnemyProfile {
            speed: GIANT_SPEED,
            attack_range: GIANT_ATTACK_RANGE,
            attack_rate: (GIANT_ATTACK_RATE, GIANT_ATTACK_RATE),
            initial_reload: (0.0, 0.0),
            damage: GIANT_DAMAGE,
            hp: GIANT_HP,
            swing_rate: 2.0,
            hit_radius: 90.0,
            launcher: None,
        },
        EnemyKind::Archer => EnemyProfile {
            speed: ARCHER_SPEED,
            attack_range: ARCHER_ATTACK_RANGE,
            attack_rate: ARCHER_ATTACK_RATE,
            initial_reload: ARCHER_INITIAL_RELOAD,
            damage: ARCHER_DAMAGE,
            hp: ARCHER_HP,
            swing_rate: 0.0,
            hit_radius: 35.0,
            launcher: Some(LauncherProfile {
                kind: ProjectileKind::Arrow,
                muzzle_height: ARROW_MUZZLE_HEIGHT,
                muzzle_speed: ARROW_SPEED,
                loft: ARROW_LOFT,
                radius: ARROW_RADIUS,
            }),
        },
        EnemyKind::Cannon => EnemyProfile {
            speed: CANNON_SPEED,
            attack_range: CANNON_ATTACK_RANGE,
            attack_rate: CANNON_ATTACK_RATE,
            initial_reload: CANNON_INITIAL_RELOAD,
            damage: CANNON_DAMAGE,
            hp: CANNON_HP,
            swing_rate: 0.0,
            hit_radius: 80.0,
            launcher: Some(LauncherProfile {
                kind: ProjectileKind::Ball,
                muzzle_height: BALL_MUZZLE_HEIGHT,
                muzzle_speed: BALL_SPEED,
                loft: BALL_LOFT,
                radius: BALL_RADIUS,
            }),
        },
    }
}
