//! Periodic enemy spawning, one re-arming timer per kind.

use hecs::World;
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use castle_core::constants::*;
use castle_core::enums::EnemyKind;
use castle_core::events::SimEvent;
use castle_core::state::SpawnerView;
use castle_core::types::EnemyId;

use crate::score::ScoreState;

/// Which kinds the periodic spawner produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnFlags {
    pub barbarian: bool,
    pub archer: bool,
    pub giant: bool,
    pub cannon: bool,
}

impl Default for SpawnFlags {
    fn default() -> Self {
        Self {
            barbarian: true,
            archer: true,
            giant: true,
            cannon: true,
        }
    }
}

impl SpawnFlags {
    pub fn enabled(&self, kind: EnemyKind) -> bool {
        match kind {
            EnemyKind::Barbarian => self.barbarian,
            EnemyKind::Archer => self.archer,
            EnemyKind::Giant => self.giant,
            EnemyKind::Cannon => self.cannon,
        }
    }

    pub fn set(&mut self, kind: EnemyKind, enabled: bool) {
        let flag = match kind {
            EnemyKind::Barbarian => &mut self.barbarian,
            EnemyKind::Archer => &mut self.archer,
            EnemyKind::Giant => &mut self.giant,
            EnemyKind::Cannon => &mut self.cannon,
        };
        *flag = enabled;
    }
}

/// Re-arm interval range for a kind, in seconds.
pub fn spawn_interval(kind: EnemyKind) -> (f64, f64) {
    match kind {
        EnemyKind::Barbarian => BARBARIAN_SPAWN_INTERVAL,
        EnemyKind::Archer => ARCHER_SPAWN_INTERVAL,
        EnemyKind::Giant => GIANT_SPAWN_INTERVAL,
        EnemyKind::Cannon => CANNON_SPAWN_INTERVAL,
    }
}

#[derive(Debug, Clone)]
pub struct SpawnTimer {
    pub kind: EnemyKind,
    pub enabled: bool,
    /// Seconds until the next spawn. Keeps counting down while disabled,
    /// so re-enabling an overdue timer spawns at once.
    pub remaining: f64,
}

/// All per-kind timers.
#[derive(Debug, Clone, Default)]
pub struct SpawnSchedule {
    pub timers: Vec<SpawnTimer>,
}

impl SpawnSchedule {
    /// Timers start at zero: each enabled kind spawns on the first tick.
    pub fn new(flags: &SpawnFlags) -> Self {
        Self {
            timers: EnemyKind::ALL
                .iter()
                .map(|&kind| SpawnTimer {
                    kind,
                    enabled: flags.enabled(kind),
                    remaining: 0.0,
                })
                .collect(),
        }
    }

    pub fn set_enabled(&mut self, kind: EnemyKind, enabled: bool) {
        for timer in self.timers.iter_mut().filter(|t| t.kind == kind) {
            timer.enabled = enabled;
        }
    }

    pub fn views(&self) -> Vec<SpawnerView> {
        self.timers
            .iter()
            .map(|t| SpawnerView {
                kind: t.kind,
                enabled: t.enabled,
                remaining_secs: t.remaining.max(0.0),
            })
            .collect()
    }
}

/// Count every timer down and spawn from those that are due.
pub fn run(
    world: &mut World,
    rng: &mut ChaCha8Rng,
    schedule: &mut SpawnSchedule,
    next_enemy_id: &mut u32,
    events: &mut Vec<SimEvent>,
    score: &mut ScoreState,
) {
    for timer in &mut schedule.timers {
        timer.remaining -= DT;
        if timer.enabled && timer.remaining <= 0.0 {
            let (lo, hi) = spawn_interval(timer.kind);
            timer.remaining = rng.gen_range(lo..hi);
            spawn(world, rng, timer.kind, next_enemy_id, events, score);
        }
    }
}

/// Spawn one enemy on the ring and record it.
pub fn spawn(
    world: &mut World,
    rng: &mut ChaCha8Rng,
    kind: EnemyKind,
    next_enemy_id: &mut u32,
    events: &mut Vec<SimEvent>,
    score: &mut ScoreState,
) -> EnemyId {
    let id = EnemyId(*next_enemy_id);
    *next_enemy_id += 1;
    crate::world_setup::spawn_enemy(world, rng, id, kind);
    score.enemies_spawned += 1;
    events.push(SimEvent::EnemySpawned { id, kind });
    tracing::debug!(?id, ?kind, "enemy spawned");
    id
}
