//! Entity spawn factories for the siege world.
//!
//! Creates enemy, projectile and burst entities with their component
//! bundles.

use hecs::World;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use castle_core::components::*;
use castle_core::constants::*;
use castle_core::enums::*;
use castle_core::types::{EnemyId, Position, Velocity};
use castle_enemy_ai::profiles::get_profile;

use crate::systems::effects;

/// Spawn one enemy of `kind` at a random angle on the spawn ring.
pub fn spawn_enemy(
    world: &mut World,
    rng: &mut ChaCha8Rng,
    id: EnemyId,
    kind: EnemyKind,
) -> hecs::Entity {
    let angle: f64 = rng.gen_range(0.0..std::f64::consts::TAU);
    let position = Position::new(SPAWN_RADIUS * angle.cos(), SPAWN_RADIUS * angle.sin(), 0.0);
    spawn_enemy_at(world, rng, id, kind, position)
}

/// Spawn one enemy of `kind` at a fixed position.
pub fn spawn_enemy_at(
    world: &mut World,
    rng: &mut ChaCha8Rng,
    id: EnemyId,
    kind: EnemyKind,
    position: Position,
) -> hecs::Entity {
    let profile = get_profile(kind);
    let rolled = profile.roll(rng);

    let state = EnemyState {
        id,
        kind,
        phase: EnemyPhase::Advance,
        hp: profile.hp,
        max_hp: profile.hp,
        target_wall: None,
        attack_cooldown: 0.0,
        reload: rolled.reload,
        attack_rate: rolled.attack_rate,
        swing_phase: 0.0,
    };

    world.spawn((Enemy, position, state))
}

/// Spawn a projectile with a full flight life.
pub fn spawn_projectile(
    world: &mut World,
    kind: ProjectileKind,
    faction: Faction,
    origin: Position,
    velocity: Velocity,
    radius: f64,
    damage: f64,
) -> hecs::Entity {
    let projectile = Projectile {
        kind,
        faction,
        radius,
        damage,
        life: PROJECTILE_LIFE_SECS,
    };
    world.spawn((projectile, origin, velocity, PositionHistory::default()))
}

/// Spawn a particle burst. `shape` is (size, particle count).
pub fn spawn_burst(
    world: &mut World,
    rng: &mut ChaCha8Rng,
    origin: Position,
    shape: (f64, usize),
) -> hecs::Entity {
    let (size, count) = shape;
    world.spawn((effects::new_burst(origin, size, count, rng),))
}
