//! Snapshot system: reads the ECS world into the snapshot view lists.
//!
//! This system is read-only. It never modifies the world.

use hecs::World;

use castle_core::components::*;
use castle_core::query::WallQuery;
use castle_core::state::*;
use castle_core::types::{Position, Velocity};
use castle_layout::WallRegistry;

/// Build a snapshot holding the enemies, projectiles and effects in the
/// world. Fields owned by the engine are left at their defaults.
pub fn build_snapshot(
    world: &World,
    walls: &WallRegistry,
    gate: Position,
    trails: bool,
) -> GameStateSnapshot {
    GameStateSnapshot {
        enemies: build_enemies(world, walls, gate),
        projectiles: build_projectiles(world, trails),
        effects: build_effects(world),
        trails,
        ..Default::default()
    }
}

/// Enemies sorted by id, each facing the point it is marching on or attacking.
fn build_enemies(world: &World, walls: &WallRegistry, gate: Position) -> Vec<EnemyView> {
    let mut enemies: Vec<EnemyView> = world
        .query::<(&Enemy, &Position, &EnemyState)>()
        .iter()
        .map(|(_, (_, pos, state))| {
            let target = state
                .target_wall
                .and_then(|id| walls.wall_center(id))
                .unwrap_or(gate);
            EnemyView {
                id: state.id,
                kind: state.kind,
                phase: state.phase,
                position: *pos,
                heading: pos.bearing_to(&target),
                hp: state.hp,
                max_hp: state.max_hp,
                swing_phase: state.swing_phase,
            }
        })
        .collect();

    enemies.sort_by_key(|e| e.id);
    enemies
}

fn build_projectiles(world: &World, trails: bool) -> Vec<ProjectileView> {
    world
        .query::<(&Projectile, &Position, &Velocity, &PositionHistory)>()
        .iter()
        .map(|(_, (projectile, pos, vel, history))| ProjectileView {
            kind: projectile.kind,
            faction: projectile.faction,
            position: *pos,
            velocity: *vel,
            radius: projectile.radius,
            trail: if trails {
                history.positions.clone()
            } else {
                Vec::new()
            },
        })
        .collect()
}

fn build_effects(world: &World) -> Vec<EffectView> {
    world
        .query::<&ParticleBurst>()
        .iter()
        .map(|(_, burst)| EffectView {
            origin: burst.origin,
            size: burst.size,
            life: burst.life,
            particles: burst
                .particles
                .iter()
                .filter(|p| p.life > 0.0)
                .map(|p| p.position)
                .collect(),
        })
        .collect()
}
