//! Cleanup system: removes dead enemies, spent bursts and anything that
//! has left the world.

use hecs::{Entity, World};
use rand_chacha::ChaCha8Rng;

use castle_core::components::{Enemy, EnemyState, ParticleBurst, Projectile};
use castle_core::constants::{ENEMY_DEATH_BURST, ENEMY_DEATH_BURST_Z, WORLD_RADIUS};
use castle_core::events::SimEvent;
use castle_core::types::Position;

use crate::score::ScoreState;
use crate::world_setup;

/// Remove entities that are beyond the world boundary or dead.
/// Uses a pre-allocated buffer to avoid per-tick allocation.
pub fn run(
    world: &mut World,
    rng: &mut ChaCha8Rng,
    despawn_buffer: &mut Vec<Entity>,
    events: &mut Vec<SimEvent>,
    score: &mut ScoreState,
) {
    despawn_buffer.clear();

    let radius_sq = WORLD_RADIUS * WORLD_RADIUS;
    let mut deaths: Vec<Position> = Vec::new();

    // Killed enemies leave a burst behind.
    for (entity, (pos, state, _enemy)) in world.query_mut::<(&Position, &EnemyState, &Enemy)>() {
        if state.hp <= 0.0 {
            deaths.push(Position::new(pos.x, pos.y, ENEMY_DEATH_BURST_Z));
            events.push(SimEvent::EnemyKilled {
                id: state.id,
                kind: state.kind,
            });
            score.enemies_killed += 1;
            tracing::debug!(id = ?state.id, kind = ?state.kind, "enemy killed");
            despawn_buffer.push(entity);
        } else if pos.x * pos.x + pos.y * pos.y > radius_sq {
            despawn_buffer.push(entity);
        }
    }

    // Projectiles that drifted out of bounds.
    for (entity, (pos, _projectile)) in world.query_mut::<(&Position, &Projectile)>() {
        if pos.x * pos.x + pos.y * pos.y > radius_sq {
            despawn_buffer.push(entity);
        }
    }

    // Spent bursts.
    for (entity, burst) in world.query_mut::<&ParticleBurst>() {
        if burst.life <= 0.0 {
            despawn_buffer.push(entity);
        }
    }

    for entity in despawn_buffer.drain(..) {
        let _ = world.despawn(entity);
    }

    for at in deaths {
        world_setup::spawn_burst(world, rng, at, ENEMY_DEATH_BURST);
    }
}
