//! Projectile flight and collision.
//!
//! Integrates every projectile under gravity, records trails, and resolves
//! hits: besieger shots against standing walls, defender arrows against
//! enemies. Curtain walls stop defender arrows without taking damage.

use hecs::{Entity, World};
use rand_chacha::ChaCha8Rng;

use castle_core::components::{Enemy, EnemyState, PositionHistory, Projectile};
use castle_core::constants::*;
use castle_core::enums::{Faction, ProjectileKind, WallOwner};
use castle_core::events::SimEvent;
use castle_core::types::{EnemyId, Position, Velocity};
use castle_enemy_ai::profiles::get_profile;
use castle_layout::WallRegistry;

use crate::garrison::Garrison;
use crate::world_setup;

/// Burst shape for a projectile impact.
fn impact_burst(kind: ProjectileKind) -> (f64, usize) {
    match kind {
        ProjectileKind::Ball => BALL_IMPACT_BURST,
        ProjectileKind::Arrow => ARROW_IMPACT_BURST,
    }
}

enum Outcome {
    Expired,
    WallHit { owner: WallOwner },
    EnemyHit { target: Entity, id: EnemyId },
}

/// Advance all projectiles by one tick and apply their hits.
/// Owners whose hp reached zero this tick are appended to `breaches`.
pub fn run(
    world: &mut World,
    rng: &mut ChaCha8Rng,
    walls: &WallRegistry,
    garrison: &mut Garrison,
    trails: bool,
    events: &mut Vec<SimEvent>,
    breaches: &mut Vec<WallOwner>,
) {
    // Enemy bodies as spheres: (entity, id, centre, hit radius)
    let targets: Vec<(Entity, EnemyId, Position, f64)> = world
        .query::<(&Enemy, &Position, &EnemyState)>()
        .iter()
        .filter(|(_, (_, _, state))| state.hp > 0.0)
        .map(|(entity, (_, pos, state))| {
            let centre = Position::new(pos.x, pos.y, pos.z + ENEMY_CENTER_Z);
            (entity, state.id, centre, get_profile(state.kind).hit_radius)
        })
        .collect();

    let mut outcomes: Vec<(Entity, Projectile, Position, Outcome)> = Vec::new();

    for (entity, (projectile, pos, vel, history)) in world.query_mut::<(
        &mut Projectile,
        &mut Position,
        &mut Velocity,
        &mut PositionHistory,
    )>() {
        projectile.life -= DT;
        vel.z -= GRAVITY * DT;
        *pos = pos.advanced(vel, DT);

        if trails {
            history.positions.insert(0, *pos);
            history.positions.truncate(MAX_TRAIL_POINTS);
        }

        let outcome = if projectile.life <= 0.0 || pos.z < PROJECTILE_GROUND_Z {
            Some(Outcome::Expired)
        } else {
            match projectile.faction {
                // The registry only learns of breaches after this system runs.
                Faction::Besieger => walls
                    .projectile_hit(pos)
                    .filter(|wall| !garrison.is_breached(wall.owner))
                    .map(|wall| Outcome::WallHit { owner: wall.owner }),
                Faction::Defender => targets
                    .iter()
                    .find(|(_, _, centre, hit_radius)| {
                        pos.range_to(centre) <= projectile.radius + hit_radius
                    })
                    .map(|&(target, id, _, _)| Outcome::EnemyHit { target, id })
                    .or_else(|| {
                        walls
                            .curtain_hit(pos)
                            .map(|wall| Outcome::WallHit { owner: wall.owner })
                    }),
            }
        };

        if let Some(outcome) = outcome {
            outcomes.push((entity, projectile.clone(), *pos, outcome));
        }
    }

    for (entity, projectile, at, outcome) in outcomes {
        // An earlier shot this tick may have brought the owner down.
        if let Outcome::WallHit { owner } = outcome {
            if projectile.faction == Faction::Besieger && garrison.is_breached(owner) {
                continue;
            }
        }
        let _ = world.despawn(entity);

        match outcome {
            Outcome::Expired => {}
            Outcome::WallHit { owner } => {
                world_setup::spawn_burst(world, rng, at, impact_burst(projectile.kind));
                // Defender arrows glance off the castle's own walls
                if projectile.faction == Faction::Besieger {
                    if garrison.damage(owner, projectile.damage) {
                        breaches.push(owner);
                    }
                    events.push(SimEvent::ProjectileImpact {
                        kind: projectile.kind,
                        owner,
                        at,
                    });
                }
            }
            Outcome::EnemyHit { target, id } => {
                world_setup::spawn_burst(world, rng, at, impact_burst(projectile.kind));
                if let Ok(mut state) = world.get::<&mut EnemyState>(target) {
                    state.hp = (state.hp - projectile.damage).max(0.0);
                }
                events.push(SimEvent::EnemyHit {
                    id,
                    damage: projectile.damage,
                });
            }
        }
    }
}
