//! Enemy AI system: runs the enemy FSM for every besieger each tick.
//!
//! Calls the FSM from castle-enemy-ai, writes the resulting phase and
//! position back into the ECS, then carries out strikes and launches.

use hecs::World;
use rand_chacha::ChaCha8Rng;

use castle_core::components::{Enemy, EnemyState};
use castle_core::constants::{DT, MELEE_HIT_BURST};
use castle_core::enums::{Faction, WallOwner};
use castle_core::events::SimEvent;
use castle_core::types::Position;
use castle_enemy_ai::fsm::{evaluate, EnemyAction, EnemyContext, EnemyUpdate};
use castle_layout::WallRegistry;

use crate::garrison::Garrison;
use crate::world_setup;

/// What every enemy is ultimately marching on.
#[derive(Debug, Clone, Copy)]
pub struct Objective {
    pub gate: Position,
    pub gate_owner: WallOwner,
    pub fallen: bool,
}

/// Evaluate the FSM for each enemy and apply the results.
/// Owners whose hp reached zero this tick are appended to `breaches`.
pub fn run(
    world: &mut World,
    rng: &mut ChaCha8Rng,
    walls: &WallRegistry,
    garrison: &mut Garrison,
    objective: &Objective,
    events: &mut Vec<SimEvent>,
    breaches: &mut Vec<WallOwner>,
) {
    // Collect updates in a buffer to avoid borrow issues with hecs
    let mut updates: Vec<(hecs::Entity, EnemyUpdate)> = Vec::new();

    {
        let mut query = world.query::<(&Enemy, &Position, &EnemyState)>();
        for (entity, (_enemy, pos, state)) in query.iter() {
            // Dead enemies wait for cleanup
            if state.hp <= 0.0 {
                continue;
            }

            let ctx = EnemyContext {
                kind: state.kind,
                phase: state.phase,
                position: *pos,
                target_wall: state.target_wall,
                gate: objective.gate,
                gate_owner: objective.gate_owner,
                attack_cooldown: state.attack_cooldown,
                reload: state.reload,
                attack_rate: state.attack_rate,
                swing_phase: state.swing_phase,
                objective_fallen: objective.fallen,
                dt: DT,
            };
            updates.push((entity, evaluate(&ctx, walls)));
        }
    }

    let mut actions: Vec<EnemyAction> = Vec::new();
    for (entity, update) in updates {
        if let Ok(mut state) = world.get::<&mut EnemyState>(entity) {
            if update.phase_changed {
                tracing::trace!(id = ?state.id, from = ?state.phase, to = ?update.new_phase, "enemy phase");
            }
            state.phase = update.new_phase;
            state.target_wall = update.target_wall;
            state.attack_cooldown = update.attack_cooldown;
            state.reload = update.reload;
            state.swing_phase = update.swing_phase;
        }
        if let Ok(mut pos) = world.get::<&mut Position>(entity) {
            *pos = update.new_position;
        }
        actions.extend(update.action);
    }

    for action in actions {
        match action {
            EnemyAction::Strike { owner, damage, at } => {
                if garrison.damage(owner, damage) {
                    breaches.push(owner);
                }
                world_setup::spawn_burst(world, rng, at, MELEE_HIT_BURST);
                events.push(SimEvent::WallStruck { owner, damage, at });
            }
            EnemyAction::Launch {
                kind,
                origin,
                velocity,
                radius,
                damage,
            } => {
                world_setup::spawn_projectile(
                    world,
                    kind,
                    Faction::Besieger,
                    origin,
                    velocity,
                    radius,
                    damage,
                );
            }
        }
    }
}
