//! Enemy behavior finite state machine.
//!
//! Pure functions that compute phase transitions, movement and attacks for
//! one enemy based on its kind, current phase and the static walls.
//! No ECS dependency: operates on plain data and the `WallQuery` seam.

use castle_core::enums::{EnemyKind, EnemyPhase, ProjectileKind, WallOwner};
use castle_core::query::WallQuery;
use castle_core::types::{Position, Velocity, WallId};

use crate::profiles::{get_profile, EnemyProfile, LauncherProfile};

/// Input to the enemy FSM for a single entity.
#[derive(Debug, Clone)]
pub struct EnemyContext {
    pub kind: EnemyKind,
    pub phase: EnemyPhase,
    pub position: Position,
    pub target_wall: Option<WallId>,
    /// Approach point of the defended castle, used when no wall is targeted.
    pub gate: Position,
    /// Owner credited with damage dealt at the gate.
    pub gate_owner: WallOwner,
    pub attack_cooldown: f64,
    pub reload: f64,
    pub attack_rate: f64,
    pub swing_phase: f64,
    /// The defended castle has fallen; nothing is left to attack.
    pub objective_fallen: bool,
    pub dt: f64,
}

/// Something the enemy does to the world this tick.
#[derive(Debug, Clone, PartialEq)]
pub enum EnemyAction {
    /// Melee hit on a structure.
    Strike {
        owner: WallOwner,
        damage: f64,
        at: Position,
    },
    /// Fire a projectile.
    Launch {
        kind: ProjectileKind,
        origin: Position,
        velocity: Velocity,
        radius: f64,
        damage: f64,
    },
}

/// Output from the enemy FSM.
#[derive(Debug, Clone)]
pub struct EnemyUpdate {
    pub new_phase: EnemyPhase,
    pub new_position: Position,
    pub target_wall: Option<WallId>,
    pub attack_cooldown: f64,
    pub reload: f64,
    pub swing_phase: f64,
    pub action: Option<EnemyAction>,
    pub phase_changed: bool,
}

impl EnemyUpdate {
    fn unchanged(ctx: &EnemyContext) -> Self {
        Self {
            new_phase: ctx.phase,
            new_position: ctx.position,
            target_wall: ctx.target_wall,
            attack_cooldown: ctx.attack_cooldown,
            reload: ctx.reload,
            swing_phase: ctx.swing_phase,
            action: None,
            phase_changed: false,
        }
    }

    fn enter(mut self, phase: EnemyPhase) -> Self {
        self.phase_changed = self.new_phase != phase;
        self.new_phase = phase;
        self
    }
}

/// Where the enemy is heading or aiming: its wall's centre, else the gate.
pub fn target_point<W: WallQuery + ?Sized>(ctx: &EnemyContext, walls: &W) -> Position {
    ctx.target_wall
        .and_then(|id| walls.wall_center(id))
        .unwrap_or(ctx.gate)
}

/// Evaluate the FSM for one enemy.
pub fn evaluate<W: WallQuery + ?Sized>(ctx: &EnemyContext, walls: &W) -> EnemyUpdate {
    let no_change = EnemyUpdate::unchanged(ctx);

    // Terminal state, no transitions
    if ctx.phase == EnemyPhase::Idle {
        return no_change;
    }

    if ctx.objective_fallen {
        let mut update = no_change.enter(EnemyPhase::Idle);
        update.target_wall = None;
        return update;
    }

    let profile = get_profile(ctx.kind);

    match ctx.phase {
        EnemyPhase::Advance => evaluate_advance(ctx, &profile, walls),
        EnemyPhase::Attack => evaluate_attack(ctx, &profile, walls),
        EnemyPhase::Idle => no_change,
    }
}

fn evaluate_advance<W: WallQuery + ?Sized>(
    ctx: &EnemyContext,
    profile: &EnemyProfile,
    walls: &W,
) -> EnemyUpdate {
    let update = EnemyUpdate::unchanged(ctx);
    let target = target_point(ctx, walls);
    let dx = target.x - ctx.position.x;
    let dy = target.y - ctx.position.y;
    let distance = (dx * dx + dy * dy).sqrt();

    // In range: stop and attack whatever is targeted (the gate if nothing else)
    if distance <= profile.attack_range {
        let mut update = update.enter(EnemyPhase::Attack);
        update.attack_cooldown = 0.0;
        return update;
    }

    let step = (profile.speed * ctx.dt).min(distance);
    let next = Position::new(
        ctx.position.x + dx / distance * step,
        ctx.position.y + dy / distance * step,
        ctx.position.z,
    );

    // The next step would enter a wall: attack it instead of moving
    if let Some(wall) = walls.blocking_wall(next.x, next.y) {
        let mut update = update.enter(EnemyPhase::Attack);
        update.target_wall = Some(wall);
        update.attack_cooldown = 0.0;
        return update;
    }

    EnemyUpdate {
        new_position: next,
        ..update
    }
}

fn evaluate_attack<W: WallQuery + ?Sized>(
    ctx: &EnemyContext,
    profile: &EnemyProfile,
    walls: &W,
) -> EnemyUpdate {
    let mut update = EnemyUpdate::unchanged(ctx);

    // The wall came down: walk on through the breach
    if let Some(wall) = ctx.target_wall {
        if !walls.is_standing(wall) {
            let mut update = update.enter(EnemyPhase::Advance);
            update.target_wall = None;
            return update;
        }
    }

    update.swing_phase = ctx.swing_phase + profile.swing_rate * ctx.dt;
    let target = target_point(ctx, walls);

    match profile.launcher {
        Some(launcher) => {
            update.reload = ctx.reload - ctx.dt;
            if update.reload <= 0.0 {
                update.reload = ctx.attack_rate;
                update.action = Some(launch(ctx, &launcher, profile.damage, &target));
            }
        }
        None => {
            update.attack_cooldown = ctx.attack_cooldown - ctx.dt;
            if update.attack_cooldown <= 0.0 {
                update.attack_cooldown = ctx.attack_rate;
                let owner = ctx
                    .target_wall
                    .and_then(|id| walls.wall_owner(id))
                    .unwrap_or(ctx.gate_owner);
                update.action = Some(EnemyAction::Strike {
                    owner,
                    damage: profile.damage,
                    at: target,
                });
            }
        }
    }

    update
}

/// Aim straight at the target from ground level, then add the launcher's loft.
fn launch(
    ctx: &EnemyContext,
    launcher: &LauncherProfile,
    damage: f64,
    target: &Position,
) -> EnemyAction {
    let ground = Position::new(ctx.position.x, ctx.position.y, 0.0);
    let range = ground.range_to(target);
    let (dir_x, dir_y, dir_z) = if range > f64::EPSILON {
        (
            (target.x - ground.x) / range,
            (target.y - ground.y) / range,
            (target.z - ground.z) / range,
        )
    } else {
        (0.0, 0.0, 1.0)
    };

    EnemyAction::Launch {
        kind: launcher.kind,
        origin: Position::new(ctx.position.x, ctx.position.y, launcher.muzzle_height),
        velocity: Velocity::new(
            dir_x * launcher.muzzle_speed,
            dir_y * launcher.muzzle_speed,
            dir_z * launcher.muzzle_speed + launcher.loft,
        ),
        radius: launcher.radius,
        damage,
    }
}
