//! Tests for the simulation engine, the siege systems, the garrison and the player.

use castle_core::commands::PlayerCommand;
use castle_core::components::{EnemyState, ParticleBurst, Projectile};
use castle_core::enums::*;
use castle_core::error::ActionError;
use castle_core::events::SimEvent;
use castle_core::state::GameStateSnapshot;
use castle_core::types::{Position, Velocity, WallId};
use castle_layout::CastleLayout;

use crate::engine::{SimConfig, SimulationEngine};
use crate::garrison::Garrison;
use crate::player::{Collected, PlayerState};
use crate::systems::spawner::SpawnFlags;
use crate::world_setup;

fn quiet_config() -> SimConfig {
    SimConfig {
        spawn: SpawnFlags {
            barbarian: false,
            archer: false,
            giant: false,
            cannon: false,
        },
        ..Default::default()
    }
}

/// Engine that has processed `StartMission` and run one tick.
fn started(config: SimConfig) -> SimulationEngine {
    let mut engine = SimulationEngine::new(config).expect("default layout is valid");
    engine.queue_command(PlayerCommand::StartMission);
    engine.tick();
    engine
}

fn run_ticks(engine: &mut SimulationEngine, ticks: usize) -> Vec<GameStateSnapshot> {
    (0..ticks).map(|_| engine.tick()).collect()
}

fn all_events(snapshots: &[GameStateSnapshot]) -> Vec<SimEvent> {
    snapshots.iter().flat_map(|s| s.events.clone()).collect()
}

fn count_projectiles(engine: &SimulationEngine) -> usize {
    let mut q = engine.world().query::<&Projectile>();
    q.iter().count()
}

fn count_bursts(engine: &SimulationEngine) -> usize {
    let mut q = engine.world().query::<&ParticleBurst>();
    q.iter().count()
}

// ---- Determinism ----

#[test]
fn test_determinism_same_seed() {
    let mut engine_a = SimulationEngine::new(SimConfig {
        seed: 12345,
        ..Default::default()
    })
    .unwrap();
    let mut engine_b = SimulationEngine::new(SimConfig {
        seed: 12345,
        ..Default::default()
    })
    .unwrap();

    engine_a.queue_command(PlayerCommand::StartMission);
    engine_b.queue_command(PlayerCommand::StartMission);

    for _ in 0..300 {
        let snap_a = engine_a.tick();
        let snap_b = engine_b.tick();

        let json_a = serde_json::to_string(&snap_a).unwrap();
        let json_b = serde_json::to_string(&snap_b).unwrap();
        assert_eq!(json_a, json_b, "Snapshots diverged with same seed");
    }
}

#[test]
fn test_determinism_different_seeds() {
    let mut engine_a = SimulationEngine::new(SimConfig {
        seed: 111,
        ..Default::default()
    })
    .unwrap();
    let mut engine_b = SimulationEngine::new(SimConfig {
        seed: 222,
        ..Default::default()
    })
    .unwrap();

    engine_a.queue_command(PlayerCommand::StartMission);
    engine_b.queue_command(PlayerCommand::StartMission);

    // Spawn angles are drawn on the first tick, so positions differ at once.
    let json_a = serde_json::to_string(&engine_a.tick().enemies).unwrap();
    let json_b = serde_json::to_string(&engine_b.tick().enemies).unwrap();
    assert_ne!(json_a, json_b, "Different seeds should produce divergent output");
}

#[test]
fn test_invalid_layout_rejected() {
    let layout = CastleLayout {
        defended_castle: 7,
        ..Default::default()
    };
    let result = SimulationEngine::new(SimConfig {
        layout,
        ..Default::default()
    });
    assert!(result.is_err());
}

// ---- Phases and commands ----

#[test]
fn test_setup_phase_does_not_tick() {
    let mut engine = SimulationEngine::new(SimConfig::default()).unwrap();
    let snap = engine.tick();
    assert_eq!(snap.phase, GamePhase::Setup);
    assert_eq!(snap.time.tick, 0);
    assert!(snap.enemies.is_empty());
    // Structures and player are visible before the siege starts.
    assert_eq!(snap.structures.len(), 4);
    assert!(snap.player.at_spawn);
}

#[test]
fn test_start_mission_spawns_one_of_each() {
    let mut engine = SimulationEngine::new(SimConfig::default()).unwrap();
    engine.queue_command(PlayerCommand::StartMission);
    let snap = engine.tick();

    assert_eq!(snap.phase, GamePhase::Active);
    assert_eq!(snap.time.tick, 1);
    let kinds: Vec<EnemyKind> = snap.enemies.iter().map(|e| e.kind).collect();
    assert_eq!(kinds, EnemyKind::ALL.to_vec());
    assert_eq!(snap.score.enemies_spawned, 4);
    assert_eq!(snap.score.enemies_alive, 4);

    let spawned = snap
        .events
        .iter()
        .filter(|e| matches!(e, SimEvent::EnemySpawned { .. }))
        .count();
    assert_eq!(spawned, 4);

    // Everyone starts on the spawn ring.
    for enemy in &snap.enemies {
        let r = enemy.position.horizontal_range_to(&Position::default());
        assert!((r - castle_core::constants::SPAWN_RADIUS).abs() < 10.0, "r = {r}");
    }
}

#[test]
fn test_start_mission_twice_is_refused() {
    let mut engine = started(quiet_config());
    engine.queue_command(PlayerCommand::StartMission);
    let snap = engine.tick();
    assert_eq!(snap.alerts.len(), 1);
    assert_eq!(snap.alerts[0].level, AlertLevel::Warning);
    assert_eq!(snap.alerts[0].message, "not allowed while Active");
}

#[test]
fn test_disabled_spawners_spawn_nothing() {
    let mut engine = started(quiet_config());
    run_ticks(&mut engine, 90);
    assert_eq!(engine.score().enemies_spawned, 0);
}

#[test]
fn test_enabling_a_spawner() {
    let mut engine = started(quiet_config());
    engine.queue_command(PlayerCommand::SetSpawnEnabled {
        kind: EnemyKind::Giant,
        enabled: true,
    });
    let snap = engine.tick();
    assert_eq!(snap.enemies.len(), 1);
    assert_eq!(snap.enemies[0].kind, EnemyKind::Giant);

    let giant = snap
        .spawners
        .iter()
        .find(|s| s.kind == EnemyKind::Giant)
        .unwrap();
    assert!(giant.enabled);
    assert!(giant.remaining_secs >= 3.9 && giant.remaining_secs < 7.0);
}

#[test]
fn test_spawn_toggles_before_start_survive_mission_start() {
    let mut engine = SimulationEngine::new(SimConfig::default()).unwrap();
    engine.queue_commands(EnemyKind::ALL.map(|kind| PlayerCommand::SetSpawnEnabled {
        kind,
        enabled: false,
    }));
    engine.queue_command(PlayerCommand::StartMission);
    let snap = engine.tick();
    assert_eq!(snap.phase, GamePhase::Active);
    assert!(snap.enemies.is_empty());
    assert!(snap.spawners.iter().all(|s| !s.enabled));

    run_ticks(&mut engine, 60);
    assert_eq!(engine.score().enemies_spawned, 0);
}

#[test]
fn test_spawn_toggle_survives_restart() {
    let mut engine = started(quiet_config());
    engine.queue_command(PlayerCommand::SetSpawnEnabled {
        kind: EnemyKind::Cannon,
        enabled: true,
    });
    engine.tick();
    assert_eq!(engine.score().enemies_spawned, 1);

    // Bring the defended castle down, then restart.
    engine.garrison_mut().damage(WallOwner::Castle(0), 995.0);
    engine.spawn_test_enemy(EnemyKind::Barbarian, Position::new(-800.0, -2700.0, 0.0));
    for _ in 0..120 {
        if engine.tick().phase == GamePhase::Fallen {
            break;
        }
    }
    assert_eq!(engine.phase(), GamePhase::Fallen);

    engine.queue_command(PlayerCommand::StartMission);
    let snap = engine.tick();
    assert_eq!(snap.phase, GamePhase::Active);
    let enabled: Vec<EnemyKind> = snap
        .spawners
        .iter()
        .filter(|s| s.enabled)
        .map(|s| s.kind)
        .collect();
    assert_eq!(enabled, vec![EnemyKind::Cannon]);
    assert_eq!(snap.enemies.len(), 1);
    assert_eq!(snap.enemies[0].kind, EnemyKind::Cannon);
}

#[test]
fn test_spawn_enemy_command() {
    let mut engine = SimulationEngine::new(quiet_config()).unwrap();
    engine.queue_command(PlayerCommand::SpawnEnemy {
        kind: EnemyKind::Cannon,
    });
    let snap = engine.tick();
    assert!(snap.enemies.is_empty());
    assert_eq!(snap.alerts[0].message, "not allowed while Setup");

    engine.queue_command(PlayerCommand::StartMission);
    engine.queue_command(PlayerCommand::SpawnEnemy {
        kind: EnemyKind::Cannon,
    });
    let snap = engine.tick();
    assert_eq!(snap.enemies.len(), 1);
    assert_eq!(snap.enemies[0].kind, EnemyKind::Cannon);
    assert_eq!(snap.enemies[0].hp, 120.0);
}

#[test]
fn test_pause_and_resume() {
    let mut engine = started(SimConfig::default());
    let before = engine.tick();

    engine.queue_command(PlayerCommand::Pause);
    run_ticks(&mut engine, 10);
    let paused = engine.tick();
    assert_eq!(paused.phase, GamePhase::Paused);
    assert_eq!(paused.time.tick, before.time.tick);
    assert_eq!(
        serde_json::to_string(&paused.enemies).unwrap(),
        serde_json::to_string(&before.enemies).unwrap()
    );

    engine.queue_command(PlayerCommand::Resume);
    let resumed = engine.tick();
    assert_eq!(resumed.phase, GamePhase::Active);
    assert_eq!(resumed.time.tick, before.time.tick + 1);

    engine.queue_command(PlayerCommand::TogglePause);
    assert_eq!(engine.tick().phase, GamePhase::Paused);
    engine.queue_command(PlayerCommand::TogglePause);
    assert_eq!(engine.tick().phase, GamePhase::Active);
}

#[test]
fn test_time_scale_clamped() {
    let mut engine = SimulationEngine::new(SimConfig::default()).unwrap();
    engine.queue_command(PlayerCommand::SetTimeScale { scale: 10.0 });
    engine.tick();
    assert_eq!(engine.time_scale(), 4.0);
    engine.queue_command(PlayerCommand::SetTimeScale { scale: -1.0 });
    engine.tick();
    assert_eq!(engine.time_scale(), 0.0);
}

#[test]
fn test_events_drained_each_tick() {
    let mut engine = SimulationEngine::new(SimConfig::default()).unwrap();
    engine.queue_command(PlayerCommand::StartMission);
    assert!(!engine.tick().events.is_empty());
    // Next spawn is at least a second away.
    assert!(engine.tick().events.is_empty());
}

// ---- Enemies against walls ----

#[test]
fn test_barbarian_stops_at_perimeter_and_strikes() {
    let mut engine = started(quiet_config());
    let barbarian = engine.spawn_test_enemy(EnemyKind::Barbarian, Position::new(-800.0, -4000.0, 0.0));

    let snaps = run_ticks(&mut engine, 150);

    let state: EnemyState = (*engine.world().get::<&EnemyState>(barbarian).unwrap()).clone();
    let pos = *engine.world().get::<&Position>(barbarian).unwrap();
    assert_eq!(state.phase, EnemyPhase::Attack);
    assert_eq!(state.target_wall, Some(WallId(2)));
    // Stopped just short of the south perimeter wall face (y = -3000).
    assert!(pos.y <= -3000.0 && pos.y > -3010.0, "y = {}", pos.y);
    assert_eq!(pos.x, -800.0);

    // Exactly one strike so far (attack rate 1.4 s).
    assert_eq!(engine.garrison().hp(WallOwner::Perimeter), Some(4992.0));
    let strikes: Vec<SimEvent> = all_events(&snaps)
        .into_iter()
        .filter(|e| matches!(e, SimEvent::WallStruck { .. }))
        .collect();
    assert_eq!(strikes.len(), 1);
    match &strikes[0] {
        SimEvent::WallStruck { owner, damage, .. } => {
            assert_eq!(*owner, WallOwner::Perimeter);
            assert_eq!(*damage, 8.0);
        }
        _ => unreachable!(),
    }
    // Strike left a burst behind.
    assert!(snaps.iter().any(|s| !s.effects.is_empty()));
}

#[test]
fn test_breach_lets_attackers_through() {
    let mut engine = started(quiet_config());
    engine.garrison_mut().damage(WallOwner::Perimeter, 4995.0);
    let barbarian = engine.spawn_test_enemy(EnemyKind::Barbarian, Position::new(-800.0, -4000.0, 0.0));

    let snaps = run_ticks(&mut engine, 200);
    let events = all_events(&snaps);

    assert!(engine.walls().is_breached(WallOwner::Perimeter));
    assert_eq!(engine.garrison().hp(WallOwner::Perimeter), Some(0.0));
    let breaches = events
        .iter()
        .filter(|e| matches!(e, SimEvent::StructureBreached { owner: WallOwner::Perimeter }))
        .count();
    assert_eq!(breaches, 1);
    // The perimeter is not the defended castle.
    assert_eq!(engine.phase(), GamePhase::Active);

    // Walked on to the gate and is now hitting the defended castle.
    let state: EnemyState = (*engine.world().get::<&EnemyState>(barbarian).unwrap()).clone();
    assert_eq!(state.phase, EnemyPhase::Attack);
    assert_eq!(state.target_wall, None);
    assert!(engine.garrison().hp(WallOwner::Castle(0)).unwrap() < 1000.0);

    let last = snaps.last().unwrap();
    let perimeter = last
        .structures
        .iter()
        .find(|s| s.owner == WallOwner::Perimeter)
        .unwrap();
    assert!(perimeter.breached);
}

#[test]
fn test_castle_falls_and_enemies_go_idle() {
    let mut engine = started(quiet_config());
    engine.garrison_mut().damage(WallOwner::Castle(0), 995.0);
    let barbarian = engine.spawn_test_enemy(EnemyKind::Barbarian, Position::new(-800.0, -2700.0, 0.0));

    // Tick 1: in range, switch to attack. Tick 2: strike.
    engine.tick();
    let snap = engine.tick();
    assert_eq!(snap.phase, GamePhase::Fallen);
    assert!(snap.events.iter().any(|e| matches!(e, SimEvent::CastleFallen)));
    assert!(snap.alerts.iter().any(|a| a.level == AlertLevel::Critical));
    assert!(!snap.score.castle_standing);
    assert_eq!(engine.garrison().hp(WallOwner::Castle(0)), Some(0.0));

    engine.tick();
    let state: EnemyState = (*engine.world().get::<&EnemyState>(barbarian).unwrap()).clone();
    assert_eq!(state.phase, EnemyPhase::Idle);

    // No more strikes once idle.
    let events = all_events(&run_ticks(&mut engine, 60));
    assert!(!events.iter().any(|e| matches!(e, SimEvent::WallStruck { .. })));

    // Healing is refused once fallen.
    engine.player_mut().coins = 100;
    engine.queue_command(PlayerCommand::HealCastle);
    let snap = engine.tick();
    assert_eq!(snap.alerts[0].message, "not allowed while Fallen");
    assert_eq!(engine.player().coins, 100);
}

#[test]
fn test_restart_after_fall() {
    let mut engine = started(quiet_config());
    engine.garrison_mut().damage(WallOwner::Castle(0), 995.0);
    engine.spawn_test_enemy(EnemyKind::Barbarian, Position::new(-800.0, -2700.0, 0.0));
    run_ticks(&mut engine, 3);
    assert_eq!(engine.phase(), GamePhase::Fallen);

    engine.queue_command(PlayerCommand::StartMission);
    let snap = engine.tick();
    assert_eq!(snap.phase, GamePhase::Active);
    assert!(snap.enemies.is_empty());
    assert_eq!(engine.garrison().hp(WallOwner::Castle(0)), Some(1000.0));
    assert!(!engine.walls().is_breached(WallOwner::Castle(0)));
}

#[test]
fn test_cannon_shells_perimeter() {
    let mut engine = started(quiet_config());
    engine.spawn_test_enemy(EnemyKind::Cannon, Position::new(-800.0, -6000.0, 0.0));

    let events = all_events(&run_ticks(&mut engine, 450));

    assert!(engine.garrison().hp(WallOwner::Perimeter).unwrap() < 5000.0);
    assert!(events.iter().any(|e| matches!(
        e,
        SimEvent::ProjectileImpact {
            kind: ProjectileKind::Ball,
            owner: WallOwner::Perimeter,
            ..
        }
    )));
    // Ranged kinds never strike in melee.
    assert!(!events.iter().any(|e| matches!(e, SimEvent::WallStruck { .. })));
}

// ---- Projectiles and effects ----

fn spawn_ball(engine: &mut SimulationEngine, x: f64) {
    world_setup::spawn_projectile(
        engine.world_mut(),
        ProjectileKind::Ball,
        Faction::Besieger,
        Position::new(x, -2900.0, 200.0),
        Velocity::default(),
        30.0,
        30.0,
    );
}

#[test]
fn test_ball_inside_standing_wall_hits() {
    let mut engine = started(quiet_config());
    spawn_ball(&mut engine, -800.0);
    let snap = engine.tick();
    assert_eq!(count_projectiles(&engine), 0);
    assert_eq!(engine.garrison().hp(WallOwner::Perimeter), Some(4970.0));
    assert!(snap
        .events
        .iter()
        .any(|e| matches!(e, SimEvent::ProjectileImpact { .. })));
}

#[test]
fn test_shot_passes_owner_already_at_zero() {
    let mut engine = started(quiet_config());
    engine.garrison_mut().damage(WallOwner::Perimeter, 5000.0);
    // Walls still stand in the registry, but the pool is empty.
    assert!(!engine.walls().is_breached(WallOwner::Perimeter));

    spawn_ball(&mut engine, -800.0);
    let snap = engine.tick();
    assert_eq!(count_projectiles(&engine), 1);
    assert_eq!(count_bursts(&engine), 0);
    assert!(!snap
        .events
        .iter()
        .any(|e| matches!(e, SimEvent::ProjectileImpact { .. })));
}

#[test]
fn test_second_shot_in_breaching_tick_passes() {
    let mut engine = started(quiet_config());
    engine.garrison_mut().damage(WallOwner::Perimeter, 4990.0);
    spawn_ball(&mut engine, -800.0);
    spawn_ball(&mut engine, -1000.0);

    let snap = engine.tick();
    let impacts = snap
        .events
        .iter()
        .filter(|e| matches!(e, SimEvent::ProjectileImpact { .. }))
        .count();
    assert_eq!(impacts, 1);
    assert!(snap.events.iter().any(|e| matches!(
        e,
        SimEvent::StructureBreached {
            owner: WallOwner::Perimeter
        }
    )));
    assert_eq!(count_projectiles(&engine), 1);
    assert_eq!(engine.garrison().hp(WallOwner::Perimeter), Some(0.0));

    let snap = engine.tick();
    assert!(!snap
        .events
        .iter()
        .any(|e| matches!(e, SimEvent::ProjectileImpact { .. })));
    assert_eq!(count_projectiles(&engine), 1);
}


#[test]
fn test_projectile_expires_after_life() {
    let mut engine = started(quiet_config());
    world_setup::spawn_projectile(
        engine.world_mut(),
        ProjectileKind::Arrow,
        Faction::Besieger,
        Position::new(10_000.0, 10_000.0, 5000.0),
        Velocity::default(),
        6.0,
        6.0,
    );
    run_ticks(&mut engine, 140);
    assert_eq!(count_projectiles(&engine), 1);
    run_ticks(&mut engine, 20);
    assert_eq!(count_projectiles(&engine), 0);
}

#[test]
fn test_projectile_expires_below_ground() {
    let mut engine = started(quiet_config());
    world_setup::spawn_projectile(
        engine.world_mut(),
        ProjectileKind::Ball,
        Faction::Besieger,
        Position::new(10_000.0, 10_000.0, 0.0),
        Velocity::new(0.0, 0.0, -3000.0),
        30.0,
        30.0,
    );
    engine.tick();
    assert_eq!(count_projectiles(&engine), 0);
    // Ground hits leave no burst.
    assert_eq!(count_bursts(&engine), 0);
}

#[test]
fn test_projectile_falls_under_gravity() {
    let mut engine = started(quiet_config());
    let entity = world_setup::spawn_projectile(
        engine.world_mut(),
        ProjectileKind::Arrow,
        Faction::Besieger,
        Position::new(10_000.0, 10_000.0, 5000.0),
        Velocity::default(),
        6.0,
        6.0,
    );
    run_ticks(&mut engine, 30);
    let vel = *engine.world().get::<&Velocity>(entity).unwrap();
    assert!((vel.z + 300.0).abs() < 1e-6, "vz = {}", vel.z);
}

#[test]
fn test_trails_recorded_and_cleared() {
    let mut engine = started(SimConfig {
        trails: true,
        ..quiet_config()
    });
    world_setup::spawn_projectile(
        engine.world_mut(),
        ProjectileKind::Arrow,
        Faction::Besieger,
        Position::new(10_000.0, 10_000.0, 5000.0),
        Velocity::new(100.0, 0.0, 0.0),
        6.0,
        6.0,
    );
    let snap = run_ticks(&mut engine, 30).pop().unwrap();
    assert!(snap.trails);
    assert_eq!(snap.projectiles[0].trail.len(), 20);
    // Newest first.
    assert_eq!(snap.projectiles[0].trail[0], snap.projectiles[0].position);

    engine.queue_command(PlayerCommand::SetTrails { enabled: false });
    let snap = engine.tick();
    assert!(!snap.trails);
    assert!(snap.projectiles[0].trail.is_empty());
}

#[test]
fn test_burst_expires_after_one_second() {
    let mut engine = started(quiet_config());
    let mut rng = <rand_chacha::ChaCha8Rng as rand::SeedableRng>::seed_from_u64(1);
    world_setup::spawn_burst(
        engine.world_mut(),
        &mut rng,
        Position::new(0.0, 0.0, 100.0),
        (40.0, 28),
    );

    let snap = run_ticks(&mut engine, 20).pop().unwrap();
    assert_eq!(snap.effects.len(), 1);
    assert_eq!(snap.effects[0].size, 40.0);
    assert!(snap.effects[0].particles.len() <= 28);

    run_ticks(&mut engine, 15);
    assert_eq!(count_bursts(&engine), 0);
}

#[test]
fn test_burst_particles_rise_then_fall() {
    let mut rng = <rand_chacha::ChaCha8Rng as rand::SeedableRng>::seed_from_u64(9);
    let burst = crate::systems::effects::new_burst(Position::new(0.0, 0.0, 0.0), 80.0, 56, &mut rng);
    assert_eq!(burst.particles.len(), 56);
    assert_eq!(burst.life, 1.0);
    for p in &burst.particles {
        let horizontal = p.velocity.horizontal_speed();
        assert!((50.0..150.0).contains(&horizontal));
        assert!((50.0..200.0).contains(&p.velocity.z));
        assert!((0.5..1.5).contains(&p.life));
    }
}

#[test]
fn test_defender_arrow_hits_enemy() {
    let mut engine = started(quiet_config());
    let barbarian = engine.spawn_test_enemy(EnemyKind::Barbarian, Position::new(10_000.0, 0.0, 0.0));
    world_setup::spawn_projectile(
        engine.world_mut(),
        ProjectileKind::Arrow,
        Faction::Defender,
        Position::new(9700.0, 0.0, 100.0),
        Velocity::new(900.0, 0.0, 0.0),
        6.0,
        30.0,
    );

    let events = all_events(&run_ticks(&mut engine, 15));

    assert!(events
        .iter()
        .any(|e| matches!(e, SimEvent::EnemyHit { damage, .. } if *damage == 30.0)));
    let state: EnemyState = (*engine.world().get::<&EnemyState>(barbarian).unwrap()).clone();
    assert_eq!(state.hp, 60.0);
    assert_eq!(count_projectiles(&engine), 0);
    // Defender hits never damage structures.
    assert_eq!(engine.garrison().damage_taken(), 0.0);
}

#[test]
fn test_killed_enemy_is_removed() {
    let mut engine = started(quiet_config());
    let barbarian = engine.spawn_test_enemy(EnemyKind::Barbarian, Position::new(10_000.0, 0.0, 0.0));
    engine
        .world_mut()
        .get::<&mut EnemyState>(barbarian)
        .unwrap()
        .hp = 10.0;
    world_setup::spawn_projectile(
        engine.world_mut(),
        ProjectileKind::Arrow,
        Faction::Defender,
        Position::new(9700.0, 0.0, 100.0),
        Velocity::new(900.0, 0.0, 0.0),
        6.0,
        30.0,
    );

    let snaps = run_ticks(&mut engine, 15);
    let events = all_events(&snaps);

    assert!(events.iter().any(|e| matches!(
        e,
        SimEvent::EnemyKilled {
            kind: EnemyKind::Barbarian,
            ..
        }
    )));
    assert!(engine.world().get::<&EnemyState>(barbarian).is_err());
    assert_eq!(engine.score().enemies_killed, 1);
    let last = snaps.last().unwrap();
    assert_eq!(last.score.enemies_alive, 0);
    // Death burst placed at body height.
    assert!(last.effects.iter().any(|e| e.origin.z == 100.0));
}

#[test]
fn test_out_of_bounds_enemy_despawned() {
    let mut engine = started(quiet_config());
    let far = engine.spawn_test_enemy(EnemyKind::Giant, Position::new(25_000.0, 0.0, 0.0));
    engine.tick();
    assert!(engine.world().get::<&EnemyState>(far).is_err());
}

// ---- Garrison ----

#[test]
fn test_garrison_damage_floors_at_zero() {
    let mut garrison = Garrison::from_layout(&CastleLayout::default());
    assert_eq!(garrison.hp(WallOwner::Castle(1)), Some(1000.0));
    assert_eq!(garrison.hp(WallOwner::Perimeter), Some(5000.0));

    assert!(!garrison.damage(WallOwner::Castle(1), 400.0));
    assert!(garrison.damage(WallOwner::Castle(1), 900.0));
    assert_eq!(garrison.hp(WallOwner::Castle(1)), Some(0.0));
    assert!(garrison.is_breached(WallOwner::Castle(1)));
    // Breach is only reported once.
    assert!(!garrison.damage(WallOwner::Castle(1), 10.0));
    assert_eq!(garrison.damage_taken(), 1000.0);
}

#[test]
fn test_garrison_heal_caps_at_max() {
    let mut garrison = Garrison::from_layout(&CastleLayout::default());
    garrison.damage(WallOwner::Castle(0), 10.0);
    assert_eq!(garrison.heal(WallOwner::Castle(0), 20.0), Some(1000.0));
    assert_eq!(garrison.heal(WallOwner::Castle(9), 20.0), None);
}

#[test]
fn test_garrison_unknown_owner_ignored() {
    let mut garrison = Garrison::from_layout(&CastleLayout::default());
    assert!(!garrison.damage(WallOwner::Castle(9), 10.0));
    assert_eq!(garrison.damage_taken(), 0.0);
    let owners: Vec<WallOwner> = garrison.views().iter().map(|s| s.owner).collect();
    assert_eq!(
        owners,
        vec![
            WallOwner::Castle(0),
            WallOwner::Castle(1),
            WallOwner::Castle(2),
            WallOwner::Perimeter
        ]
    );
}

// ---- Player ----

#[test]
fn test_player_starts_on_spawn_and_cannot_walk() {
    let layout = CastleLayout::default();
    let mut player = PlayerState::new(&layout);
    assert_eq!(player.position, Position::new(-1000.0, 1500.0, 1630.0));
    assert!(player.at_spawn(&layout));
    assert_eq!(
        player.step(&layout, StepDirection::Forward),
        Err(ActionError::AtSpawn)
    );
}

#[test]
fn test_roof_teleport_only_from_spawn() {
    let layout = CastleLayout::default();
    let mut player = PlayerState::new(&layout);

    assert_eq!(
        player.teleport_to_roof(&layout, 9),
        Err(ActionError::UnknownCastle(9))
    );
    let to = player.teleport_to_roof(&layout, 0).unwrap();
    assert_eq!(to, Position::new(-800.0, -1600.0, 675.0));
    assert_eq!(
        player.teleport_to_roof(&layout, 1),
        Err(ActionError::NotAtSpawn)
    );
}

#[test]
fn test_spawn_return_needs_castle_centre() {
    let layout = CastleLayout::default();
    let mut player = PlayerState::new(&layout);
    assert_eq!(
        player.teleport_to_spawn(&layout),
        Err(ActionError::NotNearCastleCenter)
    );

    player.teleport_to_roof(&layout, 2).unwrap();
    assert_eq!(player.teleport_to_spawn(&layout), Ok(layout.player_spawn()));
    assert!(player.at_spawn(&layout));
}

#[test]
fn test_walk_and_turn_on_roof() {
    let layout = CastleLayout::default();
    let mut player = PlayerState::new(&layout);
    player.teleport_to_roof(&layout, 0).unwrap();

    let pos = player.step(&layout, StepDirection::Forward).unwrap();
    assert!((pos.x + 800.0).abs() < 1e-9);
    assert!((pos.y + 1550.0).abs() < 1e-9);
    assert_eq!(pos.z, 675.0);

    player.turn(TurnDirection::Left);
    assert_eq!(player.angle_deg, 5.0);
    player.turn(TurnDirection::Right);
    player.turn(TurnDirection::Right);
    assert_eq!(player.angle_deg, 355.0);
}

#[test]
fn test_walking_is_clamped_to_castle_footprint() {
    let layout = CastleLayout::default();
    let mut player = PlayerState::new(&layout);
    player.teleport_to_roof(&layout, 0).unwrap();
    for _ in 0..40 {
        player.step(&layout, StepDirection::Forward).unwrap();
    }
    // Castle 0 spans y in [-2400, -800].
    assert!((player.position.y + 800.0).abs() < 1e-9);
}

#[test]
fn test_roof_lift_down_and_up() {
    let layout = CastleLayout::default();
    let mut player = PlayerState::new(&layout);
    player.teleport_to_roof(&layout, 0).unwrap();

    let down = player.roof_lift(&layout).unwrap();
    assert_eq!(down, Position::new(-800.0, -1600.0, 50.0));
    let up = player.roof_lift(&layout).unwrap();
    assert_eq!(up, Position::new(-800.0, -1600.0, 610.0));
    let down_again = player.roof_lift(&layout).unwrap();
    assert_eq!(down_again.z, 50.0);
}

#[test]
fn test_roof_lift_needs_platform() {
    let layout = CastleLayout::default();
    let mut player = PlayerState::new(&layout);
    player.teleport_to_roof(&layout, 0).unwrap();
    for _ in 0..3 {
        player.step(&layout, StepDirection::Forward).unwrap();
    }
    assert_eq!(
        player.roof_lift(&layout),
        Err(ActionError::NotNearCastleCenter)
    );
}

#[test]
fn test_chest_grants_coins_with_cooldown() {
    let layout = CastleLayout::default();
    let mut player = PlayerState::new(&layout);
    player.position = Position::new(1200.0, 500.0, 50.0);

    assert_eq!(
        player.interact(&layout, 0),
        Ok(Collected {
            coins: Some(100),
            arrows: None
        })
    );
    // 60 ticks = 2 s in, 3 s to go.
    assert_eq!(
        player.interact(&layout, 60),
        Err(ActionError::ChestRecharging(3.0))
    );
    assert_eq!(player.chest_cooldown(60), 3.0);
    assert!(player.interact(&layout, 150).is_ok());
    assert_eq!(player.coins, 200);
    assert_eq!(player.chest_cooldown(150), 5.0);
}

#[test]
fn test_chest_reopens_exactly_five_seconds_later() {
    let mut engine = started(quiet_config());
    engine.player_mut().position = Position::new(1200.0, 500.0, 50.0);

    engine.queue_command(PlayerCommand::Interact);
    let opened_on = engine.time().tick;
    let snap = engine.tick();
    assert_eq!(engine.player().coins, 100);
    // The view is taken after the tick advanced.
    assert!(snap.player.chest_cooldown_secs > 4.9 && snap.player.chest_cooldown_secs < 5.0);

    // One tick short of the cooldown.
    run_ticks(&mut engine, 148);
    assert_eq!(engine.time().tick, opened_on + 149);
    engine.queue_command(PlayerCommand::Interact);
    let snap = engine.tick();
    assert_eq!(snap.alerts[0].message, "chest is recharging, 0.0s remaining");
    assert_eq!(engine.player().coins, 100);

    // 150 ticks after the first pickup.
    assert_eq!(engine.time().tick, opened_on + 150);
    engine.queue_command(PlayerCommand::Interact);
    let snap = engine.tick();
    assert!(snap.alerts.is_empty());
    assert_eq!(engine.player().coins, 200);
    assert!(snap
        .events
        .iter()
        .any(|e| matches!(e, SimEvent::CoinsCollected { amount: 100, total: 200 })));
}

#[test]
fn test_log_pile_grants_arrows() {
    let layout = CastleLayout::default();
    let mut player = PlayerState::new(&layout);
    player.position = Position::new(1200.0, 1500.0, 50.0);
    let collected = player.interact(&layout, 0).unwrap();
    assert_eq!(collected.arrows, Some(100));
    assert_eq!(collected.coins, None);
    assert_eq!(player.arrows, 100);
}

#[test]
fn test_interact_with_nothing() {
    let layout = CastleLayout::default();
    let mut player = PlayerState::new(&layout);
    assert_eq!(
        player.interact(&layout, 0),
        Err(ActionError::NothingToCollect)
    );
}

#[test]
fn test_fire_arrow_uses_heading_and_elevation() {
    let layout = CastleLayout::default();
    let mut player = PlayerState::new(&layout);
    assert_eq!(player.fire_arrow(), Err(ActionError::OutOfArrows));

    player.arrows = 1;
    let shot = player.fire_arrow().unwrap();
    assert_eq!(player.arrows, 0);
    assert_eq!(shot.origin, Position::new(-1000.0, 1500.0, 1750.0));
    assert!((shot.velocity.speed() - 900.0).abs() < 1e-9);
    assert!(shot.velocity.x.abs() < 1e-9);
    assert!(shot.velocity.y > 0.0);
    let elevation = shot.velocity.z.atan2(shot.velocity.horizontal_speed());
    assert!((elevation.to_degrees() - 5.0).abs() < 1e-9);
}

#[test]
fn test_eye_and_view_toggle() {
    let layout = CastleLayout::default();
    let mut player = PlayerState::new(&layout);
    let (eye, look_at) = player.eye();
    assert_eq!(eye.z, 1750.0);
    assert!(look_at.y > eye.y);
    assert_eq!(player.toggle_view(), ViewMode::FirstPerson);
    assert_eq!(player.toggle_view(), ViewMode::Orbit);
}

// ---- Player through the engine ----

#[test]
fn test_refused_action_becomes_warning() {
    let mut engine = started(quiet_config());
    engine.queue_command(PlayerCommand::Step {
        direction: StepDirection::Forward,
    });
    let snap = engine.tick();
    assert_eq!(snap.alerts.len(), 1);
    assert_eq!(snap.alerts[0].level, AlertLevel::Warning);
    assert_eq!(
        snap.alerts[0].message,
        "cannot walk off the spawn point, teleport instead"
    );
}

#[test]
fn test_teleport_emits_event() {
    let mut engine = started(quiet_config());
    engine.queue_command(PlayerCommand::TeleportToRoof { castle: 1 });
    let snap = engine.tick();
    assert!(snap.events.iter().any(|e| matches!(
        e,
        SimEvent::Teleported { to } if *to == Position::new(900.0, 1000.0, 875.0)
    )));
    assert!(!snap.player.at_spawn);
}

#[test]
fn test_heal_castle() {
    let mut engine = started(quiet_config());
    engine.player_mut().coins = 60;
    engine.garrison_mut().damage(WallOwner::Castle(0), 30.0);

    engine.queue_command(PlayerCommand::HealCastle);
    let snap = engine.tick();
    assert_eq!(engine.garrison().hp(WallOwner::Castle(0)), Some(990.0));
    assert_eq!(engine.player().coins, 10);
    assert!(snap.events.iter().any(|e| matches!(
        e,
        SimEvent::CastleHealed { amount, hp } if *amount == 20.0 && *hp == 990.0
    )));

    engine.queue_command(PlayerCommand::HealCastle);
    let snap = engine.tick();
    assert_eq!(snap.alerts[0].message, "not enough coins (10/50)");

    engine.player_mut().coins = 100;
    engine.queue_command(PlayerCommand::HealCastle);
    let snap = engine.tick();
    // Only 10 hp were missing.
    assert!(snap.events.iter().any(|e| matches!(
        e,
        SimEvent::CastleHealed { amount, .. } if *amount == 10.0
    )));

    engine.queue_command(PlayerCommand::HealCastle);
    let snap = engine.tick();
    assert_eq!(snap.alerts[0].message, "castle already at max health");
    assert_eq!(engine.player().coins, 50);
}

#[test]
fn test_fire_arrow_command() {
    let mut engine = SimulationEngine::new(quiet_config()).unwrap();
    engine.queue_command(PlayerCommand::FireArrow);
    assert_eq!(engine.tick().alerts[0].message, "not allowed while Setup");

    engine.queue_command(PlayerCommand::StartMission);
    engine.tick();
    engine.queue_command(PlayerCommand::FireArrow);
    assert_eq!(engine.tick().alerts[0].message, "no arrows left");

    engine.player_mut().arrows = 3;
    engine.queue_command(PlayerCommand::FireArrow);
    let snap = engine.tick();
    assert!(snap
        .events
        .iter()
        .any(|e| matches!(e, SimEvent::ArrowFired { remaining: 2 })));
    assert_eq!(snap.projectiles.len(), 1);
    assert_eq!(snap.projectiles[0].faction, Faction::Defender);
}

#[test]
fn test_interact_command_events() {
    let mut engine = started(quiet_config());
    engine.player_mut().position = Position::new(1200.0, 1500.0, 50.0);
    engine.queue_command(PlayerCommand::Interact);
    let snap = engine.tick();
    assert!(snap.events.iter().any(|e| matches!(
        e,
        SimEvent::ArrowsCollected {
            amount: 100,
            total: 100
        }
    )));
    assert_eq!(snap.player.arrows, 100);
}
