//! Simulation engine: the core of the siege.
//!
//! `SimulationEngine` owns the hecs ECS world together with the static
//! layout, the structure hit points and the player, processes player
//! commands, runs all systems, and produces `GameStateSnapshot`s. Completely
//! headless, enabling deterministic testing.

use std::collections::VecDeque;

use hecs::World;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use castle_core::commands::PlayerCommand;
use castle_core::components::PositionHistory;
use castle_core::constants::*;
use castle_core::enums::*;
use castle_core::error::ActionError;
use castle_core::events::{Alert, SimEvent};
use castle_core::state::GameStateSnapshot;
use castle_core::types::{Position, SimTime};
use castle_layout::{CastleLayout, LayoutError, WallRegistry};

use crate::garrison::Garrison;
use crate::player::PlayerState;
use crate::score::ScoreState;
use crate::systems;
use crate::systems::enemy_ai::Objective;
use crate::systems::spawner::{SpawnFlags, SpawnSchedule};
use crate::world_setup;

/// Configuration for starting a new simulation.
#[derive(Debug, Clone)]
pub struct SimConfig {
    /// RNG seed for determinism. Same seed = same simulation.
    pub seed: u64,
    /// Initial time scale (1.0 = normal).
    pub time_scale: f64,
    pub layout: CastleLayout,
    /// Record projectile trails from the start.
    pub trails: bool,
    /// Kinds the periodic spawner starts enabled for.
    pub spawn: SpawnFlags,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            time_scale: 1.0,
            layout: CastleLayout::default(),
            trails: false,
            spawn: SpawnFlags::default(),
        }
    }
}

/// The simulation engine. Owns the ECS world and all sim state.
pub struct SimulationEngine {
    world: World,
    time: SimTime,
    phase: GamePhase,
    time_scale: f64,
    rng: ChaCha8Rng,
    command_queue: VecDeque<PlayerCommand>,
    despawn_buffer: Vec<hecs::Entity>,
    events: Vec<SimEvent>,
    alerts: Vec<Alert>,
    breaches: Vec<WallOwner>,

    layout: CastleLayout,
    walls: WallRegistry,
    garrison: Garrison,
    player: PlayerState,
    spawn_flags: SpawnFlags,
    spawners: SpawnSchedule,
    trails: bool,
    next_enemy_id: u32,
    score: ScoreState,
}

impl SimulationEngine {
    /// Create a new simulation engine with the given config.
    ///
    /// Fails if the layout's cross references do not resolve.
    pub fn new(config: SimConfig) -> Result<Self, LayoutError> {
        config.layout.validate()?;

        Ok(Self {
            world: World::new(),
            time: SimTime::default(),
            phase: GamePhase::default(),
            time_scale: config.time_scale.clamp(0.0, MAX_TIME_SCALE),
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            command_queue: VecDeque::new(),
            despawn_buffer: Vec::new(),
            events: Vec::new(),
            alerts: Vec::new(),
            breaches: Vec::new(),
            walls: WallRegistry::from_layout(&config.layout),
            garrison: Garrison::from_layout(&config.layout),
            player: PlayerState::new(&config.layout),
            spawners: SpawnSchedule::new(&config.spawn),
            spawn_flags: config.spawn,
            trails: config.trails,
            next_enemy_id: 0,
            score: ScoreState::default(),
            layout: config.layout,
        })
    }

    /// Queue a player command for processing at the next tick boundary.
    pub fn queue_command(&mut self, command: PlayerCommand) {
        self.command_queue.push_back(command);
    }

    /// Queue multiple commands.
    pub fn queue_commands(&mut self, commands: impl IntoIterator<Item = PlayerCommand>) {
        self.command_queue.extend(commands);
    }

    /// Advance the simulation by one tick and return the resulting snapshot.
    pub fn tick(&mut self) -> GameStateSnapshot {
        self.process_commands();

        match self.phase {
            GamePhase::Active => {
                self.run_systems(true);
                self.time.advance();
            }
            // The siege is over: nothing new spawns, the rest settles.
            GamePhase::Fallen => {
                self.run_systems(false);
                self.time.advance();
            }
            GamePhase::Setup | GamePhase::Paused => {}
        }

        let world_views = systems::snapshot::build_snapshot(
            &self.world,
            &self.walls,
            self.layout.gate_point(),
            self.trails,
        );
        let enemies_alive = world_views.enemies.len() as u32;
        let defended = WallOwner::Castle(self.layout.defended_castle);

        GameStateSnapshot {
            time: self.time,
            phase: self.phase,
            structures: self.garrison.views(),
            player: self.player.view(&self.layout, self.time.tick),
            spawners: self.spawners.views(),
            events: std::mem::take(&mut self.events),
            alerts: std::mem::take(&mut self.alerts),
            score: self.score.view(
                enemies_alive,
                self.garrison.damage_taken(),
                !self.garrison.is_breached(defended),
                &self.time,
            ),
            ..world_views
        }
    }

    /// Get the current game phase.
    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    /// Get the current simulation time.
    pub fn time(&self) -> SimTime {
        self.time
    }

    /// Get the current time scale.
    pub fn time_scale(&self) -> f64 {
        self.time_scale
    }

    /// Get a read-only reference to the ECS world.
    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn layout(&self) -> &CastleLayout {
        &self.layout
    }

    pub fn walls(&self) -> &WallRegistry {
        &self.walls
    }

    pub fn garrison(&self) -> &Garrison {
        &self.garrison
    }

    pub fn player(&self) -> &PlayerState {
        &self.player
    }

    pub fn trails(&self) -> bool {
        self.trails
    }

    pub fn score(&self) -> &ScoreState {
        &self.score
    }

    /// Spawn an enemy at a fixed position (for tests needing exact placement).
    #[cfg(test)]
    pub fn spawn_test_enemy(
        &mut self,
        kind: EnemyKind,
        position: Position,
    ) -> hecs::Entity {
        let id = castle_core::types::EnemyId(self.next_enemy_id);
        self.next_enemy_id += 1;
        self.score.enemies_spawned += 1;
        world_setup::spawn_enemy_at(&mut self.world, &mut self.rng, id, kind, position)
    }

    #[cfg(test)]
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    #[cfg(test)]
    pub fn garrison_mut(&mut self) -> &mut Garrison {
        &mut self.garrison
    }

    #[cfg(test)]
    pub fn player_mut(&mut self) -> &mut PlayerState {
        &mut self.player
    }

    /// Process all queued commands.
    fn process_commands(&mut self) {
        while let Some(command) = self.command_queue.pop_front() {
            if let Err(refusal) = self.handle_command(&command) {
                tracing::debug!(?command, %refusal, "command refused");
                self.alert(AlertLevel::Warning, refusal.to_string());
            }
        }
    }

    /// Handle a single player command.
    fn handle_command(&mut self, command: &PlayerCommand) -> Result<(), ActionError> {
        match *command {
            PlayerCommand::StartMission => self.start_mission()?,
            PlayerCommand::Pause => {
                if self.phase == GamePhase::Active {
                    self.phase = GamePhase::Paused;
                }
            }
            PlayerCommand::Resume => {
                if self.phase == GamePhase::Paused {
                    self.phase = GamePhase::Active;
                }
            }
            PlayerCommand::TogglePause => match self.phase {
                GamePhase::Active => self.phase = GamePhase::Paused,
                GamePhase::Paused => self.phase = GamePhase::Active,
                GamePhase::Setup | GamePhase::Fallen => {}
            },
            PlayerCommand::SetTimeScale { scale } => {
                self.time_scale = scale.clamp(0.0, MAX_TIME_SCALE);
            }
            PlayerCommand::SpawnEnemy { kind } => {
                if self.phase == GamePhase::Setup {
                    return Err(ActionError::WrongPhase(self.phase));
                }
                systems::spawner::spawn(
                    &mut self.world,
                    &mut self.rng,
                    kind,
                    &mut self.next_enemy_id,
                    &mut self.events,
                    &mut self.score,
                );
            }
            PlayerCommand::SetSpawnEnabled { kind, enabled } => {
                // Kept in the flags too so the next mission start honours it.
                self.spawn_flags.set(kind, enabled);
                self.spawners.set_enabled(kind, enabled);
            }
            PlayerCommand::SetTrails { enabled } => {
                self.trails = enabled;
                if !enabled {
                    for (_entity, history) in self.world.query_mut::<&mut PositionHistory>() {
                        history.positions.clear();
                    }
                }
            }
            PlayerCommand::Turn { direction } => self.player.turn(direction),
            PlayerCommand::Step { direction } => {
                self.player.step(&self.layout, direction)?;
            }
            PlayerCommand::TeleportToRoof { castle } => {
                let to = self.player.teleport_to_roof(&self.layout, castle)?;
                self.teleported(to);
            }
            PlayerCommand::TeleportToSpawn => {
                let to = self.player.teleport_to_spawn(&self.layout)?;
                self.teleported(to);
            }
            PlayerCommand::RoofLift => {
                let to = self.player.roof_lift(&self.layout)?;
                self.teleported(to);
            }
            PlayerCommand::Interact => {
                let collected = self.player.interact(&self.layout, self.time.tick)?;
                if let Some(amount) = collected.coins {
                    self.events.push(SimEvent::CoinsCollected {
                        amount,
                        total: self.player.coins,
                    });
                }
                if let Some(amount) = collected.arrows {
                    self.events.push(SimEvent::ArrowsCollected {
                        amount,
                        total: self.player.arrows,
                    });
                }
            }
            PlayerCommand::HealCastle => self.heal_castle()?,
            PlayerCommand::FireArrow => {
                if self.phase != GamePhase::Active {
                    return Err(ActionError::WrongPhase(self.phase));
                }
                let shot = self.player.fire_arrow()?;
                world_setup::spawn_projectile(
                    &mut self.world,
                    ProjectileKind::Arrow,
                    Faction::Defender,
                    shot.origin,
                    shot.velocity,
                    ARROW_RADIUS,
                    PLAYER_ARROW_DAMAGE,
                );
                self.events.push(SimEvent::ArrowFired {
                    remaining: self.player.arrows,
                });
            }
            PlayerCommand::ToggleView => {
                self.player.toggle_view();
            }
        }
        Ok(())
    }

    /// Rebuild the world and start the siege. Also restarts after a fall.
    fn start_mission(&mut self) -> Result<(), ActionError> {
        if !matches!(self.phase, GamePhase::Setup | GamePhase::Fallen) {
            return Err(ActionError::WrongPhase(self.phase));
        }

        self.world.clear();
        self.walls = WallRegistry::from_layout(&self.layout);
        self.garrison = Garrison::from_layout(&self.layout);
        self.player = PlayerState::new(&self.layout);
        self.spawners = SpawnSchedule::new(&self.spawn_flags);
        self.score = ScoreState::default();
        self.next_enemy_id = 0;
        self.breaches.clear();
        self.time = SimTime::default();
        self.phase = GamePhase::Active;

        tracing::info!(
            castles = self.layout.castles.len(),
            walls = self.walls.len(),
            defended = self.layout.defended_castle,
            "mission started"
        );
        self.alert(AlertLevel::Info, "The siege has begun".to_string());
        Ok(())
    }

    /// Spend coins to repair the defended castle.
    fn heal_castle(&mut self) -> Result<(), ActionError> {
        if self.phase == GamePhase::Fallen {
            return Err(ActionError::WrongPhase(self.phase));
        }
        let owner = WallOwner::Castle(self.layout.defended_castle);
        let Some(health) = self.garrison.get(owner) else {
            return Err(ActionError::UnknownCastle(self.layout.defended_castle));
        };
        if self.player.coins < HEAL_COST {
            return Err(ActionError::NotEnoughCoins {
                have: self.player.coins,
                need: HEAL_COST,
            });
        }
        if health.hp >= health.max_hp {
            return Err(ActionError::CastleAtFullHealth);
        }

        self.player.spend_coins(HEAL_COST)?;
        let hp = self.garrison.heal(owner, HEAL_AMOUNT).unwrap_or(health.hp);
        self.events.push(SimEvent::CastleHealed {
            amount: hp - health.hp,
            hp,
        });
        tracing::debug!(hp, coins = self.player.coins, "castle healed");
        Ok(())
    }

    fn teleported(&mut self, to: Position) {
        tracing::debug!(x = to.x, y = to.y, z = to.z, "player teleported");
        self.events.push(SimEvent::Teleported { to });
    }

    fn alert(&mut self, level: AlertLevel, message: String) {
        self.alerts.push(Alert {
            level,
            message,
            tick: self.time.tick,
        });
    }

    /// Run all systems in order.
    fn run_systems(&mut self, spawning: bool) {
        let objective = Objective {
            gate: self.layout.gate_point(),
            gate_owner: WallOwner::Castle(self.layout.defended_castle),
            fallen: self.phase == GamePhase::Fallen,
        };

        // 1. Periodic spawning
        if spawning {
            systems::spawner::run(
                &mut self.world,
                &mut self.rng,
                &mut self.spawners,
                &mut self.next_enemy_id,
                &mut self.events,
                &mut self.score,
            );
        }
        // 2. Enemy AI (movement, strikes, launches)
        systems::enemy_ai::run(
            &mut self.world,
            &mut self.rng,
            &self.walls,
            &mut self.garrison,
            &objective,
            &mut self.events,
            &mut self.breaches,
        );
        // 3. Projectile flight and hits
        systems::ballistics::run(
            &mut self.world,
            &mut self.rng,
            &self.walls,
            &mut self.garrison,
            self.trails,
            &mut self.events,
            &mut self.breaches,
        );
        // 4. Particle bursts
        systems::effects::run(&mut self.world);
        // 5. Breaches found this tick
        self.resolve_breaches();
        // 6. Cleanup (dead, spent, out of bounds)
        systems::cleanup::run(
            &mut self.world,
            &mut self.rng,
            &mut self.despawn_buffer,
            &mut self.events,
            &mut self.score,
        );
    }

    /// Open breached structures and check whether the defended castle fell.
    fn resolve_breaches(&mut self) {
        let defended = WallOwner::Castle(self.layout.defended_castle);

        for owner in std::mem::take(&mut self.breaches) {
            if !self.walls.mark_breached(owner) {
                continue;
            }
            tracing::warn!(?owner, tick = self.time.tick, "structure breached");
            self.events.push(SimEvent::StructureBreached { owner });
            self.alert(AlertLevel::Critical, format!("{owner:?} has been breached"));

            if owner == defended && self.phase != GamePhase::Fallen {
                self.phase = GamePhase::Fallen;
                tracing::warn!(tick = self.time.tick, "defended castle has fallen");
                self.events.push(SimEvent::CastleFallen);
                self.alert(AlertLevel::Critical, "The castle has fallen".to_string());
            }
        }
    }
}
