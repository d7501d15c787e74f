//! Simulation constants and tuning parameters.

/// Simulation tick rate (Hz).
pub const TICK_RATE: u32 = 30;

/// Seconds per tick.
pub const DT: f64 = 1.0 / TICK_RATE as f64;

// --- World bounds ---

/// Entities farther than this from the origin (horizontally) are removed.
pub const WORLD_RADIUS: f64 = 20_000.0;

/// Downward acceleration applied to projectiles and particles.
pub const GRAVITY: f64 = 300.0;

// --- Spawning ---

/// Radius of the ring enemies spawn on, centred on the origin.
pub const SPAWN_RADIUS: f64 = 6000.0;

/// Re-arm interval ranges per kind (seconds).
pub const BARBARIAN_SPAWN_INTERVAL: (f64, f64) = (1.0, 2.5);
pub const ARCHER_SPAWN_INTERVAL: (f64, f64) = (2.2, 3.5);
pub const GIANT_SPAWN_INTERVAL: (f64, f64) = (4.0, 7.0);
pub const CANNON_SPAWN_INTERVAL: (f64, f64) = (5.0, 8.0);

// --- Enemy stat blocks ---

pub const BARBARIAN_SPEED: f64 = 260.0;
pub const BARBARIAN_ATTACK_RANGE: f64 = 140.0;
pub const BARBARIAN_ATTACK_RATE: f64 = 1.4;
pub const BARBARIAN_DAMAGE: f64 = 8.0;
pub const BARBARIAN_HP: f64 = 90.0;

pub const GIANT_SPEED: f64 = 150.0;
pub const GIANT_ATTACK_RANGE: f64 = 300.0;
pub const GIANT_ATTACK_RATE: f64 = 2.0;
pub const GIANT_DAMAGE: f64 = 22.0;
pub const GIANT_HP: f64 = 260.0;

pub const ARCHER_SPEED: f64 = 240.0;
pub const ARCHER_ATTACK_RANGE: f64 = 1200.0;
pub const ARCHER_ATTACK_RATE: (f64, f64) = (1.0, 1.8);
pub const ARCHER_INITIAL_RELOAD: (f64, f64) = (1.2, 2.0);
pub const ARCHER_DAMAGE: f64 = 6.0;
pub const ARCHER_HP: f64 = 70.0;

pub const CANNON_SPEED: f64 = 160.0;
pub const CANNON_ATTACK_RANGE: f64 = 2200.0;
pub const CANNON_ATTACK_RATE: (f64, f64) = (2.0, 3.0);
pub const CANNON_INITIAL_RELOAD: (f64, f64) = (2.2, 3.4);
pub const CANNON_DAMAGE: f64 = 30.0;
pub const CANNON_HP: f64 = 120.0;

// --- Projectiles ---

pub const ARROW_MUZZLE_HEIGHT: f64 = 160.0;
pub const ARROW_SPEED: f64 = 900.0;
pub const ARROW_LOFT: f64 = 180.0;
pub const ARROW_RADIUS: f64 = 6.0;

pub const BALL_MUZZLE_HEIGHT: f64 = 120.0;
pub const BALL_SPEED: f64 = 1100.0;
pub const BALL_LOFT: f64 = 200.0;
pub const BALL_RADIUS: f64 = 30.0;

/// Seconds a projectile may stay in flight.
pub const PROJECTILE_LIFE_SECS: f64 = 5.0;

/// Projectiles below this altitude have hit the ground.
pub const PROJECTILE_GROUND_Z: f64 = -50.0;

/// Maximum number of trail points kept per projectile.
pub const MAX_TRAIL_POINTS: usize = 20;

// --- Particle bursts: (size, particle count) ---

pub const BURST_LIFE_SECS: f64 = 1.0;
pub const MELEE_HIT_BURST: (f64, usize) = (40.0, 28);
pub const BALL_IMPACT_BURST: (f64, usize) = (80.0, 56);
pub const ARROW_IMPACT_BURST: (f64, usize) = (24.0, 18);
pub const ENEMY_DEATH_BURST: (f64, usize) = (50.0, 30);
/// Height at which the death burst of an enemy is placed.
pub const ENEMY_DEATH_BURST_Z: f64 = 100.0;

/// Particle launch: horizontal speed range, vertical speed range, life range.
pub const PARTICLE_HORIZONTAL_SPEED: (f64, f64) = (50.0, 150.0);
pub const PARTICLE_VERTICAL_SPEED: (f64, f64) = (50.0, 200.0);
pub const PARTICLE_LIFE_SECS: (f64, f64) = (0.5, 1.5);

/// Height of an enemy's body centre above its feet, for defender arrow hits.
pub const ENEMY_CENTER_Z: f64 = 100.0;

// --- Structures ---

pub const CASTLE_MAX_HP: f64 = 1000.0;
pub const PERIMETER_MAX_HP: f64 = 5000.0;

// --- Player ---

pub const PLAYER_STEP: f64 = 50.0;
pub const PLAYER_TURN_DEG: f64 = 5.0;
/// Height above a castle roof the player lands at after a roof teleport.
pub const ROOF_TELEPORT_CLEARANCE: f64 = 75.0;
/// Horizontal distance from a castle centre within which the spawn return works.
pub const SPAWN_RETURN_RADIUS: f64 = 150.0;
/// Radius of the wooden lift platform at a castle centre.
pub const LIFT_RADIUS: f64 = 120.0;
pub const LIFT_PLATFORM_THICKNESS: f64 = 20.0;
/// Height above castle ground the lift drops the player at.
pub const LIFT_GROUND_CLEARANCE: f64 = 50.0;
/// Eye height above the player's feet.
pub const PLAYER_EYE_HEIGHT: f64 = 120.0;

pub const CHEST_COINS: u32 = 100;
pub const CHEST_COOLDOWN_SECS: f64 = 5.0;
/// The chest cooldown counted in whole ticks.
pub const CHEST_COOLDOWN_TICKS: u64 = CHEST_COOLDOWN_SECS as u64 * TICK_RATE as u64;
/// Extra reach around a chest's half size.
pub const CHEST_REACH: f64 = 20.0;
pub const LOG_PILE_ARROWS: u32 = 100;
pub const LOG_PILE_REACH: f64 = 200.0;

pub const HEAL_COST: u32 = 50;
pub const HEAL_AMOUNT: f64 = 20.0;

/// Elevation of player-fired arrows (degrees).
pub const PLAYER_ARROW_ELEVATION_DEG: f64 = 5.0;
pub const PLAYER_ARROW_DAMAGE: f64 = 30.0;

/// Upper bound for the time scale command.
pub const MAX_TIME_SCALE: f64 = 4.0;
