//! Particle bursts: short-lived hit feedback.

use hecs::World;
use rand::Rng;

use castle_core::components::{Particle, ParticleBurst};
use castle_core::constants::*;
use castle_core::types::{Position, Velocity};

/// Build a burst of `count` particles thrown outward and upward from `origin`.
pub fn new_burst(origin: Position, size: f64, count: usize, rng: &mut impl Rng) -> ParticleBurst {
    let particles = (0..count)
        .map(|_| {
            let angle: f64 = rng.gen_range(0.0..std::f64::consts::TAU);
            let speed = rng.gen_range(PARTICLE_HORIZONTAL_SPEED.0..PARTICLE_HORIZONTAL_SPEED.1);
            let climb = rng.gen_range(PARTICLE_VERTICAL_SPEED.0..PARTICLE_VERTICAL_SPEED.1);
            Particle {
                position: origin,
                velocity: Velocity::new(angle.cos() * speed, angle.sin() * speed, climb),
                life: rng.gen_range(PARTICLE_LIFE_SECS.0..PARTICLE_LIFE_SECS.1),
            }
        })
        .collect();

    ParticleBurst {
        origin,
        size,
        life: BURST_LIFE_SECS,
        particles,
    }
}

/// Age every burst and integrate its particles under gravity.
/// Expired bursts are left for the cleanup system.
pub fn run(world: &mut World) {
    for (_entity, burst) in world.query_mut::<&mut ParticleBurst>() {
        burst.life -= DT;
        for particle in &mut burst.particles {
            particle.velocity.z -= GRAVITY * DT;
            particle.position = particle.position.advanced(&particle.velocity, DT);
            particle.life -= DT;
        }
    }
}
