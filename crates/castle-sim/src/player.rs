//! The defender's avatar: movement, teleports and pickups.
//!
//! Every action checks its preconditions against the layout and returns an
//! [`ActionError`] when refused; nothing is changed in that case.

use castle_core::constants::*;
use castle_core::enums::{StepDirection, TurnDirection, ViewMode};
use castle_core::error::ActionError;
use castle_core::state::PlayerView;
use castle_core::types::{Position, Velocity};
use castle_layout::zones::clamp_player;
use castle_layout::{CastleConfig, CastleLayout};

#[derive(Debug, Clone)]
pub struct PlayerState {
    pub position: Position,
    /// Degrees; 0 faces +Y, positive turns left.
    pub angle_deg: f64,
    pub coins: u32,
    pub arrows: u32,
    pub view: ViewMode,
    /// Tick the chest was last opened on.
    pub last_chest_tick: Option<u64>,
}

/// What an interaction picked up.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Collected {
    pub coins: Option<u32>,
    pub arrows: Option<u32>,
}

/// A defender arrow ready to be spawned.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArrowShot {
    pub origin: Position,
    pub velocity: Velocity,
}

impl PlayerState {
    /// Fresh avatar standing on the spawn point.
    pub fn new(layout: &CastleLayout) -> Self {
        Self {
            position: layout.player_spawn(),
            angle_deg: 0.0,
            coins: 0,
            arrows: 0,
            view: ViewMode::default(),
            last_chest_tick: None,
        }
    }

    pub fn at_spawn(&self, layout: &CastleLayout) -> bool {
        self.position == layout.player_spawn()
    }

    /// Unit vector the avatar faces, in the ground plane.
    fn facing(&self) -> (f64, f64) {
        let rad = (self.angle_deg + 90.0).to_radians();
        (rad.cos(), rad.sin())
    }

    pub fn turn(&mut self, direction: TurnDirection) {
        let delta = match direction {
            TurnDirection::Left => PLAYER_TURN_DEG,
            TurnDirection::Right => -PLAYER_TURN_DEG,
        };
        self.angle_deg = (self.angle_deg + delta).rem_euclid(360.0);
    }

    /// Walk one step and clamp into the zone the avatar's height selects.
    pub fn step(
        &mut self,
        layout: &CastleLayout,
        direction: StepDirection,
    ) -> Result<Position, ActionError> {
        if self.at_spawn(layout) {
            return Err(ActionError::AtSpawn);
        }
        let sign = match direction {
            StepDirection::Forward => 1.0,
            StepDirection::Backward => -1.0,
        };
        let (fx, fy) = self.facing();
        let moved = Position::new(
            self.position.x + sign * PLAYER_STEP * fx,
            self.position.y + sign * PLAYER_STEP * fy,
            self.position.z,
        );
        self.position = clamp_player(layout, moved);
        Ok(self.position)
    }

    /// Jump from the spawn point onto a castle roof.
    pub fn teleport_to_roof(
        &mut self,
        layout: &CastleLayout,
        castle: u8,
    ) -> Result<Position, ActionError> {
        if !self.at_spawn(layout) {
            return Err(ActionError::NotAtSpawn);
        }
        let config = layout
            .castle(castle)
            .ok_or(ActionError::UnknownCastle(castle))?;

        self.position = Position::new(
            config.position.x,
            config.position.y,
            config.roof_height() + ROOF_TELEPORT_CLEARANCE,
        );
        Ok(self.position)
    }

    /// Return to the spawn point; only works near a castle centre.
    pub fn teleport_to_spawn(&mut self, layout: &CastleLayout) -> Result<Position, ActionError> {
        if self.castle_near(layout, SPAWN_RETURN_RADIUS).is_none() {
            return Err(ActionError::NotNearCastleCenter);
        }
        self.position = layout.player_spawn();
        Ok(self.position)
    }

    /// Ride the lift at a castle centre: down from the roof, up from the ground.
    pub fn roof_lift(&mut self, layout: &CastleLayout) -> Result<Position, ActionError> {
        for castle in &layout.castles {
            if self.horizontal_distance_to(castle) > LIFT_RADIUS {
                continue;
            }
            let c = castle.position;
            let ground = c.z + LIFT_GROUND_CLEARANCE;
            if self.position.z >= castle.roof_height() {
                self.position = Position::new(c.x, c.y, ground);
                return Ok(self.position);
            }
            if (self.position.z - ground).abs() < 100.0 {
                self.position = Position::new(
                    c.x,
                    c.y,
                    castle.roof_height() + LIFT_PLATFORM_THICKNESS / 2.0,
                );
                return Ok(self.position);
            }
        }
        Err(ActionError::NotNearCastleCenter)
    }

    /// Open a chest and pick up arrows, whichever are within reach.
    /// `tick` is the current simulation tick.
    pub fn interact(&mut self, layout: &CastleLayout, tick: u64) -> Result<Collected, ActionError> {
        let mut collected = Collected::default();
        let mut refusal = ActionError::NothingToCollect;

        let chest_in_reach = layout
            .castles
            .iter()
            .filter_map(|c| c.chest.as_ref())
            .any(|chest| {
                let reach = chest.size / 2.0 + CHEST_REACH;
                (self.position.x - chest.position.x).abs() <= reach
                    && (self.position.y - chest.position.y).abs() <= reach
                    && (self.position.z - chest.position.z).abs() <= reach
            });

        if chest_in_reach {
            if self.chest_ticks_remaining(tick) > 0 {
                refusal = ActionError::ChestRecharging(self.chest_cooldown(tick));
            } else {
                self.coins += CHEST_COINS;
                self.last_chest_tick = Some(tick);
                collected.coins = Some(CHEST_COINS);
            }
        }

        if self.position.range_to(&layout.log_pile) <= LOG_PILE_REACH {
            self.arrows += LOG_PILE_ARROWS;
            collected.arrows = Some(LOG_PILE_ARROWS);
        }

        if collected == Collected::default() {
            return Err(refusal);
        }
        Ok(collected)
    }

    /// Seconds until the chest can be opened again.
    pub fn chest_cooldown(&self, tick: u64) -> f64 {
        self.chest_ticks_remaining(tick) as f64 / TICK_RATE as f64
    }

    fn chest_ticks_remaining(&self, tick: u64) -> u64 {
        self.last_chest_tick
            .map(|last| CHEST_COOLDOWN_TICKS.saturating_sub(tick.saturating_sub(last)))
            .unwrap_or(0)
    }

    pub fn spend_coins(&mut self, amount: u32) -> Result<(), ActionError> {
        if self.coins < amount {
            return Err(ActionError::NotEnoughCoins {
                have: self.coins,
                need: amount,
            });
        }
        self.coins -= amount;
        Ok(())
    }

    /// Loose one arrow from the eye along the facing direction.
    pub fn fire_arrow(&mut self) -> Result<ArrowShot, ActionError> {
        if self.arrows == 0 {
            return Err(ActionError::OutOfArrows);
        }
        self.arrows -= 1;

        let (fx, fy) = self.facing();
        let elevation = PLAYER_ARROW_ELEVATION_DEG.to_radians();
        let (eye, _) = self.eye();
        Ok(ArrowShot {
            origin: eye,
            velocity: Velocity::new(
                fx * elevation.cos() * ARROW_SPEED,
                fy * elevation.cos() * ARROW_SPEED,
                elevation.sin() * ARROW_SPEED,
            ),
        })
    }

    pub fn toggle_view(&mut self) -> ViewMode {
        self.view = match self.view {
            ViewMode::Orbit => ViewMode::FirstPerson,
            ViewMode::FirstPerson => ViewMode::Orbit,
        };
        self.view
    }

    /// First-person eye position and a point just ahead of it.
    pub fn eye(&self) -> (Position, Position) {
        let eye = Position::new(
            self.position.x,
            self.position.y,
            self.position.z + PLAYER_EYE_HEIGHT,
        );
        let (fx, fy) = self.facing();
        let look_at = Position::new(eye.x + fx * 5.0, eye.y + fy * 5.0, eye.z);
        (eye, look_at)
    }

    pub fn view(&self, layout: &CastleLayout, tick: u64) -> PlayerView {
        let (eye, look_at) = self.eye();
        PlayerView {
            position: self.position,
            angle_deg: self.angle_deg,
            coins: self.coins,
            arrows: self.arrows,
            view: self.view,
            eye,
            look_at,
            at_spawn: self.at_spawn(layout),
            chest_cooldown_secs: self.chest_cooldown(tick),
        }
    }

    fn horizontal_distance_to(&self, castle: &CastleConfig) -> f64 {
        self.position.horizontal_range_to(&castle.position)
    }

    fn castle_near<'a>(
        &self,
        layout: &'a CastleLayout,
        radius: f64,
    ) -> Option<&'a CastleConfig> {
        layout
            .castles
            .iter()
            .find(|c| self.horizontal_distance_to(c) <= radius)
    }
}
