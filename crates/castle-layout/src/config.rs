//! Castle complex configuration.
//!
//! The defaults describe the three-castle complex around the central rock.
//! Everything is serde-enabled so a driver can load an alternative layout.

use std::fmt;

use glam::DVec2;
use serde::{Deserialize, Serialize};

use castle_core::types::Position;

/// Treasure chest placed inside a castle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChestConfig {
    pub position: Position,
    /// Edge length of the chest.
    pub size: f64,
}

/// One walled castle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CastleConfig {
    /// Centre of the castle footprint at ground level.
    pub position: Position,
    /// Edge length of the square footprint.
    pub size: f64,
    /// Height of the castle body.
    pub height: f64,
    /// Height of the walkable roof above `position.z`.
    pub roof_z: f64,
    pub tower_radius: f64,
    pub floors: u32,
    pub wall_thickness: f64,
    pub wall_height: f64,
    #[serde(default)]
    pub chest: Option<ChestConfig>,
}

impl CastleConfig {
    pub fn half_size(&self) -> f64 {
        self.size / 2.0
    }

    pub fn center_xy(&self) -> DVec2 {
        DVec2::new(self.position.x, self.position.y)
    }

    /// Absolute height of the roof surface.
    pub fn roof_height(&self) -> f64 {
        self.position.z + self.roof_z
    }

    /// Footprint corners, counter-clockwise starting at the north-east corner.
    pub fn corners(&self) -> [DVec2; 4] {
        let c = self.center_xy();
        let h = self.half_size();
        [
            c + DVec2::new(h, h),
            c + DVec2::new(-h, h),
            c + DVec2::new(-h, -h),
            c + DVec2::new(h, -h),
        ]
    }

    /// Whether `z` lies within the castle's vertical span.
    pub fn spans_height(&self, z: f64) -> bool {
        z >= self.position.z && z <= self.position.z + self.height
    }
}

/// The central rock spire the player starts on.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RockConfig {
    pub position: Position,
    /// Footprint used when sizing the perimeter.
    pub footprint: f64,
    /// Height of the spawn platform above `position.z`.
    pub spawn_height: f64,
    /// Half extent of the square the player is clamped to on the rock.
    pub clamp_radius: f64,
    pub height: f64,
}

/// Outer wall around part of the complex.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PerimeterConfig {
    pub thickness: f64,
    pub height: f64,
    /// Clearance between the enclosed structures and the wall line.
    pub margin: f64,
    /// Castles enclosed by the wall (by index).
    pub encloses: Vec<u8>,
    pub encloses_rock: bool,
}

/// The whole complex.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CastleLayout {
    pub castles: Vec<CastleConfig>,
    pub rock: RockConfig,
    /// Pile of wooden logs the player collects arrows from.
    pub log_pile: Position,
    pub perimeter: PerimeterConfig,
    /// Index of the castle the besiegers march on.
    pub defended_castle: u8,
    /// Height below which the player is clamped to the ground zone.
    pub ground_zone_height: f64,
    /// Margin around all castles that bounds the ground zone.
    pub ground_zone_margin: f64,
}

impl Default for CastleLayout {
    fn default() -> Self {
        Self {
            castles: vec![
                CastleConfig {
                    position: Position::new(-800.0, -1600.0, 0.0),
                    size: 1600.0,
                    height: 800.0,
                    roof_z: 600.0,
                    tower_radius: 160.0,
                    floors: 7,
                    wall_thickness: 300.0,
                    wall_height: 600.0,
                    chest: None,
                },
                CastleConfig {
                    position: Position::new(900.0, 1000.0, 0.0),
                    size: 1600.0,
                    height: 1200.0,
                    roof_z: 800.0,
                    tower_radius: 180.0,
                    floors: 12,
                    wall_thickness: 400.0,
                    wall_height: 800.0,
                    chest: Some(ChestConfig {
                        position: Position::new(1200.0, 500.0, 0.0),
                        size: 100.0,
                    }),
                },
                CastleConfig {
                    position: Position::new(-3300.0, 400.0, 0.0),
                    size: 2000.0,
                    height: 600.0,
                    roof_z: 450.0,
                    tower_radius: 120.0,
                    floors: 3,
                    wall_thickness: 300.0,
                    wall_height: 450.0,
                    chest: None,
                },
            ],
            rock: RockConfig {
                position: Position::new(-1000.0, 1500.0, 0.0),
                footprint: 800.0,
                spawn_height: 1630.0,
                clamp_radius: 220.0,
                height: 1750.0,
            },
            log_pile: Position::new(1200.0, 1500.0, 0.0),
            perimeter: PerimeterConfig {
                thickness: 200.0,
                height: 400.0,
                margin: 500.0,
                encloses: vec![0, 2],
                encloses_rock: true,
            },
            defended_castle: 0,
            ground_zone_height: 600.0,
            ground_zone_margin: 500.0,
        }
    }
}

/// One past the largest castle index a `WallOwner` can carry.
pub const MAX_CASTLES: usize = u8::MAX as usize + 1;

/// Structural problems with a loaded layout.
#[derive(Debug, Clone, PartialEq)]
pub enum LayoutError {
    NoCastles,
    DefendedCastleMissing(u8),
    PerimeterCastleMissing(u8),
    NonPositiveSize(usize),
    /// Castles are addressed by a `u8` index.
    TooManyCastles(usize),
    NegativeExtent(&'static str),
}

impl fmt::Display for LayoutError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LayoutError::NoCastles => write!(f, "layout has no castles"),
            LayoutError::DefendedCastleMissing(i) => {
                write!(f, "defended castle {i} is not in the layout")
            }
            LayoutError::PerimeterCastleMissing(i) => {
                write!(f, "perimeter encloses castle {i} which is not in the layout")
            }
            LayoutError::NonPositiveSize(i) => write!(f, "castle {i} has a non-positive size"),
            LayoutError::TooManyCastles(n) => {
                write!(f, "layout has {n} castles, at most {} are supported", MAX_CASTLES)
            }
            LayoutError::NegativeExtent(field) => write!(f, "{field} must not be negative"),
        }
    }
}

impl std::error::Error for LayoutError {}

impl CastleLayout {
    /// Check the cross references between castles, perimeter and defended castle,
    /// and the extents the player clamp relies on.
    pub fn validate(&self) -> Result<(), LayoutError> {
        if self.castles.is_empty() {
            return Err(LayoutError::NoCastles);
        }
        if self.castles.len() > MAX_CASTLES {
            return Err(LayoutError::TooManyCastles(self.castles.len()));
        }
        if self.castle(self.defended_castle).is_none() {
            return Err(LayoutError::DefendedCastleMissing(self.defended_castle));
        }
        if let Some(&missing) = self
            .perimeter
            .encloses
            .iter()
            .find(|&&i| self.castle(i).is_none())
        {
            return Err(LayoutError::PerimeterCastleMissing(missing));
        }
        if let Some(i) = self.castles.iter().position(|c| c.size <= 0.0) {
            return Err(LayoutError::NonPositiveSize(i));
        }
        if self.rock.clamp_radius < 0.0 {
            return Err(LayoutError::NegativeExtent("rock.clamp_radius"));
        }
        if self.ground_zone_margin < 0.0 {
            return Err(LayoutError::NegativeExtent("ground_zone_margin"));
        }
        Ok(())
    }

    pub fn castle(&self, index: u8) -> Option<&CastleConfig> {
        self.castles.get(index as usize)
    }

    /// The castle the besiegers march on.
    ///
    /// Panics if the layout does not pass [`CastleLayout::validate`].
    pub fn defended(&self) -> &CastleConfig {
        &self.castles[self.defended_castle as usize]
    }

    /// Approach point in front of the defended castle's south wall,
    /// at half the wall height.
    pub fn gate_point(&self) -> Position {
        let castle = self.defended();
        let half = castle.half_size() + castle.wall_thickness / 2.0 + 100.0;
        Position::new(
            castle.position.x,
            castle.position.y - half,
            castle.wall_height * 0.5,
        )
    }

    /// Where the player starts: on top of the rock.
    pub fn player_spawn(&self) -> Position {
        Position::new(
            self.rock.position.x,
            self.rock.position.y,
            self.rock.position.z + self.rock.spawn_height,
        )
    }

    /// Axis-aligned line of the perimeter wall (wall centre lines, not faces).
    pub fn perimeter_bounds(&self) -> (DVec2, DVec2) {
        let mut footprints: Vec<(DVec2, f64)> = self
            .perimeter
            .encloses
            .iter()
            .filter_map(|&i| self.castle(i))
            .map(|c| (c.center_xy(), c.half_size()))
            .collect();
        if self.perimeter.encloses_rock {
            footprints.push((
                DVec2::new(self.rock.position.x, self.rock.position.y),
                self.rock.footprint / 2.0,
            ));
        }
        let margin = DVec2::splat(self.perimeter.margin);
        let (min, max) = bounds_of(footprints.into_iter());
        (min - margin, max + margin)
    }

    /// Bounding box of every castle grown by the ground zone margin.
    pub fn ground_zone_bounds(&self) -> (DVec2, DVec2) {
        let margin = DVec2::splat(self.ground_zone_margin);
        let (min, max) = bounds_of(self.castles.iter().map(|c| (c.center_xy(), c.half_size())));
        (min - margin, max + margin)
    }
}

fn bounds_of(footprints: impl Iterator<Item = (DVec2, f64)>) -> (DVec2, DVec2) {
    let mut min = DVec2::splat(f64::INFINITY);
    let mut max = DVec2::splat(f64::NEG_INFINITY);
    for (center, half) in footprints {
        min = min.min(center - DVec2::splat(half));
        max = max.max(center + DVec2::splat(half));
    }
    if min.x > max.x {
        return (DVec2::ZERO, DVec2::ZERO);
    }
    (min, max)
}
