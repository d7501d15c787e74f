//! Wall registry: static rectangular collision volumes with owner tags.
//!
//! Every wall is stored as an axis-aligned footprint plus a height. Lookups
//! are linear scans in id order; the complex has a few dozen volumes at most.

use std::collections::BTreeSet;

use glam::DVec2;

use castle_core::enums::{WallKind, WallOwner};
use castle_core::query::WallQuery;
use castle_core::types::{Position, WallId};

use crate::config::CastleLayout;

/// Distance curtain walls are pulled back from each castle corner,
/// leaving room for the corner towers.
pub const CURTAIN_CORNER_INSET: f64 = 50.0;

/// A single collision volume.
#[derive(Debug, Clone, PartialEq)]
pub struct Wall {
    pub id: WallId,
    pub min: DVec2,
    pub max: DVec2,
    pub height: f64,
    pub owner: WallOwner,
    pub kind: WallKind,
}

impl Wall {
    /// Volume around the segment `a`–`b`, grown by half the thickness on
    /// every side.
    pub fn from_segment(
        id: WallId,
        a: DVec2,
        b: DVec2,
        thickness: f64,
        height: f64,
        owner: WallOwner,
        kind: WallKind,
    ) -> Self {
        let grow = DVec2::splat(thickness / 2.0);
        Self {
            id,
            min: a.min(b) - grow,
            max: a.max(b) + grow,
            height,
            owner,
            kind,
        }
    }

    /// Square volume centred on `center`.
    pub fn from_footprint(
        id: WallId,
        center: DVec2,
        half_extent: f64,
        height: f64,
        owner: WallOwner,
        kind: WallKind,
    ) -> Self {
        let half = DVec2::splat(half_extent);
        Self {
            id,
            min: center - half,
            max: center + half,
            height,
            owner,
            kind,
        }
    }

    pub fn center(&self) -> Position {
        let c = (self.min + self.max) / 2.0;
        Position::new(c.x, c.y, self.height / 2.0)
    }

    /// Strict interior test on the footprint; points on the boundary are outside.
    pub fn contains_xy(&self, x: f64, y: f64) -> bool {
        self.min.x < x && x < self.max.x && self.min.y < y && y < self.max.y
    }
}

/// All walls of the complex plus the set of breached owners.
#[derive(Debug, Clone, Default)]
pub struct WallRegistry {
    walls: Vec<Wall>,
    breached: BTreeSet<WallOwner>,
}

impl WallRegistry {
    /// Build the registry: perimeter segments first, then four curtain
    /// segments per castle, then one keep per castle.
    pub fn from_layout(layout: &CastleLayout) -> Self {
        let mut walls: Vec<Wall> = Vec::new();
        let next_id = |walls: &Vec<Wall>| WallId(walls.len() as u32);

        let (min, max) = layout.perimeter_bounds();
        let perimeter = &layout.perimeter;
        let segments = [
            (DVec2::new(min.x, max.y), DVec2::new(max.x, max.y)),
            (DVec2::new(max.x, max.y), DVec2::new(max.x, min.y)),
            (DVec2::new(max.x, min.y), DVec2::new(min.x, min.y)),
            (DVec2::new(min.x, min.y), DVec2::new(min.x, max.y)),
        ];
        for (a, b) in segments {
            let wall = Wall::from_segment(
                next_id(&walls),
                a,
                b,
                perimeter.thickness,
                perimeter.height,
                WallOwner::Perimeter,
                WallKind::Curtain,
            );
            walls.push(wall);
        }

        // Zipping with the u8 range stops at castle 255; `validate` rejects more.
        for (index, castle) in (0..=u8::MAX).zip(&layout.castles) {
            let owner = WallOwner::Castle(index);
            let corners = castle.corners();
            for j in 0..corners.len() {
                let a = corners[j];
                let b = corners[(j + 1) % corners.len()];
                let inset = (b - a).normalize_or_zero() * CURTAIN_CORNER_INSET;
                let wall = Wall::from_segment(
                    next_id(&walls),
                    a + inset,
                    b - inset,
                    castle.wall_thickness,
                    castle.wall_height,
                    owner,
                    WallKind::Curtain,
                );
                walls.push(wall);
            }
        }

        for (index, castle) in (0..=u8::MAX).zip(&layout.castles) {
            let half = (castle.half_size() - castle.wall_thickness / 2.0).max(0.0);
            let keep = Wall::from_footprint(
                next_id(&walls),
                castle.center_xy(),
                half,
                castle.height,
                WallOwner::Castle(index),
                WallKind::Keep,
            );
            walls.push(keep);
        }

        Self {
            walls,
            breached: BTreeSet::new(),
        }
    }

    pub fn walls(&self) -> &[Wall] {
        &self.walls
    }

    pub fn get(&self, id: WallId) -> Option<&Wall> {
        self.walls.get(id.0 as usize)
    }

    pub fn len(&self) -> usize {
        self.walls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.walls.is_empty()
    }

    /// Walls belonging to one owner.
    pub fn owned_by(&self, owner: WallOwner) -> impl Iterator<Item = &Wall> {
        self.walls.iter().filter(move |w| w.owner == owner)
    }

    /// Stop an owner's walls from blocking movement and absorbing shots.
    /// Returns `false` if the owner was already breached.
    pub fn mark_breached(&mut self, owner: WallOwner) -> bool {
        self.breached.insert(owner)
    }

    pub fn is_breached(&self, owner: WallOwner) -> bool {
        self.breached.contains(&owner)
    }

    fn standing(&self) -> impl Iterator<Item = &Wall> {
        self.walls
            .iter()
            .filter(|w| !self.breached.contains(&w.owner))
    }

    /// First standing wall a projectile at `pos` is inside of.
    pub fn projectile_hit(&self, pos: &Position) -> Option<&Wall> {
        self.standing()
            .find(|w| w.contains_xy(pos.x, pos.y) && pos.z < w.height)
    }

    /// Like [`WallRegistry::projectile_hit`] but ignoring keeps, whose roofs
    /// the defenders shoot from.
    pub fn curtain_hit(&self, pos: &Position) -> Option<&Wall> {
        self.standing().find(|w| {
            w.kind == WallKind::Curtain && w.contains_xy(pos.x, pos.y) && pos.z < w.height
        })
    }
}

impl WallQuery for WallRegistry {
    fn blocking_wall(&self, x: f64, y: f64) -> Option<WallId> {
        self.standing().find(|w| w.contains_xy(x, y)).map(|w| w.id)
    }

    fn wall_center(&self, id: WallId) -> Option<Position> {
        self.get(id).map(Wall::center)
    }

    fn wall_owner(&self, id: WallId) -> Option<WallOwner> {
        self.get(id).map(|w| w.owner)
    }

    fn is_standing(&self, id: WallId) -> bool {
        self.get(id)
            .map(|w| !self.breached.contains(&w.owner))
            .unwrap_or(false)
    }
}
