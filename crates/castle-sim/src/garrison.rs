//! Hit points of the defending structures.
//!
//! Walls share one pool per owner: every wall of a castle draws from that
//! castle's hit points, and all perimeter segments draw from the perimeter's.

use std::collections::BTreeMap;

use castle_core::constants::{CASTLE_MAX_HP, PERIMETER_MAX_HP};
use castle_core::enums::WallOwner;
use castle_core::state::StructureView;
use castle_layout::CastleLayout;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StructureHealth {
    pub hp: f64,
    pub max_hp: f64,
}

impl StructureHealth {
    fn full(max_hp: f64) -> Self {
        Self { hp: max_hp, max_hp }
    }
}

/// Hit-point pools keyed by owner.
#[derive(Debug, Clone, Default)]
pub struct Garrison {
    structures: BTreeMap<WallOwner, StructureHealth>,
    damage_taken: f64,
}

impl Garrison {
    /// Every castle at full castle hp plus the perimeter.
    pub fn from_layout(layout: &CastleLayout) -> Self {
        let mut structures: BTreeMap<WallOwner, StructureHealth> = (0..=u8::MAX)
            .zip(&layout.castles)
            .map(|(i, _)| (WallOwner::Castle(i), StructureHealth::full(CASTLE_MAX_HP)))
            .collect();
        structures.insert(WallOwner::Perimeter, StructureHealth::full(PERIMETER_MAX_HP));
        Self {
            structures,
            damage_taken: 0.0,
        }
    }

    pub fn get(&self, owner: WallOwner) -> Option<StructureHealth> {
        self.structures.get(&owner).copied()
    }

    pub fn hp(&self, owner: WallOwner) -> Option<f64> {
        self.get(owner).map(|s| s.hp)
    }

    pub fn is_breached(&self, owner: WallOwner) -> bool {
        self.get(owner).is_some_and(|s| s.hp <= 0.0)
    }

    /// Apply damage, flooring at zero.
    ///
    /// Returns `true` only on the hit that brings the owner to zero, so a
    /// breach is reported once. Unknown owners take no damage.
    pub fn damage(&mut self, owner: WallOwner, amount: f64) -> bool {
        let Some(health) = self.structures.get_mut(&owner) else {
            return false;
        };
        if health.hp <= 0.0 {
            return false;
        }
        let applied = amount.max(0.0).min(health.hp);
        health.hp -= applied;
        self.damage_taken += applied;
        health.hp <= 0.0
    }

    /// Restore hit points, capped at the maximum. Returns the new hp.
    pub fn heal(&mut self, owner: WallOwner, amount: f64) -> Option<f64> {
        let health = self.structures.get_mut(&owner)?;
        health.hp = (health.hp + amount.max(0.0)).min(health.max_hp);
        Some(health.hp)
    }

    /// Total hit points lost by all structures.
    pub fn damage_taken(&self) -> f64 {
        self.damage_taken
    }

    pub fn views(&self) -> Vec<StructureView> {
        self.structures
            .iter()
            .map(|(&owner, health)| StructureView {
                owner,
                hp: health.hp,
                max_hp: health.max_hp,
                breached: health.hp <= 0.0,
            })
            .collect()
    }
}
