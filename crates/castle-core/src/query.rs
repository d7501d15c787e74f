//! Read-only view of the static collision geometry, as the enemy AI sees it.

use crate::enums::WallOwner;
use crate::types::{Position, WallId};

pub trait WallQuery {
    /// First standing wall whose footprint contains the point.
    fn blocking_wall(&self, x: f64, y: f64) -> Option<WallId>;

    /// Centre of a wall's volume.
    fn wall_center(&self, id: WallId) -> Option<Position>;

    fn wall_owner(&self, id: WallId) -> Option<WallOwner>;

    /// Whether the wall's owner still has hit points.
    fn is_standing(&self, id: WallId) -> bool;
}
