//! Zones the player avatar may occupy.
//!
//! The player is kept on whatever structure its height places it on:
//! a castle, the rock, or the ground around the complex.

use castle_core::types::Position;

use crate::config::CastleLayout;

/// Clamp a player position into the zone its altitude selects.
///
/// Castles win over the rock, and the rock over the ground zone. Positions
/// above every zone are returned unchanged.
pub fn clamp_player(layout: &CastleLayout, pos: Position) -> Position {
    let nearest_castle = layout
        .castles
        .iter()
        .filter(|c| c.spans_height(pos.z))
        .min_by(|a, b| {
            let da = (pos.x - a.position.x).powi(2) + (pos.y - a.position.y).powi(2);
            let db = (pos.x - b.position.x).powi(2) + (pos.y - b.position.y).powi(2);
            da.total_cmp(&db)
        });

    if let Some(castle) = nearest_castle {
        let half = castle.half_size();
        return Position::new(
            pos.x.clamp(castle.position.x - half, castle.position.x + half),
            pos.y.clamp(castle.position.y - half, castle.position.y + half),
            pos.z,
        );
    }

    let rock = &layout.rock;
    if pos.z >= rock.position.z && pos.z <= rock.position.z + rock.height {
        let r = rock.clamp_radius;
        return Position::new(
            pos.x.clamp(rock.position.x - r, rock.position.x + r),
            pos.y.clamp(rock.position.y - r, rock.position.y + r),
            pos.z,
        );
    }

    if pos.z >= 0.0 && pos.z <= layout.ground_zone_height {
        let (min, max) = layout.ground_zone_bounds();
        return Position::new(pos.x.clamp(min.x, max.x), pos.y.clamp(min.y, max.y), pos.z);
    }

    pos
}
