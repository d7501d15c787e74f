//! Reasons a player action can be refused.

use std::fmt;

use crate::enums::GamePhase;

/// A player action that could not be carried out in the current state.
#[derive(Debug, Clone, PartialEq)]
pub enum ActionError {
    /// Roof teleports only work from the spawn point on the rock.
    NotAtSpawn,
    /// Walking is disabled while standing on the spawn point.
    AtSpawn,
    /// Not close enough to any castle centre.
    NotNearCastleCenter,
    UnknownCastle(u8),
    /// Nothing to interact with at the player's position.
    NothingToCollect,
    /// Chest still recharging; seconds remaining.
    ChestRecharging(f64),
    NotEnoughCoins { have: u32, need: u32 },
    CastleAtFullHealth,
    OutOfArrows,
    /// Command not valid in the current game phase.
    WrongPhase(GamePhase),
}

impl fmt::Display for ActionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionError::NotAtSpawn => write!(f, "roof teleport is only available from the spawn point"),
            ActionError::AtSpawn => write!(f, "cannot walk off the spawn point, teleport instead"),
            ActionError::NotNearCastleCenter => write!(f, "not standing near a castle centre"),
            ActionError::UnknownCastle(i) => write!(f, "no castle with index {i}"),
            ActionError::NothingToCollect => write!(f, "nothing to collect here"),
            ActionError::ChestRecharging(secs) => {
                write!(f, "chest is recharging, {secs:.1}s remaining")
            }
            ActionError::NotEnoughCoins { have, need } => {
                write!(f, "not enough coins ({have}/{need})")
            }
            ActionError::CastleAtFullHealth => write!(f, "castle already at max health"),
            ActionError::OutOfArrows => write!(f, "no arrows left"),
            ActionError::WrongPhase(phase) => write!(f, "not allowed while {phase:?}"),
        }
    }
}

impl std::error::Error for ActionError {}
