//! Running totals for the score display.

use castle_core::state::ScoreView;
use castle_core::types::SimTime;

/// Counters kept across the mission.
#[derive(Debug, Clone, Default)]
pub struct ScoreState {
    pub enemies_spawned: u32,
    pub enemies_killed: u32,
}

impl ScoreState {
    pub fn view(
        &self,
        enemies_alive: u32,
        structure_damage_taken: f64,
        castle_standing: bool,
        time: &SimTime,
    ) -> ScoreView {
        ScoreView {
            enemies_spawned: self.enemies_spawned,
            enemies_killed: self.enemies_killed,
            enemies_alive,
            structure_damage_taken,
            castle_standing,
            mission_time_secs: time.elapsed_secs,
        }
    }
}
