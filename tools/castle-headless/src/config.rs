//! Run configuration loaded from TOML.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use castle_core::commands::PlayerCommand;
use castle_layout::CastleLayout;
use castle_sim::systems::spawner::SpawnFlags;
use castle_sim::SimConfig;

/// A command injected before the given tick is run.
#[derive(Debug, Clone, Deserialize)]
pub struct ScriptEntry {
    pub tick: u64,
    pub command: PlayerCommand,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HeadlessConfig {
    pub seed: u64,
    /// Number of ticks to simulate after the mission starts.
    pub ticks: u64,
    pub time_scale: f64,
    pub trails: bool,
    pub spawn: SpawnFlags,
    pub script: Vec<ScriptEntry>,
    pub layout: CastleLayout,
}

impl Default for HeadlessConfig {
    fn default() -> Self {
        let sim = SimConfig::default();
        Self {
            seed: sim.seed,
            ticks: 900,
            time_scale: sim.time_scale,
            trails: sim.trails,
            spawn: sim.spawn,
            script: Vec::new(),
            layout: sim.layout,
        }
    }
}

impl HeadlessConfig {
    /// Parse a config from TOML text and check its layout.
    pub fn from_toml(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text).context("parse headless TOML")?;
        config.layout.validate().context("invalid layout")?;
        Ok(config)
    }

    /// Load from `path`, or fall back to defaults when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read {}", path.display()))?;
        Self::from_toml(&text).with_context(|| format!("load {}", path.display()))
    }

    pub fn sim_config(&self) -> SimConfig {
        SimConfig {
            seed: self.seed,
            time_scale: self.time_scale,
            layout: self.layout.clone(),
            trails: self.trails,
            spawn: self.spawn,
        }
    }

    /// Script commands due before `tick`, in file order.
    pub fn commands_at(&self, tick: u64) -> impl Iterator<Item = PlayerCommand> + '_ {
        self.script
            .iter()
            .filter(move |entry| entry.tick == tick)
            .map(|entry| entry.command.clone())
    }
}
