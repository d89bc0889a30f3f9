// Configuration module for reading Toroid.toml
// This module provides OOP-style configuration management for the bot

use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::moves::Move;
use crate::types::Topology;

/// Main configuration structure containing all tunable parameters
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub bot: BotConfig,
    pub server: ServerConfig,
    pub decision: DecisionConfig,
    pub weights: WeightsConfig,
    pub scores: ScoresConfig,
    pub energy: EnergyConfig,
    pub debug: DebugConfig,
}

/// Identity reported to the `NAME` request
#[derive(Debug, Deserialize, Clone)]
pub struct BotConfig {
    pub name: String,
}

/// TCP listener settings
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// How candidate moves are turned into one decision
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DecisionMode {
    /// Score every candidate of every supplier, highest weighted score wins
    Weighted,
    /// First candidate of the first supplier that yields one wins
    FirstMatch,
}

/// Decision policy constants
#[derive(Debug, Deserialize, Clone)]
pub struct DecisionConfig {
    pub mode: DecisionMode,
    pub topology: Topology,
    /// Move text returned when nothing else applies
    pub default_move: String,
}

impl DecisionConfig {
    /// Parses the configured fallback move
    pub fn default_move(&self) -> Result<Move, String> {
        self.default_move
            .parse()
            .map_err(|e| format!("Invalid decision.default_move: {}", e))
    }
}

/// Per-supplier score multipliers
#[derive(Debug, Deserialize, Clone)]
pub struct WeightsConfig {
    pub safe_move: f64,
    pub safe_haste_move: f64,
    pub safe_detour_move: f64,
    pub close_treasure_move: f64,
    pub close_battery_move: f64,
    pub reachable_treasure_move: f64,
    pub reachable_battery_move: f64,
}

impl WeightsConfig {
    fn named(&self) -> [(&'static str, f64); 7] {
        [
            ("safe_move", self.safe_move),
            ("safe_haste_move", self.safe_haste_move),
            ("safe_detour_move", self.safe_detour_move),
            ("close_treasure_move", self.close_treasure_move),
            ("close_battery_move", self.close_battery_move),
            ("reachable_treasure_move", self.reachable_treasure_move),
            ("reachable_battery_move", self.reachable_battery_move),
        ]
    }
}

/// Evaluator constants
#[derive(Debug, Deserialize, Clone)]
pub struct ScoresConfig {
    /// Added to every move so that a move no evaluator cares about stays positive
    pub base_score: f64,

    // Nook risk
    pub nook_penalty: f64,
    pub nook_threshold: usize,

    // Collision risk (another head next to the destination)
    pub collision_penalty: f64,

    // Wall proximity reward
    pub wall_reward: f64,
    pub wall_min_obstacles: usize,
    pub wall_max_obstacles: usize,
}

/// Energy-aware supplier ordering (first-match mode only)
#[derive(Debug, Deserialize, Clone)]
pub struct EnergyConfig {
    /// At or below this level batteries are preferred over treasures
    pub low_energy_threshold: i32,
}

/// Decision log configuration
#[derive(Debug, Deserialize, Clone)]
pub struct DebugConfig {
    pub enabled: bool,
    pub log_file_path: String,
}

impl Config {
    /// Loads configuration from a TOML file
    ///
    /// # Arguments
    /// * `path` - Path to the Toroid.toml configuration file
    ///
    /// # Returns
    /// * `Result<Config, String>` - Parsed configuration or error message
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let contents = fs::read_to_string(path.as_ref())
            .map_err(|e| format!("Failed to read config file: {}", e))?;

        Self::from_toml_str(&contents)
    }

    /// Parses and validates configuration text
    pub fn from_toml_str(contents: &str) -> Result<Self, String> {
        let config: Config =
            toml::from_str(contents).map_err(|e| format!("Failed to parse config file: {}", e))?;
        config.validate()?;
        Ok(config)
    }

    /// Loads default configuration from Toroid.toml in the project root
    pub fn load_default() -> Result<Self, String> {
        Self::from_file("Toroid.toml")
    }

    /// Creates a configuration with hardcoded default values as fallback
    /// This should match the constants defined in Toroid.toml
    pub fn default_hardcoded() -> Self {
        Config {
            bot: BotConfig {
                name: "Toroid".to_string(),
            },
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 9001,
            },
            decision: DecisionConfig {
                mode: DecisionMode::Weighted,
                topology: Topology::Toroidal,
                default_move: "D".to_string(),
            },
            weights: WeightsConfig {
                safe_move: 1.0,
                safe_haste_move: 1.2,
                safe_detour_move: 0.8,
                close_treasure_move: 1.0,
                close_battery_move: 1.0,
                reachable_treasure_move: 1.0,
                reachable_battery_move: 1.0,
            },
            scores: ScoresConfig {
                base_score: 1.0,
                nook_penalty: -100.0,
                nook_threshold: 3,
                collision_penalty: -200.0,  // twice as bad as walking into a nook
                wall_reward: 30.0,
                wall_min_obstacles: 1,
                wall_max_obstacles: 2,
            },
            energy: EnergyConfig {
                low_energy_threshold: 1,
            },
            debug: DebugConfig {
                enabled: false,
                log_file_path: "toroid_decisions.jsonl".to_string(),
            },
        }
    }

    /// Same defaults with a different decision mode and topology
    pub fn with_policy(mode: DecisionMode, topology: Topology) -> Self {
        let mut config = Self::default_hardcoded();
        config.decision.mode = mode;
        config.decision.topology = topology;
        config
    }

    /// Attempts to load from file, falls back to hardcoded defaults on error
    pub fn load_or_default() -> Self {
        Self::load_default()
            .unwrap_or_else(|e| {
                log::warn!("Could not load Toroid.toml ({}), using hardcoded defaults", e);
                Self::default_hardcoded()
            })
    }

    fn validate(&self) -> Result<(), String> {
        self.decision.default_move()?;
        for (name, weight) in self.weights.named() {
            if !weight.is_finite() || weight < 0.0 {
                return Err(format!(
                    "weights.{} must be a finite non-negative number, got {}",
                    name, weight
                ));
            }
        }
        // a cell has 4 neighbours
        if self.scores.nook_threshold > 4 {
            return Err(format!(
                "scores.nook_threshold ({}) exceeds 4",
                self.scores.nook_threshold
            ));
        }
        if self.scores.wall_max_obstacles > 4 {
            return Err(format!(
                "scores.wall_max_obstacles ({}) exceeds 4",
                self.scores.wall_max_obstacles
            ));
        }
        if self.scores.wall_min_obstacles > self.scores.wall_max_obstacles {
            return Err(format!(
                "scores.wall_min_obstacles ({}) exceeds scores.wall_max_obstacles ({})",
                self.scores.wall_min_obstacles, self.scores.wall_max_obstacles
            ));
        }
        Ok(())
    }
}
