//! Configuration loading and typed config structures for the farm.
//!
//! The canonical configuration lives in `arbor-config.yaml` at the project
//! root. This module defines strongly-typed structs mirroring the YAML
//! structure and a loader that reads and validates the file. Every field
//! has a default, so a missing or partial file still yields a runnable
//! farm.

use std::path::Path;

use serde::{Deserialize, Serialize};

use arbor_types::{PlotOrigin, SlotIndex};

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// The parsed configuration is not a usable farm.
    #[error("invalid config: {reason}")]
    Invalid {
        /// Description of the violated constraint.
        reason: String,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Mapping from logical slot roles to concrete inventory slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotConfig {
    /// Slot holding consumable fuel items.
    #[serde(default = "default_fuel_slot")]
    pub fuel: SlotIndex,
    /// Slot holding saplings.
    #[serde(default = "default_sapling_slot")]
    pub sapling: SlotIndex,
    /// Slot holding ground-fill blocks.
    #[serde(default = "default_ground_fill_slot")]
    pub ground_fill: SlotIndex,
}

impl Default for SlotConfig {
    fn default() -> Self {
        Self {
            fuel: default_fuel_slot(),
            sapling: default_sapling_slot(),
            ground_fill: default_ground_fill_slot(),
        }
    }
}

/// Refueling policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FuelConfig {
    /// Fuel level below which the agent refuels before continuing.
    #[serde(default = "default_refuel_threshold")]
    pub refuel_threshold: u64,
    /// Items consumed per refuel call.
    #[serde(default = "default_refuel_batch")]
    pub refuel_batch: u32,
}

impl Default for FuelConfig {
    fn default() -> Self {
        Self {
            refuel_threshold: default_refuel_threshold(),
            refuel_batch: default_refuel_batch(),
        }
    }
}

/// Top-level farm configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FarmConfig {
    /// Slot role assignments.
    #[serde(default)]
    pub slots: SlotConfig,

    /// Ordered plot origins; order determines visit sequence.
    #[serde(default = "default_plots")]
    pub plots: Vec<PlotOrigin>,

    /// Refueling policy.
    #[serde(default)]
    pub fuel: FuelConfig,

    /// Seconds to wait between the planting and harvest phases.
    #[serde(default = "default_growth_wait_secs")]
    pub growth_wait_secs: u64,

    /// Upper bound on the harvest vertical sweep, in ascent steps.
    #[serde(default = "default_ascent_limit")]
    pub ascent_limit: u32,

    /// Whether planting replaces the ground block beneath each cell.
    #[serde(default = "default_ground_replacement")]
    pub ground_replacement: bool,

    /// Saplings required on hand before planting a plot.
    #[serde(default = "default_per_plot")]
    pub saplings_per_plot: u32,

    /// Ground-fill blocks required before planting a plot
    /// (only when ground replacement is enabled).
    #[serde(default = "default_per_plot")]
    pub fill_per_plot: u32,

    /// Stop after this many full cycles; `None` runs forever.
    #[serde(default)]
    pub max_cycles: Option<u64>,
}

impl Default for FarmConfig {
    fn default() -> Self {
        Self {
            slots: SlotConfig::default(),
            plots: default_plots(),
            fuel: FuelConfig::default(),
            growth_wait_secs: default_growth_wait_secs(),
            ascent_limit: default_ascent_limit(),
            ground_replacement: default_ground_replacement(),
            saplings_per_plot: default_per_plot(),
            fill_per_plot: default_per_plot(),
            max_cycles: None,
        }
    }
}

impl FarmConfig {
    /// Load configuration from a YAML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_yml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check cross-field constraints the type system cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.slots.fuel == self.slots.sapling
            || self.slots.fuel == self.slots.ground_fill
            || self.slots.sapling == self.slots.ground_fill
        {
            return Err(ConfigError::Invalid {
                reason: "slot roles must map to distinct slots".to_string(),
            });
        }
        if self.plots.is_empty() {
            return Err(ConfigError::Invalid {
                reason: "at least one plot origin is required".to_string(),
            });
        }
        if self.ascent_limit == 0 {
            return Err(ConfigError::Invalid {
                reason: "ascent limit must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

fn default_fuel_slot() -> SlotIndex {
    SlotIndex::new(0).unwrap_or(SlotIndex::FIRST)
}

fn default_sapling_slot() -> SlotIndex {
    SlotIndex::new(1).unwrap_or(SlotIndex::FIRST)
}

fn default_ground_fill_slot() -> SlotIndex {
    SlotIndex::new(2).unwrap_or(SlotIndex::FIRST)
}

const fn default_refuel_threshold() -> u64 {
    500
}

const fn default_refuel_batch() -> u32 {
    16
}

/// Four 2×2 plots in a row, two cells South of the depot, spaced three
/// cells apart so canopies never merge.
fn default_plots() -> Vec<PlotOrigin> {
    vec![
        PlotOrigin::new(2, 2),
        PlotOrigin::new(5, 2),
        PlotOrigin::new(8, 2),
        PlotOrigin::new(11, 2),
    ]
}

const fn default_growth_wait_secs() -> u64 {
    300
}

const fn default_ascent_limit() -> u32 {
    25
}

const fn default_ground_replacement() -> bool {
    true
}

const fn default_per_plot() -> u32 {
    4
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
