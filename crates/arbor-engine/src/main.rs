//! Farm engine binary for the Arbor tree farm.
//!
//! Wires the task engine to a simulated turtle world and runs the
//! plant/wait/harvest cycle loop. The whole system is one blocking thread
//! of control: every primitive is a blocking request/response, and the
//! only other suspension point is the fixed growth wait between phases.
//!
//! # Startup Sequence
//!
//! 1. Initialize structured logging (tracing)
//! 2. Load configuration from `arbor-config.yaml` (defaults when absent)
//! 3. Build the simulated farm world
//! 4. Run the cycle loop until the configured bound (or forever)
//! 5. Log the result; a fatal farm error halts the process

use std::path::PathBuf;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use arbor_core::farm;
use arbor_core::{ConfigError, FarmConfig, PoseTracker};
use arbor_turtle::starting_farm_world;

/// Application entry point for the farm engine.
///
/// # Errors
///
/// Returns an error if configuration loading fails or a fatal farm error
/// halts the cycle loop.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Initialize structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    info!("arbor-engine starting");

    // 2. Load configuration.
    let config = load_config()?;
    info!(
        plots = config.plots.len(),
        growth_wait_secs = config.growth_wait_secs,
        refuel_threshold = config.fuel.refuel_threshold,
        ground_replacement = config.ground_replacement,
        "configuration loaded"
    );

    // 3. Build the simulated farm world.
    let mut turtle = starting_farm_world(
        &config.plots,
        config.slots.fuel,
        config.slots.sapling,
        config.slots.ground_fill,
    );
    let mut tracker = PoseTracker::new();
    let mut rng = StdRng::from_os_rng();
    info!("simulated farm world created");

    // 4. Run the cycle loop.
    let mut cycle: u64 = 0;
    loop {
        cycle = cycle.saturating_add(1);
        info!(cycle, "cycle starting");

        let result = farm::run_cycle(&mut turtle, &mut tracker, &config, |world| {
            info!(secs = config.growth_wait_secs, "waiting for growth");
            std::thread::sleep(Duration::from_secs(config.growth_wait_secs));
            world.grow_trees(&mut rng);
        });

        match result {
            Ok(summary) => {
                info!(
                    cycle,
                    plots = summary.harvest.plots,
                    warnings = summary
                        .planting
                        .warnings
                        .saturating_add(summary.harvest.warnings),
                    fuel = summary.harvest.fuel_level,
                    "cycle complete"
                );
            }
            Err(fatal) => {
                // Halt rather than continue in an inconsistent state: a
                // move the engine cannot explain poisons the pose belief.
                error!(error = %fatal, cycle, "fatal farm error, halting");
                return Err(fatal.into());
            }
        }

        if config.max_cycles.is_some_and(|max| cycle >= max) {
            info!(cycle, "cycle bound reached, stopping");
            return Ok(());
        }
    }
}

/// Load configuration from `ARBOR_CONFIG` (or `arbor-config.yaml`),
/// falling back to the built-in defaults when no file exists.
fn load_config() -> Result<FarmConfig, ConfigError> {
    let path = std::env::var_os("ARBOR_CONFIG")
        .map_or_else(|| PathBuf::from("arbor-config.yaml"), PathBuf::from);

    if path.exists() {
        info!(path = %path.display(), "loading configuration file");
        FarmConfig::load(&path)
    } else {
        info!("no configuration file found, using defaults");
        let config = FarmConfig::default();
        config.validate()?;
        Ok(config)
    }
}
