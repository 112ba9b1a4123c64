//! Farm orchestration: phases over the static plot list, plus the
//! deposit/refuel glue.
//!
//! The orchestrator owns no retry logic -- all recovery is delegated down
//! to the guarded-move layer. Each phase starts and ends at the farm
//! origin with the canonical heading (North, the startup facing). Because
//! every task restores its entry pose, the orchestrator only ever rotates
//! in place; it never needs to translate back to the origin.

use arbor_turtle::Turtle;
use arbor_types::{Heading, MoveOutcome, SlotIndex};
use tracing::{debug, info, warn};

use crate::config::FarmConfig;
use crate::error::FarmError;
use crate::navigate::face;
use crate::plot::{harvest_plot, plant_plot};
use crate::pose::PoseTracker;

/// The heading the agent holds at the farm origin between phases. The
/// depot the deposit step drops into sits directly ahead on this heading.
pub const CANONICAL_HEADING: Heading = Heading::North;

/// Summary of one phase over the plot list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseSummary {
    /// Plots processed.
    pub plots: u32,
    /// Recoverable warnings logged across all plots.
    pub warnings: u32,
    /// Fuel level when the phase finished.
    pub fuel_level: u64,
}

/// Summary of one full plant/wait/harvest cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CycleSummary {
    /// The planting phase summary.
    pub planting: PhaseSummary,
    /// The harvest phase summary.
    pub harvest: PhaseSummary,
}

/// Run the planting phase: align, consolidate fuel, deposit surplus
/// cargo, then plant every configured plot.
pub fn plant_phase<T: Turtle>(
    turtle: &mut T,
    tracker: &mut PoseTracker,
    config: &FarmConfig,
) -> Result<PhaseSummary, FarmError> {
    face(turtle, tracker, CANONICAL_HEADING)?;
    info!(plots = config.plots.len(), "planting phase starting");

    consolidate_fuel(turtle, config);
    let mut warnings = deposit_cargo(turtle, config);

    for origin in &config.plots {
        let plot_warnings = plant_plot(turtle, tracker, config, *origin)?;
        warnings = warnings.saturating_add(plot_warnings);
    }

    face(turtle, tracker, CANONICAL_HEADING)?;
    let summary = PhaseSummary {
        plots: plot_count(config),
        warnings,
        fuel_level: turtle.fuel_level(),
    };
    info!(
        plots = summary.plots,
        warnings = summary.warnings,
        fuel = summary.fuel_level,
        "planting phase complete"
    );
    Ok(summary)
}

/// Run the harvest phase: align, then harvest every configured plot with
/// a refuel check before each one.
pub fn harvest_phase<T: Turtle>(
    turtle: &mut T,
    tracker: &mut PoseTracker,
    config: &FarmConfig,
) -> Result<PhaseSummary, FarmError> {
    face(turtle, tracker, CANONICAL_HEADING)?;
    info!(plots = config.plots.len(), "harvest phase starting");

    let mut warnings: u32 = 0;
    for origin in &config.plots {
        ensure_fuel(turtle, config)?;
        let plot_warnings = harvest_plot(turtle, tracker, config, *origin)?;
        warnings = warnings.saturating_add(plot_warnings);
    }

    face(turtle, tracker, CANONICAL_HEADING)?;
    let summary = PhaseSummary {
        plots: plot_count(config),
        warnings,
        fuel_level: turtle.fuel_level(),
    };
    info!(
        plots = summary.plots,
        warnings = summary.warnings,
        fuel = summary.fuel_level,
        "harvest phase complete"
    );
    Ok(summary)
}

/// Run one full cycle: plant, wait for growth via `wait`, then harvest.
///
/// The wait is caller-supplied so the engine binary owns the actual sleep
/// (and tests can substitute simulated growth).
pub fn run_cycle<T: Turtle>(
    turtle: &mut T,
    tracker: &mut PoseTracker,
    config: &FarmConfig,
    wait: impl FnOnce(&mut T),
) -> Result<CycleSummary, FarmError> {
    let planting = plant_phase(turtle, tracker, config)?;
    wait(turtle);
    let harvest = harvest_phase(turtle, tracker, config)?;
    Ok(CycleSummary { planting, harvest })
}

// ---------------------------------------------------------------------------
// Inventory and fuel glue
// ---------------------------------------------------------------------------

/// Drop every slot that is neither the sapling slot nor the fuel slot into
/// the depot ahead. Returns the number of warnings logged.
pub fn deposit_cargo<T: Turtle>(turtle: &mut T, config: &FarmConfig) -> u32 {
    let mut warnings: u32 = 0;
    for slot in SlotIndex::all() {
        if slot == config.slots.sapling || slot == config.slots.fuel {
            continue;
        }
        if slot == config.slots.ground_fill && config.ground_replacement {
            // Fill stock is working inventory while ground replacement
            // is on; it only counts as surplus otherwise.
            continue;
        }
        if turtle.item_count(slot) == 0 {
            continue;
        }
        if let MoveOutcome::Failure { reason } = turtle.select(slot) {
            warn!(slot = slot.get(), %reason, "could not select slot for deposit");
            warnings = warnings.saturating_add(1);
            continue;
        }
        if let MoveOutcome::Failure { reason } = turtle.drop_ahead() {
            warn!(slot = slot.get(), %reason, "deposit skipped");
            warnings = warnings.saturating_add(1);
        }
    }
    warnings
}

/// Merge stray fuel stacks into the fuel slot so refueling always finds
/// its consumables in one place.
pub fn consolidate_fuel<T: Turtle>(turtle: &mut T, config: &FarmConfig) {
    let Some(fuel_name) = turtle.item_detail(config.slots.fuel).map(|d| d.name) else {
        return;
    };
    for slot in SlotIndex::all() {
        if slot == config.slots.fuel {
            continue;
        }
        let matches = turtle
            .item_detail(slot)
            .is_some_and(|detail| detail.name == fuel_name);
        if !matches {
            continue;
        }
        if turtle.select(slot).is_success() {
            if let MoveOutcome::Failure { reason } = turtle.transfer_to(config.slots.fuel) {
                debug!(slot = slot.get(), %reason, "fuel consolidation skipped");
            }
        }
    }
}

/// Refuel until the level reaches the configured threshold.
///
/// Consumes fuel items in batches from the fuel slot. An empty fuel slot
/// while still below threshold is fatal: continuing would strand the
/// agent mid-plot.
pub fn ensure_fuel<T: Turtle>(turtle: &mut T, config: &FarmConfig) -> Result<(), FarmError> {
    let threshold = config.fuel.refuel_threshold;
    let mut level = turtle.fuel_level();
    if level >= threshold {
        return Ok(());
    }

    info!(level, threshold, "fuel below threshold, refueling");
    if let MoveOutcome::Failure { reason } = turtle.select(config.slots.fuel) {
        warn!(%reason, "could not select fuel slot");
        return Err(FarmError::OutOfFuel { level, threshold });
    }

    while level < threshold {
        if turtle.item_count(config.slots.fuel) == 0 {
            return Err(FarmError::OutOfFuel { level, threshold });
        }
        if let MoveOutcome::Failure { reason } = turtle.refuel(Some(config.fuel.refuel_batch)) {
            warn!(%reason, "refuel call failed");
            return Err(FarmError::OutOfFuel { level, threshold });
        }
        level = turtle.fuel_level();
    }

    debug!(level, "refueled");
    Ok(())
}

/// Plot count clamped into the summary's width.
fn plot_count(config: &FarmConfig) -> u32 {
    u32::try_from(config.plots.len()).unwrap_or(u32::MAX)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use arbor_turtle::world::{FUEL_PER_ITEM, ITEM_FUEL, ITEM_LOG, ITEM_SAPLING};
    use arbor_turtle::{starting_farm_world, Call, ScriptedTurtle, SimTurtle};
    use arbor_types::{PlotOrigin, Pose};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    fn slot(index: u8) -> SlotIndex {
        SlotIndex::new(index).unwrap_or(SlotIndex::FIRST)
    }

    fn two_plot_config() -> FarmConfig {
        FarmConfig {
            plots: vec![PlotOrigin::new(2, 2), PlotOrigin::new(5, 2)],
            fuel: crate::config::FuelConfig {
                refuel_threshold: 100,
                refuel_batch: 4,
            },
            ..FarmConfig::default()
        }
    }

    fn sim_world(config: &FarmConfig) -> SimTurtle {
        starting_farm_world(
            &config.plots,
            config.slots.fuel,
            config.slots.sapling,
            config.slots.ground_fill,
        )
    }

    fn grown_world(config: &FarmConfig) -> (SimTurtle, PoseTracker) {
        let mut sim = sim_world(&config);
        let mut tracker = PoseTracker::new();
        let planted = plant_phase(&mut sim, &mut tracker, config);
        assert!(planted.is_ok());
        let mut rng = StdRng::seed_from_u64(3);
        sim.grow_trees(&mut rng);
        (sim, tracker)
    }

    #[test]
    fn full_cycle_ends_at_origin_with_logs_banked() {
        let config = two_plot_config();
        let mut sim = sim_world(&config);
        let mut tracker = PoseTracker::new();
        let mut rng = StdRng::seed_from_u64(17);

        let result = run_cycle(&mut sim, &mut tracker, &config, |sim| {
            sim.grow_trees(&mut rng);
        });
        assert!(result.is_ok());
        assert_eq!(tracker.pose(), Pose::ORIGIN);
        assert_eq!(sim.pose(), Pose::ORIGIN);
        assert!(sim.total_of(ITEM_LOG) >= 8);
    }

    #[test]
    fn harvest_phase_restores_origin_for_every_plot_layout() {
        let config = two_plot_config();
        let (mut sim, mut tracker) = grown_world(&config);

        let result = harvest_phase(&mut sim, &mut tracker, &config);
        assert!(result.is_ok());
        assert_eq!(tracker.pose(), Pose::ORIGIN);
        if let Ok(summary) = result {
            assert_eq!(summary.plots, 2);
        }
    }

    #[test]
    fn deposit_keeps_sapling_and_fuel_slots() {
        let mut turtle = ScriptedTurtle::new();
        turtle.set_slot(slot(0), ITEM_FUEL, 10);
        turtle.set_slot(slot(1), ITEM_SAPLING, 10);
        turtle.set_slot(slot(4), ITEM_LOG, 32);
        turtle.set_slot(slot(5), ITEM_LOG, 8);
        let config = two_plot_config();

        let warnings = deposit_cargo(&mut turtle, &config);
        assert_eq!(warnings, 0);
        // Only the two log slots are dropped; fuel and sapling slots are
        // excluded (AND semantics), and the fill slot holds nothing here.
        assert_eq!(turtle.count_of(Call::DropAhead), 2);
        assert_eq!(turtle.count_of(Call::Select(slot(0))), 0);
        assert_eq!(turtle.count_of(Call::Select(slot(1))), 0);
        assert_eq!(turtle.count_of(Call::Select(slot(4))), 1);
        assert_eq!(turtle.count_of(Call::Select(slot(5))), 1);
    }

    #[test]
    fn deposit_keeps_fill_slot_while_ground_replacement_is_on() {
        let mut turtle = ScriptedTurtle::new();
        turtle.set_slot(slot(2), "arbor:soil", 20);
        let config = two_plot_config();

        let warnings = deposit_cargo(&mut turtle, &config);
        assert_eq!(warnings, 0);
        assert_eq!(turtle.count_of(Call::DropAhead), 0);
    }

    #[test]
    fn consolidate_moves_stray_fuel_into_the_fuel_slot() {
        let mut sim = SimTurtle::new(100, 10_000);
        sim.stock_slot(slot(0), ITEM_FUEL, 10);
        sim.stock_slot(slot(6), ITEM_FUEL, 5);
        let config = two_plot_config();

        consolidate_fuel(&mut sim, &config);
        assert_eq!(sim.item_count(slot(0)), 15);
        assert_eq!(sim.item_count(slot(6)), 0);
    }

    #[test]
    fn ensure_fuel_is_a_no_op_above_threshold() {
        let mut turtle = ScriptedTurtle::new();
        turtle.set_fuel(5_000);
        let config = two_plot_config();

        let result = ensure_fuel(&mut turtle, &config);
        assert!(result.is_ok());
        assert_eq!(turtle.count_of(Call::Refuel), 0);
    }

    #[test]
    fn ensure_fuel_refuels_up_to_threshold() {
        let mut sim = SimTurtle::new(10, 10_000);
        sim.stock_slot(slot(0), ITEM_FUEL, 10);
        let config = two_plot_config();

        let result = ensure_fuel(&mut sim, &config);
        assert!(result.is_ok());
        // One batch of 4 items at 80 units each clears the 100 threshold.
        let expected = FUEL_PER_ITEM.saturating_mul(4).saturating_add(10);
        assert_eq!(sim.fuel_level(), expected);
        assert_eq!(sim.item_count(slot(0)), 6);
    }

    #[test]
    fn ensure_fuel_fatal_when_slot_runs_dry() {
        let mut sim = SimTurtle::new(10, 10_000);
        let config = two_plot_config();

        let result = ensure_fuel(&mut sim, &config);
        assert!(matches!(
            result,
            Err(FarmError::OutOfFuel {
                level: 10,
                threshold: 100,
            })
        ));
    }

    #[test]
    fn plant_phase_aborts_on_missing_saplings() {
        let config = two_plot_config();
        let mut sim = sim_world(&config);
        let mut tracker = PoseTracker::new();
        sim.stock_slot(slot(1), ITEM_SAPLING, 2);

        let result = plant_phase(&mut sim, &mut tracker, &config);
        assert!(matches!(
            result,
            Err(FarmError::InsufficientResource { .. })
        ));
    }
}
