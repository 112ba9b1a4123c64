//! Plant and harvest task state machines over 2×2 plots.
//!
//! Both tasks share a frame: capture the entry pose, visit the four plot
//! cells in a fixed order, perform the per-cell action, run any vertical
//! work from the plot origin, and restore the entry pose field-for-field
//! before returning. Pose restoration is a hard invariant, not best
//! effort -- the orchestrator relies on every task ending where it began.
//!
//! The canonical per-cell pattern is "move up one, act downward, move back
//! down". Optional actions (a sapling cell already occupied, a dig with
//! nothing to dig, a pickup miss) are logged and skipped; mandatory ones
//! (ground fill) are fatal when they fail.

use arbor_turtle::Turtle;
use arbor_types::{MoveKind, MoveOutcome, PlotOrigin, Pose, Position, SlotIndex, SlotRole};
use tracing::{debug, info, warn};

use crate::config::FarmConfig;
use crate::error::FarmError;
use crate::guard::guarded_move;
use crate::navigate::{face, move_to};
use crate::pose::PoseTracker;

/// Cell offsets of a 2×2 plot from its origin, in visit order.
pub const CELL_OFFSETS: [(i32, i32); 4] = [(0, 0), (0, 1), (1, 0), (1, 1)];

/// Plant the four cells of the plot at `origin`.
///
/// Preconditions (checked once, before any movement): at least
/// `saplings_per_plot` saplings on hand, and at least `fill_per_plot`
/// ground-fill blocks when ground replacement is enabled. A shortfall is
/// fatal -- the whole farm cycle aborts rather than leaving a partial plot.
///
/// Returns the number of recoverable warnings logged.
pub fn plant_plot<T: Turtle>(
    turtle: &mut T,
    tracker: &mut PoseTracker,
    config: &FarmConfig,
    origin: PlotOrigin,
) -> Result<u32, FarmError> {
    let entry = tracker.pose();

    require_stock(
        turtle,
        config.slots.sapling,
        SlotRole::Sapling,
        config.saplings_per_plot,
    )?;
    if config.ground_replacement {
        require_stock(
            turtle,
            config.slots.ground_fill,
            SlotRole::GroundFill,
            config.fill_per_plot,
        )?;
    }

    info!(x = origin.x, z = origin.z, "planting plot");
    let mut warnings: u32 = 0;

    for (dx, dz) in CELL_OFFSETS {
        let cell = cell_position(origin, dx, dz);
        move_to(turtle, tracker, cell)?;

        if config.ground_replacement {
            select_role(turtle, config.slots.ground_fill, SlotRole::GroundFill)?;
            // Clear spent ground first so the fill placement lands on a
            // genuinely open cell; a miss just means it was already open.
            if let MoveOutcome::Failure { reason } = turtle.dig_down() {
                debug!(%reason, "no ground to clear");
            }
            if let MoveOutcome::Failure { reason } = turtle.place_down() {
                return Err(FarmError::PlacementFailed {
                    role: SlotRole::GroundFill,
                    reason,
                });
            }
        }

        guarded_move(turtle, tracker, MoveKind::Up)?;
        select_role(turtle, config.slots.sapling, SlotRole::Sapling)?;
        if let MoveOutcome::Failure { reason } = turtle.place_down() {
            // Tolerated, never retried: the cell may already hold a sapling.
            warn!(x = cell.x, z = cell.z, %reason, "sapling placement skipped");
            warnings = warnings.saturating_add(1);
        }
        guarded_move(turtle, tracker, MoveKind::Down)?;
    }

    move_to(turtle, tracker, origin.position())?;
    restore_pose(turtle, tracker, entry)?;
    Ok(warnings)
}

/// Harvest the plot at `origin`: clear the four base cells, sweep the
/// trunk column above the origin, then collect dropped items.
///
/// Returns the number of recoverable warnings logged.
pub fn harvest_plot<T: Turtle>(
    turtle: &mut T,
    tracker: &mut PoseTracker,
    config: &FarmConfig,
    origin: PlotOrigin,
) -> Result<u32, FarmError> {
    let entry = tracker.pose();
    info!(x = origin.x, z = origin.z, "harvesting plot");
    let mut warnings: u32 = 0;

    // Base pass: the guarded moves dig through whatever trunk stands in
    // the way; the explicit dig-down catches the block beneath each cell's
    // hover point.
    for (dx, dz) in CELL_OFFSETS {
        let cell = cell_position(origin, dx, dz);
        move_to(turtle, tracker, cell)?;
        guarded_move(turtle, tracker, MoveKind::Up)?;
        if let MoveOutcome::Failure { reason } = turtle.dig_down() {
            // The base may already be gone (cleared on the way in, or the
            // sapling never grew).
            warn!(x = cell.x, z = cell.z, %reason, "base dig skipped");
            warnings = warnings.saturating_add(1);
        }
        guarded_move(turtle, tracker, MoveKind::Down)?;
    }

    move_to(turtle, tracker, origin.position())?;

    // Ascent: detect-then-act, so the agent never climbs into open air
    // above the tree. The budget bounds the worst case.
    let mut steps: u32 = 0;
    while steps < config.ascent_limit && turtle.detect_up() {
        guarded_move(turtle, tracker, MoveKind::Up)?;
        if let MoveOutcome::Failure { reason } = turtle.dig_down() {
            debug!(%reason, "nothing below during ascent");
        }
        steps = steps.saturating_add(1);
    }
    if steps > 0 {
        debug!(steps, "vertical sweep complete");
    }

    // Descent: act-then-verify, digging upward before each step down, since
    // canopy remnants can sit at any height.
    while tracker.pose().position.y > entry.position.y {
        if let MoveOutcome::Failure { reason } = turtle.dig_up() {
            debug!(%reason, "nothing above during descent");
        }
        guarded_move(turtle, tracker, MoveKind::Down)?;
    }

    // Pickup sweep: all four headings once each, then below and above.
    // Misses are recoverable, like a skipped base dig.
    for _ in 0..4 {
        guarded_move(turtle, tracker, MoveKind::TurnRight)?;
        if let MoveOutcome::Failure { reason } = turtle.suck() {
            warn!(%reason, "nothing to pick up ahead");
            warnings = warnings.saturating_add(1);
        }
    }
    if let MoveOutcome::Failure { reason } = turtle.suck_down() {
        warn!(%reason, "nothing to pick up below");
        warnings = warnings.saturating_add(1);
    }
    if let MoveOutcome::Failure { reason } = turtle.suck_up() {
        warn!(%reason, "nothing to pick up above");
        warnings = warnings.saturating_add(1);
    }

    restore_pose(turtle, tracker, entry)?;
    Ok(warnings)
}

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

/// Ground-level position of a plot cell.
fn cell_position(origin: PlotOrigin, dx: i32, dz: i32) -> Position {
    Position::new(origin.x.saturating_add(dx), 0, origin.z.saturating_add(dz))
}

/// Abort with [`FarmError::InsufficientResource`] when `slot` holds fewer
/// than `required` items.
fn require_stock<T: Turtle>(
    turtle: &mut T,
    slot: SlotIndex,
    role: SlotRole,
    required: u32,
) -> Result<(), FarmError> {
    let available = turtle.item_count(slot);
    if available < required {
        return Err(FarmError::InsufficientResource {
            role,
            required,
            available,
        });
    }
    Ok(())
}

/// Select `slot`, mapping a failure to the fatal [`FarmError::SlotUnavailable`].
fn select_role<T: Turtle>(
    turtle: &mut T,
    slot: SlotIndex,
    role: SlotRole,
) -> Result<(), FarmError> {
    match turtle.select(slot) {
        MoveOutcome::Success => Ok(()),
        MoveOutcome::Failure { reason } => Err(FarmError::SlotUnavailable { role, reason }),
    }
}

/// Return to the task's entry pose, all four fields.
fn restore_pose<T: Turtle>(
    turtle: &mut T,
    tracker: &mut PoseTracker,
    entry: Pose,
) -> Result<(), FarmError> {
    move_to(turtle, tracker, entry.position)?;
    face(turtle, tracker, entry.heading)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
