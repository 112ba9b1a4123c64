//! Guarded primitive execution: bounded dig-and-retry recovery.
//!
//! [`guarded_move`] is the single place raw primitive failures are handled.
//! The recovery is strictly bounded -- at most one dig attempt and at most
//! one retry, never a loop -- so a permanently blocked cell aborts the run
//! instead of spinning. Every primitive attempt, regardless of outcome, is
//! reported to the pose tracker.

use arbor_turtle::Turtle;
use arbor_types::{DigDirection, MoveKind, MoveOutcome};
use tracing::debug;

use crate::error::FarmError;
use crate::pose::PoseTracker;

/// Execute one pose-changing primitive with obstacle-clearing recovery.
///
/// Sequence: attempt the primitive; on failure, dig along the move's
/// recovery binding and retry exactly once. A failed dig, a failed retry,
/// or any turn failure is fatal ([`FarmError::MoveBlocked`] /
/// [`FarmError::TurnFailed`]).
pub fn guarded_move<T: Turtle>(
    turtle: &mut T,
    tracker: &mut PoseTracker,
    kind: MoveKind,
) -> Result<(), FarmError> {
    let first = perform(turtle, kind);
    tracker.apply_move(kind, &first);
    let MoveOutcome::Failure { reason } = first else {
        return Ok(());
    };

    // Turns pair with no dig primitive: a block never obstructs a turn,
    // so a failed turn has no recovery.
    let Some(direction) = kind.dig_direction() else {
        return Err(FarmError::TurnFailed { kind, reason });
    };

    debug!(?kind, %reason, "move blocked, clearing obstruction");
    if let MoveOutcome::Failure { reason } = dig(turtle, direction) {
        return Err(FarmError::MoveBlocked { kind, reason });
    }

    let retry = perform(turtle, kind);
    tracker.apply_move(kind, &retry);
    match retry {
        MoveOutcome::Success => Ok(()),
        MoveOutcome::Failure { reason } => Err(FarmError::MoveBlocked { kind, reason }),
    }
}

/// Dispatch `kind` to its movement primitive.
fn perform<T: Turtle>(turtle: &mut T, kind: MoveKind) -> MoveOutcome {
    match kind {
        MoveKind::Forward => turtle.forward(),
        MoveKind::Back => turtle.back(),
        MoveKind::Up => turtle.up(),
        MoveKind::Down => turtle.down(),
        MoveKind::TurnLeft => turtle.turn_left(),
        MoveKind::TurnRight => turtle.turn_right(),
    }
}

/// Dispatch a recovery dig along `direction`.
fn dig<T: Turtle>(turtle: &mut T, direction: DigDirection) -> MoveOutcome {
    match direction {
        DigDirection::Ahead => turtle.dig(),
        DigDirection::Up => turtle.dig_up(),
        DigDirection::Down => turtle.dig_down(),
    }
}
