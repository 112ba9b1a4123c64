//! Axis-sequenced dead-reckoning navigation.
//!
//! [`move_to`] converts a target relative coordinate into guarded-move
//! calls in a fixed axis order: vertical first, then x, then z. Vertical
//! clearance is independent of horizontal position in this domain, so the
//! order is never varied. Heading is never assumed -- every axis adjustment
//! re-derives the needed rotation from the tracker -- which makes the
//! function idempotent: calling it with the current position is a no-op.

use std::cmp::Ordering;

use arbor_turtle::Turtle;
use arbor_types::{Heading, MoveKind, Position};
use tracing::debug;

use crate::error::FarmError;
use crate::guard::guarded_move;
use crate::pose::PoseTracker;

/// Rotate in place until the agent faces `target`, with minimal turns.
///
/// Three clockwise steps become one counterclockwise turn; facing the
/// target already issues zero calls.
pub fn face<T: Turtle>(
    turtle: &mut T,
    tracker: &mut PoseTracker,
    target: Heading,
) -> Result<(), FarmError> {
    match tracker.pose().heading.clockwise_steps_to(target) {
        0 => Ok(()),
        3 => guarded_move(turtle, tracker, MoveKind::TurnLeft),
        steps => {
            for _ in 0..steps {
                guarded_move(turtle, tracker, MoveKind::TurnRight)?;
            }
            Ok(())
        }
    }
}

/// Move the agent to `target` by dead reckoning.
///
/// Termination is inherited from the guarded layer: every blocked step
/// either clears or aborts fatally, so this never spins on a permanently
/// blocked cell.
pub fn move_to<T: Turtle>(
    turtle: &mut T,
    tracker: &mut PoseTracker,
    target: Position,
) -> Result<(), FarmError> {
    if tracker.pose().position != target {
        debug!(
            from = ?tracker.pose().position,
            to = ?target,
            "navigating"
        );
    }

    // 1. Vertical.
    while tracker.pose().position.y < target.y {
        guarded_move(turtle, tracker, MoveKind::Up)?;
    }
    while tracker.pose().position.y > target.y {
        guarded_move(turtle, tracker, MoveKind::Down)?;
    }

    // 2. Horizontal x.
    match target.x.cmp(&tracker.pose().position.x) {
        Ordering::Greater => {
            face(turtle, tracker, Heading::East)?;
            while tracker.pose().position.x < target.x {
                guarded_move(turtle, tracker, MoveKind::Forward)?;
            }
        }
        Ordering::Less => {
            face(turtle, tracker, Heading::West)?;
            while tracker.pose().position.x > target.x {
                guarded_move(turtle, tracker, MoveKind::Forward)?;
            }
        }
        Ordering::Equal => {}
    }

    // 3. Horizontal z.
    match target.z.cmp(&tracker.pose().position.z) {
        Ordering::Greater => {
            face(turtle, tracker, Heading::South)?;
            while tracker.pose().position.z < target.z {
                guarded_move(turtle, tracker, MoveKind::Forward)?;
            }
        }
        Ordering::Less => {
            face(turtle, tracker, Heading::North)?;
            while tracker.pose().position.z > target.z {
                guarded_move(turtle, tracker, MoveKind::Forward)?;
            }
        }
        Ordering::Equal => {}
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use arbor_turtle::{Call, ScriptedTurtle};

    use super::*;

    #[test]
    fn move_to_current_position_issues_zero_calls() {
        let mut turtle = ScriptedTurtle::new();
        let mut tracker = PoseTracker::new();
        let result = move_to(&mut turtle, &mut tracker, Position::new(0, 0, 0));
        assert!(result.is_ok());
        assert!(turtle.calls().is_empty());
    }

    #[test]
    fn face_current_heading_issues_zero_calls() {
        let mut turtle = ScriptedTurtle::new();
        let mut tracker = PoseTracker::new();
        assert!(face(&mut turtle, &mut tracker, Heading::North).is_ok());
        assert!(turtle.calls().is_empty());
    }

    #[test]
    fn face_uses_minimal_turns() {
        // North -> West: one counterclockwise turn, not three clockwise.
        let mut turtle = ScriptedTurtle::new();
        let mut tracker = PoseTracker::new();
        assert!(face(&mut turtle, &mut tracker, Heading::West).is_ok());
        assert_eq!(turtle.calls(), &[Call::TurnLeft]);
        assert_eq!(tracker.pose().heading, Heading::West);
    }

    #[test]
    fn face_opposite_heading_takes_two_turns() {
        let mut turtle = ScriptedTurtle::new();
        let mut tracker = PoseTracker::new();
        assert!(face(&mut turtle, &mut tracker, Heading::South).is_ok());
        assert_eq!(turtle.calls(), &[Call::TurnRight, Call::TurnRight]);
    }

    #[test]
    fn diagonal_path_is_axis_sequenced() {
        // From the origin facing North, (3, 0, 3) is: turn East, 3 forward,
        // turn South, 3 forward.
        let mut turtle = ScriptedTurtle::new();
        let mut tracker = PoseTracker::new();
        let result = move_to(&mut turtle, &mut tracker, Position::new(3, 0, 3));
        assert!(result.is_ok());
        assert_eq!(
            turtle.calls(),
            &[
                Call::TurnRight,
                Call::Forward,
                Call::Forward,
                Call::Forward,
                Call::TurnRight,
                Call::Forward,
                Call::Forward,
                Call::Forward,
            ]
        );
        assert_eq!(tracker.pose().position, Position::new(3, 0, 3));
        assert_eq!(tracker.pose().heading, Heading::South);
    }

    #[test]
    fn vertical_axis_is_adjusted_first() {
        let mut turtle = ScriptedTurtle::new();
        let mut tracker = PoseTracker::new();
        let result = move_to(&mut turtle, &mut tracker, Position::new(1, 2, 0));
        assert!(result.is_ok());
        assert_eq!(
            turtle.calls(),
            &[Call::Up, Call::Up, Call::TurnRight, Call::Forward]
        );
    }

    #[test]
    fn negative_axes_face_west_and_north() {
        let mut turtle = ScriptedTurtle::new();
        let mut tracker = PoseTracker::new();
        let result = move_to(&mut turtle, &mut tracker, Position::new(-2, 0, -1));
        assert!(result.is_ok());
        assert_eq!(
            turtle.calls(),
            &[
                Call::TurnLeft,
                Call::Forward,
                Call::Forward,
                Call::TurnRight,
                Call::Forward,
            ]
        );
        assert_eq!(tracker.pose().position, Position::new(-2, 0, -1));
    }

    #[test]
    fn blocked_step_clears_and_path_completes() {
        let mut turtle = ScriptedTurtle::new();
        turtle.push_failure(Call::Forward, "Movement obstructed");
        let mut tracker = PoseTracker::new();

        let result = move_to(&mut turtle, &mut tracker, Position::new(0, 0, -2));
        assert!(result.is_ok());
        assert_eq!(tracker.pose().position, Position::new(0, 0, -2));
        assert_eq!(turtle.count_of(Call::Dig(arbor_types::DigDirection::Ahead)), 1);
        // Blocked attempt + retry + clean second step.
        assert_eq!(turtle.count_of(Call::Forward), 3);
    }

    #[test]
    fn move_to_is_idempotent_after_arrival() {
        let mut turtle = ScriptedTurtle::new();
        let mut tracker = PoseTracker::new();
        let target = Position::new(2, 1, -3);
        assert!(move_to(&mut turtle, &mut tracker, target).is_ok());
        let calls_after_first = turtle.calls().len();
        assert!(move_to(&mut turtle, &mut tracker, target).is_ok());
        assert_eq!(turtle.calls().len(), calls_after_first);
    }
}
