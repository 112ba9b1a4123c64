//! Dead-reckoning pose tracker.
//!
//! The tracker holds the agent's *believed* relative position and heading.
//! It is updated exclusively through [`PoseTracker::apply_move`], and only
//! when the reported outcome is a success -- a failed or partially executed
//! action contributes zero delta. The guarded-move layer is the tracker's
//! only writer in the running engine.

use arbor_types::{MoveKind, MoveOutcome, Pose};

/// The agent's believed pose, funneled through one transition function.
///
/// Coordinate updates use saturating arithmetic: the workspace forbids
/// unchecked arithmetic, and a pose billions of cells from origin is not
/// reachable within the agent's fuel limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoseTracker {
    /// The current belief.
    pose: Pose,
}

impl PoseTracker {
    /// A tracker at the startup pose (origin, facing North).
    pub const fn new() -> Self {
        Self { pose: Pose::ORIGIN }
    }

    /// The current believed pose.
    pub const fn pose(&self) -> Pose {
        self.pose
    }

    /// Apply the delta of `kind` to the belief, if `outcome` is a success.
    ///
    /// Pure state transition: no error conditions, no side effects beyond
    /// the mutation. A failure outcome is a no-op.
    pub const fn apply_move(&mut self, kind: MoveKind, outcome: &MoveOutcome) {
        if !outcome.is_success() {
            return;
        }
        match kind {
            MoveKind::Forward => {
                let (dx, dz) = self.pose.heading.forward_delta();
                self.pose.position.x = self.pose.position.x.saturating_add(dx);
                self.pose.position.z = self.pose.position.z.saturating_add(dz);
            }
            MoveKind::Back => {
                let (dx, dz) = self.pose.heading.forward_delta();
                self.pose.position.x = self.pose.position.x.saturating_sub(dx);
                self.pose.position.z = self.pose.position.z.saturating_sub(dz);
            }
            MoveKind::Up => {
                self.pose.position.y = self.pose.position.y.saturating_add(1);
            }
            MoveKind::Down => {
                self.pose.position.y = self.pose.position.y.saturating_sub(1);
            }
            MoveKind::TurnLeft => {
                self.pose.heading = self.pose.heading.counterclockwise();
            }
            MoveKind::TurnRight => {
                self.pose.heading = self.pose.heading.clockwise();
            }
        }
    }
}

impl Default for PoseTracker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use arbor_types::{Heading, Position};

    use super::*;

    fn ok() -> MoveOutcome {
        MoveOutcome::Success
    }

    fn blocked() -> MoveOutcome {
        MoveOutcome::failure("Movement obstructed")
    }

    #[test]
    fn forward_follows_heading() {
        let mut tracker = PoseTracker::new();
        tracker.apply_move(MoveKind::Forward, &ok());
        assert_eq!(tracker.pose().position, Position::new(0, 0, -1));

        tracker.apply_move(MoveKind::TurnRight, &ok());
        tracker.apply_move(MoveKind::Forward, &ok());
        assert_eq!(tracker.pose().position, Position::new(1, 0, -1));

        tracker.apply_move(MoveKind::TurnRight, &ok());
        tracker.apply_move(MoveKind::Forward, &ok());
        assert_eq!(tracker.pose().position, Position::new(1, 0, 0));

        tracker.apply_move(MoveKind::TurnRight, &ok());
        tracker.apply_move(MoveKind::Forward, &ok());
        assert_eq!(tracker.pose().position, Position::new(0, 0, 0));
    }

    #[test]
    fn back_is_the_exact_inverse_of_forward() {
        for heading_turns in 0..4_u8 {
            let mut tracker = PoseTracker::new();
            for _ in 0..heading_turns {
                tracker.apply_move(MoveKind::TurnRight, &ok());
            }
            let before = tracker.pose();
            tracker.apply_move(MoveKind::Forward, &ok());
            tracker.apply_move(MoveKind::Back, &ok());
            assert_eq!(tracker.pose(), before);
        }
    }

    #[test]
    fn vertical_moves_change_only_y() {
        let mut tracker = PoseTracker::new();
        tracker.apply_move(MoveKind::Up, &ok());
        tracker.apply_move(MoveKind::Up, &ok());
        tracker.apply_move(MoveKind::Down, &ok());
        assert_eq!(tracker.pose().position, Position::new(0, 1, 0));
        assert_eq!(tracker.pose().heading, Heading::North);
    }

    #[test]
    fn turns_cycle_the_heading() {
        let mut tracker = PoseTracker::new();
        tracker.apply_move(MoveKind::TurnLeft, &ok());
        assert_eq!(tracker.pose().heading, Heading::West);
        tracker.apply_move(MoveKind::TurnRight, &ok());
        tracker.apply_move(MoveKind::TurnRight, &ok());
        assert_eq!(tracker.pose().heading, Heading::East);
        assert_eq!(tracker.pose().position, Position::new(0, 0, 0));
    }

    #[test]
    fn failed_moves_contribute_zero_delta() {
        let mut tracker = PoseTracker::new();
        tracker.apply_move(MoveKind::Forward, &blocked());
        tracker.apply_move(MoveKind::Up, &blocked());
        tracker.apply_move(MoveKind::TurnRight, &blocked());
        assert_eq!(tracker.pose(), Pose::ORIGIN);
    }

    #[test]
    fn mixed_sequence_applies_only_successes() {
        let mut tracker = PoseTracker::new();
        tracker.apply_move(MoveKind::Forward, &blocked());
        tracker.apply_move(MoveKind::Forward, &ok());
        tracker.apply_move(MoveKind::TurnRight, &ok());
        tracker.apply_move(MoveKind::Forward, &blocked());
        tracker.apply_move(MoveKind::Up, &ok());
        assert_eq!(
            tracker.pose(),
            Pose {
                position: Position::new(0, 1, -1),
                heading: Heading::East,
            }
        );
    }
}
