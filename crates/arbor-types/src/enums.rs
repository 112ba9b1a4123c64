//! Enumeration types for the Arbor tree-farm agent.
//!
//! Headings, move kinds, and the direction-qualified action families of the
//! capability surface. All enums are closed and matched exhaustively; there
//! are no string-tagged dispatch paths anywhere in the workspace.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Heading
// ---------------------------------------------------------------------------

/// A compass heading, ordered clockwise: North, East, South, West.
///
/// The agent's believed facing. North is the facing at startup and defines
/// the negative-z direction of the relative coordinate frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Heading {
    /// Negative z. The canonical startup heading.
    North,
    /// Positive x.
    East,
    /// Positive z.
    South,
    /// Negative x.
    West,
}

impl Heading {
    /// The heading one quarter-turn clockwise from this one.
    pub const fn clockwise(self) -> Self {
        match self {
            Self::North => Self::East,
            Self::East => Self::South,
            Self::South => Self::West,
            Self::West => Self::North,
        }
    }

    /// The heading one quarter-turn counterclockwise from this one.
    pub const fn counterclockwise(self) -> Self {
        match self {
            Self::North => Self::West,
            Self::West => Self::South,
            Self::South => Self::East,
            Self::East => Self::North,
        }
    }

    /// Number of clockwise quarter-turns (0..=3) from `self` to `target`.
    pub const fn clockwise_steps_to(self, target: Self) -> u8 {
        (target.index().wrapping_sub(self.index())) % 4
    }

    /// The (dx, dz) ground-plane delta of one forward step on this heading.
    pub const fn forward_delta(self) -> (i32, i32) {
        match self {
            Self::North => (0, -1),
            Self::East => (1, 0),
            Self::South => (0, 1),
            Self::West => (-1, 0),
        }
    }

    /// Clockwise ordinal of the heading (North = 0 .. West = 3).
    const fn index(self) -> u8 {
        match self {
            Self::North => 0,
            Self::East => 1,
            Self::South => 2,
            Self::West => 3,
        }
    }
}

// ---------------------------------------------------------------------------
// MoveKind
// ---------------------------------------------------------------------------

/// A single pose-changing primitive the agent can attempt.
///
/// This is the complete set; every dispatch over it is an exhaustive match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum MoveKind {
    /// One cell along the current heading.
    Forward,
    /// One cell against the current heading, without turning.
    Back,
    /// One cell up.
    Up,
    /// One cell down.
    Down,
    /// Quarter-turn counterclockwise; position unchanged.
    TurnLeft,
    /// Quarter-turn clockwise; position unchanged.
    TurnRight,
}

impl MoveKind {
    /// The dig direction that can clear an obstruction for this move.
    ///
    /// Turns have no binding: a block never obstructs a turn, so a failed
    /// turn is a logical failure with no recovery.
    pub const fn dig_direction(self) -> Option<DigDirection> {
        match self {
            Self::Forward | Self::Back => Some(DigDirection::Ahead),
            Self::Up => Some(DigDirection::Up),
            Self::Down => Some(DigDirection::Down),
            Self::TurnLeft | Self::TurnRight => None,
        }
    }

    /// Whether this kind is a turn (position-preserving).
    pub const fn is_turn(self) -> bool {
        matches!(self, Self::TurnLeft | Self::TurnRight)
    }
}

// ---------------------------------------------------------------------------
// Direction-qualified action families
// ---------------------------------------------------------------------------

/// Direction qualifier for the dig primitive family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum DigDirection {
    /// Dig the cell directly ahead on the current heading.
    Ahead,
    /// Dig the cell directly above.
    Up,
    /// Dig the cell directly below.
    Down,
}

/// Direction qualifier for the place primitive family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PlaceDirection {
    /// Place into the cell directly above.
    Up,
    /// Place into the cell directly below.
    Down,
}

/// Direction qualifier for the pickup (suck) primitive family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SuckDirection {
    /// Pick up from the cell directly ahead.
    Ahead,
    /// Pick up from the cell directly above.
    Up,
    /// Pick up from the cell directly below.
    Down,
}

// ---------------------------------------------------------------------------
// SlotRole
// ---------------------------------------------------------------------------

/// Logical role of an inventory slot.
///
/// The mapping from role to concrete slot index is configuration, supplied
/// once at startup; the task engine only ever names roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SlotRole {
    /// Holds consumable fuel items.
    Fuel,
    /// Holds saplings to plant.
    Sapling,
    /// Holds ground-fill blocks (soil) for plot replacement.
    GroundFill,
    /// General-purpose working slot.
    Scratch,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
