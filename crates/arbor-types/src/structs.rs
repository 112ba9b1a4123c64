//! Core data structs for the Arbor tree-farm agent.
//!
//! Positions and poses are *beliefs* maintained by dead reckoning: they are
//! updated only when a primitive reports success, and they define a frame
//! relative to the agent's real-world startup cell and facing.

use serde::{Deserialize, Serialize};

use crate::enums::Heading;

// ---------------------------------------------------------------------------
// Position / Pose
// ---------------------------------------------------------------------------

/// A relative cell coordinate in the agent's dead-reckoning frame.
///
/// The startup cell is `(0, 0, 0)`. x grows East, z grows South, y grows up.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Position {
    /// East-west axis (East positive).
    pub x: i32,
    /// Vertical axis (up positive).
    pub y: i32,
    /// North-south axis (South positive).
    pub z: i32,
}

impl Position {
    /// Construct a position from its three coordinates.
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }
}

/// The agent's believed position and heading.
///
/// Initialized to [`Pose::ORIGIN`] at startup; mutated only by the pose
/// tracker, and only on successful primitives. A failed or partially
/// executed action never changes the pose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pose {
    /// Believed cell coordinate.
    pub position: Position,
    /// Believed facing.
    pub heading: Heading,
}

impl Pose {
    /// The startup pose: the real-world starting cell and facing define
    /// the coordinate origin.
    pub const ORIGIN: Self = Self {
        position: Position::new(0, 0, 0),
        heading: Heading::North,
    };
}

impl Default for Pose {
    fn default() -> Self {
        Self::ORIGIN
    }
}

// ---------------------------------------------------------------------------
// PlotOrigin
// ---------------------------------------------------------------------------

/// The ground-level northwest corner of a 2×2 plot (y implicitly 0).
///
/// A static ordered list of these defines the farm layout. Order determines
/// visit sequence; plots are otherwise independent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PlotOrigin {
    /// East-west coordinate of the corner cell.
    pub x: i32,
    /// North-south coordinate of the corner cell.
    pub z: i32,
}

impl PlotOrigin {
    /// Construct a plot origin from its ground-plane coordinates.
    pub const fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    /// The ground-level [`Position`] of the corner cell.
    pub const fn position(self) -> Position {
        Position::new(self.x, 0, self.z)
    }
}

// ---------------------------------------------------------------------------
// MoveOutcome
// ---------------------------------------------------------------------------

/// Result contract of every capability-surface call.
///
/// The enum shape makes the contract structural: a reason exists if and
/// only if the call failed. There is no partially populated state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoveOutcome {
    /// The primitive completed.
    Success,
    /// The primitive did not execute.
    Failure {
        /// Human-readable reason reported by the capability surface.
        reason: String,
    },
}

impl MoveOutcome {
    /// A successful outcome.
    pub const fn success() -> Self {
        Self::Success
    }

    /// A failed outcome carrying the surface's reason string.
    pub fn failure(reason: impl Into<String>) -> Self {
        Self::Failure {
            reason: reason.into(),
        }
    }

    /// Whether the call succeeded.
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }

    /// The failure reason, if the call failed.
    pub fn reason(&self) -> Option<&str> {
        match self {
            Self::Success => None,
            Self::Failure { reason } => Some(reason.as_str()),
        }
    }
}

// ---------------------------------------------------------------------------
// SlotIndex / ItemDetail
// ---------------------------------------------------------------------------

/// Number of inventory slots on the agent.
pub const SLOT_COUNT: u8 = 16;

/// A zero-based inventory slot index, always below [`SLOT_COUNT`].
///
/// Deserialization goes through the checked constructor, so an out-of-range
/// index in a config file is a deserialization error, not a latent panic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct SlotIndex(u8);

impl SlotIndex {
    /// The first slot (index 0).
    pub const FIRST: Self = Self(0);

    /// Construct a slot index, or `None` if `index` is out of range.
    pub const fn new(index: u8) -> Option<Self> {
        if index < SLOT_COUNT {
            Some(Self(index))
        } else {
            None
        }
    }

    /// The raw zero-based index.
    pub const fn get(self) -> u8 {
        self.0
    }

    /// Iterate over all valid slot indices in order.
    pub fn all() -> impl Iterator<Item = Self> {
        (0..SLOT_COUNT).map(Self)
    }
}

impl TryFrom<u8> for SlotIndex {
    type Error = String;

    fn try_from(index: u8) -> Result<Self, Self::Error> {
        Self::new(index).ok_or_else(|| {
            format!("slot index {index} out of range (0..{SLOT_COUNT})")
        })
    }
}

impl From<SlotIndex> for u8 {
    fn from(slot: SlotIndex) -> Self {
        slot.0
    }
}

/// Contents of an inventory slot as reported by the capability surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemDetail {
    /// Item identifier string (e.g. `"minecraft:sapling"`).
    pub name: String,
    /// Stack size in the slot.
    pub count: u32,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
