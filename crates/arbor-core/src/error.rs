//! Error types for the farm engine.
//!
//! Every variant here is *fatal*: it unwinds to the top-level run loop and
//! halts the process. Continuing after a move or placement the engine
//! cannot explain would corrupt the pose belief and desynchronize every
//! subsequent navigation. Recoverable conditions (optional placements,
//! optional digs, pickup misses) never become errors; they are logged as
//! warnings at the call site and skipped.

use arbor_types::{MoveKind, SlotRole};

/// Fatal errors raised by the farm engine.
#[derive(Debug, thiserror::Error)]
pub enum FarmError {
    /// A movement primitive stayed blocked after the single dig-and-retry.
    #[error("move {kind:?} blocked and unrecoverable: {reason}")]
    MoveBlocked {
        /// The move that could not be completed.
        kind: MoveKind,
        /// Reason reported by the capability surface.
        reason: String,
    },

    /// A turn primitive failed. Turns cannot be obstructed by terrain, so
    /// there is no recovery; a failed turn is a logical fault.
    #[error("turn {kind:?} failed: {reason}")]
    TurnFailed {
        /// The turn that failed.
        kind: MoveKind,
        /// Reason reported by the capability surface.
        reason: String,
    },

    /// A task precondition found too little of a required resource.
    #[error("insufficient {role:?}: need {required}, have {available}")]
    InsufficientResource {
        /// The logical slot role that is short.
        role: SlotRole,
        /// Units required before the task may start.
        required: u32,
        /// Units actually present.
        available: u32,
    },

    /// A mandatory placement failed. An optional placement is a warning;
    /// this variant is for placements whose absence malforms the plot.
    #[error("mandatory {role:?} placement failed: {reason}")]
    PlacementFailed {
        /// The logical slot role being placed.
        role: SlotRole,
        /// Reason reported by the capability surface.
        reason: String,
    },

    /// Selecting an inventory slot failed.
    #[error("could not select {role:?} slot: {reason}")]
    SlotUnavailable {
        /// The logical slot role being selected.
        role: SlotRole,
        /// Reason reported by the capability surface.
        reason: String,
    },

    /// Fuel fell below the threshold and the fuel slot could not raise it.
    #[error("out of fuel: level {level} below threshold {threshold} with no consumables left")]
    OutOfFuel {
        /// Fuel level at the time of the check.
        level: u64,
        /// Configured refuel threshold.
        threshold: u64,
    },
}
