//! The [`Turtle`] trait: the agent's primitive action surface.
//!
//! Every method is a single atomic action with unspecified latency and a
//! possibility of failure. The caller treats these as black-box calls; the
//! only contract is the [`MoveOutcome`] shape (a reason string exists if
//! and only if the call failed). Implementations must not retry or recover
//! internally -- recovery policy belongs to the engine.

use arbor_types::{ItemDetail, MoveOutcome, SlotIndex};

/// The agent capability surface consumed by the farm engine.
///
/// One method per primitive. All methods take `&mut self` because even
/// queries may consume scripted responses in test implementations, and the
/// engine runs as one blocking thread of control.
pub trait Turtle {
    // --- Movement ---

    /// Move one cell along the current heading.
    fn forward(&mut self) -> MoveOutcome;

    /// Move one cell against the current heading, without turning.
    fn back(&mut self) -> MoveOutcome;

    /// Move one cell up.
    fn up(&mut self) -> MoveOutcome;

    /// Move one cell down.
    fn down(&mut self) -> MoveOutcome;

    /// Rotate a quarter-turn counterclockwise. Never blocked by terrain;
    /// a failure is logical and unrecoverable.
    fn turn_left(&mut self) -> MoveOutcome;

    /// Rotate a quarter-turn clockwise. Never blocked by terrain.
    fn turn_right(&mut self) -> MoveOutcome;

    // --- Digging ---

    /// Break the block directly ahead.
    fn dig(&mut self) -> MoveOutcome;

    /// Break the block directly above.
    fn dig_up(&mut self) -> MoveOutcome;

    /// Break the block directly below.
    fn dig_down(&mut self) -> MoveOutcome;

    // --- Placement ---

    /// Place one item from the selected slot into the cell directly above.
    fn place_up(&mut self) -> MoveOutcome;

    /// Place one item from the selected slot into the cell directly below.
    fn place_down(&mut self) -> MoveOutcome;

    // --- Detection ---

    /// Whether any block occupies the cell directly above. Boolean-only;
    /// detection carries no failure reason.
    fn detect_up(&mut self) -> bool;

    // --- Pickup ---

    /// Pick up a dropped item from the cell directly ahead.
    fn suck(&mut self) -> MoveOutcome;

    /// Pick up a dropped item from the cell directly above.
    fn suck_up(&mut self) -> MoveOutcome;

    /// Pick up a dropped item from the cell directly below.
    fn suck_down(&mut self) -> MoveOutcome;

    // --- Inventory ---

    /// Make `slot` the selected slot for subsequent place/drop/refuel calls.
    fn select(&mut self, slot: SlotIndex) -> MoveOutcome;

    /// Inspect the contents of `slot`, if any.
    fn item_detail(&mut self, slot: SlotIndex) -> Option<ItemDetail>;

    /// Number of items in `slot` (zero when empty).
    fn item_count(&mut self, slot: SlotIndex) -> u32;

    /// Move the selected slot's stack into `slot` (merging same-name stacks).
    fn transfer_to(&mut self, slot: SlotIndex) -> MoveOutcome;

    /// Drop the selected slot's stack into the cell directly ahead.
    fn drop_ahead(&mut self) -> MoveOutcome;

    // --- Fuel ---

    /// Current fuel level in movement units.
    fn fuel_level(&mut self) -> u64;

    /// Maximum fuel the agent can hold.
    fn fuel_limit(&mut self) -> u64;

    /// Consume up to `count` items from the selected slot as fuel
    /// (the whole stack when `count` is `None`).
    fn refuel(&mut self, count: Option<u32>) -> MoveOutcome;
}
