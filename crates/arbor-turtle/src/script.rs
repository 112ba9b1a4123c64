//! Scripted turtle: canned outcomes plus call recording.
//!
//! [`ScriptedTurtle`] is the workspace's test double. Tests queue failure
//! outcomes for specific calls, run the engine, and then assert on the
//! exact sequence of recorded calls -- which is how the guarded-retry
//! bound, navigator idempotence, and ascent-cap properties are verified.
//!
//! Queries (`item_detail`, `item_count`, `detect_up`, fuel levels) are not
//! recorded; only actions are, so call-sequence assertions are not polluted
//! by read-only inspection.

use std::collections::{BTreeMap, VecDeque};

use arbor_types::{
    DigDirection, ItemDetail, MoveOutcome, PlaceDirection, SlotIndex, SuckDirection,
};

use crate::api::Turtle;

/// A recorded action call on the scripted turtle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Call {
    /// `forward()`.
    Forward,
    /// `back()`.
    Back,
    /// `up()`.
    Up,
    /// `down()`.
    Down,
    /// `turn_left()`.
    TurnLeft,
    /// `turn_right()`.
    TurnRight,
    /// One of the dig family.
    Dig(DigDirection),
    /// One of the place family.
    Place(PlaceDirection),
    /// One of the suck family.
    Suck(SuckDirection),
    /// `select(slot)`.
    Select(SlotIndex),
    /// `transfer_to(slot)`.
    TransferTo(SlotIndex),
    /// `drop_ahead()`.
    DropAhead,
    /// `refuel(..)`.
    Refuel,
}

/// A turtle whose every outcome is scripted by the test.
///
/// By default every action succeeds. Tests queue failures per call with
/// [`push_failure`](Self::push_failure); each queued outcome is consumed by
/// the next matching call, after which the call reverts to succeeding.
#[derive(Debug, Default)]
pub struct ScriptedTurtle {
    /// Every action call, in execution order.
    calls: Vec<Call>,
    /// Queued outcomes per call; consumed front-first.
    scripted: BTreeMap<Call, VecDeque<MoveOutcome>>,
    /// Queued `detect_up` responses; consumed front-first.
    detect_up_queue: VecDeque<bool>,
    /// Response when the `detect_up` queue is empty.
    detect_up_default: bool,
    /// Slot contents reported by `item_detail` / `item_count`.
    slots: BTreeMap<SlotIndex, ItemDetail>,
    /// Reported fuel level.
    fuel: u64,
    /// Reported fuel limit.
    fuel_limit: u64,
}

impl ScriptedTurtle {
    /// A scripted turtle with no queued failures and ample fuel.
    pub fn new() -> Self {
        Self {
            fuel: 10_000,
            fuel_limit: 20_000,
            ..Self::default()
        }
    }

    /// Queue one failure outcome for the next matching `call`.
    pub fn push_failure(&mut self, call: Call, reason: &str) {
        self.scripted
            .entry(call)
            .or_default()
            .push_back(MoveOutcome::failure(reason));
    }

    /// Queue `n` consecutive failure outcomes for `call`.
    pub fn push_failures(&mut self, call: Call, n: usize, reason: &str) {
        for _ in 0..n {
            self.push_failure(call, reason);
        }
    }

    /// Queue one `detect_up` response.
    pub fn push_detect_up(&mut self, detected: bool) {
        self.detect_up_queue.push_back(detected);
    }

    /// Set the `detect_up` response used once the queue is exhausted.
    pub const fn set_detect_up_default(&mut self, detected: bool) {
        self.detect_up_default = detected;
    }

    /// Set the reported contents of `slot`.
    pub fn set_slot(&mut self, slot: SlotIndex, name: &str, count: u32) {
        self.slots.insert(
            slot,
            ItemDetail {
                name: name.to_string(),
                count,
            },
        );
    }

    /// Set the reported fuel level.
    pub const fn set_fuel(&mut self, level: u64) {
        self.fuel = level;
    }

    /// All recorded action calls, in order.
    pub fn calls(&self) -> &[Call] {
        &self.calls
    }

    /// Number of recorded calls equal to `call`.
    pub fn count_of(&self, call: Call) -> usize {
        self.calls.iter().filter(|&&c| c == call).count()
    }

    /// Record `call` and resolve its outcome from the script.
    fn perform(&mut self, call: Call) -> MoveOutcome {
        self.calls.push(call);
        self.scripted
            .get_mut(&call)
            .and_then(VecDeque::pop_front)
            .unwrap_or(MoveOutcome::Success)
    }
}

impl Turtle for ScriptedTurtle {
    fn forward(&mut self) -> MoveOutcome {
        self.perform(Call::Forward)
    }

    fn back(&mut self) -> MoveOutcome {
        self.perform(Call::Back)
    }

    fn up(&mut self) -> MoveOutcome {
        self.perform(Call::Up)
    }

    fn down(&mut self) -> MoveOutcome {
        self.perform(Call::Down)
    }

    fn turn_left(&mut self) -> MoveOutcome {
        self.perform(Call::TurnLeft)
    }

    fn turn_right(&mut self) -> MoveOutcome {
        self.perform(Call::TurnRight)
    }

    fn dig(&mut self) -> MoveOutcome {
        self.perform(Call::Dig(DigDirection::Ahead))
    }

    fn dig_up(&mut self) -> MoveOutcome {
        self.perform(Call::Dig(DigDirection::Up))
    }

    fn dig_down(&mut self) -> MoveOutcome {
        self.perform(Call::Dig(DigDirection::Down))
    }

    fn place_up(&mut self) -> MoveOutcome {
        self.perform(Call::Place(PlaceDirection::Up))
    }

    fn place_down(&mut self) -> MoveOutcome {
        self.perform(Call::Place(PlaceDirection::Down))
    }

    fn detect_up(&mut self) -> bool {
        self.detect_up_queue
            .pop_front()
            .unwrap_or(self.detect_up_default)
    }

    fn suck(&mut self) -> MoveOutcome {
        self.perform(Call::Suck(SuckDirection::Ahead))
    }

    fn suck_up(&mut self) -> MoveOutcome {
        self.perform(Call::Suck(SuckDirection::Up))
    }

    fn suck_down(&mut self) -> MoveOutcome {
        self.perform(Call::Suck(SuckDirection::Down))
    }

    fn select(&mut self, slot: SlotIndex) -> MoveOutcome {
        self.perform(Call::Select(slot))
    }

    fn item_detail(&mut self, slot: SlotIndex) -> Option<ItemDetail> {
        self.slots.get(&slot).cloned()
    }

    fn item_count(&mut self, slot: SlotIndex) -> u32 {
        self.slots.get(&slot).map_or(0, |detail| detail.count)
    }

    fn transfer_to(&mut self, slot: SlotIndex) -> MoveOutcome {
        self.perform(Call::TransferTo(slot))
    }

    fn drop_ahead(&mut self) -> MoveOutcome {
        self.perform(Call::DropAhead)
    }

    fn fuel_level(&mut self) -> u64 {
        self.fuel
    }

    fn fuel_limit(&mut self) -> u64 {
        self.fuel_limit
    }

    fn refuel(&mut self, _count: Option<u32>) -> MoveOutcome {
        self.perform(Call::Refuel)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_success() {
        let mut turtle = ScriptedTurtle::new();
        assert!(turtle.forward().is_success());
        assert!(turtle.dig_down().is_success());
        assert_eq!(
            turtle.calls(),
            &[Call::Forward, Call::Dig(DigDirection::Down)]
        );
    }

    #[test]
    fn queued_failures_are_consumed_in_order() {
        let mut turtle = ScriptedTurtle::new();
        turtle.push_failure(Call::Forward, "Movement obstructed");
        assert_eq!(turtle.forward().reason(), Some("Movement obstructed"));
        assert!(turtle.forward().is_success());
    }

    #[test]
    fn detect_up_queue_then_default() {
        let mut turtle = ScriptedTurtle::new();
        turtle.push_detect_up(true);
        turtle.push_detect_up(true);
        assert!(turtle.detect_up());
        assert!(turtle.detect_up());
        assert!(!turtle.detect_up());
    }

    #[test]
    fn slot_contents_are_reported() {
        let mut turtle = ScriptedTurtle::new();
        let slot = SlotIndex::new(1);
        assert!(slot.is_some());
        if let Some(slot) = slot {
            turtle.set_slot(slot, "arbor:sapling", 12);
            assert_eq!(turtle.item_count(slot), 12);
            let detail = turtle.item_detail(slot);
            assert_eq!(detail.map(|d| d.name), Some("arbor:sapling".to_string()));
        }
    }
}
