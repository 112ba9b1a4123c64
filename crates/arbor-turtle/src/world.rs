//! Simulated turtle: an in-memory voxel farm world.
//!
//! [`SimTurtle`] implements the full [`Turtle`] surface against a small
//! block map, with fuel accounting, a 16-slot inventory, dropped items, and
//! rand-driven tree growth. It exists so the whole plant/wait/harvest cycle
//! can run end-to-end without a physical agent: the engine binary drives it
//! in demo mode and the integration tests drive it for plot behavior.
//!
//! Solidity rule: saplings are non-solid (the agent passes through them);
//! soil, logs, and leaves block movement and must be dug.

use std::collections::BTreeMap;

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use arbor_types::{ItemDetail, MoveOutcome, PlotOrigin, Pose, Position, SlotIndex};

use crate::api::Turtle;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Item name for consumable fuel.
pub const ITEM_FUEL: &str = "arbor:fuel";

/// Item name for saplings.
pub const ITEM_SAPLING: &str = "arbor:sapling";

/// Item name for ground-fill soil.
pub const ITEM_SOIL: &str = "arbor:soil";

/// Item name for harvested logs.
pub const ITEM_LOG: &str = "arbor:log";

/// Fuel units gained per consumed fuel item.
pub const FUEL_PER_ITEM: u64 = 80;

/// Maximum stack size per inventory slot.
pub const STACK_LIMIT: u32 = 64;

/// Shortest trunk produced by tree growth.
const MIN_TRUNK_HEIGHT: i32 = 3;

/// Tallest trunk produced by tree growth.
const MAX_TRUNK_HEIGHT: i32 = 6;

// ---------------------------------------------------------------------------
// Block
// ---------------------------------------------------------------------------

/// A block occupying one cell of the simulated world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Block {
    /// Ground-fill soil; supports saplings.
    Soil,
    /// Tree trunk.
    Log,
    /// Tree canopy.
    Leaves,
    /// A planted sapling. Non-solid: the agent moves through it.
    Sapling,
}

impl Block {
    /// Whether the block obstructs movement.
    pub const fn is_solid(self) -> bool {
        !matches!(self, Self::Sapling)
    }

    /// The item yielded when the block is dug, if any.
    pub const fn drop_item(self) -> Option<&'static str> {
        match self {
            Self::Soil => Some(ITEM_SOIL),
            Self::Log => Some(ITEM_LOG),
            Self::Sapling => Some(ITEM_SAPLING),
            Self::Leaves => None,
        }
    }

    /// The block placed by an item with the given name, if placeable.
    fn from_item(name: &str) -> Option<Self> {
        match name {
            ITEM_SOIL => Some(Self::Soil),
            ITEM_SAPLING => Some(Self::Sapling),
            ITEM_LOG => Some(Self::Log),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// SimTurtle
// ---------------------------------------------------------------------------

/// An in-memory voxel world with the turtle inside it.
///
/// Holds the *true* pose, as opposed to the engine's believed pose; tests
/// compare the two to verify dead reckoning.
#[derive(Debug, Clone)]
pub struct SimTurtle {
    /// Blocks by cell coordinate. Absent cells are open air.
    blocks: BTreeMap<Position, Block>,
    /// Dropped item stacks lying on the ground, by cell.
    ground_items: BTreeMap<Position, ItemDetail>,
    /// The turtle's true pose.
    pose: Pose,
    /// Inventory slots; absent entries are empty.
    inventory: BTreeMap<SlotIndex, ItemDetail>,
    /// The slot targeted by place/drop/refuel/transfer calls.
    selected: Option<SlotIndex>,
    /// Current fuel in movement units.
    fuel: u64,
    /// Maximum fuel.
    fuel_limit: u64,
}

impl SimTurtle {
    /// An empty world with the turtle at the origin, facing North.
    pub const fn new(fuel: u64, fuel_limit: u64) -> Self {
        Self {
            blocks: BTreeMap::new(),
            ground_items: BTreeMap::new(),
            pose: Pose::ORIGIN,
            inventory: BTreeMap::new(),
            selected: None,
            fuel,
            fuel_limit,
        }
    }

    /// The turtle's true pose.
    pub const fn pose(&self) -> Pose {
        self.pose
    }

    /// The block at `cell`, if any.
    pub fn block_at(&self, cell: Position) -> Option<Block> {
        self.blocks.get(&cell).copied()
    }

    /// Put `block` at `cell`, replacing whatever was there.
    pub fn set_block(&mut self, cell: Position, block: Block) {
        self.blocks.insert(cell, block);
    }

    /// Put a dropped item stack at `cell` (replacing any stack there).
    pub fn set_ground_item(&mut self, cell: Position, name: &str, count: u32) {
        self.ground_items.insert(
            cell,
            ItemDetail {
                name: name.to_string(),
                count,
            },
        );
    }

    /// Fill `slot` with a stack, replacing its contents.
    pub fn stock_slot(&mut self, slot: SlotIndex, name: &str, count: u32) {
        self.inventory.insert(
            slot,
            ItemDetail {
                name: name.to_string(),
                count,
            },
        );
    }

    /// Grow every planted sapling into a tree.
    ///
    /// Each sapling becomes a trunk of 3 to 6 logs topped with leaves, and
    /// scatters one sapling drop onto a neighboring ground cell (this is
    /// what the post-harvest pickup sweep collects).
    pub fn grow_trees<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let saplings: Vec<Position> = self
            .blocks
            .iter()
            .filter(|&(_, block)| *block == Block::Sapling)
            .map(|(cell, _)| *cell)
            .collect();

        for base in saplings {
            let height = rng.random_range(MIN_TRUNK_HEIGHT..=MAX_TRUNK_HEIGHT);
            for level in 0..height {
                let cell = offset(base, 0, level, 0);
                self.blocks.insert(cell, Block::Log);
            }
            self.blocks.insert(offset(base, 0, height, 0), Block::Leaves);

            let neighbors = [(0, -1), (1, 0), (0, 1), (-1, 0)];
            let pick = rng.random_range(0..neighbors.len());
            if let Some(&(dx, dz)) = neighbors.get(pick) {
                let cell = offset(base, dx, 0, dz);
                self.drop_on_ground(cell, ITEM_SAPLING, 1);
            }
            debug!(x = base.x, z = base.z, height, "tree grown");
        }
    }

    /// Total count of `name` items across all inventory slots.
    pub fn total_of(&self, name: &str) -> u32 {
        self.inventory
            .values()
            .filter(|detail| detail.name == name)
            .fold(0, |acc, detail| acc.saturating_add(detail.count))
    }

    // --- internals ---

    /// Attempt to relocate the turtle to `target`.
    fn try_move(&mut self, target: Position) -> MoveOutcome {
        if self.blocks.get(&target).is_some_and(|b| b.is_solid()) {
            return MoveOutcome::failure("Movement obstructed");
        }
        if self.fuel == 0 {
            return MoveOutcome::failure("Out of fuel");
        }
        self.fuel = self.fuel.saturating_sub(1);
        self.pose.position = target;
        MoveOutcome::Success
    }

    /// Dig out the block at `cell`, banking its drop.
    fn try_dig(&mut self, cell: Position) -> MoveOutcome {
        match self.blocks.remove(&cell) {
            None => MoveOutcome::failure("Nothing to dig here"),
            Some(block) => {
                if let Some(item) = block.drop_item() {
                    self.bank_item(item, 1);
                }
                MoveOutcome::Success
            }
        }
    }

    /// Place one item from the selected slot into `cell`.
    fn try_place(&mut self, cell: Position) -> MoveOutcome {
        let Some(slot) = self.selected else {
            return MoveOutcome::failure("No items to place");
        };
        let Some(detail) = self.inventory.get(&slot).cloned() else {
            return MoveOutcome::failure("No items to place");
        };
        let Some(block) = Block::from_item(&detail.name) else {
            return MoveOutcome::failure("Cannot place item as a block");
        };
        if self.blocks.contains_key(&cell) {
            return MoveOutcome::failure("Cannot place block here");
        }
        // Saplings need solid support directly beneath them.
        if block == Block::Sapling {
            let support = offset(cell, 0, -1, 0);
            if !self.blocks.get(&support).is_some_and(|b| b.is_solid()) {
                return MoveOutcome::failure("Cannot place block here");
            }
        }
        self.take_from_slot(slot, 1);
        self.blocks.insert(cell, block);
        MoveOutcome::Success
    }

    /// Pick up the dropped stack at `cell` into the inventory.
    fn try_suck(&mut self, cell: Position) -> MoveOutcome {
        match self.ground_items.remove(&cell) {
            None => MoveOutcome::failure("No items to take"),
            Some(detail) => {
                self.bank_item(&detail.name, detail.count);
                MoveOutcome::Success
            }
        }
    }

    /// Add items to the first fitting slot (same-name stack with room,
    /// otherwise the first empty slot). Overflow is discarded.
    fn bank_item(&mut self, name: &str, count: u32) {
        for slot in SlotIndex::all() {
            if let Some(detail) = self.inventory.get_mut(&slot) {
                if detail.name == name && detail.count < STACK_LIMIT {
                    let room = STACK_LIMIT.saturating_sub(detail.count);
                    detail.count = detail.count.saturating_add(count.min(room));
                    return;
                }
            } else {
                self.inventory.insert(
                    slot,
                    ItemDetail {
                        name: name.to_string(),
                        count: count.min(STACK_LIMIT),
                    },
                );
                return;
            }
        }
        debug!(name, count, "inventory full, item discarded");
    }

    /// Remove up to `count` items from `slot`, returning how many came out.
    fn take_from_slot(&mut self, slot: SlotIndex, count: u32) -> u32 {
        let Some(detail) = self.inventory.get_mut(&slot) else {
            return 0;
        };
        let taken = detail.count.min(count);
        detail.count = detail.count.saturating_sub(taken);
        if detail.count == 0 {
            self.inventory.remove(&slot);
        }
        taken
    }

    /// Merge a dropped stack onto the ground at `cell`.
    fn drop_on_ground(&mut self, cell: Position, name: &str, count: u32) {
        if let Some(existing) = self.ground_items.get_mut(&cell) {
            if existing.name == name {
                existing.count = existing.count.saturating_add(count);
                return;
            }
        }
        self.ground_items.insert(
            cell,
            ItemDetail {
                name: name.to_string(),
                count,
            },
        );
    }

    /// The cell directly ahead on the current heading.
    fn ahead(&self) -> Position {
        let (dx, dz) = self.pose.heading.forward_delta();
        offset(self.pose.position, dx, 0, dz)
    }

    /// The cell directly behind on the current heading.
    fn behind(&self) -> Position {
        let (dx, dz) = self.pose.heading.forward_delta();
        offset(self.pose.position, dx.saturating_neg(), 0, dz.saturating_neg())
    }

    /// The cell directly above.
    fn above(&self) -> Position {
        offset(self.pose.position, 0, 1, 0)
    }

    /// The cell directly below.
    fn below(&self) -> Position {
        offset(self.pose.position, 0, -1, 0)
    }
}

/// Translate `cell` by the given deltas with saturating arithmetic.
const fn offset(cell: Position, dx: i32, dy: i32, dz: i32) -> Position {
    Position::new(
        cell.x.saturating_add(dx),
        cell.y.saturating_add(dy),
        cell.z.saturating_add(dz),
    )
}

impl Turtle for SimTurtle {
    fn forward(&mut self) -> MoveOutcome {
        let target = self.ahead();
        self.try_move(target)
    }

    fn back(&mut self) -> MoveOutcome {
        let target = self.behind();
        self.try_move(target)
    }

    fn up(&mut self) -> MoveOutcome {
        let target = self.above();
        self.try_move(target)
    }

    fn down(&mut self) -> MoveOutcome {
        let target = self.below();
        self.try_move(target)
    }

    fn turn_left(&mut self) -> MoveOutcome {
        self.pose.heading = self.pose.heading.counterclockwise();
        MoveOutcome::Success
    }

    fn turn_right(&mut self) -> MoveOutcome {
        self.pose.heading = self.pose.heading.clockwise();
        MoveOutcome::Success
    }

    fn dig(&mut self) -> MoveOutcome {
        let cell = self.ahead();
        self.try_dig(cell)
    }

    fn dig_up(&mut self) -> MoveOutcome {
        let cell = self.above();
        self.try_dig(cell)
    }

    fn dig_down(&mut self) -> MoveOutcome {
        let cell = self.below();
        self.try_dig(cell)
    }

    fn place_up(&mut self) -> MoveOutcome {
        let cell = self.above();
        self.try_place(cell)
    }

    fn place_down(&mut self) -> MoveOutcome {
        let cell = self.below();
        self.try_place(cell)
    }

    fn detect_up(&mut self) -> bool {
        let cell = self.above();
        self.blocks.contains_key(&cell)
    }

    fn suck(&mut self) -> MoveOutcome {
        let cell = self.ahead();
        self.try_suck(cell)
    }

    fn suck_up(&mut self) -> MoveOutcome {
        let cell = self.above();
        self.try_suck(cell)
    }

    fn suck_down(&mut self) -> MoveOutcome {
        let cell = self.below();
        self.try_suck(cell)
    }

    fn select(&mut self, slot: SlotIndex) -> MoveOutcome {
        self.selected = Some(slot);
        MoveOutcome::Success
    }

    fn item_detail(&mut self, slot: SlotIndex) -> Option<ItemDetail> {
        self.inventory.get(&slot).cloned()
    }

    fn item_count(&mut self, slot: SlotIndex) -> u32 {
        self.inventory.get(&slot).map_or(0, |detail| detail.count)
    }

    fn transfer_to(&mut self, slot: SlotIndex) -> MoveOutcome {
        let Some(source) = self.selected else {
            return MoveOutcome::failure("No slot selected");
        };
        if source == slot {
            return MoveOutcome::Success;
        }
        let Some(moving) = self.inventory.get(&source).cloned() else {
            return MoveOutcome::failure("No items to transfer");
        };
        match self.inventory.get_mut(&slot) {
            None => {
                self.inventory.remove(&source);
                self.inventory.insert(slot, moving);
                MoveOutcome::Success
            }
            Some(dest) if dest.name == moving.name && dest.count < STACK_LIMIT => {
                let room = STACK_LIMIT.saturating_sub(dest.count);
                let moved = moving.count.min(room);
                dest.count = dest.count.saturating_add(moved);
                self.take_from_slot(source, moved);
                MoveOutcome::Success
            }
            Some(_) => MoveOutcome::failure("Destination slot occupied"),
        }
    }

    fn drop_ahead(&mut self) -> MoveOutcome {
        let Some(slot) = self.selected else {
            return MoveOutcome::failure("No items to drop");
        };
        let Some(detail) = self.inventory.get(&slot).cloned() else {
            return MoveOutcome::failure("No items to drop");
        };
        let cell = self.ahead();
        self.take_from_slot(slot, detail.count);
        self.drop_on_ground(cell, &detail.name, detail.count);
        MoveOutcome::Success
    }

    fn fuel_level(&mut self) -> u64 {
        self.fuel
    }

    fn fuel_limit(&mut self) -> u64 {
        self.fuel_limit
    }

    fn refuel(&mut self, count: Option<u32>) -> MoveOutcome {
        let Some(slot) = self.selected else {
            return MoveOutcome::failure("Items not combustible");
        };
        let combustible = self
            .inventory
            .get(&slot)
            .is_some_and(|detail| detail.name == ITEM_FUEL);
        if !combustible {
            return MoveOutcome::failure("Items not combustible");
        }
        let wanted = count.unwrap_or(u32::MAX);
        let consumed = self.take_from_slot(slot, wanted);
        if consumed == 0 {
            return MoveOutcome::failure("Items not combustible");
        }
        let gained = u64::from(consumed).saturating_mul(FUEL_PER_ITEM);
        self.fuel = self.fuel.saturating_add(gained).min(self.fuel_limit);
        MoveOutcome::Success
    }
}

// ---------------------------------------------------------------------------
// Starting world
// ---------------------------------------------------------------------------

/// Build the default farm world: the turtle at the origin facing North,
/// soil beneath every plot cell, and a full stack of fuel, saplings, and
/// soil in the given slots. The slots must match the engine's slot role
/// configuration or planting will find its stock missing.
pub fn starting_farm_world(
    plots: &[PlotOrigin],
    fuel_slot: SlotIndex,
    sapling_slot: SlotIndex,
    fill_slot: SlotIndex,
) -> SimTurtle {
    let mut sim = SimTurtle::new(1_000, 20_000);

    for plot in plots {
        for (dx, dz) in [(0, 0), (0, 1), (1, 0), (1, 1)] {
            let cell = offset(plot.position(), dx, -1, dz);
            sim.set_block(cell, Block::Soil);
        }
    }

    let stock = [
        (fuel_slot, ITEM_FUEL),
        (sapling_slot, ITEM_SAPLING),
        (fill_slot, ITEM_SOIL),
    ];
    for (slot, name) in stock {
        sim.stock_slot(slot, name, 64);
    }
    sim
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use arbor_types::Heading;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    fn slot(index: u8) -> SlotIndex {
        SlotIndex::new(index).unwrap_or(SlotIndex::FIRST)
    }

    #[test]
    fn movement_is_blocked_by_solid_blocks() {
        let mut sim = SimTurtle::new(100, 100);
        sim.set_block(Position::new(0, 0, -1), Block::Log);
        let outcome = sim.forward();
        assert_eq!(outcome.reason(), Some("Movement obstructed"));
        assert_eq!(sim.pose().position, Position::new(0, 0, 0));
    }

    #[test]
    fn movement_passes_through_saplings() {
        let mut sim = SimTurtle::new(100, 100);
        sim.set_block(Position::new(0, 0, -1), Block::Sapling);
        assert!(sim.forward().is_success());
        assert_eq!(sim.pose().position, Position::new(0, 0, -1));
    }

    #[test]
    fn movement_consumes_fuel_and_stops_when_empty() {
        let mut sim = SimTurtle::new(1, 100);
        assert!(sim.up().is_success());
        assert_eq!(sim.fuel_level(), 0);
        assert_eq!(sim.down().reason(), Some("Out of fuel"));
    }

    #[test]
    fn turns_rotate_without_fuel() {
        let mut sim = SimTurtle::new(0, 100);
        assert!(sim.turn_right().is_success());
        assert_eq!(sim.pose().heading, Heading::East);
        assert!(sim.turn_left().is_success());
        assert_eq!(sim.pose().heading, Heading::North);
    }

    #[test]
    fn dig_banks_the_drop() {
        let mut sim = SimTurtle::new(100, 100);
        sim.set_block(Position::new(0, 1, 0), Block::Log);
        assert!(sim.dig_up().is_success());
        assert_eq!(sim.total_of(ITEM_LOG), 1);
        assert_eq!(sim.dig_up().reason(), Some("Nothing to dig here"));
    }

    #[test]
    fn leaves_drop_nothing() {
        let mut sim = SimTurtle::new(100, 100);
        sim.set_block(Position::new(0, 1, 0), Block::Leaves);
        assert!(sim.dig_up().is_success());
        assert_eq!(sim.total_of(ITEM_SAPLING), 0);
        assert_eq!(sim.total_of(ITEM_LOG), 0);
    }

    #[test]
    fn sapling_placement_needs_support() {
        let mut sim = SimTurtle::new(100, 100);
        sim.stock_slot(slot(1), ITEM_SAPLING, 4);
        assert!(sim.select(slot(1)).is_success());

        // No soil below the target cell: refused.
        assert!(sim.up().is_success());
        assert_eq!(sim.place_down().reason(), Some("Cannot place block here"));

        // With soil at y = -1, placing into y = 0 succeeds.
        sim.set_block(Position::new(0, -1, 0), Block::Soil);
        assert!(sim.place_down().is_success());
        assert_eq!(sim.block_at(Position::new(0, 0, 0)), Some(Block::Sapling));
        assert_eq!(sim.item_count(slot(1)), 3);
    }

    #[test]
    fn soil_placement_fills_the_cell_below() {
        let mut sim = SimTurtle::new(100, 100);
        sim.stock_slot(slot(2), ITEM_SOIL, 4);
        assert!(sim.select(slot(2)).is_success());
        assert!(sim.place_down().is_success());
        assert_eq!(sim.block_at(Position::new(0, -1, 0)), Some(Block::Soil));
    }

    #[test]
    fn grow_trees_replaces_saplings_with_trunks() {
        let mut sim = SimTurtle::new(100, 100);
        sim.set_block(Position::new(2, -1, 2), Block::Soil);
        sim.set_block(Position::new(2, 0, 2), Block::Sapling);
        let mut rng = StdRng::seed_from_u64(7);
        sim.grow_trees(&mut rng);

        assert_eq!(sim.block_at(Position::new(2, 0, 2)), Some(Block::Log));
        assert_eq!(sim.block_at(Position::new(2, 1, 2)), Some(Block::Log));
        assert_eq!(sim.block_at(Position::new(2, 2, 2)), Some(Block::Log));
    }

    #[test]
    fn refuel_consumes_fuel_items() {
        let mut sim = SimTurtle::new(0, 10_000);
        sim.stock_slot(slot(0), ITEM_FUEL, 10);
        assert!(sim.select(slot(0)).is_success());
        assert!(sim.refuel(Some(2)).is_success());
        assert_eq!(sim.fuel_level(), 2 * FUEL_PER_ITEM);
        assert_eq!(sim.item_count(slot(0)), 8);
    }

    #[test]
    fn refuel_rejects_non_fuel() {
        let mut sim = SimTurtle::new(0, 10_000);
        sim.stock_slot(slot(1), ITEM_SAPLING, 10);
        assert!(sim.select(slot(1)).is_success());
        assert_eq!(sim.refuel(None).reason(), Some("Items not combustible"));
    }

    #[test]
    fn suck_picks_up_ground_items() {
        let mut sim = SimTurtle::new(100, 100);
        sim.set_ground_item(Position::new(0, -1, 0), ITEM_SAPLING, 2);
        assert!(sim.suck_down().is_success());
        assert_eq!(sim.total_of(ITEM_SAPLING), 2);
        assert_eq!(sim.suck_down().reason(), Some("No items to take"));
    }

    #[test]
    fn starting_world_has_soil_under_plots() {
        let plots = [PlotOrigin::new(2, 2)];
        let sim = starting_farm_world(&plots, slot(0), slot(1), slot(2));
        assert_eq!(sim.block_at(Position::new(2, -1, 2)), Some(Block::Soil));
        assert_eq!(sim.block_at(Position::new(3, -1, 3)), Some(Block::Soil));
        assert_eq!(sim.block_at(Position::new(2, 0, 2)), None);
        assert_eq!(sim.total_of(ITEM_SAPLING), 64);
    }

    #[test]
    fn starting_world_stocks_the_assigned_slots() {
        // Remapped slot roles land the stock where the roles point, not
        // in slots 0 through 2.
        let plots = [PlotOrigin::new(2, 2)];
        let mut sim = starting_farm_world(&plots, slot(3), slot(7), slot(12));
        assert_eq!(sim.item_count(slot(0)), 0);
        assert_eq!(
            sim.item_detail(slot(3)).map(|d| d.name),
            Some(ITEM_FUEL.to_string())
        );
        assert_eq!(
            sim.item_detail(slot(7)).map(|d| d.name),
            Some(ITEM_SAPLING.to_string())
        );
        assert_eq!(
            sim.item_detail(slot(12)).map(|d| d.name),
            Some(ITEM_SOIL.to_string())
        );
    }

    #[test]
    fn block_serializes_by_variant_name() {
        let json = serde_json::to_string(&Block::Sapling);
        assert_eq!(json.unwrap_or_default(), "\"Sapling\"");
        let back: Result<Block, _> = serde_json::from_str("\"Soil\"");
        assert_eq!(back.ok(), Some(Block::Soil));
    }
}
