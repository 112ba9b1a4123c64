//! Shared type definitions for the Arbor tree-farm agent.
//!
//! This crate holds the data model used across the workspace: the cyclic
//! [`Heading`] compass, the closed [`MoveKind`] primitive set, the believed
//! [`Pose`], plot layout types, and the [`MoveOutcome`] result contract
//! every capability-surface call returns.
//!
//! # Modules
//!
//! - [`enums`] -- `Heading`, `MoveKind`, dig/place/suck directions, and
//!   inventory slot roles.
//! - [`structs`] -- `Position`, `Pose`, `PlotOrigin`, `MoveOutcome`,
//!   `SlotIndex`, and `ItemDetail`.

pub mod enums;
pub mod structs;

pub use enums::{DigDirection, Heading, MoveKind, PlaceDirection, SlotRole, SuckDirection};
pub use structs::{ItemDetail, MoveOutcome, PlotOrigin, Pose, Position, SlotIndex, SLOT_COUNT};
