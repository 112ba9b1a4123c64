//! Turtle capability surface for the Arbor tree-farm agent.
//!
//! The engine never talks to the real world directly; it drives the
//! [`Turtle`] trait, a blocking request/response surface of per-direction
//! primitives, each returning a [`MoveOutcome`](arbor_types::MoveOutcome)
//! (success, or failure plus a human-readable reason). The trait abstracts
//! the mechanism -- it could be a wire bridge to a physical agent, the
//! in-memory [`SimTurtle`] voxel world, or the [`ScriptedTurtle`] test
//! double.
//!
//! # Modules
//!
//! - [`api`] -- the [`Turtle`] trait.
//! - [`script`] -- [`ScriptedTurtle`], canned outcomes plus call recording.
//! - [`world`] -- [`SimTurtle`], an in-memory voxel farm with tree growth.

pub mod api;
pub mod script;
pub mod world;

pub use api::Turtle;
pub use script::{Call, ScriptedTurtle};
pub use world::{starting_farm_world, Block, SimTurtle};
