//! Navigation and task-execution engine for the Arbor tree farm.
//!
//! This crate is the only part of the system with actual logic: belief
//! tracking, sequencing, and failure recovery. It layers strictly
//! bottom-up, and data flows one way through the layers:
//!
//! 1. [`pose`] -- the dead-reckoning [`PoseTracker`], mutated only by
//!    successful primitives.
//! 2. [`guard`] -- [`guarded_move`], the single obstacle-clearing
//!    dig-and-retry wrapper; the only place raw primitive failures are
//!    handled.
//! 3. [`navigate`] -- axis-sequenced dead-reckoning path execution
//!    ([`move_to`], [`face`]).
//! 4. [`plot`] -- the plant and harvest task state machines over 2×2
//!    plots, both pose-restoring.
//! 5. [`farm`] -- the orchestrator: phases over the static plot list,
//!    plus the deposit/refuel glue.
//!
//! Fatal failures surface as [`FarmError`] and unwind to the top of the
//! run; recoverable failures are logged and skipped.
//!
//! [`PoseTracker`]: pose::PoseTracker
//! [`guarded_move`]: guard::guarded_move
//! [`move_to`]: navigate::move_to
//! [`face`]: navigate::face

pub mod config;
pub mod error;
pub mod farm;
pub mod guard;
pub mod navigate;
pub mod plot;
pub mod pose;

pub use config::{ConfigError, FarmConfig};
pub use error::FarmError;
pub use pose::PoseTracker;
