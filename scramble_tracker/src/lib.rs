#![warn(clippy::pedantic)]
#![allow(clippy::missing_panics_doc, clippy::module_name_repetitions)]

pub mod config;
pub mod session;
pub mod tracker;

pub use config::{ConfigError, TrackerConfig};
pub use session::{SolveRecord, SolveSession};
pub use tracker::{
    MoveStatus, RecoveryStack, ScrambleMoveState, ScrambleTracker, ScrambleTrackerState,
    TrackerEvent, TrackerStatus,
};
