//! Background Tasks Module
//!
//! Contains background tasks that run periodically for the lifetime of an engine.
//!
//! # Tasks
//! - Sweep: Removes expired cache entries at configured intervals

mod sweep;

pub use sweep::{spawn_sweep_task, Sweep, SweepHandle};
