//! telemetry/mod.rs
//! Pipeline telemetry: counters, stage timers, and an immutable snapshot.

pub mod counters;
pub mod timers;
pub mod snapshot;

pub use counters::*;
pub use timers::*;
pub use snapshot::*;
