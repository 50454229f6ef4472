//! Wall-clock time
//!
//! Infrequent authoritative syncs anchor a wall clock that advances
//! from the local tick counter in between.

pub mod authority;
pub mod fields;
pub mod wall_clock;

pub use authority::{ClockError, SyncOutcome, SyncPolicy, TimeAuthority, TimeReading};
pub use fields::TimeFields;
pub use wall_clock::WallClock;
