//! Monotonic timing module
//!
//! Timestamps are nanoseconds since a process-wide anchor instant, so they
//! can be built from wall-clock-free sources (replay files, tests) and still
//! be compared against live `Timestamp::now()` readings.

pub mod timebase;

pub use timebase::{Timebase, Timestamp};
