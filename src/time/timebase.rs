//! Process Timebase
//!
//! Provides monotonic timestamps anchored at the first use of the timebase.
//! Raw nanoseconds are stored; conversions happen lazily.

use std::sync::OnceLock;
use std::time::{Duration, Instant};

/// Global anchor, initialized once at startup
static ANCHOR: OnceLock<Instant> = OnceLock::new();

/// Monotonic timebase anchored at process start
#[derive(Debug, Clone, Copy)]
pub struct Timebase;

impl Timebase {
    /// Initialize the timebase. Call once at startup; later calls are no-ops.
    pub fn init() {
        ANCHOR.get_or_init(Instant::now);
    }

    /// Nanoseconds elapsed since the anchor.
    #[inline]
    pub fn now_nanos() -> u64 {
        let anchor = ANCHOR.get_or_init(Instant::now);
        anchor.elapsed().as_nanos() as u64
    }
}

/// A timestamp wrapper that stores nanoseconds since the timebase anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Timestamp(u64);

impl Timestamp {
    /// Create a timestamp from raw nanoseconds.
    #[inline]
    pub const fn from_nanos(nanos: u64) -> Self {
        Self(nanos)
    }

    /// Create a timestamp from milliseconds.
    #[inline]
    pub const fn from_millis(millis: u64) -> Self {
        Self(millis.saturating_mul(1_000_000))
    }

    /// Create a timestamp from fractional seconds. Negative input clamps to zero.
    #[inline]
    pub fn from_secs_f64(secs: f64) -> Self {
        Self((secs.max(0.0) * 1_000_000_000.0) as u64)
    }

    /// Capture current timestamp.
    #[inline]
    pub fn now() -> Self {
        Self(Timebase::now_nanos())
    }

    /// Get the raw nanosecond value.
    #[inline]
    pub const fn as_nanos(&self) -> u64 {
        self.0
    }

    /// Convert to milliseconds.
    #[inline]
    pub const fn as_millis(&self) -> u64 {
        self.0 / 1_000_000
    }

    /// Convert to seconds as f64.
    #[inline]
    pub fn as_secs_f64(&self) -> f64 {
        self.0 as f64 / 1_000_000_000.0
    }

    /// Time elapsed since an earlier timestamp. Saturates to zero if
    /// `earlier` is actually later.
    #[inline]
    pub fn duration_since(&self, earlier: Timestamp) -> Duration {
        Duration::from_nanos(self.0.saturating_sub(earlier.0))
    }

    /// Check if this timestamp is after another.
    #[inline]
    pub fn is_after(&self, other: Timestamp) -> bool {
        self.0 > other.0
    }
}

impl std::ops::Add<Duration> for Timestamp {
    type Output = Timestamp;

    fn add(self, rhs: Duration) -> Self::Output {
        Timestamp(self.0.saturating_add(rhs.as_nanos() as u64))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_now_is_monotonic() {
        Timebase::init();
        let t1 = Timestamp::now();
        let t2 = Timestamp::now();
        assert!(t2 >= t1);
    }

    #[test]
    fn test_from_millis_conversions() {
        let ts = Timestamp::from_millis(1500);
        assert_eq!(ts.as_nanos(), 1_500_000_000);
        assert_eq!(ts.as_millis(), 1500);
        assert!((ts.as_secs_f64() - 1.5).abs() < 1e-9);
    }

    #[test]
    fn test_from_secs_f64_clamps_negative() {
        assert_eq!(Timestamp::from_secs_f64(-3.0), Timestamp::from_nanos(0));
        assert_eq!(Timestamp::from_secs_f64(0.25).as_millis(), 250);
    }

    #[test]
    fn test_duration_since_saturates() {
        let early = Timestamp::from_millis(100);
        let late = Timestamp::from_millis(400);
        assert_eq!(late.duration_since(early), Duration::from_millis(300));
        assert_eq!(early.duration_since(late), Duration::ZERO);
    }

    #[test]
    fn test_add_duration() {
        let ts = Timestamp::from_millis(100) + Duration::from_millis(50);
        assert_eq!(ts.as_millis(), 150);
        assert!(ts.is_after(Timestamp::from_millis(100)));
    }
}
