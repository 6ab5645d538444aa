//! Wraparound-safe millisecond ticks.
//!
//! The tick counter is 29 bits wide and wraps every 2^29 ms (~6.2 days).
//! Two tick values are comparable as long as they are within 2^28 ticks
//! of each other; differences are computed modulo the period and
//! interpreted as signed deltas.

/// Counter period.
pub const TICKS_PERIOD: u32 = 1 << 29;

/// Largest representable tick value.
pub const TICKS_MAX: u32 = TICKS_PERIOD - 1;

const TICKS_HALFPERIOD: u32 = TICKS_PERIOD / 2;

/// A point on the wrapping millisecond counter.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Ticks(u32);

impl Ticks {
    /// Fold a monotonic millisecond count onto the 29-bit counter.
    pub const fn from_millis(ms: u64) -> Self {
        Self((ms & TICKS_MAX as u64) as u32)
    }

    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Add a delta, wrapping at the period.
    pub const fn wrapping_add(self, delta: u32) -> Self {
        Self(self.0.wrapping_add(delta) & TICKS_MAX)
    }

    /// Signed difference `self - earlier`.
    pub const fn diff(self, earlier: Ticks) -> i32 {
        let diff = self.0.wrapping_sub(earlier.0) & TICKS_MAX;
        (((diff + TICKS_HALFPERIOD) & TICKS_MAX) as i32) - TICKS_HALFPERIOD as i32
    }

    /// `true` iff `self` comes strictly before `other`.
    pub const fn less(self, other: Ticks) -> bool {
        self.diff(other) < 0
    }
}

/// Monotonic millisecond time source.
pub trait Clock {
    fn now_ms(&self) -> Ticks;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_millis_folds_onto_period() {
        assert_eq!(Ticks::from_millis(5).raw(), 5);
        assert_eq!(Ticks::from_millis(TICKS_PERIOD as u64 + 7).raw(), 7);
    }

    #[test]
    fn add_wraps_at_period() {
        let t = Ticks::from_millis(TICKS_MAX as u64);
        assert_eq!(t.wrapping_add(1).raw(), 0);
        assert_eq!(t.wrapping_add(1000).raw(), 999);
    }

    #[test]
    fn diff_is_signed() {
        let a = Ticks::from_millis(1000);
        let b = Ticks::from_millis(400);
        assert_eq!(a.diff(b), 600);
        assert_eq!(b.diff(a), -600);
        assert_eq!(a.diff(a), 0);
    }

    #[test]
    fn diff_across_wraparound() {
        let before = Ticks::from_millis(TICKS_MAX as u64 - 9);
        let after = before.wrapping_add(20);
        assert_eq!(after.raw(), 10);
        assert_eq!(after.diff(before), 20);
        assert_eq!(before.diff(after), -20);
        assert!(before.less(after));
        assert!(!after.less(before));
    }

    #[test]
    fn half_period_is_the_comparison_horizon() {
        let zero = Ticks::from_millis(0);
        let just_inside = zero.wrapping_add(TICKS_HALFPERIOD - 1);
        assert!(zero.less(just_inside));

        // Exactly half a period away reads as "behind".
        let half = zero.wrapping_add(TICKS_HALFPERIOD);
        assert_eq!(half.diff(zero), -(TICKS_HALFPERIOD as i32));
    }
}
