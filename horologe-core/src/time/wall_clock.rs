//! Extrapolated wall clock

/// Wall clock anchored at the last successful sync
///
/// The current epoch is the synced epoch plus the whole seconds elapsed
/// on the local tick counter since the sync. Both anchor fields are
/// always replaced together; a failed sync never touches them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct WallClock {
    epoch_at_last_sync: i64,
    tick_at_last_sync: u64,
    valid: bool,
}

impl Default for WallClock {
    fn default() -> Self {
        Self::unsynced()
    }
}

impl WallClock {
    /// Clock that has never been synced
    pub const fn unsynced() -> Self {
        Self {
            epoch_at_last_sync: 0,
            tick_at_last_sync: 0,
            valid: false,
        }
    }

    /// Clock anchored at `epoch` as of local tick `tick_ms`
    pub const fn synced(epoch: i64, tick_ms: u64) -> Self {
        Self {
            epoch_at_last_sync: epoch,
            tick_at_last_sync: tick_ms,
            valid: true,
        }
    }

    pub const fn is_valid(&self) -> bool {
        self.valid
    }

    pub const fn epoch_at_last_sync(&self) -> i64 {
        self.epoch_at_last_sync
    }

    pub const fn tick_at_last_sync(&self) -> u64 {
        self.tick_at_last_sync
    }

    /// Whole seconds elapsed since the anchor
    ///
    /// Counts 1000 ms boundaries crossed on the tick counter, so it is
    /// independent of how often it is asked.
    pub const fn elapsed_seconds(&self, now_ms: u64) -> u64 {
        now_ms.saturating_sub(self.tick_at_last_sync) / 1000
    }

    /// Current local epoch seconds, or `None` before the first sync
    pub const fn epoch_at(&self, now_ms: u64) -> Option<i64> {
        if !self.valid {
            return None;
        }
        Some(
            self.epoch_at_last_sync
                .saturating_add(self.elapsed_seconds(now_ms) as i64),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_unsynced_has_no_epoch() {
        let clock = WallClock::unsynced();
        assert!(!clock.is_valid());
        assert_eq!(clock.epoch_at(123_456), None);
    }

    #[test]
    fn test_counts_whole_seconds() {
        let clock = WallClock::synced(1_000, 500);
        assert_eq!(clock.epoch_at(500), Some(1_000));
        assert_eq!(clock.epoch_at(1_499), Some(1_000));
        assert_eq!(clock.epoch_at(1_500), Some(1_001));
        assert_eq!(clock.epoch_at(61_500), Some(1_061));
    }

    #[test]
    fn test_tick_before_anchor_saturates() {
        let clock = WallClock::synced(1_000, 5_000);
        assert_eq!(clock.epoch_at(0), Some(1_000));
    }

    proptest! {
        #[test]
        fn prop_advances_by_elapsed_seconds(
            epoch in 0i64..4_000_000_000,
            anchor in 0u64..1_000_000_000,
            first in 0u64..1_000_000,
            delta_s in 0u64..1_000_000,
        ) {
            let clock = WallClock::synced(epoch, anchor);
            // Reads taken on the same sub-second phase differ by exactly delta
            let t1 = anchor + first * 1000;
            let t2 = t1 + delta_s * 1000;
            let e1 = clock.epoch_at(t1).unwrap();
            let e2 = clock.epoch_at(t2).unwrap();
            prop_assert_eq!(e2, e1 + delta_s as i64);
        }

        #[test]
        fn prop_monotonic_between_syncs(
            epoch in 0i64..4_000_000_000,
            anchor in 0u64..1_000_000_000,
            a in 0u64..10_000_000,
            b in 0u64..10_000_000,
        ) {
            let clock = WallClock::synced(epoch, anchor);
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(clock.epoch_at(anchor + lo).unwrap() <= clock.epoch_at(anchor + hi).unwrap());
        }
    }
}
