//! Time authority
//!
//! Owns the [`WallClock`] and decides when to consult the authoritative
//! time source. Between syncs time advances from the local tick counter
//! alone; a failed sync leaves the running clock untouched.

use crate::config::TimeConfig;
use crate::traits::TimeSource;

use super::fields::TimeFields;
use super::wall_clock::WallClock;

/// Why no time can be shown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ClockError {
    /// No sync has ever succeeded; do not render time
    NeverSynced,
    /// Synced epoch cannot be shown as a calendar date
    OutOfRange,
}

/// Result of one sync attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SyncOutcome {
    /// Clock re-anchored at this local epoch
    Synced { epoch: i64, forced: bool },
    /// Source gave no answer; clock keeps extrapolating
    Failed { forced: bool },
}

impl SyncOutcome {
    pub const fn is_success(&self) -> bool {
        matches!(self, SyncOutcome::Synced { .. })
    }
}

/// When and how to sync
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SyncPolicy {
    /// Resync once this long has passed since the last success
    pub interval_ms: u64,
    /// Spacing between attempts after a failure
    pub retry_ms: u64,
    /// Local standard time offset from UTC
    pub tz_offset_s: i32,
    /// Daylight-saving offset (0 when disabled)
    pub dst_offset_s: i32,
}

impl From<&TimeConfig> for SyncPolicy {
    fn from(config: &TimeConfig) -> Self {
        Self {
            interval_ms: u64::from(config.sync_interval_ms),
            retry_ms: u64::from(config.sync_retry_ms),
            tz_offset_s: config.tz_offset_s(),
            dst_offset_s: config.effective_dst_offset_s(),
        }
    }
}

/// Current time as seen by a caller of [`TimeAuthority::current_time`]
#[derive(Debug)]
pub struct TimeReading<'a> {
    /// Sync attempted during this call, if any
    pub sync: Option<SyncOutcome>,
    /// Fields to display, or why there are none
    pub time: Result<&'a TimeFields, ClockError>,
}

/// Produces a continuously advancing, field-decomposed wall clock
#[derive(Debug, Clone)]
pub struct TimeAuthority {
    policy: SyncPolicy,
    clock: WallClock,
    /// Tick of the last successful sync
    last_sync_tick: Option<u64>,
    /// No attempt before this tick (set after failures)
    next_attempt_tick: u64,
    /// Resync requested regardless of the interval
    force_resync: bool,
    /// Whole seconds since the clock was anchored
    elapsed_seconds: u64,
    /// Cached fields for `fields.epoch`
    fields: Option<TimeFields>,
    /// Times the cached fields were rebuilt
    field_refreshes: u32,
    /// Consecutive failed attempts
    failures: u32,
}

impl TimeAuthority {
    /// Create an authority with an unsynced clock
    pub fn new(policy: SyncPolicy) -> Self {
        Self {
            policy,
            clock: WallClock::unsynced(),
            last_sync_tick: None,
            next_attempt_tick: 0,
            force_resync: false,
            elapsed_seconds: 0,
            fields: None,
            field_refreshes: 0,
            failures: 0,
        }
    }

    pub const fn policy(&self) -> &SyncPolicy {
        &self.policy
    }

    pub const fn wall_clock(&self) -> &WallClock {
        &self.clock
    }

    pub const fn is_synced(&self) -> bool {
        self.clock.is_valid()
    }

    /// Whole seconds accrued since the last successful sync
    pub const fn elapsed_seconds(&self) -> u64 {
        self.elapsed_seconds
    }

    pub const fn resync_pending(&self) -> bool {
        self.force_resync
    }

    pub const fn consecutive_failures(&self) -> u32 {
        self.failures
    }

    pub const fn field_refreshes(&self) -> u32 {
        self.field_refreshes
    }

    /// Ask for a sync on the next call regardless of the interval
    ///
    /// Stays pending until a sync succeeds; failed forced attempts are
    /// spaced by the retry interval like any other.
    pub fn request_resync(&mut self) {
        self.force_resync = true;
        self.next_attempt_tick = 0;
    }

    /// Whether a sync attempt should be made at `now_ms`
    pub fn sync_due(&self, now_ms: u64) -> bool {
        if now_ms < self.next_attempt_tick {
            return false;
        }
        if self.force_resync {
            return true;
        }
        match self.last_sync_tick {
            None => true,
            Some(last) => now_ms.saturating_sub(last) > self.policy.interval_ms,
        }
    }

    /// Attempt a sync if one is due
    pub fn refresh<S: TimeSource>(&mut self, now_ms: u64, source: &mut S) -> Option<SyncOutcome> {
        if !self.sync_due(now_ms) {
            return None;
        }

        let forced = self.force_resync;
        let outcome = match source.try_sync(self.policy.tz_offset_s, self.policy.dst_offset_s) {
            Some(epoch) => {
                // Anchor and tick move together; accrued seconds restart at 0
                self.clock = WallClock::synced(epoch, now_ms);
                self.last_sync_tick = Some(now_ms);
                self.elapsed_seconds = 0;
                self.force_resync = false;
                self.failures = 0;
                self.next_attempt_tick = 0;
                SyncOutcome::Synced { epoch, forced }
            }
            None => {
                self.failures = self.failures.saturating_add(1);
                self.next_attempt_tick = now_ms.saturating_add(self.policy.retry_ms);
                SyncOutcome::Failed { forced }
            }
        };
        Some(outcome)
    }

    /// Current time fields, syncing first if due
    pub fn current_time<S: TimeSource>(&mut self, now_ms: u64, source: &mut S) -> TimeReading<'_> {
        let sync = self.refresh(now_ms, source);
        TimeReading {
            sync,
            time: self.fields_at(now_ms),
        }
    }

    /// Current time fields without consulting the source
    pub fn fields_at(&mut self, now_ms: u64) -> Result<&TimeFields, ClockError> {
        let epoch = self.clock.epoch_at(now_ms).ok_or(ClockError::NeverSynced)?;
        self.elapsed_seconds = self.clock.elapsed_seconds(now_ms);

        let stale = self.fields.as_ref().map_or(true, |f| f.epoch != epoch);
        if stale {
            let fields = TimeFields::from_epoch(epoch).ok_or(ClockError::OutOfRange)?;
            self.fields = Some(fields);
            self.field_refreshes = self.field_refreshes.wrapping_add(1);
        }

        self.fields.as_ref().ok_or(ClockError::NeverSynced)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedTimeSource;

    const HOUR_MS: u64 = 3_600_000;

    fn policy() -> SyncPolicy {
        SyncPolicy {
            interval_ms: HOUR_MS,
            retry_ms: 1_000,
            tz_offset_s: 7_200,
            dst_offset_s: 0,
        }
    }

    #[test]
    fn test_never_synced_is_unsynced() {
        let mut authority = TimeAuthority::new(policy());
        let mut source = ScriptedTimeSource::failing();

        let reading = authority.current_time(0, &mut source);
        assert_eq!(reading.sync, Some(SyncOutcome::Failed { forced: false }));
        assert_eq!(reading.time.err(), Some(ClockError::NeverSynced));
        assert!(!authority.is_synced());
    }

    #[test]
    fn test_first_sync_anchors_clock() {
        let mut authority = TimeAuthority::new(policy());
        let mut source = ScriptedTimeSource::answering(1_689_428_709);

        let reading = authority.current_time(2_000, &mut source);
        assert!(reading.sync.unwrap().is_success());
        assert_eq!(reading.time.unwrap().clock_text().as_str(), "13:45");
        assert_eq!(authority.wall_clock().tick_at_last_sync(), 2_000);
        assert_eq!(source.last_offsets(), Some((7_200, 0)));
    }

    #[test]
    fn test_extrapolates_between_syncs() {
        let mut authority = TimeAuthority::new(policy());
        let mut source = ScriptedTimeSource::answering(1_000);
        authority.current_time(0, &mut source);

        let reading = authority.current_time(59_999, &mut source);
        assert_eq!(reading.sync, None);
        assert_eq!(reading.time.unwrap().epoch, 1_059);
        assert_eq!(authority.elapsed_seconds(), 59);
        assert_eq!(source.calls(), 1);
    }

    #[test]
    fn test_resyncs_after_interval() {
        let mut authority = TimeAuthority::new(policy());
        let mut source = ScriptedTimeSource::answering(1_000);
        authority.current_time(0, &mut source);

        assert!(!authority.sync_due(HOUR_MS));
        assert!(authority.sync_due(HOUR_MS + 1));

        source.set_answer(Some(5_000));
        let reading = authority.current_time(HOUR_MS + 1, &mut source);
        assert!(reading.sync.unwrap().is_success());
        assert_eq!(reading.time.unwrap().epoch, 5_000);
        assert_eq!(authority.elapsed_seconds(), 0);
    }

    #[test]
    fn test_failed_resync_keeps_anchor() {
        let mut authority = TimeAuthority::new(policy());
        let mut source = ScriptedTimeSource::answering(1_000);
        authority.current_time(0, &mut source);
        let before = *authority.wall_clock();

        source.set_answer(None);
        let now = HOUR_MS + 1;
        let reading = authority.current_time(now, &mut source);
        assert_eq!(reading.sync, Some(SyncOutcome::Failed { forced: false }));
        // Still extrapolating from the old anchor
        assert_eq!(reading.time.unwrap().epoch, 1_000 + (now / 1000) as i64);
        assert_eq!(*authority.wall_clock(), before);
        assert_eq!(authority.consecutive_failures(), 1);
    }

    #[test]
    fn test_failure_retried_after_retry_interval() {
        let mut authority = TimeAuthority::new(policy());
        let mut source = ScriptedTimeSource::failing();

        authority.current_time(0, &mut source);
        authority.current_time(500, &mut source);
        assert_eq!(source.calls(), 1);

        authority.current_time(1_000, &mut source);
        assert_eq!(source.calls(), 2);
    }

    #[test]
    fn test_forced_resync_resets_elapsed() {
        let mut authority = TimeAuthority::new(policy());
        let mut source = ScriptedTimeSource::answering(1_000);
        authority.current_time(0, &mut source);
        authority.current_time(30_000, &mut source);
        assert_eq!(authority.elapsed_seconds(), 30);

        // Reconnect after an outage: authoritative time already includes it
        authority.request_resync();
        source.set_answer(Some(1_030));
        let reading = authority.current_time(30_000, &mut source);
        assert_eq!(
            reading.sync,
            Some(SyncOutcome::Synced {
                epoch: 1_030,
                forced: true
            })
        );
        assert_eq!(reading.time.unwrap().epoch, 1_030);
        assert_eq!(authority.elapsed_seconds(), 0);
        assert!(!authority.resync_pending());
    }

    #[test]
    fn test_forced_resync_survives_failure() {
        let mut authority = TimeAuthority::new(policy());
        let mut source = ScriptedTimeSource::answering(1_000);
        authority.current_time(0, &mut source);

        authority.request_resync();
        source.set_answer(None);
        let reading = authority.current_time(10_000, &mut source);
        assert_eq!(reading.sync, Some(SyncOutcome::Failed { forced: true }));
        assert!(authority.resync_pending());
        assert!(!authority.sync_due(10_999));
        assert!(authority.sync_due(11_000));
    }

    #[test]
    fn test_fields_rebuilt_only_when_second_changes() {
        let mut authority = TimeAuthority::new(policy());
        let mut source = ScriptedTimeSource::answering(1_000);
        authority.current_time(0, &mut source);
        assert_eq!(authority.field_refreshes(), 1);

        for t in (0..1_000).step_by(16) {
            authority.current_time(t, &mut source).time.unwrap();
        }
        assert_eq!(authority.field_refreshes(), 1);

        authority.current_time(1_000, &mut source).time.unwrap();
        assert_eq!(authority.field_refreshes(), 2);
    }

    #[test]
    fn test_policy_from_config() {
        let mut config = TimeConfig::default();
        config.gmt_offset_hours = -5;
        config.dst_enabled = true;
        config.dst_offset_s = 3_600;
        let policy = SyncPolicy::from(&config);
        assert_eq!(policy.tz_offset_s, -18_000);
        assert_eq!(policy.dst_offset_s, 3_600);

        config.dst_enabled = false;
        assert_eq!(SyncPolicy::from(&config).dst_offset_s, 0);
    }
}
