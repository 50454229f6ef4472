//! Authoritative time source

/// Authoritative wall-clock provider (SNTP or similar)
///
/// Consulted infrequently by the time authority. Implementations must
/// not block: if no answer is available yet they return `None` and the
/// authority retries later.
pub trait TimeSource {
    /// Attempt a synchronisation
    ///
    /// - `tz_offset_s`: offset of local standard time from UTC, in seconds
    /// - `dst_offset_s`: additional daylight-saving offset, 0 when unused
    ///
    /// Returns local epoch seconds (UTC epoch plus both offsets), or `None`
    /// on failure.
    fn try_sync(&mut self, tz_offset_s: i32, dst_offset_s: i32) -> Option<i64>;
}
