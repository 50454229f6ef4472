//! Monotonic tick source

/// Monotonic millisecond counter
///
/// Every timer in the core is an elapsed-time comparison against this
/// counter. It must never go backwards. Implementations on hardware wrap
/// the executor's uptime; tests use a hand-advanced fake.
pub trait Clock {
    /// Milliseconds since an arbitrary fixed origin (usually boot)
    fn now_ms(&self) -> u64;
}
