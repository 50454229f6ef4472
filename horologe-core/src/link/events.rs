//! Inputs that drive link state transitions

use crate::traits::LinkEvent;

/// Everything that can move the link state machine
///
/// Transport events map onto `Established`/`Lost`; the rest are produced
/// by the supervisor's own timers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LinkInput {
    /// Supervisor is idle and starts a fresh attempt
    Start,
    /// Transport reports association with an address
    Established,
    /// Transport reports the association dropped
    Lost,
    /// Attempt ran past the connect timeout, retries remain
    Timeout,
    /// Attempt ran past the connect timeout, no retries left
    AttemptsExhausted,
    /// Failure cooldown has elapsed
    CooldownElapsed,
}

impl From<&LinkEvent> for LinkInput {
    fn from(event: &LinkEvent) -> Self {
        match event {
            LinkEvent::Established(_) => LinkInput::Established,
            LinkEvent::Lost => LinkInput::Lost,
        }
    }
}
