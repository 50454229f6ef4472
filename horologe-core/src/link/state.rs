//! Link state machine definition

use super::events::LinkInput;

/// Wireless link states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LinkState {
    /// Idle; a new attempt starts on the next poll
    Disconnected,
    /// First attempt in progress
    Connecting,
    /// Associated with an address
    Connected,
    /// Retrying after a timeout or a lost link
    Reconnecting,
    /// Attempts exhausted; waiting out the cooldown
    Failed,
}

impl LinkState {
    /// Every state, for exhaustive checks
    pub const ALL: [LinkState; 5] = [
        LinkState::Disconnected,
        LinkState::Connecting,
        LinkState::Connected,
        LinkState::Reconnecting,
        LinkState::Failed,
    ];

    /// Check if an attempt is in flight
    pub fn is_attempting(&self) -> bool {
        matches!(self, LinkState::Connecting | LinkState::Reconnecting)
    }

    pub fn is_connected(&self) -> bool {
        matches!(self, LinkState::Connected)
    }

    /// Short upper-case label for the status line
    pub const fn label(&self) -> &'static str {
        match self {
            LinkState::Disconnected => "OFFLINE",
            LinkState::Connecting => "CONNECTING",
            LinkState::Connected => "CONNECTED",
            LinkState::Reconnecting => "RECONNECTING",
            LinkState::Failed => "FAILED",
        }
    }

    /// Process an input and return the next state
    ///
    /// Inputs that have no edge from the current state leave it unchanged.
    pub fn transition(self, input: LinkInput) -> Self {
        use LinkInput::*;
        use LinkState::*;

        match (self, input) {
            (Disconnected, Start) => Connecting,

            (Connecting, Established) => Connected,
            (Connecting, Timeout) => Reconnecting,

            (Reconnecting, Established) => Connected,
            (Reconnecting, Timeout) => Reconnecting,
            (Reconnecting, AttemptsExhausted) => Failed,

            (Connected, Lost) => Reconnecting,

            (Failed, CooldownElapsed) => Disconnected,

            _ => self,
        }
    }

    /// Check whether `self -> next` is one of the defined edges
    ///
    /// Staying in the same state always counts as allowed.
    pub fn can_reach(self, next: LinkState) -> bool {
        use LinkState::*;

        self == next
            || matches!(
                (self, next),
                (Disconnected, Connecting)
                    | (Connecting, Connected)
                    | (Connecting, Reconnecting)
                    | (Reconnecting, Connected)
                    | (Reconnecting, Failed)
                    | (Connected, Reconnecting)
                    | (Failed, Disconnected)
            )
    }
}
