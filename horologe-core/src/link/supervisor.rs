//! Connection supervisor
//!
//! Polled once per tick but only re-evaluates every `poll_interval_ms`.
//! Transport events bypass the cadence and are applied the moment they
//! are handed in.

use crate::config::LinkConfig;
use crate::traits::{LinkEvent, NetAddress, Transport};

use super::events::LinkInput;
use super::state::LinkState;

/// Bookkeeping for the attempt in flight
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ConnectionAttempt {
    /// Tick at which the current request was issued
    pub started_at: u64,
    /// Timeouts since the last success or loss
    pub count: u8,
}

/// One applied state change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Transition {
    pub from: LinkState,
    pub to: LinkState,
    pub input: LinkInput,
}

/// What the rest of the system must do after a supervisor step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LinkEffects {
    pub transition: Option<Transition>,
    /// Redraw every region on the next render
    pub force_redraw: bool,
    /// Resync time regardless of the sync interval
    pub force_resync: bool,
}

impl LinkEffects {
    pub const fn none() -> Self {
        Self {
            transition: None,
            force_redraw: false,
            force_resync: false,
        }
    }

    pub const fn is_empty(&self) -> bool {
        self.transition.is_none() && !self.force_redraw && !self.force_resync
    }
}

/// Value shown by the status region
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StatusView {
    pub state: LinkState,
    pub address: Option<NetAddress>,
}

/// Link supervisor
#[derive(Debug, Clone)]
pub struct LinkSupervisor {
    policy: LinkConfig,
    state: LinkState,
    attempt: Option<ConnectionAttempt>,
    /// Tick of the last evaluation (poll or applied event)
    last_poll: Option<u64>,
    failed_at: Option<u64>,
    address: Option<NetAddress>,
}

impl LinkSupervisor {
    /// Create a supervisor in `Disconnected`
    pub fn new(policy: LinkConfig) -> Self {
        Self {
            policy,
            state: LinkState::Disconnected,
            attempt: None,
            last_poll: None,
            failed_at: None,
            address: None,
        }
    }

    pub const fn state(&self) -> LinkState {
        self.state
    }

    pub const fn attempt(&self) -> Option<ConnectionAttempt> {
        self.attempt
    }

    pub const fn address(&self) -> Option<NetAddress> {
        self.address
    }

    pub const fn failed_at(&self) -> Option<u64> {
        self.failed_at
    }

    pub const fn policy(&self) -> &LinkConfig {
        &self.policy
    }

    /// What the status region should show
    pub const fn status(&self) -> StatusView {
        StatusView {
            state: self.state,
            address: self.address,
        }
    }

    /// Periodic evaluation, rate-limited to the poll interval
    pub fn poll<T: Transport>(&mut self, now_ms: u64, transport: &mut T) -> LinkEffects {
        if let Some(last) = self.last_poll {
            if now_ms.saturating_sub(last) < u64::from(self.policy.poll_interval_ms) {
                return LinkEffects::none();
            }
        }
        self.last_poll = Some(now_ms);

        match self.state {
            LinkState::Disconnected => {
                self.begin_attempt(now_ms, 0, transport);
                self.apply(LinkInput::Start)
            }
            LinkState::Connecting | LinkState::Reconnecting => self.check_attempt(now_ms, transport),
            LinkState::Failed => {
                let failed_at = self.failed_at.unwrap_or(now_ms);
                if now_ms.saturating_sub(failed_at) >= u64::from(self.policy.failure_cooldown_ms) {
                    self.failed_at = None;
                    self.apply(LinkInput::CooldownElapsed)
                } else {
                    LinkEffects::none()
                }
            }
            LinkState::Connected => {
                if !transport.is_link_up() {
                    return self.lose(now_ms, transport);
                }
                let mut effects = LinkEffects::none();
                let current = transport.current_address();
                if current.is_some() && current != self.address {
                    self.address = current;
                    effects.force_redraw = true;
                }
                effects
            }
        }
    }

    /// Apply a transport event immediately
    ///
    /// An applied event counts as an evaluation, so the next scheduled
    /// poll is pushed out by a full interval.
    pub fn handle_event<T: Transport>(
        &mut self,
        event: &LinkEvent,
        now_ms: u64,
        transport: &mut T,
    ) -> LinkEffects {
        let effects = match (self.state, event) {
            (state, LinkEvent::Established(address)) if state.is_attempting() => {
                self.establish(*address)
            }
            (LinkState::Connected, LinkEvent::Established(address)) => {
                let mut effects = LinkEffects::none();
                if self.address != Some(*address) {
                    self.address = Some(*address);
                    effects.force_redraw = true;
                }
                effects
            }
            (LinkState::Connected, LinkEvent::Lost) => self.lose(now_ms, transport),
            // No edge for this event from here; the timers handle it
            _ => return LinkEffects::none(),
        };
        self.last_poll = Some(now_ms);
        effects
    }

    fn check_attempt<T: Transport>(&mut self, now_ms: u64, transport: &mut T) -> LinkEffects {
        // Association may have completed without an event reaching us
        if transport.is_link_up() {
            if let Some(address) = transport.current_address() {
                return self.establish(address);
            }
        }

        let attempt = match self.attempt {
            Some(attempt) => attempt,
            None => {
                self.begin_attempt(now_ms, 0, transport);
                return LinkEffects::none();
            }
        };

        if now_ms.saturating_sub(attempt.started_at) < u64::from(self.policy.connect_timeout_ms) {
            return LinkEffects::none();
        }

        let count = attempt.count.saturating_add(1);
        if self.state == LinkState::Reconnecting && count >= self.policy.max_reconnect_attempts {
            self.attempt = None;
            self.failed_at = Some(now_ms);
            let mut effects = self.apply(LinkInput::AttemptsExhausted);
            effects.force_redraw = true;
            effects
        } else {
            self.begin_attempt(now_ms, count, transport);
            self.apply(LinkInput::Timeout)
        }
    }

    fn establish(&mut self, address: NetAddress) -> LinkEffects {
        self.attempt = None;
        self.address = Some(address);
        let mut effects = self.apply(LinkInput::Established);
        effects.force_redraw = true;
        effects.force_resync = true;
        effects
    }

    fn lose<T: Transport>(&mut self, now_ms: u64, transport: &mut T) -> LinkEffects {
        self.address = None;
        self.begin_attempt(now_ms, 0, transport);
        let mut effects = self.apply(LinkInput::Lost);
        effects.force_redraw = true;
        effects
    }

    fn begin_attempt<T: Transport>(&mut self, now_ms: u64, count: u8, transport: &mut T) {
        self.attempt = Some(ConnectionAttempt {
            started_at: now_ms,
            count,
        });
        transport.request_connect();
    }

    fn apply(&mut self, input: LinkInput) -> LinkEffects {
        let from = self.state;
        self.state = from.transition(input);
        LinkEffects {
            transition: Some(Transition {
                from,
                to: self.state,
                input,
            }),
            force_redraw: false,
            force_resync: false,
        }
    }
}
