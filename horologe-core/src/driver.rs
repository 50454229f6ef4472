//! Frame driver
//!
//! Sequences the link supervisor, the time authority and the render
//! cache once per loop iteration. Within a tick the order is fixed:
//! input, link events, link poll, time, render. Later steps read what
//! earlier steps produced.

use heapless::Vec;

use crate::config::ClockConfig;
use crate::input::Brightness;
use crate::link::{LinkEffects, LinkSupervisor, Transition};
use crate::render::{RenderCache, RenderInputs, RenderOutcome};
use crate::time::{ClockError, SyncOutcome, SyncPolicy, TimeAuthority};
use crate::traits::{Backlight, Clock, DisplayBackend, InputSource, TimeSource, Transport};

/// Transitions kept per tick; more are dropped from the report only
pub const MAX_TRANSITIONS_PER_TICK: usize = 4;

/// All mutable application state, one owner per field
#[derive(Debug, Clone)]
pub struct SystemState {
    pub link: LinkSupervisor,
    pub time: TimeAuthority,
    pub render: RenderCache,
    pub brightness: Brightness,
}

impl SystemState {
    pub fn new(config: &ClockConfig) -> Self {
        Self {
            link: LinkSupervisor::new(config.link),
            time: TimeAuthority::new(SyncPolicy::from(&config.time)),
            render: RenderCache::from_config(config),
            brightness: Brightness::from_config(&config.ui),
        }
    }
}

/// What happened during one tick
#[derive(Debug, Clone, Default)]
pub struct TickReport {
    pub now_ms: u64,
    /// Link state changes, in the order they were applied
    pub transitions: Vec<Transition, MAX_TRANSITIONS_PER_TICK>,
    /// Sync attempted this tick, if any
    pub sync: Option<SyncOutcome>,
    /// Why no time was shown, if none was
    pub clock_error: Option<ClockError>,
    pub render: RenderOutcome,
    /// New FPS value when a measurement window closed
    pub fps: Option<u32>,
    /// Animation frame drawn this tick
    pub animation_frame: usize,
    /// New backlight level if a button changed it
    pub brightness: Option<u8>,
}

impl TickReport {
    pub fn time_valid(&self) -> bool {
        self.clock_error.is_none()
    }
}

/// Owns the collaborators and runs one tick at a time
pub struct FrameDriver<C, T, S, D, I, B> {
    clock: C,
    transport: T,
    time_source: S,
    display: D,
    input: I,
    backlight: B,
    state: SystemState,
}

impl<C, T, S, D, I, B> FrameDriver<C, T, S, D, I, B>
where
    C: Clock,
    T: Transport,
    S: TimeSource,
    D: DisplayBackend,
    I: InputSource,
    B: Backlight,
{
    /// Create a driver and apply the initial backlight level
    pub fn new(
        config: &ClockConfig,
        clock: C,
        transport: T,
        time_source: S,
        display: D,
        input: I,
        mut backlight: B,
    ) -> Self {
        let state = SystemState::new(config);
        backlight.set_level(state.brightness.level());
        Self {
            clock,
            transport,
            time_source,
            display,
            input,
            backlight,
            state,
        }
    }

    pub fn state(&self) -> &SystemState {
        &self.state
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    pub fn time_source_mut(&mut self) -> &mut S {
        &mut self.time_source
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    pub fn display_mut(&mut self) -> &mut D {
        &mut self.display
    }

    pub fn input_mut(&mut self) -> &mut I {
        &mut self.input
    }

    pub fn backlight(&self) -> &B {
        &self.backlight
    }

    /// Run one iteration of the loop
    pub fn tick(&mut self) -> TickReport {
        let now = self.clock.now_ms();
        let mut report = TickReport {
            now_ms: now,
            ..TickReport::default()
        };

        // Buttons
        let mut changed = false;
        while let Some(event) = self.input.poll() {
            changed |= self.state.brightness.apply(event);
        }
        if changed {
            let level = self.state.brightness.level();
            self.backlight.set_level(level);
            report.brightness = Some(level);
        }

        // Link: queued events first, then the cadence-limited poll
        while let Some(event) = self.transport.poll_event() {
            let effects = self.state.link.handle_event(&event, now, &mut self.transport);
            apply_link_effects(&mut self.state, effects, &mut report);
        }
        let effects = self.state.link.poll(now, &mut self.transport);
        apply_link_effects(&mut self.state, effects, &mut report);

        // Time
        let reading = self.state.time.current_time(now, &mut self.time_source);
        report.sync = reading.sync;
        let time = match reading.time {
            Ok(fields) => Some(fields),
            Err(err) => {
                report.clock_error = Some(err);
                None
            }
        };

        // Render
        let inputs = RenderInputs {
            time,
            status: self.state.link.status(),
        };
        report.animation_frame = self.state.render.animation_frame();
        report.render = self.state.render.render(&inputs, &mut self.display);
        report.fps = self.state.render.end_frame(now);

        report
    }
}

fn apply_link_effects(state: &mut SystemState, effects: LinkEffects, report: &mut TickReport) {
    if let Some(transition) = effects.transition {
        let _ = report.transitions.push(transition);
    }
    if effects.force_resync {
        state.time.request_resync();
    }
    if effects.force_redraw {
        state.render.request_full_redraw();
    }
}
