//! Fakes for every collaborator trait
//!
//! Deterministic stand-ins used by the unit and scenario tests. Time only
//! moves when a test advances the [`FakeClock`].

use core::cell::Cell;
use std::collections::VecDeque;
use std::string::{String, ToString};
use std::vec::Vec;

use crate::render::{Color, Point, Rect, RegionId};
use crate::traits::{
    Backlight, ButtonEvent, Clock, DisplayBackend, DisplayError, InputSource, LinkEvent,
    NetAddress, TextStyle, TimeSource, Transport,
};

/// Hand-advanced monotonic clock
#[derive(Debug, Default)]
pub struct FakeClock {
    now: Cell<u64>,
}

impl FakeClock {
    pub fn new(start_ms: u64) -> Self {
        Self {
            now: Cell::new(start_ms),
        }
    }

    pub fn advance(&self, ms: u64) {
        self.now.set(self.now.get() + ms);
    }

    pub fn set(&self, ms: u64) {
        assert!(ms >= self.now.get(), "clock must not go backwards");
        self.now.set(ms);
    }
}

impl Clock for FakeClock {
    fn now_ms(&self) -> u64 {
        self.now.get()
    }
}

/// Transport whose link comes and goes when the test says so
#[derive(Debug, Default)]
pub struct ScriptedTransport {
    events: VecDeque<LinkEvent>,
    address: Option<NetAddress>,
    link_up: bool,
    connect_requests: u32,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Association completes: link up, address assigned, event queued
    pub fn establish(&mut self, address: NetAddress) {
        self.link_up = true;
        self.address = Some(address);
        self.events.push_back(LinkEvent::Established(address));
    }

    /// Association drops: link down, address gone, event queued
    pub fn drop_link(&mut self) {
        self.link_up = false;
        self.address = None;
        self.events.push_back(LinkEvent::Lost);
    }

    pub fn set_address(&mut self, address: Option<NetAddress>) {
        self.address = address;
    }

    pub fn set_link_up(&mut self, up: bool) {
        self.link_up = up;
    }

    pub fn connect_requests(&self) -> u32 {
        self.connect_requests
    }

    pub fn pending_events(&self) -> usize {
        self.events.len()
    }
}

impl Transport for ScriptedTransport {
    fn request_connect(&mut self) {
        self.connect_requests += 1;
    }

    fn current_address(&self) -> Option<NetAddress> {
        self.address
    }

    fn is_link_up(&self) -> bool {
        self.link_up
    }

    fn poll_event(&mut self) -> Option<LinkEvent> {
        self.events.pop_front()
    }
}

/// Time source returning queued answers, then a fixed default
#[derive(Debug, Default)]
pub struct ScriptedTimeSource {
    queued: VecDeque<Option<i64>>,
    answer: Option<i64>,
    calls: u32,
    last_offsets: Option<(i32, i32)>,
}

impl ScriptedTimeSource {
    /// Source that never answers
    pub fn failing() -> Self {
        Self::default()
    }

    /// Source that always answers `epoch`
    pub fn answering(epoch: i64) -> Self {
        Self {
            answer: Some(epoch),
            ..Self::default()
        }
    }

    pub fn set_answer(&mut self, answer: Option<i64>) {
        self.answer = answer;
    }

    /// Answer for the next call only
    pub fn queue(&mut self, answer: Option<i64>) {
        self.queued.push_back(answer);
    }

    pub fn calls(&self) -> u32 {
        self.calls
    }

    pub fn last_offsets(&self) -> Option<(i32, i32)> {
        self.last_offsets
    }
}

impl TimeSource for ScriptedTimeSource {
    fn try_sync(&mut self, tz_offset_s: i32, dst_offset_s: i32) -> Option<i64> {
        self.calls += 1;
        self.last_offsets = Some((tz_offset_s, dst_offset_s));
        self.queued.pop_front().unwrap_or(self.answer)
    }
}

/// One recorded display call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DrawOp {
    Clear(RegionId),
    FillRect(RegionId, Rect),
    FillRoundRect(RegionId, Rect),
    DrawRoundRect(RegionId, Rect),
    Circle(RegionId, Color),
    Text(RegionId, String, Point),
    Animation(usize),
    Compose,
}

impl DrawOp {
    pub fn region(&self) -> Option<RegionId> {
        match self {
            DrawOp::Clear(r)
            | DrawOp::FillRect(r, _)
            | DrawOp::FillRoundRect(r, _)
            | DrawOp::DrawRoundRect(r, _)
            | DrawOp::Circle(r, _)
            | DrawOp::Text(r, _, _) => Some(*r),
            DrawOp::Animation(_) => Some(RegionId::Animation),
            DrawOp::Compose => None,
        }
    }
}

/// Display that records every call and can fail one region on demand
#[derive(Debug, Default)]
pub struct RecordingDisplay {
    ops: Vec<DrawOp>,
    failing: Option<RegionId>,
    composes: u32,
}

impl RecordingDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every call addressing `region` fail
    pub fn fail_region(&mut self, region: Option<RegionId>) {
        self.failing = region;
    }

    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    pub fn clear_ops(&mut self) {
        self.ops.clear();
    }

    pub fn composes(&self) -> u32 {
        self.composes
    }

    /// Strings drawn into `region`, in order
    pub fn texts(&self, region: RegionId) -> Vec<String> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Text(r, text, _) if *r == region => Some(text.clone()),
                _ => None,
            })
            .collect()
    }

    /// Distinct regions touched, in first-touch order
    pub fn regions_in_order(&self) -> Vec<RegionId> {
        let mut seen = Vec::new();
        for region in self.ops.iter().filter_map(DrawOp::region) {
            if !seen.contains(&region) {
                seen.push(region);
            }
        }
        seen
    }

    fn push(&mut self, op: DrawOp) -> Result<(), DisplayError> {
        if op.region().is_some() && op.region() == self.failing {
            return Err(DisplayError::Communication);
        }
        self.ops.push(op);
        Ok(())
    }
}

impl DisplayBackend for RecordingDisplay {
    fn clear_region(&mut self, region: RegionId) -> Result<(), DisplayError> {
        self.push(DrawOp::Clear(region))
    }

    fn fill_rect(&mut self, region: RegionId, area: Rect, _color: Color) -> Result<(), DisplayError> {
        self.push(DrawOp::FillRect(region, area))
    }

    fn fill_round_rect(
        &mut self,
        region: RegionId,
        area: Rect,
        _radius: u32,
        _color: Color,
    ) -> Result<(), DisplayError> {
        self.push(DrawOp::FillRoundRect(region, area))
    }

    fn draw_round_rect(
        &mut self,
        region: RegionId,
        area: Rect,
        _radius: u32,
        _color: Color,
    ) -> Result<(), DisplayError> {
        self.push(DrawOp::DrawRoundRect(region, area))
    }

    fn fill_circle(
        &mut self,
        region: RegionId,
        _center: Point,
        _radius: u32,
        fill: Color,
        _outline: Color,
    ) -> Result<(), DisplayError> {
        self.push(DrawOp::Circle(region, fill))
    }

    fn draw_text(
        &mut self,
        region: RegionId,
        text: &str,
        at: Point,
        _style: TextStyle,
    ) -> Result<(), DisplayError> {
        self.push(DrawOp::Text(region, text.to_string(), at))
    }

    fn draw_animation_frame(&mut self, frame: usize) -> Result<(), DisplayError> {
        self.push(DrawOp::Animation(frame))
    }

    fn compose(&mut self, _order: &[RegionId]) -> Result<(), DisplayError> {
        self.composes += 1;
        self.push(DrawOp::Compose)
    }
}

/// Buttons pressed by the test
#[derive(Debug, Default)]
pub struct QueuedInput {
    pending: VecDeque<ButtonEvent>,
}

impl QueuedInput {
    pub fn press(&mut self, event: ButtonEvent) {
        self.pending.push_back(event);
    }
}

impl InputSource for QueuedInput {
    fn poll(&mut self) -> Option<ButtonEvent> {
        self.pending.pop_front()
    }
}

/// Backlight that remembers every level it was given
#[derive(Debug, Default)]
pub struct RecordingBacklight {
    pub levels: Vec<u8>,
}

impl Backlight for RecordingBacklight {
    fn set_level(&mut self, level: u8) {
        self.levels.push(level);
    }
}
