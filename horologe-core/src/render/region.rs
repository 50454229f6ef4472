//! Render regions and dirty tracking

use super::geometry::Rect;

/// Independently redrawable screen areas
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RegionId {
    /// Animation frame (base layer, redrawn every tick)
    Animation,
    /// Title and timezone header
    Banner,
    /// "HH:MM"
    Clock,
    /// "DD Mon 'YY"
    Date,
    /// "SS"
    Seconds,
    /// "MON"
    Weekday,
    /// Connection dot and address/status text
    Status,
    /// Frames-per-second counter
    Fps,
}

/// Order in which layers are stacked onto the frame
///
/// Later regions overlay earlier ones at fixed coordinates, so changing
/// this order changes what is visible.
pub const COMPOSITION_ORDER: [RegionId; RegionId::COUNT] = [
    RegionId::Animation,
    RegionId::Banner,
    RegionId::Clock,
    RegionId::Date,
    RegionId::Seconds,
    RegionId::Weekday,
    RegionId::Status,
    RegionId::Fps,
];

impl RegionId {
    pub const COUNT: usize = 8;

    /// Stable index, equal to the position in [`COMPOSITION_ORDER`]
    pub const fn index(self) -> usize {
        match self {
            RegionId::Animation => 0,
            RegionId::Banner => 1,
            RegionId::Clock => 2,
            RegionId::Date => 3,
            RegionId::Seconds => 4,
            RegionId::Weekday => 5,
            RegionId::Status => 6,
            RegionId::Fps => 7,
        }
    }

    /// Whether this region shows time-derived content
    pub const fn shows_time(self) -> bool {
        matches!(
            self,
            RegionId::Clock | RegionId::Date | RegionId::Seconds | RegionId::Weekday
        )
    }
}

/// Small set of regions (bit per region)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RegionSet(u8);

impl RegionSet {
    pub const fn empty() -> Self {
        Self(0)
    }

    pub fn insert(&mut self, region: RegionId) {
        self.0 |= 1 << region.index();
    }

    pub const fn contains(&self, region: RegionId) -> bool {
        self.0 & (1 << region.index()) != 0
    }

    pub const fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Members in composition order
    pub fn iter(&self) -> impl Iterator<Item = RegionId> + '_ {
        COMPOSITION_ORDER
            .iter()
            .copied()
            .filter(move |r| self.contains(*r))
    }
}

/// Cached content of one region
///
/// The cached value is only replaced through [`RenderRegion::commit`],
/// which the render cache calls after the region was actually drawn.
/// A failed draw leaves the region dirty so it is retried next tick.
#[derive(Debug, Clone)]
pub struct RenderRegion<T> {
    id: RegionId,
    bounds: Rect,
    cached: Option<T>,
    dirty: bool,
}

impl<T: PartialEq + Clone> RenderRegion<T> {
    /// Create an empty region (nothing drawn yet)
    pub const fn new(id: RegionId, bounds: Rect) -> Self {
        Self {
            id,
            bounds,
            cached: None,
            dirty: false,
        }
    }

    pub const fn id(&self) -> RegionId {
        self.id
    }

    pub const fn bounds(&self) -> Rect {
        self.bounds
    }

    /// Content last drawn into this region
    pub fn cached(&self) -> Option<&T> {
        self.cached.as_ref()
    }

    pub const fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Compare freshly computed content against the cache
    ///
    /// Returns true if the region must be redrawn: the value differs,
    /// a full redraw was forced, or an earlier draw did not complete.
    pub fn mark(&mut self, value: &T, force: bool) -> bool {
        let changed = self.cached.as_ref() != Some(value);
        self.dirty |= changed || force;
        self.dirty
    }

    /// Record that `value` was drawn
    pub fn commit(&mut self, value: T) {
        self.cached = Some(value);
        self.dirty = false;
    }
}
