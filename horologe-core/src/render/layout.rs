//! Screen layout for the 320x170 landscape panel

use super::geometry::Rect;
use super::region::RegionId;

/// Panel width in pixels
pub const SCREEN_WIDTH: u32 = 320;

/// Panel height in pixels
pub const SCREEN_HEIGHT: u32 = 170;

/// Left edge of the right-hand clock column
const CLOCK_X: i32 = 231;

/// Top edge of the right-hand clock column
const CLOCK_Y: i32 = 8;

/// Fixed screen position of every region
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Layout {
    bounds: [Rect; RegionId::COUNT],
}

impl Default for Layout {
    fn default() -> Self {
        Self::landscape()
    }
}

impl Layout {
    /// Animation on the left, clock column on the right
    pub const fn landscape() -> Self {
        Self {
            bounds: [
                // Animation
                Rect::new(0, 0, 226, SCREEN_HEIGHT),
                // Banner
                Rect::new(CLOCK_X - 224, CLOCK_Y, 218, 26),
                // Clock
                Rect::new(CLOCK_X, CLOCK_Y, 80, 26),
                // Date
                Rect::new(CLOCK_X, CLOCK_Y + 70, 80, 16),
                // Seconds
                Rect::new(CLOCK_X + 4, CLOCK_Y + 26, 76, 40),
                // Weekday
                Rect::new(CLOCK_X, CLOCK_Y + 92, 80, 34),
                // Status
                Rect::new(CLOCK_X - 10, CLOCK_Y + 130, 99, 32),
                // Fps
                Rect::new(5, 145, 50, 20),
            ],
        }
    }

    /// Build a layout from explicit bounds, indexed by [`RegionId::index`]
    pub const fn from_bounds(bounds: [Rect; RegionId::COUNT]) -> Self {
        Self { bounds }
    }

    /// Screen rectangle of a region
    pub const fn bounds(&self, region: RegionId) -> Rect {
        self.bounds[region.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::region::COMPOSITION_ORDER;

    #[test]
    fn test_landscape_fits_panel() {
        let layout = Layout::landscape();
        for region in COMPOSITION_ORDER {
            let r = layout.bounds(region);
            assert!(r.origin.x >= 0 && r.origin.y >= 0, "{:?}", region);
            assert!(r.right() <= SCREEN_WIDTH as i32, "{:?}", region);
            assert!(r.bottom() <= SCREEN_HEIGHT as i32, "{:?}", region);
        }
    }

    #[test]
    fn test_clock_column_regions_do_not_overlap() {
        let layout = Layout::landscape();
        let column = [
            RegionId::Clock,
            RegionId::Seconds,
            RegionId::Date,
            RegionId::Weekday,
            RegionId::Status,
        ];
        for (i, a) in column.iter().enumerate() {
            for b in &column[i + 1..] {
                assert!(
                    !layout.bounds(*a).intersects(&layout.bounds(*b)),
                    "{:?} overlaps {:?}",
                    a,
                    b
                );
            }
        }
    }
}
