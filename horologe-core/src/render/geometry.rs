//! Screen geometry

/// Pixel position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned rectangle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Rect {
    /// Top-left corner
    pub origin: Point,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            origin: Point::new(x, y),
            width,
            height,
        }
    }

    /// Rectangle of the given size anchored at (0, 0)
    ///
    /// Region drawing code uses this for "the whole region" in
    /// region-relative coordinates.
    pub const fn sized(width: u32, height: u32) -> Self {
        Self::new(0, 0, width, height)
    }

    /// Same size, origin moved to (0, 0)
    pub const fn local(&self) -> Self {
        Self::sized(self.width, self.height)
    }

    /// Centre point (rounded towards the origin)
    pub const fn center(&self) -> Point {
        Point::new(
            self.origin.x + (self.width / 2) as i32,
            self.origin.y + (self.height / 2) as i32,
        )
    }

    /// Exclusive right edge
    pub const fn right(&self) -> i32 {
        self.origin.x + self.width as i32
    }

    /// Exclusive bottom edge
    pub const fn bottom(&self) -> i32 {
        self.origin.y + self.height as i32
    }

    /// Whether a point lies inside
    pub const fn contains(&self, p: Point) -> bool {
        p.x >= self.origin.x && p.y >= self.origin.y && p.x < self.right() && p.y < self.bottom()
    }

    /// Whether two rectangles share at least one pixel
    pub const fn intersects(&self, other: &Rect) -> bool {
        self.origin.x < other.right()
            && other.origin.x < self.right()
            && self.origin.y < other.bottom()
            && other.origin.y < self.bottom()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_center_and_edges() {
        let r = Rect::new(231, 8, 80, 26);
        assert_eq!(r.center(), Point::new(271, 21));
        assert_eq!(r.right(), 311);
        assert_eq!(r.bottom(), 34);
        assert_eq!(r.local(), Rect::new(0, 0, 80, 26));
    }

    #[test]
    fn test_contains() {
        let r = Rect::new(10, 10, 5, 5);
        assert!(r.contains(Point::new(10, 10)));
        assert!(r.contains(Point::new(14, 14)));
        assert!(!r.contains(Point::new(15, 14)));
        assert!(!r.contains(Point::new(9, 12)));
    }

    #[test]
    fn test_intersects() {
        let a = Rect::new(0, 0, 10, 10);
        assert!(a.intersects(&Rect::new(9, 9, 5, 5)));
        assert!(!a.intersects(&Rect::new(10, 0, 5, 5)));
        assert!(!a.intersects(&Rect::new(0, 10, 5, 5)));
    }
}
