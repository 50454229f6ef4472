//! Animation frame cursor

/// Index of the animation frame to draw
///
/// Advances once per tick and wraps to 0. It is deliberately not tied to
/// the one-second clock or FPS windows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AnimationCursor {
    frame: usize,
    frame_count: usize,
}

impl AnimationCursor {
    /// Create a cursor over `frame_count` frames (at least one)
    pub const fn new(frame_count: usize) -> Self {
        Self {
            frame: 0,
            frame_count: if frame_count == 0 { 1 } else { frame_count },
        }
    }

    /// Frame to draw this tick
    pub const fn current(&self) -> usize {
        self.frame
    }

    pub const fn frame_count(&self) -> usize {
        self.frame_count
    }

    /// Move to the next frame, wrapping at the end
    pub fn advance(&mut self) -> usize {
        self.frame = (self.frame + 1) % self.frame_count;
        self.frame
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wraps_to_zero() {
        let mut cursor = AnimationCursor::new(3);
        assert_eq!(cursor.current(), 0);
        assert_eq!(cursor.advance(), 1);
        assert_eq!(cursor.advance(), 2);
        assert_eq!(cursor.advance(), 0);
    }

    #[test]
    fn test_zero_frames_treated_as_one() {
        let mut cursor = AnimationCursor::new(0);
        assert_eq!(cursor.frame_count(), 1);
        assert_eq!(cursor.advance(), 0);
    }
}
