//! Colours and the link-status palette

use crate::link::LinkState;

/// Raw RGB565 colour value as the panel expects it
///
/// No channel order is assumed here. Some panels are wired BGR, which
/// swaps what a literal value looks like on glass; that is why the
/// status colours live in configuration rather than in code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Color(pub u16);

impl Color {
    pub const BLACK: Color = Color(0x0000);
    pub const WHITE: Color = Color(0xFFFF);
    pub const RED: Color = Color(0xF800);
    pub const GREEN: Color = Color(0x07E0);
    pub const BLUE: Color = Color(0x001F);
    pub const YELLOW: Color = Color(0xFFE0);
    pub const GREY: Color = Color(0x8410);
    /// Clock digit colour
    pub const PURPLE: Color = Color(0x604D);

    /// Raw 16-bit value
    pub const fn raw(self) -> u16 {
        self.0
    }

    /// Split into 5/6/5-bit channels (first, middle, last)
    pub const fn channels(self) -> (u8, u8, u8) {
        (
            ((self.0 >> 11) & 0x1F) as u8,
            ((self.0 >> 5) & 0x3F) as u8,
            (self.0 & 0x1F) as u8,
        )
    }
}

/// Semantic colours for the connection indicator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Palette {
    pub connected: Color,
    /// Used for both first attempts and retries
    pub connecting: Color,
    pub failed: Color,
    pub offline: Color,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            connected: Color::GREEN,
            connecting: Color::YELLOW,
            failed: Color::RED,
            offline: Color::GREY,
        }
    }
}

impl Palette {
    /// Indicator colour for a link state
    pub const fn color_for(&self, state: LinkState) -> Color {
        match state {
            LinkState::Connected => self.connected,
            LinkState::Connecting | LinkState::Reconnecting => self.connecting,
            LinkState::Failed => self.failed,
            LinkState::Disconnected => self.offline,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn distinct() -> Palette {
        Palette {
            connected: Color(1),
            connecting: Color(2),
            failed: Color(3),
            offline: Color(4),
        }
    }

    #[test]
    fn test_color_for_every_state() {
        let palette = distinct();
        for state in LinkState::ALL {
            let expected = match state {
                LinkState::Disconnected => Color(4),
                LinkState::Connecting => Color(2),
                LinkState::Connected => Color(1),
                LinkState::Reconnecting => Color(2),
                LinkState::Failed => Color(3),
            };
            assert_eq!(palette.color_for(state), expected, "{:?}", state);
        }
    }

    #[test]
    fn test_swapped_palette_is_honoured() {
        // A BGR panel shows 0x001F as green; configuration decides, not code
        let palette = Palette {
            connected: Color::BLUE,
            ..Palette::default()
        };
        assert_eq!(palette.color_for(LinkState::Connected), Color(0x001F));
    }

    #[test]
    fn test_channels() {
        assert_eq!(Color::RED.channels(), (0x1F, 0, 0));
        assert_eq!(Color::GREEN.channels(), (0, 0x3F, 0));
        assert_eq!(Color::BLUE.channels(), (0, 0, 0x1F));
    }
}
