//! Layered canvas
//!
//! Implements the core's display-primitive trait on top of any RGB565
//! `DrawTarget`. Each overlay region owns an off-screen [`Layer`]; the
//! animation is drawn straight into the panel target, which is expected
//! to be a frame buffer that [`Present`] pushes to the glass.

use embedded_graphics::mono_font::ascii::{FONT_10X20, FONT_6X10, FONT_8X13};
use embedded_graphics::mono_font::{MonoFont, MonoTextStyleBuilder};
use embedded_graphics::pixelcolor::raw::RawU16;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{
    Circle, PrimitiveStyle, PrimitiveStyleBuilder, Rectangle, RoundedRectangle,
};
use embedded_graphics::text::{Alignment, Baseline, Text, TextStyleBuilder};

use horologe_core::render::{Color, Layout, Point as CorePoint, Rect, RegionId};
use horologe_core::traits::{Anchor, DisplayBackend, DisplayError, Font, TextStyle};

use crate::animation::AnimationFrames;
use crate::layer::Layer;

/// Push a finished frame buffer to the panel
pub trait Present {
    type Error;

    fn present(&mut self) -> Result<(), Self::Error>;
}

/// Pixels needed to back every overlay region of `layout`
pub const fn overlay_pixels(layout: &Layout) -> usize {
    let mut total = 0;
    let mut i = 0;
    while i < RegionId::COUNT {
        let region = horologe_core::render::COMPOSITION_ORDER[i];
        if !matches!(region, RegionId::Animation) {
            let r = layout.bounds(region);
            total += (r.width * r.height) as usize;
        }
        i += 1;
    }
    total
}

fn color(c: Color) -> Rgb565 {
    Rgb565::from(RawU16::new(c.raw()))
}

fn point(p: CorePoint) -> Point {
    Point::new(p.x, p.y)
}

fn rectangle(r: Rect) -> Rectangle {
    Rectangle::new(point(r.origin), Size::new(r.width, r.height))
}

fn mono_font(font: Font) -> &'static MonoFont<'static> {
    match font {
        Font::Small => &FONT_6X10,
        Font::Medium => &FONT_8X13,
        Font::Large => &FONT_10X20,
    }
}

/// Panel frame buffer plus one layer per overlay region
pub struct LayeredCanvas<'a, D, A> {
    panel: D,
    animation: A,
    layout: Layout,
    layers: [Option<Layer<'a>>; RegionId::COUNT],
}

impl<'a, D, A> LayeredCanvas<'a, D, A>
where
    D: DrawTarget<Color = Rgb565> + Present,
    A: AnimationFrames,
{
    /// Create a canvas with no layers attached
    pub fn new(panel: D, animation: A, layout: Layout) -> Self {
        Self {
            panel,
            animation,
            layout,
            layers: core::array::from_fn(|_| None),
        }
    }

    /// Carve layers for every overlay region out of one buffer
    ///
    /// `pool` must hold at least [`overlay_pixels`] pixels.
    pub fn attach_layers(&mut self, pool: &'a mut [u16]) -> Result<(), DisplayError> {
        if pool.len() < overlay_pixels(&self.layout) {
            return Err(DisplayError::BufferTooSmall);
        }
        let mut rest = pool;
        for region in horologe_core::render::COMPOSITION_ORDER {
            if region == RegionId::Animation {
                continue;
            }
            let bounds = self.layout.bounds(region);
            let len = (bounds.width * bounds.height) as usize;
            let (mine, tail) = core::mem::take(&mut rest).split_at_mut(len);
            rest = tail;
            self.layers[region.index()] =
                Some(Layer::new(mine, Size::new(bounds.width, bounds.height))?);
        }
        Ok(())
    }

    pub fn panel(&self) -> &D {
        &self.panel
    }

    pub fn panel_mut(&mut self) -> &mut D {
        &mut self.panel
    }

    pub fn layer(&self, region: RegionId) -> Option<&Layer<'a>> {
        self.layers[region.index()].as_ref()
    }

    fn layer_mut(&mut self, region: RegionId) -> Result<&mut Layer<'a>, DisplayError> {
        self.layers[region.index()]
            .as_mut()
            .ok_or(DisplayError::NoSuchLayer)
    }

    fn draw_on<P>(&mut self, region: RegionId, drawable: P) -> Result<(), DisplayError>
    where
        P: Drawable<Color = Rgb565>,
    {
        let layer = self.layer_mut(region)?;
        // Layers never fail to draw
        let _ = drawable.draw(layer);
        Ok(())
    }
}

impl<'a, D, A> DisplayBackend for LayeredCanvas<'a, D, A>
where
    D: DrawTarget<Color = Rgb565> + Present,
    A: AnimationFrames,
{
    fn clear_region(&mut self, region: RegionId) -> Result<(), DisplayError> {
        self.layer_mut(region)?.reset();
        Ok(())
    }

    fn fill_rect(&mut self, region: RegionId, area: Rect, c: Color) -> Result<(), DisplayError> {
        self.draw_on(
            region,
            rectangle(area).into_styled(PrimitiveStyle::with_fill(color(c))),
        )
    }

    fn fill_round_rect(
        &mut self,
        region: RegionId,
        area: Rect,
        radius: u32,
        c: Color,
    ) -> Result<(), DisplayError> {
        let shape = RoundedRectangle::with_equal_corners(rectangle(area), Size::new(radius, radius));
        self.draw_on(region, shape.into_styled(PrimitiveStyle::with_fill(color(c))))
    }

    fn draw_round_rect(
        &mut self,
        region: RegionId,
        area: Rect,
        radius: u32,
        c: Color,
    ) -> Result<(), DisplayError> {
        let shape = RoundedRectangle::with_equal_corners(rectangle(area), Size::new(radius, radius));
        self.draw_on(region, shape.into_styled(PrimitiveStyle::with_stroke(color(c), 1)))
    }

    fn fill_circle(
        &mut self,
        region: RegionId,
        center: CorePoint,
        radius: u32,
        fill: Color,
        outline: Color,
    ) -> Result<(), DisplayError> {
        let style = PrimitiveStyleBuilder::new()
            .fill_color(color(fill))
            .stroke_color(color(outline))
            .stroke_width(1)
            .build();
        self.draw_on(
            region,
            Circle::with_center(point(center), radius * 2 + 1).into_styled(style),
        )
    }

    fn draw_text(
        &mut self,
        region: RegionId,
        text: &str,
        at: CorePoint,
        style: TextStyle,
    ) -> Result<(), DisplayError> {
        let mut character = MonoTextStyleBuilder::new()
            .font(mono_font(style.font))
            .text_color(color(style.color));
        if let Some(bg) = style.background {
            character = character.background_color(color(bg));
        }
        let alignment = match style.anchor {
            Anchor::MiddleLeft => Alignment::Left,
            Anchor::Center => Alignment::Center,
        };
        let layout = TextStyleBuilder::new()
            .alignment(alignment)
            .baseline(Baseline::Middle)
            .build();
        self.draw_on(
            region,
            Text::with_text_style(text, point(at), character.build(), layout),
        )
    }

    fn draw_animation_frame(&mut self, frame: usize) -> Result<(), DisplayError> {
        let bounds = rectangle(self.layout.bounds(RegionId::Animation));
        self.panel
            .clear(Rgb565::BLACK)
            .map_err(|_| DisplayError::Communication)?;

        let mut target = self.panel.clipped(&bounds);
        let mut target = target.translated(bounds.top_left);
        match self.animation.draw_frame(frame, &mut target) {
            Ok(true) => Ok(()),
            Ok(false) => Err(DisplayError::NoSuchFrame),
            Err(_) => Err(DisplayError::Communication),
        }
    }

    fn compose(&mut self, order: &[RegionId]) -> Result<(), DisplayError> {
        for region in order {
            let Some(layer) = self.layers[region.index()].as_ref() else {
                continue;
            };
            let origin = point(self.layout.bounds(*region).origin);
            self.panel
                .draw_iter(
                    layer
                        .opaque_pixels()
                        .map(|Pixel(p, c)| Pixel(p + origin, c)),
                )
                .map_err(|_| DisplayError::Communication)?;
        }
        self.panel
            .present()
            .map_err(|_| DisplayError::Communication)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::RainbowBars;
    use crate::layer::TRANSPARENT;
    use embedded_graphics::mock_display::MockDisplay;
    use horologe_core::render::COMPOSITION_ORDER;

    /// Frame buffer stand-in that counts presents
    struct MockPanel {
        display: MockDisplay<Rgb565>,
        presented: u32,
    }

    impl MockPanel {
        fn new() -> Self {
            let mut display = MockDisplay::new();
            display.set_allow_overdraw(true);
            Self {
                display,
                presented: 0,
            }
        }
    }

    impl OriginDimensions for MockPanel {
        fn size(&self) -> Size {
            self.display.size()
        }
    }

    impl DrawTarget for MockPanel {
        type Color = Rgb565;
        type Error = core::convert::Infallible;

        fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
        where
            I: IntoIterator<Item = Pixel<Self::Color>>,
        {
            self.display.draw_iter(pixels)
        }
    }

    impl Present for MockPanel {
        type Error = ();

        fn present(&mut self) -> Result<(), ()> {
            self.presented += 1;
            Ok(())
        }
    }

    /// 64x64 layout: animation on the left, overlays stacked on the right
    fn small_layout() -> Layout {
        Layout::from_bounds([
            Rect::new(0, 0, 24, 64),
            Rect::new(2, 2, 20, 6),
            Rect::new(30, 0, 30, 8),
            Rect::new(30, 10, 30, 8),
            Rect::new(30, 20, 30, 8),
            Rect::new(30, 30, 30, 8),
            Rect::new(30, 40, 30, 12),
            Rect::new(30, 54, 30, 8),
        ])
    }

    fn canvas<'a>(pool: &'a mut [u16]) -> LayeredCanvas<'a, MockPanel, RainbowBars> {
        let mut canvas = LayeredCanvas::new(
            MockPanel::new(),
            RainbowBars::new(Size::new(24, 64), 6),
            small_layout(),
        );
        canvas.attach_layers(pool).unwrap();
        canvas
    }

    #[test]
    fn test_overlay_pixels() {
        assert_eq!(
            overlay_pixels(&small_layout()),
            20 * 6 + 30 * 8 * 5 + 30 * 12
        );
    }

    #[test]
    fn test_pool_too_small() {
        let mut pool = [0u16; 10];
        let mut canvas = LayeredCanvas::new(
            MockPanel::new(),
            RainbowBars::new(Size::new(24, 64), 6),
            small_layout(),
        );
        assert_eq!(canvas.attach_layers(&mut pool), Err(DisplayError::BufferTooSmall));
        assert_eq!(
            canvas.clear_region(RegionId::Clock),
            Err(DisplayError::NoSuchLayer)
        );
    }

    #[test]
    fn test_region_local_drawing() {
        let mut pool = [0u16; 2_048];
        let mut canvas = canvas(&mut pool);
        canvas
            .fill_rect(RegionId::Clock, Rect::sized(30, 8), Color::WHITE)
            .unwrap();

        let layer = canvas.layer(RegionId::Clock).unwrap();
        assert_eq!(layer.pixel(Point::new(0, 0)), Some(Rgb565::WHITE));
        assert_eq!(layer.pixel(Point::new(29, 7)), Some(Rgb565::WHITE));
        // Other layers untouched
        assert_eq!(
            canvas.layer(RegionId::Date).unwrap().opaque_pixels().count(),
            0
        );
    }

    #[test]
    fn test_compose_overlays_animation() {
        let mut pool = [0u16; 2_048];
        let mut canvas = canvas(&mut pool);

        canvas.draw_animation_frame(0).unwrap();
        canvas
            .fill_rect(RegionId::Banner, Rect::sized(20, 6), Color::WHITE)
            .unwrap();
        canvas
            .fill_circle(RegionId::Status, CorePoint::new(5, 5), 3, Color::GREEN, Color::WHITE)
            .unwrap();
        canvas.compose(&COMPOSITION_ORDER).unwrap();

        let panel = &canvas.panel().display;
        // Banner covers the animation where it sits
        assert_eq!(panel.get_pixel(Point::new(2, 2)), Some(Rgb565::WHITE));
        // Animation shows around it
        assert_eq!(panel.get_pixel(Point::new(0, 0)), Some(Rgb565::RED));
        // Status dot at its region offset
        assert_eq!(panel.get_pixel(Point::new(35, 45)), Some(Rgb565::GREEN));
        assert_eq!(canvas.panel().presented, 1);
    }

    #[test]
    fn test_cleared_region_is_transparent() {
        let mut pool = [0u16; 2_048];
        let mut canvas = canvas(&mut pool);
        canvas
            .fill_rect(RegionId::Fps, Rect::sized(30, 8), Color::WHITE)
            .unwrap();
        canvas.clear_region(RegionId::Fps).unwrap();

        let layer = canvas.layer(RegionId::Fps).unwrap();
        assert_eq!(layer.pixel(Point::new(3, 3)), Some(TRANSPARENT));
    }

    #[test]
    fn test_text_lands_in_region() {
        let mut pool = [0u16; 2_048];
        let mut canvas = canvas(&mut pool);
        canvas
            .draw_text(
                RegionId::Status,
                "OK",
                CorePoint::new(15, 6),
                TextStyle::centered(Font::Small, Color::WHITE),
            )
            .unwrap();
        assert!(canvas.layer(RegionId::Status).unwrap().opaque_pixels().count() > 0);
    }

    #[test]
    fn test_missing_frame() {
        let mut pool = [0u16; 2_048];
        let mut canvas = canvas(&mut pool);
        assert_eq!(canvas.draw_animation_frame(6), Err(DisplayError::NoSuchFrame));
    }
}
