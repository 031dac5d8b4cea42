//! [`Screen`] on top of any `embedded-graphics` RGB565 target.
//!
//! The sprites are drawn from primitives so no bitmap assets are needed.

use embedded_graphics::{
    mono_font::{
        MonoTextStyle,
        MonoTextStyleBuilder,
        ascii::FONT_10X20,
    },
    pixelcolor::Rgb565,
    prelude::*,
    primitives::{
        Circle,
        PrimitiveStyle,
        Rectangle,
        Triangle,
    },
    text::{
        Baseline,
        Text,
    },
};

use crate::{
    hal::Screen,
    sprite::{
        Art,
        Pose,
    },
};

/// Colour left behind by [`Screen::clear_region`].
pub const BACKDROP: Rgb565 = Rgb565::CSS_LIGHT_SKY_BLUE;
/// Text colour.
pub const INK: Rgb565 = Rgb565::BLACK;

const GROUND: Rgb565 = Rgb565::CSS_FOREST_GREEN;
const BUILDING: Rgb565 = Rgb565::CSS_FIRE_BRICK;
const FLAME: Rgb565 = Rgb565::CSS_ORANGE;
const UNIFORM: Rgb565 = Rgb565::CSS_NAVY;
const SKIN: Rgb565 = Rgb565::CSS_PEACH_PUFF;
const TRAMPOLINE: Rgb565 = Rgb565::RED;
const HEART: Rgb565 = Rgb565::RED;

/// Paints game art onto a display.
pub struct GraphicsScreen<D> {
    target: D,
}

impl<D> GraphicsScreen<D>
where
    D: DrawTarget<Color = Rgb565>,
{
    pub const fn new(target: D) -> Self {
        Self { target }
    }

    pub fn target_mut(&mut self) -> &mut D {
        &mut self.target
    }

    pub fn into_inner(self) -> D {
        self.target
    }

    fn fill(&mut self, area: Rectangle, color: Rgb565) -> Result<(), D::Error> {
        area.into_styled(PrimitiveStyle::with_fill(color))
            .draw(&mut self.target)
    }

    fn landscape(&mut self) -> Result<(), D::Error> {
        let screen = self.target.bounding_box();
        self.target.clear(BACKDROP)?;

        let width = screen.size.width;
        let height = screen.size.height;
        self.fill(
            Rectangle::new(Point::new(0, height as i32 - 8), Size::new(width, 8)),
            GROUND,
        )?;

        // Burning building on the left, ambulance on the right.
        self.fill(Rectangle::new(Point::new(0, 16), Size::new(12, height - 24)), BUILDING)?;
        Triangle::new(Point::new(0, 16), Point::new(12, 16), Point::new(6, 4))
            .into_styled(PrimitiveStyle::with_fill(FLAME))
            .draw(&mut self.target)?;
        let ambulance = Rectangle::new(Point::new(width as i32 - 28, 96), Size::new(28, 24));
        self.fill(ambulance, Rgb565::WHITE)?;
        let center = ambulance.center();
        self.fill(Rectangle::with_center(center, Size::new(4, 14)), Rgb565::RED)?;
        self.fill(Rectangle::with_center(center, Size::new(14, 4)), Rgb565::RED)
    }

    fn firemen(&mut self, area: Rectangle) -> Result<(), D::Error> {
        let origin = area.top_left;
        let width = area.size.width as i32;
        self.fill(
            Rectangle::new(origin + Point::new(8, 10), Size::new(area.size.width - 16, 4)),
            TRAMPOLINE,
        )?;
        for x in [0, width - 12] {
            Circle::new(origin + Point::new(x + 2, 0), 8)
                .into_styled(PrimitiveStyle::with_fill(SKIN))
                .draw(&mut self.target)?;
            self.fill(
                Rectangle::new(origin + Point::new(x, 8), Size::new(12, area.size.height - 8)),
                UNIFORM,
            )?;
        }
        Ok(())
    }

    fn dummy(&mut self, area: Rectangle, pose: Pose) -> Result<(), D::Error> {
        let center = area.center();
        let (body, head) = match pose {
            Pose::Up => (Size::new(10, 18), Point::new(0, -11)),
            Pose::Down => (Size::new(10, 18), Point::new(0, 11)),
            Pose::Right => (Size::new(18, 10), Point::new(11, 0)),
            Pose::Left => (Size::new(18, 10), Point::new(-11, 0)),
        };
        self.fill(Rectangle::with_center(center, body), FLAME)?;
        Circle::with_center(center + head, 9)
            .into_styled(PrimitiveStyle::with_fill(SKIN))
            .draw(&mut self.target)
    }

    fn crash(&mut self, area: Rectangle) -> Result<(), D::Error> {
        let origin = area.top_left;
        let floor = area.size.height as i32 - 8;
        self.fill(
            Rectangle::new(origin + Point::new(8, floor), Size::new(area.size.width - 16, 8)),
            FLAME,
        )?;
        Circle::new(origin + Point::new(area.size.width as i32 - 18, floor - 4), 10)
            .into_styled(PrimitiveStyle::with_fill(SKIN))
            .draw(&mut self.target)
    }

    fn life(&mut self, area: Rectangle) -> Result<(), D::Error> {
        let origin = area.top_left;
        let half = area.size.width / 2;
        let lobe = PrimitiveStyle::with_fill(HEART);
        Circle::new(origin, half + 1)
            .into_styled(lobe)
            .draw(&mut self.target)?;
        Circle::new(origin + Point::new(half as i32 - 1, 0), half + 1)
            .into_styled(lobe)
            .draw(&mut self.target)?;
        Triangle::new(
            origin + Point::new(0, half as i32 / 2 + 1),
            origin + Point::new(area.size.width as i32 - 1, half as i32 / 2 + 1),
            origin + Point::new(half as i32, area.size.height as i32 - 1),
        )
        .into_styled(lobe)
        .draw(&mut self.target)
    }
}

fn report<E>(result: Result<(), E>) {
    if result.is_err() {
        error!("display write failed");
    }
}

impl<D> Screen for GraphicsScreen<D>
where
    D: DrawTarget<Color = Rgb565>,
{
    fn draw_sprite(&mut self, art: Art, area: Rectangle) {
        let result = match art {
            Art::Landscape => self.landscape(),
            Art::Firemen => self.firemen(area),
            Art::Crash => self.crash(area),
            Art::Dummy(pose) => self.dummy(area, pose),
            Art::Life => self.life(area),
        };
        report(result);
    }

    fn clear_region(&mut self, area: Rectangle) {
        report(self.fill(area, BACKDROP));
    }

    fn draw_background(&mut self, art: Art) {
        let result = match art {
            Art::Landscape => self.landscape(),
            other => {
                let screen = self.target.bounding_box();
                self.target
                    .clear(BACKDROP)
                    .and_then(|()| match other {
                        Art::Firemen => self.firemen(screen),
                        Art::Crash => self.crash(screen),
                        Art::Dummy(pose) => self.dummy(screen, pose),
                        _ => self.life(screen),
                    })
            }
        };
        report(result);
    }

    fn draw_text(&mut self, at: Point, text: &str) {
        let style = MonoTextStyle::new(&FONT_10X20, INK);
        report(
            Text::with_baseline(text, at, style, Baseline::Top)
                .draw(&mut self.target)
                .map(|_| ()),
        );
    }

    fn draw_integer(&mut self, at: Point, value: u16) {
        let style = MonoTextStyleBuilder::new()
            .font(&FONT_10X20)
            .text_color(INK)
            .background_color(BACKDROP)
            .build();
        let mut buf = [0u8; 5];
        report(
            Text::with_baseline(format_u16(value, &mut buf), at, style, Baseline::Top)
                .draw(&mut self.target)
                .map(|_| ()),
        );
    }
}

/// Format a u16 into a string buffer, returns the slice.
fn format_u16(mut n: u16, buf: &mut [u8; 5]) -> &str {
    let mut start = buf.len();
    loop {
        start -= 1;
        buf[start] = b'0' + (n % 10) as u8;
        n /= 10;
        if n == 0 {
            break;
        }
    }
    core::str::from_utf8(&buf[start..]).unwrap_or("?")
}
