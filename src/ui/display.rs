//! SSD1306 OLED display wrapper.

use crate::error::Error;
use crate::ui::refresh::{Rect, Renderer};
use defmt::warn;
use embedded_graphics::mono_font::ascii::{FONT_5X8, FONT_9X15};
use embedded_graphics::mono_font::{MonoFont, MonoTextStyle, MonoTextStyleBuilder};
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{PrimitiveStyle, Rectangle};
use embedded_graphics::text::{Baseline, Text};
use ssd1306::mode::BufferedGraphicsMode;
use ssd1306::prelude::*;
use ssd1306::I2CDisplayInterface;
use ssd1306::Ssd1306;

/// Type alias for the concrete display driver.
///
/// Generic over the I²C implementation so callers pass in their HAL's
/// I²C peripheral.
pub type Display<I2C> =
    Ssd1306<I2CInterface<I2C>, DisplaySize128x32, BufferedGraphicsMode<DisplaySize128x32>>;

/// Initialise the SSD1306 display and clear the screen.
pub fn init<I2C>(i2c: I2C) -> Result<Display<I2C>, Error>
where
    I2C: embedded_hal::i2c::I2c,
{
    let interface = I2CDisplayInterface::new(i2c);
    let mut display = Ssd1306::new(interface, DisplaySize128x32, DisplayRotation::Rotate0)
        .into_buffered_graphics_mode();
    display.init().map_err(|_| Error::Display)?;
    display.clear_buffer();
    display.flush().map_err(|_| Error::Display)?;
    Ok(display)
}

fn text_style(font: &'static MonoFont<'static>) -> MonoTextStyle<'static, BinaryColor> {
    MonoTextStyleBuilder::new()
        .font(font)
        .text_color(BinaryColor::On)
        .build()
}

/// [`Renderer`] backed by the buffered SSD1306 driver.
///
/// Drawing only touches the frame buffer; I²C traffic happens in `flush`.
pub struct OledRenderer<I2C> {
    display: Display<I2C>,
}

impl<I2C> OledRenderer<I2C>
where
    I2C: embedded_hal::i2c::I2c,
{
    pub fn new(display: Display<I2C>) -> Self {
        Self { display }
    }
}

impl<I2C> Renderer for OledRenderer<I2C>
where
    I2C: embedded_hal::i2c::I2c,
{
    fn clear(&mut self, rect: Rect) {
        let _ = Rectangle::new(Point::new(rect.x, rect.y), Size::new(rect.width, rect.height))
            .into_styled(PrimitiveStyle::with_fill(BinaryColor::Off))
            .draw(&mut self.display);
    }

    fn draw_text(&mut self, text: &str, x: i32, y: i32, size: u8) {
        let font = if size >= 2 { &FONT_9X15 } else { &FONT_5X8 };
        let _ = Text::with_baseline(text, Point::new(x, y), text_style(font), Baseline::Top)
            .draw(&mut self.display);
    }

    fn flush(&mut self) {
        if self.display.flush().is_err() {
            warn!("Display flush failed");
        }
    }
}
