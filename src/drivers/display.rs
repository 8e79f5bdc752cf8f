//! OLED Display Driver
//!
//! Renders the [`Screen`] model on an SSD1306 128x64 over I2C.

use embassy_stm32::i2c::I2c;
use embassy_stm32::mode::Async;
use embedded_graphics::mono_font::ascii::{FONT_10X20, FONT_6X10};
use embedded_graphics::mono_font::MonoTextStyle;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Line, PrimitiveStyle};
use embedded_graphics::text::{Baseline, Text};
use embedded_graphics_core::draw_target::DrawTarget;
use embedded_graphics_core::geometry::{OriginDimensions, Size};
use embedded_graphics_core::pixelcolor::BinaryColor;
use embedded_graphics_core::Pixel;

use crate::config::{DISPLAY_HEIGHT, DISPLAY_WIDTH};
use crate::hal::i2c::{I2cAddress, I2cBus, I2cResult};
use crate::ui::Screen;

const BUFFER_LEN: usize = (DISPLAY_WIDTH * DISPLAY_HEIGHT / 8) as usize;

/// SSD1306 commands
mod cmd {
    pub const SET_CONTRAST: u8 = 0x81;
    pub const DISPLAY_ALL_ON_RESUME: u8 = 0xA4;
    pub const NORMAL_DISPLAY: u8 = 0xA6;
    pub const DISPLAY_OFF: u8 = 0xAE;
    pub const DISPLAY_ON: u8 = 0xAF;
    pub const SET_DISPLAY_OFFSET: u8 = 0xD3;
    pub const SET_COM_PINS: u8 = 0xDA;
    pub const SET_VCOM_DETECT: u8 = 0xDB;
    pub const SET_DISPLAY_CLOCK_DIV: u8 = 0xD5;
    pub const SET_PRECHARGE: u8 = 0xD9;
    pub const SET_MULTIPLEX: u8 = 0xA8;
    pub const SET_START_LINE: u8 = 0x40;
    pub const MEMORY_MODE: u8 = 0x20;
    pub const COLUMN_ADDR: u8 = 0x21;
    pub const PAGE_ADDR: u8 = 0x22;
    pub const COM_SCAN_DEC: u8 = 0xC8;
    pub const SEG_REMAP: u8 = 0xA0;
    pub const CHARGE_PUMP: u8 = 0x8D;
}

/// Display buffer (1 bit per pixel, page layout)
pub struct DisplayBuffer {
    buffer: [u8; BUFFER_LEN],
}

impl DisplayBuffer {
    /// Create a new empty display buffer
    #[must_use]
    pub const fn new() -> Self {
        Self {
            buffer: [0; BUFFER_LEN],
        }
    }

    /// Clear the buffer
    pub fn clear(&mut self) {
        self.buffer.fill(0);
    }

    /// Set a pixel
    pub fn set_pixel(&mut self, x: u32, y: u32, on: bool) {
        if x >= DISPLAY_WIDTH || y >= DISPLAY_HEIGHT {
            return;
        }

        let byte_idx = (y / 8 * DISPLAY_WIDTH + x) as usize;
        let bit = 1 << (y % 8);

        if on {
            self.buffer[byte_idx] |= bit;
        } else {
            self.buffer[byte_idx] &= !bit;
        }
    }

    /// Get the raw buffer
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buffer
    }
}

impl Default for DisplayBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl DrawTarget for DisplayBuffer {
    type Color = BinaryColor;
    type Error = core::convert::Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(coord, color) in pixels {
            if let (Ok(x), Ok(y)) = (u32::try_from(coord.x), u32::try_from(coord.y)) {
                self.set_pixel(x, y, color.is_on());
            }
        }
        Ok(())
    }
}

impl OriginDimensions for DisplayBuffer {
    fn size(&self) -> Size {
        Size::new(DISPLAY_WIDTH, DISPLAY_HEIGHT)
    }
}

/// OLED display driver
pub struct Display<'d> {
    bus: I2cBus<'d>,
    buffer: DisplayBuffer,
}

impl<'d> Display<'d> {
    /// Create a new display driver
    #[must_use]
    pub fn new(i2c: I2c<'d, Async>) -> Self {
        Self::from_bus(I2cBus::new(i2c))
    }

    /// Create a display driver on an existing bus wrapper
    #[must_use]
    pub fn from_bus(bus: I2cBus<'d>) -> Self {
        Self {
            bus,
            buffer: DisplayBuffer::new(),
        }
    }

    /// Initialize the display
    pub async fn init(&mut self) -> I2cResult<()> {
        let init_cmds = [
            cmd::DISPLAY_OFF,
            cmd::SET_DISPLAY_CLOCK_DIV,
            0x80,
            cmd::SET_MULTIPLEX,
            0x3F, // 64 lines
            cmd::SET_DISPLAY_OFFSET,
            0x00,
            cmd::SET_START_LINE,
            cmd::CHARGE_PUMP,
            0x14,
            cmd::MEMORY_MODE,
            0x00, // horizontal addressing
            cmd::SEG_REMAP | 0x01,
            cmd::COM_SCAN_DEC,
            cmd::SET_COM_PINS,
            0x12,
            cmd::SET_CONTRAST,
            0xCF,
            cmd::SET_PRECHARGE,
            0xF1,
            cmd::SET_VCOM_DETECT,
            0x40,
            cmd::DISPLAY_ALL_ON_RESUME,
            cmd::NORMAL_DISPLAY,
            cmd::DISPLAY_ON,
        ];

        for &c in &init_cmds {
            self.send_command(c).await?;
        }

        self.buffer.clear();
        self.flush().await
    }

    async fn send_command(&mut self, cmd: u8) -> I2cResult<()> {
        self.bus.write(I2cAddress::SSD1306, &[0x00, cmd]).await
    }

    /// Flush the buffer to the display
    pub async fn flush(&mut self) -> I2cResult<()> {
        self.send_command(cmd::COLUMN_ADDR).await?;
        self.send_command(0).await?;
        self.send_command(127).await?;

        self.send_command(cmd::PAGE_ADDR).await?;
        self.send_command(0).await?;
        self.send_command(7).await?;

        let data = self.buffer.as_bytes();
        for chunk in data.chunks(32) {
            let mut buf = [0u8; 33];
            buf[0] = 0x40; // data mode
            buf[1..=chunk.len()].copy_from_slice(chunk);
            self.bus
                .write(I2cAddress::SSD1306, &buf[..=chunk.len()])
                .await?;
        }

        Ok(())
    }

    /// Redraw `screen` if it changed since the last call
    pub async fn show(&mut self, screen: &mut Screen) -> I2cResult<()> {
        if !screen.needs_update() {
            return Ok(());
        }
        render_screen(&mut self.buffer, screen);
        self.flush().await?;
        screen.mark_updated();
        Ok(())
    }

    /// Set display contrast
    pub async fn set_contrast(&mut self, contrast: u8) -> I2cResult<()> {
        self.send_command(cmd::SET_CONTRAST).await?;
        self.send_command(contrast).await
    }
}

/// Draw the screen model: frequency large on top, volume, then one scrolling
/// line of RDS text
pub fn render_screen(buffer: &mut DisplayBuffer, screen: &Screen) {
    buffer.clear();

    let large = MonoTextStyle::new(&FONT_10X20, BinaryColor::On);
    let small = MonoTextStyle::new(&FONT_6X10, BinaryColor::On);

    let _ = Text::with_baseline(&screen.frequency_line(), Point::new(4, 2), large, Baseline::Top)
        .draw(buffer);
    let _ = Text::with_baseline(&screen.volume_line(), Point::new(0, 28), small, Baseline::Top)
        .draw(buffer);

    let _ = Line::new(Point::new(0, 40), Point::new(127, 40))
        .into_styled(PrimitiveStyle::with_stroke(BinaryColor::On, 1))
        .draw(buffer);

    let _ = Text::with_baseline(screen.visible_text(), Point::new(0, 46), small, Baseline::Top)
        .draw(buffer);
}
