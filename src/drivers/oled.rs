//! SSD1306 128×64 OLED over I²C.
//!
//! Thin [`DisplayPort`] wrapper around the `ssd1306` driver in buffered
//! graphics mode: [`StatusView::draw`] composes into the RAM buffer, then
//! one flush sends the frame.

use embedded_hal::i2c::I2c;
use log::{info, warn};
use ssd1306::mode::BufferedGraphicsMode;
use ssd1306::prelude::*;
use ssd1306::{I2CDisplayInterface, Ssd1306};

use crate::app::ports::DisplayPort;
use crate::display::StatusView;
use crate::error::DisplayError;

type Panel<I2C> =
    Ssd1306<I2CInterface<I2C>, DisplaySize128x64, BufferedGraphicsMode<DisplaySize128x64>>;

pub struct OledDisplay<I2C> {
    panel: Panel<I2C>,
    addr: u8,
    ready: bool,
}

impl<I2C: I2c> OledDisplay<I2C> {
    pub fn new(i2c: I2C, addr: u8) -> Self {
        let interface = I2CDisplayInterface::new_custom_address(i2c, addr);
        Self {
            panel: Ssd1306::new(interface, DisplaySize128x64, DisplayRotation::Rotate0)
                .into_buffered_graphics_mode(),
            addr,
            ready: false,
        }
    }

    pub fn is_ready(&self) -> bool {
        self.ready
    }
}

impl<I2C: I2c> DisplayPort for OledDisplay<I2C> {
    fn init(&mut self) -> Result<(), DisplayError> {
        if DisplayConfig::init(&mut self.panel).is_err() {
            warn!("SSD1306: no response at 0x{:02X}", self.addr);
            return Err(DisplayError::BusFailed);
        }
        self.panel.clear_buffer();
        self.panel.flush().map_err(|_| DisplayError::BusFailed)?;
        self.ready = true;
        info!("SSD1306: initialised at 0x{:02X}", self.addr);
        Ok(())
    }

    fn render(&mut self, view: &StatusView) -> Result<(), DisplayError> {
        if !self.ready {
            return Err(DisplayError::NotInitialised);
        }
        view.draw(&mut self.panel).map_err(|_| DisplayError::BusFailed)?;
        self.panel.flush().map_err(|_| DisplayError::BusFailed)
    }
}
