//! Status screen composition.
//!
//! ```text
//! ┌────────────────────────────┐
//! │ AUTO           LINK  !SNS  │  y=0   mode · cloud · sensor fault
//! │────────────────────────────│  y=11
//! │  23.4°C                    │  y=16  temperature, 10×20 font
//! │                            │
//! │ Set 25.0°C                 │  y=40
//! │ Cooler ON                  │  y=52
//! └────────────────────────────┘
//! ```

use core::fmt::Write;

use embedded_graphics::mono_font::MonoTextStyle;
use embedded_graphics::mono_font::iso_8859_1::{FONT_6X10, FONT_10X20};
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Line as Rule, PrimitiveStyle};
use embedded_graphics::text::{Baseline, Text};

use crate::control::Mode;

/// Everything the screen shows, snapshotted from the service.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StatusView {
    /// Last good temperature; `None` before the first valid sample.
    pub temperature_c: Option<f32>,
    pub sensor_fault: bool,
    pub setpoint_c: f32,
    pub mode: Mode,
    pub cooler_on: bool,
    pub cloud_connected: bool,
}

pub type Line = heapless::String<21>;

/// Text content of each screen row.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusLines {
    pub mode: &'static str,
    pub link: &'static str,
    pub fault: &'static str,
    pub temperature: Line,
    pub setpoint: Line,
    pub relay: Line,
}

impl StatusView {
    pub fn lines(&self) -> StatusLines {
        let mut temperature = Line::new();
        match self.temperature_c {
            Some(t) => {
                let _ = write!(temperature, "{:.1}°C", t);
            }
            None => {
                let _ = temperature.push_str("--.-°C");
            }
        }

        let mut setpoint = Line::new();
        let _ = write!(setpoint, "Set {:.1}°C", self.setpoint_c);

        let mut relay = Line::new();
        let _ = write!(relay, "Cooler {}", if self.cooler_on { "ON" } else { "OFF" });

        StatusLines {
            mode: match self.mode {
                Mode::Auto => "AUTO",
                Mode::Manual => "MANUAL",
            },
            link: if self.cloud_connected { "LINK" } else { "" },
            fault: if self.sensor_fault { "!SNS" } else { "" },
            temperature,
            setpoint,
            relay,
        }
    }

    /// Compose the screen onto `target`, clearing it first.
    pub fn draw<D>(&self, target: &mut D) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = BinaryColor>,
    {
        let lines = self.lines();
        let small = MonoTextStyle::new(&FONT_6X10, BinaryColor::On);
        let large = MonoTextStyle::new(&FONT_10X20, BinaryColor::On);

        target.clear(BinaryColor::Off)?;
        Text::with_baseline(lines.mode, Point::new(0, 0), small, Baseline::Top).draw(target)?;
        Text::with_baseline(lines.link, Point::new(72, 0), small, Baseline::Top).draw(target)?;
        Text::with_baseline(lines.fault, Point::new(102, 0), small, Baseline::Top).draw(target)?;
        Rule::new(Point::new(0, 11), Point::new(127, 11))
            .into_styled(PrimitiveStyle::with_stroke(BinaryColor::On, 1))
            .draw(target)?;
        Text::with_baseline(&lines.temperature, Point::new(4, 16), large, Baseline::Top)
            .draw(target)?;
        Text::with_baseline(&lines.setpoint, Point::new(0, 40), small, Baseline::Top)
            .draw(target)?;
        Text::with_baseline(&lines.relay, Point::new(0, 52), small, Baseline::Top).draw(target)?;
        Ok(())
    }
}
