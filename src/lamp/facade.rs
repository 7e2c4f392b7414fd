use crate::color::Rgb;
use crate::error::Result;
use crate::transport::GattTransport;

use super::LampF;

/// The surface a home automation light entity needs from a lamp.
///
/// Brightness and temperature address the main (bottom) bulb, color the
/// top bulb.
pub trait SmartLamp {
    fn power(&self) -> bool;
    fn set_power(&mut self, on: bool) -> Result<()>;

    fn brightness(&self) -> u8;
    fn set_brightness(&mut self, brightness: u8) -> Result<()>;

    fn temperature(&self) -> u16;
    fn set_temperature(&mut self, kelvin: i64) -> Result<()>;

    fn color(&self) -> Option<Rgb>;
    fn set_color(&mut self, color: Option<Rgb>) -> Result<()>;

    /// Power on, then apply the brightness (full when not given).
    fn turn_on(&mut self, brightness: Option<u8>) -> Result<()> {
        self.set_power(true)?;
        self.set_brightness(brightness.unwrap_or(u8::MAX))
    }

    fn turn_off(&mut self) -> Result<()> {
        self.set_power(false)
    }
}

impl<T: GattTransport> SmartLamp for LampF<T> {
    fn power(&self) -> bool {
        LampF::power(self)
    }

    fn set_power(&mut self, on: bool) -> Result<()> {
        LampF::set_power(self, on)
    }

    fn brightness(&self) -> u8 {
        self.bottom_brightness()
    }

    fn set_brightness(&mut self, brightness: u8) -> Result<()> {
        self.set_bottom_brightness(brightness)
    }

    fn temperature(&self) -> u16 {
        self.bottom_temperature()
    }

    fn set_temperature(&mut self, kelvin: i64) -> Result<()> {
        self.set_bottom_temperature(kelvin)
    }

    fn color(&self) -> Option<Rgb> {
        LampF::color(self)
    }

    fn set_color(&mut self, color: Option<Rgb>) -> Result<()> {
        LampF::set_color(self, color)
    }
}
