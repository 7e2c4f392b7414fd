//! RGB colors and their HLS (hue, luminance, saturation) representation.
//!
//! The lamp's top bulb takes its color along the HLS axes, so every RGB
//! request is converted with the standard RGB -> HLS mapping before it is
//! quantized into a command packet.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// An 8-bit (r, g, b) color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

/// A color in the HLS model. All components range from `0.0..=1.0`,
/// with hue wrapping around (`1.0` is the same angle as `0.0`).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Hls {
    pub hue: f64,
    pub luminance: f64,
    pub saturation: f64,
}

fn clamp_channel(value: i64) -> u8 {
    value.clamp(0, 0xFF) as u8
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);
    pub const WHITE: Rgb = Rgb::new(0xFF, 0xFF, 0xFF);

    pub const fn new(r: u8, g: u8, b: u8) -> Rgb {
        Rgb { r, g, b }
    }

    /// Build a color from loosely typed channel values.
    ///
    /// Exactly three channels are required; each is clamped to `0..=255`.
    pub fn from_channels(channels: &[i64]) -> Result<Rgb> {
        match channels {
            [r, g, b] => Ok(Rgb::new(
                clamp_channel(*r),
                clamp_channel(*g),
                clamp_channel(*b),
            )),
            _ => Err(Error::InvalidArgument(format!(
                "color must contain 3 channels in range 0..255 ({} provided)",
                channels.len()
            ))),
        }
    }

    pub fn is_gray(self) -> bool {
        self.r == self.g && self.g == self.b
    }

    /// Convert to HLS.
    pub fn to_hls(self) -> Hls {
        let r = f64::from(self.r) / 255.0;
        let g = f64::from(self.g) / 255.0;
        let b = f64::from(self.b) / 255.0;

        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let sum = max + min;
        let range = max - min;
        let luminance = sum / 2.0;

        // Achromatic: no hue, no saturation.
        if self.is_gray() {
            return Hls { hue: 0.0, luminance, saturation: 0.0 };
        }

        let saturation = if luminance <= 0.5 {
            range / sum
        } else {
            range / (2.0 - sum)
        };

        let rc = (max - r) / range;
        let gc = (max - g) / range;
        let bc = (max - b) / range;

        let sector = if r == max {
            bc - gc
        } else if g == max {
            2.0 + rc - bc
        } else {
            4.0 + gc - rc
        };

        Hls {
            hue: (sector / 6.0).rem_euclid(1.0),
            luminance,
            saturation,
        }
    }
}

impl From<u32> for Rgb {
    /// Unpack a `0xRRGGBB` value.
    fn from(color: u32) -> Rgb {
        Rgb::new(
            ((color >> 16) & 0xFF) as u8,
            ((color >> 8) & 0xFF) as u8,
            (color & 0xFF) as u8,
        )
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl FromStr for Rgb {
    type Err = Error;

    /// Parse `rrggbb`, optionally prefixed with `#`.
    fn from_str(s: &str) -> Result<Rgb> {
        let hex = s.strip_prefix('#').unwrap_or(s);
        if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(Error::InvalidArgument(format!("not a hex color: {:?}", s)));
        }
        u32::from_str_radix(hex, 16)
            .map(Rgb::from)
            .map_err(|_| Error::InvalidArgument(format!("not a hex color: {:?}", s)))
    }
}
