//! Last-applied lamp state.
//!
//! The lamp is never read back: this is what we told it, assumed to have
//! taken effect.

use std::fmt;

use crate::color::Rgb;
use crate::protocol::{clamp_temperature, BottomBlock, Scene};

/// Bottom bulb temperature assumed before the first bottom block is sent.
pub const DEFAULT_BOTTOM_TEMPERATURE: u16 = 3400;
/// Bottom bulb brightness assumed before the first bottom block is sent.
pub const DEFAULT_BOTTOM_BRIGHTNESS: u8 = 10;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LampState {
    power: bool,
    /// Active scene, `None` when unknown or after an immediate light command.
    scene: Option<Scene>,
    /// Top bulb color, `None` when the top bulb is driven by temperature.
    top_color: Option<Rgb>,
    /// Last temperature given to the top bulb.
    top_temperature: Option<u16>,
    bottom_temperature: u16,
    bottom_brightness: u8,
}

impl Default for LampState {
    fn default() -> LampState {
        LampState {
            power: false,
            scene: None,
            top_color: None,
            top_temperature: None,
            bottom_temperature: DEFAULT_BOTTOM_TEMPERATURE,
            bottom_brightness: DEFAULT_BOTTOM_BRIGHTNESS,
        }
    }
}

impl LampState {
    /// A fresh state with different bottom bulb assumptions.
    pub fn assumed(bottom_temperature: i64, bottom_brightness: u8) -> LampState {
        LampState {
            bottom_temperature: clamp_temperature(bottom_temperature),
            bottom_brightness,
            ..LampState::default()
        }
    }

    pub fn power(&self) -> bool {
        self.power
    }

    pub fn scene(&self) -> Option<Scene> {
        self.scene
    }

    pub fn top_color(&self) -> Option<Rgb> {
        self.top_color
    }

    pub fn top_temperature(&self) -> Option<u16> {
        self.top_temperature
    }

    pub fn bottom_temperature(&self) -> u16 {
        self.bottom_temperature
    }

    pub fn bottom_brightness(&self) -> u8 {
        self.bottom_brightness
    }

    pub(crate) fn apply_scene(&mut self, scene: Scene) {
        self.scene = Some(scene);
        self.power = scene != Scene::Shutdown;
    }

    pub(crate) fn apply_top_temperature(&mut self, kelvin: u16) {
        self.top_temperature = Some(kelvin);
    }

    /// Record an immediate light command. Immediate light cannot switch the lamp off.
    pub(crate) fn apply_immediate_light(&mut self, top: Option<TopOutcome>, bottom: Option<BottomBlock>) {
        if let Some(top) = top {
            self.top_color = top.color;
            self.top_temperature = top.temperature;
        }
        if let Some(bottom) = bottom {
            self.bottom_temperature = bottom.temperature;
            self.bottom_brightness = bottom.brightness;
        }
        self.scene = None;
        self.power = true;
    }
}

/// What the top bulb ends up showing after an immediate light command.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct TopOutcome {
    /// Set only for chromatic colors.
    pub(crate) color: Option<Rgb>,
    /// Set only when the hue field carried a temperature.
    pub(crate) temperature: Option<u16>,
}

impl fmt::Display for LampState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "power={}", if self.power { "on" } else { "off" })?;
        if let Some(scene) = self.scene {
            write!(f, " scene={}", scene)?;
        }
        match (self.top_color, self.top_temperature) {
            (Some(color), _) => write!(f, " top={}", color)?,
            (None, Some(kelvin)) => write!(f, " top={}K", kelvin)?,
            (None, None) => {}
        }
        write!(
            f,
            " bottom={}K/{}",
            self.bottom_temperature, self.bottom_brightness
        )
    }
}
