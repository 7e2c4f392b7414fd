//! Immediate light requests and how they resolve against the current state.

use crate::color::Rgb;
use crate::error::Result;
use crate::protocol::{clamp_temperature, BottomBlock, Command, TopBlock};

use super::state::{LampState, TopOutcome};

/// A partial update of the top and bottom bulbs.
///
/// Every field is optional. A top color that is chromatic wins over a top
/// temperature; a gray top color (zero saturation) lets the temperature
/// through in the hue field. Bottom values that are left out are carried
/// over from the lamp state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ImmediateLight {
    pub top_color: Option<Rgb>,
    pub top_temperature: Option<u16>,
    pub bottom_temperature: Option<i64>,
    pub bottom_brightness: Option<u8>,
}

impl ImmediateLight {
    pub fn new() -> ImmediateLight {
        ImmediateLight::default()
    }

    pub fn top_color(mut self, color: Rgb) -> ImmediateLight {
        self.top_color = Some(color);
        self
    }

    /// Set the top color from raw channel values. See [`Rgb::from_channels`].
    pub fn top_channels(self, channels: &[i64]) -> Result<ImmediateLight> {
        Ok(self.top_color(Rgb::from_channels(channels)?))
    }

    pub fn top_temperature(mut self, value: u16) -> ImmediateLight {
        self.top_temperature = Some(value);
        self
    }

    /// Bottom bulb temperature in Kelvin, clamped when resolved.
    pub fn bottom_temperature(mut self, kelvin: i64) -> ImmediateLight {
        self.bottom_temperature = Some(kelvin);
        self
    }

    pub fn bottom_brightness(mut self, brightness: u8) -> ImmediateLight {
        self.bottom_brightness = Some(brightness);
        self
    }

    pub fn is_empty(&self) -> bool {
        *self == ImmediateLight::default()
    }
}

/// A resolved immediate light request: the packet and the state it leads to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct LightPlan {
    pub(crate) command: Command,
    pub(crate) top: Option<TopOutcome>,
    pub(crate) bottom: Option<BottomBlock>,
}

/// Resolve a request. `None` means there is nothing to send.
pub(crate) fn plan(request: &ImmediateLight, state: &LampState) -> Option<LightPlan> {
    let mut top = request.top_color.map(TopBlock::from_color);
    let mut top_temperature = None;

    if let Some(value) = request.top_temperature {
        match top.as_mut() {
            Some(block) if block.is_chromatic() => {}
            Some(block) => {
                block.hue = value;
                top_temperature = Some(value);
            }
            None => {
                top = Some(TopBlock::temperature(value));
                top_temperature = Some(value);
            }
        }
    }

    let top_outcome = top.map(|block| TopOutcome {
        color: request.top_color.filter(|_| block.is_chromatic()),
        temperature: top_temperature,
    });

    let bottom = if request.bottom_temperature.is_some() || request.bottom_brightness.is_some() {
        Some(BottomBlock {
            temperature: request
                .bottom_temperature
                .map(clamp_temperature)
                .unwrap_or_else(|| state.bottom_temperature()),
            brightness: request
                .bottom_brightness
                .unwrap_or_else(|| state.bottom_brightness()),
        })
    } else {
        None
    };

    let command = Command::immediate_light(top, bottom)?;
    Some(LightPlan {
        command,
        top: top_outcome,
        bottom,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_request_plans_nothing() {
        assert!(ImmediateLight::new().is_empty());
        assert_eq!(plan(&ImmediateLight::new(), &LampState::default()), None);
    }

    #[test]
    fn chromatic_color_ignores_temperature() {
        let request = ImmediateLight::new()
            .top_color(Rgb::new(255, 0, 0))
            .top_temperature(3000);
        let plan = plan(&request, &LampState::default()).unwrap();

        assert_eq!(
            plan.command,
            Command::ImmediateLight {
                top: Some(TopBlock { saturation: 255, hue: 0, brightness: 128 }),
                bottom: None,
            }
        );
        assert_eq!(
            plan.top,
            Some(TopOutcome { color: Some(Rgb::new(255, 0, 0)), temperature: None })
        );
    }

    #[test]
    fn gray_color_carries_temperature() {
        let request = ImmediateLight::new()
            .top_color(Rgb::new(200, 200, 200))
            .top_temperature(3000);
        let plan = plan(&request, &LampState::default()).unwrap();

        assert_eq!(
            plan.command,
            Command::ImmediateLight {
                top: Some(TopBlock { saturation: 0, hue: 3000, brightness: 200 }),
                bottom: None,
            }
        );
        assert_eq!(plan.top, Some(TopOutcome { color: None, temperature: Some(3000) }));
    }

    #[test]
    fn temperature_alone_drives_top() {
        let plan = plan(&ImmediateLight::new().top_temperature(2900), &LampState::default()).unwrap();
        assert_eq!(
            plan.command,
            Command::ImmediateLight { top: Some(TopBlock::temperature(2900)), bottom: None }
        );
    }

    #[test]
    fn bottom_carries_over_missing_half() {
        let state = LampState::assumed(3100, 42);
        let plan = plan(&ImmediateLight::new().bottom_temperature(9000), &state).unwrap();
        assert_eq!(plan.bottom, Some(BottomBlock { temperature: 4000, brightness: 42 }));
        assert_eq!(plan.top, None);
    }
}
