//! A small textual language for driving the lamp from the command line.
//!
//! A script is a sequence of actions, each a keyword followed by its
//! arguments:
//!
//! ```text
//! scene indirect sleep 5000 color f080f0 sleep 5000
//! light bottom-brightness=10 bottom-temperature=250 top=ff7777
//! ```

use std::str::FromStr;
use std::thread;
use std::time::Duration;

use crate::color::Rgb;
use crate::error::{Error, Result};
use crate::lamp::{ImmediateLight, LampF, SmartLamp};
use crate::protocol::Scene;
use crate::transport::GattTransport;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    Connect,
    Disconnect,
    /// Plain power switch through the default/shutdown scenes.
    Power(bool),
    /// Power on and set the main bulb brightness (full if omitted).
    TurnOn(Option<u8>),
    TurnOff,
    Scene(Scene),
    /// Top bulb color, `None` for white.
    Color(Option<Rgb>),
    TopTemperature(i64),
    BottomTemperature(i64),
    BottomBrightness(u8),
    Light(ImmediateLight),
    Sleep(Duration),
}

fn invalid(message: String) -> Error {
    Error::InvalidArgument(message)
}

fn parse_number<N: FromStr>(keyword: &str, word: Option<&str>) -> Result<N> {
    let word = word.ok_or_else(|| invalid(format!("{} needs a value", keyword)))?;
    word.parse()
        .map_err(|_| invalid(format!("{}: not a valid number: {:?}", keyword, word)))
}

fn parse_switch(word: Option<&str>) -> Result<bool> {
    match word {
        Some("on") | Some("true") | Some("1") => Ok(true),
        Some("off") | Some("false") | Some("0") => Ok(false),
        other => Err(invalid(format!("power must be on or off, got {:?}", other))),
    }
}

fn parse_color(word: Option<&str>) -> Result<Option<Rgb>> {
    match word {
        None => Err(invalid("color needs a value".to_string())),
        Some("none") | Some("white") => Ok(None),
        Some(hex) => hex.parse().map(Some),
    }
}

fn parse_light_field(light: ImmediateLight, field: &str) -> Result<ImmediateLight> {
    let (key, value) = field
        .split_once('=')
        .ok_or_else(|| invalid(format!("light: expected key=value, got {:?}", field)))?;
    Ok(match key {
        "top" | "top-color" => light.top_color(value.parse()?),
        "top-temperature" => light.top_temperature(parse_number(key, Some(value))?),
        "bottom-temperature" => light.bottom_temperature(parse_number(key, Some(value))?),
        "bottom-brightness" => light.bottom_brightness(parse_number(key, Some(value))?),
        _ => return Err(invalid(format!("light: unknown field {:?}", key))),
    })
}

/// Parse a whitespace-separated sequence of words into actions.
pub fn parse_script<I, S>(words: I) -> Result<Vec<Action>>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let words: Vec<S> = words.into_iter().collect();
    let mut words = words.iter().map(<S as AsRef<str>>::as_ref).peekable();
    let mut actions = vec![];

    while let Some(keyword) = words.next() {
        let action = match keyword {
            "connect" => Action::Connect,
            "disconnect" => Action::Disconnect,
            "power" => Action::Power(parse_switch(words.next())?),
            "on" => {
                // Brightness is optional.
                let brightness = words.peek().and_then(|word| word.parse::<u8>().ok());
                if brightness.is_some() {
                    words.next();
                }
                Action::TurnOn(brightness)
            }
            "off" => Action::TurnOff,
            "scene" => {
                let name = words
                    .next()
                    .ok_or_else(|| invalid("scene needs a name".to_string()))?;
                Action::Scene(name.parse()?)
            }
            "color" => Action::Color(parse_color(words.next())?),
            "top-temperature" => Action::TopTemperature(parse_number(keyword, words.next())?),
            "bottom-temperature" => {
                Action::BottomTemperature(parse_number(keyword, words.next())?)
            }
            "bottom-brightness" | "brightness" => {
                Action::BottomBrightness(parse_number(keyword, words.next())?)
            }
            "light" => {
                let mut light = ImmediateLight::new();
                while let Some(field) = words.peek().copied().filter(|word| word.contains('=')) {
                    words.next();
                    light = parse_light_field(light, field)?;
                }
                Action::Light(light)
            }
            "sleep" => Action::Sleep(Duration::from_millis(parse_number(keyword, words.next())?)),
            _ => return Err(invalid(format!("unknown action {:?}", keyword))),
        };
        actions.push(action);
    }

    Ok(actions)
}

impl Action {
    pub fn apply<T: GattTransport>(&self, lamp: &mut LampF<T>) -> Result<()> {
        match *self {
            Action::Connect => lamp.connect_if_needed(),
            Action::Disconnect => lamp.disconnect(),
            Action::Power(on) => lamp.set_power(on),
            Action::TurnOn(brightness) => lamp.turn_on(brightness),
            Action::TurnOff => lamp.turn_off(),
            Action::Scene(scene) => lamp.set_scene(Some(scene)),
            Action::Color(color) => lamp.set_color(color),
            Action::TopTemperature(kelvin) => lamp.set_top_temperature(kelvin),
            Action::BottomTemperature(kelvin) => lamp.set_bottom_temperature(kelvin),
            Action::BottomBrightness(brightness) => lamp.set_bottom_brightness(brightness),
            Action::Light(ref light) => lamp.immediate_light(light),
            Action::Sleep(duration) => {
                thread::sleep(duration);
                Ok(())
            }
        }
    }
}

/// Run actions in order, stopping at the first failure.
pub fn run<T: GattTransport>(lamp: &mut LampF<T>, actions: &[Action]) -> Result<()> {
    actions.iter().try_for_each(|action| action.apply(lamp))
}
