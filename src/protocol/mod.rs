//! Lamp F command packets.
//!
//! Every packet starts with the `0xA0` prefix followed by a command group
//! and an opcode:
//!
//! * scene select: `A0 02 05 <scene>`
//! * top bulb temperature: `A0 02 04 <temp hi> <temp lo>`
//! * immediate light: `A0 01 02 <content> <duration hi> <duration lo>`,
//!   then the top block `<sat> <hue hi> <hue lo> <bri>` and/or the bottom
//!   block `<temp hi> <temp lo> <bri>` as flagged by the content byte.
//!
//! Multi-byte fields are big-endian.

use std::fmt;
use std::io::{self, Cursor};
use std::str::FromStr;

use byteorder::{BigEndian, ByteOrder, ReadBytesExt};
use thiserror::Error;

use crate::color::{Hls, Rgb};

pub const COMMAND_PREFIX: u8 = 0xA0;

const GROUP_IMMEDIATE: u8 = 0x01;
const GROUP_SETTINGS: u8 = 0x02;

const OP_IMMEDIATE_LIGHT: u8 = 0x02;
const OP_TEMPERATURE: u8 = 0x04;
const OP_SCENE: u8 = 0x05;

const CONTENT_TOP: u8 = 0x01;
const CONTENT_BOTTOM: u8 = 0x02;

/// Immediate light duration. Zero keeps the setting until the next command.
const DURATION_FOREVER: u16 = 0;

/// Lowest color temperature the lamp accepts, in Kelvin.
pub const MIN_TEMPERATURE: u16 = 2700;
/// Highest color temperature the lamp accepts, in Kelvin.
pub const MAX_TEMPERATURE: u16 = 4000;

/// Clamp a requested color temperature into the lamp's range.
pub fn clamp_temperature(kelvin: i64) -> u16 {
    kelvin.clamp(i64::from(MIN_TEMPERATURE), i64::from(MAX_TEMPERATURE)) as u16
}

/// Scenes of the lamp's factory configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Scene {
    Default = 0xFF,
    Shutdown = 0x00,
    Welcome = 0x01,
    Highlights = 0x02,
    Shiny = 0x03,
    CandleLight = 0x04,
    Indirect = 0x05,
    Reading = 0x06,
    Bright = 0x07,
}

impl Scene {
    pub const ALL: [Scene; 9] = [
        Scene::Default,
        Scene::Shutdown,
        Scene::Reading,
        Scene::CandleLight,
        Scene::Shiny,
        Scene::Welcome,
        Scene::Indirect,
        Scene::Highlights,
        Scene::Bright,
    ];

    /// The byte selecting this scene on the wire.
    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn from_code(code: u8) -> Option<Scene> {
        Scene::ALL.iter().copied().find(|scene| scene.code() == code)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Scene::Default => "default",
            Scene::Shutdown => "shutdown",
            Scene::Reading => "reading",
            Scene::CandleLight => "candle-light",
            Scene::Shiny => "shiny",
            Scene::Welcome => "welcome",
            Scene::Indirect => "indirect",
            Scene::Highlights => "highlights",
            Scene::Bright => "bright",
        }
    }
}

impl fmt::Display for Scene {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Scene {
    type Err = ProtocolError;

    /// Scene names are case-insensitive; `_` and `-` are interchangeable.
    fn from_str(s: &str) -> Result<Scene, ProtocolError> {
        let name = s.trim().to_ascii_lowercase().replace('_', "-");
        Scene::ALL
            .iter()
            .copied()
            .find(|scene| scene.as_str() == name)
            .ok_or_else(|| ProtocolError::UnknownSceneName(s.to_string()))
    }
}

/// Top bulb settings of an immediate light packet.
///
/// With a zero saturation the hue field carries a color temperature
/// instead of an angle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TopBlock {
    pub saturation: u8,
    pub hue: u16,
    pub brightness: u8,
}

impl TopBlock {
    /// Quantize an HLS color: 16-bit hue, 8-bit saturation and brightness.
    pub fn from_hls(hls: Hls) -> TopBlock {
        TopBlock {
            saturation: (hls.saturation * 255.0).round() as u8,
            hue: (hls.hue * 65535.0).round() as u16,
            brightness: (hls.luminance * 255.0).round() as u8,
        }
    }

    pub fn from_color(color: Rgb) -> TopBlock {
        TopBlock::from_hls(color.to_hls())
    }

    /// A pure temperature setting for the top bulb.
    pub fn temperature(value: u16) -> TopBlock {
        TopBlock {
            saturation: 0,
            hue: value,
            brightness: 0,
        }
    }

    pub fn is_chromatic(&self) -> bool {
        self.saturation != 0
    }
}

/// Bottom (main) bulb settings of an immediate light packet.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BottomBlock {
    pub temperature: u16,
    pub brightness: u8,
}

/// Commands understood by the lamp's external API characteristic.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    /// Switch to a stored scene.
    SelectScene(Scene),
    /// Set the top bulb's color temperature.
    TopTemperature(u16),
    /// Set top and/or bottom bulbs outside of any scene. At least one block is present.
    ImmediateLight {
        top: Option<TopBlock>,
        bottom: Option<BottomBlock>,
    },
}

pub type ProtocolResult<T> = Result<T, ProtocolError>;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ProtocolError {
    #[error("invalid command prefix {0:#04x}")]
    InvalidPrefix(u8),
    #[error("unknown command {group:#04x}/{opcode:#04x}")]
    UnknownCommand { group: u8, opcode: u8 },
    #[error("unknown scene code {0:#04x}")]
    UnknownScene(u8),
    #[error("unknown scene name {0:?}")]
    UnknownSceneName(String),
    #[error("invalid immediate light content {0:#04x}")]
    InvalidContent(u8),
    #[error("unsupported immediate light duration {0}")]
    UnsupportedDuration(u16),
    #[error("packet truncated")]
    Truncated,
    #[error("{0} unexpected trailing bytes")]
    TrailingBytes(usize),
}

/// Reads from a slice only fail when running out of data.
impl From<io::Error> for ProtocolError {
    fn from(_: io::Error) -> ProtocolError {
        ProtocolError::Truncated
    }
}

fn push_u16(packet: &mut Vec<u8>, value: u16) {
    let mut bytes = [0; 2];
    BigEndian::write_u16(&mut bytes, value);
    packet.extend_from_slice(&bytes);
}

impl Command {
    /// Build an immediate light command, or nothing if neither block is set.
    pub fn immediate_light(top: Option<TopBlock>, bottom: Option<BottomBlock>) -> Option<Command> {
        if top.is_none() && bottom.is_none() {
            return None;
        }
        Some(Command::ImmediateLight { top, bottom })
    }

    /// Encoded size in bytes.
    pub fn len(&self) -> usize {
        match self {
            Command::SelectScene(_) => 4,
            Command::TopTemperature(_) => 5,
            Command::ImmediateLight { top, bottom } => {
                6 + top.map_or(0, |_| 4) + bottom.map_or(0, |_| 3)
            }
        }
    }

    pub fn encode(&self) -> Vec<u8> {
        let mut packet = Vec::with_capacity(self.len());
        packet.push(COMMAND_PREFIX);

        match self {
            Command::SelectScene(scene) => {
                packet.extend_from_slice(&[GROUP_SETTINGS, OP_SCENE, scene.code()]);
            }
            Command::TopTemperature(kelvin) => {
                packet.extend_from_slice(&[GROUP_SETTINGS, OP_TEMPERATURE]);
                push_u16(&mut packet, *kelvin);
            }
            Command::ImmediateLight { top, bottom } => {
                let mut content = 0;
                if top.is_some() {
                    content |= CONTENT_TOP;
                }
                if bottom.is_some() {
                    content |= CONTENT_BOTTOM;
                }
                packet.extend_from_slice(&[GROUP_IMMEDIATE, OP_IMMEDIATE_LIGHT, content]);
                push_u16(&mut packet, DURATION_FOREVER);

                if let Some(top) = top {
                    packet.push(top.saturation);
                    push_u16(&mut packet, top.hue);
                    packet.push(top.brightness);
                }
                if let Some(bottom) = bottom {
                    push_u16(&mut packet, bottom.temperature);
                    packet.push(bottom.brightness);
                }
            }
        }

        packet
    }

    /// Parse a single packet. The whole buffer must be consumed.
    pub fn decode(buf: &[u8]) -> ProtocolResult<Command> {
        let mut reader = Cursor::new(buf);

        let prefix = reader.read_u8()?;
        if prefix != COMMAND_PREFIX {
            return Err(ProtocolError::InvalidPrefix(prefix));
        }

        let group = reader.read_u8()?;
        let opcode = reader.read_u8()?;
        let command = match (group, opcode) {
            (GROUP_SETTINGS, OP_SCENE) => {
                let code = reader.read_u8()?;
                let scene = Scene::from_code(code).ok_or(ProtocolError::UnknownScene(code))?;
                Command::SelectScene(scene)
            }
            (GROUP_SETTINGS, OP_TEMPERATURE) => {
                Command::TopTemperature(reader.read_u16::<BigEndian>()?)
            }
            (GROUP_IMMEDIATE, OP_IMMEDIATE_LIGHT) => Self::read_immediate_light(&mut reader)?,
            _ => return Err(ProtocolError::UnknownCommand { group, opcode }),
        };

        let trailing = buf.len() - reader.position() as usize;
        if trailing != 0 {
            return Err(ProtocolError::TrailingBytes(trailing));
        }
        Ok(command)
    }

    fn read_immediate_light(reader: &mut Cursor<&[u8]>) -> ProtocolResult<Command> {
        let content = reader.read_u8()?;
        if content == 0 || content & !(CONTENT_TOP | CONTENT_BOTTOM) != 0 {
            return Err(ProtocolError::InvalidContent(content));
        }

        let duration = reader.read_u16::<BigEndian>()?;
        if duration != DURATION_FOREVER {
            return Err(ProtocolError::UnsupportedDuration(duration));
        }

        let top = if content & CONTENT_TOP != 0 {
            Some(TopBlock {
                saturation: reader.read_u8()?,
                hue: reader.read_u16::<BigEndian>()?,
                brightness: reader.read_u8()?,
            })
        } else {
            None
        };

        let bottom = if content & CONTENT_BOTTOM != 0 {
            Some(BottomBlock {
                temperature: reader.read_u16::<BigEndian>()?,
                brightness: reader.read_u8()?,
            })
        } else {
            None
        };

        Ok(Command::ImmediateLight { top, bottom })
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::SelectScene(scene) => write!(f, "scene {}", scene),
            Command::TopTemperature(kelvin) => write!(f, "top temperature {}K", kelvin),
            Command::ImmediateLight { top, bottom } => {
                f.write_str("immediate light")?;
                if let Some(top) = top {
                    write!(
                        f,
                        " top(sat={} hue={} bri={})",
                        top.saturation, top.hue, top.brightness
                    )?;
                }
                if let Some(bottom) = bottom {
                    write!(f, " bottom({}K bri={})", bottom.temperature, bottom.brightness)?;
                }
                Ok(())
            }
        }
    }
}

/// Format packet bytes as space-separated uppercase hex.
pub fn hex(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|byte| format!("{:02X}", byte))
        .collect::<Vec<_>>()
        .join(" ")
}
