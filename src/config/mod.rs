use std::path::Path;
use std::{fs, io};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::lamp::{LampState, DEFAULT_BOTTOM_BRIGHTNESS, DEFAULT_BOTTOM_TEMPERATURE};
use crate::protocol::{MAX_TEMPERATURE, MIN_TEMPERATURE};
use crate::transport::{LampAddress, LampIdentity};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Root {
    /// The lamp to drive.
    pub lamp: Lamp,
    /// How to reach it.
    #[serde(default)]
    pub transport: Transport,
    /// State assumed before the first command.
    #[serde(default)]
    pub assumed: AssumedState,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Lamp {
    /// Bluetooth address, e.g. `C4:AC:05:42:73:A4`.
    pub address: LampAddress,
    /// Human-readable name.
    pub name: Option<String>,
}

/// Transport configuration.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase", tag = "type")]
pub enum Transport {
    /// Real BLE through the host's Bluetooth stack.
    Btleplug {
        /// Index of the Bluetooth adapter.
        #[serde(default)]
        adapter: usize,
        /// How long to scan for the lamp when connecting.
        #[serde(rename = "scanTimeoutMs", default = "default_scan_timeout_ms")]
        scan_timeout_ms: u64,
    },
    /// Log packets instead of sending them.
    DryRun,
}

fn default_scan_timeout_ms() -> u64 {
    10_000
}

impl Default for Transport {
    fn default() -> Transport {
        Transport::Btleplug {
            adapter: 0,
            scan_timeout_ms: default_scan_timeout_ms(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AssumedState {
    pub bottom_temperature: u16,
    pub bottom_brightness: u8,
}

impl Default for AssumedState {
    fn default() -> AssumedState {
        AssumedState {
            bottom_temperature: DEFAULT_BOTTOM_TEMPERATURE,
            bottom_brightness: DEFAULT_BOTTOM_BRIGHTNESS,
        }
    }
}

impl Root {
    pub fn identity(&self) -> LampIdentity {
        LampIdentity::new(self.lamp.address)
    }

    pub fn name(&self) -> String {
        self.lamp
            .name
            .clone()
            .unwrap_or_else(|| format!("LampF-{}", self.lamp.address))
    }

    pub fn assumed_state(&self) -> LampState {
        LampState::assumed(
            i64::from(self.assumed.bottom_temperature),
            self.assumed.bottom_brightness,
        )
    }

    /// Quick sanity check for the configuration.
    pub fn validate(&self) -> Result<()> {
        let temperature = self.assumed.bottom_temperature;
        if !(MIN_TEMPERATURE..=MAX_TEMPERATURE).contains(&temperature) {
            return Err(Error::InvalidConfig(format!(
                "assumed bottom temperature {} outside {}..={}",
                temperature, MIN_TEMPERATURE, MAX_TEMPERATURE
            )));
        }
        if let Transport::Btleplug { scan_timeout_ms: 0, .. } = self.transport {
            return Err(Error::InvalidConfig("scan timeout must not be zero".to_string()));
        }
        Ok(())
    }
}

pub fn parse_config_yaml(text: &str) -> Result<Root> {
    let root: Root = serde_yaml::from_str(text)?;
    root.validate()?;
    Ok(root)
}

pub fn read_config_yaml<T: AsRef<Path>>(path: T) -> Result<Root> {
    let text = fs::read_to_string(path)?;
    parse_config_yaml(&text)
}

pub fn read_config_json<T: AsRef<Path>>(path: T) -> Result<Root> {
    let file = fs::File::open(path)?;
    let reader = io::BufReader::new(file);
    let root: Root = serde_json::from_reader(reader)?;
    root.validate()?;
    Ok(root)
}
