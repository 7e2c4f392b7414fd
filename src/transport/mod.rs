//! GATT transports carry command packets to the lamp.

use std::fmt;
use std::io;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

pub mod memory;
pub use self::memory::MemoryTransport;

#[cfg(feature = "btleplug")]
pub mod btle;
#[cfg(feature = "btleplug")]
pub use self::btle::BtleTransport;

/// Service of the lamp's external API.
pub const SERVICE_UUID: Uuid = Uuid::from_u128(0x44092840_0567_11e6_b862_0002a5d5c51b);
/// Control characteristic of the lamp's external API.
pub const CONTROL_CHARACTERISTIC_UUID: Uuid =
    Uuid::from_u128(0x44092842_0567_11e6_b862_0002a5d5c51b);

/// A 48-bit Bluetooth device address, most significant byte first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LampAddress([u8; 6]);

impl LampAddress {
    pub const fn new(octets: [u8; 6]) -> LampAddress {
        LampAddress(octets)
    }

    pub fn octets(&self) -> [u8; 6] {
        self.0
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid Bluetooth address {0:?}")]
pub struct AddressParseError(String);

impl FromStr for LampAddress {
    type Err = AddressParseError;

    /// Parse the `C4:AC:05:42:73:A4` form. `-` is accepted as separator too.
    fn from_str(s: &str) -> Result<LampAddress, AddressParseError> {
        let err = || AddressParseError(s.to_string());

        let mut octets = [0u8; 6];
        let mut parts = s.trim().split(|c| c == ':' || c == '-');
        for octet in octets.iter_mut() {
            let part = parts.next().ok_or_else(err)?;
            if part.len() != 2 || !part.chars().all(|c| c.is_ascii_hexdigit()) {
                return Err(err());
            }
            *octet = u8::from_str_radix(part, 16).map_err(|_| err())?;
        }
        if parts.next().is_some() {
            return Err(err());
        }

        Ok(LampAddress(octets))
    }
}

impl TryFrom<String> for LampAddress {
    type Error = AddressParseError;

    fn try_from(s: String) -> Result<LampAddress, AddressParseError> {
        s.parse()
    }
}

impl From<LampAddress> for String {
    fn from(address: LampAddress) -> String {
        address.to_string()
    }
}

impl fmt::Display for LampAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d, e, g] = self.0;
        write!(
            f,
            "{:02X}:{:02X}:{:02X}:{:02X}:{:02X}:{:02X}",
            a, b, c, d, e, g
        )
    }
}

/// Bluetooth LE address type. Lamp F only advertises a random static address.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AddressType {
    Random,
}

/// Who we talk to. Lamp F advertises with a random static address.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LampIdentity {
    address: LampAddress,
    address_type: AddressType,
}

impl LampIdentity {
    pub fn new(address: LampAddress) -> LampIdentity {
        LampIdentity {
            address,
            address_type: AddressType::Random,
        }
    }

    pub fn address(&self) -> LampAddress {
        self.address
    }

    pub fn address_type(&self) -> AddressType {
        self.address_type
    }
}

/// Failures reported by a transport backend.
#[derive(Error, Debug)]
pub enum TransportError {
    /// The device could not be found or did not answer.
    #[error("device {0} is unreachable")]
    Unreachable(LampAddress),
    /// An operation needing a link was attempted without one.
    #[error("not connected")]
    NotConnected,
    #[error(transparent)]
    Io(#[from] io::Error),
    #[cfg(feature = "btleplug")]
    #[error(transparent)]
    Ble(#[from] btleplug::Error),
    #[error("{0}")]
    Other(String),
}

/// A blocking GATT client able to reach one peripheral at a time.
///
/// Implementations do not retry and do not time out on their own
/// unless documented otherwise.
pub trait GattTransport {
    /// Handle to a discovered characteristic, valid while the link is up.
    type Characteristic;

    /// Establish a link to the lamp.
    fn connect(&mut self, identity: &LampIdentity) -> Result<(), TransportError>;

    /// Tear the link down. Must tolerate being called without a link.
    fn disconnect(&mut self) -> Result<(), TransportError>;

    /// Discover services and look up a characteristic.
    ///
    /// Returns `Ok(None)` when the service or characteristic is absent.
    fn discover_characteristic(
        &mut self,
        service: Uuid,
        characteristic: Uuid,
    ) -> Result<Option<Self::Characteristic>, TransportError>;

    /// Write a value without waiting for an acknowledgement.
    fn write_without_response(
        &mut self,
        characteristic: &Self::Characteristic,
        data: &[u8],
    ) -> Result<(), TransportError>;
}
