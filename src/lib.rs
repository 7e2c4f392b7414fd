//! Driver for the Luke Roberts "Lamp F" over Bluetooth Low Energy.
//!
//! High-level lighting intents (power, scene, color, temperature, brightness)
//! are turned into the lamp's binary command packets and written to its
//! control characteristic. The [`lamp::LampF`] engine owns the link, the
//! last-applied (optimistic) lamp state and the packet encoding.

pub mod color;
pub mod config;
pub mod error;
pub mod lamp;
pub mod protocol;
pub mod script;
pub mod transport;

pub use crate::error::{Error, Result};
pub use crate::lamp::{LampF, SmartLamp};
