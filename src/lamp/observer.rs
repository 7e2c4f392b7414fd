//! Observability hook for the lamp engine.
//!
//! The engine reports what it does through a [`LampObserver`] instead of
//! logging on its own.

use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::Error;
use crate::protocol::{hex, Command};
use crate::transport::LampAddress;

#[derive(Debug)]
pub enum LampEvent<'a> {
    Connected { address: LampAddress },
    Disconnected { address: LampAddress },
    CharacteristicResolved { service: Uuid, characteristic: Uuid },
    CommandSent { command: &'a Command, packet: &'a [u8] },
    /// Best-effort teardown failed; nobody else gets to see this error.
    TeardownFailed { address: LampAddress, error: &'a Error },
}

pub trait LampObserver {
    fn on_event(&self, event: &LampEvent<'_>);
}

impl<F> LampObserver for F
where
    F: Fn(&LampEvent<'_>),
{
    fn on_event(&self, event: &LampEvent<'_>) {
        self(event)
    }
}

/// Forwards events to `tracing`.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingObserver;

impl LampObserver for TracingObserver {
    fn on_event(&self, event: &LampEvent<'_>) {
        match event {
            LampEvent::Connected { address } => info!(%address, "connected to lamp"),
            LampEvent::Disconnected { address } => info!(%address, "disconnected from lamp"),
            LampEvent::CharacteristicResolved { service, characteristic } => {
                debug!(%service, %characteristic, "found control characteristic")
            }
            LampEvent::CommandSent { command, packet } => {
                debug!(%command, packet = %hex(packet), "sent command")
            }
            LampEvent::TeardownFailed { address, error } => {
                warn!(%address, %error, "failed to disconnect from lamp")
            }
        }
    }
}

/// Discards events.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullObserver;

impl LampObserver for NullObserver {
    fn on_event(&self, _: &LampEvent<'_>) {}
}
