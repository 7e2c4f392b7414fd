//! Link lifecycle and the control characteristic that comes with it.

use crate::error::{Error, Result};
use crate::transport::{GattTransport, LampIdentity, TransportError};
use crate::transport::{CONTROL_CHARACTERISTIC_UUID, SERVICE_UUID};

use super::observer::{LampEvent, LampObserver};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connected,
}

/// A link only counts as up once its control characteristic is known.
enum Link<C> {
    Disconnected,
    Connected(C),
}

pub(crate) struct Connection<T: GattTransport> {
    transport: T,
    link: Link<T::Characteristic>,
}

impl<T: GattTransport> Connection<T> {
    pub(crate) fn new(transport: T) -> Connection<T> {
        Connection {
            transport,
            link: Link::Disconnected,
        }
    }

    pub(crate) fn state(&self) -> ConnectionState {
        match self.link {
            Link::Disconnected => ConnectionState::Disconnected,
            Link::Connected(_) => ConnectionState::Connected,
        }
    }

    /// Bring the link up and resolve the control characteristic, unless
    /// already connected. No retries.
    ///
    /// A peripheral without the characteristic is dropped again right away,
    /// so a later call starts over with a fresh link.
    pub(crate) fn connect_if_needed(
        &mut self,
        identity: &LampIdentity,
        observer: &dyn LampObserver,
    ) -> Result<()> {
        if let Link::Connected(_) = self.link {
            return Ok(());
        }

        self.transport
            .connect(identity)
            .map_err(|source| Error::Connection {
                address: identity.address(),
                source,
            })?;
        observer.on_event(&LampEvent::Connected {
            address: identity.address(),
        });

        match self.resolve_characteristic() {
            Ok(characteristic) => {
                observer.on_event(&LampEvent::CharacteristicResolved {
                    service: SERVICE_UUID,
                    characteristic: CONTROL_CHARACTERISTIC_UUID,
                });
                self.link = Link::Connected(characteristic);
                Ok(())
            }
            Err(err) => {
                if let Err(source) = self.transport.disconnect() {
                    observer.on_event(&LampEvent::TeardownFailed {
                        address: identity.address(),
                        error: &Error::Disconnect(source),
                    });
                }
                observer.on_event(&LampEvent::Disconnected {
                    address: identity.address(),
                });
                Err(err)
            }
        }
    }

    /// Tear the link down.
    ///
    /// The transport is always asked to disconnect and the local state is
    /// always cleared, even when the transport reports an error.
    pub(crate) fn disconnect(
        &mut self,
        identity: &LampIdentity,
        observer: &dyn LampObserver,
    ) -> Result<()> {
        let was_connected = matches!(self.link, Link::Connected(_));
        self.link = Link::Disconnected;

        let result = self.transport.disconnect().map_err(Error::Disconnect);
        if was_connected {
            observer.on_event(&LampEvent::Disconnected {
                address: identity.address(),
            });
        }
        result
    }

    fn resolve_characteristic(&mut self) -> Result<T::Characteristic> {
        let not_found = |source| Error::CharacteristicNotFound {
            service: SERVICE_UUID,
            characteristic: CONTROL_CHARACTERISTIC_UUID,
            source,
        };

        self.transport
            .discover_characteristic(SERVICE_UUID, CONTROL_CHARACTERISTIC_UUID)
            .map_err(|source| not_found(Some(source)))?
            .ok_or_else(|| not_found(None))
    }

    /// Write a packet to the control characteristic.
    pub(crate) fn write(&mut self, packet: &[u8]) -> Result<()> {
        match &self.link {
            Link::Connected(characteristic) => self
                .transport
                .write_without_response(characteristic, packet)
                .map_err(Error::TransportWrite),
            Link::Disconnected => Err(Error::TransportWrite(TransportError::NotConnected)),
        }
    }
}
