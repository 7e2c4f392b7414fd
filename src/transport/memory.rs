//! In-process transport.
//!
//! Records every packet instead of sending it anywhere. Used for dry runs
//! and for exercising the engine without a lamp. Clones share the same
//! recording, so a handle kept outside the engine can inspect it.

use std::io;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::trace;
use uuid::Uuid;

use super::{GattTransport, LampIdentity, TransportError};
use super::{CONTROL_CHARACTERISTIC_UUID, SERVICE_UUID};

/// Characteristic handle handed out by [`MemoryTransport`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MemoryCharacteristic {
    pub service: Uuid,
    pub uuid: Uuid,
}

#[derive(Debug, Default)]
struct Bus {
    /// The currently linked device.
    connected: Option<LampIdentity>,
    /// Refuse links.
    unreachable: bool,
    /// Pretend the control characteristic does not exist.
    missing_characteristic: bool,
    /// Fail every write.
    fail_writes: bool,
    /// Fail disconnect requests (the link is dropped anyway).
    fail_disconnect: bool,
    connects: usize,
    disconnects: usize,
    discoveries: usize,
    /// Packets written so far, oldest first.
    writes: Vec<Vec<u8>>,
}

#[derive(Clone, Debug, Default)]
pub struct MemoryTransport {
    bus: Arc<Mutex<Bus>>,
}

impl MemoryTransport {
    pub fn new() -> MemoryTransport {
        MemoryTransport::default()
    }

    fn bus(&self) -> MutexGuard<'_, Bus> {
        self.bus.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn set_reachable(&self, reachable: bool) {
        self.bus().unreachable = !reachable;
    }

    pub fn set_characteristic_present(&self, present: bool) {
        self.bus().missing_characteristic = !present;
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.bus().fail_writes = fail;
    }

    pub fn set_fail_disconnect(&self, fail: bool) {
        self.bus().fail_disconnect = fail;
    }

    pub fn is_connected(&self) -> bool {
        self.bus().connected.is_some()
    }

    /// Who the current link was opened to.
    pub fn connected_to(&self) -> Option<LampIdentity> {
        self.bus().connected
    }

    pub fn connects(&self) -> usize {
        self.bus().connects
    }

    pub fn disconnects(&self) -> usize {
        self.bus().disconnects
    }

    pub fn discoveries(&self) -> usize {
        self.bus().discoveries
    }

    /// All packets written so far.
    pub fn writes(&self) -> Vec<Vec<u8>> {
        self.bus().writes.clone()
    }

    pub fn last_write(&self) -> Option<Vec<u8>> {
        self.bus().writes.last().cloned()
    }
}

impl GattTransport for MemoryTransport {
    type Characteristic = MemoryCharacteristic;

    fn connect(&mut self, identity: &LampIdentity) -> Result<(), TransportError> {
        let mut bus = self.bus();
        if bus.unreachable {
            return Err(TransportError::Unreachable(identity.address()));
        }
        bus.connects += 1;
        bus.connected = Some(*identity);
        Ok(())
    }

    fn disconnect(&mut self) -> Result<(), TransportError> {
        let mut bus = self.bus();
        bus.disconnects += 1;
        bus.connected = None;
        if bus.fail_disconnect {
            return Err(TransportError::Other("disconnect refused".to_string()));
        }
        Ok(())
    }

    fn discover_characteristic(
        &mut self,
        service: Uuid,
        characteristic: Uuid,
    ) -> Result<Option<MemoryCharacteristic>, TransportError> {
        let mut bus = self.bus();
        if bus.connected.is_none() {
            return Err(TransportError::NotConnected);
        }
        bus.discoveries += 1;

        let present = !bus.missing_characteristic
            && service == SERVICE_UUID
            && characteristic == CONTROL_CHARACTERISTIC_UUID;
        Ok(if present {
            Some(MemoryCharacteristic {
                service,
                uuid: characteristic,
            })
        } else {
            None
        })
    }

    fn write_without_response(
        &mut self,
        characteristic: &MemoryCharacteristic,
        data: &[u8],
    ) -> Result<(), TransportError> {
        let mut bus = self.bus();
        if bus.connected.is_none() {
            return Err(TransportError::NotConnected);
        }
        if bus.fail_writes {
            return Err(io::Error::from(io::ErrorKind::BrokenPipe).into());
        }
        trace!(characteristic = %characteristic.uuid, len = data.len(), "recorded write");
        bus.writes.push(data.to_vec());
        Ok(())
    }
}
