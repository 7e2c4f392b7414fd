//! Bluetooth LE transport backed by `btleplug`.
//!
//! `btleplug` is asynchronous; this transport owns a single-threaded tokio
//! runtime and blocks on every call, so the engine stays synchronous.
//! Peripheral handles can only be obtained from a scan, so connecting runs
//! a short scan until the configured address shows up.

use std::time::{Duration, Instant};

use btleplug::api::{BDAddr, Central, Characteristic, Manager as _, Peripheral as _, ScanFilter, WriteType};
use btleplug::platform::{Adapter, Manager, Peripheral};
use tokio::runtime::{Builder, Runtime};
use tracing::debug;
use uuid::Uuid;

use super::{GattTransport, LampIdentity, TransportError};

const SCAN_POLL_INTERVAL: Duration = Duration::from_millis(250);

pub struct BtleTransport {
    runtime: Runtime,
    /// Index of the host adapter to use.
    adapter_index: usize,
    /// How long to look for the lamp before giving up.
    scan_timeout: Duration,
    peripheral: Option<Peripheral>,
}

impl BtleTransport {
    pub fn new(adapter_index: usize, scan_timeout: Duration) -> Result<BtleTransport, TransportError> {
        let runtime = Builder::new_current_thread().enable_all().build()?;
        Ok(BtleTransport {
            runtime,
            adapter_index,
            scan_timeout,
            peripheral: None,
        })
    }
}

async fn adapter(index: usize) -> Result<Adapter, TransportError> {
    let manager = Manager::new().await?;
    manager
        .adapters()
        .await?
        .into_iter()
        .nth(index)
        .ok_or_else(|| TransportError::Other(format!("no Bluetooth adapter #{}", index)))
}

async fn find_peripheral(
    adapter: &Adapter,
    address: BDAddr,
    timeout: Duration,
) -> Result<Option<Peripheral>, TransportError> {
    adapter.start_scan(ScanFilter::default()).await?;

    let started = Instant::now();
    let mut found = None;
    while found.is_none() && started.elapsed() < timeout {
        found = adapter
            .peripherals()
            .await?
            .into_iter()
            .find(|peripheral| peripheral.address() == address);
        if found.is_none() {
            tokio::time::sleep(SCAN_POLL_INTERVAL).await;
        }
    }

    adapter.stop_scan().await?;
    Ok(found)
}

impl GattTransport for BtleTransport {
    type Characteristic = Characteristic;

    fn connect(&mut self, identity: &LampIdentity) -> Result<(), TransportError> {
        let address = BDAddr::from(identity.address().octets());
        let adapter_index = self.adapter_index;
        let scan_timeout = self.scan_timeout;

        let peripheral = self.runtime.block_on(async move {
            let adapter = adapter(adapter_index).await?;
            let peripheral = find_peripheral(&adapter, address, scan_timeout)
                .await?
                .ok_or(TransportError::Unreachable(identity.address()))?;
            if !peripheral.is_connected().await? {
                peripheral.connect().await?;
            }
            Ok::<_, TransportError>(peripheral)
        })?;

        debug!(address = %identity.address(), address_type = ?identity.address_type(), "BLE link up");
        self.peripheral = Some(peripheral);
        Ok(())
    }

    fn disconnect(&mut self) -> Result<(), TransportError> {
        match self.peripheral.take() {
            Some(peripheral) => self.runtime.block_on(peripheral.disconnect()).map_err(Into::into),
            None => Ok(()),
        }
    }

    fn discover_characteristic(
        &mut self,
        service: Uuid,
        characteristic: Uuid,
    ) -> Result<Option<Characteristic>, TransportError> {
        let peripheral = self.peripheral.as_ref().ok_or(TransportError::NotConnected)?;
        self.runtime.block_on(peripheral.discover_services())?;

        Ok(peripheral
            .services()
            .into_iter()
            .find(|s| s.uuid == service)
            .and_then(|s| s.characteristics.into_iter().find(|c| c.uuid == characteristic)))
    }

    fn write_without_response(
        &mut self,
        characteristic: &Characteristic,
        data: &[u8],
    ) -> Result<(), TransportError> {
        let peripheral = self.peripheral.as_ref().ok_or(TransportError::NotConnected)?;
        self.runtime
            .block_on(peripheral.write(characteristic, data, WriteType::WithoutResponse))
            .map_err(Into::into)
    }
}
