//! The Lamp F command engine.
//!
//! [`LampF`] connects lazily on the first command, keeps the last-applied
//! state and encodes every change into a packet for the lamp's control
//! characteristic. It is meant for one caller issuing one command at a
//! time; every call blocks for the BLE round-trip.

use std::ops::{Deref, DerefMut};

use crate::color::Rgb;
use crate::error::Result;
use crate::protocol::{clamp_temperature, Command, Scene};
use crate::transport::{GattTransport, LampIdentity};

mod connection;
mod facade;
mod light;
mod observer;
mod state;

use self::connection::Connection;
pub use self::connection::ConnectionState;
pub use self::facade::SmartLamp;
pub use self::light::ImmediateLight;
pub use self::observer::{LampEvent, LampObserver, NullObserver, TracingObserver};
pub use self::state::{LampState, DEFAULT_BOTTOM_BRIGHTNESS, DEFAULT_BOTTOM_TEMPERATURE};

pub struct LampF<T: GattTransport> {
    identity: LampIdentity,
    connection: Connection<T>,
    state: LampState,
    observer: Box<dyn LampObserver + Send>,
}

impl<T: GattTransport> LampF<T> {
    /// Create a disconnected engine with the default assumed state.
    pub fn new(identity: LampIdentity, transport: T) -> LampF<T> {
        LampF {
            identity,
            connection: Connection::new(transport),
            state: LampState::default(),
            observer: Box::new(TracingObserver),
        }
    }

    pub fn with_observer<O>(mut self, observer: O) -> LampF<T>
    where
        O: LampObserver + Send + 'static,
    {
        self.observer = Box::new(observer);
        self
    }

    /// Replace the assumed state before anything is sent.
    pub fn with_state(mut self, state: LampState) -> LampF<T> {
        self.state = state;
        self
    }

    pub fn identity(&self) -> &LampIdentity {
        &self.identity
    }

    pub fn state(&self) -> &LampState {
        &self.state
    }

    pub fn connection_state(&self) -> ConnectionState {
        self.connection.state()
    }

    /// Connect and resolve the control characteristic unless already
    /// connected.
    pub fn connect_if_needed(&mut self) -> Result<()> {
        self.connection
            .connect_if_needed(&self.identity, self.observer.as_ref())
    }

    /// Disconnect. The transport is asked to tear down even without a link.
    pub fn disconnect(&mut self) -> Result<()> {
        self.connection
            .disconnect(&self.identity, self.observer.as_ref())
    }

    /// Connect and hand out a guard that disconnects when dropped.
    pub fn session(&mut self) -> Result<Session<'_, T>> {
        self.connect_if_needed()?;
        Ok(Session { lamp: self })
    }

    pub fn power(&self) -> bool {
        self.state.power()
    }

    /// Switch on to the default scene, or off to the shutdown scene.
    pub fn set_power(&mut self, on: bool) -> Result<()> {
        self.set_scene(Some(if on { Scene::Default } else { Scene::Shutdown }))
    }

    pub fn scene(&self) -> Option<Scene> {
        self.state.scene()
    }

    /// Select a scene. `None` shuts the lamp down.
    pub fn set_scene(&mut self, scene: Option<Scene>) -> Result<()> {
        let scene = scene.unwrap_or(Scene::Shutdown);
        self.send(Command::SelectScene(scene), |state| state.apply_scene(scene))
    }

    pub fn color(&self) -> Option<Rgb> {
        self.state.top_color()
    }

    /// Set the top bulb color. `None` means white.
    pub fn set_color(&mut self, color: Option<Rgb>) -> Result<()> {
        self.immediate_light(&ImmediateLight::new().top_color(color.unwrap_or(Rgb::WHITE)))
    }

    pub fn top_temperature(&self) -> Option<u16> {
        self.state.top_temperature()
    }

    /// Set the top bulb's color temperature with the dedicated temperature
    /// command. Leaves the bottom bulb and the stored top color alone.
    pub fn set_top_temperature(&mut self, kelvin: i64) -> Result<()> {
        let kelvin = clamp_temperature(kelvin);
        self.send(Command::TopTemperature(kelvin), |state| {
            state.apply_top_temperature(kelvin)
        })
    }

    pub fn bottom_temperature(&self) -> u16 {
        self.state.bottom_temperature()
    }

    pub fn set_bottom_temperature(&mut self, kelvin: i64) -> Result<()> {
        self.immediate_light(&ImmediateLight::new().bottom_temperature(kelvin))
    }

    pub fn bottom_brightness(&self) -> u8 {
        self.state.bottom_brightness()
    }

    pub fn set_bottom_brightness(&mut self, brightness: u8) -> Result<()> {
        self.immediate_light(&ImmediateLight::new().bottom_brightness(brightness))
    }

    /// Set any combination of top and bottom bulb values in one packet.
    ///
    /// An empty request sends nothing. Afterwards the lamp is on and no
    /// longer in a scene.
    pub fn immediate_light(&mut self, request: &ImmediateLight) -> Result<()> {
        let plan = match light::plan(request, &self.state) {
            Some(plan) => plan,
            None => return Ok(()),
        };
        self.send(plan.command, |state| {
            state.apply_immediate_light(plan.top, plan.bottom)
        })
    }

    /// Deliver a command.
    ///
    /// State is committed once the link is ready, before the write itself.
    /// A failed write does not roll it back.
    fn send<F>(&mut self, command: Command, commit: F) -> Result<()>
    where
        F: FnOnce(&mut LampState),
    {
        let packet = command.encode();

        self.connect_if_needed()?;

        commit(&mut self.state);
        self.connection.write(&packet)?;

        self.observer.on_event(&LampEvent::CommandSent {
            command: &command,
            packet: &packet,
        });
        Ok(())
    }

    /// Disconnect, reporting failures to the observer only.
    fn teardown(&mut self) {
        if let Err(error) = self.disconnect() {
            self.observer.on_event(&LampEvent::TeardownFailed {
                address: self.identity.address(),
                error: &error,
            });
        }
    }
}

impl<T: GattTransport> Drop for LampF<T> {
    fn drop(&mut self) {
        self.teardown();
    }
}

/// A connected lamp, disconnected again when the session ends.
pub struct Session<'a, T: GattTransport> {
    lamp: &'a mut LampF<T>,
}

impl<T: GattTransport> Deref for Session<'_, T> {
    type Target = LampF<T>;

    fn deref(&self) -> &LampF<T> {
        self.lamp
    }
}

impl<T: GattTransport> DerefMut for Session<'_, T> {
    fn deref_mut(&mut self) -> &mut LampF<T> {
        self.lamp
    }
}

impl<T: GattTransport> Drop for Session<'_, T> {
    fn drop(&mut self) {
        self.lamp.teardown();
    }
}
