//! Inputs that request on/off transitions.
//!
//! Two sources exist: a write to the wireless control characteristic and an
//! edge on the physical button. Neither keeps state of its own; both forward
//! straight to a [`SetActive`] implementation, normally the
//! [`OutputController`](crate::controller::OutputController).

use embedded_hal::digital::InputPin;

use crate::controller::{SetActive, Transition};

/// Advertised device name.
pub const DEVICE_NAME: &str = "Beacon";

/// Primary service UUID (Nordic LED Button Service).
pub const SERVICE_UUID: u128 = 0x0000_1523_1212_efde_1523_785f_eabc_d123;

/// Control characteristic UUID. Writes of one byte, zero is off.
pub const CONTROL_CHAR_UUID: u128 = 0x0000_1525_1212_efde_1523_785f_eabc_d123;

/// Decode a control characteristic payload. Any non-zero first byte is on.
pub fn decode_control(payload: &[u8]) -> Option<bool> {
    payload.first().map(|&b| b != 0)
}

/// Wireless write handler.
pub struct WirelessTrigger<'c, C: ?Sized> {
    controller: &'c C,
}

impl<'c, C: SetActive + ?Sized> WirelessTrigger<'c, C> {
    pub const fn new(controller: &'c C) -> Self {
        WirelessTrigger { controller }
    }

    /// Apply a decoded write. Runs in the radio stack's callback context.
    pub fn on_write(&self, active: bool) -> Transition {
        log::debug!("trigger: wireless write {}", active);
        self.controller.set_active(active)
    }

    /// Apply a raw characteristic payload. Empty payloads are ignored.
    pub fn on_payload(&self, payload: &[u8]) -> Option<Transition> {
        match decode_control(payload) {
            Some(active) => Some(self.on_write(active)),
            None => {
                log::warn!("trigger: empty control write ignored");
                None
            }
        }
    }
}

impl<C: ?Sized> Clone for WirelessTrigger<'_, C> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<C: ?Sized> Copy for WirelessTrigger<'_, C> {}

/// Button edge handler. Pressed (high) means on, released means off.
///
/// Owned by the GPIO interrupt; call [`on_edge`](Self::on_edge) on both edges.
pub struct EdgeTrigger<'c, C: ?Sized, P> {
    controller: &'c C,
    pin: P,
}

impl<'c, C, P> EdgeTrigger<'c, C, P>
where
    C: SetActive + ?Sized,
    P: InputPin,
{
    pub fn new(controller: &'c C, pin: P) -> Self {
        EdgeTrigger { controller, pin }
    }

    /// Sample the pin and forward its level. A failed read is logged and
    /// changes nothing.
    pub fn on_edge(&mut self) -> Option<Transition> {
        match self.pin.is_high() {
            Ok(pressed) => {
                log::debug!("trigger: button {}", if pressed { "down" } else { "up" });
                Some(self.controller.set_active(pressed))
            }
            Err(err) => {
                log::warn!("trigger: button read: {:?}", err);
                None
            }
        }
    }

    pub fn release(self) -> P {
        self.pin
    }
}
