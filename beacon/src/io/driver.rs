//! Audio peripheral driver.
//!
//! [`AudioDriver`] wraps an [`AudioTransmit`] implementation and adds the
//! bookkeeping the rest of the crate relies on:
//!
//! ```text
//!               configure() ok
//! Unconfigured ───────────────▶ Ready ◀──── stop() ────┐
//!      │                          │                     │
//!      │ configure() err          └──── start() ok ──▶ Running
//!      ▼
//!   Failed   (audio disabled, lights-only operation)
//! ```
//!
//! `start()` while running and `stop()` while stopped do nothing, so the
//! controller can call them on every transition without tracking the
//! peripheral itself. [`AudioPath`] puts the driver behind a
//! critical-section mutex so the controller and the feeder can share it.

use core::cell::RefCell;
use core::marker::PhantomData;

use critical_section::{CriticalSection, Mutex};

use crate::block::Block;
use crate::config::{AudioConfig, ConfigError};
use crate::error::{Error, TxOp};

use super::transmit::{AudioTransmit, TxBlock, TxTrigger};

/// Driver lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverState {
    Unconfigured,
    Ready,
    Running,
    /// Setup failed; every later call is refused.
    Failed,
}

pub struct AudioDriver<'a, T> {
    tx: T,
    state: DriverState,
    config: Option<AudioConfig>,
    _blocks: PhantomData<Block<'a>>,
}

impl<'a, T: AudioTransmit<'a>> AudioDriver<'a, T> {
    pub const fn new(tx: T) -> Self {
        AudioDriver {
            tx,
            state: DriverState::Unconfigured,
            config: None,
            _blocks: PhantomData,
        }
    }

    /// Apply `config` to the peripheral and leave it stopped.
    ///
    /// Only the first call does anything. A failure is logged once, moves the
    /// driver to [`DriverState::Failed`] and is returned to the caller; there
    /// is no retry.
    pub fn configure(&mut self, config: AudioConfig) -> Result<(), Error> {
        match self.state {
            DriverState::Unconfigured => {}
            DriverState::Failed => return Err(Error::NotConfigured),
            DriverState::Ready | DriverState::Running => {
                log::warn!("audio: already configured, ignoring");
                return Ok(());
            }
        }

        if let Err(err) = self.try_configure(&config) {
            log::error!("audio: setup failed: {}", err);
            self.state = DriverState::Failed;
            return Err(err);
        }

        // Leave the peripheral in a known stopped state.
        if let Err(err) = self.tx.trigger(TxTrigger::Stop) {
            log::debug!("audio: initial stop: {:?}", err);
        }
        self.config = Some(config);
        self.state = DriverState::Ready;
        log::info!(
            "audio: configured {} Hz, {} ch, {}-bit, {} byte blocks",
            config.sample_rate,
            config.channels,
            config.word_size,
            config.block_size
        );
        Ok(())
    }

    fn try_configure(&mut self, config: &AudioConfig) -> Result<(), Error> {
        if !self.tx.is_ready() {
            return Err(Error::NotReady);
        }
        config.validate()?;
        self.tx.configure(config).map_err(|err| {
            log::debug!("audio: peripheral rejected config: {:?}", err);
            Error::ConfigRejected(ConfigError::Unsupported)
        })
    }

    /// Queue a block ahead of [`start`](Self::start).
    pub fn prime(&mut self, block: TxBlock<'a>) -> Result<(), Error> {
        if !self.is_configured() {
            return Err(Error::NotConfigured);
        }
        self.write(block)
    }

    /// Queue a block on a running stream.
    ///
    /// Returns `Ok(false)` without touching the peripheral when the stream is
    /// not running; the block is dropped, which returns it to its pool.
    pub fn enqueue(&mut self, block: TxBlock<'a>) -> Result<bool, Error> {
        if self.state != DriverState::Running {
            return Ok(false);
        }
        self.write(block).map(|()| true)
    }

    fn write(&mut self, block: TxBlock<'a>) -> Result<(), Error> {
        self.tx.write(block).map_err(|err| {
            log::debug!("audio: write: {:?}", err);
            Error::Transmit(TxOp::Write)
        })
    }

    /// Start the transmit clock. No-op when already running.
    pub fn start(&mut self) -> Result<(), Error> {
        match self.state {
            DriverState::Running => Ok(()),
            DriverState::Ready => {
                self.tx.trigger(TxTrigger::Start).map_err(|err| {
                    log::debug!("audio: start: {:?}", err);
                    Error::Transmit(TxOp::Start)
                })?;
                self.state = DriverState::Running;
                Ok(())
            }
            DriverState::Unconfigured | DriverState::Failed => Err(Error::NotConfigured),
        }
    }

    /// Stop the transmit clock. No-op when not running.
    ///
    /// The driver counts as stopped afterwards even if the peripheral
    /// reported an error, so it never disagrees with the requested state.
    pub fn stop(&mut self) -> Result<(), Error> {
        if self.state != DriverState::Running {
            return Ok(());
        }
        self.state = DriverState::Ready;
        self.tx.trigger(TxTrigger::Stop).map_err(|err| {
            log::debug!("audio: stop: {:?}", err);
            Error::Transmit(TxOp::Stop)
        })
    }

    pub fn state(&self) -> DriverState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == DriverState::Running
    }

    pub fn is_configured(&self) -> bool {
        matches!(self.state, DriverState::Ready | DriverState::Running)
    }

    pub fn config(&self) -> Option<&AudioConfig> {
        self.config.as_ref()
    }

    pub fn transmitter(&self) -> &T {
        &self.tx
    }

    /// Mutable access to the peripheral, e.g. for its completion interrupt.
    pub fn transmitter_mut(&mut self) -> &mut T {
        &mut self.tx
    }
}

/// [`AudioDriver`] shared between the controller and the feeder.
pub struct AudioPath<'a, T> {
    driver: Mutex<RefCell<AudioDriver<'a, T>>>,
}

impl<'a, T: AudioTransmit<'a>> AudioPath<'a, T> {
    pub const fn new(driver: AudioDriver<'a, T>) -> Self {
        AudioPath {
            driver: Mutex::new(RefCell::new(driver)),
        }
    }

    /// Run `f` on the driver inside a critical section.
    pub fn lock<R>(&self, f: impl FnOnce(&mut AudioDriver<'a, T>) -> R) -> R {
        critical_section::with(|cs| self.lock_in(cs, f))
    }

    /// Run `f` on the driver inside a critical section the caller already holds.
    pub fn lock_in<R>(
        &self,
        cs: CriticalSection<'_>,
        f: impl FnOnce(&mut AudioDriver<'a, T>) -> R,
    ) -> R {
        f(&mut self.driver.borrow_ref_mut(cs))
    }

    /// See [`AudioDriver::configure`].
    pub fn configure(&self, config: AudioConfig) -> Result<(), Error> {
        self.lock(|driver| driver.configure(config))
    }

    pub fn is_running(&self) -> bool {
        self.lock(|driver| driver.is_running())
    }
}
