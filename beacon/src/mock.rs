//! Test doubles for pins and delays, shared by the unit and scenario tests.

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{self, ErrorType, InputPin, OutputPin};

// ── Pin error ─────────────────────────────────────────────────────────

#[derive(Debug)]
pub struct MockPinError;

impl digital::Error for MockPinError {
    fn kind(&self) -> digital::ErrorKind {
        digital::ErrorKind::Other
    }
}

// ── Output pin with an observable probe ───────────────────────────────

/// Shared view of a [`MockPin`] that stays with the test.
#[derive(Default)]
pub struct PinProbe {
    level: AtomicBool,
    writes: AtomicU32,
    failing: AtomicBool,
}

impl PinProbe {
    pub fn level(&self) -> bool {
        self.level.load(Ordering::SeqCst)
    }

    pub fn set_level(&self, level: bool) {
        self.level.store(level, Ordering::SeqCst);
    }

    /// Successful writes so far.
    pub fn writes(&self) -> u32 {
        self.writes.load(Ordering::SeqCst)
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }
}

pub struct MockPin {
    probe: Arc<PinProbe>,
}

impl MockPin {
    fn drive(&mut self, level: bool) -> Result<(), MockPinError> {
        if self.probe.failing.load(Ordering::SeqCst) {
            return Err(MockPinError);
        }
        self.probe.level.store(level, Ordering::SeqCst);
        self.probe.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

impl ErrorType for MockPin {
    type Error = MockPinError;
}

impl OutputPin for MockPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.drive(false)
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.drive(true)
    }
}

/// `N` output pins plus the probes that observe them.
pub fn pin_bank<const N: usize>() -> ([MockPin; N], [Arc<PinProbe>; N]) {
    let probes: [Arc<PinProbe>; N] = core::array::from_fn(|_| Arc::new(PinProbe::default()));
    let pins = core::array::from_fn(|i| MockPin {
        probe: Arc::clone(&probes[i]),
    });
    (pins, probes)
}

// ── Input pin (button) ────────────────────────────────────────────────

#[derive(Clone, Default)]
pub struct MockInput {
    level: Arc<AtomicBool>,
    failing: Arc<AtomicBool>,
}

impl MockInput {
    pub fn press(&self) {
        self.level.store(true, Ordering::SeqCst);
    }

    pub fn release(&self) {
        self.level.store(false, Ordering::SeqCst);
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }
}

impl ErrorType for MockInput {
    type Error = MockPinError;
}

impl InputPin for MockInput {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(MockPinError);
        }
        Ok(self.level.load(Ordering::SeqCst))
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        self.is_high().map(|high| !high)
    }
}

// ── Delays ────────────────────────────────────────────────────────────

/// Returns immediately and counts requested milliseconds.
#[derive(Default)]
pub struct CountingDelay {
    pub waited_ms: u32,
}

impl DelayNs for CountingDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.waited_ms = self.waited_ms.saturating_add(ns.div_ceil(1_000_000));
    }

    fn delay_ms(&mut self, ms: u32) {
        self.waited_ms = self.waited_ms.saturating_add(ms);
    }
}

/// Really sleeps. For tests that run feeder and consumer on threads.
pub struct StdDelay;

impl DelayNs for StdDelay {
    fn delay_ns(&mut self, ns: u32) {
        std::thread::sleep(Duration::from_nanos(ns as u64));
    }

    fn delay_ms(&mut self, ms: u32) {
        std::thread::sleep(Duration::from_millis(ms as u64));
    }
}
