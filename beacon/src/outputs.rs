//! The bank of digital output lines.

use embedded_hal::digital::{OutputPin, PinState};

use crate::constants::OUTPUT_LINES;

/// N output lines that always move together.
///
/// Generic over any [`embedded_hal::digital::OutputPin`]. A failing line is
/// logged and skipped; the others are still driven.
pub struct OutputBank<P, const N: usize = OUTPUT_LINES> {
    pins: [P; N],
    level: bool,
}

impl<P: OutputPin, const N: usize> OutputBank<P, N> {
    /// Take ownership of the lines and drive them all inactive.
    pub fn new(pins: [P; N]) -> Self {
        let mut bank = OutputBank { pins, level: false };
        bank.set_all(false);
        bank
    }

    /// Drive every line to `level`. Returns how many lines failed.
    pub fn set_all(&mut self, level: bool) -> usize {
        let mut failed = 0;
        for (index, pin) in self.pins.iter_mut().enumerate() {
            if let Err(err) = pin.set_state(PinState::from(level)) {
                log::warn!("outputs: line {} set {}: {:?}", index, level, err);
                failed += 1;
            }
        }
        self.level = level;
        failed
    }

    /// Level most recently requested for the bank.
    pub fn level(&self) -> bool {
        self.level
    }

    pub fn len(&self) -> usize {
        N
    }

    pub fn is_empty(&self) -> bool {
        N == 0
    }

    /// Give the pins back.
    pub fn release(self) -> [P; N] {
        self.pins
    }
}
