//! Background task that keeps the transmit queue topped up.
//!
//! While the system is active the feeder copies the pattern into a fresh
//! pool block and submits it, once per quantum. The pool is the only
//! backpressure: when every block is queued, allocation waits until the
//! transmitter finishes one and hands it back. A feed quantum shorter than
//! one block's play time means the feeder always gets ahead and then idles
//! on the pool.
//!
//! ```text
//! loop:
//!   inactive?           → idle
//!   alloc (may wait)    → fill with pattern
//!   enqueue             → Submitted, or Discarded if audio stopped meanwhile
//!   sleep one quantum
//! ```
//!
//! Allocation happens outside any critical section; only the enqueue holds
//! the audio lock.

use embedded_hal::delay::DelayNs;

use crate::block::BlockPool;
use crate::config::AudioConfig;
use crate::constants::FEED_QUANTUM_MS;
use crate::io::{AudioPath, AudioTransmit};
use crate::pattern::AudioPattern;
use crate::state::ActiveState;

/// What one feeder iteration did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedOutcome {
    /// System inactive; nothing allocated.
    Idle,
    /// A block is queued for transmission.
    Submitted,
    /// Audio stopped while the block was being filled; it went back to the pool.
    Discarded,
    /// Allocation timed out.
    Skipped,
    /// The transmitter refused the block.
    Failed,
}

pub struct StreamingFeeder<'r, 'a, T, D> {
    state: &'r ActiveState,
    pool: &'a BlockPool,
    pattern: &'a AudioPattern,
    audio: &'r AudioPath<'a, T>,
    delay: D,
    quantum_ms: u32,
    alloc_timeout_ms: Option<u32>,
    submitted: u32,
}

impl<'r, 'a, T, D> StreamingFeeder<'r, 'a, T, D>
where
    T: AudioTransmit<'a>,
    D: DelayNs,
{
    pub fn new(
        state: &'r ActiveState,
        pool: &'a BlockPool,
        pattern: &'a AudioPattern,
        audio: &'r AudioPath<'a, T>,
        delay: D,
    ) -> Self {
        StreamingFeeder {
            state,
            pool,
            pattern,
            audio,
            delay,
            quantum_ms: FEED_QUANTUM_MS,
            alloc_timeout_ms: None,
            submitted: 0,
        }
    }

    /// Sleep `ms` between iterations instead of [`FEED_QUANTUM_MS`].
    pub fn with_quantum_ms(mut self, ms: u32) -> Self {
        self.quantum_ms = ms;
        self
    }

    /// Give up on an exhausted pool after `ms` instead of waiting forever.
    pub fn with_alloc_timeout(mut self, ms: u32) -> Self {
        self.alloc_timeout_ms = Some(ms);
        self
    }

    /// True when the quantum is shorter than one block of `config`.
    pub fn keeps_up_with(&self, config: &AudioConfig) -> bool {
        u64::from(self.quantum_ms) * 1_000 < u64::from(config.block_duration_us())
    }

    /// Blocks submitted since construction.
    pub fn submitted(&self) -> u32 {
        self.submitted
    }

    /// One iteration: feed at most one block, then sleep one quantum.
    pub fn step(&mut self) -> FeedOutcome {
        let outcome = self.feed();
        self.delay.delay_ms(self.quantum_ms);
        outcome
    }

    /// One iteration without the trailing sleep.
    pub fn feed(&mut self) -> FeedOutcome {
        if !self.state.is_active() {
            return FeedOutcome::Idle;
        }

        let mut block = match self.alloc_timeout_ms {
            None => self.pool.alloc(&mut self.delay),
            Some(ms) => match self.pool.alloc_timeout(&mut self.delay, ms) {
                Ok(block) => block,
                Err(err) => {
                    log::debug!("feeder: {}", err);
                    return FeedOutcome::Skipped;
                }
            },
        };
        self.pattern.fill(&mut block[..]);

        match self.audio.lock(|driver| driver.enqueue(block.into())) {
            Ok(true) => {
                self.submitted = self.submitted.wrapping_add(1);
                log::trace!("feeder: submitted block {}", self.submitted);
                FeedOutcome::Submitted
            }
            Ok(false) => {
                log::trace!("feeder: audio stopped, block discarded");
                FeedOutcome::Discarded
            }
            Err(err) => {
                log::warn!("feeder: {}", err);
                FeedOutcome::Failed
            }
        }
    }

    /// Run forever.
    pub fn run(&mut self) -> ! {
        if let Some(config) = self.audio.lock(|driver| driver.config().copied()) {
            if !self.keeps_up_with(&config) {
                log::warn!(
                    "feeder: {} ms quantum is not shorter than a {} us block, expect underruns",
                    self.quantum_ms,
                    config.block_duration_us()
                );
            }
        }
        log::info!("feeder: running, {} ms quantum", self.quantum_ms);
        loop {
            self.step();
        }
    }
}
