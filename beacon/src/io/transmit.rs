//! Hardware seam for the audio transmit path.
//!
//! An [`AudioTransmit`] implementation owns whatever the peripheral needs
//! (DMA descriptors, a software queue, a vendor handle) and accepts
//! block-sized submissions. Ownership of a submitted [`TxBlock`] moves to the
//! implementation; it drops the block once the hardware has consumed it,
//! which returns pooled blocks to their [`BlockPool`](crate::block::BlockPool).

use core::ops::Deref;

use crate::block::Block;
use crate::config::AudioConfig;
use crate::constants::BLOCK_SAMPLES;
use crate::pattern::AudioPattern;

/// Transmit clock control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxTrigger {
    /// Start the clocks and begin draining queued blocks.
    Start,
    /// Stop the clocks and discard anything still queued.
    Stop,
}

/// One block of samples headed for the peripheral.
pub enum TxBlock<'a> {
    /// A block drawn from the pool; released when the hardware is done.
    Pooled(Block<'a>),
    /// The immutable pattern itself. Transmit DMA only reads it.
    Pattern(&'a AudioPattern),
}

impl TxBlock<'_> {
    pub fn is_pooled(&self) -> bool {
        matches!(self, TxBlock::Pooled(_))
    }
}

impl Deref for TxBlock<'_> {
    type Target = [i16; BLOCK_SAMPLES];

    fn deref(&self) -> &Self::Target {
        match self {
            TxBlock::Pooled(block) => &**block,
            TxBlock::Pattern(pattern) => pattern.samples(),
        }
    }
}

impl<'a> From<Block<'a>> for TxBlock<'a> {
    fn from(block: Block<'a>) -> Self {
        TxBlock::Pooled(block)
    }
}

impl<'a> From<&'a AudioPattern> for TxBlock<'a> {
    fn from(pattern: &'a AudioPattern) -> Self {
        TxBlock::Pattern(pattern)
    }
}

/// Audio transmit peripheral.
pub trait AudioTransmit<'a> {
    /// Peripheral-specific error.
    type Error: core::fmt::Debug;

    /// Whether the peripheral can be configured at all.
    fn is_ready(&self) -> bool {
        true
    }

    /// Apply the stream format. Called once, before any write.
    fn configure(&mut self, config: &AudioConfig) -> Result<(), Self::Error>;

    /// Queue a block for transmission. On error the block is dropped.
    fn write(&mut self, block: TxBlock<'a>) -> Result<(), Self::Error>;

    fn trigger(&mut self, trigger: TxTrigger) -> Result<(), Self::Error>;
}
