//! Software side of a DMA-driven I2S transmitter.
//!
//! [`I2sTxQueue`] is the reference [`AudioTransmit`] implementation. Writes
//! go into a bounded FIFO; the DMA completion interrupt calls
//! [`isr()`](I2sTxQueue::isr), which packs the oldest block into the DMA
//! buffer and drops it. Dropping is what hands a pooled block back to the
//! feeder, so the pool drains at exactly the rate the hardware plays.
//!
//! ```text
//! feeder ──write()──▶ [B0][B1][B2] ──isr()──▶ DMA buffer ──▶ SAI/I2S TX
//!                        FIFO          pack + release
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! // In the DMA ISR:
//! audio.lock(|driver| driver.transmitter_mut().isr(&mut DMA_TX_BUFFER));
//! ```

use heapless::Deque;

use crate::config::AudioConfig;
use crate::constants::{BLOCK_FRAMES, POOL_SIZE};

use super::interleave::{pack_frames, silence};
use super::transmit::{AudioTransmit, TxBlock, TxTrigger};

/// Queue depth: every pool block plus the priming pattern.
pub const TX_QUEUE_DEPTH: usize = POOL_SIZE + 1;

/// Errors reported by [`I2sTxQueue`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxQueueError {
    /// Peripheral not present or not clocked.
    NotReady,
    /// Write before configure.
    NotConfigured,
    /// FIFO full; the block was dropped.
    Full,
    /// Start with nothing queued.
    NotPrimed,
}

pub struct I2sTxQueue<'a, const N: usize = TX_QUEUE_DEPTH> {
    queue: Deque<TxBlock<'a>, N>,
    ready: bool,
    config: Option<AudioConfig>,
    running: bool,
    transmitted: u32,
    underruns: u32,
}

impl<'a, const N: usize> I2sTxQueue<'a, N> {
    pub const fn new() -> Self {
        I2sTxQueue {
            queue: Deque::new(),
            ready: true,
            config: None,
            running: false,
            transmitted: 0,
            underruns: 0,
        }
    }

    /// A transmitter whose hardware did not come up.
    pub const fn absent() -> Self {
        let mut tx = Self::new();
        tx.ready = false;
        tx
    }

    /// Handle a DMA completion: fill `dma_buffer` with the next block.
    ///
    /// Returns `true` if a block was transmitted. While running with nothing
    /// queued the buffer is filled with silence and an underrun is counted.
    /// While stopped the buffer is silenced and nothing is counted.
    pub fn isr(&mut self, dma_buffer: &mut [u32; BLOCK_FRAMES]) -> bool {
        if !self.running {
            silence(dma_buffer);
            return false;
        }
        match self.queue.pop_front() {
            Some(block) => {
                pack_frames(dma_buffer, &block[..]);
                self.transmitted = self.transmitted.wrapping_add(1);
                // `block` drops here and returns to its pool.
                true
            }
            None => {
                silence(dma_buffer);
                self.underruns = self.underruns.wrapping_add(1);
                false
            }
        }
    }

    /// Blocks waiting for the DMA.
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn config(&self) -> Option<&AudioConfig> {
        self.config.as_ref()
    }

    /// Blocks handed to the DMA since power-up.
    pub fn transmitted(&self) -> u32 {
        self.transmitted
    }

    /// DMA completions that found the queue empty while running.
    pub fn underruns(&self) -> u32 {
        self.underruns
    }
}

impl<const N: usize> Default for I2sTxQueue<'_, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, const N: usize> AudioTransmit<'a> for I2sTxQueue<'a, N> {
    type Error = TxQueueError;

    fn is_ready(&self) -> bool {
        self.ready
    }

    fn configure(&mut self, config: &AudioConfig) -> Result<(), TxQueueError> {
        if !self.ready {
            return Err(TxQueueError::NotReady);
        }
        self.config = Some(*config);
        Ok(())
    }

    fn write(&mut self, block: TxBlock<'a>) -> Result<(), TxQueueError> {
        if self.config.is_none() {
            return Err(TxQueueError::NotConfigured);
        }
        self.queue.push_back(block).map_err(|_dropped| TxQueueError::Full)
    }

    fn trigger(&mut self, trigger: TxTrigger) -> Result<(), TxQueueError> {
        match trigger {
            TxTrigger::Start => {
                if self.running {
                    return Ok(());
                }
                if self.queue.is_empty() {
                    return Err(TxQueueError::NotPrimed);
                }
                self.running = true;
            }
            TxTrigger::Stop => {
                self.running = false;
                self.queue.clear();
            }
        }
        Ok(())
    }
}
