//! Audio transmit path.
//!
//! ## Components
//!
//! | Item | Role |
//! |------|------|
//! | [`AudioTransmit`] | Hardware seam: configure, write, start/stop |
//! | [`AudioDriver`] | Lifecycle and idempotent start/stop over an `AudioTransmit` |
//! | [`AudioPath`] | `AudioDriver` shared by controller and feeder |
//! | [`I2sTxQueue`] | DMA-fed I2S transmitter: block FIFO + completion ISR |
//!
//! ## Utilities
//!
//! - [`interleave`]: packing stereo sample pairs into DMA frames
//!
//! ## Block ownership
//!
//! A pooled block is owned by the feeder until it is written, by the
//! transmitter while queued, and goes back to the pool when the completion
//! ISR drops it or a stop discards it.

pub mod interleave;
pub mod transmit;
pub mod driver;
pub mod tx_queue;

pub use driver::{AudioDriver, AudioPath, DriverState};
pub use transmit::{AudioTransmit, TxBlock, TxTrigger};
pub use tx_queue::{I2sTxQueue, TxQueueError, TX_QUEUE_DEPTH};

#[cfg(test)]
mod integration_tests;
