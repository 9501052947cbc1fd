//! # beacon
//!
//! A `no_std`, zero-allocation remote-controlled signal beacon: a bank of
//! output lines and a continuous tone over I2S, switched on and off together
//! by a wireless write or a physical button.
//!
//! ## Architecture
//!
//! | Layer | Module | Purpose |
//! |-------|--------|---------|
//! | Memory | [`block`] | Fixed pool of transmit blocks with RAII handles |
//! | Content | [`pattern`] | The immutable one-block tone pattern |
//! | I/O | [`io`] | `AudioTransmit` seam, driver lifecycle, DMA transmit queue |
//! | Control | [`controller`] / [`state`] | Atomic on/off transitions |
//! | Lines | [`outputs`] | Digital output bank |
//! | Streaming | [`feeder`] | Keeps the transmit queue topped up |
//! | Inputs | [`trigger`] | Wireless write and button edge handlers |
//!
//! ## Wiring
//!
//! ```ignore
//! use beacon::prelude::*;
//!
//! static POOL: BlockPool = BlockPool::new();
//! static PATTERN: AudioPattern = AudioPattern::reference();
//! static STATE: ActiveState = ActiveState::new();
//! static AUDIO: AudioPath<'static, I2sTxQueue<'static>> =
//!     AudioPath::new(AudioDriver::new(I2sTxQueue::new()));
//!
//! // Setup failure leaves the lights working without audio.
//! let _ = AUDIO.configure(AudioConfig::reference());
//!
//! let controller = OutputController::new(&STATE, &AUDIO, &PATTERN, OutputBank::new(leds));
//! let wireless = WirelessTrigger::new(&controller);
//! let button = EdgeTrigger::new(&controller, button_pin);
//!
//! // Low-priority task:
//! StreamingFeeder::new(&STATE, &POOL, &PATTERN, &AUDIO, delay).run();
//! ```
//!
//! ## Features
//!
//! | Feature | Default | Enables |
//! |---------|---------|---------|
//! | `sine` | yes | [`AudioPattern::sine`](pattern::AudioPattern::sine) via `libm` |
//!
//! ## Audio parameters
//!
//! - **Sample rate:** 16 kHz ([`constants::SAMPLE_RATE_HZ`])
//! - **Format:** stereo, signed 16-bit, I2S
//! - **Block:** 1024 bytes, 512 samples, 16 ms ([`constants::BLOCK_SIZE_BYTES`])
//! - **Block pool:** 4 blocks ([`constants::POOL_SIZE`])
//! - **Tone:** 500 Hz square wave, ±2000 ([`pattern::AudioPattern::reference`])

#![cfg_attr(not(test), no_std)]

pub mod constants;
pub mod config;
pub mod error;
pub mod block;
pub mod pattern;
pub mod state;
pub mod io;
pub mod outputs;
pub mod controller;
pub mod feeder;
pub mod trigger;

#[cfg(test)]
mod mock;


pub use error::Error;

/// Everything needed to wire up a beacon.
pub mod prelude {
    pub use crate::block::{Block, BlockPool};
    pub use crate::config::AudioConfig;
    pub use crate::controller::{OutputController, SetActive, Transition};
    pub use crate::error::Error;
    pub use crate::feeder::{FeedOutcome, StreamingFeeder};
    pub use crate::io::{AudioDriver, AudioPath, AudioTransmit, I2sTxQueue};
    pub use crate::outputs::OutputBank;
    pub use crate::pattern::AudioPattern;
    pub use crate::state::ActiveState;
    pub use crate::trigger::{EdgeTrigger, WirelessTrigger};
}
