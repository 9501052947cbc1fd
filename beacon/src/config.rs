//! Audio transmit configuration.
//!
//! [`AudioConfig`] is fixed at setup and handed once to
//! [`AudioDriver::configure`](crate::io::AudioDriver::configure). The default
//! is the reference hardware setup: 16 kHz, 16-bit stereo I2S, 1024-byte
//! blocks, frame and bit clocks driven by this side.

use crate::constants::{
    BLOCK_SIZE_BYTES, CHANNELS, SAMPLE_RATE_HZ, WORD_SIZE_BITS, WRITE_TIMEOUT_MS,
};

/// Which side drives the I2S frame and bit clocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockRole {
    /// This side drives both clocks.
    Master,
    /// The codec drives both clocks.
    Slave,
}

/// Serial data format on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataFormat {
    /// Philips I2S: data delayed one bit clock after the frame edge.
    I2s,
    /// Data aligned with the frame edge.
    LeftJustified,
}

/// Reasons a configuration is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("sample rate is zero")]
    ZeroSampleRate,
    #[error("channel count is zero")]
    ZeroChannels,
    #[error("unsupported word size {0}")]
    WordSize(u8),
    #[error("block size {0} is not a whole number of frames")]
    PartialFrame(usize),
    #[error("block size {got} does not match pool block size {expected}")]
    BlockSize { got: usize, expected: usize },
    #[error("rejected by the peripheral")]
    Unsupported,
}

/// Immutable audio transmit configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AudioConfig {
    /// Frame clock frequency in Hz.
    pub sample_rate: u32,
    /// Interleaved channels per frame.
    pub channels: u8,
    /// Bits per sample word.
    pub word_size: u8,
    /// Bytes per block submission.
    pub block_size: usize,
    pub format: DataFormat,
    pub clock_role: ClockRole,
    /// How long a write may wait for queue space, in milliseconds.
    pub timeout_ms: u32,
}

impl AudioConfig {
    /// The reference configuration.
    pub const fn reference() -> Self {
        AudioConfig {
            sample_rate: SAMPLE_RATE_HZ,
            channels: CHANNELS,
            word_size: WORD_SIZE_BITS,
            block_size: BLOCK_SIZE_BYTES,
            format: DataFormat::I2s,
            clock_role: ClockRole::Master,
            timeout_ms: WRITE_TIMEOUT_MS,
        }
    }

    /// Bytes in one interleaved frame.
    pub const fn frame_bytes(&self) -> usize {
        self.channels as usize * (self.word_size as usize / 8)
    }

    /// Playback time of one block in microseconds.
    ///
    /// `block_size / (channels * bytes_per_sample * sample_rate)`, 16 000 µs
    /// for the reference configuration. Returns 0 for a config that would not
    /// validate.
    pub fn block_duration_us(&self) -> u32 {
        let bytes_per_second = self.frame_bytes() as u64 * self.sample_rate as u64;
        if bytes_per_second == 0 {
            return 0;
        }
        (self.block_size as u64 * 1_000_000 / bytes_per_second) as u32
    }

    /// Check the record against what the pool and transmit path support.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sample_rate == 0 {
            return Err(ConfigError::ZeroSampleRate);
        }
        if self.channels == 0 {
            return Err(ConfigError::ZeroChannels);
        }
        if self.word_size != WORD_SIZE_BITS {
            return Err(ConfigError::WordSize(self.word_size));
        }
        if self.block_size == 0 || self.block_size % self.frame_bytes() != 0 {
            return Err(ConfigError::PartialFrame(self.block_size));
        }
        if self.block_size != BLOCK_SIZE_BYTES {
            return Err(ConfigError::BlockSize {
                got: self.block_size,
                expected: BLOCK_SIZE_BYTES,
            });
        }
        Ok(())
    }
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self::reference()
    }
}
