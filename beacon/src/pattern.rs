//! Precomputed tone pattern.
//!
//! [`AudioPattern`] holds exactly one block of samples and is built once at
//! startup. The feeder copies it into every pooled block; the controller
//! submits it directly to prime the transmitter before the clock starts.
//!
//! The reference tone is a 500 Hz square wave at 16 kHz: 16 samples at
//! +2000 followed by 16 at -2000, repeated across the block.

use crate::constants::BLOCK_SAMPLES;

/// Square wave period for the reference tone, in samples.
pub const REFERENCE_PERIOD: usize = 32;

/// Square wave amplitude for the reference tone.
pub const REFERENCE_AMPLITUDE: i16 = 2000;

/// One immutable block of output samples.
#[derive(Clone, PartialEq, Eq)]
pub struct AudioPattern {
    samples: [i16; BLOCK_SAMPLES],
}

impl AudioPattern {
    /// The reference 500 Hz square wave.
    pub const fn reference() -> Self {
        Self::square(REFERENCE_PERIOD, REFERENCE_AMPLITUDE)
    }

    /// Square wave: the first half of each period at `+amplitude`, the
    /// second half at `-amplitude`. A `period` below 2 gives silence.
    pub const fn square(period: usize, amplitude: i16) -> Self {
        let mut samples = [0i16; BLOCK_SAMPLES];
        if period >= 2 {
            let half = period / 2;
            let mut i = 0;
            while i < BLOCK_SAMPLES {
                samples[i] = if i % period < half { amplitude } else { -amplitude };
                i += 1;
            }
        }
        AudioPattern { samples }
    }

    /// Repeat `period` until the block is full, cutting the last repetition
    /// short if needed. An empty period gives silence.
    pub fn from_period(period: &[i16]) -> Self {
        let mut samples = [0i16; BLOCK_SAMPLES];
        if !period.is_empty() {
            for (dst, &src) in samples.iter_mut().zip(period.iter().cycle()) {
                *dst = src;
            }
        }
        AudioPattern { samples }
    }

    /// Sine tone at `freq_hz`, phase zero at the first sample.
    #[cfg(feature = "sine")]
    pub fn sine(freq_hz: f32, sample_rate: u32, amplitude: i16) -> Self {
        let mut samples = [0i16; BLOCK_SAMPLES];
        if sample_rate > 0 {
            let step = 2.0 * core::f32::consts::PI * freq_hz / sample_rate as f32;
            for (i, s) in samples.iter_mut().enumerate() {
                *s = (libm::sinf(step * i as f32) * amplitude as f32) as i16;
            }
        }
        AudioPattern { samples }
    }

    pub fn samples(&self) -> &[i16; BLOCK_SAMPLES] {
        &self.samples
    }

    /// Copy the pattern into `dst`, repeating it if `dst` is longer than a
    /// block and truncating if shorter.
    pub fn fill(&self, dst: &mut [i16]) {
        for chunk in dst.chunks_mut(BLOCK_SAMPLES) {
            chunk.copy_from_slice(&self.samples[..chunk.len()]);
        }
    }
}

impl Default for AudioPattern {
    fn default() -> Self {
        Self::reference()
    }
}

impl core::ops::Deref for AudioPattern {
    type Target = [i16; BLOCK_SAMPLES];

    fn deref(&self) -> &Self::Target {
        &self.samples
    }
}

impl core::fmt::Debug for AudioPattern {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("AudioPattern")
            .field("head", &&self.samples[..8])
            .finish()
    }
}
