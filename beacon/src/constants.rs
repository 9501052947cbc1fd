/// Output sample rate in Hz (frame clock).
pub const SAMPLE_RATE_HZ: u32 = 16_000;

/// Interleaved channels per frame. The reference amplifier downmixes to mono.
pub const CHANNELS: u8 = 2;

/// Bits per sample word.
pub const WORD_SIZE_BITS: u8 = 16;

/// Size of one audio block in bytes.
pub const BLOCK_SIZE_BYTES: usize = 1024;

/// Number of signed 16-bit samples per block.
pub const BLOCK_SAMPLES: usize = BLOCK_SIZE_BYTES / 2;

/// Number of stereo frames per block.
pub const BLOCK_FRAMES: usize = BLOCK_SAMPLES / CHANNELS as usize;

/// Number of blocks in the transmit pool.
pub const POOL_SIZE: usize = 4;

/// Feeder sleep between iterations, in milliseconds.
///
/// Must stay below one block's playback time (16 ms at the reference rate).
pub const FEED_QUANTUM_MS: u32 = 10;

/// Poll interval while waiting on an exhausted pool, in milliseconds.
pub const ALLOC_POLL_MS: u32 = 1;

/// Peripheral write timeout, in milliseconds.
pub const WRITE_TIMEOUT_MS: u32 = 1000;

/// Number of digital output lines in the bank.
pub const OUTPUT_LINES: usize = 4;
