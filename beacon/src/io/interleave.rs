//! Frame packing for the I2S transmit DMA buffer.
//!
//! Blocks carry interleaved stereo samples `L R L R ...`. The DMA buffer
//! holds one `u32` per frame:
//! - Lower 16 bits: left sample
//! - Upper 16 bits: right sample
//!
//! On a little-endian core this is the same byte order as the block itself,
//! so the packing is a straight copy in memory terms.

/// Pack interleaved `L R` sample pairs into one `u32` per frame.
///
/// # Panics
///
/// Debug-asserts that `samples` holds exactly two samples per frame.
pub fn pack_frames(dest: &mut [u32], samples: &[i16]) {
    debug_assert_eq!(samples.len(), dest.len() * 2);

    for (frame, pair) in dest.iter_mut().zip(samples.chunks_exact(2)) {
        *frame = (pair[0] as u16 as u32) | ((pair[1] as u16 as u32) << 16);
    }
}

/// Split packed frames back into interleaved `L R` samples.
pub fn unpack_frames(src: &[u32], samples: &mut [i16]) {
    debug_assert_eq!(samples.len(), src.len() * 2);

    for (&frame, pair) in src.iter().zip(samples.chunks_exact_mut(2)) {
        pair[0] = frame as i16;
        pair[1] = (frame >> 16) as i16;
    }
}

/// Fill frames with silence on both channels.
pub fn silence(dest: &mut [u32]) {
    dest.fill(0);
}
