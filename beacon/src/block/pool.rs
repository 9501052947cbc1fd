use core::cell::UnsafeCell;
use core::sync::atomic::{AtomicU32, Ordering};

use embedded_hal::delay::DelayNs;

use crate::constants::{ALLOC_POLL_MS, BLOCK_SAMPLES, POOL_SIZE};
use crate::error::Error;

use super::handle::Block;

const _: () = assert!(POOL_SIZE <= 32, "pool bitmap holds at most 32 slots");

/// Raw block storage: 512 signed 16-bit samples, 4-byte aligned for DMA.
#[repr(C, align(4))]
pub struct BlockData {
    pub samples: [i16; BLOCK_SAMPLES],
}

impl BlockData {
    const fn zeroed() -> Self {
        BlockData {
            samples: [0i16; BLOCK_SAMPLES],
        }
    }
}

/// Lock-free pool of transmit blocks.
///
/// An atomic bitmap tracks which slots are handed out. Claiming a slot is a
/// single compare-and-swap, so [`try_alloc`](Self::try_alloc) and the release
/// path are safe from interrupt context. The waiting variants
/// ([`alloc`](Self::alloc), [`alloc_timeout`](Self::alloc_timeout)) sleep on
/// the supplied delay between attempts and belong to the feeder only.
pub struct BlockPool {
    /// Bit N set means slot N is handed out.
    bitmap: AtomicU32,
    storage: UnsafeCell<[BlockData; POOL_SIZE]>,
}

// SAFETY: slot storage is only reached through a `Block`, and a `Block` is
// created only after its slot bit was claimed by CAS. The bit stays set until
// that `Block` is dropped, so no two handles alias the same slot.
unsafe impl Sync for BlockPool {}

impl BlockPool {
    /// Create a pool with every slot free.
    pub const fn new() -> Self {
        const EMPTY: BlockData = BlockData::zeroed();
        BlockPool {
            bitmap: AtomicU32::new(0),
            storage: UnsafeCell::new([EMPTY; POOL_SIZE]),
        }
    }

    /// Claim a free slot without waiting. The block comes back zeroed.
    pub fn try_alloc(&self) -> Option<Block<'_>> {
        loop {
            let bitmap = self.bitmap.load(Ordering::Acquire);
            let free = !bitmap;
            let slot = free.trailing_zeros();
            if slot >= POOL_SIZE as u32 {
                return None;
            }
            let bit = 1u32 << slot;
            match self.bitmap.compare_exchange_weak(
                bitmap,
                bitmap | bit,
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => {
                    // SAFETY: the CAS above gave us exclusive ownership of `slot`.
                    unsafe {
                        (*self.data_ptr(slot as u8)).samples.fill(0);
                    }
                    return Some(Block::new(self, slot as u8));
                }
                Err(_) => continue,
            }
        }
    }

    /// Wait until a slot is free, then claim it.
    ///
    /// Never returns while the pool stays exhausted. Between attempts the
    /// caller is put to sleep for [`ALLOC_POLL_MS`] instead of spinning.
    pub fn alloc<D: DelayNs>(&self, delay: &mut D) -> Block<'_> {
        loop {
            if let Some(block) = self.try_alloc() {
                return block;
            }
            delay.delay_ms(ALLOC_POLL_MS);
        }
    }

    /// Like [`alloc`](Self::alloc), giving up after `timeout_ms`.
    pub fn alloc_timeout<D: DelayNs>(
        &self,
        delay: &mut D,
        timeout_ms: u32,
    ) -> Result<Block<'_>, Error> {
        let mut waited = 0u32;
        loop {
            if let Some(block) = self.try_alloc() {
                return Ok(block);
            }
            if waited >= timeout_ms {
                return Err(Error::PoolExhausted);
            }
            delay.delay_ms(ALLOC_POLL_MS);
            waited = waited.saturating_add(ALLOC_POLL_MS);
        }
    }

    /// Hand a block back. Same as dropping it.
    pub fn release(&self, block: Block<'_>) {
        debug_assert!(block.belongs_to(self), "block released to foreign pool");
        drop(block);
    }

    /// Clear the slot bit. Called from `Block::drop`.
    pub(super) fn free(&self, slot: u8) {
        debug_assert!((slot as usize) < POOL_SIZE);
        let bit = 1u32 << slot;
        let old = self.bitmap.fetch_and(!bit, Ordering::Release);
        debug_assert!(old & bit != 0, "double free of slot {}", slot);
    }

    /// Pointer to a slot's storage.
    ///
    /// # Safety
    /// Caller must own the slot.
    pub(super) unsafe fn data_ptr(&self, slot: u8) -> *mut BlockData {
        let storage = self.storage.get();
        unsafe { core::ptr::addr_of_mut!((*storage)[slot as usize]) }
    }

    /// Number of blocks currently handed out.
    pub fn allocated_count(&self) -> u32 {
        self.bitmap.load(Ordering::Acquire).count_ones()
    }

    pub fn capacity(&self) -> usize {
        POOL_SIZE
    }

    pub fn is_exhausted(&self) -> bool {
        self.allocated_count() as usize >= POOL_SIZE
    }
}

impl Default for BlockPool {
    fn default() -> Self {
        Self::new()
    }
}
