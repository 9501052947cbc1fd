use core::ops::{Deref, DerefMut};

use crate::constants::BLOCK_SAMPLES;

use super::pool::BlockPool;

/// Exclusive handle to one pool slot.
///
/// There is at most one `Block` per claimed slot. It derefs to the slot's
/// `[i16; 512]` samples; dropping it frees the slot.
pub struct Block<'a> {
    pool: &'a BlockPool,
    slot: u8,
}

impl<'a> Block<'a> {
    /// Wrap a slot that was just claimed from `pool`.
    pub(super) fn new(pool: &'a BlockPool, slot: u8) -> Self {
        Block { pool, slot }
    }

    /// Pool slot index.
    pub fn slot(&self) -> u8 {
        self.slot
    }

    pub(super) fn belongs_to(&self, pool: &BlockPool) -> bool {
        core::ptr::eq(self.pool, pool)
    }
}

impl Deref for Block<'_> {
    type Target = [i16; BLOCK_SAMPLES];

    fn deref(&self) -> &Self::Target {
        // SAFETY: we own the slot until drop.
        unsafe { &(*self.pool.data_ptr(self.slot)).samples }
    }
}

impl DerefMut for Block<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        // SAFETY: we own the slot until drop.
        unsafe { &mut (*self.pool.data_ptr(self.slot)).samples }
    }
}

impl Drop for Block<'_> {
    fn drop(&mut self) {
        self.pool.free(self.slot);
    }
}

impl core::fmt::Debug for Block<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Block").field("slot", &self.slot).finish()
    }
}
