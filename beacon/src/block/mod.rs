//! Fixed-size audio blocks and the pool they are drawn from.
//!
//! A [`Block`] is an exclusive handle to one pool slot. Dropping it returns
//! the slot, so a block that the transmit path has finished with is released
//! simply by letting it go out of scope.

pub mod pool;
mod handle;

pub use handle::Block;
pub use pool::{BlockData, BlockPool};
