//! Bit sets over document ids and their combination with doc id cursors.

pub mod bits;
pub mod open_bit_set;
pub mod open_bit_set_disi;
pub mod open_bit_set_io;
pub mod open_bit_set_iterator;

// Re-export commonly used types
pub use open_bit_set::{MAX_BITS, Ones, OpenBitSet};
pub use open_bit_set_disi::OpenBitSetDisi;
pub use open_bit_set_iterator::OpenBitSetIterator;
