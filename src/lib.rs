//! # docset
//!
//! Document-set algebra for a full-text search engine.
//!
//! ## Features
//!
//! - Dense bit sets over document ids ([`util::OpenBitSet`])
//! - Forward-only doc id cursors ([`search::DocIdSetIterator`])
//! - Streaming OR/AND/NOT/XOR of a cursor into a bit set ([`util::OpenBitSetDisi`])
//! - Lossless binary encoding of bit sets

pub mod cli;
pub mod error;
pub mod search;
pub mod util;

pub mod prelude {
    pub use crate::error::{DocSetError, Result};
    pub use crate::search::{DocId, DocIdSet, DocIdSetIterator, NO_MORE_DOCS};
    pub use crate::util::{OpenBitSet, OpenBitSetDisi, OpenBitSetIterator};
}

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
