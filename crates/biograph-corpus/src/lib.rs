//! Corpus loading for Biograph.
//!
//! Reads the biographical documents from a directory or a batch of URLs and
//! concatenates them into a single [`CorpusContext`](biograph_core::CorpusContext).

pub mod error;
pub mod loader;

pub use error::LoadError;
pub use loader::{CorpusLoader, CorpusSource};
