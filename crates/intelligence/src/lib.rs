//! Text encoders for promrag
//!
//! Turns metric names, help strings and free-text queries into fixed-size
//! embeddings through the [`promrag_core::Encoder`] trait.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod embed;

pub use embed::{HashingEncoder, DEFAULT_DIMENSION};
